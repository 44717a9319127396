use tokio::io::AsyncBufReadExt;
use tokio::time::Instant;
use tokio_stream::wrappers::LinesStream;
use tokio_stream::StreamExt;
use tracing_subscriber::EnvFilter;

use salonfront::config::AppConfig;
use salonfront::handlers::{self, UiEvent};
use salonfront::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();
    let mut state = AppState::new(config)?;

    let started = Instant::now();
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = LinesStream::new(stdin.lines());
    tracing::info!("reading UI events from stdin, one JSON object per line");

    loop {
        let deadline = state.next_deadline();
        let timer = async move {
            match deadline {
                Some(d) => tokio::time::sleep_until(started + d).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            line = lines.next() => {
                let line = match line {
                    Some(line) => line?,
                    None => break,
                };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                for reply in handlers::run_timers(&mut state, started.elapsed()) {
                    tracing::info!(%reply, "timer fired");
                }
                match UiEvent::parse(line) {
                    Ok(event) => {
                        let reply = handlers::dispatch(&mut state, event);
                        tracing::info!(%reply, "event handled");
                    }
                    Err(e) => tracing::warn!(error = %e, "skipping input"),
                }
            }
            _ = timer => {
                for reply in handlers::run_timers(&mut state, started.elapsed()) {
                    tracing::info!(%reply, "timer fired");
                }
            }
        }
    }

    // Let pending transitions and submissions finish before exiting.
    while let Some(deadline) = state.next_deadline() {
        tokio::time::sleep_until(started + deadline).await;
        for reply in handlers::run_timers(&mut state, started.elapsed()) {
            tracing::info!(%reply, "timer fired");
        }
    }

    println!("{}", serde_json::to_string_pretty(state.booking.view())?);
    println!("{}", serde_json::to_string_pretty(state.gallery.view())?);
    println!("{}", serde_json::to_string_pretty(&state.booking.gateway().confirmed)?);

    Ok(())
}
