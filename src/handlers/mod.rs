pub mod booking;
pub mod gallery;

use std::time::Duration;

use serde::Deserialize;

use crate::state::AppState;

pub use booking::BookingEvent;
pub use gallery::GalleryEvent;

/// One user interaction, as delivered by the page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum UiEvent {
    Booking(BookingEvent),
    Gallery(GalleryEvent),
}

impl UiEvent {
    pub fn parse(line: &str) -> anyhow::Result<Self> {
        serde_json::from_str(line).map_err(|e| anyhow::anyhow!("unrecognised event {line}: {e}"))
    }
}

/// Routes an event to the subsystem that owns it. Returns a short
/// description of what happened.
pub fn dispatch(state: &mut AppState, event: UiEvent) -> String {
    match event {
        UiEvent::Booking(event) => booking::handle(&mut state.booking, event),
        UiEvent::Gallery(event) => gallery::handle(&mut state.gallery, event),
    }
}

/// Fires every timer due by `now` in both subsystems.
pub fn run_timers(state: &mut AppState, now: Duration) -> Vec<String> {
    let mut replies = Vec::new();
    if let Some(outcome) = state.booking.advance_to(now) {
        replies.push(booking::describe_outcome(&outcome));
    }
    state.gallery.advance_to(now);
    replies
}
