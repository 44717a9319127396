use std::env;
use std::time::Duration;

use chrono::NaiveDate;

use crate::errors::AppError;
use crate::models::{GalleryCatalog, ServiceCatalog};
use crate::services::gallery::GalleryConfig;
use crate::services::wizard::WizardConfig;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub submit_latency_ms: u64,
    pub gallery_fade_ms: u64,
    pub gallery_reveal_delay_ms: u64,
    pub lightbox_animation_ms: u64,
    pub currency_symbol: String,
    pub submit_label: String,
    pub business_name: String,
    pub services_path: Option<String>,
    pub gallery_path: Option<String>,
    /// Pins "today" (YYYY-MM-DD) instead of the local date.
    pub today_override: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            submit_latency_ms: 2000,
            gallery_fade_ms: 300,
            gallery_reveal_delay_ms: 50,
            lightbox_animation_ms: 300,
            currency_symbol: "R".to_string(),
            submit_label: "Book Appointment".to_string(),
            business_name: "Salon".to_string(),
            services_path: None,
            gallery_path: None,
            today_override: None,
        }
    }
}

fn env_ms(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            submit_latency_ms: env_ms("SUBMIT_LATENCY_MS", defaults.submit_latency_ms),
            gallery_fade_ms: env_ms("GALLERY_FADE_MS", defaults.gallery_fade_ms),
            gallery_reveal_delay_ms: env_ms(
                "GALLERY_REVEAL_DELAY_MS",
                defaults.gallery_reveal_delay_ms,
            ),
            lightbox_animation_ms: env_ms("LIGHTBOX_ANIMATION_MS", defaults.lightbox_animation_ms),
            currency_symbol: env::var("CURRENCY_SYMBOL").unwrap_or(defaults.currency_symbol),
            submit_label: env::var("SUBMIT_LABEL").unwrap_or(defaults.submit_label),
            business_name: env::var("BUSINESS_NAME").unwrap_or(defaults.business_name),
            services_path: env::var("SERVICES_PATH").ok(),
            gallery_path: env::var("GALLERY_PATH").ok(),
            today_override: env::var("BOOKING_TODAY").ok(),
        }
    }

    pub fn wizard_config(&self) -> WizardConfig {
        WizardConfig {
            submit_latency: Duration::from_millis(self.submit_latency_ms),
            currency: self.currency_symbol.clone(),
            submit_label: self.submit_label.clone(),
            ..WizardConfig::default()
        }
    }

    pub fn gallery_config(&self) -> GalleryConfig {
        GalleryConfig {
            reveal_delay: Duration::from_millis(self.gallery_reveal_delay_ms),
            fade_duration: Duration::from_millis(self.gallery_fade_ms),
            lightbox_animation: Duration::from_millis(self.lightbox_animation_ms),
        }
    }

    pub fn today(&self) -> Result<NaiveDate, AppError> {
        match &self.today_override {
            Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .map_err(|e| AppError::Config(format!("BOOKING_TODAY={s}: {e}"))),
            None => Ok(chrono::Local::now().date_naive()),
        }
    }

    pub fn load_services(&self) -> Result<ServiceCatalog, AppError> {
        match &self.services_path {
            Some(path) => ServiceCatalog::from_json(&std::fs::read_to_string(path)?),
            None => ServiceCatalog::builtin(),
        }
    }

    pub fn load_gallery(&self) -> Result<GalleryCatalog, AppError> {
        match &self.gallery_path {
            Some(path) => GalleryCatalog::from_json(&std::fs::read_to_string(path)?),
            None => GalleryCatalog::builtin(),
        }
    }
}
