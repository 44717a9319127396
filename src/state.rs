use std::time::Duration;

use crate::config::AppConfig;
use crate::services::gallery::GalleryController;
use crate::services::submission::SimulatedGateway;
use crate::services::wizard::BookingWizard;
use crate::ui::Document;

pub type Wizard = BookingWizard<Document, SimulatedGateway>;
pub type Gallery = GalleryController<Document>;

/// One page session: the booking form and the gallery, each writing to
/// its own part of the page.
pub struct AppState {
    pub config: AppConfig,
    pub booking: Wizard,
    pub gallery: Gallery,
}

impl AppState {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let today = config.today()?;
        let services = config.load_services()?;
        let gallery = config.load_gallery()?;
        tracing::info!(
            services = services.len(),
            gallery_items = gallery.items.len(),
            %today,
            "page loaded"
        );

        let grid = Document::new().with_gallery_items(gallery.items.len());
        Ok(Self {
            booking: BookingWizard::new(
                services,
                config.wizard_config(),
                today,
                Document::new(),
                SimulatedGateway::new(config.business_name.clone()),
            ),
            gallery: GalleryController::new(gallery, config.gallery_config(), grid),
            config,
        })
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        match (self.booking.next_deadline(), self.gallery.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }
}
