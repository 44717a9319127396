pub mod contact;
pub mod gallery;
pub mod service;
pub mod slot;
pub mod step;
pub mod summary;

pub use contact::{ContactInfo, Field};
pub use gallery::{
    Appearance, FilterTag, GalleryCatalog, GalleryItem, ItemVisibility, LightboxPhase,
    OverlayAnimation, OverlayId, OverlayNode, OverlayTarget,
};
pub use service::{Service, ServiceCatalog, ServiceId};
pub use slot::{day_slots, TimeSlot};
pub use step::Step;
pub use summary::{BookingSummary, SummaryText};
