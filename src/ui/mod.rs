//! The boundary to the rendered page. Controllers only ever write through
//! these traits; the page never calls back into controller state.

pub mod document;

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{
    Appearance, Field, FilterTag, OverlayAnimation, OverlayId, OverlayNode, ServiceId, Step,
    SummaryText, TimeSlot,
};

pub use document::{Document, DocumentLayout};

/// Registration of a document-level keydown listener. Must be handed back
/// to [`GalleryView::remove_key_listener`] exactly once.
#[derive(Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ListenerHandle(pub u64);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubmitControl {
    pub enabled: bool,
    pub busy: bool,
    pub label: String,
}

pub trait BookingView {
    /// Flags `step` active and every other step inactive.
    fn show_step(&mut self, step: Step);
    fn set_min_date(&mut self, date: NaiveDate);
    fn set_date_value(&mut self, date: Option<NaiveDate>);
    fn render_time_slots(&mut self, slots: &[TimeSlot]);
    fn mark_selected_slot(&mut self, slot: Option<TimeSlot>);
    fn mark_service(&mut self, id: &ServiceId, checked: bool);
    fn show_field_error(&mut self, field: Field, message: &str);
    fn clear_field_errors(&mut self);
    fn render_summary(&mut self, summary: &SummaryText);
    fn set_submit_control(&mut self, control: &SubmitControl);
    fn set_inputs_disabled(&mut self, disabled: bool);
    /// Empties every form input.
    fn reset_form(&mut self);
    fn notify(&mut self, message: &str);
}

pub trait GalleryView {
    fn mark_active_filter(&mut self, filter: &FilterTag);
    fn set_item_displayed(&mut self, index: usize, displayed: bool);
    fn set_item_appearance(&mut self, index: usize, appearance: Appearance);
    /// Adds a stylesheet unless one with the same id is already present.
    fn ensure_stylesheet(&mut self, id: &str, css: &str);
    fn mount_overlay(&mut self, overlay: &OverlayNode);
    fn set_overlay_animation(&mut self, id: OverlayId, animation: OverlayAnimation);
    /// Returns false if the overlay was not mounted.
    fn remove_overlay(&mut self, id: OverlayId) -> bool;
    fn add_key_listener(&mut self) -> ListenerHandle;
    /// Returns false if the handle was not registered.
    fn remove_key_listener(&mut self, handle: ListenerHandle) -> bool;
}
