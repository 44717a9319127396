use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{
    Appearance, Field, FilterTag, OverlayAnimation, OverlayId, OverlayNode, ServiceId, Step,
    SummaryText, TimeSlot,
};

use super::{BookingView, GalleryView, ListenerHandle, SubmitControl};

/// Which optional fragments the page was rendered with. Writes aimed at a
/// missing fragment are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentLayout {
    pub summary_panel: bool,
    pub slot_container: bool,
    pub error_labels: bool,
}

impl Default for DocumentLayout {
    fn default() -> Self {
        Self {
            summary_panel: true,
            slot_container: true,
            error_labels: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorLabel {
    pub text: String,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemNode {
    pub displayed: bool,
    pub appearance: Appearance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stylesheet {
    pub id: String,
    pub css: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MountedOverlay {
    pub node: OverlayNode,
    pub animation: Option<OverlayAnimation>,
}

/// In-memory page that records every write. Used by the console driver
/// and by tests to observe what a browser would show.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    #[serde(skip)]
    layout: DocumentLayout,
    pub active_steps: BTreeSet<Step>,
    pub min_date: Option<NaiveDate>,
    pub date_value: Option<NaiveDate>,
    pub time_slots: Vec<String>,
    pub selected_slot: Option<String>,
    pub checked_services: BTreeSet<ServiceId>,
    pub field_errors: BTreeMap<Field, ErrorLabel>,
    pub summary: Option<SummaryText>,
    pub submit: SubmitControl,
    pub inputs_disabled: bool,
    pub notices: Vec<String>,
    pub active_filter: Option<FilterTag>,
    pub items: Vec<ItemNode>,
    pub stylesheets: Vec<Stylesheet>,
    pub overlays: Vec<MountedOverlay>,
    pub key_listeners: BTreeSet<u64>,
    #[serde(skip)]
    next_listener: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::with_layout(DocumentLayout::default())
    }
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_layout(layout: DocumentLayout) -> Self {
        Self {
            layout,
            active_steps: BTreeSet::from([Step::ServiceSelection]),
            min_date: None,
            date_value: None,
            time_slots: Vec::new(),
            selected_slot: None,
            checked_services: BTreeSet::new(),
            field_errors: BTreeMap::new(),
            summary: None,
            submit: SubmitControl {
                enabled: true,
                busy: false,
                label: String::new(),
            },
            inputs_disabled: false,
            notices: Vec::new(),
            active_filter: None,
            items: Vec::new(),
            stylesheets: Vec::new(),
            overlays: Vec::new(),
            key_listeners: BTreeSet::new(),
            next_listener: 0,
        }
    }

    /// A page whose gallery grid has `count` items, all initially shown.
    pub fn with_gallery_items(mut self, count: usize) -> Self {
        self.items = vec![
            ItemNode {
                displayed: true,
                appearance: Appearance::Shown,
            };
            count
        ];
        self
    }

    /// The active step, if exactly one step is flagged.
    pub fn active_step(&self) -> Option<Step> {
        match self.active_steps.len() {
            1 => self.active_steps.iter().next().copied(),
            _ => None,
        }
    }

    pub fn visible_error(&self, field: Field) -> Option<&str> {
        self.field_errors
            .get(&field)
            .filter(|label| label.visible)
            .map(|label| label.text.as_str())
    }

    pub fn last_notice(&self) -> Option<&str> {
        self.notices.last().map(String::as_str)
    }

    pub fn displayed_items(&self) -> Vec<usize> {
        self.items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.displayed)
            .map(|(i, _)| i)
            .collect()
    }

    pub fn overlay_count(&self) -> usize {
        self.overlays.len()
    }

    pub fn key_listener_count(&self) -> usize {
        self.key_listeners.len()
    }
}

impl BookingView for Document {
    fn show_step(&mut self, step: Step) {
        self.active_steps.clear();
        self.active_steps.insert(step);
    }

    fn set_min_date(&mut self, date: NaiveDate) {
        self.min_date = Some(date);
    }

    fn set_date_value(&mut self, date: Option<NaiveDate>) {
        self.date_value = date;
    }

    fn render_time_slots(&mut self, slots: &[TimeSlot]) {
        if !self.layout.slot_container {
            return;
        }
        self.time_slots = slots.iter().map(|s| s.to_string()).collect();
        self.selected_slot = None;
    }

    fn mark_selected_slot(&mut self, slot: Option<TimeSlot>) {
        if !self.layout.slot_container {
            return;
        }
        self.selected_slot = slot.map(|s| s.to_string());
    }

    fn mark_service(&mut self, id: &ServiceId, checked: bool) {
        if checked {
            self.checked_services.insert(id.clone());
        } else {
            self.checked_services.remove(id);
        }
    }

    fn show_field_error(&mut self, field: Field, message: &str) {
        if !self.layout.error_labels {
            return;
        }
        self.field_errors.insert(
            field,
            ErrorLabel {
                text: message.to_string(),
                visible: true,
            },
        );
    }

    fn clear_field_errors(&mut self) {
        for label in self.field_errors.values_mut() {
            label.visible = false;
        }
    }

    fn render_summary(&mut self, summary: &SummaryText) {
        if !self.layout.summary_panel {
            return;
        }
        self.summary = Some(summary.clone());
    }

    fn set_submit_control(&mut self, control: &SubmitControl) {
        self.submit = control.clone();
    }

    fn set_inputs_disabled(&mut self, disabled: bool) {
        self.inputs_disabled = disabled;
    }

    fn reset_form(&mut self) {
        self.date_value = None;
        self.checked_services.clear();
    }

    fn notify(&mut self, message: &str) {
        self.notices.push(message.to_string());
    }
}

impl GalleryView for Document {
    fn mark_active_filter(&mut self, filter: &FilterTag) {
        self.active_filter = Some(filter.clone());
    }

    fn set_item_displayed(&mut self, index: usize, displayed: bool) {
        if let Some(item) = self.items.get_mut(index) {
            item.displayed = displayed;
        }
    }

    fn set_item_appearance(&mut self, index: usize, appearance: Appearance) {
        if let Some(item) = self.items.get_mut(index) {
            item.appearance = appearance;
        }
    }

    fn ensure_stylesheet(&mut self, id: &str, css: &str) {
        if self.stylesheets.iter().any(|s| s.id == id) {
            return;
        }
        self.stylesheets.push(Stylesheet {
            id: id.to_string(),
            css: css.to_string(),
        });
    }

    fn mount_overlay(&mut self, overlay: &OverlayNode) {
        self.overlays.push(MountedOverlay {
            node: overlay.clone(),
            animation: Some(OverlayAnimation::FadeIn),
        });
    }

    fn set_overlay_animation(&mut self, id: OverlayId, animation: OverlayAnimation) {
        if let Some(mounted) = self.overlays.iter_mut().find(|o| o.node.id == id) {
            mounted.animation = Some(animation);
        }
    }

    fn remove_overlay(&mut self, id: OverlayId) -> bool {
        let before = self.overlays.len();
        self.overlays.retain(|o| o.node.id != id);
        self.overlays.len() != before
    }

    fn add_key_listener(&mut self) -> ListenerHandle {
        let handle = self.next_listener;
        self.next_listener += 1;
        self.key_listeners.insert(handle);
        ListenerHandle(handle)
    }

    fn remove_key_listener(&mut self, handle: ListenerHandle) -> bool {
        self.key_listeners.remove(&handle.0)
    }
}
