use std::time::Duration;

use crate::models::{
    Appearance, FilterTag, GalleryCatalog, GalleryItem, ItemVisibility, LightboxPhase, OverlayId,
    OverlayTarget,
};
use crate::services::lightbox::{DismissReason, Lightbox};
use crate::services::timer::{TimerId, TimerQueue};
use crate::ui::GalleryView;

pub const ESCAPE_KEY: &str = "Escape";

#[derive(Debug, Clone)]
pub struct GalleryConfig {
    /// Pause between an item entering the layout and its fade-in starting.
    pub reveal_delay: Duration,
    pub fade_duration: Duration,
    pub lightbox_animation: Duration,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            reveal_delay: Duration::from_millis(50),
            fade_duration: Duration::from_millis(300),
            lightbox_animation: Duration::from_millis(300),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GalleryTimer {
    Reveal(usize),
    Hide(usize),
    LightboxSettled(OverlayId),
    LightboxRemoved(OverlayId),
}

/// Category filter and lightbox for the gallery grid.
pub struct GalleryController<V> {
    config: GalleryConfig,
    items: Vec<GalleryItem>,
    visibility: Vec<ItemVisibility>,
    active_filter: FilterTag,
    lightbox: Lightbox,
    timers: TimerQueue<GalleryTimer>,
    view: V,
}

impl<V: GalleryView> GalleryController<V> {
    pub fn new(catalog: GalleryCatalog, config: GalleryConfig, mut view: V) -> Self {
        let visibility = vec![ItemVisibility::Visible; catalog.items.len()];
        let active_filter = FilterTag::All;
        view.mark_active_filter(&active_filter);
        Self {
            lightbox: Lightbox::new(config.lightbox_animation),
            config,
            items: catalog.items,
            visibility,
            active_filter,
            timers: TimerQueue::new(),
            view,
        }
    }

    pub fn items(&self) -> &[GalleryItem] {
        &self.items
    }

    pub fn active_filter(&self) -> &FilterTag {
        &self.active_filter
    }

    pub fn item_visibility(&self, index: usize) -> Option<ItemVisibility> {
        self.visibility.get(index).copied()
    }

    /// Indices of items that are shown or on their way to being shown.
    pub fn shown_items(&self) -> Vec<usize> {
        self.visibility
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_shown())
            .map(|(i, _)| i)
            .collect()
    }

    pub fn lightbox_phase(&self) -> LightboxPhase {
        self.lightbox.phase()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    /// Activates `filter` and starts show/hide transitions. Returns how many
    /// items match.
    pub fn filter(&mut self, filter: FilterTag) -> usize {
        self.view.mark_active_filter(&filter);

        let mut matching = 0;
        for index in 0..self.items.len() {
            let wanted = self.items[index].matches(&filter);
            if wanted {
                matching += 1;
                self.show_item(index);
            } else {
                self.hide_item(index);
            }
        }

        tracing::info!(filter = %filter, matching, total = self.items.len(), "gallery filtered");
        self.active_filter = filter;
        matching
    }

    fn show_item(&mut self, index: usize) {
        let current = self.visibility[index];
        if current.is_shown() {
            return;
        }
        self.cancel_pending(current);
        // Enter the layout first; the fade-in starts once it has rendered.
        self.view.set_item_displayed(index, true);
        let timer = self
            .timers
            .schedule(self.config.reveal_delay, GalleryTimer::Reveal(index));
        self.visibility[index] = ItemVisibility::Revealing(timer);
    }

    fn hide_item(&mut self, index: usize) {
        let current = self.visibility[index];
        if !current.is_shown() {
            return;
        }
        self.cancel_pending(current);
        self.view.set_item_appearance(index, Appearance::Receded);
        let timer = self
            .timers
            .schedule(self.config.fade_duration, GalleryTimer::Hide(index));
        self.visibility[index] = ItemVisibility::FadingOut(timer);
    }

    fn cancel_pending(&mut self, visibility: ItemVisibility) {
        if let Some(timer) = visibility.pending_timer() {
            self.timers.cancel(timer);
        }
    }

    /// Opens the lightbox on an item. Hidden items cannot be clicked.
    pub fn open_item(&mut self, index: usize) -> Option<OverlayId> {
        match self.visibility.get(index) {
            Some(ItemVisibility::Hidden) | None => {
                tracing::debug!(index, "click on item that is not displayed");
                None
            }
            Some(_) => self
                .lightbox
                .open(&self.items[index], &mut self.view, &mut self.timers),
        }
    }

    pub fn click_close(&mut self) -> bool {
        self.lightbox
            .dismiss(DismissReason::CloseButton, &mut self.view, &mut self.timers)
    }

    /// Clicks on the image or caption do not dismiss; only the backdrop does.
    pub fn click_overlay(&mut self, target: OverlayTarget) -> bool {
        match target {
            OverlayTarget::Backdrop => {
                self.lightbox
                    .dismiss(DismissReason::Backdrop, &mut self.view, &mut self.timers)
            }
            OverlayTarget::Content => false,
        }
    }

    /// Document-level keydown. Only reaches the lightbox while it holds a
    /// key listener registration.
    pub fn key_pressed(&mut self, key: &str) -> bool {
        if key != ESCAPE_KEY || !self.lightbox.listens_for_keys() {
            return false;
        }
        self.lightbox
            .dismiss(DismissReason::Escape, &mut self.view, &mut self.timers)
    }

    pub fn now(&self) -> Duration {
        self.timers.now()
    }

    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.next_deadline()
    }

    pub fn advance_to(&mut self, now: Duration) {
        while let Some((id, event)) = self.timers.pop_due(now) {
            self.on_timer(id, event);
        }
    }

    pub fn advance_by(&mut self, elapsed: Duration) {
        let now = self.timers.now() + elapsed;
        self.advance_to(now);
    }

    fn on_timer(&mut self, fired: TimerId, event: GalleryTimer) {
        match event {
            GalleryTimer::Reveal(index) => {
                if self.visibility.get(index) == Some(&ItemVisibility::Revealing(fired)) {
                    self.view.set_item_appearance(index, Appearance::Shown);
                    self.visibility[index] = ItemVisibility::Visible;
                }
            }
            GalleryTimer::Hide(index) => {
                if self.visibility.get(index) == Some(&ItemVisibility::FadingOut(fired)) {
                    self.view.set_item_displayed(index, false);
                    self.visibility[index] = ItemVisibility::Hidden;
                }
            }
            GalleryTimer::LightboxSettled(overlay) => self.lightbox.on_settled(overlay),
            GalleryTimer::LightboxRemoved(overlay) => {
                self.lightbox.on_removal(overlay, &mut self.view)
            }
        }
    }
}
