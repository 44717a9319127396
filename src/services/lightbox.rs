use std::time::Duration;

use crate::models::{GalleryItem, LightboxPhase, OverlayAnimation, OverlayId, OverlayNode};
use crate::services::gallery::GalleryTimer;
use crate::services::timer::{TimerId, TimerQueue};
use crate::ui::{GalleryView, ListenerHandle};

pub const LIGHTBOX_STYLESHEET_ID: &str = "lightbox-styles";

const LIGHTBOX_CSS_TEMPLATE: &str = r#"
.lightbox {
    position: fixed;
    top: 0;
    left: 0;
    width: 100%;
    height: 100%;
    background: rgba(0, 0, 0, 0.9);
    display: flex;
    align-items: center;
    justify-content: center;
    z-index: 10000;
    animation: {animation};
}
.lightbox-content {
    position: relative;
    max-width: 90%;
    max-height: 90%;
}
.lightbox-content img {
    max-width: 100%;
    max-height: 80vh;
    border-radius: 8px;
}
.lightbox-close {
    position: absolute;
    top: -40px;
    right: 0;
    background: none;
    border: none;
    color: white;
    font-size: 2rem;
    cursor: pointer;
}
.lightbox-caption {
    color: white;
    text-align: center;
    margin-top: 1rem;
    font-size: 1.125rem;
}
@keyframes fadeIn {
    from { opacity: 0; }
    to { opacity: 1; }
}
@keyframes fadeOut {
    from { opacity: 1; }
    to { opacity: 0; }
}
"#;

/// Lightbox styles with the entrance animation running for `animation`.
pub fn lightbox_css(animation: Duration) -> String {
    LIGHTBOX_CSS_TEMPLATE.replace("{animation}", &OverlayAnimation::FadeIn.css(animation))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    CloseButton,
    Backdrop,
    Escape,
}

impl DismissReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DismissReason::CloseButton => "close_button",
            DismissReason::Backdrop => "backdrop",
            DismissReason::Escape => "escape",
        }
    }
}

/// The overlay and the keydown registration it holds. The registration is
/// given back as soon as closing starts.
#[derive(Debug)]
enum LightboxState {
    Closed,
    Opening {
        overlay: OverlayId,
        listener: ListenerHandle,
        timer: TimerId,
    },
    Open {
        overlay: OverlayId,
        listener: ListenerHandle,
    },
    Closing {
        overlay: OverlayId,
        timer: TimerId,
    },
}

/// Single-instance image viewer.
#[derive(Debug)]
pub struct Lightbox {
    state: LightboxState,
    next_overlay: u64,
    animation: Duration,
}

impl Lightbox {
    pub fn new(animation: Duration) -> Self {
        Self {
            state: LightboxState::Closed,
            next_overlay: 0,
            animation,
        }
    }

    pub fn phase(&self) -> LightboxPhase {
        match self.state {
            LightboxState::Closed => LightboxPhase::Closed,
            LightboxState::Opening { .. } => LightboxPhase::Opening,
            LightboxState::Open { .. } => LightboxPhase::Open,
            LightboxState::Closing { .. } => LightboxPhase::Closing,
        }
    }

    pub fn overlay(&self) -> Option<OverlayId> {
        match self.state {
            LightboxState::Closed => None,
            LightboxState::Opening { overlay, .. }
            | LightboxState::Open { overlay, .. }
            | LightboxState::Closing { overlay, .. } => Some(overlay),
        }
    }

    pub fn listens_for_keys(&self) -> bool {
        matches!(
            self.state,
            LightboxState::Opening { .. } | LightboxState::Open { .. }
        )
    }

    /// Shows `item` in a fresh overlay. Ignored while another overlay is
    /// opening or open; an overlay still fading out is removed first.
    pub fn open<V: GalleryView>(
        &mut self,
        item: &GalleryItem,
        view: &mut V,
        timers: &mut TimerQueue<GalleryTimer>,
    ) -> Option<OverlayId> {
        if self.listens_for_keys() {
            tracing::debug!(overlay = ?self.overlay(), item = %item.id, "lightbox already showing");
            return None;
        }
        self.finish_close(view, timers);

        view.ensure_stylesheet(LIGHTBOX_STYLESHEET_ID, &lightbox_css(self.animation));

        let overlay = OverlayId(self.next_overlay);
        self.next_overlay += 1;
        view.mount_overlay(&OverlayNode::for_item(overlay, item));
        let listener = view.add_key_listener();
        let timer = timers.schedule(self.animation, GalleryTimer::LightboxSettled(overlay));

        tracing::info!(%overlay, item = %item.id, "lightbox opened");
        self.state = LightboxState::Opening {
            overlay,
            listener,
            timer,
        };
        Some(overlay)
    }

    /// Starts the exit animation. Returns false when there is nothing to
    /// dismiss, including an overlay that is already closing.
    pub fn dismiss<V: GalleryView>(
        &mut self,
        reason: DismissReason,
        view: &mut V,
        timers: &mut TimerQueue<GalleryTimer>,
    ) -> bool {
        let (overlay, listener) = match std::mem::replace(&mut self.state, LightboxState::Closed) {
            LightboxState::Opening {
                overlay,
                listener,
                timer,
            } => {
                timers.cancel(timer);
                (overlay, listener)
            }
            LightboxState::Open { overlay, listener } => (overlay, listener),
            other => {
                self.state = other;
                return false;
            }
        };

        if !view.remove_key_listener(listener) {
            tracing::warn!(%overlay, "key listener was already gone");
        }
        view.set_overlay_animation(overlay, OverlayAnimation::FadeOut);
        let timer = timers.schedule(self.animation, GalleryTimer::LightboxRemoved(overlay));

        tracing::info!(%overlay, reason = reason.as_str(), "lightbox closing");
        self.state = LightboxState::Closing { overlay, timer };
        true
    }

    pub fn on_settled(&mut self, fired: OverlayId) {
        self.state = match std::mem::replace(&mut self.state, LightboxState::Closed) {
            LightboxState::Opening {
                overlay, listener, ..
            } if overlay == fired => LightboxState::Open { overlay, listener },
            other => other,
        };
    }

    pub fn on_removal<V: GalleryView>(&mut self, fired: OverlayId, view: &mut V) {
        match self.state {
            LightboxState::Closing { overlay, .. } if overlay == fired => {
                view.remove_overlay(overlay);
                tracing::debug!(%overlay, "lightbox removed");
                self.state = LightboxState::Closed;
            }
            _ => tracing::debug!(overlay = %fired, "stale lightbox removal ignored"),
        }
    }

    fn finish_close<V: GalleryView>(
        &mut self,
        view: &mut V,
        timers: &mut TimerQueue<GalleryTimer>,
    ) {
        if let LightboxState::Closing { overlay, timer } = self.state {
            timers.cancel(timer);
            view.remove_overlay(overlay);
            self.state = LightboxState::Closed;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::Document;

    fn item(id: &str) -> GalleryItem {
        GalleryItem {
            id: id.to_string(),
            src: format!("{id}.jpg"),
            alt: format!("{id} alt"),
            caption: format!("{id} caption"),
            category: "hair".to_string(),
        }
    }

    fn drain(
        lightbox: &mut Lightbox,
        doc: &mut Document,
        timers: &mut TimerQueue<GalleryTimer>,
        until: Duration,
    ) {
        while let Some((_, event)) = timers.pop_due(until) {
            match event {
                GalleryTimer::LightboxSettled(id) => lightbox.on_settled(id),
                GalleryTimer::LightboxRemoved(id) => lightbox.on_removal(id, doc),
                _ => {}
            }
        }
    }

    #[test]
    fn test_open_mounts_overlay_and_styles() {
        let mut lb = Lightbox::new(Duration::from_millis(300));
        let mut doc = Document::new();
        let mut timers = TimerQueue::new();

        let id = lb.open(&item("a"), &mut doc, &mut timers).unwrap();
        assert_eq!(lb.phase(), LightboxPhase::Opening);
        assert_eq!(doc.overlay_count(), 1);
        assert_eq!(doc.overlays[0].node.caption, "a caption");
        assert_eq!(doc.stylesheets.len(), 1);
        assert_eq!(doc.key_listener_count(), 1);

        drain(&mut lb, &mut doc, &mut timers, Duration::from_millis(300));
        assert_eq!(lb.phase(), LightboxPhase::Open);
        assert_eq!(lb.overlay(), Some(id));
    }

    #[test]
    fn test_stylesheet_follows_animation_duration() {
        let mut lb = Lightbox::new(Duration::from_millis(500));
        let mut doc = Document::new();
        let mut timers = TimerQueue::new();

        lb.open(&item("a"), &mut doc, &mut timers).unwrap();
        let css = &doc.stylesheets[0].css;
        assert_eq!(doc.stylesheets[0].id, LIGHTBOX_STYLESHEET_ID);
        assert!(css.contains("animation: fadeIn 0.5s ease;"));
        assert!(!css.contains("{animation}"));

        drain(&mut lb, &mut doc, &mut timers, Duration::from_millis(499));
        assert_eq!(lb.phase(), LightboxPhase::Opening);
        drain(&mut lb, &mut doc, &mut timers, Duration::from_millis(500));
        assert_eq!(lb.phase(), LightboxPhase::Open);
    }

    #[test]
    fn test_dismiss_releases_listener_immediately() {
        let mut lb = Lightbox::new(Duration::from_millis(300));
        let mut doc = Document::new();
        let mut timers = TimerQueue::new();

        let id = lb.open(&item("a"), &mut doc, &mut timers).unwrap();
        assert!(lb.dismiss(DismissReason::CloseButton, &mut doc, &mut timers));
        assert_eq!(doc.key_listener_count(), 0);
        assert_eq!(doc.overlays[0].animation, Some(OverlayAnimation::FadeOut));
        assert!(!lb.dismiss(DismissReason::Escape, &mut doc, &mut timers));

        drain(&mut lb, &mut doc, &mut timers, Duration::from_millis(299));
        assert_eq!(doc.overlay_count(), 1);
        drain(&mut lb, &mut doc, &mut timers, Duration::from_millis(300));
        assert_eq!(doc.overlay_count(), 0);
        assert_eq!(lb.phase(), LightboxPhase::Closed);

        lb.on_removal(id, &mut doc);
        assert_eq!(lb.phase(), LightboxPhase::Closed);
    }

    #[test]
    fn test_open_while_closing_replaces_overlay() {
        let mut lb = Lightbox::new(Duration::from_millis(300));
        let mut doc = Document::new();
        let mut timers = TimerQueue::new();

        let first = lb.open(&item("a"), &mut doc, &mut timers).unwrap();
        lb.dismiss(DismissReason::Backdrop, &mut doc, &mut timers);
        let second = lb.open(&item("b"), &mut doc, &mut timers).unwrap();

        assert_ne!(first, second);
        assert_eq!(doc.overlay_count(), 1);
        assert_eq!(doc.overlays[0].node.id, second);
        assert_eq!(doc.key_listener_count(), 1);
        assert_eq!(doc.stylesheets.len(), 1);

        drain(&mut lb, &mut doc, &mut timers, Duration::from_secs(1));
        assert_eq!(lb.phase(), LightboxPhase::Open);
        assert_eq!(doc.overlay_count(), 1);
    }
}
