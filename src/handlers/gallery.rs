use serde::Deserialize;

use crate::models::{FilterTag, OverlayTarget};
use crate::state::Gallery;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GalleryEvent {
    Filter { tag: FilterTag },
    OpenItem { index: usize },
    CloseLightbox,
    OverlayClick { target: OverlayTarget },
    KeyDown { key: String },
}

pub fn handle(gallery: &mut Gallery, event: GalleryEvent) -> String {
    match event {
        GalleryEvent::Filter { tag } => {
            let matching = gallery.filter(tag.clone());
            format!("filter {tag}: {matching} of {} items", gallery.items().len())
        }
        GalleryEvent::OpenItem { index } => match gallery.open_item(index) {
            Some(overlay) => format!("{overlay} opened"),
            None => "lightbox unchanged".to_string(),
        },
        GalleryEvent::CloseLightbox => dismissed(gallery.click_close()),
        GalleryEvent::OverlayClick { target } => dismissed(gallery.click_overlay(target)),
        GalleryEvent::KeyDown { key } => dismissed(gallery.key_pressed(&key)),
    }
}

fn dismissed(closing: bool) -> String {
    if closing {
        "lightbox closing".to_string()
    } else {
        "lightbox unchanged".to_string()
    }
}
