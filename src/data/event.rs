use crate::data::persistence::Persistable;
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

pub type EventId = u32;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Event {
    pub id: EventId,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    pub cover_images: Vec<String>,
    pub gallery_images: Vec<String>,
}

impl Event {
    pub fn new(id: EventId, title: &str, date: &str, covers: &[&str], gallery: &[&str]) -> Self {
        Event {
            id,
            title: title.to_string(),
            date: (!date.is_empty()).then(|| date.to_string()),
            cover_images: covers.iter().map(|s| s.to_string()).collect(),
            gallery_images: gallery.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// The date line, if there is anything to show.
    pub fn display_date(&self) -> Option<&str> {
        self.date.as_deref().filter(|d| !d.trim().is_empty())
    }

    /// Cover reference at `index`, wrapping around.
    pub fn cover(&self, index: usize) -> &str {
        &self.cover_images[index % self.cover_images.len()]
    }

    /// Gallery reference at `index`, wrapping around.
    pub fn gallery_image(&self, index: usize) -> &str {
        &self.gallery_images[index % self.gallery_images.len()]
    }
}

/// The fixed set of events shown by the kiosk. Only build one through
/// [`EventCatalog::new`] or [`EventCatalog::validate`]: the controllers rely on
/// every event having at least one cover and one gallery image.
#[derive(Serialize, Deserialize, Default, Debug, Clone)]
pub struct EventCatalog {
    pub events: Vec<Event>,
}

impl Persistable for EventCatalog {
    fn filename() -> &'static str {
        "events.yaml"
    }
}

impl EventCatalog {
    pub fn new(events: Vec<Event>) -> Result<Self> {
        let catalog = EventCatalog { events };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            bail!("event catalog is empty");
        }
        let mut seen = HashSet::new();
        for event in &self.events {
            if !seen.insert(event.id) {
                bail!("duplicate event id {}", event.id);
            }
            if event.cover_images.is_empty() {
                bail!("event {} ({}) has no cover images", event.id, event.title);
            }
            if event.gallery_images.is_empty() {
                bail!("event {} ({}) has no gallery images", event.id, event.title);
            }
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Event> {
        self.events.get(index)
    }

    /// The catalog written by `init`.
    pub fn builtin() -> Self {
        EventCatalog {
            events: vec![
                Event::new(
                    1,
                    "11 Corps Heritage",
                    "Overview",
                    &["/11_Corps_(Pakistan)_logo.png", "/logo.png", "/imagesonfrontpage.jfif"],
                    &[
                        "/11_Corps_(Pakistan)_logo.png",
                        "/logo.png",
                        "/imagesonfrontpage.jfif",
                        "/image.jfif",
                        "/image2.jpg",
                        "/bg.avif",
                    ],
                ),
                Event::new(
                    2,
                    "Operational Landscape",
                    "Areas of Responsibility",
                    &["/bg.avif", "/image.jfif", "/image2.jpg"],
                    &[
                        "/bg.avif",
                        "/image.jfif",
                        "/image2.jpg",
                        "/imagesonfrontpage.jfif",
                        "/11_Corps_(Pakistan)_logo.png",
                        "/logo.png",
                    ],
                ),
                Event::new(
                    3,
                    "Pictorial Highlights",
                    "11 Corps",
                    &["/imagesonfrontpage.jfif", "/image.jfif", "/bg.avif"],
                    &[
                        "/imagesonfrontpage.jfif",
                        "/image.jfif",
                        "/image2.jpg",
                        "/bg.avif",
                        "/11_Corps_(Pakistan)_logo.png",
                        "/logo.png",
                    ],
                ),
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(id: EventId, covers: &[&str], gallery: &[&str]) -> Event {
        Event::new(id, &format!("Event {id}"), "", covers, gallery)
    }

    #[test]
    fn test_builtin_catalog_is_valid() {
        let catalog = EventCatalog::builtin();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.len(), 3);
        for event in &catalog.events {
            assert_eq!(event.cover_images.len(), 3);
            assert_eq!(event.gallery_images.len(), 6);
        }
    }

    #[test]
    fn test_empty_catalog_rejected() {
        let err = EventCatalog::new(vec![]).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let err = EventCatalog::new(vec![ev(1, &["a"], &["b"]), ev(1, &["c"], &["d"])]).unwrap_err();
        assert!(err.to_string().contains("duplicate event id 1"));
    }

    #[test]
    fn test_event_without_covers_rejected() {
        let err = EventCatalog::new(vec![ev(4, &[], &["b"])]).unwrap_err();
        assert!(err.to_string().contains("no cover images"));
    }

    #[test]
    fn test_event_without_gallery_rejected() {
        let err = EventCatalog::new(vec![ev(4, &["a"], &[])]).unwrap_err();
        assert!(err.to_string().contains("no gallery images"));
    }

    #[test]
    fn test_empty_date_is_not_displayed() {
        let event = ev(1, &["a"], &["b"]);
        assert_eq!(event.date, None);
        assert_eq!(event.display_date(), None);

        let mut blank = event.clone();
        blank.date = Some("   ".to_string());
        assert_eq!(blank.display_date(), None);
    }

    #[test]
    fn test_image_lookup_wraps() {
        let event = ev(1, &["c0", "c1"], &["g0", "g1", "g2"]);
        assert_eq!(event.cover(3), "c1");
        assert_eq!(event.gallery_image(3), "g0");
    }

    #[test]
    fn test_yaml_without_date_parses() {
        let yaml = "events:\n  - id: 7\n    title: Open Day\n    cover_images: [/a.png]\n    gallery_images: [/b.png]\n";
        let catalog: EventCatalog = serde_norway::from_str(yaml).unwrap();
        assert!(catalog.validate().is_ok());
        assert_eq!(catalog.events[0].date, None);
    }
}
