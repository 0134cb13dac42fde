use crate::calc::{advance_index, next_index, previous_index};
use crate::data::{EventCatalog, EventId};
use std::collections::BTreeMap;

/// Focused card and per-event cover rotation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Carousel {
    card_count: usize,
    current_card: usize,
    cover_index: BTreeMap<EventId, usize>,
}

impl Carousel {
    pub fn new(catalog: &EventCatalog) -> Self {
        Carousel {
            card_count: catalog.len(),
            current_card: 0,
            cover_index: catalog.events.iter().map(|e| (e.id, 0)).collect(),
        }
    }

    pub fn current_card(&self) -> usize {
        self.current_card
    }


    /// Returns false and leaves the focus alone when `index` is out of range.
    pub fn select_card(&mut self, index: usize) -> bool {
        if index >= self.card_count {
            return false;
        }
        self.current_card = index;
        true
    }

    pub fn next(&mut self) {
        self.current_card = next_index(self.current_card, self.card_count);
    }

    pub fn previous(&mut self) {
        self.current_card = previous_index(self.current_card, self.card_count);
    }

    pub fn cover_index(&self, id: EventId) -> usize {
        self.cover_index.get(&id).copied().unwrap_or(0)
    }

    /// Advances every card's cover by `steps`, each wrapping on its own length.
    pub fn rotate_covers(&mut self, catalog: &EventCatalog, steps: u32) {
        for event in &catalog.events {
            let entry = self.cover_index.entry(event.id).or_insert(0);
            *entry = advance_index(*entry, steps, event.cover_images.len());
        }
    }
}
