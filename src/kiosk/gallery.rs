use crate::calc::{advance_index, next_index, previous_index};

/// Image position inside the open event's gallery.
#[derive(Debug, Clone, PartialEq)]
pub struct Gallery {
    event_index: usize,
    image_count: usize,
    current_image: usize,
}

impl Gallery {
    /// Every gallery starts on its first image.
    pub fn open(event_index: usize, image_count: usize) -> Self {
        Gallery {
            event_index,
            image_count,
            current_image: 0,
        }
    }

    pub fn event_index(&self) -> usize {
        self.event_index
    }

    pub fn image_count(&self) -> usize {
        self.image_count
    }

    pub fn current_image(&self) -> usize {
        self.current_image
    }

    pub fn next_image(&mut self) {
        self.current_image = next_index(self.current_image, self.image_count);
    }

    pub fn previous_image(&mut self) {
        self.current_image = previous_index(self.current_image, self.image_count);
    }

    pub fn advance(&mut self, steps: u32) {
        self.current_image = advance_index(self.current_image, steps, self.image_count);
    }

    pub fn jump_to_image(&mut self, index: usize) -> bool {
        if index >= self.image_count {
            return false;
        }
        self.current_image = index;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_starts_at_zero() {
        let g = Gallery::open(1, 6);
        assert_eq!(g.current_image(), 0);
        assert_eq!(g.event_index(), 1);
    }

    #[test]
    fn test_previous_from_first_wraps_to_last() {
        let mut g = Gallery::open(1, 6);
        g.previous_image();
        assert_eq!(g.current_image(), 5);
    }

    #[test]
    fn test_next_cycle_and_inverse() {
        for start in 0..6 {
            let mut g = Gallery::open(0, 6);
            g.jump_to_image(start);
            for _ in 0..6 {
                g.next_image();
            }
            assert_eq!(g.current_image(), start);
            g.next_image();
            g.previous_image();
            assert_eq!(g.current_image(), start);
        }
    }

    #[test]
    fn test_jump_out_of_range_is_ignored() {
        let mut g = Gallery::open(0, 6);
        assert!(g.jump_to_image(4));
        assert!(!g.jump_to_image(6));
        assert_eq!(g.current_image(), 4);
    }

    #[test]
    fn test_advance_wraps() {
        let mut g = Gallery::open(0, 6);
        g.jump_to_image(5);
        g.advance(2);
        assert_eq!(g.current_image(), 1);
    }
}
