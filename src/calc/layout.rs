/// Card geometry for one viewport width, all in px.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardMetrics {
    pub viewport_width: f32,
    pub card_width: f32,
    pub gap: f32,
}

/// (min viewport width, max card width, card share of the viewport)
const BREAKPOINTS: [(f32, f32, f32); 3] = [
    (2560.0, 600.0, 0.45),
    (1920.0, 550.0, 0.42),
    (1024.0, 500.0, 0.40),
];
const NARROW: (f32, f32) = (450.0, 0.85);
const GAP_SHARE: f32 = 0.03;

impl CardMetrics {
    pub fn for_viewport(viewport_width: f32) -> Self {
        let width = viewport_width.max(0.0);
        let (max_card, share) = BREAKPOINTS
            .iter()
            .find(|(min_width, _, _)| width >= *min_width)
            .map(|&(_, max_card, share)| (max_card, share))
            .unwrap_or(NARROW);
        CardMetrics {
            viewport_width: width,
            card_width: max_card.min(width * share),
            gap: width * GAP_SHARE,
        }
    }

    /// Distance from one card's left edge to the next.
    pub fn stride(&self) -> f32 {
        self.card_width + self.gap
    }

    /// Translation that brings card `index` into view.
    pub fn track_offset(&self, index: usize) -> f32 {
        index as f32 * self.stride()
    }
}
