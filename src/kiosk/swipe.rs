#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Swipe {
    /// Finger moved left: show the next card.
    Next,
    /// Finger moved right: show the previous card.
    Previous,
}

/// Tracks one horizontal gesture from press to release, in px.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    threshold: f32,
    start: Option<f32>,
    end: Option<f32>,
}

impl SwipeTracker {
    pub fn new(threshold: f32) -> Self {
        SwipeTracker {
            threshold,
            start: None,
            end: None,
        }
    }

    pub fn touch_start(&mut self, x: f32) {
        self.start = Some(x);
        self.end = None;
    }

    pub fn touch_move(&mut self, x: f32) {
        self.end = Some(x);
    }

    /// Ends the gesture. Only a travel strictly beyond the threshold counts.
    pub fn touch_end(&mut self) -> Option<Swipe> {
        let (start, end) = (self.start.take(), self.end.take());
        let (start, end) = (start?, end?);
        let distance = start - end;
        if distance > self.threshold {
            Some(Swipe::Next)
        } else if distance < -self.threshold {
            Some(Swipe::Previous)
        } else {
            None
        }
    }

    pub fn cancel(&mut self) {
        self.start = None;
        self.end = None;
    }
}
