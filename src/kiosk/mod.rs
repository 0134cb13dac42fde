//! The kiosk's view state machine.
//!
//! The kiosk is either browsing cards or showing one event's gallery. Each
//! side owns the timers it needs, so leaving a view drops its timers with it:
//! cover rotation only exists in [`ViewState::Carousel`], auto-play and the
//! inactivity watchdog only in [`ViewState::Gallery`].

pub mod carousel;
pub mod gallery;
pub mod swipe;
pub mod timer;
pub mod watchdog;

pub use carousel::Carousel;
pub use gallery::Gallery;
pub use swipe::{Swipe, SwipeTracker};
pub use timer::Interval;
pub use watchdog::Watchdog;

use crate::data::{Event, EventCatalog, Timings};
use anyhow::Result;
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub enum ViewState {
    Carousel {
        carousel: Carousel,
        rotation: Interval,
    },
    Gallery {
        gallery: Gallery,
        autoplay: Interval,
        watchdog: Watchdog,
        /// Carousel position to restore when the gallery closes.
        parked: Carousel,
    },
}

/// What a call to [`Kiosk::tick`] changed.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    pub covers_rotated: u32,
    pub images_advanced: u32,
    pub timed_out: bool,
}

impl TickOutcome {
    pub fn changed(&self) -> bool {
        self.covers_rotated > 0 || self.images_advanced > 0 || self.timed_out
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ActiveTimers {
    pub card_rotation: bool,
    pub gallery_autoplay: bool,
    pub inactivity: bool,
}

pub struct Kiosk {
    catalog: EventCatalog,
    timings: Timings,
    view: ViewState,
}

impl Kiosk {
    pub fn new(catalog: EventCatalog, timings: Timings, now: Instant) -> Result<Self> {
        catalog.validate()?;
        let view = ViewState::Carousel {
            carousel: Carousel::new(&catalog),
            rotation: Interval::start(timings.card_rotation(), now),
        };
        Ok(Kiosk {
            catalog,
            timings,
            view,
        })
    }

    pub fn catalog(&self) -> &EventCatalog {
        &self.catalog
    }

    pub fn is_gallery_open(&self) -> bool {
        matches!(self.view, ViewState::Gallery { .. })
    }

    /// Carousel position, whether it is on screen or parked behind the gallery.
    pub fn carousel(&self) -> &Carousel {
        match &self.view {
            ViewState::Carousel { carousel, .. } => carousel,
            ViewState::Gallery { parked, .. } => parked,
        }
    }

    pub fn current_card(&self) -> usize {
        self.carousel().current_card()
    }

    pub fn gallery(&self) -> Option<&Gallery> {
        match &self.view {
            ViewState::Gallery { gallery, .. } => Some(gallery),
            ViewState::Carousel { .. } => None,
        }
    }

    pub fn selected_event(&self) -> Option<&Event> {
        self.gallery()
            .and_then(|g| self.catalog.get(g.event_index()))
    }

    pub fn current_image(&self) -> Option<usize> {
        self.gallery().map(|g| g.current_image())
    }

    fn carousel_mut(&mut self) -> Option<&mut Carousel> {
        match &mut self.view {
            ViewState::Carousel { carousel, .. } => Some(carousel),
            ViewState::Gallery { .. } => None,
        }
    }

    // ── Carousel operations ──────────────────────────────────────────────────

    pub fn select_card(&mut self, index: usize) -> bool {
        self.carousel_mut().is_some_and(|c| c.select_card(index))
    }

    pub fn next_card(&mut self) {
        if let Some(c) = self.carousel_mut() {
            c.next();
        }
    }

    pub fn previous_card(&mut self) {
        if let Some(c) = self.carousel_mut() {
            c.previous();
        }
    }

    /// Wheel scrolling over the carousel: down is next, up is previous.
    pub fn wheel(&mut self, delta_y: f32) {
        if delta_y > 0.0 {
            self.next_card();
        } else if delta_y < 0.0 {
            self.previous_card();
        }
    }

    pub fn swipe(&mut self, swipe: Swipe) {
        match swipe {
            Swipe::Next => self.next_card(),
            Swipe::Previous => self.previous_card(),
        }
    }

    /// Opens the gallery of the event at catalog position `index`. Only
    /// possible from the carousel.
    pub fn open_event(&mut self, index: usize, now: Instant) -> bool {
        let Some(event) = self.catalog.get(index) else {
            return false;
        };
        let image_count = event.gallery_images.len();
        let ViewState::Carousel { carousel, .. } = &mut self.view else {
            return false;
        };
        let parked = std::mem::take(carousel);
        let mut watchdog = Watchdog::new(self.timings.inactivity_timeout());
        watchdog.arm(now);
        info!(event_id = event.id, title = %event.title, "gallery opened");
        self.view = ViewState::Gallery {
            gallery: Gallery::open(index, image_count),
            autoplay: Interval::start(self.timings.gallery_autoplay(), now),
            watchdog,
            parked,
        };
        true
    }

    pub fn open_focused(&mut self, now: Instant) -> bool {
        self.open_event(self.current_card(), now)
    }

    // ── Gallery operations ───────────────────────────────────────────────────

    /// Back to the carousel. Returns false when no gallery was open.
    pub fn close(&mut self, now: Instant) -> bool {
        let ViewState::Gallery {
            parked, watchdog, ..
        } = &mut self.view
        else {
            return false;
        };
        watchdog.disarm();
        let carousel = std::mem::take(parked);
        self.view = ViewState::Carousel {
            carousel,
            rotation: Interval::start(self.timings.card_rotation(), now),
        };
        info!("gallery closed");
        true
    }

    fn with_gallery(&mut self, now: Instant, f: impl FnOnce(&mut Gallery) -> bool) -> bool {
        match &mut self.view {
            ViewState::Gallery {
                gallery, watchdog, ..
            } => {
                let applied = f(gallery);
                watchdog.touch(now);
                applied
            }
            ViewState::Carousel { .. } => false,
        }
    }

    pub fn next_image(&mut self, now: Instant) {
        self.with_gallery(now, |g| {
            g.next_image();
            true
        });
    }

    pub fn previous_image(&mut self, now: Instant) {
        self.with_gallery(now, |g| {
            g.previous_image();
            true
        });
    }

    pub fn jump_to_image(&mut self, index: usize, now: Instant) -> bool {
        self.with_gallery(now, |g| g.jump_to_image(index))
    }

    /// Pointer press, touch start or key press.
    pub fn interaction(&mut self, now: Instant) {
        if let ViewState::Gallery { watchdog, .. } = &mut self.view {
            watchdog.touch(now);
        }
    }

    // ── Timers ───────────────────────────────────────────────────────────────

    /// Fires every timer that is due at `now`.
    pub fn tick(&mut self, now: Instant) -> TickOutcome {
        let mut outcome = TickOutcome::default();
        match &mut self.view {
            ViewState::Carousel { carousel, rotation } => {
                let fired = rotation.poll(now);
                if fired > 0 {
                    carousel.rotate_covers(&self.catalog, fired);
                    debug!(fired, "card covers rotated");
                    outcome.covers_rotated = fired;
                }
            }
            ViewState::Gallery {
                gallery,
                autoplay,
                watchdog,
                ..
            } => {
                if watchdog.poll(now) {
                    outcome.timed_out = true;
                } else {
                    let fired = autoplay.poll(now);
                    if fired > 0 {
                        gallery.advance(fired);
                        debug!(fired, image = gallery.current_image(), "gallery auto-advanced");
                        outcome.images_advanced = fired;
                    }
                }
            }
        }
        if outcome.timed_out {
            info!("no interaction in gallery, returning to carousel");
            self.close(now);
        }
        outcome
    }

    /// Earliest instant at which [`Kiosk::tick`] has something to do.
    pub fn next_deadline(&self) -> Instant {
        match &self.view {
            ViewState::Carousel { rotation, .. } => rotation.deadline(),
            ViewState::Gallery {
                autoplay, watchdog, ..
            } => watchdog
                .deadline()
                .map_or(autoplay.deadline(), |d| d.min(autoplay.deadline())),
        }
    }

    pub fn active_timers(&self) -> ActiveTimers {
        match &self.view {
            ViewState::Carousel { .. } => ActiveTimers {
                card_rotation: true,
                ..ActiveTimers::default()
            },
            ViewState::Gallery { watchdog, .. } => ActiveTimers {
                card_rotation: false,
                gallery_autoplay: true,
                inactivity: watchdog.is_armed(),
            },
        }
    }

    pub fn inactivity_remaining(&self, now: Instant) -> Option<Duration> {
        match &self.view {
            ViewState::Gallery { watchdog, .. } => watchdog.remaining(now),
            ViewState::Carousel { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: u64) -> Duration {
        Duration::from_secs(s)
    }

    fn kiosk(t0: Instant) -> Kiosk {
        Kiosk::new(EventCatalog::builtin(), Timings::default(), t0).unwrap()
    }

    fn assert_exclusive(k: &Kiosk) {
        let t = k.active_timers();
        assert!(t.card_rotation != (t.gallery_autoplay || t.inactivity));
    }

    #[test]
    fn test_new_rejects_invalid_catalog() {
        assert!(Kiosk::new(EventCatalog::default(), Timings::default(), Instant::now()).is_err());
    }

    #[test]
    fn test_starts_in_carousel_with_rotation_only() {
        let k = kiosk(Instant::now());
        assert!(!k.is_gallery_open());
        assert!(k.selected_event().is_none());
        assert_eq!(
            k.active_timers(),
            ActiveTimers {
                card_rotation: true,
                gallery_autoplay: false,
                inactivity: false
            }
        );
    }

    #[test]
    fn test_card_navigation_scenario() {
        let mut k = kiosk(Instant::now());
        k.next_card();
        k.next_card();
        assert_eq!(k.current_card(), 2);
        k.next_card();
        assert_eq!(k.current_card(), 0);
    }

    #[test]
    fn test_wheel_sign_drives_navigation() {
        let mut k = kiosk(Instant::now());
        k.wheel(120.0);
        assert_eq!(k.current_card(), 1);
        k.wheel(-3.0);
        k.wheel(-3.0);
        assert_eq!(k.current_card(), 2);
        k.wheel(0.0);
        assert_eq!(k.current_card(), 2);
    }

    #[test]
    fn test_swipe_drives_navigation() {
        let mut k = kiosk(Instant::now());
        k.swipe(Swipe::Previous);
        assert_eq!(k.current_card(), 2);
        k.swipe(Swipe::Next);
        assert_eq!(k.current_card(), 0);
    }

    #[test]
    fn test_previous_image_from_zero_wraps_for_event_two() {
        let t0 = Instant::now();
        let mut k = kiosk(t0);
        let index = k.catalog().events.iter().position(|e| e.id == 2).unwrap();
        assert!(k.open_event(index, t0));
        assert_eq!(k.selected_event().map(|e| e.id), Some(2));
        assert_eq!(k.current_image(), Some(0));
        k.previous_image(t0);
        assert_eq!(k.current_image(), Some(5));
    }

    #[test]
    fn test_open_always_resets_image_index() {
        let t0 = Instant::now();
        let mut k = kiosk(t0);
        k.open_event(0, t0);
        k.jump_to_image(4, t0);
        assert!(k.close(t0));
        k.open_event(0, t0);
        assert_eq!(k.current_image(), Some(0));
    }

    #[test]
    fn test_card_operations_ignored_in_gallery() {
        let t0 = Instant::now();
        let mut k = kiosk(t0);
        k.select_card(1);
        k.open_focused(t0);
        k.next_card();
        k.wheel(10.0);
        k.swipe(Swipe::Next);
        assert!(!k.select_card(0));
        assert!(!k.open_event(2, t0));
        assert_eq!(k.current_card(), 1);
        assert_eq!(k.selected_event().map(|e| e.id), Some(2));
    }

    #[test]
    fn test_close_restores_carousel_position() {
        let t0 = Instant::now();
        let mut k = kiosk(t0);
        k.next_card();
        k.tick(t0 + secs(7));
        let covers = k.carousel().cover_index(1);
        k.open_focused(t0 + secs(8));
        assert!(k.close(t0 + secs(9)));
        assert_eq!(k.current_card(), 1);
        assert_eq!(k.carousel().cover_index(1), covers);
        assert!(!k.close(t0 + secs(9)));
    }

    #[test]
    fn test_gallery_operations_ignored_in_carousel() {
        let t0 = Instant::now();
        let mut k = kiosk(t0);
        k.next_image(t0);
        assert!(!k.jump_to_image(1, t0));
        assert_eq!(k.current_image(), None);
    }

    #[test]
    fn test_cover_rotation_every_seven_seconds() {
        let t0 = Instant::now();
        let mut k = kiosk(t0);
        assert!(!k.tick(t0 + secs(6)).changed());
        let outcome = k.tick(t0 + secs(7));
        assert_eq!(outcome.covers_rotated, 1);
        for id in 1..=3 {
            assert_eq!(k.carousel().cover_index(id), 1);
        }
        k.tick(t0 + secs(21));
        for id in 1..=3 {
            assert_eq!(k.carousel().cover_index(id), 0);
        }
    }

    #[test]
    fn test_rotation_paused_while_gallery_open() {
        let t0 = Instant::now();
        let mut k = kiosk(t0);
        k.open_event(0, t0 + secs(1));
        k.interaction(t0 + secs(20));
        k.tick(t0 + secs(20));
        k.close(t0 + secs(20));
        assert_eq!(k.carousel().cover_index(1), 0);
        // restarted on close, so the first rotation is 7 s later
        assert_eq!(k.tick(t0 + secs(26)).covers_rotated, 0);
        assert_eq!(k.tick(t0 + secs(27)).covers_rotated, 1);
    }

    #[test]
    fn test_autoplay_every_five_seconds_and_wraps() {
        let t0 = Instant::now();
        let mut k = kiosk(t0);
        k.open_event(0, t0);
        for step in 1..=6u64 {
            k.interaction(t0 + secs(5 * step));
            let outcome = k.tick(t0 + secs(5 * step));
            assert_eq!(outcome.images_advanced, 1);
        }
        assert_eq!(k.current_image(), Some(0));
    }

    #[test]
    fn test_autoplay_does_not_feed_watchdog() {
        let t0 = Instant::now();
        let mut k = kiosk(t0);
        k.open_event(0, t0);
        for step in 1..=4u64 {
            k.tick(t0 + secs(5 * step));
        }
        assert_eq!(k.inactivity_remaining(t0 + secs(20)), Some(secs(5)));
    }

    #[test]
    fn test_watchdog_returns_to_carousel_after_25s() {
        let t0 = Instant::now();
        let mut k = kiosk(t0);
        k.open_event(1, t0);
        assert!(!k.tick(t0 + secs(24)).timed_out);
        let outcome = k.tick(t0 + secs(25));
        assert!(outcome.timed_out);
        assert!(!k.is_gallery_open());
        assert!(k.selected_event().is_none());
        assert_exclusive(&k);
    }

    #[test]
    fn test_interaction_at_20s_defers_timeout() {
        let t0 = Instant::now();
        let mut k = kiosk(t0);
        k.open_event(1, t0);
        k.tick(t0 + secs(20));
        k.interaction(t0 + secs(20));
        assert!(!k.tick(t0 + secs(25)).timed_out);
        assert!(k.is_gallery_open());
        assert!(!k.tick(t0 + secs(44)).timed_out);
        assert!(k.tick(t0 + secs(45)).timed_out);
    }

    #[test]
    fn test_navigation_restarts_watchdog() {
        let t0 = Instant::now();
        let mut k = kiosk(t0);
        k.open_event(0, t0);
        k.next_image(t0 + secs(10));
        assert_eq!(k.inactivity_remaining(t0 + secs(10)), Some(secs(25)));
        k.previous_image(t0 + secs(15));
        assert_eq!(k.inactivity_remaining(t0 + secs(15)), Some(secs(25)));
        assert!(k.jump_to_image(3, t0 + secs(18)));
        assert_eq!(k.inactivity_remaining(t0 + secs(18)), Some(secs(25)));
        assert_eq!(k.current_image(), Some(3));
    }

    #[test]
    fn test_timers_mutually_exclusive_through_transitions() {
        let t0 = Instant::now();
        let mut k = kiosk(t0);
        assert_exclusive(&k);
        k.open_focused(t0);
        assert_exclusive(&k);
        assert!(k.active_timers().inactivity);
        k.close(t0 + secs(3));
        assert_exclusive(&k);
        k.open_focused(t0 + secs(4));
        k.tick(t0 + secs(60));
        assert_exclusive(&k);
    }

    #[test]
    fn test_next_deadline_tracks_active_view() {
        let t0 = Instant::now();
        let mut k = kiosk(t0);
        assert_eq!(k.next_deadline(), t0 + secs(7));
        k.open_focused(t0 + secs(1));
        assert_eq!(k.next_deadline(), t0 + secs(6));
    }

    #[test]
    fn test_custom_timings_are_honoured() {
        let t0 = Instant::now();
        let timings = Timings {
            card_rotation_ms: 1_000,
            gallery_autoplay_ms: 2_000,
            inactivity_timeout_ms: 3_000,
        };
        let mut k = Kiosk::new(EventCatalog::builtin(), timings, t0).unwrap();
        assert_eq!(k.tick(t0 + secs(1)).covers_rotated, 1);
        k.open_focused(t0 + secs(1));
        assert_eq!(k.tick(t0 + secs(3)).images_advanced, 1);
        assert!(k.tick(t0 + secs(4)).timed_out);
    }
}
