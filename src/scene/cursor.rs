use std::time::Duration;

use crate::{
    animation::ease::Ease,
    animation::tween::Tween,
    foundation::core::{Point, Vec2},
    scene::model::CursorTiming,
};

/// Trailing cursor marker.
///
/// Every pointer or scroll event retargets a short ease-out tween from the
/// marker's current position toward the latest pointer sample plus the
/// current scroll offset. Scroll events reuse the last pointer sample rather
/// than taking a new one, so scroll-only movement still drags the marker.
/// No caps, no dead zone, no throttling beyond the easing duration.
pub struct CursorFollower {
    timing: CursorTiming,
    last_pointer: Point,
    scroll: Vec2,
    marker: Point,
    tween: Option<Tween<Point>>,
}

impl CursorFollower {
    pub fn new(timing: CursorTiming) -> Self {
        Self {
            timing,
            last_pointer: Point::ZERO,
            scroll: Vec2::ZERO,
            marker: Point::ZERO,
            tween: None,
        }
    }

    pub fn marker_position(&self) -> Point {
        self.marker
    }

    pub fn marker_radius(&self) -> f64 {
        self.timing.marker_diameter_px / 2.0
    }

    pub fn scroll_offset(&self) -> Vec2 {
        self.scroll
    }

    pub fn pointer_moved(&mut self, pointer: Point) {
        self.last_pointer = pointer;
        self.retarget();
    }

    /// Absolute scroll offset changed; the marker chases the last pointer
    /// sample at its new page position.
    pub fn scrolled(&mut self, offset: Vec2) {
        self.scroll = offset;
        self.retarget();
    }

    pub fn tick(&mut self, dt: Duration) {
        let Some(tween) = &mut self.tween else {
            return;
        };
        let upd = tween.step(dt);
        self.marker = upd.value;
        if upd.just_finished {
            self.tween = None;
        }
    }

    fn retarget(&mut self) {
        let target = self.last_pointer + self.scroll;
        // Duration validated by CursorTiming; a failed construction would
        // mean an unvalidated scene, so fall back to snapping.
        match Tween::new(
            self.marker,
            target,
            Duration::from_secs_f64(self.timing.ease_secs),
            Ease::OutCubic,
        ) {
            Ok(tween) => self.tween = Some(tween),
            Err(_) => self.marker = target,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(s: f64) -> Duration {
        Duration::from_secs_f64(s)
    }

    fn follower() -> CursorFollower {
        CursorFollower::new(CursorTiming::default())
    }

    #[test]
    fn marker_eases_toward_pointer() {
        let mut f = follower();
        f.pointer_moved(Point::new(100.0, 0.0));

        f.tick(secs(0.05));
        let mid = f.marker_position().x;
        assert!(mid > 0.0 && mid < 100.0);

        f.tick(secs(1.0));
        assert_eq!(f.marker_position(), Point::new(100.0, 0.0));
    }

    #[test]
    fn scroll_only_movement_drags_marker() {
        let mut f = follower();
        f.pointer_moved(Point::new(10.0, 10.0));
        f.tick(secs(1.0));

        f.scrolled(Vec2::new(0.0, 50.0));
        f.tick(secs(1.0));
        assert_eq!(f.marker_position(), Point::new(10.0, 60.0));
    }

    #[test]
    fn retarget_starts_from_current_marker() {
        let mut f = follower();
        f.pointer_moved(Point::new(100.0, 0.0));
        f.tick(secs(0.05));
        let before = f.marker_position();

        // New target mid-flight; the marker must not snap back.
        f.pointer_moved(Point::new(0.0, 100.0));
        f.tick(secs(0.0001));
        let after = f.marker_position();
        assert!((after.x - before.x).abs() < 5.0);
    }

    #[test]
    fn idle_follower_stays_put() {
        let mut f = follower();
        f.tick(secs(1.0));
        assert_eq!(f.marker_position(), Point::ZERO);
    }
}
