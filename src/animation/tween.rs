use std::time::Duration;

use crate::{
    animation::ease::Ease,
    foundation::core::{Point, Vec2},
    foundation::error::{VitrineError, VitrineResult},
};

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        a + (b - a) * t
    }
}

impl Lerp for f32 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        (*a as f64 + ((*b as f64 - *a as f64) * t)) as f32
    }
}

impl Lerp for Vec2 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Vec2::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

impl Lerp for Point {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Point::new(a.x + (b.x - a.x) * t, a.y + (b.y - a.y) * t)
    }
}

/// Result of advancing a tween by one tick.
#[derive(Clone, Copy, Debug)]
pub struct TweenUpdate<T> {
    pub value: T,
    /// True exactly once, on the tick that crossed the end of the tween.
    pub just_finished: bool,
}

/// A single time-parameterized interpolation from `from` to `to`.
///
/// Completion is reported through [`TweenUpdate::just_finished`]; after that
/// the tween keeps returning its end value.
#[derive(Clone, Debug)]
pub struct Tween<T> {
    from: T,
    to: T,
    duration: Duration,
    ease: Ease,
    elapsed: Duration,
}

impl<T> Tween<T>
where
    T: Lerp + Clone,
{
    pub fn new(from: T, to: T, duration: Duration, ease: Ease) -> VitrineResult<Self> {
        if duration.is_zero() {
            return Err(VitrineError::animation("tween duration must be > 0"));
        }
        Ok(Self {
            from,
            to,
            duration,
            ease,
            elapsed: Duration::ZERO,
        })
    }

    pub fn finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Wall time left until completion.
    pub fn remaining(&self) -> Duration {
        self.duration.saturating_sub(self.elapsed)
    }

    pub fn value(&self) -> T {
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        T::lerp(&self.from, &self.to, self.ease.apply(t))
    }

    pub fn step(&mut self, dt: Duration) -> TweenUpdate<T> {
        let was_finished = self.finished();
        self.elapsed = (self.elapsed + dt).min(self.duration);
        TweenUpdate {
            value: self.value(),
            just_finished: !was_finished && self.finished(),
        }
    }
}
