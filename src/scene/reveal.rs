use std::time::Duration;

use crate::{
    animation::ease::Ease,
    animation::tween::{Lerp, Tween},
    foundation::core::{Point, Theme, Viewport},
    foundation::error::VitrineResult,
    scene::model::RevealTiming,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealState {
    Hidden,
    Revealed,
}

/// Growth-disc pose: scale relative to the base diameter, plus opacity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DiscPose {
    pub scale: f64,
    pub opacity: f64,
}

impl DiscPose {
    const HIDDEN: Self = Self {
        scale: 0.0,
        opacity: 0.0,
    };
}

impl Lerp for DiscPose {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            scale: f64::lerp(&a.scale, &b.scale, t),
            opacity: f64::lerp(&a.opacity, &b.opacity, t),
        }
    }
}

/// Side effect the app must apply after a toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToggleEffect {
    /// Mount all sprite passes and start audio.
    Mount,
    /// Unmount all sprite passes and stop audio.
    Unmount,
}

struct Transition {
    stages: Vec<Tween<DiscPose>>,
    stage: usize,
    end_theme: Theme,
    hide_disc: bool,
}

/// Two-state reveal machine driving the radial grow/shrink transition, the
/// theme swap, and the mount/unmount + audio effects.
///
/// The boolean flips on every click with no in-transition guard; a click
/// while a transition is in flight kills the prior tween before starting the
/// new one (last-click-wins, no queuing). The theme changes only in
/// completion handlers, so a mid-transition click can leave it briefly
/// lagging the boolean. That divergence is intended behavior.
pub struct RevealController {
    timing: RevealTiming,
    state: RevealState,
    theme: Theme,
    disc_center: Point,
    disc_visible: bool,
    pose: DiscPose,
    transition: Option<Transition>,
}

impl RevealController {
    pub fn new(timing: RevealTiming) -> Self {
        Self {
            timing,
            state: RevealState::Hidden,
            theme: Theme::Light,
            disc_center: Point::ZERO,
            disc_visible: false,
            pose: DiscPose::HIDDEN,
            transition: None,
        }
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    pub fn is_revealed(&self) -> bool {
        self.state == RevealState::Revealed
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn disc_center(&self) -> Point {
        self.disc_center
    }

    pub fn disc_visible(&self) -> bool {
        self.disc_visible
    }

    pub fn disc_radius(&self) -> f64 {
        self.timing.disc_diameter_px / 2.0 * self.pose.scale
    }

    pub fn disc_opacity(&self) -> f64 {
        self.pose.opacity
    }

    /// Number of in-flight transitions; never exceeds one.
    pub fn active_transitions(&self) -> usize {
        self.transition.iter().count()
    }

    /// Flip the reveal boolean for a click at `click` (viewport coordinates).
    ///
    /// Returns the mount/unmount effect for the app to apply immediately;
    /// the theme swap happens later, at transition completion.
    pub fn toggle(&mut self, click: Point, viewport: Viewport) -> VitrineResult<ToggleEffect> {
        // Kill any in-flight tween before starting the new one.
        self.transition = None;

        match self.state {
            RevealState::Hidden => {
                self.state = RevealState::Revealed;
                self.disc_center = click;
                self.disc_visible = true;
                self.pose = DiscPose::HIDDEN;

                let base_radius = self.timing.disc_diameter_px / 2.0;
                let cover_scale = viewport.farthest_corner_distance(click) / base_radius;
                let unit = DiscPose {
                    scale: 1.0,
                    opacity: 1.0,
                };
                let cover = DiscPose {
                    scale: cover_scale,
                    opacity: 1.0,
                };
                self.transition = Some(Transition {
                    stages: vec![
                        Tween::new(
                            self.pose,
                            unit,
                            Duration::from_secs_f64(self.timing.pop_secs),
                            Ease::OutBack,
                        )?,
                        Tween::new(
                            unit,
                            cover,
                            Duration::from_secs_f64(self.timing.expand_secs),
                            Ease::InOutQuart,
                        )?,
                    ],
                    stage: 0,
                    end_theme: Theme::Dark,
                    hide_disc: false,
                });
                Ok(ToggleEffect::Mount)
            }
            RevealState::Revealed => {
                self.state = RevealState::Hidden;
                self.transition = Some(Transition {
                    stages: vec![Tween::new(
                        self.pose,
                        DiscPose::HIDDEN,
                        Duration::from_secs_f64(self.timing.collapse_secs),
                        Ease::InBack,
                    )?],
                    stage: 0,
                    end_theme: Theme::Light,
                    hide_disc: true,
                });
                Ok(ToggleEffect::Unmount)
            }
        }
    }

    /// Advance the in-flight transition, carrying leftover time across stage
    /// boundaries so a large tick lands where a sequence of small ones would.
    pub fn tick(&mut self, dt: Duration) {
        let mut dt = dt;
        loop {
            let Some(tr) = &mut self.transition else {
                return;
            };
            let tween = &mut tr.stages[tr.stage];
            let leftover = dt.saturating_sub(tween.remaining());
            let upd = tween.step(dt);
            self.pose = upd.value;
            if !upd.just_finished {
                return;
            }
            if tr.stage + 1 < tr.stages.len() {
                tr.stage += 1;
                if leftover.is_zero() {
                    return;
                }
                dt = leftover;
                continue;
            }
            break;
        }

        if let Some(tr) = self.transition.take() {
            self.theme = tr.end_theme;
            if tr.hide_disc {
                self.disc_visible = false;
                self.pose = DiscPose::HIDDEN;
            }
        }
    }
}
