use std::time::Duration;

use rand::Rng;

use crate::{
    animation::driver::FrameDriver,
    assets::loader::{LoadCompletion, LoadRequest, LoadToken, SpriteId},
    assets::sequence::SequenceDescriptor,
    foundation::core::Placement,
    foundation::error::VitrineResult,
    render::surface::Surface,
};

/// One mounted image-sequence sprite.
///
/// Owns its frame driver and drawing surface; both live exactly as long as
/// the sprite, so unmounting cancels all of its scheduled work. The parallax
/// speed factor is drawn once at construction and fixed for the sprite's
/// lifetime.
pub struct Sprite {
    id: SpriteId,
    descriptor: SequenceDescriptor,
    driver: FrameDriver,
    surface: Surface,
    parallax_speed: f64,
    last_requested: Option<u32>,
    newest_token: LoadToken,
    painted: bool,
}

impl Sprite {
    pub fn new(
        id: SpriteId,
        descriptor: SequenceDescriptor,
        rng: &mut impl Rng,
    ) -> VitrineResult<Self> {
        let driver = FrameDriver::new(
            descriptor.start_index,
            descriptor.num_images,
            descriptor.duration_secs,
        )?;
        // Quantized to one decimal, matching the page's data-scroll-speed tag.
        let parallax_speed = (rng.gen_range(0.0..=1.0f64) * 10.0).round() / 10.0;
        Ok(Self {
            id,
            descriptor,
            driver,
            surface: Surface::new(0, 0),
            parallax_speed,
            last_requested: None,
            newest_token: LoadToken(0),
            painted: false,
        })
    }

    pub fn id(&self) -> SpriteId {
        self.id
    }

    pub fn placement(&self) -> Placement {
        self.descriptor.placement()
    }

    /// Fixed scroll-parallax speed factor in [0.0, 1.0].
    pub fn parallax_speed(&self) -> f64 {
        self.parallax_speed
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    /// Whether any frame has been painted onto the surface yet.
    pub fn painted(&self) -> bool {
        self.painted
    }

    pub fn newest_token(&self) -> LoadToken {
        self.newest_token
    }

    /// Advance the driver; if the published index changed since the last
    /// request, issue a new tokenized load request.
    pub fn tick(&mut self, dt: Duration) -> Option<LoadRequest> {
        let index = self.driver.step(dt);
        if self.last_requested == Some(index) {
            return None;
        }
        self.last_requested = Some(index);
        self.newest_token = LoadToken(self.newest_token.0 + 1);
        Some(LoadRequest {
            sprite: self.id,
            token: self.newest_token,
            index,
        })
    }

    /// Apply a load completion addressed to this sprite.
    ///
    /// Latest-request-wins: completions older than the newest issued token
    /// are discarded. A failed load keeps the prior surface contents.
    pub fn apply_completion(&mut self, completion: LoadCompletion) {
        debug_assert_eq!(completion.sprite, self.id);
        if completion.token < self.newest_token {
            tracing::debug!(
                sprite = self.id.0,
                token = completion.token.0,
                newest = self.newest_token.0,
                "discarding stale load completion"
            );
            return;
        }
        match completion.result {
            Ok(img) => {
                if self.surface.paint_image(&img).is_ok() {
                    self.painted = true;
                }
            }
            Err(err) => {
                tracing::warn!(
                    sprite = self.id.0,
                    index = completion.index,
                    %err,
                    "frame load failed, keeping prior contents"
                );
            }
        }
    }
}
