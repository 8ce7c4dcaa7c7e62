use std::{collections::HashMap, path::PathBuf, time::Duration};

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::{
    assets::loader::{FrameLoader, SpriteId},
    assets::sequence::ImageSequence,
    foundation::core::{Point, Theme, Vec2, Viewport},
    foundation::error::VitrineResult,
    render::compose::{DiscLayer, FrameRgba, MarkerLayer, compose_frame},
    render::sprite::Sprite,
    scene::audio::{AudioBackend, AudioHandle, NullAudio},
    scene::cursor::CursorFollower,
    scene::model::Scene,
    scene::reveal::{RevealController, ToggleEffect},
};

/// Input events, the app's entire external surface.
#[derive(Clone, Copy, Debug)]
pub enum Event {
    /// Pointer moved to viewport coordinates.
    PointerMoved { position: Point },
    /// Absolute scroll offset changed.
    Scrolled { offset: Vec2 },
    /// The designated heading element was clicked at viewport coordinates.
    HeadingClicked { position: Point },
}

/// Top-level application state.
///
/// Owns the reveal boolean, the single audio handle, the theme, the mounted
/// sprite passes, and the frame loader; nothing else mutates them. Drive it
/// with [`dispatch`](Self::dispatch) and [`tick`](Self::tick), read pixels
/// with [`render_frame`](Self::render_frame).
pub struct App {
    scene: Scene,
    reveal: RevealController,
    cursor: CursorFollower,
    sprites: Vec<Sprite>,
    loader: FrameLoader,
    audio: Option<AudioHandle>,
    rng: StdRng,
    next_sprite_id: u32,
}

impl App {
    /// Build an app from a validated scene, resolving image and audio
    /// sources against `root`.
    pub fn new(scene: Scene, root: impl Into<PathBuf>) -> VitrineResult<Self> {
        Self::with_audio_backend(scene, root, Box::new(NullAudio))
    }

    pub fn with_audio_backend(
        scene: Scene,
        root: impl Into<PathBuf>,
        backend: Box<dyn AudioBackend>,
    ) -> VitrineResult<Self> {
        scene.validate()?;
        let sequence = ImageSequence::new(scene.sequence.iter().cloned())?;
        let loader = FrameLoader::new(root, sequence);
        let audio = scene
            .audio
            .as_ref()
            .map(|a| AudioHandle::new(a.source.clone(), backend));
        Ok(Self {
            reveal: RevealController::new(scene.reveal),
            cursor: CursorFollower::new(scene.cursor),
            sprites: Vec::new(),
            loader,
            audio,
            rng: StdRng::seed_from_u64(scene.seed),
            next_sprite_id: 0,
            scene,
        })
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn theme(&self) -> Theme {
        self.reveal.theme()
    }

    pub fn is_revealed(&self) -> bool {
        self.reveal.is_revealed()
    }

    pub fn reveal(&self) -> &RevealController {
        &self.reveal
    }

    pub fn audio(&self) -> Option<&AudioHandle> {
        self.audio.as_ref()
    }

    pub fn cursor_position(&self) -> Point {
        self.cursor.marker_position()
    }

    pub fn mounted_sprite_count(&self) -> usize {
        self.sprites.len()
    }

    pub fn pending_loads(&self) -> usize {
        self.loader.pending_len()
    }

    pub fn dispatch(&mut self, event: Event) -> VitrineResult<()> {
        match event {
            Event::PointerMoved { position } => {
                self.cursor.pointer_moved(position);
                Ok(())
            }
            Event::Scrolled { offset } => {
                self.cursor.scrolled(offset);
                Ok(())
            }
            Event::HeadingClicked { position } => {
                match self.reveal.toggle(position, self.scene.viewport)? {
                    ToggleEffect::Mount => self.mount_sprites()?,
                    ToggleEffect::Unmount => self.unmount_sprites(),
                }
                Ok(())
            }
        }
    }

    /// Advance everything by `dt`: transitions, cursor, audio position, and
    /// every mounted sprite's driver; then service the loader and apply the
    /// completions. A completion addressed to an unmounted sprite is a no-op.
    pub fn tick(&mut self, dt: Duration) {
        self.reveal.tick(dt);
        self.cursor.tick(dt);
        if let Some(audio) = &mut self.audio {
            audio.tick(dt);
        }

        for sprite in &mut self.sprites {
            if let Some(request) = sprite.tick(dt) {
                self.loader.request(request);
            }
        }

        let completions = self.loader.service();
        if completions.is_empty() {
            return;
        }
        let mut by_id: HashMap<SpriteId, &mut Sprite> =
            self.sprites.iter_mut().map(|s| (s.id(), s)).collect();
        for completion in completions {
            match by_id.get_mut(&completion.sprite) {
                Some(sprite) => sprite.apply_completion(completion),
                None => {
                    tracing::debug!(
                        sprite = completion.sprite.0,
                        "dropping completion for unmounted sprite"
                    );
                }
            }
        }
    }

    #[tracing::instrument(skip(self))]
    pub fn render_frame(&self) -> FrameRgba {
        let disc = self.reveal.disc_visible().then(|| DiscLayer {
            center: self.reveal.disc_center(),
            radius: self.reveal.disc_radius(),
            opacity: self.reveal.disc_opacity(),
        });
        let marker = Some(MarkerLayer {
            center: self.cursor.marker_position(),
            radius: self.cursor.marker_radius(),
        });
        let sprites: Vec<&Sprite> = self.sprites.iter().collect();
        compose_frame(
            self.scene.viewport,
            self.reveal.theme(),
            &sprites,
            self.cursor.scroll_offset(),
            disc,
            marker,
        )
    }

    fn mount_sprites(&mut self) -> VitrineResult<()> {
        debug_assert!(self.sprites.is_empty());
        for pass in &self.scene.passes {
            for descriptor in pass {
                let id = SpriteId(self.next_sprite_id);
                self.next_sprite_id += 1;
                self.sprites.push(Sprite::new(id, *descriptor, &mut self.rng)?);
            }
        }
        if let Some(audio) = &mut self.audio {
            audio.start();
        }
        tracing::debug!(sprites = self.sprites.len(), "mounted sprite passes");
        Ok(())
    }

    fn unmount_sprites(&mut self) {
        self.sprites.clear();
        // Queued loads belong to sprites that no longer exist.
        self.loader.clear_pending();
        if let Some(audio) = &mut self.audio {
            audio.stop();
        }
        tracing::debug!("unmounted sprite passes");
    }
}
