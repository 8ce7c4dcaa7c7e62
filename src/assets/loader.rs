use std::{
    collections::{HashMap, VecDeque},
    path::PathBuf,
};

use anyhow::Context;

use crate::{
    assets::decode::{PreparedImage, decode_image},
    assets::sequence::ImageSequence,
    foundation::error::VitrineResult,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SpriteId(pub u32);

/// Monotonically increasing per-sprite request token.
///
/// A completion carrying a token older than the sprite's newest issued token
/// is stale and must be discarded (latest-request-wins).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadToken(pub u64);

#[derive(Clone, Copy, Debug)]
pub struct LoadRequest {
    pub sprite: SpriteId,
    pub token: LoadToken,
    pub index: u32,
}

#[derive(Debug)]
pub struct LoadCompletion {
    pub sprite: SpriteId,
    pub token: LoadToken,
    pub index: u32,
    pub result: VitrineResult<PreparedImage>,
}

/// The scene's only asynchronous operation, made explicit.
///
/// Requests queue up during a tick and complete when the app services the
/// loader between ticks. Decoded frames are cached by sequence index, so a
/// looping driver pays the decode cost once per distinct frame.
pub struct FrameLoader {
    root: PathBuf,
    sequence: ImageSequence,
    pending: VecDeque<LoadRequest>,
    cache: HashMap<u32, PreparedImage>,
}

impl FrameLoader {
    pub fn new(root: impl Into<PathBuf>, sequence: ImageSequence) -> Self {
        Self {
            root: root.into(),
            sequence,
            pending: VecDeque::new(),
            cache: HashMap::new(),
        }
    }

    pub fn sequence(&self) -> &ImageSequence {
        &self.sequence
    }

    pub fn request(&mut self, request: LoadRequest) {
        self.pending.push_back(request);
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Drop every queued request. Used when all sprites unmount at once; any
    /// in-flight work for destroyed sprites must become a no-op.
    pub fn clear_pending(&mut self) {
        self.pending.clear();
    }

    /// Complete all queued requests, in request order.
    ///
    /// Callers must not assume this ordering: completions are routed by
    /// (sprite, token) and stale tokens are discarded at the sprite.
    pub fn service(&mut self) -> Vec<LoadCompletion> {
        let mut out = Vec::with_capacity(self.pending.len());
        while let Some(req) = self.pending.pop_front() {
            let result = self.load(req.index);
            if result.is_err() {
                tracing::warn!(index = req.index, "image load failed");
            }
            out.push(LoadCompletion {
                sprite: req.sprite,
                token: req.token,
                index: req.index,
                result,
            });
        }
        out
    }

    fn load(&mut self, index: u32) -> VitrineResult<PreparedImage> {
        if let Some(img) = self.cache.get(&index) {
            return Ok(img.clone());
        }

        let source = self.sequence.source(index)?;
        let path = self.root.join(source);
        let bytes = std::fs::read(&path)
            .with_context(|| format!("read image '{}'", path.display()))?;
        let img = decode_image(&bytes)?;
        self.cache.insert(index, img.clone());
        Ok(img)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;
    use std::path::PathBuf;

    use super::*;

    fn write_px_png(dir: &PathBuf, name: &str, rgba: [u8; 4]) {
        let img = image::RgbaImage::from_raw(1, 1, rgba.to_vec()).unwrap();
        let mut buf = Vec::new();
        image::DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
            .unwrap();
        std::fs::write(dir.join(name), buf).unwrap();
    }

    fn fixture_dir(tag: &str) -> PathBuf {
        let dir = PathBuf::from("target").join("loader_tests").join(tag);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn service_completes_in_request_order_and_caches() {
        let dir = fixture_dir("order");
        write_px_png(&dir, "f0.png", [255, 0, 0, 255]);
        write_px_png(&dir, "f1.png", [0, 255, 0, 255]);

        let seq =
            ImageSequence::new(vec!["f0.png".to_string(), "f1.png".to_string()]).unwrap();
        let mut loader = FrameLoader::new(&dir, seq);

        loader.request(LoadRequest {
            sprite: SpriteId(0),
            token: LoadToken(1),
            index: 1,
        });
        loader.request(LoadRequest {
            sprite: SpriteId(0),
            token: LoadToken(2),
            index: 0,
        });

        let done = loader.service();
        assert_eq!(done.len(), 2);
        assert_eq!(done[0].index, 1);
        assert_eq!(done[1].index, 0);
        assert!(done.iter().all(|c| c.result.is_ok()));
        assert_eq!(loader.pending_len(), 0);

        // Second request for a cached index still completes.
        loader.request(LoadRequest {
            sprite: SpriteId(0),
            token: LoadToken(3),
            index: 0,
        });
        let done = loader.service();
        assert!(done[0].result.is_ok());
    }

    #[test]
    fn missing_file_completes_as_error() {
        let dir = fixture_dir("missing");
        let seq = ImageSequence::new(vec!["absent.png".to_string()]).unwrap();
        let mut loader = FrameLoader::new(&dir, seq);

        loader.request(LoadRequest {
            sprite: SpriteId(7),
            token: LoadToken(1),
            index: 0,
        });
        let done = loader.service();
        assert_eq!(done.len(), 1);
        assert!(done[0].result.is_err());
    }

    #[test]
    fn clear_pending_discards_queued_work() {
        let dir = fixture_dir("clear");
        let seq = ImageSequence::new(vec!["absent.png".to_string()]).unwrap();
        let mut loader = FrameLoader::new(&dir, seq);

        loader.request(LoadRequest {
            sprite: SpriteId(0),
            token: LoadToken(1),
            index: 0,
        });
        loader.clear_pending();
        assert_eq!(loader.pending_len(), 0);
        assert!(loader.service().is_empty());
    }
}
