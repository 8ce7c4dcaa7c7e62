use crate::foundation::{
    core::Placement,
    error::{VitrineError, VitrineResult},
};

/// Static ordered list of image sources, indexed by integer position.
///
/// Sources are scene-relative paths, normalized at construction. The list is
/// read-only for the lifetime of the scene.
#[derive(Clone, Debug)]
pub struct ImageSequence {
    sources: Vec<String>,
}

impl ImageSequence {
    pub fn new(sources: impl IntoIterator<Item = String>) -> VitrineResult<Self> {
        let sources = sources
            .into_iter()
            .map(|s| normalize_rel_path(&s))
            .collect::<VitrineResult<Vec<_>>>()?;
        if sources.is_empty() {
            return Err(VitrineError::validation(
                "image sequence must have at least one source",
            ));
        }
        Ok(Self { sources })
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn source(&self, index: u32) -> VitrineResult<&str> {
        self.sources
            .get(index as usize)
            .map(String::as_str)
            .ok_or_else(|| {
                VitrineError::asset(format!(
                    "image index {index} out of range (sequence has {} sources)",
                    self.sources.len()
                ))
            })
    }
}

/// Per-sprite configuration: which slice of the sequence animates, how fast,
/// and where the sprite sits in the viewport.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SequenceDescriptor {
    pub start_index: u32,
    pub num_images: u32,
    pub duration_secs: f64,
    pub size_px: f64,
    pub top_pct: f64,
    pub left_pct: f64,
    pub z_index: i32,
}

impl SequenceDescriptor {
    pub fn validate(&self, sequence_len: usize) -> VitrineResult<()> {
        if self.num_images == 0 {
            return Err(VitrineError::validation(
                "descriptor num_images must be > 0",
            ));
        }
        if !self.duration_secs.is_finite() || self.duration_secs <= 0.0 {
            return Err(VitrineError::validation(
                "descriptor duration_secs must be finite and > 0",
            ));
        }
        if !self.size_px.is_finite() || self.size_px <= 0.0 {
            return Err(VitrineError::validation(
                "descriptor size_px must be finite and > 0",
            ));
        }

        // The driver's animated range must be fully populated in the store.
        let end = u64::from(self.start_index) + u64::from(self.num_images);
        if end > sequence_len as u64 {
            return Err(VitrineError::validation(format!(
                "descriptor range [{}, {}) exceeds sequence length {}",
                self.start_index, end, sequence_len
            )));
        }
        Ok(())
    }

    pub fn placement(&self) -> Placement {
        Placement {
            size_px: self.size_px,
            top_pct: self.top_pct,
            left_pct: self.left_pct,
            z_index: self.z_index,
        }
    }
}

/// Normalize and validate scene-relative asset paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and
/// rejects absolute paths or parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> VitrineResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(VitrineError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(VitrineError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(VitrineError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(VitrineError::validation(
            "asset path must contain a file name",
        ));
    }

    Ok(out.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn desc(start_index: u32, num_images: u32) -> SequenceDescriptor {
        SequenceDescriptor {
            start_index,
            num_images,
            duration_secs: 1.0,
            size_px: 100.0,
            top_pct: 0.0,
            left_pct: 0.0,
            z_index: 0,
        }
    }

    #[test]
    fn sequence_rejects_empty_and_bad_paths() {
        assert!(ImageSequence::new(Vec::new()).is_err());
        assert!(ImageSequence::new(vec!["/abs.png".to_string()]).is_err());
        assert!(ImageSequence::new(vec!["../up.png".to_string()]).is_err());
    }

    #[test]
    fn sequence_indexing_is_bounds_checked() {
        let seq = ImageSequence::new(vec!["a.png".to_string(), "b.png".to_string()]).unwrap();
        assert_eq!(seq.source(1).unwrap(), "b.png");
        assert!(seq.source(2).is_err());
    }

    #[test]
    fn normalize_collapses_dot_segments() {
        assert_eq!(
            normalize_rel_path("frames/./001.png").unwrap(),
            "frames/001.png"
        );
        assert_eq!(
            normalize_rel_path("frames\\002.png").unwrap(),
            "frames/002.png"
        );
    }

    #[test]
    fn descriptor_rejects_degenerate_fields() {
        assert!(desc(0, 0).validate(10).is_err());
        let mut d = desc(0, 5);
        d.duration_secs = 0.0;
        assert!(d.validate(10).is_err());
        let mut d = desc(0, 5);
        d.size_px = -1.0;
        assert!(d.validate(10).is_err());
    }

    #[test]
    fn descriptor_range_must_fit_sequence() {
        assert!(desc(0, 5).validate(5).is_ok());
        assert!(desc(1, 5).validate(5).is_err());
        assert!(desc(3, 2).validate(5).is_ok());
    }
}
