use crate::{
    assets::sequence::{SequenceDescriptor, normalize_rel_path},
    foundation::core::Viewport,
    foundation::error::{VitrineError, VitrineResult},
};

/// Complete scene description, loaded from JSON.
///
/// `sequence` is the shared ordered image list; `passes` group the sprite
/// descriptors that mount together when the scene is revealed. `seed` makes
/// the per-sprite parallax draws deterministic.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    pub viewport: Viewport,
    pub seed: u64,
    pub sequence: Vec<String>,
    pub passes: Vec<Vec<SequenceDescriptor>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<AudioAsset>,
    #[serde(default)]
    pub reveal: RevealTiming,
    #[serde(default)]
    pub cursor: CursorTiming,
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
pub struct AudioAsset {
    pub source: String,
}

/// Stage durations and disc geometry for the reveal transition.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct RevealTiming {
    /// Stage one: disc pops from scale 0 to 1 while fading in.
    pub pop_secs: f64,
    /// Stage two: disc expands until it covers the viewport.
    pub expand_secs: f64,
    /// Hide transition: disc shrinks back to nothing.
    pub collapse_secs: f64,
    /// Disc diameter at scale 1.
    pub disc_diameter_px: f64,
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            pop_secs: 0.4,
            expand_secs: 1.8,
            collapse_secs: 0.4,
            disc_diameter_px: 20.0,
        }
    }
}

/// Easing duration and marker geometry for the cursor follower.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct CursorTiming {
    pub ease_secs: f64,
    pub marker_diameter_px: f64,
}

impl Default for CursorTiming {
    fn default() -> Self {
        Self {
            ease_secs: 0.2,
            marker_diameter_px: 15.0,
        }
    }
}

impl Scene {
    pub fn validate(&self) -> VitrineResult<()> {
        if self.viewport.width == 0 || self.viewport.height == 0 {
            return Err(VitrineError::validation(
                "viewport width/height must be > 0",
            ));
        }
        if self.sequence.is_empty() {
            return Err(VitrineError::validation(
                "scene sequence must have at least one image",
            ));
        }
        for source in &self.sequence {
            normalize_rel_path(source)?;
        }
        if let Some(audio) = &self.audio {
            normalize_rel_path(&audio.source)?;
        }

        for (pass_idx, pass) in self.passes.iter().enumerate() {
            for (slot_idx, descriptor) in pass.iter().enumerate() {
                descriptor.validate(self.sequence.len()).map_err(|e| {
                    VitrineError::validation(format!(
                        "pass {pass_idx} slot {slot_idx}: {e}"
                    ))
                })?;
            }
        }

        self.reveal.validate()?;
        self.cursor.validate()?;
        Ok(())
    }
}

impl RevealTiming {
    pub fn validate(&self) -> VitrineResult<()> {
        for (name, v) in [
            ("pop_secs", self.pop_secs),
            ("expand_secs", self.expand_secs),
            ("collapse_secs", self.collapse_secs),
            ("disc_diameter_px", self.disc_diameter_px),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(VitrineError::validation(format!(
                    "reveal {name} must be finite and > 0"
                )));
            }
        }
        Ok(())
    }
}

impl CursorTiming {
    pub fn validate(&self) -> VitrineResult<()> {
        if !self.ease_secs.is_finite() || self.ease_secs <= 0.0 {
            return Err(VitrineError::validation(
                "cursor ease_secs must be finite and > 0",
            ));
        }
        if !self.marker_diameter_px.is_finite() || self.marker_diameter_px <= 0.0 {
            return Err(VitrineError::validation(
                "cursor marker_diameter_px must be finite and > 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn basic_scene() -> Scene {
        Scene {
            viewport: Viewport {
                width: 640,
                height: 360,
            },
            seed: 123,
            sequence: (0..6).map(|i| format!("frames/{i:03}.png")).collect(),
            passes: vec![
                vec![SequenceDescriptor {
                    start_index: 0,
                    num_images: 3,
                    duration_secs: 1.0,
                    size_px: 120.0,
                    top_pct: 10.0,
                    left_pct: 5.0,
                    z_index: 2,
                }],
                vec![SequenceDescriptor {
                    start_index: 3,
                    num_images: 3,
                    duration_secs: 2.0,
                    size_px: 80.0,
                    top_pct: 60.0,
                    left_pct: 70.0,
                    z_index: 1,
                }],
            ],
            audio: Some(AudioAsset {
                source: "background-music.mp3".to_string(),
            }),
            reveal: RevealTiming::default(),
            cursor: CursorTiming::default(),
        }
    }

    #[test]
    fn json_roundtrip() {
        let scene = basic_scene();
        let s = serde_json::to_string_pretty(&scene).unwrap();
        let de: Scene = serde_json::from_str(&s).unwrap();
        assert_eq!(de.viewport.width, 640);
        assert_eq!(de.sequence.len(), 6);
        assert_eq!(de.passes.len(), 2);
    }

    #[test]
    fn timing_defaults_apply_when_absent() {
        let json = serde_json::json!({
            "viewport": { "width": 100, "height": 100 },
            "seed": 1,
            "sequence": ["a.png"],
            "passes": []
        });
        let scene: Scene = serde_json::from_value(json).unwrap();
        assert_eq!(scene.reveal.pop_secs, 0.4);
        assert_eq!(scene.cursor.ease_secs, 0.2);
        assert!(scene.audio.is_none());
    }

    #[test]
    fn validate_rejects_out_of_range_descriptor() {
        let mut scene = basic_scene();
        scene.passes[1][0].start_index = 4;
        let err = scene.validate().unwrap_err().to_string();
        assert!(err.contains("pass 1 slot 0"), "{err}");
    }

    #[test]
    fn validate_rejects_bad_paths() {
        let mut scene = basic_scene();
        scene.sequence[0] = "/etc/passwd".to_string();
        assert!(scene.validate().is_err());

        let mut scene = basic_scene();
        scene.audio = Some(AudioAsset {
            source: "../outside.mp3".to_string(),
        });
        assert!(scene.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_timings() {
        let mut scene = basic_scene();
        scene.reveal.expand_secs = 0.0;
        assert!(scene.validate().is_err());

        let mut scene = basic_scene();
        scene.cursor.ease_secs = f64::NAN;
        assert!(scene.validate().is_err());
    }
}
