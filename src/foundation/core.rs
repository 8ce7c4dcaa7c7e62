use crate::foundation::error::{VitrineError, VitrineResult};

pub use kurbo::{Point, Vec2};

/// Output viewport in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> VitrineResult<Self> {
        if width == 0 || height == 0 {
            return Err(VitrineError::validation(
                "viewport width/height must be > 0",
            ));
        }
        Ok(Self { width, height })
    }

    pub fn center(self) -> Point {
        Point::new(f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// Distance from `p` to the farthest viewport corner.
    pub fn farthest_corner_distance(self, p: Point) -> f64 {
        let w = f64::from(self.width);
        let h = f64::from(self.height);
        [
            Point::new(0.0, 0.0),
            Point::new(w, 0.0),
            Point::new(0.0, h),
            Point::new(w, h),
        ]
        .into_iter()
        .map(|c| p.distance(c))
        .fold(0.0, f64::max)
    }
}

/// Page theme, swapped at reveal-transition completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn background(self) -> Rgba8Premul {
        match self {
            Self::Light => Rgba8Premul::from_straight_rgba(245, 243, 238, 255),
            Self::Dark => Rgba8Premul::from_straight_rgba(17, 17, 17, 255),
        }
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8Premul {
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }
}

/// Absolute placement of a sprite inside the viewport.
///
/// `top_pct`/`left_pct` are percentages of the viewport edge lengths;
/// `size_px` is the painted edge length of the (square) sprite region.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Placement {
    pub size_px: f64,
    pub top_pct: f64,
    pub left_pct: f64,
    pub z_index: i32,
}

impl Placement {
    /// Top-left corner in viewport pixels, before any parallax shift.
    pub fn origin(self, viewport: Viewport) -> Point {
        Point::new(
            f64::from(viewport.width) * self.left_pct / 100.0,
            f64::from(viewport.height) * self.top_pct / 100.0,
        )
    }
}
