use crate::{
    assets::decode::PreparedImage,
    foundation::core::{Point, Rgba8Premul},
    foundation::error::{VitrineError, VitrineResult},
};

pub type PremulRgba8 = [u8; 4];

/// CPU drawing surface: premultiplied RGBA8, row-major, tightly packed.
#[derive(Clone, Debug)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; width as usize * height as usize * 4],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn clear(&mut self, color: Rgba8Premul) {
        let px = [color.r, color.g, color.b, color.a];
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&px);
        }
    }

    /// Resize to the image's native dimensions and paint it at (0,0),
    /// replacing prior contents.
    pub fn paint_image(&mut self, img: &PreparedImage) -> VitrineResult<()> {
        let expected = img.width as usize * img.height as usize * 4;
        if img.rgba8_premul.len() != expected {
            return Err(VitrineError::render("prepared image byte length mismatch"));
        }
        self.width = img.width;
        self.height = img.height;
        self.data.clear();
        self.data.extend_from_slice(img.rgba8_premul.as_slice());
        Ok(())
    }

    /// Source-over blit of `src`, scaled to `dst_w`×`dst_h` pixels with its
    /// top-left corner at (`dst_x`, `dst_y`). Nearest-neighbor sampling.
    pub fn blit_over_scaled(
        &mut self,
        src: &Surface,
        dst_x: f64,
        dst_y: f64,
        dst_w: f64,
        dst_h: f64,
        opacity: f64,
    ) {
        if src.width == 0 || src.height == 0 || dst_w <= 0.0 || dst_h <= 0.0 {
            return;
        }

        let x0 = dst_x.floor().max(0.0) as i64;
        let y0 = dst_y.floor().max(0.0) as i64;
        let x1 = ((dst_x + dst_w).ceil() as i64).min(i64::from(self.width));
        let y1 = ((dst_y + dst_h).ceil() as i64).min(i64::from(self.height));

        for y in y0..y1 {
            for x in x0..x1 {
                let u = (x as f64 - dst_x) / dst_w;
                let v = (y as f64 - dst_y) / dst_h;
                if !(0.0..1.0).contains(&u) || !(0.0..1.0).contains(&v) {
                    continue;
                }
                let sx = ((u * f64::from(src.width)) as u32).min(src.width - 1);
                let sy = ((v * f64::from(src.height)) as u32).min(src.height - 1);
                let s = src.pixel(sx, sy);
                self.over_at(x as u32, y as u32, s, opacity);
            }
        }
    }

    /// Source-over a filled disc.
    pub fn disc_over(&mut self, center: Point, radius: f64, color: Rgba8Premul, opacity: f64) {
        if radius <= 0.0 {
            return;
        }
        let x0 = ((center.x - radius).floor().max(0.0)) as i64;
        let y0 = ((center.y - radius).floor().max(0.0)) as i64;
        let x1 = (((center.x + radius).ceil()) as i64).min(i64::from(self.width));
        let y1 = (((center.y + radius).ceil()) as i64).min(i64::from(self.height));
        let r2 = radius * radius;
        let src = [color.r, color.g, color.b, color.a];

        for y in y0..y1 {
            for x in x0..x1 {
                let dx = (x as f64 + 0.5) - center.x;
                let dy = (y as f64 + 0.5) - center.y;
                if dx * dx + dy * dy <= r2 {
                    self.over_at(x as u32, y as u32, src, opacity);
                }
            }
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> PremulRgba8 {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]]
    }

    fn over_at(&mut self, x: u32, y: u32, src: PremulRgba8, opacity: f64) {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let dst = [self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]];
        let out = over(dst, src, opacity as f32);
        self.data[i..i + 4].copy_from_slice(&out);
    }
}

/// Premultiplied source-over with an extra opacity factor on `src`.
pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}
