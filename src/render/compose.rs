use crate::{
    foundation::core::{Point, Rgba8Premul, Theme, Vec2, Viewport},
    render::sprite::Sprite,
    render::surface::Surface,
};

/// Accent color shared by the reveal disc and the cursor marker.
const ACCENT: Rgba8Premul = Rgba8Premul {
    r: 220,
    g: 38,
    b: 38,
    a: 255,
};

/// Finished frame: premultiplied RGBA8, row-major.
#[derive(Clone, Debug)]
pub struct FrameRgba {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub premultiplied: bool,
}

/// Reveal disc layer, painted beneath the sprites.
#[derive(Clone, Copy, Debug)]
pub struct DiscLayer {
    pub center: Point,
    pub radius: f64,
    pub opacity: f64,
}

/// Cursor marker layer, painted on top of everything.
#[derive(Clone, Copy, Debug)]
pub struct MarkerLayer {
    pub center: Point,
    pub radius: f64,
}

/// Paint one frame: theme background, reveal disc, sprites in ascending
/// z-order (stable by mount order on ties, each shifted by
/// `scroll * parallax_speed`), cursor marker.
pub fn compose_frame(
    viewport: Viewport,
    theme: Theme,
    sprites: &[&Sprite],
    scroll: Vec2,
    disc: Option<DiscLayer>,
    marker: Option<MarkerLayer>,
) -> FrameRgba {
    let mut frame = Surface::new(viewport.width, viewport.height);
    frame.clear(theme.background());

    if let Some(d) = disc {
        frame.disc_over(d.center, d.radius, ACCENT, d.opacity);
    }

    let mut order: Vec<(i32, usize)> = sprites
        .iter()
        .enumerate()
        .map(|(i, s)| (s.placement().z_index, i))
        .collect();
    order.sort();

    for (_, i) in order {
        let sprite = sprites[i];
        if !sprite.painted() {
            continue;
        }
        let placement = sprite.placement();
        let origin = placement.origin(viewport);
        let shift = scroll * sprite.parallax_speed();
        frame.blit_over_scaled(
            sprite.surface(),
            origin.x - shift.x,
            origin.y - shift.y,
            placement.size_px,
            placement.size_px,
            1.0,
        );
    }

    if let Some(m) = marker {
        frame.disc_over(m.center, m.radius, ACCENT, 1.0);
    }

    FrameRgba {
        width: viewport.width,
        height: viewport.height,
        data: frame.data().to_vec(),
        premultiplied: true,
    }
}
