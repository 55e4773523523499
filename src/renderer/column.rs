//! Wall-column projection and rasterization.
//!
//! Turns one [`RayHit`] into a vertical strip of the frame-buffer:
//! inverse-distance height, centered span, per-row texture sampling with
//! the classic Y-side darkening. Materials without a decoded texture fall
//! back to a flat color; either way a drawable column always results.

use crate::{
    renderer::{DIST_FLOOR, Rgba, darken_half, raycast::{Axis, RayHit}},
    world::{Material, TextureBank},
};

/// Texture name looked up in the bank for each wall material.
const MATERIAL_TEXTURE: &[(Material, &str)] = &[(1, "wall1"), (2, "wall2"), (3, "door")];

/// Flat colors for walls whose texture is not in the bank.
const MATERIAL_COLOR: &[(Material, Rgba)] = &[
    (1, 0xFF_C80000),
    (2, 0xFF_00C800),
    (3, 0xFF_0000C8),
    (4, 0xFF_C8C800),
];

const FALLBACK_COLOR: Rgba = 0xFF_969696;

pub(crate) fn material_texture<'a>(
    material: Material,
    bank: &'a TextureBank,
) -> Option<&'a crate::world::Texture> {
    MATERIAL_TEXTURE
        .iter()
        .find(|(m, _)| *m == material)
        .and_then(|(_, name)| bank.by_name(name))
}

pub(crate) fn material_color(material: Material) -> Rgba {
    MATERIAL_COLOR
        .iter()
        .find(|(m, _)| *m == material)
        .map(|(_, c)| *c)
        .unwrap_or(FALLBACK_COLOR)
}

/// One projected wall strip: where it sits on screen and how it shades.
#[derive(Clone, Copy, Debug)]
pub struct ColumnSpec {
    pub top: usize,
    /// On-screen strip height, already clamped to the screen.
    pub height: usize,
    /// True for Y-side hits, which draw at half intensity.
    pub shade: bool,
    /// Fisheye-corrected distance after the epsilon floor; the rasterizer
    /// re-derives the unclamped wall height from it for very close walls.
    pub dist: f32,
}

/// Project a hit into screen rows.
///
/// The raw crossing distance is corrected by the angle between this ray
/// and the view direction (otherwise flat walls bow outward), then floored
/// to keep the division bounded.
pub fn project(hit: &RayHit, view_angle: f32, ray_angle: f32, screen_h: usize) -> ColumnSpec {
    let dist = (hit.distance * (view_angle - ray_angle).cos()).max(DIST_FLOOR);
    let height = ((screen_h as f32 / dist) as usize).min(screen_h);
    ColumnSpec {
        top: (screen_h - height) / 2,
        height,
        shade: hit.axis == Axis::Y,
        dist,
    }
}

/// Texture column for a hit, in `0..tex_w`.
///
/// X-side walls seen looking east and Y-side walls seen looking south read
/// their face right-to-left; mirroring those keeps a texture continuous
/// around a corner instead of flipping at every face change.
pub fn texel_column(hit: &RayHit, ray_angle: f32, tex_w: usize) -> usize {
    let tx = ((hit.wall_fraction * tex_w as f32) as usize).min(tex_w - 1);
    let (sin, cos) = ray_angle.sin_cos();
    let mirrored = match hit.axis {
        Axis::X => cos > 0.0,
        Axis::Y => sin < 0.0,
    };
    if mirrored { tex_w - 1 - tx } else { tx }
}

/// Rasterize one wall strip into `fb` over screen columns `x0..x1`.
pub fn draw_wall_column(
    fb: &mut [Rgba],
    fb_w: usize,
    spec: &ColumnSpec,
    hit: &RayHit,
    ray_angle: f32,
    x0: usize,
    x1: usize,
    bank: &TextureBank,
) {
    if spec.height == 0 || x0 >= x1 {
        return;
    }

    match material_texture(hit.material, bank) {
        Some(tex) => {
            let tx = texel_column(hit, ray_angle, tex.w);
            let screen_h = fb.len() / fb_w;
            if spec.height < screen_h {
                for y in 0..spec.height {
                    let ty = y * tex.h / spec.height;
                    let mut px = tex.pixels[ty * tex.w + tx];
                    if spec.shade {
                        px = darken_half(px);
                    }
                    fill_row(fb, fb_w, x0, x1, spec.top + y, px);
                }
            } else {
                // Wall taller than the screen: sample only the centered
                // slice of the texture that the visible rows map to.
                let wall_h = screen_h as f32 / spec.dist;
                let t0 = (wall_h - screen_h as f32) * 0.5 / wall_h * tex.h as f32;
                let t1 = (wall_h + screen_h as f32) * 0.5 / wall_h * tex.h as f32;
                for y in 0..screen_h {
                    let ty = ((t0 + (t1 - t0) * y as f32 / screen_h as f32) as usize)
                        .min(tex.h - 1);
                    let mut px = tex.pixels[ty * tex.w + tx];
                    if spec.shade {
                        px = darken_half(px);
                    }
                    fill_row(fb, fb_w, x0, x1, y, px);
                }
            }
        }
        None => {
            let mut color = material_color(hit.material);
            if spec.shade {
                color = darken_half(color);
            }
            for y in 0..spec.height {
                fill_row(fb, fb_w, x0, x1, spec.top + y, color);
            }
        }
    }
}

#[inline(always)]
fn fill_row(fb: &mut [Rgba], fb_w: usize, x0: usize, x1: usize, y: usize, px: Rgba) {
    let row = y * fb_w;
    fb[row + x0..row + x1].fill(px);
}
