//! Billboard sprite compositing.
//!
//! Entities and pickups are point sprites projected relative to the
//! viewer and painted over the finished wall columns, farthest first.
//! Painter's order is the whole occlusion story here: sprites are only
//! depth-compared among themselves, never per-pixel against the wall
//! buffer, and that is correct in this grid model because sprites never
//! interpenetrate walls.

use glam::Vec2;
use smallvec::SmallVec;

use crate::{
    renderer::{DIST_FLOOR, RenderConfig, Rgba, blend_black},
    world::{Pose, TextureBank, TextureId},
};

/// Extra view-cone slack so sprites do not pop at the exact FOV edge.
pub const FOV_MARGIN: f32 = 0.2;

/// Distance beyond which sprites start fading toward black.
const FADE_START: f32 = 5.0;

/// A renderable point sprite, always facing the viewer.
#[derive(Clone, Debug)]
pub struct Billboard {
    pub pos: Vec2,
    /// When set, replaces the measured viewer distance for sorting,
    /// sizing and fading.
    pub depth_override: Option<f32>,
    /// Bank key of the image to draw; an unknown key paints a flat
    /// bordered rectangle instead.
    pub image_key: String,
    /// True for sprites that look the same from every direction
    /// (pickups); these get the idle bob.
    pub facing_independent: bool,
}

/// Flat colors for billboards whose image is not in the bank.
const SPRITE_COLOR: &[(&str, Rgba)] = &[
    ("imp", 0xFF_FF6400),
    ("demon", 0xFF_FF0000),
    ("cacodemon", 0xFF_FF00FF),
    ("health", 0xFF_00FF00),
    ("armor", 0xFF_0000FF),
    ("ammo", 0xFF_FFFF00),
];

fn fallback_color(key: &str) -> Rgba {
    SPRITE_COLOR
        .iter()
        .find(|(k, _)| key.starts_with(k))
        .map(|(_, c)| *c)
        .unwrap_or(0xFF_969696)
}

/// A billboard that survived culling, resolved to screen space.
#[derive(Clone, Copy, Debug)]
pub(crate) struct VisSprite {
    screen_x: f32,
    depth: f32,
    size: usize,
    top: i32,
    tex: Option<TextureId>,
    fallback: Rgba,
}

/// Cull, project and depth-sort billboards for one frame.
///
/// The result is ordered farthest-first, ready for painter's compositing.
pub(crate) fn collect_sprites(
    billboards: &[Billboard],
    pose: Pose,
    cfg: &RenderConfig,
    bank: &TextureBank,
    time: f32,
) -> SmallVec<[VisSprite; 32]> {
    use std::f32::consts::{PI, TAU};

    let mut out: SmallVec<[VisSprite; 32]> = SmallVec::new();

    for b in billboards {
        let d = b.pos - pose.pos();
        let dist = d.length();
        if dist > cfg.max_depth {
            continue;
        }

        let rel = (d.y.atan2(d.x) - pose.angle() + PI).rem_euclid(TAU) - PI;
        if rel.abs() > cfg.fov * 0.5 + FOV_MARGIN {
            continue;
        }

        let depth = b.depth_override.unwrap_or(dist).max(DIST_FLOOR);
        let size = ((cfg.height as f32 / depth) as usize).min(cfg.height);
        let mut top = ((cfg.height - size) / 2) as i32;
        if b.facing_independent {
            top += ((time * 5.0).sin() * 5.0) as i32;
        }

        out.push(VisSprite {
            screen_x: (rel / cfg.fov + 0.5) * cfg.width as f32,
            depth,
            size,
            top,
            tex: bank.id(&b.image_key),
            fallback: fallback_color(&b.image_key),
        });
    }

    // Farthest first, so nearer sprites overdraw correctly.
    out.sort_by(|a, b| b.depth.partial_cmp(&a.depth).unwrap());
    out
}

/// Paint sorted sprites over the wall columns already in `fb`.
pub(crate) fn draw_sprites(
    fb: &mut [Rgba],
    cfg: &RenderConfig,
    sprites: &[VisSprite],
    bank: &TextureBank,
) {
    for spr in sprites {
        let fade = if spr.depth > FADE_START {
            (spr.depth * 10.0).min(100.0) as u32
        } else {
            0
        };
        let left = spr.screen_x as i32 - spr.size as i32 / 2;

        match spr.tex.and_then(|id| bank.texture(id).ok()) {
            Some(tex) => {
                for sx in 0..spr.size {
                    let x = left + sx as i32;
                    if x < 0 || x >= cfg.width as i32 {
                        continue;
                    }
                    let u = sx * tex.w / spr.size;
                    for sy in 0..spr.size {
                        let y = spr.top + sy as i32;
                        if y < 0 || y >= cfg.height as i32 {
                            continue;
                        }
                        let v = sy * tex.h / spr.size;
                        let px = tex.pixels[v * tex.w + u];
                        if px >> 24 == 0 {
                            continue; // transparent texel
                        }
                        fb[y as usize * cfg.width + x as usize] = blend_black(px, fade);
                    }
                }
            }
            None => {
                // Flat bordered rectangle of the projected size.
                let body = blend_black(spr.fallback, fade);
                for sx in 0..spr.size {
                    let x = left + sx as i32;
                    if x < 0 || x >= cfg.width as i32 {
                        continue;
                    }
                    for sy in 0..spr.size {
                        let y = spr.top + sy as i32;
                        if y < 0 || y >= cfg.height as i32 {
                            continue;
                        }
                        let border =
                            sx < 2 || sy < 2 || sx >= spr.size - 2 || sy >= spr.size - 2;
                        fb[y as usize * cfg.width + x as usize] =
                            if border { 0xFF_000000 } else { body };
                    }
                }
            }
        }
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
