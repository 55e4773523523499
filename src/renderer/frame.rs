//! Frame orchestration.
//!
//! Owns the scratch frame-buffer and runs the three passes in order:
//! ceiling/floor clear, wall-column sweep, sprite composite. The sweep
//! casts `num_rays` rays across the FOV and stretches each resulting
//! column over `width / num_rays` screen columns.

use crate::{
    renderer::{
        RenderConfig, Rgba,
        column::{draw_wall_column, project},
        raycast::march,
        sprites::{Billboard, collect_sprites, draw_sprites},
    },
    world::{GridMap, Pose, TextureBank},
};

const CEILING_COLOR: Rgba = 0xFF_000064;
const FLOOR_COLOR: Rgba = 0xFF_323232;

/// Software renderer for one logical frame producer.
///
/// The scratch buffer is reused across frames; [`FrameRenderer::frame`]
/// repaints it fully, so nothing persists from the previous frame.
pub struct FrameRenderer {
    cfg: RenderConfig,
    scratch: Vec<Rgba>,
}

impl FrameRenderer {
    pub fn new(cfg: RenderConfig) -> Self {
        Self {
            scratch: vec![0; cfg.width * cfg.height],
            cfg,
        }
    }

    #[inline]
    pub fn cfg(&self) -> &RenderConfig {
        &self.cfg
    }

    /// Render one frame and loan out the finished buffer.
    ///
    /// `time` drives the pickup bob; pass a monotonic seconds counter.
    /// Billboards are composited after the full wall sweep; the painter's
    /// occlusion invariant depends on that order.
    pub fn frame(
        &mut self,
        grid: &GridMap,
        pose: Pose,
        billboards: &[Billboard],
        bank: &TextureBank,
        time: f32,
    ) -> &[Rgba] {
        self.clear();
        self.sweep_walls(grid, pose, bank);
        let vis = collect_sprites(billboards, pose, &self.cfg, bank, time);
        draw_sprites(&mut self.scratch, &self.cfg, &vis, bank);
        &self.scratch
    }

    /// Sky above the horizon line, floor below.
    fn clear(&mut self) {
        let half = self.cfg.width * (self.cfg.height / 2);
        self.scratch[..half].fill(CEILING_COLOR);
        self.scratch[half..].fill(FLOOR_COLOR);
    }

    fn sweep_walls(&mut self, grid: &GridMap, pose: Pose, bank: &TextureBank) {
        let cfg = &self.cfg;
        let half_fov = cfg.fov * 0.5;

        for ray in 0..cfg.num_rays {
            let ray_angle =
                pose.angle() - half_fov + (ray as f32 / cfg.num_rays as f32) * cfg.fov;
            let hit = march(grid, pose.pos(), ray_angle, cfg.max_depth);
            if hit.is_miss() {
                continue; // nothing within depth; leave sky and floor
            }
            let spec = project(&hit, pose.angle(), ray_angle, cfg.height);
            let x0 = ray * cfg.width / cfg.num_rays;
            let x1 = ((ray + 1) * cfg.width / cfg.num_rays).max(x0 + 1);
            draw_wall_column(
                &mut self.scratch,
                cfg.width,
                &spec,
                &hit,
                ray_angle,
                x0,
                x1,
                bank,
            );
        }
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use glam::vec2;

    fn bordered_room() -> GridMap {
        let mut cells = vec![0u8; 100];
        for i in 0..10 {
            cells[i] = 1;
            cells[90 + i] = 1;
            cells[i * 10] = 1;
            cells[i * 10 + 9] = 1;
        }
        GridMap::new(10, 10, cells)
    }

    fn small_cfg() -> RenderConfig {
        RenderConfig {
            width: 64,
            height: 48,
            num_rays: 64,
            ..RenderConfig::default()
        }
    }

    #[test]
    fn walls_cover_the_horizon() {
        let grid = bordered_room();
        let cfg = small_cfg();
        let mut r = FrameRenderer::new(cfg);
        let pose = Pose::new(vec2(5.0, 5.0), 0.0);
        let fb = r.frame(&grid, pose, &[], &TextureBank::new(), 0.0);

        // Every column faces a wall within depth, so the horizon row is
        // wall-colored all the way across (X-side red or Y-side darkened).
        let w = cfg.width;
        let row = (cfg.height / 2) * w;
        for x in 0..w {
            let px = fb[row + x];
            assert!(
                px == 0xFF_C80000 || px == 0xFF_640000,
                "column {x} is {px:#010x}"
            );
        }
    }

    #[test]
    fn sky_and_floor_split_the_background() {
        // No walls within depth: the frame is exactly ceiling over floor.
        let grid = GridMap::new(50, 50, vec![0; 2500]);
        let cfg = RenderConfig {
            max_depth: 4.0,
            ..small_cfg()
        };
        let mut r = FrameRenderer::new(cfg);
        let pose = Pose::new(vec2(25.0, 25.0), 0.0);
        let fb = r.frame(&grid, pose, &[], &TextureBank::new(), 0.0);
        let w = cfg.width;
        assert_eq!(fb[0], 0xFF_000064);
        assert_eq!(fb[(cfg.height / 2 - 1) * w], 0xFF_000064);
        assert_eq!(fb[(cfg.height / 2) * w], 0xFF_323232);
        assert_eq!(fb[cfg.height * w - 1], 0xFF_323232);
    }

    #[test]
    fn nearer_sprite_wins_the_overlap() {
        let grid = bordered_room();
        let cfg = small_cfg();
        let mut r = FrameRenderer::new(cfg);
        let pose = Pose::new(vec2(2.0, 5.0), 0.0);
        // Two billboards dead ahead; the demon is nearer and must own the
        // overlapping center pixels regardless of input order.
        let boards = [
            Billboard {
                pos: vec2(5.0, 5.0),
                depth_override: None,
                image_key: "demon".into(),
                facing_independent: false,
            },
            Billboard {
                pos: vec2(7.0, 5.0),
                depth_override: None,
                image_key: "health".into(),
                facing_independent: false,
            },
        ];
        let fb = r.frame(&grid, pose, &boards, &TextureBank::new(), 0.0);
        let center = (cfg.height / 2) * cfg.width + cfg.width / 2;
        assert_eq!(fb[center], 0xFF_FF0000);
    }

    #[test]
    fn sprites_paint_over_walls() {
        // Painter's compositing: sprites always land after the wall
        // sweep, with no per-pixel wall depth test.
        let grid = bordered_room();
        let cfg = small_cfg();
        let mut r = FrameRenderer::new(cfg);
        let pose = Pose::new(vec2(5.0, 5.0), 0.0);
        let boards = [Billboard {
            pos: vec2(7.0, 5.0),
            depth_override: None,
            image_key: "ammo".into(),
            facing_independent: false,
        }];
        let fb = r.frame(&grid, pose, &boards, &TextureBank::new(), 0.0);
        let center = (cfg.height / 2) * cfg.width + cfg.width / 2;
        assert_eq!(fb[center], 0xFF_FFFF00);
    }

    #[test]
    fn buffer_size_tracks_config() {
        let cfg = small_cfg();
        let mut r = FrameRenderer::new(cfg);
        let fb = r.frame(
            &bordered_room(),
            Pose::new(vec2(5.0, 5.0), 0.0),
            &[],
            &TextureBank::new(),
            0.0,
        );
        assert_eq!(fb.len(), cfg.width * cfg.height);
    }
}
