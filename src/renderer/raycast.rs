//! Grid-DDA ray march.
//!
//! Walks the ray cell-by-cell, visiting every cell the ray passes through
//! in order, and stops at the first solid one. The reported distance is
//! the crossing-plane projection along the terminating axis, so a flat
//! wall projects flat once the caller divides out the view/ray angle
//! offset (see [`crate::renderer::column::project`]).

use glam::Vec2;

use crate::world::{GridMap, Material};

/// Direction components below this never terminate the march on their
/// axis; the crossing distance is treated as infinite instead.
pub const DIR_EPSILON: f32 = 1e-4;

/// Which grid-line family the terminating step crossed.
///
/// Determines shading and which world coordinate supplies the texture
/// column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

/// Result of a single ray march.
#[derive(Clone, Copy, Debug)]
pub struct RayHit {
    /// Crossing-plane distance, `>= 0`. Equals `max_depth` on a miss.
    pub distance: f32,
    /// Material of the hit cell; `0` means the ray ran out of depth.
    pub material: Material,
    pub axis: Axis,
    /// Fractional position along the hit wall face, in `[0, 1)`.
    pub wall_fraction: f32,
}

impl RayHit {
    #[inline]
    pub fn is_miss(&self) -> bool {
        self.material == 0
    }
}

/// March from `origin` along `angle` until a wall or `max_depth`.
///
/// Never fails: a miss comes back as `material 0` at `max_depth`, so
/// callers branch on [`RayHit::is_miss`] rather than an option. An origin
/// already inside a wall is not special-cased; the first step terminates
/// with a near-zero distance.
pub fn march(grid: &GridMap, origin: Vec2, angle: f32, max_depth: f32) -> RayHit {
    let (sin, cos) = angle.rem_euclid(std::f32::consts::TAU).sin_cos();
    let dir = Vec2::new(cos, sin);

    let mut cell_x = origin.x.floor() as i32;
    let mut cell_y = origin.y.floor() as i32;

    // Distance the ray travels per whole-cell step on each axis. A
    // near-zero component makes its axis uncrossable rather than dividing.
    let delta_x = if dir.x.abs() < DIR_EPSILON {
        f32::INFINITY
    } else {
        (1.0 / dir.x).abs()
    };
    let delta_y = if dir.y.abs() < DIR_EPSILON {
        f32::INFINITY
    } else {
        (1.0 / dir.y).abs()
    };

    let step_x: i32 = if dir.x >= 0.0 { 1 } else { -1 };
    let step_y: i32 = if dir.y >= 0.0 { 1 } else { -1 };

    // Distance to the first grid-line crossing on each axis.
    let mut side_x = if dir.x < 0.0 {
        (origin.x - cell_x as f32) * delta_x
    } else {
        (cell_x as f32 + 1.0 - origin.x) * delta_x
    };
    let mut side_y = if dir.y < 0.0 {
        (origin.y - cell_y as f32) * delta_y
    } else {
        (cell_y as f32 + 1.0 - origin.y) * delta_y
    };

    let mut axis = Axis::X;
    loop {
        // Advance on whichever axis crosses a grid line first; give up
        // once that crossing lies beyond the depth limit.
        if side_x < side_y {
            if side_x > max_depth {
                break;
            }
            cell_x += step_x;
            side_x += delta_x;
            axis = Axis::X;
        } else {
            if side_y > max_depth {
                break;
            }
            cell_y += step_y;
            side_y += delta_y;
            axis = Axis::Y;
        }

        let material = grid.material_at(cell_x, cell_y);
        if material != 0 {
            // The terminating axis always has |dir| >= DIR_EPSILON: an
            // infinite crossing distance keeps an axis from being picked.
            let distance = match axis {
                Axis::X => (cell_x as f32 - origin.x + (1 - step_x) as f32 * 0.5) / dir.x,
                Axis::Y => (cell_y as f32 - origin.y + (1 - step_y) as f32 * 0.5) / dir.y,
            };
            // World coordinate on the non-hit axis, folded to its cell.
            let wall_x = match axis {
                Axis::X => origin.y + distance * dir.y,
                Axis::Y => origin.x + distance * dir.x,
            };
            return RayHit {
                distance,
                material,
                axis,
                wall_fraction: wall_x - wall_x.floor(),
            };
        }
    }

    RayHit {
        distance: max_depth,
        material: 0,
        axis,
        wall_fraction: 0.0,
    }
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::LevelData;
    use glam::vec2;
    use std::f32::consts::{FRAC_PI_2, PI};

    /// 10×10 grid, border ring of material 1, open interior.
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

    #[test]
    fn cardinal_rays_from_room_center() {
        let grid = bordered_room();
        let origin = vec2(5.0, 5.0);
        for angle in [0.0, FRAC_PI_2, PI, 1.5 * PI] {
            let hit = march(&grid, origin, angle, 20.0);
            assert_eq!(hit.material, 1, "angle {angle}");
            assert!((hit.distance - 4.0).abs() < 1e-3, "angle {angle}");
        }
    }

    #[test]
    fn bordered_room_east_ray() {
        // Viewer at (2,2) facing east: interior cells 3..=8 are open, the
        // border cell x=9 terminates at its x=9 face, 7 cells away.
        let grid = bordered_room();
        let hit = march(&grid, vec2(2.0, 2.0), 0.0, 20.0);
        assert_eq!(hit.material, 1);
        assert_eq!(hit.axis, Axis::X);
        assert!((hit.distance - 7.0).abs() < 1e-3);
    }

    #[test]
    fn angled_ray_reports_crossing_plane_distance() {
        // An off-axis ray to the same x=9 plane travels 7/cos(a) along
        // itself, but the DDA formula projects that back to 7 on the axis.
        let grid = bordered_room();
        let a = 0.3_f32;
        let hit = march(&grid, vec2(2.0, 5.0), a, 20.0);
        assert_eq!(hit.axis, Axis::X);
        assert!((hit.distance - 7.0 / a.cos()).abs() < 1e-3);
        assert!((hit.distance * a.cos() - 7.0).abs() < 1e-3);
    }

    #[test]
    fn wall_fraction_stays_half_open() {
        let grid = bordered_room();
        // Grid-line-aligned hit lands exactly on an integer boundary.
        let aligned = march(&grid, vec2(2.0, 3.0), 0.0, 20.0);
        assert_eq!(aligned.wall_fraction, 0.0);
        // A sweep of slightly off-axis rays must never produce 1.0.
        for i in 0..32 {
            let angle = -0.4 + i as f32 * 0.025;
            let hit = march(&grid, vec2(3.7, 5.3), angle, 20.0);
            assert!(!hit.is_miss());
            assert!(
                (0.0..1.0).contains(&hit.wall_fraction),
                "fraction {} at angle {angle}",
                hit.wall_fraction
            );
        }
    }

    #[test]
    fn axis_follows_terminating_step() {
        let grid = bordered_room();
        let east = march(&grid, vec2(5.0, 5.0), 0.0, 20.0);
        assert_eq!(east.axis, Axis::X);
        let north = march(&grid, vec2(5.0, 5.0), FRAC_PI_2, 20.0);
        assert_eq!(north.axis, Axis::Y);
    }

    #[test]
    fn axis_parallel_ray_cannot_divide_by_zero() {
        // Facing exactly east, dir.y == 0: the Y axis never terminates
        // and the march still ends at the X wall.
        let grid = bordered_room();
        let hit = march(&grid, vec2(5.5, 5.5), 0.0, 20.0);
        assert_eq!(hit.axis, Axis::X);
        assert!(hit.distance.is_finite());
    }

    #[test]
    fn depth_exhaustion_is_material_zero() {
        let grid = GridMap::new(50, 50, vec![0; 2500]);
        let hit = march(&grid, vec2(25.0, 25.0), 0.7, 5.0);
        assert!(hit.is_miss());
        assert_eq!(hit.distance, 5.0);
    }

    #[test]
    fn fallback_level_interior_walls() {
        // The built-in level has an interior block at (3..=4, 3); a ray
        // cast north-east from the player start must stop before the
        // outer ring.
        let lvl = LevelData::fallback();
        let hit = march(&lvl.grid, vec2(3.5, 1.5), FRAC_PI_2, 20.0);
        assert_eq!(hit.material, 1);
        assert!(hit.distance < 3.0);
    }
}
