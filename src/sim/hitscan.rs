//! Fixed-step hitscan query for weapons and sight checks.
//!
//! Deliberately a coarser march than the renderer's DDA: gameplay hit
//! detection does not need grid-exact crossings at a 0.1-cell step, and
//! the two algorithms only have to agree on which cell is first solid.
//! Keep them separate; unifying would change hit behavior at cell
//! boundaries.

use glam::Vec2;

use crate::world::GridMap;

/// Opaque handle for an entity in a caller-supplied list.
///
/// The query never owns entities; it hands this back so the caller can
/// resolve the hit on its side.
pub type EntityId = u32;

/// Minimal projection of a game entity needed by the ray queries.
#[derive(Clone, Copy, Debug)]
pub struct EntityRef {
    pub pos: Vec2,
    /// Collision radius in cells.
    pub radius: f32,
    /// Dead entities are transparent to the ray.
    pub alive: bool,
    pub id: EntityId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HitKind {
    Wall,
    Entity(EntityId),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScanHit {
    /// Stepped distance along the ray, quantized to `step`.
    pub distance: f32,
    pub kind: HitKind,
}

/// March a ray in `step`-sized increments up to `max_range`.
///
/// Per sample the wall check runs first, so a wall and an entity sharing
/// a cell resolve to the wall and nothing shoots through masonry. Entities
/// are tested in input order; the first live one within its radius of the
/// sample point wins. `None` means the ray ran out of range.
pub fn hitscan(
    grid: &GridMap,
    origin: Vec2,
    angle: f32,
    max_range: f32,
    step: f32,
    entities: &[EntityRef],
) -> Option<ScanHit> {
    let (sin, cos) = angle.sin_cos();
    let dir = Vec2::new(cos, sin);

    let mut distance = 0.0_f32;
    while distance < max_range {
        let p = origin + dir * distance;

        if grid.is_wall(p.x.floor() as i32, p.y.floor() as i32) {
            return Some(ScanHit {
                distance,
                kind: HitKind::Wall,
            });
        }

        for e in entities {
            if e.alive && e.pos.distance(p) < e.radius {
                return Some(ScanHit {
                    distance,
                    kind: HitKind::Entity(e.id),
                });
            }
        }

        distance += step;
    }
    None
}

/*====================================================================*/
/*                                Tests                               */
/*====================================================================*/
