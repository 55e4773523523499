mod hitscan;

pub use hitscan::{EntityId, EntityRef, HitKind, ScanHit, hitscan};
