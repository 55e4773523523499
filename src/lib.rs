//! Grid-raycasting core.
//!
//! A first-person view of a 2-D tile grid, rendered one screen column at a
//! time with a DDA ray march, plus the same ray/grid machinery exposed as a
//! spatial query for gameplay (hitscan weapons, sight checks).
//!
//! * [`world`]: the tile grid, viewer pose, texture repository and the
//!   text level-file loader.
//! * [`renderer`]: per-column ray march, perspective projection and
//!   texturing, billboard sprite compositing, frame orchestration.
//! * [`sim`]: entity handles and the fixed-step hitscan query.
//!
//! The crate never owns a window or decodes assets; it fills an internal
//! `u32` frame-buffer and answers queries over caller-supplied data.

pub mod renderer;
pub mod sim;
pub mod world;
