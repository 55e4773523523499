pub mod camera;
pub mod grid;
pub mod loader;
pub mod texture;

pub use camera::Pose;
pub use grid::{GridMap, Material, OOB_MATERIAL};
pub use loader::{LevelData, MapError, Spawn};
pub use texture::{Texture, TextureBank, TextureId};
