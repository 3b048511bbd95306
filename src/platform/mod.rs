//! Platform abstraction layer
//!
//! What the simulation needs from the host, and nothing more:
//! - Viewport size (logical units, refitted by the host on resize)
//! - Texture lookup by name (sizes only, never pixels)

pub mod texture;
pub mod viewport;

pub use texture::{Texture, TextureAtlas, TextureId, TextureProvider, stock_atlas};
pub use viewport::Viewport;
