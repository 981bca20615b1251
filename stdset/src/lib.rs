//! Decoder for the STD sprite set family.
//!
//! A file set shares one base name:
//! - `.std` raw 16x16 sprites, 256 bytes each, no header
//! - `.inf` per-slot shape metadata for a 10x10 slot table
//! - `.map` 100x100 layout grid referencing slots as `row * 10 + column`
//! - `.dat` animation objects, kept as an opaque blob
pub mod compositor;
pub mod constants;
pub mod error;
mod loader;
pub mod palette;
pub mod parser;
mod types;

pub use compositor::{Compositor, RenderOptions, ViewMode};
pub use error::StdSetError;
pub use loader::{Shape, SourceResolver, SpriteSet, Viewer};
pub use palette::Palette;
pub use types::*;

/// Decodes a sprite container. See [`parser::parse_sprites`].
pub fn decode_sprites(bytes: &[u8], policy: IndexPolicy) -> Vec<Sprite> {
    parser::parse_sprites(bytes, policy)
}
