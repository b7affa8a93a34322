//! Loading textures from the asset directory and writing textures back to disk.

pub mod snapshot;
pub mod texture;

pub use snapshot::save_texture;
pub use texture::{load_binary, load_color_map, load_texture};
