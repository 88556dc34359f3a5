pub mod blocks;
pub mod config;
pub mod error;
pub mod io;
pub mod paths;
pub mod preset;
pub mod render;
pub mod scaffold;
pub mod templates;
pub mod types;
pub mod vars;

pub use error::{PipeforgeError, Result};
