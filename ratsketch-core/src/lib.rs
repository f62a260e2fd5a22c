#![warn(clippy::pedantic)]

pub mod brush;
pub mod color;
pub mod config;
pub mod export;
pub mod id;
pub mod input;
pub mod raster;
pub mod session;
pub mod state;
pub mod stroke;
pub mod surface;
pub mod tess;
pub mod util;

pub use id::SketchID;
