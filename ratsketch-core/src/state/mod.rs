pub mod canvas;
pub mod palette;

pub use canvas::CanvasState;
pub use palette::Palette;
