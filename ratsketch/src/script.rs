//! Gesture scripts: recorded drawing sessions replayed from TOML.
//!
//! ```toml
//! blood_red = false
//!
//! [[events]]
//! op = "color"
//! color = "pink"
//!
//! [[events]]
//! op = "start"
//! x = 10.0
//! y = 10.0
//! ```

use ratsketch_core::{
    brush::{BrushSettings, BrushWidth, Tool},
    color::Color,
    state::Palette,
    stroke::Point,
    surface::{DrawingSurface, SurfaceObserver},
};

#[derive(serde::Deserialize, Clone, Debug, PartialEq)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum Step {
    Start { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    End,
    Cancel,
    Undo,
    Clear,
    /// A palette name such as `"mutedYellow"`, or a hex color.
    Color { color: String },
    Width { width: f32 },
    Tool { tool: Tool },
}

#[derive(serde::Deserialize, Clone, Debug, Default)]
pub struct Script {
    /// Whether the purchasable palette colors are available.
    #[serde(default)]
    pub blood_red: bool,
    #[serde(default)]
    pub events: Vec<Step>,
}
impl Script {
    pub fn read(path: &std::path::Path) -> anyhow::Result<Self> {
        let string = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&string)?)
    }
    /// Feed every step into `surface`, in order.
    pub fn replay<O: SurfaceObserver>(&self, surface: &mut DrawingSurface<O>) {
        let palette = Palette::new(self.blood_red);
        let mut brush = BrushSettings::default();
        surface.set_brush(brush);
        for step in &self.events {
            match step {
                Step::Start { x, y } => surface.gesture_start(Point::new(*x, *y)),
                Step::Move { x, y } => surface.gesture_move(Point::new(*x, *y)),
                Step::End => surface.gesture_end(),
                Step::Cancel => surface.gesture_cancel(),
                Step::Undo => surface.undo(),
                Step::Clear => surface.clear(),
                Step::Color { color } => {
                    let parsed = palette.by_name(color).or_else(|| color.parse::<Color>().ok());
                    brush.color = match parsed {
                        Some(color) => palette.sanitize(color),
                        None => {
                            log::warn!("unknown color {color:?}, using white");
                            Color::WHITE
                        }
                    };
                    surface.set_brush(brush);
                }
                Step::Width { width } => {
                    brush.width = BrushWidth::new(*width);
                    surface.set_brush(brush);
                }
                Step::Tool { tool } => {
                    brush.tool = *tool;
                    surface.set_brush(brush);
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use ratsketch_core::surface::SurfaceOptions;

    const SCRIPT: &str = r##"
[[events]]
op = "color"
color = "pink"
[[events]]
op = "width"
width = 16.0
[[events]]
op = "start"
x = 1.0
y = 2.0
[[events]]
op = "move"
x = 3.0
y = 4.0
[[events]]
op = "end"
[[events]]
op = "color"
color = "#8B0000"
[[events]]
op = "start"
x = 5.0
y = 5.0
[[events]]
op = "cancel"
"##;

    #[test]
    fn parse_and_replay() {
        let script: Script = toml::from_str(SCRIPT).unwrap();
        assert_eq!(script.events.len(), 8);
        assert_eq!(script.events[4], Step::End);

        let mut surface = DrawingSurface::new(SurfaceOptions::default());
        script.replay(&mut surface);
        let strokes = surface.strokes();
        assert_eq!(strokes.len(), 2);
        assert_eq!(strokes[0].style().color, Color::from_rgb8([0xFF, 0x9C, 0xB5]));
        assert_eq!(strokes[0].style().width.get(), 16.0);
        // Not entitled, so the premium color falls back.
        assert_eq!(strokes[1].style().color, Color::WHITE);
        assert!(!surface.is_drawing());
    }
    #[test]
    fn unknown_op_rejected() {
        assert!(toml::from_str::<Script>("[[events]]\nop = \"redo\"\n").is_err());
    }
}
