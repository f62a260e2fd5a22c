//! User-editable canvas settings, stored as TOML in the preferences directory.

use crate::{
    brush::EraserWidth,
    color::Color,
    export::CanvasGeometry,
    surface::SurfaceOptions,
};

const DOCUMENTATION: &str = r##"# Ratsketch canvas settings. You may edit this file, but be aware that formatting and comments will
# not be preserved, and all keys and values are case sensitive.

# canvas_size: side length of the square canvas, in the units gestures are reported in.
# export_px: side length of the exported PNG, in pixels, at most 8192. Points are scaled by
#   export_px / canvas_size.
# background: canvas fill, written "#RRGGBB". Alpha is ignored, the background is always opaque.
# eraser_width: "equal" to erase at the brush width, "doubled" for twice the brush width.
# export_timeout_ms: how long a render may take before giving up.

"##;

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("no preferences directory available")]
    NoPath,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    De(#[from] toml::de::Error),
    #[error(transparent)]
    Ser(#[from] toml::ser::Error),
}

#[must_use]
pub fn preferences_dir() -> Option<std::path::PathBuf> {
    let mut base_dir = dirs::preference_dir()?;
    base_dir.push("ratsketch");
    Some(base_dir)
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub canvas_size: f32,
    pub export_px: u32,
    pub background: Color,
    pub eraser_width: EraserWidth,
    pub export_timeout_ms: u64,
    #[serde(skip)]
    failed_to_load: bool,
}
impl Default for CanvasConfig {
    fn default() -> Self {
        let geometry = CanvasGeometry::default();
        Self {
            canvas_size: geometry.canvas_size,
            export_px: geometry.export_px,
            background: Color::BLACK,
            eraser_width: EraserWidth::default(),
            export_timeout_ms: 5000,
            failed_to_load: false,
        }
    }
}
impl CanvasConfig {
    pub const FILENAME: &'static str = "canvas.toml";
    /// Load from the user's preferences, or defaults if unavailable for some reason.
    #[must_use]
    pub fn load() -> Self {
        match preferences_dir() {
            None => Self::no_path(),
            Some(mut dir) => {
                dir.push(Self::FILENAME);
                Self::load_or_default(&dir)
            }
        }
    }
    #[must_use]
    pub fn no_path() -> Self {
        log::warn!("Canvas config wasn't available, defaulting.");
        Self {
            failed_to_load: true,
            ..Self::default()
        }
    }
    /// Parse the file at `path`, falling back to defaults on any error.
    #[must_use]
    pub fn load_or_default(path: &std::path::Path) -> Self {
        match Self::read(path) {
            Ok(config) => config,
            Err(e) => {
                log::debug!("failed to read {path:?}: {e}");
                Self::no_path()
            }
        }
    }
    /// Parse the file at `path`.
    pub fn read(path: &std::path::Path) -> Result<Self, ConfigError> {
        let string = std::fs::read_to_string(path)?;
        Self::from_toml(&string)
    }
    pub fn from_toml(string: &str) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(string)?;
        config.background = config.background.opaque();
        config.export_px = CanvasGeometry::clamp_export_px(config.export_px);
        Ok(config)
    }
    /// Pretty TOML, prefixed with documentation.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        let string = toml::ser::to_string_pretty(self)?;
        Ok(DOCUMENTATION.to_owned() + &string)
    }
    /// Return true if loading user's settings failed. This can be useful for
    /// displaying a warning.
    #[must_use]
    pub fn did_fail_to_load(&self) -> bool {
        self.failed_to_load
    }
    /// Write to the user's preferences.
    pub fn save(&self) -> Result<(), ConfigError> {
        let mut preferences = preferences_dir().ok_or(ConfigError::NoPath)?;
        // Explicity do *not* create recursively. If not found, the user probably has a good reason.
        // Ignore errors (could already exist). Any real errors will be emitted by file access below.
        let _ = std::fs::DirBuilder::new().create(&preferences);

        preferences.push(Self::FILENAME);
        self.write(&preferences)
    }
    pub fn write(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }
    #[must_use]
    pub fn geometry(&self) -> CanvasGeometry {
        CanvasGeometry {
            canvas_size: self.canvas_size,
            export_px: CanvasGeometry::clamp_export_px(self.export_px),
        }
    }
    #[must_use]
    pub fn surface_options(&self) -> SurfaceOptions {
        SurfaceOptions {
            geometry: self.geometry(),
            background: self.background.opaque(),
            eraser: self.eraser_width,
        }
    }
    #[must_use]
    pub fn export_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.export_timeout_ms)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    #[test]
    fn round_trip() {
        let config = CanvasConfig {
            canvas_size: 300.0,
            export_px: 512,
            background: Color::from_hex("#202020").unwrap(),
            eraser_width: EraserWidth::Doubled,
            export_timeout_ms: 250,
            ..Default::default()
        };
        let string = config.to_toml().unwrap();
        assert!(string.starts_with(DOCUMENTATION));
        assert!(string.contains(r##"background = "#202020""##));
        assert!(string.contains(r#"eraser_width = "doubled""#));
        assert_eq!(CanvasConfig::from_toml(&string).unwrap(), config);
    }
    #[test]
    fn missing_fields_default() {
        let config = CanvasConfig::from_toml("export_px = 256\n").unwrap();
        assert_eq!(config.export_px, 256);
        assert_eq!(config.canvas_size, 1024.0);
        assert_eq!(config.background, Color::BLACK);
        assert_eq!(config.export_timeout(), std::time::Duration::from_secs(5));
        assert!(!config.did_fail_to_load());
    }
    #[test]
    fn translucent_background_made_opaque() {
        let config = CanvasConfig::from_toml(r##"background = "#FF000080""##).unwrap();
        assert_eq!(config.background, Color::from_hex("#FF0000").unwrap());
    }
    #[test]
    fn bad_file_falls_back() {
        assert!(matches!(
            CanvasConfig::from_toml("export_px = \"big\""),
            Err(ConfigError::De(_))
        ));
        let missing = CanvasConfig::load_or_default(std::path::Path::new(
            "/nonexistent/ratsketch/canvas.toml",
        ));
        assert!(missing.did_fail_to_load());
        assert_eq!(missing.export_px, 1024);
    }
    #[test]
    fn documentation_alone_parses_to_defaults() {
        // Every line of the header is a comment, including the ones quoting hex colors.
        assert!(DOCUMENTATION.contains(r##""#RRGGBB""##));
        let config = CanvasConfig::from_toml(DOCUMENTATION).unwrap();
        assert_eq!(config, CanvasConfig::default());
    }
    #[test]
    fn export_size_is_bounded() {
        let huge = CanvasConfig::from_toml("export_px = 4294967295").unwrap();
        assert_eq!(huge.export_px, CanvasGeometry::MAX_EXPORT_PX);
        let zero = CanvasConfig::from_toml("export_px = 0").unwrap();
        assert_eq!(zero.export_px, 1);

        let mut edited = CanvasConfig::default();
        edited.export_px = u32::MAX;
        assert_eq!(edited.geometry().export_px, CanvasGeometry::MAX_EXPORT_PX);
    }
    #[test]
    fn surface_options() {
        let config = CanvasConfig {
            eraser_width: EraserWidth::Doubled,
            ..Default::default()
        };
        let options = config.surface_options();
        assert_eq!(options.eraser, EraserWidth::Doubled);
        assert_eq!(options.geometry.scale(), 1.0);
        assert_eq!(options.background, Color::BLACK);
    }
}
