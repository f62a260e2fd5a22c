//! SVG serialization of a [`Scene`], the vector alternative to a PNG snapshot.
//!
//! The document is `export_px` square with a `viewBox` in canvas units, so paths are written
//! exactly as they were recorded.

use std::fmt::Write;

use super::Scene;

/// Serialize `scene` as a standalone SVG document.
#[must_use]
pub fn write(scene: &Scene) -> String {
    let px = scene.geometry.export_px;
    let size = scene.geometry.canvas_size;
    let mut out = String::with_capacity(256 + scene.strokes.len() * 128);
    // Writing into a String can't fail, results ignored throughout.
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{px}" height="{px}" viewBox="0 0 {size} {size}">"#
    );
    let _ = writeln!(
        out,
        r#"  <rect x="0" y="0" width="{size}" height="{size}" fill="{}"/>"#,
        scene.background.to_hex()
    );
    for stroke in &scene.strokes {
        let style = stroke.style();
        let _ = writeln!(
            out,
            r#"  <path d="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linecap="round" stroke-linejoin="round"/>"#,
            stroke.path_data(),
            style.color.to_hex(),
            style.width.get(),
        );
    }
    out.push_str("</svg>\n");
    out
}
