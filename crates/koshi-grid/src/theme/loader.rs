//! Rhai-based theme loader.
//!
//! Loads theme configuration from `~/.config/koshi/theme.rhai` using the
//! Rhai scripting language. Falls back to `GridTheme::default()` on any error.
//!
//! ## Rhai API
//!
//! Functions available in theme scripts:
//! - `hex("#rrggbb")` → `[r, g, b, 1.0]`
//! - `hexa("#rrggbb", alpha)` → `[r, g, b, alpha]`
//! - `rgba(r, g, b, a)` → `[r, g, b, a]`
//! - `rgb(r, g, b)` → `[r, g, b, 1.0]`
//!
//! Any top-level variable named like a [`GridTheme`] field overrides it:
//!
//! ```rhai
//! let cell_bg = hex("#1a1b26");
//! let cell_text_color = hex("#e5e5e5");
//! let chip_bg = hexa("#3b4261", 0.8);
//! let font_family = "JetBrains Mono";
//! let row_height = 36;
//! ```

use std::path::{Path, PathBuf};

use palette::Srgba;
use rhai::{Array, Dynamic, Engine, Scope};
use tracing::{info, warn};

use super::GridTheme;
use crate::color::{Color, parse_hex};
use crate::error::ThemeError;

/// Get the theme file path (~/.config/koshi/theme.rhai).
pub fn theme_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("koshi").join("theme.rhai"))
}

/// Load theme from the user's config file.
///
/// If the file doesn't exist or has errors, returns `GridTheme::default()`
/// and logs a warning.
pub fn load_theme() -> GridTheme {
    let Some(path) = theme_file_path() else {
        info!("No config directory available, using default theme");
        return GridTheme::default();
    };

    if !path.exists() {
        info!("Theme file not found at {:?}, using defaults", path);
        return GridTheme::default();
    }

    match load_theme_from_file(&path) {
        Ok(theme) => {
            info!("Loaded theme from {:?}", path);
            theme
        }
        Err(e) => {
            warn!("Failed to load theme from {:?}: {}", path, e);
            warn!("Falling back to default theme");
            GridTheme::default()
        }
    }
}

/// Load and parse a theme file.
pub fn load_theme_from_file(path: &Path) -> Result<GridTheme, ThemeError> {
    let script = std::fs::read_to_string(path).map_err(|source| ThemeError::Read {
        path: path.display().to_string(),
        source,
    })?;

    parse_theme_script(&script)
}

/// Create a Rhai engine with theme functions registered.
fn create_engine() -> Engine {
    let mut engine = Engine::new();

    // hex("#rrggbb") → [r, g, b, 1.0]
    engine.register_fn("hex", |s: &str| -> Array { hex_array(s, 1.0) });

    // hexa("#rrggbb", alpha) → [r, g, b, alpha]
    engine.register_fn("hexa", |s: &str, alpha: f64| -> Array { hex_array(s, alpha) });

    // rgba(r, g, b, a) → [r, g, b, a] (values 0.0-1.0)
    engine.register_fn("rgba", |r: f64, g: f64, b: f64, a: f64| -> Array {
        float_array(&[r, g, b, a])
    });

    // rgb(r, g, b) → [r, g, b, 1.0] (values 0.0-1.0)
    engine.register_fn("rgb", |r: f64, g: f64, b: f64| -> Array {
        float_array(&[r, g, b, 1.0])
    });

    engine
}

fn float_array(values: &[f64]) -> Array {
    values.iter().map(|v| Dynamic::from_float(*v)).collect()
}

/// Parse a hex color string to an RGBA array. Invalid input yields black.
fn hex_array(s: &str, alpha: f64) -> Array {
    let color = parse_hex(s).unwrap_or_else(|| {
        warn!("Invalid hex color: {}", s);
        Srgba::new(0.0, 0.0, 0.0, 1.0)
    });
    float_array(&[
        color.red as f64,
        color.green as f64,
        color.blue as f64,
        alpha,
    ])
}

/// Parse a theme script and build a GridTheme.
pub fn parse_theme_script(script: &str) -> Result<GridTheme, ThemeError> {
    let engine = create_engine();
    let mut scope = Scope::new();

    engine
        .run_with_scope(&mut scope, script)
        .map_err(|e| ThemeError::Script(e.to_string()))?;

    // Start with default theme
    let mut theme = GridTheme::default();

    macro_rules! apply {
        (color: $($field:ident),* $(,)?) => {
            $(
                if let Some(c) = get_color(&scope, stringify!($field)) {
                    theme.$field = c;
                }
            )*
        };
        (float: $($field:ident),* $(,)?) => {
            $(
                if let Some(v) = get_float(&scope, stringify!($field)) {
                    theme.$field = v;
                }
            )*
        };
    }

    // Cell surface
    apply!(color:
        cell_bg, cell_bg_alt, cell_bg_hovered, cell_bg_active, cell_line_color,
        cell_active_border, cell_text_color, cell_text_color_secondary, cell_updated_bg,
    );

    // Semantic colors
    apply!(color: link_color, error_color, placeholder_color, accent);

    // Chips, gauges, charts
    apply!(color: chip_bg, chip_text_color, gauge_track_color, chart_color);

    // Typography + spacing
    apply!(float:
        font_size, line_height, chip_height, chip_gap, chip_padding, chip_radius,
        gauge_bar_height, ring_stroke_width, cell_horizontal_padding, cell_vertical_padding,
        icon_size, icon_gap, checkbox_size, row_height, image_cell_height,
    );

    if let Some(family) = scope.get_value::<String>("font_family") {
        theme.font_family = family;
    }
    if let Some(ms) = scope.get_value::<i64>("update_highlight_ms") {
        theme.update_highlight_ms = ms.max(0) as u64;
    }

    Ok(theme)
}

/// Extract a color from scope (alpha defaults to 1.0).
fn get_color(scope: &Scope, name: &str) -> Option<Color> {
    let arr = scope.get_value::<Array>(name)?;
    if arr.len() < 3 {
        return None;
    }
    let r = arr[0].as_float().ok()? as f32;
    let g = arr[1].as_float().ok()? as f32;
    let b = arr[2].as_float().ok()? as f32;
    let a = match arr.get(3) {
        Some(v) => v.as_float().ok()? as f32,
        None => 1.0,
    };
    Some(Srgba::new(r, g, b, a))
}

/// Extract a number from scope; integers are accepted too.
fn get_float(scope: &Scope, name: &str) -> Option<f64> {
    let value = scope.get_value::<Dynamic>(name)?;
    value
        .as_float()
        .ok()
        .or_else(|| value.as_int().ok().map(|i| i as f64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_hex_parsing() {
        let arr = hex_array("#1a1b26", 1.0);
        assert_eq!(arr.len(), 4);
        // #1a = 26/255 ≈ 0.102
        let r = arr[0].as_float().unwrap();
        assert!((r - 0.102).abs() < 0.01);
    }

    #[test]
    fn test_simple_script() {
        let script = r##"
            let cell_bg = hex("#1a1b26");
            let cell_text_color = hex("#e5e5e5");
        "##;

        let theme = parse_theme_script(script).unwrap();
        assert!((theme.cell_bg.red - 0.102).abs() < 0.01);
        assert!((theme.cell_text_color.red - 0.898).abs() < 0.01);
    }

    #[test]
    fn test_rgba_function() {
        let script = r##"
            let chip_bg = rgba(0.1, 0.2, 0.3, 0.9);
        "##;

        let theme = parse_theme_script(script).unwrap();
        assert!((theme.chip_bg.red - 0.1).abs() < 0.01);
        assert!((theme.chip_bg.alpha - 0.9).abs() < 0.01);
    }

    #[test]
    fn test_numbers_and_strings() {
        let script = r##"
            let row_height = 40;
            let font_size = 14.5;
            let font_family = "JetBrains Mono";
            let update_highlight_ms = 250;
        "##;

        let theme = parse_theme_script(script).unwrap();
        assert_eq!(theme.row_height, 40.0);
        assert_eq!(theme.font_size, 14.5);
        assert_eq!(theme.font_family, "JetBrains Mono");
        assert_eq!(theme.update_highlight_ms, 250);
    }

    #[test]
    fn test_unknown_variables_are_ignored() {
        let theme = parse_theme_script("let sparkle = 3;").unwrap();
        assert_eq!(theme, GridTheme::default());
    }

    #[test]
    fn test_script_error() {
        let err = parse_theme_script("let = ;").unwrap_err();
        assert!(matches!(err, ThemeError::Script(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r##"let accent = hex("#ff0000");"##).unwrap();
        let theme = load_theme_from_file(file.path()).unwrap();
        assert_eq!(theme.accent.red, 1.0);
        assert_eq!(theme.accent.green, 0.0);
    }

    #[test]
    fn test_missing_file() {
        let err = load_theme_from_file(Path::new("/nonexistent/koshi/theme.rhai")).unwrap_err();
        assert!(matches!(err, ThemeError::Read { .. }));
    }
}
