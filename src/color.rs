//! Colour helpers for the lucky colour widget.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// Parse `#rrggbb` (leading `#` optional). Anything else is `None`.
pub fn hex_to_rgb(hex: &str) -> Option<Rgb> {
    let h = hex.trim().trim_start_matches('#');
    if h.len() != 6 || !h.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&h[i..i + 2], 16).ok();
    Some(Rgb { r: channel(0)?, g: channel(2)?, b: channel(4)? })
}

/// Perceived luminance in [0, 1].
pub fn luminance(rgb: Rgb) -> f64 {
    (0.2126 * rgb.r as f64 + 0.7152 * rgb.g as f64 + 0.0722 * rgb.b as f64) / 255.0
}

/// Dark text on light swatches, light text on dark ones.
pub fn readable_text_color(bg_hex: &str) -> &'static str {
    match hex_to_rgb(bg_hex) {
        Some(rgb) if luminance(rgb) <= 0.62 => "#fff",
        _ => "#111",
    }
}
