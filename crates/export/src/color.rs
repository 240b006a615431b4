//! CSS color strings to `tiny-skia` colors.

use tiny_skia::Color;

/// Parse a CSS color: `#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`, `rgb()`,
/// `rgba()`, or one of a handful of names.
#[must_use]
pub fn parse_color(input: &str) -> Option<Color> {
    let s = input.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    let lower = s.to_ascii_lowercase();
    if let Some(args) = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_rgb_args(args);
    }
    named(&lower)
}

/// Like [`parse_color`], falling back to `fallback` (and logging) on garbage.
#[must_use]
pub fn color_or(input: &str, fallback: Color) -> Color {
    parse_color(input).unwrap_or_else(|| {
        tracing::warn!(color = input, "unrecognised color, using fallback");
        fallback
    })
}

/// Multiply the alpha channel by `opacity` (clamped to `0.0..=1.0`).
#[must_use]
pub fn with_opacity(color: Color, opacity: f64) -> Color {
    let opacity = if opacity.is_finite() { opacity.clamp(0.0, 1.0) } else { 1.0 };
    let opacity = opacity as f32;
    Color::from_rgba(color.red(), color.green(), color.blue(), color.alpha() * opacity).unwrap_or(color)
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let nibble = |i: usize| u8::from_str_radix(&hex[i..=i], 16).ok().map(|v| v * 17);
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let (r, g, b, a) = match hex.len() {
        3 => (nibble(0)?, nibble(1)?, nibble(2)?, 255),
        4 => (nibble(0)?, nibble(1)?, nibble(2)?, nibble(3)?),
        6 => (byte(0)?, byte(2)?, byte(4)?, 255),
        8 => (byte(0)?, byte(2)?, byte(4)?, byte(6)?),
        _ => return None,
    };
    Some(Color::from_rgba8(r, g, b, a))
}

fn parse_rgb_args(args: &str) -> Option<Color> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let channel = |s: &str| -> Option<u8> {
        let v: f64 = s.parse().ok()?;
        (0.0..=255.0).contains(&v).then(|| v.round() as u8)
    };
    let (r, g, b) = match parts.as_slice() {
        [r, g, b] | [r, g, b, _] => (channel(*r)?, channel(*g)?, channel(*b)?),
        _ => return None,
    };
    let a = match parts.get(3) {
        Some(a) => {
            let a: f32 = a.parse().ok()?;
            if !(0.0..=1.0).contains(&a) {
                return None;
            }
            a
        }
        None => 1.0,
    };
    Color::from_rgba(f32::from(r) / 255.0, f32::from(g) / 255.0, f32::from(b) / 255.0, a)
}

fn named(name: &str) -> Option<Color> {
    let rgb = match name {
        "white" => (255, 255, 255),
        "black" => (0, 0, 0),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "blue" => (0, 0, 255),
        "gray" | "grey" => (128, 128, 128),
        "orange" => (255, 165, 0),
        "yellow" => (255, 255, 0),
        "transparent" | "none" => return Some(Color::TRANSPARENT),
        _ => return None,
    };
    Some(Color::from_rgba8(rgb.0, rgb.1, rgb.2, 255))
}
