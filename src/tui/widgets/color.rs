use ratatui::style::Color;

use crate::Config;
use crate::marking::PeriodColor;

/// Parse a color string into a ratatui Color.
///
/// Accepts basic and light/dark named colors, `#RRGGBB`, `#RGB` and
/// `rgb(r, g, b)`. Unrecognized input falls back to white.
pub fn parse_color(color_str: &str) -> Color {
    let s = color_str.trim().to_lowercase();

    match s.as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "gray" | "grey" | "lightgray" | "lightgrey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightyellow" => Color::LightYellow,
        "lightblue" => Color::LightBlue,
        "lightmagenta" => Color::LightMagenta,
        "lightcyan" => Color::LightCyan,
        _ => {
            let parsed = if s.starts_with('#') {
                parse_hex_color(&s)
            } else if s.starts_with("rgb(") {
                parse_rgb_color(&s)
            } else {
                None
            };
            parsed.unwrap_or(Color::White)
        }
    }
}

fn parse_hex_color(s: &str) -> Option<Color> {
    let hex = s.trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(hex.get(range)?, 16).ok();

    match hex.len() {
        6 => Some(Color::Rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        3 => {
            // #RGB -> #RRGGBB
            let expand = |v: u8| (v << 4) | v;
            Some(Color::Rgb(
                expand(channel(0..1)?),
                expand(channel(1..2)?),
                expand(channel(2..3)?),
            ))
        }
        _ => None,
    }
}

fn parse_rgb_color(s: &str) -> Option<Color> {
    let content = s.strip_prefix("rgb(")?.strip_suffix(')')?;
    let parts: Vec<u8> = content
        .split(',')
        .map(|p| p.trim().parse::<u8>())
        .collect::<Result<_, _>>()
        .ok()?;
    match parts.as_slice() {
        [r, g, b] => Some(Color::Rgb(*r, *g, *b)),
        _ => None,
    }
}

/// Relative luminance (WCAG) of an RGB color, 0.0 dark to 1.0 light
fn luminance(r: u8, g: u8, b: u8) -> f64 {
    let linear = |c: u8| {
        let c = c as f64 / 255.0;
        if c <= 0.03928 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    };
    0.2126 * linear(r) + 0.7152 * linear(g) + 0.0722 * linear(b)
}

/// Black text on light backgrounds, white text on dark ones
pub fn get_contrast_text_color(background: Color) -> Color {
    let dark = match background {
        Color::Rgb(r, g, b) => luminance(r, g, b) < 0.5,
        // Gray renders light in most terminals
        other => matches!(other, Color::Black | Color::Blue | Color::Magenta | Color::Red | Color::DarkGray),
    };
    if dark { Color::White } else { Color::Black }
}

/// Configured color for a task period
pub fn period_color(config: &Config, color: PeriodColor) -> Color {
    match color {
        PeriodColor::Incomplete => parse_color(&config.colors.incomplete),
        PeriodColor::Complete => parse_color(&config.colors.complete),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_named_hex_and_rgb() {
        assert_eq!(parse_color("Cyan"), Color::Cyan);
        assert_eq!(parse_color("#50cebb"), Color::Rgb(0x50, 0xce, 0xbb));
        assert_eq!(parse_color("#fff"), Color::Rgb(255, 255, 255));
        assert_eq!(parse_color("rgb(1, 2, 3)"), Color::Rgb(1, 2, 3));
        assert_eq!(parse_color("not-a-color"), Color::White);
    }

    #[test]
    fn contrast_follows_background_brightness() {
        assert_eq!(get_contrast_text_color(Color::Rgb(0, 0, 0)), Color::White);
        assert_eq!(get_contrast_text_color(Color::Rgb(250, 250, 250)), Color::Black);
        assert_eq!(get_contrast_text_color(Color::Blue), Color::White);
        assert_eq!(get_contrast_text_color(Color::Yellow), Color::Black);
    }
}
