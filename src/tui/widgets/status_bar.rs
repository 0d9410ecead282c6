use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;

use crate::Config;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};

const SEPARATOR: &str = " • ";
const ELLIPSIS: &str = "...";

/// Join as many hints as fit in `max_width`, ending with "..." when some are dropped
pub fn fit_hints(key_hints: &[String], max_width: usize) -> String {
    let mut text = String::new();
    for (i, hint) in key_hints.iter().enumerate() {
        let extra = if i == 0 { 0 } else { SEPARATOR.chars().count() };
        if text.chars().count() + extra + hint.chars().count() > max_width {
            if i == 0 {
                return truncate(hint, max_width);
            }
            if text.chars().count() + ELLIPSIS.len() <= max_width {
                text.push_str(ELLIPSIS);
            }
            return text;
        }
        if i > 0 {
            text.push_str(SEPARATOR);
        }
        text.push_str(hint);
    }
    text
}

fn truncate(text: &str, max_width: usize) -> String {
    if text.chars().count() <= max_width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_width.saturating_sub(ELLIPSIS.len())).collect();
    out.push_str(ELLIPSIS);
    out
}

pub fn render_status_bar(
    f: &mut Frame,
    area: Rect,
    message: Option<&String>,
    key_hints: &[String],
    config: &Config,
) {
    let fg_color = parse_color(&config.colors.fg);
    let bg_color = parse_color(&config.colors.bg);
    let highlight_bg = parse_color(&config.colors.highlight_bg);
    let max_width = area.width as usize;

    // Status messages take over the bar until they time out
    let (content, style) = match message {
        Some(msg) => (
            truncate(msg, max_width),
            Style::default()
                .fg(get_contrast_text_color(highlight_bg))
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD),
        ),
        None => (
            fit_hints(key_hints, max_width),
            Style::default().fg(fg_color).bg(bg_color),
        ),
    };

    f.render_widget(Paragraph::new(content).style(style), area);
}
