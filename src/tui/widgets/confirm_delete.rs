use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::Config;
use crate::models::Task;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::tui::widgets::popup::popup_area;

pub const DELETE_OPTIONS: [&str; 2] = ["Delete", "Cancel"];

pub fn render_confirm_delete(f: &mut Frame, area: Rect, task: &Task, selection: usize, config: &Config) {
    let fg_color = parse_color(&config.colors.fg);
    let bg_color = parse_color(&config.colors.bg);
    let highlight_bg = parse_color(&config.colors.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);
    let normal = Style::default().fg(fg_color).bg(bg_color);

    let popup_area = popup_area(area, 50, 35);
    f.render_widget(Clear, popup_area);

    let mut lines = vec![
        Line::from(Span::styled("Delete this task?", normal)),
        Line::from(""),
        Line::from(Span::styled(task.title.clone(), normal)),
        Line::from(""),
    ];

    for (index, option) in DELETE_OPTIONS.iter().enumerate() {
        let (prefix, style) = if index == selection {
            ("> ", Style::default().fg(highlight_fg).bg(highlight_bg))
        } else {
            ("  ", normal)
        };
        lines.push(Line::from(Span::styled(format!("{}{}", prefix, option), style)));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Use ↑↓ to navigate, Enter to confirm, Esc to cancel",
        normal,
    )));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Confirm Delete")
                .title_alignment(Alignment::Center)
                .style(normal),
        )
        .style(normal)
        .wrap(ratatui::widgets::Wrap { trim: true })
        .alignment(Alignment::Center);

    f.render_widget(paragraph, popup_area);
}
