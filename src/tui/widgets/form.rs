use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::Config;
use crate::tui::app::{TaskField, TaskForm};
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::editor::Editor;
use crate::tui::widgets::popup::fixed_popup_area;

/// Height of one bordered single-line input
pub const FIELD_HEIGHT: u16 = 3;

/// Draw a bordered input. Returns the cursor position when the field is active.
pub fn render_input_field(
    f: &mut Frame,
    area: Rect,
    label: &str,
    editor: &Editor,
    active: bool,
    masked: bool,
    config: &Config,
) -> Option<(u16, u16)> {
    let fg_color = parse_color(&config.colors.fg);
    let border_style = if active {
        Style::default()
            .fg(parse_color(&config.colors.highlight_bg))
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(fg_color)
    };

    let inner_width = area.width.saturating_sub(2) as usize;
    let (shown, _) = editor.visible(inner_width, masked);
    let paragraph = Paragraph::new(shown)
        .style(Style::default().fg(fg_color))
        .block(Block::default().borders(Borders::ALL).title(label).border_style(border_style));
    f.render_widget(paragraph, area);

    if active {
        editor.get_cursor_screen_pos(area)
    } else {
        None
    }
}

pub fn render_task_form(f: &mut Frame, area: Rect, form: &TaskForm, config: &Config) {
    let fg_color = parse_color(&config.colors.fg);
    let bg_color = parse_color(&config.colors.bg);

    let popup = fixed_popup_area(area, 50, FIELD_HEIGHT * 3 + 4);
    f.render_widget(Clear, popup);

    let title = if form.editing_task_id.is_some() { "Edit Task" } else { "New Task" };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(fg_color).bg(bg_color));
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let [title_area, start_area, end_area, hint_area] = Layout::vertical([
        Constraint::Length(FIELD_HEIGHT),
        Constraint::Length(FIELD_HEIGHT),
        Constraint::Length(FIELD_HEIGHT),
        Constraint::Min(1),
    ])
    .areas(inner);

    let fields = [
        (title_area, "Title", &form.title, TaskField::Title),
        (start_area, "Start (YYYY-MM-DD HH:MM)", &form.start, TaskField::Start),
        (end_area, "End (YYYY-MM-DD HH:MM)", &form.end, TaskField::End),
    ];

    let mut cursor = None;
    for (field_area, label, editor, field) in fields {
        let pos = render_input_field(f, field_area, label, editor, form.current_field == field, false, config);
        cursor = cursor.or(pos);
    }

    f.render_widget(
        Paragraph::new(Line::from("Tab: next field • Enter: save • Esc: cancel"))
            .style(Style::default().fg(fg_color).add_modifier(Modifier::DIM)),
        hint_area,
    );

    if let Some((x, y)) = cursor {
        f.set_cursor_position((x, y));
    }
}
