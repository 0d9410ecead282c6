use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::Config;
use crate::tui::app::{LoginField, LoginState};
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::form::{render_input_field, FIELD_HEIGHT};
use crate::tui::widgets::popup::fixed_popup_area;

pub fn render_login(f: &mut Frame, area: Rect, login: &LoginState, config: &Config) {
    let fg_color = parse_color(&config.colors.fg);
    let bg_color = parse_color(&config.colors.bg);

    let panel = fixed_popup_area(area, 44, FIELD_HEIGHT * 2 + 5);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Log in ")
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(fg_color).bg(bg_color));
    let inner = block.inner(panel);
    f.render_widget(block, panel);

    let [user_area, pass_area, _, hint_area] = Layout::vertical([
        Constraint::Length(FIELD_HEIGHT),
        Constraint::Length(FIELD_HEIGHT),
        Constraint::Length(1),
        Constraint::Min(1),
    ])
    .areas(inner);

    let user_cursor = render_input_field(
        f,
        user_area,
        "Username",
        &login.username,
        login.current_field == LoginField::Username,
        false,
        config,
    );
    let pass_cursor = render_input_field(
        f,
        pass_area,
        "Password",
        &login.password,
        login.current_field == LoginField::Password,
        true,
        config,
    );

    f.render_widget(
        Paragraph::new("Enter: log in • Ctrl+r: register")
            .alignment(Alignment::Center)
            .style(Style::default().fg(fg_color).add_modifier(Modifier::DIM)),
        hint_area,
    );

    if let Some((x, y)) = user_cursor.or(pass_cursor) {
        f.set_cursor_position((x, y));
    }
}
