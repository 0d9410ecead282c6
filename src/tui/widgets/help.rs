use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::Config;
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::popup::popup_area;
use crate::utils::format_key_binding_for_display as key;

pub fn render_help(f: &mut Frame, area: Rect, config: &Config) {
    let fg_color = parse_color(&config.colors.fg);
    let bg_color = parse_color(&config.colors.bg);

    let popup_area = popup_area(area, 60, 70);
    f.render_widget(Clear, popup_area);

    let paragraph = Paragraph::new(build_help_text(config))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help - Key Bindings")
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(fg_color).bg(bg_color)),
        )
        .style(Style::default().fg(fg_color).bg(bg_color))
        .wrap(ratatui::widgets::Wrap { trim: true });

    f.render_widget(paragraph, popup_area);
}

pub fn build_help_text(config: &Config) -> String {
    let kb = &config.key_bindings;
    let mut text = String::new();

    text.push_str("Calendar:\n");
    text.push_str("  ←/→: Previous/next day\n");
    text.push_str("  Shift+↑/↓: Previous/next week\n");
    text.push_str(&format!("  {} / {}: Previous/next month\n", key(&kb.prev_month), key(&kb.next_month)));
    text.push_str(&format!("  {}: Jump to today\n", key(&kb.today)));
    text.push('\n');

    text.push_str("Tasks:\n");
    text.push_str("  ↑/↓: Select task\n");
    text.push_str(&format!("  {}: New task on selected day\n", key(&kb.new)));
    text.push_str(&format!("  {}: Edit selected task\n", key(&kb.edit)));
    text.push_str(&format!("  {}: Delete selected task\n", key(&kb.delete)));
    text.push_str(&format!("  {}: Toggle completed\n", key(&kb.toggle_complete)));
    text.push('\n');

    text.push_str("Form:\n");
    text.push_str("  Tab/Shift+Tab: Next/previous field\n");
    text.push_str("  Enter: Save\n");
    text.push_str("  Esc: Cancel\n");
    text.push('\n');

    text.push_str("General:\n");
    text.push_str(&format!("  {}: Show/hide help\n", key(&kb.help)));
    text.push_str(&format!("  {}: Log out\n", key(&kb.logout)));
    text.push_str(&format!("  {}: Quit\n", key(&kb.quit)));

    text
}
