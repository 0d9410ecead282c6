use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// Centered rect using a percentage of the available area.
/// Based on ratatui popup example: https://ratatui.rs/examples/apps/popup/
pub fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

/// Centered rect with a fixed size, clamped to the available area
pub fn fixed_popup_area(area: Rect, width: u16, height: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height.min(area.height))]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Length(width.min(area.width))]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}
