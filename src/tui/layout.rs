use ratatui::layout::{Constraint, Direction, Layout as RatLayout, Rect};

pub struct Layout {
    pub inner_area: Rect, // Area inside the outer border
    pub calendar_area: Rect,
    pub day_area: Rect,
    pub status_area: Rect,
}

impl Layout {
    /// Width of the month grid: 7 columns of 5 cells plus borders
    pub const CALENDAR_WIDTH: u16 = 7 * 5 + 2;
    /// Minimum inner size: the grid beside a narrow day list, header + 6 weeks + borders
    pub const MIN_WIDTH: u16 = Self::CALENDAR_WIDTH + 20;
    pub const MIN_HEIGHT: u16 = 12;

    pub fn calculate(size: Rect) -> Self {
        let width = size.width.max(Self::MIN_WIDTH + 2);
        let height = size.height.max(Self::MIN_HEIGHT + 2);
        let size = Rect::new(size.x, size.y, width, height);

        let inner_area = Rect::new(
            size.x + 1,
            size.y + 1,
            size.width.saturating_sub(2),
            size.height.saturating_sub(2),
        );

        // Content, then a one-line status bar
        let vertical = RatLayout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(inner_area);

        // Month grid on the left, selected day's tasks on the right
        let horizontal = RatLayout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(Self::CALENDAR_WIDTH), Constraint::Min(1)])
            .split(vertical[0]);

        Self {
            inner_area,
            calendar_area: horizontal[0],
            day_area: horizontal[1],
            status_area: vertical[1],
        }
    }
}
