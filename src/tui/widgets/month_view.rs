use chrono::{Datelike, NaiveDate};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::Config;
use crate::marking::{DayMarking, Markings, Period, PeriodColor};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color, period_color};
use crate::utils::{days_in_month, month_name};

const DAY_NAMES: [&str; 7] = [" Sun ", " Mon ", " Tue ", " Wed ", " Thu ", " Fri ", " Sat "];
/// Periods drawn per cell; the rest are summarised by "+"
const MAX_PERIOD_GLYPHS: usize = 2;

/// Glyph for one period: open on the left when it continues from the previous day,
/// open on the right when it continues into the next
pub fn period_glyph(period: &Period) -> char {
    match (period.starting_day, period.ending_day) {
        (true, true) => '■',
        (true, false) => '╺',
        (false, true) => '╸',
        (false, false) => '━',
    }
}

fn day_cell<'a>(
    day: u32,
    marking: Option<&DayMarking>,
    is_today: bool,
    config: &Config,
) -> Vec<Span<'a>> {
    let fg = parse_color(&config.colors.fg);
    let mut number_style = Style::default().fg(fg);
    if is_today {
        number_style = number_style.add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    }
    if marking.is_some_and(|m| m.selected) {
        let selected_bg = parse_color(&config.colors.selected);
        number_style = number_style.bg(selected_bg).fg(get_contrast_text_color(selected_bg));
    }

    let mut spans = vec![Span::raw(" "), Span::styled(format!("{:>2}", day), number_style)];

    let periods = marking.map(|m| m.periods.as_slice()).unwrap_or(&[]);
    for period in periods.iter().take(MAX_PERIOD_GLYPHS) {
        spans.push(Span::styled(
            period_glyph(period).to_string(),
            Style::default().fg(period_color(config, period.color)),
        ));
    }
    if periods.len() > MAX_PERIOD_GLYPHS {
        spans.pop();
        // Stays in the incomplete colour while anything on the day is open
        let color = if marking.is_some_and(DayMarking::has_incomplete) {
            PeriodColor::Incomplete
        } else {
            PeriodColor::Complete
        };
        spans.push(Span::styled("+", Style::default().fg(period_color(config, color))));
    }
    for _ in periods.len().min(MAX_PERIOD_GLYPHS)..MAX_PERIOD_GLYPHS {
        spans.push(Span::raw(" "));
    }
    spans
}

pub fn render_month_view(
    f: &mut Frame,
    area: Rect,
    year: i32,
    month: u32,
    markings: &Markings,
    today: NaiveDate,
    config: &Config,
) {
    let fg = parse_color(&config.colors.fg);
    let bg = parse_color(&config.colors.bg);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} {} ", month_name(month), year))
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(fg).bg(bg));

    let mut lines = vec![Line::from(
        DAY_NAMES
            .iter()
            .map(|d| Span::styled(*d, Style::default().fg(fg).add_modifier(Modifier::BOLD)))
            .collect::<Vec<_>>(),
    )];

    let Some(first_day) = NaiveDate::from_ymd_opt(year, month, 1) else {
        f.render_widget(Paragraph::new(lines).block(block), area);
        return;
    };
    let leading_blanks = first_day.weekday().num_days_from_sunday() as usize;
    let total_days = days_in_month(year, month);

    let mut cells: Vec<Vec<Span>> = vec![vec![Span::raw("     ")]; leading_blanks];
    for (offset, date) in first_day.iter_days().take(total_days as usize).enumerate() {
        cells.push(day_cell(offset as u32 + 1, markings.get(&date), date == today, config));
    }

    for week in cells.chunks(7) {
        lines.push(Line::from(week.concat()));
    }

    f.render_widget(Paragraph::new(lines).block(block), area);
}
