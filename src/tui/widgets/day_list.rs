use chrono::NaiveDate;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::Config;
use crate::marking::PeriodColor;
use crate::models::Task;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color, period_color};
use crate::utils::format_key_binding_for_display;

/// Time range as seen from `day`: times for that day, dates when the task spills over
pub fn format_range_for_day(task: &Task, day: NaiveDate) -> String {
    let start = if task.start_day() == day {
        task.start_date.format("%H:%M").to_string()
    } else {
        task.start_date.format("%m/%d %H:%M").to_string()
    };
    let end = if task.end_day() == day {
        task.end_date.format("%H:%M").to_string()
    } else {
        task.end_date.format("%m/%d %H:%M").to_string()
    };
    format!("{} - {}", start, end)
}

fn empty_hint(config: &Config) -> String {
    format!(
        "No tasks. Press {} to add one.",
        format_key_binding_for_display(&config.key_bindings.new)
    )
}

fn truncate(text: String, max_width: usize) -> String {
    if text.chars().count() > max_width {
        text.chars().take(max_width.saturating_sub(3)).collect::<String>() + "..."
    } else {
        text
    }
}

pub fn render_day_list(
    f: &mut Frame,
    area: Rect,
    day: NaiveDate,
    tasks: &[Task],
    list_state: &mut ListState,
    config: &Config,
) {
    let fg_color = parse_color(&config.colors.fg);
    let bg_color = parse_color(&config.colors.bg);
    let title = format!(" {} ({}) ", day.format("%a %Y-%m-%d"), tasks.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().fg(fg_color).bg(bg_color));

    if tasks.is_empty() {
        let paragraph = Paragraph::new(empty_hint(config)).block(block);
        f.render_widget(paragraph, area);
        return;
    }

    // 2 for borders, 2 for the status indicator
    let max_width = area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = tasks
        .iter()
        .map(|task| {
            let color = PeriodColor::for_task(task);
            let indicator = if task.completed { "✓" } else { "○" };
            let mut title_style = Style::default().fg(fg_color);
            if task.completed {
                title_style = title_style.add_modifier(Modifier::CROSSED_OUT);
            }
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(
                        format!("{} ", indicator),
                        Style::default().fg(period_color(config, color)),
                    ),
                    Span::styled(truncate(task.title.clone(), max_width), title_style),
                ]),
                Line::from(Span::styled(
                    format!("  {}", format_range_for_day(task, day)),
                    Style::default().fg(fg_color).add_modifier(Modifier::DIM),
                )),
            ])
        })
        .collect();

    let highlight_bg = parse_color(&config.colors.highlight_bg);
    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(highlight_bg)
                .fg(get_contrast_text_color(highlight_bg)),
        );

    f.render_stateful_widget(list, area, list_state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_shows_dates_only_for_other_days() {
        let day = NaiveDate::from_ymd_opt(2025, 7, 1).unwrap();
        let task = Task {
            id: 1,
            title: "Trip".to_string(),
            completed: false,
            start_date: NaiveDate::from_ymd_opt(2025, 6, 30).unwrap().and_hms_opt(18, 0, 0).unwrap(),
            end_date: day.and_hms_opt(11, 30, 0).unwrap(),
        };
        assert_eq!(format_range_for_day(&task, day), "06/30 18:00 - 11:30");
    }

    #[test]
    fn empty_hint_follows_new_binding() {
        let mut config = Config::default();
        config.key_bindings.new = "a".to_string();
        assert_eq!(empty_hint(&config), "No tasks. Press a to add one.");
    }
}
