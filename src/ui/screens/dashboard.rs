use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph, Sparkline},
    Frame,
};

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{bar_value, category_bars, category_display, truncate};

const MAX_BARS: usize = 12;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Summary cards
            Constraint::Min(10),   // Category chart
            Constraint::Length(3), // Daily trend sparkline
        ])
        .split(area);

    render_summary_cards(f, chunks[0], app);
    render_category_chart(f, chunks[1], app);
    render_trend_sparkline(f, chunks[2], app);
}

fn render_summary_cards(f: &mut Frame, area: Rect, app: &App) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
            Constraint::Percentage(25),
        ])
        .split(area);

    let summary = &app.state().summary;
    let none = "—".to_string();

    render_card(
        f,
        cards[0],
        "Total",
        app.format_amount(summary.total),
        theme::RED,
        Some(app.state().describe_range()),
    );
    render_card(
        f,
        cards[1],
        "Average",
        summary
            .average
            .map_or_else(|| none.clone(), |avg| app.format_amount(avg)),
        theme::YELLOW,
        Some("per expense".into()),
    );
    render_card(
        f,
        cards[2],
        "Highest",
        summary
            .max
            .map_or_else(|| none.clone(), |max| app.format_amount(max)),
        theme::ACCENT,
        None,
    );
    render_card(
        f,
        cards[3],
        "Count",
        summary.count.to_string(),
        theme::GREEN,
        Some(format!("of {} fetched", app.state().fetched)),
    );
}

fn render_card(
    f: &mut Frame,
    area: Rect,
    title: &str,
    display: String,
    color: Color,
    subtitle: Option<String>,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style())
        .title(Span::styled(
            format!(" {title} "),
            theme::title_style(),
        ));

    let sub_text = subtitle.unwrap_or_default();

    let text = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            display,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(sub_text, theme::dim_style())),
    ])
    .centered()
    .block(block);

    f.render_widget(text, area);
}

fn chart_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme::border_style())
        .title(Span::styled(
            format!(" {title} "),
            theme::title_style(),
        ))
}

fn render_category_chart(f: &mut Frame, area: Rect, app: &App) {
    let state = app.state();
    let categories = &state.categories;

    if state.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("No expenses in this range ({})", state.describe_range()),
                theme::dim_style(),
            )),
            Line::from(Span::styled(
                "Add one with a, or change the range with H/L or :filter",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(chart_block("Spending by Category"));
        f.render_widget(msg, area);
        return;
    }

    // A single bar says nothing a sentence can't
    if categories.len() == 1 {
        let lines: Vec<Line> = categories
            .iter()
            .map(|entry| {
                Line::from(vec![
                    Span::styled(
                        format!("{}: ", category_display(&entry.category)),
                        theme::normal_style(),
                    ),
                    Span::styled(
                        app.format_amount(entry.subtotal),
                        Style::default()
                            .fg(theme::ACCENT)
                            .add_modifier(Modifier::BOLD),
                    ),
                ])
            })
            .collect();
        let mut text = vec![Line::from("")];
        text.extend(lines);
        let msg = Paragraph::new(text)
            .centered()
            .block(chart_block("Spending by Category"));
        f.render_widget(msg, area);
        return;
    }

    let bars: Vec<Bar> = category_bars(categories, MAX_BARS)
        .into_iter()
        .map(|(label, subtotal)| {
            let share = categories
                .share_of(subtotal)
                .map(|pct| format!("{pct}%"))
                .unwrap_or_default();
            Bar::default()
                .value(bar_value(subtotal))
                .label(Line::from(truncate(&label, 10)))
                .text_value(share)
                .style(Style::default().fg(theme::ACCENT))
                .value_style(
                    Style::default()
                        .fg(theme::TEXT)
                        .add_modifier(Modifier::BOLD),
                )
        })
        .collect();

    let chart = BarChart::default()
        .block(chart_block("Spending by Category"))
        .data(BarGroup::default().bars(&bars))
        .bar_width(10)
        .bar_gap(1)
        .bar_style(Style::default().fg(theme::ACCENT))
        .value_style(Style::default().fg(theme::TEXT));

    f.render_widget(chart, area);
}

fn render_trend_sparkline(f: &mut Frame, area: Rect, app: &App) {
    let data: Vec<u64> = app
        .state()
        .timeline
        .iter()
        .map(|(_, total)| bar_value(*total))
        .collect();

    let sparkline = Sparkline::default()
        .block(chart_block("Daily Spending"))
        .data(&data)
        .style(Style::default().fg(theme::YELLOW));

    f.render_widget(sparkline, area);
}
