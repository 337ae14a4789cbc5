use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{category_display, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App) {
    let state = app.state();
    let title = format!(" Expenses ({}) {} ", state.expenses.len(), state.describe_range());

    if state.is_empty() {
        let msg = vec![
            Line::from(""),
            Line::from(Span::styled(
                "No expenses in this range",
                theme::dim_style(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press a to add one, or :filter <start|-> <end|-> to widen the range",
                theme::dim_style(),
            )),
        ];
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style())
            .title(Span::styled(
                title,
                theme::title_style(),
            ));
        f.render_widget(Paragraph::new(msg).centered().block(block), area);
        return;
    }

    let header_cells = ["Date", "Amount", "Description", "Category"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = state
        .expenses
        .iter()
        .enumerate()
        .skip(app.expense_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, expense)| {
            let style = if i == app.expense_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };

            let category = category_display(&expense.category());

            Row::new(vec![
                Cell::from(format!("  {}", expense.date)),
                Cell::from(Span::styled(
                    app.format_amount(expense.amount),
                    theme::amount_style(),
                )),
                Cell::from(truncate(&expense.description, 40)),
                Cell::from(category),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(14),
        Constraint::Length(14),
        Constraint::Min(20),
        Constraint::Length(16),
    ];

    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_style())
            .title(Span::styled(
                title,
                theme::title_style(),
            )),
    );

    f.render_widget(table, area);
}
