use rust_decimal::Decimal;

use crate::analytics::{CategoryBreakdown, CategoryTotal};
use crate::models::{category_label, to_cents};

/// Format an amount with the currency symbol, thousand separators and two
/// decimal places, e.g. `1234567.891` → `"₹1,234,567.89"`.
pub(crate) fn format_amount(val: Decimal, symbol: &str) -> String {
    let abs = to_cents(val.abs());
    let formatted = format!("{abs:.2}");
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next().unwrap_or("00");

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    if val < Decimal::ZERO {
        format!("-{symbol}{with_commas}.{dec_part}")
    } else {
        format!("{symbol}{with_commas}.{dec_part}")
    }
}

/// Truncate a string to `max` visible characters, appending "…" if truncated.
/// The result is at most `max` characters (counting "…" as one).
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if max == 0 {
        return String::new();
    }
    let char_count = s.chars().count();
    if char_count <= max {
        return s.to_string();
    }
    let truncated: String = s.chars().take(max.saturating_sub(1)).collect();
    format!("{truncated}…")
}

/// Move a list cursor down by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_down(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if *index + 1 < len {
        *index += 1;
        if *index >= *scroll + page {
            *scroll = index.saturating_sub(page - 1);
        }
    }
}

/// Move a list cursor up by one, adjusting scroll to keep cursor visible.
pub(crate) fn scroll_up(index: &mut usize, scroll: &mut usize) {
    *index = index.saturating_sub(1);
    if *index < *scroll {
        *scroll = *index;
    }
}

pub(crate) fn scroll_to_top(index: &mut usize, scroll: &mut usize) {
    *index = 0;
    *scroll = 0;
}

pub(crate) fn scroll_to_bottom(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if len > 0 {
        *index = len - 1;
        *scroll = index.saturating_sub(page.saturating_sub(1));
    }
}

/// Keep a cursor inside a list that may have shrunk after a refetch.
pub(crate) fn clamp_cursor(index: &mut usize, scroll: &mut usize, len: usize) {
    if *index >= len {
        *index = len.saturating_sub(1);
    }
    if *scroll > *index {
        *scroll = *index;
    }
}

/// Scale decimal amounts to `u64` bar heights in whole currency units.
/// Anything under one unit still gets a visible sliver.
pub(crate) fn bar_value(amount: Decimal) -> u64 {
    use rust_decimal::prelude::ToPrimitive;
    let units = amount.abs().round().to_u64().unwrap_or(u64::MAX);
    if units == 0 && !amount.is_zero() {
        1
    } else {
        units
    }
}

/// Display label for a category. The empty category shows as "—".
pub(crate) fn category_display(category: &str) -> String {
    if category.is_empty() {
        "—".to_string()
    } else {
        category_label(category)
    }
}

/// Labelled subtotals for the category chart, at most `max_bars` of them.
/// Categories that don't fit are summed into a trailing "+N more" bar.
pub(crate) fn category_bars(breakdown: &CategoryBreakdown, max_bars: usize) -> Vec<(String, Decimal)> {
    let label = |e: &CategoryTotal| (category_display(&e.category), e.subtotal);
    if breakdown.len() <= max_bars {
        return breakdown.iter().map(label).collect();
    }
    let shown = max_bars.saturating_sub(1);
    let mut bars: Vec<(String, Decimal)> = breakdown.iter().take(shown).map(label).collect();
    let rest: Decimal = breakdown.iter().skip(shown).map(|e| e.subtotal).sum();
    bars.push((format!("+{} more", breakdown.len() - shown), rest));
    bars
}
