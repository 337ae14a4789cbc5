#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;

use super::util::*;

// ── truncate ──────────────────────────────────────────────────

#[test]
fn test_truncate_short_string() {
    assert_eq!(truncate("lunch", 10), "lunch");
}

#[test]
fn test_truncate_exact_length() {
    assert_eq!(truncate("lunch", 5), "lunch");
}

#[test]
fn test_truncate_long_string() {
    assert_eq!(truncate("food lunch at work", 5), "food…");
}

#[test]
fn test_truncate_empty() {
    assert_eq!(truncate("", 5), "");
}

#[test]
fn test_truncate_zero_max() {
    assert_eq!(truncate("lunch", 0), "");
}

#[test]
fn test_truncate_unicode() {
    assert_eq!(truncate("चाय नाश्ता", 4), "चाय…");
}

#[test]
fn test_truncate_one_char() {
    // max=1 always collapses to the ellipsis
    assert_eq!(truncate("ab", 1), "…");
    assert_eq!(truncate("a", 1), "a");
}

// ── format_amount ─────────────────────────────────────────────

#[test]
fn test_format_amount_basic() {
    assert_eq!(format_amount(dec!(1234.56), "₹"), "₹1,234.56");
}

#[test]
fn test_format_amount_other_symbol() {
    assert_eq!(format_amount(dec!(999.99), "$"), "$999.99");
}

#[test]
fn test_format_amount_zero() {
    assert_eq!(format_amount(dec!(0), "₹"), "₹0.00");
}

#[test]
fn test_format_amount_negative() {
    assert_eq!(format_amount(dec!(-42.50), "₹"), "-₹42.50");
}

#[test]
fn test_format_amount_large() {
    assert_eq!(format_amount(dec!(1234567.89), "₹"), "₹1,234,567.89");
}

#[test]
fn test_format_amount_pads_to_two_decimals() {
    assert_eq!(format_amount(dec!(1.5), "₹"), "₹1.50");
    assert_eq!(format_amount(dec!(5), "₹"), "₹5.00");
}

#[test]
fn test_format_amount_rounds_half_away_from_zero() {
    assert_eq!(format_amount(dec!(15.005), "₹"), "₹15.01");
    assert_eq!(format_amount(dec!(33.333), "₹"), "₹33.33");
}

#[test]
fn test_format_amount_empty_symbol() {
    assert_eq!(format_amount(dec!(10), ""), "10.00");
}

// ── scrolling ─────────────────────────────────────────────────

#[test]
fn test_scroll_down_moves_window() {
    let (mut index, mut scroll) = (0, 0);
    for _ in 0..5 {
        scroll_down(&mut index, &mut scroll, 10, 3);
    }
    assert_eq!((index, scroll), (5, 3));
}

#[test]
fn test_scroll_down_stops_at_end() {
    let (mut index, mut scroll) = (1, 0);
    scroll_down(&mut index, &mut scroll, 2, 5);
    assert_eq!(index, 1);
}

#[test]
fn test_scroll_up_pulls_window() {
    let (mut index, mut scroll) = (3, 3);
    scroll_up(&mut index, &mut scroll);
    assert_eq!((index, scroll), (2, 2));
}

#[test]
fn test_scroll_to_bottom_and_top() {
    let (mut index, mut scroll) = (0, 0);
    scroll_to_bottom(&mut index, &mut scroll, 10, 4);
    assert_eq!((index, scroll), (9, 6));
    scroll_to_top(&mut index, &mut scroll);
    assert_eq!((index, scroll), (0, 0));
}

#[test]
fn test_clamp_cursor_after_shrink() {
    let (mut index, mut scroll) = (7, 5);
    clamp_cursor(&mut index, &mut scroll, 3);
    assert_eq!((index, scroll), (2, 2));

    clamp_cursor(&mut index, &mut scroll, 0);
    assert_eq!((index, scroll), (0, 0));
}

// ── bar_value ─────────────────────────────────────────────────

#[test]
fn test_bar_value_whole_units() {
    assert_eq!(bar_value(dec!(30)), 30);
    assert_eq!(bar_value(dec!(12.4)), 12);
}

#[test]
fn test_bar_value_small_amount_visible() {
    assert_eq!(bar_value(dec!(0.25)), 1);
    assert_eq!(bar_value(dec!(0)), 0);
}

// ── category chart ────────────────────────────────────────────

fn breakdown(descriptions: &[(&str, rust_decimal::Decimal)]) -> crate::analytics::CategoryBreakdown {
    let records: Vec<crate::models::Expense> = descriptions
        .iter()
        .enumerate()
        .map(|(i, (description, amount))| crate::models::Expense {
            id: i as i64 + 1,
            date: chrono::NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
            amount: *amount,
            description: (*description).to_string(),
        })
        .collect();
    crate::analytics::categorize(&records)
}

#[test]
fn test_category_display_empty_is_dash() {
    assert_eq!(category_display(""), "—");
    assert_eq!(category_display("food"), "Food");
}

#[test]
fn test_category_bars_fit() {
    let categories = breakdown(&[("food lunch", dec!(10)), ("", dec!(5))]);
    assert_eq!(
        category_bars(&categories, 12),
        vec![("Food".to_string(), dec!(10)), ("—".to_string(), dec!(5))]
    );
}

#[test]
fn test_category_bars_overflow_folded() {
    let categories = breakdown(&[
        ("food", dec!(10)),
        ("rent", dec!(20)),
        ("bus", dec!(3)),
        ("gym", dec!(4)),
        ("tea", dec!(1)),
    ]);
    let bars = category_bars(&categories, 3);
    assert_eq!(
        bars,
        vec![
            ("Food".to_string(), dec!(10)),
            ("Rent".to_string(), dec!(20)),
            ("+3 more".to_string(), dec!(8)),
        ]
    );
    // Nothing dropped
    let charted: rust_decimal::Decimal = bars.iter().map(|(_, v)| *v).sum();
    assert_eq!(charted, categories.total());
    assert_eq!(categories.share_of(dec!(8)), Some(dec!(21.1)));
}
