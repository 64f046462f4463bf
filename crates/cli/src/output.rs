//! Plain-text rendering of controller state.

use std::io::{self, Write};

use order_desk_admin::orders::{OrderListState, OrderRow, Pagination, StatsView};

/// Orders table for the current page.
pub fn orders_table(out: &mut impl Write, rows: &[OrderRow]) -> io::Result<()> {
    writeln!(
        out,
        "{:<8} {:<24} {:<11} {:>5} {:>11}  {:<16}  {}",
        "ORDER", "CUSTOMER", "STATUS", "ITEMS", "TOTAL", "CREATED", "SHIP TO"
    )?;
    for row in rows {
        writeln!(
            out,
            "{:<8} {:<24} {:<11} {:>5} {:>11}  {:<16}  {}",
            row.number,
            truncate(&row.customer, 24),
            row.status_label,
            row.item_count,
            row.total,
            row.created_at,
            row.destination
        )?;
    }
    Ok(())
}

/// "Page 2 of 5 (orders 21-40 of 97)".
pub fn pagination(out: &mut impl Write, pagination: &Pagination) -> io::Result<()> {
    match pagination.showing() {
        Some((first, last)) => writeln!(
            out,
            "Page {} of {} (orders {first}-{last} of {})",
            pagination.page, pagination.total_pages, pagination.total_orders
        ),
        None => writeln!(out, "No orders"),
    }
}

pub fn stats(out: &mut impl Write, stats: &StatsView) -> io::Result<()> {
    writeln!(out, "Orders:          {}", stats.total_orders)?;
    writeln!(out, "Revenue:         {}", stats.total_revenue)?;
    writeln!(out, "Average order:   {}", stats.average_order_value)?;
    for (status, count) in &stats.by_status {
        writeln!(out, "  {:<12} {count}", status.label())?;
    }
    Ok(())
}

/// Full list view: the table and pagination, or the empty notice.
pub fn order_list(out: &mut impl Write, state: &OrderListState) -> io::Result<()> {
    if state.is_empty() {
        writeln!(out, "No orders match the current filters.")?;
    } else {
        orders_table(out, &state.rows())?;
        writeln!(out)?;
        pagination(out, &state.pagination())?;
    }
    Ok(())
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let mut truncated: String = value.chars().take(max.saturating_sub(1)).collect();
    truncated.push('…');
    truncated
}
