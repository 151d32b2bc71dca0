//! Terminal tables for the three query views.

use crate::domain::{EnrichedTrade, LegislatorProfile, Page};
use crate::query::{AggregateView, TradeView};

/// Legislator listing plus the filter values available.
pub fn format_aggregates(view: &AggregateView) -> String {
    let mut out = String::new();

    out.push_str("=== Congressional trading: legislators ===\n");
    out.push_str(&page_line(&view.page, "legislators"));
    out.push('\n');

    push_row(
        &mut out,
        format!(
            "{:<28} {:<6} {:<6} {:<5} {:>7} {:<12} {}",
            "name", "party", "chamb", "state", "trades", "first_seen", "committees"
        ),
    );
    push_row(
        &mut out,
        format!(
            "{:-<28} {:-<6} {:-<6} {:-<5} {:->7} {:-<12} {:-<10}",
            "", "", "", "", "", "", ""
        ),
    );

    for a in &view.page.items {
        push_row(
            &mut out,
            format!(
                "{:<28} {:<6} {:<6} {:<5} {:>7} {:<12} {}",
                truncate(&a.name, 28),
                truncate(&a.party, 6),
                truncate(&a.chamber, 6),
                a.state,
                a.trades,
                a.last_traded,
                a.committees.len(),
            ),
        );
    }

    out.push('\n');
    out.push_str(&options_line("Parties", &view.options.parties));
    out.push_str(&options_line("States", &view.options.states));
    out.push_str(&format!("Committees: {} available\n", view.options.committees.len()));

    out
}

/// Flat trade listing with the window actually applied.
pub fn format_trades(view: &TradeView) -> String {
    let mut out = String::new();

    out.push_str("=== Congressional trading: trades ===\n");
    out.push_str(&format!("Traded on or after: {}\n", view.after.date()));
    out.push_str(&page_line(&view.page, "trades"));
    out.push('\n');
    out.push_str(&trade_table(&view.page.items, true));

    out.push('\n');
    out.push_str(&options_line("Industries", &view.options.industries));
    out.push_str(&options_line("Transactions", &view.options.transactions));
    out.push_str(&options_line("Sizes", &view.options.sizes));

    out
}

/// One legislator's header and a page of their trade history.
pub fn format_profile(profile: &LegislatorProfile) -> String {
    let mut out = String::new();

    out.push_str(&format!("=== {} ===\n", profile.name));
    out.push_str(&format!(
        "Party: {} | Chamber: {} | State: {}\n",
        or_dash(&profile.party),
        or_dash(&profile.chamber),
        or_dash(&profile.state),
    ));
    if profile.committees.is_empty() {
        out.push_str("Committees: -\n");
    } else {
        out.push_str("Committees:\n");
        for committee in &profile.committees {
            out.push_str(&format!("- {committee}\n"));
        }
    }
    out.push('\n');
    out.push_str(&page_line(&profile.trades, "trades"));
    out.push('\n');
    out.push_str(&trade_table(&profile.trades.items, false));

    out
}

fn trade_table(trades: &[EnrichedTrade], with_name: bool) -> String {
    let mut out = String::new();
    let name_col = |s: &str| if with_name { format!("{:<24} ", truncate(s, 24)) } else { String::new() };

    push_row(
        &mut out,
        format!(
            "{}{:<10} {:<7} {:<24} {:<22} {:<10} {:<10}",
            name_col("name"),
            "traded",
            "ticker",
            "company",
            "industry",
            "tx",
            "size"
        ),
    );
    push_row(
        &mut out,
        format!(
            "{}{:-<10} {:-<7} {:-<24} {:-<22} {:-<10} {:-<10}",
            if with_name { format!("{:-<24} ", "") } else { String::new() },
            "",
            "",
            "",
            "",
            "",
            ""
        ),
    );

    for t in trades {
        push_row(
            &mut out,
            format!(
                "{}{:<10} {:<7} {:<24} {:<22} {:<10} {:<10}",
                name_col(&t.name),
                truncate(&t.traded, 10),
                truncate(&t.ticker, 7),
                truncate(&t.company_name, 24),
                truncate(&t.industry, 22),
                truncate(&t.transaction, 10),
                t.size.label(),
            ),
        );
    }

    out
}

fn page_line<T>(page: &Page<T>, noun: &str) -> String {
    format!(
        "Page {} of {} ({} {noun})\n",
        page.page,
        page.total_pages.max(1),
        page.total
    )
}

fn options_line<S: AsRef<str>>(label: &str, values: &[S]) -> String {
    let joined: Vec<&str> = values.iter().map(AsRef::as_ref).collect();
    if joined.is_empty() {
        format!("{label}: -\n")
    } else {
        format!("{label}: {}\n", joined.join(", "))
    }
}

fn push_row(out: &mut String, row: String) {
    out.push_str(row.trim_end());
    out.push('\n');
}

fn or_dash(s: &str) -> &str {
    if s.is_empty() { "-" } else { s }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}
