//! Per-legislator listing.

use std::collections::BTreeSet;

use crate::domain::{LegislatorAggregate, Page};
use crate::enrich::group_by_legislator;
use crate::repo::TradeRepository;
use crate::roster::RosterIndex;

use super::{AGGREGATE_PAGE_SIZE, paginate};

/// Empty fields do not filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateFilters {
    /// Case-insensitive substring of the legislator name.
    pub name: String,
    pub party: String,
    pub state: String,
    /// Exact committee display name.
    pub committee: String,
}

impl AggregateFilters {
    fn matches(&self, aggregate: &LegislatorAggregate, name_needle: &str) -> bool {
        aggregate.name.to_lowercase().contains(name_needle)
            && (self.party.is_empty() || aggregate.party == self.party)
            && (self.state.is_empty() || aggregate.state == self.state)
            && (self.committee.is_empty() || aggregate.committees.contains(&self.committee))
    }
}

/// Picker values across all legislators, regardless of the active filters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateOptions {
    pub parties: Vec<String>,
    pub states: Vec<String>,
    pub committees: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AggregateView {
    pub page: Page<LegislatorAggregate>,
    pub options: AggregateOptions,
}

/// Legislators ranked by trade count (ties keep first-seen order).
pub fn query_aggregates(
    repo: &TradeRepository,
    roster: &RosterIndex,
    filters: &AggregateFilters,
    page: usize,
) -> AggregateView {
    let grouped = group_by_legislator(repo, roster);
    let options = collect_options(&grouped);

    let needle = filters.name.to_lowercase();
    let mut matched: Vec<LegislatorAggregate> = grouped
        .into_iter()
        .filter(|a| filters.matches(a, &needle))
        .collect();
    matched.sort_by(|a, b| b.trades.cmp(&a.trades));

    AggregateView {
        page: paginate(matched, page, AGGREGATE_PAGE_SIZE),
        options,
    }
}

fn collect_options(grouped: &[LegislatorAggregate]) -> AggregateOptions {
    let mut parties = BTreeSet::new();
    let mut states = BTreeSet::new();
    let mut committees = BTreeSet::new();
    for aggregate in grouped {
        parties.insert(aggregate.party.as_str());
        states.insert(aggregate.state.as_str());
        committees.extend(aggregate.committees.iter().map(String::as_str));
    }

    AggregateOptions {
        parties: non_empty(parties),
        states: non_empty(states),
        committees: non_empty(committees),
    }
}

fn non_empty(values: BTreeSet<&str>) -> Vec<String> {
    values
        .into_iter()
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}
