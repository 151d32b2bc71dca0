//! Joining trades with roster and security metadata.

use std::collections::HashMap;

use crate::cache::SecurityCache;
use crate::domain::{EnrichedTrade, LegislatorAggregate, SecurityInfo, TradeRecord};
use crate::roster::RosterIndex;

pub mod bucket;

pub use bucket::{bucket_amount, bucket_trade_size};

/// One aggregate per distinct legislator name, in first-seen order.
///
/// Grouping is by display name, not bioguide id, so two legislators sharing a
/// name share an aggregate. Everything except the count comes from the first
/// record seen for that name.
pub fn group_by_legislator<'a, I>(trades: I, roster: &RosterIndex) -> Vec<LegislatorAggregate>
where
    I: IntoIterator<Item = &'a TradeRecord>,
{
    let mut aggregates: Vec<LegislatorAggregate> = Vec::new();
    let mut slots: HashMap<&'a str, usize> = HashMap::new();

    for trade in trades {
        let slot = *slots.entry(trade.name.as_str()).or_insert_with(|| {
            let bioguide = trade.bioguide();
            aggregates.push(LegislatorAggregate {
                name: trade.name.clone(),
                party: trade.party.clone(),
                chamber: trade.chamber.clone(),
                state: roster.state_of(bioguide).to_string(),
                committees: roster.committees_of(bioguide).to_vec(),
                trades: 0,
                last_traded: trade.traded.clone(),
            });
            aggregates.len() - 1
        });
        aggregates[slot].trades += 1;
    }

    aggregates
}

/// Enrich a trade, resolving its ticker through the cache.
pub fn enrich_trade(trade: &TradeRecord, cache: &SecurityCache, roster: &RosterIndex) -> EnrichedTrade {
    let info = cache.lookup(&trade.ticker);
    enrich_with_info(trade, &info, roster)
}

/// Enrich a trade with security metadata that was already resolved.
pub fn enrich_with_info(trade: &TradeRecord, info: &SecurityInfo, roster: &RosterIndex) -> EnrichedTrade {
    EnrichedTrade {
        name: trade.name.clone(),
        bioguide_id: trade.bioguide_id.clone(),
        party: trade.party.clone(),
        chamber: trade.chamber.clone(),
        state: roster.state_of(trade.bioguide()).to_string(),
        ticker: trade.ticker.trim().to_uppercase(),
        company_name: info.name.clone(),
        industry: info.industry.clone(),
        transaction: trade.transaction.clone(),
        traded: trade.traded.clone(),
        filed: trade.filed.clone(),
        price: trade.price.clone(),
        size: bucket_trade_size(trade.trade_size_usd.as_deref()),
    }
}
