//! Single-legislator detail view.

use crate::cache::SecurityCache;
use crate::domain::{LegislatorProfile, TradeRecord};
use crate::enrich::enrich_trade;
use crate::error::AppError;
use crate::repo::TradeRepository;
use crate::roster::RosterIndex;

use super::{PROFILE_PAGE_SIZE, paginate};

/// Trade history for the legislator whose name matches `name` exactly (after
/// URL-decoding and trimming), newest first. Only the requested page is
/// enriched.
pub fn query_legislator(
    repo: &TradeRepository,
    roster: &RosterIndex,
    cache: &SecurityCache,
    name: &str,
    page: usize,
) -> Result<LegislatorProfile, AppError> {
    let decoded = percent_decode(name);
    let wanted = decoded.trim();

    let mut trades: Vec<&TradeRecord> = repo.iter().filter(|t| t.name.trim() == wanted).collect();
    if trades.is_empty() {
        return Err(AppError::NotFound(wanted.to_string()));
    }

    // Stable: same-day trades keep feed order.
    trades.sort_by(|a, b| b.traded.cmp(&a.traded));

    let head = trades[0];
    let bioguide = head.bioguide();
    let (name, party, chamber) = (head.name.clone(), head.party.clone(), head.chamber.clone());
    let state = roster.state_of(bioguide).to_string();
    let committees = roster.committees_of(bioguide).to_vec();

    let trades = paginate(trades, page, PROFILE_PAGE_SIZE).map(|t| enrich_trade(t, cache, roster));

    Ok(LegislatorProfile {
        name,
        party,
        chamber,
        state,
        committees,
        trades,
    })
}

/// Decode `%XX` escapes. Malformed escapes are kept literally; `+` is not a space.
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out: Vec<u8> = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hi = (bytes[i + 1] as char).to_digit(16);
            let lo = (bytes[i + 2] as char).to_digit(16);
            if let (Some(hi), Some(lo)) = (hi, lo) {
                out.push(((hi << 4) | lo) as u8);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}
