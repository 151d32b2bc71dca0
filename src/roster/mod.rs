//! Legislator and committee lookup tables.
//!
//! Built once at startup from the roster YAML files and read-only afterward:
//!
//! - bioguide id -> two-letter state (last term of the last roster that lists the id)
//! - bioguide id -> sorted, deduplicated committee display names

use std::collections::{BTreeSet, HashMap};

use tracing::{debug, info};

use crate::domain::AppConfig;
use crate::error::AppError;

pub mod files;

use files::{CommitteeDoc, LegislatorDoc, MembershipTable};

#[derive(Debug, Clone, Default)]
pub struct RosterIndex {
    states: HashMap<String, String>,
    committees: HashMap<String, Vec<String>>,
    committee_names: HashMap<String, String>,
}

impl RosterIndex {
    /// Load every roster file named by `config`. Any missing or unparsable file
    /// is fatal.
    pub fn load(config: &AppConfig) -> Result<Self, AppError> {
        let mut rosters = Vec::new();
        for path in config.legislator_files() {
            let docs = files::load_legislators(&path)?;
            debug!(path = %path.display(), people = docs.len(), "loaded legislator roster");
            rosters.push(docs);
        }
        let committees = files::load_committees(&config.committees_file())?;
        let membership = files::load_membership(&config.membership_file())?;

        let index = Self::build(&rosters, &membership, &committees);
        info!(
            legislators = index.states.len(),
            committees = index.committee_names.len(),
            members_with_committees = index.committees.len(),
            "roster index built"
        );
        Ok(index)
    }

    pub fn build(
        rosters: &[Vec<LegislatorDoc>],
        membership: &MembershipTable,
        committees: &[CommitteeDoc],
    ) -> Self {
        let committee_names = expand_committee_ids(committees);
        Self {
            states: build_state_lookup(rosters),
            committees: resolve_memberships(membership, &committee_names),
            committee_names,
        }
    }

    /// State for a bioguide id, `""` when unknown.
    pub fn state_of(&self, bioguide: &str) -> &str {
        self.states.get(bioguide).map(String::as_str).unwrap_or("")
    }

    /// Committees for a bioguide id, empty when unknown.
    pub fn committees_of(&self, bioguide: &str) -> &[String] {
        self.committees.get(bioguide).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn committee_name(&self, committee_id: &str) -> Option<&str> {
        self.committee_names.get(committee_id).map(String::as_str)
    }

    pub fn legislator_count(&self) -> usize {
        self.states.len()
    }
}

/// Last term wins within a person; later rosters win across files.
pub fn build_state_lookup(rosters: &[Vec<LegislatorDoc>]) -> HashMap<String, String> {
    let mut lookup = HashMap::new();
    for person in rosters.iter().flatten() {
        let Some(bioguide) = person.id.bioguide.as_deref().filter(|id| !id.is_empty()) else {
            continue;
        };
        let state = person
            .terms
            .last()
            .and_then(|term| term.state.as_deref())
            .filter(|s| !s.is_empty());
        if let Some(state) = state {
            lookup.insert(bioguide.to_string(), state.to_string());
        }
    }
    lookup
}

/// Committee id -> display name, including `parent id + suffix` for every
/// subcommittee. Subcommittees carry the parent committee's name.
pub fn expand_committee_ids(committees: &[CommitteeDoc]) -> HashMap<String, String> {
    let mut names = HashMap::new();
    for entry in committees {
        let Some(base_id) = entry.thomas_id.as_deref().filter(|id| !id.is_empty()) else {
            continue;
        };
        let base_name = entry
            .name
            .clone()
            .unwrap_or_else(|| format!("Committee {base_id}"));
        names.insert(base_id.to_string(), base_name);

        for sub in &entry.subcommittees {
            let full_id = format!("{base_id}{}", sub.thomas_id.as_deref().unwrap_or(""));
            let name = entry
                .name
                .clone()
                .unwrap_or_else(|| format!("Committee {full_id}"));
            names.insert(full_id, name);
        }
    }
    names
}

/// Bioguide id -> sorted committee names. Unresolvable committee ids are skipped.
pub fn resolve_memberships(
    membership: &MembershipTable,
    names: &HashMap<String, String>,
) -> HashMap<String, Vec<String>> {
    let mut sets: HashMap<String, BTreeSet<String>> = HashMap::new();
    for (committee_id, members) in membership {
        let name = names.get(committee_id);
        for member in members {
            let Some(bioguide) = member.bioguide.as_deref().filter(|id| !id.is_empty()) else {
                continue;
            };
            let set = sets.entry(bioguide.to_string()).or_default();
            if let Some(name) = name {
                set.insert(name.clone());
            }
        }
    }

    sets.into_iter()
        .map(|(bioguide, set)| (bioguide, set.into_iter().collect()))
        .collect()
}
