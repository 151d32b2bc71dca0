//! YAML roster documents.
//!
//! Only the fields the index needs are modeled; everything else in the
//! upstream files is ignored. Ids are sometimes written unquoted and parse as
//! YAML numbers, so id fields go through `yaml_text`.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use crate::error::AppError;

/// A person in `legislators-*.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegislatorDoc {
    #[serde(default)]
    pub id: LegislatorIds,
    #[serde(default)]
    pub terms: Vec<TermDoc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LegislatorIds {
    #[serde(default, deserialize_with = "yaml_text")]
    pub bioguide: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TermDoc {
    #[serde(default, deserialize_with = "yaml_text")]
    pub state: Option<String>,
}

/// A committee in `committees-historical.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CommitteeDoc {
    #[serde(default, deserialize_with = "yaml_text")]
    pub thomas_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub subcommittees: Vec<SubcommitteeDoc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubcommitteeDoc {
    /// Suffix appended to the parent's id.
    #[serde(default, deserialize_with = "yaml_text")]
    pub thomas_id: Option<String>,
}

/// An entry under a committee id in `committee-membership-current.yaml`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberDoc {
    #[serde(default, deserialize_with = "yaml_text")]
    pub bioguide: Option<String>,
}

/// Committee id -> members.
pub type MembershipTable = BTreeMap<String, Vec<MemberDoc>>;

pub fn load_legislators(path: &Path) -> Result<Vec<LegislatorDoc>, AppError> {
    read_yaml(path)
}

pub fn load_committees(path: &Path) -> Result<Vec<CommitteeDoc>, AppError> {
    read_yaml(path)
}

pub fn load_membership(path: &Path) -> Result<MembershipTable, AppError> {
    read_yaml(path)
}

fn read_yaml<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let text = fs::read_to_string(path)
        .map_err(|e| AppError::StartupData(format!("failed to read '{}': {e}", path.display())))?;
    serde_yaml::from_str(&text)
        .map_err(|e| AppError::StartupData(format!("failed to parse '{}': {e}", path.display())))
}

fn yaml_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    use serde_yaml::Value;

    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}
