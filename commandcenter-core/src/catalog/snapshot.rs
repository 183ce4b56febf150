// ========================================================
// File: commandcenter-core/src/catalog/snapshot.rs
// ========================================================
//! JSON snapshot files consumed by the dashboard.
//!
//! Bits and channel-point records share a shape but name their cost field
//! differently (`costBits` / `costPoints`), so each gets its own wire struct.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::debug;

use commandcenter_common::models::{Catalog, ChatCommand, RewardEntry};

use crate::Error;
use crate::config::CatalogPaths;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BitsRecord {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub cost_bits: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsRecord {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default)]
    pub cost_points: u64,
}

impl From<&RewardEntry> for BitsRecord {
    fn from(r: &RewardEntry) -> Self {
        Self {
            title: r.title.clone(),
            description: r.description.clone(),
            notes: r.notes.clone(),
            category: r.category.clone(),
            cost_bits: r.cost,
        }
    }
}

impl From<BitsRecord> for RewardEntry {
    fn from(r: BitsRecord) -> Self {
        Self {
            title: r.title,
            description: r.description,
            cost: r.cost_bits,
            notes: r.notes,
            category: r.category,
        }
    }
}

impl From<&RewardEntry> for PointsRecord {
    fn from(r: &RewardEntry) -> Self {
        Self {
            title: r.title.clone(),
            description: r.description.clone(),
            notes: r.notes.clone(),
            category: r.category.clone(),
            cost_points: r.cost,
        }
    }
}

impl From<PointsRecord> for RewardEntry {
    fn from(r: PointsRecord) -> Self {
        Self {
            title: r.title,
            description: r.description,
            cost: r.cost_points,
            notes: r.notes,
            category: r.category,
        }
    }
}

/// Pretty JSON (2-space indent) plus a trailing newline.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), Error> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    fs::write(path, text)?;
    debug!("Wrote snapshot {}", path.display());
    Ok(())
}

pub fn write_commands(path: &Path, commands: &[ChatCommand]) -> Result<(), Error> {
    write_json(path, commands)
}

pub fn write_bits(path: &Path, rewards: &[RewardEntry]) -> Result<(), Error> {
    let records: Vec<BitsRecord> = rewards.iter().map(BitsRecord::from).collect();
    write_json(path, &records)
}

pub fn write_points(path: &Path, rewards: &[RewardEntry]) -> Result<(), Error> {
    let records: Vec<PointsRecord> = rewards.iter().map(PointsRecord::from).collect();
    write_json(path, &records)
}

fn read_json_or_empty<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, Error> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Loads all three snapshots. Missing files load as empty collections.
pub fn load_catalog(paths: &CatalogPaths) -> Result<Catalog, Error> {
    let commands: Vec<ChatCommand> = read_json_or_empty(&paths.commands)?;
    let bits: Vec<BitsRecord> = read_json_or_empty(&paths.bits)?;
    let points: Vec<PointsRecord> = read_json_or_empty(&paths.points)?;

    Ok(Catalog {
        commands,
        bits: bits.into_iter().map(RewardEntry::from).collect(),
        points: points.into_iter().map(RewardEntry::from).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn reward_records_use_currency_specific_cost_key() {
        let entry = RewardEntry {
            title: "Sound Alert".into(),
            description: "Plays a sound".into(),
            cost: 250,
            notes: None,
            category: None,
        };
        let bits = serde_json::to_value(BitsRecord::from(&entry)).unwrap();
        let points = serde_json::to_value(PointsRecord::from(&entry)).unwrap();
        assert_eq!(bits["costBits"], 250);
        assert_eq!(points["costPoints"], 250);
        assert!(bits.get("notes").is_none());
    }

    #[test]
    fn written_file_ends_with_newline_and_loads_back() {
        let dir = tempdir().unwrap();
        let paths = CatalogPaths::in_dir(dir.path());
        let entry = RewardEntry {
            title: "Hydrate".into(),
            description: "Drink water".into(),
            cost: 500,
            notes: Some("once per stream".into()),
            category: None,
        };
        write_points(&paths.points, std::slice::from_ref(&entry)).unwrap();

        let text = fs::read_to_string(&paths.points).unwrap();
        assert!(text.ends_with("]\n"));
        assert!(text.contains("\n  {"));

        let catalog = load_catalog(&paths).unwrap();
        assert!(catalog.commands.is_empty());
        assert_eq!(catalog.points, vec![entry]);
    }
}
