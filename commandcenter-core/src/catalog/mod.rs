// File: src/catalog/mod.rs
//
// Offline catalog build: commands.csv -> commands.json / bits.json / points.json.

pub mod builder;
pub mod csv;
pub mod permissions;
pub mod query;
pub mod snapshot;

use std::fs;

use tracing::debug;

use crate::Error;
use crate::config::{BuildMode, CatalogPaths};

pub use builder::{CompiledCatalog, compile_catalog};
pub use csv::parse_csv;
pub use permissions::classify_permissions;
pub use query::{search_commands, search_rewards};
pub use snapshot::load_catalog;

/// Counts from a completed build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub commands: usize,
    pub bits: usize,
    pub points: usize,
    /// False when a legacy (no `Type`) CSV left existing reward snapshots alone.
    pub rewards_written: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// No CSV (or an empty one): nothing to rebuild.
    Skipped,
    Built(BuildReport),
}

/// Reads `paths.csv` and rewrites the snapshots.
///
/// Reward snapshots are only written when the CSV has a `Type` column or a
/// reward snapshot already exists, so a command-only CSV never wipes curated
/// reward data it knows nothing about.
pub fn build_catalog(paths: &CatalogPaths, mode: BuildMode) -> Result<BuildOutcome, Error> {
    if !paths.csv.exists() {
        debug!("No catalog input at {}; nothing to build", paths.csv.display());
        return Ok(BuildOutcome::Skipped);
    }

    let text = fs::read_to_string(&paths.csv)?;
    let rows = parse_csv(&text);
    if rows.is_empty() {
        return Ok(BuildOutcome::Skipped);
    }

    let CompiledCatalog { catalog, has_type_column } = compile_catalog(&rows, mode)?;

    snapshot::write_commands(&paths.commands, &catalog.commands)?;

    let rewards_written = has_type_column || paths.bits.exists() || paths.points.exists();
    if rewards_written {
        snapshot::write_bits(&paths.bits, &catalog.bits)?;
        snapshot::write_points(&paths.points, &catalog.points)?;
    } else {
        debug!("No Type column and no reward snapshots; leaving rewards untouched");
    }

    Ok(BuildOutcome::Built(BuildReport {
        commands: catalog.commands.len(),
        bits: catalog.bits.len(),
        points: catalog.points.len(),
        rewards_written,
    }))
}
