//! Turns parsed CSV rows into a [`Catalog`].
//!
//! Recognised headers (case-insensitive):
//! `Command, Description, Type, Category, Aliases, Permissions, Cost, Notes, Cooldown`.
//! Without a `Type` column every row is a chat command, which keeps older
//! command-only exports working.

use std::collections::HashSet;

use tracing::debug;

use commandcenter_common::models::{Catalog, ChatCommand, RewardEntry};

use crate::Error;
use crate::catalog::permissions::{roles_from_permissions, split_list};
use crate::config::BuildMode;

/// Record type declared in the `Type` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordType {
    Command,
    Bits,
    ChannelPoints,
    Unknown(String),
}

impl RecordType {
    pub fn parse(raw: &str) -> Self {
        let v = raw.trim().to_lowercase();
        match v.as_str() {
            "cmd" | "command" | "commands" => RecordType::Command,
            "bit" | "bits" => RecordType::Bits,
            "point" | "points" | "channelpoints" | "channel_points" | "kanaalpunten" => {
                RecordType::ChannelPoints
            }
            _ => RecordType::Unknown(raw.trim().to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Command,
    Description,
    Type,
    Category,
    Aliases,
    Permissions,
    Cost,
    Notes,
    Cooldown,
}

impl Column {
    fn header(&self) -> &'static str {
        match self {
            Column::Command => "command",
            Column::Description => "description",
            Column::Type => "type",
            Column::Category => "category",
            Column::Aliases => "aliases",
            Column::Permissions => "permissions",
            Column::Cost => "cost",
            Column::Notes => "notes",
            Column::Cooldown => "cooldown",
        }
    }
}

/// Header row resolved to column positions.
#[derive(Debug, Clone)]
pub struct ColumnIndex {
    header: Vec<String>,
}

impl ColumnIndex {
    pub fn new(header: &[String]) -> Self {
        Self {
            header: header.iter().map(|h| h.trim().to_lowercase()).collect(),
        }
    }

    fn position(&self, column: Column) -> Option<usize> {
        self.header.iter().position(|h| h == column.header())
    }

    fn has(&self, column: Column) -> bool {
        self.position(column).is_some()
    }

    /// Trimmed cell value; empty when the column or cell is absent.
    fn get<'a>(&self, row: &'a [String], column: Column) -> &'a str {
        self.position(column)
            .and_then(|i| row.get(i))
            .map(|v| v.trim())
            .unwrap_or("")
    }
}

/// Prefixes `!` unless already present. Empty stays empty.
pub fn normalize_command(raw: &str) -> String {
    let c = raw.trim();
    if c.is_empty() || c.starts_with('!') {
        c.to_string()
    } else {
        format!("!{}", c)
    }
}

/// `!shoutout` becomes `Shoutout`.
pub fn title_from_command(command: &str) -> String {
    let raw = command.strip_prefix('!').unwrap_or(command).trim();
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => command.to_string(),
    }
}

/// Keeps only digits and dots, then rounds. Anything unparseable is 0.
///
/// `"1,000 bits"` parses to 1000.
pub fn parse_cost(raw: &str) -> u64 {
    let digits: String = raw
        .trim()
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    match digits.parse::<f64>() {
        Ok(n) if n.is_finite() => n.round() as u64,
        _ => 0,
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() { None } else { Some(s.to_string()) }
}

/// Builds the three collections from `rows` (header first).
pub fn compile_catalog(rows: &[Vec<String>], mode: BuildMode) -> Result<CompiledCatalog, Error> {
    let Some((header, body)) = rows.split_first() else {
        return Ok(CompiledCatalog::default());
    };
    let idx = ColumnIndex::new(header);

    let has_type = idx.has(Column::Type);
    let has_category = idx.has(Column::Category);
    let has_cost = idx.has(Column::Cost);

    if mode == BuildMode::Strict {
        if !idx.has(Column::Command) {
            return Err(Error::Schema("Missing required column: Command".into()));
        }
        if !has_category {
            return Err(Error::Schema("Missing required column: Category".into()));
        }
    }

    let mut catalog = Catalog::default();

    for row in body {
        let raw_command = idx.get(row, Column::Command);
        if raw_command.is_empty() {
            continue;
        }

        let record_type = if has_type {
            RecordType::parse(idx.get(row, Column::Type))
        } else {
            RecordType::Command
        };

        let description = idx.get(row, Column::Description).to_string();
        let category = if has_category { non_empty(idx.get(row, Column::Category)) } else { None };

        match record_type {
            RecordType::Command => {
                let command = normalize_command(raw_command);
                if mode == BuildMode::Strict && category.is_none() {
                    return Err(Error::Schema(format!("Missing Category for command \"{}\"", command)));
                }
                catalog.commands.push(ChatCommand {
                    title: title_from_command(&command),
                    command,
                    description,
                    roles: roles_from_permissions(idx.get(row, Column::Permissions)),
                    category,
                    aliases: split_list(idx.get(row, Column::Aliases)),
                    cooldown_sec: parse_cost(idx.get(row, Column::Cooldown)).min(u32::MAX as u64) as u32,
                });
            }
            RecordType::Bits => catalog.bits.push(RewardEntry {
                title: raw_command.to_string(),
                description,
                cost: if has_cost { parse_cost(idx.get(row, Column::Cost)) } else { 0 },
                notes: non_empty(idx.get(row, Column::Notes)),
                category,
            }),
            RecordType::ChannelPoints => catalog.points.push(RewardEntry {
                title: raw_command.to_string(),
                description,
                cost: if has_cost { parse_cost(idx.get(row, Column::Cost)) } else { 0 },
                notes: non_empty(idx.get(row, Column::Notes)),
                category,
            }),
            RecordType::Unknown(t) => {
                return Err(Error::Schema(format!(
                    "Unknown Type \"{}\" for row Command=\"{}\"",
                    t, raw_command
                )));
            }
        }
    }

    let before = catalog.commands.len();
    catalog.commands = dedupe_commands(catalog.commands);
    if catalog.commands.len() != before {
        debug!("Dropped {} duplicate chat command(s)", before - catalog.commands.len());
    }

    catalog.commands.sort_by(|a, b| a.command.cmp(&b.command));
    catalog.bits = dedupe_rewards(catalog.bits);
    catalog.points = dedupe_rewards(catalog.points);
    sort_rewards(&mut catalog.bits);
    sort_rewards(&mut catalog.points);

    Ok(CompiledCatalog { catalog, has_type_column: has_type })
}

/// First occurrence of each lower-cased token wins.
fn dedupe_commands(commands: Vec<ChatCommand>) -> Vec<ChatCommand> {
    let mut seen = HashSet::new();
    commands
        .into_iter()
        .filter(|c| seen.insert(c.command.to_lowercase()))
        .collect()
}

/// Title is the key within a reward collection; first occurrence wins.
fn dedupe_rewards(rewards: Vec<RewardEntry>) -> Vec<RewardEntry> {
    let mut seen = HashSet::new();
    rewards
        .into_iter()
        .filter(|r| seen.insert(r.title.clone()))
        .collect()
}

fn sort_rewards(rewards: &mut [RewardEntry]) {
    rewards.sort_by(|a, b| a.cost.cmp(&b.cost).then_with(|| a.title.cmp(&b.title)));
}

/// Result of [`compile_catalog`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompiledCatalog {
    pub catalog: Catalog,
    /// Whether the input declared a `Type` column; decides whether reward
    /// snapshots may be (re)written.
    pub has_type_column: bool,
}
