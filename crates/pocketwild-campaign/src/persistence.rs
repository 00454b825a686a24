//! Versioned save records and file helpers.
//!
//! A save is one JSON document. `parse_save` checks the `version` field
//! before deserializing, upgrades version 1 payloads in place and rejects
//! everything else it does not understand.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use pocketwild_core::combatant::Combatant;
use pocketwild_core::constants::{MAX_MOVES, PARTY_SIZE, SAVE_VERSION};
use pocketwild_core::player::PlayerState;
use pocketwild_procgen::ResourceField;

/// Why a save could not be read or written.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("Malformed save data: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Save data has no version field")]
    MissingVersion,
    #[error("Save version {found} is not supported (expected {expected})")]
    VersionMismatch { found: u64, expected: u32 },
    #[error("Save data is inconsistent: {0}")]
    Invalid(String),
    #[error("Save slot name is not allowed: {0}")]
    BadSlot(String),
    #[error("Save file error: {0}")]
    Io(#[from] io::Error),
}

/// World state carried in a save: visited chunks, node placements and respawn timers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldSave {
    pub resources: ResourceField,
}

/// Session counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveProgress {
    pub ticks: u64,
    pub elapsed_secs: f64,
}

/// Full save payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    pub version: u32,
    pub slot: String,
    pub timestamp: u64,
    pub seed: u64,
    pub world_seed: u64,
    pub player: PlayerState,
    pub world: WorldSave,
    #[serde(default)]
    pub progress: SaveProgress,
}

/// Lightweight metadata for listing saves without keeping full state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveMetadata {
    pub slot: String,
    pub timestamp: u64,
    pub currency: u32,
    pub party_size: usize,
    pub steps: u64,
}

impl SaveRecord {
    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn metadata(&self) -> SaveMetadata {
        SaveMetadata {
            slot: self.slot.clone(),
            timestamp: self.timestamp,
            currency: self.player.currency,
            party_size: self.player.party.len(),
            steps: self.player.steps,
        }
    }
}

/// Version 1 saves predate merge tiers, eggs and the world blob.
fn migrate_v1(mut root: Value) -> Value {
    let seed = root.get("seed").and_then(Value::as_u64).unwrap_or(0);
    let world_seed = root.get("world_seed").and_then(Value::as_u64).unwrap_or(seed);

    if let Some(party) = root
        .get_mut("player")
        .and_then(|p| p.get_mut("party"))
        .and_then(Value::as_array_mut)
    {
        for member in party.iter_mut().filter_map(Value::as_object_mut) {
            member.entry("merge_tier").or_insert(json!(0));
            member.entry("is_egg").or_insert(json!(false));
        }
    }

    if let Some(obj) = root.as_object_mut() {
        obj.entry("world_seed").or_insert(json!(world_seed));
        obj.entry("world").or_insert_with(|| {
            json!({
                "resources": {
                    "seed": world_seed,
                    "nodes": [],
                    "visited": [],
                    "respawns": [],
                }
            })
        });
        obj.insert("version".into(), json!(SAVE_VERSION));
    }
    root
}

/// Parse a save document, migrating or rejecting by version.
pub fn parse_save(json: &str) -> Result<SaveRecord, SaveError> {
    let root: Value = serde_json::from_str(json)?;
    let version = root
        .get("version")
        .and_then(Value::as_u64)
        .ok_or(SaveError::MissingVersion)?;

    let root = match version {
        v if v == SAVE_VERSION as u64 => root,
        1 => {
            info!("Migrating version 1 save");
            migrate_v1(root)
        }
        found => {
            return Err(SaveError::VersionMismatch {
                found,
                expected: SAVE_VERSION,
            })
        }
    };
    let record: SaveRecord = serde_json::from_value(root)?;
    validate(&record)?;
    Ok(record)
}

fn check_combatant(c: &Combatant) -> Result<(), SaveError> {
    let fail = |why: &str| Err(SaveError::Invalid(format!("combatant {}: {why}", c.id.0)));
    if c.max_hp == 0 {
        return fail("max_hp is zero");
    }
    if c.hp > c.max_hp {
        return fail("hp above max_hp");
    }
    if c.level == 0 {
        return fail("level is zero");
    }
    if c.moves.len() > MAX_MOVES {
        return fail("too many moves");
    }
    Ok(())
}

/// Reject records that deserialize but break roster invariants.
pub fn validate(record: &SaveRecord) -> Result<(), SaveError> {
    let player = &record.player;
    if player.party.len() > PARTY_SIZE {
        return Err(SaveError::Invalid(format!(
            "party holds {} members",
            player.party.len()
        )));
    }
    if player.storage.len() > player.storage.capacity() {
        return Err(SaveError::Invalid("storage over capacity".into()));
    }
    let mut ids = std::collections::BTreeSet::new();
    for c in player.all_combatants() {
        check_combatant(c)?;
        if !ids.insert(c.id) {
            return Err(SaveError::Invalid(format!("duplicate combatant id {}", c.id.0)));
        }
        if c.id.0 >= player.next_combatant_id {
            return Err(SaveError::Invalid(format!(
                "combatant id {} not below next id",
                c.id.0
            )));
        }
    }
    Ok(())
}

/// Slots become file names; anything that could leave the save directory is refused.
fn save_path(dir: &Path, slot: &str) -> Result<PathBuf, SaveError> {
    let bad = slot.is_empty()
        || slot.contains("..")
        || slot.contains(['/', '\\'])
        || Path::new(slot).is_absolute();
    if bad {
        return Err(SaveError::BadSlot(slot.to_string()));
    }
    Ok(dir.join(format!("{slot}.json")))
}

pub fn save_to_file(dir: &Path, record: &SaveRecord) -> Result<(), SaveError> {
    fs::create_dir_all(dir)?;
    fs::write(save_path(dir, &record.slot)?, record.to_json()?)?;
    Ok(())
}

pub fn load_from_file(dir: &Path, slot: &str) -> Result<SaveRecord, SaveError> {
    let json = fs::read_to_string(save_path(dir, slot)?)?;
    parse_save(&json)
}

/// Every readable save in a directory, newest first. Unreadable files are skipped.
pub fn list_saves(dir: &Path) -> Vec<SaveMetadata> {
    let entries = match fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return Vec::new(),
    };

    let mut saves = Vec::new();
    for entry in entries.flatten() {
        let path = entry.path();
        if !path.extension().is_some_and(|ext| ext == "json") {
            continue;
        }
        match fs::read_to_string(&path)
            .map_err(SaveError::from)
            .and_then(|json| parse_save(&json))
        {
            Ok(record) => saves.push(record.metadata()),
            Err(e) => warn!("Skipping {}: {e}", path.display()),
        }
    }
    saves.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    saves
}

pub fn delete_save(dir: &Path, slot: &str) -> Result<(), SaveError> {
    let path = save_path(dir, slot)?;
    if path.exists() {
        fs::remove_file(&path)?;
    }
    Ok(())
}
