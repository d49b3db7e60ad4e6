//! Shared resources, events, states, and catalog types for fleshclick.
//!
//! This is the type contract. Every domain plugin imports from here.
//! No domain imports from any other domain directly.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

// ═══════════════════════════════════════════════════════════════════════
// GAME STATE — top-level state machine
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, States, Default)]
pub enum GameState {
    #[default]
    Loading,
    Playing,
}

/// Boot sequencing inside `OnEnter(GameState::Loading)`: documents come
/// off disk before catalogs exist, catalogs before mods merge into them,
/// and everything before the achievements document is reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, SystemSet)]
pub enum LoadPhase {
    Documents,
    Catalog,
    Mods,
    Finish,
}

/// Frame ordering during play: all state mutations run before the
/// write-through persistence systems, so every save observes the full
/// effect of the frame's events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, SystemSet)]
pub enum GameSet {
    Mutate,
    Commit,
}

// ═══════════════════════════════════════════════════════════════════════
// SETTINGS
// ═══════════════════════════════════════════════════════════════════════

/// User-facing settings. JSON keys keep the names the original save files
/// used (`enable_rpc`, `discord_client_id`) so old installs load cleanly.
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "enable_rpc")]
    pub enable_presence: bool,
    #[serde(rename = "discord_client_id")]
    pub presence_client_id: String,
    pub squish_ms: u32,
    pub play_click_sound: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable_presence: false,
            presence_client_id: String::new(),
            squish_ms: 100,
            play_click_sound: false,
        }
    }
}

impl Settings {
    pub const SQUISH_MIN_MS: u32 = 20;
    pub const SQUISH_MAX_MS: u32 = 300;

    /// Clamp fields to their documented ranges. Runs after every load and
    /// before every persist, so out-of-range edits never stick.
    pub fn sanitize(&mut self) {
        self.squish_ms = self
            .squish_ms
            .clamp(Self::SQUISH_MIN_MS, Self::SQUISH_MAX_MS);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PLAYER STATE
// ═══════════════════════════════════════════════════════════════════════

/// The persistent game state: the flesh balance plus everything needed to
/// recompute yields. Missing fields in older documents take these defaults
/// (`#[serde(default)]` — forward-compatible schema widening).
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerState {
    pub flesh: f64,
    pub flesh_per_click: f64,
    pub upgrades_owned: HashMap<String, u32>,
    pub total_clicks: u64,
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            flesh: 0.0,
            flesh_per_click: 1.0,
            upgrades_owned: HashMap::new(),
            total_clicks: 0,
        }
    }
}

impl PlayerState {
    /// Adjust the flesh balance. The balance is clamped to zero on every
    /// write — it can never go negative, whatever the caller passes.
    pub fn add_flesh(&mut self, amount: f64) {
        self.flesh = (self.flesh + amount).max(0.0);
    }

    pub fn upgrade_count(&self, id: &str) -> u32 {
        self.upgrades_owned.get(id).copied().unwrap_or(0)
    }

    pub fn total_upgrades_owned(&self) -> u64 {
        self.upgrades_owned.values().map(|&n| n as u64).sum()
    }
}

// ═══════════════════════════════════════════════════════════════════════
// UPGRADE CATALOG
// ═══════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpgradeKind {
    /// Adds flesh per click.
    Click,
    /// Adds flesh per second.
    Auto,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpgradeDef {
    pub name: String,
    pub desc: String,
    pub kind: UpgradeKind,
    /// Free-form grouping key used by UI filters ("click", "auto", "misc").
    pub category: String,
    pub base_cost: f64,
    pub cost_mult: f64,
    pub flesh_per_sec: f64,
    pub flesh_per_click: f64,
}

/// Immutable-after-startup upgrade catalog: built-ins plus mod merges.
/// Owned counts live in `PlayerState`, keyed by the same ids.
#[derive(Resource, Debug, Clone, Default)]
pub struct UpgradeRegistry {
    pub upgrades: HashMap<String, UpgradeDef>,
}

impl UpgradeRegistry {
    pub fn get(&self, id: &str) -> Option<&UpgradeDef> {
        self.upgrades.get(id)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// ACHIEVEMENT CATALOG & UNLOCK STATE
// ═══════════════════════════════════════════════════════════════════════

/// Unlock condition over the current `PlayerState`. All rules are
/// independent thresholds, so evaluation order never matters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AchievementRule {
    TotalClicks(u64),
    Flesh(f64),
    TotalUpgrades(u64),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementDef {
    pub name: String,
    pub desc: String,
    /// `None` means the achievement exists in the catalog but is never
    /// auto-unlocked (mod entries that declare no rule).
    pub rule: Option<AchievementRule>,
}

/// Immutable-after-startup achievement catalog.
#[derive(Resource, Debug, Clone, Default)]
pub struct AchievementRegistry {
    pub defs: HashMap<String, AchievementDef>,
}

/// Mutable unlock state, separate from the catalog. Unlocking is one-way:
/// ids are only ever inserted, never removed.
#[derive(Resource, Debug, Clone, Default)]
pub struct AchievementBook {
    pub unlocked: HashSet<String>,
}

impl AchievementBook {
    pub fn is_unlocked(&self, id: &str) -> bool {
        self.unlocked.contains(id)
    }

    /// Idempotent unlock. Returns `true` only on the locked → unlocked
    /// transition, so callers can persist and notify exactly once.
    pub fn unlock(&mut self, id: &str) -> bool {
        self.unlocked.insert(id.to_string())
    }
}

/// On-disk shape of one entry in `achievements.json` — the same map the
/// original save files used, so both directions stay compatible.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AchievementDocEntry {
    pub name: String,
    pub desc: String,
    pub unlocked: bool,
}

pub type AchievementsDoc = HashMap<String, AchievementDocEntry>;

// ═══════════════════════════════════════════════════════════════════════
// SAVE & MOD LOCATIONS
// ═══════════════════════════════════════════════════════════════════════

const APP_DIR_NAME: &str = "fleshclick";

/// Where the save documents and mod directories live. Consumed by both the
/// save and mods domains, so it lives here. Injectable so tests can point
/// the whole persistence stack at a scratch directory.
#[derive(Resource, Clone, Debug)]
pub struct SavePaths {
    /// Current home: `$XDG_CONFIG_HOME/fleshclick` (or `~/.config/fleshclick`).
    pub config_dir: PathBuf,
    /// Legacy home: the directory the executable runs from.
    pub legacy_dir: PathBuf,
}

impl Default for SavePaths {
    fn default() -> Self {
        let config_dir = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME);

        let legacy_dir = std::env::current_exe()
            .ok()
            .and_then(|p| p.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));

        Self {
            config_dir,
            legacy_dir,
        }
    }
}

impl SavePaths {
    pub fn state_file(&self) -> PathBuf {
        self.config_dir.join("state.json")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }

    pub fn achievements_file(&self) -> PathBuf {
        self.config_dir.join("achievements.json")
    }

    pub fn counter_file(&self) -> PathBuf {
        self.config_dir.join("flesh_counter.txt")
    }

    pub fn legacy_state_file(&self) -> PathBuf {
        self.legacy_dir.join("state.json")
    }

    pub fn legacy_settings_file(&self) -> PathBuf {
        self.legacy_dir.join("settings.json")
    }

    pub fn legacy_achievements_file(&self) -> PathBuf {
        self.legacy_dir.join("achievements.json")
    }

    pub fn legacy_counter_file(&self) -> PathBuf {
        self.legacy_dir.join("flesh_counter.txt")
    }

    /// Mods shipped alongside the executable.
    pub fn system_mods_dir(&self) -> PathBuf {
        self.legacy_dir.join("mods")
    }

    /// Per-user mods; these load second and win on id collisions.
    pub fn user_mods_dir(&self) -> PathBuf {
        self.config_dir.join("mods")
    }
}

// ═══════════════════════════════════════════════════════════════════════
// EVENTS
// ═══════════════════════════════════════════════════════════════════════

/// Fired on every locked → unlocked transition. UI glue listens for
/// notifications; nothing in the core depends on it being read.
#[derive(Event, Debug, Clone)]
pub struct AchievementUnlockedEvent {
    pub achievement_id: String,
    pub name: String,
    pub desc: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flesh_clamps_to_zero() {
        let mut state = PlayerState::default();
        state.add_flesh(5.0);
        assert_eq!(state.flesh, 5.0);
        state.add_flesh(-100.0);
        assert_eq!(state.flesh, 0.0, "balance must never go negative");
    }

    #[test]
    fn total_upgrades_sums_counts() {
        let mut state = PlayerState::default();
        state.upgrades_owned.insert("a".into(), 2);
        state.upgrades_owned.insert("b".into(), 3);
        assert_eq!(state.total_upgrades_owned(), 5);
        assert_eq!(state.upgrade_count("a"), 2);
        assert_eq!(state.upgrade_count("missing"), 0);
    }

    #[test]
    fn unlock_is_idempotent() {
        let mut book = AchievementBook::default();
        assert!(book.unlock("first_click"), "first call transitions");
        assert!(!book.unlock("first_click"), "second call is a no-op");
        assert!(book.is_unlocked("first_click"));
    }

    #[test]
    fn settings_sanitize_clamps_squish() {
        let mut settings = Settings {
            squish_ms: 5,
            ..Default::default()
        };
        settings.sanitize();
        assert_eq!(settings.squish_ms, Settings::SQUISH_MIN_MS);
        settings.squish_ms = 9999;
        settings.sanitize();
        assert_eq!(settings.squish_ms, Settings::SQUISH_MAX_MS);
    }

    #[test]
    fn settings_round_trip_keeps_legacy_keys() {
        let json = serde_json::to_string(&Settings::default()).unwrap();
        assert!(json.contains("enable_rpc"));
        assert!(json.contains("discord_client_id"));
    }

    #[test]
    fn player_state_defaults_fill_missing_fields() {
        // An older document that only knows about `flesh`.
        let state: PlayerState = serde_json::from_str(r#"{ "flesh": 12.5 }"#).unwrap();
        assert_eq!(state.flesh, 12.5);
        assert_eq!(state.flesh_per_click, 1.0);
        assert!(state.upgrades_owned.is_empty());
        assert_eq!(state.total_clicks, 0);
    }
}
