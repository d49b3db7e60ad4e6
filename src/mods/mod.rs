//! Mods domain — declarative content packs.
//!
//! A mod is a single `.ron` manifest dropped into either the system mods
//! directory (next to the executable) or the per-user one. Manifests can
//! add new upgrades and achievements or patch fields of existing ones.
//! Files load in sorted filename order, system directory first, so a
//! user mod can override anything a bundled one declares.
//!
//! A broken manifest is logged and skipped; it never takes the rest of
//! the load down with it.

use crate::shared::*;
use bevy::prelude::*;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

// ═════════════════════════════════════════════════════════════════════════════
// MANIFEST
// ═════════════════════════════════════════════════════════════════════════════

/// On-disk manifest shape. Every field is optional so a patch can touch
/// just the fields it cares about.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ModManifest {
    pub name: Option<String>,
    pub upgrades: HashMap<String, UpgradePatch>,
    pub achievements: HashMap<String, AchievementPatch>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct UpgradePatch {
    pub name: Option<String>,
    pub desc: Option<String>,
    pub kind: Option<UpgradeKind>,
    pub category: Option<String>,
    pub base_cost: Option<f64>,
    pub cost_mult: Option<f64>,
    pub flesh_per_sec: Option<f64>,
    pub flesh_per_click: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AchievementPatch {
    pub name: Option<String>,
    pub desc: Option<String>,
    pub rule: Option<AchievementRule>,
}

// ═════════════════════════════════════════════════════════════════════════════
// REGISTRAR
// ═════════════════════════════════════════════════════════════════════════════

/// The only surface a manifest gets to touch. Mods register content; they
/// never see player state, settings, or the filesystem.
pub struct ModRegistrar<'a> {
    upgrades: &'a mut UpgradeRegistry,
    achievements: &'a mut AchievementRegistry,
}

impl<'a> ModRegistrar<'a> {
    pub fn new(
        upgrades: &'a mut UpgradeRegistry,
        achievements: &'a mut AchievementRegistry,
    ) -> Self {
        Self {
            upgrades,
            achievements,
        }
    }

    /// Merge an upgrade patch by id. Unknown ids create a new upgrade
    /// with neutral defaults; known ids keep every field the patch
    /// leaves unset.
    pub fn register_upgrade(&mut self, id: &str, patch: &UpgradePatch) {
        let def = self
            .upgrades
            .upgrades
            .entry(id.to_string())
            .or_insert_with(|| UpgradeDef {
                name: id.to_string(),
                desc: String::new(),
                kind: UpgradeKind::Click,
                category: "misc".to_string(),
                base_cost: 10.0,
                cost_mult: 1.15,
                flesh_per_sec: 0.0,
                flesh_per_click: 0.0,
            });

        if let Some(v) = &patch.name {
            def.name = v.clone();
        }
        if let Some(v) = &patch.desc {
            def.desc = v.clone();
        }
        if let Some(v) = patch.kind {
            def.kind = v;
        }
        if let Some(v) = &patch.category {
            def.category = v.clone();
        }
        if let Some(v) = patch.base_cost {
            def.base_cost = v;
        }
        if let Some(v) = patch.cost_mult {
            def.cost_mult = v;
        }
        if let Some(v) = patch.flesh_per_sec {
            def.flesh_per_sec = v;
        }
        if let Some(v) = patch.flesh_per_click {
            def.flesh_per_click = v;
        }
    }

    /// Merge an achievement patch by id. A patch without a rule on a new
    /// id registers a display-only achievement that can never unlock.
    pub fn register_achievement(&mut self, id: &str, patch: &AchievementPatch) {
        let def = self
            .achievements
            .defs
            .entry(id.to_string())
            .or_insert_with(|| AchievementDef {
                name: id.to_string(),
                desc: String::new(),
                rule: None,
            });

        if let Some(v) = &patch.name {
            def.name = v.clone();
        }
        if let Some(v) = &patch.desc {
            def.desc = v.clone();
        }
        if let Some(v) = patch.rule {
            def.rule = Some(v);
        }
    }

    pub fn apply_manifest(&mut self, manifest: &ModManifest) {
        let mut upgrade_ids: Vec<&String> = manifest.upgrades.keys().collect();
        upgrade_ids.sort();
        for id in upgrade_ids {
            self.register_upgrade(id, &manifest.upgrades[id]);
        }

        let mut achievement_ids: Vec<&String> = manifest.achievements.keys().collect();
        achievement_ids.sort();
        for id in achievement_ids {
            self.register_achievement(id, &manifest.achievements[id]);
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// DISCOVERY
// ═════════════════════════════════════════════════════════════════════════════

/// All `.ron` files in `dir`, sorted by filename. A missing directory is
/// simply an empty mod set.
fn manifest_files(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| p.extension().is_some_and(|ext| ext == "ron"))
        .collect();
    files.sort();
    files
}

fn load_manifest(path: &Path) -> Result<ModManifest, String> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {e}", path.display()))?;
    ron::from_str(&text).map_err(|e| format!("Failed to parse {}: {e}", path.display()))
}

fn load_mods(
    paths: Res<SavePaths>,
    mut upgrades: ResMut<UpgradeRegistry>,
    mut achievements: ResMut<AchievementRegistry>,
) {
    let mut registrar = ModRegistrar::new(&mut upgrades, &mut achievements);
    let mut loaded = 0usize;

    for dir in [paths.system_mods_dir(), paths.user_mods_dir()] {
        for file in manifest_files(&dir) {
            match load_manifest(&file) {
                Ok(manifest) => {
                    let label = manifest
                        .name
                        .clone()
                        .unwrap_or_else(|| file.display().to_string());
                    registrar.apply_manifest(&manifest);
                    info!("[Mods] Loaded {label}.");
                    loaded += 1;
                }
                Err(e) => {
                    warn!("[Mods] Skipping mod: {e}");
                }
            }
        }
    }

    if loaded > 0 {
        info!("[Mods] {loaded} mod(s) applied.");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Plugin
// ─────────────────────────────────────────────────────────────────────────────

pub struct ModsPlugin;

impl Plugin for ModsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(
            OnEnter(GameState::Loading),
            load_mods.in_set(LoadPhase::Mods),
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// TESTS
// ═════════════════════════════════════════════════════════════════════════════
