//! Save domain — durable JSON documents and the flat counter mirror.
//!
//! Three documents live under the per-user config directory:
//! `state.json`, `settings.json`, `achievements.json`, plus a plain-text
//! `flesh_counter.txt` mirror of the rounded flesh total. Earlier builds
//! kept all four next to the executable; those paths are still read (and
//! migrated forward) when the current ones are missing.

use crate::shared::*;
use bevy::prelude::*;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::path::Path;

// ═════════════════════════════════════════════════════════════════════════════
// DOCUMENT I/O
// ═════════════════════════════════════════════════════════════════════════════

/// Load a JSON document, preferring `current` over `legacy`.
///
/// A readable-but-corrupt current file yields `T::default()` rather than
/// falling back to the legacy copy: the current file is the source of
/// truth once it exists. A legacy hit is migrated forward with a
/// best-effort write so the next boot finds it in place.
pub fn load_document<T>(current: &Path, legacy: &Path) -> T
where
    T: DeserializeOwned + Serialize + Default,
{
    match std::fs::read_to_string(current) {
        Ok(text) => match serde_json::from_str(&text) {
            Ok(doc) => return doc,
            Err(e) => {
                warn!(
                    "[Save] Corrupt document {}: {e}. Starting fresh.",
                    current.display()
                );
                return T::default();
            }
        },
        Err(_) => {}
    }

    if let Ok(text) = std::fs::read_to_string(legacy) {
        match serde_json::from_str::<T>(&text) {
            Ok(doc) => {
                info!(
                    "[Save] Migrating {} -> {}.",
                    legacy.display(),
                    current.display()
                );
                if let Err(e) = save_document(current, &doc) {
                    warn!("[Save] Migration write failed: {e}");
                }
                return doc;
            }
            Err(e) => {
                warn!(
                    "[Save] Corrupt legacy document {}: {e}. Starting fresh.",
                    legacy.display()
                );
                return T::default();
            }
        }
    }

    T::default()
}

/// Pretty-print `doc` to `path`, creating parent directories as needed.
pub fn save_document<T: Serialize>(path: &Path, doc: &T) -> Result<(), String> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .map_err(|e| format!("Failed to create {}: {e}", dir.display()))?;
    }
    let text = serde_json::to_string_pretty(doc)
        .map_err(|e| format!("Failed to serialize {}: {e}", path.display()))?;
    std::fs::write(path, text).map_err(|e| format!("Failed to write {}: {e}", path.display()))
}

/// Read the flat counter, current location first. Missing or unparseable
/// files count as zero.
pub fn load_counter(paths: &SavePaths) -> i64 {
    for path in [paths.counter_file(), paths.legacy_counter_file()] {
        if let Ok(text) = std::fs::read_to_string(&path) {
            match text.trim().parse::<i64>() {
                Ok(n) => return n,
                Err(_) => {
                    warn!("[Save] Unparseable counter {}: ignoring.", path.display());
                }
            }
        }
    }
    0
}

pub fn save_counter(paths: &SavePaths, value: i64) -> Result<(), String> {
    let path = paths.counter_file();
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .map_err(|e| format!("Failed to create {}: {e}", dir.display()))?;
    }
    std::fs::write(&path, value.to_string())
        .map_err(|e| format!("Failed to write {}: {e}", path.display()))
}

// ═════════════════════════════════════════════════════════════════════════════
// BOOT SYSTEMS
// ═════════════════════════════════════════════════════════════════════════════

/// Read all documents into resources. Runs before the catalogs and mods
/// so a persisted achievements doc can be reconciled once both exist.
fn load_documents(mut commands: Commands, paths: Res<SavePaths>) {
    let mut settings: Settings =
        load_document(&paths.settings_file(), &paths.legacy_settings_file());
    settings.sanitize();

    let mut state: PlayerState = load_document(&paths.state_file(), &paths.legacy_state_file());

    // Seed an empty save from the standalone counter so a wiped state.json
    // does not zero out a long-running total.
    let counter = load_counter(&paths);
    if state.flesh == 0.0 && counter > 0 {
        info!("[Save] Seeding flesh from counter file: {counter}.");
        state.flesh = counter as f64;
    }

    let doc: AchievementsDoc = load_document(
        &paths.achievements_file(),
        &paths.legacy_achievements_file(),
    );

    info!(
        "[Save] Documents loaded: flesh {:.0}, {} clicks, {} achievement entries.",
        state.flesh,
        state.total_clicks,
        doc.len()
    );

    commands.insert_resource(settings);
    commands.insert_resource(state);
    commands.insert_resource(PersistedAchievements(doc));
}

/// The achievements document as read from disk, held until the catalog and
/// mods have populated the registry.
#[derive(Resource, Default)]
struct PersistedAchievements(AchievementsDoc);

/// Fold the persisted achievements doc into the live registry and book.
///
/// Ids the registry no longer knows (a removed mod, say) are re-added
/// without a rule: their unlocked flag survives, they just can never
/// unlock from here.
fn reconcile_achievements(
    mut commands: Commands,
    persisted: Res<PersistedAchievements>,
    mut registry: ResMut<AchievementRegistry>,
    mut book: ResMut<AchievementBook>,
) {
    for (id, entry) in &persisted.0 {
        if !registry.defs.contains_key(id) {
            registry.defs.insert(
                id.clone(),
                AchievementDef {
                    name: entry.name.clone(),
                    desc: entry.desc.clone(),
                    rule: None,
                },
            );
        }
        if entry.unlocked {
            book.unlock(id);
        }
    }
    info!(
        "[Save] Achievements reconciled: {} known, {} unlocked.",
        registry.defs.len(),
        book.unlocked.len()
    );
    commands.remove_resource::<PersistedAchievements>();
}

fn finish_boot(mut next: ResMut<NextState<GameState>>) {
    info!("[Save] Boot complete.");
    next.set(GameState::Playing);
}

// ═════════════════════════════════════════════════════════════════════════════
// COMMIT SYSTEMS
// ═════════════════════════════════════════════════════════════════════════════

/// Write-through: any frame that mutates the state also persists it. The
/// counter mirror truncates, matching the integers older builds wrote.
fn persist_state(paths: Res<SavePaths>, state: Res<PlayerState>) {
    if let Err(e) = save_document(&paths.state_file(), &*state) {
        warn!("[Save] {e}");
    }
    if let Err(e) = save_counter(&paths, state.flesh as i64) {
        warn!("[Save] {e}");
    }
}

fn persist_settings(paths: Res<SavePaths>, settings: Res<Settings>) {
    let mut doc = settings.clone();
    doc.sanitize();
    if let Err(e) = save_document(&paths.settings_file(), &doc) {
        warn!("[Save] {e}");
    }
}

/// Rebuild the full achievements doc from the registry and book. Every
/// registered id appears in the file, unlocked or not, matching the shape
/// older builds wrote.
fn persist_achievements(
    paths: Res<SavePaths>,
    registry: Res<AchievementRegistry>,
    book: Res<AchievementBook>,
) {
    let doc: AchievementsDoc = registry
        .defs
        .iter()
        .map(|(id, def)| {
            (
                id.clone(),
                AchievementDocEntry {
                    name: def.name.clone(),
                    desc: def.desc.clone(),
                    unlocked: book.is_unlocked(id),
                },
            )
        })
        .collect::<HashMap<_, _>>();
    if let Err(e) = save_document(&paths.achievements_file(), &doc) {
        warn!("[Save] {e}");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Plugin
// ─────────────────────────────────────────────────────────────────────────────

pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SavePaths>()
            .init_resource::<AchievementBook>();

        app.add_systems(
            OnEnter(GameState::Loading),
            (
                load_documents.in_set(LoadPhase::Documents),
                (reconcile_achievements, finish_boot)
                    .chain()
                    .in_set(LoadPhase::Finish),
            ),
        );

        app.add_systems(
            Update,
            (
                persist_state.run_if(resource_changed::<PlayerState>),
                persist_settings.run_if(resource_changed::<Settings>),
                persist_achievements.run_if(
                    resource_changed::<AchievementBook>
                        .or(resource_changed::<AchievementRegistry>),
                ),
            )
                .in_set(GameSet::Commit)
                .run_if(in_state(GameState::Playing)),
        );
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// TESTS
// ═════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    static SCRATCH: AtomicU32 = AtomicU32::new(0);

    fn scratch_paths() -> SavePaths {
        let n = SCRATCH.fetch_add(1, Ordering::Relaxed);
        let base = std::env::temp_dir().join(format!(
            "fleshclick-save-{}-{n}",
            std::process::id()
        ));
        let config_dir = base.join("config");
        let legacy_dir = base.join("legacy");
        std::fs::create_dir_all(&config_dir).unwrap();
        std::fs::create_dir_all(&legacy_dir).unwrap();
        SavePaths {
            config_dir,
            legacy_dir,
        }
    }

    #[test]
    fn state_round_trips() {
        let paths = scratch_paths();
        let mut state = PlayerState::default();
        state.flesh = 123.5;
        state.total_clicks = 7;
        state.upgrades_owned.insert("bigger_clicks".into(), 2);
        save_document(&paths.state_file(), &state).unwrap();

        let loaded: PlayerState =
            load_document(&paths.state_file(), &paths.legacy_state_file());
        assert_eq!(loaded.flesh, 123.5);
        assert_eq!(loaded.total_clicks, 7);
        assert_eq!(loaded.upgrade_count("bigger_clicks"), 2);
    }

    #[test]
    fn legacy_document_migrates_forward() {
        let paths = scratch_paths();
        let mut state = PlayerState::default();
        state.flesh = 50.0;
        save_document(&paths.legacy_state_file(), &state).unwrap();

        let loaded: PlayerState =
            load_document(&paths.state_file(), &paths.legacy_state_file());
        assert_eq!(loaded.flesh, 50.0);
        assert!(paths.state_file().exists(), "migration should write current");
    }

    #[test]
    fn corrupt_current_wins_over_legacy() {
        let paths = scratch_paths();
        let mut state = PlayerState::default();
        state.flesh = 99.0;
        save_document(&paths.legacy_state_file(), &state).unwrap();
        std::fs::write(paths.state_file(), "{not json").unwrap();

        let loaded: PlayerState =
            load_document(&paths.state_file(), &paths.legacy_state_file());
        assert_eq!(loaded.flesh, 0.0);
    }

    #[test]
    fn missing_documents_default() {
        let paths = scratch_paths();
        let settings: Settings =
            load_document(&paths.settings_file(), &paths.legacy_settings_file());
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn counter_prefers_current_and_tolerates_garbage() {
        let paths = scratch_paths();
        assert_eq!(load_counter(&paths), 0);

        std::fs::write(paths.legacy_counter_file(), "17").unwrap();
        assert_eq!(load_counter(&paths), 17);

        std::fs::write(paths.counter_file(), " 42\n").unwrap();
        assert_eq!(load_counter(&paths), 42);

        std::fs::write(paths.counter_file(), "not a number").unwrap();
        assert_eq!(load_counter(&paths), 17);
    }

    #[test]
    fn counter_round_trips() {
        let paths = scratch_paths();
        save_counter(&paths, 1234).unwrap();
        assert_eq!(load_counter(&paths), 1234);
    }
}
