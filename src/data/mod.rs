//! Data layer — populates the upgrade and achievement catalogs at startup.
//!
//! Runs in `OnEnter(GameState::Loading)` during `LoadPhase::Catalog`,
//! after the save documents have been read but before mods merge their
//! contributions. No other domain seeds these registries.

mod achievements;
mod upgrades;

use crate::shared::*;
use bevy::prelude::*;

pub use achievements::populate_achievements;
pub use upgrades::populate_upgrades;

pub struct DataPlugin;

impl Plugin for DataPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<UpgradeRegistry>()
            .init_resource::<AchievementRegistry>()
            .add_systems(
                OnEnter(GameState::Loading),
                load_catalogs.in_set(LoadPhase::Catalog),
            );
    }
}

fn load_catalogs(
    mut upgrade_registry: ResMut<UpgradeRegistry>,
    mut achievement_registry: ResMut<AchievementRegistry>,
) {
    populate_upgrades(&mut upgrade_registry);
    populate_achievements(&mut achievement_registry);
    info!(
        "[Data] Catalogs populated: {} upgrades, {} achievements.",
        upgrade_registry.upgrades.len(),
        achievement_registry.defs.len()
    );
}
