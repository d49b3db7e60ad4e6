//! Economy domain — clicks, purchases, passive production, achievements.
//!
//! All cross-domain communication goes through `crate::shared::*` events
//! and resources. No other domain module is imported here.

use crate::shared::*;
use bevy::prelude::*;

pub mod achievements;
pub mod clicks;
pub mod purchases;
pub mod ticks;
pub mod upgrades;

pub use clicks::{click_outcome, ClickEvent, CRIT_CHANCE_PER_LEVEL, CRIT_UPGRADE_ID};
pub use purchases::PurchaseUpgradeEvent;
pub use ticks::PassiveTick;
pub use upgrades::{effective_click_yield, extra_click_yield, passive_rate, upgrade_cost};

use achievements::check_achievements;
use clicks::handle_clicks;
use purchases::handle_purchases;
use ticks::passive_tick;

// ─────────────────────────────────────────────────────────────────────────────
// Plugin
// ─────────────────────────────────────────────────────────────────────────────

pub struct EconomyPlugin;

impl Plugin for EconomyPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PassiveTick>();

        app.add_event::<ClickEvent>()
            .add_event::<PurchaseUpgradeEvent>()
            .add_event::<AchievementUnlockedEvent>();

        app.configure_sets(Update, (GameSet::Mutate, GameSet::Commit).chain());

        // One frame = one serialized batch of mutations: clicks, then
        // purchases, then the passive tick, then the milestone check over
        // the combined result.
        app.add_systems(
            Update,
            (
                handle_clicks,
                handle_purchases,
                passive_tick,
                check_achievements,
            )
                .chain()
                .in_set(GameSet::Mutate)
                .run_if(in_state(GameState::Playing)),
        );
    }
}
