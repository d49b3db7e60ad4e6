use crate::shared::*;
use bevy::prelude::*;
use rand::Rng;

use super::upgrades::effective_click_yield;

/// Upgrade whose owned count drives the critical-hit chance.
pub const CRIT_UPGRADE_ID: &str = "crit_click";

/// Crit chance added per owned `crit_click` level. Deliberately uncapped:
/// from level 20 up the chance reaches 1.0 and every click crits.
pub const CRIT_CHANCE_PER_LEVEL: f64 = 0.05;

/// Fired by UI glue for every manual click on the flesh.
#[derive(Event, Debug, Clone)]
pub struct ClickEvent;

/// Resolve one click given the pre-crit yield, the owned crit level, and a
/// uniform roll in [0, 1). Returns the final yield and whether it crit.
/// The roll is an argument so the outcome stays deterministic under test.
pub fn click_outcome(yield_before_crit: f64, crit_level: u32, roll: f64) -> (f64, bool) {
    let crit_chance = CRIT_CHANCE_PER_LEVEL * crit_level as f64;
    if roll < crit_chance {
        (yield_before_crit * 2.0, true)
    } else {
        (yield_before_crit, false)
    }
}

/// Click transaction: yield (possibly doubled by a crit) is added to the
/// balance and the click counter advances. Achievement checks and the
/// write-through save both run later in the same frame.
pub fn handle_clicks(
    mut click_events: EventReader<ClickEvent>,
    registry: Res<UpgradeRegistry>,
    mut state: ResMut<PlayerState>,
) {
    for _ in click_events.read() {
        let base = effective_click_yield(&registry, &state);
        let crit_level = state.upgrade_count(CRIT_UPGRADE_ID);
        let roll = rand::thread_rng().gen::<f64>();
        let (gained, crit) = click_outcome(base, crit_level, roll);

        state.add_flesh(gained);
        state.total_clicks += 1;

        if crit {
            info!(
                "[Economy] Critical click! +{gained} flesh. Balance: {:.0}",
                state.flesh
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_crit_levels_means_no_crit() {
        // chance = 0.0; even the smallest roll stays below nothing.
        let (gained, crit) = click_outcome(1.0, 0, 0.0);
        assert_eq!(gained, 1.0);
        assert!(!crit);
    }

    #[test]
    fn crit_doubles_the_yield() {
        let (gained, crit) = click_outcome(3.0, 1, 0.01);
        assert_eq!(gained, 6.0);
        assert!(crit);
    }

    #[test]
    fn crit_roll_is_strictly_below_chance() {
        let (_, crit) = click_outcome(1.0, 1, 0.05);
        assert!(!crit, "roll equal to chance must not crit");
    }

    #[test]
    fn level_twenty_crits_are_guaranteed() {
        // 0.05 × 20 = 1.0; every roll in [0, 1) is below it.
        let (gained, crit) = click_outcome(2.0, 20, 0.999_999);
        assert!(crit);
        assert_eq!(gained, 4.0);
    }
}
