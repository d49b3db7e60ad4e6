//! Achievement evaluation.
//!
//! Re-checks every locked catalog entry after the frame's mutations.
//! Rules are independent thresholds and unlocking is monotone, so
//! re-evaluating everything on every frame is correct and side-effect-free
//! for already-unlocked ids.

use crate::shared::*;
use bevy::prelude::*;

/// Returns `true` if the rule is satisfied by the current game state.
pub fn evaluate_rule(rule: AchievementRule, state: &PlayerState) -> bool {
    match rule {
        AchievementRule::TotalClicks(n) => state.total_clicks >= n,
        AchievementRule::Flesh(amount) => state.flesh >= amount,
        AchievementRule::TotalUpgrades(n) => state.total_upgrades_owned() >= n,
    }
}

/// Collects newly satisfied achievements, then unlocks them. The book is
/// only written when a transition actually happens, so the write-through
/// persistence condition (`resource_changed`) stays quiet otherwise.
pub fn check_achievements(
    registry: Res<AchievementRegistry>,
    state: Res<PlayerState>,
    mut book: ResMut<AchievementBook>,
    mut events: EventWriter<AchievementUnlockedEvent>,
) {
    let mut newly_unlocked: Vec<(String, String, String)> = Vec::new();

    for (id, def) in &registry.defs {
        if book.is_unlocked(id) {
            continue;
        }
        let Some(rule) = def.rule else { continue };
        if evaluate_rule(rule, &state) {
            newly_unlocked.push((id.clone(), def.name.clone(), def.desc.clone()));
        }
    }

    for (id, name, desc) in newly_unlocked {
        if book.unlock(&id) {
            info!("[Achievements] Unlocked: \"{name}\" ({desc})");
            events.send(AchievementUnlockedEvent {
                achievement_id: id,
                name,
                desc,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn click_thresholds() {
        let mut state = PlayerState::default();
        assert!(!evaluate_rule(AchievementRule::TotalClicks(1), &state));
        state.total_clicks = 1;
        assert!(evaluate_rule(AchievementRule::TotalClicks(1), &state));
        assert!(!evaluate_rule(AchievementRule::TotalClicks(10), &state));
    }

    #[test]
    fn flesh_threshold_is_inclusive() {
        let mut state = PlayerState::default();
        state.flesh = 100.0;
        assert!(evaluate_rule(AchievementRule::Flesh(100.0), &state));
        assert!(!evaluate_rule(AchievementRule::Flesh(1000.0), &state));
    }

    #[test]
    fn upgrade_threshold_counts_across_ids() {
        let mut state = PlayerState::default();
        state.upgrades_owned.insert("a".into(), 3);
        state.upgrades_owned.insert("b".into(), 2);
        assert!(evaluate_rule(AchievementRule::TotalUpgrades(5), &state));
        assert!(!evaluate_rule(AchievementRule::TotalUpgrades(6), &state));
    }
}
