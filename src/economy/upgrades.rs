//! Pure economy math over `PlayerState` + `UpgradeRegistry`.
//!
//! These functions double as the read-only snapshot surface for UI glue:
//! costs, production rates, and yields are all derived, never stored.

use crate::shared::*;

/// Cost of the next unit of an upgrade given how many are already owned:
/// `base_cost × cost_mult^owned`. Strictly increasing in `owned` for any
/// `cost_mult > 1`.
pub fn upgrade_cost(def: &UpgradeDef, owned: u32) -> f64 {
    def.base_cost * def.cost_mult.powi(owned as i32)
}

/// Total passive production in flesh per second across all auto upgrades.
pub fn passive_rate(registry: &UpgradeRegistry, state: &PlayerState) -> f64 {
    registry
        .upgrades
        .iter()
        .filter(|(_, def)| def.kind == UpgradeKind::Auto)
        .map(|(id, def)| def.flesh_per_sec * state.upgrade_count(id) as f64)
        .sum()
}

/// Flat per-click bonus contributed by owned click upgrades.
pub fn extra_click_yield(registry: &UpgradeRegistry, state: &PlayerState) -> f64 {
    registry
        .upgrades
        .iter()
        .filter(|(_, def)| def.kind == UpgradeKind::Click)
        .map(|(id, def)| def.flesh_per_click * state.upgrade_count(id) as f64)
        .sum()
}

/// Base per-click yield plus all flat click bonuses, before any crit.
pub fn effective_click_yield(registry: &UpgradeRegistry, state: &PlayerState) -> f64 {
    state.flesh_per_click + extra_click_yield(registry, state)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> UpgradeRegistry {
        let mut registry = UpgradeRegistry::default();
        crate::data::populate_upgrades(&mut registry);
        registry
    }

    #[test]
    fn cost_curve_is_strictly_increasing() {
        let registry = catalog();
        let def = registry.get("bigger_clicks").unwrap();
        for owned in 0..30 {
            assert!(
                upgrade_cost(def, owned + 1) > upgrade_cost(def, owned),
                "cost must strictly increase at owned={owned}"
            );
        }
    }

    #[test]
    fn cost_at_zero_owned_is_base_cost() {
        let registry = catalog();
        let def = registry.get("bigger_clicks").unwrap();
        assert_eq!(upgrade_cost(def, 0), 10.0);
    }

    #[test]
    fn passive_rate_sums_auto_upgrades() {
        let registry = catalog();
        let mut state = PlayerState::default();
        state.upgrades_owned.insert("auto_clicker_1".into(), 3);
        state.upgrades_owned.insert("auto_clicker_2".into(), 2);
        // 3×1.0 + 2×2.0
        assert_eq!(passive_rate(&registry, &state), 7.0);
    }

    #[test]
    fn click_upgrades_do_not_leak_into_passive_rate() {
        let registry = catalog();
        let mut state = PlayerState::default();
        state.upgrades_owned.insert("bigger_clicks".into(), 10);
        assert_eq!(passive_rate(&registry, &state), 0.0);
    }

    #[test]
    fn effective_click_yield_includes_base_and_bonus() {
        let registry = catalog();
        let mut state = PlayerState::default();
        assert_eq!(effective_click_yield(&registry, &state), 1.0);
        state.upgrades_owned.insert("bigger_clicks".into(), 2);
        assert_eq!(effective_click_yield(&registry, &state), 3.0);
    }
}
