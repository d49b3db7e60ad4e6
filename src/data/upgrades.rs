use crate::shared::*;

/// Populate the UpgradeRegistry with the built-in catalog.
///
/// Cost curve: `base_cost × cost_mult^owned` — each copy of an upgrade is
/// proportionally more expensive than the last. `crit_click` carries no
/// flat yield; each owned level adds 5% chance to double a click instead
/// (see `economy::CRIT_CHANCE_PER_LEVEL`).
pub fn populate_upgrades(registry: &mut UpgradeRegistry) {
    let upgrades: Vec<(&str, UpgradeDef)> = vec![
        (
            "bigger_clicks",
            UpgradeDef {
                name: "Bigger Clicks".into(),
                desc: "+1 flesh per click.".into(),
                kind: UpgradeKind::Click,
                category: "click".into(),
                base_cost: 10.0,
                cost_mult: 1.15,
                flesh_per_sec: 0.0,
                flesh_per_click: 1.0,
            },
        ),
        (
            "auto_clicker_1",
            UpgradeDef {
                name: "Autoclicker Mk.I".into(),
                desc: "+1 flesh/sec per unit.".into(),
                kind: UpgradeKind::Auto,
                category: "auto".into(),
                base_cost: 25.0,
                cost_mult: 1.15,
                flesh_per_sec: 1.0,
                flesh_per_click: 0.0,
            },
        ),
        (
            "auto_clicker_2",
            UpgradeDef {
                name: "Autoclicker Mk.II".into(),
                desc: "+2 flesh/sec per unit.".into(),
                kind: UpgradeKind::Auto,
                category: "auto".into(),
                base_cost: 100.0,
                cost_mult: 1.18,
                flesh_per_sec: 2.0,
                flesh_per_click: 0.0,
            },
        ),
        (
            "crit_click",
            UpgradeDef {
                name: "Critical Clicks".into(),
                desc: "Chance for double flesh per click.".into(),
                kind: UpgradeKind::Click,
                category: "click".into(),
                base_cost: 200.0,
                cost_mult: 1.2,
                flesh_per_sec: 0.0,
                flesh_per_click: 0.0,
            },
        ),
    ];

    for (id, def) in upgrades {
        registry.upgrades.insert(id.to_string(), def);
    }
}
