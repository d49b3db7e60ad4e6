use crate::shared::*;

/// Populate the AchievementRegistry with the built-in milestones.
///
/// Every rule is an independent threshold over `PlayerState`, so the
/// evaluator can re-check all of them after any mutation without caring
/// about ordering.
pub fn populate_achievements(registry: &mut AchievementRegistry) {
    let defs: Vec<(&str, &str, &str, AchievementRule)> = vec![
        (
            "first_click",
            "First Click",
            "Click the flesh at least once.",
            AchievementRule::TotalClicks(1),
        ),
        (
            "ten_clicks",
            "Ten Clicks",
            "Click the flesh 10 times.",
            AchievementRule::TotalClicks(10),
        ),
        (
            "hundred_clicks",
            "Hundred Clicks",
            "Click the flesh 100 times.",
            AchievementRule::TotalClicks(100),
        ),
        (
            "first_upgrade",
            "First Upgrade",
            "Buy your first upgrade.",
            AchievementRule::TotalUpgrades(1),
        ),
        (
            "five_upgrades",
            "Upgrade Collector",
            "Own at least 5 upgrades total.",
            AchievementRule::TotalUpgrades(5),
        ),
        (
            "hundred_flesh",
            "Flesh Pile",
            "Reach 100 flesh.",
            AchievementRule::Flesh(100.0),
        ),
        (
            "thousand_flesh",
            "Flesh Mountain",
            "Reach 1000 flesh.",
            AchievementRule::Flesh(1000.0),
        ),
    ];

    for (id, name, desc, rule) in defs {
        registry.defs.insert(
            id.to_string(),
            AchievementDef {
                name: name.into(),
                desc: desc.into(),
                rule: Some(rule),
            },
        );
    }
}
