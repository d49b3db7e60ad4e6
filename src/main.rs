mod data;
mod economy;
mod leaderboard;
mod mods;
mod save;
mod shared;

use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use bevy::state::app::StatesPlugin;

use shared::*;

fn main() {
    App::new()
        .add_plugins(
            MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(Duration::from_millis(100))),
        )
        .add_plugins(StatesPlugin)
        .add_plugins(bevy::log::LogPlugin::default())
        // Game state
        .init_state::<GameState>()
        // Shared resources
        .init_resource::<Settings>()
        .init_resource::<PlayerState>()
        .init_resource::<UpgradeRegistry>()
        .init_resource::<AchievementRegistry>()
        .init_resource::<AchievementBook>()
        // Boot order: documents, then catalogs, then mods, then reconcile
        .configure_sets(
            OnEnter(GameState::Loading),
            (
                LoadPhase::Documents,
                LoadPhase::Catalog,
                LoadPhase::Mods,
                LoadPhase::Finish,
            )
                .chain(),
        )
        // Domains
        .add_plugins(save::SavePlugin)
        .add_plugins(data::DataPlugin)
        .add_plugins(mods::ModsPlugin)
        .add_plugins(economy::EconomyPlugin)
        .add_plugins(leaderboard::LeaderboardPlugin)
        // Periodic progress line, the only output a headless run produces
        .init_resource::<ProgressReport>()
        .add_systems(
            Update,
            report_progress.run_if(in_state(GameState::Playing)),
        )
        .run();
}

#[derive(Resource)]
struct ProgressReport {
    timer: Timer,
}

impl Default for ProgressReport {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(10.0, TimerMode::Repeating),
        }
    }
}

fn report_progress(
    time: Res<Time>,
    mut report: ResMut<ProgressReport>,
    state: Res<PlayerState>,
    registry: Res<UpgradeRegistry>,
) {
    if report.timer.tick(time.delta()).just_finished() {
        let rate = economy::passive_rate(&registry, &state);
        info!(
            "[Engine] {:.0} flesh, {} clicks, {:.1}/s passive.",
            state.flesh, state.total_clicks, rate
        );
    }
}
