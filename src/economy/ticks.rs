use crate::shared::*;
use bevy::prelude::*;

use super::upgrades::passive_rate;

/// Repeating timer driving passive production. One tick per second of
/// real time; the timer accumulates elapsed time, so a frame stalled by a
/// blocking leaderboard call still pays out every missed second.
#[derive(Resource, Debug)]
pub struct PassiveTick {
    pub timer: Timer,
}

impl Default for PassiveTick {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(1.0, TimerMode::Repeating),
        }
    }
}

/// Adds the passive yield for every completed tick. Ticks never count as
/// clicks — `total_clicks` is untouched here.
pub fn passive_tick(
    time: Res<Time>,
    mut tick: ResMut<PassiveTick>,
    registry: Res<UpgradeRegistry>,
    mut state: ResMut<PlayerState>,
) {
    tick.timer.tick(time.delta());
    let finished = tick.timer.times_finished_this_tick();
    if finished == 0 {
        return;
    }

    let rate = passive_rate(&registry, &state);
    if rate > 0.0 {
        state.add_flesh(rate * finished as f64);
    }
}
