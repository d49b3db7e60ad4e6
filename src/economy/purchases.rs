use crate::shared::*;
use bevy::prelude::*;

use super::upgrades::upgrade_cost;

/// Fired by UI glue when the player confirms buying one unit of an upgrade.
#[derive(Event, Debug, Clone)]
pub struct PurchaseUpgradeEvent {
    pub upgrade_id: String,
}

/// Purchase transaction. Exactly one unit per event, no bulk buy.
/// Insufficient funds is not an error: the event is dropped with zero
/// state change and a log line, mirroring how the UI greys the button out.
pub fn handle_purchases(
    mut purchase_events: EventReader<PurchaseUpgradeEvent>,
    registry: Res<UpgradeRegistry>,
    mut state: ResMut<PlayerState>,
) {
    for ev in purchase_events.read() {
        let def = match registry.get(&ev.upgrade_id) {
            Some(def) => def,
            None => {
                warn!(
                    "[Economy] Purchase failed: unknown upgrade '{}'",
                    ev.upgrade_id
                );
                continue;
            }
        };

        let owned = state.upgrade_count(&ev.upgrade_id);
        let cost = upgrade_cost(def, owned);

        if state.flesh < cost {
            info!(
                "[Economy] Cannot afford '{}' (need {:.0}, have {:.0})",
                ev.upgrade_id, cost, state.flesh
            );
            continue;
        }

        // Commit: subtract first, then bump the owned count.
        state.add_flesh(-cost);
        state
            .upgrades_owned
            .insert(ev.upgrade_id.clone(), owned + 1);

        info!(
            "[Economy] Bought '{}' ×1 for {:.0} flesh. Owned: {}. Balance: {:.0}",
            ev.upgrade_id,
            cost,
            owned + 1,
            state.flesh
        );
    }
}
