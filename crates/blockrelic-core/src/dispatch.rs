//! Relic lifecycle dispatch.
//!
//! Every owned relic sees every event, in display order. `RoundStart` resets
//! relics that do not persist across rounds; the rest fold the event through
//! `update_state` like any other. Copy advances its mirrored counter and
//! forwards its target's hooks.

use crate::relic::copy::{advance_mirror, mirror_request};
use crate::relic::{RelicEvent, RelicInventory, RelicRegistry, RelicRequest, RelicType};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// A side effect some relic asked for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingRequest {
    pub relic: RelicType,
    pub request: RelicRequest,
}

/// Inventory after one event, plus the requests it raised
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleOutcome {
    pub inventory: RelicInventory,
    pub requests: Vec<PendingRequest>,
}

/// Fold `event` into every owned relic's state
pub fn advance_lifecycle(
    registry: &RelicRegistry,
    inventory: &RelicInventory,
    event: &RelicEvent,
) -> LifecycleOutcome {
    let mut next = inventory.clone();
    let mut requests = Vec::new();

    for &relic in inventory.display_order() {
        let Some(module) = registry.get(relic) else {
            continue;
        };
        let state = inventory.state(relic);

        let updated = if relic == RelicType::Copy {
            advance_mirror(registry, state, event)
        } else {
            match event {
                RelicEvent::RoundStart => {
                    if let Some(request) = module.on_round_start(state) {
                        requests.push(PendingRequest { relic, request });
                    }
                    if module.persists_across_rounds() {
                        module.update_state(state, event)
                    } else {
                        module.initial_state()
                    }
                }
                RelicEvent::HandConsumed { placed_block_size } => {
                    let updated = module.update_state(state, event);
                    if let Some(request) = module.on_piece_placed(&updated, *placed_block_size) {
                        requests.push(PendingRequest { relic, request });
                    }
                    updated
                }
                _ => module.update_state(state, event),
            }
        };

        if &updated != state {
            trace!(?relic, event = event.name(), ?updated, "relic state advanced");
        }
        next.set_state(relic, updated);

        // Copy sits after its target, so `next` already holds both advanced states
        if relic == RelicType::Copy {
            if let Some(request) = mirror_request(registry, inventory, &next, event) {
                requests.push(PendingRequest { relic, request });
            }
        }
    }

    LifecycleOutcome {
        inventory: next,
        requests,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relic::RelicState;

    fn detected(rows: u32, cols: u32) -> RelicEvent {
        RelicEvent::LinesDetected {
            total_lines: rows + cols,
            row_lines: rows,
            col_lines: cols,
        }
    }

    fn cleared(lines: u32) -> RelicEvent {
        RelicEvent::LinesCleared {
            total_lines: lines,
            pattern_block_count: 0,
            cleared_pattern_types: Vec::new(),
        }
    }

    fn run(registry: &RelicRegistry, inventory: RelicInventory, events: &[RelicEvent]) -> RelicInventory {
        events.iter().fold(inventory, |inv, event| {
            advance_lifecycle(registry, &inv, event).inventory
        })
    }

    #[test]
    fn test_round_start_resets_per_round_relics() {
        let registry = RelicRegistry::standard();
        let inventory = RelicInventory::from_relics(
            &registry,
            &[RelicType::Streak, RelicType::Veteran, RelicType::Snowball],
        )
        .unwrap();

        let inventory = run(
            &registry,
            inventory,
            &[detected(1, 0), cleared(1), detected(2, 0), cleared(2)],
        );
        assert_eq!(inventory.state(RelicType::Streak).streak().count, 2);
        assert_eq!(inventory.state(RelicType::Veteran).line_tally().lines, 3);

        let inventory = run(&registry, inventory, &[RelicEvent::RoundStart]);
        assert_eq!(
            inventory.state(RelicType::Streak),
            &RelicState::Streak(Default::default())
        );
        assert_eq!(inventory.state(RelicType::Veteran).line_tally().lines, 3);
        assert_eq!(inventory.state(RelicType::Snowball).round_tally().rounds, 1);
    }

    #[test]
    fn test_round_start_collects_requests() {
        let registry = RelicRegistry::standard();
        let inventory = RelicInventory::from_relics(
            &registry,
            &[RelicType::ExtraHand, RelicType::GlassCannon, RelicType::PiggyBank],
        )
        .unwrap();

        let outcome = advance_lifecycle(&registry, &inventory, &RelicEvent::RoundStart);
        assert_eq!(
            outcome.requests,
            vec![
                PendingRequest {
                    relic: RelicType::ExtraHand,
                    request: RelicRequest::GrantHands { amount: 1 },
                },
                PendingRequest {
                    relic: RelicType::PiggyBank,
                    request: RelicRequest::GrantGold { amount: 3 },
                },
            ]
        );
    }

    #[test]
    fn test_piece_placed_sees_updated_state() {
        let registry = RelicRegistry::standard();
        let mut inventory =
            RelicInventory::from_relics(&registry, &[RelicType::BonusPiece]).unwrap();
        let placed = RelicEvent::HandConsumed {
            placed_block_size: 2,
        };

        let mut fired = Vec::new();
        for hand in 1..=5 {
            let outcome = advance_lifecycle(&registry, &inventory, &placed);
            if !outcome.requests.is_empty() {
                fired.push(hand);
            }
            inventory = outcome.inventory;
        }
        assert_eq!(fired, vec![5]);
    }

    #[test]
    fn test_copy_forwards_round_start_hooks() {
        let registry = RelicRegistry::standard();
        let inventory =
            RelicInventory::from_relics(&registry, &[RelicType::PiggyBank, RelicType::Copy])
                .unwrap();

        let outcome = advance_lifecycle(&registry, &inventory, &RelicEvent::RoundStart);
        assert_eq!(
            outcome.requests,
            vec![
                PendingRequest {
                    relic: RelicType::PiggyBank,
                    request: RelicRequest::GrantGold { amount: 3 },
                },
                PendingRequest {
                    relic: RelicType::Copy,
                    request: RelicRequest::GrantGold { amount: 3 },
                },
            ]
        );

        // Copy at the front mirrors nothing
        let front = inventory
            .reorder(&registry, vec![RelicType::Copy, RelicType::PiggyBank])
            .unwrap();
        let outcome = advance_lifecycle(&registry, &front, &RelicEvent::RoundStart);
        assert_eq!(outcome.requests.len(), 1);
    }

    #[test]
    fn test_copy_forwards_bonus_piece_on_the_same_hand() {
        let registry = RelicRegistry::standard();
        let mut inventory =
            RelicInventory::from_relics(&registry, &[RelicType::BonusPiece, RelicType::Copy])
                .unwrap();
        let placed = RelicEvent::HandConsumed {
            placed_block_size: 1,
        };

        let mut fired = Vec::new();
        for hand in 1..=5 {
            let outcome = advance_lifecycle(&registry, &inventory, &placed);
            for pending in &outcome.requests {
                fired.push((hand, pending.relic));
            }
            inventory = outcome.inventory;
        }
        assert_eq!(
            fired,
            vec![(5, RelicType::BonusPiece), (5, RelicType::Copy)]
        );
    }

    #[test]
    fn test_combo_breaks_on_hand_without_clear() {
        let registry = RelicRegistry::standard();
        let inventory = RelicInventory::from_relics(&registry, &[RelicType::Combo]).unwrap();
        let hand = RelicEvent::HandConsumed {
            placed_block_size: 3,
        };

        let inventory = run(
            &registry,
            inventory,
            &[hand.clone(), detected(1, 0), hand.clone(), detected(0, 1)],
        );
        assert_eq!(inventory.state(RelicType::Combo).combo().chain, 2);

        // A hand without a clear, then the next hand breaks the chain
        let inventory = run(&registry, inventory, &[hand.clone(), hand]);
        assert_eq!(inventory.state(RelicType::Combo).combo().chain, 0);
    }

    #[test]
    fn test_copy_counter_advances_with_original() {
        let registry = RelicRegistry::standard();
        let inventory =
            RelicInventory::from_relics(&registry, &[RelicType::Streak, RelicType::Copy])
                .unwrap();

        let inventory = run(&registry, inventory, &[detected(0, 1), detected(0, 1)]);
        let mirrored = *inventory.state(RelicType::Copy).copy().mirrored;
        assert_eq!(mirrored, *inventory.state(RelicType::Streak));
        assert_eq!(mirrored.streak().count, 2);

        let inventory = run(&registry, inventory, &[RelicEvent::RoundStart]);
        assert_eq!(
            (*inventory.state(RelicType::Copy).copy().mirrored).streak().count,
            0
        );
    }
}
