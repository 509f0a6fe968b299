//! The Copy relic's mirroring rules.
//!
//! Copy mirrors whichever relic sits immediately before it in display order.
//! It is inactive at index 0 and when its neighbour is itself a Copy.
//!
//! Counter relics (`MirrorPolicy::OwnCounter`) are mirrored against Copy's
//! own instance of the counter, stored in [`CopyState::mirrored`] and advanced
//! by the lifecycle dispatcher alongside the original. Every other relic is
//! mirrored against the original's state. Whenever Copy's target changes its
//! own counter goes back to the new target's initial state.
//!
//! The target's lifecycle hooks are forwarded too, so a relic that only acts
//! through `on_round_start` or `on_piece_placed` fires a second time.

use crate::relic::state::CopyState;
use crate::relic::{
    MirrorPolicy, RelicActivation, RelicEffectContext, RelicEvent, RelicInventory, RelicModule,
    RelicRegistry, RelicRequest, RelicState, RelicType, ScoreEffect,
};
use serde::{Deserialize, Serialize};

/// Copy's resolved contribution for one scoring event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopyResolution {
    pub target: RelicType,
    pub score_effect: ScoreEffect,
    pub activation: RelicActivation,
}

/// The relic Copy mirrors under `order`, if any
pub fn copy_target(order: &[RelicType]) -> Option<RelicType> {
    let index = order.iter().position(|&r| r == RelicType::Copy)?;
    if index == 0 {
        return None;
    }
    let target = order[index - 1];
    (target != RelicType::Copy).then_some(target)
}

/// Evaluate the target's activation on Copy's behalf
pub fn resolve_copy(
    registry: &RelicRegistry,
    inventory: &RelicInventory,
    ctx: &RelicEffectContext,
) -> Option<CopyResolution> {
    if !inventory.owns(RelicType::Copy) {
        return None;
    }
    let target = copy_target(inventory.display_order())?;
    let module = registry.get(target)?;
    let state = mirrored_state(module, target, inventory);

    Some(CopyResolution {
        target,
        score_effect: module.score_effect(),
        activation: module.check_activation(ctx, &state),
    })
}

/// Run the target's lifecycle hook on Copy's behalf.
///
/// `before` is the inventory the event started from. `after` must already
/// hold the advanced states of both the target and Copy.
pub fn mirror_request(
    registry: &RelicRegistry,
    before: &RelicInventory,
    after: &RelicInventory,
    event: &RelicEvent,
) -> Option<RelicRequest> {
    if !before.owns(RelicType::Copy) {
        return None;
    }
    let target = copy_target(before.display_order())?;
    let module = registry.get(target)?;
    match event {
        RelicEvent::RoundStart => module.on_round_start(&mirrored_state(module, target, before)),
        RelicEvent::HandConsumed { placed_block_size } => {
            module.on_piece_placed(&mirrored_state(module, target, after), *placed_block_size)
        }
        _ => None,
    }
}

/// The state Copy evaluates `target` against
fn mirrored_state(
    module: &dyn RelicModule,
    target: RelicType,
    inventory: &RelicInventory,
) -> RelicState {
    match module.mirror_policy() {
        MirrorPolicy::SharedState => inventory.state(target).clone(),
        MirrorPolicy::OwnCounter => {
            let copy = inventory.state(RelicType::Copy).copy();
            if copy.target == Some(target) {
                *copy.mirrored
            } else {
                module.initial_state()
            }
        }
    }
}

/// Reset Copy's own counter if its target no longer matches the display order
pub fn sync_copy_target(registry: &RelicRegistry, inventory: RelicInventory) -> RelicInventory {
    if !inventory.owns(RelicType::Copy) {
        return inventory;
    }
    let target = copy_target(inventory.display_order());
    if inventory.state(RelicType::Copy).copy().target == target {
        return inventory;
    }

    let mirrored = target
        .and_then(|t| registry.get(t))
        .map(|m| m.initial_state())
        .unwrap_or_default();
    tracing::debug!(?target, "copy target changed, resetting mirrored counter");

    let mut inventory = inventory;
    inventory.set_state(
        RelicType::Copy,
        RelicState::Copy(CopyState {
            target,
            mirrored: Box::new(mirrored),
        }),
    );
    inventory
}

/// Advance Copy's mirrored counter through one lifecycle event
pub fn advance_mirror(
    registry: &RelicRegistry,
    copy_state: &RelicState,
    event: &RelicEvent,
) -> RelicState {
    let state = copy_state.copy();
    let Some(module) = state.target.and_then(|t| registry.get(t)) else {
        return RelicState::Copy(state);
    };

    let mirrored = match event {
        RelicEvent::RoundStart if !module.persists_across_rounds() => module.initial_state(),
        _ => module.update_state(&state.mirrored, event),
    };
    RelicState::Copy(CopyState {
        target: state.target,
        mirrored: Box::new(mirrored),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detected_rows(rows: u32) -> RelicEvent {
        RelicEvent::LinesDetected {
            total_lines: rows,
            row_lines: rows,
            col_lines: 0,
        }
    }

    #[test]
    fn test_copy_target_rules() {
        use RelicType::*;
        assert_eq!(copy_target(&[Copy, GlassCannon]), None);
        assert_eq!(copy_target(&[GlassCannon, Copy]), Some(GlassCannon));
        assert_eq!(copy_target(&[Streak, GlassCannon, Copy]), Some(GlassCannon));
        assert_eq!(copy_target(&[Streak, GlassCannon]), None);
    }

    #[test]
    fn test_copy_at_front_is_inactive() {
        let registry = RelicRegistry::standard();
        let inventory = RelicInventory::from_relics(
            &registry,
            &[RelicType::Copy, RelicType::GlassCannon],
        )
        .unwrap();
        let ctx = RelicEffectContext {
            lines_cleared: 6,
            ..RelicEffectContext::default()
        };
        assert!(resolve_copy(&registry, &inventory, &ctx).is_none());
    }

    #[test]
    fn test_copy_mirrors_shared_state_target() {
        let registry = RelicRegistry::standard();
        let inventory = RelicInventory::from_relics(
            &registry,
            &[RelicType::GlassCannon, RelicType::Copy],
        )
        .unwrap();
        let resolution =
            resolve_copy(&registry, &inventory, &RelicEffectContext::default()).unwrap();
        assert_eq!(resolution.target, RelicType::GlassCannon);
        assert_eq!(resolution.score_effect, ScoreEffect::Multiplicative);
        assert_eq!(resolution.activation.value, 1.5);
    }

    #[test]
    fn test_copy_uses_its_own_streak_counter() {
        let registry = RelicRegistry::standard();
        let inventory = RelicInventory::from_relics(
            &registry,
            &[RelicType::Streak, RelicType::Copy],
        )
        .unwrap();

        // Original has a long streak, Copy's own counter has seen one clear
        let mut inventory = inventory;
        inventory.set_state(
            RelicType::Streak,
            RelicState::Streak(crate::relic::state::StreakState {
                orientation: Some(crate::relic::event::ClearOrientation::Rows),
                count: 4,
            }),
        );
        let copy_state = advance_mirror(
            &registry,
            inventory.state(RelicType::Copy),
            &detected_rows(1),
        );
        inventory.set_state(RelicType::Copy, copy_state);

        let resolution =
            resolve_copy(&registry, &inventory, &RelicEffectContext::default()).unwrap();
        assert!(!resolution.activation.active);

        let copy_state = advance_mirror(
            &registry,
            inventory.state(RelicType::Copy),
            &detected_rows(2),
        );
        inventory.set_state(RelicType::Copy, copy_state);
        let resolution =
            resolve_copy(&registry, &inventory, &RelicEffectContext::default()).unwrap();
        assert_eq!(resolution.activation.value, 1.5);
    }

    #[test]
    fn test_sync_resets_only_on_target_change() {
        let registry = RelicRegistry::standard();
        let inventory = RelicInventory::from_relics(
            &registry,
            &[RelicType::GlassCannon, RelicType::Streak, RelicType::Copy],
        )
        .unwrap();
        let advanced = advance_mirror(
            &registry,
            inventory.state(RelicType::Copy),
            &detected_rows(1),
        );
        let mut inventory = inventory;
        inventory.set_state(RelicType::Copy, advanced.clone());

        // Same neighbour: untouched
        let same = inventory
            .reorder(
                &registry,
                vec![RelicType::Streak, RelicType::Copy, RelicType::GlassCannon],
            )
            .unwrap();
        assert_eq!(same.state(RelicType::Copy), &advanced);

        // New neighbour: reset
        let moved = inventory
            .reorder(
                &registry,
                vec![RelicType::Streak, RelicType::GlassCannon, RelicType::Copy],
            )
            .unwrap();
        assert_eq!(
            moved.state(RelicType::Copy).copy(),
            CopyState {
                target: Some(RelicType::GlassCannon),
                mirrored: Box::new(RelicState::Stateless),
            }
        );
    }

    #[test]
    fn test_round_start_resets_mirrored_counter() {
        let registry = RelicRegistry::standard();
        let inventory = RelicInventory::from_relics(
            &registry,
            &[RelicType::Streak, RelicType::Copy],
        )
        .unwrap();
        let state = advance_mirror(
            &registry,
            inventory.state(RelicType::Copy),
            &detected_rows(1),
        );
        assert_eq!((*state.copy().mirrored).streak().count, 1);

        let state = advance_mirror(&registry, &state, &RelicEvent::RoundStart);
        assert_eq!((*state.copy().mirrored).streak().count, 0);
    }
}
