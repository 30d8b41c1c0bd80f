//! Zero Number engine
//!
//! A player's Zero Number is the fewest "lost to" steps from them to the
//! reference player: the root has 0, anyone who lost to the root has 1, anyone
//! who lost to one of those has 2, and so on. Every edge weighs one hop, so a
//! breadth-first traversal from the root gives the shortest distances.

use crate::error::{LadderError, Result};
use crate::registry::PlayerRegistry;
use crate::types::{PlayerId, ZeroNumber};
use std::collections::{HashMap, VecDeque};
use tracing::info;

/// Compute Zero Numbers for every player without touching the registry.
///
/// Fails with `UnknownPlayer` when the root is not in the registry.
pub fn compute_zero_numbers(
    registry: &PlayerRegistry,
    root: &str,
) -> Result<HashMap<PlayerId, ZeroNumber>> {
    if !registry.contains(root) {
        return Err(LadderError::unknown_player(root));
    }

    let mut distances: HashMap<PlayerId, ZeroNumber> = registry
        .players()
        .into_iter()
        .map(|player| (player.id().to_string(), ZeroNumber::Unreachable))
        .collect();

    let mut queue = VecDeque::new();
    distances.insert(root.to_string(), ZeroNumber::Reachable(0));
    queue.push_back((root.to_string(), 0u32));

    while let Some((id, hops)) = queue.pop_front() {
        let Some(player) = registry.get(&id) else {
            continue;
        };

        // Everyone this player beat lost to them, one hop further out
        for opponent in player.opponents_beaten() {
            let entry = distances
                .entry(opponent.to_string())
                .or_insert(ZeroNumber::Unreachable);
            if !entry.is_reachable() {
                *entry = ZeroNumber::Reachable(hops + 1);
                queue.push_back((opponent.to_string(), hops + 1));
            }
        }
    }

    Ok(distances)
}

/// Compute Zero Numbers and write them through the registry setter
pub fn assign_zero_numbers(
    registry: &mut PlayerRegistry,
    root: &str,
) -> Result<HashMap<PlayerId, ZeroNumber>> {
    let distances = compute_zero_numbers(registry, root)?;
    apply_zero_numbers(registry, &distances)?;

    let reachable = distances.values().filter(|z| z.is_reachable()).count();
    info!(
        "Zero Numbers from {}: {} of {} players reachable",
        root,
        reachable,
        distances.len()
    );
    Ok(distances)
}

/// Write previously computed Zero Numbers back into the registry
pub fn apply_zero_numbers(
    registry: &mut PlayerRegistry,
    distances: &HashMap<PlayerId, ZeroNumber>,
) -> Result<()> {
    for (id, zero_number) in distances {
        registry.set_zero_number(id, *zero_number)?;
    }
    Ok(())
}
