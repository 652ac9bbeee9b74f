// Position reconciliation (pure ranking)
//
// Rank every pending row by (queue_position, customer_id) and hand back the
// rows whose slot has to move so the pending set reads 1..N again.

use crate::domain::customer::{CustomerId, QueuePosition};

/// Current slot of one pending row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingSlot {
    pub customer_id: CustomerId,
    pub queue_position: QueuePosition,
}

/// New slot for one pending row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionUpdate {
    pub customer_id: CustomerId,
    pub queue_position: QueuePosition,
}

/// Compute the batch of position rewrites that compacts `slots`
///
/// Only rows whose position actually changes are returned, so a compact
/// queue yields an empty batch.
pub fn plan(slots: &[PendingSlot]) -> Vec<PositionUpdate> {
    let mut ranked = slots.to_vec();
    ranked.sort_by_key(|s| (s.queue_position, s.customer_id));

    ranked
        .into_iter()
        .zip(1..)
        .filter(|(slot, rank)| slot.queue_position != *rank)
        .map(|(slot, rank)| PositionUpdate {
            customer_id: slot.customer_id,
            queue_position: rank,
        })
        .collect()
}

/// True when the slots are exactly 1..N with no duplicates
#[cfg(test)]
pub fn is_compact(slots: &[PendingSlot]) -> bool {
    let mut positions: Vec<QueuePosition> = slots.iter().map(|s| s.queue_position).collect();
    positions.sort_unstable();
    positions.into_iter().zip(1..).all(|(pos, rank)| pos == rank)
}

/// Apply a plan to an in-memory slot list
#[cfg(test)]
pub fn apply(slots: &mut [PendingSlot], updates: &[PositionUpdate]) {
    for update in updates {
        if let Some(slot) = slots.iter_mut().find(|s| s.customer_id == update.customer_id) {
            slot.queue_position = update.queue_position;
        }
    }
}
