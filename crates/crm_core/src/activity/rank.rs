//! Merge and ranking of per-kind event sequences.
//!
//! Ties on `occurred_at` keep insertion order: sequences are concatenated in
//! the order given and then stable-sorted, so earlier sequences win ties and
//! events of one record keep their derivation order.

use crate::model::activity::ActivityEvent;

/// Concatenates `sequences`, orders newest first and keeps at most `limit`.
pub fn merge_and_rank<I>(sequences: I, limit: usize) -> Vec<ActivityEvent>
where
    I: IntoIterator<Item = Vec<ActivityEvent>>,
{
    let mut merged: Vec<ActivityEvent> = sequences.into_iter().flatten().collect();
    merged.sort_by(|left, right| right.occurred_at.cmp(&left.occurred_at));
    merged.truncate(limit);
    merged
}
