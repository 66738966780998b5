//! Dense display-order maintenance for sibling lists.
//!
//! Exercises within a date and sets within an exercise carry an integer
//! `order` that is kept dense and zero-based: insertion appends at the end,
//! a reorder gesture rewrites the whole sibling list to its new visual
//! sequence, and set deletion resequences the survivors. Ties on `order`
//! fall back to `id` ascending so the sequence is always deterministic.

/// Order for a newly appended sibling: one past the current maximum,
/// 0 when the list is empty. New items are never inserted mid-sequence.
pub fn append_order(existing: &[i64]) -> i64 {
    existing.iter().max().map_or(0, |max| max + 1)
}

/// Rewrite `(id, order)` pairs into a dense 0..n-1 sequence.
///
/// Siblings are sorted by their current `(order, id)` — preserving relative
/// order, with id as the stable tie-break — and each gets its index as the
/// new order. O(n log n) full rewrite, not an incremental shift.
pub fn resequence(siblings: &mut [(i64, i64)]) {
    siblings.sort_by_key(|&(id, order)| (order, id));
    for (index, (_, order)) in siblings.iter_mut().enumerate() {
        *order = index as i64;
    }
}

/// Dense orders for an explicitly requested visual sequence: position in the
/// slice is the new order.
pub fn orders_for_sequence(ids_in_visual_order: &[i64]) -> Vec<(i64, i64)> {
    ids_in_visual_order
        .iter()
        .enumerate()
        .map(|(index, &id)| (id, index as i64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_starts_at_zero() {
        assert_eq!(append_order(&[]), 0);
    }

    #[test]
    fn append_goes_one_past_max() {
        assert_eq!(append_order(&[0, 1, 2]), 3);
        // Gaps are tolerated; append still lands past the max.
        assert_eq!(append_order(&[1, 4]), 5);
    }

    #[test]
    fn resequence_closes_gaps_preserving_relative_order() {
        let mut siblings = vec![(10, 4), (11, 1), (12, 7)];
        resequence(&mut siblings);
        assert_eq!(siblings, vec![(11, 0), (10, 1), (12, 2)]);
    }

    #[test]
    fn resequence_breaks_order_ties_by_id() {
        let mut siblings = vec![(22, 0), (21, 0), (23, 0)];
        resequence(&mut siblings);
        assert_eq!(siblings, vec![(21, 0), (22, 1), (23, 2)]);
    }

    #[test]
    fn resequence_is_dense_zero_based() {
        let mut siblings: Vec<(i64, i64)> = (0..6).map(|i| (100 + i, i * 3)).collect();
        resequence(&mut siblings);
        let orders: Vec<i64> = siblings.iter().map(|&(_, o)| o).collect();
        assert_eq!(orders, (0..6).collect::<Vec<i64>>());
    }

    #[test]
    fn sequence_orders_follow_positions() {
        assert_eq!(
            orders_for_sequence(&[7, 3, 5]),
            vec![(7, 0), (3, 1), (5, 2)]
        );
    }
}
