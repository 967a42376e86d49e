//! Enumeration helpers for the permutation-based solvers.
//!
//! Orderings and injections refuse to run past the voice ceiling before
//! they allocate. Everything returns owned buffers; no solver keeps state
//! between calls.

use crate::error::{Result, VoiceLeadingError};

/// Every ordering of the positions `0..len`, in lexicographic order.
///
/// Each ordering is derived from the previous one: find the rightmost
/// ascent, swap its head with the last larger element after it, then
/// reverse the tail.
pub fn orderings(len: usize, ceiling: usize) -> Result<Vec<Vec<usize>>> {
    check_ceiling(len, ceiling)?;

    let mut ordering: Vec<usize> = (0..len).collect();
    let mut result = vec![ordering.clone()];

    while let Some(pivot) = (1..len).rev().find(|&i| ordering[i - 1] < ordering[i]) {
        let head = pivot - 1;
        let successor = (pivot..len)
            .rev()
            .find(|&i| ordering[i] > ordering[head])
            .unwrap_or(pivot);
        ordering.swap(head, successor);
        ordering[pivot..].reverse();
        result.push(ordering.clone());
    }
    Ok(result)
}

/// Every way to send `from` voices to distinct slots among `0..into`, in
/// lexicographic order; `pairing[voice]` is the voice's slot. Empty when
/// there are fewer slots than voices.
pub fn injections(from: usize, into: usize, ceiling: usize) -> Result<Vec<Vec<usize>>> {
    check_ceiling(from.max(into), ceiling)?;

    let mut result = Vec::new();
    if from <= into {
        let mut pairing = Vec::with_capacity(from);
        let mut taken = vec![false; into];
        extend_injection(from, &mut pairing, &mut taken, &mut result);
    }
    Ok(result)
}

fn extend_injection(
    from: usize,
    pairing: &mut Vec<usize>,
    taken: &mut [bool],
    result: &mut Vec<Vec<usize>>,
) {
    if pairing.len() == from {
        result.push(pairing.clone());
        return;
    }
    for slot in 0..taken.len() {
        if taken[slot] {
            continue;
        }
        taken[slot] = true;
        pairing.push(slot);
        extend_injection(from, pairing, taken, result);
        pairing.pop();
        taken[slot] = false;
    }
}

/// The n cyclic rotations of `items`. Rotation 0 is `items` itself and
/// rotation k moves every element k places to the right.
pub fn rotations<T: Copy>(items: &[T]) -> Vec<Vec<T>> {
    let n = items.len();
    (0..n)
        .map(|k| (0..n).map(|i| items[(i + n - k) % n]).collect())
        .collect()
}

/// Refuse enumerations over more than `ceiling` elements
pub fn check_ceiling(voices: usize, ceiling: usize) -> Result<()> {
    if voices > ceiling {
        return Err(VoiceLeadingError::PermutationLimit { voices, ceiling });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orderings() {
        let perms = orderings(3, 8).unwrap();
        assert_eq!(perms.len(), 6); // 3! = 6
        assert_eq!(perms[0], vec![0, 1, 2]);
        assert_eq!(perms[1], vec![0, 2, 1]);
        assert_eq!(perms[5], vec![2, 1, 0]);
    }

    #[test]
    fn test_four_voice_order_is_lexicographic() {
        let perms = orderings(4, 8).unwrap();
        assert_eq!(perms.len(), 24);
        assert_eq!(perms[3], vec![0, 2, 3, 1]);
        assert_eq!(perms[23], vec![3, 2, 1, 0]);
        let mut sorted = perms.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted, perms);
    }

    #[test]
    fn test_orderings_of_nothing_and_one() {
        assert_eq!(orderings(0, 8).unwrap(), vec![Vec::<usize>::new()]);
        assert_eq!(orderings(1, 8).unwrap(), vec![vec![0]]);
    }

    #[test]
    fn test_orderings_respect_ceiling() {
        assert_eq!(
            orderings(9, 8),
            Err(VoiceLeadingError::PermutationLimit {
                voices: 9,
                ceiling: 8
            })
        );
    }

    #[test]
    fn test_injections() {
        let pairings = injections(2, 4, 8).unwrap();
        assert_eq!(pairings.len(), 12);
        assert_eq!(pairings[0], vec![0, 1]);
        assert_eq!(pairings[11], vec![3, 2]);
        assert_eq!(injections(0, 0, 8).unwrap(), vec![Vec::<usize>::new()]);
        assert!(injections(1, 0, 8).unwrap().is_empty());
        assert!(injections(2, 9, 8).is_err());
    }

    #[test]
    fn test_rotations() {
        let rotated = rotations(&[0, 4, 7]);
        assert_eq!(rotated, vec![vec![0, 4, 7], vec![7, 0, 4], vec![4, 7, 0]]);
        assert!(rotations::<u8>(&[]).is_empty());
    }

    #[test]
    fn test_check_ceiling() {
        assert!(check_ceiling(8, 8).is_ok());
        assert_eq!(
            check_ceiling(9, 8),
            Err(VoiceLeadingError::PermutationLimit {
                voices: 9,
                ceiling: 8
            })
        );
    }
}
