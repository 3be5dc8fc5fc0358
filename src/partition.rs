//! Input Partitioning
//!
//! Splits a sequence into contiguous, near-equal chunks for independent
//! sorting. Each chunk is an owned copy so a worker can mutate it without
//! touching its siblings; no slice of the source is ever aliased across a
//! task boundary.

/// Split `data` into at most `parts` contiguous chunks.
///
/// Every chunk holds `ceil(n / parts)` elements except possibly the last,
/// which holds the remainder. Chunks preserve source order, and their
/// concatenation reproduces `data` exactly. An empty input yields no chunks;
/// if `n < parts` the result has fewer chunks than requested.
pub fn split_even(data: &[u64], parts: usize) -> Vec<Vec<u64>> {
    if data.is_empty() {
        return Vec::new();
    }

    let parts = parts.max(1);
    let chunk_size = data.len().div_ceil(parts);
    data.chunks(chunk_size).map(|c| c.to_vec()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_five_into_two() {
        let parts = split_even(&[1, 2, 3, 4, 5], 2);
        assert_eq!(parts, vec![vec![1, 2, 3], vec![4, 5]]);
    }

    #[test]
    fn test_split_exact_division() {
        let parts = split_even(&[1, 2, 3, 4, 5, 6], 3);
        assert_eq!(parts, vec![vec![1, 2], vec![3, 4], vec![5, 6]]);
    }

    #[test]
    fn test_split_empty() {
        assert!(split_even(&[], 4).is_empty());
    }

    #[test]
    fn test_split_one_part() {
        let parts = split_even(&[3, 1, 2], 1);
        assert_eq!(parts, vec![vec![3, 1, 2]]);
    }

    #[test]
    fn test_split_more_parts_than_elements() {
        let parts = split_even(&[7, 8], 5);
        assert_eq!(parts, vec![vec![7], vec![8]]);
    }

    #[test]
    fn test_split_zero_parts_clamps_to_one() {
        let parts = split_even(&[1, 2, 3], 0);
        assert_eq!(parts, vec![vec![1, 2, 3]]);
    }

    #[test]
    fn test_concatenation_round_trip() {
        let data: Vec<u64> = (0..103).map(|i| i * 7 % 31).collect();
        for k in 1..=10 {
            let parts = split_even(&data, k);
            assert!(parts.len() <= k);
            let rebuilt: Vec<u64> = parts.into_iter().flatten().collect();
            assert_eq!(rebuilt, data, "round trip failed for k={}", k);
        }
    }
}
