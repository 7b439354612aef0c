use log::{debug, trace};
use crate::error::InvalidInputError;
use crate::rank_tree::RankTree;

/// Lehmer code of `permutation`: digit `i` counts the values after position
/// `i` which are smaller than `permutation[i]`, hence lies in `0..=n-1-i`.
///
/// Runs in O(n log n). Fails without producing any digits if a value occurs
/// more than once.
pub fn permutation_to_factoradic<K: Ord>(permutation: &[K]) -> Result<Vec<usize>, InvalidInputError> {
    let n = permutation.len();
    debug!("computing Lehmer code of {} values", n);

    let mut tree = RankTree::new();
    let mut digits = vec![0; n];
    // Walking backwards, exactly the values right of position i are in the
    // tree when i gets visited.
    for (i, v) in permutation.iter().enumerate().rev() {
        if tree.contains(&v) {
            debug!("value at position {} is repeated further right", i);
            return Err(InvalidInputError::DuplicateValue{position: i});
        }
        digits[i] = tree.query_less_than(&v);
        trace!("position {}: {} smaller values to the right", i, digits[i]);
        tree.insert(v);
    }

    debug!("rank tree height {} for {} values", tree.height(), tree.len());
    Ok(digits)
}

/// Lexicographic index of the permutation encoded by the Lehmer code
/// `digits`, i.e. the sum of `digits[i] * (n - 1 - i)!`.
pub fn factoradic_to_index(digits: &[usize]) -> Result<u128, InvalidInputError> {
    let n = digits.len();
    let mut index: u128 = 0;
    for (position, &digit) in digits.iter().enumerate() {
        let max = n - 1 - position;
        if digit > max {
            return Err(InvalidInputError::DigitOutOfRange{position, digit, max});
        }
        index = index.checked_mul((max + 1) as u128)
            .and_then(|index| index.checked_add(digit as u128))
            .ok_or(InvalidInputError::IndexOverflow)?;
    }
    Ok(index)
}

#[cfg(test)]
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

#[cfg(test)]
fn test_naive_factoradic<K: Ord>(permutation: &[K]) -> Vec<usize> {
    (0..permutation.len())
        .map(|i| permutation[i + 1..].iter().filter(|v| **v < permutation[i]).count())
        .collect()
}

// Steps `values` to its lexicographic successor, returns false after the
// last permutation.
#[cfg(test)]
fn test_next_permutation(values: &mut [u32]) -> bool {
    let pivot = match (1..values.len()).rev().find(|&i| values[i - 1] < values[i]) {
        None => return false,
        Some(i) => i - 1,
    };
    let successor = (pivot + 1..values.len()).rev().find(|&j| values[j] > values[pivot]).unwrap();
    values.swap(pivot, successor);
    values[pivot + 1..].reverse();
    true
}

#[test]
fn test_scenarios() {
    let empty: [u32; 0] = [];
    assert_eq!(permutation_to_factoradic(&empty), Ok(vec![]));
    assert_eq!(permutation_to_factoradic(&[7]), Ok(vec![0]));
    assert_eq!(permutation_to_factoradic(&[0, 1, 2]), Ok(vec![0, 0, 0]));
    assert_eq!(permutation_to_factoradic(&[0, 2, 1]), Ok(vec![0, 1, 0]));
    assert_eq!(permutation_to_factoradic(&[1, 0, 2]), Ok(vec![1, 0, 0]));
    assert_eq!(permutation_to_factoradic(&[1, 2, 0]), Ok(vec![1, 1, 0]));
    assert_eq!(permutation_to_factoradic(&[2, 0, 1]), Ok(vec![2, 0, 0]));
    assert_eq!(permutation_to_factoradic(&[2, 1, 0]), Ok(vec![2, 1, 0]));
    assert_eq!(permutation_to_factoradic(&[4, 0, 6, 2, 1, 3, 5]), Ok(vec![4, 0, 4, 1, 0, 0, 0]));
}

#[test]
fn test_non_contiguous_values() {
    assert_eq!(permutation_to_factoradic(&[-10, 300, 7, 42]), Ok(vec![0, 2, 0, 0]));
    assert_eq!(permutation_to_factoradic(&["pear", "apple", "fig"]), Ok(vec![2, 0, 0]));
}

#[test]
fn test_duplicates_rejected() {
    assert_eq!(permutation_to_factoradic(&[1, 1]),
               Err(InvalidInputError::DuplicateValue{position: 0}));
    assert_eq!(permutation_to_factoradic(&[3, 0, 2, 5, 2, 4]),
               Err(InvalidInputError::DuplicateValue{position: 2}));
}

#[test]
fn test_matches_naive_random() {
    let mut rng = StdRng::seed_from_u64(0xfac7);

    for n in [2, 10, 100, 1000] {
        let mut permutation: Vec<i64> = (0..n).map(|v| v * 3 - 50).collect();
        for _ in 0..8 {
            permutation.shuffle(&mut rng);
            let digits = permutation_to_factoradic(&permutation).unwrap();
            assert_eq!(digits, test_naive_factoradic(&permutation));
            for (i, d) in digits.iter().enumerate() {
                assert!(*d <= digits.len() - 1 - i);
            }
        }
    }
}

#[test]
fn test_all_permutations_distinct_and_indexed() {
    for n in 0..=6u32 {
        let mut values: Vec<u32> = (0..n).collect();
        let mut codes = std::collections::HashSet::new();
        let mut expected_index: u128 = 0;
        loop {
            let digits = permutation_to_factoradic(&values).unwrap();
            for (i, d) in digits.iter().enumerate() {
                assert!(*d <= digits.len() - 1 - i);
            }
            assert_eq!(factoradic_to_index(&digits), Ok(expected_index));
            assert!(codes.insert(digits));
            expected_index += 1;
            if !test_next_permutation(&mut values) {
                break;
            }
        }
        assert_eq!(codes.len() as u128, (1..=n as u128).product::<u128>());
    }
}

#[test]
fn test_factoradic_to_index() {
    assert_eq!(factoradic_to_index(&[]), Ok(0));
    assert_eq!(factoradic_to_index(&[0]), Ok(0));
    assert_eq!(factoradic_to_index(&[4, 0, 4, 1, 0, 0, 0]), Ok(4 * 720 + 4 * 24 + 6));
    assert_eq!(factoradic_to_index(&[1, 2, 0]),
               Err(InvalidInputError::DigitOutOfRange{position: 1, digit: 2, max: 1}));
    assert_eq!(factoradic_to_index(&[0, 0, 1]),
               Err(InvalidInputError::DigitOutOfRange{position: 2, digit: 1, max: 0}));

    // 34! < 2^128 < 35!
    let fits: Vec<usize> = (0..34).rev().collect();
    assert!(factoradic_to_index(&fits).is_ok());
    let too_large: Vec<usize> = (0..35).rev().collect();
    assert_eq!(factoradic_to_index(&too_large), Err(InvalidInputError::IndexOverflow));
}
