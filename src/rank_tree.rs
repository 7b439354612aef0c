use crate::avl_tree::{AugmentedAVLTree, AugmentedAVLTreeIterator, Descend};

/// Order-statistics tree answering "how many stored values are less than
/// `x`" in logarithmic time.
///
/// Every node's auxiliary value is the size of its subtree, so a node's
/// left subtree size is available in O(1) from its left child and each
/// rotation updates sizes from the direct children only.
pub struct RankTree<K: Ord> {
    tree: AugmentedAVLTree<K, usize>,
}

impl<K: Ord> RankTree<K> {
    pub fn new() -> Self {
        Self{tree: AugmentedAVLTree::new()}
    }

    fn update_size_aux(size: &mut usize, _key: &K,
                       left_size: Option<&usize>, right_size: Option<&usize>) {
        *size = 1 + left_size.copied().unwrap_or(0) + right_size.copied().unwrap_or(0);
    }

    /// Adds `value`. Values equal to an already stored one are kept as well
    /// and never counted by [`query_less_than()`](Self::query_less_than) for
    /// that value.
    pub fn insert(&mut self, value: K) {
        self.tree.insert(value, 1, &Self::update_size_aux);
    }

    /// Number of stored values strictly less than `value`.
    pub fn query_less_than(&self, value: &K) -> usize {
        let mut count = 0;
        self.tree.descend(|key, _size, left_size, _right_size| {
            if *value > *key {
                count += left_size.copied().unwrap_or(0) + 1;
                Descend::Right
            } else {
                Descend::Left
            }
        });
        count
    }

    pub fn contains(&self, value: &K) -> bool {
        let mut found = false;
        self.tree.descend(|key, _size, _left_size, _right_size| {
            if *value < *key {
                Descend::Left
            } else if *value > *key {
                Descend::Right
            } else {
                found = true;
                Descend::Stop
            }
        });
        found
    }

    pub fn len(&self) -> usize {
        self.tree.root_aux().copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn height(&self) -> u32 {
        self.tree.height()
    }

    /// Stored values in ascending order.
    pub fn iter(&self) -> AugmentedAVLTreeIterator<'_, K, usize> {
        self.tree.iter()
    }
}

impl<K: Ord> Default for RankTree<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
use rand::{rngs::StdRng, Rng, SeedableRng};

#[cfg(test)]
fn test_check_sizes<K: Ord>(t: &RankTree<K>) {
    let count = t.tree.check_nodes(&|size: &usize, left_size: Option<&usize>,
                                     real_left_size: usize, real_size: usize| {
        assert_eq!(*size, real_size);
        assert_eq!(left_size.copied().unwrap_or(0), real_left_size);
    });
    assert_eq!(t.len(), count);

    // AVL height bound: h < 1.4405 * log2(n + 2) - 0.3277
    let bound = 1.4405 * ((count + 2) as f64).log2();
    assert!((t.height() as f64) <= bound);
}

#[test]
fn test_empty() {
    let t: RankTree<i64> = RankTree::new();
    assert!(t.is_empty());
    assert_eq!(t.len(), 0);
    assert_eq!(t.height(), 0);
    assert_eq!(t.query_less_than(&0), 0);
    assert_eq!(t.query_less_than(&i64::MAX), 0);
    assert!(!t.contains(&0));
}

#[test]
fn test_query_less_than() {
    let mut t: RankTree<i64> = RankTree::new();
    for v in [4, 0, 6, 2, 1, 3, 5] {
        t.insert(v);
        test_check_sizes(&t);
    }

    assert_eq!(t.len(), 7);
    for v in 0..7 {
        assert_eq!(t.query_less_than(&v), v as usize);
        assert!(t.contains(&v));
    }
    assert_eq!(t.query_less_than(&-1), 0);
    assert_eq!(t.query_less_than(&100), 7);
    assert!(!t.contains(&7));
    assert!(t.iter().copied().eq(0..7));
}

#[test]
fn test_query_less_than_duplicates() {
    let mut t: RankTree<u32> = RankTree::new();
    for v in [5, 5, 3, 5, 3, 8, 5] {
        t.insert(v);
        test_check_sizes(&t);
    }

    assert_eq!(t.len(), 7);
    assert_eq!(t.query_less_than(&3), 0);
    assert_eq!(t.query_less_than(&4), 2);
    assert_eq!(t.query_less_than(&5), 2);
    assert_eq!(t.query_less_than(&6), 6);
    assert_eq!(t.query_less_than(&9), 7);
    assert_eq!(t.iter().copied().collect::<Vec<_>>(), vec![3, 3, 5, 5, 5, 5, 8]);
}

#[test]
fn test_query_less_than_random() {
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..16 {
        let mut t: RankTree<i32> = RankTree::new();
        let mut inserted: Vec<i32> = Vec::new();
        for _ in 0..300 {
            let v = rng.gen_range(-500..500);
            t.insert(v);
            inserted.push(v);
            test_check_sizes(&t);

            let q = rng.gen_range(-550..550);
            let expected = inserted.iter().filter(|&&i| i < q).count();
            assert_eq!(t.query_less_than(&q), expected);
            assert_eq!(t.contains(&q), inserted.contains(&q));
        }

        inserted.sort();
        assert!(t.iter().copied().eq(inserted.iter().copied()));
    }
}

#[test]
fn test_height_bound_sorted_input() {
    let mut t: RankTree<u64> = RankTree::new();
    for v in 0..4096 {
        t.insert(v);
    }
    test_check_sizes(&t);
    assert_eq!(t.height(), 13);
    assert_eq!(t.query_less_than(&2048), 2048);
}
