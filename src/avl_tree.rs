extern crate alloc;

use core::mem;
use core::cmp::{self, Ord};

struct NodeRef<K: Ord, A> {
    node: Option<Box<Node<K, A>>>,
}

struct Node<K: Ord, A> {
    key: K,
    aux: A,
    height: u32,

    left: NodeRef<K, A>,
    right: NodeRef<K, A>,
}

enum NodeIterVal<'a, K: Ord, A> {
    Key(&'a K),
    Child(&'a Node<K, A>),
}

struct NodeIter<'a, K: Ord, A> {
    key: Option<&'a K>,
    left: Option<&'a Node<K, A>>,
    right: Option<&'a Node<K, A>>,
}

/// Direction chosen by the callback passed to [`AugmentedAVLTree::descend()`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Descend {
    Left,
    Right,
    Stop,
}

/// In-order iterator over the keys of an [`AugmentedAVLTree`].
pub struct AugmentedAVLTreeIterator<'a, K: Ord, A> {
    stack: Vec<NodeIter<'a, K, A>>,
}

/// AVL tree whose nodes carry an auxiliary value `A` summarizing their
/// subtree.
///
/// The auxiliary value of a node is recomputed by the caller supplied
/// `update_aux` from the node's key and its children's auxiliary values
/// whenever the node's children change, i.e. while unwinding an insertion
/// and on every rotation. Keys comparing equal to an existing one are placed
/// to its right.
pub struct AugmentedAVLTree<K: Ord, A> {
    root: NodeRef<K, A>,
}

impl<K: Ord, A> Node<K, A> {
    fn new(key: K, aux: A) -> Self {
        Node{key, aux, height: 1, left: NodeRef::new(), right: NodeRef::new()}
    }

    fn balance(&self) -> i64 {
        self.left.height() as i64 - self.right.height() as i64
    }

    fn do_update_aux<UpdateAux>(&mut self, update_aux: &UpdateAux)
    where for<'a> UpdateAux: Fn(&'a mut A, &'a K, Option<&'a A>, Option<&'a A>)
    {
        self.height = cmp::max(self.left.height(), self.right.height()) + 1;
        update_aux(&mut self.aux, &self.key, self.left.aux(), self.right.aux());
    }

    fn iter(&self) -> NodeIter<'_, K, A> {
        NodeIter{
            key: Some(&self.key),
            left: self.left.node.as_deref(),
            right: self.right.node.as_deref(),
        }
    }
}

impl<K: Ord, A> NodeRef<K, A> {
    fn new() -> Self {
        NodeRef{node: None}
    }

    fn new_node<UpdateAux>(key: K, aux: A, update_aux: &UpdateAux) -> Self
    where for<'a> UpdateAux: Fn(&'a mut A, &'a K, Option<&'a A>, Option<&'a A>)
    {
        let mut n = Box::new(Node::new(key, aux));
        n.do_update_aux(update_aux);
        NodeRef{node: Some(n)}
    }

    fn height(&self) -> u32 {
        match &self.node {
            None => 0,
            Some(n) => n.height,
        }
    }

    fn aux(&self) -> Option<&A> {
        match &self.node {
            None => None,
            Some(n) => Some(&n.aux),
        }
    }

    // The demoted node gets updated before the promoted one, which sits
    // above it afterwards.
    fn rotate_left<UpdateAux>(&mut self, update_aux: &UpdateAux)
    where for<'a> UpdateAux: Fn(&'a mut A, &'a K, Option<&'a A>, Option<&'a A>)
    {
        let mut s = match mem::replace(&mut self.node, None) {
            None => return,
            Some(s) => s,
        };
        let mut r = match mem::replace(&mut s.right.node, None) {
            None => {
                self.node = Some(s);
                return;
            },
            Some(r) => r,
        };

        s.right.node = mem::replace(&mut r.left.node, None);
        s.do_update_aux(update_aux);
        r.left.node = Some(s);
        r.do_update_aux(update_aux);
        self.node = Some(r);
    }

    fn rotate_right<UpdateAux>(&mut self, update_aux: &UpdateAux)
    where for<'a> UpdateAux: Fn(&'a mut A, &'a K, Option<&'a A>, Option<&'a A>)
    {
        let mut s = match mem::replace(&mut self.node, None) {
            None => return,
            Some(s) => s,
        };
        let mut l = match mem::replace(&mut s.left.node, None) {
            None => {
                self.node = Some(s);
                return;
            },
            Some(l) => l,
        };

        s.left.node = mem::replace(&mut l.right.node, None);
        s.do_update_aux(update_aux);
        l.right.node = Some(s);
        l.do_update_aux(update_aux);
        self.node = Some(l);
    }

    fn rotate_right_left<UpdateAux>(&mut self, update_aux: &UpdateAux)
    where for<'a> UpdateAux: Fn(&'a mut A, &'a K, Option<&'a A>, Option<&'a A>)
    {
        match &mut self.node {
            None => (),

            Some(sn) => {
                sn.right.rotate_right(update_aux);
                self.rotate_left(update_aux);
            },
        }
    }

    fn rotate_left_right<UpdateAux>(&mut self, update_aux: &UpdateAux)
    where for<'a> UpdateAux: Fn(&'a mut A, &'a K, Option<&'a A>, Option<&'a A>)
    {
        match &mut self.node {
            None => (),

            Some(sn) => {
                sn.left.rotate_left(update_aux);
                self.rotate_right(update_aux);
            },
        }
    }

    fn insert<UpdateAux>(&mut self, key: K, aux: A, update_aux: &UpdateAux)
    where for<'a> UpdateAux: Fn(&'a mut A, &'a K, Option<&'a A>, Option<&'a A>)
    {
        match &mut self.node {
            None => {
                *self = Self::new_node(key, aux, update_aux);
            },
            Some(n) => {
                if key < n.key {
                    // The key lands in the left child's right subtree iff
                    // the child's own descent goes right.
                    let inner = match &n.left.node {
                        None => false,
                        Some(ln) => key >= ln.key,
                    };
                    n.left.insert(key, aux, update_aux);
                    n.do_update_aux(update_aux);
                    if n.balance() > 1 {
                        if inner {
                            self.rotate_left_right(update_aux);
                        } else {
                            self.rotate_right(update_aux);
                        }
                    }
                } else {
                    let inner = match &n.right.node {
                        None => false,
                        Some(rn) => key < rn.key,
                    };
                    n.right.insert(key, aux, update_aux);
                    n.do_update_aux(update_aux);
                    if n.balance() < -1 {
                        if inner {
                            self.rotate_right_left(update_aux);
                        } else {
                            self.rotate_left(update_aux);
                        }
                    }
                }
            }
        }
    }
}

impl<'a, K: Ord, A> NodeIter<'a, K, A> {
    fn next(&mut self) -> Option<NodeIterVal<'a, K, A>> {
        match self.left.take() {
            Some(ln) => Some(NodeIterVal::Child(ln)),
            None => {
                match self.key.take() {
                    Some(k) => Some(NodeIterVal::Key(k)),
                    None => {
                        match self.right.take() {
                            Some(rn) => Some(NodeIterVal::Child(rn)),
                            None => None
                        }
                    }
                }
            }
        }
    }
}

impl<'a, K: Ord, A> AugmentedAVLTreeIterator<'a, K, A> {
    fn new(root: &'a NodeRef<K, A>) -> Self {
        let mut stack = Vec::new();
        if let Some(rn) = &root.node {
            stack.push(rn.iter());
        }

        Self{stack}
    }
}

impl<'a, K: Ord, A> Iterator for AugmentedAVLTreeIterator<'a, K, A> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(top) = self.stack.last_mut() {
            match top.next() {
                Some(NodeIterVal::Child(cn)) => {
                    self.stack.push(cn.iter());
                },
                Some(NodeIterVal::Key(k)) => {
                    return Some(k);
                },
                None => {
                    self.stack.pop();
                }
            }
        }
        None
    }
}

impl<K: Ord, A> AugmentedAVLTree<K, A> {
    pub fn new() -> Self {
        Self{root: NodeRef::new()}
    }

    /// Inserts `key`; `aux` is the new leaf's initial auxiliary value and
    /// gets passed through `update_aux` before the leaf is linked in.
    pub fn insert<UpdateAux>(&mut self, key: K, aux: A, update_aux: &UpdateAux)
    where for<'a> UpdateAux: Fn(&'a mut A, &'a K, Option<&'a A>, Option<&'a A>)
    {
        self.root.insert(key, aux, update_aux);
    }

    /// Walks a single path down from the root.
    ///
    /// `step` gets invoked with each visited node's key, its auxiliary value
    /// and those of its left and right children, and decides where to go
    /// next. The walk ends on [`Descend::Stop`] or when stepping into an
    /// empty subtree.
    pub fn descend<Step>(&self, mut step: Step)
    where for<'a> Step: FnMut(&'a K, &'a A, Option<&'a A>, Option<&'a A>) -> Descend
    {
        let mut cur = &self.root;
        while let Some(n) = &cur.node {
            cur = match step(&n.key, &n.aux, n.left.aux(), n.right.aux()) {
                Descend::Left => &n.left,
                Descend::Right => &n.right,
                Descend::Stop => return,
            };
        }
    }

    pub fn root_aux(&self) -> Option<&A> {
        self.root.aux()
    }

    pub fn height(&self) -> u32 {
        self.root.height()
    }

    pub fn is_empty(&self) -> bool {
        self.root.node.is_none()
    }

    pub fn iter(&self) -> AugmentedAVLTreeIterator<'_, K, A> {
        AugmentedAVLTreeIterator::new(&self.root)
    }
}

impl<K: Ord, A> Default for AugmentedAVLTree<K, A> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
fn test_check_node<K: Ord, A, CheckAux>(n: &NodeRef<K, A>, check_aux: &CheckAux) -> (u32, usize)
where CheckAux: Fn(&A, Option<&A>, usize, usize)
{
    match &n.node {
        None => (0, 0),
        Some(n) => {
            let (lheight, lcount) = test_check_node(&n.left, check_aux);
            let (rheight, rcount) = test_check_node(&n.right, check_aux);
            let height = cmp::max(lheight, rheight) + 1;
            assert_eq!(n.height, height);
            assert!(lheight <= rheight + 1 && rheight <= lheight + 1);

            let mut lneigh = &n.left.node;
            while let Some(lneighn) = &lneigh {
                assert!(lneighn.key <= n.key);
                lneigh = &lneighn.right.node;
            }

            let mut rneigh = &n.right.node;
            while let Some(rneighn) = &rneigh {
                assert!(n.key <= rneighn.key);
                rneigh = &rneighn.left.node;
            }

            let count = lcount + 1 + rcount;
            check_aux(&n.aux, n.left.aux(), lcount, count);
            (height, count)
        }
    }
}

#[cfg(test)]
impl<K: Ord, A> AugmentedAVLTree<K, A> {
    /// Verifies ordering, heights and balance of every node. `check_aux`
    /// receives each node's auxiliary value, its left child's auxiliary
    /// value and the independently counted sizes of the left and of the
    /// whole subtree.
    pub(crate) fn check_nodes<CheckAux>(&self, check_aux: &CheckAux) -> usize
    where CheckAux: Fn(&A, Option<&A>, usize, usize)
    {
        test_check_node(&self.root, check_aux).1
    }

    fn root_key(&self) -> Option<&K> {
        self.root.node.as_ref().map(|n| &n.key)
    }
}

#[cfg(test)]
fn test_update_aux<K>(count: &mut u32, _key: &K, lcount: Option<&u32>, rcount: Option<&u32>) {
    *count = 1 + lcount.copied().unwrap_or(0) + rcount.copied().unwrap_or(0);
}

#[cfg(test)]
fn test_check_count(count: &u32, lcount: Option<&u32>, real_lcount: usize, real_count: usize) {
    assert_eq!(*count as usize, real_count);
    assert_eq!(lcount.copied().unwrap_or(0) as usize, real_lcount);
}

#[test]
fn test_empty() {
    let t: AugmentedAVLTree<u32, u32> = AugmentedAVLTree::new();
    assert!(t.is_empty());
    assert_eq!(t.height(), 0);
    assert_eq!(t.root_aux(), None);
    assert_eq!(t.iter().count(), 0);
    assert_eq!(t.check_nodes(&test_check_count), 0);
}

#[test]
fn test_rotation_cases() {
    // Left-Left, Right-Right, Left-Right and Right-Left each end up with the
    // middle key on top.
    for keys in [[3, 2, 1], [1, 2, 3], [3, 1, 2], [1, 3, 2]] {
        let mut t: AugmentedAVLTree<u32, u32> = AugmentedAVLTree::new();
        for k in keys {
            t.insert(k, 0, &test_update_aux);
            t.check_nodes(&test_check_count);
        }
        assert_eq!(t.root_key(), Some(&2));
        assert_eq!(t.height(), 2);
        assert_eq!(t.root_aux(), Some(&3));
        assert_eq!(t.iter().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
    }
}

#[test]
fn test_insert_same() {
    let mut t: AugmentedAVLTree<u32, u32> = AugmentedAVLTree::new();

    for i in 0..128 {
        t.insert(0, 0, &test_update_aux);
        assert_eq!(t.check_nodes(&test_check_count), (i + 1) as usize);
        assert_eq!(t.root_aux(), Some(&(i + 1)));
    }
    assert_eq!(t.iter().count(), 128);
    assert!(t.iter().all(|k| *k == 0));
    assert!(t.height() <= 8);
}

#[test]
fn test_insert_ascending_descending() {
    let mut asc: AugmentedAVLTree<u32, u32> = AugmentedAVLTree::new();
    let mut desc: AugmentedAVLTree<u32, u32> = AugmentedAVLTree::new();

    for i in 0..255 {
        asc.insert(i, 0, &test_update_aux);
        asc.check_nodes(&test_check_count);
        desc.insert(254 - i, 0, &test_update_aux);
        desc.check_nodes(&test_check_count);
    }
    // A sorted run of 2^k - 1 keys fills a perfect tree.
    assert_eq!(asc.height(), 8);
    assert_eq!(desc.height(), 8);
    assert!(asc.iter().copied().eq(0..255));
    assert!(desc.iter().copied().eq(0..255));
}

#[test]
fn test_insert_strided() {
    let mut t: AugmentedAVLTree<u32, u32> = AugmentedAVLTree::new();

    for i in (0..256).step_by(4) {
        for j in [0, 2, 3, 1] {
            t.insert(i + j, 0, &test_update_aux);
            t.check_nodes(&test_check_count);
            t.insert(i + 256 + j, 0, &test_update_aux);
            t.check_nodes(&test_check_count);
        }
    }
    assert_eq!(t.root_aux(), Some(&512));
    assert!(t.iter().copied().eq(0..512));
}

#[test]
fn test_descend() {
    let mut t: AugmentedAVLTree<u32, u32> = AugmentedAVLTree::new();
    for i in 0..100 {
        t.insert(i * 2, 0, &test_update_aux);
    }

    let mut path = Vec::new();
    t.descend(|key, _count, _lcount, _rcount| {
        path.push(*key);
        if *key == 42 {
            Descend::Stop
        } else if 42 < *key {
            Descend::Left
        } else {
            Descend::Right
        }
    });
    assert_eq!(path.last(), Some(&42));
    assert!(path.len() as u32 <= t.height());

    let mut visited = 0;
    t.descend(|_key, _count, _lcount, _rcount| {
        visited += 1;
        Descend::Left
    });
    assert!(1 <= visited && visited <= t.height());
}
