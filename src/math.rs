use std::collections::BTreeSet;

use itertools::Itertools;

use crate::Show;

/// Type alias for sets, we use this to hide which type of `HashSet` we are actually using.
pub type Set<S> = fxhash::FxHashSet<S>;
/// Type alias for maps, we use this to hide which type of `HashMap` we are actually using.
pub type Map<K, V> = fxhash::FxHashMap<K, V>;
/// Sets whose iteration order matters, for example because it determines the names or the
/// order of synthesized states.
pub type OrderedSet<S> = BTreeSet<S>;

/// Represents a bijective mapping between `L` and `R`, that is a mapping which associates
/// each `L` with precisely one `R` and vice versa.
pub type Bijection<L, R> = bimap::BiBTreeMap<L, R>;

/// A partition groups elements of type `I` into pairwise disjoint, non-empty classes
/// (called blocks). The blocks are kept in a fixed order, so the position of a block can be
/// used to identify it.
#[derive(Debug, Clone)]
pub struct Partition<I: Ord>(Vec<BTreeSet<I>>);

impl<I: Ord> std::ops::Deref for Partition<I> {
    type Target = Vec<BTreeSet<I>>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<'a, I: Ord> IntoIterator for &'a Partition<I> {
    type Item = &'a BTreeSet<I>;
    type IntoIter = std::slice::Iter<'a, BTreeSet<I>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<I: Ord> PartialEq for Partition<I> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|o| other.contains(o))
    }
}
impl<I: Ord> Eq for Partition<I> {}

impl<I: Ord + Clone> Partition<I> {
    /// Returns the size of the partition, i.e. the number of blocks.
    pub fn size(&self) -> usize {
        self.0.len()
    }

    /// Builds a partition from an iterator that yields iterators over the elements of each
    /// block. Blocks that turn out to be empty are dropped.
    pub fn new<X: IntoIterator<Item = I>, Y: IntoIterator<Item = X>>(iter: Y) -> Self {
        Self(
            iter.into_iter()
                .map(|it| it.into_iter().collect::<BTreeSet<_>>())
                .filter(|block| !block.is_empty())
                .collect(),
        )
    }

    /// Returns the position of the block containing `element`, if any.
    pub fn block_of(&self, element: &I) -> Option<usize> {
        self.0.iter().position(|block| block.contains(element))
    }

    /// Computes a lookup table from elements to the position of their block. The table is a
    /// snapshot, it does not change when the partition is refined afterwards.
    pub fn index(&self) -> std::collections::BTreeMap<I, usize> {
        self.0
            .iter()
            .enumerate()
            .flat_map(|(i, block)| block.iter().map(move |q| (q.clone(), i)))
            .collect()
    }

    /// Splits every block according to the key that `classify` assigns to its elements. The
    /// sub-blocks of a block appear in the order in which their keys are first encountered
    /// when going through the block in ascending order, so refining is deterministic.
    pub fn refine<K: PartialEq, F: FnMut(&I) -> K>(&self, mut classify: F) -> Self {
        let mut blocks = Vec::with_capacity(self.0.len());
        for block in &self.0 {
            let mut groups: Vec<(K, BTreeSet<I>)> = Vec::new();
            for element in block {
                let key = classify(element);
                match groups.iter_mut().find(|(k, _)| *k == key) {
                    Some((_, group)) => {
                        group.insert(element.clone());
                    }
                    None => groups.push((key, BTreeSet::from([element.clone()]))),
                }
            }
            blocks.extend(groups.into_iter().map(|(_, group)| group));
        }
        Self(blocks)
    }
}

impl<I: Ord + Show> Show for Partition<I> {
    fn show(&self) -> String {
        format!(
            "[{}]",
            self.0.iter().map(|block| I::show_collection(block)).join(", ")
        )
    }
}
