//! A genome-wide interval index built on top of per-chromosome interval trees
//!

use std::collections::BTreeSet;
use std::ops::Range;

use bio::data_structures::interval_tree::IntervalTree;

use crate::genome_segment::GenomeSegment;

/// Stable handle to one entry of an [IntervalIndex]
pub type EntryIndex = usize;

/// Interval-keyed collection of values supporting overlap queries and ordered iteration
///
/// Entries are stored in an arena and never removed, so an `EntryIndex` stays valid for the
/// lifetime of the index, including across later insertions. Multiple equal or overlapping
/// segments may be stored, each with its own value.
///
/// Empty segments are stored and queried as if they covered the single position at their start,
/// so that point-like intervals can still be found.
///
#[derive(Clone)]
pub struct IntervalIndex<T> {
    entries: Vec<(GenomeSegment, T)>,

    /// Interval tree for each chromosome index, mapping to the entry index
    chrom_trees: Vec<IntervalTree<i64, EntryIndex>>,

    /// All entries in (segment, insertion) order
    ordered_keys: BTreeSet<(GenomeSegment, EntryIndex)>,
}

impl<T> Default for IntervalIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}

fn get_tree_range(segment: &GenomeSegment) -> Range<i64> {
    let range = &segment.range;
    range.start..std::cmp::max(range.end, range.start + 1)
}

impl<T> IntervalIndex<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            chrom_trees: Vec::new(),
            ordered_keys: BTreeSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Add a new entry and return its index
    ///
    pub fn insert(&mut self, segment: GenomeSegment, value: T) -> EntryIndex {
        let entry_index = self.entries.len();
        if self.chrom_trees.len() <= segment.chrom_index {
            self.chrom_trees
                .resize_with(segment.chrom_index + 1, IntervalTree::new);
        }
        self.chrom_trees[segment.chrom_index].insert(get_tree_range(&segment), entry_index);
        self.ordered_keys.insert((segment, entry_index));
        self.entries.push((segment, value));
        entry_index
    }

    pub fn segment(&self, entry_index: EntryIndex) -> &GenomeSegment {
        &self.entries[entry_index].0
    }

    pub fn value(&self, entry_index: EntryIndex) -> &T {
        &self.entries[entry_index].1
    }

    /// Indices of all entries overlapping `segment`, in ascending (segment, insertion) order
    ///
    pub fn overlappers(&self, segment: &GenomeSegment) -> Vec<EntryIndex> {
        let Some(tree) = self.chrom_trees.get(segment.chrom_index) else {
            return Vec::new();
        };
        let mut overlappers = tree
            .find(get_tree_range(segment))
            .map(|x| *x.data())
            .collect::<Vec<_>>();
        overlappers.sort_by_key(|&x| (self.entries[x].0, x));
        overlappers
    }

    /// Values of all entries overlapping `segment`, in ascending (segment, insertion) order
    ///
    pub fn overlapping_values(&self, segment: &GenomeSegment) -> impl Iterator<Item = &T> {
        self.overlappers(segment)
            .into_iter()
            .map(move |x| &self.entries[x].1)
    }

    /// Return true if any entry overlaps `segment`
    ///
    pub fn has_overlapper(&self, segment: &GenomeSegment) -> bool {
        match self.chrom_trees.get(segment.chrom_index) {
            Some(tree) => tree.find(get_tree_range(segment)).next().is_some(),
            None => false,
        }
    }

    /// Iterate over all entries in (segment, insertion) order
    ///
    pub fn iter(&self) -> impl Iterator<Item = (EntryIndex, &GenomeSegment, &T)> {
        self.ordered_keys
            .iter()
            .map(move |&(_, x)| (x, &self.entries[x].0, &self.entries[x].1))
    }

    /// Entry indices in (segment, insertion) order
    ///
    /// This is a snapshot of the index order which stays usable while the index is modified.
    ///
    pub fn ordered_indices(&self) -> Vec<EntryIndex> {
        self.ordered_keys.iter().map(|&(_, x)| x).collect()
    }

    /// Consume the index, returning all values in insertion order, so that each value is found at
    /// its `EntryIndex`
    ///
    pub fn into_values(self) -> Vec<T> {
        self.entries.into_iter().map(|(_, x)| x).collect()
    }
}

impl<T> FromIterator<(GenomeSegment, T)> for IntervalIndex<T> {
    fn from_iter<I: IntoIterator<Item = (GenomeSegment, T)>>(iter: I) -> Self {
        let mut index = Self::new();
        for (segment, value) in iter {
            index.insert(segment, value);
        }
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlappers() {
        let mut index = IntervalIndex::new();
        index.insert(GenomeSegment::from_pair(0, 100, 200), 'a');
        index.insert(GenomeSegment::from_pair(0, 150, 250), 'b');
        index.insert(GenomeSegment::from_pair(0, 300, 400), 'c');
        index.insert(GenomeSegment::from_pair(1, 100, 200), 'd');

        let values = index
            .overlapping_values(&GenomeSegment::from_pair(0, 190, 310))
            .copied()
            .collect::<Vec<_>>();
        assert_eq!(values, vec!['a', 'b', 'c']);

        // Adjacency does not count as overlap
        assert!(!index.has_overlapper(&GenomeSegment::from_pair(0, 250, 300)));
        assert!(index.has_overlapper(&GenomeSegment::from_pos(1, 199)));
        assert!(!index.has_overlapper(&GenomeSegment::from_pos(2, 150)));
    }

    #[test]
    fn test_duplicate_segments() {
        let mut index = IntervalIndex::new();
        let segment = GenomeSegment::from_pair(0, 100, 200);
        let i1 = index.insert(segment, 1);
        let i2 = index.insert(segment, 2);
        assert_ne!(i1, i2);
        assert_eq!(index.overlappers(&segment), vec![i1, i2]);
    }

    #[test]
    fn test_ordered_iteration() {
        let mut index = IntervalIndex::new();
        index.insert(GenomeSegment::from_pair(1, 10, 20), 'c');
        index.insert(GenomeSegment::from_pair(0, 50, 60), 'b');
        index.insert(GenomeSegment::from_pair(0, 10, 100), 'a');

        let values = index.iter().map(|(_, _, x)| *x).collect::<Vec<_>>();
        assert_eq!(values, vec!['a', 'b', 'c']);
    }

    #[test]
    fn test_empty_segment_query() {
        let mut index = IntervalIndex::new();
        index.insert(GenomeSegment::from_pair(0, 100, 100), 'a');
        assert!(index.has_overlapper(&GenomeSegment::from_pos(0, 100)));
        assert!(!index.has_overlapper(&GenomeSegment::from_pos(0, 101)));
    }

    #[test]
    fn test_insert_during_snapshot_iteration() {
        let mut index = (0..3)
            .map(|x| (GenomeSegment::from_pair(0, x * 10, x * 10 + 5), x))
            .collect::<IntervalIndex<_>>();
        for entry_index in index.ordered_indices() {
            let segment = *index.segment(entry_index);
            index.insert(segment, 100);
        }
        assert_eq!(index.len(), 6);
        assert_eq!(*index.value(2), 2);
    }
}
