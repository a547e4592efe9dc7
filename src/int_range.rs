use std::fmt;

use serde::{Deserialize, Serialize};

/// A simple type for integer ranges
///
/// All ranges follow the bed file range convention: 0-indexed, half-closed, [start,end)
///
/// This struct is used instead of the native rust Range type just to focus on the specific goals of
/// primarily genomic region intervals.
///
#[derive(Clone, Copy, Deserialize, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize)]
pub struct IntRange {
    pub start: i64,
    pub end: i64,
}

impl IntRange {
    pub fn from_int(start: i64) -> Self {
        Self {
            start,
            end: start + 1,
        }
    }

    pub fn from_pair(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    pub fn size(&self) -> i64 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Return true if the ranges share at least one position (adjacency does not count)
    ///
    pub fn intersect_range(&self, other: &IntRange) -> bool {
        other.end > self.start && other.start < self.end
    }

    /// Number of positions shared by the two ranges
    ///
    pub fn overlap_len(&self, other: &IntRange) -> i64 {
        std::cmp::max(
            std::cmp::min(self.end, other.end) - std::cmp::max(self.start, other.start),
            0,
        )
    }
}

impl fmt::Debug for IntRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}-{})", self.start, self.end)
    }
}

/// Return true if the overlap of the two ranges covers at least `min_fraction` of each range
///
/// Empty ranges never have reciprocal overlap.
///
pub fn has_reciprocal_overlap(r1: &IntRange, r2: &IntRange, min_fraction: f64) -> bool {
    if r1.is_empty() || r2.is_empty() {
        return false;
    }
    let olap = r1.overlap_len(r2) as f64;
    olap >= min_fraction * r1.size() as f64 && olap >= min_fraction * r2.size() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intersect_range() {
        let r1 = IntRange::from_pair(100, 200);

        assert!(r1.intersect_range(&IntRange::from_pair(199, 300)));
        assert!(r1.intersect_range(&IntRange::from_pair(0, 101)));

        // Adjacent ranges don't intersect
        assert!(!r1.intersect_range(&IntRange::from_pair(200, 300)));
        assert!(!r1.intersect_range(&IntRange::from_pair(0, 100)));
    }

    #[test]
    fn test_overlap_len() {
        let r1 = IntRange::from_pair(100, 200);
        assert_eq!(r1.overlap_len(&IntRange::from_pair(150, 400)), 50);
        assert_eq!(r1.overlap_len(&IntRange::from_pair(120, 130)), 10);
        assert_eq!(r1.overlap_len(&IntRange::from_pair(300, 400)), 0);
    }

    #[test]
    fn test_has_reciprocal_overlap() {
        let r1 = IntRange::from_pair(1000, 2000);

        assert!(has_reciprocal_overlap(&r1, &IntRange::from_pair(1500, 2500), 0.5));
        assert!(!has_reciprocal_overlap(&r1, &IntRange::from_pair(1501, 2500), 0.5));

        // Containment is not enough if the contained range is too small
        assert!(!has_reciprocal_overlap(&r1, &IntRange::from_pair(1200, 1400), 0.5));
        assert!(!has_reciprocal_overlap(&r1, &IntRange::from_pair(1200, 1200), 0.0));
    }
}
