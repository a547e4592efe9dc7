use std::fmt;

use serde::{Deserialize, Serialize};

use crate::contig_dictionary::ContigDictionary;
pub use crate::int_range::IntRange;

/// The structure represents a contiguous region of the genome on a single chromosome
#[derive(Clone, Copy, Deserialize, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize)]
pub struct GenomeSegment {
    /// chrom_index is defined by the contig order of the master contig dictionary
    pub chrom_index: usize,
    pub range: IntRange,
}

impl GenomeSegment {
    pub fn from_pair(chrom_index: usize, start: i64, end: i64) -> Self {
        Self {
            chrom_index,
            range: IntRange::from_pair(start, end),
        }
    }

    /// A single-base segment at `pos`
    pub fn from_pos(chrom_index: usize, pos: i64) -> Self {
        Self {
            chrom_index,
            range: IntRange::from_int(pos),
        }
    }

    pub fn size(&self) -> i64 {
        self.range.size()
    }

    pub fn start_point(&self) -> Self {
        Self::from_pos(self.chrom_index, self.range.start)
    }

    pub fn end_point(&self) -> Self {
        Self::from_pos(self.chrom_index, self.range.end)
    }

    /// Convert to a string in 'samtools' region format (e.g. chr20:100-200)
    ///
    pub fn to_region_str(&self, contig_dict: &ContigDictionary) -> String {
        let chrom = contig_dict.get_label(self.chrom_index);
        format!("{chrom}:{}-{}", self.range.start + 1, self.range.end)
    }

    pub fn intersect(&self, other: &Self) -> bool {
        self.chrom_index == other.chrom_index && self.range.intersect_range(&other.range)
    }

    pub fn overlap_len(&self, other: &Self) -> i64 {
        if self.chrom_index != other.chrom_index {
            0
        } else {
            self.range.overlap_len(&other.range)
        }
    }

    /// Return a copy of this segment expanded by `size` on each side, restricted by the bounds of
    /// the chromosome length
    ///
    pub fn get_padded(&self, contig_dict: &ContigDictionary, size: i64) -> Self {
        let chrom_size = contig_dict.get_length(self.chrom_index);
        let start = std::cmp::max(self.range.start - size, 0);
        let end = std::cmp::min(self.range.end + size, chrom_size);
        Self::from_pair(self.chrom_index, start, std::cmp::max(start, end))
    }
}

impl fmt::Debug for GenomeSegment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Segment: {}:{:?}", self.chrom_index, self.range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// This test makes sure the auto-generated ordering for GenomeSegment is doing what we assume
    ///
    #[test]
    fn test_segment_order() {
        // Ensure chrom_index has priority over pos
        let segment1 = GenomeSegment::from_pos(0, 10);
        let segment2 = GenomeSegment::from_pos(1, 1);
        assert!(segment1 < segment2);

        // Ensure begin pos has priority over end pos
        let segment1 = GenomeSegment::from_pair(0, 1, 20);
        let segment2 = GenomeSegment::from_pair(0, 10, 11);
        assert!(segment1 < segment2);
    }

    #[test]
    fn test_to_region_string() {
        let mut contig_dict = ContigDictionary::default();
        contig_dict.add_contig("chr1", 100);
        contig_dict.add_contig("chr2", 100);

        let segment1 = GenomeSegment::from_pos(1, 10);
        assert_eq!(segment1.to_region_str(&contig_dict), "chr2:11-11".to_string());
    }

    #[test]
    fn test_get_padded() {
        let mut contig_dict = ContigDictionary::default();
        contig_dict.add_contig("chr1", 1000);

        let segment = GenomeSegment::from_pair(0, 100, 200);
        assert_eq!(
            segment.get_padded(&contig_dict, 50),
            GenomeSegment::from_pair(0, 50, 250)
        );

        // Padding is clipped at both contig ends
        assert_eq!(
            segment.get_padded(&contig_dict, 5000),
            GenomeSegment::from_pair(0, 0, 1000)
        );
    }

    #[test]
    fn test_intersect() {
        let segment1 = GenomeSegment::from_pair(0, 100, 200);
        assert!(segment1.intersect(&GenomeSegment::from_pair(0, 150, 250)));
        assert!(!segment1.intersect(&GenomeSegment::from_pair(1, 150, 250)));
        assert_eq!(segment1.overlap_len(&GenomeSegment::from_pair(0, 150, 250)), 50);
        assert_eq!(segment1.overlap_len(&GenomeSegment::from_pair(1, 150, 250)), 0);
    }
}
