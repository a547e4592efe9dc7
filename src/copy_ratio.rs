//! Binned copy ratios and called copy ratio segments
//!

use serde::{Deserialize, Serialize};

use crate::contig_dictionary::ContigDictionary;
use crate::genome_segment::GenomeSegment;
use crate::interval_index::IntervalIndex;

/// Largest event size considered when selecting the minimal set of copy ratio bins
pub const MAX_COPY_RATIO_EVENT_SIZE: i64 = 100_000;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CopyRatioBin {
    pub segment: GenomeSegment,
    pub log2_ratio: f32,
}

impl CopyRatioBin {
    pub fn copy_ratio(&self) -> f64 {
        2f64.powf(self.log2_ratio as f64)
    }
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum SegmentCall {
    #[serde(rename = "0")]
    Neutral,
    #[serde(rename = "-")]
    Deletion,
    #[serde(rename = "+")]
    Amplification,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CopyRatioSegment {
    pub segment: GenomeSegment,
    pub mean_log2_ratio: f64,
    pub call: SegmentCall,
}

impl CopyRatioSegment {
    /// Copy number implied by the segment's mean copy ratio, assuming a diploid baseline
    pub fn observed_copy_number(&self) -> f64 {
        2f64.powf(self.mean_log2_ratio) * 2.0
    }
}

/// Sort called segments and fill the gaps between consecutive segments on the same contig with
/// neutral segments of zero signal
///
pub fn fill_segment_gaps(mut segments: Vec<CopyRatioSegment>) -> Vec<CopyRatioSegment> {
    segments.sort_by_key(|x| x.segment);

    let gap_segments = segments
        .windows(2)
        .filter_map(|w| {
            let (current, next) = (&w[0].segment, &w[1].segment);
            if current.chrom_index == next.chrom_index && current.range.end < next.range.start {
                Some(CopyRatioSegment {
                    segment: GenomeSegment::from_pair(
                        current.chrom_index,
                        current.range.end,
                        next.range.start,
                    ),
                    mean_log2_ratio: 0.0,
                    call: SegmentCall::Neutral,
                })
            } else {
                None
            }
        })
        .collect::<Vec<_>>();

    segments.extend(gap_segments);
    segments.sort_by_key(|x| x.segment);
    segments
}

pub fn get_copy_ratio_segment_index(
    segments: Vec<CopyRatioSegment>,
) -> IntervalIndex<CopyRatioSegment> {
    fill_segment_gaps(segments)
        .into_iter()
        .map(|x| (x.segment, x))
        .collect()
}

/// Copy ratio bins partitioned by contig, each contig's bins sorted by start
pub type ContigCopyRatioBins = Vec<Vec<CopyRatioBin>>;

pub fn partition_copy_ratio_bins(
    contig_dict: &ContigDictionary,
    bins: Vec<CopyRatioBin>,
) -> ContigCopyRatioBins {
    let reference_length = std::cmp::max(contig_dict.reference_length(), 1) as f64;
    let total_bin_count = bins.len();
    let mut contig_bins = contig_dict
        .data
        .iter()
        .map(|contig| {
            let estimated_bin_count =
                (contig.length as f64 / reference_length * total_bin_count as f64) as usize;
            Vec::with_capacity(estimated_bin_count)
        })
        .collect::<Vec<_>>();

    for bin in bins {
        contig_bins[bin.segment.chrom_index].push(bin);
    }
    for bins in contig_bins.iter_mut() {
        bins.sort_by_key(|x| x.segment.range.start);
    }
    contig_bins
}

/// Return the ordered copy ratio bins over `segment`, with `bins_to_trim` bins removed from
/// each side
///
/// An empty list is returned if the segment is empty or not enough bins remain after trimming.
///
pub fn get_copy_ratios_on_interval(
    segment: &GenomeSegment,
    copy_ratio_index: &IntervalIndex<f32>,
    bins_to_trim: usize,
) -> Vec<CopyRatioBin> {
    if segment.range.is_empty() {
        return Vec::new();
    }
    let mut bins = copy_ratio_index
        .overlappers(segment)
        .into_iter()
        .map(|x| CopyRatioBin {
            segment: *copy_ratio_index.segment(x),
            log2_ratio: *copy_ratio_index.value(x),
        })
        .collect::<Vec<_>>();

    if bins.len() <= 2 * bins_to_trim {
        return Vec::new();
    }
    bins.sort_by_key(|x| x.segment.range.start);
    bins.drain(bins.len() - bins_to_trim..);
    bins.drain(..bins_to_trim);
    bins
}

/// Fraction of `segment` not covered by `bins`
pub fn fraction_empty(segment: &GenomeSegment, bins: &[CopyRatioBin]) -> f64 {
    let covered = bins.iter().map(|x| x.segment.size()).sum::<i64>();
    1.0 - (covered as f64 / segment.size() as f64)
}

/// Reduce copy ratio bins to those overlapping evidence intervals that could support a large event
///
/// # Arguments
/// * `evidence_segments` - Pairs of (unpadded evidence segment, padding), for instance breakpoint
///   pair segments and intrachromosomal link outer segments
///
pub fn get_minimal_copy_ratio_bins(
    contig_dict: &ContigDictionary,
    bins: &[CopyRatioBin],
    evidence_segments: &[(GenomeSegment, i64)],
    min_event_size: i64,
    max_event_size: i64,
) -> Vec<CopyRatioBin> {
    let evidence_index = evidence_segments
        .iter()
        .filter(|(segment, _)| segment.size() >= min_event_size && segment.size() <= max_event_size)
        .map(|(segment, padding)| (segment.get_padded(contig_dict, *padding), ()))
        .collect::<IntervalIndex<_>>();

    let mut minimal_bins = bins
        .iter()
        .filter(|x| evidence_index.has_overlapper(&x.segment))
        .copied()
        .collect::<Vec<_>>();
    minimal_bins.sort_by_key(|x| x.segment);
    minimal_bins
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_segment(start: i64, end: i64, call: SegmentCall) -> CopyRatioSegment {
        CopyRatioSegment {
            segment: GenomeSegment::from_pair(0, start, end),
            mean_log2_ratio: 1.0,
            call,
        }
    }

    fn get_test_bin(chrom_index: usize, start: i64, end: i64) -> CopyRatioBin {
        CopyRatioBin {
            segment: GenomeSegment::from_pair(chrom_index, start, end),
            log2_ratio: 0.0,
        }
    }

    #[test]
    fn test_fill_segment_gaps() {
        let segments = vec![
            get_test_segment(500, 600, SegmentCall::Deletion),
            get_test_segment(100, 200, SegmentCall::Amplification),
            get_test_segment(200, 300, SegmentCall::Amplification),
        ];
        let filled = fill_segment_gaps(segments);
        assert_eq!(filled.len(), 4);
        assert_eq!(filled[2].segment, GenomeSegment::from_pair(0, 300, 500));
        assert_eq!(filled[2].call, SegmentCall::Neutral);
        assert_eq!(filled[2].mean_log2_ratio, 0.0);
    }

    #[test]
    fn test_fill_segment_gaps_across_contigs() {
        let mut segments = vec![get_test_segment(100, 200, SegmentCall::Neutral)];
        let mut other = get_test_segment(500, 600, SegmentCall::Neutral);
        other.segment.chrom_index = 1;
        segments.push(other);
        assert_eq!(fill_segment_gaps(segments).len(), 2);
    }

    #[test]
    fn test_observed_copy_number() {
        let segment = get_test_segment(100, 200, SegmentCall::Amplification);
        approx::assert_ulps_eq!(segment.observed_copy_number(), 4.0, max_ulps = 4);
    }

    #[test]
    fn test_partition_copy_ratio_bins() {
        let mut contig_dict = ContigDictionary::default();
        contig_dict.add_contig("chr1", 1000);
        contig_dict.add_contig("chr2", 1000);
        let bins = vec![
            get_test_bin(1, 200, 300),
            get_test_bin(0, 100, 200),
            get_test_bin(1, 0, 100),
        ];
        let contig_bins = partition_copy_ratio_bins(&contig_dict, bins);
        assert_eq!(contig_bins[0].len(), 1);
        assert_eq!(contig_bins[1].len(), 2);
        assert_eq!(contig_bins[1][0].segment.range.start, 0);
    }

    #[test]
    fn test_get_copy_ratios_on_interval() {
        let index = (0..10)
            .map(|x| (GenomeSegment::from_pair(0, x * 100, (x + 1) * 100), x as f32))
            .collect::<IntervalIndex<_>>();

        let segment = GenomeSegment::from_pair(0, 150, 650);
        let bins = get_copy_ratios_on_interval(&segment, &index, 0);
        assert_eq!(bins.len(), 6);

        let bins = get_copy_ratios_on_interval(&segment, &index, 2);
        assert_eq!(bins.len(), 2);
        assert_eq!(bins[0].log2_ratio, 3.0);

        assert!(get_copy_ratios_on_interval(&segment, &index, 3).is_empty());
        assert!(get_copy_ratios_on_interval(&GenomeSegment::from_pair(0, 50, 50), &index, 0).is_empty());
    }

    #[test]
    fn test_fraction_empty() {
        let segment = GenomeSegment::from_pair(0, 0, 1000);
        let bins = vec![get_test_bin(0, 0, 100), get_test_bin(0, 500, 600)];
        approx::assert_ulps_eq!(fraction_empty(&segment, &bins), 0.8, max_ulps = 4);
    }

    #[test]
    fn test_get_minimal_copy_ratio_bins() {
        let mut contig_dict = ContigDictionary::default();
        contig_dict.add_contig("chr1", 1_000_000);
        let bins = (0..100)
            .map(|x| get_test_bin(0, x * 1000, (x + 1) * 1000))
            .collect::<Vec<_>>();

        let evidence_segments = vec![
            (GenomeSegment::from_pair(0, 10_000, 20_000), 500),
            // Too small
            (GenomeSegment::from_pair(0, 50_000, 50_100), 0),
        ];
        let minimal_bins =
            get_minimal_copy_ratio_bins(&contig_dict, &bins, &evidence_segments, 1000, 100_000);
        assert_eq!(minimal_bins.len(), 12);
        assert_eq!(minimal_bins[0].segment.range.start, 9000);
    }
}
