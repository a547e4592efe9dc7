//! Pairing of mate-linked breakpoint records
//!

use std::collections::HashMap;

use log::warn;
use serde::Serialize;
use thousands::Separable;

use crate::genome_segment::GenomeSegment;

/// One breakend record, as described by an SV caller's BND-style output
///
#[derive(Clone, Debug, PartialEq)]
pub struct BreakpointRecord {
    pub id: String,

    /// Id of the record's mate, if the record has a mate attribute
    pub mate_id: Option<String>,

    pub chrom_index: usize,

    /// Zero-indexed breakpoint position
    pub pos: i64,

    /// Names of the assembled contigs supporting this breakend
    pub contig_names: Vec<String>,
}

/// Two mate breakpoint records on the same contig, resolved into a single interval
///
/// The interval runs from the position of the first (leftmost) record to that of the second.
///
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BreakpointPair {
    pub segment: GenomeSegment,
    pub left_contig_names: Vec<String>,
    pub right_contig_names: Vec<String>,
}

impl BreakpointPair {
    fn from_mates(bp1: BreakpointRecord, bp2: BreakpointRecord) -> Self {
        assert_eq!(bp1.chrom_index, bp2.chrom_index);
        let (first, second) = if bp1.pos < bp2.pos {
            (bp1, bp2)
        } else {
            (bp2, bp1)
        };
        Self {
            segment: GenomeSegment::from_pair(first.chrom_index, first.pos, second.pos),
            left_contig_names: first.contig_names,
            right_contig_names: second.contig_names,
        }
    }

    pub fn left_point(&self) -> GenomeSegment {
        self.segment.start_point()
    }

    pub fn right_point(&self) -> GenomeSegment {
        self.segment.end_point()
    }
}

pub struct BreakpointPairingResult {
    pub pairs: Vec<BreakpointPair>,

    /// Records with a mate attribute which never found their mate
    pub unpaired_count: usize,
}

fn is_reciprocal_mate(bp1: &BreakpointRecord, bp2: &BreakpointRecord) -> bool {
    bp1.mate_id.as_deref() == Some(bp2.id.as_str()) && bp2.mate_id.as_deref() == Some(bp1.id.as_str())
}

/// Find all mate breakpoint pairs located on the same contig
///
/// Records without a mate attribute are ignored. Mate pairs spanning two contigs are matched and
/// then dropped. Records with a mate attribute whose mate is never found are counted in the result
/// and reported as a warning.
///
/// Panics if a record's mate is found, but the mate does not name the record as its own mate.
///
pub fn get_intrachromosomal_breakpoint_pairs(
    breakpoints: impl IntoIterator<Item = BreakpointRecord>,
) -> BreakpointPairingResult {
    let mut pending = HashMap::new();
    let mut pairs = Vec::new();

    for bp in breakpoints {
        let Some(mate_id) = bp.mate_id.as_ref() else {
            continue;
        };
        match pending.remove(mate_id) {
            Some(mate) => {
                if !is_reciprocal_mate(&bp, &mate) {
                    panic!("Breakpoint mate attributes do not match: {bp:?} {mate:?}");
                }
                if bp.chrom_index == mate.chrom_index {
                    pairs.push(BreakpointPair::from_mates(bp, mate));
                }
            }
            None => {
                pending.insert(bp.id.clone(), bp);
            }
        }
    }

    let unpaired_count = pending.len();
    if unpaired_count > 0 {
        warn!(
            "There were {} unpaired breakpoint records with a mate attribute",
            unpaired_count.separate_with_commas()
        );
    }

    BreakpointPairingResult {
        pairs,
        unpaired_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_record(id: &str, mate_id: Option<&str>, chrom_index: usize, pos: i64) -> BreakpointRecord {
        BreakpointRecord {
            id: id.to_string(),
            mate_id: mate_id.map(|x| x.to_string()),
            chrom_index,
            pos,
            contig_names: vec![format!("contig_{id}")],
        }
    }

    #[test]
    fn test_breakpoint_pairing() {
        let records = vec![
            get_test_record("bnd1", Some("bnd2"), 0, 5000),
            get_test_record("bnd3", Some("bnd4"), 0, 100),
            get_test_record("bnd2", Some("bnd1"), 0, 1000),
            get_test_record("bnd5", None, 0, 100),
            get_test_record("bnd4", Some("bnd3"), 0, 200),
        ];
        let result = get_intrachromosomal_breakpoint_pairs(records);
        assert_eq!(result.unpaired_count, 0);
        assert_eq!(result.pairs.len(), 2);

        let pair = &result.pairs[0];
        assert_eq!(pair.segment, GenomeSegment::from_pair(0, 1000, 5000));
        assert_eq!(pair.left_contig_names, vec!["contig_bnd2".to_string()]);
        assert_eq!(pair.right_contig_names, vec!["contig_bnd1".to_string()]);

        for pair in result.pairs.iter() {
            assert!(pair.segment.range.start <= pair.segment.range.end);
        }
    }

    #[test]
    fn test_interchromosomal_and_unpaired_breakpoints() {
        let records = vec![
            get_test_record("bnd1", Some("bnd2"), 0, 5000),
            get_test_record("bnd2", Some("bnd1"), 1, 1000),
            get_test_record("bnd3", Some("bnd4"), 0, 100),
            get_test_record("bnd6", Some("bnd7"), 0, 100),
        ];
        let result = get_intrachromosomal_breakpoint_pairs(records);
        assert!(result.pairs.is_empty());
        assert_eq!(result.unpaired_count, 2);
    }

    #[test]
    #[should_panic]
    fn test_nonreciprocal_mates() {
        let records = vec![
            get_test_record("bnd1", Some("bnd3"), 0, 5000),
            get_test_record("bnd2", Some("bnd1"), 0, 1000),
        ];
        let _ = get_intrachromosomal_breakpoint_pairs(records);
    }
}
