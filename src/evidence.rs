//! Clustered read-pair/split-read evidence links and the interval indexes built over them
//!

use serde::{Deserialize, Serialize};

use crate::contig_dictionary::ContigDictionary;
use crate::genome_segment::GenomeSegment;
use crate::interval_index::IntervalIndex;

/// Dense id of one evidence link
///
/// Calls refer to their evidence through this id, so two calls share evidence exactly when their
/// id sets intersect.
pub type EvidenceId = usize;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub enum Strand {
    #[serde(rename = "+")]
    Forward,
    #[serde(rename = "-")]
    Reverse,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrandedSegment {
    pub segment: GenomeSegment,
    pub strand: Strand,
}

/// Aggregated paired-read support connecting two genomic loci
#[derive(Clone, Debug, PartialEq)]
pub struct EvidenceLink {
    pub id: EvidenceId,
    pub left: StrandedSegment,
    pub right: StrandedSegment,
    pub split_read_count: u32,
    pub read_pair_count: u32,
}

impl EvidenceLink {
    pub fn is_intrachromosomal(&self) -> bool {
        self.left.segment.chrom_index == self.right.segment.chrom_index
    }

    /// Segment from the start of the left interval to the end of the right interval
    ///
    /// Returns None for interchromosomal links
    ///
    pub fn outer_segment(&self) -> Option<GenomeSegment> {
        if !self.is_intrachromosomal() {
            return None;
        }
        let start = self.left.segment.range.start;
        let end = std::cmp::max(start, self.right.segment.range.end);
        Some(GenomeSegment::from_pair(
            self.left.segment.chrom_index,
            start,
            end,
        ))
    }

    pub fn observation_count(&self) -> u32 {
        self.split_read_count + self.read_pair_count
    }
}

/// Evidence links partitioned into intra- and interchromosomal interval indexes
///
/// Links are owned by `links`, where each link is stored at the position of its id. The indexes
/// only hold ids.
///
pub struct EvidenceLinkIndex {
    pub links: Vec<EvidenceLink>,

    /// One entry per intrachromosomal link over its (padded) outer segment
    pub intrachromosomal: IntervalIndex<EvidenceId>,

    /// Two entries per interchromosomal link, one each for the (padded) left and right segments
    pub interchromosomal: IntervalIndex<EvidenceId>,
}

impl EvidenceLinkIndex {
    pub fn new(links: Vec<EvidenceLink>, contig_dict: &ContigDictionary, padding: i64) -> Self {
        for (index, link) in links.iter().enumerate() {
            assert_eq!(index, link.id, "Evidence link ids must match their list position");
        }

        let mut intrachromosomal = IntervalIndex::new();
        let mut interchromosomal = IntervalIndex::new();
        for link in links.iter() {
            match link.outer_segment() {
                Some(outer_segment) => {
                    intrachromosomal.insert(outer_segment.get_padded(contig_dict, padding), link.id);
                }
                None => {
                    for segment in [&link.left.segment, &link.right.segment] {
                        interchromosomal.insert(segment.get_padded(contig_dict, padding), link.id);
                    }
                }
            }
        }

        Self {
            links,
            intrachromosomal,
            interchromosomal,
        }
    }

    pub fn get_link(&self, id: EvidenceId) -> &EvidenceLink {
        &self.links[id]
    }
}

#[cfg(test)]
pub mod test_utils {
    use super::*;

    pub fn get_test_link(
        id: EvidenceId,
        left: (usize, i64, i64, Strand),
        right: (usize, i64, i64, Strand),
        read_pair_count: u32,
    ) -> EvidenceLink {
        EvidenceLink {
            id,
            left: StrandedSegment {
                segment: GenomeSegment::from_pair(left.0, left.1, left.2),
                strand: left.3,
            },
            right: StrandedSegment {
                segment: GenomeSegment::from_pair(right.0, right.1, right.2),
                strand: right.3,
            },
            split_read_count: 0,
            read_pair_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_utils::get_test_link;
    use super::*;

    #[test]
    fn test_evidence_link_index() {
        let mut contig_dict = ContigDictionary::default();
        contig_dict.add_contig("chr1", 100_000);
        contig_dict.add_contig("chr2", 100_000);

        use Strand::*;
        let links = vec![
            get_test_link(0, (0, 1000, 1100, Forward), (0, 5000, 5100, Reverse), 3),
            get_test_link(1, (0, 2000, 2100, Forward), (1, 7000, 7100, Reverse), 2),
        ];
        let index = EvidenceLinkIndex::new(links, &contig_dict, 0);

        assert_eq!(index.intrachromosomal.len(), 1);
        assert_eq!(
            *index.intrachromosomal.segment(0),
            GenomeSegment::from_pair(0, 1000, 5100)
        );

        assert_eq!(index.interchromosomal.len(), 2);
        assert!(
            index
                .interchromosomal
                .has_overlapper(&GenomeSegment::from_pos(1, 7050))
        );
        assert!(
            !index
                .interchromosomal
                .has_overlapper(&GenomeSegment::from_pos(0, 3000))
        );
    }
}
