//! Candidate call generation from paired evidence at a locus
//!
//! Each candidate locus is described by a (left, right, call) segment triple. Every registered
//! [CallFactory] is given the same locus independently, and may produce one call.
//!

use std::collections::BTreeSet;

use crate::breakpoint::BreakpointPair;
use crate::contig_dictionary::ContigDictionary;
use crate::evidence::{EvidenceId, EvidenceLink, EvidenceLinkIndex, Strand};
use crate::genome_segment::GenomeSegment;
use crate::interval_index::IntervalIndex;
use crate::sv_call::{CallChannel, LargeSVCall, LargeSVType};

/// Read-only evidence shared by all call factories
pub struct EvidenceContext<'a> {
    pub contig_dict: &'a ContigDictionary,
    pub links: &'a EvidenceLinkIndex,

    /// Mapped assembled contig alignments, each keyed by the contig name
    pub assembled_contigs: &'a IntervalIndex<String>,
}

/// Call construction contract for one SV type
///
/// The caller guarantees that `left` and `right` are on the same contig, and that the call segment
/// meets the minimum event size, before invoking `try_call`.
///
pub trait CallFactory: Sync {
    fn sv_type(&self) -> LargeSVType;

    /// Attempt to build a call over `call_segment`
    ///
    /// # Arguments
    /// * `left` - Left breakend location, as either a point or an evidence interval
    /// * `right` - Right breakend location, as either a point or an evidence interval
    /// * `breakpoint_pair` - Paired breakpoint records associated with this locus, if any
    /// * `evidence_padding` - Distance from each breakend within which evidence is collected
    ///
    fn try_call(
        &self,
        context: &EvidenceContext,
        left: &GenomeSegment,
        right: &GenomeSegment,
        call_segment: &GenomeSegment,
        breakpoint_pair: Option<&BreakpointPair>,
        evidence_padding: i64,
    ) -> Option<LargeSVCall>;
}

/// Expected (left, right) strand pattern of supporting links for each SV type
fn get_link_strand_pattern(sv_type: LargeSVType) -> Option<(Strand, Strand)> {
    match sv_type {
        LargeSVType::Deletion => Some((Strand::Forward, Strand::Reverse)),
        LargeSVType::TandemDuplication => Some((Strand::Reverse, Strand::Forward)),
        LargeSVType::DispersedDuplication => None,
    }
}

fn get_opposing_type(sv_type: LargeSVType) -> LargeSVType {
    match sv_type {
        LargeSVType::Deletion => LargeSVType::TandemDuplication,
        _ => LargeSVType::Deletion,
    }
}

fn has_strand_pattern(link: &EvidenceLink, pattern: Option<(Strand, Strand)>) -> bool {
    pattern == Some((link.left.strand, link.right.strand))
}

/// Simple call factory scoring a locus by the strand pattern of nearby evidence links
///
/// - Intrachromosomal links with both ends near the locus breakends support the call if they have
///   the call type's strand pattern, and count against the call if they have the opposing type's
///   pattern.
/// - Interchromosomal links with an end near either breakend count against the call.
/// - Assembled contigs named by the breakpoint pair, aligned near their breakend, support the call.
///
pub struct LinkSupportCallFactory {
    sv_type: LargeSVType,
    channel: CallChannel,
}

impl LinkSupportCallFactory {
    pub fn new(sv_type: LargeSVType, channel: CallChannel) -> Self {
        assert!(
            get_link_strand_pattern(sv_type).is_some(),
            "No link strand pattern defined for SV type {sv_type}"
        );
        Self { sv_type, channel }
    }

    fn count_assembly_evidence(
        &self,
        context: &EvidenceContext,
        left_padded: &GenomeSegment,
        right_padded: &GenomeSegment,
        breakpoint_pair: Option<&BreakpointPair>,
    ) -> u32 {
        let Some(breakpoint_pair) = breakpoint_pair else {
            return 0;
        };
        let mut names = BTreeSet::new();
        for (padded, pair_names) in [
            (left_padded, &breakpoint_pair.left_contig_names),
            (right_padded, &breakpoint_pair.right_contig_names),
        ] {
            names.extend(
                context
                    .assembled_contigs
                    .overlapping_values(padded)
                    .filter(|name| pair_names.contains(name)),
            );
        }
        names.len() as u32
    }
}

impl CallFactory for LinkSupportCallFactory {
    fn sv_type(&self) -> LargeSVType {
        self.sv_type
    }

    fn try_call(
        &self,
        context: &EvidenceContext,
        left: &GenomeSegment,
        right: &GenomeSegment,
        call_segment: &GenomeSegment,
        breakpoint_pair: Option<&BreakpointPair>,
        evidence_padding: i64,
    ) -> Option<LargeSVCall> {
        let left_padded = left.get_padded(context.contig_dict, evidence_padding);
        let right_padded = right.get_padded(context.contig_dict, evidence_padding);

        let support_pattern = get_link_strand_pattern(self.sv_type);
        let counter_pattern = get_link_strand_pattern(get_opposing_type(self.sv_type));

        let mut supporting_evidence = BTreeSet::new();
        let mut counter_evidence_ids = BTreeSet::new();
        for &id in context.links.intrachromosomal.overlapping_values(&left_padded) {
            let link = context.links.get_link(id);
            if !(link.left.segment.intersect(&left_padded)
                && link.right.segment.intersect(&right_padded))
            {
                continue;
            }
            if has_strand_pattern(link, support_pattern) {
                supporting_evidence.insert(id);
            } else if has_strand_pattern(link, counter_pattern) {
                counter_evidence_ids.insert(id);
            }
        }
        for padded in [&left_padded, &right_padded] {
            counter_evidence_ids.extend(context.links.interchromosomal.overlapping_values(padded));
        }

        let assembly_evidence =
            self.count_assembly_evidence(context, &left_padded, &right_padded, breakpoint_pair);

        if supporting_evidence.is_empty() && assembly_evidence == 0 {
            return None;
        }

        let sum_links = |ids: &BTreeSet<EvidenceId>, f: fn(&EvidenceLink) -> u32| -> u32 {
            ids.iter().map(|&id| f(context.links.get_link(id))).sum()
        };

        Some(LargeSVCall {
            segment: *call_segment,
            sv_type: self.sv_type,
            channel: self.channel,
            read_pair_evidence: sum_links(&supporting_evidence, |x| x.read_pair_count),
            split_read_evidence: sum_links(&supporting_evidence, |x| x.split_read_count),
            assembly_evidence,
            counter_evidence: sum_links(&counter_evidence_ids, |x| x.observation_count()),
            supporting_evidence,
        })
    }
}

/// Default factory set, producing deletion and tandem duplication calls on channel 0
pub fn get_default_call_factories() -> Vec<Box<dyn CallFactory>> {
    vec![
        Box::new(LinkSupportCallFactory::new(LargeSVType::TandemDuplication, 0)),
        Box::new(LinkSupportCallFactory::new(LargeSVType::Deletion, 0)),
    ]
}

/// Collect the calls from all factories at one locus
///
/// No calls are returned if the locus spans two contigs or the call segment is smaller than
/// `min_event_size`.
///
#[allow(clippy::too_many_arguments)]
pub fn get_events_on_interval(
    factories: &[Box<dyn CallFactory>],
    context: &EvidenceContext,
    left: &GenomeSegment,
    right: &GenomeSegment,
    call_segment: &GenomeSegment,
    breakpoint_pair: Option<&BreakpointPair>,
    evidence_padding: i64,
    min_event_size: i64,
) -> Vec<LargeSVCall> {
    if left.chrom_index != right.chrom_index || call_segment.size() < min_event_size {
        return Vec::new();
    }
    factories
        .iter()
        .filter_map(|factory| {
            factory.try_call(
                context,
                left,
                right,
                call_segment,
                breakpoint_pair,
                evidence_padding,
            )
        })
        .collect()
}
