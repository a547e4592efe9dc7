//! JSON output of modeled calls and breakpoint pairs
//!

use std::fs::File;
use std::io::BufWriter;

use camino::Utf8Path;
use log::info;
use serde::Serialize;
use unwrap::unwrap;

use crate::breakpoint::BreakpointPair;
use crate::caller_input::ExistingSVCall;
use crate::contig_dictionary::ContigDictionary;
use crate::sv_call::{CallChannel, LargeSVType, ModeledCall, ReadDepthSupport};

#[derive(Debug, PartialEq, Serialize)]
pub struct CallOutputRecord {
    pub contig: String,
    pub start: i64,
    pub end: i64,
    pub sv_type: LargeSVType,
    pub channel: CallChannel,
    pub score: f64,
    pub evidence_count: usize,
    pub read_pair_evidence: u32,
    pub split_read_evidence: u32,
    pub assembly_evidence: u32,
    pub counter_evidence: u32,
    pub copy_number_contribution: f64,
    pub read_depth_support: Option<ReadDepthSupport>,
}

impl CallOutputRecord {
    pub fn new(
        contig_dict: &ContigDictionary,
        x: &ModeledCall,
        counter_evidence_pseudocount: f64,
    ) -> Self {
        let call = &x.call;
        Self {
            contig: contig_dict.get_label(call.segment.chrom_index).to_string(),
            start: call.segment.range.start,
            end: call.segment.range.end,
            sv_type: call.sv_type,
            channel: call.channel,
            score: call.score(counter_evidence_pseudocount),
            evidence_count: call.supporting_evidence.len(),
            read_pair_evidence: call.read_pair_evidence,
            split_read_evidence: call.split_read_evidence,
            assembly_evidence: call.assembly_evidence,
            counter_evidence: call.counter_evidence,
            copy_number_contribution: x.annotation.copy_number_contribution,
            read_depth_support: x.annotation.read_depth_support,
        }
    }
}

#[derive(Serialize)]
struct ExistingCallOutputRecord {
    contig: String,
    start: i64,
    end: i64,
    sv_type: Option<LargeSVType>,
}

#[derive(Serialize)]
struct BreakpointPairOutputRecord<'a> {
    contig: &'a str,
    start: i64,
    end: i64,
    left_contig_names: &'a [String],
    right_contig_names: &'a [String],
}

fn write_json_records<T: Serialize>(filename: &Utf8Path, label: &str, records: &[T]) {
    info!("Writing {label} to file: '{filename}'");

    let f = unwrap!(
        File::create(filename),
        "Unable to create {label} json file: '{filename}'"
    );
    let f = BufWriter::new(f);
    serde_json::to_writer_pretty(f, records).unwrap();
}

pub fn write_calls(
    filename: &Utf8Path,
    contig_dict: &ContigDictionary,
    calls: &[ModeledCall],
    counter_evidence_pseudocount: f64,
) {
    let records = calls
        .iter()
        .map(|x| CallOutputRecord::new(contig_dict, x, counter_evidence_pseudocount))
        .collect::<Vec<_>>();
    write_json_records(filename, "modeled calls", &records);
}

pub fn write_filtered_calls(
    filename: &Utf8Path,
    contig_dict: &ContigDictionary,
    calls: &[ExistingSVCall],
) {
    let records = calls
        .iter()
        .map(|x| ExistingCallOutputRecord {
            contig: contig_dict.get_label(x.segment.chrom_index).to_string(),
            start: x.segment.range.start,
            end: x.segment.range.end,
            sv_type: x.sv_type,
        })
        .collect::<Vec<_>>();
    write_json_records(filename, "filtered calls", &records);
}

pub fn write_breakpoint_pairs(
    filename: &Utf8Path,
    contig_dict: &ContigDictionary,
    pairs: &[BreakpointPair],
) {
    let records = pairs
        .iter()
        .map(|x| BreakpointPairOutputRecord {
            contig: contig_dict.get_label(x.segment.chrom_index),
            start: x.segment.range.start,
            end: x.segment.range.end,
            left_contig_names: &x.left_contig_names,
            right_contig_names: &x.right_contig_names,
        })
        .collect::<Vec<_>>();
    write_json_records(filename, "breakpoint pairs", &records);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contig_dictionary::ContigInfo;
    use crate::sv_call::CallAnnotation;
    use crate::sv_call::test_utils::get_test_call;

    #[test]
    fn test_call_output_record() {
        let contig_dict = ContigDictionary::from_contigs(&[ContigInfo {
            label: "chr7".to_string(),
            length: 1_000_000,
        }]);
        let x = ModeledCall {
            call: get_test_call(0, 1000, 5000, LargeSVType::Deletion, &[2, 3], 6),
            annotation: CallAnnotation {
                model_id: 0,
                copy_number_contribution: 0.75,
                read_depth_support: Some(ReadDepthSupport::Hmm),
            },
        };
        let record = CallOutputRecord::new(&contig_dict, &x, 1.0);
        assert_eq!(record.contig, "chr7");
        assert_eq!(record.evidence_count, 2);
        approx::assert_ulps_eq!(record.score, 6.0, max_ulps = 4);

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["sv_type"], "DEL");
        assert_eq!(json["read_depth_support"], "HMM");
    }
}
