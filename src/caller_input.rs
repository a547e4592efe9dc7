//! Caller input bundle, and its conversion into indexed evidence
//!
//! All evidence is provided in a single JSON document. Contigs are given by label and intervals are
//! 0-based and half-open, `[start, end)`.
//!

use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::str::FromStr;

use camino::Utf8Path;
use log::info;
use serde::{Deserialize, Serialize};
use simple_error::{SimpleResult, try_with};

use crate::breakpoint::BreakpointRecord;
use crate::contig_dictionary::{ContigDictionary, ContigInfo};
use crate::copy_ratio::{CopyRatioBin, CopyRatioSegment, SegmentCall};
use crate::evidence::{EvidenceLink, Strand, StrandedSegment};
use crate::genome_segment::GenomeSegment;
use crate::sv_call::LargeSVType;

#[derive(Debug, PartialEq)]
pub enum CallerInputError {
    /// The copy ratio contig dictionary does not match the primary contig dictionary
    IncompatibleDictionary,

    /// A record names a contig which is not in the contig dictionary
    UnknownContig { label: String, source: String },

    /// A record interval has an end before its start
    InvalidInterval { label: String, start: i64, end: i64 },

    /// A contig index was requested which is not in the contig dictionary
    MissingContigIndex(usize),
}

impl fmt::Display for CallerInputError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::IncompatibleDictionary => write!(
                f,
                "Copy ratio contig dictionary is not compatible with the caller input contig dictionary"
            ),
            Self::UnknownContig { label, source } => {
                write!(f, "Unknown contig '{label}' in {source} record")
            }
            Self::InvalidInterval { label, start, end } => {
                write!(f, "Invalid interval {label}:{start}-{end}")
            }
            Self::MissingContigIndex(chrom_index) => {
                write!(f, "Contig index {chrom_index} is not in the contig dictionary")
            }
        }
    }
}

impl std::error::Error for CallerInputError {}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct BreakpointInputRecord {
    pub id: String,
    pub mate_id: Option<String>,
    pub contig: String,
    pub pos: i64,

    /// Names of assembled contigs supporting this breakpoint
    #[serde(default)]
    pub contig_names: Vec<String>,
}

/// A previously called SV, for instance from an upstream caller
///
/// The type tag is kept as a string so that records of types this caller doesn't handle can still
/// be read.
///
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct SVCallInputRecord {
    pub sv_type: String,
    pub contig: String,
    pub start: i64,
    pub end: i64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct StrandedIntervalInputRecord {
    pub contig: String,
    pub start: i64,
    pub end: i64,
    pub strand: Strand,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct EvidenceLinkInputRecord {
    pub left: StrandedIntervalInputRecord,
    pub right: StrandedIntervalInputRecord,
    pub split_read_count: u32,
    pub read_pair_count: u32,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CopyRatioBinInputRecord {
    pub contig: String,
    pub start: i64,
    pub end: i64,
    pub log2_ratio: f32,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CopyRatioSegmentInputRecord {
    pub contig: String,
    pub start: i64,
    pub end: i64,
    pub mean_log2_ratio: f64,
    pub call: SegmentCall,
}

/// Alignment of one assembled contig to the reference
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AssembledContigInputRecord {
    pub name: String,
    pub mapped: bool,
    pub contig: Option<String>,
    #[serde(default)]
    pub start: i64,
    #[serde(default)]
    pub end: i64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct IntervalInputRecord {
    pub contig: String,
    pub start: i64,
    pub end: i64,
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct CallerInput {
    pub contigs: Vec<ContigInfo>,

    /// Contig dictionary of the copy ratio bins, which must match `contigs`
    pub copy_ratio_contigs: Vec<ContigInfo>,

    pub breakpoints: Vec<BreakpointInputRecord>,
    pub sv_calls: Vec<SVCallInputRecord>,
    pub evidence_links: Vec<EvidenceLinkInputRecord>,
    pub copy_ratio_bins: Vec<CopyRatioBinInputRecord>,
    pub copy_ratio_segments: Vec<CopyRatioSegmentInputRecord>,
    pub assembled_contigs: Vec<AssembledContigInputRecord>,
    pub high_coverage_intervals: Vec<IntervalInputRecord>,
}

pub fn read_caller_input(filename: &Utf8Path) -> SimpleResult<CallerInput> {
    info!("Reading caller input from file: '{filename}'");

    let file = try_with!(
        File::open(filename),
        "Unable to open caller input file: '{filename}'"
    );
    let reader = BufReader::new(file);
    let input = try_with!(
        serde_json::from_reader(reader),
        "Unable to parse caller input from json file: '{filename}'"
    );
    Ok(input)
}

/// A previously called SV converted to dictionary coordinates
///
/// `sv_type` is None for any type tag this caller doesn't handle.
///
#[derive(Clone, Debug, PartialEq)]
pub struct ExistingSVCall {
    pub segment: GenomeSegment,
    pub sv_type: Option<LargeSVType>,
}

/// An assembled contig alignment converted to dictionary coordinates
#[derive(Clone, Debug, PartialEq)]
pub struct AssembledContig {
    pub name: String,
    pub segment: GenomeSegment,
}

fn get_chrom_index(
    contig_dict: &ContigDictionary,
    label: &str,
    source: &str,
) -> Result<usize, CallerInputError> {
    contig_dict
        .get_index(label)
        .ok_or_else(|| CallerInputError::UnknownContig {
            label: label.to_string(),
            source: source.to_string(),
        })
}

/// Convert one input interval to a genome segment
///
/// # Arguments
/// * `source` - Describes the record type in error messages
///
pub fn get_segment(
    contig_dict: &ContigDictionary,
    label: &str,
    start: i64,
    end: i64,
    source: &str,
) -> Result<GenomeSegment, CallerInputError> {
    let chrom_index = get_chrom_index(contig_dict, label, source)?;
    if start > end {
        return Err(CallerInputError::InvalidInterval {
            label: label.to_string(),
            start,
            end,
        });
    }
    Ok(GenomeSegment::from_pair(chrom_index, start, end))
}

impl BreakpointInputRecord {
    pub fn resolve(
        &self,
        contig_dict: &ContigDictionary,
    ) -> Result<BreakpointRecord, CallerInputError> {
        Ok(BreakpointRecord {
            id: self.id.clone(),
            mate_id: self.mate_id.clone(),
            chrom_index: get_chrom_index(contig_dict, &self.contig, "breakpoint")?,
            pos: self.pos,
            contig_names: self.contig_names.clone(),
        })
    }
}

impl SVCallInputRecord {
    pub fn resolve(&self, contig_dict: &ContigDictionary) -> Result<ExistingSVCall, CallerInputError> {
        Ok(ExistingSVCall {
            segment: get_segment(contig_dict, &self.contig, self.start, self.end, "SV call")?,
            sv_type: LargeSVType::from_str(&self.sv_type).ok(),
        })
    }
}

impl StrandedIntervalInputRecord {
    fn resolve(&self, contig_dict: &ContigDictionary) -> Result<StrandedSegment, CallerInputError> {
        Ok(StrandedSegment {
            segment: get_segment(contig_dict, &self.contig, self.start, self.end, "evidence link")?,
            strand: self.strand,
        })
    }
}

/// Convert all evidence link records, assigning each link the id of its position in the input
pub fn resolve_evidence_links(
    contig_dict: &ContigDictionary,
    records: &[EvidenceLinkInputRecord],
) -> Result<Vec<EvidenceLink>, CallerInputError> {
    records
        .iter()
        .enumerate()
        .map(|(id, x)| {
            Ok(EvidenceLink {
                id,
                left: x.left.resolve(contig_dict)?,
                right: x.right.resolve(contig_dict)?,
                split_read_count: x.split_read_count,
                read_pair_count: x.read_pair_count,
            })
        })
        .collect()
}

impl CopyRatioBinInputRecord {
    pub fn resolve(&self, contig_dict: &ContigDictionary) -> Result<CopyRatioBin, CallerInputError> {
        Ok(CopyRatioBin {
            segment: get_segment(
                contig_dict,
                &self.contig,
                self.start,
                self.end,
                "copy ratio bin",
            )?,
            log2_ratio: self.log2_ratio,
        })
    }
}

impl CopyRatioSegmentInputRecord {
    pub fn resolve(
        &self,
        contig_dict: &ContigDictionary,
    ) -> Result<CopyRatioSegment, CallerInputError> {
        Ok(CopyRatioSegment {
            segment: get_segment(
                contig_dict,
                &self.contig,
                self.start,
                self.end,
                "copy ratio segment",
            )?,
            mean_log2_ratio: self.mean_log2_ratio,
            call: self.call,
        })
    }
}

impl AssembledContigInputRecord {
    /// Returns None for unmapped contigs
    pub fn resolve(
        &self,
        contig_dict: &ContigDictionary,
    ) -> Result<Option<AssembledContig>, CallerInputError> {
        if !self.mapped {
            return Ok(None);
        }
        let Some(contig) = self.contig.as_ref() else {
            return Ok(None);
        };
        Ok(Some(AssembledContig {
            name: self.name.clone(),
            segment: get_segment(
                contig_dict,
                contig,
                self.start,
                self.end,
                "assembled contig",
            )?,
        }))
    }
}

impl IntervalInputRecord {
    pub fn resolve(
        &self,
        contig_dict: &ContigDictionary,
        source: &str,
    ) -> Result<GenomeSegment, CallerInputError> {
        get_segment(contig_dict, &self.contig, self.start, self.end, source)
    }
}

#[cfg(test)]
pub mod test_utils {
    use super::*;

    pub fn get_test_contigs() -> Vec<ContigInfo> {
        vec![
            ContigInfo {
                label: "chr1".to_string(),
                length: 1_000_000,
            },
            ContigInfo {
                label: "chr2".to_string(),
                length: 500_000,
            },
        ]
    }

    pub fn get_empty_test_input() -> CallerInput {
        CallerInput {
            contigs: get_test_contigs(),
            copy_ratio_contigs: get_test_contigs(),
            breakpoints: Vec::new(),
            sv_calls: Vec::new(),
            evidence_links: Vec::new(),
            copy_ratio_bins: Vec::new(),
            copy_ratio_segments: Vec::new(),
            assembled_contigs: Vec::new(),
            high_coverage_intervals: Vec::new(),
        }
    }
}
