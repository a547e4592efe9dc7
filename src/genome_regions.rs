use log::info;
use simple_error::{SimpleResult, bail, try_with};
use thousands::Separable;

use crate::contig_dictionary::ContigDictionary;
use crate::genome_segment::GenomeSegment;
use crate::interval_index::IntervalIndex;

fn is_bed_header(line: &str) -> bool {
    line.starts_with('#') || line.starts_with("track") || line.starts_with("browser")
}

/// Parse regions from BED formatted text
///
/// Only the first three columns are used.
///
/// # Arguments
///
/// * `label` - Used in error messages to describe what type of regions file this is
///
pub fn parse_bed_segments(
    content: &str,
    contig_dict: &ContigDictionary,
    label: &str,
) -> SimpleResult<Vec<GenomeSegment>> {
    let mut segments = Vec::new();
    for (line_index, line) in content.lines().enumerate() {
        if line.is_empty() || is_bed_header(line) {
            continue;
        }
        let line_no = line_index + 1;

        let words = line.split('\t').collect::<Vec<_>>();
        if words.len() < 3 {
            bail!("Expected at least 3 columns on line {line_no} of {label} regions file");
        }

        let chrom = words[0];
        let Some(chrom_index) = contig_dict.get_index(chrom) else {
            bail!("Unknown contig '{chrom}' on line {line_no} of {label} regions file");
        };
        let start = try_with!(
            words[1].parse::<i64>(),
            "Can't parse start position on line {line_no} of {label} regions file"
        );
        let end = try_with!(
            words[2].parse::<i64>(),
            "Can't parse end position on line {line_no} of {label} regions file"
        );
        if start > end {
            bail!("Invalid interval {chrom}:{start}-{end} on line {line_no} of {label} regions file");
        }

        segments.push(GenomeSegment::from_pair(chrom_index, start, end));
    }
    Ok(segments)
}

/// Read regions from a BED file, which may be plain text or bgzip compressed
///
pub fn read_bed_segments(
    filename: &str,
    contig_dict: &ContigDictionary,
    label: &str,
) -> SimpleResult<Vec<GenomeSegment>> {
    use rust_htslib::bgzf;
    use std::io::Read;

    info!("Reading {label} regions from file '{filename}'");

    let mut reader = try_with!(
        bgzf::Reader::from_path(filename),
        "Unable to open {label} regions file: '{filename}'"
    );

    let mut content = String::new();
    try_with!(
        reader.read_to_string(&mut content),
        "Can't parse text from {label} regions file: '{filename}'"
    );

    let segments = parse_bed_segments(&content, contig_dict, label)?;
    info!(
        "Read {} {label} regions",
        segments.len().separate_with_commas()
    );
    Ok(segments)
}

/// Index of high coverage regions, used to skip read depth support testing
pub fn get_high_coverage_mask(segments: impl IntoIterator<Item = GenomeSegment>) -> IntervalIndex<()> {
    segments.into_iter().map(|x| (x, ())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contig_dictionary::ContigInfo;

    fn get_test_dict() -> ContigDictionary {
        ContigDictionary::from_contigs(&[
            ContigInfo {
                label: "chr1".to_string(),
                length: 100_000,
            },
            ContigInfo {
                label: "chr2".to_string(),
                length: 100_000,
            },
        ])
    }

    #[test]
    fn test_parse_bed_segments() {
        let contig_dict = get_test_dict();
        let content = "track name=test\n#comment\nchr2\t100\t200\tfoo\nchr1\t50\t60\n";
        let segments = parse_bed_segments(content, &contig_dict, "test").unwrap();
        assert_eq!(
            segments,
            vec![
                GenomeSegment::from_pair(1, 100, 200),
                GenomeSegment::from_pair(0, 50, 60)
            ]
        );
    }

    #[test]
    fn test_parse_bed_errors() {
        let contig_dict = get_test_dict();
        assert!(parse_bed_segments("chr3\t100\t200\n", &contig_dict, "test").is_err());
        assert!(parse_bed_segments("chr1\t100\n", &contig_dict, "test").is_err());
        assert!(parse_bed_segments("chr1\tx\t200\n", &contig_dict, "test").is_err());
        assert!(parse_bed_segments("chr1\t300\t200\n", &contig_dict, "test").is_err());
    }

    #[test]
    fn test_high_coverage_mask() {
        let mask = get_high_coverage_mask(vec![
            GenomeSegment::from_pair(0, 100, 200),
            GenomeSegment::from_pair(1, 100, 200),
        ]);
        assert!(mask.has_overlapper(&GenomeSegment::from_pos(0, 150)));
        assert!(!mask.has_overlapper(&GenomeSegment::from_pos(0, 200)));
    }
}
