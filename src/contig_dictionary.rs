use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct ContigInfo {
    pub label: String,
    pub length: u64,
}

/// Ordered list of reference contigs
///
/// The contig order defines the `chrom_index` used by every genome segment in this program, and
/// hence the sort order of all interval indexes.
///
#[derive(Clone, Debug, Default)]
pub struct ContigDictionary {
    pub data: Vec<ContigInfo>,
    pub label_to_index: HashMap<String, usize>,
}

impl ContigDictionary {
    pub fn from_contigs(contigs: &[ContigInfo]) -> Self {
        let mut dict = Self::default();
        for contig in contigs {
            dict.add_contig(&contig.label, contig.length);
        }
        dict
    }

    pub fn add_contig(&mut self, label: &str, length: u64) {
        assert!(
            !self.label_to_index.contains_key(label),
            "Duplicate contig label in dictionary: '{label}'"
        );
        self.label_to_index
            .insert(label.to_string(), self.data.len());
        self.data.push(ContigInfo {
            label: label.to_string(),
            length,
        });
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn get_index(&self, label: &str) -> Option<usize> {
        self.label_to_index.get(label).copied()
    }

    pub fn get_label(&self, chrom_index: usize) -> &str {
        &self.data[chrom_index].label
    }

    pub fn get_length(&self, chrom_index: usize) -> i64 {
        self.data[chrom_index].length as i64
    }

    /// Total length of all contigs
    pub fn reference_length(&self) -> u64 {
        self.data.iter().map(|x| x.length).sum()
    }

    /// True if both dictionaries list the same contigs, with the same lengths, in the same order
    pub fn is_same_dictionary(&self, other: &ContigDictionary) -> bool {
        self.data == other.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup() {
        let mut dict = ContigDictionary::default();
        dict.add_contig("chr1", 1000);
        dict.add_contig("chr2", 500);

        assert_eq!(dict.len(), 2);
        assert_eq!(dict.get_index("chr2"), Some(1));
        assert_eq!(dict.get_index("chr3"), None);
        assert_eq!(dict.get_label(0), "chr1");
        assert_eq!(dict.reference_length(), 1500);
    }

    #[test]
    fn test_is_same_dictionary() {
        let contigs = vec![
            ContigInfo {
                label: "chr1".to_string(),
                length: 1000,
            },
            ContigInfo {
                label: "chr2".to_string(),
                length: 500,
            },
        ];
        let dict1 = ContigDictionary::from_contigs(&contigs);
        let dict2 = ContigDictionary::from_contigs(&contigs);
        assert!(dict1.is_same_dictionary(&dict2));

        let dict3 = ContigDictionary::from_contigs(&contigs[..1]);
        assert!(!dict1.is_same_dictionary(&dict3));
    }

    #[test]
    #[should_panic]
    fn test_duplicate_label() {
        let mut dict = ContigDictionary::default();
        dict.add_contig("chr1", 1000);
        dict.add_contig("chr1", 1000);
    }
}
