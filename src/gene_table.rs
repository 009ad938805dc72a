//! Gene identifier lookup table (UCSC-style TSV).

use std::collections::{HashMap, HashSet};
use std::io::BufRead;

use crate::error::Error;

/// Metadata for one gene, resolved from a transcript identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneRecord {
    pub gene_name: String,
    pub chrom: String,
    pub is_coding: bool,
}

/// Lookup table mapping version-stripped transcript identifiers to gene records.
pub struct GeneTable {
    records: HashMap<String, GeneRecord>,
}

/// Column headers the table must provide.
const REQUIRED_COLUMNS: &[&str] = &[
    "name",
    "name2",
    "geneName",
    "#chrom",
    "transcriptClass",
    "transcriptType",
];

impl GeneTable {
    /// Parses a tab-separated lookup table.
    ///
    /// The first line is a header; required columns are located by name.
    /// Rows are deduplicated by `name2` and by version-stripped `name`,
    /// first occurrence winning in both cases.
    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut lines = reader.lines();
        let header = match lines.next() {
            Some(line) => line?,
            None => return Err(Error::Parse("empty gene table".to_string())),
        };

        let columns: Vec<&str> = header.split('\t').collect();
        let mut index_of = HashMap::new();
        for name in REQUIRED_COLUMNS {
            let idx = columns
                .iter()
                .position(|c| c == name)
                .ok_or_else(|| Error::Parse(format!("gene table missing column '{name}'")))?;
            index_of.insert(*name, idx);
        }

        let mut records = HashMap::new();
        let mut seen_name2 = HashSet::new();

        for (line_no, line) in lines.enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < columns.len() {
                return Err(Error::Parse(format!(
                    "gene table line {} has {} columns, expected {}",
                    line_no + 2,
                    fields.len(),
                    columns.len()
                )));
            }

            let name2 = fields[index_of["name2"]];
            if !seen_name2.insert(name2.to_string()) {
                continue;
            }

            let name = fields[index_of["name"]];
            let base = strip_version(name).to_string();
            if records.contains_key(&base) {
                continue;
            }

            let class = fields[index_of["transcriptClass"]];
            let ttype = fields[index_of["transcriptType"]];
            records.insert(
                base,
                GeneRecord {
                    gene_name: fields[index_of["geneName"]].to_string(),
                    chrom: fields[index_of["#chrom"]].to_string(),
                    is_coding: class == "coding" && !ttype.contains("pseudo"),
                },
            );
        }

        Ok(Self { records })
    }

    /// Resolves a dotted transcript identifier (`NAME.VERSION`).
    ///
    /// Returns `None` when the version-stripped identifier is absent from the
    /// table; callers treat that as a skip, not an error.
    #[must_use]
    pub fn lookup(&self, transcript_id: &str) -> Option<&GeneRecord> {
        self.records.get(strip_version(transcript_id))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Strips the version suffix: everything after the final `.`.
fn strip_version(id: &str) -> &str {
    match id.rfind('.') {
        Some(pos) => &id[..pos],
        None => id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const SAMPLE_TABLE: &str = "\
#chrom\tname\tname2\tgeneName\ttranscriptClass\ttranscriptType
chr1\tuc001abc.1\tENST0001.1\tGENE1\tcoding\tprotein_coding
chr2\tuc002def.2\tENST0002.1\tGENE2\tnonCoding\tlncRNA
chr3\tuc003ghi.1\tENST0003.1\tGENE3\tcoding\tprocessed_pseudogene
";

    fn table(input: &str) -> GeneTable {
        GeneTable::from_reader(Cursor::new(input)).unwrap()
    }

    #[test]
    fn lookup_strips_version() {
        let t = table(SAMPLE_TABLE);
        let rec = t.lookup("uc001abc.1").unwrap();
        assert_eq!(rec.gene_name, "GENE1");
        assert_eq!(rec.chrom, "chr1");
        assert!(rec.is_coding);
        // Any version resolves to the same base id
        assert_eq!(t.lookup("uc001abc.9").unwrap().gene_name, "GENE1");
    }

    #[test]
    fn lookup_miss_is_none() {
        let t = table(SAMPLE_TABLE);
        assert!(t.lookup("uc999zzz.1").is_none());
    }

    #[test]
    fn non_coding_class() {
        let t = table(SAMPLE_TABLE);
        assert!(!t.lookup("uc002def.2").unwrap().is_coding);
    }

    #[test]
    fn pseudogene_type_is_not_coding() {
        let t = table(SAMPLE_TABLE);
        assert!(!t.lookup("uc003ghi.1").unwrap().is_coding);
    }

    #[test]
    fn deduplicates_by_name2_first_wins() {
        let input = "\
#chrom\tname\tname2\tgeneName\ttranscriptClass\ttranscriptType
chr1\tuc001abc.1\tENST0001.1\tFIRST\tcoding\tprotein_coding
chr1\tuc001xyz.1\tENST0001.1\tSECOND\tcoding\tprotein_coding
";
        let t = table(input);
        assert_eq!(t.len(), 1);
        assert_eq!(t.lookup("uc001abc.1").unwrap().gene_name, "FIRST");
        assert!(t.lookup("uc001xyz.1").is_none());
    }

    #[test]
    fn deduplicates_by_base_id_first_wins() {
        let input = "\
#chrom\tname\tname2\tgeneName\ttranscriptClass\ttranscriptType
chr1\tuc001abc.1\tENST0001.1\tFIRST\tcoding\tprotein_coding
chr1\tuc001abc.2\tENST0009.1\tSECOND\tcoding\tprotein_coding
";
        let t = table(input);
        assert_eq!(t.len(), 1);
        assert_eq!(t.lookup("uc001abc.2").unwrap().gene_name, "FIRST");
    }

    #[test]
    fn missing_column_is_fatal() {
        let input = "#chrom\tname\tgeneName\ttranscriptClass\ttranscriptType\nchr1\ta.1\tG\tcoding\tprotein_coding\n";
        assert!(GeneTable::from_reader(Cursor::new(input)).is_err());
    }

    #[test]
    fn short_row_is_fatal() {
        let input = "\
#chrom\tname\tname2\tgeneName\ttranscriptClass\ttranscriptType
chr1\tuc001abc.1\tENST0001.1
";
        assert!(GeneTable::from_reader(Cursor::new(input)).is_err());
    }
}
