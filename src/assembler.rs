//! Streaming gene assembler: groups exon records into per-gene CDS buffers.

use std::collections::{HashMap, HashSet};

use crate::error::Error;
use crate::fasta::ExonRecord;

/// Per-species CDS concatenation buffers for one transcript.
///
/// Species are kept in first-seen order so downstream output is deterministic.
#[derive(Debug, Default)]
pub struct GeneCds {
    order: Vec<String>,
    seqs: HashMap<String, String>,
}

impl GeneCds {
    fn append(&mut self, assembly: &str, sequence: &str) {
        match self.seqs.get_mut(assembly) {
            Some(buf) => buf.push_str(sequence),
            None => {
                self.order.push(assembly.to_string());
                self.seqs.insert(assembly.to_string(), sequence.to_string());
            }
        }
    }

    /// Iterates `(species, concatenated sequence)` in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order
            .iter()
            .map(|s| (s.as_str(), self.seqs[s].as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

/// A completed transcript: emitted when the stream moves on to the next one.
#[derive(Debug)]
pub struct GeneBoundary {
    pub transcript_id: String,
    pub cds: GeneCds,
}

/// Streaming state machine grouping contiguous exon records by transcript.
///
/// Exon records for one transcript must be contiguous in the stream; the
/// assembler verifies this and fails loudly if a transcript reappears after
/// its boundary, since silent regrouping would corrupt the alignments.
#[derive(Debug, Default)]
pub struct GeneAssembler {
    current_id: Option<String>,
    buffers: GeneCds,
    completed: HashSet<String>,
}

impl GeneAssembler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes one exon record. Returns the previous transcript's boundary
    /// when this record starts a new transcript.
    pub fn feed(&mut self, record: &ExonRecord) -> Result<Option<GeneBoundary>, Error> {
        let boundary = if self.current_id.as_deref() == Some(record.transcript_id.as_str()) {
            None
        } else {
            if self.completed.contains(&record.transcript_id) {
                return Err(Error::Validation(format!(
                    "exon records for transcript '{}' are not contiguous in the stream",
                    record.transcript_id
                )));
            }
            match self.current_id.replace(record.transcript_id.clone()) {
                Some(transcript_id) => {
                    self.completed.insert(transcript_id.clone());
                    let cds = std::mem::take(&mut self.buffers);
                    Some(GeneBoundary { transcript_id, cds })
                }
                None => None,
            }
        };

        self.buffers.append(&record.assembly, &record.sequence);
        Ok(boundary)
    }

    /// Flushes the final in-flight transcript at end of stream.
    pub fn finish(mut self) -> Option<GeneBoundary> {
        let transcript_id = self.current_id.take()?;
        Some(GeneBoundary {
            transcript_id,
            cds: self.buffers,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exon(transcript: &str, assembly: &str, index: u32, total: u32, seq: &str) -> ExonRecord {
        ExonRecord {
            transcript_id: transcript.to_string(),
            assembly: assembly.to_string(),
            exon_index: index,
            exon_total: total,
            sequence: seq.to_string(),
        }
    }

    #[test]
    fn concatenates_exons_in_stream_order() {
        let mut asm = GeneAssembler::new();
        assert!(asm.feed(&exon("t1.1", "hg38", 1, 2, "ATGAAA")).unwrap().is_none());
        assert!(asm.feed(&exon("t1.1", "mm10", 1, 2, "ATGAAA")).unwrap().is_none());
        assert!(asm.feed(&exon("t1.1", "hg38", 2, 2, "TAA")).unwrap().is_none());
        assert!(asm.feed(&exon("t1.1", "mm10", 2, 2, "TAA")).unwrap().is_none());

        let boundary = asm.finish().unwrap();
        assert_eq!(boundary.transcript_id, "t1.1");
        let entries: Vec<_> = boundary.cds.iter().collect();
        assert_eq!(
            entries,
            vec![("hg38", "ATGAAATAA"), ("mm10", "ATGAAATAA")]
        );
    }

    #[test]
    fn boundary_on_transcript_change() {
        let mut asm = GeneAssembler::new();
        asm.feed(&exon("t1.1", "hg38", 1, 1, "ATGTAA")).unwrap();
        let boundary = asm
            .feed(&exon("t2.1", "hg38", 1, 1, "ATGTGA"))
            .unwrap()
            .expect("boundary expected");
        assert_eq!(boundary.transcript_id, "t1.1");
        assert_eq!(boundary.cds.iter().collect::<Vec<_>>(), vec![("hg38", "ATGTAA")]);

        // The new record opened accumulation for its own transcript
        let last = asm.finish().unwrap();
        assert_eq!(last.transcript_id, "t2.1");
        assert_eq!(last.cds.iter().collect::<Vec<_>>(), vec![("hg38", "ATGTGA")]);
    }

    #[test]
    fn finish_on_empty_stream() {
        assert!(GeneAssembler::new().finish().is_none());
    }

    #[test]
    fn species_order_is_first_seen() {
        let mut asm = GeneAssembler::new();
        asm.feed(&exon("t1.1", "mm10", 1, 2, "ATG")).unwrap();
        asm.feed(&exon("t1.1", "hg38", 1, 2, "ATG")).unwrap();
        asm.feed(&exon("t1.1", "mm10", 2, 2, "TAA")).unwrap();
        let boundary = asm.finish().unwrap();
        let species: Vec<_> = boundary.cds.iter().map(|(s, _)| s).collect();
        assert_eq!(species, vec!["mm10", "hg38"]);
    }

    #[test]
    fn non_contiguous_transcript_is_fatal() {
        let mut asm = GeneAssembler::new();
        asm.feed(&exon("t1.1", "hg38", 1, 1, "ATGTAA")).unwrap();
        asm.feed(&exon("t2.1", "hg38", 1, 1, "ATGTAA")).unwrap();
        assert!(asm.feed(&exon("t1.1", "hg38", 1, 1, "ATGTAA")).is_err());
    }
}
