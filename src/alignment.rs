//! Candidate alignment construction and the phylip/FASTA writers.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::assembler::GeneCds;
use crate::error::Error;
use crate::orf;
use crate::species::{self, REFERENCE_SPECIES};

/// Left-justified column width for species names in phylip output.
const PHYLIP_NAME_WIDTH: usize = 10;

/// A validated per-gene alignment: `(species, sequence)` entries in first-seen
/// order, every sequence the same length, stop codons masked with `?`.
#[derive(Debug, Default)]
pub struct CdsAlignment {
    entries: Vec<(String, String)>,
}

impl CdsAlignment {
    /// Builds the candidate alignment for one gene: excluded species are
    /// dropped up front, every remaining sequence must pass both ORF scans,
    /// and accepted sequences have their stop codon masked.
    #[must_use]
    pub fn from_gene_cds(cds: &GeneCds) -> Self {
        let mut entries = Vec::new();
        for (assembly, seq) in cds.iter() {
            if species::is_excluded(assembly) {
                continue;
            }
            if let Some(span) = orf::validate(seq) {
                entries.push((assembly.to_string(), orf::mask_stop(seq, span)));
            }
        }
        Self { entries }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn contains(&self, assembly: &str) -> bool {
        self.entries.iter().any(|(s, _)| s == assembly)
    }

    /// Retained species in first-seen order.
    #[must_use]
    pub fn species(&self) -> Vec<String> {
        self.entries.iter().map(|(s, _)| s.clone()).collect()
    }

    /// Entries ordered for output: reference species first, the rest in
    /// first-seen order (stable).
    fn ordered(&self) -> Vec<&(String, String)> {
        let mut ordered: Vec<&(String, String)> = self.entries.iter().collect();
        ordered.sort_by_key(|(s, _)| s != REFERENCE_SPECIES);
        ordered
    }

    /// Common sequence length, verifying that all entries agree.
    fn sequence_length(&self) -> Result<usize, Error> {
        let mut lengths = self.entries.iter().map(|(_, seq)| seq.len());
        let first = lengths.next().ok_or_else(|| {
            Error::Validation("cannot write an empty alignment".to_string())
        })?;
        if lengths.any(|l| l != first) {
            return Err(Error::Validation(format!(
                "alignment sequences have differing lengths (expected {first})"
            )));
        }
        Ok(first)
    }

    /// Writes the fixed-width phylip format: a `count length` header, then one
    /// line per species with the name padded to 10 columns and gaps replaced
    /// by `?`.
    pub fn write_phylip(&self, path: &Path) -> Result<(), Error> {
        let length = self.sequence_length()?;
        let mut out = create_output(path)?;
        writeln!(out, "{} {}", self.entries.len(), length)?;
        for (name, seq) in self.ordered() {
            writeln!(
                out,
                "{:<width$}{}",
                name,
                seq.replace('-', "?"),
                width = PHYLIP_NAME_WIDTH
            )?;
        }
        out.flush()?;
        Ok(())
    }

    /// Writes the tagged FASTA format: `>species` headers, with mask
    /// placeholders converted back to gap characters.
    pub fn write_fasta(&self, path: &Path) -> Result<(), Error> {
        self.sequence_length()?;
        let mut out = create_output(path)?;
        for (name, seq) in self.ordered() {
            writeln!(out, ">{name}")?;
            writeln!(out, "{}", seq.replace('?', "-"))?;
        }
        out.flush()?;
        Ok(())
    }

    #[cfg(test)]
    fn from_entries(entries: &[(&str, &str)]) -> Self {
        Self {
            entries: entries
                .iter()
                .map(|(s, q)| (s.to_string(), q.to_string()))
                .collect(),
        }
    }
}

fn create_output(path: &Path) -> Result<BufWriter<fs::File>, Error> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(BufWriter::new(fs::File::create(path)?))
}
