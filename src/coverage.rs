//! Per-gene species coverage accumulator and summary-table writer.

use std::collections::HashSet;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Error;

/// Records which species were retained for every emitted gene, in emission
/// order, for the final presence/absence summary table.
#[derive(Debug, Default)]
pub struct CoverageTracker {
    genes: Vec<(String, HashSet<String>)>,
    seen: HashSet<String>,
}

impl CoverageTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the retained species for an emitted gene.
    ///
    /// Returns false when the gene name was already recorded; the first entry
    /// wins and the duplicate is ignored.
    pub fn record(&mut self, gene_name: &str, species: Vec<String>) -> bool {
        if !self.seen.insert(gene_name.to_string()) {
            return false;
        }
        self.genes
            .push((gene_name.to_string(), species.into_iter().collect()));
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Writes the summary table as CSV: one row per emitted gene, one boolean
    /// column per species in the source tree (tree leaf order).
    pub fn write_table(&self, path: &Path, all_species: &[String]) -> Result<(), Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut out = BufWriter::new(fs::File::create(path)?);

        write!(out, "gene")?;
        for species in all_species {
            write!(out, ",{species}")?;
        }
        writeln!(out)?;

        for (gene, retained) in &self.genes {
            write!(out, "{gene}")?;
            for species in all_species {
                write!(out, ",{}", retained.contains(species))?;
            }
            writeln!(out)?;
        }
        out.flush()?;
        Ok(())
    }
}
