//! Pipeline orchestrator: streams exon records into per-gene artifacts.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::PathBuf;

use crate::alignment::CdsAlignment;
use crate::assembler::{GeneAssembler, GeneBoundary};
use crate::cli;
use crate::coverage::CoverageTracker;
use crate::error::Error;
use crate::fasta;
use crate::gene_table::GeneTable;
use crate::species::{MIN_SPECIES, REFERENCE_SPECIES};
use crate::tree::SpeciesTree;

/// Input and output locations for one run.
#[derive(Debug, Clone)]
pub struct RunPaths {
    pub fasta_file: PathBuf,
    pub id_table_file: PathBuf,
    pub tree_file: PathBuf,
    pub aln_stat_file: PathBuf,
    pub output_dir: PathBuf,
}

/// Run totals, owned by the pipeline and returned to the caller.
///
/// Skips are counted per reason; `total_skipped` is the single aggregate the
/// run reports at the end.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub genes_emitted: usize,
    pub skipped_unresolved: usize,
    pub skipped_policy: usize,
    pub skipped_missing_leaf: usize,
}

impl RunSummary {
    #[must_use]
    pub fn total_skipped(&self) -> usize {
        self.skipped_unresolved + self.skipped_policy + self.skipped_missing_leaf
    }
}

/// Runs the whole pipeline: one pass over the exon stream, one gene at a time.
pub fn run(paths: &RunPaths) -> Result<RunSummary, Error> {
    let table_file = File::open(&paths.id_table_file)?;
    let table = GeneTable::from_reader(BufReader::new(table_file))?;

    let mut tree = SpeciesTree::from_file(&paths.tree_file)?;
    let all_species = tree.leaf_names();
    tree.unroot()?;

    fs::create_dir_all(&paths.output_dir)?;

    let fasta_file = File::open(&paths.fasta_file)?;
    let reader = fasta::open_exon_gz(fasta_file);

    let mut assembler = GeneAssembler::new();
    let mut coverage = CoverageTracker::new();
    let mut summary = RunSummary::default();

    for record in reader {
        let record = record?;
        if let Some(boundary) = assembler.feed(&record)? {
            handle_gene(&boundary, &table, &tree, paths, &mut coverage, &mut summary)?;
        }
    }
    if let Some(boundary) = assembler.finish() {
        handle_gene(&boundary, &table, &tree, paths, &mut coverage, &mut summary)?;
    }

    coverage.write_table(&paths.aln_stat_file, &all_species)?;
    Ok(summary)
}

/// Processes one completed gene: resolve, validate, apply the inclusion
/// policy, prune the tree, and write the three artifacts.
fn handle_gene(
    boundary: &GeneBoundary,
    table: &GeneTable,
    tree: &SpeciesTree,
    paths: &RunPaths,
    coverage: &mut CoverageTracker,
    summary: &mut RunSummary,
) -> Result<(), Error> {
    let Some(gene) = table.lookup(&boundary.transcript_id) else {
        summary.skipped_unresolved += 1;
        return Ok(());
    };
    eprintln!("{}", gene.gene_name);

    let alignment = CdsAlignment::from_gene_cds(&boundary.cds);

    if !gene.is_coding || !alignment.contains(REFERENCE_SPECIES) || alignment.len() < MIN_SPECIES {
        summary.skipped_policy += 1;
        return Ok(());
    }

    // Prune before writing anything so a tree failure leaves no partial gene
    let retained = alignment.species();
    let pruned = match tree.prune(&retained) {
        Ok(t) => t,
        Err(Error::MissingTreeLeaf(species)) => {
            cli::warning(&format!(
                "gene {}: retained species '{species}' is not in the tree, skipping",
                gene.gene_name
            ));
            summary.skipped_missing_leaf += 1;
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    let gene_dir = paths.output_dir.join(&gene.chrom).join(&gene.gene_name);
    alignment.write_phylip(&gene_dir.join(format!("{}.phylip", gene.gene_name)))?;
    alignment.write_fasta(&gene_dir.join(format!("{}.fa", gene.gene_name)))?;
    pruned.write(&gene_dir.join(format!("{}.nw", gene.gene_name)))?;

    if !coverage.record(&gene.gene_name, retained) {
        cli::warning(&format!(
            "duplicate gene name '{}', keeping the first occurrence in the summary table",
            gene.gene_name
        ));
    }
    summary.genes_emitted += 1;
    Ok(())
}
