use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;

use codaln::cli;
use codaln::pipeline::{self, RunPaths};

#[derive(Parser)]
#[command(
    name = "codaln",
    about = "Extract per-gene CDS alignments and pruned species trees from an exon-wise genome alignment"
)]
struct Cli {
    /// Gzip-compressed exon FASTA file
    fasta_file: PathBuf,

    /// Tab-separated gene identifier lookup table
    id_table_file: PathBuf,

    /// Newick species tree file
    tree_file: PathBuf,

    /// Output path for the per-gene species coverage table (CSV)
    aln_stat_file: PathBuf,

    /// Root directory for per-gene output ({chrom}/{gene}/)
    output_dir: PathBuf,
}

fn main() -> Result<()> {
    let start = Instant::now();
    let args = Cli::parse();

    cli::banner("CDS alignment extraction");

    // ── Configuration ────────────────────────────────────
    cli::section("Configuration");
    cli::kv("Exon FASTA", &args.fasta_file.display().to_string());
    cli::kv("Gene table", &args.id_table_file.display().to_string());
    cli::kv("Species tree", &args.tree_file.display().to_string());
    cli::kv("Coverage table", &args.aln_stat_file.display().to_string());
    cli::kv("Output directory", &args.output_dir.display().to_string());
    eprintln!();

    // ── Processing ───────────────────────────────────────
    cli::section("Processing");
    let paths = RunPaths {
        fasta_file: args.fasta_file,
        id_table_file: args.id_table_file,
        tree_file: args.tree_file,
        aln_stat_file: args.aln_stat_file,
        output_dir: args.output_dir,
    };
    let summary = pipeline::run(&paths).context("pipeline failed")?;
    eprintln!();

    // ── Summary ──────────────────────────────────────────
    cli::section("Summary");
    cli::kv("Genes emitted", &summary.genes_emitted.to_string());
    cli::kv("Genes skipped", &summary.total_skipped().to_string());
    if summary.total_skipped() > 0 {
        cli::kv("  unresolved id", &summary.skipped_unresolved.to_string());
        cli::kv("  policy", &summary.skipped_policy.to_string());
        cli::kv("  missing tree leaf", &summary.skipped_missing_leaf.to_string());
    }
    cli::success(&format!(
        "{} genes emitted, {} skipped",
        summary.genes_emitted,
        summary.total_skipped()
    ));

    cli::print_summary(start);
    Ok(())
}
