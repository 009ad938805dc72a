//! Codaln: per-gene CDS alignment extraction from exon-wise genome alignments.

pub mod error;

pub mod alignment;
pub mod assembler;
pub mod cli;
pub mod coverage;
pub mod fasta;
pub mod gene_table;
pub mod orf;
pub mod pipeline;
pub mod species;
pub mod tree;
