//! Streaming parser for gzip-compressed exon FASTA files.

use std::io::{BufRead, BufReader, Lines, Read};

use flate2::read::GzDecoder;

use crate::error::Error;

/// One exon of one species's CDS, as stored in the source alignment.
///
/// Header format: `>transcript_assembly_exonIndex_exonTotal` (exactly four
/// underscore-delimited fields). The exon index and total are carried for
/// diagnostics only; concatenation order is stream-arrival order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExonRecord {
    pub transcript_id: String,
    pub assembly: String,
    pub exon_index: u32,
    pub exon_total: u32,
    pub sequence: String,
}

/// Streams exon records one at a time from a FASTA source.
///
/// Sequence bases are uppercased; gap characters (`-`) pass through unchanged.
pub struct ExonReader<R: BufRead> {
    lines: Lines<R>,
    pending_header: Option<String>,
    done: bool,
}

/// Opens a gzip-compressed exon FASTA stream.
pub fn open_exon_gz<R: Read>(reader: R) -> ExonReader<BufReader<GzDecoder<R>>> {
    let decoder = GzDecoder::new(reader);
    ExonReader::new(BufReader::new(decoder))
}

impl<R: BufRead> ExonReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            pending_header: None,
            done: false,
        }
    }

    fn read_record(&mut self) -> Result<Option<ExonRecord>, Error> {
        // Find the header for the next record
        let header = loop {
            if let Some(h) = self.pending_header.take() {
                break h;
            }
            match self.lines.next() {
                Some(line) => {
                    let line = line?;
                    if line.starts_with('>') {
                        break line;
                    }
                    // Sequence data before any header is ignored
                }
                None => return Ok(None),
            }
        };

        let mut sequence = String::new();
        loop {
            match self.lines.next() {
                Some(line) => {
                    let line = line?;
                    if line.starts_with('>') {
                        self.pending_header = Some(line);
                        break;
                    }
                    let start = sequence.len();
                    sequence.push_str(line.trim());
                    // Uppercase in place; `-` and ambiguity codes are unaffected
                    sequence[start..].make_ascii_uppercase();
                }
                None => break,
            }
        }

        Ok(Some(parse_exon_header(&header, sequence)?))
    }
}

impl<R: BufRead> Iterator for ExonReader<R> {
    type Item = Result<ExonRecord, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) => None,
            Err(e) => {
                // A malformed stream cannot be parsed further
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

fn parse_exon_header(header: &str, sequence: String) -> Result<ExonRecord, Error> {
    let name = header
        .trim_start_matches('>')
        .split_whitespace()
        .next()
        .unwrap_or("");
    let fields: Vec<&str> = name.split('_').collect();
    if fields.len() != 4 {
        return Err(Error::Parse(format!(
            "exon header has {} underscore-delimited fields, expected 4: >{name}",
            fields.len()
        )));
    }

    let exon_index: u32 = fields[2]
        .parse()
        .map_err(|e| Error::Parse(format!("invalid exon index '{}': {e}", fields[2])))?;
    let exon_total: u32 = fields[3]
        .parse()
        .map_err(|e| Error::Parse(format!("invalid exon total '{}': {e}", fields[3])))?;

    Ok(ExonRecord {
        transcript_id: fields[0].to_string(),
        assembly: fields[1].to_string(),
        exon_index,
        exon_total,
        sequence,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    fn make_gz(content: &[u8]) -> Vec<u8> {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::fast());
        encoder.write_all(content).unwrap();
        encoder.finish().unwrap()
    }

    fn read_all(fasta: &[u8]) -> Vec<ExonRecord> {
        let gz = make_gz(fasta);
        open_exon_gz(std::io::Cursor::new(gz))
            .collect::<Result<Vec<_>, _>>()
            .unwrap()
    }

    #[test]
    fn parse_single_exon() {
        let records = read_all(b">uc001abc.1_hg38_1_2\nATGaaa\n");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].transcript_id, "uc001abc.1");
        assert_eq!(records[0].assembly, "hg38");
        assert_eq!(records[0].exon_index, 1);
        assert_eq!(records[0].exon_total, 2);
        assert_eq!(records[0].sequence, "ATGAAA");
    }

    #[test]
    fn parse_multiple_exons_including_last() {
        let records = read_all(
            b">uc001abc.1_hg38_1_2\nATG\nAAA\n>uc001abc.1_mm10_1_2\natg---\n>uc001abc.1_mm10_2_2\nTAA\n",
        );
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].sequence, "ATGAAA");
        assert_eq!(records[1].sequence, "ATG---");
        // Final record must not be dropped at end of stream
        assert_eq!(records[2].sequence, "TAA");
        assert_eq!(records[2].exon_index, 2);
    }

    #[test]
    fn uppercases_and_keeps_gaps() {
        let records = read_all(b">t.1_hg38_1_1\nac-gTn\n");
        assert_eq!(records[0].sequence, "AC-GTN");
    }

    #[test]
    fn malformed_header_is_fatal() {
        let gz = make_gz(b">uc001abc.1_hg38_1\nATG\n");
        let mut reader = open_exon_gz(std::io::Cursor::new(gz));
        assert!(reader.next().unwrap().is_err());
        // The iterator stops after a parse error
        assert!(reader.next().is_none());
    }

    #[test]
    fn non_numeric_exon_index_is_fatal() {
        let gz = make_gz(b">uc001abc.1_hg38_one_2\nATG\n");
        let mut reader = open_exon_gz(std::io::Cursor::new(gz));
        assert!(reader.next().unwrap().is_err());
    }
}
