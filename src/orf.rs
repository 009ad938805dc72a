//! Open-reading-frame validation for gap-containing CDS alignments.
//!
//! Two independent triplet scans run over each sequence and the sequence is
//! accepted only when both match with the same span. `scan_literal` is the
//! gap-naive pass: gaps are ordinary characters and any in-frame literal stop
//! codon before the end rejects. `scan_gap_checked` ignores stops but rejects
//! any in-frame triplet that is partially gapped (one or two `-` in the
//! triplet); fully-gapped triplets pass. A single scan cannot handle alignment
//! gaps without either accepting gapped non-stops as stops or rejecting stop
//! triplets aligned against gaps elsewhere, so disagreement between the two
//! passes rejects the species.

/// In-frame span matched by an ORF scan, in byte offsets.
///
/// `end` is exclusive and always lands on the last byte of the terminal stop
/// codon, i.e. the sequence length for an accepted sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrfSpan {
    pub start: usize,
    pub end: usize,
}

const START_CODON: &[u8] = b"ATG";

fn is_stop(triplet: &[u8]) -> bool {
    matches!(
        triplet,
        [b'T', b'A', b'A'] | [b'T', b'A', b'G'] | [b'T', b'G', b'A']
    )
}

fn gap_count(triplet: &[u8]) -> usize {
    triplet.iter().filter(|&&b| b == b'-').count()
}

/// Gap-naive scan: `ATG`, then in-frame triplets with no literal stop codon,
/// terminated by a literal stop codon at the exact end of the sequence.
#[must_use]
pub fn scan_literal(seq: &[u8]) -> Option<OrfSpan> {
    scan(seq, |triplet| !is_stop(triplet))
}

/// Gap-checked scan: `ATG`, then in-frame triplets none of which is partially
/// gapped (exactly one or two `-`), terminated by a literal stop codon at the
/// exact end of the sequence. Stops are not examined before the final triplet.
#[must_use]
pub fn scan_gap_checked(seq: &[u8]) -> Option<OrfSpan> {
    scan(seq, |triplet| !matches!(gap_count(triplet), 1 | 2))
}

fn scan(seq: &[u8], mid_triplet_ok: impl Fn(&[u8]) -> bool) -> Option<OrfSpan> {
    if seq.len() < 6 || !seq.len().is_multiple_of(3) {
        return None;
    }
    if &seq[..3] != START_CODON {
        return None;
    }
    let stop_at = seq.len() - 3;
    for pos in (3..stop_at).step_by(3) {
        if !mid_triplet_ok(&seq[pos..pos + 3]) {
            return None;
        }
    }
    if !is_stop(&seq[stop_at..]) {
        return None;
    }
    Some(OrfSpan {
        start: 0,
        end: seq.len(),
    })
}

/// Runs both scans and accepts only when they agree on the same span.
#[must_use]
pub fn validate(seq: &str) -> Option<OrfSpan> {
    let literal = scan_literal(seq.as_bytes())?;
    let gap_checked = scan_gap_checked(seq.as_bytes())?;
    if literal != gap_checked {
        return None;
    }
    Some(literal)
}

/// Masks the terminal stop codon (and anything past the matched span) with
/// `?`, preserving the original sequence length.
#[must_use]
pub fn mask_stop(seq: &str, span: OrfSpan) -> String {
    let keep = span.end - 3;
    let mut masked = String::with_capacity(seq.len());
    masked.push_str(&seq[..keep]);
    masked.extend(std::iter::repeat_n('?', seq.len() - keep));
    masked
}
