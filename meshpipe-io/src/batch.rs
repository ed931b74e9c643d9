//! Batch descriptors and newline-aligned span cutting
//!
//! The producer partitions the mapped input into spans of approximately
//! `batch_size` bytes, each extended to end just past a newline (or at
//! EOF). Batch ids are dense and assigned in cutting order, which is file
//! order; walking artifacts by id therefore reproduces the input exactly.

use crate::scan::{self, LineKind};

/// Half-open range, used both for byte spans of the input and for ranges
/// into a consumer store sequence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Span {
    pub begin: usize,
    pub end: usize,
}

impl Span {
    /// Length of the range
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    /// Check whether the range is empty
    pub fn is_empty(&self) -> bool {
        self.end == self.begin
    }
}

/// Descriptor of one newline-aligned slice of the input
///
/// The prefix counts are the v/vt/vn line totals observed strictly before
/// this span; consumers use them as the base for resolving 1-based and
/// negative face indices without any cross-thread coordination.
#[derive(Debug, Clone, Copy)]
pub struct Batch {
    pub span: Span,
    pub id: usize,
    pub v_seen: usize,
    pub t_seen: usize,
    pub n_seen: usize,
}

/// Where one batch's parse output landed in its consumer's store
///
/// Written exactly once by the owning consumer and read only after all
/// workers have joined.
#[derive(Debug, Clone, Copy, Default)]
pub struct BatchArtifact {
    pub consumer_id: usize,
    pub positions: Span,
    pub texcoords: Span,
    pub normals: Span,
    pub face_tape: Span,
    pub face_arities: Span,
}

/// Cut the next span starting at `*offset` and advance the offset.
///
/// The span runs to `offset + batch_size`, extended to the byte after the
/// next `'\n'`, or to EOF if no newline follows.
pub fn next_span(data: &[u8], offset: &mut usize, batch_size: usize) -> Span {
    let begin = *offset;
    let mut end = (begin + batch_size).min(data.len());

    if end < data.len() {
        end = match data[end..].iter().position(|&b| b == b'\n') {
            Some(i) => end + i + 1,
            None => data.len(),
        };
    }

    *offset = end;
    Span { begin, end }
}

/// Number of spans [`next_span`] produces over `data`
///
/// One linear scan, used to size the batch and artifact arrays before any
/// worker starts.
pub fn count_batches(data: &[u8], batch_size: usize) -> usize {
    let mut offset = 0;
    let mut count = 0;
    while offset < data.len() {
        next_span(data, &mut offset, batch_size);
        count += 1;
    }
    count
}

/// Count the v/vt/vn lines of a span for the producer's prefix totals.
///
/// Only the line kind is inspected; no tokens are produced and no numbers
/// are parsed. This is the sequential part of the pipeline and has to stay
/// linear and branch-light.
pub fn count_line_kinds(span: &[u8]) -> (usize, usize, usize) {
    let (mut v, mut t, mut n) = (0, 0, 0);
    for line in scan::lines(span) {
        match scan::classify(line) {
            LineKind::Position => v += 1,
            LineKind::Texture => t += 1,
            LineKind::Normal => n += 1,
            LineKind::Face | LineKind::Ignored => {}
        }
    }
    (v, t, n)
}
