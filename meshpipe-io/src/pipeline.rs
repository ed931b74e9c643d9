//! Producer and consumer stages of the parallel import pipeline
//!
//! One producer cuts the mapped input into newline-aligned batches, keeps
//! the running v/vt/vn line totals, and publishes batch ids through the
//! SPMC ring. Each consumer drains the ring, parses its batches into a
//! thread-local store, and records per batch where that output landed. The
//! producer finishes by pushing one sentinel per consumer.

use std::collections::VecDeque;
use std::hint;
use std::sync::OnceLock;

use meshpipe_core::{FaceVertex, Point2f, Point3f, Vector3f, ABSENT_INDEX};

use crate::batch::{self, Batch, BatchArtifact, Span};
use crate::numeric::{normalize_index, parse_f32, parse_i64};
use crate::ring::SpmcRing;
use crate::scan::{self, LineKind};

/// Ring payload standing for end-of-stream; one is pushed per consumer
pub const SENTINEL: usize = usize::MAX;

/// Append-only parse output of a single consumer thread
///
/// Mirrors the mesh shape. Exactly one consumer writes a given store, and
/// nothing reads it until all workers have joined.
#[derive(Debug, Default)]
pub struct ConsumerStore {
    pub positions: Vec<Point3f>,
    pub texcoords: Vec<Point2f>,
    pub normals: Vec<Vector3f>,
    pub face_tape: Vec<FaceVertex>,
    pub face_arities: Vec<u32>,
}

impl ConsumerStore {
    fn sizes(&self) -> [usize; 5] {
        [
            self.positions.len(),
            self.texcoords.len(),
            self.normals.len(),
            self.face_tape.len(),
            self.face_arities.len(),
        ]
    }
}

/// Batch ids cut but not yet accepted by the ring
struct Backlog {
    queue: VecDeque<usize>,
    capacity: usize,
}

impl Backlog {
    fn new(capacity: usize) -> Self {
        Self {
            queue: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    fn is_full(&self) -> bool {
        self.queue.len() == self.capacity
    }

    fn len(&self) -> usize {
        self.queue.len()
    }

    fn push(&mut self, id: usize) {
        self.queue.push_back(id);
    }

    fn drain_to(&mut self, ring: &SpmcRing<usize>) {
        while let Some(&id) = self.queue.front() {
            if !ring.try_push(id) {
                break;
            }
            self.queue.pop_front();
        }
    }
}

/// Cut the input into batches, compute prefix counts, and publish ids.
///
/// Every batch descriptor is written to its slot before its id enters the
/// ring; the ring's fences make the write visible to whichever consumer
/// pops it. Ends by pushing `num_consumers` sentinels.
pub fn producer_work(
    data: &[u8],
    batch_size: usize,
    num_consumers: usize,
    ring: &SpmcRing<usize>,
    batches: &[OnceLock<Batch>],
) {
    let mut backlog = Backlog::new((ring.capacity() * 4).max(64));
    let mut offset = 0;
    let mut batch_id = 0;
    let mut v_seen = 0;
    let mut t_seen = 0;
    let mut n_seen = 0;

    while offset < data.len() || !backlog.is_empty() {
        backlog.drain_to(ring);

        while offset < data.len() && !backlog.is_full() {
            let span = batch::next_span(data, &mut offset, batch_size);
            let (v, t, n) = batch::count_line_kinds(&data[span.begin..span.end]);

            // Slot ids are dense and assigned once; set cannot collide.
            let _ = batches[batch_id].set(Batch {
                span,
                id: batch_id,
                v_seen,
                t_seen,
                n_seen,
            });
            v_seen += v;
            t_seen += t;
            n_seen += n;

            backlog.push(batch_id);
            batch_id += 1;

            if backlog.len() >= 8 {
                backlog.drain_to(ring);
            }
        }

        if backlog.is_full() {
            hint::spin_loop();
        }
    }

    for _ in 0..num_consumers {
        while !ring.try_push(SENTINEL) {
            hint::spin_loop();
        }
    }
}

/// Drain the ring until a sentinel arrives, parsing each batch into the
/// local store and recording where its output landed.
pub fn consumer_work(
    data: &[u8],
    consumer_id: usize,
    ring: &SpmcRing<usize>,
    batches: &[OnceLock<Batch>],
    artifacts: &[OnceLock<BatchArtifact>],
    store: &mut ConsumerStore,
) {
    loop {
        let id = match ring.try_pop() {
            Some(id) => id,
            None => {
                hint::spin_loop();
                continue;
            }
        };
        if id == SENTINEL {
            break;
        }
        let Some(batch) = batches[id].get() else {
            // Descriptors are published before their ids; an empty slot
            // here cannot happen with an intact ring.
            continue;
        };

        let before = store.sizes();
        parse_span(
            &data[batch.span.begin..batch.span.end],
            (batch.v_seen, batch.t_seen, batch.n_seen),
            store,
        );
        let after = store.sizes();

        let _ = artifacts[id].set(BatchArtifact {
            consumer_id,
            positions: Span { begin: before[0], end: after[0] },
            texcoords: Span { begin: before[1], end: after[1] },
            normals: Span { begin: before[2], end: after[2] },
            face_tape: Span { begin: before[3], end: after[3] },
            face_arities: Span { begin: before[4], end: after[4] },
        });
    }
}

/// Parse every line of a span into `store`.
///
/// `bases` are the v/vt/vn totals at the start of the span; the local
/// counters advance past them as entity lines appear, so negative face
/// indices resolve against everything seen so far in the file, including
/// earlier lines of this same span.
pub(crate) fn parse_span(span: &[u8], bases: (usize, usize, usize), store: &mut ConsumerStore) {
    let (mut v_seen, mut t_seen, mut n_seen) = bases;

    for line in scan::lines(span) {
        let (kind, payload) = scan::split_directive(line);
        match kind {
            LineKind::Position => {
                let mut xyz = [0.0f32; 3];
                for (i, token) in scan::tokens(payload).take(3).enumerate() {
                    xyz[i] = parse_f32(token);
                }
                store.positions.push(Point3f::new(xyz[0], xyz[1], xyz[2]));
                v_seen += 1;
            }
            LineKind::Texture => {
                // Third component is legal in the source and ignored here.
                let mut uv = [0.0f32; 2];
                for (i, token) in scan::tokens(payload).take(2).enumerate() {
                    uv[i] = parse_f32(token);
                }
                store.texcoords.push(Point2f::new(uv[0], uv[1]));
                t_seen += 1;
            }
            LineKind::Normal => {
                let mut xyz = [0.0f32; 3];
                for (i, token) in scan::tokens(payload).take(3).enumerate() {
                    xyz[i] = parse_f32(token);
                }
                store.normals.push(Vector3f::new(xyz[0], xyz[1], xyz[2]));
                n_seen += 1;
            }
            LineKind::Face => {
                let mut arity = 0u32;
                for token in scan::tokens(payload) {
                    store
                        .face_tape
                        .push(parse_face_vertex(token, v_seen, t_seen, n_seen));
                    arity += 1;
                }
                if arity > 0 {
                    store.face_arities.push(arity);
                }
            }
            LineKind::Ignored => {}
        }
    }
}

/// Split a face token on at most two slashes and resolve each slot
fn parse_face_vertex(token: &[u8], v_seen: usize, t_seen: usize, n_seen: usize) -> FaceVertex {
    let mut parts = token.splitn(3, |&b| b == b'/');
    let position = parts.next().unwrap_or(&[]);
    let texture = parts.next();
    let normal = parts.next();

    FaceVertex {
        position: resolve_slot(position, v_seen),
        texture: texture.map_or(ABSENT_INDEX, |t| resolve_slot(t, t_seen)),
        normal: normal.map_or(ABSENT_INDEX, |n| resolve_slot(n, n_seen)),
    }
}

fn resolve_slot(token: &[u8], seen: usize) -> u32 {
    if token.is_empty() {
        return ABSENT_INDEX;
    }
    match parse_i64(token) {
        Some(raw) => normalize_index(raw, seen),
        None => ABSENT_INDEX,
    }
}
