//! OBJ import and export built on the parallel batch pipeline
//!
//! Import maps the file, sizes the batch and artifact arrays with one
//! span-stepping scan, then runs one producer and `num_consumers` workers
//! to completion under a thread scope before assembling the mesh in
//! batch-id order. Inputs that fit in a single batch skip the threads and
//! parse inline. Export writes the canonical section order (`v`, `vt`,
//! `vn`, `f`) with shortest round-trip floats and minimal slash forms.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::OnceLock;
use std::thread;

use meshpipe_core::{Error, FaceVertex, Mesh, Result};
use tracing::{debug, info};

use crate::assemble::assemble_mesh;
use crate::batch::{self, Batch, BatchArtifact};
use crate::mmap::MappedObj;
use crate::pipeline::{self, ConsumerStore};
use crate::ring::SpmcRing;
use crate::{MeshReader, MeshWriter};

/// Export buffer size; matches the import batch scale
const WRITE_BUFFER_SIZE: usize = 1 << 20;

/// Tuning knobs for the parallel importer
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Approximate bytes per batch, before extension to the next newline
    pub batch_size: usize,
    /// Worker thread count draining the ring
    pub num_consumers: usize,
    /// Ring slots; rounded up to a power of two
    pub queue_capacity: usize,
}

impl Default for ImportConfig {
    fn default() -> Self {
        let cores = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let num_consumers = cores.saturating_sub(4).max(2);
        Self {
            batch_size: 256 * 1024,
            num_consumers,
            queue_capacity: 4 * num_consumers,
        }
    }
}

impl ImportConfig {
    /// Create a configuration with defaults derived from the host
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the approximate batch size in bytes
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    /// Set the number of consumer threads
    pub fn with_num_consumers(mut self, num_consumers: usize) -> Self {
        self.num_consumers = num_consumers.max(1);
        self
    }

    /// Set the ring capacity (rounded up to a power of two)
    pub fn with_queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = queue_capacity.max(2);
        self
    }
}

/// Reader for Wavefront OBJ files
pub struct ObjReader;

/// Writer for Wavefront OBJ files
pub struct ObjWriter;

impl MeshReader for ObjReader {
    fn read_mesh<P: AsRef<Path>>(path: P) -> Result<Mesh> {
        Self::read_mesh_with(path, &ImportConfig::default())
    }
}

impl ObjReader {
    /// Import with explicit pipeline tuning
    pub fn read_mesh_with<P: AsRef<Path>>(path: P, config: &ImportConfig) -> Result<Mesh> {
        let path = path.as_ref();
        let mapped = MappedObj::open(path)?;
        debug!(
            file = %path.display(),
            bytes = mapped.len(),
            "mapped OBJ input"
        );
        let mesh = import_from_bytes(mapped.as_bytes(), config)?;
        info!(
            file = %path.display(),
            positions = mesh.position_count(),
            texcoords = mesh.texcoord_count(),
            normals = mesh.normal_count(),
            faces = mesh.face_count(),
            "imported OBJ mesh"
        );
        Ok(mesh)
    }
}

/// Parse a complete OBJ byte buffer into a mesh
pub fn import_from_bytes(data: &[u8], config: &ImportConfig) -> Result<Mesh> {
    if data.is_empty() {
        return Err(Error::EmptyInput("zero-length buffer".to_string()));
    }

    // One batch means no parallelism to win; parse on this thread.
    if data.len() <= config.batch_size || config.num_consumers == 0 {
        return Ok(import_sequential(data));
    }

    let num_batches = batch::count_batches(data, config.batch_size);
    let num_consumers = config.num_consumers;

    let ring = SpmcRing::with_capacity(config.queue_capacity);
    let batches: Vec<OnceLock<Batch>> = (0..num_batches).map(|_| OnceLock::new()).collect();
    let artifacts: Vec<OnceLock<BatchArtifact>> =
        (0..num_batches).map(|_| OnceLock::new()).collect();
    let mut stores: Vec<ConsumerStore> = (0..num_consumers)
        .map(|_| ConsumerStore::default())
        .collect();

    debug!(
        num_batches,
        num_consumers,
        ring_capacity = ring.capacity(),
        batch_size = config.batch_size,
        "starting parallel import"
    );

    thread::scope(|scope| {
        for (consumer_id, store) in stores.iter_mut().enumerate() {
            let ring = &ring;
            let batches = batches.as_slice();
            let artifacts = artifacts.as_slice();
            scope.spawn(move || {
                pipeline::consumer_work(data, consumer_id, ring, batches, artifacts, store);
            });
        }
        pipeline::producer_work(data, config.batch_size, num_consumers, &ring, &batches);
    });

    assemble_mesh(&stores, &artifacts)
}

fn import_sequential(data: &[u8]) -> Mesh {
    let mut store = ConsumerStore::default();
    pipeline::parse_span(data, (0, 0, 0), &mut store);
    Mesh {
        positions: store.positions,
        texcoords: store.texcoords,
        normals: store.normals,
        face_tape: store.face_tape,
        face_arities: store.face_arities,
    }
}

impl MeshWriter for ObjWriter {
    fn write_mesh<P: AsRef<Path>>(mesh: &Mesh, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path)?;
        let mut out = BufWriter::with_capacity(WRITE_BUFFER_SIZE, file);

        for p in &mesh.positions {
            writeln!(out, "v {} {} {}", p.x, p.y, p.z)?;
        }
        for t in &mesh.texcoords {
            writeln!(out, "vt {} {}", t.x, t.y)?;
        }
        for n in &mesh.normals {
            writeln!(out, "vn {} {} {}", n.x, n.y, n.z)?;
        }
        for face in mesh.faces() {
            out.write_all(b"f")?;
            for corner in face {
                write_face_vertex(&mut out, corner)?;
            }
            out.write_all(b"\n")?;
        }

        out.flush()?;
        debug!(
            file = %path.display(),
            positions = mesh.position_count(),
            faces = mesh.face_count(),
            "exported OBJ mesh"
        );
        Ok(())
    }
}

/// Emit one face corner in the minimal slash form, 1-based
fn write_face_vertex<W: Write>(out: &mut W, corner: &FaceVertex) -> std::io::Result<()> {
    // An invalid position index from the source round-trips as the equally
    // invalid index 0.
    let position = corner.position().map_or(0, |p| u64::from(p) + 1);
    match (corner.texture(), corner.normal()) {
        (None, None) => write!(out, " {}", position),
        (Some(t), None) => write!(out, " {}/{}", position, u64::from(t) + 1),
        (None, Some(n)) => write!(out, " {}//{}", position, u64::from(n) + 1),
        (Some(t), Some(n)) => write!(
            out,
            " {}/{}/{}",
            position,
            u64::from(t) + 1,
            u64::from(n) + 1
        ),
    }
}
