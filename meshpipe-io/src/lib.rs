//! I/O operations for meshpipe meshes
//!
//! This crate provides a high-throughput Wavefront OBJ importer and
//! exporter. Import is a single-producer / multi-consumer pipeline over a
//! bounded lock-free ring: the producer cuts a memory-mapped input into
//! newline-aligned batches and tracks the running v/vt/vn line totals so
//! that workers can resolve OBJ's 1-based and negative indices in
//! parallel; assembly then merges the per-worker output in batch order,
//! which is file order.

pub mod assemble;
pub mod batch;
pub mod mmap;
pub mod numeric;
pub mod obj;
pub mod pipeline;
pub mod ring;
pub mod scan;

#[cfg(test)]
mod tests;

pub use mmap::MappedObj;
pub use obj::{import_from_bytes, ImportConfig, ObjReader, ObjWriter};
pub use ring::SpmcRing;

use meshpipe_core::{Error, Mesh, Result};
use std::path::Path;

/// Trait for reading meshes from files
pub trait MeshReader {
    fn read_mesh<P: AsRef<Path>>(path: P) -> Result<Mesh>;
}

/// Trait for writing meshes to files
pub trait MeshWriter {
    fn write_mesh<P: AsRef<Path>>(mesh: &Mesh, path: P) -> Result<()>;
}

/// Auto-detect format and read mesh
pub fn read_mesh<P: AsRef<Path>>(path: P) -> Result<Mesh> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some("obj") => ObjReader::read_mesh(path),
        other => Err(Error::UnsupportedFormat(format!(
            "Unsupported mesh format: {:?}",
            other
        ))),
    }
}

/// Auto-detect format and write mesh
pub fn write_mesh<P: AsRef<Path>>(mesh: &Mesh, path: P) -> Result<()> {
    let path = path.as_ref();
    match path.extension().and_then(|s| s.to_str()) {
        Some("obj") => ObjWriter::write_mesh(mesh, path),
        other => Err(Error::UnsupportedFormat(format!(
            "Unsupported mesh format: {:?}",
            other
        ))),
    }
}
