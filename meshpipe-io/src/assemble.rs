//! Batch-ordered assembly of consumer stores into a single mesh
//!
//! Batch ids reflect the producer's cutting order, which is file order, so
//! concatenating each artifact's store ranges by id reproduces the input
//! exactly regardless of how batches were distributed among consumers.

use std::sync::OnceLock;

use meshpipe_core::{Error, Mesh, Result};

use crate::batch::BatchArtifact;
use crate::pipeline::ConsumerStore;

/// Merge every artifact's ranges, in batch-id order, into one mesh.
///
/// Precondition: all workers have joined, so every artifact slot is set
/// and every store is quiescent.
pub fn assemble_mesh(
    stores: &[ConsumerStore],
    artifacts: &[OnceLock<BatchArtifact>],
) -> Result<Mesh> {
    let mut resolved = Vec::with_capacity(artifacts.len());
    for slot in artifacts {
        let artifact = slot
            .get()
            .ok_or_else(|| Error::InvalidData("batch artifact missing after join".to_string()))?;
        resolved.push(artifact);
    }

    let mut mesh = Mesh::new();
    mesh.positions
        .reserve(resolved.iter().map(|a| a.positions.len()).sum());
    mesh.texcoords
        .reserve(resolved.iter().map(|a| a.texcoords.len()).sum());
    mesh.normals
        .reserve(resolved.iter().map(|a| a.normals.len()).sum());
    mesh.face_tape
        .reserve(resolved.iter().map(|a| a.face_tape.len()).sum());
    mesh.face_arities
        .reserve(resolved.iter().map(|a| a.face_arities.len()).sum());

    for artifact in resolved {
        let store = &stores[artifact.consumer_id];
        mesh.positions
            .extend_from_slice(&store.positions[artifact.positions.begin..artifact.positions.end]);
        mesh.texcoords
            .extend_from_slice(&store.texcoords[artifact.texcoords.begin..artifact.texcoords.end]);
        mesh.normals
            .extend_from_slice(&store.normals[artifact.normals.begin..artifact.normals.end]);
        mesh.face_tape
            .extend_from_slice(&store.face_tape[artifact.face_tape.begin..artifact.face_tape.end]);
        mesh.face_arities.extend_from_slice(
            &store.face_arities[artifact.face_arities.begin..artifact.face_arities.end],
        );
    }

    Ok(mesh)
}
