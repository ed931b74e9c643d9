//! Polygonal mesh storage built around a flat face tape
//!
//! Faces of arbitrary arity are stored as one contiguous tape of
//! [`FaceVertex`] entries plus a parallel arity table, so no per-face heap
//! allocation is needed and face arity survives round-trips.

use crate::point::{Point2f, Point3f, Vector3f};
use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// Distinguished index marking an omitted texture or normal slot
pub const ABSENT_INDEX: u32 = u32::MAX;

/// One corner of a polygonal face: indices into the mesh attribute arrays
///
/// Indices are 0-based and absolute. A slot holding [`ABSENT_INDEX`] was
/// omitted in the source and stays omitted on export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(C)]
pub struct FaceVertex {
    pub position: u32,
    pub texture: u32,
    pub normal: u32,
}

unsafe impl Pod for FaceVertex {}
unsafe impl Zeroable for FaceVertex {}

impl FaceVertex {
    /// Create a face vertex from raw index slots
    pub fn new(position: u32, texture: u32, normal: u32) -> Self {
        Self {
            position,
            texture,
            normal,
        }
    }

    /// A face vertex referencing only a position
    pub fn position_only(position: u32) -> Self {
        Self::new(position, ABSENT_INDEX, ABSENT_INDEX)
    }

    /// The position index, unless the source gave an invalid one
    pub fn position(&self) -> Option<u32> {
        (self.position != ABSENT_INDEX).then_some(self.position)
    }

    /// The texture coordinate index, if one was present in the source
    pub fn texture(&self) -> Option<u32> {
        (self.texture != ABSENT_INDEX).then_some(self.texture)
    }

    /// The normal index, if one was present in the source
    pub fn normal(&self) -> Option<u32> {
        (self.normal != ABSENT_INDEX).then_some(self.normal)
    }
}

/// A polygonal mesh with positions, texture coordinates, and normals
///
/// Faces reference the attribute arrays through the face tape; the arity
/// table slices the tape into individual faces.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Mesh {
    pub positions: Vec<Point3f>,
    pub texcoords: Vec<Point2f>,
    pub normals: Vec<Vector3f>,
    pub face_tape: Vec<FaceVertex>,
    pub face_arities: Vec<u32>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of vertex positions
    pub fn position_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of texture coordinates
    pub fn texcoord_count(&self) -> usize {
        self.texcoords.len()
    }

    /// Get the number of normals
    pub fn normal_count(&self) -> usize {
        self.normals.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.face_arities.len()
    }

    /// Check if the mesh has no geometry at all
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty() && self.face_arities.is_empty()
    }

    /// Append a face from a slice of corners; empty slices are ignored
    pub fn push_face(&mut self, corners: &[FaceVertex]) {
        if corners.is_empty() {
            return;
        }
        self.face_tape.extend_from_slice(corners);
        self.face_arities.push(corners.len() as u32);
    }

    /// Iterate over faces as slices of the face tape
    pub fn faces(&self) -> Faces<'_> {
        Faces {
            tape: &self.face_tape,
            arities: self.face_arities.iter(),
            offset: 0,
        }
    }

    /// Clear the mesh
    pub fn clear(&mut self) {
        self.positions.clear();
        self.texcoords.clear();
        self.normals.clear();
        self.face_tape.clear();
        self.face_arities.clear();
    }
}

/// Iterator over the faces of a [`Mesh`]
pub struct Faces<'a> {
    tape: &'a [FaceVertex],
    arities: std::slice::Iter<'a, u32>,
    offset: usize,
}

impl<'a> Iterator for Faces<'a> {
    type Item = &'a [FaceVertex];

    fn next(&mut self) -> Option<Self::Item> {
        let arity = *self.arities.next()? as usize;
        let begin = self.offset;
        self.offset += arity;
        self.tape.get(begin..self.offset)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.arities.size_hint()
    }
}
