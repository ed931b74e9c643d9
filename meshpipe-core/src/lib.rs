//! Core data structures and error types for meshpipe
//!
//! This crate provides the fundamental types for polygonal mesh storage,
//! including point aliases, the flat face-tape mesh representation, and the
//! shared error type used across the workspace.

pub mod error;
pub mod mesh;
pub mod point;

pub use error::*;
pub use mesh::*;
pub use point::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point2, Point3, Vector3};
