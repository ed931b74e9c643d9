//! # meshpipe
//!
//! A parallel importer and exporter for the Wavefront OBJ text format.
//!
//! This is the umbrella crate that provides convenient access to all
//! meshpipe functionality. You can use this crate to get everything in one
//! place, or use the individual crates for more granular control over
//! dependencies.
//!
//! ## Features
//!
//! - **Core**: Mesh data structures (positions, texture coordinates,
//!   normals, and a flat face tape preserving arbitrary face arity)
//! - **I/O**: Memory-mapped, multi-threaded OBJ import and canonical OBJ
//!   export
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use meshpipe::prelude::*;
//!
//! # fn main() -> meshpipe::Result<()> {
//! let mesh = read_mesh("model.obj")?;
//! println!("{} positions, {} faces", mesh.position_count(), mesh.face_count());
//! write_mesh(&mesh, "roundtrip.obj")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `default`: Enables io
//! - `io`: OBJ file import/export

// Re-export core functionality
pub use meshpipe_core::*;

#[cfg(feature = "io")]
pub use meshpipe_io as io;

/// Convenient imports for common use cases
pub mod prelude {
    pub use meshpipe_core::*;

    #[cfg(feature = "io")]
    pub use meshpipe_io::*;
}
