//! Test modules for meshpipe-io
//!
//! Cross-module tests of the parallel import pipeline: artifact ordering,
//! prefix-count propagation, and end-to-end round trips.
