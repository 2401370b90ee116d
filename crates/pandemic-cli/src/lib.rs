//! Library side of the `pandemic-prep` binary.

pub mod logging;
pub mod pipeline;
