//! Core error type.
//!
//! Only *structural* input problems surface as errors — a route the engine
//! cannot track at all.  Geometry decode failures are deliberately absorbed
//! (see `geometry` module) and never appear here.

use thiserror::Error;

/// Errors produced when route input is structurally unusable.
#[derive(Debug, Error)]
pub enum NavError {
    #[error("route has no legs")]
    EmptyRoute,

    #[error("leg {leg_index} has no steps")]
    EmptyLeg { leg_index: usize },

    #[error("indices (leg {leg_index}, step {step_index}) out of bounds for route")]
    IndexOutOfBounds {
        leg_index: usize,
        step_index: usize,
    },
}

/// Shorthand result type for all `nav-*` crates.
pub type NavResult<T> = Result<T, NavError>;
