//! Error types for the section translation layer.
//!
//! Two classes of failure exist. Misuse of the composition (a detached
//! surface on a call that must return something, an index outside a
//! provider's allocation) is a programmer error and goes through
//! [`invalid_usage`], which panics. Everything recoverable is expressed with
//! the `thiserror` types below.

use thiserror::Error;

use crate::composition::ProviderId;
use crate::logging::targets;

/// Errors returned by the composition management API.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompositionError {
    /// The provider is not (or no longer) part of the composition.
    #[error("provider {0:?} is not part of the composition")]
    UnknownProvider(ProviderId),

    /// An insertion position past the end of the provider list.
    #[error("insertion position {position} is out of bounds for {len} providers")]
    PositionOutOfBounds { position: usize, len: usize },
}

/// Errors returned by the fallible surface accessors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SurfaceError {
    /// No rendering surface is attached downstream.
    #[error("`{operation}` requires an attached surface, but none is attached")]
    Detached { operation: &'static str },
}

/// Result type for composition operations.
pub type Result<T> = std::result::Result<T, CompositionError>;

/// Reports a programmer error and aborts the current operation.
///
/// The message names the offending operation and value so the
/// composition-setup bug can be found from the panic alone.
#[cold]
#[track_caller]
pub(crate) fn invalid_usage(operation: &str, detail: impl std::fmt::Display) -> ! {
    tracing::error!(target: targets::CORE, operation, %detail, "invalid usage");
    panic!("invalid usage of `{operation}`: {detail}");
}

/// Panics with the standard message for a detached surface.
#[cold]
#[track_caller]
pub(crate) fn detached(operation: &'static str) -> ! {
    invalid_usage(
        operation,
        "no rendering surface is attached. Attach the list or grid surface to the \
         composition before it queries its providers",
    )
}
