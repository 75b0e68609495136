//! Tracing targets used by this crate.
//!
//! The crate logs through `tracing` and never installs a subscriber. To see
//! forwarded calls, install one in the host application and filter on the
//! targets below, e.g. `RUST_LOG=lattice_sections::facade=trace`.

/// Target names for log filtering.
pub mod targets {
    /// Crate-wide target, used for programmer-error reports.
    pub const CORE: &str = "lattice_sections";
    /// Call forwarding through a delegated surface.
    pub const FACADE: &str = "lattice_sections::facade";
    /// Provider topology changes.
    pub const COMPOSITION: &str = "lattice_sections::composition";
    /// Coordinate translation.
    pub const MAPPING: &str = "lattice_sections::mapping";
}
