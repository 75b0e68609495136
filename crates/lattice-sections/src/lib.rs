//! Section index-space translation for composed list and grid views.
//!
//! Several independent data providers can share one sectioned list or grid
//! surface while each keeps addressing its sections from zero. This crate
//! keeps the mapping between each provider's local `(section, item)`
//! coordinates and the surface's global coordinates, and forwards every
//! mutation and query through it.
//!
//! # Core Types
//!
//! - [`ItemAddress`]: a `(section, item)` pair in some coordinate space
//! - [`CollectionSurface`]: the capability set of the real list or grid view
//! - [`SectionMapping`]: local/global conversion plus the downstream surface
//! - [`DelegatedSurface`]: a `CollectionSurface` in one provider's coordinates
//! - [`SectionComposition`]: providers concatenated into one section space
//!
//! # Architecture Overview
//!
//! ```text
//! ┌────────────┐ local  ┌──────────────────┐ global ┌───────────────────┐
//! │  Provider  │───────>│ DelegatedSurface │───────>│ CollectionSurface │
//! │            │<───────│  (SectionMapping)│<───────│   (list / grid)   │
//! └────────────┘ local  └──────────────────┘ global └───────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use lattice_sections::{CollectionSurface, ItemAddress, RowAnimation, SectionComposition};
//!
//! let composition = SectionComposition::new();
//! let favorites = composition.add_provider(1);
//! let contacts = composition.add_provider(26);
//!
//! let table = Arc::new(MyTable::new());
//! composition.attach_surface(&table);
//!
//! // The contacts provider inserts into its own section 0 ...
//! let contacts_view = composition.facade(contacts)?;
//! contacts_view.insert_items(&[ItemAddress::new(0, 0)], RowAnimation::Fade);
//! // ... which the table receives as section 1.
//! ```

mod address;
mod composition;
mod error;
mod facade;
pub mod logging;
mod mapping;
mod surface;

#[cfg(test)]
mod test_support;

pub use address::{ItemAddress, Point, SectionSet};
pub use composition::{CompositeMapping, ProviderId, SectionComposition};
pub use error::{CompositionError, Result, SurfaceError};
pub use facade::DelegatedSurface;
pub use mapping::{OffsetMapping, SectionMapping};
pub use surface::{
    BatchCompletion, BatchUpdate, CollectionSurface, RowAnimation, ScrollPosition, SurfaceHandle,
};

static_assertions::assert_impl_all!(ItemAddress: Send, Sync, Copy);
static_assertions::assert_impl_all!(ProviderId: Send, Sync, Copy);
static_assertions::assert_impl_all!(CompositionError: Send, Sync, std::error::Error);
static_assertions::assert_impl_all!(SurfaceError: Send, Sync, std::error::Error);
