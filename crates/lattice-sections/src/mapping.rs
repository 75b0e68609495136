//! Local/global coordinate mapping.
//!
//! A [`SectionMapping`] converts between a provider's local section and item
//! coordinates and the global coordinates of the composed surface. It also
//! names the surface calls should be forwarded to.
//!
//! Implementors provide four primitive conversions. The bulk conversions are
//! default methods built from those primitives and should not be overridden.
//!
//! # Example
//!
//! ```ignore
//! use lattice_sections::{ItemAddress, OffsetMapping, SectionMapping};
//!
//! // A provider whose section 0 is the surface's section 3.
//! let mapping = OffsetMapping::<MySurface>::new(3);
//! assert_eq!(mapping.global_section(0), 3);
//! assert_eq!(mapping.local_address(ItemAddress::new(4, 2)), ItemAddress::new(1, 2));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::address::{ItemAddress, SectionSet};
use crate::error::invalid_usage;
use crate::logging::targets;
use crate::surface::{CollectionSurface, SurfaceHandle};

/// Converts between a provider's local coordinates and global coordinates.
///
/// For every section `s` the provider currently owns,
/// `local_section(global_section(s)) == s`, and the same holds for item
/// addresses. Passing an index outside the provider's allocation is a
/// precondition violation; implementations should panic rather than guess.
pub trait SectionMapping {
    /// The surface calls are forwarded to.
    type Surface: CollectionSurface + ?Sized;

    /// Converts a global section to this provider's local section.
    fn local_section(&self, global_section: usize) -> usize;

    /// Converts a local section to the global section.
    fn global_section(&self, local_section: usize) -> usize;

    /// Converts a global item address to a local one.
    fn local_address(&self, global_address: ItemAddress) -> ItemAddress;

    /// Converts a local item address to a global one.
    fn global_address(&self, local_address: ItemAddress) -> ItemAddress;

    /// Returns the downstream surface, if one is attached.
    fn surface(&self) -> Option<Arc<Self::Surface>>;

    /// Returns `true` if `global_section` currently belongs to this provider.
    ///
    /// The default claims every section. Mappings that know their allocation
    /// override it so that queries returning other providers' items can be
    /// filtered instead of tripping the precondition check.
    fn owns_global_section(&self, _global_section: usize) -> bool {
        true
    }

    /// Converts a global address if this provider owns its section.
    fn try_local_address(&self, global_address: ItemAddress) -> Option<ItemAddress> {
        self.owns_global_section(global_address.section)
            .then(|| self.local_address(global_address))
    }

    // -------------------------------------------------------------------------
    // Bulk conversions
    // -------------------------------------------------------------------------

    /// Converts global addresses to local ones, keeping their order.
    fn local_addresses(&self, global_addresses: &[ItemAddress]) -> Vec<ItemAddress> {
        global_addresses
            .iter()
            .map(|&address| self.local_address(address))
            .collect()
    }

    /// Converts local addresses to global ones, keeping their order.
    fn global_addresses(&self, local_addresses: &[ItemAddress]) -> Vec<ItemAddress> {
        local_addresses
            .iter()
            .map(|&address| self.global_address(address))
            .collect()
    }

    /// Converts a set of local sections to the set of global sections.
    fn global_sections(&self, local_sections: &SectionSet) -> SectionSet {
        local_sections
            .iter()
            .map(|&section| self.global_section(section))
            .collect()
    }

    /// Converts a set of global sections to the set of local sections.
    fn local_sections(&self, global_sections: &SectionSet) -> SectionSet {
        global_sections
            .iter()
            .map(|&section| self.local_section(section))
            .collect()
    }
}

/// A mapping that shifts every section by a fixed offset.
///
/// `global = local + offset`. Item indices are unchanged. The offset may be
/// negative, which is useful when the "global" side is itself a slice of a
/// larger space. If a section count is set, sections outside
/// `0..section_count` (locally) are rejected.
pub struct OffsetMapping<S: CollectionSurface + ?Sized> {
    offset: isize,
    section_count: Option<usize>,
    surface: Arc<SurfaceHandle<S>>,
}

impl<S: CollectionSurface + ?Sized> OffsetMapping<S> {
    /// Creates a detached mapping with the given section offset.
    pub fn new(offset: isize) -> Self {
        Self {
            offset,
            section_count: None,
            surface: Arc::new(SurfaceHandle::new()),
        }
    }

    /// Bounds the mapping to `section_count` local sections.
    pub fn with_section_count(mut self, section_count: usize) -> Self {
        self.section_count = Some(section_count);
        self
    }

    /// Forwards to the surface behind `handle`.
    ///
    /// The handle is shared, so attaching or detaching it elsewhere is seen
    /// by this mapping.
    pub fn with_surface_handle(mut self, handle: Arc<SurfaceHandle<S>>) -> Self {
        self.surface = handle;
        self
    }

    /// Forwards to `surface`.
    pub fn with_surface(self, surface: &Arc<S>) -> Self {
        self.surface.attach(surface);
        self
    }

    /// Returns the section offset.
    pub fn offset(&self) -> isize {
        self.offset
    }

    /// Changes the section offset.
    pub fn set_offset(&mut self, offset: isize) {
        tracing::debug!(target: targets::MAPPING, from = self.offset, to = offset, "offset changed");
        self.offset = offset;
    }

    /// Returns the local section bound, if any.
    pub fn section_count(&self) -> Option<usize> {
        self.section_count
    }

    /// Returns the shared surface handle.
    pub fn surface_handle(&self) -> &Arc<SurfaceHandle<S>> {
        &self.surface
    }

    fn check_local(&self, operation: &str, local_section: usize) {
        if let Some(count) = self.section_count
            && local_section >= count
        {
            invalid_usage(
                operation,
                format_args!("local section {local_section} is outside 0..{count}"),
            );
        }
    }

    /// `global - offset`, or `None` if it leaves `usize`.
    fn to_local(&self, global_section: usize) -> Option<usize> {
        if self.offset >= 0 {
            global_section.checked_sub(self.offset.unsigned_abs())
        } else {
            global_section.checked_add(self.offset.unsigned_abs())
        }
    }

    /// `local + offset`, or `None` if it leaves `usize`.
    fn to_global(&self, local_section: usize) -> Option<usize> {
        local_section.checked_add_signed(self.offset)
    }
}

impl<S: CollectionSurface + ?Sized> SectionMapping for OffsetMapping<S> {
    type Surface = S;

    fn local_section(&self, global_section: usize) -> usize {
        let Some(local) = self.to_local(global_section) else {
            if self.offset >= 0 {
                invalid_usage(
                    "local_section",
                    format_args!(
                        "global section {global_section} precedes the provider's first section {}",
                        self.offset
                    ),
                );
            }
            invalid_usage(
                "local_section",
                format_args!(
                    "global section {global_section} has no local section at offset {}",
                    self.offset
                ),
            );
        };
        self.check_local("local_section", local);
        local
    }

    fn global_section(&self, local_section: usize) -> usize {
        self.check_local("global_section", local_section);
        let Some(global) = self.to_global(local_section) else {
            if self.offset < 0 {
                invalid_usage(
                    "global_section",
                    format_args!(
                        "local section {local_section} maps before global section 0 (offset {})",
                        self.offset
                    ),
                );
            }
            invalid_usage(
                "global_section",
                format_args!(
                    "local section {local_section} overflows the global section space (offset {})",
                    self.offset
                ),
            );
        };
        global
    }

    fn local_address(&self, global_address: ItemAddress) -> ItemAddress {
        global_address.with_section(self.local_section(global_address.section))
    }

    fn global_address(&self, local_address: ItemAddress) -> ItemAddress {
        local_address.with_section(self.global_section(local_address.section))
    }

    fn surface(&self) -> Option<Arc<S>> {
        self.surface.get()
    }

    fn owns_global_section(&self, global_section: usize) -> bool {
        self.to_local(global_section)
            .is_some_and(|local| self.section_count.is_none_or(|count| local < count))
    }
}

impl<S: CollectionSurface + ?Sized> fmt::Debug for OffsetMapping<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OffsetMapping")
            .field("offset", &self.offset)
            .field("section_count", &self.section_count)
            .field("surface", &self.surface)
            .finish()
    }
}
