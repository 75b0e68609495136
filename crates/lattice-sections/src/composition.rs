//! Concatenating several providers into one section space.
//!
//! A [`SectionComposition`] keeps an ordered list of providers, each owning a
//! contiguous run of global sections:
//!
//! ```text
//!   provider A (2 sections)   provider B (3 sections)   provider C (1)
//! ┌───────────┬───────────┬───────────┬───────────┬───────────┬───────────┐
//! │  A:0 → 0  │  A:1 → 1  │  B:0 → 2  │  B:1 → 3  │  B:2 → 4  │  C:0 → 5  │
//! └───────────┴───────────┴───────────┴───────────┴───────────┴───────────┘
//! ```
//!
//! Each provider gets a [`CompositeMapping`] (and from it a
//! [`DelegatedSurface`]) that reads the shared topology on every call, so a
//! sibling growing, shrinking, arriving or leaving shifts the mapping without
//! rebuilding anything.
//!
//! # Example
//!
//! ```ignore
//! use lattice_sections::{ItemAddress, SectionComposition, SectionMapping};
//!
//! let composition = SectionComposition::<MySurface>::new();
//! let header = composition.add_provider(1);
//! let body = composition.add_provider(3);
//!
//! let body_view = composition.facade(body)?;
//! body_view.insert_items(&[ItemAddress::new(0, 0)], RowAnimation::Fade); // global (1, 0)
//!
//! composition.set_section_count(header, 2)?;
//! // body's section 0 is now global section 2
//! ```

use std::fmt;
use std::ops::Range;
use std::sync::Arc;

use parking_lot::RwLock;
use slotmap::{new_key_type, SlotMap};

use crate::address::ItemAddress;
use crate::error::{invalid_usage, CompositionError, Result};
use crate::facade::DelegatedSurface;
use crate::logging::targets;
use crate::mapping::SectionMapping;
use crate::surface::{CollectionSurface, SurfaceHandle};

new_key_type! {
    /// Identifies a provider within a [`SectionComposition`].
    ///
    /// Stays valid while other providers are added and removed around it.
    pub struct ProviderId;
}

/// Per-provider bookkeeping.
#[derive(Debug)]
struct ProviderEntry {
    section_count: usize,
}

/// Provider order and section counts.
#[derive(Debug, Default)]
struct Topology {
    providers: SlotMap<ProviderId, ProviderEntry>,
    order: Vec<ProviderId>,
}

impl Topology {
    fn total_sections(&self) -> usize {
        self.providers.values().map(|entry| entry.section_count).sum()
    }

    fn position(&self, id: ProviderId) -> Option<usize> {
        self.order.iter().position(|&other| other == id)
    }

    /// Global sections owned by `id`.
    fn range(&self, id: ProviderId) -> Option<Range<usize>> {
        let mut start = 0;
        for &other in &self.order {
            let count = self.providers[other].section_count;
            if other == id {
                return Some(start..start + count);
            }
            start += count;
        }
        None
    }

    fn locate(&self, global_section: usize) -> Option<(ProviderId, usize)> {
        let mut start = 0;
        for &id in &self.order {
            let end = start + self.providers[id].section_count;
            if global_section < end {
                return Some((id, global_section - start));
            }
            start = end;
        }
        None
    }

    fn insert(&mut self, position: usize, section_count: usize) -> ProviderId {
        let id = self.providers.insert(ProviderEntry { section_count });
        self.order.insert(position, id);
        id
    }
}

/// An ordered composition of section providers sharing one surface.
///
/// Cloning is cheap and yields another handle to the same composition.
pub struct SectionComposition<S: CollectionSurface + ?Sized> {
    topology: Arc<RwLock<Topology>>,
    surface: Arc<SurfaceHandle<S>>,
}

impl<S: CollectionSurface + ?Sized> SectionComposition<S> {
    /// Creates an empty, detached composition.
    pub fn new() -> Self {
        Self {
            topology: Arc::new(RwLock::new(Topology::default())),
            surface: Arc::new(SurfaceHandle::new()),
        }
    }

    /// Creates a composition with one provider per entry of `section_counts`, in order.
    pub fn with_providers(section_counts: impl IntoIterator<Item = usize>) -> Self {
        let composition = Self::new();
        for count in section_counts {
            composition.add_provider(count);
        }
        composition
    }

    // -------------------------------------------------------------------------
    // Surface
    // -------------------------------------------------------------------------

    /// Attaches the rendering surface every provider forwards to.
    pub fn attach_surface(&self, surface: &Arc<S>) {
        tracing::debug!(target: targets::COMPOSITION, "surface attached");
        self.surface.attach(surface);
    }

    /// Detaches the rendering surface.
    pub fn detach_surface(&self) {
        tracing::debug!(target: targets::COMPOSITION, "surface detached");
        self.surface.detach();
    }

    /// Returns the shared surface handle.
    pub fn surface_handle(&self) -> &Arc<SurfaceHandle<S>> {
        &self.surface
    }

    // -------------------------------------------------------------------------
    // Topology changes
    // -------------------------------------------------------------------------

    /// Appends a provider owning `section_count` sections.
    pub fn add_provider(&self, section_count: usize) -> ProviderId {
        let mut topology = self.topology.write();
        let position = topology.order.len();
        let id = topology.insert(position, section_count);
        tracing::debug!(target: targets::COMPOSITION, ?id, position, section_count, "provider added");
        id
    }

    /// Inserts a provider at `position` in the provider order.
    ///
    /// Providers at or after `position` shift down by `section_count` global sections.
    pub fn insert_provider(&self, position: usize, section_count: usize) -> Result<ProviderId> {
        let mut topology = self.topology.write();
        let len = topology.order.len();
        if position > len {
            return Err(CompositionError::PositionOutOfBounds { position, len });
        }
        let id = topology.insert(position, section_count);
        tracing::debug!(target: targets::COMPOSITION, ?id, position, section_count, "provider inserted");
        Ok(id)
    }

    /// Removes a provider and returns the number of sections it owned.
    ///
    /// Mappings and facades cut for this provider must not be used afterwards.
    pub fn remove_provider(&self, id: ProviderId) -> Result<usize> {
        let mut topology = self.topology.write();
        let entry = topology
            .providers
            .remove(id)
            .ok_or(CompositionError::UnknownProvider(id))?;
        topology.order.retain(|&other| other != id);
        tracing::debug!(target: targets::COMPOSITION, ?id, section_count = entry.section_count, "provider removed");
        Ok(entry.section_count)
    }

    /// Changes the number of sections a provider owns.
    ///
    /// Later providers shift accordingly. The topology must cover every
    /// section a facade call names, so order the update around the surface
    /// call:
    ///
    /// - growing: call this first, then `insert_sections` for the new local
    ///   sections;
    /// - shrinking: `delete_sections` first, then call this.
    ///
    /// The other order names a section the provider does not own yet (or
    /// any more), which panics through the mapping.
    pub fn set_section_count(&self, id: ProviderId, section_count: usize) -> Result<()> {
        let mut topology = self.topology.write();
        let entry = topology
            .providers
            .get_mut(id)
            .ok_or(CompositionError::UnknownProvider(id))?;
        tracing::debug!(
            target: targets::COMPOSITION,
            ?id,
            from = entry.section_count,
            to = section_count,
            "section count changed"
        );
        entry.section_count = section_count;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Returns the number of providers.
    pub fn provider_count(&self) -> usize {
        self.topology.read().order.len()
    }

    /// Returns the providers in order.
    pub fn providers(&self) -> Vec<ProviderId> {
        self.topology.read().order.clone()
    }

    /// Returns `true` if `id` is part of the composition.
    pub fn contains(&self, id: ProviderId) -> bool {
        self.topology.read().providers.contains_key(id)
    }

    /// Returns the position of a provider in the provider order.
    pub fn position(&self, id: ProviderId) -> Option<usize> {
        self.topology.read().position(id)
    }

    /// Returns the number of sections a provider owns.
    pub fn section_count(&self, id: ProviderId) -> Option<usize> {
        self.topology
            .read()
            .providers
            .get(id)
            .map(|entry| entry.section_count)
    }

    /// Returns the global sections a provider owns.
    pub fn section_range(&self, id: ProviderId) -> Option<Range<usize>> {
        self.topology.read().range(id)
    }

    /// Returns the total number of global sections.
    pub fn total_sections(&self) -> usize {
        self.topology.read().total_sections()
    }

    /// Finds the provider owning a global section, and the local section within it.
    ///
    /// Returns `None` past the last section.
    pub fn locate_section(&self, global_section: usize) -> Option<(ProviderId, usize)> {
        self.topology.read().locate(global_section)
    }

    /// Finds the provider owning a global address, and the local address within it.
    pub fn locate_address(&self, global_address: ItemAddress) -> Option<(ProviderId, ItemAddress)> {
        self.locate_section(global_address.section)
            .map(|(id, local)| (id, global_address.with_section(local)))
    }

    // -------------------------------------------------------------------------
    // Mappings
    // -------------------------------------------------------------------------

    /// Returns the mapping for a provider.
    pub fn mapping(&self, id: ProviderId) -> Result<CompositeMapping<S>> {
        if !self.contains(id) {
            return Err(CompositionError::UnknownProvider(id));
        }
        Ok(CompositeMapping {
            topology: self.topology.clone(),
            provider: id,
            surface: self.surface.clone(),
        })
    }

    /// Returns a local-coordinate view of the surface for a provider.
    pub fn facade(&self, id: ProviderId) -> Result<DelegatedSurface<CompositeMapping<S>>> {
        self.mapping(id).map(DelegatedSurface::new)
    }
}

impl<S: CollectionSurface + ?Sized> Default for SectionComposition<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: CollectionSurface + ?Sized> Clone for SectionComposition<S> {
    fn clone(&self) -> Self {
        Self {
            topology: self.topology.clone(),
            surface: self.surface.clone(),
        }
    }
}

impl<S: CollectionSurface + ?Sized> fmt::Debug for SectionComposition<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let topology = self.topology.read();
        f.debug_struct("SectionComposition")
            .field("providers", &topology.order.len())
            .field("total_sections", &topology.total_sections())
            .field("surface", &self.surface)
            .finish()
    }
}

/// Mapping for one provider of a [`SectionComposition`].
///
/// The provider's offset is the sum of the section counts of the providers
/// before it, recomputed on every call.
pub struct CompositeMapping<S: CollectionSurface + ?Sized> {
    topology: Arc<RwLock<Topology>>,
    provider: ProviderId,
    surface: Arc<SurfaceHandle<S>>,
}

impl<S: CollectionSurface + ?Sized> CompositeMapping<S> {
    /// Returns the provider this mapping belongs to.
    pub fn provider(&self) -> ProviderId {
        self.provider
    }

    /// Returns the global sections the provider currently owns.
    ///
    /// # Panics
    ///
    /// Panics if the provider has been removed from the composition.
    pub fn section_range(&self) -> Range<usize> {
        self.current_range("section_range")
    }

    #[track_caller]
    fn current_range(&self, operation: &str) -> Range<usize> {
        let range = self.topology.read().range(self.provider);
        match range {
            Some(range) => range,
            None => invalid_usage(
                operation,
                format_args!("provider {:?} was removed from the composition", self.provider),
            ),
        }
    }
}

impl<S: CollectionSurface + ?Sized> SectionMapping for CompositeMapping<S> {
    type Surface = S;

    fn local_section(&self, global_section: usize) -> usize {
        let range = self.current_range("local_section");
        if !range.contains(&global_section) {
            invalid_usage(
                "local_section",
                format_args!(
                    "global section {global_section} is outside provider {:?}'s sections {range:?}",
                    self.provider
                ),
            );
        }
        global_section - range.start
    }

    fn global_section(&self, local_section: usize) -> usize {
        let range = self.current_range("global_section");
        if local_section >= range.len() {
            invalid_usage(
                "global_section",
                format_args!(
                    "local section {local_section} is outside provider {:?}'s 0..{}",
                    self.provider,
                    range.len()
                ),
            );
        }
        range.start + local_section
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
        self.current_range("owns_global_section")
            .contains(&global_section)
    }
}

impl<S: CollectionSurface + ?Sized> fmt::Debug for CompositeMapping<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeMapping")
            .field("provider", &self.provider)
            .field("sections", &self.topology.read().range(self.provider))
            .finish()
    }
}
