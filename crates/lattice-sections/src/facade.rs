//! Local-coordinate view of a rendering surface.
//!
//! [`DelegatedSurface`] implements [`CollectionSurface`] for one provider. A
//! provider talks to it with its own zero-based sections; every call is
//! translated through the provider's [`SectionMapping`], forwarded to the
//! real surface, and any addresses coming back are translated again.
//!
//! # Detached surfaces
//!
//! The provider may run before a surface is attached (during setup, or after
//! the surface went away). Calls fall in two groups:
//!
//! - Result-bearing calls with no sensible fallback ([`number_of_sections`],
//!   [`number_of_items`], [`dequeue_cell`], [`scroll_view`]) panic. The
//!   `try_*` accessors return a [`SurfaceError`] instead.
//! - Everything else is a no-op or returns `None` / an empty `Vec`.
//!
//! [`number_of_sections`]: CollectionSurface::number_of_sections
//! [`number_of_items`]: CollectionSurface::number_of_items
//! [`dequeue_cell`]: CollectionSurface::dequeue_cell
//! [`scroll_view`]: CollectionSurface::scroll_view

use std::fmt;
use std::sync::Arc;

use crate::address::{ItemAddress, Point, SectionSet};
use crate::error::{detached, SurfaceError};
use crate::logging::targets;
use crate::mapping::SectionMapping;
use crate::surface::{
    BatchCompletion, BatchUpdate, CollectionSurface, RowAnimation, ScrollPosition,
};

type Surface<M> = <M as SectionMapping>::Surface;

/// A [`CollectionSurface`] in one provider's local coordinates.
///
/// Holds no state besides its mapping, and never owns the real surface.
/// Because it is itself a `CollectionSurface`, a facade can sit under
/// another composition.
pub struct DelegatedSurface<M: SectionMapping> {
    mapping: M,
}

impl<M: SectionMapping> DelegatedSurface<M> {
    /// Creates a facade translating through `mapping`.
    pub fn new(mapping: M) -> Self {
        Self { mapping }
    }

    /// Returns the mapping.
    pub fn mapping(&self) -> &M {
        &self.mapping
    }

    /// Consumes the facade and returns its mapping.
    pub fn into_mapping(self) -> M {
        self.mapping
    }

    /// Returns the real surface, if attached.
    pub fn surface(&self) -> Option<Arc<Surface<M>>> {
        self.mapping.surface()
    }

    /// Returns `true` if a live surface is attached.
    pub fn is_attached(&self) -> bool {
        self.surface().is_some()
    }

    /// Converts a global address to this provider's coordinates.
    pub fn local_address(&self, global_address: ItemAddress) -> ItemAddress {
        self.mapping.local_address(global_address)
    }

    /// Converts a local address to global coordinates.
    pub fn global_address(&self, local_address: ItemAddress) -> ItemAddress {
        self.mapping.global_address(local_address)
    }

    /// Number of sections on the real surface, or an error if detached.
    pub fn try_number_of_sections(&self) -> Result<usize, SurfaceError> {
        let surface = self.try_require("number_of_sections")?;
        Ok(surface.number_of_sections())
    }

    /// Number of items in a local section, or an error if detached.
    pub fn try_number_of_items(&self, section: usize) -> Result<usize, SurfaceError> {
        let surface = self.try_require("number_of_items")?;
        Ok(surface.number_of_items(self.mapping.global_section(section)))
    }

    /// The real surface's scroll view, or an error if detached.
    pub fn try_scroll_view(
        &self,
    ) -> Result<<Surface<M> as CollectionSurface>::ScrollView, SurfaceError> {
        let surface = self.try_require("scroll_view")?;
        Ok(surface.scroll_view())
    }

    fn try_require(&self, operation: &'static str) -> Result<Arc<Surface<M>>, SurfaceError> {
        self.surface().ok_or(SurfaceError::Detached { operation })
    }

    #[track_caller]
    fn require(&self, operation: &'static str) -> Arc<Surface<M>> {
        match self.surface() {
            Some(surface) => surface,
            None => detached(operation),
        }
    }

    /// Translates the addresses this provider owns, in order; other providers' are dropped.
    fn own_addresses(&self, global_addresses: Vec<ItemAddress>) -> Vec<ItemAddress> {
        global_addresses
            .into_iter()
            .filter_map(|address| self.mapping.try_local_address(address))
            .collect()
    }

    /// Surface for a call that tolerates being detached.
    fn forward(&self, operation: &'static str) -> Option<Arc<Surface<M>>> {
        let surface = self.surface();
        if surface.is_none() {
            tracing::trace!(target: targets::FACADE, operation, "no surface attached, dropping call");
        }
        surface
    }
}

impl<M: SectionMapping> CollectionSurface for DelegatedSurface<M> {
    type Cell = <Surface<M> as CollectionSurface>::Cell;
    type CellClass = <Surface<M> as CollectionSurface>::CellClass;
    type CellTemplate = <Surface<M> as CollectionSurface>::CellTemplate;
    type ScrollView = <Surface<M> as CollectionSurface>::ScrollView;

    // -------------------------------------------------------------------------
    // Registration and dequeue
    // -------------------------------------------------------------------------

    fn register_class(&self, cell_class: Option<Self::CellClass>, identifier: &str) {
        if let Some(surface) = self.forward("register_class") {
            surface.register_class(cell_class, identifier);
        }
    }

    fn register_template(&self, template: Option<Self::CellTemplate>, identifier: &str) {
        if let Some(surface) = self.forward("register_template") {
            surface.register_template(template, identifier);
        }
    }

    fn dequeue_cell(&self, identifier: &str, address: ItemAddress) -> Self::Cell {
        let surface = self.require("dequeue_cell");
        surface.dequeue_cell(identifier, self.mapping.global_address(address))
    }

    // -------------------------------------------------------------------------
    // Counts
    // -------------------------------------------------------------------------

    fn number_of_sections(&self) -> usize {
        self.require("number_of_sections").number_of_sections()
    }

    fn number_of_items(&self, section: usize) -> usize {
        let surface = self.require("number_of_items");
        surface.number_of_items(self.mapping.global_section(section))
    }

    // -------------------------------------------------------------------------
    // Structural changes
    // -------------------------------------------------------------------------

    fn reload_data(&self) {
        if let Some(surface) = self.forward("reload_data") {
            surface.reload_data();
        }
    }

    fn perform_batch_updates(
        &self,
        updates: Option<BatchUpdate<'_>>,
        completion: Option<BatchCompletion>,
    ) {
        // Detached: neither the updates nor the completion run.
        if let Some(surface) = self.forward("perform_batch_updates") {
            surface.perform_batch_updates(updates, completion);
        }
    }

    fn insert_sections(&self, sections: &SectionSet, animation: RowAnimation) {
        let global = self.mapping.global_sections(sections);
        tracing::trace!(target: targets::FACADE, ?sections, ?global, ?animation, "insert_sections");
        if let Some(surface) = self.forward("insert_sections") {
            surface.insert_sections(&global, animation);
        }
    }

    fn delete_sections(&self, sections: &SectionSet, animation: RowAnimation) {
        let global = self.mapping.global_sections(sections);
        tracing::trace!(target: targets::FACADE, ?sections, ?global, ?animation, "delete_sections");
        if let Some(surface) = self.forward("delete_sections") {
            surface.delete_sections(&global, animation);
        }
    }

    fn reload_sections(&self, sections: &SectionSet, animation: RowAnimation) {
        let global = self.mapping.global_sections(sections);
        tracing::trace!(target: targets::FACADE, ?sections, ?global, ?animation, "reload_sections");
        if let Some(surface) = self.forward("reload_sections") {
            surface.reload_sections(&global, animation);
        }
    }

    fn move_section(&self, section: usize, new_section: usize) {
        let from = self.mapping.global_section(section);
        let to = self.mapping.global_section(new_section);
        tracing::trace!(target: targets::FACADE, section, new_section, from, to, "move_section");
        if let Some(surface) = self.forward("move_section") {
            surface.move_section(from, to);
        }
    }

    fn insert_items(&self, addresses: &[ItemAddress], animation: RowAnimation) {
        let global = self.mapping.global_addresses(addresses);
        tracing::trace!(target: targets::FACADE, ?addresses, ?global, ?animation, "insert_items");
        if let Some(surface) = self.forward("insert_items") {
            surface.insert_items(&global, animation);
        }
    }

    fn delete_items(&self, addresses: &[ItemAddress], animation: RowAnimation) {
        let global = self.mapping.global_addresses(addresses);
        tracing::trace!(target: targets::FACADE, ?addresses, ?global, ?animation, "delete_items");
        if let Some(surface) = self.forward("delete_items") {
            surface.delete_items(&global, animation);
        }
    }

    fn reload_items(&self, addresses: &[ItemAddress], animation: RowAnimation) {
        let global = self.mapping.global_addresses(addresses);
        tracing::trace!(target: targets::FACADE, ?addresses, ?global, ?animation, "reload_items");
        if let Some(surface) = self.forward("reload_items") {
            surface.reload_items(&global, animation);
        }
    }

    fn move_item(&self, address: ItemAddress, new_address: ItemAddress) {
        let from = self.mapping.global_address(address);
        let to = self.mapping.global_address(new_address);
        tracing::trace!(target: targets::FACADE, ?address, ?new_address, ?from, ?to, "move_item");
        if let Some(surface) = self.forward("move_item") {
            surface.move_item(from, to);
        }
    }

    // -------------------------------------------------------------------------
    // Scrolling and selection
    // -------------------------------------------------------------------------

    fn scroll_to_item(&self, address: ItemAddress, position: ScrollPosition, animated: bool) {
        let global = self.mapping.global_address(address);
        if let Some(surface) = self.forward("scroll_to_item") {
            surface.scroll_to_item(global, position, animated);
        }
    }

    fn select_item(&self, address: Option<ItemAddress>, animated: bool, position: ScrollPosition) {
        let global = address.map(|address| self.mapping.global_address(address));
        if let Some(surface) = self.forward("select_item") {
            surface.select_item(global, animated, position);
        }
    }

    fn deselect_item(&self, address: ItemAddress, animated: bool) {
        let global = self.mapping.global_address(address);
        if let Some(surface) = self.forward("deselect_item") {
            surface.deselect_item(global, animated);
        }
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    fn address_for_cell(&self, cell: &Self::Cell) -> Option<ItemAddress> {
        let global = self.forward("address_for_cell")?.address_for_cell(cell)?;
        self.mapping.try_local_address(global)
    }

    fn address_at_point(&self, point: Point) -> Option<ItemAddress> {
        let global = self.forward("address_at_point")?.address_at_point(point)?;
        self.mapping.try_local_address(global)
    }

    fn visible_addresses(&self) -> Vec<ItemAddress> {
        match self.forward("visible_addresses") {
            Some(surface) => self.own_addresses(surface.visible_addresses()),
            None => Vec::new(),
        }
    }

    fn selected_addresses(&self) -> Vec<ItemAddress> {
        match self.forward("selected_addresses") {
            Some(surface) => self.own_addresses(surface.selected_addresses()),
            None => Vec::new(),
        }
    }

    fn visible_cells(&self) -> Vec<Self::Cell> {
        self.forward("visible_cells")
            .map(|surface| surface.visible_cells())
            .unwrap_or_default()
    }

    fn cell_for_item(&self, address: ItemAddress) -> Option<Self::Cell> {
        let global = self.mapping.global_address(address);
        self.forward("cell_for_item")?.cell_for_item(global)
    }

    fn scroll_view(&self) -> Self::ScrollView {
        self.require("scroll_view").scroll_view()
    }
}

impl<M: SectionMapping + fmt::Debug> fmt::Debug for DelegatedSurface<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DelegatedSurface")
            .field("mapping", &self.mapping)
            .field("attached", &self.is_attached())
            .finish()
    }
}
