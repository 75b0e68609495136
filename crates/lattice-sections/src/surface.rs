//! The rendering surface capability interface.
//!
//! [`CollectionSurface`] is the only boundary this crate touches. The real
//! list or grid view implements it in global coordinates; a
//! [`DelegatedSurface`](crate::DelegatedSurface) implements it again in a
//! provider's local coordinates.
//!
//! [`SurfaceHandle`] is the non-owning back reference from the composition
//! to the real surface. The rendering layer owns the surface and decides its
//! lifetime; the handle only looks it up.

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::address::{ItemAddress, Point, SectionSet};

/// Animation style for structural changes.
///
/// Passed through to the surface unchanged; this crate gives it no meaning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RowAnimation {
    Fade,
    Right,
    Left,
    Top,
    Bottom,
    /// No animation.
    None,
    Middle,
    /// Let the surface pick.
    #[default]
    Automatic,
}

/// Where a scrolled-to or selected item should end up in the viewport.
///
/// Passed through to the surface unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ScrollPosition {
    /// Scroll as little as possible.
    #[default]
    None,
    Top,
    CenteredVertically,
    Bottom,
    Left,
    CenteredHorizontally,
    Right,
}

/// Closure run inside a batch update.
pub type BatchUpdate<'a> = Box<dyn FnOnce() + 'a>;

/// Completion for a batch update.
///
/// The flag reports whether the transition ran to completion. The surface
/// may invoke it from whichever thread or queue it documents.
pub type BatchCompletion = Box<dyn FnOnce(bool) + Send>;

/// A sectioned list or grid surface.
///
/// All coordinates are in the implementor's own space. Methods take `&self`;
/// surfaces that need to mutate state use interior mutability, as item
/// models do.
///
/// Implementors are free to interpret a sequence of structural calls as one
/// batch. Callers forwarding into a surface must therefore preserve call
/// order exactly.
pub trait CollectionSurface {
    /// A reusable cell.
    type Cell;
    /// A cell type registered by class.
    type CellClass;
    /// A cell template (prototype) registered for reuse.
    type CellTemplate;
    /// The scroll view backing the surface.
    type ScrollView;

    // -------------------------------------------------------------------------
    // Registration and dequeue
    // -------------------------------------------------------------------------

    /// Registers a cell class for a reuse identifier.
    fn register_class(&self, cell_class: Option<Self::CellClass>, identifier: &str);

    /// Registers a cell template for a reuse identifier.
    fn register_template(&self, template: Option<Self::CellTemplate>, identifier: &str);

    /// Returns a reusable cell for `identifier`, configured for `address`.
    fn dequeue_cell(&self, identifier: &str, address: ItemAddress) -> Self::Cell;

    // -------------------------------------------------------------------------
    // Counts
    // -------------------------------------------------------------------------

    /// Returns the number of sections.
    fn number_of_sections(&self) -> usize;

    /// Returns the number of items in `section`.
    fn number_of_items(&self, section: usize) -> usize;

    // -------------------------------------------------------------------------
    // Structural changes
    // -------------------------------------------------------------------------

    /// Reloads everything.
    fn reload_data(&self);

    /// Runs `updates` as one animated batch, then calls `completion`.
    fn perform_batch_updates(
        &self,
        updates: Option<BatchUpdate<'_>>,
        completion: Option<BatchCompletion>,
    );

    fn insert_sections(&self, sections: &SectionSet, animation: RowAnimation);

    fn delete_sections(&self, sections: &SectionSet, animation: RowAnimation);

    fn reload_sections(&self, sections: &SectionSet, animation: RowAnimation);

    fn move_section(&self, section: usize, new_section: usize);

    fn insert_items(&self, addresses: &[ItemAddress], animation: RowAnimation);

    fn delete_items(&self, addresses: &[ItemAddress], animation: RowAnimation);

    fn reload_items(&self, addresses: &[ItemAddress], animation: RowAnimation);

    fn move_item(&self, address: ItemAddress, new_address: ItemAddress);

    // -------------------------------------------------------------------------
    // Scrolling and selection
    // -------------------------------------------------------------------------

    fn scroll_to_item(&self, address: ItemAddress, position: ScrollPosition, animated: bool);

    /// Selects the item at `address`. `None` clears the selection.
    fn select_item(&self, address: Option<ItemAddress>, animated: bool, position: ScrollPosition);

    fn deselect_item(&self, address: ItemAddress, animated: bool);

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Returns the address of a cell, or `None` if it is not displayed.
    fn address_for_cell(&self, cell: &Self::Cell) -> Option<ItemAddress>;

    /// Hit-tests a point. Returns `None` if no item is under it.
    fn address_at_point(&self, point: Point) -> Option<ItemAddress>;

    /// Addresses of the visible items.
    fn visible_addresses(&self) -> Vec<ItemAddress>;

    /// Addresses of the selected items.
    fn selected_addresses(&self) -> Vec<ItemAddress>;

    /// The cells currently on screen.
    fn visible_cells(&self) -> Vec<Self::Cell>;

    /// The cell displaying `address`, if it is on screen.
    fn cell_for_item(&self, address: ItemAddress) -> Option<Self::Cell>;

    /// The scroll view backing this surface.
    fn scroll_view(&self) -> Self::ScrollView;
}

/// A non-owning, re-attachable reference to a rendering surface.
///
/// The handle starts detached. Attaching stores a [`Weak`] reference, so the
/// surface is dropped whenever its owner drops it and the handle silently
/// reads as detached from then on.
pub struct SurfaceHandle<S: ?Sized> {
    surface: RwLock<Option<Weak<S>>>,
}

impl<S: ?Sized> SurfaceHandle<S> {
    /// Creates a detached handle.
    pub fn new() -> Self {
        Self {
            surface: RwLock::new(None),
        }
    }

    /// Creates a handle attached to `surface`.
    pub fn attached(surface: &Arc<S>) -> Self {
        Self {
            surface: RwLock::new(Some(Arc::downgrade(surface))),
        }
    }

    /// Points the handle at `surface`, replacing any previous surface.
    pub fn attach(&self, surface: &Arc<S>) {
        *self.surface.write() = Some(Arc::downgrade(surface));
    }

    /// Clears the handle.
    pub fn detach(&self) {
        *self.surface.write() = None;
    }

    /// Returns the surface if it is attached and still alive.
    pub fn get(&self) -> Option<Arc<S>> {
        self.surface.read().as_ref().and_then(Weak::upgrade)
    }

    /// Returns `true` if a live surface is attached.
    pub fn is_attached(&self) -> bool {
        self.get().is_some()
    }
}

impl<S: ?Sized> Default for SurfaceHandle<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: ?Sized> fmt::Debug for SurfaceHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SurfaceHandle")
            .field("attached", &self.is_attached())
            .finish()
    }
}
