//! Item addresses and section sets.
//!
//! An [`ItemAddress`] names one item by `(section, item)`. Addresses carry no
//! record of which coordinate space they belong to: a provider's local
//! address and the surface's global address share the type, and it is the
//! caller's job never to compare one against the other.

use std::collections::BTreeSet;
use std::fmt;

/// An ordered set of section indices.
///
/// Translating a set collapses duplicates, and iteration is always in
/// ascending order regardless of insertion order.
pub type SectionSet = BTreeSet<usize>;

/// Position of an item within a sectioned list or grid.
///
/// Ordering is section-major: every item of section 0 sorts before every
/// item of section 1.
///
/// # Example
///
/// ```
/// use lattice_sections::ItemAddress;
///
/// let address = ItemAddress::new(1, 4);
/// assert_eq!(address.section, 1);
/// assert_eq!(address.item, 4);
/// assert_eq!(address.with_section(3), ItemAddress::new(3, 4));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemAddress {
    /// The section containing the item.
    pub section: usize,
    /// The item within its section.
    pub item: usize,
}

impl ItemAddress {
    /// Creates an address for `item` in `section`.
    #[inline]
    pub const fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }

    /// Returns a copy of this address moved to another section.
    ///
    /// The item index is kept as is.
    #[inline]
    pub const fn with_section(self, section: usize) -> Self {
        Self {
            section,
            item: self.item,
        }
    }

    /// Returns a copy of this address pointing at another item in the same section.
    #[inline]
    pub const fn with_item(self, item: usize) -> Self {
        Self {
            section: self.section,
            item,
        }
    }
}

impl From<(usize, usize)> for ItemAddress {
    fn from((section, item): (usize, usize)) -> Self {
        Self { section, item }
    }
}

impl From<ItemAddress> for (usize, usize) {
    fn from(address: ItemAddress) -> Self {
        (address.section, address.item)
    }
}

impl fmt::Debug for ItemAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ItemAddress({}, {})", self.section, self.item)
    }
}

impl fmt::Display for ItemAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.section, self.item)
    }
}

/// A point in the surface's content space, used for hit-testing.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    /// Create a new point.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// The origin point (0, 0).
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };
}

impl From<(f32, f32)> for Point {
    fn from((x, y): (f32, f32)) -> Self {
        Self { x, y }
    }
}
