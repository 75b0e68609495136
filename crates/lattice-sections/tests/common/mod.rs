//! An in-memory sectioned table used as the real surface in integration tests.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Once;

use lattice_sections::{
    BatchCompletion, BatchUpdate, CollectionSurface, ItemAddress, Point, RowAnimation,
    ScrollPosition, SectionSet,
};
use parking_lot::Mutex;

/// Installs a test-writer subscriber once; filter with `RUST_LOG`.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

#[derive(Default)]
struct TableState {
    sections: Vec<Vec<String>>,
    selected: BTreeSet<ItemAddress>,
    registered: Vec<String>,
    animations: Vec<RowAnimation>,
    batches: usize,
}

/// A table that actually applies the structural changes it receives.
///
/// Every item is visible, rows are 10 points tall and stacked section after
/// section, and a cell is the item's text.
#[derive(Default)]
pub struct MemoryTable {
    state: Mutex<TableState>,
}

impl MemoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table with `sections` empty sections.
    pub fn with_sections(sections: usize) -> Self {
        let table = Self::new();
        table.state.lock().sections = vec![Vec::new(); sections];
        table
    }

    /// Returns a copy of every section's items.
    pub fn snapshot(&self) -> Vec<Vec<String>> {
        self.state.lock().sections.clone()
    }

    pub fn set_items(&self, section: usize, items: &[&str]) {
        self.state.lock().sections[section] = items.iter().map(|s| s.to_string()).collect();
    }

    pub fn registered(&self) -> Vec<String> {
        self.state.lock().registered.clone()
    }

    pub fn animations(&self) -> Vec<RowAnimation> {
        self.state.lock().animations.clone()
    }

    pub fn batches(&self) -> usize {
        self.state.lock().batches
    }

    fn all_addresses(state: &TableState) -> Vec<ItemAddress> {
        state
            .sections
            .iter()
            .enumerate()
            .flat_map(|(section, items)| {
                (0..items.len()).map(move |item| ItemAddress::new(section, item))
            })
            .collect()
    }
}

impl CollectionSurface for MemoryTable {
    type Cell = String;
    type CellClass = &'static str;
    type CellTemplate = &'static str;
    type ScrollView = &'static str;

    fn register_class(&self, cell_class: Option<&'static str>, identifier: &str) {
        let name = cell_class.unwrap_or("<none>");
        self.state.lock().registered.push(format!("{identifier}={name}"));
    }

    fn register_template(&self, template: Option<&'static str>, identifier: &str) {
        let name = template.unwrap_or("<none>");
        self.state.lock().registered.push(format!("{identifier}~{name}"));
    }

    fn dequeue_cell(&self, _identifier: &str, address: ItemAddress) -> String {
        self.state.lock().sections[address.section][address.item].clone()
    }

    fn number_of_sections(&self) -> usize {
        self.state.lock().sections.len()
    }

    fn number_of_items(&self, section: usize) -> usize {
        self.state.lock().sections[section].len()
    }

    fn reload_data(&self) {}

    fn perform_batch_updates(
        &self,
        updates: Option<BatchUpdate<'_>>,
        completion: Option<BatchCompletion>,
    ) {
        self.state.lock().batches += 1;
        if let Some(updates) = updates {
            updates();
        }
        if let Some(completion) = completion {
            completion(true);
        }
    }

    fn insert_sections(&self, sections: &SectionSet, animation: RowAnimation) {
        let mut state = self.state.lock();
        state.animations.push(animation);
        for &section in sections {
            state.sections.insert(section, Vec::new());
        }
    }

    fn delete_sections(&self, sections: &SectionSet, animation: RowAnimation) {
        let mut state = self.state.lock();
        state.animations.push(animation);
        for &section in sections.iter().rev() {
            state.sections.remove(section);
        }
    }

    fn reload_sections(&self, _sections: &SectionSet, animation: RowAnimation) {
        self.state.lock().animations.push(animation);
    }

    fn move_section(&self, section: usize, new_section: usize) {
        let mut state = self.state.lock();
        let moved = state.sections.remove(section);
        state.sections.insert(new_section, moved);
    }

    fn insert_items(&self, addresses: &[ItemAddress], animation: RowAnimation) {
        let mut state = self.state.lock();
        state.animations.push(animation);
        let mut sorted = addresses.to_vec();
        sorted.sort();
        for address in sorted {
            let label = format!("new@{}", address);
            state.sections[address.section].insert(address.item, label);
        }
    }

    fn delete_items(&self, addresses: &[ItemAddress], animation: RowAnimation) {
        let mut state = self.state.lock();
        state.animations.push(animation);
        let mut sorted = addresses.to_vec();
        sorted.sort();
        for address in sorted.into_iter().rev() {
            state.sections[address.section].remove(address.item);
        }
    }

    fn reload_items(&self, _addresses: &[ItemAddress], animation: RowAnimation) {
        self.state.lock().animations.push(animation);
    }

    fn move_item(&self, address: ItemAddress, new_address: ItemAddress) {
        let mut state = self.state.lock();
        let moved = state.sections[address.section].remove(address.item);
        state.sections[new_address.section].insert(new_address.item, moved);
    }

    fn scroll_to_item(&self, _address: ItemAddress, _position: ScrollPosition, _animated: bool) {}

    fn select_item(&self, address: Option<ItemAddress>, _animated: bool, _position: ScrollPosition) {
        let mut state = self.state.lock();
        match address {
            Some(address) => {
                state.selected.insert(address);
            }
            None => state.selected.clear(),
        }
    }

    fn deselect_item(&self, address: ItemAddress, _animated: bool) {
        self.state.lock().selected.remove(&address);
    }

    fn address_for_cell(&self, cell: &String) -> Option<ItemAddress> {
        let state = self.state.lock();
        Self::all_addresses(&state)
            .into_iter()
            .find(|address| state.sections[address.section][address.item] == *cell)
    }

    fn address_at_point(&self, point: Point) -> Option<ItemAddress> {
        if point.y < 0.0 {
            return None;
        }
        let row = (point.y / 10.0) as usize;
        Self::all_addresses(&self.state.lock()).get(row).copied()
    }

    fn visible_addresses(&self) -> Vec<ItemAddress> {
        Self::all_addresses(&self.state.lock())
    }

    fn selected_addresses(&self) -> Vec<ItemAddress> {
        self.state.lock().selected.iter().copied().collect()
    }

    fn visible_cells(&self) -> Vec<String> {
        self.state.lock().sections.iter().flatten().cloned().collect()
    }

    fn cell_for_item(&self, address: ItemAddress) -> Option<String> {
        let state = self.state.lock();
        state.sections.get(address.section)?.get(address.item).cloned()
    }

    fn scroll_view(&self) -> &'static str {
        "memory-table"
    }
}
