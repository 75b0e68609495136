//! A call-recording surface for unit tests.

use parking_lot::Mutex;

use crate::address::{ItemAddress, Point, SectionSet};
use crate::surface::{
    BatchCompletion, BatchUpdate, CollectionSurface, RowAnimation, ScrollPosition,
};

/// One call received by a [`RecordingSurface`].
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    RegisterClass(Option<&'static str>, String),
    RegisterTemplate(Option<&'static str>, String),
    Dequeue(String, ItemAddress),
    NumberOfItems(usize),
    ReloadData,
    BatchUpdates,
    InsertSections(Vec<usize>, RowAnimation),
    DeleteSections(Vec<usize>, RowAnimation),
    ReloadSections(Vec<usize>, RowAnimation),
    MoveSection(usize, usize),
    InsertItems(Vec<ItemAddress>, RowAnimation),
    DeleteItems(Vec<ItemAddress>, RowAnimation),
    ReloadItems(Vec<ItemAddress>, RowAnimation),
    MoveItem(ItemAddress, ItemAddress),
    ScrollTo(ItemAddress, ScrollPosition, bool),
    Select(Option<ItemAddress>, bool, ScrollPosition),
    Deselect(ItemAddress, bool),
    CellForItem(ItemAddress),
}

/// A cell handed out by the recording surface; it remembers where it was dequeued.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TestCell {
    pub identifier: String,
    pub address: ItemAddress,
}

/// Records every forwarded call and answers queries from canned values.
#[derive(Default)]
pub(crate) struct RecordingSurface {
    pub calls: Mutex<Vec<Call>>,
    pub sections: usize,
    pub items_per_section: usize,
    pub visible: Vec<ItemAddress>,
    pub selected: Vec<ItemAddress>,
    pub hit: Option<ItemAddress>,
    pub batch_finished: bool,
}

impl RecordingSurface {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn take_calls(&self) -> Vec<Call> {
        std::mem::take(&mut *self.calls.lock())
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

impl CollectionSurface for RecordingSurface {
    type Cell = TestCell;
    type CellClass = &'static str;
    type CellTemplate = &'static str;
    type ScrollView = &'static str;

    fn register_class(&self, cell_class: Option<&'static str>, identifier: &str) {
        self.record(Call::RegisterClass(cell_class, identifier.to_owned()));
    }

    fn register_template(&self, template: Option<&'static str>, identifier: &str) {
        self.record(Call::RegisterTemplate(template, identifier.to_owned()));
    }

    fn dequeue_cell(&self, identifier: &str, address: ItemAddress) -> TestCell {
        self.record(Call::Dequeue(identifier.to_owned(), address));
        TestCell {
            identifier: identifier.to_owned(),
            address,
        }
    }

    fn number_of_sections(&self) -> usize {
        self.sections
    }

    fn number_of_items(&self, section: usize) -> usize {
        self.record(Call::NumberOfItems(section));
        self.items_per_section
    }

    fn reload_data(&self) {
        self.record(Call::ReloadData);
    }

    fn perform_batch_updates(
        &self,
        updates: Option<BatchUpdate<'_>>,
        completion: Option<BatchCompletion>,
    ) {
        self.record(Call::BatchUpdates);
        if let Some(updates) = updates {
            updates();
        }
        if let Some(completion) = completion {
            completion(self.batch_finished);
        }
    }

    fn insert_sections(&self, sections: &SectionSet, animation: RowAnimation) {
        self.record(Call::InsertSections(sections.iter().copied().collect(), animation));
    }

    fn delete_sections(&self, sections: &SectionSet, animation: RowAnimation) {
        self.record(Call::DeleteSections(sections.iter().copied().collect(), animation));
    }

    fn reload_sections(&self, sections: &SectionSet, animation: RowAnimation) {
        self.record(Call::ReloadSections(sections.iter().copied().collect(), animation));
    }

    fn move_section(&self, section: usize, new_section: usize) {
        self.record(Call::MoveSection(section, new_section));
    }

    fn insert_items(&self, addresses: &[ItemAddress], animation: RowAnimation) {
        self.record(Call::InsertItems(addresses.to_vec(), animation));
    }

    fn delete_items(&self, addresses: &[ItemAddress], animation: RowAnimation) {
        self.record(Call::DeleteItems(addresses.to_vec(), animation));
    }

    fn reload_items(&self, addresses: &[ItemAddress], animation: RowAnimation) {
        self.record(Call::ReloadItems(addresses.to_vec(), animation));
    }

    fn move_item(&self, address: ItemAddress, new_address: ItemAddress) {
        self.record(Call::MoveItem(address, new_address));
    }

    fn scroll_to_item(&self, address: ItemAddress, position: ScrollPosition, animated: bool) {
        self.record(Call::ScrollTo(address, position, animated));
    }

    fn select_item(&self, address: Option<ItemAddress>, animated: bool, position: ScrollPosition) {
        self.record(Call::Select(address, animated, position));
    }

    fn deselect_item(&self, address: ItemAddress, animated: bool) {
        self.record(Call::Deselect(address, animated));
    }

    fn address_for_cell(&self, cell: &TestCell) -> Option<ItemAddress> {
        Some(cell.address)
    }

    fn address_at_point(&self, _point: Point) -> Option<ItemAddress> {
        self.hit
    }

    fn visible_addresses(&self) -> Vec<ItemAddress> {
        self.visible.clone()
    }

    fn selected_addresses(&self) -> Vec<ItemAddress> {
        self.selected.clone()
    }

    fn visible_cells(&self) -> Vec<TestCell> {
        self.visible
            .iter()
            .map(|&address| TestCell {
                identifier: "visible".to_owned(),
                address,
            })
            .collect()
    }

    fn cell_for_item(&self, address: ItemAddress) -> Option<TestCell> {
        self.record(Call::CellForItem(address));
        Some(TestCell {
            identifier: "cell".to_owned(),
            address,
        })
    }

    fn scroll_view(&self) -> &'static str {
        "scroll-view"
    }
}
