//! Board slots
//!
//! A board is a single row of ten slots. Items occupy `size` contiguous
//! slots and are placed or removed atomically.

use std::collections::HashMap;
use std::ops::Range;

use super::item::{Item, ItemId, ItemSize};

/// Number of slots on a board
pub const BOARD_SLOTS: usize = 10;

/// An item placed on the board with its first slot
#[derive(Debug, Clone)]
pub struct PlacedItem {
    pub item: Item,
    pub slot: usize,
}

impl PlacedItem {
    /// All slots occupied by this item
    pub fn occupied_slots(&self) -> Range<usize> {
        self.slot..self.slot + self.item.size().slots()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Board {
    /// Each slot points at the item occupying it
    slots: [Option<ItemId>; BOARD_SLOTS],
    items: HashMap<ItemId, PlacedItem>,
    next_id: ItemId,
}

impl Board {
    pub fn new() -> Self {
        Self {
            slots: [None; BOARD_SLOTS],
            items: HashMap::new(),
            next_id: 1,
        }
    }

    pub fn is_valid_slot(&self, slot: usize) -> bool {
        slot < BOARD_SLOTS
    }

    /// Check if `size` slots starting at `slot` are in range and free
    pub fn can_place_at(&self, slot: usize, size: ItemSize) -> bool {
        match slot.checked_add(size.slots()) {
            Some(end) if end <= BOARD_SLOTS => self.slots[slot..end].iter().all(Option::is_none),
            _ => false,
        }
    }

    /// First slot where an item of this size fits
    pub fn find_space_for(&self, size: ItemSize) -> Option<usize> {
        (0..BOARD_SLOTS).find(|&slot| self.can_place_at(slot, size))
    }

    /// Place an item at a specific slot. The board assigns the copy a fresh id.
    pub fn place_at(&mut self, mut item: Item, slot: usize) -> Option<ItemId> {
        if !self.can_place_at(slot, item.size()) {
            return None;
        }

        let id = self.next_id.max(1);
        self.next_id = id + 1;
        item.id = id;

        let placed = PlacedItem { item, slot };
        for cell in placed.occupied_slots() {
            self.slots[cell] = Some(id);
        }
        self.items.insert(id, placed);
        Some(id)
    }

    /// Place an item in the first slot range that fits
    pub fn add_item(&mut self, item: Item) -> Option<ItemId> {
        let slot = self.find_space_for(item.size())?;
        self.place_at(item, slot)
    }

    /// Remove an item by ID, freeing its whole range
    pub fn remove(&mut self, id: ItemId) -> Option<Item> {
        let placed = self.items.remove(&id)?;
        for cell in placed.occupied_slots() {
            self.slots[cell] = None;
        }
        Some(placed.item)
    }

    /// Remove whichever item covers a slot
    pub fn remove_at(&mut self, slot: usize) -> Option<Item> {
        let id = self.id_at(slot)?;
        self.remove(id)
    }

    pub fn id_at(&self, slot: usize) -> Option<ItemId> {
        if !self.is_valid_slot(slot) {
            return None;
        }
        self.slots[slot]
    }

    pub fn get_at(&self, slot: usize) -> Option<&Item> {
        self.id_at(slot).and_then(|id| self.get(id))
    }

    pub fn get_placed(&self, id: ItemId) -> Option<&PlacedItem> {
        self.items.get(&id)
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id).map(|p| &p.item)
    }

    pub fn get_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.get_mut(&id).map(|p| &mut p.item)
    }

    /// Item ids in board order (leftmost first)
    pub fn ordered_ids(&self) -> Vec<ItemId> {
        let mut ids: Vec<ItemId> = Vec::with_capacity(self.items.len());
        for id in self.slots.iter().flatten() {
            if ids.last() != Some(id) {
                ids.push(*id);
            }
        }
        ids
    }

    /// Items in board order
    pub fn items(&self) -> impl Iterator<Item = &Item> + '_ {
        self.ordered_ids().into_iter().filter_map(move |id| self.get(id))
    }

    /// Indices of empty slots
    pub fn free_slots(&self) -> Vec<usize> {
        (0..BOARD_SLOTS).filter(|&s| self.slots[s].is_none()).collect()
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.slots = [None; BOARD_SLOTS];
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::item::{Attributes, ItemTag, ItemTemplate, Stat};

    fn make_test_item(size: ItemSize) -> Item {
        let mut template = ItemTemplate::new("Test Item", size);
        template.tags.insert(ItemTag::Tool);
        template.base = Attributes::new().with(Stat::Cooldown, 1.0);
        Item::new(0, &template).unwrap()
    }

    #[test]
    fn test_add_item() {
        let mut board = Board::new();
        let id = board.add_item(make_test_item(ItemSize::Medium)).unwrap();

        assert_eq!(board.count(), 1);
        assert_eq!(board.id_at(0), Some(id));
        assert_eq!(board.id_at(1), Some(id));
        assert_eq!(board.id_at(2), None);
    }

    #[test]
    fn test_place_then_remove_restores_free_slots() {
        let mut board = Board::new();
        board.place_at(make_test_item(ItemSize::Small), 0).unwrap();
        let before = board.free_slots();

        board.place_at(make_test_item(ItemSize::Large), 4).unwrap();
        assert_eq!(board.free_slots().len(), before.len() - 3);

        // Removing through any covered slot clears the whole range
        let removed = board.remove_at(5);
        assert!(removed.is_some());
        assert_eq!(board.free_slots(), before);
    }

    #[test]
    fn test_overlap_rejected() {
        let mut board = Board::new();
        board.place_at(make_test_item(ItemSize::Medium), 3).unwrap();

        assert!(board.place_at(make_test_item(ItemSize::Small), 4).is_none());
        assert!(board.place_at(make_test_item(ItemSize::Medium), 2).is_none());
        assert!(board.place_at(make_test_item(ItemSize::Small), 5).is_some());
    }

    #[test]
    fn test_out_of_range_rejected() {
        let mut board = Board::new();
        assert!(board.place_at(make_test_item(ItemSize::Large), 8).is_none());
        assert!(board.place_at(make_test_item(ItemSize::Small), BOARD_SLOTS).is_none());
        assert!(board.place_at(make_test_item(ItemSize::Large), 7).is_some());
    }

    #[test]
    fn test_huge_slot_rejected() {
        let mut board = Board::new();
        assert!(!board.can_place_at(usize::MAX, ItemSize::Small));
        assert!(!board.can_place_at(usize::MAX - 1, ItemSize::Large));
        assert!(board.place_at(make_test_item(ItemSize::Medium), usize::MAX).is_none());
        assert_eq!(board.count(), 0);
    }

    #[test]
    fn test_board_full() {
        let mut board = Board::new();
        for _ in 0..BOARD_SLOTS {
            assert!(board.add_item(make_test_item(ItemSize::Small)).is_some());
        }
        assert!(board.add_item(make_test_item(ItemSize::Small)).is_none());
    }

    #[test]
    fn test_ordered_ids_follow_slots() {
        let mut board = Board::new();
        let right = board.place_at(make_test_item(ItemSize::Medium), 6).unwrap();
        let left = board.place_at(make_test_item(ItemSize::Large), 1).unwrap();
        let next = board.place_at(make_test_item(ItemSize::Medium), 4).unwrap();

        assert_eq!(board.ordered_ids(), vec![left, next, right]);
        assert_ne!(left, right);
    }
}
