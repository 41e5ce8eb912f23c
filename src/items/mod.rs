//! Item system

pub mod item;
pub mod enchantment;
pub mod board;

pub use item::{
    Attributes, Behavior, Immunities, Item, ItemId, ItemPhase, ItemSize, ItemTag, ItemTemplate,
    Stat, Tier, TriggerState,
};
pub use enchantment::{Enchantment, EnchantmentEffect, Scaling, ScalingType, DERIVED_STATS};
pub use board::{Board, PlacedItem, BOARD_SLOTS};
