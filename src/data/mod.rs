//! Data loading and external game content
//!
//! Item and monster templates live in RON files with built-in defaults, so
//! new content can be added without recompiling.

pub mod loader;
pub mod items;
pub mod monsters;

pub use loader::{DataManager, DEFAULT_DATA_DIR};
pub use items::{default_item_templates, ItemTemplates};
pub use monsters::{default_monster_templates, BoardEntry, MonsterTemplate, MonsterTemplates};
