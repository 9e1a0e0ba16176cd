//! Carried items and the weight inputs to the encumbrance metric

use serde::{Deserialize, Serialize};

/// Default carry capacity before any weight_capacity modifiers
pub const DEFAULT_CARRY_CAPACITY: f64 = 100.0;

/// A stack of carried items
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub name: String,
    /// Weight of a single unit
    pub weight: f64,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub equipped: bool,
}

fn default_quantity() -> u32 {
    1
}

impl InventoryItem {
    pub fn new(name: impl Into<String>, weight: f64, quantity: u32) -> Self {
        Self {
            name: name.into(),
            weight,
            quantity,
            equipped: false,
        }
    }

    pub fn total_weight(&self) -> f64 {
        self.weight * self.quantity as f64
    }
}

/// Everything the character carries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub items: Vec<InventoryItem>,
    /// Capacity before effects; weight_capacity modifiers add to this
    #[serde(default = "default_capacity")]
    pub base_capacity: f64,
}

fn default_capacity() -> f64 {
    DEFAULT_CARRY_CAPACITY
}

impl Default for Inventory {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            base_capacity: DEFAULT_CARRY_CAPACITY,
        }
    }
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, item: InventoryItem) {
        self.items.push(item);
    }

    /// Remove up to `quantity` units of the named item, returns units removed
    pub fn remove(&mut self, name: &str, quantity: u32) -> u32 {
        let mut removed = 0;
        for item in self.items.iter_mut().filter(|i| i.name == name) {
            let take = item.quantity.min(quantity - removed);
            item.quantity -= take;
            removed += take;
            if removed == quantity {
                break;
            }
        }
        self.items.retain(|i| i.quantity > 0);
        removed
    }

    pub fn total_weight(&self) -> f64 {
        self.items.iter().map(InventoryItem::total_weight).sum()
    }

    /// Capacity after adding a weight_capacity modifier total
    pub fn capacity(&self, bonus: i32) -> f64 {
        self.base_capacity + bonus as f64
    }
}
