use indexmap::IndexMap;
use rust_decimal_macros::dec;
use tokio::sync::Mutex;

use crate::vegetable::VegetablePrice;

/// The shared in-memory price table.
///
/// Rows keep their insertion order, so listings and receipts read the same
/// on every run. A single async mutex guards the map; every operation takes
/// the lock exactly once, which is what makes concurrent tasks atomic.
pub struct PriceTable {
    rows: Mutex<IndexMap<String, VegetablePrice>>,
}

impl PriceTable {
    /// A table pre-loaded with the stock vegetables.
    pub fn seeded() -> Self {
        let mut rows = IndexMap::new();
        for item in [
            VegetablePrice::new("V001", "Tomato", dec!(60.00)),
            VegetablePrice::new("V002", "Carrot", dec!(45.00)),
            VegetablePrice::new("V003", "Spinach", dec!(30.00)),
            VegetablePrice::new("V004", "Onion", dec!(50.00)),
            VegetablePrice::new("V005", "Cabbage", dec!(25.00)),
        ] {
            rows.insert(item.id.clone(), item);
        }
        Self { rows: Mutex::new(rows) }
    }

    pub fn empty() -> Self {
        Self {
            rows: Mutex::new(IndexMap::new()),
        }
    }

    /// Insert a new row. Returns `false` without touching the table when the
    /// id is already taken.
    pub async fn add(&self, item: VegetablePrice) -> bool {
        let mut rows = self.rows.lock().await;
        if rows.contains_key(&item.id) {
            return false;
        }
        rows.insert(item.id.clone(), item);
        true
    }

    /// Replace an existing row in place, keeping its position. Returns
    /// `false` when no row has this id.
    pub async fn update(&self, item: VegetablePrice) -> bool {
        let mut rows = self.rows.lock().await;
        if !rows.contains_key(&item.id) {
            return false;
        }
        rows.insert(item.id.clone(), item);
        true
    }

    /// Remove a row. The remaining rows keep their relative order.
    pub async fn delete(&self, id: &str) -> bool {
        let mut rows = self.rows.lock().await;
        rows.shift_remove(id).is_some()
    }

    pub async fn find(&self, id: &str) -> Option<VegetablePrice> {
        let rows = self.rows.lock().await;
        rows.get(id).cloned()
    }

    /// All rows in insertion order.
    pub async fn list(&self) -> Vec<VegetablePrice> {
        let rows = self.rows.lock().await;
        rows.values().cloned().collect()
    }

    /// Render the table as the banner the server prints at startup.
    pub async fn render(&self) -> String {
        let rows = self.rows.lock().await;
        let mut out = String::new();
        out.push_str("\n========== VEGETABLE PRICE TABLE ==========\n");
        if rows.is_empty() {
            out.push_str("  (empty)\n");
        } else {
            for item in rows.values() {
                out.push_str(&format!("  {item}\n"));
            }
        }
        out.push_str("===========================================\n");
        out
    }
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::seeded()
    }
}
