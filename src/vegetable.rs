use serde::{Deserialize, Serialize};

use rust_decimal::Decimal;

use crate::money::fmt_kes;

/// One row of the shared price table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VegetablePrice {
    pub id: String,
    pub name: String,
    pub price_per_kg: Decimal,
}

impl VegetablePrice {
    pub fn new(id: impl Into<String>, name: impl Into<String>, price_per_kg: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price_per_kg,
        }
    }
}

impl std::fmt::Display for VegetablePrice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ID: {:<6} | Name: {:<15} | Price: KES {}/kg",
            self.id,
            self.name,
            fmt_kes(self.price_per_kg)
        )
    }
}
