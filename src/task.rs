use chrono::Local;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::outcome::{CostBreakdown, Receipt, ReceiptLine, Rejection, Settlement, TaskOutcome};
use crate::table::PriceTable;
use crate::vegetable::VegetablePrice;

/// The basket and payment for one receipt.
///
/// Items map vegetable id to quantity in kilograms. The map keeps the order
/// the items were given in, and a repeated id silently replaces the earlier
/// quantity, so the last entry wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiptRequest {
    pub items: IndexMap<String, Decimal>,
    pub amount_given: Decimal,
    pub cashier: String,
}

impl ReceiptRequest {
    /// Parse one `ID:QTY` item spec, as typed on the command line or posted
    /// through the gateway.
    pub fn parse_item(spec: &str) -> Result<(String, Decimal), String> {
        let (id, qty) = spec
            .split_once(':')
            .ok_or_else(|| format!("invalid item '{}', expected ID:QTY", spec.trim()))?;
        let id = id.trim();
        if id.is_empty() {
            return Err(format!("invalid item '{}', expected ID:QTY", spec.trim()));
        }
        let qty = qty
            .trim()
            .parse::<Decimal>()
            .map_err(|_| format!("invalid quantity in '{}', expected ID:QTY", spec.trim()))?;
        Ok((id.to_string(), qty))
    }
}

/// A unit of work shipped to the engine.
///
/// The task itself knows how to run against a [`PriceTable`]; the engine only
/// hands it the table. Adding a new task variant means adding its `execute`
/// arm here, nothing engine-side changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Task {
    AddPrice(VegetablePrice),
    UpdatePrice(VegetablePrice),
    DeletePrice { id: String },
    ComputeCost { id: String, quantity_kg: Decimal },
    ComputeReceipt(ReceiptRequest),
}

impl Task {
    pub fn name(&self) -> &'static str {
        match self {
            Task::AddPrice(_) => "add_price",
            Task::UpdatePrice(_) => "update_price",
            Task::DeletePrice { .. } => "delete_price",
            Task::ComputeCost { .. } => "compute_cost",
            Task::ComputeReceipt(_) => "compute_receipt",
        }
    }

    /// Run this task against the shared table and report what happened.
    pub async fn execute(&self, table: &PriceTable) -> TaskOutcome {
        match self {
            Task::AddPrice(item) => execute_add(table, item).await,
            Task::UpdatePrice(item) => execute_update(table, item).await,
            Task::DeletePrice { id } => execute_delete(table, id).await,
            Task::ComputeCost { id, quantity_kg } => {
                execute_cost(table, id, *quantity_kg).await
            }
            Task::ComputeReceipt(request) => execute_receipt(table, request).await,
        }
    }
}

async fn execute_add(table: &PriceTable, item: &VegetablePrice) -> TaskOutcome {
    if table.add(item.clone()).await {
        TaskOutcome::Added { item: item.clone() }
    } else {
        TaskOutcome::Rejected {
            reason: Rejection::DuplicateId { id: item.id.clone() },
        }
    }
}

async fn execute_update(table: &PriceTable, item: &VegetablePrice) -> TaskOutcome {
    let Some(old) = table.find(&item.id).await else {
        return TaskOutcome::Rejected {
            reason: Rejection::NotFound { id: item.id.clone() },
        };
    };
    // The row can vanish between find and update; report it as not found.
    if table.update(item.clone()).await {
        TaskOutcome::Updated { old, new: item.clone() }
    } else {
        TaskOutcome::Rejected {
            reason: Rejection::NotFound { id: item.id.clone() },
        }
    }
}

async fn execute_delete(table: &PriceTable, id: &str) -> TaskOutcome {
    let Some(old) = table.find(id).await else {
        return TaskOutcome::Rejected {
            reason: Rejection::NotFound { id: id.to_string() },
        };
    };
    if table.delete(id).await {
        TaskOutcome::Deleted { item: old }
    } else {
        TaskOutcome::Rejected {
            reason: Rejection::NotFound { id: id.to_string() },
        }
    }
}

async fn execute_cost(table: &PriceTable, id: &str, quantity_kg: Decimal) -> TaskOutcome {
    let Some(item) = table.find(id).await else {
        return TaskOutcome::Rejected {
            reason: Rejection::NotFound { id: id.to_string() },
        };
    };
    let Some(total) = item.price_per_kg.checked_mul(quantity_kg) else {
        return TaskOutcome::Rejected {
            reason: Rejection::AmountOverflow { id: id.to_string() },
        };
    };
    TaskOutcome::Cost(CostBreakdown {
        id: item.id,
        name: item.name,
        unit_price: item.price_per_kg,
        quantity_kg,
        total,
    })
}

async fn execute_receipt(table: &PriceTable, request: &ReceiptRequest) -> TaskOutcome {
    let mut lines = Vec::with_capacity(request.items.len());
    let mut grand_total = Decimal::ZERO;

    for (id, quantity_kg) in &request.items {
        match table.find(id).await {
            Some(item) => {
                let overflow = || TaskOutcome::Rejected {
                    reason: Rejection::AmountOverflow { id: id.clone() },
                };
                let Some(line_total) = item.price_per_kg.checked_mul(*quantity_kg) else {
                    return overflow();
                };
                let Some(total) = grand_total.checked_add(line_total) else {
                    return overflow();
                };
                grand_total = total;
                lines.push(ReceiptLine::Item {
                    id: item.id,
                    name: item.name,
                    quantity_kg: *quantity_kg,
                    unit_price: item.price_per_kg,
                    line_total,
                });
            }
            None => lines.push(ReceiptLine::Missing { id: id.clone() }),
        }
    }

    let settlement = if request.amount_given < grand_total {
        Settlement::Shortfall(grand_total - request.amount_given)
    } else {
        Settlement::Change(request.amount_given - grand_total)
    };

    TaskOutcome::Receipt(Receipt {
        issued_at: Local::now(),
        cashier: request.cashier.clone(),
        lines,
        grand_total,
        amount_given: request.amount_given,
        settlement,
    })
}
