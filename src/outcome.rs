use chrono::{DateTime, Local};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::fmt_kes;
use crate::vegetable::VegetablePrice;

/// What a task produced.
///
/// Every business answer lives here, including the unhappy ones: a duplicate
/// id or a missing row is a [`TaskOutcome::Rejected`], not a transport error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskOutcome {
    Added { item: VegetablePrice },
    Updated { old: VegetablePrice, new: VegetablePrice },
    Deleted { item: VegetablePrice },
    Rejected { reason: Rejection },
    Cost(CostBreakdown),
    Receipt(Receipt),
}

/// Why a task was refused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rejection {
    DuplicateId { id: String },
    NotFound { id: String },
    AmountOverflow { id: String },
}

/// Cost of a single quantity of one vegetable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub id: String,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity_kg: Decimal,
    pub total: Decimal,
}

/// A printable receipt for a basket of vegetables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub issued_at: DateTime<Local>,
    pub cashier: String,
    pub lines: Vec<ReceiptLine>,
    pub grand_total: Decimal,
    pub amount_given: Decimal,
    pub settlement: Settlement,
}

impl Receipt {
    pub fn has_missing(&self) -> bool {
        self.lines
            .iter()
            .any(|line| matches!(line, ReceiptLine::Missing { .. }))
    }
}

/// One line of a receipt. Unknown ids stay on the receipt as a
/// [`ReceiptLine::Missing`] marker instead of failing the whole basket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReceiptLine {
    Item {
        id: String,
        name: String,
        quantity_kg: Decimal,
        unit_price: Decimal,
        line_total: Decimal,
    },
    Missing {
        id: String,
    },
}

/// How the payment settled against the grand total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Settlement {
    Change(Decimal),
    Shortfall(Decimal),
}

impl std::fmt::Display for TaskOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskOutcome::Added { item } => {
                write!(f, "SUCCESS: Added vegetable -> {item}")
            }
            TaskOutcome::Updated { old, new } => {
                write!(f, "SUCCESS: Updated vegetable.\n  OLD: {old}\n  NEW: {new}")
            }
            TaskOutcome::Deleted { item } => {
                write!(f, "SUCCESS: Deleted vegetable -> {item}")
            }
            TaskOutcome::Rejected { reason } => write!(f, "{reason}"),
            TaskOutcome::Cost(cost) => write!(f, "{cost}"),
            TaskOutcome::Receipt(receipt) => write!(f, "{receipt}"),
        }
    }
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rejection::DuplicateId { id } => write!(
                f,
                "FAILED: Vegetable with ID '{id}' already exists. Use Update instead."
            ),
            Rejection::NotFound { id } => {
                write!(f, "FAILED: No vegetable found with ID '{id}'.")
            }
            Rejection::AmountOverflow { id } => {
                write!(f, "FAILED: Amount too large to compute for ID '{id}'.")
            }
        }
    }
}

impl std::fmt::Display for CostBreakdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "COST CALCULATION:")?;
        writeln!(f, "  Vegetable  : {} (ID: {})", self.name, self.id)?;
        writeln!(f, "  Unit Price : KES {} per kg", fmt_kes(self.unit_price))?;
        writeln!(f, "  Quantity   : {:.2} kg", self.quantity_kg)?;
        writeln!(f, "  ------------------------------------")?;
        write!(f, "  TOTAL COST : KES {}", fmt_kes(self.total))
    }
}

impl std::fmt::Display for Receipt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let divider = "=".repeat(48);
        let rule = "-".repeat(48);

        writeln!(f, "{divider}")?;
        writeln!(f, "         VEGETABLE MARKET - RECEIPT")?;
        writeln!(f, "{divider}")?;
        writeln!(f, "  Date    : {}", self.issued_at.format("%d-%m-%Y %H:%M:%S"))?;
        writeln!(f, "  Cashier : {}", self.cashier)?;
        writeln!(f, "{rule}")?;
        writeln!(
            f,
            "  {:<15} {:>6} {:>10} {:>12}",
            "Item", "Qty(kg)", "Unit(KES)", "Total(KES)"
        )?;
        writeln!(f, "{rule}")?;
        for line in &self.lines {
            match line {
                ReceiptLine::Item {
                    name,
                    quantity_kg,
                    unit_price,
                    line_total,
                    ..
                } => {
                    writeln!(
                        f,
                        "  {:<15} {:>6} {:>10} {:>12}",
                        name,
                        format!("{quantity_kg:.2}"),
                        fmt_kes(*unit_price),
                        fmt_kes(*line_total)
                    )?;
                }
                ReceiptLine::Missing { id } => {
                    writeln!(f, "  {:<15}  NOT FOUND (ID: {id})", "???")?;
                }
            }
        }
        writeln!(f, "{rule}")?;
        writeln!(f, "  {:<33} {:>12}", "TOTAL (KES):", fmt_kes(self.grand_total))?;
        writeln!(
            f,
            "  {:<33} {:>12}",
            "Amount Given (KES):",
            fmt_kes(self.amount_given)
        )?;
        match &self.settlement {
            Settlement::Change(change) => {
                writeln!(f, "  {:<33} {:>12}", "Change Due  (KES):", fmt_kes(*change))?;
            }
            Settlement::Shortfall(short) => {
                writeln!(
                    f,
                    "  {:<33} {:>12}",
                    "INSUFFICIENT FUNDS - SHORT:",
                    fmt_kes(*short)
                )?;
            }
        }
        writeln!(f, "{divider}")?;
        writeln!(f, "         Thank you for shopping with us!")?;
        write!(f, "{divider}")?;
        if self.has_missing() {
            write!(f, "\n  WARNING: Some items could not be found in the table.")?;
        }
        Ok(())
    }
}
