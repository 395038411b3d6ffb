use axum::Router;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::routing::post;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::engine::ComputeHandle;
use crate::task::{ReceiptRequest, Task};
use crate::vegetable::VegetablePrice;

/// Plain-text HTTP facade over a [`Compute`](crate::engine::Compute) handle.
///
/// Routes mirror the console features one to one. Bodies are form-encoded
/// requests in, rendered outcome text out; a transport failure towards the
/// engine maps to 502.
pub fn router(engine: ComputeHandle) -> Router {
    Router::new()
        .route("/vegetable/add", post(add))
        .route("/vegetable/update", post(update))
        .route("/vegetable/delete", post(delete))
        .route("/vegetable/cost", post(cost))
        .route("/vegetable/receipt", post(receipt))
        .with_state(engine)
}

#[derive(Debug, Deserialize)]
struct PriceForm {
    id: String,
    name: String,
    price: Decimal,
}

#[derive(Debug, Deserialize)]
struct DeleteForm {
    id: String,
}

#[derive(Debug, Deserialize)]
struct CostForm {
    id: String,
    quantity: Decimal,
}

#[derive(Debug, Deserialize)]
struct ReceiptForm {
    cashier: String,
    #[serde(rename = "amountGiven")]
    amount_given: Decimal,
    items: String,
}

async fn add(
    State(engine): State<ComputeHandle>,
    Form(form): Form<PriceForm>,
) -> (StatusCode, String) {
    let task = Task::AddPrice(VegetablePrice::new(form.id, form.name, form.price));
    run(&engine, task).await
}

async fn update(
    State(engine): State<ComputeHandle>,
    Form(form): Form<PriceForm>,
) -> (StatusCode, String) {
    let task = Task::UpdatePrice(VegetablePrice::new(form.id, form.name, form.price));
    run(&engine, task).await
}

async fn delete(
    State(engine): State<ComputeHandle>,
    Form(form): Form<DeleteForm>,
) -> (StatusCode, String) {
    run(&engine, Task::DeletePrice { id: form.id }).await
}

async fn cost(
    State(engine): State<ComputeHandle>,
    Form(form): Form<CostForm>,
) -> (StatusCode, String) {
    let task = Task::ComputeCost {
        id: form.id,
        quantity_kg: form.quantity,
    };
    run(&engine, task).await
}

async fn receipt(
    State(engine): State<ComputeHandle>,
    Form(form): Form<ReceiptForm>,
) -> (StatusCode, String) {
    let mut items = IndexMap::new();
    for spec in form.items.split(',') {
        match ReceiptRequest::parse_item(spec) {
            Ok((id, qty)) => {
                items.insert(id, qty);
            }
            Err(message) => {
                return (StatusCode::BAD_REQUEST, format!("ERROR: {message}\n"));
            }
        }
    }

    let task = Task::ComputeReceipt(ReceiptRequest {
        items,
        amount_given: form.amount_given,
        cashier: form.cashier,
    });
    run(&engine, task).await
}

async fn run(engine: &ComputeHandle, task: Task) -> (StatusCode, String) {
    match engine.execute_task(task).await {
        Ok(outcome) => (StatusCode::OK, format!("{outcome}\n")),
        Err(error) => (StatusCode::BAD_GATEWAY, format!("ERROR: {error}\n")),
    }
}
