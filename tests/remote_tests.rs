use std::net::SocketAddr;
use std::sync::Arc;

use greengrocer::client::EngineClient;
use greengrocer::engine::{Compute, ComputeEngine, ComputeHandle};
use greengrocer::outcome::{Rejection, TaskOutcome};
use greengrocer::server::EngineServer;
use greengrocer::table::PriceTable;
use greengrocer::task::Task;
use greengrocer::vegetable::VegetablePrice;
use greengrocer::wire::Response;
use rust_decimal_macros::dec;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

async fn start_engine() -> SocketAddr {
    let table = Arc::new(PriceTable::seeded());
    let engine: ComputeHandle = Arc::new(ComputeEngine::new(table));
    let server = EngineServer::bind("127.0.0.1:0".parse().unwrap(), engine)
        .await
        .unwrap();
    let addr = server.local_addr().unwrap();
    tokio::spawn(server.run());
    addr
}

#[tokio::test]
async fn a_task_round_trips_over_tcp() {
    let addr = start_engine().await;
    let client = EngineClient::connect(addr).await.unwrap();

    let outcome = client
        .execute_task(Task::ComputeCost {
            id: "V001".into(),
            quantity_kg: dec!(3.5),
        })
        .await
        .unwrap();

    let TaskOutcome::Cost(cost) = outcome else {
        panic!("expected a cost, got {outcome:?}");
    };
    assert_eq!(cost.total, dec!(210.00));
    assert_eq!(cost.name, "Tomato");
}

#[tokio::test]
async fn one_connection_carries_many_tasks_in_order() {
    let addr = start_engine().await;
    let client = EngineClient::connect(addr).await.unwrap();

    let outcome = client
        .execute_task(Task::AddPrice(VegetablePrice::new(
            "V006",
            "Broccoli",
            dec!(80.00),
        )))
        .await
        .unwrap();
    assert!(matches!(outcome, TaskOutcome::Added { .. }));

    let outcome = client
        .execute_task(Task::ComputeCost {
            id: "V006".into(),
            quantity_kg: dec!(2.0),
        })
        .await
        .unwrap();
    let TaskOutcome::Cost(cost) = outcome else {
        panic!("expected a cost, got {outcome:?}");
    };
    assert_eq!(cost.total, dec!(160.00));
}

#[tokio::test]
async fn a_malformed_frame_does_not_kill_the_session() {
    let addr = start_engine().await;
    let stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    write_half.write_all(b"this is not json\n").await.unwrap();

    let mut line = String::new();
    reader.read_line(&mut line).await.unwrap();
    let response: Response = serde_json::from_str(line.trim_end()).unwrap();
    let Response::Error { message } = response else {
        panic!("expected an error response, got {response:?}");
    };
    assert!(message.starts_with("malformed task:"));

    // The same connection still serves well-formed tasks.
    let task = serde_json::to_string(&Task::DeletePrice { id: "V005".into() }).unwrap();
    write_half.write_all(task.as_bytes()).await.unwrap();
    write_half.write_all(b"\n").await.unwrap();

    line.clear();
    reader.read_line(&mut line).await.unwrap();
    let response: Response = serde_json::from_str(line.trim_end()).unwrap();
    assert!(matches!(
        response,
        Response::Outcome(TaskOutcome::Deleted { .. })
    ));
}

#[tokio::test]
async fn two_clients_race_for_one_id() {
    let addr = start_engine().await;
    let first = EngineClient::connect(addr).await.unwrap();
    let second = EngineClient::connect(addr).await.unwrap();

    let item = VegetablePrice::new("V200", "Pumpkin", dec!(35.00));
    let (a, b) = tokio::join!(
        first.execute_task(Task::AddPrice(item.clone())),
        second.execute_task(Task::AddPrice(item)),
    );

    let outcomes = [a.unwrap(), b.unwrap()];
    let added = outcomes
        .iter()
        .filter(|o| matches!(o, TaskOutcome::Added { .. }))
        .count();
    let rejected = outcomes
        .iter()
        .filter(|o| {
            matches!(
                o,
                TaskOutcome::Rejected {
                    reason: Rejection::DuplicateId { .. }
                }
            )
        })
        .count();
    assert_eq!(added, 1);
    assert_eq!(rejected, 1);
}
