use clap::{Parser, Subcommand};
use greengrocer::client::EngineClient;
use greengrocer::engine::Compute;
use greengrocer::logging;
use greengrocer::outcome::TaskOutcome;
use greengrocer::reader::PriceReader;
use greengrocer::task::{ReceiptRequest, Task};
use greengrocer::vegetable::VegetablePrice;
use indexmap::IndexMap;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::fs::File;
use std::io::Write as _;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Engine address to connect to
    #[arg(long, default_value = "127.0.0.1:7878")]
    addr: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new vegetable price
    Add {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        /// Price per kg in KES
        #[arg(long)]
        price: Decimal,
    },
    /// Update an existing vegetable price
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        /// Price per kg in KES
        #[arg(long)]
        price: Decimal,
    },
    /// Delete a vegetable price
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Calculate the cost of a quantity of one vegetable
    Cost {
        #[arg(long)]
        id: String,
        /// Quantity in kg
        #[arg(long)]
        qty: Decimal,
    },
    /// Generate a receipt for a basket
    Receipt {
        #[arg(long)]
        cashier: String,
        /// Amount handed over in KES
        #[arg(long)]
        amount: Decimal,
        /// Basket item as ID:QTY, repeatable
        #[arg(long = "item")]
        items: Vec<String>,
    },
    /// Add prices from a CSV file with an id,name,price_per_kg header
    Import { file: PathBuf },
    /// Run the scripted tour of every task
    Demo,
    /// Interactive menu, one task per round
    Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init("warn");

    let client = EngineClient::connect(&cli.addr).await.into_diagnostic()?;

    match cli.command {
        Commands::Add { id, name, price } => {
            run_task(&client, Task::AddPrice(VegetablePrice::new(id, name, price))).await?;
        }
        Commands::Update { id, name, price } => {
            run_task(&client, Task::UpdatePrice(VegetablePrice::new(id, name, price))).await?;
        }
        Commands::Delete { id } => {
            run_task(&client, Task::DeletePrice { id }).await?;
        }
        Commands::Cost { id, qty } => {
            run_task(&client, Task::ComputeCost { id, quantity_kg: qty }).await?;
        }
        Commands::Receipt {
            cashier,
            amount,
            items,
        } => {
            let mut basket = IndexMap::new();
            for spec in &items {
                let (id, qty) = ReceiptRequest::parse_item(spec).map_err(|m| miette::miette!(m))?;
                basket.insert(id, qty);
            }
            let request = ReceiptRequest {
                items: basket,
                amount_given: amount,
                cashier,
            };
            run_task(&client, Task::ComputeReceipt(request)).await?;
        }
        Commands::Import { file } => {
            let source = File::open(&file).into_diagnostic()?;
            let reader = PriceReader::new(source);
            let mut added = 0usize;
            for result in reader.prices() {
                match result {
                    Ok(price) => {
                        let outcome = run_task(&client, Task::AddPrice(price)).await?;
                        if matches!(outcome, TaskOutcome::Added { .. }) {
                            added += 1;
                        }
                    }
                    Err(error) => {
                        eprintln!("Error reading price: {}", error);
                    }
                }
            }
            println!("Imported {added} prices.");
        }
        Commands::Demo => run_demo(&client).await?,
        Commands::Shell => run_shell(&client).await?,
    }

    Ok(())
}

async fn run_task(client: &EngineClient, task: Task) -> Result<TaskOutcome> {
    let outcome = client.execute_task(task).await.into_diagnostic()?;
    println!("{outcome}");
    Ok(outcome)
}

/// The scripted session: one task of each kind against a freshly seeded
/// engine, in a fixed order.
async fn run_demo(client: &EngineClient) -> Result<()> {
    println!("[TASK 1] Add V006 Broccoli @ KES 80.00/kg");
    run_task(
        client,
        Task::AddPrice(VegetablePrice::new("V006", "Broccoli", dec!(80.00))),
    )
    .await?;

    println!("\n[TASK 2] Update V001 Tomato to KES 75.00/kg");
    run_task(
        client,
        Task::UpdatePrice(VegetablePrice::new("V001", "Tomato", dec!(75.00))),
    )
    .await?;

    println!("\n[TASK 3] Delete V003");
    run_task(client, Task::DeletePrice { id: "V003".into() }).await?;

    println!("\n[TASK 4] Cost of 3.5 kg of V002");
    run_task(
        client,
        Task::ComputeCost {
            id: "V002".into(),
            quantity_kg: dec!(3.5),
        },
    )
    .await?;

    println!("\n[TASK 5] Receipt for a small basket");
    let mut items = IndexMap::new();
    items.insert("V001".to_string(), dec!(2.0));
    items.insert("V002".to_string(), dec!(1.5));
    items.insert("V004".to_string(), dec!(1.0));
    run_task(
        client,
        Task::ComputeReceipt(ReceiptRequest {
            items,
            amount_given: dec!(500.00),
            cashier: "Alice".into(),
        }),
    )
    .await?;

    Ok(())
}

async fn run_shell(client: &EngineClient) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        println!();
        println!("===== VEGETABLE MARKET CLIENT =====");
        println!("1. Add vegetable price");
        println!("2. Update vegetable price");
        println!("3. Delete vegetable price");
        println!("4. Calculate cost");
        println!("5. Generate receipt");
        println!("0. Exit");
        let Some(choice) = prompt(&mut lines, "Choose an option: ").await? else {
            return Ok(());
        };

        match choice.trim() {
            "0" => return Ok(()),
            "1" => {
                if let Some(item) = read_price(&mut lines).await? {
                    run_task(client, Task::AddPrice(item)).await?;
                }
            }
            "2" => {
                if let Some(item) = read_price(&mut lines).await? {
                    run_task(client, Task::UpdatePrice(item)).await?;
                }
            }
            "3" => {
                if let Some(id) = prompt(&mut lines, "Vegetable ID: ").await? {
                    run_task(
                        client,
                        Task::DeletePrice {
                            id: id.trim().to_string(),
                        },
                    )
                    .await?;
                }
            }
            "4" => {
                if let Some(task) = read_cost(&mut lines).await? {
                    run_task(client, task).await?;
                }
            }
            "5" => {
                if let Some(request) = read_receipt(&mut lines).await? {
                    run_task(client, Task::ComputeReceipt(request)).await?;
                }
            }
            other => println!("Unknown option '{other}'."),
        }
    }
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, text: &str) -> Result<Option<String>> {
    print!("{text}");
    std::io::stdout().flush().into_diagnostic()?;
    lines.next_line().await.into_diagnostic()
}

async fn read_price(lines: &mut Lines<BufReader<Stdin>>) -> Result<Option<VegetablePrice>> {
    let Some(id) = prompt(lines, "Vegetable ID: ").await? else {
        return Ok(None);
    };
    let Some(name) = prompt(lines, "Vegetable name: ").await? else {
        return Ok(None);
    };
    let Some(price) = prompt(lines, "Price per kg (KES): ").await? else {
        return Ok(None);
    };
    let Ok(price) = price.trim().parse::<Decimal>() else {
        println!("Invalid price '{}'.", price.trim());
        return Ok(None);
    };
    Ok(Some(VegetablePrice::new(id.trim(), name.trim(), price)))
}

async fn read_cost(lines: &mut Lines<BufReader<Stdin>>) -> Result<Option<Task>> {
    let Some(id) = prompt(lines, "Vegetable ID: ").await? else {
        return Ok(None);
    };
    let Some(qty) = prompt(lines, "Quantity (kg): ").await? else {
        return Ok(None);
    };
    let Ok(quantity_kg) = qty.trim().parse::<Decimal>() else {
        println!("Invalid quantity '{}'.", qty.trim());
        return Ok(None);
    };
    Ok(Some(Task::ComputeCost {
        id: id.trim().to_string(),
        quantity_kg,
    }))
}

async fn read_receipt(lines: &mut Lines<BufReader<Stdin>>) -> Result<Option<ReceiptRequest>> {
    let mut items = IndexMap::new();
    loop {
        let Some(entry) = prompt(lines, "Item as ID:QTY (or 'done'): ").await? else {
            return Ok(None);
        };
        let entry = entry.trim();
        if entry.eq_ignore_ascii_case("done") {
            break;
        }
        if entry.is_empty() {
            continue;
        }
        match ReceiptRequest::parse_item(entry) {
            Ok((id, qty)) => {
                items.insert(id, qty);
            }
            Err(message) => println!("{message}"),
        }
    }
    if items.is_empty() {
        println!("No items entered.");
        return Ok(None);
    }

    let Some(amount) = prompt(lines, "Amount given (KES): ").await? else {
        return Ok(None);
    };
    let Ok(amount_given) = amount.trim().parse::<Decimal>() else {
        println!("Invalid amount '{}'.", amount.trim());
        return Ok(None);
    };
    let Some(cashier) = prompt(lines, "Cashier name: ").await? else {
        return Ok(None);
    };

    Ok(Some(ReceiptRequest {
        items,
        amount_given,
        cashier: cashier.trim().to_string(),
    }))
}
