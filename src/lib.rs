pub mod client;
pub mod engine;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod money;
pub mod outcome;
pub mod reader;
pub mod server;
pub mod table;
pub mod task;
pub mod vegetable;
pub mod wire;
