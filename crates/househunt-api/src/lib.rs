// househunt-api: Async Rust client for the househunt listings REST API

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::HouseClient;
pub use error::Error;
pub use transport::HttpSettings;
pub use types::{DiscoveryDto, HouseDto, InsertedDto, NewHouseDto, UpdateHouseDto};
