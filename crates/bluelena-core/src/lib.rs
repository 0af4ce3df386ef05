#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
mod payload;

pub mod store;
pub mod types;

pub use error::{BoxedError, Error, ErrorKind, Result};
pub use payload::{OrderPayload, PayloadBuilder};
pub use store::{MemoryOrderStore, MemorySettingsStore, OrderStore, SettingsStore};
pub use types::{
    Attribution, DeliveryOutcome, Identifier, LineItem, OrderId, OrderRecord, ProductId, Settings,
    SyncRequest,
};

/// Tracing target for core store operations.
pub const TRACING_TARGET_STORE: &str = "bluelena_core::store";
