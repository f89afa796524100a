//! Procura
//!
//! Procura normalises vendor quotes into a single accounting currency, keeps
//! an append-only history of every price change, compares vendors per
//! product and fires price alerts when a watched product gets cheap enough.

pub mod alerts;
pub mod clock;
pub mod comparison;
pub mod conversion;
pub mod cost;
pub mod currency;
pub mod engine;
pub mod errors;
pub mod fixtures;
pub mod history;
pub mod ids;
pub mod lists;
pub mod models;
pub mod prelude;
pub mod report;
pub mod store;
