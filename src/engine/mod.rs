//! Price engine

pub mod data;
pub mod service;

pub use data::{NewQuote, NewVendor, PriceChange, QuoteTerms};
pub use service::PriceEngine;
