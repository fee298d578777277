#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/dcf/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Fair value per share from a two-stage DCF and WACC model.
//!
//! This crate re-exports the core types, the valuation engine, the cache
//! implementations and the providers, and provides a [`MarketDataRegistry`]
//! for combining providers with automatic fallback.
//!
//! # Features
//!
//! - `yahoo` - Yahoo Finance provider for cash flows, fundamentals and Treasury yields
//!
//! # Example
//!
//! ```rust,ignore
//! use dcf::{MarketDataRegistry, ValuationAssumptions, parse_ticker_list};
//!
//! #[tokio::main]
//! async fn main() -> dcf::Result<()> {
//!     let engine = MarketDataRegistry::new().with_yahoo().into_engine();
//!
//!     let report = engine
//!         .value(&"AAPL".into(), &ValuationAssumptions::default(), None)
//!         .await?;
//!     println!("{report}");
//!
//!     let batch = engine
//!         .value_batch(&parse_ticker_list("AAPL, MSFT, GOOG"), &ValuationAssumptions::batch())
//!         .await;
//!     batch.write_parquet("valuations.parquet")?;
//!
//!     Ok(())
//! }
//! ```

// Core types and traits
pub use dcf_core::*;

// Valuation engine
pub use dcf_valuation::*;

// Cache implementations
pub use dcf_cache::{InMemoryCache, NoopCache};

// Providers
#[cfg(feature = "yahoo")]
pub use dcf_yahoo::YahooProvider;

mod registry;
pub use registry::MarketDataRegistry;
