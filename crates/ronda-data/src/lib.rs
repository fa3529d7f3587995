//! Market data acquisition and storage for the ronda pipeline.
//!
//! Two ways in: an HTTP [`ProviderClient`] against an FMP-style REST API,
//! and a [`CsvProvider`] reading local fixtures. Both sit behind the
//! [`DataProvider`] trait so the pipeline does not care which it got.
//!
//! # Environment Variables
//!
//! The HTTP client reads `RONDA_API_KEY` from the environment or a `.env`
//! file:
//!
//! ```bash
//! RONDA_API_KEY=your_api_key_here
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

mod client;
pub mod csv;
mod error;
mod provider;
mod types;

pub use client::ProviderClient;
pub use error::ProviderError;
pub use provider::{CsvProvider, DataProvider};
pub use types::*;
