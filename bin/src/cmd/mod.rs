//! CLI subcommand modules.
//!
//! This module contains the implementations for all ronda CLI subcommands.

pub(crate) mod backtest;
pub(crate) mod features;
pub(crate) mod predict;
pub(crate) mod run;
pub(crate) mod train;
