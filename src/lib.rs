//! ibexwatch — IBEX 35 signal engine.
//!
//! Fetches recent daily bars for a fixed equity universe, derives a set of
//! technical indicators per symbol, condenses the latest values into a
//! bounded signal score, and serves the most recent evaluation over HTTP
//! from a cache that refreshes once a day (and lazily when stale).

pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod signals;
