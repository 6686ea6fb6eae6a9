//! Core library for the carry-monitor project.
//!
//! Turns dollar-futures quotes into annualized implied devaluation rates,
//! compares them with the caución funding rate and flags Cash & Carry or
//! Reverse opportunities after execution frictions.

pub mod aggregator;
pub mod arbitrage;
pub mod config;
pub mod errors;
pub mod models;
pub mod sources;
pub mod utils;
