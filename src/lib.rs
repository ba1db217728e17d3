//! Kelly-criterion trade sizing for constant-product binary prediction markets.
//!
//! This crate is the pure numeric core of a betting agent: callers fetch a
//! market snapshot and their current position elsewhere (HTTP, subgraph,
//! on-chain), then ask a strategy for the trade, if any, that maximizes
//! expected log-growth of bankroll. Every entry point is synchronous,
//! side-effect free and deterministic for a given set of inputs.

pub mod amm;
pub mod data;
pub mod errors;
pub mod strategy;
