//! Decision-and-metrics engine for reverse-logistics return simulations.
//!
//! A `Dashboard` owns one `ReturnDataset` (records plus one decision slot
//! each). Recovery, filter and metrics functions are pure reads over that
//! dataset; all mutation goes through `Dashboard::apply`.

pub mod command;
pub mod config;
pub mod dashboard;
pub mod dataset;
pub mod decision;
pub mod error;
pub mod event;
pub mod filter;
pub mod metrics;
pub mod record;
pub mod recovery;
pub mod report;
pub mod rng;
pub mod sample;
pub mod store;
pub mod types;
