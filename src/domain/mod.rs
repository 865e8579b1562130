//! Core domain types and logic: conditions, the simulation loop, and the review.

pub mod condition;
pub mod config_validation;
pub mod error;
pub mod metrics;
pub mod portfolio;
pub mod price;
pub mod report;
pub mod rule_eval;
pub mod simulation;
pub mod strategy;
pub mod transaction;
pub mod workshop;
