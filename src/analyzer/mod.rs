//! Analyzer module - risk scoring engine

pub mod engine;
pub mod rules;
pub mod scoring;

pub use engine::{calculate_risk, AggregateStats, RiskEngine};
pub use scoring::ScoreCalculator;
