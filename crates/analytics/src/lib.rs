//! # Runway Analytics Engine
//!
//! This crate computes the derived financial metrics of the advisory tool: a discounted-cash-flow
//! valuation with a WACC discount rate, and the unit-economics margin, LTV and LTV:CAC figures.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** This crate has no knowledge of storage, the CLI or the network. It depends
//!   only on `core-types`.
//! - **Stateless Calculation:** `MetricsEngine` takes the inputs (and, for the incremental
//!   unit-economics update, the caller's prior snapshot) and returns new values. Persisting
//!   anything is the caller's job.
//! - **Explicit Partial Updates:** metrics that are only recomputed under some conditions are
//!   `Option`s in `UnitEconomicsResult`, never silently stale numbers.
//!
//! ## Public API
//!
//! - `MetricsEngine`: the calculator.
//! - `ValuationResult`, `ProjectedYear`: valuation output.
//! - `UnitEconomicsResult`, `UnitEconomicsSnapshot`: unit-economics output and caller-owned state.
//! - `AnalyticsError`: returned when a metric leaves the representable decimal range or the
//!   projection horizon is too long.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::{EQUITY_BETA, MAX_PROJECTION_YEARS, MetricsEngine, RISK_FREE_RATE};
pub use error::AnalyticsError;
pub use report::{ProjectedYear, UnitEconomicsResult, UnitEconomicsSnapshot, ValuationResult};
