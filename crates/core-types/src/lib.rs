//! # Runway Core Types
//!
//! The plain data the rest of the workspace passes around: the inputs of the two calculators
//! and the record kinds they are stored under. This crate holds no behaviour beyond keeping
//! cost-of-goods-sold lines consistent.

pub mod enums;
pub mod error;
pub mod unit_economics;
pub mod valuation;

// Re-export the core types to provide a clean public API.
pub use enums::RecordKind;
pub use error::CoreError;
pub use unit_economics::{CostOfGoodsSold, DEFAULT_CATEGORY, UnitEconomicsInputs};
pub use valuation::ValuationInputs;
