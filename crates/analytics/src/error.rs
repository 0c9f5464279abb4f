use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsError {
    /// The metric left the representable decimal range (e.g. a discount rate of exactly -100%).
    #[error("Metric '{metric}' is not finite for the given inputs")]
    NonFinite { metric: &'static str },

    #[error("A {years}-year projection exceeds the {max}-year limit")]
    HorizonTooLong { years: u32, max: u32 },
}
