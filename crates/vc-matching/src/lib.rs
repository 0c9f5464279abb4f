//! # Runway VC Matching
//!
//! Searches the investor dataset for VCs that fit a startup: filter by location, stage,
//! investor type and cheque size, keep a reproducible share of the matches, and page through
//! the result.
//!
//! ## Public API
//!
//! - `VcMatcher`: holds the loaded dataset and runs searches.
//! - `VcQuery` / `VcFilter`: search parameters.
//! - `Page`: one page of results with navigation totals.
//! - `VcError`: the specific error types that can be returned from this crate.

pub mod dataset;
pub mod error;
pub mod filter;
pub mod page;
pub mod sample;

pub use dataset::{VcRecord, load_dataset, parse_dataset};
pub use error::VcError;
pub use filter::VcFilter;
pub use page::{PAGE_WINDOW, Page, page_window, paginate};
pub use sample::sample_percentage;

use rust_decimal::Decimal;
use std::path::Path;

/// A single search request.
#[derive(Debug, Clone, PartialEq)]
pub struct VcQuery {
    pub filter: VcFilter,
    /// Share of the matches to return, in percent.
    pub percentage: Decimal,
    /// 1-based.
    pub page: usize,
    pub per_page: usize,
}

/// Runs searches over an in-memory investor dataset.
#[derive(Debug, Clone)]
pub struct VcMatcher {
    records: Vec<VcRecord>,
    sample_seed: u64,
}

impl VcMatcher {
    pub fn new(records: Vec<VcRecord>, sample_seed: u64) -> Self {
        Self {
            records,
            sample_seed,
        }
    }

    pub fn from_path(path: &Path, sample_seed: u64) -> Result<Self, VcError> {
        Ok(Self::new(load_dataset(path)?, sample_seed))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Filters, samples and paginates, in that order.
    pub fn search(&self, query: &VcQuery) -> Result<Page<VcRecord>, VcError> {
        let matched = query.filter.apply(&self.records);
        let sampled = sample_percentage(matched, query.percentage, self.sample_seed);
        tracing::info!(
            returned = sampled.len(),
            percentage = %query.percentage,
            "Investor search complete."
        );
        paginate(sampled, query.page, query.per_page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn matcher() -> VcMatcher {
        let rows: Vec<String> = (1..=40)
            .map(|i| {
                let stage = if i % 2 == 0 { "Seed" } else { "Series A" };
                format!(r#"{{"Investor name": "Fund {i}", "Stage of investment": "{stage}"}}"#)
            })
            .collect();
        let records = parse_dataset(&format!("[{}]", rows.join(","))).unwrap();
        VcMatcher::new(records, 42)
    }

    #[test]
    fn search_filters_then_samples_then_pages() {
        let query = VcQuery {
            filter: VcFilter {
                stage: Some("seed".into()),
                ..VcFilter::default()
            },
            percentage: dec!(50),
            page: 1,
            per_page: 4,
        };
        let page = matcher().search(&query).unwrap();

        // 20 seed funds, half of them kept, four per page.
        assert_eq!(page.total_count, 10);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.items.len(), 4);
        assert!(
            page.items
                .iter()
                .all(|r| r.stage_of_investment.as_deref() == Some("Seed"))
        );
    }

    #[test]
    fn repeated_searches_agree() {
        let query = VcQuery {
            filter: VcFilter::default(),
            percentage: dec!(30),
            page: 2,
            per_page: 5,
        };
        let matcher = matcher();
        assert_eq!(matcher.search(&query).unwrap(), matcher.search(&query).unwrap());
    }
}
