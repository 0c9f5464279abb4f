//! # Runway Database Crate
//!
//! This crate is the persistence collaborator of the calculators: it stores each user's
//! valuation and unit-economics inputs so they survive between sessions.
//!
//! ## Architectural Principles
//!
//! - **Injected, Not Implicit:** the engines in `analytics` never persist anything. Callers
//!   load a record, run a calculation, and save the record through a `RecordStore`.
//! - **Adapter:** `DbRepository` hides the SQL behind the trait; `InMemoryStore` implements the
//!   same contract for tests and throwaway sessions.
//! - **Asynchronous & Pooled:** all operations are asynchronous, and PostgreSQL access goes
//!   through a connection pool (`PgPool`).
//!
//! ## Public API
//!
//! - `connect` / `run_migrations`: establish the pool and bring the schema up to date.
//! - `RecordStore`: load/save contract with typed helpers for both calculators.
//! - `DbRepository`, `InMemoryStore`: the two stores.
//! - `UnitEconomicsRecord`: inputs plus the last computed snapshot, stored together.
//! - `DbError`: the specific error types that can be returned from this crate.

// Declare the modules that constitute this crate.
pub mod connection;
pub mod error;
pub mod memory;
pub mod records;
pub mod repository;
pub mod store;

// Re-export the key components to create a clean, public-facing API.
pub use connection::{connect, run_migrations};
pub use error::DbError;
pub use memory::InMemoryStore;
pub use records::{UnitEconomicsRecord, onboarding_records};
pub use repository::DbRepository;
pub use store::RecordStore;
