//! # Catalog
//!
//! Articles and authors, and the relationship between them.
//!
//! - `articles` / `authors`: thin repositories over the document store.
//! - `coordinator`: the `Catalog` service. Every write that touches both entities goes
//!   through it, because the store keeps no foreign keys. The article's `author`
//!   field is authoritative and the author's `articles` list is a derived index.
//! - `audit`: a read-only scan reporting where the two sides disagree.

pub mod articles;
pub mod audit;
pub mod authors;
pub mod coordinator;

pub use audit::{AuditReport, IntegrityIssue};
pub use coordinator::Catalog;
