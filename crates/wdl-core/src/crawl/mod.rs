//! Breadth-first discovery of downloadable files.
//!
//! [`PageVisitor`] turns one fetched page into file URLs and further
//! crawlable links; [`DomainWalk`] drives visits outward from a seed and
//! lazily yields every newly discovered file URL.

mod visit;
mod walk;

#[cfg(test)]
pub(crate) mod testutil;

pub use visit::{PageRules, PageVisitor, VisitOptions};
pub use walk::DomainWalk;
