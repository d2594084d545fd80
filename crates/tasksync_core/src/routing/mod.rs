//! Task classification and distribution.
//!
//! # Responsibility
//! - Resolve the classification tag and the current user's role per task.
//! - Split the personal pool into project buckets and an unmatched residual.
//!
//! # Invariants
//! - Tag matching is exact and case-sensitive.
//! - Bucket order follows the project registry order, never hash order.

pub mod resolver;
pub mod router;
