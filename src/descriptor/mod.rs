//! Type Descriptor subsystem: classifiers and the combinator algebra.
//!
//! Descriptors are immutable value objects. `union` widens acceptance
//! to "any of these"; `refine` narrows it with extra schema keywords.
//! Every descriptor renders a canonical Schema Document, memoized per
//! descriptor identity.

mod constraint;
mod synth;
mod types;

pub use constraint::Constraint;
pub use types::{Additional, Descriptor, Field};
