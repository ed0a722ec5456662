//! Mutation-guarded container types.
//!
//! All four containers share one contract: construction validates the
//! fully assembled candidate (seed plus default fill) against the
//! bound Schema Document, and every mutating operation validates
//! before it commits. A failing mutation leaves prior state unchanged,
//! so the visible state conforms to the schema at every externally
//! observable point.

mod list;
mod map;
mod record;
mod tuple;

pub use list::TypedList;
pub use map::TypedMap;
pub use record::{Record, Shape};
pub use tuple::TypedTuple;
