//! schemaguard: a strict, composable runtime type/schema engine.
//!
//! Type descriptors are built from a small combinator algebra (scalars,
//! objects, arrays, tuples, unions, refinements) and synthesize a
//! canonical Schema Document exactly once per descriptor identity.
//! Containers bound to a descriptor validate every candidate state
//! before committing it, so no observable state ever violates its
//! schema. On top of that sit evented records with cross-instance
//! property links and a configuration binder over pluggable readers.
//!
//! Module structure:
//! - `schema`: the Schema Document model, the validator, and the
//!   validation/definition error split
//! - `descriptor`: the descriptor algebra, refinement constraints, and
//!   document synthesis
//! - `container`: mutation-guarded map, record, list, and tuple types
//! - `event`: evented records with linked property propagation
//! - `config`: binding external configuration to declared shapes
//! - `observability`: structured JSON logging

pub mod config;
pub mod container;
pub mod descriptor;
pub mod event;
pub mod observability;
pub mod schema;
