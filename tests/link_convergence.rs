//! Link Convergence Tests
//!
//! Invariants of the evented link layer:
//! - Linked properties converge to the last written value
//! - Propagation terminates (equality short-circuit, single hop)
//! - Propagated writes are validated by the receiving instance
//! - A local commit stands even when propagation fails downstream

use schemaguard::container::Shape;
use schemaguard::descriptor::Descriptor;
use schemaguard::event::{Change, Evented};
use serde_json::json;
use std::cell::Cell;
use std::rc::Rc;

// =============================================================================
// Helper Functions
// =============================================================================

fn open_evented() -> Evented {
    Evented::new(&Shape::new()).unwrap()
}

// =============================================================================
// Convergence Tests
// =============================================================================

/// Writes on either side of a link land on both sides.
#[test]
fn test_linked_properties_converge() {
    let e = open_evented();
    let d = open_evented();
    e.link("a", &d, "b");

    e.set("a", json!(1)).unwrap();
    assert_eq!(d.get("b"), Some(json!(1)));

    d.set("b", json!(10)).unwrap();
    assert_eq!(e.get("a"), Some(json!(10)));
    assert_eq!(d.get("b"), Some(json!(10)));
}

/// A chain of links settles in one pass without cycling.
#[test]
fn test_link_chain_terminates() {
    let a = open_evented();
    let b = open_evented();
    let c = open_evented();
    a.link("x", &b, "x");
    b.link("x", &c, "x");

    let hops = Rc::new(Cell::new(0u32));
    for node in [&a, &b, &c] {
        let counter = Rc::clone(&hops);
        node.observe("x", move |_| counter.set(counter.get() + 1));
    }

    // Propagation is one hop deep: b converges immediately, c after
    // the next write through b.
    a.set("x", json!(1)).unwrap();
    assert_eq!(a.get("x"), Some(json!(1)));
    assert_eq!(b.get("x"), Some(json!(1)));

    b.set("x", json!(1)).unwrap();
    assert_eq!(c.get("x"), Some(json!(1)));

    // bounded: no runaway notification storm
    assert!(hops.get() <= 4);
}

/// Re-writing the current value triggers no downstream write.
#[test]
fn test_converged_write_is_quiet() {
    let e = open_evented();
    let d = open_evented();
    e.link("a", &d, "b");

    let writes = Rc::new(Cell::new(0u32));
    let counter = Rc::clone(&writes);
    d.observe("b", move |_| counter.set(counter.get() + 1));

    for _ in 0..100 {
        e.set("a", json!(42)).unwrap();
    }
    assert_eq!(writes.get(), 1);
}

// =============================================================================
// Validation Tests
// =============================================================================

/// The receiving side validates propagated values with its own schema.
#[test]
fn test_propagation_respects_target_schema() {
    let e = open_evented();
    let strict = Shape::new().field_with_default("b", Descriptor::integer(), json!(0));
    let d = Evented::new(&strict).unwrap();
    e.dlink("a", &d, "b");

    e.set("a", json!(5)).unwrap();
    assert_eq!(d.get("b"), Some(json!(5)));

    let err = e.set("a", json!("five")).unwrap_err();
    assert_eq!(err.path, "b");
    // local write committed, target held its last valid value
    assert_eq!(e.get("a"), Some(json!("five")));
    assert_eq!(d.get("b"), Some(json!(5)));
}

/// An invalid local write never reaches the link layer.
#[test]
fn test_invalid_local_write_propagates_nothing() {
    let strict = Shape::new().field_with_default("a", Descriptor::integer(), json!(0));
    let e = Evented::new(&strict).unwrap();
    let d = open_evented();
    e.dlink("a", &d, "b");

    assert!(e.set("a", json!("bad")).is_err());
    assert_eq!(d.get("b"), None);
}

// =============================================================================
// Observer Tests
// =============================================================================

/// Observers fire once per committed change with old and new values.
#[test]
fn test_observers_receive_committed_changes() {
    let shape = Shape::new().field_with_default("n", Descriptor::integer(), json!(0));
    let e = Evented::new(&shape).unwrap();

    let seen: Rc<std::cell::RefCell<Vec<Change>>> = Rc::default();
    let sink = Rc::clone(&seen);
    e.observe("n", move |change| sink.borrow_mut().push(change.clone()));

    e.set("n", json!(1)).unwrap();
    assert!(e.set("n", json!("bad")).is_err());
    e.set("n", json!(2)).unwrap();

    let changes = seen.borrow();
    assert_eq!(changes.len(), 2);
    assert_eq!(changes[0].old, Some(json!(0)));
    assert_eq!(changes[0].new, json!(1));
    assert_eq!(changes[1].old, Some(json!(1)));
    assert_eq!(changes[1].new, json!(2));
}

/// A dropped link endpoint leaves the surviving side fully usable.
#[test]
fn test_dropped_endpoint_is_inert() {
    let e = open_evented();
    {
        let d = open_evented();
        e.link("a", &d, "b");
        e.set("a", json!(1)).unwrap();
        assert_eq!(d.get("b"), Some(json!(1)));
    }
    e.set("a", json!(2)).unwrap();
    assert_eq!(e.get("a"), Some(json!(2)));
}
