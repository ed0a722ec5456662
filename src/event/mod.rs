//! Evented records: cross-instance property propagation.
//!
//! An `Evented` is a record-like container with an explicit
//! subscription list. `dlink` registers one-directional propagation;
//! `link` registers both directions, so a single call gives the
//! symmetric feel. Propagation rules:
//! - the local validated write commits first, then one propagation
//!   hop fires per matching subscription
//! - a hop is a no-op when the target's current value already equals
//!   the incoming value (idempotent convergence)
//! - a propagated write goes through the target's own full validation
//!   path but does not re-fire the target's links (single hop); a
//!   target-side failure surfaces as the triggering write's error
//!
//! Single-threaded by design: endpoints are `Rc`/`RefCell`, held
//! weakly by subscriptions so normal teardown is the only cleanup.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use serde_json::Value;

use crate::container::{Shape, TypedMap};
use crate::descriptor::Descriptor;
use crate::schema::{SchemaError, ValidationFailure};

/// A committed field change, passed to observers.
#[derive(Debug, Clone, PartialEq)]
pub struct Change {
    pub key: String,
    pub old: Option<Value>,
    pub new: Value,
}

type Observer = Rc<dyn Fn(&Change)>;

struct LinkEntry {
    source_key: String,
    target: Weak<RefCell<Inner>>,
    target_key: String,
}

struct Inner {
    record: TypedMap,
    links: Vec<LinkEntry>,
    observers: Vec<(String, Observer)>,
}

/// A validated record whose writes propagate along registered links.
#[derive(Clone)]
pub struct Evented {
    inner: Rc<RefCell<Inner>>,
}

impl Evented {
    /// Constructs from a shape's default table alone.
    pub fn new(shape: &Shape) -> Result<Self, SchemaError> {
        Self::bind(shape.clone().into_descriptor()?, None)
    }

    /// Constructs from a shape and a seed value.
    pub fn from_value(shape: &Shape, seed: Value) -> Result<Self, SchemaError> {
        Self::bind(shape.clone().into_descriptor()?, Some(seed))
    }

    /// Binds an already-built object descriptor.
    pub fn from_descriptor(descriptor: Descriptor) -> Result<Self, SchemaError> {
        Self::bind(descriptor, None)
    }

    fn bind(descriptor: Descriptor, seed: Option<Value>) -> Result<Self, SchemaError> {
        let record = match seed {
            Some(value) => TypedMap::from_value(descriptor, value)?,
            None => TypedMap::new(descriptor)?,
        };
        Ok(Self {
            inner: Rc::new(RefCell::new(Inner {
                record,
                links: Vec::new(),
                observers: Vec::new(),
            })),
        })
    }

    /// Registers one-directional propagation `localKey -> otherKey`.
    pub fn dlink(&self, local_key: impl Into<String>, other: &Evented, other_key: impl Into<String>) {
        self.inner.borrow_mut().links.push(LinkEntry {
            source_key: local_key.into(),
            target: Rc::downgrade(&other.inner),
            target_key: other_key.into(),
        });
    }

    /// Registers propagation in both directions with one call.
    pub fn link(&self, local_key: &str, other: &Evented, other_key: &str) {
        self.dlink(local_key, other, other_key);
        other.dlink(other_key, self, local_key);
    }

    /// Registers a change callback for one key. Observers run after a
    /// write commits and must not mutate the observed instance.
    pub fn observe(&self, key: impl Into<String>, callback: impl Fn(&Change) + 'static) {
        self.inner
            .borrow_mut()
            .observers
            .push((key.into(), Rc::new(callback)));
    }

    /// Validated write: commits locally, notifies observers, then
    /// fires one propagation hop per matching link.
    pub fn set(&self, key: &str, value: Value) -> Result<(), ValidationFailure> {
        self.commit(key, value.clone())?;
        self.propagate(key, &value)
    }

    /// Commits one validated write and notifies observers; no links fire.
    fn commit(&self, key: &str, value: Value) -> Result<(), ValidationFailure> {
        let change = {
            let mut inner = self.inner.borrow_mut();
            let old = inner.record.insert(key, value.clone())?;
            Change {
                key: key.to_string(),
                old,
                new: value,
            }
        };
        self.notify(&change);
        Ok(())
    }

    fn notify(&self, change: &Change) {
        // Snapshot so a callback can read the instance without
        // re-entering the borrow.
        let observers: Vec<Observer> = self
            .inner
            .borrow()
            .observers
            .iter()
            .filter(|(key, _)| key == &change.key)
            .map(|(_, callback)| Rc::clone(callback))
            .collect();
        for callback in observers {
            callback(change);
        }
    }

    fn propagate(&self, key: &str, value: &Value) -> Result<(), ValidationFailure> {
        let targets: Vec<(Rc<RefCell<Inner>>, String)> = self
            .inner
            .borrow()
            .links
            .iter()
            .filter(|entry| entry.source_key == key)
            .filter_map(|entry| {
                entry
                    .target
                    .upgrade()
                    .map(|target| (target, entry.target_key.clone()))
            })
            .collect();

        for (target, target_key) in targets {
            let converged = target.borrow().record.get(&target_key) == Some(value);
            if converged {
                continue;
            }
            let target = Evented { inner: target };
            target.commit(&target_key, value.clone())?;
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.borrow().record.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.inner.borrow().record.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.borrow().record.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.borrow().record.is_empty()
    }

    pub fn to_value(&self) -> Value {
        self.inner.borrow().record.to_value()
    }
}
