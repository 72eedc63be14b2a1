//! Change notification for application state.
//!
//! A [`Model`] describes its observable state as a [`Snapshot`] of named
//! values. Each [`tick`](Model::tick) updates the model and its children,
//! then compares the new snapshot with the previous one and notifies
//! observers at most once, however many mutations happened in between.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};

/// An ordered set of named state values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    /// Attributes in insertion order.
    attrs: Vec<(String, Value)>,
}

impl Snapshot {
    /// An empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an attribute.
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.set(name, value.into());
        self
    }

    /// Add or replace an attribute from any serializable value.
    pub fn try_with<T: Serialize>(mut self, name: &str, value: &T) -> Result<Self> {
        let value = serde_json::to_value(value)
            .map_err(|e| Error::Internal(format!("snapshot attribute {name}: {e}")))?;
        self.set(name, value);
        Ok(self)
    }

    /// Store an attribute.
    fn set(&mut self, name: &str, value: Value) {
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some((_, v)) => *v = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    /// The value of an attribute.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.attrs.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Attribute names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attrs.iter().map(|(n, _)| n.as_str())
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Are there no attributes?
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.attrs.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}: {value}")?;
        }
        f.write_str("}")
    }
}

/// The difference between two consecutive snapshots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChange {
    /// The previous snapshot. `None` on the first notification.
    pub before: Option<Snapshot>,
    /// The current snapshot.
    pub after: Snapshot,
}

impl StateChange {
    /// Did the attribute change? Every attribute counts as changed on the
    /// first notification. Attributes missing from `after` never do.
    pub fn changed(&self, attr: &str) -> bool {
        let Some(now) = self.after.get(attr) else {
            return false;
        };
        match &self.before {
            None => true,
            Some(before) => before.get(attr) != Some(now),
        }
    }

    /// Names of changed attributes, in snapshot order.
    pub fn changed_attrs(&self) -> Vec<&str> {
        self.after.names().filter(|n| self.changed(n)).collect()
    }
}

/// Something that wants to hear about state changes.
pub trait Observer {
    /// Called once per tick in which the subject's state changed.
    fn notify(&mut self, change: &StateChange);
}

impl<F> Observer for F
where
    F: FnMut(&StateChange),
{
    fn notify(&mut self, change: &StateChange) {
        self(change);
    }
}

/// Observer list plus the last published snapshot.
#[derive(Default)]
pub struct Subject {
    /// Registered observers.
    observers: Vec<Box<dyn Observer>>,
    /// Snapshot from the last notification.
    previous: Option<Snapshot>,
}

impl Subject {
    /// A subject with no observers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer.
    pub fn add_observer(&mut self, observer: impl Observer + 'static) {
        self.observers.push(Box::new(observer));
    }

    /// Number of observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// The last published snapshot.
    pub fn previous(&self) -> Option<&Snapshot> {
        self.previous.as_ref()
    }

    /// Publish a snapshot. Observers are notified only if it differs from
    /// the previous one. Returns whether a notification went out.
    pub fn sync(&mut self, snapshot: Snapshot) -> bool {
        if self.previous.as_ref() == Some(&snapshot) {
            return false;
        }
        let change = StateChange {
            before: self.previous.take(),
            after: snapshot,
        };
        for observer in &mut self.observers {
            observer.notify(&change);
        }
        self.previous = Some(change.after);
        true
    }
}

impl fmt::Debug for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subject")
            .field("observers", &self.observers.len())
            .field("previous", &self.previous)
            .finish()
    }
}

/// An observable piece of application state, possibly with nested models.
pub trait Model {
    /// The model's subject.
    fn subject_mut(&mut self) -> &mut Subject;

    /// The current observable state.
    fn state(&self) -> Snapshot;

    /// Per-tick update hook.
    fn update(&mut self) {}

    /// Nested models, ticked after this model's update.
    fn children_mut(&mut self) -> Vec<&mut dyn Model> {
        Vec::new()
    }

    /// Update this model, tick its children, then publish state once.
    fn tick(&mut self) {
        self.update();
        for child in self.children_mut() {
            child.tick();
        }
        let state = self.state();
        self.subject_mut().sync(state);
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::RefCell, rc::Rc};

    use pretty_assertions::assert_eq;

    use super::*;

    /// A score with a nested clock model.
    #[derive(Default)]
    struct Score {
        subject: Subject,
        a: i64,
        b: i64,
        clock: Ticks,
    }

    #[derive(Default)]
    struct Ticks {
        subject: Subject,
        n: u32,
    }

    impl Model for Ticks {
        fn subject_mut(&mut self) -> &mut Subject {
            &mut self.subject
        }

        fn state(&self) -> Snapshot {
            Snapshot::new().with("n", self.n)
        }

        fn update(&mut self) {
            self.n += 1;
        }
    }

    impl Model for Score {
        fn subject_mut(&mut self) -> &mut Subject {
            &mut self.subject
        }

        fn state(&self) -> Snapshot {
            Snapshot::new().with("a", self.a).with("b", self.b)
        }

        fn children_mut(&mut self) -> Vec<&mut dyn Model> {
            vec![&mut self.clock]
        }
    }

    fn record(subject: &mut Subject) -> Rc<RefCell<Vec<StateChange>>> {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        subject.add_observer(move |c: &StateChange| sink.borrow_mut().push(c.clone()));
        log
    }

    #[test]
    fn notifies_once_per_changed_tick() {
        let mut score = Score::default();
        let log = record(&mut score.subject);

        score.tick();
        assert_eq!(log.borrow().len(), 1);
        assert_eq!(log.borrow()[0].changed_attrs(), vec!["a", "b"]);

        score.tick();
        assert_eq!(log.borrow().len(), 1);

        score.a += 1;
        score.a += 1;
        score.tick();
        let changes = log.borrow();
        assert_eq!(changes.len(), 2);
        assert!(changes[1].changed("a"));
        assert!(!changes[1].changed("b"));
        assert!(!changes[1].changed("missing"));
    }

    #[test]
    fn children_tick_first() {
        let mut score = Score::default();
        let log = record(&mut score.clock.subject);
        score.tick();
        score.tick();
        assert_eq!(score.clock.n, 2);
        assert_eq!(log.borrow().len(), 2);
        assert_eq!(
            score.clock.subject.previous().map(ToString::to_string),
            Some("{n: 2}".to_string())
        );
    }

    #[test]
    fn snapshot_values() -> Result<()> {
        let snap = Snapshot::new()
            .with("name", "set")
            .with("n", 3)
            .with("n", 4)
            .try_with("cards", &vec![1, 2, 3])?;
        assert_eq!(snap.len(), 3);
        assert_eq!(snap.get("n"), Some(&Value::from(4)));
        assert_eq!(snap.to_string(), "{name: \"set\", n: 4, cards: [1,2,3]}");
        Ok(())
    }
}
