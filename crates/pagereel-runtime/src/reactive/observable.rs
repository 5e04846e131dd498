#![forbid(unsafe_code)]

//! Shared page state with change notification.
//!
//! [`Observable<T>`] is a single-threaded cell (`Rc<RefCell<..>>`) that the
//! page coordinator owns and hands to writers and readers by clone. A write
//! that changes the value bumps the version and runs every live subscriber.
//!
//! # Invariants
//!
//! 1. `version` increments by exactly 1 on each value-changing write.
//! 2. Writing a value equal to the current one does nothing.
//! 3. Subscribers run in subscription order, after the write borrow is
//!    released, so a subscriber may read the cell it observes.
//! 4. A dropped [`Subscription`] is never called again; its slot is pruned
//!    on the next notification.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

type Listener<T> = dyn Fn(&T);

struct Slot<T> {
    value: T,
    version: u64,
    listeners: Vec<Weak<Listener<T>>>,
}

/// Shared, versioned value. Clones are handles to the same slot.
pub struct Observable<T> {
    slot: Rc<RefCell<Slot<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.slot.borrow();
        f.debug_struct("Observable")
            .field("value", &slot.value)
            .field("version", &slot.version)
            .finish_non_exhaustive()
    }
}

impl<T: Default + Clone + PartialEq + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Slot {
                value,
                version: 0,
                listeners: Vec::new(),
            })),
        }
    }

    #[must_use]
    pub fn get(&self) -> T {
        self.slot.borrow().value.clone()
    }

    #[must_use]
    pub fn version(&self) -> u64 {
        self.slot.borrow().version
    }

    /// Store `value`; notifies only if it differs from the current value.
    pub fn set(&self, value: T) {
        let (listeners, value, version) = {
            let mut slot = self.slot.borrow_mut();
            if slot.value == value {
                return;
            }
            slot.value = value;
            slot.version += 1;
            let mut live = Vec::with_capacity(slot.listeners.len());
            slot.listeners.retain(|weak| match weak.upgrade() {
                Some(listener) => {
                    live.push(listener);
                    true
                }
                None => false,
            });
            (live, slot.value.clone(), slot.version)
        };

        if listeners.is_empty() {
            return;
        }
        let _span = tracing::trace_span!("state.notify", version, listeners = listeners.len()).entered();
        for listener in &listeners {
            listener(&value);
        }
    }

    /// Run `listener` after every change until the guard is dropped.
    pub fn subscribe(&self, listener: impl Fn(&T) + 'static) -> Subscription {
        let strong: Rc<Listener<T>> = Rc::new(listener);
        self.slot.borrow_mut().listeners.push(Rc::downgrade(&strong));
        Subscription {
            _listener: Box::new(strong),
        }
    }
}

/// Keeps a listener alive. Drop it to unsubscribe.
pub struct Subscription {
    _listener: Box<dyn std::any::Any>,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Subscription")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn counter<T>(cell: &Observable<T>) -> (Rc<Cell<u64>>, Subscription)
    where
        T: Clone + PartialEq + 'static,
    {
        let hits = Rc::new(Cell::new(0u64));
        let sink = Rc::clone(&hits);
        let sub = cell.subscribe(move |_| sink.set(sink.get() + 1));
        (hits, sub)
    }

    #[test]
    fn writes_bump_the_version() {
        let cell = Observable::new(None::<String>);
        assert_eq!(cell.version(), 0);
        cell.set(Some("overview".into()));
        assert_eq!(cell.get().as_deref(), Some("overview"));
        assert_eq!(cell.version(), 1);
    }

    #[test]
    fn equal_write_is_silent() {
        let cell = Observable::new(Some("arch".to_string()));
        let (hits, _sub) = counter(&cell);
        cell.set(Some("arch".to_string()));
        assert_eq!(cell.version(), 0);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn listener_sees_the_new_value() {
        let cell = Observable::new(0);
        let seen = Rc::new(Cell::new(0));
        let sink = Rc::clone(&seen);
        let _sub = cell.subscribe(move |v| sink.set(*v));
        cell.set(42);
        assert_eq!(seen.get(), 42);
    }

    #[test]
    fn dropped_subscription_stops_notifications() {
        let cell = Observable::new(0);
        let (hits, sub) = counter(&cell);
        cell.set(1);
        drop(sub);
        cell.set(2);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn clones_share_value_and_listeners() {
        let writer = Observable::new(0);
        let reader = writer.clone();
        let (hits, _sub) = counter(&reader);
        writer.set(5);
        assert_eq!((reader.get(), reader.version(), hits.get()), (5, 1, 1));
    }

    #[test]
    fn listener_may_read_the_cell() {
        let cell = Observable::new(1);
        let reader = cell.clone();
        let seen = Rc::new(Cell::new(0));
        let sink = Rc::clone(&seen);
        let _sub = cell.subscribe(move |_| sink.set(reader.get()));
        cell.set(9);
        assert_eq!(seen.get(), 9);
    }

    #[test]
    fn listeners_run_in_subscription_order() {
        let cell = Observable::new(0);
        let log = Rc::new(RefCell::new(Vec::new()));
        let _subs: Vec<_> = (0..3)
            .map(|i| {
                let log = Rc::clone(&log);
                cell.subscribe(move |_| log.borrow_mut().push(i))
            })
            .collect();
        cell.set(1);
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
    }

    proptest::proptest! {
        #[test]
        fn notifies_once_per_change(values in proptest::collection::vec(0u8..4, 0..64)) {
            let cell = Observable::new(0u8);
            let (hits, _sub) = counter(&cell);

            let mut expected = 0u64;
            let mut current = 0u8;
            for v in values {
                if v != current {
                    expected += 1;
                    current = v;
                }
                cell.set(v);
            }
            proptest::prop_assert_eq!(hits.get(), expected);
            proptest::prop_assert_eq!(cell.version(), expected);
        }
    }
}
