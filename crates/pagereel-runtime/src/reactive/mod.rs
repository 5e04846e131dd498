#![forbid(unsafe_code)]

//! Reactive state cells.
//!
//! Page-level UI state (the active section) lives in an [`Observable`] owned
//! by the page coordinator and handed to readers by clone. There is no
//! ambient global state.

pub mod observable;

pub use observable::{Observable, Subscription};
