//! Robot state container.
//!
//! The [`AttributeStore`] holds every attribute known for one robot and
//! signals observers through its [`StateNotifier`] when capabilities report
//! a change.

pub mod notifier;
pub mod store;

pub use notifier::StateNotifier;
pub use store::AttributeStore;
