//! Typed async bridge between a host application and a client-side guided-tour
//! widget living on the far side of a runtime boundary.
//!
//! The caller side talks to a [`tour::Tour`] facade; every facade method encodes
//! a [`dispatch::MethodCall`], pushes it through a [`boundary::TourBoundary`],
//! where a [`dispatch::Dispatcher`] resolves the target tour in the
//! [`registry::TourRegistry`] and performs a typed invocation on the widget
//! handle. Widgets report lifecycle events back through the
//! [`widget::TourEventHandler`] supplied at setup time.

pub mod boundary;
pub mod dispatch;
pub mod error;
pub mod logger;
pub mod mock;
pub mod options;
pub mod registry;
pub mod schema;
pub mod tour;
pub mod widget;
