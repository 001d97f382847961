//! Target-specific compilation passes.
//!
//! These passes need the coupling map (and, for routing, the layout) from
//! the `PropertySet` and produce circuits that respect the device's
//! connectivity.

pub mod layout;
pub mod routing;

pub use layout::TrivialLayout;
pub use routing::BasicRouting;
