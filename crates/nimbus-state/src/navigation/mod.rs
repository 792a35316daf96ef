//! Navigation/breadcrumb engine and the locked-folder gate.

pub mod breadcrumb;
pub mod gate;

pub use breadcrumb::{Breadcrumb, NavigationState, Segment, navigate};
pub use gate::{GateDecision, GateState, LockGate};
