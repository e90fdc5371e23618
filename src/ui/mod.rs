//! Terminal user interface for sweepscope.

pub mod error;
pub mod scope;

pub use error::ErrorScreen;
pub use scope::{ScopeCommand, ScopeTui};
