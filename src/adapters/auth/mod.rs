//! Authentication adapters.
//!
//! Implementations of the `SessionValidator` port:
//!
//! - `mock` - Test implementation that doesn't require an identity provider

mod mock;

pub use mock::MockSessionValidator;
