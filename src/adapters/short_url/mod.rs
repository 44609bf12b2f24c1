//! URL shortening adapters.
//!
//! - `ShortIoUrlShortener` - Short.io links API
//! - `MockUrlShortener` - Scripted shortener for tests

mod mock;
mod short_io;

pub use mock::MockUrlShortener;
pub use short_io::{ShortIoConfig, ShortIoUrlShortener};
