//! Live-view boundary for the rowrelay reorder engine.
//!
//! The engine never touches a concrete DOM. Everything it knows about the
//! host list arrives through the [`driver::ListDriver`] trait: ordered row
//! probes, rendered geometry, synthetic input dispatch, and a mutation
//! event stream. Embeddings implement the trait over whatever bridge the
//! host environment provides; tests and the tester binary use the
//! in-process [`sim::SimHost`].
//!
//! Row handles are opaque tokens minted by the driver and valid only while
//! the row stays mounted. Stable item identity ([`ItemId`]) is assigned
//! lazily on first sight and never reused after removal.

mod error;
mod ids;

pub mod driver;
pub mod events;
pub mod geom;
pub mod input;

#[cfg(any(test, feature = "test-utils"))]
pub mod sim;

pub use error::{Error, Result};
pub use ids::{ItemId, RowHandle};
