//! Error type shared by live-view drivers.

use thiserror::Error;

use crate::RowHandle;

/// Convenient result alias for driver operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by a live-view driver.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The row was unmounted or removed between probe and use.
    #[error("row {0} is no longer mounted")]
    RowGone(RowHandle),
    /// The host exposes no private reorder callback.
    #[error("host exposes no reorder hook")]
    HookUnavailable,
    /// The host exposes no central state store.
    #[error("host exposes no state store")]
    StoreUnavailable,
    /// The embedding rejected a synthetic input dispatch.
    #[error("input dispatch rejected: {0}")]
    Dispatch(String),
    /// The driver has shut down and no further calls will succeed.
    #[error("view driver shut down")]
    Closed,
}
