//! # Aftershock Core Types
//!
//! Layer 0 of the workspace: the shared vocabulary every other crate speaks.
//! Nothing in here performs analysis; these types only enforce the shape
//! invariants (chronological rows, an anchor row at offset 0) that the
//! downstream engines rely on.

pub mod enums;
pub mod error;
pub mod structs;
pub mod table;
pub mod window;

// Re-export the core types to provide a clean public API.
pub use enums::RecoveryDays;
pub use error::CoreError;
pub use structs::{Betas, Event, ReturnPair, ReturnTable, WindowConfig};
pub use table::PriceTable;
pub use window::{EventWindow, NormalizedWindow};
