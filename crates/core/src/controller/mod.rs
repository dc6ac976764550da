//! Presentation-facing controllers.
//!
//! Controllers own their state and publish full snapshots through
//! [`Subscription`]s; the presentation layer reads snapshots and calls
//! controller methods, never mutating state directly.

mod details;
mod filter;
mod list;
mod state;

pub use details::{DetailsController, DetailsState, DETAILS_FAILED_MESSAGE};
pub use filter::{apply_filters, fold_text, genres_match};
pub use list::{ListController, ListSnapshot, LOAD_FAILED_MESSAGE};
pub use state::{StatePublisher, Subscription};
