//! Board view controller: state store, filter engine, reorder resolver and
//! the optimistic mutation coordinator tying them to the API.

mod coordinator;
mod error;
pub mod filter;
pub mod reorder;
pub mod store;

pub use coordinator::{
    BoardController, MutationOutcome, TaskDraft, TaskUpdate, DEFAULT_RELOAD_DELAY,
};
pub use error::BoardError;
pub use filter::{FilterOptions, FilterSelection, FilteredColumn};
pub use reorder::{DragEnd, DropLocation, ReorderSink, Shift};
pub use store::{BoardStore, LoadFailure};
