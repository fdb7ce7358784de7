//! Anime Tracker application layer
//!
//! Collection selection, edit sessions and debounced catalog search. All state
//! here is owned by value and mutated through `&mut self`; suspension happens
//! only at store calls and the debounce timer.

pub mod airing_lookup;
pub mod debounce;
pub mod edit_session;
pub mod list_reconciler;
pub mod quick_search;
pub mod selection_controller;

pub use airing_lookup::next_airing;
pub use debounce::{SearchDebouncer, DEFAULT_QUIET_PERIOD};
pub use edit_session::{PendingEditSession, SaveError, SaveReport, SessionPhase, ToggleOutcome};
pub use list_reconciler::{reconcile_list, ItemCard, ListView};
pub use quick_search::QuickSearch;
pub use selection_controller::SelectionController;
