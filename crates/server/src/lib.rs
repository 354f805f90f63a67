//! HTTP service serving alerting rules merged from the rule store and the
//! generated snapshot.

pub mod api;
pub mod cli;
pub mod db;
pub mod router;
pub mod startup;
pub mod state;
pub mod store;

pub use router::build_router;
pub use state::AppState;
