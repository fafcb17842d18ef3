// App module for market-maker
// Holds the shell state, input handling and the fetch jobs it queues

pub mod input;
pub mod state;

pub use market_core::{run_job, FetchJob, FetchOutcome};
pub use input::handle_input;
pub use state::{App, Clock};
