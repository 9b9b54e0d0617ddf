//! Command handlers for CLI subcommands
//!
//! Each handler loads its inputs, calls into `flowkit_core`, and reports
//! through the shared `OutputWriter`.

mod completions;
mod config;
mod model_fields;
mod placeholders;
mod preview;
mod quick_configure;
mod resolve;
mod simulate;
mod utils;

pub use completions::handle_completions;
pub use config::handle_config;
pub use model_fields::handle_model_fields;
pub use placeholders::handle_placeholders;
pub use preview::handle_preview;
pub use quick_configure::handle_quick_configure;
pub use resolve::handle_resolve;
pub use simulate::handle_simulate;
