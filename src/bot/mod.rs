//! Manager bot - dispatcher, runtime and webhook server.

pub mod dispatcher;
mod runtime;
pub mod webhook;

pub use dispatcher::{build_dispatcher, AppState};
pub use runtime::{run, set_manager_commands, spawn_bot_reload};
