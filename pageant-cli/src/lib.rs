mod commands;
mod runner;
mod watch;

pub use commands::Command;
pub use runner::Runner;
pub use watch::watch;
