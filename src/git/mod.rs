//! Git access for the extraction protocol.
//!
//! The orchestrator only ever talks to [`GitGateway`]; [`GitCli`] is the
//! production implementation.

pub mod cli;
pub mod gateway;

pub use cli::GitCli;
pub use gateway::GitGateway;

#[cfg(test)]
pub use gateway::MockGitGateway;
