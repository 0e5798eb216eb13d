// ABOUTME: Root module for objective-supervisor - drives a goal through subagents.
// ABOUTME: Re-exports the error type; everything else lives in the submodules.

pub mod artifact;
pub mod config;
pub mod error;
pub mod llm;
pub mod prelude;
pub mod subagent;
pub mod supervisor;
pub mod tool;
pub mod tools;
pub mod vfs;

pub use error::SupervisorError;
