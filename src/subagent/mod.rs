// ABOUTME: Subagent module - plan protocol, tool policy, execution records,
// ABOUTME: and the executor that turns one task into an ExecutionRecord.

mod executor;
mod plan;
mod policy;
mod record;

pub use executor::*;
pub use plan::*;
pub use policy::*;
pub use record::*;

#[cfg(test)]
mod executor_test;
