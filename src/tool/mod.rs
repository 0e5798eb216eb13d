// ABOUTME: Tool module - defines the Tool trait, results, and the dispatch registry.
// ABOUTME: Every capability a subagent can invoke goes through here.

mod registry;
mod result;
mod traits;

pub use registry::*;
pub use result::*;
pub use traits::*;
