//! Execution modes of the `delve` binary.

mod repl;
mod single;

pub use repl::run_repl;
pub use single::run_single;
