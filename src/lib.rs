// Urlwarden: multi-provider URL reputation checking.
//
// This is the library root. Each module corresponds to a subsystem of
// the check pipeline: providers query the reputation backends, the
// cache memoizes their verdicts, and the checker fans a URL out and
// reduces the verdicts under a consensus policy.

pub mod cache;
pub mod checker;
pub mod config;
pub mod error;
pub mod output;
pub mod provider;
pub mod result;
