//! Interpreter configuration
//!
//! Defaults can be overridden through environment variables:
//!
//! - `JLISP_MAX_DEPTH` - maximum nesting of expansion and evaluation
//! - `JLISP_STACK_SIZE` - stack size in bytes of the thread a program runs on

use serde::{Deserialize, Serialize};

/// Default nesting limit for expansion and evaluation
pub const DEFAULT_MAX_DEPTH: usize = 10_000;

/// Default stack reserved for the program thread (256 MiB)
pub const DEFAULT_STACK_SIZE: usize = 256 * 1024 * 1024;

/// Default stack an `Interpreter` may use below its entry point (1 MiB)
///
/// Spawned threads get 2 MiB by default, so this leaves headroom for the
/// caller's own frames.
pub const DEFAULT_STACK_BUDGET: usize = 1024 * 1024;

/// Runtime limits for one interpreter run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterpreterConfig {
    /// Nesting depth past which a `RecursionLimit` error is raised
    pub max_depth: usize,
    /// Stack size for the worker thread used by [`crate::run`]
    pub stack_size: usize,
    /// Bytes of stack expansion and evaluation may use below the point where
    /// a program was entered; going further raises `RecursionLimit`.
    /// [`crate::run_with`] replaces it with three quarters of `stack_size`.
    pub stack_budget: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            max_depth: DEFAULT_MAX_DEPTH,
            stack_size: DEFAULT_STACK_SIZE,
            stack_budget: DEFAULT_STACK_BUDGET,
        }
    }
}

impl InterpreterConfig {
    /// Build a config from `JLISP_*` environment variables, falling back to defaults
    pub fn from_env() -> Self {
        InterpreterConfig {
            max_depth: env_usize("JLISP_MAX_DEPTH").unwrap_or(DEFAULT_MAX_DEPTH),
            stack_size: env_usize("JLISP_STACK_SIZE").unwrap_or(DEFAULT_STACK_SIZE),
            stack_budget: DEFAULT_STACK_BUDGET,
        }
    }

    /// Same config with a different depth limit
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Same config with a different stack budget
    pub fn with_stack_budget(mut self, stack_budget: usize) -> Self {
        self.stack_budget = stack_budget;
        self
    }

    /// Config for a program running on a thread of `stack_size` bytes
    pub(crate) fn for_worker_thread(mut self) -> Self {
        self.stack_budget = self.stack_size / 4 * 3;
        self
    }
}

fn env_usize(key: &str) -> Option<usize> {
    std::env::var(key)
        .ok()
        .and_then(|s| s.trim().parse().ok())
        .filter(|n| *n > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = InterpreterConfig::default();
        assert_eq!(config.max_depth, 10_000);
        assert_eq!(config.stack_size, 256 * 1024 * 1024);
        assert_eq!(config.stack_budget, 1024 * 1024);
    }

    #[test]
    fn test_worker_thread_budget() {
        let config = InterpreterConfig::default()
            .with_stack_budget(10)
            .for_worker_thread();
        assert_eq!(config.stack_budget, 192 * 1024 * 1024);
    }

    #[test]
    fn test_with_max_depth() {
        let config = InterpreterConfig::default().with_max_depth(50);
        assert_eq!(config.max_depth, 50);
        assert_eq!(config.stack_size, DEFAULT_STACK_SIZE);
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = InterpreterConfig::default().with_max_depth(7);
        let json = serde_json::to_string(&config).unwrap();
        let back: InterpreterConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
