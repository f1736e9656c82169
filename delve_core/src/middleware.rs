//! # Middleware Pipeline
//!
//! Interceptors attached to the executor. Each middleware gets a chance to
//! veto a command before it runs and to react to its effects afterwards:
//!
//! - `before` hooks run in registration order. The first one returning
//!   [`Verdict::Cancel`] stops the chain; the command never reaches its
//!   handler and the result reports failure with the middleware's message.
//! - `after` hooks run in registration order for every command that passed
//!   the before chain, whether it succeeded or failed. They cannot veto.
//!
//! Middleware must tolerate commands it does not care about and return
//! quickly for them; both hooks default to no-ops.

use crate::context::{CommandContext, CommandResult};

/// Decision returned by a before-hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Continue,
    /// Stop the command; the message becomes the failed result's output.
    Cancel(String),
}

impl Verdict {
    pub fn cancel(message: impl Into<String>) -> Self {
        Self::Cancel(message.into())
    }

    pub fn is_continue(&self) -> bool {
        matches!(self, Verdict::Continue)
    }
}

/// A before/after interceptor for the command pipeline.
pub trait Middleware {
    /// Identifier used by `Executor::remove_middleware`.
    fn name(&self) -> &str;

    fn before(&mut self, _command: &str, _args: &[String], _context: &CommandContext) -> Verdict {
        Verdict::Continue
    }

    fn after(
        &mut self,
        _command: &str,
        _args: &[String],
        _context: &CommandContext,
        _result: &CommandResult,
    ) {
    }
}

/// Ordered list of middleware.
#[derive(Default)]
pub struct MiddlewareChain {
    entries: Vec<Box<dyn Middleware>>,
}

impl std::fmt::Debug for MiddlewareChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, middleware: Box<dyn Middleware>) {
        self.entries.push(middleware);
    }

    /// Remove every middleware with the given name. Returns true if any was removed.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|m| m.name() != name);
        self.entries.len() != before
    }

    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|m| m.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run before-hooks in order. Returns the first cancellation, if any,
    /// together with the name of the middleware that issued it.
    pub fn run_before(
        &mut self,
        command: &str,
        args: &[String],
        context: &CommandContext,
    ) -> Option<(String, String)> {
        for middleware in &mut self.entries {
            if let Verdict::Cancel(message) = middleware.before(command, args, context) {
                return Some((middleware.name().to_string(), message));
            }
        }
        None
    }

    pub fn run_after(
        &mut self,
        command: &str,
        args: &[String],
        context: &CommandContext,
        result: &CommandResult,
    ) {
        for middleware in &mut self.entries {
            middleware.after(command, args, context, result);
        }
    }
}

/// Middleware built from a before-closure.
pub struct FnMiddleware<F> {
    name: String,
    before: F,
}

impl<F> Middleware for FnMiddleware<F>
where
    F: FnMut(&str, &[String], &CommandContext) -> Verdict,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn before(&mut self, command: &str, args: &[String], context: &CommandContext) -> Verdict {
        (self.before)(command, args, context)
    }
}

/// Wrap a closure as a named middleware with a no-op after-hook.
///
/// ```
/// use delve_core::middleware::{Verdict, from_fn};
///
/// let guard = from_fn("no-secrets", |command, args, _ctx| {
///     if command == "rm" && args.iter().any(|a| a.ends_with(".mob")) {
///         Verdict::cancel("The creature blocks your way")
///     } else {
///         Verdict::Continue
///     }
/// });
/// # let _ = guard;
/// ```
pub fn from_fn<F>(name: impl Into<String>, before: F) -> FnMiddleware<F>
where
    F: FnMut(&str, &[String], &CommandContext) -> Verdict,
{
    FnMiddleware {
        name: name.into(),
        before,
    }
}

/// Logs every command passing through the pipeline.
#[derive(Debug, Default)]
pub struct LoggingMiddleware;

impl Middleware for LoggingMiddleware {
    fn name(&self) -> &str {
        "logging"
    }

    fn before(&mut self, command: &str, args: &[String], context: &CommandContext) -> Verdict {
        tracing::info!("-> {} {:?} in {:?}", command, args, context.start_dir);
        Verdict::Continue
    }

    fn after(
        &mut self,
        command: &str,
        _args: &[String],
        context: &CommandContext,
        result: &CommandResult,
    ) {
        tracing::info!(
            "<- {} success={} changes={} ({} ms)",
            command,
            result.is_success(),
            context.change_count(),
            context.execution_time_ms
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        name: String,
        log: Rc<RefCell<Vec<String>>>,
        cancel: bool,
    }

    impl Middleware for Recorder {
        fn name(&self) -> &str {
            &self.name
        }

        fn before(&mut self, command: &str, _args: &[String], _ctx: &CommandContext) -> Verdict {
            self.log.borrow_mut().push(format!("{}:before:{}", self.name, command));
            if self.cancel {
                Verdict::cancel(format!("{} says no", self.name))
            } else {
                Verdict::Continue
            }
        }

        fn after(&mut self, command: &str, _: &[String], _: &CommandContext, _: &CommandResult) {
            self.log.borrow_mut().push(format!("{}:after:{}", self.name, command));
        }
    }

    fn recorder(name: &str, log: &Rc<RefCell<Vec<String>>>, cancel: bool) -> Box<dyn Middleware> {
        Box::new(Recorder {
            name: name.to_string(),
            log: Rc::clone(log),
            cancel,
        })
    }

    #[test]
    fn test_before_runs_in_order_and_stops_at_first_cancel() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut chain = MiddlewareChain::new();
        chain.push(recorder("a", &log, false));
        chain.push(recorder("b", &log, true));
        chain.push(recorder("c", &log, false));

        let ctx = CommandContext::new("rm", "/sandbox");
        let cancelled = chain.run_before("rm", &[], &ctx);

        assert_eq!(cancelled, Some(("b".to_string(), "b says no".to_string())));
        assert_eq!(*log.borrow(), vec!["a:before:rm", "b:before:rm"]);
    }

    #[test]
    fn test_after_runs_for_all() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut chain = MiddlewareChain::new();
        chain.push(recorder("a", &log, false));
        chain.push(recorder("b", &log, false));

        let ctx = CommandContext::new("ls", "/sandbox");
        let result = CommandResult::failure("boom", ctx.clone());
        chain.run_after("ls", &[], &ctx, &result);
        assert_eq!(*log.borrow(), vec!["a:after:ls", "b:after:ls"]);
    }

    #[test]
    fn test_remove_by_name() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut chain = MiddlewareChain::new();
        chain.push(recorder("a", &log, false));
        chain.push(Box::new(LoggingMiddleware));

        assert!(chain.remove("a"));
        assert!(!chain.remove("a"));
        assert_eq!(chain.names(), vec!["logging"]);
    }

    #[test]
    fn test_from_fn_middleware() {
        let mut guard = from_fn("guard", |command, _args, _ctx| {
            if command == "rm" {
                Verdict::cancel("no")
            } else {
                Verdict::Continue
            }
        });
        let ctx = CommandContext::new("rm", "/sandbox");
        assert_eq!(guard.before("rm", &[], &ctx), Verdict::cancel("no"));
        assert!(guard.before("ls", &[], &ctx).is_continue());
        assert_eq!(guard.name(), "guard");
    }
}
