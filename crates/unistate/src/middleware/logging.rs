use super::{Middleware, MiddlewareScope};
use std::fmt::Debug;

type ActionFilter<A> = Box<dyn Fn(&A) -> bool + Send + Sync>;

/// LoggingMiddleware - logs all actions passing through, with the state before and after
pub struct LoggingMiddleware<A> {
    skip: Option<ActionFilter<A>>,
}

impl<A> LoggingMiddleware<A> {
    pub fn new() -> Self {
        Self { skip: None }
    }

    /// Don't log actions matching `filter`
    ///
    /// Use it for actions that are themselves produced by logging, to avoid a feedback loop.
    pub fn skip_when(mut self, filter: impl Fn(&A) -> bool + Send + Sync + 'static) -> Self {
        self.skip = Some(Box::new(filter));
        self
    }

    fn should_log(&self, action: &A) -> bool {
        !self.skip.as_ref().is_some_and(|skip| skip(action))
    }
}

impl<A> Default for LoggingMiddleware<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S, A> Middleware<S, A> for LoggingMiddleware<A>
where
    S: Debug,
    A: Debug,
{
    fn handle(&self, scope: &MiddlewareScope<'_, S, A>, action: A) -> S {
        if !self.should_log(&action) {
            return scope.next(action);
        }

        log::debug!("Action: {:?}", action);
        log::trace!("State before: {:?}", scope.state());
        let next = scope.next(action);
        log::trace!("State after: {:?}", next);
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::Dispatcher;
    use crate::task_scope::TaskScope;
    use tokio::sync::mpsc;

    #[derive(Debug, PartialEq)]
    enum TestAction {
        Increment,
        LogLine,
    }

    #[tokio::test]
    async fn test_logging_middleware_passes_through() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let tasks = TaskScope::new();
        let dispatcher = Dispatcher::new(tx, tasks.clone());
        let state = 1;
        let reduce = |action: TestAction| match action {
            TestAction::Increment => state + 1,
            TestAction::LogLine => state,
        };
        let scope = MiddlewareScope::new(&state, &reduce, &dispatcher, &tasks);

        let middleware =
            LoggingMiddleware::new().skip_when(|a: &TestAction| *a == TestAction::LogLine);

        assert_eq!(middleware.handle(&scope, TestAction::Increment), 2);
        assert_eq!(middleware.handle(&scope, TestAction::LogLine), 1);
    }

    #[test]
    fn test_skip_filter() {
        let middleware =
            LoggingMiddleware::new().skip_when(|a: &TestAction| *a == TestAction::LogLine);
        assert!(middleware.should_log(&TestAction::Increment));
        assert!(!middleware.should_log(&TestAction::LogLine));
    }
}
