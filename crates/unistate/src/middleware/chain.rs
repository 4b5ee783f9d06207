//! Composition of middleware into a single onion-style chain

use super::{Middleware, MiddlewareScope};

/// A list of middleware folded right-to-left into one [`Middleware`]
///
/// The first middleware in the list is the outermost: it sees the action first and the
/// resulting state last. The `next` of the last middleware is the `next` of the scope the
/// composed chain is called with, which in a store is the real reducer call.
pub struct ComposedMiddleware<S, A> {
    middlewares: Vec<Box<dyn Middleware<S, A>>>,
}

/// Compose `middlewares` into one chain. An empty list behaves like calling the reducer
/// directly.
pub fn compose<S, A>(middlewares: Vec<Box<dyn Middleware<S, A>>>) -> ComposedMiddleware<S, A> {
    ComposedMiddleware { middlewares }
}

impl<S, A> ComposedMiddleware<S, A> {
    pub fn len(&self) -> usize {
        self.middlewares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middlewares.is_empty()
    }
}

impl<S, A> Middleware<S, A> for ComposedMiddleware<S, A> {
    fn handle(&self, scope: &MiddlewareScope<'_, S, A>, action: A) -> S {
        run_chain(&self.middlewares, scope, action)
    }
}

fn run_chain<S, A>(
    chain: &[Box<dyn Middleware<S, A>>],
    scope: &MiddlewareScope<'_, S, A>,
    action: A,
) -> S {
    match chain.split_first() {
        None => scope.next(action),
        Some((outer, rest)) => {
            let next = |action: A| run_chain(rest, scope, action);
            outer.handle(&scope.with_next(&next), action)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatcher::Dispatcher;
    use crate::middleware::middleware_fn;
    use crate::task_scope::TaskScope;
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};
    use tokio::sync::mpsc;

    struct NamedMiddleware {
        name: &'static str,
    }

    impl Middleware<String, String> for NamedMiddleware {
        fn handle(&self, scope: &MiddlewareScope<'_, String, String>, action: String) -> String {
            format!("{}({})", self.name, scope.next(action))
        }
    }

    struct Recording {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Middleware<String, String> for Recording {
        fn handle(&self, scope: &MiddlewareScope<'_, String, String>, action: String) -> String {
            self.log.lock().unwrap().push(format!("{} in", self.name));
            let state = scope.next(action);
            self.log.lock().unwrap().push(format!("{} out", self.name));
            state
        }
    }

    fn run(chain: &ComposedMiddleware<String, String>, action: &str) -> String {
        let (tx, _rx) = mpsc::unbounded_channel();
        let tasks = TaskScope::new();
        let dispatcher = Dispatcher::new(tx, tasks.clone());
        let state = "initial".to_string();
        let reduce = |action: String| match action.as_str() {
            "go" => "state".to_string(),
            _ => "initial".to_string(),
        };
        let scope = MiddlewareScope::new(&state, &reduce, &dispatcher, &tasks);
        chain.handle(&scope, action.to_string())
    }

    #[tokio::test]
    async fn test_onion_ordering() {
        let chain = compose(vec![
            Box::new(NamedMiddleware { name: "A" }) as Box<dyn Middleware<String, String>>,
            Box::new(NamedMiddleware { name: "B" }),
            Box::new(NamedMiddleware { name: "C" }),
        ]);

        assert_eq!(run(&chain, "go"), "A(B(C(state)))");
    }

    #[tokio::test]
    async fn test_call_order_in_and_out() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = compose(
            ["A", "B", "C"]
                .into_iter()
                .map(|name| {
                    Box::new(Recording {
                        name,
                        log: Arc::clone(&log),
                    }) as Box<dyn Middleware<String, String>>
                })
                .collect(),
        );

        run(&chain, "go");

        assert_eq!(
            *log.lock().unwrap(),
            vec!["A in", "B in", "C in", "C out", "B out", "A out"]
        );
    }

    #[tokio::test]
    async fn test_empty_chain_calls_reducer() {
        let chain = compose(Vec::new());
        assert!(chain.is_empty());
        assert_eq!(run(&chain, "go"), "state");
    }

    #[tokio::test]
    async fn test_short_circuit_skips_inner_links() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = compose(vec![
            Box::new(NamedMiddleware { name: "A" }) as Box<dyn Middleware<String, String>>,
            Box::new(middleware_fn(
                |_scope: &MiddlewareScope<'_, String, String>, _action: String| {
                    "vetoed".to_string()
                },
            )),
            Box::new(Recording {
                name: "C",
                log: Arc::clone(&log),
            }),
        ]);

        assert_eq!(run(&chain, "go"), "A(vetoed)");
        assert!(log.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rewritten_action_reaches_reducer() {
        let chain = compose(vec![Box::new(middleware_fn(
            |scope: &MiddlewareScope<'_, String, String>, _action: String| {
                scope.next("go".to_string())
            },
        )) as Box<dyn Middleware<String, String>>]);

        assert_eq!(run(&chain, "stay"), "state");
    }
}
