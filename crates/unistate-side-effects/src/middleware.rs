use crate::effect::{SideEffect, SideEffectScope};
use std::future::Future;
use std::sync::Arc;
use unistate::{Middleware, MiddlewareScope};

type Predicate<A> = Box<dyn Fn(&A) -> bool + Send + Sync>;

struct Registration<S, A> {
    name: String,
    matches: Predicate<A>,
    effect: Arc<dyn SideEffect<S, A>>,
}

/// Entry point for declaring side effects
pub struct SideEffects;

impl SideEffects {
    pub fn builder<S, A>() -> SideEffectsBuilder<S, A> {
        SideEffectsBuilder {
            registrations: Vec::new(),
        }
    }
}

/// Collects side-effect registrations; immutable once built
pub struct SideEffectsBuilder<S, A> {
    registrations: Vec<Registration<S, A>>,
}

impl<S, A> SideEffectsBuilder<S, A>
where
    S: Send + 'static,
    A: Send + 'static,
{
    /// Run `handler` for every action matching `predicate`
    ///
    /// ```rust
    /// # use unistate_side_effects::SideEffects;
    /// # #[derive(Clone)]
    /// # enum Action { Fetch(u32), Other }
    /// let builder = SideEffects::builder::<(), Action>().collect(
    ///     |action| matches!(action, Action::Fetch(_)),
    ///     |_scope, _action| async { Ok(()) },
    /// );
    /// # let _ = builder.build();
    /// ```
    pub fn collect<P, F, Fut>(self, predicate: P, handler: F) -> Self
    where
        P: Fn(&A) -> bool + Send + Sync + 'static,
        F: Fn(SideEffectScope<S, A>, A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.collect_effect(predicate, handler)
    }

    /// Run `handler` for every action equal to `target`
    pub fn collect_action<F, Fut>(self, target: A, handler: F) -> Self
    where
        A: PartialEq + Sync,
        F: Fn(SideEffectScope<S, A>, A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        self.collect_effect(move |action: &A| *action == target, handler)
    }

    /// Run a [`SideEffect`] implementation for every action matching `predicate`
    pub fn collect_effect<P, E>(mut self, predicate: P, effect: E) -> Self
    where
        P: Fn(&A) -> bool + Send + Sync + 'static,
        E: SideEffect<S, A> + 'static,
    {
        let name = format!("side-effect-{}", self.registrations.len());
        self.registrations.push(Registration {
            name,
            matches: Box::new(predicate),
            effect: Arc::new(effect),
        });
        self
    }

    /// Name the most recently collected side effect; used in task names and log lines
    pub fn named(mut self, name: impl Into<String>) -> Self {
        if let Some(last) = self.registrations.last_mut() {
            last.name = name.into();
        }
        self
    }

    pub fn build(self) -> SideEffectsMiddleware<S, A> {
        SideEffectsMiddleware {
            registrations: self.registrations,
        }
    }
}

/// Middleware launching one task per matching side effect for every action
///
/// Tasks are launched in registration order before the action continues down the chain.
/// The middleware never waits for them; its result is always `next(action)`.
pub struct SideEffectsMiddleware<S, A> {
    registrations: Vec<Registration<S, A>>,
}

impl<S, A> SideEffectsMiddleware<S, A> {
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }
}

impl<S, A> Middleware<S, A> for SideEffectsMiddleware<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: Clone + Send + 'static,
{
    fn handle(&self, scope: &MiddlewareScope<'_, S, A>, action: A) -> S {
        for registration in &self.registrations {
            if !(registration.matches)(&action) {
                continue;
            }

            log::trace!("SideEffects: launching `{}`", registration.name);

            let effect = Arc::clone(&registration.effect);
            let effect_scope = SideEffectScope::new(
                scope.state().clone(),
                scope.dispatcher().clone(),
                scope.task_scope().clone(),
            );
            let effect_action = action.clone();

            let launched = scope
                .task_scope()
                .spawn(registration.name.clone(), async move {
                    effect.run(effect_scope, effect_action).await
                });
            if !launched {
                log::debug!(
                    "SideEffects: scope torn down, `{}` not launched",
                    registration.name
                );
            }
        }

        scope.next(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::sync::mpsc;
    use unistate::{Dispatcher, TaskScope};

    #[derive(Debug, Clone, PartialEq)]
    enum TestAction {
        Ping,
        Pong,
        Other,
    }

    fn run(
        middleware: &SideEffectsMiddleware<u32, TestAction>,
        tasks: &TaskScope,
        action: TestAction,
    ) -> u32 {
        let (tx, _rx) = mpsc::unbounded_channel();
        let dispatcher = Dispatcher::new(tx, tasks.clone());
        let state = 7;
        let reduce = |_action: TestAction| state + 1;
        let scope = MiddlewareScope::new(&state, &reduce, &dispatcher, tasks);
        middleware.handle(&scope, action)
    }

    #[tokio::test]
    async fn test_always_continues_the_chain() {
        let tasks = TaskScope::new();
        let middleware = SideEffects::builder()
            .collect_action(TestAction::Ping, |_scope, _action| async {
                std::future::pending::<()>().await;
                Ok(())
            })
            .build();

        assert_eq!(run(&middleware, &tasks, TestAction::Ping), 8);
        assert_eq!(run(&middleware, &tasks, TestAction::Other), 8);
        tasks.cancel();
    }

    #[tokio::test]
    async fn test_matching_effects_launch_in_registration_order() {
        let tasks = TaskScope::new();
        let (seen_tx, mut seen_rx) = mpsc::unbounded_channel();

        let record = |label: &'static str| {
            let seen = seen_tx.clone();
            move |scope: SideEffectScope<u32, TestAction>, action: TestAction| {
                let seen = seen.clone();
                async move {
                    let _ = seen.send((label, *scope.state(), action));
                    Ok(())
                }
            }
        };

        let middleware = SideEffects::builder()
            .collect_action(TestAction::Ping, record("first"))
            .collect(|a| matches!(a, TestAction::Ping | TestAction::Pong), record("second"))
            .collect_action(TestAction::Pong, record("skipped"))
            .collect_action(TestAction::Ping, record("third"))
            .build();
        assert_eq!(middleware.len(), 4);

        run(&middleware, &tasks, TestAction::Ping);

        let mut seen = Vec::new();
        for _ in 0..3 {
            seen.push(seen_rx.recv().await.unwrap());
        }
        assert_eq!(
            seen,
            vec![
                ("first", 7, TestAction::Ping),
                ("second", 7, TestAction::Ping),
                ("third", 7, TestAction::Ping),
            ]
        );
        assert!(seen_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_effects_are_launched_before_next() {
        let tasks = TaskScope::new();
        let middleware = SideEffects::builder::<u32, TestAction>()
            .collect_action(TestAction::Ping, |_scope, _action| async { Ok(()) })
            .collect_action(TestAction::Pong, |_scope, _action| async { Ok(()) })
            .collect_action(TestAction::Ping, |_scope, _action| async { Ok(()) })
            .build();

        let (tx, _rx) = mpsc::unbounded_channel();
        let dispatcher = Dispatcher::new(tx, tasks.clone());
        let state = 7;
        let held_at_next = std::cell::RefCell::new(Vec::new());
        let reduce = |_action: TestAction| {
            // a launched task holds its own handle on the effect
            *held_at_next.borrow_mut() = middleware
                .registrations
                .iter()
                .map(|registration| Arc::strong_count(&registration.effect))
                .collect();
            state + 1
        };
        let scope = MiddlewareScope::new(&state, &reduce, &dispatcher, &tasks);

        assert_eq!(middleware.handle(&scope, TestAction::Ping), 8);
        assert_eq!(*held_at_next.borrow(), vec![2, 1, 2]);
    }

    #[tokio::test]
    async fn test_failing_effect_is_reported_and_isolated() {
        let tasks = TaskScope::named("effects");
        let mut failures = tasks.supervise();
        let (done_tx, mut done_rx) = mpsc::unbounded_channel();

        let middleware = SideEffects::builder()
            .collect_action(TestAction::Ping, |_scope, _action| async {
                Err(anyhow::anyhow!("service unavailable"))
            })
            .named("broken")
            .collect_action(TestAction::Ping, move |_scope, action| {
                let done = done_tx.clone();
                async move {
                    let _ = done.send(action);
                    Ok(())
                }
            })
            .build();

        assert_eq!(run(&middleware, &tasks, TestAction::Ping), 8);

        let failure = failures.recv().await.unwrap();
        assert_eq!(failure.task(), "broken");
        assert!(failure.to_string().contains("service unavailable"));

        assert_eq!(done_rx.recv().await, Some(TestAction::Ping));
        assert!(!tasks.is_cancelled());
    }

    #[tokio::test]
    async fn test_nothing_launched_after_teardown() {
        let tasks = TaskScope::new();
        let (seen_tx, mut seen_rx) = mpsc::unbounded_channel::<()>();
        let middleware = SideEffects::builder()
            .collect_action(TestAction::Ping, move |_scope, _action| {
                let seen = seen_tx.clone();
                async move {
                    let _ = seen.send(());
                    Ok(())
                }
            })
            .build();

        tasks.cancel();
        assert_eq!(run(&middleware, &tasks, TestAction::Ping), 8);
        tokio::task::yield_now().await;
        assert!(seen_rx.try_recv().is_err());
    }
}
