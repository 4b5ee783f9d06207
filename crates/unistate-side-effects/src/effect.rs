use async_trait::async_trait;
use std::future::Future;
use unistate::{Dispatcher, TaskScope};

/// An asynchronous reaction to a dispatched action
///
/// Async closures taking `(SideEffectScope, Action)` implement this trait already; implement
/// it by hand for reactions that carry their own dependencies, like an API client.
///
/// Returning an error (or panicking) only fails this one run: the failure is logged and
/// reported to the scope's supervisor, the store and other side effects keep going.
#[async_trait]
pub trait SideEffect<S, A>: Send + Sync {
    async fn run(&self, scope: SideEffectScope<S, A>, action: A) -> anyhow::Result<()>;
}

#[async_trait]
impl<S, A, F, Fut> SideEffect<S, A> for F
where
    S: Send + 'static,
    A: Send + 'static,
    F: Fn(SideEffectScope<S, A>, A) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<()>> + Send,
{
    async fn run(&self, scope: SideEffectScope<S, A>, action: A) -> anyhow::Result<()> {
        (self)(scope, action).await
    }
}

/// What a running side effect can see and do
pub struct SideEffectScope<S, A> {
    state: S,
    dispatcher: Dispatcher<A>,
    tasks: TaskScope,
}

impl<S, A> SideEffectScope<S, A> {
    pub fn new(state: S, dispatcher: Dispatcher<A>, tasks: TaskScope) -> Self {
        Self {
            state,
            dispatcher,
            tasks,
        }
    }

    /// State of the store when the side effect was launched
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Dispatch an action to the store, same as calling `Store::dispatch`
    pub fn dispatch(&self, action: A) {
        self.dispatcher.dispatch(action);
    }

    pub fn dispatcher(&self) -> &Dispatcher<A> {
        &self.dispatcher
    }

    /// The store's task scope; cancelled together with the store
    pub fn scope(&self) -> &TaskScope {
        &self.tasks
    }
}

impl<S: Clone, A> Clone for SideEffectScope<S, A> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            dispatcher: self.dispatcher.clone(),
            tasks: self.tasks.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    struct Echo;

    #[async_trait]
    impl SideEffect<u32, u32> for Echo {
        async fn run(&self, scope: SideEffectScope<u32, u32>, action: u32) -> anyhow::Result<()> {
            scope.dispatch(scope.state() + action);
            Ok(())
        }
    }

    fn test_scope(state: u32) -> (SideEffectScope<u32, u32>, mpsc::UnboundedReceiver<u32>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let tasks = TaskScope::new();
        let dispatcher = Dispatcher::new(tx, tasks.clone());
        (SideEffectScope::new(state, dispatcher, tasks), rx)
    }

    #[tokio::test]
    async fn test_trait_implementation() {
        let (scope, mut rx) = test_scope(10);

        Echo.run(scope, 5).await.unwrap();
        assert_eq!(rx.recv().await, Some(15));
    }

    #[tokio::test]
    async fn test_closure_implementation() {
        let (scope, mut rx) = test_scope(1);
        let double = |scope: SideEffectScope<u32, u32>, action: u32| async move {
            scope.dispatch(action * 2);
            anyhow::Ok(())
        };

        double.run(scope, 4).await.unwrap();
        assert_eq!(rx.recv().await, Some(8));
    }

    #[tokio::test]
    async fn test_dispatch_after_teardown_is_ignored() {
        let (scope, mut rx) = test_scope(0);
        scope.scope().cancel();

        scope.dispatch(1);
        assert!(rx.try_recv().is_err());
    }
}
