use crate::dispatcher::Dispatcher;
use crate::middleware::{compose, ComposedMiddleware, Middleware, MiddlewareScope};
use crate::reducer::Reducer;
use crate::selection::Selection;
use crate::task_scope::TaskScope;
use tokio::sync::{mpsc, watch};

/// Receiver side of a store's state cell
///
/// `borrow()` reads the current state; `changed().await` waits for the next published one.
/// Slow observers may skip states, but never see them out of order or half-applied.
pub type StateReceiver<S> = watch::Receiver<S>;

/// Store - holds application state and runs the serialized dispatch loop
///
/// The Store follows the Redux pattern:
/// - Centralized state, replaced (never mutated) on each accepted action
/// - Actions are queued with [`Store::dispatch`] and applied one at a time, in order
/// - Every action flows through the middleware chain before reaching the reducer
///
/// A single consumer task owns the write side of the state and the read side of the
/// action queue, so at most one reduction is in flight per store no matter how many
/// threads dispatch concurrently. The consumer runs in the store's [`TaskScope`]; cancel
/// the scope to stop the store. Actions still queued at that point are dropped. The loop
/// also ends on its own once every `Store` and [`Dispatcher`] handle is gone.
///
/// ```rust
/// use unistate::{create_reducer, Store, TaskScope};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let reducer = create_reducer(0, |count, by: &i32| count + by);
/// let store = Store::new(reducer, TaskScope::new());
///
/// store.dispatch(2);
/// store.dispatch(3);
///
/// let mut state = store.subscribe();
/// state.wait_for(|count| *count == 5).await.unwrap();
/// # }
/// ```
pub struct Store<S, A> {
    name: String,
    state: StateReceiver<S>,
    dispatcher: Dispatcher<A>,
    scope: TaskScope,
}

impl<S, A> Store<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: Send + 'static,
{
    /// Start configuring a store around `reducer`, running in `scope`
    pub fn builder<R>(reducer: R, scope: TaskScope) -> StoreBuilder<S, A>
    where
        R: Reducer<S, A> + 'static,
    {
        StoreBuilder::new(reducer, scope)
    }

    /// Create a store without middleware, starting from the reducer's initial state
    pub fn new<R>(reducer: R, scope: TaskScope) -> Self
    where
        R: Reducer<S, A> + 'static,
    {
        Self::builder(reducer, scope).build()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Snapshot of the current state
    pub fn state(&self) -> S {
        self.state.borrow().clone()
    }

    /// Subscribe to state changes
    ///
    /// The receiver starts at the current state and reports only states published after
    /// this call as changes.
    pub fn subscribe(&self) -> StateReceiver<S> {
        let mut state = self.state.clone();
        state.borrow_and_update();
        state
    }

    /// Project a value out of the state and follow its distinct changes
    pub fn select<R, F>(&self, selector: F) -> Selection<S, R, F>
    where
        F: Fn(&S) -> R,
        R: Clone + PartialEq,
    {
        Selection::new(self.subscribe(), selector)
    }

    /// Queue an action; never blocks. A no-op once the store's scope is torn down.
    pub fn dispatch(&self, action: A) {
        self.dispatcher.dispatch(action);
    }

    /// Cloneable dispatch handle, for event loops, tasks and other threads
    pub fn dispatcher(&self) -> Dispatcher<A> {
        self.dispatcher.clone()
    }

    pub fn scope(&self) -> &TaskScope {
        &self.scope
    }
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            state: self.state.clone(),
            dispatcher: self.dispatcher.clone(),
            scope: self.scope.clone(),
        }
    }
}

/// Builder for [`Store`]
///
/// ```rust
/// use unistate::{create_reducer, LoggingMiddleware, Store, TaskScope};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let store = Store::builder(create_reducer(0, |count, by: &i32| count + by), TaskScope::new())
///     .name("counter")
///     .initial_state(10)
///     .middleware(LoggingMiddleware::new())
///     .build();
///
/// assert_eq!(store.state(), 10);
/// # }
/// ```
pub struct StoreBuilder<S, A> {
    name: String,
    reducer: Box<dyn Reducer<S, A>>,
    initial_state: Option<S>,
    middlewares: Vec<Box<dyn Middleware<S, A>>>,
    scope: TaskScope,
}

impl<S, A> StoreBuilder<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: Send + 'static,
{
    pub fn new<R>(reducer: R, scope: TaskScope) -> Self
    where
        R: Reducer<S, A> + 'static,
    {
        Self {
            name: "store".to_string(),
            reducer: Box::new(reducer),
            initial_state: None,
            middlewares: Vec::new(),
            scope,
        }
    }

    /// Name used in log lines and task names
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Start from `state` instead of the reducer's initial state
    pub fn initial_state(mut self, state: S) -> Self {
        self.initial_state = Some(state);
        self
    }

    /// Append a middleware; the first one added is the outermost
    pub fn middleware<M>(mut self, middleware: M) -> Self
    where
        M: Middleware<S, A> + 'static,
    {
        self.middlewares.push(Box::new(middleware));
        self
    }

    /// Append several middlewares, keeping their order
    pub fn middlewares(mut self, middlewares: Vec<Box<dyn Middleware<S, A>>>) -> Self {
        self.middlewares.extend(middlewares);
        self
    }

    /// Create the store and start its consumer loop in the scope
    ///
    /// If the scope is already cancelled the store is inert: its state stays at the
    /// initial state and dispatches are dropped.
    pub fn build(self) -> Store<S, A> {
        let initial_state = self
            .initial_state
            .unwrap_or_else(|| self.reducer.initial_state());

        let (state_tx, state_rx) = watch::channel(initial_state);
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let dispatcher = Dispatcher::new(action_tx, self.scope.clone());

        log::debug!(
            "Store `{}`: starting with {} middleware",
            self.name,
            self.middlewares.len()
        );

        let consumer = Consumer {
            name: self.name.clone(),
            reducer: self.reducer,
            chain: compose(self.middlewares),
            state: state_tx,
            actions: action_rx,
            sender: dispatcher.downgrade(),
            scope: self.scope.clone(),
        };

        // A panicking reducer or middleware is a contract violation: the loop is critical,
        // its failure tears the whole scope down.
        let task_name = format!("{}:dispatch-loop", self.name);
        if !self.scope.spawn_critical(task_name, consumer.run()) {
            log::debug!("Store `{}`: scope already cancelled, store is inert", self.name);
        }

        Store {
            name: self.name,
            state: state_rx,
            dispatcher,
            scope: self.scope,
        }
    }
}

/// The single consumer of a store's action queue
struct Consumer<S, A> {
    name: String,
    reducer: Box<dyn Reducer<S, A>>,
    chain: ComposedMiddleware<S, A>,
    state: watch::Sender<S>,
    actions: mpsc::UnboundedReceiver<A>,
    /// Weak, so the loop ends once every `Store` and `Dispatcher` handle is gone
    sender: mpsc::WeakUnboundedSender<A>,
    scope: TaskScope,
}

impl<S, A> Consumer<S, A>
where
    S: Clone + Send + Sync + 'static,
    A: Send + 'static,
{
    async fn run(mut self) -> anyhow::Result<()> {
        log::debug!("Store `{}`: dispatch loop started", self.name);

        while let Some(action) = self.actions.recv().await {
            if self.scope.is_cancelled() {
                log::debug!("Store `{}`: scope torn down, loop stopped", self.name);
                return Ok(());
            }
            self.process(action);
        }

        log::debug!("Store `{}`: all dispatchers dropped, loop stopped", self.name);
        Ok(())
    }

    /// Fold one action through the chain and publish the result
    fn process(&self, action: A) {
        // Without live senders, follow-ups dispatched during this pass are dropped.
        let tx = self
            .sender
            .upgrade()
            .unwrap_or_else(|| mpsc::unbounded_channel().0);
        let dispatcher = Dispatcher::new(tx, self.scope.clone());

        let current = self.state.borrow().clone();
        let reduce = |action: A| self.reducer.reduce(current.clone(), &action);
        let scope = MiddlewareScope::new(&current, &reduce, &dispatcher, &self.scope);

        let next = self.chain.handle(&scope, action);
        self.state.send_replace(next);
    }
}
