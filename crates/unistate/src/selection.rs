use crate::store::StateReceiver;

/// A derived view of a store's state that only reports distinct values
///
/// Built with [`Store::select`](crate::Store::select). UI code typically holds one selection
/// per widget and re-renders when it changes.
pub struct Selection<S, R, F> {
    state: StateReceiver<S>,
    selector: F,
    current: R,
}

impl<S, R, F> Selection<S, R, F>
where
    F: Fn(&S) -> R,
    R: Clone + PartialEq,
{
    pub fn new(state: StateReceiver<S>, selector: F) -> Self {
        let current = selector(&state.borrow());
        Self {
            state,
            selector,
            current,
        }
    }

    /// The last selected value
    pub fn get(&self) -> &R {
        &self.current
    }

    /// Wait until the selected value differs from the last one
    ///
    /// Returns `None` once the store has gone away and no further change can come.
    pub async fn changed(&mut self) -> Option<R> {
        loop {
            self.state.changed().await.ok()?;
            if self.refresh() {
                return Some(self.current.clone());
            }
        }
    }

    /// Re-read the state without waiting; returns whether the selected value changed
    ///
    /// For poll-driven loops such as a terminal event loop.
    pub fn refresh(&mut self) -> bool {
        let selected = (self.selector)(&self.state.borrow_and_update());
        if selected == self.current {
            return false;
        }
        self.current = selected;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tokio::sync::watch;

    #[derive(Debug, Clone)]
    struct TestState {
        count: u32,
        label: &'static str,
    }

    #[tokio::test]
    async fn test_changed_skips_equal_values() {
        let (tx, rx) = watch::channel(TestState {
            count: 0,
            label: "a",
        });
        let mut label = Selection::new(rx, |state: &TestState| state.label);
        assert_eq!(*label.get(), "a");

        tx.send_modify(|state| state.count += 1);
        tx.send_modify(|state| state.label = "b");

        assert_eq!(label.changed().await, Some("b"));
        assert_eq!(*label.get(), "b");
    }

    #[tokio::test]
    async fn test_changed_ends_with_store() {
        let (tx, rx) = watch::channel(TestState {
            count: 0,
            label: "a",
        });
        let mut count = Selection::new(rx, |state: &TestState| state.count);

        tx.send_modify(|state| state.label = "b");
        drop(tx);

        assert_eq!(count.changed().await, None);
    }

    #[test]
    fn test_refresh() {
        let (tx, rx) = watch::channel(TestState {
            count: 0,
            label: "a",
        });
        let mut count = Selection::new(rx, |state: &TestState| state.count);

        assert!(!count.refresh());
        tx.send_modify(|state| state.count = 3);
        assert!(count.refresh());
        assert_eq!(*count.get(), 3);
        assert!(!count.refresh());
    }
}
