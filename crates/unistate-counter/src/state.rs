//! Application state

/// Root state, assembled from independent slices by the combined reducer
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AppState {
    pub left: CounterState,
    pub right: CounterState,
    pub status: StatusState,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CounterState {
    pub value: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StatusState {
    pub running: bool,
    /// Lucky requests dispatched but not answered yet
    pub pending_requests: u32,
    pub message: Option<String>,
}

impl Default for StatusState {
    fn default() -> Self {
        Self {
            running: true,
            pending_requests: 0,
            message: None,
        }
    }
}

impl StatusState {
    pub fn is_busy(&self) -> bool {
        self.pending_requests > 0
    }
}
