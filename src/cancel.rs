use std::cell::Cell;
use std::rc::Rc;

use web_sys::{AbortController, AbortSignal};

/// Ties in-flight requests to the effect that started them.
///
/// Cancelling aborts the underlying fetches and flips a flag the spawned
/// future checks before it touches component state.
#[derive(Clone, Default)]
pub struct RequestScope {
    cancelled: Rc<Cell<bool>>,
    controller: Option<AbortController>,
}

impl RequestScope {
    pub fn new() -> Self {
        #[cfg(target_arch = "wasm32")]
        let controller = AbortController::new().ok();
        #[cfg(not(target_arch = "wasm32"))]
        let controller = None;

        Self {
            cancelled: Rc::new(Cell::new(false)),
            controller,
        }
    }

    pub fn signal(&self) -> Option<AbortSignal> {
        self.controller.as_ref().map(|c| c.signal())
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }

    pub fn cancel(&self) {
        if self.cancelled.replace(true) {
            return;
        }
        if let Some(controller) = &self.controller {
            controller.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_cancellation() {
        let scope = RequestScope::new();
        let task_view = scope.clone();
        assert!(!task_view.is_cancelled());
        scope.cancel();
        assert!(task_view.is_cancelled());
        scope.cancel();
        assert!(scope.is_cancelled());
    }
}
