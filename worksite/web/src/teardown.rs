//! Ties spawned requests to the lifetime of the view that started them.

use dioxus::prelude::*;
use futures::future::{AbortHandle, Abortable, Aborted};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::future::Future;
use std::rc::Rc;
use tracing::debug;
use tracing_futures::Instrument;

/// Abort handles of the tasks still running, keyed by spawn order.
#[derive(Default)]
struct Running {
    next_id: Cell<u64>,
    handles: RefCell<HashMap<u64, AbortHandle>>,
}

impl Running {
    /// Registers `task`; the returned future deregisters it once it ends,
    /// whether it finished or was aborted.
    fn track<F: Future>(self: &Rc<Self>, task: F) -> impl Future<Output = Result<F::Output, Aborted>> {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let (handle, registration) = AbortHandle::new_pair();
        self.handles.borrow_mut().insert(id, handle);

        let running = Rc::clone(self);
        let task = Abortable::new(task, registration);
        async move {
            let outcome = task.await;
            running.handles.borrow_mut().remove(&id);
            outcome
        }
    }

    fn abort_all(&self) {
        for (_, handle) in self.handles.borrow_mut().drain() {
            handle.abort();
        }
    }

    fn len(&self) -> usize {
        self.handles.borrow().len()
    }
}

#[derive(Clone, Default)]
pub struct Teardown {
    running: Rc<Running>,
}

impl Teardown {
    /// Runs `task` until it finishes or the owning view unmounts, whichever
    /// comes first. An aborted task is never polled again, so it cannot
    /// write into signals of a dropped view.
    pub fn spawn(&self, name: &'static str, task: impl Future<Output = ()> + 'static) {
        let task = self
            .running
            .track(task)
            .instrument(tracing::info_span!("request", request = name));
        spawn_forever(async move {
            if task.await.is_err() {
                debug!(request = name, "Request aborted by view teardown");
            }
        });
    }

    fn abort_all(&self) {
        debug!(pending = self.running.len(), "Aborting view requests");
        self.running.abort_all();
    }
}

/// A `Teardown` that aborts everything it spawned when the component drops.
pub fn use_teardown() -> Teardown {
    let teardown = use_hook(Teardown::default);
    let on_drop = teardown.clone();
    use_drop(move || on_drop.abort_all());
    teardown
}
