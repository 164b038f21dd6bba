use std::sync::{
    Mutex, PoisonError,
    atomic::{AtomicBool, Ordering},
};

use tokio::sync::oneshot;

/// One-shot resolution latch.
///
/// The first caller of [`Latch::fire`] computes and delivers the value; every
/// later call is a no-op and returns `false`.
pub(crate) struct Latch<R> {
    fired: AtomicBool,
    tx: Mutex<Option<oneshot::Sender<R>>>,
}

impl<R> Latch<R> {
    pub(crate) fn new() -> (Self, oneshot::Receiver<R>) {
        let (tx, rx) = oneshot::channel();
        let latch = Self {
            fired: AtomicBool::new(false),
            tx: Mutex::new(Some(tx)),
        };
        (latch, rx)
    }

    #[inline]
    pub(crate) fn is_fired(&self) -> bool {
        self.fired.load(Ordering::Acquire)
    }

    /// Resolve with the value produced by `resolve`, if nobody resolved yet.
    ///
    /// `resolve` runs only for the winning caller.
    pub(crate) fn fire<F>(&self, resolve: F) -> bool
    where
        F: FnOnce() -> R,
    {
        if self.fired.swap(true, Ordering::AcqRel) {
            return false;
        }
        let value = resolve();
        let tx = self
            .tx
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(tx) = tx {
            // The receiver is gone only if the waiting caller was dropped.
            let _ = tx.send(value);
        }
        true
    }
}
