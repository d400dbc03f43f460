//! Deferred work queue polled by the host's main loop.
//!
//! Worker threads never call into the host. They push an item with a frame
//! delay, and the main thread drains whatever has come due once per frame.

use parking_lot::Mutex;

/// Thread-safe queue of items released after a number of frame advances.
#[derive(Debug)]
pub struct DeferredQueue<T> {
    inner: Mutex<Inner<T>>,
}

#[derive(Debug)]
struct Inner<T> {
    frame: u64,
    pending: Vec<(u64, T)>,
}

impl<T> DeferredQueue<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner {
                frame: 0,
                pending: Vec::new(),
            }),
        }
    }

    /// Queue `item` to be returned by the `delay_frames`-th next [`advance`](Self::advance).
    ///
    /// A delay of 0 behaves like 1: nothing scheduled runs inside the current frame.
    pub fn schedule(&self, delay_frames: u64, item: T) {
        let mut inner = self.inner.lock();
        let due = inner.frame + delay_frames.max(1);
        inner.pending.push((due, item));
    }

    /// Move to the next frame and return every item that is now due, in the
    /// order it was scheduled.
    pub fn advance(&self) -> Vec<T> {
        let mut inner = self.inner.lock();
        inner.frame += 1;
        let frame = inner.frame;

        let (ready, waiting): (Vec<_>, Vec<_>) =
            std::mem::take(&mut inner.pending).into_iter().partition(|(due, _)| *due <= frame);
        inner.pending = waiting;

        ready.into_iter().map(|(_, item)| item).collect()
    }

    /// Frames advanced so far.
    pub fn frame(&self) -> u64 {
        self.inner.lock().frame
    }

    pub fn len(&self) -> usize {
        self.inner.lock().pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
