use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use super::{Sleeper, default_sleeper};
use crate::config::timeouts::MAX_PENDING;
use crate::core::error::TimerError;

/// One pending delay. Cancelling it makes the waiting task see
/// [`TimerError::Cancelled`] when it wakes.
#[derive(Clone, Debug)]
pub struct TimerHandle {
    id: u64,
    cancelled: Rc<Cell<bool>>,
}

impl TimerHandle {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.get()
    }
}

struct Registry {
    pending: VecDeque<TimerHandle>,
    next_id: u64,
    capacity: usize,
}

/// Tracks every pending delay of the session.
///
/// Cloning yields another handle to the same registry.
#[derive(Clone)]
pub struct TimeoutRegistry {
    inner: Rc<RefCell<Registry>>,
    sleeper: Rc<dyn Sleeper>,
}

impl Default for TimeoutRegistry {
    fn default() -> Self {
        Self::new(default_sleeper())
    }
}

impl TimeoutRegistry {
    pub fn new(sleeper: Rc<dyn Sleeper>) -> Self {
        Self::with_capacity(sleeper, MAX_PENDING)
    }

    pub fn with_capacity(sleeper: Rc<dyn Sleeper>, capacity: usize) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Registry {
                pending: VecDeque::new(),
                next_id: 1,
                capacity: capacity.max(1),
            })),
            sleeper,
        }
    }

    /// Track a new delay. At capacity the oldest pending one is cancelled.
    pub fn register(&self) -> TimerHandle {
        let mut reg = self.inner.borrow_mut();
        if reg.pending.len() >= reg.capacity
            && let Some(oldest) = reg.pending.pop_front()
        {
            log::warn!("timeout registry full, cancelling timer {}", oldest.id);
            oldest.cancelled.set(true);
        }
        let handle = TimerHandle {
            id: reg.next_id,
            cancelled: Rc::new(Cell::new(false)),
        };
        reg.next_id += 1;
        reg.pending.push_back(handle.clone());
        handle
    }

    /// Cancel one pending delay. Returns `false` if it was not pending.
    pub fn remove(&self, id: u64) -> bool {
        match self.take(id) {
            Some(handle) => {
                handle.cancelled.set(true);
                true
            }
            None => false,
        }
    }

    /// Stop tracking a delay that has elapsed.
    fn release(&self, id: u64) {
        self.take(id);
    }

    fn take(&self, id: u64) -> Option<TimerHandle> {
        let mut reg = self.inner.borrow_mut();
        let index = reg.pending.iter().position(|h| h.id == id)?;
        reg.pending.remove(index)
    }

    /// Cancel everything pending. Returns how many delays were cancelled.
    pub fn clear_all(&self) -> usize {
        let drained: Vec<TimerHandle> = self.inner.borrow_mut().pending.drain(..).collect();
        for handle in &drained {
            handle.cancelled.set(true);
        }
        if !drained.is_empty() {
            log::debug!("cancelled {} pending timers", drained.len());
        }
        drained.len()
    }

    pub fn pending(&self) -> usize {
        self.inner.borrow().pending.len()
    }

    /// Wait `ms` milliseconds as a tracked delay.
    pub async fn delay(&self, ms: u32) -> Result<(), TimerError> {
        let handle = self.register();
        self.sleeper.sleep(ms).await;
        self.release(handle.id);
        if handle.is_cancelled() {
            Err(TimerError::Cancelled)
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::effects::InstantSleeper;
    use crate::core::effects::testing::CancelOnSleep;

    fn registry(capacity: usize) -> TimeoutRegistry {
        TimeoutRegistry::with_capacity(Rc::new(InstantSleeper::new()), capacity)
    }

    #[test]
    fn test_register_and_remove() {
        let timers = registry(10);
        let a = timers.register();
        let b = timers.register();
        assert_eq!(timers.pending(), 2);

        assert!(timers.remove(a.id()));
        assert!(a.is_cancelled());
        assert!(!b.is_cancelled());
        assert!(!timers.remove(a.id()));
        assert_eq!(timers.pending(), 1);
    }

    #[test]
    fn test_overflow_cancels_oldest() {
        let timers = registry(3);
        let handles: Vec<TimerHandle> = (0..4).map(|_| timers.register()).collect();
        assert_eq!(timers.pending(), 3);
        assert!(handles[0].is_cancelled());
        assert!(handles[1..].iter().all(|h| !h.is_cancelled()));
    }

    #[test]
    fn test_clear_all() {
        let timers = registry(10);
        let handles: Vec<TimerHandle> = (0..5).map(|_| timers.register()).collect();
        assert_eq!(timers.clear_all(), 5);
        assert_eq!(timers.pending(), 0);
        assert!(handles.iter().all(TimerHandle::is_cancelled));
        assert_eq!(timers.clear_all(), 0);
    }

    #[test]
    fn test_default_capacity() {
        let timers = registry(MAX_PENDING);
        let first = timers.register();
        for _ in 0..MAX_PENDING {
            timers.register();
        }
        assert!(first.is_cancelled());
        assert_eq!(timers.pending(), MAX_PENDING);
    }

    #[tokio::test]
    async fn test_delay_releases_handle() {
        let sleeper = Rc::new(InstantSleeper::new());
        let timers = TimeoutRegistry::new(sleeper.clone());
        timers.delay(25).await.unwrap();
        timers.delay(5).await.unwrap();
        assert_eq!(timers.pending(), 0);
        assert_eq!(sleeper.slept_ms(), 30);
    }

    #[tokio::test]
    async fn test_delay_reports_cancellation() {
        let sleeper = CancelOnSleep::on_call(2);
        let timers = TimeoutRegistry::new(sleeper.clone());
        sleeper.arm(&timers);

        assert_eq!(timers.delay(10).await, Ok(()));
        assert_eq!(timers.delay(10).await, Err(TimerError::Cancelled));
        assert_eq!(timers.pending(), 0);
    }
}
