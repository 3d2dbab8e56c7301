//! Timed output effects.
//!
//! Everything that waits (boot messages, the typewriter, animations) sleeps
//! through a [`TimeoutRegistry`], so one `clear_all` stops every pending
//! effect at its next wake-up.

mod timeout;
mod typewriter;

pub use timeout::{TimeoutRegistry, TimerHandle};
pub use typewriter::typewriter;

use std::cell::Cell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;

/// A boxed, single-threaded future.
pub type LocalFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Source of delays.
pub trait Sleeper {
    fn sleep(&self, ms: u32) -> LocalFuture<'static, ()>;
}

/// Real browser timers.
#[cfg(target_arch = "wasm32")]
pub struct BrowserSleeper;

#[cfg(target_arch = "wasm32")]
impl Sleeper for BrowserSleeper {
    fn sleep(&self, ms: u32) -> LocalFuture<'static, ()> {
        Box::pin(gloo_timers::future::TimeoutFuture::new(ms))
    }
}

/// Completes immediately, keeping count of the time it was asked to wait.
#[derive(Default)]
pub struct InstantSleeper {
    slept_ms: Cell<u64>,
    calls: Cell<usize>,
}

impl InstantSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slept_ms(&self) -> u64 {
        self.slept_ms.get()
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Sleeper for InstantSleeper {
    fn sleep(&self, ms: u32) -> LocalFuture<'static, ()> {
        self.slept_ms.set(self.slept_ms.get() + u64::from(ms));
        self.calls.set(self.calls.get() + 1);
        Box::pin(std::future::ready(()))
    }
}

/// Browser timers on wasm, instant elsewhere.
pub fn default_sleeper() -> Rc<dyn Sleeper> {
    #[cfg(target_arch = "wasm32")]
    {
        Rc::new(BrowserSleeper)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Rc::new(InstantSleeper::new())
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use super::{LocalFuture, Sleeper, TimeoutRegistry};

    /// Clears the registry from inside the n-th sleep, the way a skip
    /// arriving mid-animation would.
    pub(crate) struct CancelOnSleep {
        registry: RefCell<Option<TimeoutRegistry>>,
        countdown: Cell<usize>,
    }

    impl CancelOnSleep {
        pub(crate) fn on_call(n: usize) -> Rc<Self> {
            Rc::new(Self {
                registry: RefCell::new(None),
                countdown: Cell::new(n),
            })
        }

        pub(crate) fn arm(&self, registry: &TimeoutRegistry) {
            *self.registry.borrow_mut() = Some(registry.clone());
        }
    }

    impl Sleeper for CancelOnSleep {
        fn sleep(&self, _ms: u32) -> LocalFuture<'static, ()> {
            let left = self.countdown.get();
            self.countdown.set(left.saturating_sub(1));
            if left == 1
                && let Some(registry) = self.registry.borrow().as_ref()
            {
                registry.clear_all();
            }
            Box::pin(std::future::ready(()))
        }
    }
}
