//! Local network reachability, consulted by the poller before every status
//! check so that connectivity loss turns into a retry instead of an error.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

/// Reports whether the local network is currently reachable.
pub trait Connectivity: Send + Sync + 'static {
    fn is_online(&self) -> bool;
}

/// Connectivity for environments without an offline signal.
#[derive(Clone, Copy, Debug, Default)]
pub struct AlwaysOnline;

impl Connectivity for AlwaysOnline {
    fn is_online(&self) -> bool {
        true
    }
}

/// Connectivity flag shared between the poller and whatever observes the
/// network (an OS hook, a UI event, a test).
#[derive(Clone, Debug)]
pub struct NetworkMonitor {
    online: Arc<AtomicBool>,
}

impl NetworkMonitor {
    pub fn new(online: bool) -> Self {
        Self {
            online: Arc::new(AtomicBool::new(online)),
        }
    }

    pub fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::Release);
    }
}

impl Default for NetworkMonitor {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Connectivity for NetworkMonitor {
    fn is_online(&self) -> bool {
        self.online.load(Ordering::Acquire)
    }
}

impl<C: Connectivity> Connectivity for Arc<C> {
    fn is_online(&self) -> bool {
        (**self).is_online()
    }
}
