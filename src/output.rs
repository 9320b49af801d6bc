//! Output sinks
//!
//! The session hands every steering command and notice to an `OutputSink`.
//! Sentence encoding and transport belong to the sink implementation.

use std::sync::{Mutex, MutexGuard, PoisonError};

use route_pilot_core::navigation::NavigationOutput;
use route_pilot_core::parameters::SentenceFlags;
use tracing::{debug, info};

use crate::messages::Notice;

/// Destination for steering commands and host notices
///
/// Called from the navigation tick; implementations must not block.
pub trait OutputSink: Send + Sync {
    /// Publish the steering command for this tick as the selected sentences
    fn publish(&self, output: &NavigationOutput, sentences: SentenceFlags);

    /// Deliver a notice to the host
    fn notify(&self, notice: &Notice);
}

/// Sink that only logs
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl OutputSink for LogSink {
    fn publish(&self, output: &NavigationOutput, sentences: SentenceFlags) {
        debug!(
            "steer {:.1} xte {:+.3}nm to {} range {:.2}nm [{:?}]",
            output.bearing_deg,
            output.xte_nm,
            output.destination_name.as_str(),
            output.range_nm,
            sentences
        );
    }

    fn notify(&self, notice: &Notice) {
        info!("{} {}", notice.message_id(), notice.body());
    }
}

/// Sink that records everything it receives
#[derive(Debug, Default)]
pub struct CollectingSink {
    outputs: Mutex<Vec<(NavigationOutput, SentenceFlags)>>,
    notices: Mutex<Vec<Notice>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All published outputs, oldest first
    pub fn outputs(&self) -> Vec<NavigationOutput> {
        lock(&self.outputs).iter().map(|(o, _)| o.clone()).collect()
    }

    /// Most recent output and its sentence selection
    pub fn last_output(&self) -> Option<(NavigationOutput, SentenceFlags)> {
        lock(&self.outputs).last().cloned()
    }

    /// All notices, oldest first
    pub fn notices(&self) -> Vec<Notice> {
        lock(&self.notices).clone()
    }

    /// Take and clear the recorded notices
    pub fn drain_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut *lock(&self.notices))
    }
}

impl OutputSink for CollectingSink {
    fn publish(&self, output: &NavigationOutput, sentences: SentenceFlags) {
        lock(&self.outputs).push((output.clone(), sentences));
    }

    fn notify(&self, notice: &Notice) {
        lock(&self.notices).push(notice.clone());
    }
}

impl<S: OutputSink + ?Sized> OutputSink for std::sync::Arc<S> {
    fn publish(&self, output: &NavigationOutput, sentences: SentenceFlags) {
        (**self).publish(output, sentences);
    }

    fn notify(&self, notice: &Notice) {
        (**self).notify(notice);
    }
}

/// Lock a mutex, recovering the data if a holder panicked
pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
