//! Diagnostic observers for service lifecycles.
//!
//! A [`ServiceHost`](crate::ServiceHost) notifies its observers around every
//! child initialization and disposal, which makes slow or failing hooks easy
//! to spot without touching the services themselves.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error};

use crate::LifecycleError;

/// Which disposal entry point is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisposalKind {
    /// [`ServiceBase::dispose`](crate::ServiceBase::dispose), an explicit deterministic disposal.
    Sync,
    /// [`ServiceBase::dispose_async`](crate::ServiceBase::dispose_async).
    Async,
}

/// Observer trait for lifecycle events.
///
/// Every method has an empty default, so implementations only override what
/// they care about. Calls are made inline on the lifecycle path; keep them cheap.
///
/// # Examples
///
/// ```
/// use service_base::{LifecycleObserver, ServiceHost};
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::time::Duration;
///
/// #[derive(Default)]
/// struct InitCounter(AtomicUsize);
///
/// impl LifecycleObserver for InitCounter {
///     fn initialized(&self, _service: &str, _duration: Duration) {
///         self.0.fetch_add(1, Ordering::SeqCst);
///     }
/// }
///
/// let host = ServiceHost::builder()
///     .observer(Arc::new(InitCounter::default()))
///     .build();
/// assert!(host.is_empty());
/// ```
pub trait LifecycleObserver: Send + Sync {
    /// Called before a fresh service's `initialize` runs.
    ///
    /// Services that are already initialized or disposed are skipped and
    /// produce no initialization events.
    fn initializing(&self, _service: &str) {}

    /// Called after a service's `initialize` succeeded.
    fn initialized(&self, _service: &str, _duration: Duration) {}

    /// Called before a service is disposed.
    fn disposing(&self, _service: &str, _kind: DisposalKind) {}

    /// Called after a service was disposed without error.
    fn disposed(&self, _service: &str, _kind: DisposalKind, _duration: Duration) {}

    /// Called when a lifecycle operation on a service returned an error.
    ///
    /// The error still propagates according to the host's options.
    fn hook_failed(&self, _service: &str, _error: &LifecycleError) {}
}

/// Registered observers, notified in registration order.
#[derive(Default)]
pub(crate) struct Observers {
    observers: Vec<Arc<dyn LifecycleObserver>>,
}

impl Observers {
    pub(crate) fn add(&mut self, observer: Arc<dyn LifecycleObserver>) {
        self.observers.push(observer);
    }

    #[inline]
    pub(crate) fn initializing(&self, service: &str) {
        for observer in &self.observers {
            observer.initializing(service);
        }
    }

    #[inline]
    pub(crate) fn initialized(&self, service: &str, duration: Duration) {
        for observer in &self.observers {
            observer.initialized(service, duration);
        }
    }

    #[inline]
    pub(crate) fn disposing(&self, service: &str, kind: DisposalKind) {
        for observer in &self.observers {
            observer.disposing(service, kind);
        }
    }

    #[inline]
    pub(crate) fn disposed(&self, service: &str, kind: DisposalKind, duration: Duration) {
        for observer in &self.observers {
            observer.disposed(service, kind, duration);
        }
    }

    #[inline]
    pub(crate) fn hook_failed(&self, service: &str, error: &LifecycleError) {
        for observer in &self.observers {
            observer.hook_failed(service, error);
        }
    }
}

/// Observer that forwards lifecycle events to `tracing`.
///
/// # Examples
///
/// ```
/// use service_base::{LoggingObserver, ServiceHost};
/// use std::sync::Arc;
///
/// let host = ServiceHost::builder()
///     .observer(Arc::new(LoggingObserver::with_prefix("[billing]")))
///     .build();
/// ```
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    /// Creates a new logging observer with default prefix.
    pub fn new() -> Self {
        Self {
            prefix: "[service-base]".to_string(),
        }
    }

    /// Creates a new logging observer with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Default for LoggingObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl LifecycleObserver for LoggingObserver {
    fn initializing(&self, service: &str) {
        debug!(prefix = %self.prefix, service, "initializing");
    }

    fn initialized(&self, service: &str, duration: Duration) {
        debug!(prefix = %self.prefix, service, ?duration, "initialized");
    }

    fn disposing(&self, service: &str, kind: DisposalKind) {
        debug!(prefix = %self.prefix, service, ?kind, "disposing");
    }

    fn disposed(&self, service: &str, kind: DisposalKind, duration: Duration) {
        debug!(prefix = %self.prefix, service, ?kind, ?duration, "disposed");
    }

    fn hook_failed(&self, service: &str, error: &LifecycleError) {
        error!(prefix = %self.prefix, service, %error, "lifecycle hook failed");
    }
}
