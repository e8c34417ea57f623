//! Error types for the service lifecycle.

use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Lifecycle errors
///
/// Raised when a service is used outside its live window, or when one of its
/// lifecycle hooks fails.
///
/// # Examples
///
/// ```rust
/// use service_base::LifecycleError;
///
/// let not_initialized = LifecycleError::NotInitialized;
/// let disposed = LifecycleError::AlreadyDisposed("my_app::Cache");
///
/// println!("Error: {}", not_initialized);
/// println!("Error: {}", disposed);
/// ```
#[derive(Debug, Clone)]
pub enum LifecycleError {
    /// Service used before `initialize` ran
    NotInitialized,
    /// Service used after disposal (includes the concrete type name)
    AlreadyDisposed(&'static str),
    /// A lifecycle hook failed
    Hook {
        service: &'static str,
        source: Arc<dyn Error + Send + Sync>,
    },
}

impl LifecycleError {
    /// Wraps a hook failure for the named service.
    ///
    /// ```rust
    /// use service_base::LifecycleError;
    ///
    /// let err = LifecycleError::hook("my_app::Db", "connection refused");
    /// assert_eq!(err.to_string(), "Hook failed in my_app::Db: connection refused");
    /// ```
    pub fn hook(service: &'static str, source: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        LifecycleError::Hook {
            service,
            source: Arc::from(source.into()),
        }
    }
}

impl fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LifecycleError::NotInitialized => write!(f, "Service is not initialized"),
            LifecycleError::AlreadyDisposed(name) => write!(f, "Service already disposed: {}", name),
            LifecycleError::Hook { service, source } => {
                write!(f, "Hook failed in {}: {}", service, source)
            }
        }
    }
}

impl Error for LifecycleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            LifecycleError::Hook { source, .. } => Some(&**source),
            _ => None,
        }
    }
}

/// Result type for lifecycle operations
///
/// A convenience alias for `Result<T, LifecycleError>`, used by every
/// operation and hook in this crate.
pub type LifecycleResult<T> = Result<T, LifecycleError>;
