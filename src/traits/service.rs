//! The lifecycle contract for services.

use async_trait::async_trait;
use tracing::trace;

use crate::error::{LifecycleError, LifecycleResult};
use crate::state::LifecycleState;

/// Base trait for services with an async initialize/dispose lifecycle.
///
/// Implementors embed a [`LifecycleState`], return it from
/// [`lifecycle`](Self::lifecycle), and override whichever hooks they need:
///
/// - [`initialize_service`](Self::initialize_service) runs at most once, on
///   the first [`initialize`](Self::initialize) that happens before disposal.
/// - [`dispose_service`](Self::dispose_service) runs on every
///   [`dispose_async`](Self::dispose_async).
/// - [`dispose_resources`](Self::dispose_resources) runs on every disposal,
///   with `disposing == true` from [`dispose`](Self::dispose) and
///   `disposing == false` from [`dispose_async`](Self::dispose_async).
///
/// The provided operations own the flags, so hook overrides never need to
/// call back into a "base" implementation. Members that require a live
/// service start with `self.check_valid_state()?`.
///
/// Disposal is not idempotent: every call re-runs the disposal hooks.
///
/// # Examples
///
/// ```
/// use service_base::{LifecycleError, LifecycleResult, LifecycleState, ServiceBase};
/// use async_trait::async_trait;
/// use std::sync::Mutex;
///
/// #[derive(Default)]
/// struct Greeter {
///     lifecycle: LifecycleState,
///     greeting: Mutex<Option<String>>,
/// }
///
/// impl Greeter {
///     fn greet(&self, name: &str) -> LifecycleResult<String> {
///         self.check_valid_state()?;
///         let greeting = self.greeting.lock().unwrap();
///         Ok(format!("{}, {}!", greeting.as_deref().unwrap_or("Hello"), name))
///     }
/// }
///
/// #[async_trait]
/// impl ServiceBase for Greeter {
///     fn lifecycle(&self) -> &LifecycleState {
///         &self.lifecycle
///     }
///
///     async fn initialize_service(&self) -> LifecycleResult<()> {
///         *self.greeting.lock().unwrap() = Some("Howdy".to_string());
///         Ok(())
///     }
/// }
///
/// # #[tokio::main]
/// # async fn main() -> LifecycleResult<()> {
/// let greeter = Greeter::default();
/// assert!(matches!(greeter.greet("Ada"), Err(LifecycleError::NotInitialized)));
///
/// greeter.initialize().await?;
/// assert_eq!(greeter.greet("Ada")?, "Howdy, Ada!");
///
/// greeter.dispose_async().await?;
/// assert!(matches!(greeter.greet("Ada"), Err(LifecycleError::AlreadyDisposed(_))));
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait ServiceBase: Send + Sync {
    /// The flags guarding this service.
    fn lifecycle(&self) -> &LifecycleState;

    /// Concrete type name, reported by [`LifecycleError::AlreadyDisposed`].
    fn service_name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Initializes the service once.
    ///
    /// The first call made before any disposal marks the service initialized
    /// and then awaits [`initialize_service`](Self::initialize_service). Every
    /// other call returns `Ok(())` without running the hook.
    ///
    /// The flag is set before the hook runs. A failing hook therefore leaves
    /// the service initialized, and the error goes to the caller unchanged.
    async fn initialize(&self) -> LifecycleResult<()> {
        if !self.lifecycle().try_claim_initialization() {
            trace!(service = self.service_name(), "initialize skipped");
            return Ok(());
        }

        trace!(service = self.service_name(), "initializing");
        self.initialize_service().await
    }

    /// Disposes the service synchronously.
    ///
    /// Always runs [`dispose_resources`](Self::dispose_resources) with
    /// `disposing == true`, whatever the current state, then marks the
    /// service disposed. A hook error is returned after the flag is set.
    fn dispose(&self) -> LifecycleResult<()> {
        trace!(service = self.service_name(), disposing = true, "disposing");
        let result = self.dispose_resources(true);
        self.lifecycle().mark_disposed();
        result
    }

    /// Disposes the service asynchronously.
    ///
    /// Awaits [`dispose_service`](Self::dispose_service), then runs
    /// [`dispose_resources`](Self::dispose_resources) with
    /// `disposing == false`, then marks the service disposed. If the async
    /// hook fails the call stops there and the state is left untouched.
    async fn dispose_async(&self) -> LifecycleResult<()> {
        trace!(service = self.service_name(), disposing = false, "disposing");
        self.dispose_service().await?;
        let result = self.dispose_resources(false);
        self.lifecycle().mark_disposed();
        result
    }

    /// Checks that the service is live.
    ///
    /// Fails with [`LifecycleError::NotInitialized`] before initialization,
    /// and otherwise with [`LifecycleError::AlreadyDisposed`] after disposal.
    /// A service disposed without ever being initialized reports
    /// `NotInitialized`.
    fn check_valid_state(&self) -> LifecycleResult<()> {
        let lifecycle = self.lifecycle();
        if !lifecycle.is_initialized() {
            return Err(LifecycleError::NotInitialized);
        }

        if lifecycle.is_disposed() {
            return Err(LifecycleError::AlreadyDisposed(self.service_name()));
        }

        Ok(())
    }

    /// Hook: sets up service-specific resources.
    async fn initialize_service(&self) -> LifecycleResult<()> {
        Ok(())
    }

    /// Hook: releases service-specific resources asynchronously.
    async fn dispose_service(&self) -> LifecycleResult<()> {
        Ok(())
    }

    /// Hook: releases service-specific resources synchronously.
    ///
    /// `disposing` is `true` when called from an explicit [`dispose`](Self::dispose).
    fn dispose_resources(&self, _disposing: bool) -> LifecycleResult<()> {
        Ok(())
    }
}
