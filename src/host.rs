//! Host that drives a set of services through their lifecycle.
//!
//! The host is itself a [`ServiceBase`]: initializing it initializes every
//! child in registration order, and disposing it disposes every child in the
//! configured [`DisposalOrder`]. It never constructs or resolves services;
//! callers hand it ready-made instances.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::observer::{DisposalKind, LifecycleObserver, Observers};
use crate::options::{DisposalOrder, HostOptions};
use crate::state::{LifecycleState, Phase};
use crate::{LifecycleError, LifecycleResult, ServiceBase};

/// Owner of a fixed list of services.
///
/// # Examples
///
/// ```
/// use service_base::{LifecycleState, ServiceBase, ServiceHost};
/// use async_trait::async_trait;
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct Cache {
///     lifecycle: LifecycleState,
/// }
///
/// #[async_trait]
/// impl ServiceBase for Cache {
///     fn lifecycle(&self) -> &LifecycleState {
///         &self.lifecycle
///     }
/// }
///
/// # #[tokio::main]
/// # async fn main() -> service_base::LifecycleResult<()> {
/// let cache = Arc::new(Cache::default());
/// let host = ServiceHost::builder().service(cache.clone()).build();
///
/// host.initialize().await?;
/// cache.check_valid_state()?;
///
/// host.dispose_async().await?;
/// assert!(cache.lifecycle().is_disposed());
/// # Ok(())
/// # }
/// ```
pub struct ServiceHost {
    lifecycle: LifecycleState,
    services: Vec<Arc<dyn ServiceBase>>,
    options: HostOptions,
    observers: Observers,
}

impl ServiceHost {
    pub fn builder() -> ServiceHostBuilder {
        ServiceHostBuilder::default()
    }

    /// Registered services, available only while the host is live.
    pub fn services(&self) -> LifecycleResult<&[Arc<dyn ServiceBase>]> {
        self.check_valid_state()?;
        Ok(&self.services)
    }

    pub fn options(&self) -> &HostOptions {
        &self.options
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }

    fn in_disposal_order(&self) -> Vec<&Arc<dyn ServiceBase>> {
        match self.options.disposal_order {
            DisposalOrder::Reverse => self.services.iter().rev().collect(),
            DisposalOrder::Forward => self.services.iter().collect(),
        }
    }

    /// Reports one child's disposal outcome.
    ///
    /// Returns `Err` when the remaining children must be skipped.
    fn settle_disposal(
        &self,
        service: &'static str,
        kind: DisposalKind,
        started: Instant,
        result: LifecycleResult<()>,
        first_error: &mut Option<LifecycleError>,
    ) -> LifecycleResult<()> {
        match result {
            Ok(()) => {
                self.observers.disposed(service, kind, started.elapsed());
                Ok(())
            }
            Err(err) => {
                self.observers.hook_failed(service, &err);
                if !self.options.continue_on_error {
                    return Err(err);
                }
                first_error.get_or_insert(err);
                Ok(())
            }
        }
    }
}

#[async_trait]
impl ServiceBase for ServiceHost {
    fn lifecycle(&self) -> &LifecycleState {
        &self.lifecycle
    }

    async fn initialize_service(&self) -> LifecycleResult<()> {
        debug!(services = self.services.len(), "initializing hosted services");
        for service in &self.services {
            let name = service.service_name();
            if service.lifecycle().phase() != Phase::Fresh {
                debug!(service = name, "skipping service that is already initialized or disposed");
                continue;
            }

            self.observers.initializing(name);
            let started = Instant::now();
            if let Err(err) = service.initialize().await {
                self.observers.hook_failed(name, &err);
                return Err(err);
            }
            self.observers.initialized(name, started.elapsed());
        }
        Ok(())
    }

    async fn dispose_service(&self) -> LifecycleResult<()> {
        debug!(services = self.services.len(), "disposing hosted services asynchronously");
        let mut first_error = None;
        for service in self.in_disposal_order() {
            let name = service.service_name();
            self.observers.disposing(name, DisposalKind::Async);
            let started = Instant::now();
            let result = service.dispose_async().await;
            self.settle_disposal(name, DisposalKind::Async, started, result, &mut first_error)?;
        }

        // Every child was attempted, so the host is retired even though the
        // error skips the rest of `dispose_async`.
        if let Some(err) = first_error {
            self.lifecycle.mark_disposed();
            return Err(err);
        }
        Ok(())
    }

    fn dispose_resources(&self, disposing: bool) -> LifecycleResult<()> {
        // The async path already disposed the children.
        if !disposing {
            return Ok(());
        }

        debug!(services = self.services.len(), "disposing hosted services");
        let mut first_error = None;
        for service in self.in_disposal_order() {
            let name = service.service_name();
            self.observers.disposing(name, DisposalKind::Sync);
            let started = Instant::now();
            let result = service.dispose();
            self.settle_disposal(name, DisposalKind::Sync, started, result, &mut first_error)?;
        }
        first_error.map_or(Ok(()), Err)
    }
}

impl Drop for ServiceHost {
    fn drop(&mut self) {
        if self.lifecycle.phase() == Phase::Initialized {
            warn!(
                services = self.services.len(),
                "ServiceHost dropped while live. Call dispose_async().await before dropping."
            );
        }
    }
}

/// Builder for [`ServiceHost`].
#[derive(Default)]
pub struct ServiceHostBuilder {
    services: Vec<Arc<dyn ServiceBase>>,
    options: HostOptions,
    observers: Observers,
}

impl ServiceHostBuilder {
    /// Adds a service. Services initialize in the order they are added.
    pub fn service(mut self, service: Arc<dyn ServiceBase>) -> Self {
        self.services.push(service);
        self
    }

    pub fn options(mut self, options: HostOptions) -> Self {
        self.options = options;
        self
    }

    pub fn observer(mut self, observer: Arc<dyn LifecycleObserver>) -> Self {
        self.observers.add(observer);
        self
    }

    pub fn build(self) -> ServiceHost {
        ServiceHost {
            lifecycle: LifecycleState::new(),
            services: self.services,
            options: self.options,
            observers: self.observers,
        }
    }
}
