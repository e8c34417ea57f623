//! # service-base
//!
//! Async initialization and disposal lifecycle for services managed by a
//! dependency-injection host.
//!
//! ## Features
//!
//! - **Initialize once**: the initialization hook runs at most once, and never after disposal
//! - **Sync and async disposal**: `dispose()` and `dispose_async()` with separate hooks
//! - **Guarded members**: `check_valid_state()` rejects use before initialization or after disposal
//! - **Lock-free state**: both flags live in one atomic, so services are `Send + Sync`
//! - **Hosting**: `ServiceHost` initializes services in order and disposes them in reverse
//!
//! ## Quick Start
//!
//! ```rust
//! use service_base::{LifecycleError, LifecycleResult, LifecycleState, ServiceBase};
//! use async_trait::async_trait;
//!
//! #[derive(Default)]
//! struct Database {
//!     lifecycle: LifecycleState,
//! }
//!
//! impl Database {
//!     fn query(&self, sql: &str) -> LifecycleResult<usize> {
//!         self.check_valid_state()?;
//!         Ok(sql.len())
//!     }
//! }
//!
//! #[async_trait]
//! impl ServiceBase for Database {
//!     fn lifecycle(&self) -> &LifecycleState {
//!         &self.lifecycle
//!     }
//!
//!     async fn initialize_service(&self) -> LifecycleResult<()> {
//!         // open connections...
//!         Ok(())
//!     }
//!
//!     async fn dispose_service(&self) -> LifecycleResult<()> {
//!         // close connections...
//!         Ok(())
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() -> LifecycleResult<()> {
//! let db = Database::default();
//! assert!(matches!(db.query("SELECT 1"), Err(LifecycleError::NotInitialized)));
//!
//! db.initialize().await?;
//! assert_eq!(db.query("SELECT 1")?, 8);
//!
//! db.dispose_async().await?;
//! assert!(matches!(db.query("SELECT 1"), Err(LifecycleError::AlreadyDisposed(_))));
//! # Ok(())
//! # }
//! ```
//!
//! ## Lifecycle
//!
//! A service starts fresh. `initialize()` moves it to initialized; either
//! disposal form moves it to disposed. Disposal is terminal: a disposed
//! service never initializes. Disposal itself is not idempotent, so every
//! call re-runs the disposal hooks.

pub mod error;
pub mod host;
pub mod observer;
pub mod options;
pub mod state;
pub mod traits;

pub use error::{LifecycleError, LifecycleResult};
pub use host::{ServiceHost, ServiceHostBuilder};
pub use observer::{DisposalKind, LifecycleObserver, LoggingObserver};
pub use options::{DisposalOrder, HostOptions};
pub use state::{LifecycleState, Phase};
pub use traits::ServiceBase;
