use async_trait::async_trait;
use service_base::{LifecycleError, LifecycleResult, LifecycleState, Phase, ServiceBase};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Call {
    InitializeService,
    DisposeService,
    DisposeResources(bool),
}

/// Records every hook call. `start_test` forgets everything recorded during setup.
#[derive(Default)]
struct FakeService {
    lifecycle: LifecycleState,
    calls: Mutex<Vec<Call>>,
}

impl FakeService {
    fn start_test(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl ServiceBase for FakeService {
    fn lifecycle(&self) -> &LifecycleState {
        &self.lifecycle
    }

    async fn initialize_service(&self) -> LifecycleResult<()> {
        tokio::task::yield_now().await;
        self.record(Call::InitializeService);
        Ok(())
    }

    async fn dispose_service(&self) -> LifecycleResult<()> {
        self.record(Call::DisposeService);
        Ok(())
    }

    fn dispose_resources(&self, disposing: bool) -> LifecycleResult<()> {
        self.record(Call::DisposeResources(disposing));
        Ok(())
    }
}

// ===== initialize =====

#[tokio::test]
async fn test_initialize_fresh_calls_initialize_service() {
    let service = FakeService::default();
    service.start_test();

    service.initialize().await.unwrap();

    assert_eq!(service.calls(), vec![Call::InitializeService]);
    assert_eq!(service.lifecycle().phase(), Phase::Initialized);
}

#[tokio::test]
async fn test_initialize_initialized_does_not_call_initialize_service() {
    let service = FakeService::default();
    service.initialize().await.unwrap();
    service.start_test();

    service.initialize().await.unwrap();

    assert!(service.calls().is_empty());
}

#[tokio::test]
async fn test_initialize_after_dispose_async_does_not_call_initialize_service() {
    let service = FakeService::default();
    service.dispose_async().await.unwrap();
    service.start_test();

    service.initialize().await.unwrap();

    assert!(service.calls().is_empty());
    assert_eq!(service.lifecycle().phase(), Phase::Disposed { initialized: false });
}

#[tokio::test]
async fn test_initialize_after_dispose_does_not_call_initialize_service() {
    let service = FakeService::default();
    service.dispose().unwrap();
    service.start_test();

    service.initialize().await.unwrap();

    assert!(service.calls().is_empty());
    assert!(!service.lifecycle().is_initialized());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_initialize_runs_hook_once() {
    let service = Arc::new(FakeService::default());

    let handles: Vec<_> = (0..16)
        .map(|_| {
            let service = service.clone();
            tokio::spawn(async move { service.initialize().await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(service.calls(), vec![Call::InitializeService]);
}

// ===== dispose =====

#[test]
fn test_dispose_not_initialized_calls_dispose_resources_with_true() {
    let service = FakeService::default();
    service.start_test();

    service.dispose().unwrap();

    assert_eq!(service.calls(), vec![Call::DisposeResources(true)]);
    assert!(service.lifecycle().is_disposed());
}

#[tokio::test]
async fn test_dispose_initialized_calls_dispose_resources_with_true() {
    let service = FakeService::default();
    service.initialize().await.unwrap();
    service.start_test();

    service.dispose().unwrap();

    assert_eq!(service.calls(), vec![Call::DisposeResources(true)]);
    assert_eq!(service.lifecycle().phase(), Phase::Disposed { initialized: true });
}

#[test]
fn test_dispose_disposed_calls_dispose_resources_with_true() {
    let service = FakeService::default();
    service.dispose().unwrap();
    service.start_test();

    service.dispose().unwrap();

    assert_eq!(service.calls(), vec![Call::DisposeResources(true)]);
}

// ===== dispose_async =====

#[tokio::test]
async fn test_dispose_async_not_initialized_calls_both_hooks() {
    let service = FakeService::default();
    service.start_test();

    service.dispose_async().await.unwrap();

    assert_eq!(
        service.calls(),
        vec![Call::DisposeService, Call::DisposeResources(false)]
    );
    assert!(service.lifecycle().is_disposed());
}

#[tokio::test]
async fn test_dispose_async_initialized_calls_both_hooks() {
    let service = FakeService::default();
    service.initialize().await.unwrap();
    service.start_test();

    service.dispose_async().await.unwrap();

    assert_eq!(
        service.calls(),
        vec![Call::DisposeService, Call::DisposeResources(false)]
    );
}

#[tokio::test]
async fn test_dispose_async_disposed_calls_both_hooks() {
    let service = FakeService::default();
    service.dispose_async().await.unwrap();
    service.start_test();

    service.dispose_async().await.unwrap();

    assert_eq!(
        service.calls(),
        vec![Call::DisposeService, Call::DisposeResources(false)]
    );
}

// ===== check_valid_state =====

#[tokio::test]
async fn test_check_valid_state_initialized_is_ok() {
    let service = FakeService::default();
    service.initialize().await.unwrap();

    assert!(service.check_valid_state().is_ok());
}

#[test]
fn test_check_valid_state_fresh_is_not_initialized() {
    let service = FakeService::default();

    assert!(matches!(
        service.check_valid_state(),
        Err(LifecycleError::NotInitialized)
    ));
}

#[test]
fn test_check_valid_state_disposed_without_initialize_is_not_initialized() {
    let service = FakeService::default();
    service.dispose().unwrap();

    assert!(matches!(
        service.check_valid_state(),
        Err(LifecycleError::NotInitialized)
    ));
}

#[tokio::test]
async fn test_check_valid_state_initialized_then_disposed_is_already_disposed() {
    let service = FakeService::default();
    service.initialize().await.unwrap();
    service.dispose().unwrap();

    match service.check_valid_state() {
        Err(LifecycleError::AlreadyDisposed(name)) => {
            assert!(name.ends_with("FakeService"), "unexpected name: {}", name);
        }
        other => panic!("Expected AlreadyDisposed, got {:?}", other),
    }
}

// ===== hook failures =====

#[derive(Default)]
struct FailingService {
    lifecycle: LifecycleState,
    fail_initialize: bool,
    fail_dispose_service: bool,
    fail_dispose_resources: bool,
    calls: Mutex<Vec<Call>>,
}

impl FailingService {
    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ServiceBase for FailingService {
    fn lifecycle(&self) -> &LifecycleState {
        &self.lifecycle
    }

    async fn initialize_service(&self) -> LifecycleResult<()> {
        self.calls.lock().unwrap().push(Call::InitializeService);
        if self.fail_initialize {
            return Err(LifecycleError::hook(self.service_name(), "cannot connect"));
        }
        Ok(())
    }

    async fn dispose_service(&self) -> LifecycleResult<()> {
        self.calls.lock().unwrap().push(Call::DisposeService);
        if self.fail_dispose_service {
            return Err(LifecycleError::hook(self.service_name(), "flush failed"));
        }
        Ok(())
    }

    fn dispose_resources(&self, disposing: bool) -> LifecycleResult<()> {
        self.calls.lock().unwrap().push(Call::DisposeResources(disposing));
        if self.fail_dispose_resources {
            return Err(LifecycleError::hook(self.service_name(), "handle leak"));
        }
        Ok(())
    }
}

#[tokio::test]
async fn test_failed_initialize_hook_propagates_and_is_not_retried() {
    let service = FailingService {
        fail_initialize: true,
        ..Default::default()
    };

    let err = service.initialize().await.unwrap_err();
    assert!(err.to_string().contains("cannot connect"));

    // The flag was set before the hook ran.
    assert!(service.lifecycle().is_initialized());
    service.initialize().await.unwrap();
    assert_eq!(service.calls(), vec![Call::InitializeService]);
    assert!(service.check_valid_state().is_ok());
}

#[test]
fn test_failed_dispose_hook_still_marks_disposed() {
    let service = FailingService {
        fail_dispose_resources: true,
        ..Default::default()
    };

    let err = service.dispose().unwrap_err();

    assert!(matches!(err, LifecycleError::Hook { .. }));
    assert!(service.lifecycle().is_disposed());
}

#[tokio::test]
async fn test_failed_async_dispose_hook_skips_sync_hook() {
    let service = FailingService {
        fail_dispose_service: true,
        ..Default::default()
    };
    service.initialize().await.unwrap();

    let err = service.dispose_async().await.unwrap_err();

    assert!(err.to_string().contains("flush failed"));
    assert_eq!(
        service.calls(),
        vec![Call::InitializeService, Call::DisposeService]
    );
    assert!(!service.lifecycle().is_disposed());
    assert!(service.check_valid_state().is_ok());
}

#[tokio::test]
async fn test_failed_sync_hook_in_dispose_async_still_marks_disposed() {
    let service = FailingService {
        fail_dispose_resources: true,
        ..Default::default()
    };

    let err = service.dispose_async().await.unwrap_err();

    assert!(err.to_string().contains("handle leak"));
    assert_eq!(
        service.calls(),
        vec![Call::DisposeService, Call::DisposeResources(false)]
    );
    assert!(service.lifecycle().is_disposed());
}

#[test]
fn test_default_hooks_are_no_ops() {
    #[derive(Default)]
    struct Bare {
        lifecycle: LifecycleState,
    }

    #[async_trait]
    impl ServiceBase for Bare {
        fn lifecycle(&self) -> &LifecycleState {
            &self.lifecycle
        }
    }

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let bare: Arc<dyn ServiceBase> = Arc::new(Bare::default());
        bare.initialize().await.unwrap();
        bare.check_valid_state().unwrap();
        bare.dispose_async().await.unwrap();
        bare.dispose().unwrap();
        assert!(matches!(
            bare.check_valid_state(),
            Err(LifecycleError::AlreadyDisposed(name)) if name.ends_with("Bare")
        ));
    });
}
