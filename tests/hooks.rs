use keyed_di::{Container, DiError, HookEvent, Lifecycle};
use std::sync::{Arc, Mutex};

fn recording_container() -> (Container, Arc<Mutex<Vec<String>>>) {
    let di = Container::default();
    let log = Arc::new(Mutex::new(Vec::new()));
    for event in [
        HookEvent::BeforeResolve,
        HookEvent::AfterResolve,
        HookEvent::BeforeCreate,
        HookEvent::AfterCreate,
    ] {
        let sink = log.clone();
        di.hook(event, move |ctx| {
            sink.lock()
                .unwrap()
                .push(format!("{}:{}", ctx.event, ctx.service));
        })
        .unwrap();
    }
    (di, log)
}

#[test]
fn test_hook_firing_order_on_creation() {
    let (di, log) = recording_container();
    di.singleton("svc", |_| Ok(1u8)).unwrap();

    di.resolve("svc").unwrap();
    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "beforeResolve:svc",
            "beforeCreate:svc",
            "afterCreate:svc",
            "afterResolve:svc",
        ]
    );
}

#[test]
fn test_cache_hit_skips_creation_hooks() {
    let (di, log) = recording_container();
    di.singleton("svc", |_| Ok(1u8)).unwrap();

    di.resolve("svc").unwrap();
    log.lock().unwrap().clear();

    di.resolve("svc").unwrap();
    // Cached singletons short-circuit: only the entry hook fires.
    assert_eq!(*log.lock().unwrap(), vec!["beforeResolve:svc"]);
}

#[test]
fn test_hook_context_carries_scope_lifecycle_and_instance() {
    let di = Container::default();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    di.hook(HookEvent::AfterResolve, move |ctx| {
        let value = ctx
            .instance
            .as_ref()
            .and_then(|i| i.clone().downcast::<u8>().ok())
            .map(|v| *v);
        sink.lock()
            .unwrap()
            .push((ctx.scope.clone(), ctx.lifecycle, value));
    })
    .unwrap();

    di.scoped("session", |_| Ok(9u8)).unwrap();
    let scope = di.create_scope("req").unwrap();
    scope.resolve("session").unwrap();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![(Some("req".to_string()), Some(Lifecycle::Scoped), Some(9u8))]
    );
}

#[test]
fn test_before_resolve_carries_no_instance() {
    let di = Container::default();
    let saw_instance = Arc::new(Mutex::new(None));
    let sink = saw_instance.clone();
    di.hook(HookEvent::BeforeResolve, move |ctx| {
        *sink.lock().unwrap() = Some(ctx.instance.is_some());
    })
    .unwrap();

    di.singleton("svc", |_| Ok(1u8)).unwrap();
    di.resolve("svc").unwrap();
    assert_eq!(*saw_instance.lock().unwrap(), Some(false));
}

#[test]
fn test_panicking_hook_is_suppressed() {
    let di = Container::default();
    di.hook(HookEvent::BeforeResolve, |_| {
        panic!("observer gone rogue");
    })
    .unwrap();

    let ran = Arc::new(Mutex::new(false));
    let ran_clone = ran.clone();
    di.hook(HookEvent::BeforeResolve, move |_| {
        *ran_clone.lock().unwrap() = true;
    })
    .unwrap();

    di.singleton("svc", |_| Ok(1u8)).unwrap();
    // Resolution succeeds and later hooks still run.
    assert!(di.resolve("svc").is_ok());
    assert!(*ran.lock().unwrap());
}

#[test]
fn test_clear_hooks() {
    let (di, log) = recording_container();
    di.singleton("svc", |_| Ok(1u8)).unwrap();

    di.clear_hooks(HookEvent::BeforeResolve);
    di.clear_hooks(HookEvent::AfterResolve);
    di.resolve("svc").unwrap();

    assert_eq!(
        *log.lock().unwrap(),
        vec!["beforeCreate:svc", "afterCreate:svc"]
    );
}

#[test]
fn test_hook_limit_enforced() {
    let di = Container::new(keyed_di::ContainerOptions {
        max_hooks_per_event: 2,
        ..Default::default()
    });

    di.hook(HookEvent::BeforeResolve, |_| {}).unwrap();
    di.hook(HookEvent::BeforeResolve, |_| {}).unwrap();
    let err = di.hook(HookEvent::BeforeResolve, |_| {}).unwrap_err();
    assert!(matches!(err, DiError::ResourceLimit { limit: 2, .. }));
    assert!(err.to_string().contains("Resource limit exceeded"));

    // Other events have their own lists.
    di.hook(HookEvent::AfterResolve, |_| {}).unwrap();
}
