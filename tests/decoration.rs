use keyed_di::{AnyArc, Container, Decorate, DependencyResolver, Deps, DiError, DiResult};
use std::sync::Arc;

struct Greeting(String);

fn wrap(instance: AnyArc, label: &str) -> DiResult<AnyArc> {
    let greeting = instance
        .downcast::<Greeting>()
        .map_err(|_| DiError::InvalidArgument("expected a Greeting".into()))?;
    Ok(Arc::new(Greeting(format!("{}({})", label, greeting.0))))
}

#[test]
fn test_inline_decorators_apply_in_order() {
    let di = Container::default();
    di.register("greeting")
        .factory(|_| Ok(Greeting("hello".into())))
        .decorate(|instance, _| wrap(instance, "outer"))
        .decorate(|instance, _| wrap(instance, "outermost"))
        .as_singleton()
        .unwrap();

    let greeting = di.resolve_as::<Greeting>("greeting").unwrap();
    assert_eq!(greeting.0, "outermost(outer(hello))");
}

#[test]
fn test_named_decorator_service() {
    struct Exclaim;
    impl Decorate for Exclaim {
        fn decorate(&self, instance: AnyArc, _deps: &Deps<'_>) -> DiResult<AnyArc> {
            let greeting = instance
                .downcast::<Greeting>()
                .map_err(|_| DiError::InvalidArgument("expected a Greeting".into()))?;
            Ok(Arc::new(Greeting(format!("{}!", greeting.0))))
        }
    }

    let di = Container::default();
    di.decorator("exclaim", Exclaim).unwrap();
    di.register("greeting")
        .factory(|_| Ok(Greeting("hi".into())))
        .decorate_with(["exclaim", "exclaim"])
        .as_singleton()
        .unwrap();

    let greeting = di.resolve_as::<Greeting>("greeting").unwrap();
    assert_eq!(greeting.0, "hi!!");
}

#[test]
fn test_decorator_can_use_dependencies() {
    struct Suffix;
    impl Decorate for Suffix {
        fn decorate(&self, instance: AnyArc, deps: &Deps<'_>) -> DiResult<AnyArc> {
            let suffix = deps.get_as::<String>("suffix")?;
            let greeting = instance
                .downcast::<Greeting>()
                .map_err(|_| DiError::InvalidArgument("expected a Greeting".into()))?;
            Ok(Arc::new(Greeting(format!("{} {}", greeting.0, suffix))))
        }
    }

    let di = Container::default();
    di.value("suffix", String::from("world")).unwrap();
    di.decorator("suffix-deco", Suffix).unwrap();
    di.register("greeting")
        .factory(|_| Ok(Greeting("hello".into())))
        .decorate_with(["suffix-deco"])
        .as_singleton()
        .unwrap();

    let greeting = di.resolve_as::<Greeting>("greeting").unwrap();
    assert_eq!(greeting.0, "hello world");
}

#[test]
fn test_missing_named_decorator_is_a_contract_error() {
    let di = Container::default();
    di.register("greeting")
        .factory(|_| Ok(Greeting("hi".into())))
        .decorate_with(["ghost"])
        .as_singleton()
        .unwrap();

    let err = di.resolve("greeting").unwrap_err();
    match &err {
        DiError::DecoratorContract(msg) => {
            assert!(msg.contains("'ghost'"));
            assert!(msg.contains("is not registered"));
        }
        other => panic!("expected DecoratorContract, got {:?}", other),
    }
}

#[test]
fn test_named_service_without_decorate_operation() {
    let di = Container::default();
    di.value("plain", 42usize).unwrap();
    di.register("greeting")
        .factory(|_| Ok(Greeting("hi".into())))
        .decorate_with(["plain"])
        .as_singleton()
        .unwrap();

    let err = di.resolve("greeting").unwrap_err();
    match &err {
        DiError::DecoratorContract(msg) => {
            assert!(msg.contains("has no decorate operation"));
        }
        other => panic!("expected DecoratorContract, got {:?}", other),
    }
}

#[test]
fn test_type_changing_decorator_is_rejected() {
    let di = Container::default();
    di.register("greeting")
        .factory(|_| Ok(Greeting("hi".into())))
        .decorate(|_, _| Ok(Arc::new(123usize) as AnyArc))
        .as_singleton()
        .unwrap();

    let err = di.resolve("greeting").unwrap_err();
    match &err {
        DiError::DecoratorContract(msg) => {
            assert!(msg.contains("returned a value of a different type"));
        }
        other => panic!("expected DecoratorContract, got {:?}", other),
    }
}

#[test]
fn test_decoration_runs_once_per_singleton() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    let applied = Arc::new(AtomicUsize::new(0));
    let applied_clone = applied.clone();

    let di = Container::default();
    di.register("greeting")
        .factory(|_| Ok(Greeting("hi".into())))
        .decorate(move |instance, _| {
            applied_clone.fetch_add(1, Ordering::SeqCst);
            Ok(instance)
        })
        .as_singleton()
        .unwrap();

    di.resolve("greeting").unwrap();
    di.resolve("greeting").unwrap();
    assert_eq!(applied.load(Ordering::SeqCst), 1);
}

#[test]
fn test_decoration_runs_per_transient_instance() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    let applied = Arc::new(AtomicUsize::new(0));
    let applied_clone = applied.clone();

    let di = Container::default();
    di.register("greeting")
        .factory(|_| Ok(Greeting("hi".into())))
        .decorate(move |instance, _| {
            applied_clone.fetch_add(1, Ordering::SeqCst);
            Ok(instance)
        })
        .as_transient()
        .unwrap();

    di.resolve("greeting").unwrap();
    di.resolve("greeting").unwrap();
    assert_eq!(applied.load(Ordering::SeqCst), 2);
}
