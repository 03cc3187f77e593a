use keyed_di::{DiError, DiResult};

#[test]
fn test_not_found_display() {
    let plain = DiError::NotFound {
        name: "db".into(),
        suggestion: None,
    };
    assert_eq!(plain.to_string(), "Service 'db' not found");

    let suggested = DiError::NotFound {
        name: "logger".into(),
        suggestion: Some("Logger".into()),
    };
    assert_eq!(
        suggested.to_string(),
        "Service 'logger' not found. Did you mean 'Logger'?"
    );
}

#[test]
fn test_already_registered_display() {
    let err = DiError::AlreadyRegistered("cache".into());
    assert_eq!(err.to_string(), "Service 'cache' is already registered");
}

#[test]
fn test_circular_display_joins_the_chain() {
    let err = DiError::Circular(vec!["a".into(), "b".into(), "a".into()]);
    assert_eq!(err.to_string(), "Circular dependency detected: a -> b -> a");
}

#[test]
fn test_dangerous_access_display() {
    let err = DiError::DangerousAccess("__proto__".into());
    assert_eq!(err.to_string(), "Dangerous property access: '__proto__'");
}

#[test]
fn test_resource_limit_display() {
    let err = DiError::ResourceLimit {
        what: "scopes",
        limit: 100,
    };
    assert_eq!(err.to_string(), "Resource limit exceeded: scopes (max 100)");
}

#[test]
fn test_scope_not_found_display() {
    let err = DiError::ScopeNotFound("request".into());
    assert_eq!(err.to_string(), "Scope 'request' not found");
}

#[test]
fn test_error_is_std_error() {
    fn takes_std_error(_: &dyn std::error::Error) {}
    takes_std_error(&DiError::InvalidArgument("x".into()));
}

#[test]
fn test_result_alias_propagates_with_question_mark() {
    fn inner() -> DiResult<u8> {
        Err(DiError::InvalidArgument("bad".into()))
    }
    fn outer() -> DiResult<u8> {
        let v = inner()?;
        Ok(v)
    }
    assert!(outer().is_err());
}
