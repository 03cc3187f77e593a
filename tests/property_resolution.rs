use keyed_di::{Container, TagMode};
use proptest::prelude::*;
use std::sync::Arc;

fn service_name() -> impl Strategy<Value = String> {
    "[a-z][a-zA-Z0-9_]{0,12}"
}

proptest! {
    #[test]
    fn singleton_resolution_is_idempotent(name in service_name(), value in any::<u64>()) {
        let di = Container::default();
        di.singleton(name.clone(), move |_| Ok(value)).unwrap();

        let a = di.resolve(&name).unwrap();
        let b = di.resolve(&name).unwrap();
        prop_assert!(Arc::ptr_eq(&a, &b));
        prop_assert_eq!(*di.resolve_as::<u64>(&name).unwrap(), value);
    }

    #[test]
    fn transient_instances_are_distinct(name in service_name()) {
        let di = Container::default();
        di.transient(name.clone(), |_| Ok(0u8)).unwrap();

        let a = di.resolve(&name).unwrap();
        let b = di.resolve(&name).unwrap();
        prop_assert!(!Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn unregistered_names_never_resolve(name in service_name()) {
        let di = Container::default();
        prop_assert!(di.resolve(&name).is_err());
        prop_assert!(!di.has(&name));
    }

    #[test]
    fn registration_is_reflected_in_introspection(names in prop::collection::btree_set(service_name(), 1..16)) {
        let di = Container::default();
        for name in &names {
            di.value(name.clone(), 0u8).unwrap();
        }

        prop_assert_eq!(di.len(), names.len());
        let listed = di.service_names();
        let expected: Vec<String> = names.iter().cloned().collect();
        prop_assert_eq!(listed, expected);
    }

    #[test]
    fn tag_query_modes_agree_with_a_naive_model(
        specs in prop::collection::btree_map(
            service_name(),
            prop::collection::btree_set(0usize..4, 1..4),
            1..8,
        ),
        query in prop::collection::btree_set(0usize..4, 1..3),
    ) {
        const TAGS: [&str; 4] = ["alpha", "beta", "gamma", "delta"];

        let di = Container::default();
        for (name, tag_ids) in &specs {
            di.register(name.clone())
                .factory(|_| Ok(0u8))
                .with_tags(tag_ids.iter().map(|&i| TAGS[i]))
                .as_singleton()
                .unwrap();
        }

        let query_tags: Vec<&str> = query.iter().map(|&i| TAGS[i]).collect();
        let all = di.service_names_by_tags(&query_tags, TagMode::All).unwrap();
        let any = di.service_names_by_tags(&query_tags, TagMode::Any).unwrap();

        let expect_all: Vec<String> = specs
            .iter()
            .filter(|(_, ids)| query.iter().all(|i| ids.contains(i)))
            .map(|(n, _)| n.clone())
            .collect();
        let expect_any: Vec<String> = specs
            .iter()
            .filter(|(_, ids)| query.iter().any(|i| ids.contains(i)))
            .map(|(n, _)| n.clone())
            .collect();

        prop_assert_eq!(all, expect_all);
        prop_assert_eq!(any, expect_any);
    }

    #[test]
    fn unregister_then_resolve_fails(names in prop::collection::btree_set(service_name(), 2..8)) {
        let di = Container::default();
        for name in &names {
            di.value(name.clone(), 0u8).unwrap();
        }

        let victim = names.iter().next().unwrap();
        di.unregister(victim).unwrap();
        prop_assert!(di.resolve(victim).is_err());

        for survivor in names.iter().skip(1) {
            prop_assert!(di.resolve(survivor).is_ok());
        }
    }
}
