use criterion::{black_box, criterion_group, criterion_main, Criterion};
use keyed_di::{Container, DependencyResolver, TagMode};

fn bench_singleton_hit(c: &mut Criterion) {
    let di = Container::default();
    di.singleton("answer", |_| Ok(42u64)).unwrap();

    // Prime the cache
    let _ = di.resolve("answer").unwrap();

    c.bench_function("singleton_hit", |b| {
        b.iter(|| {
            let v = di.resolve_as::<u64>("answer").unwrap();
            black_box(*v);
        })
    });
}

fn bench_transient_create(c: &mut Criterion) {
    struct Payload {
        data: [u8; 64],
    }

    let di = Container::default();
    di.transient("payload", |_| Ok(Payload { data: [0; 64] }))
        .unwrap();

    c.bench_function("transient_create", |b| {
        b.iter(|| {
            let v = di.resolve_as::<Payload>("payload").unwrap();
            black_box(&v.data);
        })
    });
}

fn bench_scoped_hit(c: &mut Criterion) {
    struct Session {
        id: u64,
    }

    let di = Container::default();
    di.scoped("session", |_| Ok(Session { id: 7 })).unwrap();
    let scope = di.create_scope("bench").unwrap();

    // Prime the scope cache
    let _ = scope.resolve("session").unwrap();

    c.bench_function("scoped_hit", |b| {
        b.iter(|| {
            let v = scope.resolve_as::<Session>("session").unwrap();
            black_box(v.id);
        })
    });
}

fn bench_dependency_chain(c: &mut Criterion) {
    struct Repo {
        dsn: String,
    }
    struct Handler {
        label: String,
    }

    let di = Container::default();
    di.value("dsn", String::from("postgres://localhost")).unwrap();
    di.transient("repo", |deps| {
        Ok(Repo {
            dsn: deps.get_as::<String>("dsn")?.as_ref().clone(),
        })
    })
    .unwrap();
    di.transient("handler", |deps| {
        let repo = deps.get_as::<Repo>("repo")?;
        Ok(Handler {
            label: repo.dsn.clone(),
        })
    })
    .unwrap();

    c.bench_function("transient_chain_depth_3", |b| {
        b.iter(|| {
            let v = di.resolve_as::<Handler>("handler").unwrap();
            black_box(&v.label);
        })
    });
}

fn bench_tag_discovery(c: &mut Criterion) {
    let di = Container::default();
    for i in 0..100 {
        let tag = if i % 2 == 0 { "even" } else { "odd" };
        di.register(format!("svc{}", i))
            .factory(move |_| Ok(i))
            .with_tag(tag)
            .with_tag("all")
            .as_singleton()
            .unwrap();
    }

    c.bench_function("tag_discovery_100_services", |b| {
        b.iter(|| {
            let found = di
                .service_names_by_tags(&["even", "all"], TagMode::All)
                .unwrap();
            black_box(found.len());
        })
    });
}

criterion_group!(
    benches,
    bench_singleton_hit,
    bench_transient_create,
    bench_scoped_hit,
    bench_dependency_chain,
    bench_tag_discovery
);
criterion_main!(benches);
