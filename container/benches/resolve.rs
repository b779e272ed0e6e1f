use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fibre_container::{injectable, Container};
use std::sync::Arc;

struct Logger;
injectable!(Logger);

struct Repository {
  logger: Arc<Logger>,
}
injectable!(Repository { logger: Logger });

struct Service {
  repo: Arc<Repository>,
  logger: Arc<Logger>,
}
injectable!(Service { repo: Repository, logger: Logger });

fn container() -> Container {
  let c = Container::new();
  c.singleton_type::<Logger>().unwrap();
  c.scoped_type::<Repository>().unwrap();
  c.transient_type::<Service>().unwrap();
  c.alias("Logger", "log").unwrap();
  c
}

fn bench_resolve(c: &mut Criterion) {
  let mut group = c.benchmark_group("resolve");
  let container = container();

  group.bench_function("singleton_cached", |b| {
    b.iter(|| black_box(container.make("Logger").unwrap()))
  });
  group.bench_function("alias", |b| b.iter(|| black_box(container.make("log").unwrap())));
  group.bench_function("transient_graph", |b| {
    b.iter(|| black_box(container.resolve::<Service>("Service").unwrap()))
  });
  group.bench_function("transient_graph_new_scope", |b| {
    b.iter(|| {
      container.begin_scope();
      black_box(container.resolve::<Service>("Service").unwrap())
    })
  });
  group.finish();
}

criterion_group!(benches, bench_resolve);
criterion_main!(benches);
