//! Dispatch hot-path benchmarks: pass-through on unbound classes, shadow
//! interception, call-through from inside a handler, and first-touch
//! pairing.

use std::any::Any;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use umbra_engine::{
    CallContext, ClassDescriptor, Engine, Shadow, ShadowClass, ShadowResult, Value,
};

#[derive(Default)]
struct ShadowCounter {
    tally: i64,
}

impl Shadow for ShadowCounter {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn counter_class() -> ClassDescriptor {
    ClassDescriptor::builder("Counter")
        .private_field("count", Value::int(0))
        .method("increment", 0, |obj, _| {
            let next = obj.read_field("count").and_then(|v| v.as_int()).unwrap_or(0) + 1;
            obj.write_field("count", Value::int(next));
            Ok(Value::int(next))
        })
        .build()
        .unwrap()
}

fn unbound_engine() -> Engine {
    Engine::builder().register_class(counter_class()).build().unwrap()
}

fn bound_engine(call_through: bool) -> Engine {
    fn increment(shadow: &mut ShadowCounter, ctx: &dyn CallContext) -> ShadowResult<Value> {
        shadow.tally += 1;
        if shadow.tally % 2 == 0 {
            ctx.call_original(ctx.args())
        } else {
            Ok(Value::int(shadow.tally))
        }
    }

    let mut shadow = ShadowClass::builder::<ShadowCounter>("ShadowCounter", "Counter")
        .call_through_by_default(false);
    if call_through {
        shadow = shadow.method("increment", 0, increment);
    } else {
        shadow = shadow.method("increment", 0, |s: &mut ShadowCounter, _| {
            s.tally += 1;
            Ok(Value::int(s.tally))
        });
    }
    Engine::builder()
        .register_class(counter_class())
        .register_shadow(shadow.build().unwrap())
        .build()
        .unwrap()
}

fn bench_dispatch(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch");

    let engine = unbound_engine();
    let obj = engine.instantiate("Counter", &[]).unwrap();
    group.bench_function("unbound_pass_through", |b| {
        b.iter(|| engine.dispatch(black_box(&obj), "increment", &[]).unwrap())
    });

    let engine = bound_engine(false);
    let obj = engine.instantiate("Counter", &[]).unwrap();
    group.bench_function("shadow_intercept", |b| {
        b.iter(|| engine.dispatch(black_box(&obj), "increment", &[]).unwrap())
    });

    let engine = bound_engine(true);
    let obj = engine.instantiate("Counter", &[]).unwrap();
    group.bench_function("shadow_with_call_through", |b| {
        b.iter(|| engine.dispatch(black_box(&obj), "increment", &[]).unwrap())
    });

    group.finish();
}

fn bench_pairing(c: &mut Criterion) {
    let mut group = c.benchmark_group("pairing");

    let engine = bound_engine(false);
    group.bench_function("instantiate_and_pair", |b| {
        b.iter(|| {
            let obj = engine.instantiate("Counter", &[]).unwrap();
            engine.release(black_box(&obj));
        })
    });

    let engine = bound_engine(false);
    let obj = engine.instantiate("Counter", &[]).unwrap();
    group.bench_function("shadow_of_existing", |b| {
        b.iter(|| engine.shadow_of(black_box(&obj)).unwrap())
    });

    group.finish();
}

criterion_group!(benches, bench_dispatch, bench_pairing);
criterion_main!(benches);
