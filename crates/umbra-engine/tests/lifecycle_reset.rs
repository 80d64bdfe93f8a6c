//! Static-state lifecycle: reset between simulated test runs clears
//! opted-in static slots, runs resetters in registration order, and
//! leaves non-participating bindings alone.

use std::any::Any;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use umbra_engine::{
    CallContext, ClassDescriptor, Engine, Shadow, ShadowClass, ShadowResult, Value,
};

#[derive(Default)]
struct ShadowClock;
impl Shadow for ShadowClock {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[derive(Default)]
struct ShadowLog;
impl Shadow for ShadowLog {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn set_now(_shadow: &mut ShadowClock, ctx: &dyn CallContext) -> ShadowResult<Value> {
    ctx.static_set("now", ctx.arg(0)?);
    Ok(Value::null())
}

fn now(_shadow: &mut ShadowClock, ctx: &dyn CallContext) -> ShadowResult<Value> {
    Ok(ctx.static_get("now").unwrap_or(Value::int(0)))
}

fn append(_shadow: &mut ShadowLog, ctx: &dyn CallContext) -> ShadowResult<Value> {
    let line = ctx.arg_str(0)?;
    let joined = match ctx.static_get("lines").and_then(|v| v.as_str().map(str::to_string)) {
        Some(prev) => format!("{prev}\n{line}"),
        None => line,
    };
    ctx.static_set("lines", Value::str(joined));
    Ok(Value::null())
}

fn lines(_shadow: &mut ShadowLog, ctx: &dyn CallContext) -> ShadowResult<Value> {
    Ok(ctx.static_get("lines").unwrap_or(Value::str("")))
}

fn lifecycle_engine(resets: Arc<AtomicUsize>) -> Engine {
    Engine::builder()
        .register_class(ClassDescriptor::builder("Clock").build().unwrap())
        .register_class(ClassDescriptor::builder("Log").build().unwrap())
        .register_shadow(
            ShadowClass::builder::<ShadowClock>("ShadowClock", "Clock")
                .call_through_by_default(false)
                .reset_static_state(true)
                .resetter(move || {
                    resets.fetch_add(1, Ordering::SeqCst);
                })
                .method("set_now", 1, set_now)
                .method("now", 0, now)
                .build()
                .unwrap(),
        )
        .register_shadow(
            ShadowClass::builder::<ShadowLog>("ShadowLog", "Log")
                .call_through_by_default(false)
                .method("append", 1, append)
                .method("lines", 0, lines)
                .build()
                .unwrap(),
        )
        .build()
        .unwrap()
}

#[test]
fn reset_clears_opted_in_statics_and_runs_resetters() {
    let resets = Arc::new(AtomicUsize::new(0));
    let engine = lifecycle_engine(resets.clone());

    // First "test": mutate static state on both shadows.
    let clock = engine.instantiate("Clock", &[]).unwrap();
    let log = engine.instantiate("Log", &[]).unwrap();
    engine.dispatch(&clock, "set_now", &[Value::int(1_700_000_000)]).unwrap();
    engine.dispatch(&log, "append", &[Value::str("boot")]).unwrap();
    assert_eq!(engine.dispatch(&clock, "now", &[]).unwrap(), Value::int(1_700_000_000));

    engine.reset_all();

    // Second "test": the clock (opted in) is back to its default, the log
    // (not opted in) keeps its statics.
    let clock = engine.instantiate("Clock", &[]).unwrap();
    let log = engine.instantiate("Log", &[]).unwrap();
    assert_eq!(engine.dispatch(&clock, "now", &[]).unwrap(), Value::int(0));
    assert_eq!(engine.dispatch(&log, "lines", &[]).unwrap(), Value::str("boot"));
    assert_eq!(resets.load(Ordering::SeqCst), 1);
}

#[test]
fn reset_is_idempotent_when_nothing_changed() {
    let resets = Arc::new(AtomicUsize::new(0));
    let engine = lifecycle_engine(resets.clone());

    engine.reset_all();
    engine.reset_all();

    // Resetters run every time; the static store stays empty.
    assert_eq!(resets.load(Ordering::SeqCst), 2);
    let clock = engine.instantiate("Clock", &[]).unwrap();
    assert_eq!(engine.dispatch(&clock, "now", &[]).unwrap(), Value::int(0));
}

#[test]
fn statics_are_scoped_per_binding() {
    let resets = Arc::new(AtomicUsize::new(0));
    let engine = lifecycle_engine(resets);

    let clock = engine.instantiate("Clock", &[]).unwrap();
    let log = engine.instantiate("Log", &[]).unwrap();

    // Both shadows use a slot; neither sees the other's.
    engine.dispatch(&clock, "set_now", &[Value::int(7)]).unwrap();
    engine.dispatch(&log, "append", &[Value::str("seven")]).unwrap();

    assert_eq!(engine.statics().get("Clock", "now"), Some(Value::int(7)));
    assert_eq!(engine.statics().get("Clock", "lines"), None);
    assert_eq!(engine.statics().get("Log", "lines"), Some(Value::str("seven")));
}

#[test]
fn instance_state_is_discarded_with_the_object_not_by_reset() {
    let resets = Arc::new(AtomicUsize::new(0));
    let engine = lifecycle_engine(resets);

    let clock = engine.instantiate("Clock", &[]).unwrap();
    let cell = engine.shadow_of(&clock).unwrap();
    engine.reset_all();

    // Reset never unpairs live objects.
    let after = engine.shadow_of(&clock).unwrap();
    assert!(cell.ptr_eq(&after));
}
