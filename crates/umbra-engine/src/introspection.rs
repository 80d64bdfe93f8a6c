//! Registry introspection
//!
//! Debugging aid: a JSON report of every binding and its method coverage,
//! so a failing suite can show which classes are shadowed, with which
//! flags, and which signatures a shadow actually implements.

use serde::Serialize;

use crate::engine::Engine;

#[derive(Serialize)]
struct BindingReport {
    class: String,
    shadow: String,
    resolved: bool,
    call_through_by_default: bool,
    reset_static_state: bool,
    inherits_parent_methods: bool,
    methods: Vec<String>,
    constructors: Vec<usize>,
}

/// Dump every binding in registration order.
pub fn registry_report(engine: &Engine) -> serde_json::Value {
    let reports: Vec<BindingReport> = engine
        .registry()
        .iter_in_order()
        .map(|binding| {
            let shadow = binding.shadow();
            BindingReport {
                class: binding.target().name().to_string(),
                shadow: shadow.name().to_string(),
                resolved: binding.target().is_resolved(),
                call_through_by_default: binding.call_through_by_default(),
                reset_static_state: binding.reset_static_state(),
                inherits_parent_methods: binding.inherits_parent_methods(),
                methods: shadow.method_sigs().iter().map(|s| s.to_string()).collect(),
                constructors: shadow.ctor_arities(),
            }
        })
        .collect();
    serde_json::json!({ "bindings": reports })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ClassDescriptor;
    use crate::shadow_class::ShadowClass;
    use std::any::Any;
    use umbra_sdk::{Shadow, Value};

    #[derive(Default)]
    struct ShadowStub;
    impl Shadow for ShadowStub {
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn test_report_shape() {
        let engine = Engine::builder()
            .register_class(ClassDescriptor::builder("Counter").build().unwrap())
            .register_shadow(
                ShadowClass::builder::<ShadowStub>("ShadowCounter", "Counter")
                    .call_through_by_default(false)
                    .method("increment", 0, |_: &mut ShadowStub, _| Ok(Value::int(1)))
                    .build()
                    .unwrap(),
            )
            .register_shadow(
                ShadowClass::builder::<ShadowStub>("ShadowHidden", "HiddenClass")
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();

        let report = registry_report(&engine);
        let bindings = report["bindings"].as_array().unwrap();
        assert_eq!(bindings.len(), 2);

        assert_eq!(bindings[0]["class"], "Counter");
        assert_eq!(bindings[0]["resolved"], true);
        assert_eq!(bindings[0]["call_through_by_default"], false);
        assert_eq!(bindings[0]["methods"][0], "increment/0");

        // Name-only binding retained and reported as unresolved.
        assert_eq!(bindings[1]["class"], "HiddenClass");
        assert_eq!(bindings[1]["resolved"], false);
    }
}
