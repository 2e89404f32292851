use codec::{encode_module, load_module, CodecLimits, LoadMode, Module, Strategy, WireLimits};
use vm::{execute, Context, Value, VmError};

fn load(source: &str, mode: LoadMode) -> Module {
    let code = lang::compile(source, "<test>").unwrap();
    let blob = encode_module(&code, Strategy::Lazy, lang::source_hash(source)).unwrap();
    load_module(&blob, mode, &WireLimits::default(), &CodecLimits::default()).unwrap()
}

const GLOBAL_SOURCE: &str = "\
v_0 = 3
v_1 = 4
def f_0():
    return 0+ \\
        v_0+ \\
        v_1+ 0
result = 0
";

const CALLING_SOURCE: &str = "\
v_0 = 5
def f_0():
    v_1 = 6
    return 0+ \\
        v_0+ \\
        v_1+ 0
f_0()
";

#[test]
fn module_binds_globals_and_functions() {
    for mode in [LoadMode::Eager, LoadMode::Lazy] {
        let module = load(GLOBAL_SOURCE, mode);
        let mut context = Context::new();
        assert_eq!(execute(&module, &mut context).unwrap(), Value::None);
        assert_eq!(context.get("v_0"), Some(&Value::Int(3)));
        assert!(matches!(context.get("f_0"), Some(Value::Function(_))));
        assert_eq!(context.len(), 4);
    }
}

#[test]
fn defining_a_function_does_not_materialize_it() {
    let module = load(GLOBAL_SOURCE, LoadMode::Lazy);
    execute(&module, &mut Context::new()).unwrap();
    assert_eq!(module.materialized_count(), 0);
}

#[test]
fn calling_materializes_lazy_code_once() {
    let module = load(CALLING_SOURCE, LoadMode::Lazy);
    assert_eq!(module.materialized_count(), 0);

    let mut context = Context::new();
    execute(&module, &mut context).unwrap();
    assert_eq!(module.materialized_count(), 1);

    // A second run in a fresh context reuses the decoded body.
    execute(&module, &mut Context::new()).unwrap();
    assert_eq!(module.materialized_count(), 1);
}

#[test]
fn eager_and_lazy_agree_on_results() {
    let source = "\
v_0 = 1
def f_0():
    return 0+ v_0+ v_0+ 0
";
    let mut results = Vec::new();
    for mode in [LoadMode::Eager, LoadMode::Lazy] {
        let module = load(source, mode);
        let mut context = Context::new();
        execute(&module, &mut context).unwrap();
        let Some(Value::Function(function)) = context.get("f_0").cloned() else {
            panic!("f_0 should be a function");
        };
        let body = function.code.get().unwrap();
        assert_eq!(&*body.name, "f_0");
        results.push(context.len());
    }
    assert_eq!(results[0], results[1]);
}

#[test]
fn unbound_global_is_reported() {
    let module = load("def f():\n    return missing\nf()\n", LoadMode::Lazy);
    let err = execute(&module, &mut Context::new()).unwrap_err();
    assert_eq!(
        err,
        VmError::UnboundName {
            name: "missing".to_string()
        }
    );
}
