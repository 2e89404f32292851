use codec::{encode_module, load_module, CodecLimits, Instr, LoadMode, Strategy, WireLimits};
use lang::{compile, source_hash, LangError};

const WORKLOAD: &str = "\
# unitCount=2 demo
v_0 = 0
v_1 = 1
def f_0():
    return 0+ \\
        v_0+ \\
        v_1+ 0
f_0()
def f_1():
    v_2 = 2
    return 0+ \\
        v_2+ 0
f_1()
";

#[test]
fn workload_compiles_to_expected_shape() {
    let module = compile(WORKLOAD, "<workload>").unwrap();
    assert_eq!(module.nested().count(), 2);
    assert_eq!(
        module.code.iter().filter(|i| **i == Instr::Call).count(),
        2
    );

    let f_0 = module.nested().next().unwrap().get().unwrap();
    assert_eq!(&*f_0.name, "f_0");
    assert_eq!(f_0.first_line, 4);
    assert!(f_0.locals.is_empty());
    assert_eq!(f_0.names.len(), 2);

    let f_1 = module.nested().nth(1).unwrap().get().unwrap();
    assert_eq!(f_1.first_line, 9);
    assert_eq!(f_1.locals.len(), 1);
    assert!(f_1.names.is_empty());
}

#[test]
fn compiled_workload_survives_both_loaders() {
    let module = compile(WORKLOAD, "<workload>").unwrap();
    let hash = source_hash(WORKLOAD);
    let blob = encode_module(&module, Strategy::Lazy, hash).unwrap();

    for mode in [LoadMode::Eager, LoadMode::Lazy, LoadMode::Default] {
        let loaded = load_module(
            &blob,
            mode,
            &WireLimits::default(),
            &CodecLimits::default(),
        )
        .unwrap();
        assert_eq!(loaded.header().source_hash, hash);
        assert_eq!(loaded.materialize_all().unwrap(), 2);
        let again = encode_module(loaded.code(), Strategy::Lazy, hash).unwrap();
        assert_eq!(again, blob);
    }
}

#[test]
fn error_points_at_first_physical_line() {
    let source = "x = 1\ndef f():\n    return 0+ \\\n        +1\n";
    let err = compile(source, "<bad>").unwrap_err();
    assert_eq!(err, LangError::EmptyTerm { line: 3 });
}
