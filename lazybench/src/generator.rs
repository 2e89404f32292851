//! Synthetic workload source generation.

use crate::error::ParamsError;
use crate::params::WorkloadParams;

const BODY_INDENT: &str = "    ";
const TERM_INDENT: &str = "        ";

/// Generates workload source text for `params`.
///
/// The output is a pure function of the parameters. Invalid parameters are
/// rejected, never clamped.
pub fn generate(params: &WorkloadParams) -> Result<String, ParamsError> {
    params.validate()?;

    let mut lines = vec![format!("# {}", params.label())];

    let shared_globals = !params.use_local_scope && !params.unique_names;
    if shared_globals {
        push_bindings(&mut lines, "", &binding_names(params, 0), params);
    }

    for unit in 0..params.unit_count {
        let names = binding_names(params, unit);
        if !params.use_local_scope && params.unique_names {
            push_bindings(&mut lines, "", &names, params);
        }

        lines.push(format!("def f_{unit}():"));
        if params.use_local_scope {
            push_bindings(&mut lines, BODY_INDENT, &names, params);
        }
        push_return(&mut lines, &names, params.unit_length as usize);

        if params.invoke_at_load {
            lines.push(format!("f_{unit}()"));
        }
    }

    let mut source = lines.join("\n");
    source.push('\n');
    Ok(source)
}

/// Binding names for one unit: `v_<i>`, or `v_<unit>_<i>` when unique.
fn binding_names(params: &WorkloadParams, unit: u32) -> Vec<String> {
    (0..params.var_count)
        .map(|i| {
            if params.unique_names {
                format!("v_{unit}_{i}")
            } else {
                format!("v_{i}")
            }
        })
        .collect()
}

fn push_bindings(lines: &mut Vec<String>, indent: &str, names: &[String], params: &WorkloadParams) {
    for (i, name) in names.iter().enumerate() {
        let value = if params.vary_constants { i } else { 1 };
        lines.push(format!("{indent}{name} = {value}"));
    }
}

/// Emits a return expression spanning exactly `unit_length` physical lines.
fn push_return(lines: &mut Vec<String>, names: &[String], unit_length: usize) {
    lines.push(format!("{BODY_INDENT}return 0+ \\"));
    let terms = unit_length - 1;
    for (k, name) in names.iter().cycle().take(terms).enumerate() {
        if k + 1 == terms {
            lines.push(format!("{TERM_INDENT}{name}+ 0"));
        } else {
            lines.push(format!("{TERM_INDENT}{name}+ \\"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(unit_count: u32, unit_length: u32, var_count: u32) -> WorkloadParams {
        WorkloadParams {
            unit_count,
            unit_length,
            var_count,
            use_local_scope: false,
            unique_names: false,
            vary_constants: false,
            invoke_at_load: false,
        }
    }

    #[test]
    fn smallest_workload() {
        let p = params(1, 2, 1);
        let source = generate(&p).unwrap();
        let expected = format!(
            "# {}\nv_0 = 1\ndef f_0():\n    return 0+ \\\n        v_0+ 0\n",
            p.label()
        );
        assert_eq!(source, expected);
    }

    #[test]
    fn local_unique_varied_called() {
        let mut p = params(2, 3, 2);
        p.use_local_scope = true;
        p.unique_names = true;
        p.vary_constants = true;
        p.invoke_at_load = true;
        let source = generate(&p).unwrap();
        let body: Vec<&str> = source.lines().skip(1).collect();
        assert_eq!(
            body,
            vec![
                "def f_0():",
                "    v_0_0 = 0",
                "    v_0_1 = 1",
                "    return 0+ \\",
                "        v_0_0+ \\",
                "        v_0_1+ 0",
                "f_0()",
                "def f_1():",
                "    v_1_0 = 0",
                "    v_1_1 = 1",
                "    return 0+ \\",
                "        v_1_0+ \\",
                "        v_1_1+ 0",
                "f_1()",
            ]
        );
    }

    #[test]
    fn unique_globals_precede_each_unit() {
        let mut p = params(2, 2, 1);
        p.unique_names = true;
        let source = generate(&p).unwrap();
        let lines: Vec<&str> = source.lines().skip(1).collect();
        assert_eq!(lines[0], "v_0_0 = 1");
        assert_eq!(lines[1], "def f_0():");
        assert_eq!(lines[4], "v_1_0 = 1");
        assert_eq!(lines[5], "def f_1():");
    }

    #[test]
    fn shared_globals_declared_once() {
        let source = generate(&params(3, 2, 2)).unwrap();
        assert_eq!(source.matches("v_0 = 1").count(), 1);
        assert_eq!(source.matches("v_1 = 1").count(), 1);
        assert_eq!(source.matches("def f_").count(), 3);
    }

    #[test]
    fn terms_cycle_and_truncate() {
        let source = generate(&params(1, 5, 2)).unwrap();
        let terms: Vec<&str> = source
            .lines()
            .filter(|line| line.starts_with(TERM_INDENT))
            .map(str::trim)
            .collect();
        assert_eq!(terms, vec!["v_0+ \\", "v_1+ \\", "v_0+ \\", "v_1+ 0"]);

        let source = generate(&params(1, 3, 10)).unwrap();
        assert!(!source.contains("v_2+"));
    }

    #[test]
    fn invalid_params_are_rejected() {
        assert_eq!(generate(&params(0, 2, 1)), Err(ParamsError::ZeroUnitCount));
        assert_eq!(
            generate(&params(1, 1, 1)),
            Err(ParamsError::UnitLengthTooShort { unit_length: 1 })
        );
        assert_eq!(generate(&params(1, 2, 0)), Err(ParamsError::ZeroVarCount));
    }
}
