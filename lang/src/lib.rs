//! Workload source language for lazyco benchmarks.
//!
//! The language is just large enough to express generated workloads:
//! - `name = <int>` bindings (globals at top level, locals inside functions)
//! - `def name():` functions whose body ends in `return a + b + ...`
//! - `name()` call statements
//! - `# comments` and `\` line continuations
//!
//! [`compile`] turns source text into a [`codec::CodeObject`] tree ready for
//! [`codec::encode_module`]; [`source_hash`] fingerprints the text.

mod compile;
mod error;
mod hash;
mod parse;

pub use compile::compile;
pub use error::{LangError, LangResult};
pub use hash::source_hash;
pub use parse::{parse, BodyKind, BodyStatement, Statement, StatementKind, Term};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let _ = source_hash("");
        let _: LangResult<()> = Ok(());
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn empty_source_compiles_to_none_return() {
        let module = compile("# nothing here\n", "<empty>").unwrap();
        assert_eq!(module.code.len(), 2);
        assert_eq!(module.nested().count(), 0);
    }
}
