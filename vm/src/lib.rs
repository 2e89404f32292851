//! Stack interpreter for loaded lazyco modules.
//!
//! [`execute`] runs a [`codec::Module`]'s top-level code against a
//! [`Context`] of globals. Calling a function materializes its code handle,
//! which is where lazily loaded modules pay their deferred decode cost.

mod context;
mod error;
mod exec;
mod value;

pub use context::{Context, VmLimits};
pub use error::{VmError, VmResult};
pub use exec::execute;
pub use value::{Function, Value};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_api_exports() {
        let _ = Context::new();
        let _ = VmLimits::default();
        let _ = Value::None;
        let _: VmResult<()> = Ok(());
    }
}
