//! Source text to compiled blob.

use codec::{encode_module, CompiledBlob, Strategy};

use crate::error::AdapterError;

/// Filename recorded as the module code object's name.
pub const WORKLOAD_FILENAME: &str = "<workload>";

/// Compiles `source` and encodes it with `strategy` as the header hint.
///
/// The header also records a hash of the source text.
pub fn compile(source: &str, strategy: Strategy) -> Result<CompiledBlob, AdapterError> {
    let code = lang::compile(source, WORKLOAD_FILENAME)?;
    let blob = encode_module(&code, strategy, lang::source_hash(source))?;
    Ok(blob)
}
