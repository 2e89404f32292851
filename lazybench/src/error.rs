//! Error types for the benchmark harness.

use std::fmt;

use codec::{CodecError, Strategy};
use lang::LangError;
use vm::VmError;

use crate::params::WorkloadParams;

/// Result type for harness runs.
pub type BenchResult<T> = Result<T, BenchError>;

/// Invalid workload parameters or grid assignments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamsError {
    /// `unitCount` must be positive.
    ZeroUnitCount,

    /// `unitLength` must be at least 2.
    UnitLengthTooShort { unit_length: u32 },

    /// `varCount` must be positive.
    ZeroVarCount,

    /// A grid dimension does not name a parameter field.
    UnknownDimension { name: String },

    /// A parameter field has no assigned value.
    MissingDimension { name: &'static str },

    /// A parameter field is assigned more than once.
    DuplicateDimension { name: String },

    /// A dimension value has the wrong kind for its field.
    DimensionType {
        name: String,
        expected: &'static str,
    },
}

/// Failure while turning source text into a blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    /// The source did not compile.
    Compile(LangError),

    /// The compiled code could not be encoded.
    Encode(CodecError),
}

/// Failure inside one strategy's timing run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarnessError {
    /// Deserializing the blob failed.
    Load(CodecError),

    /// Executing a loaded module failed.
    Execute(VmError),

    /// References to the blob survived the release barrier.
    ResourceLeak { outstanding: usize },
}

/// Errors that abort a benchmark run.
///
/// Every per-configuration variant carries the parameters it failed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BenchError {
    /// Harness configuration is unusable.
    InvalidConfig { repeats: usize, passes: usize },

    /// A grid assignment does not describe workload parameters.
    Grid(ParamsError),

    /// Source generation rejected the parameters.
    Generate {
        params: WorkloadParams,
        source: ParamsError,
    },

    /// Compiling or encoding the workload failed.
    Compile {
        params: WorkloadParams,
        strategy: Strategy,
        source: AdapterError,
    },

    /// Loading, executing, or releasing the workload failed.
    Harness {
        params: WorkloadParams,
        strategy: Strategy,
        source: HarnessError,
    },
}

impl fmt::Display for ParamsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroUnitCount => write!(f, "unitCount must be positive"),
            Self::UnitLengthTooShort { unit_length } => {
                write!(f, "unitLength must be at least 2, got {unit_length}")
            }
            Self::ZeroVarCount => write!(f, "varCount must be positive"),
            Self::UnknownDimension { name } => write!(f, "unknown dimension '{name}'"),
            Self::MissingDimension { name } => write!(f, "no value for dimension '{name}'"),
            Self::DuplicateDimension { name } => {
                write!(f, "dimension '{name}' assigned more than once")
            }
            Self::DimensionType { name, expected } => {
                write!(f, "dimension '{name}' expects a {expected} value")
            }
        }
    }
}

impl std::error::Error for ParamsError {}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compile(e) => write!(f, "compile error: {e}"),
            Self::Encode(e) => write!(f, "encode error: {e}"),
        }
    }
}

impl std::error::Error for AdapterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Compile(e) => Some(e),
            Self::Encode(e) => Some(e),
        }
    }
}

impl From<LangError> for AdapterError {
    fn from(err: LangError) -> Self {
        Self::Compile(err)
    }
}

impl From<CodecError> for AdapterError {
    fn from(err: CodecError) -> Self {
        Self::Encode(err)
    }
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(e) => write!(f, "load error: {e}"),
            Self::Execute(e) => write!(f, "execution error: {e}"),
            Self::ResourceLeak { outstanding } => {
                write!(f, "{outstanding} blob reference(s) outlived the run")
            }
        }
    }
}

impl std::error::Error for HarnessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Load(e) => Some(e),
            Self::Execute(e) => Some(e),
            Self::ResourceLeak { .. } => None,
        }
    }
}

impl From<CodecError> for HarnessError {
    fn from(err: CodecError) -> Self {
        Self::Load(err)
    }
}

impl From<VmError> for HarnessError {
    fn from(err: VmError) -> Self {
        Self::Execute(err)
    }
}

impl BenchError {
    /// Returns the parameters of the failing configuration, if any.
    #[must_use]
    pub const fn params(&self) -> Option<&WorkloadParams> {
        match self {
            Self::InvalidConfig { .. } | Self::Grid(_) => None,
            Self::Generate { params, .. }
            | Self::Compile { params, .. }
            | Self::Harness { params, .. } => Some(params),
        }
    }

    /// Returns the strategy being measured when the run failed, if any.
    #[must_use]
    pub const fn strategy(&self) -> Option<Strategy> {
        match self {
            Self::Compile { strategy, .. } | Self::Harness { strategy, .. } => Some(*strategy),
            _ => None,
        }
    }
}

impl fmt::Display for BenchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidConfig { repeats, passes } => write!(
                f,
                "repeats and passes must be positive, got repeats={repeats} passes={passes}"
            ),
            Self::Grid(e) => write!(f, "invalid grid: {e}"),
            Self::Generate { params, source } => {
                write!(f, "[{}] generation failed: {source}", params.label())
            }
            Self::Compile {
                params,
                strategy,
                source,
            } => write!(f, "[{}] {strategy}: {source}", params.label()),
            Self::Harness {
                params,
                strategy,
                source,
            } => write!(f, "[{}] {strategy}: {source}", params.label()),
        }
    }
}

impl std::error::Error for BenchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidConfig { .. } => None,
            Self::Grid(e) | Self::Generate { source: e, .. } => Some(e),
            Self::Compile { source, .. } => Some(source),
            Self::Harness { source, .. } => Some(source),
        }
    }
}
