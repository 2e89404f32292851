//! Workload parameters.

use serde::Serialize;

use crate::error::ParamsError;
use crate::grid::DimValue;

/// One point in the workload parameter space.
///
/// The full tuple of fields identifies a configuration; results are keyed by
/// it. Field names serialize in camelCase, which is also the dimension name
/// used by [`ParameterGrid`](crate::ParameterGrid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkloadParams {
    /// Number of generated functions.
    pub unit_count: u32,
    /// Physical lines in each function's return expression (at least 2).
    pub unit_length: u32,
    /// Bindings per function.
    pub var_count: u32,
    /// Declare bindings inside each function instead of at module scope.
    pub use_local_scope: bool,
    /// Suffix binding names with the function index.
    pub unique_names: bool,
    /// Initialize binding `i` with `i` instead of `1`.
    pub vary_constants: bool,
    /// Call each function right after its definition.
    pub invoke_at_load: bool,
}

impl WorkloadParams {
    /// Dimension names in field order.
    pub const FIELDS: [&'static str; 7] = [
        "unitCount",
        "unitLength",
        "varCount",
        "useLocalScope",
        "uniqueNames",
        "varyConstants",
        "invokeAtLoad",
    ];

    /// Checks the generator's preconditions.
    pub const fn validate(&self) -> Result<(), ParamsError> {
        if self.unit_count == 0 {
            return Err(ParamsError::ZeroUnitCount);
        }
        if self.unit_length < 2 {
            return Err(ParamsError::UnitLengthTooShort {
                unit_length: self.unit_length,
            });
        }
        if self.var_count == 0 {
            return Err(ParamsError::ZeroVarCount);
        }
        Ok(())
    }

    /// Returns a fixed-width, human-readable description.
    #[must_use]
    pub fn label(&self) -> String {
        let shared = if self.unique_names { "unique" } else { "shared" };
        let call = if self.invoke_at_load { "call" } else { "" };
        let scope = if self.use_local_scope {
            "locals"
        } else {
            "globals"
        };
        let consts = if self.vary_constants { "consts" } else { "" };
        format!(
            "{shared:6} {call:4} {scope:7} {consts:6} {:4} units x {:4} lines, {:4} vars",
            self.unit_count, self.unit_length, self.var_count
        )
    }

    /// Builds parameters from a grid assignment, matching by dimension name.
    ///
    /// Every field must be assigned exactly once with a value of the right
    /// kind. The result is not validated.
    pub fn from_assignment(assignment: &[(&str, DimValue)]) -> Result<Self, ParamsError> {
        let mut ints: [Option<u32>; 3] = [None; 3];
        let mut flags: [Option<bool>; 4] = [None; 4];

        for &(name, value) in assignment {
            let position = Self::FIELDS
                .iter()
                .position(|field| *field == name)
                .ok_or_else(|| ParamsError::UnknownDimension {
                    name: name.to_string(),
                })?;
            let slot_taken = if position < ints.len() {
                let DimValue::Int(int) = value else {
                    return Err(ParamsError::DimensionType {
                        name: name.to_string(),
                        expected: "integer",
                    });
                };
                ints[position].replace(int).is_some()
            } else {
                let DimValue::Bool(flag) = value else {
                    return Err(ParamsError::DimensionType {
                        name: name.to_string(),
                        expected: "boolean",
                    });
                };
                flags[position - ints.len()].replace(flag).is_some()
            };
            if slot_taken {
                return Err(ParamsError::DuplicateDimension {
                    name: name.to_string(),
                });
            }
        }

        let int = |index: usize| {
            ints[index].ok_or_else(|| ParamsError::MissingDimension {
                name: Self::FIELDS[index],
            })
        };
        let flag = |index: usize| {
            flags[index].ok_or_else(|| ParamsError::MissingDimension {
                name: Self::FIELDS[index + 3],
            })
        };

        Ok(Self {
            unit_count: int(0)?,
            unit_length: int(1)?,
            var_count: int(2)?,
            use_local_scope: flag(0)?,
            unique_names: flag(1)?,
            vary_constants: flag(2)?,
            invoke_at_load: flag(3)?,
        })
    }
}
