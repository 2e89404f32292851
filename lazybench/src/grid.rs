//! Parameter-space enumeration.

use std::fmt;

use serde::Serialize;

use crate::error::ParamsError;
use crate::params::WorkloadParams;

/// A single allowed value of a dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum DimValue {
    Int(u32),
    Bool(bool),
}

impl fmt::Display for DimValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(f, "{value}"),
            Self::Bool(value) => write!(f, "{value}"),
        }
    }
}

/// A named axis of the parameter space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dimension {
    pub name: &'static str,
    pub values: Vec<DimValue>,
}

impl Dimension {
    /// Creates an integer dimension.
    #[must_use]
    pub fn ints(name: &'static str, values: &[u32]) -> Self {
        Self {
            name,
            values: values.iter().copied().map(DimValue::Int).collect(),
        }
    }

    /// Creates a boolean dimension enumerating `true` then `false`.
    #[must_use]
    pub fn flag(name: &'static str) -> Self {
        Self {
            name,
            values: vec![DimValue::Bool(true), DimValue::Bool(false)],
        }
    }
}

/// One value chosen per dimension, in dimension order.
pub type Assignment = Vec<(&'static str, DimValue)>;

/// The Cartesian product of a list of dimensions.
///
/// Iteration is an odometer: the last dimension varies fastest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterGrid {
    dimensions: Vec<Dimension>,
}

impl Default for ParameterGrid {
    /// The full grid: 32 configurations of 100 functions x 100 lines.
    fn default() -> Self {
        Self::with_sizes(&[100], &[100], &[10, 100])
    }
}

impl ParameterGrid {
    /// Creates a grid over the given dimensions.
    #[must_use]
    pub const fn new(dimensions: Vec<Dimension>) -> Self {
        Self { dimensions }
    }

    /// A small grid with the same 32 flag combinations.
    #[must_use]
    pub fn quick() -> Self {
        Self::with_sizes(&[10], &[10], &[2, 10])
    }

    /// Builds a grid over every parameter field with every flag combination.
    #[must_use]
    pub fn with_sizes(unit_counts: &[u32], unit_lengths: &[u32], var_counts: &[u32]) -> Self {
        let [units, lengths, vars, flags @ ..] = WorkloadParams::FIELDS;
        let mut dimensions = vec![
            Dimension::ints(units, unit_counts),
            Dimension::ints(lengths, unit_lengths),
            Dimension::ints(vars, var_counts),
        ];
        dimensions.extend(flags.into_iter().map(Dimension::flag));
        Self::new(dimensions)
    }

    /// Returns the dimensions in enumeration order.
    #[must_use]
    pub fn dimensions(&self) -> &[Dimension] {
        &self.dimensions
    }

    /// Returns the number of assignments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dimensions.iter().map(|dim| dim.values.len()).product()
    }

    /// Returns `true` if the grid has no assignments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates over every assignment.
    #[must_use]
    pub fn iter(&self) -> Assignments<'_> {
        Assignments {
            grid: self,
            indices: vec![0; self.dimensions.len()],
            done: self.is_empty(),
        }
    }

    /// Iterates over every assignment mapped to workload parameters.
    pub fn params(&self) -> impl Iterator<Item = Result<WorkloadParams, ParamsError>> + '_ {
        self.iter()
            .map(|assignment| WorkloadParams::from_assignment(&assignment))
    }
}

impl<'a> IntoIterator for &'a ParameterGrid {
    type Item = Assignment;
    type IntoIter = Assignments<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Odometer over a [`ParameterGrid`].
#[derive(Debug, Clone)]
pub struct Assignments<'a> {
    grid: &'a ParameterGrid,
    indices: Vec<usize>,
    done: bool,
}

impl Iterator for Assignments<'_> {
    type Item = Assignment;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let dimensions = &self.grid.dimensions;
        let assignment = dimensions
            .iter()
            .zip(&self.indices)
            .map(|(dim, &index)| (dim.name, dim.values[index]))
            .collect();

        // Advance from the last dimension, carrying leftwards.
        self.done = true;
        for (index, dim) in self.indices.iter_mut().zip(dimensions).rev() {
            *index += 1;
            if *index < dim.values.len() {
                self.done = false;
                break;
            }
            *index = 0;
        }

        Some(assignment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_has_32_configurations() {
        let grid = ParameterGrid::default();
        assert_eq!(grid.len(), 32);
        assert_eq!(grid.iter().count(), 32);
        assert_eq!(ParameterGrid::quick().len(), 32);
    }

    #[test]
    fn last_dimension_varies_fastest() {
        let grid = ParameterGrid::new(vec![
            Dimension::ints("a", &[1, 2]),
            Dimension::ints("b", &[7, 8, 9]),
        ]);
        let seen: Vec<(u32, u32)> = grid
            .iter()
            .map(|assignment| match (assignment[0].1, assignment[1].1) {
                (DimValue::Int(a), DimValue::Int(b)) => (a, b),
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(seen, vec![(1, 7), (1, 8), (1, 9), (2, 7), (2, 8), (2, 9)]);
    }

    #[test]
    fn empty_dimension_empties_grid() {
        let grid = ParameterGrid::new(vec![
            Dimension::ints("a", &[1, 2]),
            Dimension::ints("b", &[]),
        ]);
        assert!(grid.is_empty());
        assert_eq!(grid.iter().next(), None);
    }

    #[test]
    fn default_grid_maps_to_valid_params() {
        let grid = ParameterGrid::default();
        let params: Vec<WorkloadParams> = grid.params().map(Result::unwrap).collect();
        assert_eq!(params.len(), 32);
        for p in &params {
            p.validate().unwrap();
            assert_eq!(p.unit_count, 100);
            assert_eq!(p.unit_length, 100);
        }
        // First assignment takes the first value of every dimension.
        assert_eq!(params[0].var_count, 10);
        assert!(params[0].use_local_scope && params[0].invoke_at_load);
        assert!(!params[1].invoke_at_load);
        assert_eq!(params[16].var_count, 100);
    }

    #[test]
    fn unknown_dimension_surfaces_as_error() {
        let mut dimensions = ParameterGrid::quick().dimensions().to_vec();
        dimensions.push(Dimension::flag("seed"));
        let grid = ParameterGrid::new(dimensions);
        assert!(matches!(
            grid.params().next(),
            Some(Err(ParamsError::UnknownDimension { .. }))
        ));
    }

    #[test]
    fn dim_value_display() {
        assert_eq!(DimValue::Int(10).to_string(), "10");
        assert_eq!(DimValue::Bool(false).to_string(), "false");
    }
}
