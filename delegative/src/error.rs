// Copyright 2026 the DelegativeSim authors.
// This file is part of DelegativeSim.
// DelegativeSim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// DelegativeSim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with DelegativeSim.  If not, see <https://www.gnu.org/licenses/>.

//! Errors that abort a single trial. Nothing here is ever recovered from inside a trial;
//! a batch driver records the failure against the trial's parameters and moves on.

use thiserror::Error;
use crate::delegation::AggregatorStage;

/// Invalid values supplied by whoever configured the trial.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigurationError {
    #[error("{parameter} must be a probability in [0,1], not {value}")]
    InvalidProbability { parameter: &'static str, value: f64 },
    #[error("{0} must be at least 1")]
    EmptyDimension(&'static str),
    #[error("Cannot elect {requested} representatives with only {available} candidates")]
    TooManyWinners { requested: usize, available: usize },
    #[error("Cannot choose {requested} delegators from only {available} voters")]
    TooManyDelegators { requested: usize, available: usize },
    #[error("best_k delegation needs k of at least 1")]
    BestKZero,
    #[error("No such election rule : {0}")]
    UnknownElectionRule(String),
    #[error("No such default weighting : {0}")]
    UnknownDefaultWeighting(String),
    #[error("No such delegation style : {0}")]
    UnknownDelegationStyle(String),
    #[error("No such intensity distribution : {0}")]
    UnknownIntensityDistribution(String),
    #[error("Intensity distribution parameters are invalid : {0}")]
    InvalidIntensityDistribution(String),
    #[error("Score vector has length {got}, not equal to the number of candidates {expected}")]
    ScoreVectorLength { expected: usize, got: usize },
    #[error("Tiebreakers have length {got}, but there are {expected} values to sort")]
    TiebreakerLength { expected: usize, got: usize },
    #[error("Expecting {expected} {what}, got {got}")]
    DimensionMismatch { what: &'static str, expected: usize, got: usize },
    #[error("Matrix row {row} has length {got}, expecting {expected}")]
    RaggedMatrix { row: usize, expected: usize, got: usize },
    #[error("Aggregator asked to do something requiring stage {required:?} while at stage {actual:?}")]
    StageOutOfOrder { required: AggregatorStage, actual: AggregatorStage },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimulationError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// A scheme that is named, and will probably be supported one day, but is not yet.
    /// Raised rather than silently substituting a different scheme.
    #[error("Weighting or delegation scheme not implemented : {0}")]
    UnimplementedScheme(String),
}
