// Copyright 2026 the DelegativeSim authors.
// This file is part of DelegativeSim.
// DelegativeSim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// DelegativeSim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with DelegativeSim.  If not, see <https://www.gnu.org/licenses/>.

//! One iteration of an experiment : a fresh profile for each profile configuration,
//! and every election and aggregation run on it.

use rand::RngCore;
use delegative::error::SimulationError;
use delegative::profile::Profile;
use crate::experiment_definition::{ElectionSweep, Sweep};

/// The agreement for one configuration, or why it could not be computed.
pub type TrialOutcome = Result<f64,SimulationError>;

/// Run every configuration in the sweep once, returning outcomes in the order of [Sweep::trials].
///
/// A failure affects only the configurations depending on the failed step : a profile that
/// cannot be generated fails every configuration using it, an election that fails fails
/// every aggregation sharing it.
pub fn run_iteration(sweep:&Sweep,rng:&mut dyn RngCore) -> Vec<TrialOutcome> {
    let mut res = Vec::with_capacity(sweep.num_trials());
    for profile_sweep in &sweep.profiles {
        match Profile::new_instance(profile_sweep.parameters.clone(),sweep.needed,rng) {
            Ok(mut profile) => {
                for election in &profile_sweep.elections {
                    run_election(election,sweep.quick,&mut profile,rng,&mut res);
                }
            }
            Err(e) => {
                let failures = profile_sweep.elections.iter().map(|e|e.aggregations.len()).sum();
                res.extend(std::iter::repeat_n(Err(SimulationError::Configuration(e)),failures));
            }
        }
    }
    res
}

fn run_election(election:&ElectionSweep,quick:bool,profile:&mut Profile,rng:&mut dyn RngCore,res:&mut Vec<TrialOutcome>) {
    if quick {
        match election.rule.elect(profile,election.n_reps,rng) {
            Ok(outcome) => {
                for aggregation in &election.aggregations {
                    res.push(aggregation.aggregator_with_representatives(outcome.clone()).run(profile,rng));
                }
            }
            Err(e) => res.extend(std::iter::repeat_n(Err(SimulationError::Configuration(e)),election.aggregations.len())),
        }
    } else {
        for aggregation in &election.aggregations {
            res.push(aggregation.aggregator(election.rule,election.n_reps).run(profile,rng));
        }
    }
}
