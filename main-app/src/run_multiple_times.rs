// Copyright 2026 the DelegativeSim authors.
// This file is part of DelegativeSim.
// DelegativeSim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// DelegativeSim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with DelegativeSim.  If not, see <https://www.gnu.org/licenses/>.

//! Run an experiment many times, possibly split over several threads, and collect the agreements.
//!
//! Iteration i always uses the random stream trial_rng(base_seed,i), and results are merged
//! in iteration order, so the results do not depend on the number of threads.

use std::sync::Arc;
use std::thread;
use serde::{Serialize,Deserialize};
use delegative::random_util::trial_rng;
use statistics::moment_table::MomentTable;
use crate::experiment_definition::{ExperimentDefinition, Sweep, TrialParameters};
use crate::trial::{run_iteration, TrialOutcome};

/// All the agreements for one configuration.
#[derive(Serialize,Deserialize,Clone,Debug,PartialEq)]
pub struct ParameterResults {
    pub parameters : TrialParameters,
    /// one per successful iteration, in iteration order.
    pub agreements : Vec<f64>,
    /// number of iterations where this configuration failed.
    pub failures : usize,
    /// the first failure, if any.
    #[serde(skip_serializing_if = "Option::is_none",default)]
    pub first_failure : Option<String>,
}

impl ParameterResults {
    fn add(&mut self,outcome:TrialOutcome) {
        match outcome {
            Ok(agreement) => self.agreements.push(agreement),
            Err(e) => {
                if self.failures==0 { tracing::warn!("{} failed : {}",self.parameters,e); }
                self.failures+=1;
                if self.first_failure.is_none() { self.first_failure=Some(e.to_string()); }
            }
        }
    }

    fn merge(&mut self,other:ParameterResults) {
        self.agreements.extend(other.agreements);
        self.failures+=other.failures;
        if self.first_failure.is_none() { self.first_failure=other.first_failure; }
    }
}

#[derive(Serialize,Deserialize,Clone,Debug,PartialEq)]
pub struct ExperimentResults {
    pub definition : ExperimentDefinition,
    pub base_seed : u64,
    /// Iterations whose results are included.
    pub iterations_completed : usize,
    /// Iterations lost because the thread running them died.
    #[serde(default)]
    pub iterations_lost : usize,
    /// in the order of [Sweep::trials]
    pub results : Vec<ParameterResults>,
}

impl ExperimentResults {
    pub fn new(definition:ExperimentDefinition,base_seed:u64,sweep:&Sweep) -> Self {
        let results = sweep.trials().into_iter().map(|parameters|ParameterResults{ parameters, agreements: vec![], failures: 0, first_failure: None }).collect();
        ExperimentResults{ definition, base_seed, iterations_completed: 0, iterations_lost: 0, results }
    }

    /// Add the outcomes of one iteration, as returned by run_iteration.
    pub fn add_iteration(&mut self,outcomes:Vec<TrialOutcome>) {
        for (result,outcome) in self.results.iter_mut().zip(outcomes) { result.add(outcome); }
        self.iterations_completed+=1;
    }

    /// Append other's results, which must be for the same sweep.
    pub fn merge(&mut self,other:ExperimentResults) -> anyhow::Result<()> {
        if other.results.len()!=self.results.len() { return Err(anyhow::anyhow!("Merging results for {} configurations into results for {}",other.results.len(),self.results.len())); }
        for (mine,theirs) in self.results.iter_mut().zip(other.results) { mine.merge(theirs); }
        self.iterations_completed+=other.iterations_completed;
        self.iterations_lost+=other.iterations_lost;
        Ok(())
    }

    /// Run iterations first..first+count, single threaded.
    pub fn new_from_iterations(definition:&ExperimentDefinition,sweep:&Sweep,base_seed:u64,first:usize,count:usize) -> Self {
        let mut res = ExperimentResults::new(definition.clone(),base_seed,sweep);
        for iteration in first..first+count {
            let mut rng = trial_rng(base_seed,iteration as u64);
            res.add_iteration(run_iteration(sweep,&mut rng));
            if iteration%100==0 { tracing::debug!("Finished iteration {}",iteration); }
        }
        res
    }

    /// Run definition.n_iter iterations split amongst num_threads threads.
    pub fn new_from_runs_multithreaded(definition:&ExperimentDefinition,base_seed:u64,num_threads:usize) -> Self {
        let times = definition.n_iter;
        let num_threads = num_threads.max(1);
        let sweep = Arc::new(definition.sweep());
        tracing::info!("Running {} iterations of {} configurations on {} threads",times,sweep.num_trials(),num_threads);
        let mut handles = vec![];
        let mut first = 0;
        for thread_no in 0..num_threads {
            let num_to_do = times / num_threads + (if times % num_threads > thread_no { 1 } else { 0 });
            let sweep = sweep.clone();
            let definition = definition.clone();
            let handle = thread::spawn(move || {
                Self::new_from_iterations(&definition,&sweep,base_seed,first,num_to_do)
            });
            handles.push((handle,num_to_do));
            first+=num_to_do;
        }
        let mut res = ExperimentResults::new(definition.clone(),base_seed,&sweep);
        for (handle,num_to_do) in handles {
            match handle.join() {
                Ok(partial) => {
                    if let Err(e) = res.merge(partial) {
                        tracing::warn!("Discarding results from a thread : {}",e);
                        res.iterations_lost+=num_to_do;
                    }
                }
                Err(_) => {
                    tracing::warn!("A thread running {} iterations panicked",num_to_do);
                    res.iterations_lost+=num_to_do;
                }
            }
        }
        tracing::info!("Completed {} iterations",res.iterations_completed);
        res
    }

    pub fn total_failures(&self) -> usize { self.results.iter().map(|r|r.failures).sum() }

    /// The moments of the agreements for each configuration, with a column for every parameter.
    pub fn moment_table(&self) -> anyhow::Result<MomentTable> {
        let mut table = MomentTable::new(TrialParameters::COLUMN_NAMES.iter().map(|s|s.to_string()).collect());
        for result in &self.results {
            table.add(result.parameters.column_values(),&result.agreements)?;
        }
        Ok(table)
    }
}
