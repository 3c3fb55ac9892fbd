// Copyright 2026 the DelegativeSim authors.
// This file is part of DelegativeSim.
// DelegativeSim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// DelegativeSim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with DelegativeSim.  If not, see <https://www.gnu.org/licenses/>.

//! Representative democracy : the representatives vote on every issue with fixed weights.

use rand::RngCore;
use crate::delegation::{AggregatorStage, DefaultWeighting, DelegativeAggregator, RepresentativeElection};
use crate::election_rules::{ElectionOutcome, ElectionRule};
use crate::error::{ConfigurationError, SimulationError};
use crate::majority::weighted_majority;
use crate::profile::Profile;
use crate::util::fraction_agreeing;

#[derive(Clone,Debug)]
pub struct RepresentativeDemocracy {
    election : RepresentativeElection,
    pub default_weighting : DefaultWeighting,
    /// one per representative, in the order elected.
    weights : Vec<f64>,
    /// [issue]
    outcome : Option<Vec<bool>>,
    agreement : Option<f64>,
}

impl RepresentativeDemocracy {
    pub fn new(rule:ElectionRule,n_reps:usize,default_weighting:DefaultWeighting) -> Self {
        Self::from_election(RepresentativeElection::new(rule,n_reps),default_weighting)
    }

    /// Quick mode : use representatives already elected for this profile.
    pub fn with_representatives(outcome:ElectionOutcome,default_weighting:DefaultWeighting) -> Self {
        Self::from_election(RepresentativeElection::with_representatives(outcome),default_weighting)
    }

    fn from_election(election:RepresentativeElection,default_weighting:DefaultWeighting) -> Self {
        RepresentativeDemocracy{ election, default_weighting, weights: vec![], outcome: None, agreement: None }
    }

    pub fn election(&self) -> &RepresentativeElection { &self.election }
    /// One per representative, empty until assigned.
    pub fn weights(&self) -> &[f64] { &self.weights }
    /// The representatives' weighted majority on each issue, once computed.
    pub fn outcome(&self) -> Option<&[bool]> { self.outcome.as_deref() }
}

impl DelegativeAggregator for RepresentativeDemocracy {
    fn stage(&self) -> AggregatorStage { self.election.stage() }

    fn elect_representatives(&mut self, profile: &mut Profile, rng: &mut dyn RngCore) -> Result<(), SimulationError> {
        self.election.elect(profile,rng)
    }

    fn pull_representative_preferences(&mut self, profile: &Profile) -> Result<(), SimulationError> {
        self.election.pull_preferences(profile)
    }

    fn compute_weights(&mut self, _profile: &mut Profile, _rng: &mut dyn RngCore) -> Result<(), SimulationError> {
        self.election.require(AggregatorStage::PreferencesPulled)?;
        let outcome = self.election.outcome().ok_or(ConfigurationError::StageOutOfOrder { required: AggregatorStage::RepresentativesElected, actual: self.election.stage() })?;
        self.weights = self.default_weighting.representative_weights(outcome)?;
        self.election.advance(AggregatorStage::PreferencesPulled,AggregatorStage::WeightsAssigned)?;
        Ok(())
    }

    fn aggregate(&mut self, profile: &mut Profile, rng: &mut dyn RngCore) -> Result<f64, SimulationError> {
        self.election.require(AggregatorStage::WeightsAssigned)?;
        let outcome = weighted_majority(self.election.representative_preferences(),&self.weights,profile.n_issues(),rng);
        let agreement = fraction_agreeing(&outcome,profile.ensure_voter_majority(rng));
        tracing::debug!("RD {} {} reps with {} weights agreement {}",self.election.rule,self.election.n_reps,self.default_weighting,agreement);
        self.outcome=Some(outcome);
        self.agreement=Some(agreement);
        self.election.advance(AggregatorStage::WeightsAssigned,AggregatorStage::OutcomeComputed)?;
        Ok(agreement)
    }

    fn agreement(&self) -> Option<f64> { self.agreement }
}
