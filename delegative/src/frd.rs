// Copyright 2026 the DelegativeSim authors.
// This file is part of DelegativeSim.
// DelegativeSim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// DelegativeSim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with DelegativeSim.  If not, see <https://www.gnu.org/licenses/>.

//! Fluid representative democracy.
//!
//! Every voter holds one unit of weight on every issue, by default spread over the
//! representatives. Some voters (the delegators) move their weight to particular
//! representatives, possibly differently for each issue. The representatives then
//! vote on each issue with the total weight they were given on that issue.

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use rand::RngCore;
use serde::{Serialize,Deserialize};
use crate::delegation::{AggregatorStage, DefaultWeighting, DelegativeAggregator, RepresentativeElection};
use crate::election_rules::{ElectionOutcome, ElectionRule};
use crate::error::{ConfigurationError, SimulationError};
use crate::ids::{IssueIndex, VoterIndex};
use crate::majority::issue_weighted_majority;
use crate::profile::Profile;
use crate::random_util::sample_without_replacement;
use crate::util::{fraction_agreeing, normalize};

/// How a delegator moves their weight.
#[derive(Clone,Copy,Debug,PartialEq,Eq,Hash,Serialize,Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum DelegationStyle {
    /// On each issue, all weight to a representative who agrees with the voter on that issue.
    Incisive,
    /// Split equally over the voter's k favourite representatives, the same for every issue.
    BestK(usize),
}

impl FromStr for DelegationStyle {
    type Err = ConfigurationError;

    /// `incisive` or `best_k:<k>`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s=="incisive" { return Ok(DelegationStyle::Incisive); }
        if let Some(k) = s.strip_prefix("best_k:") {
            let k : usize = k.trim().parse().map_err(|_|ConfigurationError::UnknownDelegationStyle(s.to_string()))?;
            if k==0 { return Err(ConfigurationError::BestKZero); }
            return Ok(DelegationStyle::BestK(k));
        }
        Err(ConfigurationError::UnknownDelegationStyle(s.to_string()))
    }
}

impl Display for DelegationStyle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            DelegationStyle::Incisive => write!(f,"incisive"),
            DelegationStyle::BestK(k) => write!(f,"best_k:{}",k),
        }
    }
}

impl TryFrom<String> for DelegationStyle {
    type Error = ConfigurationError;
    fn try_from(value: String) -> Result<Self, Self::Error> { value.parse() }
}

impl From<DelegationStyle> for String {
    fn from(value: DelegationStyle) -> Self { value.to_string() }
}

#[derive(Clone,Debug)]
pub struct FluidRepresentativeDemocracy {
    election : RepresentativeElection,
    pub default_weighting : DefaultWeighting,
    pub delegation_style : DelegationStyle,
    pub n_delegators : usize,
    /// ascending
    delegators : Vec<VoterIndex>,
    /// [voter][issue][rep], reps in the order elected. Each voter's weights on an issue sum to 1.
    voter_weights : Vec<Vec<Vec<f64>>>,
    /// [issue][rep]
    representative_weights : Vec<Vec<f64>>,
    /// [issue]
    outcome : Option<Vec<bool>>,
    agreement : Option<f64>,
}

impl FluidRepresentativeDemocracy {
    pub fn new(rule:ElectionRule,n_reps:usize,default_weighting:DefaultWeighting,delegation_style:DelegationStyle,n_delegators:usize) -> Self {
        Self::from_election(RepresentativeElection::new(rule,n_reps),default_weighting,delegation_style,n_delegators)
    }

    /// Quick mode : use representatives already elected for this profile.
    pub fn with_representatives(outcome:ElectionOutcome,default_weighting:DefaultWeighting,delegation_style:DelegationStyle,n_delegators:usize) -> Self {
        Self::from_election(RepresentativeElection::with_representatives(outcome),default_weighting,delegation_style,n_delegators)
    }

    fn from_election(election:RepresentativeElection,default_weighting:DefaultWeighting,delegation_style:DelegationStyle,n_delegators:usize) -> Self {
        FluidRepresentativeDemocracy{ election, default_weighting, delegation_style, n_delegators, delegators: vec![], voter_weights: vec![], representative_weights: vec![], outcome: None, agreement: None }
    }

    pub fn election(&self) -> &RepresentativeElection { &self.election }
    /// The voters who delegated, ascending. Empty until weights are computed.
    pub fn delegators(&self) -> &[VoterIndex] { &self.delegators }
    /// The weight the given voter gives each representative on the given issue. None until weights are computed, or if out of range.
    pub fn voter_issue_weights(&self,voter:VoterIndex,issue:IssueIndex) -> Option<&[f64]> { self.voter_weights.get(voter.0)?.get(issue.0).map(|w|w.as_slice()) }
    /// [issue][rep]. Empty until weights are computed.
    pub fn representative_weights(&self) -> &[Vec<f64>] { &self.representative_weights }
    pub fn outcome(&self) -> Option<&[bool]> { self.outcome.as_deref() }

    /// Every voter gets the same default split over representatives on every issue, summing to 1.
    fn assign_default_weights(&mut self,n_voters:usize,n_issues:usize) -> Result<(),SimulationError> {
        let outcome = self.election.outcome().ok_or(ConfigurationError::StageOutOfOrder { required: AggregatorStage::RepresentativesElected, actual: self.election.stage() })?;
        let default = normalize(&self.default_weighting.representative_weights(outcome)?,false);
        self.voter_weights = vec![vec![default;n_issues];n_voters];
        Ok(())
    }

    fn select_delegators(&mut self,n_voters:usize,rng:&mut dyn RngCore) -> Result<(),ConfigurationError> {
        if self.n_delegators>n_voters { return Err(ConfigurationError::TooManyDelegators { requested: self.n_delegators, available: n_voters }); }
        self.delegators = sample_without_replacement(n_voters,self.n_delegators,rng).into_iter().map(VoterIndex).collect();
        Ok(())
    }

    /// On each issue, each delegator gives all their weight to the agreeing representative with
    /// the lowest candidate id. If none agree, the default weights stay.
    fn incisive_delegation(&mut self,profile:&Profile) {
        let representatives = self.election.representatives();
        let representative_preferences = self.election.representative_preferences();
        let voter_preferences = profile.voter_preferences();
        for &voter in &self.delegators {
            for issue in 0..profile.n_issues() {
                let position = voter_preferences[voter.0][issue];
                let chosen = (0..representatives.len())
                    .filter(|&rep|representative_preferences[rep][issue]==position)
                    .min_by_key(|&rep|representatives[rep]);
                if let Some(chosen) = chosen {
                    let weights = &mut self.voter_weights[voter.0][issue];
                    for (rep,w) in weights.iter_mut().enumerate() { *w = if rep==chosen {1.0} else {0.0}; }
                }
            }
        }
    }

    /// Each delegator splits their weight equally over their k most preferred representatives, on every issue.
    fn best_k_delegation(&mut self,k:usize,profile:&mut Profile,rng:&mut dyn RngCore) -> Result<(),ConfigurationError> {
        if k==0 { return Err(ConfigurationError::BestKZero); }
        let representatives = self.election.representatives();
        let orders = profile.ensure_orders(rng);
        for &voter in &self.delegators {
            let favourites : Vec<usize> = orders[voter.0].iter().filter_map(|c|representatives.iter().position(|r|r==c)).take(k).collect();
            let share = 1.0/favourites.len().max(1) as f64;
            let mut weights = vec![0.0;representatives.len()];
            for &rep in &favourites { weights[rep]=share; }
            for issue_weights in self.voter_weights[voter.0].iter_mut() { issue_weights.clone_from(&weights); }
        }
        Ok(())
    }

    /// Sum the voters' weights on each issue into one weight per representative.
    fn weight_reps(&mut self) {
        let n_reps = self.election.representatives().len();
        let n_issues = self.voter_weights.first().map(|v|v.len()).unwrap_or(0);
        let mut totals = vec![vec![0.0;n_reps];n_issues];
        for voter in &self.voter_weights {
            for (issue,weights) in voter.iter().enumerate() {
                for (rep,w) in weights.iter().enumerate() { totals[issue][rep]+=w; }
            }
        }
        self.representative_weights=totals;
    }
}

impl DelegativeAggregator for FluidRepresentativeDemocracy {
    fn stage(&self) -> AggregatorStage { self.election.stage() }

    fn elect_representatives(&mut self, profile: &mut Profile, rng: &mut dyn RngCore) -> Result<(), SimulationError> {
        self.election.elect(profile,rng)
    }

    fn pull_representative_preferences(&mut self, profile: &Profile) -> Result<(), SimulationError> {
        self.election.pull_preferences(profile)
    }

    fn compute_weights(&mut self, profile: &mut Profile, rng: &mut dyn RngCore) -> Result<(), SimulationError> {
        self.election.require(AggregatorStage::PreferencesPulled)?;
        self.assign_default_weights(profile.n_voters(),profile.n_issues())?;
        self.select_delegators(profile.n_voters(),rng)?;
        match self.delegation_style {
            DelegationStyle::Incisive => self.incisive_delegation(profile),
            DelegationStyle::BestK(k) => self.best_k_delegation(k,profile,rng)?,
        }
        self.weight_reps();
        self.election.advance(AggregatorStage::PreferencesPulled,AggregatorStage::WeightsAssigned)?;
        Ok(())
    }

    fn aggregate(&mut self, profile: &mut Profile, rng: &mut dyn RngCore) -> Result<f64, SimulationError> {
        self.election.require(AggregatorStage::WeightsAssigned)?;
        let outcome = issue_weighted_majority(self.election.representative_preferences(),&self.representative_weights,rng);
        let agreement = fraction_agreeing(&outcome,profile.ensure_voter_majority(rng));
        tracing::debug!("FRD {} {} reps {} delegators {} agreement {}",self.election.rule,self.election.n_reps,self.n_delegators,self.delegation_style,agreement);
        self.outcome=Some(outcome);
        self.agreement=Some(agreement);
        self.election.advance(AggregatorStage::WeightsAssigned,AggregatorStage::OutcomeComputed)?;
        Ok(agreement)
    }

    fn agreement(&self) -> Option<f64> { self.agreement }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use crate::ids::CandidateIndex;
    use crate::profile::ProfileParameters;
    use super::*;

    fn profile() -> Profile {
        let voters = vec![vec![true,false,true],vec![false,false,true],vec![true,true,false]];
        let cands = vec![vec![true,true,true],vec![false,false,false],vec![true,false,true]];
        Profile::from_preferences(ProfileParameters::new(3,3,3),voters,cands).unwrap()
    }

    fn outcome(winners:Vec<usize>) -> ElectionOutcome {
        ElectionOutcome{ rule: ElectionRule::RandomWinners, winners: winners.into_iter().map(CandidateIndex).collect(), scores: vec![1.0;3] }
    }

    #[test]
    fn default_weights_sum_to_one() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let mut profile = profile();
        let mut frd = FluidRepresentativeDemocracy::with_representatives(outcome(vec![2,0]),DefaultWeighting::Uniform,DelegationStyle::Incisive,0);
        frd.run(&mut profile,&mut rng).unwrap();
        assert!(frd.delegators().is_empty());
        for voter in 0..3 {
            for issue in 0..3 { assert_eq!(frd.voter_issue_weights(VoterIndex(voter),IssueIndex(issue)),Some(&[0.5,0.5][..])); }
        }
        assert_eq!(frd.representative_weights()[0],vec![1.5,1.5]);
    }

    #[test]
    fn best_k_uses_favourite_representatives_on_every_issue() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let mut profile = profile();
        let mut frd = FluidRepresentativeDemocracy::with_representatives(outcome(vec![0,1,2]),DefaultWeighting::Uniform,DelegationStyle::BestK(1),3);
        frd.run(&mut profile,&mut rng).unwrap();
        // voter 0 is identical to candidate 2, voter 2 is closest to candidate 0 (distance 1/3).
        for issue in 0..3 {
            assert_eq!(frd.voter_issue_weights(VoterIndex(0),IssueIndex(issue)),Some(&[0.0,0.0,1.0][..]));
            assert_eq!(frd.voter_issue_weights(VoterIndex(2),IssueIndex(issue)),Some(&[1.0,0.0,0.0][..]));
        }
    }

    #[test]
    fn zero_k_and_too_many_delegators_are_errors() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let mut frd = FluidRepresentativeDemocracy::with_representatives(outcome(vec![0]),DefaultWeighting::Uniform,DelegationStyle::BestK(0),1);
        assert_eq!(frd.run(&mut profile(),&mut rng),Err(SimulationError::Configuration(ConfigurationError::BestKZero)));
        let mut frd = FluidRepresentativeDemocracy::with_representatives(outcome(vec![0]),DefaultWeighting::Uniform,DelegationStyle::Incisive,4);
        assert_eq!(frd.run(&mut profile(),&mut rng),Err(SimulationError::Configuration(ConfigurationError::TooManyDelegators { requested: 4, available: 3 })));
    }

    #[test]
    fn delegation_style_names() {
        assert_eq!("incisive".parse::<DelegationStyle>().unwrap(),DelegationStyle::Incisive);
        assert_eq!("best_k:2".parse::<DelegationStyle>().unwrap(),DelegationStyle::BestK(2));
        assert_eq!("best_k:0".parse::<DelegationStyle>(),Err(ConfigurationError::BestKZero));
        assert!("lazy".parse::<DelegationStyle>().is_err());
        assert_eq!(DelegationStyle::BestK(3).to_string(),"best_k:3");
    }
}
