// Copyright 2026 the DelegativeSim authors.
// This file is part of DelegativeSim.
// DelegativeSim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// DelegativeSim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with DelegativeSim.  If not, see <https://www.gnu.org/licenses/>.

//! What representative democracy (RD) and fluid representative democracy (FRD) have in common.
//!
//! Both elect representatives with an election rule, pull the representatives' issue
//! preferences out of the profile, give each representative a weight, and take a
//! weighted majority on every issue. The result is the fraction of issues on which
//! that agrees with the direct majority of the voters.
//!
//! Each step may only be done once, in order. An aggregator can also be created with
//! representatives already elected (quick mode), so that several aggregators in
//! the same trial share one election.

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use rand::RngCore;
use serde::{Serialize,Deserialize};
use crate::election_rules::{ElectionOutcome, ElectionRule};
use crate::error::{ConfigurationError, SimulationError};
use crate::ids::CandidateIndex;
use crate::profile::Profile;

/// Where an aggregator is up to. Each step moves to the next stage.
#[derive(Clone,Copy,Debug,PartialEq,Eq,PartialOrd,Ord,Hash)]
pub enum AggregatorStage {
    Created,
    RepresentativesElected,
    PreferencesPulled,
    WeightsAssigned,
    OutcomeComputed,
}

/// How much say each representative has before any voter delegates.
#[derive(Clone,Copy,Debug,PartialEq,Eq,Hash,Serialize,Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultWeighting {
    /// Every representative equal.
    Uniform,
    /// In proportion to the score the election rule gave them.
    ElectionScores,
    /// Named, not yet supported.
    BordaScores,
    /// Named, not yet supported.
    ApprovalCounts,
}

impl DefaultWeighting {
    pub fn name(&self) -> &'static str {
        match self {
            DefaultWeighting::Uniform => "uniform",
            DefaultWeighting::ElectionScores => "election_scores",
            DefaultWeighting::BordaScores => "borda_scores",
            DefaultWeighting::ApprovalCounts => "approval_counts",
        }
    }

    /// The raw weight of each representative, in the order of outcome.winners.
    /// Uniform weights are 1/n_reps; election score weights are the unnormalized rule scores.
    pub fn representative_weights(&self,outcome:&ElectionOutcome) -> Result<Vec<f64>,SimulationError> {
        let n_reps = outcome.winners.len();
        match self {
            DefaultWeighting::Uniform => Ok(vec![1.0/n_reps as f64;n_reps]),
            DefaultWeighting::ElectionScores => Ok(outcome.winners.iter().map(|&rep|outcome.score(rep)).collect()),
            DefaultWeighting::BordaScores | DefaultWeighting::ApprovalCounts => Err(SimulationError::UnimplementedScheme(self.name().to_string())),
        }
    }
}

impl FromStr for DefaultWeighting {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uniform" => Ok(DefaultWeighting::Uniform),
            "election_scores" => Ok(DefaultWeighting::ElectionScores),
            "borda_scores" => Ok(DefaultWeighting::BordaScores),
            "approval_counts" => Ok(DefaultWeighting::ApprovalCounts),
            _ => Err(ConfigurationError::UnknownDefaultWeighting(s.to_string())),
        }
    }
}

impl Display for DefaultWeighting {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f,"{}",self.name()) }
}

/// The election part of an aggregator, plus the stage bookkeeping.
#[derive(Clone,Debug)]
pub struct RepresentativeElection {
    pub rule : ElectionRule,
    pub n_reps : usize,
    stage : AggregatorStage,
    outcome : Option<ElectionOutcome>,
    /// [rep][issue], reps in the order of outcome.winners.
    representative_preferences : Vec<Vec<bool>>,
}

impl RepresentativeElection {
    pub fn new(rule:ElectionRule,n_reps:usize) -> Self {
        RepresentativeElection{ rule, n_reps, stage: AggregatorStage::Created, outcome: None, representative_preferences: vec![] }
    }

    /// Quick mode : start with the representatives someone else already elected.
    pub fn with_representatives(outcome:ElectionOutcome) -> Self {
        RepresentativeElection{ rule: outcome.rule, n_reps: outcome.winners.len(), stage: AggregatorStage::RepresentativesElected, outcome: Some(outcome), representative_preferences: vec![] }
    }

    pub fn stage(&self) -> AggregatorStage { self.stage }

    /// Error unless currently at stage `required`.
    pub fn require(&self,required:AggregatorStage) -> Result<(),ConfigurationError> {
        if self.stage==required { Ok(()) } else { Err(ConfigurationError::StageOutOfOrder { required, actual: self.stage }) }
    }

    /// Move from `from` to the next stage.
    pub fn advance(&mut self,from:AggregatorStage,to:AggregatorStage) -> Result<(),ConfigurationError> {
        self.require(from)?;
        self.stage=to;
        Ok(())
    }

    pub fn elect(&mut self,profile:&mut Profile,rng:&mut dyn RngCore) -> Result<(),SimulationError> {
        self.require(AggregatorStage::Created)?;
        self.outcome = Some(self.rule.elect(profile,self.n_reps,rng)?);
        self.stage = AggregatorStage::RepresentativesElected;
        Ok(())
    }

    /// Copy the candidate preference rows of the elected representatives.
    pub fn pull_preferences(&mut self,profile:&Profile) -> Result<(),SimulationError> {
        self.require(AggregatorStage::RepresentativesElected)?;
        let outcome = self.outcome.as_ref().ok_or(ConfigurationError::StageOutOfOrder { required: AggregatorStage::RepresentativesElected, actual: self.stage })?;
        let candidate_preferences = profile.candidate_preferences();
        if outcome.scores.len()!=candidate_preferences.len() { return Err(ConfigurationError::ScoreVectorLength { expected: candidate_preferences.len(), got: outcome.scores.len() }.into()); }
        for &rep in &outcome.winners {
            if rep.0>=candidate_preferences.len() { return Err(ConfigurationError::DimensionMismatch { what: "candidates", expected: rep.0+1, got: candidate_preferences.len() }.into()); }
        }
        self.representative_preferences = outcome.winners.iter().map(|rep|candidate_preferences[rep.0].clone()).collect();
        self.stage = AggregatorStage::PreferencesPulled;
        Ok(())
    }

    /// The election result, once elected.
    pub fn outcome(&self) -> Option<&ElectionOutcome> { self.outcome.as_ref() }

    /// The elected representatives, best first.
    pub fn representatives(&self) -> &[CandidateIndex] {
        self.outcome.as_ref().map(|o|o.winners.as_slice()).unwrap_or(&[])
    }

    /// [rep][issue], empty until pulled.
    pub fn representative_preferences(&self) -> &[Vec<bool>] { &self.representative_preferences }
}

/// Something that turns a profile into a single agreement score via representatives.
///
/// Randomness is passed as `&mut dyn RngCore` so aggregators can be boxed and mixed.
pub trait DelegativeAggregator {
    fn stage(&self) -> AggregatorStage;
    /// Created → RepresentativesElected.
    fn elect_representatives(&mut self,profile:&mut Profile,rng:&mut dyn RngCore) -> Result<(),SimulationError>;
    /// RepresentativesElected → PreferencesPulled.
    fn pull_representative_preferences(&mut self,profile:&Profile) -> Result<(),SimulationError>;
    /// PreferencesPulled → WeightsAssigned.
    fn compute_weights(&mut self,profile:&mut Profile,rng:&mut dyn RngCore) -> Result<(),SimulationError>;
    /// WeightsAssigned → OutcomeComputed. Returns the agreement with the voter majority.
    fn aggregate(&mut self,profile:&mut Profile,rng:&mut dyn RngCore) -> Result<f64,SimulationError>;
    /// The agreement, once computed.
    fn agreement(&self) -> Option<f64>;

    /// Do whatever steps remain, and return the agreement with the voter majority.
    fn run(&mut self,profile:&mut Profile,rng:&mut dyn RngCore) -> Result<f64,SimulationError> {
        loop {
            match self.stage() {
                AggregatorStage::Created => self.elect_representatives(profile,rng)?,
                AggregatorStage::RepresentativesElected => self.pull_representative_preferences(profile)?,
                AggregatorStage::PreferencesPulled => self.compute_weights(profile,rng)?,
                AggregatorStage::WeightsAssigned => { self.aggregate(profile,rng)?; }
                AggregatorStage::OutcomeComputed => {
                    return self.agreement().ok_or(SimulationError::Configuration(ConfigurationError::StageOutOfOrder { required: AggregatorStage::OutcomeComputed, actual: self.stage() }));
                }
            }
        }
    }
}
