// Copyright 2026 the DelegativeSim authors.
// This file is part of DelegativeSim.
// DelegativeSim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// DelegativeSim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with DelegativeSim.  If not, see <https://www.gnu.org/licenses/>.

//! Synthetic voters and candidates with positions on binary issues, and the
//! various views of those positions that election rules consume.
//!
//! The base preferences are only ever replaced wholesale. Every other view
//! (distances, approvals, orders, agreements, the voter majority) is computed
//! on first request and cached until the base preferences change.

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Serialize,Deserialize};
use crate::election_rules::ElectionRule;
use crate::error::ConfigurationError;
use crate::ids::CandidateIndex;
use crate::majority::majority;
use crate::tie_break::{lowest_n, sort_with_random_tiebreak, TiebreakerKind};
use crate::util::{check_rectangular, subset_to_indicator};

/// How to give each voter their own probability of taking position 1 on an issue,
/// instead of everyone using voters_p.
#[derive(Clone,Copy,Debug,PartialEq,Serialize,Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityDistribution {
    /// Uniform on [0,1]
    Uniform,
    /// Normal, clamped to [0,1].
    Normal { mean : f64, std_dev : f64 },
}

impl IntensityDistribution {
    pub const DEFAULT_NORMAL : IntensityDistribution = IntensityDistribution::Normal { mean: 0.5, std_dev: 1.0 };

    fn validate(&self) -> Result<(),ConfigurationError> {
        match *self {
            IntensityDistribution::Uniform => Ok(()),
            IntensityDistribution::Normal { mean, std_dev } => {
                if !mean.is_finite() { return Err(ConfigurationError::InvalidIntensityDistribution(format!("{} : mean is not finite",self))); }
                if !(std_dev>0.0) { return Err(ConfigurationError::InvalidIntensityDistribution(format!("{} : std_dev must be positive",self))); }
                Normal::new(mean,std_dev).map_err(|e|ConfigurationError::InvalidIntensityDistribution(format!("{} : {}",self,e)))?;
                Ok(())
            }
        }
    }

    /// Draw one intensity per voter, each in [0,1].
    pub fn draw<R:Rng + ?Sized>(&self,n_voters:usize,rng:&mut R) -> Result<Vec<f64>,ConfigurationError> {
        match *self {
            IntensityDistribution::Uniform => Ok((0..n_voters).map(|_|rng.random::<f64>()).collect()),
            IntensityDistribution::Normal { mean, std_dev } => {
                let normal = Normal::new(mean,std_dev).map_err(|e|ConfigurationError::InvalidIntensityDistribution(format!("{} : {}",self,e)))?;
                Ok((0..n_voters).map(|_|normal.sample(rng).clamp(0.0,1.0)).collect())
            }
        }
    }
}

impl FromStr for IntensityDistribution {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "uniform" => Ok(IntensityDistribution::Uniform),
            "normal" => Ok(IntensityDistribution::DEFAULT_NORMAL),
            _ => Err(ConfigurationError::UnknownIntensityDistribution(s.to_string())),
        }
    }
}

impl Display for IntensityDistribution {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            IntensityDistribution::Uniform => write!(f,"uniform"),
            IntensityDistribution::Normal { mean, std_dev } => write!(f,"normal({},{})",mean,std_dev),
        }
    }
}

/// Everything needed to generate a profile.
#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
pub struct ProfileParameters {
    pub n_voters : usize,
    pub n_cands : usize,
    pub n_issues : usize,
    /// probability a voter takes position 1 on an issue.
    pub voters_p : f64,
    /// probability a candidate takes position 1 on an issue.
    pub cands_p : f64,
    /// voters can approve at most app_k candidates
    pub app_k : usize,
    /// voters only approve candidates strictly closer than app_thresh, except that 1.0 approves everyone.
    pub app_thresh : f64,
    /// if present, overrides voters_p with a per voter probability.
    #[serde(skip_serializing_if = "Option::is_none",default)]
    pub intensity : Option<IntensityDistribution>,
}

impl ProfileParameters {
    /// Even odds on every issue, and voters approve any candidate within half the issues.
    pub fn new(n_voters:usize,n_cands:usize,n_issues:usize) -> Self {
        ProfileParameters{ n_voters, n_cands, n_issues, voters_p: 0.5, cands_p: 0.5, app_k: n_cands, app_thresh: 0.5, intensity: None }
    }

    /// Check everything before any random number is drawn.
    pub fn validate(&self) -> Result<(),ConfigurationError> {
        fn probability(parameter:&'static str,value:f64) -> Result<(),ConfigurationError> {
            if (0.0..=1.0).contains(&value) { Ok(()) } else { Err(ConfigurationError::InvalidProbability { parameter, value }) }
        }
        probability("voters_p",self.voters_p)?;
        probability("cands_p",self.cands_p)?;
        probability("app_thresh",self.app_thresh)?;
        if self.n_voters==0 { return Err(ConfigurationError::EmptyDimension("n_voters")); }
        if self.n_cands==0 { return Err(ConfigurationError::EmptyDimension("n_cands")); }
        if self.n_issues==0 { return Err(ConfigurationError::EmptyDimension("n_issues")); }
        if let Some(intensity) = &self.intensity { intensity.validate()?; }
        Ok(())
    }
}

/// The views of a profile that can be derived from the issue preferences.
#[derive(Clone,Copy,Debug,PartialEq,Eq)]
pub enum Representation {
    Distances,
    Approvals,
    ApprovalIndicators,
    Orders,
    Agreements,
    VoterMajority,
}

/// Which of the election-facing views a caller will want. Deriving only these bounds the cost of a trial.
#[derive(Clone,Copy,Debug,Default,PartialEq,Eq)]
pub struct RepresentationsNeeded {
    pub approvals : bool,
    pub orders : bool,
    pub agreements : bool,
}

impl RepresentationsNeeded {
    pub fn all() -> Self { RepresentationsNeeded{ approvals: true, orders: true, agreements: true } }

    /// The union of what the given rules consume.
    pub fn for_rules(rules:&[ElectionRule]) -> Self {
        rules.iter().fold(RepresentationsNeeded::default(),|acc,rule|acc.union(rule.representations_needed()))
    }

    pub fn union(self,other:RepresentationsNeeded) -> Self {
        RepresentationsNeeded{
            approvals: self.approvals || other.approvals,
            orders: self.orders || other.orders,
            agreements: self.agreements || other.agreements,
        }
    }
}

#[derive(Clone,Debug,Default)]
struct DerivedViews {
    /// [voter][candidate], normalized Hamming distance.
    distances : Option<Vec<Vec<f64>>>,
    /// [voter] candidates approved, ascending id order unless truncated.
    approvals : Option<Vec<Vec<CandidateIndex>>>,
    /// [voter][candidate]
    approval_indicators : Option<Vec<Vec<bool>>>,
    /// [voter] all candidates, most preferred first.
    orders : Option<Vec<Vec<CandidateIndex>>>,
    /// [voter][candidate] 1-distance
    agreements : Option<Vec<Vec<f64>>>,
    /// [issue]
    voter_majority : Option<Vec<bool>>,
}

/// Voters and candidates, their positions on each issue, and lazily computed views of those positions.
#[derive(Clone,Debug)]
pub struct Profile {
    parameters : ProfileParameters,
    voter_intensities : Option<Vec<f64>>,
    /// [voter][issue]
    voter_preferences : Vec<Vec<bool>>,
    /// [candidate][issue]
    candidate_preferences : Vec<Vec<bool>>,
    derived : DerivedViews,
}

impl Profile {
    /// Draw a new profile.
    pub fn generate<R:Rng + ?Sized>(parameters:ProfileParameters,rng:&mut R) -> Result<Self,ConfigurationError> {
        parameters.validate()?;
        let mut profile = Profile{ parameters, voter_intensities: None, voter_preferences: vec![], candidate_preferences: vec![], derived: DerivedViews::default() };
        profile.create_issue_preferences(rng)?;
        Ok(profile)
    }

    /// Draw a new profile and derive the views that will be needed, plus distances and the voter majority which always are.
    pub fn new_instance<R:Rng + ?Sized>(parameters:ProfileParameters,needed:RepresentationsNeeded,rng:&mut R) -> Result<Self,ConfigurationError> {
        let mut profile = Profile::generate(parameters,rng)?;
        profile.derive(needed,rng);
        Ok(profile)
    }

    /// Make a profile from explicitly given preferences. The dimensions in parameters must match.
    pub fn from_preferences(parameters:ProfileParameters,voter_preferences:Vec<Vec<bool>>,candidate_preferences:Vec<Vec<bool>>) -> Result<Self,ConfigurationError> {
        parameters.validate()?;
        if voter_preferences.len()!=parameters.n_voters { return Err(ConfigurationError::DimensionMismatch { what: "voters", expected: parameters.n_voters, got: voter_preferences.len() }); }
        if candidate_preferences.len()!=parameters.n_cands { return Err(ConfigurationError::DimensionMismatch { what: "candidates", expected: parameters.n_cands, got: candidate_preferences.len() }); }
        check_rectangular(&voter_preferences,parameters.n_issues)?;
        check_rectangular(&candidate_preferences,parameters.n_issues)?;
        Ok(Profile{ parameters, voter_intensities: None, voter_preferences, candidate_preferences, derived: DerivedViews::default() })
    }

    /// Draw fresh issue preferences with the same parameters, discarding every derived view.
    pub fn regenerate<R:Rng + ?Sized>(&mut self,rng:&mut R) -> Result<(),ConfigurationError> {
        self.create_issue_preferences(rng)
    }

    fn create_issue_preferences<R:Rng + ?Sized>(&mut self,rng:&mut R) -> Result<(),ConfigurationError> {
        self.parameters.validate()?;
        let ProfileParameters{n_voters,n_cands,n_issues,voters_p,cands_p,..} = self.parameters;
        self.voter_intensities = match &self.parameters.intensity {
            Some(distribution) => {
                tracing::debug!("Generating preferences from {} intensities",distribution);
                Some(distribution.draw(n_voters,rng)?)
            }
            None => None,
        };
        self.voter_preferences = match &self.voter_intensities {
            Some(intensities) => intensities.iter().map(|&p|(0..n_issues).map(|_|rng.random_bool(p)).collect::<Vec<bool>>()).collect(),
            None => (0..n_voters).map(|_|(0..n_issues).map(|_|rng.random_bool(voters_p)).collect::<Vec<bool>>()).collect(),
        };
        self.candidate_preferences = (0..n_cands).map(|_|(0..n_issues).map(|_|rng.random_bool(cands_p)).collect::<Vec<bool>>()).collect();
        self.derived = DerivedViews::default();
        Ok(())
    }

    /// Derive distances, the voter majority, and the requested election views.
    pub fn derive<R:Rng + ?Sized>(&mut self,needed:RepresentationsNeeded,rng:&mut R) {
        self.ensure_distances();
        self.ensure_voter_majority(rng);
        if needed.approvals {
            self.ensure_approval_indicators(rng);
            tracing::debug!("created approvals and approval indicators");
        }
        if needed.orders {
            self.ensure_orders(rng);
            tracing::debug!("created preference orders");
        }
        if needed.agreements {
            self.ensure_agreements();
            tracing::debug!("created agreements");
        }
    }

    /// Change the approval rules. Only the approval views are invalidated.
    pub fn set_approval_parameters(&mut self,app_k:usize,app_thresh:f64) -> Result<(),ConfigurationError> {
        if !(0.0..=1.0).contains(&app_thresh) { return Err(ConfigurationError::InvalidProbability { parameter: "app_thresh", value: app_thresh }); }
        self.parameters.app_k=app_k;
        self.parameters.app_thresh=app_thresh;
        self.derived.approvals=None;
        self.derived.approval_indicators=None;
        Ok(())
    }

    pub fn parameters(&self) -> &ProfileParameters { &self.parameters }
    pub fn n_voters(&self) -> usize { self.parameters.n_voters }
    pub fn n_candidates(&self) -> usize { self.parameters.n_cands }
    pub fn n_issues(&self) -> usize { self.parameters.n_issues }
    pub fn voter_preferences(&self) -> &[Vec<bool>] { &self.voter_preferences }
    pub fn candidate_preferences(&self) -> &[Vec<bool>] { &self.candidate_preferences }
    pub fn voter_intensities(&self) -> Option<&[f64]> { self.voter_intensities.as_deref() }

    /// Whether a view is currently cached.
    pub fn is_derived(&self,representation:Representation) -> bool {
        match representation {
            Representation::Distances => self.derived.distances.is_some(),
            Representation::Approvals => self.derived.approvals.is_some(),
            Representation::ApprovalIndicators => self.derived.approval_indicators.is_some(),
            Representation::Orders => self.derived.orders.is_some(),
            Representation::Agreements => self.derived.agreements.is_some(),
            Representation::VoterMajority => self.derived.voter_majority.is_some(),
        }
    }

    /// The voter majority, if it has been computed.
    pub fn voter_majority(&self) -> Option<&[bool]> { self.derived.voter_majority.as_deref() }

    pub fn ensure_distances(&mut self) -> &[Vec<f64>] {
        let (voters,candidates) = (&self.voter_preferences,&self.candidate_preferences);
        self.derived.distances.get_or_insert_with(||issues_to_distances(voters,candidates))
    }

    pub fn ensure_approvals<R:Rng + ?Sized>(&mut self,rng:&mut R) -> &[Vec<CandidateIndex>] {
        let (app_k,app_thresh) = (self.parameters.app_k,self.parameters.app_thresh);
        let (voters,candidates) = (&self.voter_preferences,&self.candidate_preferences);
        let DerivedViews{distances,approvals,..} = &mut self.derived;
        let distances = distances.get_or_insert_with(||issues_to_distances(voters,candidates));
        approvals.get_or_insert_with(||distances_to_approvals(distances,app_k,app_thresh,rng))
    }

    pub fn ensure_approval_indicators<R:Rng + ?Sized>(&mut self,rng:&mut R) -> &[Vec<bool>] {
        let n_cands = self.parameters.n_cands;
        if self.derived.approval_indicators.is_none() {
            let indicators : Vec<Vec<bool>> = self.ensure_approvals(rng).iter().map(|approved|subset_to_indicator(approved,n_cands)).collect();
            self.derived.approval_indicators=Some(indicators);
        }
        self.derived.approval_indicators.get_or_insert_with(Vec::new)
    }

    pub fn ensure_orders<R:Rng + ?Sized>(&mut self,rng:&mut R) -> &[Vec<CandidateIndex>] {
        let (voters,candidates) = (&self.voter_preferences,&self.candidate_preferences);
        let DerivedViews{distances,orders,..} = &mut self.derived;
        let distances = distances.get_or_insert_with(||issues_to_distances(voters,candidates));
        orders.get_or_insert_with(||distances_to_orders(distances,rng))
    }

    pub fn ensure_agreements(&mut self) -> &[Vec<f64>] {
        let (voters,candidates) = (&self.voter_preferences,&self.candidate_preferences);
        let DerivedViews{distances,agreements,..} = &mut self.derived;
        let distances = distances.get_or_insert_with(||issues_to_distances(voters,candidates));
        agreements.get_or_insert_with(||distances_to_agreements(distances))
    }

    /// The unweighted majority of voters on each issue, exact ties resolved by an independent coin per issue.
    pub fn ensure_voter_majority<R:Rng + ?Sized>(&mut self,rng:&mut R) -> &[bool] {
        let voters = &self.voter_preferences;
        let n_issues = self.parameters.n_issues;
        self.derived.voter_majority.get_or_insert_with(||majority(voters,n_issues,rng))
    }
}

/// Normalized Hamming distance between every voter and every candidate. 0 means identical positions, 1 means opposite on every issue.
pub fn issues_to_distances(voters:&[Vec<bool>],candidates:&[Vec<bool>]) -> Vec<Vec<f64>> {
    voters.iter().map(|voter|{
        candidates.iter().map(|candidate|{
            let n_issues = voter.len().max(1);
            let different = voter.iter().zip(candidate.iter()).filter(|(v,c)|v!=c).count();
            different as f64/n_issues as f64
        }).collect()
    }).collect()
}

/// Each voter approves the candidates closer than app_thresh, or everyone if app_thresh is 1.
/// If that is more than app_k candidates, only the app_k closest are approved, equal distances
/// resolved randomly.
pub fn distances_to_approvals<R:Rng + ?Sized>(distances:&[Vec<f64>],app_k:usize,app_thresh:f64,rng:&mut R) -> Vec<Vec<CandidateIndex>> {
    distances.iter().map(|row|{
        let approvable : Vec<CandidateIndex> = row.iter().enumerate().filter(|(_,d)|**d<app_thresh || app_thresh>=1.0).map(|(c,_)|CandidateIndex(c)).collect();
        if approvable.len()<=app_k { approvable }
        else { lowest_n(row,app_k,rng).into_iter().map(CandidateIndex).collect() }
    }).collect()
}

/// Each voter ranks every candidate by increasing distance, equal distances resolved randomly.
pub fn distances_to_orders<R:Rng + ?Sized>(distances:&[Vec<f64>],rng:&mut R) -> Vec<Vec<CandidateIndex>> {
    distances.iter().map(|row|sort_with_random_tiebreak(row,TiebreakerKind::Permutation,rng).into_iter().map(|e|CandidateIndex(e.index)).collect()).collect()
}

pub fn distances_to_agreements(distances:&[Vec<f64>]) -> Vec<Vec<f64>> {
    distances.iter().map(|row|row.iter().map(|d|1.0-d).collect()).collect()
}
