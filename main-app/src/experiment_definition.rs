// Copyright 2026 the DelegativeSim authors.
// This file is part of DelegativeSim.
// DelegativeSim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// DelegativeSim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with DelegativeSim.  If not, see <https://www.gnu.org/licenses/>.

//! The description of an experiment : lists of values for every parameter, every
//! combination of which is simulated. Stored as JSON.

use std::fmt::{Display, Formatter};
use std::fs::File;
use std::path::Path;
use anyhow::anyhow;
use serde::{Serialize,Deserialize};
use delegative::delegation::{DefaultWeighting, DelegativeAggregator};
use delegative::election_rules::{ElectionOutcome, ElectionRule};
use delegative::frd::{DelegationStyle, FluidRepresentativeDemocracy};
use delegative::profile::{IntensityDistribution, ProfileParameters, RepresentationsNeeded};
use delegative::rd::RepresentativeDemocracy;

fn half() -> Vec<f64> { vec![0.5] }
fn no_value<T>() -> Vec<Option<T>> { vec![None] }
fn yes() -> bool { true }

#[derive(Serialize,Deserialize,Clone,Debug,PartialEq)]
pub struct ProfileParameterLists {
    pub n_voters : Vec<usize>,
    pub n_cands : Vec<usize>,
    pub n_issues : Vec<usize>,
    #[serde(default="half")]
    pub voters_p : Vec<f64>,
    #[serde(default="half")]
    pub cands_p : Vec<f64>,
    /// null means no limit other than the number of candidates.
    #[serde(default="no_value")]
    pub app_k : Vec<Option<usize>>,
    #[serde(default="half")]
    pub app_thresh : Vec<f64>,
    /// null means every voter uses voters_p.
    #[serde(default="no_value")]
    pub intensity : Vec<Option<IntensityDistribution>>,
}

#[derive(Serialize,Deserialize,Clone,Debug,PartialEq)]
pub struct ElectionParameterLists {
    pub rules : Vec<ElectionRule>,
    pub n_reps : Vec<usize>,
}

#[derive(Serialize,Deserialize,Clone,Debug,PartialEq)]
pub struct DelegationParameterLists {
    pub default_style : Vec<DefaultWeighting>,
    /// null means representative democracy, with no delegation.
    #[serde(default="no_value")]
    pub delegation_style : Vec<Option<DelegationStyle>>,
    /// only used for fluid representative democracy.
    #[serde(default)]
    pub n_delegators : Vec<usize>,
}

#[derive(Serialize,Deserialize,Clone,Debug,PartialEq)]
pub struct ExperimentDefinition {
    /// Number of times to repeat every combination, each with a fresh profile.
    pub n_iter : usize,
    pub profile : ProfileParameterLists,
    pub election : ElectionParameterLists,
    pub delegation : DelegationParameterLists,
    /// Elect once per rule and number of representatives, and share that between all delegation schemes.
    #[serde(default="yes")]
    pub quick : bool,
}

/// How the representatives' weights are decided.
#[derive(Serialize,Deserialize,Clone,Copy,Debug,PartialEq)]
pub struct AggregationParameters {
    pub default_weighting : DefaultWeighting,
    /// None for representative democracy.
    pub delegation_style : Option<DelegationStyle>,
    pub n_delegators : usize,
}

impl AggregationParameters {
    /// An aggregator that will do its own election.
    pub fn aggregator(&self,rule:ElectionRule,n_reps:usize) -> Box<dyn DelegativeAggregator> {
        match self.delegation_style {
            None => Box::new(RepresentativeDemocracy::new(rule,n_reps,self.default_weighting)),
            Some(style) => Box::new(FluidRepresentativeDemocracy::new(rule,n_reps,self.default_weighting,style,self.n_delegators)),
        }
    }

    /// An aggregator using representatives someone else already elected.
    pub fn aggregator_with_representatives(&self,outcome:ElectionOutcome) -> Box<dyn DelegativeAggregator> {
        match self.delegation_style {
            None => Box::new(RepresentativeDemocracy::with_representatives(outcome,self.default_weighting)),
            Some(style) => Box::new(FluidRepresentativeDemocracy::with_representatives(outcome,self.default_weighting,style,self.n_delegators)),
        }
    }
}

/// Everything specifying one simulated configuration.
#[derive(Serialize,Deserialize,Clone,Debug,PartialEq)]
pub struct TrialParameters {
    pub profile : ProfileParameters,
    pub rule : ElectionRule,
    pub n_reps : usize,
    pub aggregation : AggregationParameters,
}

impl TrialParameters {
    pub const COLUMN_NAMES : [&'static str;13] = ["n_voters","n_cands","n_issues","voters_p","cands_p","app_k","app_thresh","intensity","rule","n_reps","default_style","delegation_style","n_delegators"];

    /// The value of each of COLUMN_NAMES.
    pub fn column_values(&self) -> Vec<String> {
        let p = &self.profile;
        let a = &self.aggregation;
        vec![
            p.n_voters.to_string(),p.n_cands.to_string(),p.n_issues.to_string(),p.voters_p.to_string(),p.cands_p.to_string(),p.app_k.to_string(),p.app_thresh.to_string(),
            p.intensity.map(|i|i.to_string()).unwrap_or_default(),
            self.rule.to_string(),self.n_reps.to_string(),a.default_weighting.to_string(),
            a.delegation_style.map(|s|s.to_string()).unwrap_or_default(),
            a.n_delegators.to_string(),
        ]
    }
}

impl Display for TrialParameters {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let p = &self.profile;
        write!(f,"{}V {}C {}S vp={} cp={} k={} t={}",p.n_voters,p.n_cands,p.n_issues,p.voters_p,p.cands_p,p.app_k,p.app_thresh)?;
        if let Some(intensity) = p.intensity { write!(f," {}",intensity)?; }
        write!(f," {} {}CS {}",self.rule,self.n_reps,self.aggregation.default_weighting)?;
        match self.aggregation.delegation_style {
            None => write!(f," RD"),
            Some(style) => write!(f," {} {}D FRD",style,self.aggregation.n_delegators),
        }
    }
}

/// The combinations to simulate, nested so that everything sharing a profile is together,
/// and within that everything sharing an election.
#[derive(Clone,Debug)]
pub struct Sweep {
    pub needed : RepresentationsNeeded,
    pub quick : bool,
    pub profiles : Vec<ProfileSweep>,
}

#[derive(Clone,Debug)]
pub struct ProfileSweep {
    pub parameters : ProfileParameters,
    pub elections : Vec<ElectionSweep>,
}

#[derive(Clone,Debug)]
pub struct ElectionSweep {
    pub rule : ElectionRule,
    pub n_reps : usize,
    pub aggregations : Vec<AggregationParameters>,
}

impl Sweep {
    /// Every configuration, in the order results for them are produced.
    pub fn trials(&self) -> Vec<TrialParameters> {
        let mut res = vec![];
        for profile in &self.profiles {
            for election in &profile.elections {
                for &aggregation in &election.aggregations {
                    res.push(TrialParameters{ profile: profile.parameters.clone(), rule: election.rule, n_reps: election.n_reps, aggregation });
                }
            }
        }
        res
    }

    pub fn num_trials(&self) -> usize {
        self.profiles.iter().flat_map(|p|p.elections.iter()).map(|e|e.aggregations.len()).sum()
    }
}

impl ExperimentDefinition {
    pub fn load(path:&Path) -> anyhow::Result<Self> {
        let file = File::open(path).map_err(|e|anyhow!("Could not open experiment definition {} : {}",path.display(),e))?;
        Ok(serde_json::from_reader(file)?)
    }

    /// Check the lists are all non-empty and every profile combination is valid.
    pub fn validate(&self) -> anyhow::Result<()> {
        let p = &self.profile;
        let lengths = [("n_voters",p.n_voters.len()),("n_cands",p.n_cands.len()),("n_issues",p.n_issues.len()),("voters_p",p.voters_p.len()),("cands_p",p.cands_p.len()),("app_k",p.app_k.len()),("app_thresh",p.app_thresh.len()),("intensity",p.intensity.len()),
            ("rules",self.election.rules.len()),("n_reps",self.election.n_reps.len()),("default_style",self.delegation.default_style.len()),("delegation_style",self.delegation.delegation_style.len())];
        for (name,len) in lengths {
            if len==0 { return Err(anyhow!("Parameter list {} is empty",name)); }
        }
        if self.delegation.delegation_style.iter().any(|s|s.is_some()) && self.delegation.n_delegators.is_empty() {
            return Err(anyhow!("n_delegators is needed for fluid representative democracy"));
        }
        for parameters in self.profile_parameters() { parameters.validate()?; }
        Ok(())
    }

    /// The Cartesian product of the profile lists.
    pub fn profile_parameters(&self) -> Vec<ProfileParameters> {
        let p = &self.profile;
        let mut res = vec![];
        for &n_voters in &p.n_voters {
            for &n_cands in &p.n_cands {
                for &n_issues in &p.n_issues {
                    for &voters_p in &p.voters_p {
                        for &cands_p in &p.cands_p {
                            for &app_k in &p.app_k {
                                for &app_thresh in &p.app_thresh {
                                    for &intensity in &p.intensity {
                                        res.push(ProfileParameters{ n_voters, n_cands, n_issues, voters_p, cands_p, app_k: app_k.unwrap_or(n_cands), app_thresh, intensity });
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
        res
    }

    /// The Cartesian product of the delegation lists. Representative democracy ignores n_delegators, so appears once per default style.
    pub fn aggregation_parameters(&self) -> Vec<AggregationParameters> {
        let d = &self.delegation;
        let mut res = vec![];
        for &default_weighting in &d.default_style {
            for &delegation_style in &d.delegation_style {
                match delegation_style {
                    None => res.push(AggregationParameters{ default_weighting, delegation_style, n_delegators: 0 }),
                    Some(_) => for &n_delegators in &d.n_delegators {
                        res.push(AggregationParameters{ default_weighting, delegation_style, n_delegators });
                    }
                }
            }
        }
        res
    }

    /// Everything to simulate. Combinations that make no sense, electing more representatives
    /// than there are candidates or having more delegators than voters, are left out.
    pub fn sweep(&self) -> Sweep {
        let aggregations = self.aggregation_parameters();
        let mut profiles = vec![];
        for parameters in self.profile_parameters() {
            let mut elections = vec![];
            for &rule in &self.election.rules {
                for &n_reps in &self.election.n_reps {
                    if n_reps>parameters.n_cands {
                        tracing::debug!("Skipping {} {} representatives from {} candidates",rule,n_reps,parameters.n_cands);
                        continue;
                    }
                    let usable : Vec<AggregationParameters> = aggregations.iter().filter(|a|a.delegation_style.is_none() || a.n_delegators<=parameters.n_voters).copied().collect();
                    if !usable.is_empty() { elections.push(ElectionSweep{ rule, n_reps, aggregations: usable }); }
                }
            }
            if !elections.is_empty() { profiles.push(ProfileSweep{ parameters, elections }); }
        }
        Sweep{ needed: RepresentationsNeeded::for_rules(&self.election.rules), quick: self.quick, profiles }
    }

    /// The names of the parameters given more than one value.
    pub fn varied_parameters(&self) -> Vec<&'static str> {
        let p = &self.profile;
        let d = &self.delegation;
        let counts = [p.n_voters.len(),p.n_cands.len(),p.n_issues.len(),p.voters_p.len(),p.cands_p.len(),p.app_k.len(),p.app_thresh.len(),p.intensity.len(),
            self.election.rules.len(),self.election.n_reps.len(),d.default_style.len(),d.delegation_style.len(),d.n_delegators.len()];
        TrialParameters::COLUMN_NAMES.iter().zip(counts).filter(|(_,count)|*count>1).map(|(name,_)|*name).collect()
    }
}
