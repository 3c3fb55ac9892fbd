// Copyright 2026 the DelegativeSim authors.
// This file is part of DelegativeSim.
// DelegativeSim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// DelegativeSim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with DelegativeSim.  If not, see <https://www.gnu.org/licenses/>.

//! The election rules used to choose representatives from the candidates.
//!
//! Each rule gives every candidate a score, and the winners are the highest scoring
//! candidates, equal scores resolved by a random lottery rather than candidate number.

use std::fmt::{Display, Formatter};
use std::str::FromStr;
use rand::Rng;
use serde::{Serialize,Deserialize};
use crate::error::ConfigurationError;
use crate::ids::CandidateIndex;
use crate::profile::{Profile, RepresentationsNeeded};
use crate::random_util::sample_without_replacement;
use crate::tie_break::highest_n;

#[derive(Copy,Clone,Debug,PartialEq,Eq,Hash,Serialize,Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElectionRule {
    /// Number of voters ranking the candidate first.
    Plurality,
    /// Sum over voters of (n_cands-1-rank).
    Borda,
    /// Number of voters approving the candidate.
    MaxApproval,
    /// Sum over voters of 1-distance.
    MaxAgreement,
    /// Reweighted approval voting. Sequential, each voter's approval is worth 1/(1+number of their approved candidates already elected).
    Rav,
    /// Uniformly random, ignoring preferences.
    RandomWinners,
}

impl ElectionRule {
    pub const ALL : [ElectionRule;6] = [ElectionRule::Plurality,ElectionRule::Borda,ElectionRule::MaxApproval,ElectionRule::MaxAgreement,ElectionRule::Rav,ElectionRule::RandomWinners];

    pub fn name(&self) -> &'static str {
        match self {
            ElectionRule::Plurality => "plurality",
            ElectionRule::Borda => "borda",
            ElectionRule::MaxApproval => "max_approval",
            ElectionRule::MaxAgreement => "max_agreement",
            ElectionRule::Rav => "rav",
            ElectionRule::RandomWinners => "random_winners",
        }
    }

    /// What a profile needs to have derived before this rule can be run.
    pub fn representations_needed(&self) -> RepresentationsNeeded {
        match self {
            ElectionRule::Plurality | ElectionRule::Borda => RepresentationsNeeded{ orders: true, ..Default::default() },
            ElectionRule::MaxApproval | ElectionRule::Rav => RepresentationsNeeded{ approvals: true, ..Default::default() },
            ElectionRule::MaxAgreement => RepresentationsNeeded{ agreements: true, ..Default::default() },
            ElectionRule::RandomWinners => RepresentationsNeeded::default(),
        }
    }

    /// Elect n_winners candidates. Any views of the profile the rule needs are derived if not already present.
    pub fn elect<R:Rng + ?Sized>(&self,profile:&mut Profile,n_winners:usize,rng:&mut R) -> Result<ElectionOutcome,ConfigurationError> {
        let n_cands = profile.n_candidates();
        if n_winners>n_cands { return Err(ConfigurationError::TooManyWinners { requested: n_winners, available: n_cands }); }
        let (winners,scores) = match self {
            ElectionRule::Plurality => positional_scoring_rule(profile.ensure_orders(rng),&plurality_score_vector(n_cands),n_winners,rng)?,
            ElectionRule::Borda => positional_scoring_rule(profile.ensure_orders(rng),&borda_score_vector(n_cands),n_winners,rng)?,
            ElectionRule::MaxApproval => {
                let scores = approval_counts(profile.ensure_approvals(rng),n_cands);
                (select_winners(&scores,n_winners,rng),scores)
            }
            ElectionRule::MaxAgreement => {
                let scores = agreement_sums(profile.ensure_agreements(),n_cands);
                (select_winners(&scores,n_winners,rng),scores)
            }
            ElectionRule::Rav => {
                let approvals = profile.ensure_approvals(rng);
                let scores = approval_counts(approvals,n_cands);
                (rav(approvals,n_cands,n_winners,rng),scores)
            }
            ElectionRule::RandomWinners => random_winners(n_cands,n_winners,rng)?,
        };
        tracing::debug!("{} elected {:?}",self,winners);
        Ok(ElectionOutcome{ rule: *self, winners, scores })
    }
}

impl FromStr for ElectionRule {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ElectionRule::ALL.iter().find(|r|r.name()==s).copied().ok_or_else(||ConfigurationError::UnknownElectionRule(s.to_string()))
    }
}

impl Display for ElectionRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f,"{}",self.name()) }
}

/// Who won, and the score every candidate got.
#[derive(Clone,Debug,PartialEq,Serialize,Deserialize)]
pub struct ElectionOutcome {
    pub rule : ElectionRule,
    /// Best first, except for random winners which are in candidate order.
    pub winners : Vec<CandidateIndex>,
    /// One per candidate. For rav, the plain approval counts. For random winners, all 1.
    pub scores : Vec<f64>,
}

impl ElectionOutcome {
    pub fn score(&self,candidate:CandidateIndex) -> f64 { self.scores[candidate.0] }
    pub fn is_winner(&self,candidate:CandidateIndex) -> bool { self.winners.contains(&candidate) }
}

/// The top n_winners by score, best first, equal scores resolved randomly.
pub fn select_winners<R:Rng + ?Sized>(scores:&[f64],n_winners:usize,rng:&mut R) -> Vec<CandidateIndex> {
    highest_n(scores,n_winners,rng).into_iter().map(CandidateIndex).collect()
}

/// 1 point for first place, nothing else.
pub fn plurality_score_vector(n_cands:usize) -> Vec<f64> {
    (0..n_cands).map(|rank|if rank==0 {1.0} else {0.0}).collect()
}

/// n_cands-1 points for first place, down to 0 for last.
pub fn borda_score_vector(n_cands:usize) -> Vec<f64> {
    (0..n_cands).map(|rank|(n_cands-1-rank) as f64).collect()
}

/// Give each candidate score_vector[rank] from each voter, where orders[voter][rank] is the candidate.
pub fn score_orders(orders:&[Vec<CandidateIndex>],score_vector:&[f64],n_cands:usize) -> Result<Vec<f64>,ConfigurationError> {
    if score_vector.len()!=n_cands { return Err(ConfigurationError::ScoreVectorLength { expected: n_cands, got: score_vector.len() }); }
    let mut scores = vec![0.0;n_cands];
    for order in orders {
        for (rank,candidate) in order.iter().enumerate() {
            scores[candidate.0]+=score_vector[rank];
        }
    }
    Ok(scores)
}

/// A positional scoring rule such as plurality or Borda.
pub fn positional_scoring_rule<R:Rng + ?Sized>(orders:&[Vec<CandidateIndex>],score_vector:&[f64],n_winners:usize,rng:&mut R) -> Result<(Vec<CandidateIndex>,Vec<f64>),ConfigurationError> {
    let scores = score_orders(orders,score_vector,score_vector.len())?;
    Ok((select_winners(&scores,n_winners,rng),scores))
}

pub fn approval_counts(approvals:&[Vec<CandidateIndex>],n_cands:usize) -> Vec<f64> {
    let mut counts = vec![0.0;n_cands];
    for approved in approvals {
        for c in approved { counts[c.0]+=1.0; }
    }
    counts
}

pub fn agreement_sums(agreements:&[Vec<f64>],n_cands:usize) -> Vec<f64> {
    let mut sums = vec![0.0;n_cands];
    for row in agreements {
        for (c,a) in row.iter().enumerate() { sums[c]+=a; }
    }
    sums
}

/// Reweighted approval voting.
///
/// Each round, every unelected candidate scores the sum over voters approving them of
/// 1/(1+number of candidates that voter approves who are already elected). A voter
/// whose approved candidates are all elected contributes to no one. The highest scorer
/// is elected, ties resolved randomly, until n_winners are elected. Always returns
/// exactly min(n_winners,n_cands) distinct candidates, even if no one approves anyone.
pub fn rav<R:Rng + ?Sized>(approvals:&[Vec<CandidateIndex>],n_cands:usize,n_winners:usize,rng:&mut R) -> Vec<CandidateIndex> {
    let n_winners = n_winners.min(n_cands);
    let mut elected = vec![false;n_cands];
    let mut elected_approved_by_voter = vec![0usize;approvals.len()];
    let mut result = Vec::with_capacity(n_winners);
    while result.len()<n_winners {
        let mut scores = vec![0.0;n_cands];
        for (voter,approved) in approvals.iter().enumerate() {
            let value = 1.0/(1+elected_approved_by_voter[voter]) as f64;
            for c in approved {
                if !elected[c.0] { scores[c.0]+=value; }
            }
        }
        let remaining : Vec<usize> = (0..n_cands).filter(|&c|!elected[c]).collect();
        let remaining_scores : Vec<f64> = remaining.iter().map(|&c|scores[c]).collect();
        let Some(&best) = highest_n(&remaining_scores,1,rng).first() else { break; };
        let winner = remaining[best];
        elected[winner]=true;
        for (voter,approved) in approvals.iter().enumerate() {
            if approved.contains(&CandidateIndex(winner)) { elected_approved_by_voter[voter]+=1; }
        }
        result.push(CandidateIndex(winner));
    }
    result
}

/// Uniformly random winners, with a constant (uninformative) score vector.
pub fn random_winners<R:Rng + ?Sized>(n_cands:usize,n_winners:usize,rng:&mut R) -> Result<(Vec<CandidateIndex>,Vec<f64>),ConfigurationError> {
    if n_winners>n_cands { return Err(ConfigurationError::TooManyWinners { requested: n_winners, available: n_cands }); }
    let winners = sample_without_replacement(n_cands,n_winners,rng).into_iter().map(CandidateIndex).collect();
    Ok((winners,vec![1.0;n_cands]))
}
