// Copyright 2026 the DelegativeSim authors.
// This file is part of DelegativeSim.
// DelegativeSim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// DelegativeSim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with DelegativeSim.  If not, see <https://www.gnu.org/licenses/>.


//! RD and FRD aggregation, on hand built profiles and on random ones.


#[cfg(test)]
mod tests {
    use delegative::delegation::{AggregatorStage, DefaultWeighting, DelegativeAggregator};
    use delegative::election_rules::{ElectionOutcome, ElectionRule};
    use delegative::error::{ConfigurationError, SimulationError};
    use delegative::frd::{DelegationStyle, FluidRepresentativeDemocracy};
    use delegative::ids::{CandidateIndex, IssueIndex, VoterIndex};
    use delegative::profile::{Profile, ProfileParameters, RepresentationsNeeded};
    use delegative::rd::RepresentativeDemocracy;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn quick_outcome(winners:&[usize],n_cands:usize) -> ElectionOutcome {
        ElectionOutcome{ rule: ElectionRule::RandomWinners, winners: winners.iter().map(|&c|CandidateIndex(c)).collect(), scores: vec![1.0;n_cands] }
    }

    #[test]
    fn voter_majority_of_small_profile() -> anyhow::Result<()> {
        let voters = vec![vec![true,false],vec![true,false],vec![false,true]];
        let cands = vec![vec![true,true]];
        let mut profile = Profile::from_preferences(ProfileParameters::new(3,1,2),voters,cands)?;
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        assert_eq!(profile.ensure_voter_majority(&mut rng),&[true,false]);
        Ok(())
    }

    #[test]
    fn rd_agrees_completely_when_everyone_agrees() -> anyhow::Result<()> {
        let position = vec![true,false,true,true,false];
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        for rule in ElectionRule::ALL {
            let mut profile = Profile::from_preferences(ProfileParameters::new(4,3,5),vec![position.clone();4],vec![position.clone();3])?;
            let mut rd = RepresentativeDemocracy::new(rule,2,DefaultWeighting::Uniform);
            assert_eq!(rd.run(&mut profile,&mut rng)?,1.0);
            assert_eq!(rd.outcome(),Some(position.as_slice()));
        }
        Ok(())
    }

    #[test]
    fn rd_with_opposite_representatives_never_agrees() -> anyhow::Result<()> {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let mut profile = Profile::from_preferences(ProfileParameters::new(3,2,2),vec![vec![true,true];3],vec![vec![false,false];2])?;
        let mut rd = RepresentativeDemocracy::with_representatives(quick_outcome(&[0,1],2),DefaultWeighting::ElectionScores);
        assert_eq!(rd.run(&mut profile,&mut rng)?,0.0);
        Ok(())
    }

    #[test]
    fn incisive_single_delegator() -> anyhow::Result<()> {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let voters = vec![vec![true,false,true]];
        // nobody elected agrees with the voter on issue 2.
        let cands = vec![vec![true,true,false],vec![false,false,false],vec![true,false,false]];
        let mut profile = Profile::from_preferences(ProfileParameters::new(1,3,3),voters,cands)?;
        // elected out of candidate order, so the lowest candidate id is not the first representative.
        let mut frd = FluidRepresentativeDemocracy::with_representatives(quick_outcome(&[2,0,1],3),DefaultWeighting::Uniform,DelegationStyle::Incisive,1);
        frd.run(&mut profile,&mut rng)?;
        assert_eq!(frd.delegators(),&[VoterIndex(0)]);
        // issue 0 : candidates 2 and 0 agree, 0 is lower.
        assert_eq!(frd.voter_issue_weights(VoterIndex(0),IssueIndex(0)),Some(&[0.0,1.0,0.0][..]));
        // issue 1 : candidates 1 and 2 agree, 1 is lower.
        assert_eq!(frd.voter_issue_weights(VoterIndex(0),IssueIndex(1)),Some(&[0.0,0.0,1.0][..]));
        assert!(frd.voter_issue_weights(VoterIndex(0),IssueIndex(2)).unwrap_or(&[]).iter().all(|w|(w-1.0/3.0).abs()<1e-12));
        assert_eq!(frd.voter_issue_weights(VoterIndex(1),IssueIndex(0)),None);
        assert_eq!(frd.voter_issue_weights(VoterIndex(0),IssueIndex(3)),None);
        assert_eq!(frd.outcome(),Some(&[true,false,false][..]));
        assert!((frd.agreement().unwrap_or(0.0)-2.0/3.0).abs()<1e-12);
        Ok(())
    }

    #[test]
    fn full_delegation_follows_the_delegators() -> anyhow::Result<()> {
        // with everyone delegating incisively, any issue some representative agrees with the single voter on is won.
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let voters = vec![vec![true,false,true,false]];
        let cands = vec![vec![true,true,true,true],vec![false,false,false,false]];
        let mut profile = Profile::from_preferences(ProfileParameters::new(1,2,4),voters,cands)?;
        let mut frd = FluidRepresentativeDemocracy::new(ElectionRule::MaxAgreement,2,DefaultWeighting::Uniform,DelegationStyle::Incisive,1);
        assert_eq!(frd.run(&mut profile,&mut rng)?,1.0);
        Ok(())
    }

    #[test]
    fn per_voter_weights_always_sum_to_one() -> anyhow::Result<()> {
        let mut rng = ChaCha20Rng::seed_from_u64(6);
        for (style,default) in [(DelegationStyle::Incisive,DefaultWeighting::Uniform),(DelegationStyle::BestK(2),DefaultWeighting::ElectionScores),(DelegationStyle::BestK(9),DefaultWeighting::Uniform)] {
            let mut profile = Profile::new_instance(ProfileParameters::new(25,6,8),RepresentationsNeeded::all(),&mut rng)?;
            let mut frd = FluidRepresentativeDemocracy::new(ElectionRule::Borda,4,default,style,10);
            let agreement = frd.run(&mut profile,&mut rng)?;
            assert!((0.0..=1.0).contains(&agreement));
            assert_eq!(frd.delegators().len(),10);
            for voter in 0..25 {
                for issue in 0..8 {
                    let sum : f64 = frd.voter_issue_weights(VoterIndex(voter),IssueIndex(issue)).unwrap_or(&[]).iter().sum();
                    assert!((sum-1.0).abs()<1e-9,"voter {} issue {} sum {}",voter,issue,sum);
                }
            }
            for issue_weights in frd.representative_weights() {
                assert!((issue_weights.iter().sum::<f64>()-25.0).abs()<1e-9);
            }
        }
        Ok(())
    }

    #[test]
    fn quick_mode_shares_one_election() -> anyhow::Result<()> {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let mut profile = Profile::new_instance(ProfileParameters::new(20,5,6),RepresentationsNeeded::all(),&mut rng)?;
        let outcome = ElectionRule::MaxApproval.elect(&mut profile,3,&mut rng)?;
        let mut aggregators : Vec<Box<dyn DelegativeAggregator>> = vec![
            Box::new(RepresentativeDemocracy::with_representatives(outcome.clone(),DefaultWeighting::Uniform)),
            Box::new(FluidRepresentativeDemocracy::with_representatives(outcome.clone(),DefaultWeighting::Uniform,DelegationStyle::Incisive,5)),
            Box::new(FluidRepresentativeDemocracy::with_representatives(outcome,DefaultWeighting::ElectionScores,DelegationStyle::BestK(1),20)),
        ];
        for aggregator in &mut aggregators {
            assert_eq!(aggregator.stage(),AggregatorStage::RepresentativesElected);
            assert!(aggregator.elect_representatives(&mut profile,&mut rng).is_err());
            let agreement = aggregator.run(&mut profile,&mut rng)?;
            assert!((0.0..=1.0).contains(&agreement));
        }
        Ok(())
    }

    #[test]
    fn weights_are_absent_before_they_are_computed() {
        let frd = FluidRepresentativeDemocracy::new(ElectionRule::Borda,2,DefaultWeighting::Uniform,DelegationStyle::Incisive,1);
        assert_eq!(frd.voter_issue_weights(VoterIndex(0),IssueIndex(0)),None);
    }

    #[test]
    fn short_score_vector_is_rejected_in_quick_mode() -> anyhow::Result<()> {
        let mut rng = ChaCha20Rng::seed_from_u64(10);
        let mut profile = Profile::generate(ProfileParameters::new(4,3,2),&mut rng)?;
        let short = ElectionOutcome{ rule: ElectionRule::Borda, winners: vec![CandidateIndex(2)], scores: vec![1.0] };
        let expected = Err(SimulationError::Configuration(ConfigurationError::ScoreVectorLength { expected: 3, got: 1 }));
        let mut rd = RepresentativeDemocracy::with_representatives(short.clone(),DefaultWeighting::ElectionScores);
        assert_eq!(rd.run(&mut profile,&mut rng),expected);
        let mut frd = FluidRepresentativeDemocracy::with_representatives(short,DefaultWeighting::ElectionScores,DelegationStyle::Incisive,1);
        assert_eq!(frd.run(&mut profile,&mut rng),expected);
        Ok(())
    }

    #[test]
    fn unimplemented_weightings_are_reported() -> anyhow::Result<()> {
        let mut rng = ChaCha20Rng::seed_from_u64(8);
        let mut profile = Profile::generate(ProfileParameters::new(5,4,3),&mut rng)?;
        let mut rd = RepresentativeDemocracy::new(ElectionRule::Borda,2,"borda_scores".parse()?);
        assert_eq!(rd.run(&mut profile,&mut rng),Err(SimulationError::UnimplementedScheme("borda_scores".to_string())));
        let mut frd = FluidRepresentativeDemocracy::new(ElectionRule::Rav,2,DefaultWeighting::ApprovalCounts,DelegationStyle::Incisive,1);
        assert_eq!(frd.run(&mut profile,&mut rng),Err(SimulationError::UnimplementedScheme("approval_counts".to_string())));
        assert!("mystery".parse::<DefaultWeighting>().is_err());
        Ok(())
    }

    #[test]
    fn delegation_style_names() -> anyhow::Result<()> {
        assert_eq!(serde_json::to_string(&DelegationStyle::BestK(3))?,"\"best_k:3\"");
        assert_eq!(serde_json::from_str::<DelegationStyle>("\"incisive\"")?,DelegationStyle::Incisive);
        assert_eq!(serde_json::from_str::<Vec<Option<DelegationStyle>>>("[null,\"best_k:2\"]")?,vec![None,Some(DelegationStyle::BestK(2))]);
        assert!(serde_json::from_str::<DelegationStyle>("\"best_k:0\"").is_err());
        assert!(serde_json::from_str::<DelegationStyle>("\"liquid\"").is_err());
        assert_eq!(serde_json::to_string(&DefaultWeighting::ElectionScores)?,"\"election_scores\"");
        Ok(())
    }

    #[test]
    fn same_seed_same_agreement() -> anyhow::Result<()> {
        let run = |seed:u64| -> anyhow::Result<f64> {
            let mut rng = ChaCha20Rng::seed_from_u64(seed);
            let mut profile = Profile::new_instance(ProfileParameters::new(31,7,11),RepresentationsNeeded::all(),&mut rng)?;
            let mut frd = FluidRepresentativeDemocracy::new(ElectionRule::Rav,3,DefaultWeighting::Uniform,DelegationStyle::Incisive,9);
            Ok(frd.run(&mut profile,&mut rng)?)
        };
        assert_eq!(run(9)?,run(9)?);
        Ok(())
    }
}
