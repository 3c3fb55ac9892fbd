// Copyright 2026 the DelegativeSim authors.
// This file is part of DelegativeSim.
// DelegativeSim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// DelegativeSim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with DelegativeSim.  If not, see <https://www.gnu.org/licenses/>.


//! Profile generation and the views derived from it.


#[cfg(test)]
mod tests {
    use delegative::error::ConfigurationError;
    use delegative::ids::CandidateIndex;
    use delegative::profile::{IntensityDistribution, Profile, ProfileParameters, Representation, RepresentationsNeeded};
    use delegative::election_rules::ElectionRule;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn params(n_voters:usize,n_cands:usize,n_issues:usize,app_k:usize,app_thresh:f64) -> ProfileParameters {
        ProfileParameters{ app_k, app_thresh, ..ProfileParameters::new(n_voters,n_cands,n_issues) }
    }

    #[test]
    fn approvals_respect_k() -> anyhow::Result<()> {
        let mut rng = ChaCha20Rng::seed_from_u64(10);
        for app_k in 0..6 {
            let mut profile = Profile::generate(params(20,5,7,app_k,1.0),&mut rng)?;
            for approved in profile.ensure_approvals(&mut rng) {
                assert_eq!(approved.len(),app_k.min(5));
            }
        }
        Ok(())
    }

    #[test]
    fn zero_threshold_approves_no_one() -> anyhow::Result<()> {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let mut profile = Profile::generate(params(20,5,7,5,0.0),&mut rng)?;
        assert!(profile.ensure_approvals(&mut rng).iter().all(|a|a.is_empty()));
        assert!(profile.ensure_approval_indicators(&mut rng).iter().all(|row|row.iter().all(|&b|!b)));
        Ok(())
    }

    #[test]
    fn full_threshold_and_k_approves_everyone() -> anyhow::Result<()> {
        let mut rng = ChaCha20Rng::seed_from_u64(12);
        let mut profile = Profile::generate(params(20,5,7,9,1.0),&mut rng)?;
        let everyone : Vec<CandidateIndex> = (0..5).map(CandidateIndex).collect();
        for approved in profile.ensure_approvals(&mut rng) { assert_eq!(approved,&everyone); }
        Ok(())
    }

    #[test]
    fn threshold_is_strict_below_one() -> anyhow::Result<()> {
        let voters = vec![vec![true,true]];
        let cands = vec![vec![true,true],vec![true,false],vec![false,false]];
        let mut profile = Profile::from_preferences(params(1,3,2,3,0.5),voters,cands)?;
        let mut rng = ChaCha20Rng::seed_from_u64(13);
        assert_eq!(profile.ensure_approvals(&mut rng)[0],vec![CandidateIndex(0)]);
        Ok(())
    }

    #[test]
    fn orders_are_permutations_by_distance() -> anyhow::Result<()> {
        let mut rng = ChaCha20Rng::seed_from_u64(14);
        let mut profile = Profile::generate(ProfileParameters::new(30,6,9),&mut rng)?;
        let distances = profile.ensure_distances().to_vec();
        let orders = profile.ensure_orders(&mut rng);
        for (voter,order) in orders.iter().enumerate() {
            let mut sorted : Vec<usize> = order.iter().map(|c|c.0).collect();
            sorted.sort();
            assert_eq!(sorted,(0..6).collect::<Vec<_>>());
            for pair in order.windows(2) {
                assert!(distances[voter][pair[0].0]<=distances[voter][pair[1].0]);
            }
        }
        Ok(())
    }

    #[test]
    fn agreements_complement_distances() -> anyhow::Result<()> {
        let voters = vec![vec![true,false,true,true]];
        let cands = vec![vec![true,false,true,true],vec![false,true,false,false],vec![true,true,true,true]];
        let mut profile = Profile::from_preferences(ProfileParameters::new(1,3,4),voters,cands)?;
        assert_eq!(profile.ensure_distances()[0],vec![0.0,1.0,0.25]);
        assert_eq!(profile.ensure_agreements()[0],vec![1.0,0.0,0.75]);
        Ok(())
    }

    #[test]
    fn only_needed_views_are_derived() -> anyhow::Result<()> {
        let mut rng = ChaCha20Rng::seed_from_u64(15);
        let needed = RepresentationsNeeded::for_rules(&[ElectionRule::MaxApproval]);
        let profile = Profile::new_instance(ProfileParameters::new(10,4,5),needed,&mut rng)?;
        assert!(profile.is_derived(Representation::Distances));
        assert!(profile.is_derived(Representation::VoterMajority));
        assert!(profile.is_derived(Representation::Approvals));
        assert!(profile.is_derived(Representation::ApprovalIndicators));
        assert!(!profile.is_derived(Representation::Orders));
        assert!(!profile.is_derived(Representation::Agreements));
        let all = RepresentationsNeeded::for_rules(&ElectionRule::ALL);
        assert_eq!(all,RepresentationsNeeded::all());
        assert_eq!(RepresentationsNeeded::for_rules(&[ElectionRule::RandomWinners]),RepresentationsNeeded::default());
        Ok(())
    }

    #[test]
    fn regenerating_discards_derived_views() -> anyhow::Result<()> {
        let mut rng = ChaCha20Rng::seed_from_u64(16);
        let mut profile = Profile::new_instance(ProfileParameters::new(10,4,5),RepresentationsNeeded::all(),&mut rng)?;
        assert!(profile.is_derived(Representation::Orders));
        profile.regenerate(&mut rng)?;
        for representation in [Representation::Distances,Representation::Approvals,Representation::ApprovalIndicators,Representation::Orders,Representation::Agreements,Representation::VoterMajority] {
            assert!(!profile.is_derived(representation));
        }
        assert_eq!(profile.voter_preferences().len(),10);
        assert_eq!(profile.candidate_preferences().len(),4);
        Ok(())
    }

    #[test]
    fn changing_approval_parameters_only_discards_approvals() -> anyhow::Result<()> {
        let mut rng = ChaCha20Rng::seed_from_u64(17);
        let mut profile = Profile::new_instance(ProfileParameters::new(10,4,5),RepresentationsNeeded::all(),&mut rng)?;
        profile.set_approval_parameters(1,1.0)?;
        assert!(!profile.is_derived(Representation::Approvals));
        assert!(!profile.is_derived(Representation::ApprovalIndicators));
        assert!(profile.is_derived(Representation::Orders));
        assert!(profile.is_derived(Representation::Distances));
        assert!(profile.ensure_approvals(&mut rng).iter().all(|a|a.len()==1));
        assert!(profile.set_approval_parameters(1,1.5).is_err());
        Ok(())
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        let mut rng = ChaCha20Rng::seed_from_u64(18);
        let bad = ProfileParameters{ voters_p: 1.2, ..ProfileParameters::new(3,3,3) };
        assert_eq!(Profile::generate(bad,&mut rng).err(),Some(ConfigurationError::InvalidProbability { parameter: "voters_p", value: 1.2 }));
        let bad = ProfileParameters{ cands_p: -0.1, ..ProfileParameters::new(3,3,3) };
        assert!(Profile::generate(bad,&mut rng).is_err());
        assert_eq!(Profile::generate(ProfileParameters::new(3,0,3),&mut rng).err(),Some(ConfigurationError::EmptyDimension("n_cands")));
        let ragged = Profile::from_preferences(ProfileParameters::new(2,1,2),vec![vec![true,true],vec![true]],vec![vec![false,false]]);
        assert_eq!(ragged.err(),Some(ConfigurationError::RaggedMatrix { row: 1, expected: 2, got: 1 }));
        let short = Profile::from_preferences(ProfileParameters::new(2,1,2),vec![vec![true,true]],vec![vec![false,false]]);
        assert!(short.is_err());
    }

    #[test]
    fn extreme_probabilities_give_constant_preferences() -> anyhow::Result<()> {
        let mut rng = ChaCha20Rng::seed_from_u64(19);
        let profile = Profile::generate(ProfileParameters{ voters_p: 1.0, cands_p: 0.0, ..ProfileParameters::new(8,3,4) },&mut rng)?;
        assert!(profile.voter_preferences().iter().all(|row|row.iter().all(|&b|b)));
        assert!(profile.candidate_preferences().iter().all(|row|row.iter().all(|&b|!b)));
        Ok(())
    }

    #[test]
    fn intensities_are_probabilities() -> anyhow::Result<()> {
        let mut rng = ChaCha20Rng::seed_from_u64(20);
        for intensity in [IntensityDistribution::Uniform,IntensityDistribution::DEFAULT_NORMAL,IntensityDistribution::Normal { mean: 2.0, std_dev: 0.1 }] {
            let profile = Profile::generate(ProfileParameters{ intensity: Some(intensity), ..ProfileParameters::new(50,3,4) },&mut rng)?;
            let intensities = profile.voter_intensities().unwrap_or(&[]);
            assert_eq!(intensities.len(),50);
            assert!(intensities.iter().all(|p|(0.0..=1.0).contains(p)));
        }
        // mean 2 clamps to 1, so every voter takes position 1 on every issue.
        let profile = Profile::generate(ProfileParameters{ intensity: Some(IntensityDistribution::Normal { mean: 2.0, std_dev: 0.1 }), ..ProfileParameters::new(50,3,4) },&mut rng)?;
        assert!(profile.voter_preferences().iter().all(|row|row.iter().all(|&b|b)));
        let bad = ProfileParameters{ intensity: Some(IntensityDistribution::Normal { mean: 0.5, std_dev: -1.0 }), ..ProfileParameters::new(5,3,4) };
        assert!(Profile::generate(bad,&mut rng).is_err());
        assert_eq!("normal".parse::<IntensityDistribution>()?,IntensityDistribution::DEFAULT_NORMAL);
        assert!("cauchy".parse::<IntensityDistribution>().is_err());
        Ok(())
    }

    #[test]
    fn intensity_distribution_names() -> anyhow::Result<()> {
        assert_eq!(serde_json::to_string(&IntensityDistribution::Uniform)?,"\"uniform\"");
        assert_eq!(serde_json::to_string(&IntensityDistribution::DEFAULT_NORMAL)?,r#"{"normal":{"mean":0.5,"std_dev":1.0}}"#);
        let parsed : ProfileParameters = serde_json::from_str(r#"{"n_voters":5,"n_cands":3,"n_issues":4,"voters_p":0.5,"cands_p":0.5,"app_k":3,"app_thresh":0.5,"intensity":{"normal":{"mean":0.2,"std_dev":0.3}}}"#)?;
        assert_eq!(parsed.intensity,Some(IntensityDistribution::Normal { mean: 0.2, std_dev: 0.3 }));
        Ok(())
    }

    #[test]
    fn zero_spread_normal_is_rejected() {
        let mut rng = ChaCha20Rng::seed_from_u64(22);
        let bad = ProfileParameters{ intensity: Some(IntensityDistribution::Normal { mean: 0.5, std_dev: 0.0 }), ..ProfileParameters::new(5,3,4) };
        assert!(matches!(Profile::generate(bad,&mut rng),Err(ConfigurationError::InvalidIntensityDistribution(_))));
    }

    #[test]
    fn same_seed_same_profile() -> anyhow::Result<()> {
        let a = Profile::generate(ProfileParameters::new(10,4,6),&mut ChaCha20Rng::seed_from_u64(21))?;
        let b = Profile::generate(ProfileParameters::new(10,4,6),&mut ChaCha20Rng::seed_from_u64(21))?;
        assert_eq!(a.voter_preferences(),b.voter_preferences());
        assert_eq!(a.candidate_preferences(),b.candidate_preferences());
        Ok(())
    }
}
