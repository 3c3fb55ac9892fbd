// Copyright 2026 the DelegativeSim authors.
// This file is part of DelegativeSim.
// DelegativeSim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// DelegativeSim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with DelegativeSim.  If not, see <https://www.gnu.org/licenses/>.

//! Majority votes over many binary issues, where rows are agents and columns are issues.
//! Every exact tie is resolved by its own fair coin.

use rand::Rng;
use crate::random_util::coin_flip;

/// Weighted sums within this fraction of the total weight of exactly half are ties.
/// Shares like 1/n_reps do not add up exactly in floating point.
pub const WEIGHT_TIE_TOLERANCE : f64 = 1e-9;

/// Decide one issue given the weight in favour and the total weight.
fn decide<R:Rng + ?Sized>(in_favour:f64,total:f64,rng:&mut R) -> bool {
    let margin = in_favour-total/2.0;
    if margin.abs()<=WEIGHT_TIE_TOLERANCE*total.abs() { coin_flip(rng) }
    else { margin>0.0 }
}

/// Unweighted majority. Each row must have n_issues entries.
pub fn majority<R:Rng + ?Sized>(rows:&[Vec<bool>],n_issues:usize,rng:&mut R) -> Vec<bool> {
    let n_agents = rows.len();
    (0..n_issues).map(|issue|{
        let ones = rows.iter().filter(|row|row[issue]).count();
        // compare 2*ones with n_agents to keep it in integers.
        match (2*ones).cmp(&n_agents) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => coin_flip(rng),
        }
    }).collect()
}

/// Weighted majority with one non-negative weight per row, the same for every issue.
/// An issue passes if the weight in favour exceeds half the total weight.
pub fn weighted_majority<R:Rng + ?Sized>(rows:&[Vec<bool>],weights:&[f64],n_issues:usize,rng:&mut R) -> Vec<bool> {
    let total : f64 = weights.iter().sum();
    (0..n_issues).map(|issue|{
        let in_favour : f64 = rows.iter().zip(weights.iter()).filter(|(row,_)|row[issue]).map(|(_,w)|*w).sum();
        decide(in_favour,total,rng)
    }).collect()
}

/// Weighted majority where the weights differ per issue. issue_weights[issue][row].
pub fn issue_weighted_majority<R:Rng + ?Sized>(rows:&[Vec<bool>],issue_weights:&[Vec<f64>],rng:&mut R) -> Vec<bool> {
    issue_weights.iter().enumerate().map(|(issue,weights)|{
        let total : f64 = weights.iter().sum();
        let in_favour : f64 = rows.iter().zip(weights.iter()).filter(|(row,_)|row[issue]).map(|(_,w)|*w).sum();
        decide(in_favour,total,rng)
    }).collect()
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use super::*;

    #[test]
    fn clear_majorities_are_deterministic() {
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        let rows = vec![vec![true,false],vec![true,false],vec![false,true]];
        for _ in 0..20 { assert_eq!(majority(&rows,2,&mut rng),vec![true,false]); }
    }

    #[test]
    fn ties_go_both_ways() {
        let mut rng = ChaCha20Rng::seed_from_u64(2);
        let rows = vec![vec![true],vec![false]];
        let mut seen = [false;2];
        for _ in 0..100 { seen[majority(&rows,1,&mut rng)[0] as usize]=true; }
        assert!(seen[0] && seen[1]);
    }

    #[test]
    fn weighted_outvotes_unweighted() {
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let rows = vec![vec![true],vec![false],vec![false]];
        assert_eq!(weighted_majority(&rows,&[3.0,1.0,1.0],1,&mut rng),vec![true]);
        assert_eq!(weighted_majority(&rows,&[1.0,1.0,1.0],1,&mut rng),vec![false]);
    }

    #[test]
    fn rounding_does_not_hide_a_tie() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let rows : Vec<Vec<bool>> = (0..6).map(|i|vec![i<3]).collect();
        let sixth = 1.0/6.0;
        let mut seen = [false;2];
        for _ in 0..100 { seen[issue_weighted_majority(&rows,&[vec![sixth;6]],&mut rng)[0] as usize]=true; }
        assert!(seen[0] && seen[1]);
    }
}
