// Copyright 2026 the DelegativeSim authors.
// This file is part of DelegativeSim.
// DelegativeSim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// DelegativeSim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with DelegativeSim.  If not, see <https://www.gnu.org/licenses/>.


//! Some utility routines using pseudo-random numbers.


use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// The generator each trial owns. Never shared between trials.
pub type TrialRng = ChaCha20Rng;

/// Make the generator for a given iteration of an experiment.
///
/// Each iteration gets its own ChaCha stream, so a trial's randomness depends only
/// on the base seed and the iteration number, not on which thread ran it or when.
/// ```
/// use rand::Rng;
/// use delegative::random_util::trial_rng;
/// let a : u64 = trial_rng(7,3).random();
/// let b : u64 = trial_rng(7,3).random();
/// let c : u64 = trial_rng(7,4).random();
/// assert_eq!(a,b);
/// assert_ne!(a,c);
/// ```
pub fn trial_rng(base_seed:u64,iteration:u64) -> TrialRng {
    let mut rng = ChaCha20Rng::seed_from_u64(base_seed);
    rng.set_stream(iteration);
    rng
}

/// An independent fair coin.
pub fn coin_flip<R:Rng + ?Sized>(rng:&mut R) -> bool {
    rng.random_bool(0.5)
}

/// Make a boolean array of length len such that num_true of them are true.
/// ```
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha20Rng;
/// use delegative::random_util::make_array_with_some_randomly_true;
/// let mut rng = ChaCha20Rng::seed_from_u64(1);
/// let a4_10 = make_array_with_some_randomly_true(10,4,& mut rng);
/// assert_eq!(10,a4_10.len());
/// assert_eq!(4,a4_10.iter().filter(|v|**v).count());
/// let a7_10 = make_array_with_some_randomly_true(10,7,& mut rng);
/// assert_eq!(10,a7_10.len());
/// assert_eq!(7,a7_10.iter().filter(|v|**v).count());
/// ```
pub fn make_array_with_some_randomly_true<R:Rng + ?Sized>(len:usize,num_true:usize,rng:&mut R) -> Vec<bool> {
    let num_true = num_true.min(len);
    let inverse = num_true>len/2;
    let mut res = vec![inverse;len];
    let mut togo = if inverse {len-num_true} else {num_true};
    while togo>0 {
        let pos = rng.random_range(0..len);
        if res[pos]==inverse { res[pos]=!inverse; togo-=1; }
    }
    res
}

/// Choose `amount` distinct values from 0..len, uniformly, in ascending order.
/// The caller must ensure amount<=len.
pub fn sample_without_replacement<R:Rng + ?Sized>(len:usize,amount:usize,rng:&mut R) -> Vec<usize> {
    make_array_with_some_randomly_true(len,amount,rng).into_iter().enumerate().filter(|(_,chosen)|*chosen).map(|(i,_)|i).collect()
}
