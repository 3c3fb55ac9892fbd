// Copyright 2026 the DelegativeSim authors.
// This file is part of DelegativeSim.
// DelegativeSim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// DelegativeSim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with DelegativeSim.  If not, see <https://www.gnu.org/licenses/>.

//! Sorting where exactly equal values are put in a random order.
//!
//! A stable sort would put tied values in index order, which systematically favours
//! low numbered candidates. Instead every value is given a tiebreaker drawn from a
//! lottery, and values are sorted by (value,tiebreaker). The lottery can be drawn fresh
//! each time, or drawn once and passed in to several sorts so they all agree on how to
//! resolve ties.
//!
//! This underlies approval truncation, preference orders, and the final choice between
//! equally scored candidates in every election rule.

use std::cmp::Ordering;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Serialize,Deserialize};
use crate::error::ConfigurationError;

/// What sort of lottery to draw.
#[derive(Clone,Copy,Debug,PartialEq,Eq,Serialize,Deserialize)]
pub enum TiebreakerKind {
    /// A random permutation of 0..n. Never itself tied.
    Permutation,
    /// Independent uniform numbers in [0,1).
    Continuous,
}

/// A lottery used to break ties, one entry per value being sorted.
#[derive(Clone,Debug,PartialEq)]
pub enum Tiebreakers {
    Permutation(Vec<usize>),
    Continuous(Vec<f64>),
}

/// A single tiebreaker value as reported in a [SortedEntry].
#[derive(Clone,Copy,Debug,PartialEq)]
pub enum Tiebreak {
    Rank(usize),
    Key(f64),
}

impl Tiebreakers {
    /// Draw a fresh lottery for `len` values.
    pub fn create<R:Rng + ?Sized>(kind:TiebreakerKind,len:usize,rng:&mut R) -> Self {
        match kind {
            TiebreakerKind::Permutation => {
                let mut permutation : Vec<usize> = (0..len).collect();
                permutation.shuffle(rng);
                Tiebreakers::Permutation(permutation)
            }
            TiebreakerKind::Continuous => Tiebreakers::Continuous((0..len).map(|_|rng.random::<f64>()).collect()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Tiebreakers::Permutation(p) => p.len(),
            Tiebreakers::Continuous(k) => k.len(),
        }
    }

    pub fn is_empty(&self) -> bool { self.len()==0 }

    pub fn get(&self,index:usize) -> Tiebreak {
        match self {
            Tiebreakers::Permutation(p) => Tiebreak::Rank(p[index]),
            Tiebreakers::Continuous(k) => Tiebreak::Key(k[index]),
        }
    }

    fn compare(&self,a:usize,b:usize) -> Ordering {
        match self {
            Tiebreakers::Permutation(p) => p[a].cmp(&p[b]),
            Tiebreakers::Continuous(k) => k[a].total_cmp(&k[b]),
        }
    }
}

/// Values that can be sorted with a total order. Floats use IEEE total ordering.
pub trait SortableValue : Copy {
    fn total_order(&self,other:&Self) -> Ordering;
}

impl SortableValue for f64 {
    fn total_order(&self, other: &Self) -> Ordering { self.total_cmp(other) }
}
impl SortableValue for usize {
    fn total_order(&self, other: &Self) -> Ordering { self.cmp(other) }
}
impl SortableValue for u32 {
    fn total_order(&self, other: &Self) -> Ordering { self.cmp(other) }
}

/// One row of the output of a sort : the value, the tiebreaker it was given, and where it was in the input.
#[derive(Clone,Copy,Debug,PartialEq)]
pub struct SortedEntry<V> {
    pub value : V,
    pub tiebreaker : Tiebreak,
    pub index : usize,
}

/// Indices of values, sorted low to high by (value,tiebreaker). Assumes equal lengths.
fn sorted_indices<V:SortableValue>(values:&[V],tiebreakers:&Tiebreakers) -> Vec<usize> {
    let mut order : Vec<usize> = (0..values.len()).collect();
    // the final index comparison only matters for the measure zero case of identical continuous keys.
    order.sort_by(|&a,&b|values[a].total_order(&values[b]).then_with(||tiebreakers.compare(a,b)).then_with(||a.cmp(&b)));
    order
}

/// Sort values low to high, resolving exactly equal values by the supplied lottery.
///
/// Supplying the same tiebreakers gives the same answer every time.
/// ```
/// use delegative::tie_break::{sort_with_tiebreakers, Tiebreakers, Tiebreak};
/// let tiebreakers = Tiebreakers::Permutation(vec![0,2,1]);
/// let sorted = sort_with_tiebreakers(&[0usize,2,1],&tiebreakers).unwrap();
/// assert_eq!(sorted.iter().map(|e|e.value).collect::<Vec<_>>(),vec![0,1,2]);
/// assert_eq!(sorted.iter().map(|e|e.index).collect::<Vec<_>>(),vec![0,2,1]);
/// assert_eq!(sorted[1].tiebreaker,Tiebreak::Rank(1));
/// // ties go in lottery order, not index order.
/// let sorted = sort_with_tiebreakers(&[5usize,5,5],&tiebreakers).unwrap();
/// assert_eq!(sorted.iter().map(|e|e.index).collect::<Vec<_>>(),vec![0,2,1]);
/// ```
pub fn sort_with_tiebreakers<V:SortableValue>(values:&[V],tiebreakers:&Tiebreakers) -> Result<Vec<SortedEntry<V>>,ConfigurationError> {
    if tiebreakers.len()!=values.len() { return Err(ConfigurationError::TiebreakerLength { expected: values.len(), got: tiebreakers.len() }); }
    Ok(sorted_indices(values,tiebreakers).into_iter().map(|index|SortedEntry{ value: values[index], tiebreaker: tiebreakers.get(index), index }).collect())
}

/// Sort values low to high, resolving exactly equal values by a freshly drawn lottery.
pub fn sort_with_random_tiebreak<V:SortableValue,R:Rng + ?Sized>(values:&[V],kind:TiebreakerKind,rng:&mut R) -> Vec<SortedEntry<V>> {
    let tiebreakers = Tiebreakers::create(kind,values.len(),rng);
    sorted_indices(values,&tiebreakers).into_iter().map(|index|SortedEntry{ value: values[index], tiebreaker: tiebreakers.get(index), index }).collect()
}

/// The indices of the `n` smallest values, smallest first, ties resolved randomly.
pub fn lowest_n<V:SortableValue,R:Rng + ?Sized>(values:&[V],n:usize,rng:&mut R) -> Vec<usize> {
    let tiebreakers = Tiebreakers::create(TiebreakerKind::Permutation,values.len(),rng);
    let mut order = sorted_indices(values,&tiebreakers);
    order.truncate(n);
    order
}

/// The indices of the `n` largest values, largest first, ties resolved randomly.
pub fn highest_n<V:SortableValue,R:Rng + ?Sized>(values:&[V],n:usize,rng:&mut R) -> Vec<usize> {
    let tiebreakers = Tiebreakers::create(TiebreakerKind::Permutation,values.len(),rng);
    let order = sorted_indices(values,&tiebreakers);
    order.into_iter().rev().take(n).collect()
}
