// Copyright 2026 the DelegativeSim authors.
// This file is part of DelegativeSim.
// DelegativeSim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// DelegativeSim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with DelegativeSim.  If not, see <https://www.gnu.org/licenses/>.

use crate::error::ConfigurationError;
use crate::ids::CandidateIndex;

/// Scale non-negative values so they sum to one.
///
/// If they are all zero, either leave them alone (`keep_zeros`) or
/// spread the unit evenly over all of them.
/// ```
/// use delegative::util::normalize;
/// assert_eq!(normalize(&[1.0,2.0,3.0,4.0],true),vec![0.1,0.2,0.3,0.4]);
/// assert_eq!(normalize(&[0.0,0.0,0.0,0.0],true),vec![0.0;4]);
/// assert_eq!(normalize(&[0.0,0.0,0.0,0.0],false),vec![0.25;4]);
/// ```
pub fn normalize(values:&[f64],keep_zeros:bool) -> Vec<f64> {
    let total : f64 = values.iter().sum();
    if total==0.0 {
        if keep_zeros || values.is_empty() { values.to_vec() }
        else { vec![1.0/values.len() as f64;values.len()] }
    } else {
        values.iter().map(|v|v/total).collect()
    }
}

/// Normalize each row independently, leaving all zero rows as zero.
pub fn normalize_rows(rows:&[Vec<f64>]) -> Vec<Vec<f64>> {
    rows.iter().map(|row|normalize(row,true)).collect()
}

/// Convert a set of candidates into an indicator array of length num_candidates.
/// ```
/// use delegative::ids::CandidateIndex;
/// use delegative::util::subset_to_indicator;
/// assert_eq!(subset_to_indicator(&[CandidateIndex(1),CandidateIndex(3)],4),vec![false,true,false,true]);
/// ```
pub fn subset_to_indicator(subset:&[CandidateIndex],num_candidates:usize) -> Vec<bool> {
    let mut res = vec![false;num_candidates];
    for c in subset {
        if c.0<num_candidates { res[c.0]=true; }
    }
    res
}

/// Check every row of a matrix has the expected width.
pub fn check_rectangular<T>(rows:&[Vec<T>],width:usize) -> Result<(),ConfigurationError> {
    for (row,values) in rows.iter().enumerate() {
        if values.len()!=width { return Err(ConfigurationError::RaggedMatrix { row, expected: width, got: values.len() }); }
    }
    Ok(())
}

/// Fraction of positions where two equal length binary outcomes agree. Empty outcomes agree completely.
pub fn fraction_agreeing(outcome:&[bool],reference:&[bool]) -> f64 {
    if outcome.is_empty() { return 1.0; }
    let same = outcome.iter().zip(reference.iter()).filter(|(a,b)|a==b).count();
    same as f64/outcome.len() as f64
}
