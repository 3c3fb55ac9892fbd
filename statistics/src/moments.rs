// Copyright 2026 the DelegativeSim authors.
// This file is part of DelegativeSim.
// DelegativeSim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// DelegativeSim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with DelegativeSim.  If not, see <https://www.gnu.org/licenses/>.

use serde::{Serialize,Deserialize};

/// The first four moments of a sample, using the biased (population) estimators.
///
/// Skewness and kurtosis are undefined when every value is the same.
#[derive(Debug,Serialize,Deserialize,Clone,Copy,PartialEq)]
pub struct FourMoments {
    pub n : usize,
    pub mean : f64,
    /// mean squared deviation, dividing by n not n-1.
    pub variance : f64,
    /// third central moment divided by variance^1.5
    pub skewness : Option<f64>,
    /// fourth central moment divided by variance^2, minus 3. So a normal distribution gives 0.
    pub excess_kurtosis : Option<f64>,
}

impl FourMoments {
    /// None if there are no values.
    /// ```
    /// use statistics::moments::FourMoments;
    /// let m = FourMoments::new(&[1.0,2.0,3.0,4.0]).unwrap();
    /// assert_eq!(m.mean,2.5);
    /// assert_eq!(m.variance,1.25);
    /// assert_eq!(m.skewness,Some(0.0));
    /// assert!((m.excess_kurtosis.unwrap()+1.36).abs()<1e-12);
    /// assert_eq!(FourMoments::new(&[0.5,0.5]).unwrap().skewness,None);
    /// assert_eq!(FourMoments::new(&[0.7;7]).unwrap().variance,0.0);
    /// assert!(FourMoments::new(&[]).is_none());
    /// ```
    pub fn new(values:&[f64]) -> Option<Self> {
        if values.is_empty() { return None; }
        let n = values.len();
        let mean = values.iter().sum::<f64>()/n as f64;
        let central = |power:i32| values.iter().map(|v|(v-mean).powi(power)).sum::<f64>()/n as f64;
        // a constant sample has exactly zero variance, whatever rounding the mean picked up.
        let constant = values.iter().all(|v|*v==values[0]);
        let variance = if constant { 0.0 } else { central(2) };
        let (skewness,excess_kurtosis) = if variance>0.0 {
            (Some(central(3)/variance.powf(1.5)),Some(central(4)/(variance*variance)-3.0))
        } else { (None,None) };
        Some(FourMoments{ n, mean, variance, skewness, excess_kurtosis })
    }

    pub fn std_dev(&self) -> f64 { self.variance.sqrt() }
}
