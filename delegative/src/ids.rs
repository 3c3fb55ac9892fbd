// Copyright 2026 the DelegativeSim authors.
// This file is part of DelegativeSim.
// DelegativeSim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// DelegativeSim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with DelegativeSim.  If not, see <https://www.gnu.org/licenses/>.

//! Indices for the participants in a simulated election.

use serde::{Serialize,Deserialize};
use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// a candidate, referred to by position in the candidate preference matrix, 0 being first
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,Serialize,Deserialize)]
pub struct CandidateIndex(pub usize);
// type alias really, don't want long display
impl fmt::Display for CandidateIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.0) }
}
// type alias really, don't want long display
impl fmt::Debug for CandidateIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "#{}", self.0) }
}
impl FromStr for CandidateIndex {
    type Err = ParseIntError;
    fn from_str(s: &str) -> Result<Self, Self::Err> { Ok(CandidateIndex(s.parse()?)) }
}

/// a voter, referred to by row in the voter preference matrix.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,Serialize,Deserialize)]
pub struct VoterIndex(pub usize);
impl fmt::Display for VoterIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.0) }
}
impl fmt::Debug for VoterIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "V{}", self.0) }
}

/// a binary issue, referred to by column in the preference matrices.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,Serialize,Deserialize)]
pub struct IssueIndex(pub usize);
impl fmt::Display for IssueIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "{}", self.0) }
}
impl fmt::Debug for IssueIndex {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result { write!(f, "I{}", self.0) }
}
