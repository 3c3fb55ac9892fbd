// Copyright 2026 the DelegativeSim authors.
// This file is part of DelegativeSim.
// DelegativeSim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// DelegativeSim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with DelegativeSim.  If not, see <https://www.gnu.org/licenses/>.

//! Simulate elections over synthetic binary issue populations, and compare
//! direct majority outcomes with representative (RD) and issue specific
//! delegative (FRD) aggregation.

pub mod ids;
pub mod error;
pub mod util;
pub mod random_util;
pub mod tie_break;
pub mod profile;
pub mod election_rules;
pub mod majority;
pub mod delegation;
pub mod rd;
pub mod frd;
