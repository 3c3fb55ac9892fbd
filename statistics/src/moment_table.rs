// Copyright 2026 the DelegativeSim authors.
// This file is part of DelegativeSim.
// DelegativeSim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// DelegativeSim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with DelegativeSim.  If not, see <https://www.gnu.org/licenses/>.

//! A table with one row per parameter combination, giving the moments of the
//! agreement scores for that combination. Stored as CSV for plotting tools.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use anyhow::anyhow;
use serde::{Serialize,Deserialize};
use crate::moments::FourMoments;

/// The columns after the parameter columns.
pub const MOMENT_COLUMNS : [&str;5] = ["n","mean","variance","skewness","excess_kurtosis"];

#[derive(Debug,Serialize,Deserialize,Clone,PartialEq)]
pub struct MomentRow {
    /// one per parameter name, as displayed.
    pub parameters : Vec<String>,
    pub moments : FourMoments,
}

#[derive(Debug,Serialize,Deserialize,Clone,PartialEq,Default)]
pub struct MomentTable {
    pub parameter_names : Vec<String>,
    pub rows : Vec<MomentRow>,
}

impl MomentTable {
    pub fn new(parameter_names:Vec<String>) -> Self { MomentTable{ parameter_names, rows: vec![] } }

    /// Add a row summarizing the samples. Returns false, adding nothing, if there are no samples.
    pub fn add(&mut self,parameters:Vec<String>,samples:&[f64]) -> anyhow::Result<bool> {
        if parameters.len()!=self.parameter_names.len() { return Err(anyhow!("Row has {} parameters, table has {}",parameters.len(),self.parameter_names.len())); }
        match FourMoments::new(samples) {
            Some(moments) => {
                self.rows.push(MomentRow{ parameters, moments });
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn write_csv<W:Write>(&self,writer:W) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(self.parameter_names.iter().map(|s|s.as_str()).chain(MOMENT_COLUMNS))?;
        fn optional(v:Option<f64>) -> String { v.map(|v|v.to_string()).unwrap_or_default() }
        for row in &self.rows {
            let m = &row.moments;
            let moments = [m.n.to_string(),m.mean.to_string(),m.variance.to_string(),optional(m.skewness),optional(m.excess_kurtosis)];
            wtr.write_record(row.parameters.iter().map(|s|s.as_str()).chain(moments.iter().map(|s|s.as_str())))?;
        }
        wtr.flush()?;
        Ok(())
    }

    pub fn save_csv(&self,path:&Path) -> anyhow::Result<()> {
        self.write_csv(File::create(path)?)
    }

    /// Inverse of write_csv. Empty skewness or kurtosis fields are read as absent.
    pub fn read_csv<R:Read>(reader:R) -> anyhow::Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);
        let headers = rdr.headers()?.clone();
        if headers.len()<MOMENT_COLUMNS.len() { return Err(anyhow!("Moment table has only {} columns",headers.len())); }
        let n_parameters = headers.len()-MOMENT_COLUMNS.len();
        for (found,expected) in headers.iter().skip(n_parameters).zip(MOMENT_COLUMNS) {
            if found!=expected { return Err(anyhow!("Expecting column {} found {}",expected,found)); }
        }
        let mut table = MomentTable::new(headers.iter().take(n_parameters).map(|s|s.to_string()).collect());
        fn optional(field:&str) -> anyhow::Result<Option<f64>> {
            if field.is_empty() { Ok(None) } else { Ok(Some(field.parse()?)) }
        }
        for record in rdr.records() {
            let record = record?;
            let field = |i:usize| record.get(n_parameters+i).ok_or_else(||anyhow!("Short row {:?}",record));
            let moments = FourMoments{
                n: field(0)?.parse()?,
                mean: field(1)?.parse()?,
                variance: field(2)?.parse()?,
                skewness: optional(field(3)?)?,
                excess_kurtosis: optional(field(4)?)?,
            };
            table.rows.push(MomentRow{ parameters: record.iter().take(n_parameters).map(|s|s.to_string()).collect(), moments });
        }
        Ok(table)
    }

    pub fn load_csv(path:&Path) -> anyhow::Result<Self> {
        Self::read_csv(File::open(path)?)
    }
}
