// Copyright 2026 the DelegativeSim authors.
// This file is part of DelegativeSim.
// DelegativeSim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// DelegativeSim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with DelegativeSim.  If not, see <https://www.gnu.org/licenses/>.

//! Saving experiment results under an informative, numbered name.

use std::fs::File;
use std::path::{Path, PathBuf};
use serde::Serialize;
use crate::experiment_definition::ExperimentDefinition;
use crate::run_multiple_times::ExperimentResults;

/// One more than the largest number prefixing any file name in the directory, or 1 if there are none.
pub fn number_experiment(dir:&Path) -> anyhow::Result<usize> {
    let mut n = 0;
    if dir.exists() {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() { continue; }
            let name = entry.file_name().to_string_lossy().to_string();
            let prefix : String = name.chars().take_while(|c|c.is_ascii_digit()).collect();
            if let Ok(v) = prefix.parse::<usize>() { n=n.max(v); }
        }
    }
    Ok(n+1)
}

/// Either "_vary{tag}" if there are several values, or "_{value}{tag}".
fn describe<T>(name:&mut String,values:&[T],tag:&str,show:impl Fn(&T)->String) {
    match values {
        [single] => { name.push('_'); name.push_str(&show(single)); name.push_str(tag); }
        _ => { name.push_str("_vary"); name.push_str(tag); }
    }
}

fn percent(p:&f64) -> String { ((p*100.0).round() as i64).to_string() }

/// A name like 001_3V_3C_varyS_50VP_50CP_3APPK_50APPT_varyR_1CS_uniformDEF_RD_10iter
pub fn name_experiment(definition:&ExperimentDefinition,number:usize) -> String {
    let mut name = format!("{:03}",number);
    let p = &definition.profile;
    describe(&mut name,&p.n_voters,"V",|v|v.to_string());
    describe(&mut name,&p.n_cands,"C",|v|v.to_string());
    describe(&mut name,&p.n_issues,"S",|v|v.to_string());
    describe(&mut name,&p.voters_p,"VP",percent);
    describe(&mut name,&p.cands_p,"CP",percent);
    describe(&mut name,&p.app_k,"APPK",|k|match k { Some(k) => k.to_string(), None => "all".to_string() });
    describe(&mut name,&p.app_thresh,"APPT",percent);
    if p.intensity.iter().any(|i|i.is_some()) {
        describe(&mut name,&p.intensity,"INT",|i|i.map(|i|i.to_string()).unwrap_or_else(||"none".to_string()));
    }
    describe(&mut name,&definition.election.rules,"R",|r|r.to_string());
    describe(&mut name,&definition.election.n_reps,"CS",|v|v.to_string());
    let d = &definition.delegation;
    describe(&mut name,&d.default_style,"DEF",|v|v.to_string());
    match d.delegation_style.as_slice() {
        [None] => name.push_str("_RD"),
        [Some(style)] => {
            name.push('_'); name.push_str(&style.to_string().replace(':',"")); name.push_str("DEL_FRD");
            describe(&mut name,&d.n_delegators,"ND",|v|v.to_string());
        }
        _ => {
            name.push_str("_varyDEL_FRD");
            describe(&mut name,&d.n_delegators,"ND",|v|v.to_string());
        }
    }
    name.push_str(&format!("_{}iter",definition.n_iter));
    name
}

/// Where results are saved.
pub struct DataDirectory {
    pub dir : PathBuf,
}

impl DataDirectory {
    pub fn new(dir:impl Into<PathBuf>) -> Self { DataDirectory{ dir: dir.into() } }

    pub fn save<T:?Sized + Serialize>(&self,data:&T,file_name:&str) -> anyhow::Result<PathBuf> {
        std::fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(file_name);
        let file = File::create(&path)?;
        serde_json::to_writer(file,data)?;
        tracing::info!("Saved {}",path.display());
        Ok(path)
    }

    /// Save the results under a new experiment name, returning the name.
    pub fn save_results(&self,results:&ExperimentResults) -> anyhow::Result<String> {
        let name = name_experiment(&results.definition,number_experiment(&self.dir)?);
        self.save(results,&(name.clone()+"_data.json"))?;
        Ok(name)
    }

    pub fn load_results(path:&Path) -> anyhow::Result<ExperimentResults> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }
}
