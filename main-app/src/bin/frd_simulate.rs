// Copyright 2026 the DelegativeSim authors.
// This file is part of DelegativeSim.
// DelegativeSim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// DelegativeSim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with DelegativeSim.  If not, see <https://www.gnu.org/licenses/>.


use clap::{Parser};
use std::path::PathBuf;
use main_app::experiment_definition::ExperimentDefinition;
use main_app::run_multiple_times::ExperimentResults;
use main_app::save_data::DataDirectory;

#[derive(Parser)]
#[clap(version = "0.1", author = "DelegativeSim authors", name="frd_simulate")]
/// Simulate representative and fluid representative democracy over every combination of parameters in an experiment definition
struct Opts {
    /// The JSON experiment definition file
    #[clap(value_parser)]
    definition : PathBuf,

    /// Override the number of iterations in the definition
    #[clap(long)]
    iterations : Option<usize>,

    /// Number of threads to use. Defaults to the number of available processors.
    #[clap(long)]
    threads : Option<usize>,

    /// Base random seed. The same seed and definition give the same results.
    #[clap(long,default_value_t = 1)]
    seed : u64,

    /// Directory to save results into
    #[clap(long,default_value = "data")]
    out : PathBuf,

    /// Print the moment table as JSON rather than human readable text.
    #[clap(long)]
    json: bool,

    /// Don't save anything, just print the summary.
    #[clap(long)]
    no_save: bool,
}

fn main() -> anyhow::Result<()> {
    main_app::init_logging();
    let opt : Opts = Opts::parse();
    let mut definition = ExperimentDefinition::load(&opt.definition)?;
    if let Some(iterations) = opt.iterations { definition.n_iter=iterations; }
    definition.validate()?;
    let threads = opt.threads.unwrap_or_else(||std::thread::available_parallelism().map(|n|n.get()).unwrap_or(1));
    let results = ExperimentResults::new_from_runs_multithreaded(&definition,opt.seed,threads);
    if results.total_failures()>0 { tracing::warn!("{} trials failed",results.total_failures()); }
    let table = results.moment_table()?;
    if !opt.no_save {
        let data_dir = DataDirectory::new(&opt.out);
        let name = data_dir.save_results(&results)?;
        table.save_csv(&data_dir.dir.join(name+"_moments.csv"))?;
    }
    if opt.json { println!("{}",serde_json::to_string(&table)?) }
    else {
        for row in &table.rows {
            let varied : Vec<String> = definition.varied_parameters().iter().filter_map(|name|table.parameter_names.iter().position(|n|n==name).map(|i|format!("{}={}",name,row.parameters[i]))).collect();
            println!("{:<60} n={:<6} mean={:.4} sd={:.4}",varied.join(" "),row.moments.n,row.moments.mean,row.moments.std_dev());
        }
    }
    Ok(())
}
