// Copyright 2026 the DelegativeSim authors.
// This file is part of DelegativeSim.
// DelegativeSim is free software: you can redistribute it and/or modify it under the terms of the GNU Affero General Public License as published by the Free Software Foundation, either version 3 of the License, or (at your option) any later version.
// DelegativeSim is distributed in the hope that it will be useful, but WITHOUT ANY WARRANTY; without even the implied warranty of MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the GNU Affero General Public License for more details.
// You should have received a copy of the GNU Affero General Public License along with DelegativeSim.  If not, see <https://www.gnu.org/licenses/>.


use clap::{Parser};
use std::path::PathBuf;
use main_app::save_data::DataDirectory;

#[derive(Parser)]
#[clap(version = "0.1", author = "DelegativeSim authors", name="summarize_results")]
/// Compute the table of moments of the agreements from a saved results file
struct Opts {
    /// The results file saved by frd_simulate
    #[clap(value_parser)]
    results : PathBuf,

    /// Where to write the CSV moment table. Defaults to the results file with extension .csv
    #[clap(long)]
    out : Option<PathBuf>,

    /// Print the moment table as JSON to stdout as well.
    #[clap(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    main_app::init_logging();
    let opt : Opts = Opts::parse();
    let results = DataDirectory::load_results(&opt.results)?;
    tracing::info!("Loaded {} configurations from {} iterations",results.results.len(),results.iterations_completed);
    let table = results.moment_table()?;
    let out = opt.out.unwrap_or_else(||opt.results.with_extension("csv"));
    table.save_csv(&out)?;
    tracing::info!("Saved {}",out.display());
    if opt.json { println!("{}",serde_json::to_string(&table)?) }
    Ok(())
}
