// BgpCast: AS-level BGP route propagation simulator written in Rust
// Copyright (C) 2023 Tibor Schneider <sctibor@ethz.ch>
//
// This program is free software; you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation; either version 2 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License along
// with this program; if not, write to the Free Software Foundation, Inc.,
// 51 Franklin Street, Fifth Floor, Boston, MA 02110-1301 USA.

use std::path::PathBuf;

use clap::Parser;
use log::*;

use bgpcast::prelude::*;

/// Simulate BGP route propagation over an AS-level topology: load the
/// relationships and the seed announcements, run the valley-free three-phase
/// sweep, and export every AS's local RIB as CSV.
#[derive(Debug, Parser)]
struct Cli {
    /// AS relationships file (CAIDA serial-2 format).
    #[clap(long)]
    relationships: PathBuf,
    /// Seed announcements CSV file (origin_asn,prefix,rov_invalid).
    #[clap(long)]
    announcements: PathBuf,
    /// File listing one ROV-deploying ASN per line.
    #[clap(long)]
    rov_asns: Option<PathBuf>,
    /// Output CSV file for the computed RIBs.
    #[clap(long, default_value = "ribs.csv")]
    output: PathBuf,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let args = Cli::parse();

    let mut graph = load_topology(&args.relationships)?;
    graph.validate_acyclic()?;

    if let Some(path) = &args.rov_asns {
        let asns = load_rov_asns(path)?;
        graph.load_rov_set(asns);
    }

    graph.assign_ranks();
    load_seeds(&mut graph, &args.announcements)?;

    let total = graph.propagate();
    if graph.rov_asn_count() > 0 {
        info!(
            "route origin validation dropped {} announcements",
            graph.dropped_total()
        );
    }

    export_rib_to_file(&graph, &args.output)?;
    info!("{} RIB entries written to {}", total, args.output.display());
    Ok(())
}
