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

//! Loaders for the external file formats, and the RIB exporter.
//!
//! All parsers work on [`BufRead`] so they can be driven from in-memory
//! buffers; the `load_*` wrappers open files and turn missing inputs into
//! fatal [`IoError::Open`] diagnostics. Malformed records are skipped, never
//! fatal.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use itertools::Itertools;
use log::*;
use thiserror::Error;

use crate::graph::{AsGraph, RelationKind};
use crate::types::{Asn, Prefix};

/// Errors raised by the file loaders and the exporter.
#[derive(Debug, Error)]
pub enum IoError {
    /// A required input or output file could not be opened.
    #[error("cannot open {path}: {source}")]
    Open {
        /// The offending path.
        path: String,
        /// The underlying I/O error.
        source: io::Error,
    },
    /// Reading or writing failed mid-stream.
    #[error(transparent)]
    Io(#[from] io::Error),
}

fn open(path: &Path) -> Result<BufReader<File>, IoError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| IoError::Open {
            path: path.display().to_string(),
            source,
        })
}

/// Build the AS graph from a CAIDA serial-2 relationship file.
pub fn load_topology(path: impl AsRef<Path>) -> Result<AsGraph, IoError> {
    let path = path.as_ref();
    info!("parsing AS relationships from {}", path.display());
    parse_topology(open(path)?)
}

/// Parse CAIDA serial-2 records: `<ASN1>|<ASN2>|<rel>|<source>`, one per
/// line, where `<rel>` is `-1` (first AS is the provider), `0` (peers), or
/// `1` (first AS is the customer). Blank lines and lines starting with `#`
/// are comments; records with unparseable ASNs or an unknown relationship
/// code are skipped; fields past the third are ignored.
pub fn parse_topology(reader: impl BufRead) -> Result<AsGraph, IoError> {
    // current serial-2 snapshots describe roughly 100k ASes
    let mut graph = AsGraph::with_capacity(120_000);
    let mut parsed = 0usize;
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split('|');
        let as1 = fields.next().and_then(|f| f.trim().parse::<u32>().ok());
        let as2 = fields.next().and_then(|f| f.trim().parse::<u32>().ok());
        let rel = fields.next().map(str::trim);
        let (as1, as2, rel) = match (as1, as2, rel) {
            (Some(as1), Some(as2), Some(rel)) => (as1, as2, rel),
            _ => {
                debug!("skipping malformed relationship record: {}", line);
                continue;
            }
        };
        let kind = match rel {
            "-1" => RelationKind::Customer,
            "0" => RelationKind::Peer,
            "1" => RelationKind::Provider,
            _ => {
                debug!("skipping unknown relationship code: {}", line);
                continue;
            }
        };
        graph.add_relationship(Asn(as1), Asn(as2), kind);
        parsed += 1;
        if parsed % 100_000 == 0 {
            info!("parsed {} relationships", parsed);
        }
    }
    info!(
        "parsed {} relationships: {} ASes, {} provider-customer edges, {} peer edges",
        parsed,
        graph.node_count(),
        graph.provider_customer_edges(),
        graph.peer_edges()
    );
    Ok(graph)
}

/// Load seed announcements into the origin ASes of the graph.
pub fn load_seeds(graph: &mut AsGraph, path: impl AsRef<Path>) -> Result<usize, IoError> {
    let path = path.as_ref();
    info!("loading announcements from {}", path.display());
    parse_seeds(graph, open(path)?)
}

/// Parse seed announcements from CSV lines `<origin_asn>,<prefix>,<rov_invalid>`
/// and install them at their origin ASes. The first line is a header and is
/// discarded. `<rov_invalid>` matches `true` case-insensitively; anything
/// else means valid. Lines with an unparseable origin or prefix, and seeds
/// whose origin is not part of the topology, are reported and skipped.
/// Returns the number of seeded announcements.
pub fn parse_seeds(graph: &mut AsGraph, reader: impl BufRead) -> Result<usize, IoError> {
    let mut lines = reader.lines();
    if let Some(header) = lines.next() {
        header?;
    }
    let mut seeded = 0usize;
    for line in lines {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut fields = line.split(',');
        let origin = fields.next().and_then(|f| f.trim().parse::<u32>().ok());
        let prefix = fields.next().and_then(|f| f.trim().parse::<Prefix>().ok());
        let rov = fields.next().map(str::trim);
        let (origin, prefix, rov) = match (origin, prefix, rov) {
            (Some(origin), Some(prefix), Some(rov)) => (Asn(origin), prefix, rov),
            _ => {
                warn!("skipping malformed seed announcement: {}", line);
                continue;
            }
        };
        let rov_invalid = rov.eq_ignore_ascii_case("true");
        match graph.seed_announcement(origin, prefix, rov_invalid) {
            Ok(()) => seeded += 1,
            Err(e) => warn!("skipping seed announcement for {}: {}", prefix, e),
        }
    }
    info!("seeded {} announcements", seeded);
    Ok(seeded)
}

/// Load the list of ROV-deploying ASNs.
pub fn load_rov_asns(path: impl AsRef<Path>) -> Result<Vec<Asn>, IoError> {
    let path = path.as_ref();
    info!("loading ROV ASNs from {}", path.display());
    parse_rov_asns(open(path)?)
}

/// Parse the ROV deployment list: one decimal ASN per line. Blank lines and
/// lines starting with `#` are comments. ASN 0 is invalid and skipped, as are
/// unparseable lines.
pub fn parse_rov_asns(reader: impl BufRead) -> Result<Vec<Asn>, IoError> {
    let mut asns = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match line.parse::<u32>() {
            Ok(0) | Err(_) => debug!("skipping invalid ROV ASN: {}", line),
            Ok(asn) => asns.push(Asn(asn)),
        }
    }
    Ok(asns)
}

/// Export every AS's local RIB as CSV with the header `asn,prefix,as_path`.
/// Paths are rendered as Python-style tuples, with the trailing comma for
/// single-element paths: `"(1, 2, 3)"` and `"(3,)"`. Rows are sorted by
/// (asn, prefix text) so that equal inputs produce byte-identical files.
/// Returns the number of exported rows.
pub fn export_rib(graph: &AsGraph, mut writer: impl Write) -> Result<usize, IoError> {
    writeln!(writer, "asn,prefix,as_path")?;
    let rows = graph
        .ases()
        .flat_map(|node| {
            node.policy()
                .local_rib()
                .map(move |(prefix, ann)| (node.asn(), prefix.to_string(), ann))
        })
        .sorted_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.cmp(&b.1)));
    let mut count = 0usize;
    for (asn, prefix, ann) in rows {
        let path = ann.as_path.iter().map(|asn| asn.0).join(", ");
        if ann.path_len() == 1 {
            writeln!(writer, "{},{},\"({},)\"", asn.0, prefix, path)?;
        } else {
            writeln!(writer, "{},{},\"({})\"", asn.0, prefix, path)?;
        }
        count += 1;
    }
    Ok(count)
}

/// Export the RIBs of all ASes to a CSV file. See [`export_rib`].
pub fn export_rib_to_file(graph: &AsGraph, path: impl AsRef<Path>) -> Result<usize, IoError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| IoError::Open {
        path: path.display().to_string(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    let count = export_rib(graph, &mut writer)?;
    writer.flush()?;
    info!("exported {} RIB entries to {}", count, path.display());
    Ok(count)
}
