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

use crate::graph::{AsGraph, RelationKind};
use crate::types::{Asn, Prefix};

/// Reference topology used across the test suite:
///
/// ```text
/// AS1 provider of AS2,  AS2 provider of AS3,
/// AS1 provider of AS4,  AS2 peer of AS4.
/// ```
///
/// Ranks: AS3 = AS4 = 0, AS2 = 1, AS1 = 2.
fn t1() -> AsGraph {
    let mut graph = AsGraph::new();
    graph.add_relationship(Asn(1), Asn(2), RelationKind::Customer);
    graph.add_relationship(Asn(2), Asn(3), RelationKind::Customer);
    graph.add_relationship(Asn(1), Asn(4), RelationKind::Customer);
    graph.add_relationship(Asn(2), Asn(4), RelationKind::Peer);
    graph.validate_acyclic().unwrap();
    graph.assign_ranks();
    graph
}

fn p(s: &str) -> Prefix {
    s.parse().unwrap()
}

/// The selected AS path at `asn` for `prefix`, as plain numbers.
fn rib_path(graph: &AsGraph, asn: u32, prefix: &str) -> Option<Vec<u32>> {
    graph
        .get(Asn(asn))
        .and_then(|node| node.policy().get(&p(prefix)))
        .map(|ann| ann.as_path.iter().map(|asn| asn.0).collect())
}

mod test_graph;
