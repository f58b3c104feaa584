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

//! Module containing all type definitions

use petgraph::prelude::*;
use petgraph::stable_graph::StableGraph;
use serde::{Deserialize, Serialize};
use thiserror::Error;

mod prefix;
pub use prefix::Prefix;

pub(crate) type IndexType = u32;
/// AS identification (and index into the topology arena)
pub type NodeId = NodeIndex<IndexType>;

/// AS Number
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Asn(pub u32);

impl std::fmt::Display for Asn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "AS{}", self.0)
    }
}

impl From<u32> for Asn {
    fn from(x: u32) -> Self {
        Self(x)
    }
}

impl From<Asn> for u32 {
    fn from(x: Asn) -> Self {
        x.0
    }
}

/// Relationship kind of one stored topology edge.
///
/// Provider-customer relationships are stored as a single directed edge from
/// the customer to the provider, so that the acyclicity requirement of the
/// provider hierarchy is a plain directed-cycle check. Peer relationships are
/// stored as a single edge of arbitrary direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AsRelation {
    /// The edge source pays the edge target for transit.
    CustomerToProvider,
    /// The endpoints exchange traffic settlement-free.
    PeerToPeer,
}

/// The AS-level topology arena: node weights are ASNs, edge weights record the
/// business relationship.
pub type AsTopology = StableGraph<Asn, AsRelation, Directed, IndexType>;

/// Topology errors
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GraphError {
    /// The provider hierarchy is not a DAG.
    #[error("the provider-customer relationships contain a cycle")]
    CyclicTopology,
    /// An operation referenced an AS that does not exist in the graph.
    #[error("{0} does not exist in the topology")]
    UnknownAs(Asn),
}
