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

//! The AS-level topology: nodes, relationship adjacencies, DAG validation,
//! and propagation-rank assignment.

use std::collections::{HashMap, HashSet, VecDeque};

use log::*;
use petgraph::algo::is_cyclic_directed;
use petgraph::visit::{EdgeFiltered, EdgeRef};

use crate::bgp::{Announcement, Policy};
use crate::types::{AsRelation, Asn, AsTopology, GraphError, NodeId, Prefix};

/// Relationship kind of a topology record, from the perspective of the first
/// AS. This is the vocabulary of the CAIDA serial-2 format, where `-1` means
/// the first AS is the provider, `0` means peering, and `1` means the first
/// AS is the customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// The second AS is a customer of the first.
    Customer,
    /// The two ASes are peers.
    Peer,
    /// The second AS is a provider of the first.
    Provider,
}

/// One AS in the topology.
///
/// Neighbors are referenced by [`NodeId`] into the graph arena; the node never
/// owns its neighbors. The propagation rank is assigned by
/// [`AsGraph::assign_ranks`] and is zero until then.
#[derive(Debug, Clone)]
pub struct AsNode {
    pub(crate) asn: Asn,
    pub(crate) providers: Vec<NodeId>,
    pub(crate) customers: Vec<NodeId>,
    pub(crate) peers: Vec<NodeId>,
    pub(crate) rank: usize,
    pub(crate) policy: Policy,
}

impl AsNode {
    fn new(asn: Asn) -> Self {
        Self {
            asn,
            providers: Vec::new(),
            customers: Vec::new(),
            peers: Vec::new(),
            rank: 0,
            policy: Policy::standard(),
        }
    }

    /// The ASN of this AS.
    pub fn asn(&self) -> Asn {
        self.asn
    }

    /// The providers of this AS.
    pub fn providers(&self) -> &[NodeId] {
        &self.providers
    }

    /// The customers of this AS.
    pub fn customers(&self) -> &[NodeId] {
        &self.customers
    }

    /// The peers of this AS.
    pub fn peers(&self) -> &[NodeId] {
        &self.peers
    }

    /// The propagation rank: strictly larger than the rank of every customer.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// The routing policy of this AS.
    pub fn policy(&self) -> &Policy {
        &self.policy
    }
}

/// The AS relationship graph.
///
/// Nodes live in a stable arena ([`AsTopology`]); all per-AS state, including
/// the adjacency lists and the owned [`Policy`], is kept in [`AsNode`]s keyed
/// by [`NodeId`]. A secondary ASN lookup serves construction. ASes are created
/// on first mention and live as long as the graph.
#[derive(Debug, Clone, Default)]
pub struct AsGraph {
    pub(crate) topo: AsTopology,
    pub(crate) ases: HashMap<NodeId, AsNode>,
    lookup: HashMap<Asn, NodeId>,
    pub(crate) ranked: Vec<Vec<NodeId>>,
    pc_edges: usize,
    peer_edges: usize,
    rov_asns: HashSet<Asn>,
}

impl AsGraph {
    /// Generate an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate an empty graph with preallocated space for `nodes` ASes.
    pub fn with_capacity(nodes: usize) -> Self {
        Self {
            topo: AsTopology::with_capacity(nodes, nodes * 2),
            ases: HashMap::with_capacity(nodes),
            lookup: HashMap::with_capacity(nodes),
            ..Default::default()
        }
    }

    fn get_or_create(&mut self, asn: Asn) -> NodeId {
        match self.lookup.get(&asn) {
            Some(id) => *id,
            None => {
                let id = self.topo.add_node(asn);
                self.ases.insert(id, AsNode::new(asn));
                self.lookup.insert(asn, id);
                id
            }
        }
    }

    /// Record a business relationship between two ASes, creating them on
    /// first mention. Both adjacency directions are updated; duplicate
    /// relationships between the same pair are admitted as parallel edges.
    pub fn add_relationship(&mut self, a: Asn, b: Asn, kind: RelationKind) {
        let a_id = self.get_or_create(a);
        let b_id = self.get_or_create(b);
        match kind {
            RelationKind::Customer => {
                // a is the provider, b the customer
                if let Some(node) = self.ases.get_mut(&a_id) {
                    node.customers.push(b_id);
                }
                if let Some(node) = self.ases.get_mut(&b_id) {
                    node.providers.push(a_id);
                }
                self.topo.add_edge(b_id, a_id, AsRelation::CustomerToProvider);
                self.pc_edges += 1;
            }
            RelationKind::Provider => {
                // a is the customer, b the provider
                if let Some(node) = self.ases.get_mut(&a_id) {
                    node.providers.push(b_id);
                }
                if let Some(node) = self.ases.get_mut(&b_id) {
                    node.customers.push(a_id);
                }
                self.topo.add_edge(a_id, b_id, AsRelation::CustomerToProvider);
                self.pc_edges += 1;
            }
            RelationKind::Peer => {
                if let Some(node) = self.ases.get_mut(&a_id) {
                    node.peers.push(b_id);
                }
                if let Some(node) = self.ases.get_mut(&b_id) {
                    node.peers.push(a_id);
                }
                self.topo.add_edge(a_id, b_id, AsRelation::PeerToPeer);
                self.peer_edges += 1;
            }
        }
    }

    /// Check that the customer-to-provider relation is acyclic. Peer edges do
    /// not participate. Self-loops count as cycles. Returns
    /// [`GraphError::CyclicTopology`] on the first cycle found.
    pub fn validate_acyclic(&self) -> Result<(), GraphError> {
        let provider_edges = EdgeFiltered::from_fn(&self.topo, |e| {
            *e.weight() == AsRelation::CustomerToProvider
        });
        if is_cyclic_directed(&provider_edges) {
            error!("the provider-customer relationships contain a cycle");
            return Err(GraphError::CyclicTopology);
        }
        Ok(())
    }

    /// Assign propagation ranks by Kahn-style topological layering: ASes
    /// without customers get rank 0, and every other AS gets one more than
    /// the maximum rank among its customers. The per-rank buckets drive the
    /// ordering of the propagation sweep.
    ///
    /// Must only be called on a validated graph; see
    /// [`AsGraph::validate_acyclic`].
    pub fn assign_ranks(&mut self) {
        let mut rank: HashMap<NodeId, usize> = HashMap::new();
        let mut pending: HashMap<NodeId, usize> = HashMap::new();
        let mut queue: VecDeque<NodeId> = VecDeque::new();

        for (id, node) in &self.ases {
            if node.customers.is_empty() {
                rank.insert(*id, 0);
                queue.push_back(*id);
            } else {
                pending.insert(*id, node.customers.len());
            }
        }

        let mut max_rank = 0;
        while let Some(id) = queue.pop_front() {
            let current = rank.get(&id).copied().unwrap_or(0);
            let node = match self.ases.get(&id) {
                Some(node) => node,
                None => continue,
            };
            for &provider in &node.providers {
                let remaining = match pending.get_mut(&provider) {
                    Some(remaining) => remaining,
                    // Already drained: a parallel edge to a ranked provider.
                    None => continue,
                };
                let candidate = current + 1;
                let r = rank.entry(provider).or_insert(candidate);
                if candidate > *r {
                    *r = candidate;
                }
                *remaining -= 1;
                if *remaining == 0 {
                    pending.remove(&provider);
                    queue.push_back(provider);
                    max_rank = max_rank.max(rank.get(&provider).copied().unwrap_or(0));
                }
            }
        }

        self.ranked = vec![Vec::new(); max_rank + 1];
        for (id, node) in self.ases.iter_mut() {
            node.rank = rank.get(id).copied().unwrap_or(0);
            self.ranked[node.rank].push(*id);
        }

        debug!("assigned ranks, maximum rank {}", max_rank);
        for (r, bucket) in self.ranked.iter().enumerate() {
            trace!("rank {}: {} ASes", r, bucket.len());
        }
    }

    /// Install a seed announcement in the RIB of its origin AS. The path
    /// consists of the origin alone. Seeding an AS that does not exist in the
    /// topology fails with [`GraphError::UnknownAs`].
    pub fn seed_announcement(
        &mut self,
        origin: Asn,
        prefix: Prefix,
        rov_invalid: bool,
    ) -> Result<(), GraphError> {
        let id = self
            .lookup
            .get(&origin)
            .copied()
            .ok_or(GraphError::UnknownAs(origin))?;
        if rov_invalid {
            debug!("seeding ROV-invalid announcement {} at {}", prefix, origin);
        } else {
            debug!("seeding announcement {} at {}", prefix, origin);
        }
        if let Some(node) = self.ases.get_mut(&id) {
            node.policy.seed(Announcement::origin(prefix, origin, rov_invalid));
        }
        Ok(())
    }

    /// Replace the policy of every listed AS that exists in the topology with
    /// a fresh ROV policy (no prior RIB state is carried over). ASNs that are
    /// not part of the topology are still recorded as known ROV deployers for
    /// statistics. Returns the number of replaced policies.
    pub fn load_rov_set<I>(&mut self, asns: I) -> usize
    where
        I: IntoIterator<Item = Asn>,
    {
        let mut upgraded = 0;
        for asn in asns {
            self.rov_asns.insert(asn);
            if let Some(id) = self.lookup.get(&asn) {
                if let Some(node) = self.ases.get_mut(id) {
                    node.policy = Policy::rov();
                    upgraded += 1;
                }
            }
        }
        info!(
            "deployed ROV on {} of {} known ROV ASes",
            upgraded,
            self.rov_asns.len()
        );
        upgraded
    }

    /// The number of known ROV-deploying ASNs, including those absent from
    /// the topology.
    pub fn rov_asn_count(&self) -> usize {
        self.rov_asns.len()
    }

    /// Total number of announcements dropped by route origin validation
    /// across all ASes.
    pub fn dropped_total(&self) -> usize {
        self.ases.values().map(|n| n.policy.dropped_count()).sum()
    }

    /// The number of ASes in the graph.
    pub fn node_count(&self) -> usize {
        self.ases.len()
    }

    /// The total number of relationships recorded.
    pub fn edge_count(&self) -> usize {
        self.pc_edges + self.peer_edges
    }

    /// The number of provider-customer relationships recorded.
    pub fn provider_customer_edges(&self) -> usize {
        self.pc_edges
    }

    /// The number of peer relationships recorded.
    pub fn peer_edges(&self) -> usize {
        self.peer_edges
    }

    /// Look up an AS by its ASN.
    pub fn get(&self, asn: Asn) -> Option<&AsNode> {
        self.lookup.get(&asn).and_then(|id| self.ases.get(id))
    }

    /// The ASN stored at an arena index, if the index is valid.
    pub fn asn_of(&self, id: NodeId) -> Option<Asn> {
        self.topo.node_weight(id).copied()
    }

    /// Iterate over all ASes, in no particular order.
    pub fn ases(&self) -> impl Iterator<Item = &AsNode> {
        self.ases.values()
    }

    /// The per-rank buckets computed by [`AsGraph::assign_ranks`]: entry `r`
    /// lists every AS of rank `r`.
    pub fn ranked(&self) -> &[Vec<NodeId>] {
        &self.ranked
    }
}
