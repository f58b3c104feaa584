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

use std::collections::HashSet;

use maplit::hashset;
use pretty_assertions::assert_eq;

use super::{p, t1};
use crate::bgp::RelationshipType;
use crate::graph::{AsGraph, RelationKind};
use crate::types::{Asn, GraphError, NodeId};

fn asns(graph: &AsGraph, ids: &[NodeId]) -> HashSet<u32> {
    ids.iter().map(|&id| graph.asn_of(id).unwrap().0).collect()
}

#[test]
fn relationships_are_symmetric() {
    let graph = t1();
    assert_eq!(graph.node_count(), 4);
    assert_eq!(graph.provider_customer_edges(), 3);
    assert_eq!(graph.peer_edges(), 1);
    assert_eq!(graph.edge_count(), 4);

    let as1 = graph.get(Asn(1)).unwrap();
    let as2 = graph.get(Asn(2)).unwrap();
    let as4 = graph.get(Asn(4)).unwrap();
    assert_eq!(asns(&graph, as1.customers()), hashset! {2, 4});
    assert!(as1.providers().is_empty());
    assert_eq!(asns(&graph, as2.providers()), hashset! {1});
    assert_eq!(asns(&graph, as2.customers()), hashset! {3});
    assert_eq!(asns(&graph, as2.peers()), hashset! {4});
    assert_eq!(asns(&graph, as4.peers()), hashset! {2});
}

#[test]
fn provider_kind_mirrors_customer_kind() {
    let mut graph = AsGraph::new();
    graph.add_relationship(Asn(1), Asn(2), RelationKind::Provider);
    let as1 = graph.get(Asn(1)).unwrap();
    let as2 = graph.get(Asn(2)).unwrap();
    assert_eq!(asns(&graph, as1.providers()), hashset! {2});
    assert_eq!(asns(&graph, as2.customers()), hashset! {1});
}

#[test]
fn duplicate_relationships_are_admitted() {
    let mut graph = AsGraph::new();
    graph.add_relationship(Asn(1), Asn(2), RelationKind::Customer);
    graph.add_relationship(Asn(1), Asn(2), RelationKind::Customer);
    graph.add_relationship(Asn(1), Asn(2), RelationKind::Peer);
    assert_eq!(graph.node_count(), 2);
    assert_eq!(graph.provider_customer_edges(), 2);
    assert_eq!(graph.peer_edges(), 1);
    assert_eq!(graph.get(Asn(1)).unwrap().customers().len(), 2);
    assert_eq!(graph.get(Asn(2)).unwrap().providers().len(), 2);
    assert!(graph.validate_acyclic().is_ok());
    graph.assign_ranks();
    assert_eq!(graph.get(Asn(1)).unwrap().rank(), 1);
}

#[test]
fn provider_cycle_is_rejected() {
    let mut graph = AsGraph::new();
    graph.add_relationship(Asn(1), Asn(2), RelationKind::Customer);
    graph.add_relationship(Asn(2), Asn(3), RelationKind::Customer);
    graph.add_relationship(Asn(3), Asn(1), RelationKind::Customer);
    assert_eq!(graph.validate_acyclic(), Err(GraphError::CyclicTopology));
}

#[test]
fn self_loop_is_a_cycle() {
    let mut graph = AsGraph::new();
    graph.add_relationship(Asn(1), Asn(1), RelationKind::Customer);
    assert_eq!(graph.validate_acyclic(), Err(GraphError::CyclicTopology));
}

#[test]
fn mutual_providers_are_a_cycle() {
    let mut graph = AsGraph::new();
    graph.add_relationship(Asn(1), Asn(2), RelationKind::Customer);
    graph.add_relationship(Asn(2), Asn(1), RelationKind::Customer);
    assert_eq!(graph.validate_acyclic(), Err(GraphError::CyclicTopology));
}

#[test]
fn peer_loops_are_not_cycles() {
    let mut graph = AsGraph::new();
    graph.add_relationship(Asn(1), Asn(2), RelationKind::Peer);
    graph.add_relationship(Asn(2), Asn(3), RelationKind::Peer);
    graph.add_relationship(Asn(3), Asn(1), RelationKind::Peer);
    assert!(graph.validate_acyclic().is_ok());
}

#[test]
fn ranks_partition_the_reference_topology() {
    let graph = t1();
    assert_eq!(graph.get(Asn(3)).unwrap().rank(), 0);
    assert_eq!(graph.get(Asn(4)).unwrap().rank(), 0);
    assert_eq!(graph.get(Asn(2)).unwrap().rank(), 1);
    assert_eq!(graph.get(Asn(1)).unwrap().rank(), 2);

    let ranked = graph.ranked();
    assert_eq!(ranked.len(), 3);
    assert_eq!(asns(&graph, &ranked[0]), hashset! {3, 4});
    assert_eq!(asns(&graph, &ranked[1]), hashset! {2});
    assert_eq!(asns(&graph, &ranked[2]), hashset! {1});
}

#[test]
fn rank_is_one_more_than_the_highest_customer() {
    // diamond: AS1 is provider of both AS2 and AS3, AS2 is provider of AS3
    let mut graph = AsGraph::new();
    graph.add_relationship(Asn(1), Asn(2), RelationKind::Customer);
    graph.add_relationship(Asn(2), Asn(3), RelationKind::Customer);
    graph.add_relationship(Asn(1), Asn(3), RelationKind::Customer);
    graph.validate_acyclic().unwrap();
    graph.assign_ranks();
    assert_eq!(graph.get(Asn(3)).unwrap().rank(), 0);
    assert_eq!(graph.get(Asn(2)).unwrap().rank(), 1);
    assert_eq!(graph.get(Asn(1)).unwrap().rank(), 2);
}

#[test]
fn seeding_installs_the_origin_announcement() {
    let mut graph = t1();
    graph.seed_announcement(Asn(3), p("10.0.0.0/8"), false).unwrap();
    let route = graph.get(Asn(3)).unwrap().policy().get(&p("10.0.0.0/8")).unwrap();
    assert_eq!(route.as_path, vec![Asn(3)]);
    assert_eq!(route.next_hop_asn, Asn(3));
    assert_eq!(route.received_from, RelationshipType::Origin);
    assert!(!route.rov_invalid);
}

#[test]
fn seeding_an_unknown_origin_fails() {
    let mut graph = t1();
    assert_eq!(
        graph.seed_announcement(Asn(99), p("10.0.0.0/8"), false),
        Err(GraphError::UnknownAs(Asn(99)))
    );
}

#[test]
fn rov_overlay_replaces_policies() {
    let mut graph = t1();
    let upgraded = graph.load_rov_set([Asn(2), Asn(99)]);
    assert_eq!(upgraded, 1);
    assert_eq!(graph.rov_asn_count(), 2);
    assert!(graph.get(Asn(2)).unwrap().policy().is_rov());
    assert!(!graph.get(Asn(1)).unwrap().policy().is_rov());
    assert!(!graph.get(Asn(3)).unwrap().policy().is_rov());
}

#[test]
fn rov_promotion_discards_prior_rib_state() {
    let mut graph = t1();
    graph.seed_announcement(Asn(2), p("10.0.0.0/8"), false).unwrap();
    graph.load_rov_set([Asn(2)]);
    assert_eq!(graph.get(Asn(2)).unwrap().policy().rib_len(), 0);
}
