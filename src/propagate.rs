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

//! The three-phase propagation engine.
//!
//! Announcements travel UP the provider hierarchy, then ACROSS peer links in
//! a single simultaneous step, then DOWN to customers. Within every rank step
//! all sends are collected into an outbox first and delivered afterwards, so
//! no sender observes another sender's new RIB state; receivers resolve their
//! staging area once per step, in the batch `process` pass.

use log::*;

use crate::bgp::{Announcement, RelationshipType};
use crate::graph::AsGraph;
use crate::types::NodeId;

impl AsGraph {
    /// Drive a full propagation sweep: UP, ACROSS, DOWN. Seed announcements
    /// must already be installed in their origin ASes' RIBs. Returns the
    /// total number of RIB entries in the graph after the sweep.
    pub fn propagate(&mut self) -> usize {
        self.propagate_up();
        self.propagate_across();
        self.propagate_down();
        let total = self.ases().map(|node| node.policy().rib_len()).sum();
        info!("propagation complete, {} RIB entries", total);
        total
    }

    /// Phase 1: from rank 0 upward, every AS offers its exportable RIB
    /// entries to all its providers; after each rank has sent, the next rank
    /// resolves its staging area. An AS thus sends to its own providers only
    /// once everything its lower-ranked customers could contribute has been
    /// committed.
    fn propagate_up(&mut self) {
        debug!("phase 1: propagating up (to providers)");
        for rank in 0..self.ranked.len() {
            let mut outbox: Vec<(NodeId, Announcement)> = Vec::new();
            for &id in &self.ranked[rank] {
                let node = match self.ases.get(&id) {
                    Some(node) => node,
                    None => continue,
                };
                if node.providers.is_empty() {
                    continue;
                }
                for (_, ann) in node.policy.local_rib() {
                    if !ann.received_from.exportable_upward() {
                        continue;
                    }
                    for &provider in &node.providers {
                        let provider_asn = self.topo[provider];
                        if ann.contains_as(provider_asn) {
                            continue;
                        }
                        outbox.push((
                            provider,
                            ann.copy_with_new_hop(node.asn, RelationshipType::Customer),
                        ));
                    }
                }
            }
            self.deliver(outbox);
            if rank + 1 < self.ranked.len() {
                self.process_rank(rank + 1);
            }
        }
    }

    /// Phase 2: all peer transmissions happen in one simultaneous step, and
    /// every AS resolves its staging area only after all senders have run.
    /// Peer-learned routes therefore travel exactly one peer hop.
    fn propagate_across(&mut self) {
        debug!("phase 2: propagating across (to peers)");
        let mut outbox: Vec<(NodeId, Announcement)> = Vec::new();
        for node in self.ases.values() {
            if node.peers.is_empty() {
                continue;
            }
            for (_, ann) in node.policy.local_rib() {
                if !ann.received_from.exportable_upward() {
                    continue;
                }
                for &peer in &node.peers {
                    let peer_asn = self.topo[peer];
                    if ann.contains_as(peer_asn) {
                        continue;
                    }
                    outbox.push((peer, ann.copy_with_new_hop(node.asn, RelationshipType::Peer)));
                }
            }
        }
        self.deliver(outbox);
        for node in self.ases.values_mut() {
            node.policy.process(node.asn);
            node.policy.clear_staging();
        }
    }

    /// Phase 3: from the top rank downward, every AS offers its entire RIB to
    /// all its customers (customer export is never filtered); after each rank
    /// has sent, the rank below resolves its staging area.
    fn propagate_down(&mut self) {
        debug!("phase 3: propagating down (to customers)");
        for rank in (0..self.ranked.len()).rev() {
            let mut outbox: Vec<(NodeId, Announcement)> = Vec::new();
            for &id in &self.ranked[rank] {
                let node = match self.ases.get(&id) {
                    Some(node) => node,
                    None => continue,
                };
                if node.customers.is_empty() {
                    continue;
                }
                for (_, ann) in node.policy.local_rib() {
                    for &customer in &node.customers {
                        let customer_asn = self.topo[customer];
                        if ann.contains_as(customer_asn) {
                            continue;
                        }
                        outbox.push((
                            customer,
                            ann.copy_with_new_hop(node.asn, RelationshipType::Provider),
                        ));
                    }
                }
            }
            self.deliver(outbox);
            if rank > 0 {
                self.process_rank(rank - 1);
            }
        }
    }

    /// Hand every collected announcement to its receiver's policy.
    fn deliver(&mut self, outbox: Vec<(NodeId, Announcement)>) {
        for (target, ann) in outbox {
            if let Some(node) = self.ases.get_mut(&target) {
                node.policy.receive(ann);
            }
        }
    }

    /// Batch-resolve the staging area of every AS at the given rank.
    fn process_rank(&mut self, rank: usize) {
        for &id in &self.ranked[rank] {
            if let Some(node) = self.ases.get_mut(&id) {
                node.policy.process(node.asn);
                node.policy.clear_staging();
            }
        }
    }
}
