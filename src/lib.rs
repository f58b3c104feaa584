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

#![deny(missing_docs, missing_debug_implementations)]

//! # BgpCast
//!
//! This is a library for simulating BGP route propagation over the AS-level
//! topology of the Internet.
//!
//! The topology is a set of AS-to-AS business relationships
//! (customer/provider and peer/peer), loaded into a [`graph::AsGraph`] and
//! validated to form a DAG in the provider direction. Every AS owns a
//! [`bgp::Policy`] with a local RIB; seed [`bgp::Announcement`]s are
//! installed at their origin ASes, and a single deterministic sweep computes
//! what every AS would select under standard BGP preferences
//! (customer > peer > provider, then path length, then lowest next hop) and
//! valley-free export rules. The sweep runs in three phases: announcements
//! travel UP the provider hierarchy in propagation-rank order, then ACROSS
//! all peer links in one simultaneous step, then DOWN to customers. There is
//! no message transport and no timing model; convergence is computed in one
//! batch.
//!
//! Route origin validation is modeled by a per-announcement invalid flag:
//! ASes listed in the ROV deployment set replace their policy with a variant
//! that drops flagged announcements at reception.
//!
//! ## Example usage
//!
//! ```
//! use bgpcast::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut graph = AsGraph::new();
//!     // AS1 is the provider of AS2, which is the provider of AS3.
//!     graph.add_relationship(Asn(1), Asn(2), RelationKind::Customer);
//!     graph.add_relationship(Asn(2), Asn(3), RelationKind::Customer);
//!     graph.validate_acyclic()?;
//!     graph.assign_ranks();
//!
//!     let prefix: Prefix = "10.0.0.0/8".parse()?;
//!     graph.seed_announcement(Asn(3), prefix, false)?;
//!     graph.propagate();
//!
//!     let route = graph.get(Asn(1)).unwrap().policy().get(&prefix).unwrap();
//!     assert_eq!(route.as_path, vec![Asn(1), Asn(2), Asn(3)]);
//!     Ok(())
//! }
//! ```

pub mod bgp;
pub mod graph;
pub mod io;
pub mod prelude;
mod propagate;
pub mod types;

#[cfg(test)]
#[cfg(not(tarpaulin_include))]
mod test;
