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

//! Module containing definitions for BGP announcements and route selection

mod policy;
pub use policy::Policy;

use crate::types::{Asn, Prefix};

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// How an announcement entered the local AS.
///
/// The declaration order is the preference order used by route selection:
/// self-originated routes beat customer routes, which beat peer routes, which
/// beat provider routes. The same tag drives valley-free export filtering.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum RelationshipType {
    /// The local AS originated the announcement itself.
    Origin,
    /// Learned from a customer.
    Customer,
    /// Learned from a peer.
    Peer,
    /// Learned from a provider.
    Provider,
}

impl RelationshipType {
    /// Valley-free export eligibility toward a provider or a peer. Routes
    /// learned from peers or providers must not be exported upward.
    pub fn exportable_upward(&self) -> bool {
        matches!(self, Self::Origin | Self::Customer)
    }
}

impl std::fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Origin => write!(f, "origin"),
            Self::Customer => write!(f, "customer"),
            Self::Peer => write!(f, "peer"),
            Self::Provider => write!(f, "provider"),
        }
    }
}

/// A BGP announcement, as staged for processing or stored in a local RIB.
///
/// `as_path` is ordered most-recent hop first: once an announcement is
/// committed to the RIB of an AS, position 0 holds that AS, and the last
/// element is the origin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    /// The announced prefix.
    pub prefix: Prefix,
    /// AS path, most recent hop first, origin last.
    pub as_path: Vec<Asn>,
    /// The ASN that directly transmitted this copy (the first hop back toward
    /// the origin). For a seeded announcement this is the origin itself.
    pub next_hop_asn: Asn,
    /// How this copy entered the local AS.
    pub received_from: RelationshipType,
    /// Route-origin-validation verdict; carried unchanged while propagating.
    pub rov_invalid: bool,
}

impl Announcement {
    /// Create the announcement an origin AS seeds for its own prefix: the path
    /// contains only the origin, which is also the next hop.
    pub fn origin(prefix: Prefix, origin: Asn, rov_invalid: bool) -> Self {
        Self {
            prefix,
            as_path: vec![origin],
            next_hop_asn: origin,
            received_from: RelationshipType::Origin,
            rov_invalid,
        }
    }

    /// The number of hops in the AS path.
    pub fn path_len(&self) -> usize {
        self.as_path.len()
    }

    /// Returns `true` if `asn` already appears in the AS path (loop
    /// prevention before forwarding).
    pub fn contains_as(&self, asn: Asn) -> bool {
        self.as_path.contains(&asn)
    }

    /// Copy this announcement for transmission: the sender becomes the next
    /// hop and the relationship tag is replaced. The path is copied unchanged;
    /// the receiver prepends its own ASN when committing the copy to its RIB.
    pub fn copy_with_new_hop(&self, sender: Asn, new_rel: RelationshipType) -> Self {
        Self {
            prefix: self.prefix,
            as_path: self.as_path.clone(),
            next_hop_asn: sender,
            received_from: new_rel,
            rov_invalid: self.rov_invalid,
        }
    }

    /// Route selection: returns `true` if `self` is strictly preferred over
    /// `other`. Preference is decided by the relationship tag first, then by
    /// path length, and finally by the smaller next-hop ASN. The ordering is
    /// total; two announcements tie only if all three keys are equal.
    pub fn is_better_than(&self, other: &Self) -> bool {
        match self.received_from.cmp(&other.received_from) {
            Ordering::Less => return true,
            Ordering::Greater => return false,
            Ordering::Equal => {}
        }
        match self.as_path.len().cmp(&other.as_path.len()) {
            Ordering::Less => return true,
            Ordering::Greater => return false,
            Ordering::Equal => {}
        }
        self.next_hop_asn < other.next_hop_asn
    }
}
