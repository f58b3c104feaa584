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

//! Per-AS routing policy, owning the local RIB and the staging area.

use std::collections::{hash_map, hash_map::Entry, HashMap};

use super::Announcement;
use crate::types::{Asn, Prefix};

/// Local RIB and staging area shared by both policy variants.
#[derive(Debug, Clone, Default)]
pub struct RibState {
    /// Best route per prefix.
    rib: HashMap<Prefix, Announcement>,
    /// Candidates received during the current phase step, resolved in batch.
    staged: HashMap<Prefix, Vec<Announcement>>,
}

impl RibState {
    fn stage(&mut self, ann: Announcement) {
        self.staged.entry(ann.prefix).or_default().push(ann);
    }

    fn process(&mut self, self_asn: Asn) -> bool {
        let mut changed = false;
        for (prefix, candidates) in &self.staged {
            let best = match candidates
                .iter()
                .reduce(|best, cand| if cand.is_better_than(best) { cand } else { best })
            {
                Some(best) => best,
                None => continue,
            };
            // The receiver's ASN enters the path only on commit.
            let mut stored = best.clone();
            stored.as_path.insert(0, self_asn);
            match self.rib.entry(*prefix) {
                Entry::Vacant(e) => {
                    e.insert(stored);
                    changed = true;
                }
                Entry::Occupied(mut e) => {
                    if stored.is_better_than(e.get()) {
                        e.insert(stored);
                        changed = true;
                    }
                }
            }
        }
        changed
    }
}

/// The routing policy of a single AS.
///
/// Both variants stage incoming announcements per prefix and resolve them in
/// batch into the local RIB. They differ only in [`Policy::receive`]: the ROV
/// variant drops announcements flagged as invalid before they ever reach the
/// staging area, so an ROV-deploying AS neither installs nor re-exports them.
#[derive(Debug, Clone)]
pub enum Policy {
    /// Standard BGP: every announcement is staged.
    Standard(RibState),
    /// Route origin validation: invalid announcements are dropped on receive.
    Rov {
        /// RIB and staging state, identical to the standard variant.
        state: RibState,
        /// Number of announcements dropped for being flagged invalid.
        dropped: usize,
    },
}

impl Policy {
    /// Create a standard BGP policy with an empty RIB.
    pub fn standard() -> Self {
        Self::Standard(RibState::default())
    }

    /// Create an ROV policy with an empty RIB.
    pub fn rov() -> Self {
        Self::Rov {
            state: RibState::default(),
            dropped: 0,
        }
    }

    /// Returns `true` if this policy performs route origin validation.
    pub fn is_rov(&self) -> bool {
        matches!(self, Self::Rov { .. })
    }

    fn state(&self) -> &RibState {
        match self {
            Self::Standard(state) => state,
            Self::Rov { state, .. } => state,
        }
    }

    fn state_mut(&mut self) -> &mut RibState {
        match self {
            Self::Standard(state) => state,
            Self::Rov { state, .. } => state,
        }
    }

    /// Enqueue an announcement into the staging area. The ROV variant drops
    /// invalid announcements here and counts them instead.
    pub fn receive(&mut self, ann: Announcement) {
        match self {
            Self::Standard(state) => state.stage(ann),
            Self::Rov { state, dropped } => {
                if ann.rov_invalid {
                    *dropped += 1;
                } else {
                    state.stage(ann);
                }
            }
        }
    }

    /// Resolve the staging area: for every staged prefix, select the best
    /// candidate, prepend `self_asn` to its path, and install it if the RIB
    /// has no entry for the prefix or the candidate is strictly better than
    /// the incumbent. Returns whether any RIB entry changed.
    pub fn process(&mut self, self_asn: Asn) -> bool {
        self.state_mut().process(self_asn)
    }

    /// Empty the staging area. Called after every `process` step.
    pub fn clear_staging(&mut self) {
        self.state_mut().staged.clear();
    }

    /// Install an announcement directly into the RIB, bypassing selection.
    /// Only used to seed origin ASes; the announcement must already carry the
    /// origin in its path.
    pub fn seed(&mut self, ann: Announcement) {
        self.state_mut().rib.insert(ann.prefix, ann);
    }

    /// The current RIB entry for `prefix`, if any.
    pub fn get(&self, prefix: &Prefix) -> Option<&Announcement> {
        self.state().rib.get(prefix)
    }

    /// Iterate over all RIB entries.
    pub fn local_rib(&self) -> hash_map::Iter<'_, Prefix, Announcement> {
        self.state().rib.iter()
    }

    /// The number of RIB entries.
    pub fn rib_len(&self) -> usize {
        self.state().rib.len()
    }

    /// The number of prefixes with staged candidates.
    pub fn staged_len(&self) -> usize {
        self.state().staged.len()
    }

    /// The number of announcements dropped by route origin validation. Always
    /// zero for the standard variant.
    pub fn dropped_count(&self) -> usize {
        match self {
            Self::Standard(_) => 0,
            Self::Rov { dropped, .. } => *dropped,
        }
    }
}
