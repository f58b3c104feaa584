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

//! This module contains the definition for prefixes.

use std::{fmt::Display, str::FromStr};

use ipnet::{AddrParseError, IpNet, Ipv4Net, Ipv6Net};
use serde::{de::Error, Deserialize, Serialize};

/// An IPv4 or IPv6 prefix in CIDR notation.
///
/// Equality and hashing include both the address and the prefix length. The
/// address bits beyond the prefix length are kept exactly as parsed; two
/// prefixes with the same length but different host bits are distinct keys.
#[derive(PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Clone, Copy)]
pub struct Prefix(IpNet);

impl Prefix {
    /// The prefix length in bits.
    pub fn prefix_len(&self) -> u8 {
        self.0.prefix_len()
    }

    /// Returns `true` if this is an IPv6 prefix.
    pub fn is_ipv6(&self) -> bool {
        matches!(self.0, IpNet::V6(_))
    }
}

impl FromStr for Prefix {
    type Err = AddrParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IpNet::from_str(s).map(Self)
    }
}

impl Display for Prefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl From<IpNet> for Prefix {
    fn from(value: IpNet) -> Self {
        Self(value)
    }
}

impl From<Ipv4Net> for Prefix {
    fn from(value: Ipv4Net) -> Self {
        Self(IpNet::V4(value))
    }
}

impl From<Ipv6Net> for Prefix {
    fn from(value: Ipv6Net) -> Self {
        Self(IpNet::V6(value))
    }
}

impl From<Prefix> for IpNet {
    fn from(value: Prefix) -> Self {
        value.0
    }
}

impl Serialize for Prefix {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_string())
    }
}

impl<'de> Deserialize<'de> for Prefix {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        IpNet::from_str(&s)
            .map_err(|s| D::Error::custom(format!("Expected IP Network, found {s}")))
            .map(Self)
    }
}
