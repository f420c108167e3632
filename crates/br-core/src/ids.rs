//! Strongly typed node identifier.
//!
//! Node ids come from the storage collaborator, so unlike a dense index they
//! may be sparse.  `NodeId` is `Copy + Ord + Hash` and serializes as a bare
//! integer so it can key JSON maps in route records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a waste-collection node.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node {}", self.0)
    }
}

impl From<u32> for NodeId {
    #[inline]
    fn from(id: u32) -> Self {
        NodeId(id)
    }
}
