// SPDX-License-Identifier: MIT OR Apache-2.0

//! Regions: maximal 4-connected sets of intersections sharing one state
//!
//! Regions live in an arena owned by the [`Board`](crate::Board); every
//! intersection refers to its region by [`RegionId`]. Merges and splits
//! rewrite arena entries in place.

use crate::Stone;
use serde::{Deserialize, Serialize};

/// Index of a region in the board's arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RegionId(pub(crate) u32);

/// A chain of stones or a contiguous empty area
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub(crate) stone: Stone,
    /// Point indices in board order of insertion; never empty
    pub(crate) members: Vec<usize>,
    /// Distinct empty neighbors; always 0 for empty regions
    pub(crate) liberties: usize,
}

impl Region {
    pub(crate) fn new(stone: Stone, members: Vec<usize>) -> Self {
        Self {
            stone,
            members,
            liberties: 0,
        }
    }

    /// Common state of all members
    pub fn stone(&self) -> Stone {
        self.stone
    }

    /// Number of member intersections
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Cached liberty count (stone regions only)
    pub fn liberties(&self) -> usize {
        self.liberties
    }

    /// True for a contiguous empty area
    pub fn is_empty_area(&self) -> bool {
        self.stone.is_empty()
    }
}

/// Slab of regions with slot reuse
#[derive(Debug, Clone, Default)]
pub(crate) struct RegionArena {
    slots: Vec<Option<Region>>,
    free: Vec<u32>,
}

impl RegionArena {
    pub(crate) fn insert(&mut self, region: Region) -> RegionId {
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot as usize] = Some(region);
                RegionId(slot)
            }
            None => {
                self.slots.push(Some(region));
                RegionId(self.slots.len() as u32 - 1)
            }
        }
    }

    pub(crate) fn remove(&mut self, id: RegionId) -> Region {
        let region = self.slots[id.0 as usize]
            .take()
            .expect("region id refers to a freed slot");
        self.free.push(id.0);
        region
    }

    pub(crate) fn get(&self, id: RegionId) -> Option<&Region> {
        self.slots.get(id.0 as usize).and_then(Option::as_ref)
    }

    pub(crate) fn get_mut(&mut self, id: RegionId) -> &mut Region {
        self.slots[id.0 as usize]
            .as_mut()
            .expect("region id refers to a freed slot")
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (RegionId, &Region)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, slot)| slot.as_ref().map(|r| (RegionId(i as u32), r)))
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}

impl std::ops::Index<RegionId> for RegionArena {
    type Output = Region;

    fn index(&self, id: RegionId) -> &Region {
        self.get(id).expect("region id refers to a freed slot")
    }
}
