//! Island detection over numeric machine ids.
//!
//! Machines on one island have nearby numbers. Scanning the ids in ascending
//! order, a jump of more than [`ISLAND_GAP`] starts a new island. The first
//! and last machine of an island are corners; everything between is center.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Largest id difference still considered the same island.
pub const ISLAND_GAP: u64 = 5;

/// Position of a machine within its island.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    Corner,
    Center,
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Position::Corner => write!(f, "corner"),
            Position::Center => write!(f, "center"),
        }
    }
}

/// Contiguous run of machine ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Island {
    members: Vec<u64>,
}

impl Island {
    pub fn members(&self) -> &[u64] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Position of the member at `index`.
    pub fn position_at(&self, index: usize) -> Position {
        if index == 0 || index + 1 == self.members.len() {
            Position::Corner
        } else {
            Position::Center
        }
    }

    /// Members paired with their positions, in order.
    pub fn positions(&self) -> impl Iterator<Item = (u64, Position)> + '_ {
        self.members
            .iter()
            .enumerate()
            .map(|(i, id)| (*id, self.position_at(i)))
    }
}

/// Partition machine ids into islands.
///
/// Input is expected ascending and distinct; it is sorted and de-duplicated
/// anyway, so any order yields the same partition.
pub fn detect_islands(ids: &[u64]) -> Vec<Island> {
    let sorted: BTreeSet<u64> = ids.iter().copied().collect();

    let mut islands = Vec::new();
    let mut current: Vec<u64> = Vec::new();
    for id in sorted {
        if let Some(&prev) = current.last() {
            if id - prev > ISLAND_GAP {
                islands.push(Island {
                    members: std::mem::take(&mut current),
                });
            }
        }
        current.push(id);
    }
    if !current.is_empty() {
        islands.push(Island { members: current });
    }
    islands
}

/// Corner/center label for every id across `islands`.
pub fn classify(islands: &[Island]) -> BTreeMap<u64, Position> {
    islands.iter().flat_map(|island| island.positions()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members(islands: &[Island]) -> Vec<Vec<u64>> {
        islands.iter().map(|i| i.members().to_vec()).collect()
    }

    #[test]
    fn splits_on_gaps_over_five() {
        let islands = detect_islands(&[1, 2, 3, 10, 11, 50]);
        assert_eq!(members(&islands), vec![vec![1, 2, 3], vec![10, 11], vec![50]]);
    }

    #[test]
    fn gap_of_exactly_five_stays_together() {
        let islands = detect_islands(&[100, 105, 111]);
        assert_eq!(members(&islands), vec![vec![100, 105], vec![111]]);
    }

    #[test]
    fn empty_input_no_islands() {
        assert!(detect_islands(&[]).is_empty());
    }

    #[test]
    fn unsorted_input_same_partition() {
        assert_eq!(
            detect_islands(&[11, 50, 1, 3, 2, 10, 2]),
            detect_islands(&[1, 2, 3, 10, 11, 50])
        );
    }

    #[test]
    fn corners_and_centers() {
        let islands = detect_islands(&[1, 2, 3, 4, 10, 11, 50]);
        let labels = classify(&islands);
        assert_eq!(labels[&1], Position::Corner);
        assert_eq!(labels[&2], Position::Center);
        assert_eq!(labels[&3], Position::Center);
        assert_eq!(labels[&4], Position::Corner);
        assert_eq!(labels[&10], Position::Corner);
        assert_eq!(labels[&11], Position::Corner);
        assert_eq!(labels[&50], Position::Corner);
    }

    #[test]
    fn island_serializes_as_array() {
        let islands = detect_islands(&[7, 8]);
        assert_eq!(serde_json::to_string(&islands).unwrap(), "[[7,8]]");
    }
}
