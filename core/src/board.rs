// SPDX-License-Identifier: MIT OR Apache-2.0

//! Board representation with incremental region maintenance
//!
//! Every intersection belongs to exactly one [`Region`], including empty
//! ones. Placing a stone splits the surrounding empty region, merges
//! same-colored neighbors, and captures opposing regions whose last
//! liberty was taken. Neighbors are always scanned Left, Right, Up, Down,
//! which fixes the order in which simultaneous captures are reported.

use crate::region::{Region, RegionArena, RegionId};
use crate::{Color, Coordinate, GameError, Stone};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Supported board sizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum BoardSize {
    Seven,
    Nine,
    Eleven,
    Thirteen,
    Fifteen,
    Seventeen,
    #[default]
    Nineteen,
}

impl BoardSize {
    pub const ALL: [BoardSize; 7] = [
        BoardSize::Seven,
        BoardSize::Nine,
        BoardSize::Eleven,
        BoardSize::Thirteen,
        BoardSize::Fifteen,
        BoardSize::Seventeen,
        BoardSize::Nineteen,
    ];

    /// Number of lines in each direction
    pub fn value(self) -> u8 {
        match self {
            BoardSize::Seven => 7,
            BoardSize::Nine => 9,
            BoardSize::Eleven => 11,
            BoardSize::Thirteen => 13,
            BoardSize::Fifteen => 15,
            BoardSize::Seventeen => 17,
            BoardSize::Nineteen => 19,
        }
    }

    /// Number of intersections
    pub fn area(self) -> usize {
        let n = self.value() as usize;
        n * n
    }
}

impl TryFrom<u8> for BoardSize {
    type Error = GameError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        BoardSize::ALL
            .into_iter()
            .find(|size| size.value() == value)
            .ok_or(GameError::UnsupportedBoardSize(value))
    }
}

impl From<BoardSize> for u8 {
    fn from(size: BoardSize) -> Self {
        size.value()
    }
}

impl fmt::Display for BoardSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{0}x{0}", self.value())
    }
}

/// Neighbor relation between intersections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
    /// Next intersection in canonical (row-major, bottom row first) order
    Next,
    /// Previous intersection in canonical order
    Previous,
}

impl Direction {
    /// The four board neighbors in scan order
    pub const ADJACENT: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];
}

/// One grid cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Intersection {
    coordinate: Coordinate,
    stone: Stone,
    region: RegionId,
}

impl Intersection {
    pub fn coordinate(&self) -> Coordinate {
        self.coordinate
    }

    pub fn stone(&self) -> Stone {
        self.stone
    }

    /// Region this intersection currently belongs to
    pub fn region(&self) -> RegionId {
        self.region
    }

    pub fn is_empty(&self) -> bool {
        self.stone.is_empty()
    }
}

/// Represents the Go board with its intersections and regions
#[derive(Debug, Clone)]
pub struct Board {
    size: BoardSize,
    points: Vec<Intersection>,
    regions: RegionArena,
    star_points: Vec<Coordinate>,
}

impl Board {
    /// Create a new empty board: one empty region covering every intersection
    pub fn new(size: BoardSize) -> Self {
        let n = size.value() as usize;
        let area = size.area();
        let mut regions = RegionArena::default();
        let everything = regions.insert(Region::new(Stone::Empty, (0..area).collect()));
        let points = (0..area)
            .map(|i| Intersection {
                coordinate: Coordinate::new((i % n) as u8 + 1, (i / n) as u8 + 1),
                stone: Stone::Empty,
                region: everything,
            })
            .collect();

        Self {
            size,
            points,
            regions,
            star_points: star_points_for(size),
        }
    }

    /// Get the size of the board
    pub fn size(&self) -> BoardSize {
        self.size
    }

    /// Whether the coordinate lies on this board
    pub fn contains(&self, coord: Coordinate) -> bool {
        self.index_of(coord).is_some()
    }

    pub fn intersection_at(&self, coord: Coordinate) -> Result<&Intersection, GameError> {
        self.index_of(coord)
            .map(|idx| &self.points[idx])
            .ok_or(GameError::OutOfBounds)
    }

    pub fn stone_at(&self, coord: Coordinate) -> Result<Stone, GameError> {
        self.intersection_at(coord).map(Intersection::stone)
    }

    /// Adjacent coordinate in `direction`, `None` past the edge
    pub fn neighbor(&self, coord: Coordinate, direction: Direction) -> Option<Coordinate> {
        let idx = self.index_of(coord)?;
        self.neighbor_index(idx, direction)
            .map(|n| self.points[n].coordinate)
    }

    /// On-board neighbors in scan order Left, Right, Up, Down
    pub fn neighbors(&self, coord: Coordinate) -> Vec<Coordinate> {
        match self.index_of(coord) {
            Some(idx) => self
                .adjacent(idx)
                .map(|n| self.points[n].coordinate)
                .collect(),
            None => Vec::new(),
        }
    }

    /// All intersections in canonical order
    pub fn iter(&self) -> impl Iterator<Item = &Intersection> {
        self.points.iter()
    }

    /// Coordinates holding a stone of `color`, in canonical order
    pub fn stones(&self, color: Color) -> Vec<Coordinate> {
        let stone = color.stone();
        self.points
            .iter()
            .filter(|p| p.stone == stone)
            .map(|p| p.coordinate)
            .collect()
    }

    /// Count intersections in the given state
    pub fn count(&self, stone: Stone) -> usize {
        self.points.iter().filter(|p| p.stone == stone).count()
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id)
    }

    pub fn region_at(&self, coord: Coordinate) -> Result<&Region, GameError> {
        self.intersection_at(coord).map(|p| &self.regions[p.region])
    }

    /// Live regions in arena order
    pub fn regions(&self) -> impl Iterator<Item = (RegionId, &Region)> {
        self.regions.iter()
    }

    /// Member coordinates of a region, in canonical order
    pub fn region_coordinates(&self, id: RegionId) -> Vec<Coordinate> {
        let Some(region) = self.regions.get(id) else {
            return Vec::new();
        };
        let mut members = region.members.clone();
        members.sort_unstable();
        members
            .into_iter()
            .map(|m| self.points[m].coordinate)
            .collect()
    }

    /// The chain (or empty area) containing `coord`
    pub fn group_at(&self, coord: Coordinate) -> Vec<Coordinate> {
        match self.index_of(coord) {
            Some(idx) => self.region_coordinates(self.points[idx].region),
            None => Vec::new(),
        }
    }

    /// Liberties of the chain at `coord`; `None` for empty or off-board points
    pub fn liberties_at(&self, coord: Coordinate) -> Option<usize> {
        let point = &self.points[self.index_of(coord)?];
        if point.is_empty() {
            return None;
        }
        Some(self.regions[point.region].liberties)
    }

    pub fn star_points(&self) -> &[Coordinate] {
        &self.star_points
    }

    pub fn is_star_point(&self, coord: Coordinate) -> bool {
        self.star_points.contains(&coord)
    }

    /// Traditional fixed handicap placement for `count` stones.
    ///
    /// Zero yields no stones. The largest handicap a board supports equals
    /// its number of star points.
    pub fn handicap_points(&self, count: u8) -> Result<Vec<Coordinate>, GameError> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let n = self.size.value();
        let near = edge_distance(self.size);
        let (far, mid) = (n + 1 - near, (n + 1) / 2);
        let c = Coordinate::new;
        let corners = [c(far, far), c(near, near), c(far, near), c(near, far)];
        let center = c(mid, mid);
        let (left, right, bottom, top) = (c(near, mid), c(far, mid), c(mid, near), c(mid, far));

        let layout: Vec<Coordinate> = match count {
            2 => corners[..2].to_vec(),
            3 => corners[..3].to_vec(),
            4 => corners.to_vec(),
            5 => [&corners[..], &[center][..]].concat(),
            6 => [&corners[..], &[left, right][..]].concat(),
            7 => [&corners[..], &[left, right, center][..]].concat(),
            8 => [&corners[..], &[left, right, bottom, top][..]].concat(),
            9 => [&corners[..], &[left, right, bottom, top, center][..]].concat(),
            _ => return Err(GameError::InvalidHandicap(count)),
        };

        if layout.iter().all(|p| self.is_star_point(*p)) {
            Ok(layout)
        } else {
            Err(GameError::InvalidHandicap(count))
        }
    }

    /// Outcome of placing `color` at `coord` without touching the board.
    ///
    /// Returns the stones that would be captured, in capture order, or the
    /// reason the placement is impossible. Suicide is decided from cached
    /// liberties: the stone lives if it has an empty neighbor, joins a
    /// friendly chain with another liberty, or captures something.
    pub fn preview_placement(&self, coord: Coordinate, color: Color) -> Result<Vec<Coordinate>, GameError> {
        let idx = self.index_of(coord).ok_or(GameError::OutOfBounds)?;
        if !self.points[idx].is_empty() {
            return Err(GameError::OccupiedIntersection);
        }

        let own = color.stone();
        let mut breathes = false;
        let mut dying: Vec<RegionId> = Vec::new();
        for n in self.adjacent(idx) {
            let point = &self.points[n];
            let region = &self.regions[point.region];
            if point.is_empty() {
                breathes = true;
            } else if point.stone == own {
                breathes |= region.liberties > 1;
            } else if region.liberties == 1 && !dying.contains(&point.region) {
                dying.push(point.region);
            }
        }

        if !breathes && dying.is_empty() {
            return Err(GameError::Suicide);
        }

        Ok(dying
            .into_iter()
            .flat_map(|id| self.region_coordinates(id))
            .collect())
    }

    /// Place a stone and resolve captures. Returns the captured stones.
    ///
    /// A rejected placement leaves the board untouched.
    pub fn place_stone(&mut self, coord: Coordinate, color: Color) -> Result<Vec<Coordinate>, GameError> {
        let expected = self.preview_placement(coord, color)?;
        let idx = self.index_of(coord).ok_or(GameError::OutOfBounds)?;
        let stone = color.stone();
        let opponent = color.opposite().stone();

        // Leave the empty area; it only falls apart if the point bridged
        // two or more empty neighbors.
        let area = self.points[idx].region;
        self.points[idx].stone = stone;
        let empty_neighbors = self
            .adjacent(idx)
            .filter(|&n| self.points[n].is_empty())
            .count();
        self.regions.get_mut(area).members.retain(|&m| m != idx);
        if self.regions[area].members.is_empty() {
            self.regions.remove(area);
        } else if empty_neighbors > 1 {
            self.split_empty_region(area);
        }

        let mut own = self.regions.insert(Region::new(stone, vec![idx]));
        self.points[idx].region = own;
        let neighbors: Vec<usize> = self.adjacent(idx).collect();
        for &n in &neighbors {
            let other = self.points[n].region;
            if self.points[n].stone == stone && other != own {
                own = self.merge_regions(own, other);
            }
        }
        self.recount_liberties(own);

        let mut captured = Vec::new();
        let mut touched: Vec<RegionId> = Vec::new();
        for &n in &neighbors {
            let id = self.points[n].region;
            if self.points[n].stone != opponent || touched.contains(&id) {
                continue;
            }
            touched.push(id);
            let region = self.regions.get_mut(id);
            region.liberties = region.liberties.saturating_sub(1);
            if region.liberties == 0 {
                captured.extend(self.capture(id));
            }
        }

        debug_assert_eq!(captured, expected);
        if !captured.is_empty() {
            tracing::trace!("{} at {} captured {} stone(s)", color, coord, captured.len());
        }
        Ok(captured)
    }

    /// Apply arbitrary stone edits (setup) and rebuild all regions.
    ///
    /// Fails without changing the board if a coordinate is off the board or
    /// the result leaves some chain without liberties.
    pub fn set_stones(&mut self, changes: &[(Coordinate, Stone)]) -> Result<(), GameError> {
        if changes.is_empty() {
            return Ok(());
        }
        let mut next = self.clone();
        for &(coord, stone) in changes {
            let idx = next.index_of(coord).ok_or(GameError::OutOfBounds)?;
            next.points[idx].stone = stone;
        }
        next.rebuild_regions();

        if let Some((_, dead)) = next
            .regions
            .iter()
            .find(|(_, r)| !r.is_empty_area() && r.liberties == 0)
        {
            return Err(GameError::InvalidSetup(next.points[dead.members[0]].coordinate));
        }

        *self = next;
        Ok(())
    }

    /// Check the region and liberty invariants: adjacent equal states share
    /// a region, adjacent differing states do not, every region is one
    /// connected component, and cached liberties match a recount.
    pub fn regions_consistent(&self) -> bool {
        for (i, point) in self.points.iter().enumerate() {
            let Some(region) = self.regions.get(point.region) else {
                return false;
            };
            if region.stone != point.stone || !region.members.contains(&i) {
                return false;
            }
            for n in self.adjacent(i) {
                let other = &self.points[n];
                if (other.stone == point.stone) != (other.region == point.region) {
                    return false;
                }
            }
        }

        self.regions.iter().all(|(id, region)| {
            !region.members.is_empty()
                && region.members.iter().all(|&m| self.points[m].region == id)
                && self.component_size(region.members[0]) == region.members.len()
                && region.liberties == self.count_liberties(id)
        })
    }

    fn index_of(&self, coord: Coordinate) -> Option<usize> {
        let n = self.size.value();
        if coord.x == 0 || coord.y == 0 || coord.x > n || coord.y > n {
            return None;
        }
        Some((coord.y as usize - 1) * n as usize + (coord.x as usize - 1))
    }

    fn neighbor_index(&self, idx: usize, direction: Direction) -> Option<usize> {
        let n = self.size.value() as usize;
        let (x, y) = (idx % n, idx / n);
        match direction {
            Direction::Left => (x > 0).then(|| idx - 1),
            Direction::Right => (x + 1 < n).then(|| idx + 1),
            Direction::Up => (y + 1 < n).then(|| idx + n),
            Direction::Down => (y > 0).then(|| idx - n),
            Direction::Next => (idx + 1 < self.points.len()).then(|| idx + 1),
            Direction::Previous => idx.checked_sub(1),
        }
    }

    fn adjacent(&self, idx: usize) -> impl Iterator<Item = usize> {
        let n = self.size.value() as usize;
        let (x, y) = (idx % n, idx / n);
        [
            (x > 0).then(|| idx - 1),
            (x + 1 < n).then(|| idx + 1),
            (y + 1 < n).then(|| idx + n),
            (y > 0).then(|| idx - n),
        ]
        .into_iter()
        .flatten()
    }

    fn count_liberties(&self, id: RegionId) -> usize {
        let region = &self.regions[id];
        if region.is_empty_area() {
            return 0;
        }
        let mut liberties = HashSet::new();
        for &m in &region.members {
            liberties.extend(self.adjacent(m).filter(|&n| self.points[n].is_empty()));
        }
        liberties.len()
    }

    fn recount_liberties(&mut self, id: RegionId) {
        let liberties = self.count_liberties(id);
        self.regions.get_mut(id).liberties = liberties;
    }

    /// Union two regions of equal state, folding the smaller into the larger
    fn merge_regions(&mut self, a: RegionId, b: RegionId) -> RegionId {
        if a == b {
            return a;
        }
        let (keep, gone) = if self.regions[a].size() >= self.regions[b].size() {
            (a, b)
        } else {
            (b, a)
        };
        let absorbed = self.regions.remove(gone);
        tracing::trace!(into = keep.0, stones = absorbed.size(), "merged regions");
        for &m in &absorbed.members {
            self.points[m].region = keep;
        }
        self.regions.get_mut(keep).members.extend(absorbed.members);
        keep
    }

    /// Re-partition an empty region into its connected pieces
    fn split_empty_region(&mut self, id: RegionId) {
        let members = std::mem::take(&mut self.regions.get_mut(id).members);
        let mut visited: HashSet<usize> = HashSet::with_capacity(members.len());
        let mut pieces = Vec::new();

        for &start in &members {
            if !visited.insert(start) {
                continue;
            }
            let mut piece = Vec::new();
            let mut stack = vec![start];
            while let Some(p) = stack.pop() {
                piece.push(p);
                for n in self.adjacent(p) {
                    if self.points[n].region == id && self.points[n].is_empty() && visited.insert(n) {
                        stack.push(n);
                    }
                }
            }
            pieces.push(piece);
        }

        let mut pieces = pieces.into_iter();
        if let Some(first) = pieces.next() {
            self.regions.get_mut(id).members = first;
        }
        for piece in pieces {
            let new_id = self.regions.insert(Region::new(Stone::Empty, piece.clone()));
            for p in piece {
                self.points[p].region = new_id;
            }
        }
    }

    /// Empty out a region; the freed points join the surrounding empty area
    fn capture(&mut self, id: RegionId) -> Vec<Coordinate> {
        let mut freed = self.regions.remove(id).members;
        freed.sort_unstable();
        for &m in &freed {
            self.points[m].stone = Stone::Empty;
        }

        let mut area = self.regions.insert(Region::new(Stone::Empty, freed.clone()));
        for &m in &freed {
            self.points[m].region = area;
        }

        let mut empty_areas = Vec::new();
        let mut chains = Vec::new();
        for &m in &freed {
            for n in self.adjacent(m) {
                let point = &self.points[n];
                let bucket = if point.is_empty() { &mut empty_areas } else { &mut chains };
                if point.region != area && !bucket.contains(&point.region) {
                    bucket.push(point.region);
                }
            }
        }
        for other in empty_areas {
            area = self.merge_regions(area, other);
        }
        for chain in chains {
            self.recount_liberties(chain);
        }

        freed.iter().map(|&m| self.points[m].coordinate).collect()
    }

    fn rebuild_regions(&mut self) {
        self.regions.clear();
        let mut assigned = vec![false; self.points.len()];
        for start in 0..self.points.len() {
            if assigned[start] {
                continue;
            }
            assigned[start] = true;
            let stone = self.points[start].stone;
            let mut members = Vec::new();
            let mut stack = vec![start];
            while let Some(p) = stack.pop() {
                members.push(p);
                for n in self.adjacent(p) {
                    if !assigned[n] && self.points[n].stone == stone {
                        assigned[n] = true;
                        stack.push(n);
                    }
                }
            }
            let id = self.regions.insert(Region::new(stone, members.clone()));
            for m in members {
                self.points[m].region = id;
            }
        }

        let ids: Vec<RegionId> = self.regions.iter().map(|(id, _)| id).collect();
        for id in ids {
            self.recount_liberties(id);
        }
    }

    fn component_size(&self, start: usize) -> usize {
        let id = self.points[start].region;
        let mut seen = HashSet::from([start]);
        let mut stack = vec![start];
        while let Some(p) = stack.pop() {
            for n in self.adjacent(p) {
                if self.points[n].region == id && seen.insert(n) {
                    stack.push(n);
                }
            }
        }
        seen.len()
    }
}

/// Boards are equal when they have the same size and stone arrangement
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size
            && self
                .points
                .iter()
                .zip(&other.points)
                .all(|(a, b)| a.stone == b.stone)
    }
}

impl Eq for Board {}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.size.value() as usize;
        for row in self.points.chunks(n).rev() {
            for point in row {
                let ch = match point.stone {
                    Stone::Black => 'X',
                    Stone::White => 'O',
                    Stone::Empty => '.',
                };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Line of the corner star points
fn edge_distance(size: BoardSize) -> u8 {
    if size.value() >= 13 {
        4
    } else {
        3
    }
}

fn star_points_for(size: BoardSize) -> Vec<Coordinate> {
    let n = size.value();
    let near = edge_distance(size);
    let far = n + 1 - near;
    let mid = (n + 1) / 2;

    let mut points = vec![(near, near), (far, near), (near, far), (far, far)];
    if n >= 9 {
        points.push((mid, mid));
    }
    if n >= 15 {
        points.extend([(near, mid), (far, mid), (mid, near), (mid, far)]);
    }

    let mut points: Vec<Coordinate> = points
        .into_iter()
        .map(|(x, y)| Coordinate::new(x, y))
        .collect();
    points.sort_by_key(|c| (c.y, c.x));
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(label: &str) -> Coordinate {
        Coordinate::from_label(label).unwrap()
    }

    fn board9() -> Board {
        Board::new(BoardSize::Nine)
    }

    #[test]
    fn new_board_is_one_empty_region() {
        let board = board9();
        assert_eq!(board.regions().count(), 1);
        assert_eq!(board.count(Stone::Empty), 81);
        assert!(board.regions_consistent());
    }

    #[test]
    fn unsupported_sizes() {
        assert_eq!(BoardSize::try_from(13).unwrap(), BoardSize::Thirteen);
        assert_eq!(BoardSize::try_from(8), Err(GameError::UnsupportedBoardSize(8)));
        assert_eq!(BoardSize::try_from(21), Err(GameError::UnsupportedBoardSize(21)));
    }

    #[test]
    fn neighbors_at_edges_and_canonical_order() {
        let board = board9();
        assert_eq!(board.neighbor(c("A1"), Direction::Left), None);
        assert_eq!(board.neighbor(c("A1"), Direction::Down), None);
        assert_eq!(board.neighbor(c("A1"), Direction::Up), Some(c("A2")));
        assert_eq!(board.neighbor(c("J1"), Direction::Next), Some(c("A2")));
        assert_eq!(board.neighbor(c("A2"), Direction::Previous), Some(c("J1")));
        assert_eq!(board.neighbor(c("J9"), Direction::Next), None);
        assert_eq!(board.neighbors(c("E5")), vec![c("D5"), c("F5"), c("E6"), c("E4")]);
        assert_eq!(board.intersection_at(Coordinate::new(10, 1)), Err(GameError::OutOfBounds));
    }

    #[test]
    fn star_points_per_size() {
        let count = |size| Board::new(size).star_points().len();
        assert_eq!(count(BoardSize::Seven), 4);
        assert_eq!(count(BoardSize::Nine), 5);
        assert_eq!(count(BoardSize::Eleven), 5);
        assert_eq!(count(BoardSize::Thirteen), 5);
        assert_eq!(count(BoardSize::Nineteen), 9);

        let nine = board9();
        for p in ["C3", "G3", "E5", "C7", "G7"] {
            assert!(nine.is_star_point(c(p)), "{p}");
        }
        let thirteen = Board::new(BoardSize::Thirteen);
        assert!(thirteen.is_star_point(c("D4")));
        assert!(thirteen.is_star_point(c("G7")));
        let nineteen = Board::new(BoardSize::Nineteen);
        for p in ["D4", "K4", "Q4", "D10", "K10", "Q10", "D16", "K16", "Q16"] {
            assert!(nineteen.is_star_point(c(p)), "{p}");
        }
    }

    #[test]
    fn handicap_layouts() {
        let nineteen = Board::new(BoardSize::Nineteen);
        assert_eq!(nineteen.handicap_points(2).unwrap(), vec![c("Q16"), c("D4")]);
        assert_eq!(nineteen.handicap_points(9).unwrap().len(), 9);
        assert!(nineteen.handicap_points(5).unwrap().contains(&c("K10")));
        assert!(!nineteen.handicap_points(6).unwrap().contains(&c("K10")));
        assert_eq!(nineteen.handicap_points(1), Err(GameError::InvalidHandicap(1)));

        let nine = board9();
        assert_eq!(nine.handicap_points(5).unwrap().len(), 5);
        assert_eq!(nine.handicap_points(6), Err(GameError::InvalidHandicap(6)));

        let seven = Board::new(BoardSize::Seven);
        assert_eq!(seven.handicap_points(4).unwrap().len(), 4);
        assert_eq!(seven.handicap_points(5), Err(GameError::InvalidHandicap(5)));
    }

    #[test]
    fn placing_splits_empty_area_and_merges_chains() {
        let mut board = board9();
        // A wall along column B cuts column A off from the rest
        for y in 1..=9 {
            board.place_stone(Coordinate::new(2, y), Color::Black).unwrap();
        }
        assert!(board.regions_consistent());
        assert_eq!(board.region_at(c("B5")).unwrap().size(), 9);
        assert_eq!(board.liberties_at(c("B1")), Some(18));
        assert_eq!(board.region_at(c("A1")).unwrap().size(), 9);
        assert_eq!(board.region_at(c("C1")).unwrap().size(), 63);
        assert_eq!(board.regions().count(), 3);
    }

    #[test]
    fn capture_frees_points_and_restores_liberties() {
        let mut board = board9();
        board.place_stone(c("E5"), Color::White).unwrap();
        for p in ["D5", "F5", "E6"] {
            board.place_stone(c(p), Color::Black).unwrap();
        }
        assert_eq!(board.liberties_at(c("E5")), Some(1));
        let captured = board.place_stone(c("E4"), Color::Black).unwrap();
        assert_eq!(captured, vec![c("E5")]);
        assert_eq!(board.stone_at(c("E5")).unwrap(), Stone::Empty);
        assert_eq!(board.liberties_at(c("E4")), Some(4));
        assert_eq!(board.liberties_at(c("D5")), Some(4));
        assert!(board.regions_consistent());
    }

    #[test]
    fn multiple_groups_captured_in_scan_order() {
        let mut board = board9();
        // Two separate white stones whose last liberty is A1
        board.place_stone(c("A2"), Color::White).unwrap();
        board.place_stone(c("B1"), Color::White).unwrap();
        board.place_stone(c("A3"), Color::Black).unwrap();
        board.place_stone(c("B2"), Color::Black).unwrap();
        board.place_stone(c("C1"), Color::Black).unwrap();
        let captured = board.place_stone(c("A1"), Color::Black).unwrap();
        // Right (B1) is scanned before Up (A2)
        assert_eq!(captured, vec![c("B1"), c("A2")]);
        assert_eq!(board.liberties_at(c("A1")), Some(2));
        assert!(board.regions_consistent());
    }

    #[test]
    fn suicide_is_rejected_without_mutation() {
        let mut board = board9();
        for p in ["B1", "A2"] {
            board.place_stone(c(p), Color::White).unwrap();
        }
        let before = board.clone();
        assert_eq!(board.place_stone(c("A1"), Color::Black), Err(GameError::Suicide));
        assert_eq!(board, before);
        assert_eq!(board.regions().count(), before.regions().count());
        assert!(board.regions_consistent());
        assert_eq!(board.place_stone(c("B1"), Color::Black), Err(GameError::OccupiedIntersection));
    }

    #[test]
    fn filling_own_last_liberty_with_a_chain_is_suicide() {
        let mut board = board9();
        board.place_stone(c("A1"), Color::Black).unwrap();
        for p in ["B2", "A3", "C1"] {
            board.place_stone(c(p), Color::White).unwrap();
        }
        board.place_stone(c("A2"), Color::Black).unwrap();
        assert_eq!(board.liberties_at(c("A1")), Some(1));
        assert_eq!(board.preview_placement(c("B1"), Color::Black), Err(GameError::Suicide));

        let captured = board.place_stone(c("B1"), Color::White).unwrap();
        assert_eq!(captured, vec![c("A1"), c("A2")]);
        assert!(board.regions_consistent());
    }

    #[test]
    fn setup_rebuilds_regions_and_rejects_dead_chains() {
        let mut board = board9();
        board
            .set_stones(&[(c("A1"), Stone::Black), (c("B1"), Stone::Black), (c("E5"), Stone::White)])
            .unwrap();
        assert_eq!(board.region_at(c("A1")).unwrap().size(), 2);
        assert_eq!(board.liberties_at(c("B1")), Some(3));
        assert!(board.regions_consistent());

        let before = board.clone();
        let err = board
            .set_stones(&[(c("A2"), Stone::White), (c("C1"), Stone::White), (c("B2"), Stone::White)])
            .unwrap_err();
        assert_eq!(err, GameError::InvalidSetup(c("A1")));
        assert_eq!(board, before);

        board.set_stones(&[(c("A1"), Stone::Empty)]).unwrap();
        assert_eq!(board.stone_at(c("A1")).unwrap(), Stone::Empty);
        assert!(board.regions_consistent());
    }
}
