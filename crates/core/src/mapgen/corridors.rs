//! Corridor topology (Kruskal spanning tree or sequential chain) and carving.

use std::cmp::Ordering;

use crate::config::ConnectionStrategy;
use crate::types::{Pos, TileKind};

use super::grid::Grid;
use super::model::Room;
use super::seed::FloorRng;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(super) struct Edge {
    pub(super) distance: u32,
    pub(super) a: usize,
    pub(super) b: usize,
}

impl Edge {
    fn between(rooms: &[Room], a: usize, b: usize) -> Self {
        Self { distance: rooms[a].center().manhattan(rooms[b].center()), a, b }
    }
}

/// Union-find over room indices with path halving and union by rank.
pub(super) struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    pub(super) fn new(len: usize) -> Self {
        Self { parent: (0..len).collect(), rank: vec![0; len] }
    }

    pub(super) fn find(&mut self, mut index: usize) -> usize {
        while self.parent[index] != index {
            self.parent[index] = self.parent[self.parent[index]];
            index = self.parent[index];
        }
        index
    }

    /// Joins the sets holding `a` and `b`; false when they were already joined.
    pub(super) fn union(&mut self, a: usize, b: usize) -> bool {
        let root_a = self.find(a);
        let root_b = self.find(b);
        if root_a == root_b {
            return false;
        }
        match self.rank[root_a].cmp(&self.rank[root_b]) {
            Ordering::Less => self.parent[root_a] = root_b,
            Ordering::Greater => self.parent[root_b] = root_a,
            Ordering::Equal => {
                self.parent[root_b] = root_a;
                self.rank[root_a] += 1;
            }
        }
        true
    }
}

/// Kruskal: every room pair weighted by center Manhattan distance, cheapest
/// first, keeping only edges that join two separate components.
pub(super) fn spanning_edges(rooms: &[Room]) -> Vec<Edge> {
    let mut candidates = Vec::with_capacity(rooms.len() * rooms.len().saturating_sub(1) / 2);
    for a in 0..rooms.len() {
        for b in (a + 1)..rooms.len() {
            candidates.push(Edge::between(rooms, a, b));
        }
    }
    candidates.sort_unstable();

    let mut components = DisjointSet::new(rooms.len());
    let mut selected = Vec::with_capacity(rooms.len().saturating_sub(1));
    for edge in candidates {
        if components.union(edge.a, edge.b) {
            selected.push(edge);
            if selected.len() + 1 == rooms.len() {
                break;
            }
        }
    }
    selected
}

pub(super) fn sequential_edges(rooms: &[Room]) -> Vec<Edge> {
    (1..rooms.len()).map(|index| Edge::between(rooms, index - 1, index)).collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(super) enum CorridorShape {
    /// Horizontal along the start row, then vertical along the end column.
    L,
    /// Horizontal to the midpoint column, vertical across, horizontal to the end.
    S,
}

pub(super) struct CorridorPlan {
    pub(super) strategy: ConnectionStrategy,
    pub(super) l_corridor_percent: u32,
    /// Loop edges added on top of the tree: `rooms / divisor`. `None` adds none.
    pub(super) extra_edge_divisor: Option<usize>,
}

/// Carves the corridor network and returns every edge that was carved.
pub(super) fn connect_rooms(
    canvas: &mut Grid<TileKind>,
    rooms: &[Room],
    plan: &CorridorPlan,
    rng: &mut FloorRng,
) -> Vec<Edge> {
    if rooms.len() < 2 {
        return Vec::new();
    }

    let mut edges = match plan.strategy {
        ConnectionStrategy::Kruskal => spanning_edges(rooms),
        ConnectionStrategy::Sequential => sequential_edges(rooms),
    };

    if let Some(divisor) = plan.extra_edge_divisor {
        for _ in 0..rooms.len() / divisor {
            let a = rng.index(rooms.len());
            let mut b = rng.index(rooms.len() - 1);
            if b >= a {
                b += 1;
            }
            edges.push(Edge::between(rooms, a.min(b), a.max(b)));
        }
    }

    for edge in &edges {
        let shape =
            if rng.percent(plan.l_corridor_percent) { CorridorShape::L } else { CorridorShape::S };
        carve_corridor(canvas, rooms[edge.a].center(), rooms[edge.b].center(), shape);
    }
    mark_doors(canvas, rooms);
    edges
}

pub(super) fn carve_corridor(
    canvas: &mut Grid<TileKind>,
    start: Pos,
    end: Pos,
    shape: CorridorShape,
) {
    match shape {
        CorridorShape::L => {
            carve_horizontal_line(canvas, start.y, start.x, end.x);
            carve_vertical_line(canvas, end.x, start.y, end.y);
        }
        CorridorShape::S => {
            let middle_x = (start.x + end.x) / 2;
            carve_horizontal_line(canvas, start.y, start.x, middle_x);
            carve_vertical_line(canvas, middle_x, start.y, end.y);
            carve_horizontal_line(canvas, end.y, middle_x, end.x);
        }
    }
}

fn carve_horizontal_line(canvas: &mut Grid<TileKind>, y: i32, left_x: i32, right_x: i32) {
    for x in left_x.min(right_x)..=left_x.max(right_x) {
        carve_hallway_tile(canvas, Pos { y, x });
    }
}

fn carve_vertical_line(canvas: &mut Grid<TileKind>, x: i32, top_y: i32, bottom_y: i32) {
    for y in top_y.min(bottom_y)..=top_y.max(bottom_y) {
        carve_hallway_tile(canvas, Pos { y, x });
    }
}

/// Only solid rock becomes hallway; rooms keep their floor and the border stays intact.
fn carve_hallway_tile(canvas: &mut Grid<TileKind>, pos: Pos) {
    if canvas.is_border(pos) {
        return;
    }
    if let Some(tile) = canvas.get_mut(pos)
        && *tile == TileKind::Wall
    {
        *tile = TileKind::Hallway;
    }
}

/// Hallway tiles that cross the ring just outside a room become doors. A
/// hallway running along the ring (hallway on either side along the ring) is
/// left alone so parallel runs do not turn into rows of doors.
fn mark_doors(canvas: &mut Grid<TileKind>, rooms: &[Room]) {
    let mut doors = Vec::new();
    for room in rooms {
        let rect = room.rect;
        let left = rect.x as i32 - 1;
        let right = rect.right() as i32 + 1;
        let top = rect.y as i32 - 1;
        let bottom = rect.bottom() as i32 + 1;

        for y in rect.y as i32..=rect.bottom() as i32 {
            for x in [left, right] {
                let pos = Pos { y, x };
                if is_ring_crossing(canvas, pos, pos.offset(0, -1), pos.offset(0, 1)) {
                    doors.push(pos);
                }
            }
        }
        for x in rect.x as i32..=rect.right() as i32 {
            for y in [top, bottom] {
                let pos = Pos { y, x };
                if is_ring_crossing(canvas, pos, pos.offset(-1, 0), pos.offset(1, 0)) {
                    doors.push(pos);
                }
            }
        }
    }
    for pos in doors {
        canvas.set(pos, TileKind::Door);
    }
}

fn is_ring_crossing(canvas: &Grid<TileKind>, pos: Pos, before: Pos, after: Pos) -> bool {
    let is_hallway = |pos: Pos| canvas.get(pos) == Some(&TileKind::Hallway);
    is_hallway(pos) && !is_hallway(before) && !is_hallway(after)
}
