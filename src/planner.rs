// src/planner.rs
//
// A* over a coarsened occupancy grid. Self-contained sibling of the quad
// tracker: the orchestrator hands it a grid and two endpoints and gets a
// path back, replanning only when the grid changes.

use anyhow::{bail, Result};
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashSet};

const STRAIGHT_COST: i64 = 10;
const DIAGONAL_COST: i64 = 14;

/// Occupancy grid; `true` = blocked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<bool>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![false; width * height],
        }
    }

    /// Parse an ASCII grid, one row per line: `0` or `.` free, `1` or `#`
    /// blocked. All rows must be the same width.
    pub fn parse(text: &str) -> Result<Self> {
        let rows: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        if rows.is_empty() {
            bail!("empty grid");
        }
        let width = rows[0].trim().len();
        let height = rows.len();
        let mut grid = Grid::new(width, height);
        for (y, row) in rows.iter().enumerate() {
            let row = row.trim();
            if row.len() != width {
                bail!("row {} has width {}, expected {}", y, row.len(), width);
            }
            for (x, ch) in row.chars().enumerate() {
                match ch {
                    '0' | '.' => {}
                    '1' | '#' => grid.set_blocked(x, y, true),
                    other => bail!("unexpected grid character {:?} at ({}, {})", other, x, y),
                }
            }
        }
        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_blocked(&self, x: usize, y: usize) -> bool {
        self.cells[y * self.width + x]
    }

    pub fn set_blocked(&mut self, x: usize, y: usize, blocked: bool) {
        self.cells[y * self.width + x] = blocked;
    }

    fn in_bounds(&self, x: isize, y: isize) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }
}

#[derive(Debug, Clone, Copy)]
struct Node {
    x: usize,
    y: usize,
    g: i64,
    parent: Option<usize>,
}

fn heuristic(x: usize, y: usize, end: (usize, usize)) -> i64 {
    // Manhattan distance, scaled to match the straight-step cost.
    let dx = (x as i64 - end.0 as i64).abs();
    let dy = (y as i64 - end.1 as i64).abs();
    STRAIGHT_COST * (dx + dy)
}

/// Classic 8-connected A*. Pure: no state survives the call. Returns the
/// cell path from `start` to `end` inclusive, or `None` when no route
/// exists (or an endpoint is blocked or out of bounds).
pub fn plan(grid: &Grid, start: (usize, usize), end: (usize, usize)) -> Option<Vec<(usize, usize)>> {
    if !grid.in_bounds(start.0 as isize, start.1 as isize)
        || !grid.in_bounds(end.0 as isize, end.1 as isize)
        || grid.is_blocked(start.0, start.1)
        || grid.is_blocked(end.0, end.1)
    {
        return None;
    }

    const NEIGHBORS: [(isize, isize); 8] = [
        (0, 1),
        (1, 0),
        (0, -1),
        (-1, 0),
        (1, 1),
        (1, -1),
        (-1, 1),
        (-1, -1),
    ];

    let mut nodes: Vec<Node> = vec![Node {
        x: start.0,
        y: start.1,
        g: 0,
        parent: None,
    }];
    // Heap entries are (f, node index); Reverse turns the max-heap into a
    // min-priority queue on f.
    let mut open: BinaryHeap<Reverse<(i64, usize)>> = BinaryHeap::new();
    open.push(Reverse((heuristic(start.0, start.1, end), 0)));
    let mut closed: HashSet<(usize, usize)> = HashSet::new();

    while let Some(Reverse((_, index))) = open.pop() {
        let current = nodes[index];
        if !closed.insert((current.x, current.y)) {
            continue;
        }

        if (current.x, current.y) == end {
            let mut path = Vec::new();
            let mut cursor = Some(index);
            while let Some(i) = cursor {
                path.push((nodes[i].x, nodes[i].y));
                cursor = nodes[i].parent;
            }
            path.reverse();
            return Some(path);
        }

        for (dx, dy) in NEIGHBORS {
            let nx = current.x as isize + dx;
            let ny = current.y as isize + dy;
            if !grid.in_bounds(nx, ny) {
                continue;
            }
            let (nx, ny) = (nx as usize, ny as usize);
            if grid.is_blocked(nx, ny) || closed.contains(&(nx, ny)) {
                continue;
            }

            let move_cost = if dx != 0 && dy != 0 {
                DIAGONAL_COST
            } else {
                STRAIGHT_COST
            };
            let g = current.g + move_cost;
            let f = g + heuristic(nx, ny, end);

            nodes.push(Node {
                x: nx,
                y: ny,
                g,
                parent: Some(index),
            });
            open.push(Reverse((f, nodes.len() - 1)));
        }
    }

    None
}

/// Euclidean length of a cell path, in pixels, with cells `cell_size`
/// pixels wide.
pub fn path_length(path: &[(usize, usize)], cell_size: f64) -> f64 {
    path.windows(2)
        .map(|pair| {
            let dx = (pair[1].0 as f64 - pair[0].0 as f64) * cell_size;
            let dy = (pair[1].1 as f64 - pair[0].1 as f64) * cell_size;
            (dx * dx + dy * dy).sqrt()
        })
        .sum()
}

/// Caches the last grid and path; replans only when the grid changed.
#[derive(Default)]
pub struct PathCache {
    last_grid: Option<Grid>,
    path: Option<Vec<(usize, usize)>>,
}

impl PathCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn plan(
        &mut self,
        grid: &Grid,
        start: (usize, usize),
        end: (usize, usize),
    ) -> Option<&[(usize, usize)]> {
        if self.last_grid.as_ref() != Some(grid) {
            self.last_grid = Some(grid.clone());
            self.path = plan(grid, start, end);
        }
        self.path.as_deref()
    }
}
