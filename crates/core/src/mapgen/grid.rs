//! Flat row-major grid storage with width/height-aware accessors.

use serde::{Deserialize, Serialize};

use crate::types::Pos;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T: Clone> Grid<T> {
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self { width, height, cells: vec![value; width * height] }
    }
}

impl<T> Grid<T> {
    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    pub fn in_bounds(&self, pos: Pos) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// True for cells on the outermost ring.
    pub fn is_border(&self, pos: Pos) -> bool {
        self.in_bounds(pos)
            && (pos.x == 0
                || pos.y == 0
                || pos.x as usize == self.width - 1
                || pos.y as usize == self.height - 1)
    }

    pub fn index(&self, pos: Pos) -> Option<usize> {
        self.in_bounds(pos).then(|| (pos.y as usize) * self.width + (pos.x as usize))
    }

    pub fn get(&self, pos: Pos) -> Option<&T> {
        self.index(pos).and_then(|index| self.cells.get(index))
    }

    pub fn get_mut(&mut self, pos: Pos) -> Option<&mut T> {
        self.index(pos).and_then(|index| self.cells.get_mut(index))
    }

    /// Writes `value` if `pos` is inside the grid; reports whether it did.
    pub fn set(&mut self, pos: Pos, value: T) -> bool {
        match self.get_mut(pos) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }

    pub fn row(&self, y: usize) -> Option<&[T]> {
        let start = y.checked_mul(self.width)?;
        self.cells.get(start..start + self.width)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks(self.width.max(1))
    }

    pub fn column(&self, x: usize) -> impl Iterator<Item = &T> {
        let len = if x < self.width { self.height } else { 0 };
        self.cells.iter().skip(x).step_by(self.width.max(1)).take(len)
    }

    pub fn positions(&self) -> impl Iterator<Item = Pos> + use<T> {
        let width = self.width;
        let height = self.height;
        (0..height).flat_map(move |y| (0..width).map(move |x| Pos { y: y as i32, x: x as i32 }))
    }

    /// Clamps a position into the interior, leaving the border ring untouched.
    pub fn clamp_interior(&self, pos: Pos) -> Pos {
        let max_x = (self.width as i32 - 2).max(1);
        let max_y = (self.height as i32 - 2).max(1);
        Pos { y: pos.y.clamp(1, max_y), x: pos.x.clamp(1, max_x) }
    }

    pub fn map<U>(&self, transform: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(transform).collect(),
        }
    }
}
