// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::cell::Cell;

/// Off-screen cell grid. Writes are deduplicated against the current
/// contents and recorded in a dirty list so the terminal layer only
/// repaints what changed.
#[derive(Clone, Debug)]
pub struct Frame {
    pub width: u16,
    pub height: u16,
    cells: Vec<Cell>,
    blank: Cell,
    dirty_all: bool,
    dirty_map: Vec<bool>,
    dirty: Vec<usize>,
}

impl Frame {
    pub fn new(width: u16, height: u16, bg: Option<Color>) -> Self {
        let len = width as usize * height as usize;
        let blank = Cell::blank_with_bg(bg);
        Self {
            width,
            height,
            cells: vec![blank; len],
            blank,
            dirty_all: true,
            dirty_map: vec![false; len],
            dirty: Vec::new(),
        }
    }

    #[allow(dead_code)]
    pub fn clear(&mut self) {
        self.cells.fill(self.blank);
        self.dirty_all = true;
        self.dirty_map.fill(false);
        self.dirty.clear();
    }

    pub fn is_dirty_all(&self) -> bool {
        self.dirty_all
    }

    pub fn dirty_indices(&self) -> &[usize] {
        &self.dirty
    }

    pub fn has_changes(&self) -> bool {
        self.dirty_all || !self.dirty.is_empty()
    }

    pub fn clear_dirty(&mut self) {
        self.dirty_all = false;
        for &i in &self.dirty {
            self.dirty_map[i] = false;
        }
        self.dirty.clear();
    }

    pub fn index(&self, x: u16, y: u16) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(y as usize * self.width as usize + x as usize)
    }

    #[allow(dead_code)]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    pub fn cell_at_index(&self, i: usize) -> Cell {
        self.cells[i]
    }

    pub fn set(&mut self, x: u16, y: u16, cell: Cell) {
        let Some(i) = self.index(x, y) else {
            return;
        };
        if self.cells[i] == cell {
            return;
        }
        self.cells[i] = cell;
        if !self.dirty_all && !self.dirty_map[i] {
            self.dirty_map[i] = true;
            self.dirty.push(i);
        }
    }

    /// Write a string left-to-right starting at (x, y). Clipped at the
    /// right edge.
    pub fn put_str(&mut self, x: u16, y: u16, s: &str, style: Cell) {
        let mut cx = x;
        for ch in s.chars() {
            if cx >= self.width {
                break;
            }
            self.set(cx, y, Cell { ch, ..style });
            cx += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_tracks_only_changed_cells() {
        let mut f = Frame::new(4, 2, None);
        f.clear_dirty();

        let c = Cell::glyph('x', None, None);
        f.set(1, 0, c);
        f.set(1, 0, c);
        f.set(9, 0, c);

        assert_eq!(f.dirty_indices(), &[1]);
        assert_eq!(f.get(1, 0).unwrap().ch, 'x');
    }

    #[test]
    fn clear_resets_cells_and_marks_everything_dirty() {
        let mut f = Frame::new(2, 2, None);
        f.clear_dirty();
        f.set(0, 0, Cell::glyph('x', None, None));
        f.clear();

        assert!(f.is_dirty_all());
        assert_eq!(f.get(0, 0).unwrap().ch, ' ');
    }

    #[test]
    fn put_str_clips_at_right_edge() {
        let mut f = Frame::new(3, 1, None);
        f.put_str(1, 0, "abc", Cell::blank_with_bg(None));
        assert_eq!(f.get(1, 0).unwrap().ch, 'a');
        assert_eq!(f.get(2, 0).unwrap().ch, 'b');
    }
}
