use crate::types::{Rgb, TextStyle};

/// One terminal cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub symbol: char,
    pub fg: Rgb,
    pub bg: Rgb,
    pub attrs: TextStyle,
    /// Covered by a double-width symbol in the cell to the left.
    pub covered: bool,
}

impl Cell {
    pub const BLANK: Cell = Cell {
        symbol: ' ',
        fg: Rgb::WHITE,
        bg: Rgb::BLACK,
        attrs: TextStyle::new(),
        covered: false,
    };

    /// Draw `symbol` over this cell, keeping its background.
    pub fn put(&mut self, symbol: char, fg: Rgb, attrs: TextStyle) {
        self.symbol = symbol;
        self.fg = fg;
        self.attrs = attrs;
        self.covered = false;
    }

    /// Mark as the right half of a wide symbol.
    pub fn cover(&mut self) {
        self.symbol = ' ';
        self.covered = true;
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::BLANK
    }
}
