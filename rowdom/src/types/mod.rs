mod enums;
mod rect;
mod style;

pub use enums::{Direction, Overflow, Position, Size, TextAlign};
pub use rect::Rect;
pub use style::{Color, Rgb, Style, TextStyle};
