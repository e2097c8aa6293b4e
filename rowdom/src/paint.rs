//! Paint a [`Dom`] subtree into a cell [`Buffer`].

use crate::buffer::Buffer;
use crate::element::{Dom, Element, NodeId};
use crate::text::{char_width, pad_left, truncate_to_width};
use crate::types::{Direction, Overflow, Position, Rect, Rgb, Style, TextAlign};

/// Paint `root` and its attached descendants with `root` at the buffer origin.
pub fn paint(dom: &Dom, root: NodeId, buf: &mut Buffer) {
    let clip = buf.area();
    paint_node(dom, root, (0, 0), clip, &Style::default(), buf);
}

fn signed(v: u64) -> i64 {
    i64::try_from(v).unwrap_or(i64::MAX)
}

fn paint_node(
    dom: &Dom,
    id: NodeId,
    (x, y): (i64, i64),
    clip: Rect,
    inherited: &Style,
    buf: &mut Buffer,
) {
    let Some(el) = dom.get(id) else {
        return;
    };
    let (width, height) = el.client_size();
    let area = clip.clip(x, y, width, height);
    let style = el.style.inherit(inherited);

    if let Some(bg) = &style.background {
        fill_rect(buf, area, bg.to_rgb());
    }
    if let Some(text) = &el.text {
        paint_text(text, el, &style, (x, y), area, buf);
    }

    let child_clip = match el.overflow_y {
        Overflow::Visible => clip,
        Overflow::Hidden | Overflow::Scroll => area,
    };
    if child_clip.is_empty() {
        return;
    }
    let scroll = match el.overflow_y {
        Overflow::Scroll => signed(el.scroll_top()),
        _ => 0,
    };

    let mut cursor: i64 = 0;
    for &child_id in el.children() {
        let Some(child) = dom.get(child_id) else {
            continue;
        };
        let (cx, cy) = match child.position {
            Position::Absolute => (
                x.saturating_add(signed(child.left)),
                y.saturating_add(signed(child.top)).saturating_sub(scroll),
            ),
            Position::Static => {
                let (cw, ch) = child.client_size();
                match el.direction {
                    Direction::Column => {
                        let origin = (x, y.saturating_add(cursor).saturating_sub(scroll));
                        cursor = cursor.saturating_add(signed(ch));
                        origin
                    }
                    Direction::Row => {
                        let origin = (x.saturating_add(cursor), y.saturating_sub(scroll));
                        cursor = cursor.saturating_add(signed(cw));
                        origin
                    }
                }
            }
        };
        paint_node(dom, child_id, (cx, cy), child_clip, &style, buf);
    }
}

fn fill_rect(buf: &mut Buffer, rect: Rect, bg: Rgb) {
    for y in rect.y..rect.bottom() {
        for x in rect.x..rect.right() {
            if let Some(cell) = buf.get_mut(x, y) {
                cell.bg = bg;
            }
        }
    }
}

fn paint_text(
    text: &str,
    el: &Element,
    style: &Style,
    (x, y): (i64, i64),
    area: Rect,
    buf: &mut Buffer,
) {
    if area.is_empty() || y < i64::from(area.y) || y >= i64::from(area.bottom()) {
        return;
    }
    let row = y as u16;
    let max_width = usize::try_from(el.client_size().0).unwrap_or(usize::MAX);
    let line = text.lines().next().unwrap_or("");
    let mut line = truncate_to_width(line, max_width);
    if el.text_align == TextAlign::Right {
        line = pad_left(&line, max_width);
    }

    let fg = style.foreground.map_or(Rgb::WHITE, |c| c.to_rgb());

    let mut col = x;
    for ch in line.chars() {
        let w = char_width(ch).max(1) as i64;
        if col >= i64::from(area.x) && col + w <= i64::from(area.right()) {
            let cx = col as u16;
            if let Some(cell) = buf.get_mut(cx, row) {
                cell.put(ch, fg, style.text_style);
            }
            if w > 1 {
                if let Some(cell) = buf.get_mut(cx + 1, row) {
                    cell.cover();
                }
            }
        }
        col += w;
        if col >= i64::from(area.right()) {
            break;
        }
    }
}
