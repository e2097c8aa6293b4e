use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    cursor,
    event::{self, Event as CrosstermEvent},
    execute, queue,
    style::{Attribute, Color as CtColor, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal,
};

use crate::buffer::{Buffer, Cell};
use crate::element::{Dom, NodeId};
use crate::paint::paint;
use crate::text::char_width;
use crate::types::{Rgb, TextStyle};

/// Raw-mode alternate-screen terminal that paints a [`Dom`] with
/// double-buffered diffing.
pub struct Terminal {
    stdout: io::Stdout,
    current: Buffer,
    previous: Buffer,
}

impl Terminal {
    pub fn new() -> io::Result<Self> {
        let mut stdout = io::stdout();

        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            event::EnableMouseCapture
        )?;

        let (width, height) = terminal::size()?;
        Ok(Self {
            stdout,
            current: Buffer::new(width, height),
            previous: Buffer::new(width, height),
        })
    }

    pub fn size(&self) -> (u16, u16) {
        (self.current.width(), self.current.height())
    }

    /// Wait up to `timeout` for input and return it together with anything
    /// else already pending.
    pub fn poll(&self, timeout: Duration) -> io::Result<Vec<CrosstermEvent>> {
        let mut events = Vec::new();
        if event::poll(timeout)? {
            events.push(event::read()?);
            while event::poll(Duration::ZERO)? {
                events.push(event::read()?);
            }
        }
        Ok(events)
    }

    /// Paint `root` and write the cells that changed since the last draw.
    pub fn draw(&mut self, dom: &Dom, root: NodeId) -> io::Result<()> {
        let (width, height) = terminal::size()?;
        if (width, height) != self.size() {
            self.current = Buffer::new(width, height);
            self.previous = Buffer::new(width, height);
            execute!(self.stdout, terminal::Clear(terminal::ClearType::All))?;
        }

        self.current.clear();
        paint(dom, root, &mut self.current);
        self.flush_diff()?;
        std::mem::swap(&mut self.current, &mut self.previous);
        Ok(())
    }

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut pen = Pen::default();
        queue!(self.stdout, SetAttribute(Attribute::Reset))?;

        for (x, y, cell) in self.current.diff(&self.previous) {
            if cell.covered {
                continue;
            }
            if Some((x, y)) != pen.next {
                queue!(self.stdout, cursor::MoveTo(x, y))?;
            }
            pen.apply(&mut self.stdout, cell)?;
            write!(self.stdout, "{}", cell.symbol)?;
            pen.next = Some((x + char_width(cell.symbol).max(1) as u16, y));
        }

        queue!(self.stdout, SetAttribute(Attribute::Reset))?;
        self.stdout.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = execute!(
            self.stdout,
            event::DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        );
        let _ = terminal::disable_raw_mode();
    }
}

/// Last colors and attributes written, so unchanged ones are not re-sent.
#[derive(Default)]
struct Pen {
    next: Option<(u16, u16)>,
    fg: Option<Rgb>,
    bg: Option<Rgb>,
    attrs: TextStyle,
}

fn ct_color(rgb: Rgb) -> CtColor {
    CtColor::Rgb {
        r: rgb.r,
        g: rgb.g,
        b: rgb.b,
    }
}

impl Pen {
    fn apply(&mut self, out: &mut impl Write, cell: &Cell) -> io::Result<()> {
        if self.fg != Some(cell.fg) {
            queue!(out, SetForegroundColor(ct_color(cell.fg)))?;
            self.fg = Some(cell.fg);
        }
        if self.bg != Some(cell.bg) {
            queue!(out, SetBackgroundColor(ct_color(cell.bg)))?;
            self.bg = Some(cell.bg);
        }
        if cell.attrs != self.attrs {
            // Bold and dim share NormalIntensity, so reset and re-apply.
            queue!(out, SetAttribute(Attribute::Reset))?;
            queue!(out, SetForegroundColor(ct_color(cell.fg)))?;
            queue!(out, SetBackgroundColor(ct_color(cell.bg)))?;
            if cell.attrs.bold {
                queue!(out, SetAttribute(Attribute::Bold))?;
            }
            if cell.attrs.dim {
                queue!(out, SetAttribute(Attribute::Dim))?;
            }
            if cell.attrs.italic {
                queue!(out, SetAttribute(Attribute::Italic))?;
            }
            if cell.attrs.underline {
                queue!(out, SetAttribute(Attribute::Underlined))?;
            }
            self.attrs = cell.attrs;
        }
        Ok(())
    }
}
