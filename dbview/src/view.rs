//! The table view: a header, a virtual body and a status line.

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseEvent, MouseEventKind};
use rowdom::{Color, Dom, DomEvent, Element, NodeId, Size, Style, TextAlign};
use vscroll::{RowError, ScrollerConfig, VirtualScroller};

use crate::error::AppError;
use crate::pager::PageLoader;
use crate::records::{COLUMNS, Record, cells};

/// Height of an expanded row.
pub const EXPANDED_HEIGHT: u32 = 3;

const WHEEL_STEP: i64 = 3;

/// What the host loop should do after an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Continue,
    Quit,
}

/// State shared with the scroller's callbacks.
#[derive(Debug)]
struct Shared {
    loader: PageLoader,
    selected: usize,
    expanded: BTreeSet<usize>,
}

pub struct TableView {
    root: NodeId,
    header: NodeId,
    body: NodeId,
    status: NodeId,
    scroller: VirtualScroller,
    shared: Rc<RefCell<Shared>>,
}

fn selected_style() -> Style {
    Style::new()
        .background(Color::oklch(0.35, 0.08, 250.0))
        .foreground(Color::oklch(0.95, 0.0, 0.0))
}

fn column_cell(text: &str, width: u64, numeric: bool) -> Element {
    let align = if numeric {
        TextAlign::Right
    } else {
        TextAlign::Left
    };
    Element::text(text)
        .width(Size::Fixed(width))
        .text_align(align)
}

fn build_row(
    dom: &mut Dom,
    index: usize,
    record: &Record,
    selected: bool,
    expanded: bool,
) -> Result<NodeId, RowError> {
    let style = if selected { selected_style() } else { Style::new() };
    let line = dom.create(Element::row().width(Size::Fill).height(Size::Fixed(1)));
    for (column, text) in COLUMNS.iter().zip(cells(record)) {
        let cell = dom.create(column_cell(&text, column.width, column.numeric));
        dom.append_child(line, cell)?;
    }

    let row = dom.create(
        Element::col()
            .id(format!("record-{}", record.id))
            .style(style)
            .data("row", index.to_string()),
    );
    dom.append_child(row, line)?;
    if expanded {
        let detail = format!(
            "  {} · {} · {}",
            record.kind,
            record.amount_text(),
            record.updated_text()
        );
        let detail = dom.create(Element::text(detail).style(Style::new().dim()));
        let id = dom.create(
            Element::text(format!("  record id {}", record.id)).style(Style::new().dim()),
        );
        dom.append_child(row, detail)?;
        dom.append_child(row, id)?;
    }
    Ok(row)
}

impl TableView {
    /// Build the view inside `root`, sized `width` x `height`.
    pub fn mount(
        dom: &mut Dom,
        root: NodeId,
        loader: PageLoader,
        config: ScrollerConfig,
        width: u16,
        height: u16,
    ) -> Result<Self, AppError> {
        let total_rows = loader.len();
        let shared = Rc::new(RefCell::new(Shared {
            loader,
            selected: 0,
            expanded: BTreeSet::new(),
        }));

        dom.resize(root, u64::from(width), u64::from(height))?;
        let header = dom.create(Element::row().width(Size::Fill).height(Size::Fixed(1)));
        let body = dom.create(Element::box_().id("body"));
        let status = dom.create(
            Element::text("")
                .width(Size::Fill)
                .style(Style::new().background(Color::oklch(0.25, 0.02, 250.0))),
        );
        for node in [header, body, status] {
            dom.append_child(root, node)?;
        }
        dom.resize(body, u64::from(width), body_height(height))?;

        let rows = Rc::clone(&shared);
        let pages = Rc::clone(&shared);
        let scroller = VirtualScroller::builder(ScrollerConfig {
            total_rows,
            ..config
        })
        .render_row(move |dom, index| {
            let mut shared = rows.borrow_mut();
            let selected = shared.selected == index;
            let expanded = shared.expanded.contains(&index);
            let record = shared
                .loader
                .row(index)
                .ok_or_else(|| RowError::new(format!("no record at row {index}")))?;
            build_row(dom, index, record, selected, expanded)
        })
        .on_visible_range_change(move |start, end| {
            pages.borrow_mut().loader.visible_range_changed(start, end);
        })
        .mount(dom, body)?;

        let mut view = Self {
            root,
            header,
            body,
            status,
            scroller,
            shared,
        };
        view.update_header(dom)?;
        view.update_status(dom)?;
        Ok(view)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn scroller(&self) -> &VirtualScroller {
        &self.scroller
    }

    pub fn selected(&self) -> usize {
        self.shared.borrow().selected
    }

    pub fn is_expanded(&self, index: usize) -> bool {
        self.shared.borrow().expanded.contains(&index)
    }

    pub fn fetches(&self) -> u64 {
        self.shared.borrow().loader.fetches()
    }

    pub fn loaded_pages(&self) -> Vec<usize> {
        self.shared.borrow().loader.loaded_pages()
    }

    pub fn status_text(&self, dom: &Dom) -> String {
        dom.get(self.status)
            .and_then(|el| el.text.clone())
            .unwrap_or_default()
    }

    fn total_rows(&self) -> usize {
        self.scroller.total_rows()
    }

    fn page_rows(&self, dom: &Dom) -> usize {
        let height = dom.client_size(self.body).map_or(1, |(_, h)| h);
        usize::try_from(height).unwrap_or(usize::MAX).max(1)
    }

    // -------------------------------------------------------------------------
    // Input
    // -------------------------------------------------------------------------

    pub fn handle_key(&mut self, dom: &mut Dom, key: KeyEvent) -> Result<Action, AppError> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(Action::Quit);
        }
        let selected = self.selected();
        let last = self.total_rows().saturating_sub(1);
        let page = self.page_rows(dom);
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(Action::Quit),
            KeyCode::Up | KeyCode::Char('k') => self.select(dom, selected.saturating_sub(1))?,
            KeyCode::Down | KeyCode::Char('j') => self.select(dom, (selected + 1).min(last))?,
            KeyCode::PageUp => self.select(dom, selected.saturating_sub(page))?,
            KeyCode::PageDown => self.select(dom, selected.saturating_add(page).min(last))?,
            KeyCode::Home => self.select(dom, 0)?,
            KeyCode::End => self.select(dom, last)?,
            KeyCode::Char('s') => self.cycle_sort(dom)?,
            KeyCode::Char('e') => self.toggle_expanded(dom)?,
            _ => {}
        }
        Ok(Action::Continue)
    }

    pub fn handle_mouse(&mut self, dom: &mut Dom, mouse: MouseEvent) -> Result<(), AppError> {
        let delta = match mouse.kind {
            MouseEventKind::ScrollUp => -WHEEL_STEP,
            MouseEventKind::ScrollDown => WHEEL_STEP,
            _ => return Ok(()),
        };
        dom.scroll_by(self.scroller.viewport_node(), delta)?;
        Ok(())
    }

    /// Route a queued tree event to the scroller.
    pub fn handle_event(&mut self, dom: &mut Dom, event: &DomEvent) -> Result<bool, AppError> {
        Ok(self.scroller.handle_event(dom, event)?)
    }

    /// The terminal changed size.
    pub fn resize(&mut self, dom: &mut Dom, width: u16, height: u16) -> Result<(), AppError> {
        dom.resize(self.root, u64::from(width), u64::from(height))?;
        dom.resize(self.body, u64::from(width), body_height(height))?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Commands
    // -------------------------------------------------------------------------

    /// Move the selection to `index` and scroll it into view.
    pub fn select(&mut self, dom: &mut Dom, index: usize) -> Result<(), AppError> {
        if self.total_rows() == 0 {
            return Ok(());
        }
        let previous = std::mem::replace(&mut self.shared.borrow_mut().selected, index);
        if previous != index {
            self.scroller.invalidate_row(dom, previous)?;
            self.scroller.invalidate_row(dom, index)?;
            self.scroller.refresh(dom)?;
        }
        self.scroller.scroll_into_view(dom, index)?;
        Ok(())
    }

    /// Sort by the next column. Cached rows were built from the old order.
    pub fn cycle_sort(&mut self, dom: &mut Dom) -> Result<(), AppError> {
        let expanded = {
            let mut shared = self.shared.borrow_mut();
            let key = shared.loader.sort_key().next();
            shared.loader.sort_by(key);
            std::mem::take(&mut shared.expanded)
        };
        let nominal = self.scroller.config().row_height;
        for index in expanded {
            self.scroller.set_row_height(dom, index, nominal)?;
        }
        self.scroller.invalidate_all(dom)?;
        self.scroller.refresh(dom)?;
        self.update_header(dom)
    }

    /// Expand or collapse the selected row.
    pub fn toggle_expanded(&mut self, dom: &mut Dom) -> Result<(), AppError> {
        if self.total_rows() == 0 {
            return Ok(());
        }
        let (index, expanded) = {
            let mut shared = self.shared.borrow_mut();
            let index = shared.selected;
            let expanded = if shared.expanded.remove(&index) {
                false
            } else {
                shared.expanded.insert(index);
                true
            };
            (index, expanded)
        };
        let height = if expanded {
            EXPANDED_HEIGHT
        } else {
            self.scroller.config().row_height
        };
        self.scroller.set_row_height(dom, index, height)?;
        self.scroller.invalidate_row(dom, index)?;
        self.scroller.refresh(dom)?;
        Ok(())
    }

    /// Stop the scroller; the tree is left as-is.
    pub fn destroy(&mut self, dom: &mut Dom) {
        self.scroller.destroy(dom);
    }

    // -------------------------------------------------------------------------
    // Chrome
    // -------------------------------------------------------------------------

    fn update_header(&mut self, dom: &mut Dom) -> Result<(), AppError> {
        let sort = self.shared.borrow().loader.sort_key();
        dom.clear_children(self.header)?;
        for column in COLUMNS {
            let sorted = column.key == Some(sort);
            let marker = if sorted { " ▾" } else { "" };
            let mut style = Style::new().bold();
            if sorted {
                style = style.foreground(Color::oklch(0.8, 0.12, 80.0));
            }
            let cell = column_cell(
                &format!("{}{marker}", column.title),
                column.width,
                column.numeric,
            )
            .style(style);
            let node = dom.create(cell);
            dom.append_child(self.header, node)?;
        }
        Ok(())
    }

    pub fn update_status(&mut self, dom: &mut Dom) -> Result<(), AppError> {
        let range = self.scroller.visible_range();
        let text = {
            let shared = self.shared.borrow();
            format!(
                " rows {}-{} of {} · row {} · sorted by {} · {} pages held",
                range.start,
                range.end,
                self.total_rows(),
                shared.selected,
                shared.loader.sort_key().label(),
                shared.loader.loaded_pages().len(),
            )
        };
        if dom.get(self.status).and_then(|el| el.text.as_deref()) != Some(text.as_str()) {
            dom.set_text(self.status, text)?;
        }
        Ok(())
    }
}

/// Rows left for the body below the header and above the status line.
fn body_height(height: u16) -> u64 {
    u64::from(height.saturating_sub(2))
}
