//! The virtual scroller component.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;
use std::panic::{AssertUnwindSafe, catch_unwind};

use log::Level;
use rowdom::{
    Color, Dom, DomError, DomEvent, Element, ListenerId, NodeId, ObserverId, Overflow, Position,
    Size, Style,
};

use crate::cache::{MemoryRowCache, RowCache};
use crate::config::ScrollerConfig;
use crate::error::{RowError, ScrollerError};
use crate::heights::RowHeights;
use crate::schedule::RenderScheduler;
use crate::viewport::{Viewport, reveal_offset, visible_window};

/// Builds the element for one row. Called at most once per index until the
/// index is invalidated.
pub type RenderRow = Box<dyn FnMut(&mut Dom, usize) -> Result<NodeId, RowError>>;

/// Receives `(start, end)` after every render pass.
pub type VisibleRangeChange = Box<dyn FnMut(usize, usize)>;

/// Log through the `log` facade, filtered by this scroller's own level.
macro_rules! scroller_log {
    ($scroller:expr, $level:expr, $($arg:tt)+) => {
        if $level <= $scroller.config.log_level {
            log::log!($level, $($arg)+);
        }
    };
}

/// Configures and mounts a [`VirtualScroller`].
pub struct ScrollerBuilder {
    config: ScrollerConfig,
    render_row: Option<RenderRow>,
    on_visible_range_change: Option<VisibleRangeChange>,
    cache: Option<Box<dyn RowCache>>,
}

impl ScrollerBuilder {
    /// Set the row builder. Required.
    pub fn render_row<F>(mut self, render_row: F) -> Self
    where
        F: FnMut(&mut Dom, usize) -> Result<NodeId, RowError> + 'static,
    {
        self.render_row = Some(Box::new(render_row));
        self
    }

    pub fn on_visible_range_change<F>(mut self, callback: F) -> Self
    where
        F: FnMut(usize, usize) + 'static,
    {
        self.on_visible_range_change = Some(Box::new(callback));
        self
    }

    /// Use a custom row cache instead of [`MemoryRowCache`].
    pub fn row_cache(mut self, cache: impl RowCache + 'static) -> Self {
        self.cache = Some(Box::new(cache));
        self
    }

    /// Validate the configuration, build the viewport and content elements
    /// inside `container`, wire up listeners and render the first window.
    pub fn mount(self, dom: &mut Dom, container: NodeId) -> Result<VirtualScroller, ScrollerError> {
        self.config.validate()?;
        let render_row = self
            .render_row
            .ok_or_else(|| ScrollerError::invalid("render_row", "is required"))?;
        if !dom.contains(container) {
            return Err(DomError::NodeNotFound(container).into());
        }

        let heights = RowHeights::new(self.config.row_height, self.config.total_rows);

        // The viewport fills the container, so one observer on the container
        // covers both.
        let viewport = dom.create(
            Element::box_()
                .width(Size::Fill)
                .height(Size::Fill)
                .overflow_y(Overflow::Scroll)
                .data("role", "viewport"),
        );
        let content = dom.create(
            Element::box_()
                .width(Size::Fill)
                .height(Size::Fixed(heights.total_height()))
                .data("role", "content"),
        );
        dom.append_child(viewport, content)?;
        dom.append_child(container, viewport)?;

        let cache: Box<dyn RowCache> = match self.cache {
            Some(cache) => cache,
            None => Box::new(MemoryRowCache::new()),
        };
        let scroll_listener = dom.add_scroll_listener(viewport)?;
        let resize_observer = dom.observe_resize(container)?;

        let mut scroller = VirtualScroller {
            config: self.config,
            container,
            viewport,
            content,
            heights,
            cache,
            visible: BTreeMap::new(),
            window: 0..0,
            render_row,
            on_visible_range_change: self.on_visible_range_change,
            scheduler: RenderScheduler::new(),
            scroll_listener: Some(scroll_listener),
            resize_observer: Some(resize_observer),
            render_count: 0,
            build_count: 0,
            destroyed: false,
        };
        scroller_log!(
            scroller,
            Level::Debug,
            "[VirtualScroller::mount] {} rows of height {} in {container}",
            scroller.heights.len(),
            scroller.config.row_height
        );
        scroller.render(dom)?;
        Ok(scroller)
    }
}

/// Keeps only the rows intersecting the viewport (plus overscan) attached.
///
/// The scroller owns two elements inside the host's container: a viewport
/// that scrolls, and a content element sized to the total row extent. Rows
/// are absolutely positioned children of the content element. Scroll and
/// resize notifications are coalesced into at most one render per frame;
/// the host routes [`DomEvent`]s in through [`VirtualScroller::handle_event`].
pub struct VirtualScroller {
    config: ScrollerConfig,
    container: NodeId,
    viewport: NodeId,
    content: NodeId,
    heights: RowHeights,
    cache: Box<dyn RowCache>,
    /// Rows attached to `content`; keys always equal `window` after a render.
    visible: BTreeMap<usize, NodeId>,
    window: Range<usize>,
    render_row: RenderRow,
    on_visible_range_change: Option<VisibleRangeChange>,
    scheduler: RenderScheduler,
    scroll_listener: Option<ListenerId>,
    resize_observer: Option<ObserverId>,
    render_count: u64,
    build_count: u64,
    destroyed: bool,
}

impl fmt::Debug for VirtualScroller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VirtualScroller")
            .field("container", &self.container)
            .field("viewport", &self.viewport)
            .field("total_rows", &self.heights.len())
            .field("window", &self.window)
            .field("cached", &self.cache.len())
            .field("scheduler", &self.scheduler)
            .field("destroyed", &self.destroyed)
            .finish_non_exhaustive()
    }
}

impl VirtualScroller {
    pub fn builder(config: ScrollerConfig) -> ScrollerBuilder {
        ScrollerBuilder {
            config,
            render_row: None,
            on_visible_range_change: None,
            cache: None,
        }
    }

    fn ensure_alive(&self) -> Result<(), ScrollerError> {
        if self.destroyed {
            Err(ScrollerError::Destroyed)
        } else {
            Ok(())
        }
    }

    // -------------------------------------------------------------------------
    // Rendering
    // -------------------------------------------------------------------------

    fn current_viewport(&self, dom: &Dom) -> Viewport {
        let height = dom.client_size(self.viewport).map_or(0, |(_, h)| h);
        Viewport::new(dom.scroll_top(self.viewport), height)
    }

    /// Recompute the window, detach rows that left it, attach rows that
    /// entered it, then report the window.
    fn render(&mut self, dom: &mut Dom) -> Result<(), ScrollerError> {
        let viewport = self.current_viewport(dom);
        let window = visible_window(&self.heights, viewport, self.config.overscan);

        let leaving: Vec<usize> = self
            .visible
            .keys()
            .copied()
            .filter(|index| !window.contains(index))
            .collect();
        for index in &leaving {
            let Some(node) = self.visible.remove(index) else {
                continue;
            };
            if dom.get(node).and_then(Element::parent) == Some(self.content) {
                dom.remove_child(self.content, node)?;
            }
        }

        let mut entered = 0usize;
        for index in window.clone() {
            if self.visible.contains_key(&index) {
                continue;
            }
            let node = self.row_for(dom, index);
            if let Some(el) = dom.get_mut(node) {
                el.position = Position::Absolute;
                el.top = self.heights.row_top(index);
                el.left = 0;
                el.width = Size::Fill;
                el.height = Size::Fixed(u64::from(self.heights.height_of(index)));
            }
            dom.append_child(self.content, node)?;
            self.visible.insert(index, node);
            entered += 1;
        }

        self.window = window.clone();
        self.render_count += 1;
        scroller_log!(
            self,
            Level::Trace,
            "[VirtualScroller::render] top={} height={} window={}..{} entered={} left={}",
            viewport.scroll_top,
            viewport.height,
            window.start,
            window.end,
            entered,
            leaving.len()
        );

        if let Some(callback) = self.on_visible_range_change.as_mut() {
            callback(window.start, window.end);
        }
        Ok(())
    }

    /// Get-or-compute the element for `index`. A failing builder yields a
    /// cached placeholder; the owner retries with `invalidate_row`.
    fn row_for(&mut self, dom: &mut Dom, index: usize) -> NodeId {
        if let Some(node) = self.cache.get(index) {
            if dom.contains(node) {
                return node;
            }
            scroller_log!(
                self,
                Level::Warn,
                "[VirtualScroller] cached row {index} ({node}) was removed from the tree, rebuilding"
            );
            self.cache.evict(index);
        }

        self.build_count += 1;
        let built = catch_unwind(AssertUnwindSafe(|| (self.render_row)(dom, index)));
        let node = match built {
            Ok(Ok(node)) => match self.reject_row(dom, node) {
                None => node,
                Some(reason) => {
                    scroller_log!(
                        self,
                        Level::Error,
                        "[VirtualScroller] row {index}: builder returned {node}, which {reason}"
                    );
                    placeholder(dom, index)
                }
            },
            Ok(Err(err)) => {
                scroller_log!(self, Level::Error, "[VirtualScroller] row {index}: {err}");
                placeholder(dom, index)
            }
            Err(payload) => {
                scroller_log!(
                    self,
                    Level::Error,
                    "[VirtualScroller] row {index}: builder panicked: {}",
                    panic_message(payload.as_ref())
                );
                placeholder(dom, index)
            }
        };
        self.cache.insert(index, node);
        node
    }

    /// Why a freshly built `node` cannot be attached as a row, if it can't.
    fn reject_row(&self, dom: &Dom, node: NodeId) -> Option<&'static str> {
        let Some(el) = dom.get(node) else {
            return Some("is not in the tree");
        };
        if dom.is_ancestor(node, self.content) {
            return Some("contains the scroller");
        }
        if el.parent().is_some() {
            return Some("is already attached elsewhere");
        }
        None
    }

    // -------------------------------------------------------------------------
    // Event routing
    // -------------------------------------------------------------------------

    /// Route a host event. Scroll and resize notifications for this
    /// scroller schedule a render; its own animation frame performs it.
    ///
    /// Returns `Ok(false)` for events that belong to someone else, and for
    /// every event once destroyed.
    pub fn handle_event(&mut self, dom: &mut Dom, event: &DomEvent) -> Result<bool, ScrollerError> {
        if self.destroyed {
            return Ok(false);
        }
        match *event {
            DomEvent::Scroll { listener, .. } if Some(listener) == self.scroll_listener => {
                self.schedule_render(dom);
                Ok(true)
            }
            DomEvent::Resize { observer, .. } if Some(observer) == self.resize_observer => {
                self.schedule_render(dom);
                Ok(true)
            }
            DomEvent::AnimationFrame { handle } if self.scheduler.take_if(handle) => {
                self.render(dom)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    fn schedule_render(&mut self, dom: &mut Dom) {
        if !self.scheduler.schedule(dom) {
            scroller_log!(
                self,
                Level::Trace,
                "[VirtualScroller] render already pending, coalesced ({} so far)",
                self.scheduler.coalesced()
            );
        }
    }

    // -------------------------------------------------------------------------
    // Public operations
    // -------------------------------------------------------------------------

    /// Change the row count and the content extent. Attached rows are left
    /// alone until the next render.
    pub fn set_total_rows(&mut self, dom: &mut Dom, total_rows: usize) -> Result<(), ScrollerError> {
        self.ensure_alive()?;
        self.heights.resize(total_rows);
        dom.set_height(self.content, Size::Fixed(self.heights.total_height()))?;
        scroller_log!(
            self,
            Level::Debug,
            "[VirtualScroller::set_total_rows] {total_rows} rows, extent {}",
            self.heights.total_height()
        );
        Ok(())
    }

    /// Override the height of one row. The content extent is updated and
    /// every attached row at or below `index` is moved to its new offset.
    pub fn set_row_height(
        &mut self,
        dom: &mut Dom,
        index: usize,
        height: u32,
    ) -> Result<(), ScrollerError> {
        self.ensure_alive()?;
        let previous = self.heights.height_of(index);
        self.heights.set(index, height);
        if previous == height || index >= self.heights.len() {
            return Ok(());
        }

        dom.set_height(self.content, Size::Fixed(self.heights.total_height()))?;
        let affected: Vec<(usize, NodeId)> = self
            .visible
            .range(index..)
            .map(|(&i, &node)| (i, node))
            .collect();
        for (i, node) in affected {
            dom.set_top(node, self.heights.row_top(i))?;
            if i == index {
                dom.set_height(node, Size::Fixed(u64::from(height)))?;
            }
        }
        Ok(())
    }

    /// Detach every row and render again from the caches.
    pub fn refresh(&mut self, dom: &mut Dom) -> Result<(), ScrollerError> {
        self.ensure_alive()?;
        self.visible.clear();
        dom.clear_children(self.content)?;
        self.render(dom)
    }

    /// Drop the cached element for `index`, detaching it if attached. The
    /// next render that includes `index` calls the row builder again.
    pub fn invalidate_row(&mut self, dom: &mut Dom, index: usize) -> Result<(), ScrollerError> {
        self.ensure_alive()?;
        let attached = self.visible.remove(&index);
        let cached = self.cache.evict(index);
        for node in [cached, attached].into_iter().flatten() {
            if dom.contains(node) {
                dom.remove(node)?;
            }
        }
        Ok(())
    }

    /// Invalidate every cached row, e.g. after the backing data was sorted.
    pub fn invalidate_all(&mut self, dom: &mut Dom) -> Result<(), ScrollerError> {
        self.ensure_alive()?;
        self.visible.clear();
        dom.clear_children(self.content)?;
        for (_, node) in self.cache.drain() {
            if dom.contains(node) {
                dom.remove(node)?;
            }
        }
        Ok(())
    }

    /// Scroll the least distance that shows row `index` in full. The scroll
    /// notification takes the normal coalesced path.
    pub fn scroll_into_view(&mut self, dom: &mut Dom, index: usize) -> Result<(), ScrollerError> {
        self.ensure_alive()?;
        let viewport = self.current_viewport(dom);
        if let Some(offset) = reveal_offset(&self.heights, viewport, index) {
            dom.set_scroll_top(self.viewport, offset)?;
        }
        Ok(())
    }

    /// Stop listening and cancel any pending render. Safe to call twice.
    /// Cached elements are left in the tree for the owner to discard.
    pub fn destroy(&mut self, dom: &mut Dom) {
        if self.destroyed {
            return;
        }
        if let Some(listener) = self.scroll_listener.take() {
            dom.remove_scroll_listener(listener);
        }
        if let Some(observer) = self.resize_observer.take() {
            dom.disconnect_observer(observer);
        }
        self.scheduler.cancel(dom);
        self.destroyed = true;
        scroller_log!(self, Level::Debug, "[VirtualScroller::destroy] {}", self.container);
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    pub fn config(&self) -> &ScrollerConfig {
        &self.config
    }

    /// `[start, end)` of the last render pass.
    pub fn visible_range(&self) -> Range<usize> {
        self.window.clone()
    }

    pub fn total_rows(&self) -> usize {
        self.heights.len()
    }

    pub fn row_top(&self, index: usize) -> u64 {
        self.heights.row_top(index)
    }

    pub fn row_height(&self, index: usize) -> u32 {
        self.heights.height_of(index)
    }

    pub fn index_at_offset(&self, offset: u64) -> usize {
        self.heights.index_at_offset(offset)
    }

    pub fn content_height(&self) -> u64 {
        self.heights.total_height()
    }

    /// The host-supplied mount point.
    pub fn container_node(&self) -> NodeId {
        self.container
    }

    /// The scrolling element; hosts scroll this.
    pub fn viewport_node(&self) -> NodeId {
        self.viewport
    }

    pub fn content_node(&self) -> NodeId {
        self.content
    }

    pub fn is_attached(&self, index: usize) -> bool {
        self.visible.contains_key(&index)
    }

    pub fn attached_node(&self, index: usize) -> Option<NodeId> {
        self.visible.get(&index).copied()
    }

    /// Attached row indices in ascending order.
    pub fn attached_rows(&self) -> Vec<usize> {
        self.visible.keys().copied().collect()
    }

    pub fn cached_rows(&self) -> usize {
        self.cache.len()
    }

    pub fn render_scheduled(&self) -> bool {
        self.scheduler.is_scheduled()
    }

    /// Completed render passes.
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    /// Row builder invocations.
    pub fn build_count(&self) -> u64 {
        self.build_count
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

fn placeholder(dom: &mut Dom, index: usize) -> NodeId {
    dom.create(
        Element::text(format!("⚠ row {index} unavailable"))
            .style(Style::new().foreground(Color::rgb(220, 90, 90)).dim())
            .data("placeholder", "true")
            .data("row", index.to_string()),
    )
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
