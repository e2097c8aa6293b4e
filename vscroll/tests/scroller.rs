use std::cell::RefCell;
use std::rc::Rc;

use rowdom::{Dom, DomError, Element, NodeId, Position, Size};
use vscroll::{RowError, ScrollerConfig, ScrollerError, VirtualScroller};

/// Builds rows as plain text and records every index it was asked for.
fn recording_rows(
    calls: Rc<RefCell<Vec<usize>>>,
) -> impl FnMut(&mut Dom, usize) -> Result<NodeId, RowError> {
    move |dom: &mut Dom, index: usize| {
        calls.borrow_mut().push(index);
        Ok(dom.create(Element::text(format!("row {index}"))))
    }
}

fn container(dom: &mut Dom, height: u64) -> NodeId {
    let node = dom.create(Element::box_().id("mount"));
    dom.resize(node, 80, height).unwrap();
    node
}

/// 1000 rows of height 30, overscan 5, in an 80x300 container.
fn mounted() -> (Dom, VirtualScroller, Rc<RefCell<Vec<usize>>>) {
    let mut dom = Dom::new();
    let mount = container(&mut dom, 300);
    let calls = Rc::new(RefCell::new(Vec::new()));
    let scroller = VirtualScroller::builder(ScrollerConfig::new(30, 1000).overscan(5))
        .render_row(recording_rows(calls.clone()))
        .mount(&mut dom, mount)
        .unwrap();
    (dom, scroller, calls)
}

/// Route queued events and tick frames until nothing is left.
fn pump(dom: &mut Dom, scroller: &mut VirtualScroller) {
    loop {
        for event in dom.drain_events() {
            scroller.handle_event(dom, &event).unwrap();
        }
        if dom.advance_frame() == 0 && !dom.has_events() {
            break;
        }
    }
}

fn scroll_to(dom: &mut Dom, scroller: &mut VirtualScroller, top: u64) {
    let viewport = scroller.viewport_node();
    dom.set_scroll_top(viewport, top).unwrap();
    pump(dom, scroller);
}

fn assert_rows_positioned(dom: &Dom, scroller: &VirtualScroller) {
    for index in scroller.attached_rows() {
        let node = scroller.attached_node(index).unwrap();
        let el = dom.get(node).unwrap();
        assert_eq!(el.position, Position::Absolute, "row {index}");
        assert_eq!(el.top, scroller.row_top(index), "row {index}");
        assert_eq!(
            el.height,
            Size::Fixed(u64::from(scroller.row_height(index))),
            "row {index}"
        );
        assert_eq!(el.parent(), Some(scroller.content_node()), "row {index}");
    }
}

// ============================================================================
// Mount Tests
// ============================================================================

#[test]
fn test_initial_window() {
    let (dom, scroller, calls) = mounted();

    assert_eq!(scroller.visible_range(), 0..15);
    assert_eq!(scroller.attached_rows(), (0..15).collect::<Vec<_>>());
    assert_eq!(*calls.borrow(), (0..15).collect::<Vec<_>>());
    assert_eq!(scroller.render_count(), 1);
    assert_eq!(dom.children(scroller.content_node()).len(), 15);
    assert_rows_positioned(&dom, &scroller);
}

#[test]
fn test_mount_builds_viewport_and_content() {
    let (dom, scroller, _) = mounted();

    let viewport = scroller.viewport_node();
    let content = scroller.content_node();
    assert_eq!(dom.children(scroller.container_node()), &[viewport]);
    assert_eq!(dom.children(viewport), &[content]);
    assert_eq!(dom.client_size(viewport), Some((80, 300)));
    assert_eq!(dom.get(content).unwrap().height, Size::Fixed(30_000));
    assert_eq!(scroller.content_height(), 30_000);
}

#[test]
fn test_zero_row_height_rejected() {
    let mut dom = Dom::new();
    let mount = container(&mut dom, 300);

    let err = VirtualScroller::builder(ScrollerConfig::new(0, 10))
        .render_row(|dom, _| Ok(dom.create(Element::box_())))
        .mount(&mut dom, mount)
        .unwrap_err();

    assert!(matches!(
        err,
        ScrollerError::InvalidConfiguration {
            field: "row_height",
            ..
        }
    ));
    assert!(dom.children(mount).is_empty(), "nothing mounted on failure");
}

#[test]
fn test_missing_render_row_rejected() {
    let mut dom = Dom::new();
    let mount = container(&mut dom, 300);

    let err = VirtualScroller::builder(ScrollerConfig::new(1, 10))
        .mount(&mut dom, mount)
        .unwrap_err();

    assert!(matches!(
        err,
        ScrollerError::InvalidConfiguration {
            field: "render_row",
            ..
        }
    ));
}

#[test]
fn test_unknown_container_rejected() {
    let mut dom = Dom::new();
    let mount = container(&mut dom, 300);
    dom.remove(mount).unwrap();

    let err = VirtualScroller::builder(ScrollerConfig::new(1, 10))
        .render_row(|dom, _| Ok(dom.create(Element::box_())))
        .mount(&mut dom, mount)
        .unwrap_err();

    assert_eq!(err, ScrollerError::Dom(DomError::NodeNotFound(mount)));
}

#[test]
fn test_empty_container_keeps_only_overscan() {
    let mut dom = Dom::new();
    let mount = dom.create(Element::box_());
    let scroller = VirtualScroller::builder(ScrollerConfig::new(30, 1000).overscan(5))
        .render_row(|dom, _| Ok(dom.create(Element::box_())))
        .mount(&mut dom, mount)
        .unwrap();

    assert_eq!(scroller.visible_range(), 0..5);
}

#[test]
fn test_no_rows() {
    let mut dom = Dom::new();
    let mount = container(&mut dom, 300);
    let scroller = VirtualScroller::builder(ScrollerConfig::new(30, 0))
        .render_row(|_, _| Err(RowError::new("no rows to build")))
        .mount(&mut dom, mount)
        .unwrap();

    assert_eq!(scroller.visible_range(), 0..0);
    assert_eq!(scroller.build_count(), 0);
}

// ============================================================================
// Scroll Tests
// ============================================================================

#[test]
fn test_scroll_moves_window() {
    let (mut dom, mut scroller, _) = mounted();

    scroll_to(&mut dom, &mut scroller, 3000);

    assert_eq!(scroller.visible_range(), 95..115);
    assert_eq!(scroller.attached_rows(), (95..115).collect::<Vec<_>>());
    assert_eq!(dom.children(scroller.content_node()).len(), 20);
    assert_rows_positioned(&dom, &scroller);
}

#[test]
fn test_scroll_inside_row_keeps_partial_rows() {
    let (mut dom, mut scroller, _) = mounted();

    scroll_to(&mut dom, &mut scroller, 3015);

    // Row 100 is half hidden, row 110 is half shown.
    assert_eq!(scroller.visible_range(), 95..116);
}

#[test]
fn test_scroll_is_deferred_to_frame() {
    let (mut dom, mut scroller, _) = mounted();
    let viewport = scroller.viewport_node();

    dom.set_scroll_top(viewport, 3000).unwrap();
    for event in dom.drain_events() {
        assert!(scroller.handle_event(&mut dom, &event).unwrap());
    }

    assert!(scroller.render_scheduled());
    assert_eq!(scroller.visible_range(), 0..15, "nothing rendered yet");

    pump(&mut dom, &mut scroller);
    assert!(!scroller.render_scheduled());
    assert_eq!(scroller.visible_range(), 95..115);
}

#[test]
fn test_scroll_burst_coalesces_into_one_render() {
    let (mut dom, mut scroller, _) = mounted();
    let viewport = scroller.viewport_node();

    for top in (30..=600).step_by(30) {
        dom.set_scroll_top(viewport, top).unwrap();
    }
    for event in dom.drain_events() {
        scroller.handle_event(&mut dom, &event).unwrap();
    }
    assert_eq!(dom.advance_frame(), 1, "one frame for the whole burst");
    for event in dom.drain_events() {
        scroller.handle_event(&mut dom, &event).unwrap();
    }

    assert_eq!(scroller.render_count(), 2);
    assert_eq!(scroller.visible_range(), 15..35);
}

#[test]
fn test_scrolled_back_rows_come_from_cache() {
    let (mut dom, mut scroller, calls) = mounted();

    scroll_to(&mut dom, &mut scroller, 3000);
    let built = scroller.build_count();
    scroll_to(&mut dom, &mut scroller, 0);

    assert_eq!(scroller.build_count(), built);
    assert_eq!(scroller.visible_range(), 0..15);
    let zero_builds = calls.borrow().iter().filter(|&&i| i == 0).count();
    assert_eq!(zero_builds, 1);
}

#[test]
fn test_window_respects_overscan_bounds() {
    let (mut dom, mut scroller, _) = mounted();

    for top in [0, 150, 1234, 15_000, 29_700] {
        scroll_to(&mut dom, &mut scroller, top);
        let range = scroller.visible_range();
        let first = scroller.index_at_offset(top);
        let last = scroller.index_at_offset(top + 299);

        assert!(range.start >= first.saturating_sub(5), "top {top}");
        assert!(range.start <= first, "top {top}");
        assert!(range.end > last, "top {top}");
        assert!(range.end <= (last + 1 + 5).min(1000), "top {top}");
    }
}

#[test]
fn test_scroll_to_end() {
    let (mut dom, mut scroller, _) = mounted();

    scroll_to(&mut dom, &mut scroller, u64::MAX);

    assert_eq!(dom.scroll_top(scroller.viewport_node()), 29_700);
    assert_eq!(scroller.visible_range(), 985..1000);
}

#[test]
fn test_foreign_events_ignored() {
    let (mut dom, mut first, _) = mounted();
    let other_mount = container(&mut dom, 100);
    let mut second = VirtualScroller::builder(ScrollerConfig::new(10, 50))
        .render_row(|dom, _| Ok(dom.create(Element::box_())))
        .mount(&mut dom, other_mount)
        .unwrap();

    dom.set_scroll_top(first.viewport_node(), 300).unwrap();
    for event in dom.drain_events() {
        assert!(!second.handle_event(&mut dom, &event).unwrap());
        assert!(first.handle_event(&mut dom, &event).unwrap());
    }
    dom.advance_frame();
    for event in dom.drain_events() {
        assert!(!second.handle_event(&mut dom, &event).unwrap());
        assert!(first.handle_event(&mut dom, &event).unwrap());
    }

    assert_eq!(second.render_count(), 1);
    assert_eq!(first.render_count(), 2);
}

// ============================================================================
// Resize Tests
// ============================================================================

#[test]
fn test_container_resize_rerenders() {
    let (mut dom, mut scroller, _) = mounted();

    dom.resize(scroller.container_node(), 80, 600).unwrap();
    pump(&mut dom, &mut scroller);

    assert_eq!(scroller.visible_range(), 0..25);
}

#[test]
fn test_resize_and_scroll_share_a_frame() {
    let (mut dom, mut scroller, _) = mounted();

    dom.resize(scroller.container_node(), 80, 150).unwrap();
    dom.set_scroll_top(scroller.viewport_node(), 300).unwrap();
    for event in dom.drain_events() {
        scroller.handle_event(&mut dom, &event).unwrap();
    }

    assert_eq!(dom.advance_frame(), 1);
    pump(&mut dom, &mut scroller);
    assert_eq!(scroller.render_count(), 2);
    assert_eq!(scroller.visible_range(), 5..20);
}

// ============================================================================
// Row Height Tests
// ============================================================================

#[test]
fn test_set_row_height_shifts_following_rows() {
    let (mut dom, mut scroller, _) = mounted();
    let before = scroller.row_top(51);

    scroller.set_row_height(&mut dom, 50, 100).unwrap();

    assert_eq!(scroller.row_top(51), before + 70);
    assert_eq!(scroller.row_top(50), 1500);
    assert_eq!(scroller.content_height(), 30_070);
    assert_eq!(
        dom.get(scroller.content_node()).unwrap().height,
        Size::Fixed(30_070)
    );
}

#[test]
fn test_set_row_height_repositions_attached_rows() {
    let (mut dom, mut scroller, _) = mounted();

    scroller.set_row_height(&mut dom, 3, 90).unwrap();

    assert_rows_positioned(&dom, &scroller);
    let node = scroller.attached_node(4).unwrap();
    assert_eq!(dom.get(node).unwrap().top, 180);
}

#[test]
fn test_set_row_height_beyond_end_applies_on_growth() {
    let (mut dom, mut scroller, _) = mounted();

    scroller.set_row_height(&mut dom, 1200, 60).unwrap();
    assert_eq!(scroller.content_height(), 30_000);

    scroller.set_total_rows(&mut dom, 1500).unwrap();
    assert_eq!(scroller.row_height(1200), 60);
    assert_eq!(scroller.content_height(), 1500 * 30 + 30);
}

#[test]
fn test_set_total_rows_shrinks_extent_and_clamps_window() {
    let (mut dom, mut scroller, _) = mounted();

    scroller.set_total_rows(&mut dom, 500).unwrap();
    assert_eq!(scroller.content_height(), 15_000);
    assert_eq!(scroller.total_rows(), 500);

    scroll_to(&mut dom, &mut scroller, u64::MAX);
    assert_eq!(dom.scroll_top(scroller.viewport_node()), 14_700);
    assert_eq!(scroller.visible_range().end, 500);
}

#[test]
fn test_set_total_rows_does_not_render() {
    let (mut dom, mut scroller, _) = mounted();

    scroller.set_total_rows(&mut dom, 5).unwrap();

    assert_eq!(scroller.render_count(), 1);
    assert_eq!(scroller.visible_range(), 0..15);

    scroller.refresh(&mut dom).unwrap();
    assert_eq!(scroller.visible_range(), 0..5);
    assert_eq!(dom.children(scroller.content_node()).len(), 5);
}

#[test]
fn test_shrink_while_scrolled_pulls_viewport_back() {
    let (mut dom, mut scroller, _) = mounted();
    scroll_to(&mut dom, &mut scroller, 29_700);
    assert_eq!(scroller.visible_range(), 985..1000);

    scroller.set_total_rows(&mut dom, 500).unwrap();
    assert_eq!(dom.scroll_top(scroller.viewport_node()), 14_700);
    assert!(dom.has_events(), "the clamp is reported as a scroll");

    pump(&mut dom, &mut scroller);
    assert_eq!(scroller.visible_range(), 485..500);
    assert_eq!(scroller.attached_rows(), (485..500).collect::<Vec<_>>());
    assert_rows_positioned(&dom, &scroller);
}

#[test]
fn test_container_growth_at_bottom_rerenders() {
    let (mut dom, mut scroller, _) = mounted();
    scroll_to(&mut dom, &mut scroller, 29_700);

    dom.resize(scroller.container_node(), 80, 600).unwrap();
    assert_eq!(dom.scroll_top(scroller.viewport_node()), 29_400);

    pump(&mut dom, &mut scroller);
    assert_eq!(scroller.visible_range(), 975..1000);
}

// ============================================================================
// Refresh & Invalidation Tests
// ============================================================================

#[test]
fn test_refresh_reuses_cache() {
    let (mut dom, mut scroller, _) = mounted();
    let before: Vec<_> = dom.children(scroller.content_node()).to_vec();

    scroller.refresh(&mut dom).unwrap();

    let mut after: Vec<_> = dom.children(scroller.content_node()).to_vec();
    let mut sorted_before = before.clone();
    sorted_before.sort();
    after.sort();
    assert_eq!(after, sorted_before);
    assert_eq!(scroller.build_count(), 15);
    assert_eq!(scroller.render_count(), 2);
}

#[test]
fn test_refresh_twice_is_idempotent() {
    let (mut dom, mut scroller, _) = mounted();
    scroll_to(&mut dom, &mut scroller, 1234);

    scroller.refresh(&mut dom).unwrap();
    let range = scroller.visible_range();
    let nodes: Vec<_> = scroller
        .attached_rows()
        .into_iter()
        .map(|i| scroller.attached_node(i))
        .collect();

    scroller.refresh(&mut dom).unwrap();
    let again: Vec<_> = scroller
        .attached_rows()
        .into_iter()
        .map(|i| scroller.attached_node(i))
        .collect();

    assert_eq!(scroller.visible_range(), range);
    assert_eq!(again, nodes);
    assert_eq!(dom.children(scroller.content_node()).len(), range.len());
}

#[test]
fn test_invalidate_row_rebuilds_once() {
    let (mut dom, mut scroller, calls) = mounted();
    scroll_to(&mut dom, &mut scroller, 1200);
    assert!(scroller.visible_range().contains(&42));
    let old = scroller.attached_node(42).unwrap();
    calls.borrow_mut().clear();

    scroller.invalidate_row(&mut dom, 42).unwrap();
    assert!(!dom.contains(old));
    assert!(!scroller.is_attached(42));

    scroller.refresh(&mut dom).unwrap();

    assert_eq!(*calls.borrow(), vec![42]);
    assert!(scroller.is_attached(42));
    assert_ne!(scroller.attached_node(42), Some(old));
}

#[test]
fn test_invalidate_detached_row() {
    let (mut dom, mut scroller, calls) = mounted();
    scroll_to(&mut dom, &mut scroller, 3000);
    calls.borrow_mut().clear();

    scroller.invalidate_row(&mut dom, 3).unwrap();
    scroll_to(&mut dom, &mut scroller, 0);

    assert_eq!(*calls.borrow(), vec![3]);
}

#[test]
fn test_invalidate_reuses_arena_slots() {
    let (mut dom, mut scroller, _) = mounted();
    let live = dom.len();
    let capacity = dom.capacity();

    for _ in 0..1000 {
        scroller.invalidate_row(&mut dom, 3).unwrap();
        scroller.refresh(&mut dom).unwrap();
    }

    assert_eq!(dom.len(), live);
    assert_eq!(dom.capacity(), capacity);
    assert_eq!(scroller.build_count(), 15 + 1000);
}

#[test]
fn test_invalidate_all() {
    let (mut dom, mut scroller, calls) = mounted();
    calls.borrow_mut().clear();

    scroller.invalidate_all(&mut dom).unwrap();
    assert_eq!(scroller.cached_rows(), 0);
    assert!(dom.children(scroller.content_node()).is_empty());

    scroller.refresh(&mut dom).unwrap();
    assert_eq!(*calls.borrow(), (0..15).collect::<Vec<_>>());
}

#[test]
fn test_callback_fires_every_render() {
    let mut dom = Dom::new();
    let mount = container(&mut dom, 300);
    let ranges = Rc::new(RefCell::new(Vec::new()));
    let seen = ranges.clone();
    let mut scroller = VirtualScroller::builder(ScrollerConfig::new(30, 1000).overscan(5))
        .render_row(|dom, _| Ok(dom.create(Element::box_())))
        .on_visible_range_change(move |start, end| seen.borrow_mut().push((start, end)))
        .mount(&mut dom, mount)
        .unwrap();

    scroller.refresh(&mut dom).unwrap();
    scroll_to(&mut dom, &mut scroller, 3000);

    assert_eq!(*ranges.borrow(), vec![(0, 15), (0, 15), (95, 115)]);
}

// ============================================================================
// Failure Isolation Tests
// ============================================================================

fn is_placeholder(dom: &Dom, node: NodeId) -> bool {
    dom.get(node)
        .and_then(|el| el.get_data("placeholder"))
        .is_some_and(|v| v == "true")
}

#[test]
fn test_failed_row_becomes_placeholder() {
    let mut dom = Dom::new();
    let mount = container(&mut dom, 300);
    let scroller = VirtualScroller::builder(ScrollerConfig::new(30, 1000))
        .render_row(|dom, index| {
            if index == 3 {
                return Err(RowError::from("backing record missing"));
            }
            Ok(dom.create(Element::text(format!("row {index}"))))
        })
        .mount(&mut dom, mount)
        .unwrap();

    assert_eq!(scroller.visible_range(), 0..15);
    assert!(is_placeholder(&dom, scroller.attached_node(3).unwrap()));
    assert!(!is_placeholder(&dom, scroller.attached_node(2).unwrap()));
    assert_rows_positioned(&dom, &scroller);
}

#[test]
fn test_panicking_row_becomes_placeholder() {
    let mut dom = Dom::new();
    let mount = container(&mut dom, 300);
    let scroller = VirtualScroller::builder(ScrollerConfig::new(30, 1000))
        .render_row(|dom, index| {
            if index == 7 {
                panic!("row 7 exploded");
            }
            Ok(dom.create(Element::text(format!("row {index}"))))
        })
        .mount(&mut dom, mount)
        .unwrap();

    assert!(is_placeholder(&dom, scroller.attached_node(7).unwrap()));
    assert_eq!(scroller.attached_rows().len(), 15);
}

#[test]
fn test_unknown_node_becomes_placeholder() {
    let mut dom = Dom::new();
    let mount = container(&mut dom, 300);
    let scroller = VirtualScroller::builder(ScrollerConfig::new(30, 1000))
        .render_row(|dom, _| {
            let node = dom.create(Element::box_());
            dom.remove(node)?;
            Ok(node)
        })
        .mount(&mut dom, mount)
        .unwrap();

    for index in scroller.attached_rows() {
        assert!(is_placeholder(&dom, scroller.attached_node(index).unwrap()));
    }
}

#[test]
fn test_shared_node_becomes_placeholder() {
    let mut dom = Dom::new();
    let mount = container(&mut dom, 300);
    let shared = dom.create(Element::text("shared"));
    let scroller = VirtualScroller::builder(ScrollerConfig::new(30, 1000))
        .render_row(move |_, _| Ok(shared))
        .mount(&mut dom, mount)
        .unwrap();

    assert_eq!(scroller.attached_node(0), Some(shared));
    for index in 1..15 {
        assert!(is_placeholder(&dom, scroller.attached_node(index).unwrap()));
    }
    assert_eq!(dom.children(scroller.content_node()).len(), 15);
    assert_rows_positioned(&dom, &scroller);
}

#[test]
fn test_own_container_becomes_placeholder() {
    let mut dom = Dom::new();
    let mount = container(&mut dom, 300);
    let scroller = VirtualScroller::builder(ScrollerConfig::new(30, 1000))
        .render_row(move |_, _| Ok(mount))
        .mount(&mut dom, mount)
        .unwrap();

    for index in scroller.attached_rows() {
        assert!(is_placeholder(&dom, scroller.attached_node(index).unwrap()));
    }
    assert_eq!(dom.children(mount), &[scroller.viewport_node()]);
    assert_eq!(dom.children(scroller.content_node()).len(), 15);
}

#[test]
fn test_invalidate_retries_failed_row() {
    let mut dom = Dom::new();
    let mount = container(&mut dom, 300);
    let fail = Rc::new(RefCell::new(true));
    let failing = fail.clone();
    let mut scroller = VirtualScroller::builder(ScrollerConfig::new(30, 1000))
        .render_row(move |dom, index| {
            if index == 2 && *failing.borrow() {
                return Err("not loaded yet".into());
            }
            Ok(dom.create(Element::text(format!("row {index}"))))
        })
        .mount(&mut dom, mount)
        .unwrap();

    scroller.refresh(&mut dom).unwrap();
    assert!(is_placeholder(&dom, scroller.attached_node(2).unwrap()));

    *fail.borrow_mut() = false;
    scroller.invalidate_row(&mut dom, 2).unwrap();
    scroller.refresh(&mut dom).unwrap();
    assert!(!is_placeholder(&dom, scroller.attached_node(2).unwrap()));
}

// ============================================================================
// Scroll Into View Tests
// ============================================================================

#[test]
fn test_scroll_into_view_below() {
    let (mut dom, mut scroller, _) = mounted();

    scroller.scroll_into_view(&mut dom, 200).unwrap();
    pump(&mut dom, &mut scroller);

    assert_eq!(dom.scroll_top(scroller.viewport_node()), 6030 - 300);
    assert!(scroller.visible_range().contains(&200));
}

#[test]
fn test_scroll_into_view_above() {
    let (mut dom, mut scroller, _) = mounted();
    scroll_to(&mut dom, &mut scroller, 3000);

    scroller.scroll_into_view(&mut dom, 40).unwrap();
    pump(&mut dom, &mut scroller);

    assert_eq!(dom.scroll_top(scroller.viewport_node()), 1200);
}

#[test]
fn test_scroll_into_view_visible_is_noop() {
    let (mut dom, mut scroller, _) = mounted();

    scroller.scroll_into_view(&mut dom, 5).unwrap();

    assert!(!dom.has_events());
    assert_eq!(dom.scroll_top(scroller.viewport_node()), 0);
}

// ============================================================================
// Destroy Tests
// ============================================================================

#[test]
fn test_destroy_stops_rendering() {
    let (mut dom, mut scroller, _) = mounted();
    let viewport = scroller.viewport_node();

    scroller.destroy(&mut dom);
    dom.set_scroll_top(viewport, 3000).unwrap();
    dom.dispatch_scroll(viewport).unwrap();
    pump(&mut dom, &mut scroller);

    assert!(scroller.is_destroyed());
    assert_eq!(scroller.render_count(), 1);
    assert_eq!(scroller.visible_range(), 0..15);
}

#[test]
fn test_destroy_cancels_pending_render() {
    let (mut dom, mut scroller, _) = mounted();

    dom.set_scroll_top(scroller.viewport_node(), 3000).unwrap();
    for event in dom.drain_events() {
        scroller.handle_event(&mut dom, &event).unwrap();
    }
    assert!(scroller.render_scheduled());

    scroller.destroy(&mut dom);

    assert!(!scroller.render_scheduled());
    assert_eq!(dom.advance_frame(), 0);
}

#[test]
fn test_destroy_is_idempotent() {
    let (mut dom, mut scroller, _) = mounted();

    scroller.destroy(&mut dom);
    scroller.destroy(&mut dom);

    assert!(scroller.is_destroyed());
}

#[test]
fn test_mutators_fail_after_destroy() {
    let (mut dom, mut scroller, _) = mounted();
    scroller.destroy(&mut dom);

    assert_eq!(scroller.refresh(&mut dom), Err(ScrollerError::Destroyed));
    assert_eq!(
        scroller.set_total_rows(&mut dom, 10),
        Err(ScrollerError::Destroyed)
    );
    assert_eq!(
        scroller.set_row_height(&mut dom, 0, 10),
        Err(ScrollerError::Destroyed)
    );
    assert_eq!(
        scroller.invalidate_row(&mut dom, 0),
        Err(ScrollerError::Destroyed)
    );
}
