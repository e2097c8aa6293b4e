use std::fs::File;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{Event as CrosstermEvent, KeyEventKind};
use dbview::{Action, AppError, Args, PageLoader, Table, TableView};
use rowdom::{Dom, Element, Terminal};
use simplelog::{Config, LevelFilter, WriteLogger};
use vscroll::ScrollerConfig;

const FRAME: Duration = Duration::from_millis(16);

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // Log to a file; the terminal is in the alternate screen.
    let log_file = File::create("dbview.log")?;
    WriteLogger::init(LevelFilter::Debug, Config::default(), log_file)?;

    log::info!(
        "[dbview] {} rows, {} rows per page",
        args.rows,
        args.page_size
    );

    let table = Table::generate(args.rows);
    let loader = PageLoader::new(table, args.page_size);
    let config = ScrollerConfig::new(1, args.rows)
        .overscan(10)
        .log_level(LevelFilter::Debug);

    let mut term = Terminal::new()?;
    let (width, height) = term.size();
    let mut dom = Dom::new();
    let root = dom.create(Element::col().id("root"));
    let mut view = TableView::mount(&mut dom, root, loader, config, width, height)?;

    let result = run(&mut term, &mut dom, &mut view);
    view.destroy(&mut dom);
    if let Err(err) = &result {
        log::error!("[dbview] {err}");
    }
    result
}

fn run(term: &mut Terminal, dom: &mut Dom, view: &mut TableView) -> Result<(), AppError> {
    loop {
        for event in term.poll(FRAME)? {
            match event {
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => {
                    if view.handle_key(dom, key)? == Action::Quit {
                        return Ok(());
                    }
                }
                CrosstermEvent::Mouse(mouse) => view.handle_mouse(dom, mouse)?,
                CrosstermEvent::Resize(width, height) => view.resize(dom, width, height)?,
                _ => {}
            }
        }

        dom.advance_frame();
        for event in dom.drain_events() {
            view.handle_event(dom, &event)?;
        }

        view.update_status(dom)?;
        term.draw(dom, view.root())?;
    }
}
