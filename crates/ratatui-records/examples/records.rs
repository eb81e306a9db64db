use crossterm::event::Event;
use crossterm::event::KeyCode;
use crossterm::event::KeyEventKind;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Widget;
use ratatui_records::crossterm_input::from_crossterm;
use ratatui_records::record::records_from_json;
use ratatui_records::sample::sample_records;
use ratatui_records::table::RecordTable;
use ratatui_records::table::TableAction;
use ratatui_records::theme::Theme;
use std::io;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn main() -> io::Result<()> {
    // Logs go to stderr so they do not fight the alternate screen: `RUST_LOG=debug ... 2>log`.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let records = match std::env::args().nth(1) {
        Some(path) => {
            let json = std::fs::read_to_string(&path)?;
            records_from_json(&json).map_err(io::Error::other)?
        }
        None => sample_records(),
    };

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let theme = Theme::default();
    let mut table = RecordTable::new(records);

    let res = run(&mut terminal, &theme, &mut table);

    disable_raw_mode()?;
    crossterm::execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    res
}

fn run<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    theme: &Theme,
    table: &mut RecordTable,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| {
            let area = f.area();
            let block = Block::default()
                .title("Accounts (q to quit)")
                .borders(Borders::ALL);
            let inner = block.inner(area);
            block.render(area, f.buffer_mut());

            if let Some((x, y)) = table.render(inner, f.buffer_mut(), theme) {
                f.set_cursor_position((x, y));
            }
        })?;

        if !crossterm::event::poll(Duration::from_millis(50))? {
            continue;
        }
        let ev = crossterm::event::read()?;
        if let Event::Key(key) = &ev {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            let browsing = !table.is_editing() && !table.is_filtering();
            if browsing && key.code == KeyCode::Char('q') {
                return Ok(());
            }
        }

        let Some(ev) = from_crossterm(ev) else {
            continue;
        };
        match table.handle_event(ev) {
            TableAction::CommitBlocked(blocked) => {
                tracing::info!(%blocked, "save refused");
            }
            TableAction::Rejected(msg) => {
                tracing::info!(%msg, "save rejected");
            }
            _ => {}
        }
    }
}
