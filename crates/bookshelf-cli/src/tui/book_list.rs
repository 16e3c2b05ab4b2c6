use bookshelf_core::{Book, KeyValueStore, StatusFilter};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs};

use super::palette::Palette;
use super::{App, Mode};

/// Render the main book list view.
pub fn render<S: KeyValueStore>(frame: &mut Frame, app: &App<'_, S>, palette: &Palette) {
    let area = frame.area();
    frame.render_widget(Block::default().style(palette.base()), area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title and stats
            Constraint::Length(3), // Filter tabs and search
            Constraint::Min(5),    // Books
            Constraint::Length(3), // Help or message
        ])
        .split(area);

    render_title(frame, app, palette, chunks[0]);
    render_controls(frame, app, palette, chunks[1]);
    render_books(frame, app, palette, chunks[2]);
    render_footer(frame, app, palette, chunks[3]);
}

fn render_title<S: KeyValueStore>(
    frame: &mut Frame,
    app: &App<'_, S>,
    palette: &Palette,
    area: Rect,
) {
    let stats = app.library.stats();
    let title = Paragraph::new(format!(
        "Bookshelf    {} books  {} read  {} pending",
        stats.total, stats.read, stats.pending
    ))
    .style(palette.title())
    .block(Block::default().borders(Borders::ALL).style(palette.base()));
    frame.render_widget(title, area);
}

fn render_controls<S: KeyValueStore>(
    frame: &mut Frame,
    app: &App<'_, S>,
    palette: &Palette,
    area: Rect,
) {
    let halves = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    let selected = StatusFilter::ALL
        .iter()
        .position(|f| *f == app.library.filter())
        .unwrap_or(0);
    let tabs = Tabs::new(vec!["All", "Read", "Pending"])
        .select(selected)
        .style(palette.muted())
        .highlight_style(palette.title())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Filter [f]")
                .style(palette.base()),
        );
    frame.render_widget(tabs, halves[0]);

    let search = app.library.search();
    let searching = app.mode == Mode::Search;
    let cursor = if searching { "▏" } else { "" };
    let field = |on: bool, name: &'static str| {
        if on {
            Span::styled(name, palette.title())
        } else {
            Span::styled(name, palette.muted())
        }
    };
    let line = Line::from(vec![
        Span::styled(format!("{}{}", search.text, cursor), palette.base()),
        Span::raw("   "),
        field(search.options.title, "1 title "),
        field(search.options.author, "2 author "),
        field(search.options.genre, "3 genre"),
    ]);
    let border = if searching {
        palette.title()
    } else {
        palette.base()
    };
    let search_box = Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Search [/]")
            .border_style(border)
            .style(palette.base()),
    );
    frame.render_widget(search_box, halves[1]);
}

fn book_item<'a>(book: &'a Book, palette: &Palette) -> ListItem<'a> {
    let (mark, mark_style) = if book.is_read {
        ("✔ ", palette.base().fg(palette.read))
    } else {
        ("○ ", palette.muted())
    };

    let mut first = vec![
        Span::styled(mark, mark_style),
        Span::styled(book.title.as_str(), palette.base().add_modifier(Modifier::BOLD)),
        Span::styled(format!("  by {}", book.author), palette.base()),
        Span::styled(format!("  [{}]", book.genre.label()), palette.muted()),
    ];
    if let Some(rating) = book.effective_rating() {
        first.push(Span::styled(
            format!("  {}", rating.stars()),
            palette.base().fg(palette.accent),
        ));
    }

    let mut lines = vec![Line::from(first)];
    if let Some(comment) = book.comment.as_deref() {
        lines.push(Line::from(Span::styled(
            format!("    \"{}\"", comment),
            palette.muted().add_modifier(Modifier::ITALIC),
        )));
    }
    ListItem::new(lines)
}

fn render_books<S: KeyValueStore>(
    frame: &mut Frame,
    app: &App<'_, S>,
    palette: &Palette,
    area: Rect,
) {
    let visible = app.library.visible_books();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Books ({})", visible.len()))
        .style(palette.base());

    if visible.is_empty() {
        let empty = Paragraph::new("No books to show. Press [a] to add one.")
            .style(palette.muted())
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let items: Vec<ListItem> = visible.iter().map(|book| book_item(book, palette)).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(palette.highlight());

    let mut state = ListState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_footer<S: KeyValueStore>(
    frame: &mut Frame,
    app: &App<'_, S>,
    palette: &Palette,
    area: Rect,
) {
    let footer = match (&app.message, &app.mode) {
        (Some(message), _) => Paragraph::new(message.as_str()).style(palette.title()),
        (None, Mode::Search) => {
            Paragraph::new("  Type to search  Enter/Esc Done").style(palette.muted())
        }
        (None, _) => Paragraph::new(
            "  ↑/k ↓/j Move  Space Read  r Review  a Add  d Delete  f Filter  / Search  c Clear  t Theme  q Quit",
        )
        .style(palette.muted()),
    };
    frame.render_widget(
        footer.block(Block::default().borders(Borders::ALL).style(palette.base())),
        area,
    );
}
