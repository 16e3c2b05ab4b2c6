use std::io;
use std::mem;

use anyhow::Result;
use bookshelf_core::{BookDraft, BookId, Genre, KeyValueStore, Library, Rating, SearchQuery};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;

pub mod add_form;
pub mod book_list;
pub mod palette;
pub mod review_modal;

/// What the keyboard is currently driving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Browse,
    /// Typing into the search box.
    Search,
    Review(ReviewForm),
    Add(AddForm),
}

/// Draft review for one read book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewForm {
    pub book_id: BookId,
    pub title: String,
    pub rating: Option<u8>,
    pub comment: String,
}

/// Which input of the add form has focus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AddField {
    #[default]
    Title,
    Author,
    Genre,
}

impl AddField {
    const fn next(self) -> Self {
        match self {
            Self::Title => Self::Author,
            Self::Author => Self::Genre,
            Self::Genre => Self::Title,
        }
    }

    const fn prev(self) -> Self {
        match self {
            Self::Title => Self::Genre,
            Self::Author => Self::Title,
            Self::Genre => Self::Author,
        }
    }
}

/// The new-book form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddForm {
    pub title: String,
    pub author: String,
    /// Index into [`Genre::ALL`].
    pub genre: usize,
    pub field: AddField,
    pub error: Option<String>,
}

impl AddForm {
    #[must_use]
    pub fn genre(&self) -> Genre {
        Genre::ALL
            .get(self.genre)
            .cloned()
            .unwrap_or(Genre::Other)
    }
}

/// Application state for the library TUI.
#[derive(Debug)]
pub struct App<'a, S: KeyValueStore> {
    pub library: &'a mut Library<S>,
    pub mode: Mode,
    /// Index into the visible books.
    pub selected: usize,
    /// One-shot status message, cleared on the next key.
    pub message: Option<String>,
    pub should_quit: bool,
}

impl<'a, S: KeyValueStore> App<'a, S> {
    pub fn new(library: &'a mut Library<S>) -> Self {
        Self {
            library,
            mode: Mode::Browse,
            selected: 0,
            message: None,
            should_quit: false,
        }
    }

    /// The id of the highlighted book, if the visible list is non-empty.
    pub fn selected_id(&self) -> Option<BookId> {
        self.library
            .visible_books()
            .get(self.selected)
            .map(|b| b.id.clone())
    }

    pub fn handle_key(&mut self, key: KeyCode) {
        self.message = None;
        let failures = self.library.save_failures();
        let mode = mem::replace(&mut self.mode, Mode::Browse);
        self.mode = match mode {
            Mode::Browse => self.handle_browse_key(key),
            Mode::Search => self.handle_search_key(key),
            Mode::Review(form) => self.handle_review_key(form, key),
            Mode::Add(form) => self.handle_add_key(form, key),
        };
        if self.library.save_failures() > failures {
            self.message = Some(match self.message.take() {
                Some(message) => format!("{} (not saved: storage write failed)", message),
                None => "Not saved: storage write failed".to_string(),
            });
        }
        self.clamp_selection();
    }

    fn handle_browse_key(&mut self, key: KeyCode) -> Mode {
        let visible = self.library.visible_books().len();

        match key {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => {
                if self.selected + 1 < visible {
                    self.selected += 1;
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = self.selected.saturating_sub(1);
            }
            KeyCode::Char('g') | KeyCode::Home => self.selected = 0,
            KeyCode::Char('G') | KeyCode::End => self.selected = visible.saturating_sub(1),
            KeyCode::Char(' ' | 'x') => self.toggle_selected(),
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Char('f') => {
                let next = self.library.filter().next();
                self.library.set_filter(next);
                self.selected = 0;
            }
            KeyCode::Char('/') => return Mode::Search,
            KeyCode::Char('c') => {
                self.library.set_search(SearchQuery::default());
                self.selected = 0;
            }
            KeyCode::Char(c @ ('1' | '2' | '3')) => self.toggle_search_field(c),
            KeyCode::Char('t') => {
                let theme = self.library.toggle_theme();
                self.message = Some(format!("Theme: {}", theme));
            }
            KeyCode::Char('r') => return self.open_review(),
            KeyCode::Char('a') => return Mode::Add(AddForm::default()),
            _ => {}
        }
        Mode::Browse
    }

    fn handle_search_key(&mut self, key: KeyCode) -> Mode {
        match key {
            KeyCode::Esc | KeyCode::Enter => return Mode::Browse,
            KeyCode::Backspace => {
                let mut text = self.library.search().text.clone();
                text.pop();
                self.library.set_search_text(text);
                self.selected = 0;
            }
            KeyCode::Char(c) => {
                let mut text = self.library.search().text.clone();
                text.push(c);
                self.library.set_search_text(text);
                self.selected = 0;
            }
            _ => {}
        }
        Mode::Search
    }

    fn handle_review_key(&mut self, mut form: ReviewForm, key: KeyCode) -> Mode {
        match key {
            KeyCode::Esc => {
                self.message = Some("Review discarded".to_string());
                return Mode::Browse;
            }
            KeyCode::Enter => return self.submit_review(form),
            KeyCode::Left => {
                form.rating = match form.rating {
                    Some(0) | None => None,
                    Some(n) => Some(n - 1),
                };
            }
            KeyCode::Right => {
                form.rating = match form.rating {
                    None => Some(0),
                    Some(n) => Some((n + 1).min(Rating::MAX)),
                };
            }
            KeyCode::Delete => form.rating = None,
            KeyCode::Backspace => {
                form.comment.pop();
            }
            KeyCode::Char(c) => form.comment.push(c),
            _ => {}
        }
        Mode::Review(form)
    }

    fn handle_add_key(&mut self, mut form: AddForm, key: KeyCode) -> Mode {
        match key {
            KeyCode::Esc => return Mode::Browse,
            KeyCode::Enter => return self.submit_add(form),
            KeyCode::Tab | KeyCode::Down => form.field = form.field.next(),
            KeyCode::BackTab | KeyCode::Up => form.field = form.field.prev(),
            KeyCode::Left if form.field == AddField::Genre => {
                form.genre = (form.genre + Genre::ALL.len() - 1) % Genre::ALL.len();
            }
            KeyCode::Right if form.field == AddField::Genre => {
                form.genre = (form.genre + 1) % Genre::ALL.len();
            }
            KeyCode::Backspace => match form.field {
                AddField::Title => {
                    form.title.pop();
                }
                AddField::Author => {
                    form.author.pop();
                }
                AddField::Genre => {}
            },
            KeyCode::Char(c) => match form.field {
                AddField::Title => form.title.push(c),
                AddField::Author => form.author.push(c),
                AddField::Genre => {}
            },
            _ => {}
        }
        Mode::Add(form)
    }

    fn toggle_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        self.message = Some(match self.library.toggle_read(&id) {
            Ok(true) => "Marked as read".to_string(),
            Ok(false) => "Marked as pending".to_string(),
            Err(e) => e.to_string(),
        });
    }

    fn delete_selected(&mut self) {
        let Some(id) = self.selected_id() else {
            return;
        };
        self.message = Some(match self.library.delete_book(&id) {
            Ok(book) => format!("Deleted \"{}\"", book.title),
            Err(e) => e.to_string(),
        });
    }

    fn toggle_search_field(&mut self, field: char) {
        let mut options = self.library.search().options;
        match field {
            '1' => options.title = !options.title,
            '2' => options.author = !options.author,
            _ => options.genre = !options.genre,
        }
        self.library.set_search_options(options);
        self.selected = 0;
    }

    fn open_review(&mut self) -> Mode {
        let Some(id) = self.selected_id() else {
            return Mode::Browse;
        };
        match self.library.get(&id) {
            Some(book) if book.is_read => Mode::Review(ReviewForm {
                book_id: book.id.clone(),
                title: book.title.clone(),
                rating: book.rating.map(Rating::value),
                comment: book.comment.clone().unwrap_or_default(),
            }),
            Some(_) => {
                self.message = Some("Mark the book as read before reviewing it".to_string());
                Mode::Browse
            }
            None => Mode::Browse,
        }
    }

    fn submit_review(&mut self, form: ReviewForm) -> Mode {
        let rating = match form.rating.map(Rating::new).transpose() {
            Ok(rating) => rating,
            Err(e) => {
                self.message = Some(e.to_string());
                return Mode::Review(form);
            }
        };
        match self
            .library
            .set_review(&form.book_id, rating, Some(form.comment.clone()))
        {
            Ok(()) => {
                self.message = Some(format!("Saved review of \"{}\"", form.title));
                Mode::Browse
            }
            Err(e) => {
                self.message = Some(e.to_string());
                Mode::Review(form)
            }
        }
    }

    fn submit_add(&mut self, mut form: AddForm) -> Mode {
        let draft = BookDraft::new(&form.title, &form.author, form.genre().key());
        match draft.validate() {
            Ok(new_book) => {
                let title = self.library.add_book(new_book).title.clone();
                self.selected = 0;
                self.message = Some(format!("Added \"{}\"", title));
                Mode::Browse
            }
            Err(e) => {
                form.error = Some(e.to_string());
                Mode::Add(form)
            }
        }
    }

    fn clamp_selection(&mut self) {
        let visible = self.library.visible_books().len();
        if self.selected >= visible {
            self.selected = visible.saturating_sub(1);
        }
    }
}

/// Run the library TUI.
///
/// Sets up the terminal, runs the main event loop, and restores the terminal
/// on exit (including on error).
pub fn run_tui<S: KeyValueStore>(library: &mut Library<S>) -> Result<()> {
    let app = App::new(library);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the event loop, capturing any error so we can restore the terminal
    let result = run_event_loop(&mut terminal, app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop<S: KeyValueStore>(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App<'_, S>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, &app))?;

        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
                {
                    return Ok(());
                }
                app.handle_key(key.code);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn render<S: KeyValueStore>(frame: &mut Frame, app: &App<'_, S>) {
    let palette = palette::Palette::for_theme(app.library.theme());
    book_list::render(frame, app, &palette);
    match &app.mode {
        Mode::Review(form) => review_modal::render(frame, form, app.message.as_deref(), &palette),
        Mode::Add(form) => add_form::render(frame, form, &palette),
        Mode::Browse | Mode::Search => {}
    }
}

/// A rectangle of the given percentage size, centred in `area`.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
