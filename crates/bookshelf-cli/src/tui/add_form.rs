use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::palette::Palette;
use super::{centered_rect, AddField, AddForm};

/// Render the add-book form over the current view.
pub fn render(frame: &mut Frame, form: &AddForm, palette: &Palette) {
    let area = centered_rect(60, 40, frame.area());
    frame.render_widget(Clear, area);

    let row = |field: AddField, label: &'static str, value: String| {
        let focused = form.field == field;
        let label_style = if focused {
            palette.title()
        } else {
            palette.muted()
        };
        let cursor = if focused && field != AddField::Genre {
            "▏"
        } else {
            ""
        };
        Line::from(vec![
            Span::styled(label, label_style),
            Span::styled(format!("{}{}", value, cursor), palette.base()),
        ])
    };

    let genre = form.genre();
    let mut lines = vec![
        row(AddField::Title, "Title:  ", form.title.clone()),
        row(AddField::Author, "Author: ", form.author.clone()),
        row(AddField::Genre, "Genre:  ", format!("◂ {} ▸", genre.label())),
        Line::default(),
        Line::from(Span::styled(
            "Tab Next field  ←/→ Genre  Enter Add  Esc Cancel",
            palette.muted(),
        )),
    ];
    if let Some(error) = form.error.as_deref() {
        lines.push(Line::from(Span::styled(
            error,
            palette.base().fg(palette.error),
        )));
    }

    let modal = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Add book")
            .border_style(palette.title())
            .style(palette.base()),
    );
    frame.render_widget(modal, area);
}
