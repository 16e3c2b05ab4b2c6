use bookshelf_core::Rating;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::palette::Palette;
use super::{centered_rect, ReviewForm};

/// Render the review modal over the current view.
pub fn render(frame: &mut Frame, form: &ReviewForm, message: Option<&str>, palette: &Palette) {
    let area = centered_rect(60, 40, frame.area());
    frame.render_widget(Clear, area);

    let stars = match form.rating {
        Some(value) => Rating::new(value)
            .map(|r| r.stars())
            .unwrap_or_else(|_| value.to_string()),
        None => "not rated".to_string(),
    };

    let mut lines = vec![
        Line::from(Span::styled(form.title.as_str(), palette.title())),
        Line::default(),
        Line::from(vec![
            Span::styled("Rating:  ", palette.muted()),
            Span::styled(stars, palette.base().fg(palette.accent)),
        ]),
        Line::from(vec![
            Span::styled("Comment: ", palette.muted()),
            Span::styled(format!("{}▏", form.comment), palette.base()),
        ]),
        Line::default(),
        Line::from(Span::styled(
            "←/→ Rating  Del Unrate  Enter Save  Esc Cancel",
            palette.muted(),
        )),
    ];
    if let Some(message) = message {
        lines.push(Line::from(Span::styled(
            message,
            palette.base().fg(palette.error),
        )));
    }

    let modal = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Review")
            .border_style(palette.title())
            .style(palette.base()),
    );
    frame.render_widget(modal, area);
}
