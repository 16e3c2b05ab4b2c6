use bookshelf_core::Theme;
use ratatui::style::{Color, Modifier, Style};

/// Colours for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub read: Color,
    pub error: Color,
    pub selection: Color,
}

impl Palette {
    #[must_use]
    pub const fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                background: Color::White,
                text: Color::Black,
                muted: Color::DarkGray,
                accent: Color::Blue,
                read: Color::Green,
                error: Color::Red,
                selection: Color::LightBlue,
            },
            Theme::Dark => Self {
                background: Color::Black,
                text: Color::White,
                muted: Color::Gray,
                accent: Color::Cyan,
                read: Color::LightGreen,
                error: Color::LightRed,
                selection: Color::DarkGray,
            },
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }

    pub fn muted(&self) -> Style {
        self.base().fg(self.muted)
    }

    pub fn title(&self) -> Style {
        self.base().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn highlight(&self) -> Style {
        Style::default()
            .bg(self.selection)
            .fg(self.text)
            .add_modifier(Modifier::BOLD)
    }
}
