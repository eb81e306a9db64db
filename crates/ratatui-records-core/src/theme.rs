use ratatui::style::Style;

#[derive(Clone, Debug)]
pub struct Theme {
    pub text_primary: Style,
    pub text_muted: Style,
    pub accent: Style,
    pub danger: Style,
    pub success: Style,
    /// Border and title of the row edit modal.
    pub modal: Style,
    /// Focused field inside the row edit modal.
    pub field_focus: Style,
    pub button: Style,
    pub button_disabled: Style,
}

impl Default for Theme {
    fn default() -> Self {
        use ratatui::style::Stylize;

        Self {
            text_primary: Style::default(),
            text_muted: Style::default().dark_gray(),
            accent: Style::default().cyan(),
            danger: Style::default().red(),
            success: Style::default().green(),
            modal: Style::default().cyan(),
            field_focus: Style::default().underlined(),
            button: Style::default().black().on_cyan(),
            button_disabled: Style::default().dark_gray(),
        }
    }
}
