use crate::input::KeyCode;
use crate::input::KeyEvent;

/// Keys that trigger one action, and how the help line names it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Binding {
    pub keys: Vec<KeyEvent>,
    pub help_key: String,
    pub help_desc: String,
}

impl Binding {
    pub fn new(
        help_key: impl Into<String>,
        help_desc: impl Into<String>,
        keys: impl IntoIterator<Item = KeyCode>,
    ) -> Self {
        Self {
            keys: keys.into_iter().map(KeyEvent::new).collect(),
            help_key: help_key.into(),
            help_desc: help_desc.into(),
        }
    }

    /// Exact match: a binding for `d` does not fire on `ctrl-d`.
    pub fn matches(&self, event: &KeyEvent) -> bool {
        self.keys.contains(event)
    }
}

/// Bindings used while browsing rows.
#[derive(Clone, Debug)]
pub struct TableBindings {
    pub edit: Binding,
    pub delete: Binding,
    pub create: Binding,
    pub export: Binding,
    pub filter: Binding,
    pub sort: Binding,
    pub next_page: Binding,
    pub prev_page: Binding,
    pub page_size: Binding,
}

impl Default for TableBindings {
    fn default() -> Self {
        use KeyCode::Char;
        Self {
            edit: Binding::new("e", "edit", [Char('e'), KeyCode::Enter]),
            delete: Binding::new("d", "delete", [Char('d')]),
            create: Binding::new("n", "new", [Char('n')]),
            export: Binding::new("x", "export", [Char('x')]),
            filter: Binding::new("/", "filter", [Char('/')]),
            sort: Binding::new("s", "sort", [Char('s')]),
            next_page: Binding::new("]", "next page", [Char(']')]),
            prev_page: Binding::new("[", "prev page", [Char('[')]),
            page_size: Binding::new("p", "rows/page", [Char('p')]),
        }
    }
}

/// Bindings used inside the row edit modal.
#[derive(Clone, Debug)]
pub struct EditBindings {
    pub next_field: Binding,
    pub prev_field: Binding,
    pub save: Binding,
    pub cancel: Binding,
}

impl Default for EditBindings {
    fn default() -> Self {
        Self {
            next_field: Binding::new("tab", "next field", [KeyCode::Tab, KeyCode::Down]),
            prev_field: Binding::new("S-tab", "prev field", [KeyCode::BackTab, KeyCode::Up]),
            save: Binding::new("enter", "save", [KeyCode::Enter]),
            cancel: Binding::new("esc", "cancel", [KeyCode::Esc]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyModifiers;

    #[test]
    fn binding_ignores_modified_keys() {
        let b = Binding::new("d", "delete", [KeyCode::Char('d')]);
        assert!(b.matches(&KeyEvent::new(KeyCode::Char('d'))));
        let ctrl_d = KeyEvent::new(KeyCode::Char('d')).with_modifiers(KeyModifiers {
            ctrl: true,
            ..KeyModifiers::none()
        });
        assert!(!b.matches(&ctrl_d));
    }

    #[test]
    fn enter_starts_editing_by_default() {
        let b = TableBindings::default();
        assert!(b.edit.matches(&KeyEvent::new(KeyCode::Enter)));
        assert!(b.edit.matches(&KeyEvent::new(KeyCode::Char('e'))));
        assert!(!b.edit.matches(&KeyEvent::new(KeyCode::Char('E'))));
    }
}
