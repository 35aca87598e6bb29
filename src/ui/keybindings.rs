//! Centralized keyboard shortcuts registry.
//!
//! Single source of truth for the shortcuts shown in the help dialog and the
//! status bar hints.

use crossterm::event::KeyCode;

/// A keyboard shortcut definition
#[derive(Debug, Clone)]
pub struct Shortcut {
    /// Primary key for this shortcut
    pub key: KeyCode,
    /// Alternative key (e.g., arrow key)
    pub alt_key: Option<KeyCode>,
    /// Human-readable description of what this shortcut does
    pub description: &'static str,
    /// Category for grouping in help
    pub category: ShortcutCategory,
    /// Context where this shortcut is active
    pub context: ShortcutContext,
}

/// Categories for organizing shortcuts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutCategory {
    General,
    Navigation,
    Actions,
}

/// Contexts where shortcuts are active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutContext {
    /// Tracker view with the checklist focused
    Checklist,
    /// Tracker view while editing customer info
    CustomerForm,
    /// Objections reference view
    Objections,
    /// Manual copy dialog (clipboard fallback)
    ManualCopy,
}

impl ShortcutCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            ShortcutCategory::General => "General",
            ShortcutCategory::Navigation => "Navigation",
            ShortcutCategory::Actions => "Actions",
        }
    }

    /// All categories in display order
    pub fn all() -> &'static [ShortcutCategory] {
        &[
            ShortcutCategory::General,
            ShortcutCategory::Navigation,
            ShortcutCategory::Actions,
        ]
    }
}

impl ShortcutContext {
    pub fn display_name(&self) -> &'static str {
        match self {
            ShortcutContext::Checklist => "Checklist",
            ShortcutContext::CustomerForm => "Customer Info",
            ShortcutContext::Objections => "Objections",
            ShortcutContext::ManualCopy => "Manual Copy",
        }
    }

    /// All contexts in display order
    pub fn all() -> &'static [ShortcutContext] {
        &[
            ShortcutContext::Checklist,
            ShortcutContext::CustomerForm,
            ShortcutContext::Objections,
            ShortcutContext::ManualCopy,
        ]
    }
}

impl Shortcut {
    /// Format key for display (e.g., "q", "Tab", "j/↓")
    pub fn key_display(&self) -> String {
        let primary = format_keycode(&self.key);
        match &self.alt_key {
            Some(alt) => format!("{}/{}", primary, format_keycode(alt)),
            None => primary,
        }
    }

    /// Format key for help dialog (left-padded to 11 chars)
    pub fn key_display_padded(&self) -> String {
        format!("{:<11}", self.key_display())
    }
}

fn format_keycode(key: &KeyCode) -> String {
    match key {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Shift+Tab".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Left => "←".to_string(),
        KeyCode::Right => "→".to_string(),
        KeyCode::PageUp => "PgUp".to_string(),
        KeyCode::PageDown => "PgDn".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        _ => format!("{key:?}"),
    }
}

/// Static registry of all keyboard shortcuts
pub static SHORTCUTS: &[Shortcut] = &[
    // === Checklist ===
    Shortcut {
        key: KeyCode::Char('q'),
        alt_key: None,
        description: "Quit",
        category: ShortcutCategory::General,
        context: ShortcutContext::Checklist,
    },
    Shortcut {
        key: KeyCode::Char('?'),
        alt_key: None,
        description: "Toggle help",
        category: ShortcutCategory::General,
        context: ShortcutContext::Checklist,
    },
    Shortcut {
        key: KeyCode::Char('j'),
        alt_key: Some(KeyCode::Down),
        description: "Next step",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::Checklist,
    },
    Shortcut {
        key: KeyCode::Char('k'),
        alt_key: Some(KeyCode::Up),
        description: "Previous step",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::Checklist,
    },
    Shortcut {
        key: KeyCode::Char('i'),
        alt_key: Some(KeyCode::Tab),
        description: "Edit customer info",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::Checklist,
    },
    Shortcut {
        key: KeyCode::Char('o'),
        alt_key: None,
        description: "Show objections",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::Checklist,
    },
    Shortcut {
        key: KeyCode::Char(' '),
        alt_key: Some(KeyCode::Enter),
        description: "Toggle step complete",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Checklist,
    },
    Shortcut {
        key: KeyCode::Char('c'),
        alt_key: None,
        description: "Copy call info",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Checklist,
    },
    Shortcut {
        key: KeyCode::Char('N'),
        alt_key: None,
        description: "Start new call",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Checklist,
    },
    // === Customer form ===
    Shortcut {
        key: KeyCode::Tab,
        alt_key: Some(KeyCode::BackTab),
        description: "Next / previous field",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::CustomerForm,
    },
    Shortcut {
        key: KeyCode::Esc,
        alt_key: None,
        description: "Back to checklist",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::CustomerForm,
    },
    // === Objections ===
    Shortcut {
        key: KeyCode::Char('j'),
        alt_key: Some(KeyCode::Down),
        description: "Next objection",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::Objections,
    },
    Shortcut {
        key: KeyCode::Char('k'),
        alt_key: Some(KeyCode::Up),
        description: "Previous objection",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::Objections,
    },
    Shortcut {
        key: KeyCode::Char('t'),
        alt_key: Some(KeyCode::Esc),
        description: "Back to tracker",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::Objections,
    },
    Shortcut {
        key: KeyCode::Enter,
        alt_key: Some(KeyCode::Char(' ')),
        description: "Expand / collapse response",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Objections,
    },
    Shortcut {
        key: KeyCode::Char('/'),
        alt_key: None,
        description: "Search objections",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Objections,
    },
    Shortcut {
        key: KeyCode::Char('c'),
        alt_key: None,
        description: "Copy call info",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Objections,
    },
    // === Manual copy ===
    Shortcut {
        key: KeyCode::Char('j'),
        alt_key: Some(KeyCode::Down),
        description: "Scroll down",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::ManualCopy,
    },
    Shortcut {
        key: KeyCode::Char('k'),
        alt_key: Some(KeyCode::Up),
        description: "Scroll up",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::ManualCopy,
    },
    Shortcut {
        key: KeyCode::Esc,
        alt_key: Some(KeyCode::Char('q')),
        description: "Close",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::ManualCopy,
    },
];

pub fn shortcuts_for_context(context: ShortcutContext) -> impl Iterator<Item = &'static Shortcut> {
    SHORTCUTS.iter().filter(move |s| s.context == context)
}

/// Get shortcuts grouped by category for a given context
pub fn shortcuts_by_category_for_context(
    context: ShortcutContext,
) -> Vec<(ShortcutCategory, Vec<&'static Shortcut>)> {
    let mut result = Vec::new();
    for category in ShortcutCategory::all() {
        let shortcuts: Vec<&Shortcut> = shortcuts_for_context(context)
            .filter(|s| s.category == *category)
            .collect();
        if !shortcuts.is_empty() {
            result.push((*category, shortcuts));
        }
    }
    result
}

/// One-line hint for the status bar, e.g. "Space toggle · c copy"
pub fn status_hint(context: ShortcutContext) -> String {
    shortcuts_for_context(context)
        .map(|s| format!("{} {}", format_keycode(&s.key), s.description.to_lowercase()))
        .collect::<Vec<_>>()
        .join(" · ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_shortcuts_have_descriptions() {
        for shortcut in SHORTCUTS {
            assert!(
                !shortcut.description.is_empty(),
                "Shortcut {:?} has empty description",
                shortcut.key
            );
        }
    }

    #[test]
    fn test_key_display_with_alt() {
        let shortcut = Shortcut {
            key: KeyCode::Char('j'),
            alt_key: Some(KeyCode::Down),
            description: "Test",
            category: ShortcutCategory::Navigation,
            context: ShortcutContext::Checklist,
        };
        assert_eq!(shortcut.key_display(), "j/↓");
    }

    #[test]
    fn test_space_is_named() {
        assert_eq!(format_keycode(&KeyCode::Char(' ')), "Space");
        assert_eq!(format_keycode(&KeyCode::BackTab), "Shift+Tab");
    }

    #[test]
    fn test_every_context_has_shortcuts() {
        for context in ShortcutContext::all() {
            assert!(
                shortcuts_for_context(*context).next().is_some(),
                "{} has no shortcuts",
                context.display_name()
            );
        }
    }

    #[test]
    fn test_no_duplicate_primary_keys_per_context() {
        for context in ShortcutContext::all() {
            let keys: Vec<_> = shortcuts_for_context(*context).map(|s| s.key).collect();
            for (i, key) in keys.iter().enumerate() {
                assert!(
                    !keys[i + 1..].contains(key),
                    "{:?} bound twice in {}",
                    key,
                    context.display_name()
                );
            }
        }
    }

    #[test]
    fn test_status_hint_mentions_copy() {
        let hint = status_hint(ShortcutContext::Checklist);
        assert!(hint.contains("c copy call info"));
    }
}
