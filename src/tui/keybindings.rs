//! Keybinding table shown in help and the footer.
//!
//! Dispatch itself lives in `input.rs`; this table describes it and is the
//! only place help text comes from.

/// Contexts a binding applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    List,
    Board,
    Detail,
    Help,
    Search,
}

/// Categories for grouping bindings in help display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    Navigation,
    Tree,
    Filtering,
    Views,
    Editing,
    Application,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Navigation,
        Category::Tree,
        Category::Filtering,
        Category::Views,
        Category::Editing,
        Category::Application,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Category::Navigation => "Navigation",
            Category::Tree => "Tree",
            Category::Filtering => "Filter & Sort",
            Category::Views => "Views",
            Category::Editing => "Edit",
            Category::Application => "Application",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct KeyBinding {
    pub modes: &'static [Mode],
    pub keys: &'static str,
    pub description: &'static str,
    pub category: Category,
}

const LIST_AND_BOARD: &[Mode] = &[Mode::List, Mode::Board];
const WITH_ISSUE: &[Mode] = &[Mode::List, Mode::Board, Mode::Detail];

pub static BINDINGS: &[KeyBinding] = &[
    // Navigation
    KeyBinding {
        modes: &[Mode::List, Mode::Board, Mode::Detail],
        keys: "j/k, ↑/↓",
        description: "Move down/up",
        category: Category::Navigation,
    },
    KeyBinding {
        modes: &[Mode::List, Mode::Board, Mode::Detail],
        keys: "gg / G",
        description: "Go to top/bottom",
        category: Category::Navigation,
    },
    KeyBinding {
        modes: LIST_AND_BOARD,
        keys: "Ctrl+u/d",
        description: "Page up/down",
        category: Category::Navigation,
    },
    KeyBinding {
        modes: &[Mode::List],
        keys: "Tab, h/l, ←/→",
        description: "Previous/next panel",
        category: Category::Navigation,
    },
    KeyBinding {
        modes: &[Mode::Board],
        keys: "h/l, ←/→",
        description: "Previous/next column",
        category: Category::Navigation,
    },
    // Tree
    KeyBinding {
        modes: &[Mode::List],
        keys: "Space",
        description: "Collapse/expand children",
        category: Category::Tree,
    },
    // Filtering
    KeyBinding {
        modes: LIST_AND_BOARD,
        keys: "/",
        description: "Search title or id",
        category: Category::Filtering,
    },
    KeyBinding {
        modes: &[Mode::List, Mode::Board, Mode::Search],
        keys: "Enter / Esc",
        description: "Confirm / cancel search",
        category: Category::Filtering,
    },
    KeyBinding {
        modes: LIST_AND_BOARD,
        keys: "o / c / r",
        description: "Toggle open / closed / ready filter",
        category: Category::Filtering,
    },
    KeyBinding {
        modes: LIST_AND_BOARD,
        keys: "A",
        description: "Show all",
        category: Category::Filtering,
    },
    KeyBinding {
        modes: LIST_AND_BOARD,
        keys: "s",
        description: "Cycle sort mode",
        category: Category::Filtering,
    },
    // Views
    KeyBinding {
        modes: LIST_AND_BOARD,
        keys: "Enter",
        description: "Open issue detail",
        category: Category::Views,
    },
    KeyBinding {
        modes: LIST_AND_BOARD,
        keys: "b",
        description: "Toggle board view",
        category: Category::Views,
    },
    KeyBinding {
        modes: &[Mode::Detail, Mode::Help],
        keys: "Esc / q",
        description: "Back",
        category: Category::Views,
    },
    // Editing
    KeyBinding {
        modes: LIST_AND_BOARD,
        keys: "a",
        description: "New issue",
        category: Category::Editing,
    },
    KeyBinding {
        modes: WITH_ISSUE,
        keys: "e / d",
        description: "Edit title / description ($EDITOR)",
        category: Category::Editing,
    },
    KeyBinding {
        modes: WITH_ISSUE,
        keys: "S / p / t",
        description: "Set status / priority / type",
        category: Category::Editing,
    },
    KeyBinding {
        modes: WITH_ISSUE,
        keys: "C",
        description: "Add comment",
        category: Category::Editing,
    },
    KeyBinding {
        modes: WITH_ISSUE,
        keys: "B / D",
        description: "Add / remove blocker",
        category: Category::Editing,
    },
    KeyBinding {
        modes: WITH_ISSUE,
        keys: "X / x",
        description: "Close / delete issue",
        category: Category::Editing,
    },
    KeyBinding {
        modes: WITH_ISSUE,
        keys: "y",
        description: "Copy issue id",
        category: Category::Editing,
    },
    // Application
    KeyBinding {
        modes: LIST_AND_BOARD,
        keys: "R",
        description: "Refresh now",
        category: Category::Application,
    },
    KeyBinding {
        modes: &[Mode::List, Mode::Board, Mode::Detail],
        keys: "?",
        description: "Toggle help",
        category: Category::Application,
    },
    KeyBinding {
        modes: LIST_AND_BOARD,
        keys: "q, Ctrl+c",
        description: "Quit",
        category: Category::Application,
    },
];

/// Compact footer hints for a given mode.
pub fn footer_hints(mode: Mode) -> &'static str {
    match mode {
        Mode::List => " j/k: nav | tab: panel | space: fold | enter: detail | /: search | o/c/r: filter | a: new | e: edit | b: board | ?: help ",
        Mode::Board => " j/k: nav | h/l: column | enter: detail | /: search | s: sort | b: list | ?: help ",
        Mode::Detail => " j/k: scroll | e: title | d: desc | C: comment | X: close | esc: back | ?: help ",
        Mode::Help => " esc: close ",
        Mode::Search => " type to search | enter: confirm | esc: cancel ",
    }
}

/// Help lines for `mode` grouped by category, formatted `keys  description`.
pub fn help_lines(mode: Mode) -> Vec<String> {
    let bindings: Vec<&KeyBinding> = BINDINGS.iter().filter(|b| b.modes.contains(&mode)).collect();
    let key_width = bindings.iter().map(|b| b.keys.chars().count()).max().unwrap_or(0);

    let mut lines = Vec::new();
    for category in Category::ALL {
        if !bindings.iter().any(|b| b.category == category) {
            continue;
        }
        let label = category.label();
        lines.push(format!("  {}", label));
        lines.push(format!("  {}", "─".repeat(label.chars().count())));
        for binding in bindings.iter().filter(|b| b.category == category) {
            lines.push(format!(
                "  {:<width$}  {}",
                binding.keys,
                binding.description,
                width = key_width
            ));
        }
        lines.push(String::new());
    }
    lines
}
