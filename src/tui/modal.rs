//! Editing overlays: the create form, single-line inputs, option pickers and
//! yes/no confirmation.
//!
//! A modal owns its keystrokes until it resolves into a [`ModalOutcome`].
//! It never talks to `bd` itself; a submitted modal yields a [`Mutation`]
//! for the app to run.

use super::ui::layout::truncate_with_ellipsis;
use crate::beads::{IssueUpdate, Mutation, NewIssue};
use crate::data::{Issue, IssueType, Snapshot, Status};

/// Keys a modal understands. Mapped from crossterm in `input.rs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalKey {
    Char(char),
    Backspace,
    Up,
    Down,
    Left,
    Right,
    Tab,
    BackTab,
    Enter,
    Esc,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ModalOutcome {
    /// Still editing
    Pending,
    Cancel,
    Submit(Mutation),
    /// Rejected input; the modal stays open
    Invalid(String),
}

/// Fields of the create form, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Title,
    Description,
    Priority,
    Type,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::Title,
        FormField::Description,
        FormField::Priority,
        FormField::Type,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::Title => "Title",
            FormField::Description => "Description",
            FormField::Priority => "Priority",
            FormField::Type => "Type",
        }
    }

    fn offset(self, delta: isize) -> Self {
        let len = Self::ALL.len() as isize;
        let idx = Self::ALL.iter().position(|f| *f == self).unwrap_or(0) as isize;
        Self::ALL[(idx + delta).rem_euclid(len) as usize]
    }
}

/// State of the "new issue" form.
#[derive(Debug, Clone, PartialEq)]
pub struct IssueForm {
    pub title: String,
    pub description: String,
    pub priority: u8,
    pub issue_type: IssueType,
    pub field: FormField,
}

impl Default for IssueForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            priority: 2,
            issue_type: IssueType::Feature,
            field: FormField::Title,
        }
    }
}

impl IssueForm {
    fn handle_key(&mut self, key: ModalKey) -> ModalOutcome {
        match key {
            ModalKey::Esc => return ModalOutcome::Cancel,
            ModalKey::Enter => return self.submit(),
            ModalKey::Tab | ModalKey::Down => self.field = self.field.offset(1),
            ModalKey::BackTab | ModalKey::Up => self.field = self.field.offset(-1),
            _ => match self.field {
                FormField::Title => edit_text(&mut self.title, key),
                FormField::Description => edit_text(&mut self.description, key),
                FormField::Priority => match key {
                    ModalKey::Left | ModalKey::Char('h') => {
                        self.priority = self.priority.saturating_sub(1)
                    }
                    ModalKey::Right | ModalKey::Char('l') => {
                        self.priority = (self.priority + 1).min(4)
                    }
                    ModalKey::Char(c @ '0'..='4') => self.priority = c as u8 - b'0',
                    _ => {}
                },
                FormField::Type => match key {
                    ModalKey::Left | ModalKey::Char('h') => self.cycle_type(-1),
                    ModalKey::Right | ModalKey::Char('l') => self.cycle_type(1),
                    _ => {}
                },
            },
        }
        ModalOutcome::Pending
    }

    fn cycle_type(&mut self, delta: isize) {
        let kinds = IssueType::STANDARD;
        let idx = kinds
            .iter()
            .position(|t| *t == self.issue_type)
            .unwrap_or(0) as isize;
        self.issue_type = kinds[(idx + delta).rem_euclid(kinds.len() as isize) as usize].clone();
    }

    fn submit(&self) -> ModalOutcome {
        let title = self.title.trim();
        if title.is_empty() {
            return ModalOutcome::Invalid("Title is required".to_string());
        }
        ModalOutcome::Submit(Mutation::Create(NewIssue {
            title: title.to_string(),
            description: self.description.trim().to_string(),
            issue_type: self.issue_type.clone(),
            priority: self.priority,
        }))
    }
}

/// What a single-line input edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Title,
    Comment,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextInput {
    pub kind: InputKind,
    pub issue_id: String,
    pub value: String,
}

impl TextInput {
    fn handle_key(&mut self, key: ModalKey) -> ModalOutcome {
        match key {
            ModalKey::Esc => ModalOutcome::Cancel,
            ModalKey::Enter => {
                let value = self.value.trim();
                if value.is_empty() {
                    return ModalOutcome::Cancel;
                }
                let id = self.issue_id.clone();
                ModalOutcome::Submit(match self.kind {
                    InputKind::Title => Mutation::Update {
                        id,
                        update: IssueUpdate {
                            title: Some(value.to_string()),
                            ..IssueUpdate::default()
                        },
                    },
                    InputKind::Comment => Mutation::AddComment {
                        id,
                        text: value.to_string(),
                    },
                })
            }
            _ => {
                edit_text(&mut self.value, key);
                ModalOutcome::Pending
            }
        }
    }
}

/// What a picker's chosen value is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickKind {
    Status,
    Priority,
    Type,
    AddBlocker,
    RemoveBlocker,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickOption {
    pub label: String,
    pub value: String,
    pub shortcut: Option<char>,
}

impl PickOption {
    fn new(label: impl Into<String>, value: impl Into<String>, shortcut: Option<char>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            shortcut,
        }
    }
}

const BLOCKER_LABEL_WIDTH: usize = 50;

#[derive(Debug, Clone, PartialEq)]
pub struct Picker {
    pub kind: PickKind,
    pub issue_id: String,
    pub options: Vec<PickOption>,
    pub selected: usize,
}

impl Picker {
    fn new(kind: PickKind, issue: &Issue, options: Vec<PickOption>, current: &str) -> Self {
        let selected = options.iter().position(|o| o.value == current).unwrap_or(0);
        Self {
            kind,
            issue_id: issue.id.clone(),
            options,
            selected,
        }
    }

    pub fn status(issue: &Issue) -> Self {
        let options = Status::ALL
            .iter()
            .map(|s| {
                let shortcut = match s {
                    Status::Open => 'o',
                    Status::InProgress => 'i',
                    Status::Closed => 'c',
                };
                PickOption::new(s.as_str(), s.as_str(), Some(shortcut))
            })
            .collect();
        Self::new(PickKind::Status, issue, options, issue.status.as_str())
    }

    pub fn priority(issue: &Issue) -> Self {
        let names = ["Critical", "High", "Medium", "Low", "Backlog"];
        let options = names
            .iter()
            .enumerate()
            .map(|(p, name)| {
                let digit = char::from(b'0' + p as u8);
                PickOption::new(format!("P{} - {}", p, name), p.to_string(), Some(digit))
            })
            .collect();
        Self::new(PickKind::Priority, issue, options, &issue.priority.to_string())
    }

    pub fn issue_type(issue: &Issue) -> Self {
        let options = IssueType::STANDARD
            .iter()
            .map(|t| {
                let shortcut = match t {
                    IssueType::Chore => 'r',
                    other => other.as_str().chars().next().unwrap_or('?'),
                };
                PickOption::new(t.as_str(), t.as_str(), Some(shortcut))
            })
            .collect();
        Self::new(PickKind::Type, issue, options, issue.issue_type.as_str())
    }

    /// Open issues that do not already block `issue`. `None` when there are
    /// no candidates.
    pub fn add_blocker(issue: &Issue, snapshot: &Snapshot) -> Option<Self> {
        let options: Vec<PickOption> = snapshot
            .issues
            .iter()
            .filter(|t| t.id != issue.id && t.status != Status::Closed)
            .filter(|t| !issue.blocked_by.contains(&t.id))
            .map(|t| PickOption::new(blocker_label(t), t.id.clone(), None))
            .collect();
        if options.is_empty() {
            return None;
        }
        Some(Self::new(PickKind::AddBlocker, issue, options, ""))
    }

    /// Current blockers of `issue`, titled when they are in the snapshot.
    pub fn remove_blocker(issue: &Issue, snapshot: &Snapshot) -> Option<Self> {
        if issue.blocked_by.is_empty() {
            return None;
        }
        let options = issue
            .blocked_by
            .iter()
            .map(|id| {
                let label = snapshot
                    .get(id)
                    .map(blocker_label)
                    .unwrap_or_else(|| id.clone());
                PickOption::new(label, id.clone(), None)
            })
            .collect();
        Some(Self::new(PickKind::RemoveBlocker, issue, options, ""))
    }

    pub fn title(&self) -> &'static str {
        match self.kind {
            PickKind::Status => "Edit Status",
            PickKind::Priority => "Edit Priority",
            PickKind::Type => "Edit Type",
            PickKind::AddBlocker => "Add Blocker",
            PickKind::RemoveBlocker => "Remove Blocker",
        }
    }

    fn handle_key(&mut self, key: ModalKey) -> ModalOutcome {
        if let ModalKey::Char(c) = key {
            if let Some(idx) = self.options.iter().position(|o| o.shortcut == Some(c)) {
                self.selected = idx;
                return self.submit();
            }
        }
        match key {
            ModalKey::Esc => return ModalOutcome::Cancel,
            ModalKey::Enter => return self.submit(),
            ModalKey::Up | ModalKey::Char('k') => self.selected = self.selected.saturating_sub(1),
            ModalKey::Down | ModalKey::Char('j') => {
                self.selected = (self.selected + 1).min(self.options.len().saturating_sub(1))
            }
            _ => {}
        }
        ModalOutcome::Pending
    }

    fn submit(&self) -> ModalOutcome {
        let Some(option) = self.options.get(self.selected) else {
            return ModalOutcome::Cancel;
        };
        let id = self.issue_id.clone();
        let value = option.value.clone();
        let update = |update: IssueUpdate| Mutation::Update {
            id: id.clone(),
            update,
        };
        let mutation = match self.kind {
            PickKind::Status => update(IssueUpdate {
                status: Some(Status::from(value)),
                ..IssueUpdate::default()
            }),
            PickKind::Priority => match value.parse::<u8>() {
                Ok(priority) => update(IssueUpdate {
                    priority: Some(priority),
                    ..IssueUpdate::default()
                }),
                Err(_) => return ModalOutcome::Cancel,
            },
            PickKind::Type => update(IssueUpdate {
                issue_type: Some(IssueType::from(value)),
                ..IssueUpdate::default()
            }),
            PickKind::AddBlocker => Mutation::AddBlocker {
                id: id.clone(),
                blocker: value,
            },
            PickKind::RemoveBlocker => Mutation::RemoveBlocker {
                id: id.clone(),
                blocker: value,
            },
        };
        ModalOutcome::Submit(mutation)
    }
}

fn blocker_label(issue: &Issue) -> String {
    truncate_with_ellipsis(&format!("{} - {}", issue.id, issue.title), BLOCKER_LABEL_WIDTH)
}

/// A destructive mutation waiting for `y`.
#[derive(Debug, Clone, PartialEq)]
pub struct Confirm {
    pub prompt: String,
    pub mutation: Mutation,
}

impl Confirm {
    pub fn close(issue: &Issue) -> Self {
        Self {
            prompt: format!("Close issue {}?", issue.id),
            mutation: Mutation::Close {
                id: issue.id.clone(),
            },
        }
    }

    pub fn delete(issue: &Issue) -> Self {
        Self {
            prompt: format!("Delete issue {}?", issue.id),
            mutation: Mutation::Delete {
                id: issue.id.clone(),
            },
        }
    }
}

/// The active overlay. At most one is open.
#[derive(Debug, Clone, PartialEq)]
pub enum Modal {
    Create(IssueForm),
    Input(TextInput),
    Pick(Picker),
    Confirm(Confirm),
}

impl Modal {
    pub fn create() -> Self {
        Modal::Create(IssueForm::default())
    }

    pub fn edit_title(issue: &Issue) -> Self {
        Modal::Input(TextInput {
            kind: InputKind::Title,
            issue_id: issue.id.clone(),
            value: issue.title.clone(),
        })
    }

    pub fn add_comment(issue: &Issue) -> Self {
        Modal::Input(TextInput {
            kind: InputKind::Comment,
            issue_id: issue.id.clone(),
            value: String::new(),
        })
    }

    pub fn handle_key(&mut self, key: ModalKey) -> ModalOutcome {
        match self {
            Modal::Create(form) => form.handle_key(key),
            Modal::Input(input) => input.handle_key(key),
            Modal::Pick(picker) => picker.handle_key(key),
            Modal::Confirm(confirm) => match key {
                ModalKey::Char('y') | ModalKey::Char('Y') => {
                    ModalOutcome::Submit(confirm.mutation.clone())
                }
                ModalKey::Char('n') | ModalKey::Char('N') | ModalKey::Esc => ModalOutcome::Cancel,
                _ => ModalOutcome::Pending,
            },
        }
    }

    pub fn title(&self) -> String {
        match self {
            Modal::Create(_) => "New Issue".to_string(),
            Modal::Input(input) => match input.kind {
                InputKind::Title => format!("Edit Title · {}", input.issue_id),
                InputKind::Comment => format!("Add Comment · {}", input.issue_id),
            },
            Modal::Pick(picker) => format!("{} · {}", picker.title(), picker.issue_id),
            Modal::Confirm(_) => "Confirm".to_string(),
        }
    }

    /// Footer hint while the modal is open.
    pub fn hint(&self) -> &'static str {
        match self {
            Modal::Create(_) => " tab: next field | ←/→: change | enter: create | esc: cancel ",
            Modal::Input(_) => " enter: save | esc: cancel ",
            Modal::Pick(_) => " j/k: move | enter: select | esc: cancel ",
            Modal::Confirm(_) => " y: yes | n/esc: no ",
        }
    }
}

fn edit_text(value: &mut String, key: ModalKey) {
    match key {
        ModalKey::Char(c) => value.push(c),
        ModalKey::Backspace => {
            value.pop();
        }
        _ => {}
    }
}
