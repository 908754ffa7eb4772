//! Which list panel receives keyboard input.

use super::panel::PanelState;

/// The three stacked list panels, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelId {
    InProgress,
    Open,
    Closed,
}

impl PanelId {
    pub const ALL: [PanelId; 3] = [PanelId::InProgress, PanelId::Open, PanelId::Closed];

    pub fn index(&self) -> usize {
        match self {
            Self::InProgress => 0,
            Self::Open => 1,
            Self::Closed => 2,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::InProgress => "In Progress",
            Self::Open => "Open",
            Self::Closed => "Closed",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Next,
    Prev,
}

/// The three panel states, indexable by [`PanelId`].
#[derive(Debug, Clone)]
pub struct Panels {
    panels: [PanelState; 3],
}

impl Panels {
    /// `collapse_closed` makes the Closed panel shrink to a summary line
    /// while unfocused.
    pub fn new(collapse_closed: bool) -> Self {
        Self {
            panels: [
                PanelState::new(false),
                PanelState::new(false),
                PanelState::new(collapse_closed),
            ],
        }
    }

    pub fn get(&self, id: PanelId) -> &PanelState {
        &self.panels[id.index()]
    }

    pub fn get_mut(&mut self, id: PanelId) -> &mut PanelState {
        &mut self.panels[id.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (PanelId, &PanelState)> {
        PanelId::ALL.into_iter().zip(self.panels.iter())
    }

    pub fn is_empty(&self, id: PanelId) -> bool {
        self.get(id).is_empty()
    }
}

impl Default for Panels {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Tracks the focused panel and keeps every panel's focus flag in sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusController {
    focused: PanelId,
}

impl Default for FocusController {
    fn default() -> Self {
        Self {
            focused: PanelId::InProgress,
        }
    }
}

impl FocusController {
    /// Focus the first non-empty panel, defaulting to In Progress.
    pub fn initial(panels: &mut Panels) -> Self {
        let focused = first_non_empty(panels).unwrap_or(PanelId::InProgress);
        let controller = Self { focused };
        controller.apply(panels);
        controller
    }

    pub fn focused(&self) -> PanelId {
        self.focused
    }

    /// Move to the next or previous non-empty panel, wrapping around.
    /// Stays put when every other panel is empty.
    pub fn cycle(&mut self, direction: Direction, panels: &mut Panels) {
        let start = self.focused.index();
        for step in 1..PanelId::ALL.len() {
            let idx = match direction {
                Direction::Next => (start + step) % 3,
                Direction::Prev => (start + 3 - step) % 3,
            };
            let candidate = PanelId::ALL[idx];
            if !panels.is_empty(candidate) {
                self.focused = candidate;
                break;
            }
        }
        self.apply(panels);
    }

    /// Focus `target` directly, even when it is empty.
    pub fn focus(&mut self, target: PanelId, panels: &mut Panels) {
        self.focused = target;
        self.apply(panels);
    }

    /// After new data: leave an emptied panel for the first non-empty one.
    pub fn reconcile(&mut self, panels: &mut Panels) {
        if panels.is_empty(self.focused) {
            if let Some(id) = first_non_empty(panels) {
                self.focused = id;
            }
        }
        self.apply(panels);
    }

    fn apply(&self, panels: &mut Panels) {
        for id in PanelId::ALL {
            panels.get_mut(id).set_focus(id == self.focused);
        }
    }
}

fn first_non_empty(panels: &Panels) -> Option<PanelId> {
    PanelId::ALL.into_iter().find(|id| !panels.is_empty(*id))
}
