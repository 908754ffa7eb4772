use super::board::BoardState;
use super::focus::{Direction, FocusController, PanelId, Panels};
use super::hit_test::{ClickKind, ClickTracker, HitLayout, Region};
use super::keybindings;
use super::modal::{Confirm, Modal, ModalKey, ModalOutcome, Picker};
use super::panel::NavKey;
use super::ui::{detail, layout};
use super::Message;
use crate::beads::{self, IssueUpdate, Mutation};
use crate::commands;
use crate::config::{CommandContext, Config};
use crate::data::{self, CollapseSet, Comment, FilterMode, Issue, Snapshot, ViewParams};
use anyhow::Result;
use ratatui::layout::Rect;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// How long transient status messages stay visible.
pub const STATUS_MESSAGE_TTL: Duration = Duration::from_secs(3);

/// Rows moved per mouse wheel notch.
pub const WHEEL_STEP: i32 = 3;

const SPINNER_FRAMES: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// Result from background refresh task
#[derive(Debug)]
pub enum RefreshResult {
    Complete(Snapshot),
    Error(String),
}

/// The two top-level views overlays return to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BaseView {
    #[default]
    List,
    Board,
}

/// Active view. Exactly one is shown; overlays remember where they came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    List,
    Board,
    Detail { return_to: BaseView },
    Help { return_to: BaseView },
}

impl ViewMode {
    pub fn base(&self) -> BaseView {
        match self {
            ViewMode::List => BaseView::List,
            ViewMode::Board => BaseView::Board,
            ViewMode::Detail { return_to } | ViewMode::Help { return_to } => *return_to,
        }
    }

    fn from_base(base: BaseView) -> Self {
        match base {
            BaseView::List => ViewMode::List,
            BaseView::Board => ViewMode::Board,
        }
    }

    pub fn keymap_mode(&self) -> keybindings::Mode {
        match self {
            ViewMode::List => keybindings::Mode::List,
            ViewMode::Board => keybindings::Mode::Board,
            ViewMode::Detail { .. } => keybindings::Mode::Detail,
            ViewMode::Help { .. } => keybindings::Mode::Help,
        }
    }

    /// Context used to match custom command keys.
    pub fn command_context(&self) -> Option<CommandContext> {
        match self {
            ViewMode::List => Some(CommandContext::List),
            ViewMode::Board => Some(CommandContext::Board),
            ViewMode::Detail { .. } => Some(CommandContext::Detail),
            ViewMode::Help { .. } => None,
        }
    }
}

/// Description handed to `$EDITOR` by the event loop, which owns the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorRequest {
    pub id: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusMessage {
    pub text: String,
    pub is_error: bool,
    pub expires_at: Instant,
}

pub struct App {
    pub config: Arc<Config>,
    client: beads::Client,

    // Data
    pub snapshot: Snapshot,
    pub params: ViewParams,
    pub collapse: CollapseSet,
    has_loaded: bool,

    // Interaction state
    pub panels: Panels,
    pub board: BoardState,
    pub focus: FocusController,
    pub view: ViewMode,
    clicks: ClickTracker,

    // Search state
    pub search_mode: bool,
    search_backup: Option<String>,

    // Detail view
    detail_id: Option<String>,
    pub detail_scroll: u16,
    /// Comments of the detail issue once loaded
    comments: Option<Vec<Comment>>,

    // Editing
    pub modal: Option<Modal>,
    editor_request: Option<EditorRequest>,
    clipboard: Option<String>,

    // UI state
    pub size: (u16, u16),
    pub status_message: Option<StatusMessage>,
    pub is_loading: bool,
    pub spinner_frame: usize,

    /// Channel receiver for background refresh results
    pub refresh_rx: Option<mpsc::Receiver<RefreshResult>>,
    last_refresh_started: Option<Instant>,
    /// A reload was asked for while one was in flight
    refresh_queued: bool,

    /// Results of writes and comment loads, fed back through `update`
    background_tx: mpsc::UnboundedSender<Message>,
    background_rx: mpsc::UnboundedReceiver<Message>,
}

impl App {
    pub fn new(config: Config) -> Self {
        let client = beads::Client::new(config.bd.program.clone());
        let panels = Panels::new(config.ui.closed_summary);
        let board = BoardState::new(config.ui.board_min_column_width);
        let (background_tx, background_rx) = mpsc::unbounded_channel();

        let mut app = Self {
            config: Arc::new(config),
            client,
            snapshot: Snapshot::default(),
            params: ViewParams::default(),
            collapse: CollapseSet::new(),
            has_loaded: false,
            panels,
            board,
            focus: FocusController::default(),
            view: ViewMode::List,
            clicks: ClickTracker::new(),
            search_mode: false,
            search_backup: None,
            detail_id: None,
            detail_scroll: 0,
            comments: None,
            modal: None,
            editor_request: None,
            clipboard: None,
            size: (80, 24),
            status_message: None,
            is_loading: false,
            spinner_frame: 0,
            refresh_rx: None,
            last_refresh_started: None,
            refresh_queued: false,
            background_tx,
            background_rx,
        };
        app.focus = FocusController::initial(&mut app.panels);
        app.relayout();
        app
    }

    /// Process a message. Returns `true` when the app should quit.
    pub fn update(&mut self, msg: Message) -> Result<bool> {
        match msg {
            Message::Quit => return Ok(true),
            Message::Refresh => self.start_background_refresh(),
            Message::Resize { width, height } => {
                self.size = (width, height);
                self.relayout();
            }

            Message::Navigate(key) => self.navigate(key),
            Message::CycleFocus(direction) => self.cycle_focus(direction),

            Message::ToggleCollapse => self.toggle_collapse(),

            Message::EnterSearch => self.enter_search(),
            Message::ExitSearch => self.exit_search(),
            Message::ConfirmSearch => self.confirm_search(),
            Message::SearchInput(c) => {
                self.params.query.push(c);
                self.recompute();
            }
            Message::SearchBackspace => {
                if self.params.query.pop().is_some() {
                    self.recompute();
                }
            }

            Message::ToggleFilter(mode) => self.set_filter(self.params.filter.toggled(mode)),
            Message::ClearFilter => self.set_filter(FilterMode::All),
            Message::CycleSort => {
                self.params.sort = self.params.sort.next();
                self.recompute();
                self.set_status(format!("Sort: {}", self.params.sort.label()), false);
            }

            Message::OpenDetail => self.open_detail(),
            Message::ToggleBoard => self.toggle_board(),
            Message::ToggleHelp => self.toggle_help(),
            Message::Back => self.back(),

            Message::Click { x, y, at } => self.handle_click(x, y, at),
            Message::Wheel(delta) => self.handle_wheel(delta),

            Message::NewIssue => self.open_modal(Modal::create()),
            Message::EditTitle => self.with_selected(|_, issue| Some(Modal::edit_title(issue))),
            Message::EditStatus => {
                self.with_selected(|_, issue| Some(Modal::Pick(Picker::status(issue))))
            }
            Message::EditPriority => {
                self.with_selected(|_, issue| Some(Modal::Pick(Picker::priority(issue))))
            }
            Message::EditType => {
                self.with_selected(|_, issue| Some(Modal::Pick(Picker::issue_type(issue))))
            }
            Message::EditDescription => self.edit_description(),
            Message::AddComment => self.with_selected(|_, issue| Some(Modal::add_comment(issue))),
            Message::AddBlocker => self.with_selected(|app, issue| {
                let picker = Picker::add_blocker(issue, &app.snapshot);
                if picker.is_none() {
                    app.set_status("No open issues left to add as blocker", false);
                }
                picker.map(Modal::Pick)
            }),
            Message::RemoveBlocker => self.with_selected(|app, issue| {
                let picker = Picker::remove_blocker(issue, &app.snapshot);
                if picker.is_none() {
                    app.set_status(format!("{} has no blockers", issue.id), false);
                }
                picker.map(Modal::Pick)
            }),
            Message::CloseIssue => {
                self.with_selected(|_, issue| Some(Modal::Confirm(Confirm::close(issue))))
            }
            Message::DeleteIssue => {
                self.with_selected(|_, issue| Some(Modal::Confirm(Confirm::delete(issue))))
            }
            Message::CopyId => self.copy_id(),
            Message::ModalKey(key) => self.handle_modal_key(key),

            Message::MutationDone { mutation, result } => self.finish_mutation(mutation, result),
            Message::CommentsLoaded { id, result } => self.finish_comments(id, result),
            Message::EditorFinished { id, result } => self.finish_editor(id, result),

            Message::RunCustomCommand(idx) => self.run_custom_command(idx),

            Message::None => {}
        }
        Ok(false)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Data
    // ─────────────────────────────────────────────────────────────────────────

    /// Install a freshly fetched snapshot and rebuild every view.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
        self.recompute();
        if !self.has_loaded {
            self.has_loaded = true;
            self.focus = FocusController::initial(&mut self.panels);
            self.relayout();
        }
    }

    /// Re-derive panels and board from the snapshot and current parameters.
    pub fn recompute(&mut self) {
        let views = data::recompute_views(&self.snapshot, &self.params, &self.collapse);
        self.panels.get_mut(PanelId::InProgress).set_items(views.in_progress);
        self.panels.get_mut(PanelId::Open).set_items(views.open);
        self.panels.get_mut(PanelId::Closed).set_items(views.closed);
        self.board.set_columns(views.board);
        self.focus.reconcile(&mut self.panels);
        self.relayout();
    }

    /// Push current screen geometry into panel and board scroll windows.
    pub fn relayout(&mut self) {
        let screen = layout::screen(self.screen_area());
        let list = layout::list_layout(screen.body, &self.panels, self.config.ui.wide_mode_width);
        for id in PanelId::ALL {
            let rows = layout::panel_content_rows(list.panel(id));
            self.panels.get_mut(id).set_viewport_rows(rows);
        }
        self.board
            .set_viewport(screen.body.width, layout::cards_per_column(screen.body));
    }

    pub fn screen_area(&self) -> Rect {
        Rect::new(0, 0, self.size.0, self.size.1)
    }

    /// Geometry for mouse resolution in the current view.
    pub fn hit_layout(&self) -> HitLayout {
        let screen = layout::screen(self.screen_area());
        match self.view {
            ViewMode::List => {
                let list =
                    layout::list_layout(screen.body, &self.panels, self.config.ui.wide_mode_width);
                layout::list_hit_layout(&list, &self.panels)
            }
            ViewMode::Board => {
                let board = layout::board_layout(screen.body, &self.board);
                layout::board_hit_layout(&board, &self.board)
            }
            ViewMode::Detail { .. } | ViewMode::Help { .. } => HitLayout::default(),
        }
    }

    /// Issue under the cursor in the active view.
    pub fn selected_issue(&self) -> Option<&Issue> {
        match self.view {
            ViewMode::List => self
                .panels
                .get(self.focus.focused())
                .selected_item()
                .map(|node| &node.issue),
            ViewMode::Board => self.board.selected_issue(),
            ViewMode::Detail { .. } => self.detail_issue(),
            ViewMode::Help { .. } => None,
        }
    }

    /// Issue shown by the detail view, looked up in the current snapshot.
    pub fn detail_issue(&self) -> Option<&Issue> {
        self.detail_id
            .as_deref()
            .and_then(|id| self.snapshot.get(id))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Background refresh
    // ─────────────────────────────────────────────────────────────────────────

    /// Start refresh in background (non-blocking)
    pub fn start_background_refresh(&mut self) {
        // Don't start another refresh if one is already in progress
        if self.refresh_rx.is_some() {
            return;
        }

        self.is_loading = true;
        self.last_refresh_started = Some(Instant::now());

        let (tx, rx) = mpsc::channel(1);
        self.refresh_rx = Some(rx);

        let client = self.client.clone();
        tokio::spawn(async move {
            let result = match client.fetch_all().await {
                Ok(snapshot) => RefreshResult::Complete(snapshot),
                Err(e) => RefreshResult::Error(format!("{:#}", e)),
            };
            let _ = tx.send(result).await;
        });
    }

    /// Poll for refresh results (non-blocking, call from event loop tick)
    pub fn poll_refresh(&mut self) -> bool {
        let Some(mut rx) = self.refresh_rx.take() else {
            return false;
        };

        match rx.try_recv() {
            Ok(result) => {
                self.finish_refresh(result);
                true
            }
            Err(mpsc::error::TryRecvError::Empty) => {
                self.refresh_rx = Some(rx);
                false
            }
            Err(mpsc::error::TryRecvError::Disconnected) => {
                self.finish_refresh(RefreshResult::Error("refresh task ended unexpectedly".into()));
                true
            }
        }
    }

    pub fn finish_refresh(&mut self, result: RefreshResult) {
        self.is_loading = false;
        match result {
            RefreshResult::Complete(snapshot) => self.apply_snapshot(snapshot),
            RefreshResult::Error(msg) => {
                tracing::error!("Failed to refresh issues: {}", msg);
                self.set_status(format!("Refresh failed: {}", msg), true);
            }
        }

        if std::mem::take(&mut self.refresh_queued) {
            self.start_background_refresh();
        }
    }

    /// Reload after a write. A refresh already in flight may have read the
    /// tracker before the write landed, so another one is queued behind it.
    pub fn request_refresh(&mut self) {
        if self.refresh_rx.is_some() {
            self.refresh_queued = true;
        } else {
            self.start_background_refresh();
        }
    }

    pub fn is_refresh_queued(&self) -> bool {
        self.refresh_queued
    }

    /// Next finished background job, if any (non-blocking).
    pub fn poll_background(&mut self) -> Option<Message> {
        self.background_rx.try_recv().ok()
    }

    /// Wait for the next finished background job.
    pub async fn next_background(&mut self) -> Option<Message> {
        self.background_rx.recv().await
    }

    pub fn on_tick(&mut self, now: Instant) {
        if self.is_loading {
            self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
        }

        if self
            .status_message
            .as_ref()
            .is_some_and(|m| now >= m.expires_at)
        {
            self.status_message = None;
        }

        let interval = self.config.polling.interval_secs;
        if interval > 0 {
            let due = self
                .last_refresh_started
                .map_or(true, |t| now.saturating_duration_since(t) >= Duration::from_secs(interval));
            if due {
                self.start_background_refresh();
            }
        }
    }

    pub fn spinner_char(&self) -> char {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    pub fn set_status(&mut self, text: impl Into<String>, is_error: bool) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            is_error,
            expires_at: Instant::now() + STATUS_MESSAGE_TTL,
        });
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Navigation
    // ─────────────────────────────────────────────────────────────────────────

    fn navigate(&mut self, key: NavKey) {
        match self.view {
            ViewMode::List => {
                let focused = self.focus.focused();
                self.panels.get_mut(focused).handle_key(key);
            }
            ViewMode::Board => {
                self.board.handle_key(key);
            }
            ViewMode::Detail { .. } => match key {
                NavKey::Up => self.scroll_detail(-1),
                NavKey::Down => self.scroll_detail(1),
                NavKey::PageUp => self.scroll_detail(-10),
                NavKey::PageDown => self.scroll_detail(10),
                NavKey::Top => self.detail_scroll = 0,
                NavKey::Bottom => self.detail_scroll = self.detail_max_scroll(),
                NavKey::Left | NavKey::Right => {}
            },
            ViewMode::Help { .. } => {}
        }
    }

    fn cycle_focus(&mut self, direction: Direction) {
        match self.view {
            ViewMode::List => {
                self.focus.cycle(direction, &mut self.panels);
                self.relayout();
            }
            ViewMode::Board => {
                let delta = match direction {
                    Direction::Next => 1,
                    Direction::Prev => -1,
                };
                self.board.move_column(delta);
            }
            ViewMode::Detail { .. } | ViewMode::Help { .. } => {}
        }
    }

    fn toggle_collapse(&mut self) {
        if self.view != ViewMode::List {
            return;
        }
        let Some(node) = self.panels.get(self.focus.focused()).selected_item() else {
            return;
        };
        if !node.has_children {
            return;
        }
        let id = node.issue.id.clone();
        self.collapse.toggle(&id);
        self.recompute();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Search, filter, sort
    // ─────────────────────────────────────────────────────────────────────────

    fn enter_search(&mut self) {
        self.search_mode = true;
        self.search_backup = Some(self.params.query.clone());
    }

    fn exit_search(&mut self) {
        self.search_mode = false;
        if let Some(previous) = self.search_backup.take() {
            if previous != self.params.query {
                self.params.query = previous;
                self.recompute();
            }
        }
    }

    fn confirm_search(&mut self) {
        self.search_mode = false;
        self.search_backup = None;
    }

    fn set_filter(&mut self, mode: FilterMode) {
        self.params.filter = mode;
        self.recompute();
        self.set_status(format!("Filter: {}", mode.label()), false);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Views
    // ─────────────────────────────────────────────────────────────────────────

    fn open_detail(&mut self) {
        if !matches!(self.view, ViewMode::List | ViewMode::Board) {
            return;
        }
        let Some(id) = self.selected_issue().map(|i| i.id.clone()) else {
            return;
        };
        self.detail_id = Some(id.clone());
        self.detail_scroll = 0;
        self.comments = None;
        self.view = ViewMode::Detail {
            return_to: self.view.base(),
        };
        self.load_comments(id);
    }

    fn toggle_board(&mut self) {
        self.view = match self.view {
            ViewMode::List => ViewMode::Board,
            ViewMode::Board => ViewMode::List,
            other => other,
        };
        self.clicks.reset();
    }

    fn toggle_help(&mut self) {
        self.view = match self.view {
            ViewMode::Help { return_to } => ViewMode::from_base(return_to),
            other => ViewMode::Help {
                return_to: other.base(),
            },
        };
    }

    fn back(&mut self) {
        match self.view {
            ViewMode::Detail { return_to } | ViewMode::Help { return_to } => {
                self.view = ViewMode::from_base(return_to);
                self.detail_id = None;
                self.comments = None;
            }
            ViewMode::List | ViewMode::Board => {
                if !self.params.query.is_empty() {
                    self.params.query.clear();
                    self.recompute();
                }
            }
        }
    }

    fn scroll_detail(&mut self, delta: i32) {
        let scrolled = if delta < 0 {
            self.detail_scroll.saturating_sub(delta.unsigned_abs() as u16)
        } else {
            self.detail_scroll.saturating_add(delta as u16)
        };
        self.detail_scroll = scrolled.min(self.detail_max_scroll());
    }

    /// Largest useful scroll offset for the detail view at the current size.
    pub fn detail_max_scroll(&self) -> u16 {
        let Some(issue) = self.detail_issue() else {
            return 0;
        };
        let body = layout::screen(self.screen_area()).body;
        let inner_width = body.width.saturating_sub(2) as usize;
        let inner_height = body.height.saturating_sub(2) as usize;
        let total = detail::detail_lines(issue, self.detail_comments(), inner_width).len();
        total.saturating_sub(inner_height) as u16
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mouse
    // ─────────────────────────────────────────────────────────────────────────

    fn handle_click(&mut self, x: u16, y: u16, at: Instant) {
        // A click anywhere dismisses an open modal
        if self.modal.take().is_some() {
            return;
        }
        let Some(hit) = self.hit_layout().resolve(x, y) else {
            return;
        };

        match hit.region {
            Region::Panel(id) => {
                if self.focus.focused() != id {
                    self.focus.focus(id, &mut self.panels);
                    self.relayout();
                }
                match hit.item {
                    Some(item) => {
                        self.panels.get_mut(id).select_index(item);
                        if self.clicks.register(hit.region, item, at) == ClickKind::Double {
                            self.open_detail();
                        }
                    }
                    None => self.clicks.reset(),
                }
            }
            Region::BoardColumn(col) => match hit.item {
                Some(item) => {
                    self.board.select_cell(col, item);
                    if self.clicks.register(hit.region, item, at) == ClickKind::Double {
                        self.open_detail();
                    }
                }
                None => {
                    self.board.select_cell(col, self.board.row());
                    self.clicks.reset();
                }
            },
            Region::DetailPane => self.open_detail(),
        }
    }

    fn handle_wheel(&mut self, delta: i32) {
        if self.modal.is_some() {
            return;
        }
        let step = (delta * WHEEL_STEP) as isize;
        match self.view {
            ViewMode::List => {
                let focused = self.focus.focused();
                self.panels.get_mut(focused).scroll_by(step);
            }
            ViewMode::Board => self.board.move_row(step),
            ViewMode::Detail { .. } => self.scroll_detail(delta * WHEEL_STEP),
            ViewMode::Help { .. } => {}
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Editing
    // ─────────────────────────────────────────────────────────────────────────

    fn open_modal(&mut self, modal: Modal) {
        self.search_mode = false;
        self.modal = Some(modal);
    }

    /// Build a modal for the selected issue. Nothing happens without one.
    fn with_selected(&mut self, build: impl FnOnce(&mut Self, &Issue) -> Option<Modal>) {
        let Some(issue) = self.selected_issue().cloned() else {
            return;
        };
        if let Some(modal) = build(self, &issue) {
            self.open_modal(modal);
        }
    }

    fn handle_modal_key(&mut self, key: ModalKey) {
        let Some(modal) = self.modal.as_mut() else {
            return;
        };
        match modal.handle_key(key) {
            ModalOutcome::Pending => {}
            ModalOutcome::Cancel => self.modal = None,
            ModalOutcome::Invalid(reason) => self.set_status(reason, true),
            ModalOutcome::Submit(mutation) => {
                self.modal = None;
                self.start_mutation(mutation);
            }
        }
    }

    /// Run a write in the background; its result comes back as
    /// [`Message::MutationDone`].
    pub fn start_mutation(&mut self, mutation: Mutation) {
        let client = self.client.clone();
        let tx = self.background_tx.clone();
        tokio::spawn(async move {
            let result = client.apply(&mutation).await.map_err(|e| format!("{:#}", e));
            let _ = tx.send(Message::MutationDone { mutation, result });
        });
    }

    fn finish_mutation(&mut self, mutation: Mutation, result: Result<Option<String>, String>) {
        match result {
            Ok(created) => {
                self.set_status(done_message(&mutation, created.as_deref()), false);
                let in_detail = mutation.issue_id().is_some()
                    && self.detail_id.as_deref() == mutation.issue_id();
                match &mutation {
                    Mutation::Delete { .. } if in_detail => self.back(),
                    Mutation::AddComment { id, .. } if in_detail => self.load_comments(id.clone()),
                    _ => {}
                }
            }
            Err(e) => {
                tracing::error!("Failed to {}: {}", mutation.describe(), e);
                self.set_status(format!("Failed to {}: {}", mutation.describe(), e), true);
            }
        }
        self.request_refresh();
    }

    fn load_comments(&mut self, id: String) {
        let client = self.client.clone();
        let tx = self.background_tx.clone();
        tokio::spawn(async move {
            let result = client.comments(&id).await.map_err(|e| format!("{:#}", e));
            let _ = tx.send(Message::CommentsLoaded { id, result });
        });
    }

    fn finish_comments(&mut self, id: String, result: Result<Vec<Comment>, String>) {
        if self.detail_id.as_deref() != Some(id.as_str()) {
            return;
        }
        match result {
            Ok(comments) => self.comments = Some(comments),
            Err(e) => {
                tracing::warn!("Failed to load comments for {}: {}", id, e);
                self.set_status(format!("Failed to load comments: {}", e), true);
            }
        }
    }

    /// Comments of the detail issue, once loaded.
    pub fn detail_comments(&self) -> Option<&[Comment]> {
        self.comments.as_deref()
    }

    fn edit_description(&mut self) {
        let Some(issue) = self.selected_issue() else {
            return;
        };
        self.editor_request = Some(EditorRequest {
            id: issue.id.clone(),
            text: issue.description.clone(),
        });
    }

    /// Pending `$EDITOR` session for the event loop to run.
    pub fn take_editor_request(&mut self) -> Option<EditorRequest> {
        self.editor_request.take()
    }

    fn finish_editor(&mut self, id: String, result: Result<String, String>) {
        let text = match result {
            Ok(text) => text.trim_end().to_string(),
            Err(e) => {
                tracing::error!("Editor failed: {}", e);
                self.set_status(format!("Editor failed: {}", e), true);
                return;
            }
        };

        let unchanged = self
            .snapshot
            .get(&id)
            .is_some_and(|issue| issue.description.trim_end() == text);
        if unchanged {
            self.set_status("Description unchanged", false);
            return;
        }

        self.start_mutation(Mutation::Update {
            id,
            update: IssueUpdate {
                description: Some(text),
                ..IssueUpdate::default()
            },
        });
    }

    fn copy_id(&mut self) {
        let Some(id) = self.selected_issue().map(|i| i.id.clone()) else {
            return;
        };
        self.set_status(format!("Copied {}", id), false);
        self.clipboard = Some(id);
    }

    /// Text waiting to be written to the terminal clipboard.
    pub fn take_clipboard(&mut self) -> Option<String> {
        self.clipboard.take()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Custom commands
    // ─────────────────────────────────────────────────────────────────────────

    fn run_custom_command(&mut self, idx: usize) {
        let Some(command) = self.config.custom_commands.get(idx).cloned() else {
            return;
        };
        let Some(issue) = self.selected_issue().cloned() else {
            return;
        };
        match commands::spawn(&command, &issue) {
            Ok(()) => {
                let label = if command.description.is_empty() {
                    command.key.clone()
                } else {
                    command.description.clone()
                };
                self.set_status(format!("Ran {} on {}", label, issue.id), false);
            }
            Err(e) => {
                tracing::error!("Custom command failed: {:#}", e);
                self.set_status(format!("{:#}", e), true);
            }
        }
    }
}

/// Status line for a write that went through.
fn done_message(mutation: &Mutation, created: Option<&str>) -> String {
    match mutation {
        Mutation::Create(new) => format!("Created {}", created.unwrap_or(new.title.as_str())),
        Mutation::Update { id, .. } => format!("Updated {}", id),
        Mutation::Close { id } => format!("Closed {}", id),
        Mutation::Delete { id } => format!("Deleted {}", id),
        Mutation::AddComment { id, .. } => format!("Commented on {}", id),
        Mutation::AddBlocker { id, blocker } => format!("{} now blocks {}", blocker, id),
        Mutation::RemoveBlocker { id, blocker } => format!("{} no longer blocks {}", blocker, id),
    }
}
