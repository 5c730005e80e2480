use crate::api::{Board, Column, SearchHit, Task, User};
use crate::app::NetworkEventSender;
use crate::board::filter;
use crate::board::reorder::keyboard_drag;
use crate::board::{BoardStore, FilterOptions, FilterSelection, FilteredColumn, ReorderSink, Shift};
use crate::events::network::Event as NetworkEvent;
use crate::logger::LogBuffer;
use crate::ui::{Theme, SPINNER_FRAME_COUNT};
use crate::utils::debounce::Debouncer;
use log::*;
use ratatui::layout::Rect;
use std::sync::Mutex as StdMutex;
use std::time::Duration;

use super::form::{ColumnForm, TaskForm};
use super::navigation::{Confirm, FilterEntry, FilterKind, View};

/// Cross-board task search overlay.
///
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Finder {
    pub query: String,
    pub results: Vec<SearchHit>,
    pub searching: bool,
    pub index: usize,
}

/// Houses data representative of application state.
///
pub struct State {
    net_sender: Option<NetworkEventSender>,
    board: BoardStore,
    filters: FilterSelection,
    filter_options: FilterOptions,
    users: Vec<User>,
    view_stack: Vec<View>,
    column_index: usize, // Into the filtered projection
    task_index: usize,
    search_mode: bool,
    filter_index: usize,
    task_form: Option<TaskForm>,
    column_form: Option<ColumnForm>,
    confirm: Option<Confirm>,
    finder: Finder,
    finder_debouncer: Option<Debouncer<String>>,
    finder_delay: Duration,
    logs: LogBuffer,
    show_logs: bool,
    spinner_index: usize,
    theme: Theme,
    terminal_size: Rect,
    status_message: Option<String>,
}

/// Defines default application state.
///
impl Default for State {
    fn default() -> State {
        State {
            net_sender: None,
            board: BoardStore::new(),
            filters: FilterSelection::new(),
            filter_options: FilterOptions::default(),
            users: vec![],
            view_stack: vec![View::Board],
            column_index: 0,
            task_index: 0,
            search_mode: false,
            filter_index: 0,
            task_form: None,
            column_form: None,
            confirm: None,
            finder: Finder::default(),
            finder_debouncer: None,
            finder_delay: Duration::from_millis(500),
            logs: LogBuffer::new(),
            show_logs: false,
            spinner_index: 0,
            theme: Theme::default(),
            terminal_size: Rect::default(),
            status_message: None,
        }
    }
}

impl State {
    /// Return new state wired to the network thread. Finder queries are
    /// debounced by `finder_delay` before they are sent.
    ///
    pub fn new(
        net_sender: NetworkEventSender,
        logs: LogBuffer,
        theme: Theme,
        finder_delay: Duration,
    ) -> Self {
        let search_sender = StdMutex::new(net_sender.clone());
        let finder_debouncer = Debouncer::new(move |query: String| {
            if let Ok(sender) = search_sender.lock() {
                if let Err(e) = sender.send(NetworkEvent::SearchTasks { query }) {
                    warn!("Failed to dispatch search: {}", e);
                }
            }
        });
        State {
            net_sender: Some(net_sender),
            finder_debouncer: Some(finder_debouncer),
            finder_delay,
            logs,
            theme,
            ..State::default()
        }
    }

    fn dispatch(&self, event: NetworkEvent) {
        match &self.net_sender {
            Some(sender) => {
                if let Err(e) = sender.send(event) {
                    error!("Failed to dispatch network event: {}", e);
                }
            }
            None => debug!("Dropping network event '{:?}' without sender", event),
        }
    }

    /// Replace the board snapshot and keep derived state consistent with it.
    ///
    pub fn set_board_snapshot(&mut self, store: BoardStore) -> &mut Self {
        self.board = store;
        self.filter_options = FilterOptions::derive(self.board.columns());
        self.clamp_cursor();
        self
    }

    pub fn get_board_store(&self) -> &BoardStore {
        &self.board
    }

    pub fn get_board(&self) -> Option<&Board> {
        self.board.board()
    }

    /// Columns with only the tasks passing the active filters.
    ///
    pub fn visible_columns(&self) -> Vec<FilteredColumn<'_>> {
        filter::apply(self.board.columns(), &self.filters)
    }

    pub fn get_column_index(&self) -> usize {
        self.column_index
    }

    pub fn get_task_index(&self) -> usize {
        self.task_index
    }

    pub fn selected_column(&self) -> Option<&Column> {
        self.board.columns().get(self.column_index)
    }

    pub fn selected_task(&self) -> Option<&Task> {
        let column = self.board.columns().get(self.column_index)?;
        column
            .tasks
            .iter()
            .filter(|task| self.filters.matches(task, column))
            .nth(self.task_index)
    }

    fn visible_task_count(&self, column_index: usize) -> usize {
        match self.board.columns().get(column_index) {
            Some(column) => column
                .tasks
                .iter()
                .filter(|task| self.filters.matches(task, column))
                .count(),
            None => 0,
        }
    }

    fn clamp_cursor(&mut self) {
        let columns = self.board.columns().len();
        if columns == 0 {
            self.column_index = 0;
            self.task_index = 0;
            return;
        }
        self.column_index = self.column_index.min(columns - 1);
        let tasks = self.visible_task_count(self.column_index);
        self.task_index = self.task_index.min(tasks.saturating_sub(1));
    }

    pub fn next_column(&mut self) -> &mut Self {
        if self.column_index + 1 < self.board.columns().len() {
            self.column_index += 1;
        }
        self.clamp_cursor();
        self
    }

    pub fn previous_column(&mut self) -> &mut Self {
        self.column_index = self.column_index.saturating_sub(1);
        self.clamp_cursor();
        self
    }

    pub fn next_task(&mut self) -> &mut Self {
        if self.task_index + 1 < self.visible_task_count(self.column_index) {
            self.task_index += 1;
        }
        self
    }

    pub fn previous_task(&mut self) -> &mut Self {
        self.task_index = self.task_index.saturating_sub(1);
        self
    }

    /// Move the selected task to the neighbouring column. The cursor follows
    /// it to the bottom of the target column.
    ///
    pub fn move_selected_task(&mut self, shift: Shift) -> &mut Self {
        let drag = match (self.board.board(), self.selected_task()) {
            (Some(board), Some(task)) => keyboard_drag(board, &task.id, shift),
            _ => None,
        };
        let drag = match drag {
            Some(drag) => drag,
            None => return self,
        };
        if let Some(sender) = &self.net_sender {
            sender.on_reorder(&drag.task_id, drag.source, drag.destination);
        }
        match shift {
            Shift::Left => self.column_index = self.column_index.saturating_sub(1),
            Shift::Right => self.column_index += 1,
        }
        self.task_index = usize::MAX;
        self.clamp_cursor();
        self
    }

    pub fn reload(&mut self) -> &mut Self {
        self.dispatch(NetworkEvent::Reload { silent: false });
        self
    }

    /// Views
    ///
    pub fn current_view(&self) -> &View {
        self.view_stack.last().unwrap_or(&View::Board)
    }

    pub fn push_view(&mut self, view: View) -> &mut Self {
        self.view_stack.push(view);
        self
    }

    /// Close the top overlay. The board view itself stays.
    ///
    pub fn pop_view(&mut self) -> &mut Self {
        if self.view_stack.len() > 1 {
            self.view_stack.pop();
        }
        self
    }

    /// Search
    ///
    pub fn is_search_mode(&self) -> bool {
        self.search_mode
    }

    pub fn start_search(&mut self) -> &mut Self {
        self.search_mode = true;
        self
    }

    pub fn finish_search(&mut self) -> &mut Self {
        self.search_mode = false;
        self
    }

    pub fn add_search_char(&mut self, c: char) -> &mut Self {
        let mut search = self.filters.search.clone();
        search.push(c);
        self.filters.set_search(&search);
        self.clamp_cursor();
        self
    }

    pub fn remove_search_char(&mut self) -> &mut Self {
        let mut search = self.filters.search.clone();
        search.pop();
        self.filters.set_search(&search);
        self.clamp_cursor();
        self
    }

    /// Filters
    ///
    pub fn get_filters(&self) -> &FilterSelection {
        &self.filters
    }

    pub fn get_filter_options(&self) -> &FilterOptions {
        &self.filter_options
    }

    /// Rows of the filter menu: priorities, then statuses, then assignees.
    ///
    pub fn filter_entries(&self) -> Vec<FilterEntry> {
        let options = &self.filter_options;
        let priorities = options.priorities.iter().map(|p| FilterEntry {
            kind: FilterKind::Priority,
            value: p.clone(),
            label: p.clone(),
        });
        let statuses = options.statuses.iter().map(|s| FilterEntry {
            kind: FilterKind::Status,
            value: s.clone(),
            label: s.clone(),
        });
        let assignees = options.assignees.iter().map(|a| FilterEntry {
            kind: FilterKind::Assignee,
            value: a.id.clone(),
            label: a.name.clone(),
        });
        priorities.chain(statuses).chain(assignees).collect()
    }

    pub fn is_filter_selected(&self, entry: &FilterEntry) -> bool {
        match entry.kind {
            FilterKind::Priority => self
                .filters
                .priorities
                .iter()
                .any(|p| p.eq_ignore_ascii_case(&entry.value)),
            FilterKind::Status => self.filters.statuses.contains(&entry.value),
            FilterKind::Assignee => self.filters.assignees.contains(&entry.value),
        }
    }

    pub fn get_filter_index(&self) -> usize {
        self.filter_index
    }

    pub fn open_filters(&mut self) -> &mut Self {
        self.filter_index = 0;
        self.push_view(View::Filters)
    }

    pub fn next_filter(&mut self) -> &mut Self {
        if self.filter_index + 1 < self.filter_entries().len() {
            self.filter_index += 1;
        }
        self
    }

    pub fn previous_filter(&mut self) -> &mut Self {
        self.filter_index = self.filter_index.saturating_sub(1);
        self
    }

    pub fn toggle_selected_filter(&mut self) -> &mut Self {
        if let Some(entry) = self.filter_entries().get(self.filter_index) {
            match entry.kind {
                FilterKind::Priority => self.filters.toggle_priority(&entry.value),
                FilterKind::Status => self.filters.toggle_status(&entry.value),
                FilterKind::Assignee => self.filters.toggle_assignee(&entry.value),
            };
        }
        self.clamp_cursor();
        self
    }

    pub fn clear_filters(&mut self) -> &mut Self {
        self.filters.clear();
        self.clamp_cursor();
        self
    }

    /// Task form
    ///
    pub fn open_create_task(&mut self) -> &mut Self {
        let column_id = match self.selected_column() {
            Some(column) => column.id.clone(),
            None => {
                self.set_status_message("Create a column first");
                return self;
            }
        };
        self.task_form = Some(TaskForm::create(&column_id));
        self.push_view(View::TaskForm)
    }

    pub fn open_edit_task(&mut self) -> &mut Self {
        let form = match (self.selected_column(), self.selected_task()) {
            (Some(column), Some(task)) if !task.placeholder => {
                Some(TaskForm::edit(task, &column.id))
            }
            _ => None,
        };
        if let Some(form) = form {
            self.task_form = Some(form);
            self.push_view(View::TaskForm);
        }
        self
    }

    pub fn get_task_form(&self) -> Option<&TaskForm> {
        self.task_form.as_ref()
    }

    pub fn get_task_form_mut(&mut self) -> Option<&mut TaskForm> {
        self.task_form.as_mut()
    }

    /// Cycle the focused choice field using the loaded columns and users.
    ///
    pub fn cycle_task_form(&mut self, forward: bool) -> &mut Self {
        if let Some(form) = self.task_form.as_mut() {
            form.cycle(forward, self.board.columns(), &self.users);
        }
        self
    }

    /// Validate and send the form. Returns false when validation failed and
    /// the form stays open with its error set.
    ///
    pub fn submit_task_form(&mut self) -> bool {
        let form = match self.task_form.as_mut() {
            Some(form) => form,
            None => return false,
        };
        if let Err(e) = form.validate() {
            form.error = Some(e.to_string());
            return false;
        }
        let event = match &form.task_id {
            Some(task_id) => NetworkEvent::UpdateTask {
                task_id: task_id.clone(),
                update: form.update(),
            },
            None => NetworkEvent::CreateTask(form.draft()),
        };
        self.task_form = None;
        self.pop_view();
        self.dispatch(event);
        true
    }

    pub fn cancel_task_form(&mut self) -> &mut Self {
        self.task_form = None;
        self.pop_view()
    }

    /// Column form
    ///
    pub fn open_column_form(&mut self) -> &mut Self {
        self.column_form = Some(ColumnForm::default());
        self.push_view(View::ColumnForm)
    }

    pub fn get_column_form(&self) -> Option<&ColumnForm> {
        self.column_form.as_ref()
    }

    pub fn get_column_form_mut(&mut self) -> Option<&mut ColumnForm> {
        self.column_form.as_mut()
    }

    pub fn submit_column_form(&mut self) -> bool {
        let form = match self.column_form.as_mut() {
            Some(form) => form,
            None => return false,
        };
        if let Err(e) = form.validate() {
            form.error = Some(e.to_string());
            return false;
        }
        let name = form.name.trim().to_string();
        self.column_form = None;
        self.pop_view();
        self.dispatch(NetworkEvent::CreateColumn { name });
        true
    }

    pub fn cancel_column_form(&mut self) -> &mut Self {
        self.column_form = None;
        self.pop_view()
    }

    /// Confirmation
    ///
    pub fn confirm_delete_task(&mut self) -> &mut Self {
        let confirm = self.selected_task().map(|task| Confirm::DeleteTask {
            id: task.id.clone(),
            title: task.title.clone(),
        });
        if let Some(confirm) = confirm {
            self.confirm = Some(confirm);
            self.push_view(View::Confirm);
        }
        self
    }

    pub fn confirm_delete_column(&mut self) -> &mut Self {
        let confirm = self.selected_column().map(|column| Confirm::DeleteColumn {
            id: column.id.clone(),
            name: column.name.clone(),
        });
        if let Some(confirm) = confirm {
            self.confirm = Some(confirm);
            self.push_view(View::Confirm);
        }
        self
    }

    pub fn get_confirm(&self) -> Option<&Confirm> {
        self.confirm.as_ref()
    }

    pub fn accept_confirm(&mut self) -> &mut Self {
        if let Some(confirm) = self.confirm.take() {
            match confirm {
                Confirm::DeleteTask { id, .. } => {
                    self.dispatch(NetworkEvent::DeleteTask { task_id: id })
                }
                Confirm::DeleteColumn { id, .. } => {
                    self.dispatch(NetworkEvent::DeleteColumn { column_id: id })
                }
            }
            self.pop_view();
        }
        self
    }

    pub fn cancel_confirm(&mut self) -> &mut Self {
        self.confirm = None;
        self.pop_view()
    }

    /// Finder
    ///
    pub fn get_finder(&self) -> &Finder {
        &self.finder
    }

    pub fn open_finder(&mut self) -> &mut Self {
        self.finder = Finder::default();
        self.push_view(View::Finder)
    }

    pub fn close_finder(&mut self) -> &mut Self {
        if let Some(debouncer) = &self.finder_debouncer {
            debouncer.cancel();
        }
        self.finder = Finder::default();
        self.pop_view()
    }

    pub fn add_finder_char(&mut self, c: char) -> &mut Self {
        self.finder.query.push(c);
        self.schedule_finder_search();
        self
    }

    pub fn remove_finder_char(&mut self) -> &mut Self {
        self.finder.query.pop();
        self.schedule_finder_search();
        self
    }

    fn schedule_finder_search(&mut self) {
        let debouncer = match &self.finder_debouncer {
            Some(debouncer) => debouncer,
            None => return,
        };
        if self.finder.query.trim().is_empty() {
            debouncer.cancel();
            self.finder.results.clear();
            self.finder.searching = false;
            return;
        }
        self.finder.searching = true;
        debouncer.start(self.finder.query.clone(), self.finder_delay);
    }

    /// Store results for `query`. Results for a query the user has since
    /// edited are dropped.
    ///
    pub fn set_finder_results(&mut self, query: &str, results: Vec<SearchHit>) -> &mut Self {
        if query != self.finder.query {
            debug!("Discarding stale search results for '{}'", query);
            return self;
        }
        self.finder.results = results;
        self.finder.searching = false;
        self.finder.index = 0;
        self
    }

    pub fn next_finder_result(&mut self) -> &mut Self {
        if self.finder.index + 1 < self.finder.results.len() {
            self.finder.index += 1;
        }
        self
    }

    pub fn previous_finder_result(&mut self) -> &mut Self {
        self.finder.index = self.finder.index.saturating_sub(1);
        self
    }

    /// Jump to the highlighted hit when it lives on this board.
    ///
    pub fn open_finder_result(&mut self) -> &mut Self {
        let hit = match self.finder.results.get(self.finder.index) {
            Some(hit) => hit.clone(),
            None => return self,
        };
        let location = self.board.board().and_then(|b| b.locate_task(&hit.task.id));
        match location {
            Some((column_index, _)) => {
                self.close_finder();
                self.filters.clear();
                self.column_index = column_index;
                self.task_index = self.board.columns()[column_index]
                    .tasks
                    .iter()
                    .position(|t| t.id == hit.task.id)
                    .unwrap_or(0);
                self.clamp_cursor();
            }
            None => {
                let board = hit.board_name.unwrap_or_else(|| "another board".to_string());
                self.set_status_message(&format!("'{}' is on {}", hit.task.title, board));
            }
        }
        self
    }

    /// Users
    ///
    pub fn get_users(&self) -> &[User] {
        &self.users
    }

    pub fn set_users(&mut self, users: Vec<User>) -> &mut Self {
        self.users = users;
        self
    }

    /// Misc
    ///
    pub fn get_logs(&self) -> &LogBuffer {
        &self.logs
    }

    pub fn is_showing_logs(&self) -> bool {
        self.show_logs
    }

    pub fn toggle_logs(&mut self) -> &mut Self {
        self.show_logs = !self.show_logs;
        self
    }

    pub fn get_spinner_index(&self) -> usize {
        self.spinner_index
    }

    pub fn advance_spinner_index(&mut self) -> &mut Self {
        self.spinner_index = (self.spinner_index + 1) % SPINNER_FRAME_COUNT;
        self
    }

    pub fn get_theme(&self) -> &Theme {
        &self.theme
    }

    pub fn get_terminal_size(&self) -> Rect {
        self.terminal_size
    }

    pub fn set_terminal_size(&mut self, size: Rect) -> &mut Self {
        self.terminal_size = size;
        self
    }

    pub fn get_status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn set_status_message(&mut self, message: &str) -> &mut Self {
        self.status_message = Some(message.to_string());
        self
    }

    pub fn clear_status_message(&mut self) -> &mut Self {
        self.status_message = None;
        self
    }
}
