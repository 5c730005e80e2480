use super::{
    board, column_form, confirm, filters, finder, footer, header, log, task_form, Frame,
};
use crate::state::{State, View};
use ratatui::layout::{Constraint, Direction, Layout};

/// Render all blocks, then the overlay for the current view on top.
///
pub fn all(frame: &mut Frame, state: &mut State) {
    let mut constraints = vec![Constraint::Length(3), Constraint::Min(5)];
    if state.is_showing_logs() {
        constraints.push(Constraint::Length(8));
    }
    constraints.push(Constraint::Length(1));

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.size());

    header(frame, rows[0], state);
    board(frame, rows[1], state);
    if state.is_showing_logs() {
        log(frame, rows[2], state);
    }
    footer(frame, rows[rows.len() - 1], state);

    let size = frame.size();
    match state.current_view() {
        View::Board => (),
        View::Filters => filters(frame, size, state),
        View::TaskForm => task_form(frame, size, state),
        View::ColumnForm => column_form(frame, size, state),
        View::Confirm => confirm(frame, size, state),
        View::Finder => finder(frame, size, state),
    }
}
