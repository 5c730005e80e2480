//! Drag reorder resolution.
//!
//! Translates a finished drag gesture into the local relocation and the
//! move request sent to the server. The gesture source is abstracted behind
//! `ReorderSink` so the logic does not care whether a mouse, a keyboard
//! shortcut or a test produced it.

use crate::api::{Board, MoveTaskRequest};

/// Column and index a drag started from or was dropped on.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DropLocation {
    pub column_id: String,
    pub index: usize,
}

impl DropLocation {
    pub fn new(column_id: &str, index: usize) -> Self {
        DropLocation {
            column_id: column_id.to_string(),
            index,
        }
    }
}

/// Finished drag gesture.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DragEnd {
    pub task_id: String,
    pub source: DropLocation,
    pub destination: Option<DropLocation>,
}

/// Receives finished reorder gestures.
///
pub trait ReorderSink {
    fn on_reorder(&self, task_id: &str, from: DropLocation, to: Option<DropLocation>);
}

/// Decide whether a drag results in a move. Returns the request to send, or
/// None when the drop is a no-op: no destination, dropped where it started,
/// or the task is not in the source column.
///
pub fn resolve(board: &Board, drag: &DragEnd) -> Option<MoveTaskRequest> {
    let destination = drag.destination.as_ref()?;
    if *destination == drag.source {
        return None;
    }
    let source_column = board.column(&drag.source.column_id)?;
    if !source_column.tasks.iter().any(|t| t.id == drag.task_id) {
        return None;
    }
    board.column(&destination.column_id)?;

    Some(MoveTaskRequest {
        task_id: drag.task_id.clone(),
        source_column_id: drag.source.column_id.clone(),
        destination_column_id: destination.column_id.clone(),
        source_index: drag.source.index,
        destination_index: destination.index,
    })
}

/// Direction of a keyboard move.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Shift {
    Left,
    Right,
}

/// Build the drag gesture for moving a task one column left or right. The
/// task is dropped at the end of the neighbouring column.
///
pub fn keyboard_drag(board: &Board, task_id: &str, shift: Shift) -> Option<DragEnd> {
    let (column_index, task_index) = board.locate_task(task_id)?;
    let target_index = match shift {
        Shift::Left => column_index.checked_sub(1)?,
        Shift::Right => column_index + 1,
    };
    let target = board.columns.get(target_index)?;
    Some(DragEnd {
        task_id: task_id.to_string(),
        source: DropLocation::new(&board.columns[column_index].id, task_index),
        destination: Some(DropLocation::new(&target.id, target.tasks.len())),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::store::tests::sample_board;
    use std::cell::RefCell;

    fn drag(task_id: &str, from: (&str, usize), to: Option<(&str, usize)>) -> DragEnd {
        DragEnd {
            task_id: task_id.to_string(),
            source: DropLocation::new(from.0, from.1),
            destination: to.map(|(c, i)| DropLocation::new(c, i)),
        }
    }

    #[test]
    fn test_resolve_no_destination_is_noop() {
        let board = sample_board();
        assert!(resolve(&board, &drag("t1", ("c1", 0), None)).is_none());
    }

    #[test]
    fn test_resolve_same_location_is_noop() {
        let board = sample_board();
        assert!(resolve(&board, &drag("t1", ("c1", 0), Some(("c1", 0)))).is_none());
    }

    #[test]
    fn test_resolve_task_absent_from_source_is_noop() {
        let board = sample_board();
        assert!(resolve(&board, &drag("t3", ("c1", 0), Some(("c2", 0)))).is_none());
        assert!(resolve(&board, &drag("t1", ("c1", 0), Some(("gone", 0)))).is_none());
    }

    #[test]
    fn test_resolve_builds_request() {
        let board = sample_board();
        let request = resolve(&board, &drag("t2", ("c1", 1), Some(("c3", 0)))).unwrap();
        assert_eq!(request.task_id, "t2");
        assert_eq!(request.source_column_id, "c1");
        assert_eq!(request.destination_column_id, "c3");
        assert_eq!(request.source_index, 1);
        assert_eq!(request.destination_index, 0);
    }

    #[test]
    fn test_resolve_within_column_reorder() {
        let board = sample_board();
        assert!(resolve(&board, &drag("t1", ("c1", 0), Some(("c1", 1)))).is_some());
    }

    #[test]
    fn test_keyboard_drag_targets_end_of_neighbour() {
        let board = sample_board();
        let gesture = keyboard_drag(&board, "t2", Shift::Right).unwrap();
        assert_eq!(gesture.source, DropLocation::new("c1", 1));
        assert_eq!(gesture.destination, Some(DropLocation::new("c2", 1)));

        assert!(keyboard_drag(&board, "t1", Shift::Left).is_none());
        assert!(keyboard_drag(&board, "missing", Shift::Right).is_none());
    }

    #[test]
    fn test_sink_receives_gesture() {
        struct Recorder(RefCell<Vec<DragEnd>>);
        impl ReorderSink for Recorder {
            fn on_reorder(&self, task_id: &str, from: DropLocation, to: Option<DropLocation>) {
                self.0.borrow_mut().push(DragEnd {
                    task_id: task_id.to_string(),
                    source: from,
                    destination: to,
                });
            }
        }

        let board = sample_board();
        let recorder = Recorder(RefCell::new(vec![]));
        if let Some(gesture) = keyboard_drag(&board, "t3", Shift::Right) {
            recorder.on_reorder(&gesture.task_id, gesture.source, gesture.destination);
        }
        let received = recorder.0.borrow();
        assert_eq!(received.len(), 1);
        assert_eq!(
            received[0].destination,
            Some(DropLocation::new("c3", 0))
        );
    }
}
