use crate::board::Shift;
use crate::state::{State, View};
use anyhow::Result;
use crossterm::{
    event,
    event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
};
use log::*;
use std::{sync::mpsc, thread, time::Duration};

/// Specify terminal event poll rate in milliseconds.
///
const TICK_RATE_IN_MS: u64 = 60;

/// Specify different terminal event types.
///
#[derive(Debug)]
pub enum Event<I> {
    Input(I),
    Tick,
}

/// Specify struct for managing terminal events channel.
///
pub struct Handler {
    rx: mpsc::Receiver<Event<KeyEvent>>,
    _tx: mpsc::Sender<Event<KeyEvent>>,
}

impl Default for Handler {
    fn default() -> Self {
        Handler::new()
    }
}

impl Handler {
    /// Return new instance after spawning new input polling thread.
    ///
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        let tx_clone = tx.clone();
        thread::spawn(move || loop {
            let tick_rate = Duration::from_millis(TICK_RATE_IN_MS);
            match event::poll(tick_rate) {
                Ok(true) => {
                    if let Ok(CrosstermEvent::Key(key)) = event::read() {
                        if tx_clone.send(Event::Input(key)).is_err() {
                            break;
                        }
                    }
                }
                Ok(false) => (),
                Err(e) => {
                    error!("Failed to poll terminal events: {}", e);
                    break;
                }
            }
            if tx_clone.send(Event::Tick).is_err() {
                break;
            }
        });
        Handler { rx, _tx: tx }
    }

    /// Receive next terminal event and handle it accordingly. Returns result
    /// with value true if should continue or false if exit was requested.
    ///
    pub fn handle_next(&self, state: &mut State) -> Result<bool> {
        match self.rx.recv()? {
            Event::Input(event) => return Ok(handle_key(state, event)),
            Event::Tick => {
                state.advance_spinner_index();
            }
        }
        Ok(true)
    }
}

/// Apply one key press to state. Returns false if exit was requested.
///
pub fn handle_key(state: &mut State, event: KeyEvent) -> bool {
    if event.kind != KeyEventKind::Press {
        return true;
    }
    if let KeyEvent {
        code: KeyCode::Char('c'),
        modifiers: KeyModifiers::CONTROL,
        ..
    } = event
    {
        debug!("Processing exit terminal event '{:?}'...", event);
        return false;
    }
    match state.current_view().clone() {
        View::Board if state.is_search_mode() => search_key(state, event),
        View::Board => return board_key(state, event),
        View::Filters => filters_key(state, event),
        View::TaskForm => task_form_key(state, event),
        View::ColumnForm => column_form_key(state, event),
        View::Confirm => confirm_key(state, event),
        View::Finder => finder_key(state, event),
    }
    true
}

fn board_key(state: &mut State, event: KeyEvent) -> bool {
    match event.code {
        KeyCode::Char('q') => {
            debug!("Processing exit terminal event '{:?}'...", event);
            return false;
        }
        KeyCode::Char('h') | KeyCode::Left => {
            state.previous_column();
        }
        KeyCode::Char('l') | KeyCode::Right => {
            state.next_column();
        }
        KeyCode::Char('j') | KeyCode::Down => {
            state.next_task();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.previous_task();
        }
        KeyCode::Char('H') => {
            state.move_selected_task(Shift::Left);
        }
        KeyCode::Char('L') => {
            state.move_selected_task(Shift::Right);
        }
        KeyCode::Char('/') => {
            state.start_search();
        }
        KeyCode::Char('f') => {
            state.open_filters();
        }
        KeyCode::Char('n') => {
            state.open_create_task();
        }
        KeyCode::Char('e') | KeyCode::Enter => {
            state.open_edit_task();
        }
        KeyCode::Char('d') => {
            state.confirm_delete_task();
        }
        KeyCode::Char('C') => {
            state.open_column_form();
        }
        KeyCode::Char('X') => {
            state.confirm_delete_column();
        }
        KeyCode::Char('r') => {
            state.reload();
        }
        KeyCode::Char('?') => {
            state.open_finder();
        }
        KeyCode::Char('g') => {
            state.toggle_logs();
        }
        KeyCode::Esc => {
            state.clear_status_message();
        }
        _ => (),
    }
    true
}

fn search_key(state: &mut State, event: KeyEvent) {
    match event.code {
        KeyCode::Char(c) => {
            state.add_search_char(c);
        }
        KeyCode::Backspace => {
            state.remove_search_char();
        }
        KeyCode::Enter | KeyCode::Esc => {
            state.finish_search();
        }
        _ => (),
    }
}

fn filters_key(state: &mut State, event: KeyEvent) {
    match event.code {
        KeyCode::Char('j') | KeyCode::Down => {
            state.next_filter();
        }
        KeyCode::Char('k') | KeyCode::Up => {
            state.previous_filter();
        }
        KeyCode::Char(' ') | KeyCode::Enter => {
            state.toggle_selected_filter();
        }
        KeyCode::Char('c') => {
            state.clear_filters();
        }
        KeyCode::Esc | KeyCode::Char('f') | KeyCode::Char('q') => {
            state.pop_view();
        }
        _ => (),
    }
}

fn task_form_key(state: &mut State, event: KeyEvent) {
    let text_field = match state.get_task_form() {
        Some(form) => form.field.is_text(),
        None => {
            state.pop_view();
            return;
        }
    };
    match event.code {
        KeyCode::Esc => {
            state.cancel_task_form();
        }
        KeyCode::Enter => {
            state.submit_task_form();
        }
        KeyCode::Tab | KeyCode::Down => {
            if let Some(form) = state.get_task_form_mut() {
                form.next_field();
            }
        }
        KeyCode::BackTab | KeyCode::Up => {
            if let Some(form) = state.get_task_form_mut() {
                form.previous_field();
            }
        }
        KeyCode::Char(c) if text_field => {
            if let Some(form) = state.get_task_form_mut() {
                form.input(c);
            }
        }
        KeyCode::Backspace if text_field => {
            if let Some(form) = state.get_task_form_mut() {
                form.backspace();
            }
        }
        KeyCode::Left | KeyCode::Char('h') => {
            state.cycle_task_form(false);
        }
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
            state.cycle_task_form(true);
        }
        _ => (),
    }
}

fn column_form_key(state: &mut State, event: KeyEvent) {
    match event.code {
        KeyCode::Esc => {
            state.cancel_column_form();
        }
        KeyCode::Enter => {
            state.submit_column_form();
        }
        KeyCode::Char(c) => {
            if let Some(form) = state.get_column_form_mut() {
                form.input(c);
            }
        }
        KeyCode::Backspace => {
            if let Some(form) = state.get_column_form_mut() {
                form.backspace();
            }
        }
        _ => (),
    }
}

fn confirm_key(state: &mut State, event: KeyEvent) {
    match event.code {
        KeyCode::Char('y') | KeyCode::Enter => {
            state.accept_confirm();
        }
        KeyCode::Char('n') | KeyCode::Esc => {
            state.cancel_confirm();
        }
        _ => (),
    }
}

fn finder_key(state: &mut State, event: KeyEvent) {
    match event {
        KeyEvent {
            code: KeyCode::Char('n'),
            modifiers: KeyModifiers::CONTROL,
            ..
        }
        | KeyEvent {
            code: KeyCode::Down,
            ..
        } => {
            state.next_finder_result();
        }
        KeyEvent {
            code: KeyCode::Char('p'),
            modifiers: KeyModifiers::CONTROL,
            ..
        }
        | KeyEvent { code: KeyCode::Up, .. } => {
            state.previous_finder_result();
        }
        KeyEvent {
            code: KeyCode::Esc, ..
        } => {
            state.close_finder();
        }
        KeyEvent {
            code: KeyCode::Enter,
            ..
        } => {
            state.open_finder_result();
        }
        KeyEvent {
            code: KeyCode::Backspace,
            ..
        } => {
            state.remove_finder_char();
        }
        KeyEvent {
            code: KeyCode::Char(c),
            ..
        } => {
            state.add_finder_char(c);
        }
        _ => (),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::store::tests::sample_board;
    use crate::board::BoardStore;
    use crate::state::TaskField;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn state() -> State {
        let mut store = BoardStore::new();
        store.mount();
        let generation = store.begin_load(false);
        store.finish_load(generation, false, Ok(sample_board()));
        let mut state = State::default();
        state.set_board_snapshot(store);
        state
    }

    #[test]
    fn quit_keys() {
        let mut state = state();
        assert!(!handle_key(
            &mut state,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)
        ));
        assert!(!handle_key(&mut state, press(KeyCode::Char('q'))));
    }

    #[test]
    fn q_types_into_search_instead_of_quitting() {
        let mut state = state();
        handle_key(&mut state, press(KeyCode::Char('/')));
        assert!(handle_key(&mut state, press(KeyCode::Char('q'))));
        assert_eq!(state.get_filters().search, "q");
        handle_key(&mut state, press(KeyCode::Esc));
        assert!(!state.is_search_mode());
    }

    #[test]
    fn navigation_keys_move_cursor() {
        let mut state = state();
        handle_key(&mut state, press(KeyCode::Char('j')));
        assert_eq!(state.selected_task().unwrap().id, "t2");
        handle_key(&mut state, press(KeyCode::Char('l')));
        assert_eq!(state.selected_task().unwrap().id, "t3");
        handle_key(&mut state, press(KeyCode::Left));
        assert_eq!(state.get_column_index(), 0);
    }

    #[test]
    fn task_form_routes_text_and_choices() {
        let mut state = state();
        handle_key(&mut state, press(KeyCode::Char('n')));
        assert_eq!(*state.current_view(), View::TaskForm);

        handle_key(&mut state, press(KeyCode::Char('l')));
        assert_eq!(state.get_task_form().unwrap().title, "l");

        handle_key(&mut state, press(KeyCode::Tab));
        handle_key(&mut state, press(KeyCode::Tab));
        let form = state.get_task_form().unwrap();
        assert_eq!(form.field, TaskField::Priority);
        handle_key(&mut state, press(KeyCode::Char('l')));
        assert_eq!(
            state.get_task_form().unwrap().priority,
            crate::api::Priority::High
        );

        handle_key(&mut state, press(KeyCode::Esc));
        assert_eq!(*state.current_view(), View::Board);
        assert!(state.get_task_form().is_none());
    }

    #[test]
    fn filter_menu_toggles_and_closes() {
        let mut state = state();
        handle_key(&mut state, press(KeyCode::Char('f')));
        handle_key(&mut state, press(KeyCode::Char(' ')));
        assert_eq!(state.get_filters().count(), 1);
        handle_key(&mut state, press(KeyCode::Char('c')));
        assert_eq!(state.get_filters().count(), 0);
        handle_key(&mut state, press(KeyCode::Esc));
        assert_eq!(*state.current_view(), View::Board);
    }

    #[test]
    fn confirm_cancel_returns_to_board() {
        let mut state = state();
        handle_key(&mut state, press(KeyCode::Char('d')));
        assert_eq!(*state.current_view(), View::Confirm);
        handle_key(&mut state, press(KeyCode::Char('n')));
        assert_eq!(*state.current_view(), View::Board);
    }
}
