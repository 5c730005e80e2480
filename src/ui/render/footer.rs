use super::Frame;
use crate::state::{State, View};
use crate::ui::widgets::styling;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

/// Key hints for a view.
///
fn hints(view: &View, search_mode: bool) -> &'static str {
    match view {
        View::Board if search_mode => "type to search, Enter/Esc: done",
        View::Board => {
            "h/l/j/k: move  H/L: shift task  n: new  e: edit  d: delete  C/X: add/del column  \
             /: search  f: filters  ?: find  r: reload  g: logs  q: quit"
        }
        View::Filters => "j/k: move  space: toggle  c: clear  Esc: close",
        View::TaskForm => "Tab: next field  h/l: change  Enter: save  Esc: cancel",
        View::ColumnForm => "Enter: create  Esc: cancel",
        View::Confirm => "y: confirm  n: cancel",
        View::Finder => "type to search  Up/Down: select  Enter: open  Esc: close",
    }
}

/// Render the status message, or the key hints when there is none.
///
pub fn footer(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let line = match state.get_status_message() {
        Some(message) => Line::from(Span::styled(
            format!(" {}", message),
            styling::error_text_style(theme),
        )),
        None => Line::from(Span::styled(
            format!(" {}", hints(state.current_view(), state.is_search_mode())),
            styling::muted_text_style(theme),
        )),
    };
    frame.render_widget(Paragraph::new(line), size);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hints_follow_search_mode() {
        assert!(hints(&View::Board, true).contains("search"));
        assert!(hints(&View::Board, false).contains("q: quit"));
    }
}
