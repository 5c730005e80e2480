use super::Frame;
use crate::state::State;
use crate::ui::widgets::{spinner, styling};
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Render board title, task count, filter badge and search prompt.
///
pub fn header(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let store = state.get_board_store();
    let mut spans = vec![];

    match store.board() {
        Some(board) => {
            spans.push(Span::styled(board.name.clone(), styling::banner_style(theme)));
            spans.push(Span::styled(
                format!("  {} tasks", board.task_count()),
                styling::muted_text_style(theme),
            ));
        }
        None => spans.push(Span::styled("taskboard", styling::banner_style(theme))),
    }

    let filters = state.get_filters();
    if filters.is_active() {
        spans.push(Span::styled(
            format!("  [Filters ({})]", filters.count()),
            styling::active_block_border_style(theme),
        ));
    }
    if state.is_search_mode() || !filters.search.is_empty() {
        let cursor = if state.is_search_mode() { "_" } else { "" };
        spans.push(Span::styled(
            format!("  /{}{}", filters.search, cursor),
            styling::normal_text_style(theme),
        ));
    }
    if store.is_loading() || store.is_silent_loading() {
        spans.push(Span::styled(
            format!("  {}", spinner::frame(state.get_spinner_index())),
            styling::muted_text_style(theme),
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::normal_block_border_style(theme));
    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), size);
}
