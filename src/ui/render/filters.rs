use super::{centered_rect, Frame};
use crate::state::{FilterKind, State};
use crate::ui::widgets::styling;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
};

/// Render the filter menu popup.
///
pub fn filters(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let area = centered_rect(50, 60, size);
    let entries = state.filter_entries();

    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| {
            let mark = if state.is_filter_selected(entry) { "[x]" } else { "[ ]" };
            let kind = match entry.kind {
                FilterKind::Priority => "Priority",
                FilterKind::Status => "Status",
                FilterKind::Assignee => "Assignee",
            };
            ListItem::new(Line::from(vec![
                Span::raw(format!("{} ", mark)),
                Span::styled(format!("{:<9}", kind), styling::muted_text_style(theme)),
                Span::raw(entry.label.clone()),
            ]))
        })
        .collect();

    let title = format!(
        " Filters ({}) space: toggle, c: clear, Esc: close ",
        state.get_filters().count()
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(styling::active_block_border_style(theme));

    frame.render_widget(Clear, area);
    if items.is_empty() {
        frame.render_widget(block, area);
        return;
    }
    let list = List::new(items)
        .block(block)
        .style(styling::normal_text_style(theme))
        .highlight_style(styling::active_list_item_style(theme));
    let mut list_state = ListState::default();
    list_state.select(Some(state.get_filter_index()));
    frame.render_stateful_widget(list, area, &mut list_state);
}
