use super::{centered_rect, Frame};
use crate::state::State;
use crate::ui::widgets::{spinner, styling};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
};

/// Render the cross-board task finder.
///
pub fn finder(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let finder = state.get_finder();
    let area = centered_rect(70, 60, size);
    frame.render_widget(Clear, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(area);

    let mut prompt = vec![Span::styled(
        format!("{}_", finder.query),
        styling::normal_text_style(theme),
    )];
    if finder.searching {
        prompt.push(Span::styled(
            format!(" {}", spinner::frame(state.get_spinner_index())),
            styling::muted_text_style(theme),
        ));
    }
    let input = Paragraph::new(Line::from(prompt)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Find task ")
            .border_style(styling::active_block_border_style(theme)),
    );
    frame.render_widget(input, rows[0]);

    let results_block = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::normal_block_border_style(theme));
    if finder.results.is_empty() {
        let text = if finder.query.trim().is_empty() || finder.searching {
            ""
        } else {
            "No matching tasks"
        };
        frame.render_widget(
            Paragraph::new(text)
                .block(results_block)
                .style(styling::muted_text_style(theme)),
            rows[1],
        );
        return;
    }

    let items: Vec<ListItem> = finder
        .results
        .iter()
        .map(|hit| {
            let board = hit.board_name.clone().unwrap_or_else(|| "?".to_string());
            ListItem::new(Line::from(vec![
                Span::raw(hit.task.title.clone()),
                Span::styled(format!("  {}", board), styling::muted_text_style(theme)),
                Span::styled(
                    format!("  [{}]", hit.task.priority),
                    styling::priority_style(theme, hit.task.priority),
                ),
            ]))
        })
        .collect();
    let list = List::new(items)
        .block(results_block)
        .style(styling::normal_text_style(theme))
        .highlight_style(styling::active_list_item_style(theme));
    let mut list_state = ListState::default();
    list_state.select(Some(finder.index));
    frame.render_stateful_widget(list, rows[1], &mut list_state);
}
