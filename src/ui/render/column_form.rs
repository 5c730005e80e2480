use super::{centered_rect, Frame};
use crate::state::State;
use crate::ui::widgets::styling;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

/// Render the new column popup.
///
pub fn column_form(frame: &mut Frame, size: Rect, state: &State) {
    let form = match state.get_column_form() {
        Some(form) => form,
        None => return,
    };
    let theme = state.get_theme();
    let area = centered_rect(40, 20, size);
    let mut lines = vec![Line::from(vec![
        Span::styled("Name ", styling::muted_text_style(theme)),
        Span::styled(format!("{}_", form.name), styling::normal_text_style(theme)),
    ])];
    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            styling::error_text_style(theme),
        )));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" New Column ")
        .border_style(styling::active_block_border_style(theme));
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
