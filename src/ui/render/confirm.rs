use super::{centered_rect, Frame};
use crate::state::State;
use crate::ui::widgets::styling;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Render the delete confirmation dialog.
///
pub fn confirm(frame: &mut Frame, size: Rect, state: &State) {
    let prompt = match state.get_confirm() {
        Some(confirm) => confirm.prompt(),
        None => return,
    };
    let theme = state.get_theme();
    let area = centered_rect(50, 20, size);
    let lines = vec![
        Line::from(Span::styled(prompt, styling::normal_text_style(theme))),
        Line::from(""),
        Line::from(Span::styled(
            "y: delete, n: cancel",
            styling::muted_text_style(theme),
        )),
    ];
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Confirm ")
        .border_style(styling::error_text_style(theme));
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        area,
    );
}
