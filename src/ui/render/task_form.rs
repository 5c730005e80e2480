use super::{centered_rect, Frame};
use crate::state::{State, TaskField, TaskForm};
use crate::ui::widgets::styling;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Render the create or edit task popup.
///
pub fn task_form(frame: &mut Frame, size: Rect, state: &State) {
    let form = match state.get_task_form() {
        Some(form) => form,
        None => return,
    };
    let theme = state.get_theme();
    let area = centered_rect(60, 50, size);

    let column = state
        .get_board()
        .and_then(|b| b.column(&form.column_id))
        .map(|c| c.name.clone())
        .unwrap_or_else(|| form.column_id.clone());
    let assignee = match &form.assignee {
        Some(id) => state
            .get_users()
            .iter()
            .find(|u| &u.id == id)
            .map(|u| u.name.clone())
            .unwrap_or_else(|| id.clone()),
        None => "Unassigned".to_string(),
    };

    let rows = [
        (TaskField::Title, "Title", form.title.clone()),
        (TaskField::Description, "Description", form.description.clone()),
        (TaskField::Priority, "Priority", format!("< {} >", form.priority)),
        (TaskField::Column, "Column", format!("< {} >", column)),
        (TaskField::Assignee, "Assignee", format!("< {} >", assignee)),
    ];
    let mut lines: Vec<Line> = rows
        .into_iter()
        .map(|(field, label, value)| field_line(state, form, field, label, value))
        .collect();
    lines.push(Line::from(""));
    match &form.error {
        Some(error) => lines.push(Line::from(Span::styled(
            error.clone(),
            styling::error_text_style(theme),
        ))),
        None => lines.push(Line::from(Span::styled(
            "Tab: next field, h/l: change, Enter: save, Esc: cancel",
            styling::muted_text_style(theme),
        ))),
    }

    let title = if form.is_edit() { " Edit Task " } else { " New Task " };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(styling::active_block_border_style(theme));
    frame.render_widget(Clear, area);
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn field_line(
    state: &State,
    form: &TaskForm,
    field: TaskField,
    label: &str,
    value: String,
) -> Line<'static> {
    let theme = state.get_theme();
    let focused = form.field == field;
    let value_style = if focused {
        styling::active_list_item_style(theme)
    } else {
        styling::normal_text_style(theme)
    };
    let cursor = if focused && field.is_text() { "_" } else { "" };
    Line::from(vec![
        Span::styled(format!("{:<12}", label), styling::muted_text_style(theme)),
        Span::styled(format!("{}{}", value, cursor), value_style),
    ])
}
