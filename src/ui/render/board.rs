use super::Frame;
use crate::api::Task;
use crate::board::{FilteredColumn, LoadFailure};
use crate::state::State;
use crate::ui::widgets::styling;
use crate::ui::Theme;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::Modifier,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

/// Render the board columns, or whatever replaces them while the board
/// is missing.
///
pub fn board(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let store = state.get_board_store();

    let message = match (store.board(), store.load_failed()) {
        (_, Some(LoadFailure::NotFound)) => Some(("Board not found".to_string(), true)),
        (None, Some(LoadFailure::Network(e))) => {
            Some((format!("Failed to load board: {}\nPress r to retry.", e), true))
        }
        (None, _) if store.is_loading() => Some(("Loading board...".to_string(), false)),
        (None, _) => Some(("No board loaded".to_string(), false)),
        (Some(board), _) if board.columns.is_empty() => {
            Some(("No columns yet. Press C to add one.".to_string(), false))
        }
        _ => None,
    };
    if let Some((text, is_error)) = message {
        let style = if is_error {
            styling::error_text_style(theme)
        } else {
            styling::muted_text_style(theme)
        };
        let paragraph = Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL))
            .style(style)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, size);
        return;
    }

    let areas = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(75), Constraint::Percentage(25)])
        .split(size);
    details(frame, areas[1], state);

    let columns = state.visible_columns();
    let constraints: Vec<Constraint> = columns
        .iter()
        .map(|_| Constraint::Ratio(1, columns.len() as u32))
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(areas[0]);

    for (index, column) in columns.iter().enumerate() {
        let selected = index == state.get_column_index();
        render_column(
            frame,
            chunks[index],
            theme,
            column,
            selected.then(|| state.get_task_index()),
        );
    }
}

fn render_column(
    frame: &mut Frame,
    size: Rect,
    theme: &Theme,
    column: &FilteredColumn,
    selected_task: Option<usize>,
) {
    let title = format!(" {} ({}) ", column.column.name, column.tasks.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(title, styling::active_block_title_style()))
        .border_style(if selected_task.is_some() {
            styling::active_block_border_style(theme)
        } else {
            styling::normal_block_border_style(theme)
        });

    if column.tasks.is_empty() {
        let empty = Paragraph::new("No tasks")
            .block(block)
            .alignment(Alignment::Center)
            .style(styling::muted_text_style(theme));
        frame.render_widget(empty, size);
        return;
    }

    let items: Vec<ListItem> = column
        .tasks
        .iter()
        .map(|task| ListItem::new(task_lines(theme, task)))
        .collect();
    let list = List::new(items)
        .block(block)
        .style(styling::normal_text_style(theme))
        .highlight_style(styling::active_list_item_style(theme));

    let mut list_state = ListState::default();
    list_state.select(selected_task.map(|i| i.min(column.tasks.len() - 1)));
    frame.render_stateful_widget(list, size, &mut list_state);
}

fn task_lines<'a>(theme: &Theme, task: &'a Task) -> Vec<Line<'a>> {
    if task.placeholder {
        return vec![Line::from(Span::styled(
            task.title.as_str(),
            styling::muted_text_style(theme).add_modifier(Modifier::ITALIC),
        ))];
    }
    let mut meta = vec![Span::styled(
        format!("[{}]", task.priority),
        styling::priority_style(theme, task.priority),
    )];
    if let Some(name) = task.assignee.as_ref().and_then(|a| a.name()) {
        meta.push(Span::styled(
            format!(" @{}", name),
            styling::muted_text_style(theme),
        ));
    }
    vec![
        Line::from(Span::raw(task.title.as_str())),
        Line::from(meta),
    ]
}

/// Render the selected task's fields.
///
fn details(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.get_theme();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Details ")
        .border_style(styling::normal_block_border_style(theme));
    let task = match state.selected_task() {
        Some(task) => task,
        None => {
            let empty = Paragraph::new("No task selected")
                .block(block)
                .alignment(Alignment::Center)
                .style(styling::muted_text_style(theme));
            frame.render_widget(empty, size);
            return;
        }
    };

    let label = |text: &'static str| Span::styled(text, styling::muted_text_style(theme));
    let assignee = task
        .assignee
        .as_ref()
        .map(|a| a.name().unwrap_or_else(|| a.id()).to_string())
        .unwrap_or_else(|| "Unassigned".to_string());
    let mut lines = vec![
        Line::from(Span::styled(
            task.title.clone(),
            styling::active_block_title_style(),
        )),
        Line::from(""),
        Line::from(vec![
            label("Priority  "),
            Span::styled(
                task.priority.to_string(),
                styling::priority_style(theme, task.priority),
            ),
        ]),
        Line::from(vec![label("Status    "), Span::raw(task.status.clone())]),
        Line::from(vec![label("Assignee  "), Span::raw(assignee)]),
    ];
    if let Some(updated) = &task.updated_at {
        lines.push(Line::from(vec![label("Updated   "), Span::raw(updated.clone())]));
    }
    if let Some(description) = task.description.as_deref().filter(|d| !d.is_empty()) {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::raw(description.to_string())));
    }
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        size,
    );
}
