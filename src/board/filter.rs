//! Client-side filtering and search over the loaded board.
//!
//! Filtering never mutates the store: `apply` builds a borrowed projection
//! of every column that is rebuilt whenever the board or the selection
//! changes.

use crate::api::{Column, Priority, Task, UserRef};
use std::collections::HashSet;

/// Canonical display form of a status string.
///
/// Known workflow spellings collapse to one label; anything else gets its
/// first letter upper-cased.
///
pub fn normalize_status(status: &str) -> String {
    match status.to_lowercase().as_str() {
        "todo" | "to do" => "To Do".to_string(),
        "in progress" | "in-progress" => "In Progress".to_string(),
        "review" => "Review".to_string(),
        "done" | "completed" => "Done".to_string(),
        _ => {
            let mut chars = status.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

/// Lower-cased spellings a selected status should match.
///
fn status_variants(selected: &str) -> Vec<String> {
    let normalized = normalize_status(selected);
    let mut variants: Vec<String> = match normalized.as_str() {
        "To Do" => vec!["to do", "todo"],
        "In Progress" => vec!["in progress", "in-progress"],
        "Review" => vec!["review"],
        "Done" => vec!["done", "completed"],
        _ => vec![],
    }
    .into_iter()
    .map(str::to_string)
    .collect();
    variants.push(normalized.to_lowercase());
    variants.push(selected.to_lowercase());
    variants
}

/// Transient filter state for one board view.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterSelection {
    pub search: String,
    pub priorities: Vec<String>,
    pub statuses: Vec<String>,
    pub assignees: Vec<String>,
}

impl FilterSelection {
    pub fn new() -> Self {
        FilterSelection::default()
    }

    pub fn set_search(&mut self, search: &str) -> &mut Self {
        self.search = search.to_string();
        self
    }

    /// Toggle a priority, comparing case-insensitively.
    ///
    pub fn toggle_priority(&mut self, priority: &str) -> &mut Self {
        let before = self.priorities.len();
        self.priorities
            .retain(|p| !p.eq_ignore_ascii_case(priority));
        if self.priorities.len() == before {
            self.priorities.push(priority.to_string());
        }
        self
    }

    pub fn toggle_status(&mut self, status: &str) -> &mut Self {
        toggle_exact(&mut self.statuses, status);
        self
    }

    pub fn toggle_assignee(&mut self, assignee_id: &str) -> &mut Self {
        toggle_exact(&mut self.assignees, assignee_id);
        self
    }

    pub fn clear(&mut self) -> &mut Self {
        self.search.clear();
        self.priorities.clear();
        self.statuses.clear();
        self.assignees.clear();
        self
    }

    pub fn is_active(&self) -> bool {
        !self.search.is_empty()
            || !self.priorities.is_empty()
            || !self.statuses.is_empty()
            || !self.assignees.is_empty()
    }

    /// Number shown on the active-filter badge.
    ///
    pub fn count(&self) -> usize {
        self.priorities.len()
            + self.statuses.len()
            + self.assignees.len()
            + usize::from(!self.search.is_empty())
    }

    /// True when the task in the given column passes every predicate.
    ///
    pub fn matches(&self, task: &Task, column: &Column) -> bool {
        self.matches_search(task)
            && self.matches_priority(task)
            && self.matches_status(task, column)
            && self.matches_assignee(task)
    }

    fn matches_search(&self, task: &Task) -> bool {
        if self.search.is_empty() {
            return true;
        }
        let needle = self.search.to_lowercase();
        task.title.to_lowercase().contains(&needle)
            || task
                .description
                .as_deref()
                .map(|d| d.to_lowercase().contains(&needle))
                .unwrap_or(false)
    }

    fn matches_priority(&self, task: &Task) -> bool {
        self.priorities.is_empty()
            || self
                .priorities
                .iter()
                .any(|p| p.eq_ignore_ascii_case(task.priority.label()))
    }

    fn matches_status(&self, task: &Task, column: &Column) -> bool {
        if self.statuses.is_empty() {
            return true;
        }
        let raw = task.status.to_lowercase();
        let normalized = normalize_status(&task.status).to_lowercase();
        let column_name = column.name.to_lowercase();
        self.statuses.iter().any(|selected| {
            let variants = status_variants(selected);
            variants.contains(&raw)
                || variants.contains(&normalized)
                || column_name == selected.to_lowercase()
        })
    }

    fn matches_assignee(&self, task: &Task) -> bool {
        if self.assignees.is_empty() {
            return true;
        }
        match task.assignee_id() {
            Some(id) => self.assignees.iter().any(|a| a == id),
            None => false,
        }
    }
}

fn toggle_exact(values: &mut Vec<String>, value: &str) {
    match values.iter().position(|v| v == value) {
        Some(index) => {
            values.remove(index);
        }
        None => values.push(value.to_string()),
    }
}

/// Borrowed view of a column restricted to matching tasks.
///
#[derive(Clone, Debug)]
pub struct FilteredColumn<'a> {
    pub column: &'a Column,
    pub tasks: Vec<&'a Task>,
}

/// Project every column through the selection. Column order and task order
/// are preserved; an empty selection yields every task.
///
pub fn apply<'a>(columns: &'a [Column], filters: &FilterSelection) -> Vec<FilteredColumn<'a>> {
    columns
        .iter()
        .map(|column| FilteredColumn {
            column,
            tasks: column
                .tasks
                .iter()
                .filter(|task| filters.matches(task, column))
                .collect(),
        })
        .collect()
}

/// Assignee choice offered in the filter menu.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssigneeOption {
    pub id: String,
    pub name: String,
}

/// Values available for selection, derived from the loaded board.
///
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub priorities: Vec<String>,
    pub statuses: Vec<String>,
    pub assignees: Vec<AssigneeOption>,
}

impl FilterOptions {
    /// Collect distinct options in first-seen order. Keys are compared
    /// case-insensitively and the first display string seen wins.
    ///
    pub fn derive(columns: &[Column]) -> Self {
        let mut options = FilterOptions::default();
        let mut seen_priorities = HashSet::new();
        let mut seen_statuses = HashSet::new();
        let mut seen_assignees = HashSet::new();

        for column in columns {
            push_status(&mut options.statuses, &mut seen_statuses, &column.name);
            for task in &column.tasks {
                let priority: Priority = task.priority;
                if seen_priorities.insert(priority.label().to_lowercase()) {
                    options.priorities.push(priority.label().to_string());
                }
                if !task.status.is_empty() {
                    push_status(&mut options.statuses, &mut seen_statuses, &task.status);
                }
                if let Some(assignee) = &task.assignee {
                    if seen_assignees.insert(assignee.id().to_lowercase()) {
                        options.assignees.push(AssigneeOption {
                            id: assignee.id().to_string(),
                            name: display_name(assignee),
                        });
                    }
                }
            }
        }
        options
    }
}

fn push_status(statuses: &mut Vec<String>, seen: &mut HashSet<String>, status: &str) {
    let normalized = normalize_status(status);
    if seen.insert(normalized.to_lowercase()) {
        statuses.push(normalized);
    }
}

fn display_name(assignee: &UserRef) -> String {
    match assignee.name() {
        Some(name) if !name.is_empty() => name.to_string(),
        _ => "Unknown".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::User;
    use crate::board::store::tests::{column, sample_board, task};

    fn ids<'a>(view: &[FilteredColumn<'a>]) -> Vec<Vec<&'a str>> {
        view.iter()
            .map(|c| c.tasks.iter().map(|t| t.id.as_str()).collect())
            .collect()
    }

    #[test]
    fn test_normalize_status_known_spellings() {
        for raw in ["todo", "To Do", "TO DO", "to do"] {
            assert_eq!(normalize_status(raw), "To Do");
        }
        assert_eq!(normalize_status("in-progress"), "In Progress");
        assert_eq!(normalize_status("completed"), "Done");
        assert_eq!(normalize_status("review"), "Review");
        assert_eq!(normalize_status("blocked"), "Blocked");
        assert_eq!(normalize_status("qA"), "QA");
        assert_eq!(normalize_status(""), "");
    }

    #[test]
    fn test_normalize_status_is_idempotent() {
        for raw in ["todo", "In-Progress", "done", "blocked", "élan", "x"] {
            let once = normalize_status(raw);
            assert_eq!(normalize_status(&once), once);
        }
    }

    #[test]
    fn test_empty_selection_returns_everything_in_order() {
        let board = sample_board();
        let view = apply(&board.columns, &FilterSelection::new());
        assert_eq!(ids(&view), vec![vec!["t1", "t2"], vec!["t3"], vec![]]);
    }

    #[test]
    fn test_search_is_case_insensitive_over_title_and_description() {
        let mut board = sample_board();
        board.columns[1].tasks[0].description = Some("Split the LEXER out".to_string());

        let mut filters = FilterSelection::new();
        filters.set_search("fIX B");
        assert_eq!(ids(&apply(&board.columns, &filters)), vec![vec!["t1"], vec![], vec![]]);

        filters.set_search("lexer");
        assert_eq!(ids(&apply(&board.columns, &filters)), vec![vec![], vec!["t3"], vec![]]);
    }

    #[test]
    fn test_priority_filter_scenario() {
        let board = sample_board();
        let mut filters = FilterSelection::new();
        filters.toggle_priority("High");
        assert!(filters.is_active());
        assert_eq!(ids(&apply(&board.columns, &filters)), vec![vec!["t1"], vec![], vec![]]);

        filters.clear();
        assert!(!filters.is_active());
        assert_eq!(
            ids(&apply(&board.columns, &filters)),
            vec![vec!["t1", "t2"], vec!["t3"], vec![]]
        );
    }

    #[test]
    fn test_toggle_priority_is_case_insensitive() {
        let mut filters = FilterSelection::new();
        filters.toggle_priority("High");
        filters.toggle_priority("HIGH");
        assert!(filters.priorities.is_empty());
    }

    #[test]
    fn test_status_filter_uses_synonyms_and_column_name() {
        let mut board = sample_board();
        // Status disagrees with column after an interrupted move
        board.columns[2].tasks.push(task("t4", "Stale", Priority::Low, "todo"));

        let mut filters = FilterSelection::new();
        filters.toggle_status("To Do");
        assert_eq!(
            ids(&apply(&board.columns, &filters)),
            vec![vec!["t1", "t2"], vec![], vec!["t4"]]
        );

        filters.clear().toggle_status("In Progress");
        assert_eq!(ids(&apply(&board.columns, &filters)), vec![vec![], vec!["t3"], vec![]]);

        filters.clear().toggle_status("done");
        assert_eq!(ids(&apply(&board.columns, &filters)), vec![vec![], vec![], vec!["t4"]]);
    }

    #[test]
    fn test_assignee_filter() {
        let mut board = sample_board();
        board.columns[0].tasks[0].assignee = Some(UserRef::Id("u1".to_string()));
        let user = User {
            id: "u2".to_string(),
            name: "Bob".to_string(),
            email: "bob@example.com".to_string(),
            role: None,
            organizations: vec![],
        };
        board.columns[1].tasks[0].assignee = Some(UserRef::User(user));

        let mut filters = FilterSelection::new();
        filters.toggle_assignee("u2");
        assert_eq!(ids(&apply(&board.columns, &filters)), vec![vec![], vec!["t3"], vec![]]);

        filters.toggle_assignee("u1");
        assert_eq!(ids(&apply(&board.columns, &filters)), vec![vec!["t1"], vec!["t3"], vec![]]);
    }

    #[test]
    fn test_predicates_are_conjunctive() {
        let board = sample_board();
        let mut filters = FilterSelection::new();
        filters.toggle_priority("low").toggle_status("In Progress");
        assert_eq!(ids(&apply(&board.columns, &filters)), vec![Vec::<&str>::new(); 3]);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let board = sample_board();
        let mut filters = FilterSelection::new();
        filters.set_search("o").toggle_priority("high");
        let first = ids(&apply(&board.columns, &filters));
        let second = ids(&apply(&board.columns, &filters));
        assert_eq!(first, second);
    }

    #[test]
    fn test_count_badge() {
        let mut filters = FilterSelection::new();
        assert_eq!(filters.count(), 0);
        filters
            .set_search("bug")
            .toggle_priority("High")
            .toggle_status("Done")
            .toggle_assignee("u1");
        assert_eq!(filters.count(), 4);
    }

    #[test]
    fn test_derive_options_dedupes_first_seen() {
        let mut todo = task("t1", "A", Priority::High, "todo");
        todo.assignee = Some(UserRef::Id("u1".to_string()));
        let mut later = task("t2", "B", Priority::High, "To Do");
        later.assignee = Some(UserRef::User(User {
            id: "u1".to_string(),
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            role: None,
            organizations: vec![],
        }));
        let review = task("t3", "C", Priority::Low, "review");
        let columns = vec![
            column("c1", "To Do", 0, vec![todo, later]),
            column("c2", "QA", 1, vec![review]),
        ];

        let options = FilterOptions::derive(&columns);
        assert_eq!(options.priorities, vec!["High", "Low"]);
        assert_eq!(options.statuses, vec!["To Do", "QA", "Review"]);
        assert_eq!(
            options.assignees,
            vec![AssigneeOption {
                id: "u1".to_string(),
                name: "Unknown".to_string()
            }]
        );
    }

    #[test]
    fn test_status_option_matches_non_ascii_column() {
        let drifted = task("t1", "Drifted", Priority::Medium, "todo");
        let columns = vec![column("c1", "état", 0, vec![drifted])];
        let options = FilterOptions::derive(&columns);
        assert_eq!(options.statuses[0], "État");

        let mut filters = FilterSelection::new();
        filters.toggle_status(&options.statuses[0]);
        assert_eq!(ids(&apply(&columns, &filters)), vec![vec!["t1"]]);
    }
}
