mod all;
mod board;
mod column_form;
mod confirm;
mod filters;
mod finder;
mod footer;
mod header;
mod log;
mod task_form;

use self::log::log;
use super::*;
use board::board;
use column_form::column_form;
use confirm::confirm;
use filters::filters;
use finder::finder;
use footer::footer;
use header::header;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use task_form::task_form;

pub use all::all as render;

/// Return a rectangle centered in `area` taking the given share of it.
///
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_rect_is_inside() {
        let area = Rect::new(0, 0, 100, 50);
        let popup = centered_rect(60, 40, area);
        assert_eq!(popup.width, 60);
        assert_eq!(popup.height, 20);
        assert_eq!(popup.x, 20);
        assert_eq!(popup.y, 15);
    }
}
