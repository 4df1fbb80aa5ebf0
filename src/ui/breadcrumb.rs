// Breadcrumb rendering for the navigation trail.
// Shown as the title of every selection menu.

use ratatui::prelude::*;

use crate::state::BreadcrumbNode;

use super::label::display_label;

/// Build the breadcrumb line, highlighting the current level.
pub fn breadcrumb_line(breadcrumbs: &[BreadcrumbNode]) -> Line<'static> {
    let mut spans = Vec::new();

    for (i, node) in breadcrumbs.iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" > ", Style::default().fg(Color::DarkGray)));
        }

        let style = if i == breadcrumbs.len() - 1 {
            // Current level is highlighted
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };

        spans.push(Span::styled(display_label(&node.label).into_owned(), style));
    }

    Line::from(spans)
}
