// Navigation state management.
// Handles the menu hierarchy stack and breadcrumb trail for drill-down menus.

use crate::backend::{Assignment, Course};

/// A node in the navigation breadcrumb trail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreadcrumbNode {
    /// Display label for the breadcrumb.
    pub label: String,
}

/// The current menu level in the navigation hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewLevel {
    /// Top level: courses, grades, or exit
    Root,
    /// Grade listing (display only)
    Grades,
    /// One entry per enrolled course
    Courses,
    /// Assignments / recordings picker for a course
    CourseActions { course: Course },
    /// Upcoming assignments for a course
    Assignments { course: Course },
    /// Attachments of one assignment
    Attachments {
        course: Course,
        assignment: Assignment,
    },
    /// Lecture recordings for a course
    Recordings { course: Course },
}

impl ViewLevel {
    /// Get the display title for this view level.
    pub fn title(&self) -> String {
        match self {
            ViewLevel::Root => "What would you like to do?".to_string(),
            ViewLevel::Grades => "Grades".to_string(),
            ViewLevel::Courses => "Select a course:".to_string(),
            ViewLevel::CourseActions { course } => {
                format!("What do you want to view for course {}?", course.id)
            }
            ViewLevel::Assignments { .. } => "Select an assignment:".to_string(),
            ViewLevel::Attachments { .. } => "Select an attachment:".to_string(),
            ViewLevel::Recordings { .. } => "Select a recording:".to_string(),
        }
    }

    /// Create a breadcrumb node for this view level.
    pub fn to_breadcrumb(&self) -> BreadcrumbNode {
        let label = match self {
            ViewLevel::Root => "Home".to_string(),
            ViewLevel::Grades => "Grades".to_string(),
            ViewLevel::Courses => "Courses".to_string(),
            ViewLevel::CourseActions { course } => course.name.clone(),
            ViewLevel::Assignments { .. } => "Assignments".to_string(),
            ViewLevel::Attachments { assignment, .. } => assignment.name.clone(),
            ViewLevel::Recordings { .. } => "Recordings".to_string(),
        };
        BreadcrumbNode { label }
    }
}

/// Navigation stack for the session.
#[derive(Debug, Clone)]
pub struct NavigationStack {
    /// Stack of view levels (bottom = root, top = current)
    stack: Vec<ViewLevel>,
}

impl NavigationStack {
    /// Create a new navigation stack starting at the given level.
    pub fn new(root: ViewLevel) -> Self {
        Self { stack: vec![root] }
    }

    /// Get the current view level.
    pub fn current(&self) -> &ViewLevel {
        self.stack.last().expect("Stack should never be empty")
    }

    /// Push a new view level onto the stack (drill down).
    pub fn push(&mut self, level: ViewLevel) {
        self.stack.push(level);
    }

    /// Pop the current view level (go back). Returns false if at root.
    pub fn pop(&mut self) -> bool {
        if self.stack.len() > 1 {
            self.stack.pop();
            true
        } else {
            false
        }
    }

    /// Get the breadcrumb trail.
    pub fn breadcrumbs(&self) -> Vec<BreadcrumbNode> {
        self.stack
            .iter()
            .map(|level| level.to_breadcrumb())
            .collect()
    }
}

impl Default for NavigationStack {
    fn default() -> Self {
        Self::new(ViewLevel::Root)
    }
}
