// Projections over loaded collections.
// Per-course filtering, dedup, upcoming assignments, and grade ordering.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::backend::{Assignment, Grade, Recording};

/// An assignment that is still open, with whole days until it is due.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcomingAssignment {
    pub assignment: Assignment,
    pub days_left: i64,
}

impl UpcomingAssignment {
    /// Menu text for this assignment, with the due date in local time.
    pub fn title(&self) -> String {
        self.title_in(&Local)
    }

    /// Menu text with the due date shown in `tz`.
    pub fn title_in<Tz: TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: fmt::Display,
    {
        format!(
            "{} - {}, {} days left",
            self.assignment.name,
            self.assignment
                .due_date
                .with_timezone(tz)
                .format("%Y-%m-%d %H:%M"),
            self.days_left
        )
    }
}

/// Assignments belonging to one course.
pub fn assignments_for_course(assignments: &[Assignment], course_id: u64) -> Vec<Assignment> {
    assignments
        .iter()
        .filter(|a| a.course_id == course_id)
        .cloned()
        .collect()
}

/// Recordings belonging to one course.
pub fn recordings_for_course(recordings: &[Recording], course_id: u64) -> Vec<Recording> {
    recordings
        .iter()
        .filter(|r| r.course_id == course_id)
        .cloned()
        .collect()
}

/// Drop exact duplicate rows, keeping the first occurrence and the original order.
pub fn dedup_assignments(assignments: Vec<Assignment>) -> Vec<Assignment> {
    let mut seen = HashSet::new();
    assignments
        .into_iter()
        .filter(|a| seen.insert(a.clone()))
        .collect()
}

/// Assignments due strictly after `now`.
pub fn upcoming_assignments(
    assignments: &[Assignment],
    now: DateTime<Utc>,
) -> Vec<UpcomingAssignment> {
    assignments
        .iter()
        .filter(|a| a.due_date > now)
        .map(|a| UpcomingAssignment {
            assignment: a.clone(),
            days_left: (a.due_date - now).num_days(),
        })
        .collect()
}

/// Everything the assignment menu shows for a course: filter, dedup, then keep future ones.
pub fn course_assignment_menu(
    assignments: &[Assignment],
    course_id: u64,
    now: DateTime<Utc>,
) -> Vec<UpcomingAssignment> {
    let deduped = dedup_assignments(assignments_for_course(assignments, course_id));
    upcoming_assignments(&deduped, now)
}

/// Grades with a numeric value, ordered by semester, course, then grade.
pub fn graded(grades: &[Grade]) -> Vec<&Grade> {
    let mut graded: Vec<&Grade> = grades
        .iter()
        .filter(|g| g.grade.is_some_and(f64::is_finite))
        .collect();

    graded.sort_by(|a, b| {
        a.semester
            .cmp(&b.semester)
            .then_with(|| a.course_id.cmp(&b.course_id))
            .then_with(|| {
                a.grade
                    .partial_cmp(&b.grade)
                    .unwrap_or(Ordering::Equal)
            })
    });
    graded
}

/// One line per grade as shown in the grades listing.
pub fn grade_line(grade: &Grade) -> String {
    let value = grade.grade.map(|g| g.trunc() as i64).unwrap_or_default();
    format!("- {} - {} - {}", grade.semester, grade.course_id, value)
}
