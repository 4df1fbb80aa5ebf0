// Session-scoped memo layered above the cache store.
// Holds collections loaded during the current drill-down; never persisted.

use std::collections::HashMap;

use crate::backend::{Assignment, Course, Grade, Recording};

/// How much of the memo to forget when navigation backs out of a level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoScope {
    /// Everything (back at the root menu).
    All,
    /// Data loaded for a single course (assignments and recordings).
    Course,
}

/// Collections memoized for the current navigation subtree.
#[derive(Debug, Default)]
pub struct SessionMemo {
    pub courses: Option<Vec<Course>>,
    pub assignments: Option<Vec<Assignment>>,
    pub recordings: HashMap<u64, Vec<Recording>>,
    pub grades: Option<Vec<Grade>>,
}

impl SessionMemo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget the collections owned by `scope` so they are reloaded on the next visit.
    pub fn forget(&mut self, scope: MemoScope) {
        match scope {
            MemoScope::All => *self = Self::default(),
            MemoScope::Course => {
                self.assignments = None;
                self.recordings.clear();
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_none()
            && self.assignments.is_none()
            && self.recordings.is_empty()
            && self.grades.is_none()
    }
}
