// Domain types shared by the course platform and the grading system.
// These are the records that get cached, filtered, and listed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A course the student is enrolled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: u64,
    pub name: String,
}

/// An assignment as listed by the course platform.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    pub id: u64,
    pub course_id: u64,
    pub name: String,
    pub due_date: DateTime<Utc>,
}

/// Details fetched on demand when drilling into a single assignment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalAssignmentInfo {
    pub attachments: Vec<Attachment>,
}

/// A file attached to an assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    pub url: String,
}

/// A lecture recording published in a course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recording {
    pub course_id: u64,
    pub name: String,
    pub url: String,
}

/// A grade record from the grading system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grade {
    pub semester: String,
    pub course_id: String,
    /// Missing while the course is still ungraded.
    pub grade: Option<f64>,
}

/// Credential triple used to log in to both services.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginDetails {
    pub username: String,
    pub id: String,
    pub password: String,
}

impl std::fmt::Debug for LoginDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginDetails")
            .field("username", &self.username)
            .field("id", &self.id)
            .field("password", &"********")
            .finish()
    }
}
