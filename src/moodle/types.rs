// Moodle web-service response types.
// Wire shapes for the functions we call, and their conversion into domain types.

use chrono::DateTime;
use serde::Deserialize;

use crate::backend::{Assignment, Attachment, Course, Recording};

/// Response from `login/token.php`.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub token: Option<String>,
    pub error: Option<String>,
    pub errorcode: Option<String>,
}

/// Error object returned in place of a result.
#[derive(Debug, Deserialize)]
pub struct MoodleException {
    pub exception: String,
    pub errorcode: Option<String>,
    pub message: Option<String>,
}

impl MoodleException {
    /// Parse an error payload, if `value` is one.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        if value.get("exception").is_none() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }
}

/// `core_webservice_get_site_info`.
#[derive(Debug, Deserialize)]
pub struct SiteInfo {
    pub userid: u64,
}

/// Entry of `core_enrol_get_users_courses`.
#[derive(Debug, Deserialize)]
pub struct MoodleCourse {
    pub id: u64,
    pub fullname: String,
}

impl From<MoodleCourse> for Course {
    fn from(course: MoodleCourse) -> Self {
        Course {
            id: course.id,
            name: course.fullname,
        }
    }
}

/// `mod_assign_get_assignments`.
#[derive(Debug, Deserialize)]
pub struct AssignmentsResponse {
    #[serde(default)]
    pub courses: Vec<AssignmentCourse>,
}

#[derive(Debug, Deserialize)]
pub struct AssignmentCourse {
    pub id: u64,
    #[serde(default)]
    pub assignments: Vec<MoodleAssignment>,
}

#[derive(Debug, Deserialize)]
pub struct MoodleAssignment {
    pub id: u64,
    pub course: u64,
    pub name: String,
    /// Unix timestamp; 0 when the assignment has no due date.
    #[serde(default)]
    pub duedate: i64,
}

impl MoodleAssignment {
    /// Assignments without a due date are dropped.
    pub fn into_assignment(self) -> Option<Assignment> {
        if self.duedate <= 0 {
            return None;
        }
        Some(Assignment {
            id: self.id,
            course_id: self.course,
            name: self.name,
            due_date: DateTime::from_timestamp(self.duedate, 0)?,
        })
    }
}

/// `mod_assign_get_submission_status`.
#[derive(Debug, Deserialize)]
pub struct SubmissionStatus {
    pub assignmentdata: Option<AssignmentData>,
}

#[derive(Debug, Deserialize)]
pub struct AssignmentData {
    pub attachments: Option<AssignmentAttachments>,
}

#[derive(Debug, Deserialize)]
pub struct AssignmentAttachments {
    #[serde(default)]
    pub intro: Vec<MoodleFile>,
}

#[derive(Debug, Deserialize)]
pub struct MoodleFile {
    pub filename: String,
    pub fileurl: String,
}

impl From<MoodleFile> for Attachment {
    fn from(file: MoodleFile) -> Self {
        Attachment {
            filename: file.filename,
            url: file.fileurl,
        }
    }
}

/// Section of `core_course_get_contents`.
#[derive(Debug, Deserialize)]
pub struct CourseSection {
    #[serde(default)]
    pub modules: Vec<CourseModule>,
}

#[derive(Debug, Deserialize)]
pub struct CourseModule {
    pub name: String,
    pub modname: String,
    pub url: Option<String>,
}

/// Module types that hold lecture recordings.
const RECORDING_MODULES: [&str; 2] = ["kalvidres", "url"];

impl CourseModule {
    pub fn into_recording(self, course_id: u64) -> Option<Recording> {
        if !RECORDING_MODULES.contains(&self.modname.as_str()) {
            return None;
        }
        Some(Recording {
            course_id,
            name: self.name,
            url: self.url?,
        })
    }
}
