// Moodle course platform.
// Web-service client, response types, and the CoursePlatform implementation.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::MoodleClient;

use crate::backend::{AdditionalAssignmentInfo, Assignment, Course, CoursePlatform, Recording};
use crate::error::Result;

impl CoursePlatform for MoodleClient {
    async fn get_courses(&self) -> Result<Vec<Course>> {
        self.get_enrolled_courses().await
    }

    async fn get_assignments(&self) -> Result<Vec<Assignment>> {
        self.get_all_assignments().await
    }

    async fn get_recordings(&self, course_id: u64) -> Result<Vec<Recording>> {
        self.get_course_recordings(course_id).await
    }

    async fn get_additional_info(&self, assignment_id: u64) -> Result<AdditionalAssignmentInfo> {
        self.get_assignment_info(assignment_id).await
    }
}
