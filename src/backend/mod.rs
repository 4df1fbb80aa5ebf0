// Remote collaborator interfaces.
// The navigation layer only talks to the two services through these traits.

#![allow(async_fn_in_trait)]

pub mod types;

pub use types::*;

use crate::error::Result;

/// Course-management platform (Moodle).
pub trait CoursePlatform {
    /// List the courses the student is enrolled in.
    async fn get_courses(&self) -> Result<Vec<Course>>;

    /// List assignments across all enrolled courses.
    async fn get_assignments(&self) -> Result<Vec<Assignment>>;

    /// List lecture recordings for one course.
    async fn get_recordings(&self, course_id: u64) -> Result<Vec<Recording>>;

    /// Fetch attachments and other details for one assignment.
    async fn get_additional_info(&self, assignment_id: u64) -> Result<AdditionalAssignmentInfo>;
}

/// Grading-information system (IMS).
pub trait GradingSystem {
    /// Establish a session before grades are requested. Repeat calls are cheap.
    async fn connect(&self) -> Result<()> {
        Ok(())
    }

    /// List grades for every year in `years`.
    async fn get_all_grades(&self, years: &[i32]) -> Result<Vec<Grade>>;
}
