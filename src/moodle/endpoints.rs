// Moodle web-service functions.
// Typed wrappers around the REST functions used by the course platform.

use crate::backend::{AdditionalAssignmentInfo, Assignment, Attachment, Course, Recording};
use crate::error::Result;

use super::client::MoodleClient;
use super::types::{
    AssignmentsResponse, CourseSection, MoodleAssignment, MoodleCourse, SubmissionStatus,
};

impl MoodleClient {
    /// Courses the logged-in user is enrolled in.
    pub async fn get_enrolled_courses(&self) -> Result<Vec<Course>> {
        let user_id = self.session().await?.user_id;
        let courses: Vec<MoodleCourse> = self
            .call(
                "core_enrol_get_users_courses",
                &[("userid", user_id.to_string())],
            )
            .await?;
        Ok(courses.into_iter().map(Course::from).collect())
    }

    /// Assignments of every enrolled course.
    pub async fn get_all_assignments(&self) -> Result<Vec<Assignment>> {
        let response: AssignmentsResponse = self.call("mod_assign_get_assignments", &[]).await?;
        Ok(response
            .courses
            .into_iter()
            .flat_map(|course| course.assignments)
            .filter_map(MoodleAssignment::into_assignment)
            .collect())
    }

    /// Intro attachments of one assignment.
    pub async fn get_assignment_attachments(&self, assignment_id: u64) -> Result<Vec<Attachment>> {
        let status: SubmissionStatus = self
            .call(
                "mod_assign_get_submission_status",
                &[("assignid", assignment_id.to_string())],
            )
            .await?;

        let files = status
            .assignmentdata
            .and_then(|data| data.attachments)
            .map(|attachments| attachments.intro)
            .unwrap_or_default();

        Ok(files
            .into_iter()
            .map(Attachment::from)
            .map(|attachment| Attachment {
                url: self.file_url(&attachment.url),
                ..attachment
            })
            .collect())
    }

    /// Recording modules published in a course.
    pub async fn get_course_recordings(&self, course_id: u64) -> Result<Vec<Recording>> {
        let sections: Vec<CourseSection> = self
            .call(
                "core_course_get_contents",
                &[("courseid", course_id.to_string())],
            )
            .await?;

        Ok(sections
            .into_iter()
            .flat_map(|section| section.modules)
            .filter_map(|module| module.into_recording(course_id))
            .collect())
    }

    /// Details shown when drilling into an assignment.
    pub async fn get_assignment_info(&self, assignment_id: u64) -> Result<AdditionalAssignmentInfo> {
        let attachments = self.get_assignment_attachments(assignment_id).await?;
        Ok(AdditionalAssignmentInfo { attachments })
    }
}
