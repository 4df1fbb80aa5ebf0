// App state and main navigation loop.
// Drives the menu hierarchy, loading data lazily at each level.

use chrono::Utc;

use crate::backend::{Course, CoursePlatform, GradingSystem};
use crate::cache::MemoScope;
use crate::error::{Result, TauError};
use crate::loader::DataLoader;
use crate::state::{NavigationStack, ViewLevel, filters};
use crate::ui::{Choice, Opener, Prompter};

/// What the current level asks the navigator to do next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Drill down into a child level.
    Push(ViewLevel),
    /// Return to the parent level (terminates at the root).
    Back,
    /// End the session.
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RootAction {
    Courses,
    Grades,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CourseAction {
    Assignments,
    Recordings,
    Back,
}

/// Main application state.
pub struct App<P, G, U, O> {
    loader: DataLoader<P, G>,
    prompter: U,
    opener: O,
    /// Menu hierarchy for the session.
    nav: NavigationStack,
    /// Whether the session should end.
    pub should_quit: bool,
}

impl<P, G, U, O> App<P, G, U, O>
where
    P: CoursePlatform,
    G: GradingSystem,
    U: Prompter,
    O: Opener,
{
    pub fn new(loader: DataLoader<P, G>, prompter: U, opener: O) -> Self {
        Self {
            loader,
            prompter,
            opener,
            nav: NavigationStack::default(),
            should_quit: false,
        }
    }

    pub fn nav(&self) -> &NavigationStack {
        &self.nav
    }

    pub fn loader(&self) -> &DataLoader<P, G> {
        &self.loader
    }

    pub fn prompter(&self) -> &U {
        &self.prompter
    }

    pub fn opener(&self) -> &O {
        &self.opener
    }

    /// Main navigation loop. Returns once the user exits.
    pub async fn run(&mut self) -> Result<()> {
        while !self.should_quit {
            let transition = self.step().await?;
            self.apply(transition);
        }
        Ok(())
    }

    /// Render the current level and wait for the user's decision.
    pub async fn step(&mut self) -> Result<Transition> {
        let level = self.nav.current().clone();
        self.prompter.show_breadcrumbs(&self.nav.breadcrumbs());

        match level {
            ViewLevel::Root => self.root_menu(),
            ViewLevel::Grades => self.grades().await,
            ViewLevel::Courses => self.course_list().await,
            ViewLevel::CourseActions { course } => self.course_actions(course),
            ViewLevel::Assignments { course } => self.assignment_list(course).await,
            ViewLevel::Attachments { assignment, .. } => self.attachment_list(assignment.id).await,
            ViewLevel::Recordings { course } => self.recording_list(course).await,
        }
    }

    /// Move through the hierarchy according to `transition`.
    pub fn apply(&mut self, transition: Transition) {
        tracing::debug!(from = ?self.nav.current(), ?transition, "navigating");
        match transition {
            Transition::Push(level) => self.nav.push(level),
            Transition::Back => self.go_back(),
            Transition::Exit => {
                self.prompter.info("Exiting...");
                self.should_quit = true;
            }
        }
    }

    /// Navigate back to the parent level.
    /// Forgets the data owned by the level we leave so it reloads on the next visit.
    fn go_back(&mut self) {
        let current = self.nav.current().clone();

        if !self.nav.pop() {
            self.should_quit = true;
            return;
        }

        match current {
            ViewLevel::Courses | ViewLevel::Grades => self.loader.forget(MemoScope::All),
            ViewLevel::CourseActions { .. } => self.loader.forget(MemoScope::Course),
            ViewLevel::Root
            | ViewLevel::Assignments { .. }
            | ViewLevel::Attachments { .. }
            | ViewLevel::Recordings { .. } => {}
        }
    }

    fn root_menu(&mut self) -> Result<Transition> {
        let choices = [
            Choice::new("🏫 View Courses (Moodle)", RootAction::Courses),
            Choice::new("📝 View Grades (IMS)", RootAction::Grades),
            Choice::new("🚪 Exit", RootAction::Exit),
        ];

        self.prepare_menu();
        let transition = match self.prompter.select(&ViewLevel::Root.title(), &choices)? {
            Some(RootAction::Courses) => Transition::Push(ViewLevel::Courses),
            Some(RootAction::Grades) => Transition::Push(ViewLevel::Grades),
            Some(RootAction::Exit) | None => Transition::Exit,
        };
        Ok(transition)
    }

    async fn grades(&mut self) -> Result<Transition> {
        let grades = match self.loader.grades().await {
            Ok(grades) => grades,
            Err(e) => return self.failed("grades", e),
        };
        self.show_warnings();

        let graded = filters::graded(&grades);
        if graded.is_empty() {
            return self.notice("No grades found.");
        }

        for grade in graded {
            self.prompter.info(&filters::grade_line(grade));
        }
        self.prompter.info("");
        self.prompter.pause()?;
        Ok(Transition::Back)
    }

    async fn course_list(&mut self) -> Result<Transition> {
        let courses = match self.loader.courses().await {
            Ok(courses) => courses,
            Err(e) => return self.failed("courses", e),
        };
        if courses.is_empty() {
            return self.notice("No courses found.");
        }

        let choices: Vec<Choice<Course>> = courses
            .iter()
            .map(|course| Choice::display(&course.name, course.clone()))
            .collect();

        self.prepare_menu();
        let transition = match self.prompter.select(&ViewLevel::Courses.title(), &choices)? {
            Some(course) => Transition::Push(ViewLevel::CourseActions { course }),
            None => Transition::Back,
        };
        Ok(transition)
    }

    fn course_actions(&mut self, course: Course) -> Result<Transition> {
        let choices = [
            Choice::new("✏️ Assignments", CourseAction::Assignments),
            Choice::new("🎥 Recordings", CourseAction::Recordings),
            Choice::new("🚪 Back", CourseAction::Back),
        ];
        let title = ViewLevel::CourseActions {
            course: course.clone(),
        }
        .title();

        self.prepare_menu();
        let transition = match self.prompter.select(&title, &choices)? {
            Some(CourseAction::Assignments) => Transition::Push(ViewLevel::Assignments { course }),
            Some(CourseAction::Recordings) => Transition::Push(ViewLevel::Recordings { course }),
            Some(CourseAction::Back) | None => Transition::Back,
        };
        Ok(transition)
    }

    async fn assignment_list(&mut self, course: Course) -> Result<Transition> {
        let assignments = match self.loader.assignments().await {
            Ok(assignments) => assignments,
            Err(e) => return self.failed("assignments", e),
        };

        let upcoming = filters::course_assignment_menu(&assignments, course.id, Utc::now());
        if upcoming.is_empty() {
            return self.notice("No assignments found.");
        }
        tracing::debug!(course_id = course.id, count = upcoming.len(), "upcoming assignments");

        let choices: Vec<Choice<_>> = upcoming
            .iter()
            .map(|u| Choice::display(&u.title(), u.assignment.clone()))
            .collect();
        let title = format!(
            "You have {} assignments for course {}. Select an assignment:",
            upcoming.len(),
            course.id
        );

        self.prepare_menu();
        let transition = match self.prompter.select(&title, &choices)? {
            Some(assignment) => Transition::Push(ViewLevel::Attachments { course, assignment }),
            None => Transition::Back,
        };
        Ok(transition)
    }

    async fn attachment_list(&mut self, assignment_id: u64) -> Result<Transition> {
        let info = match self.loader.additional_info(assignment_id).await {
            Ok(info) => info,
            Err(e) => return self.failed("assignment details", e),
        };
        if info.attachments.is_empty() {
            return self.notice("No attachments found.");
        }

        let choices: Vec<Choice<String>> = info
            .attachments
            .iter()
            .map(|a| Choice::display(&a.filename, a.url.clone()))
            .collect();

        self.prepare_menu();
        if let Some(url) = self
            .prompter
            .select("Select an attachment:", &choices)?
        {
            self.prompter.info("\nOpening file...");
            self.open(&without_forcedownload(&url));
        }
        Ok(Transition::Back)
    }

    async fn recording_list(&mut self, course: Course) -> Result<Transition> {
        let recordings = match self.loader.recordings(course.id).await {
            Ok(recordings) => filters::recordings_for_course(&recordings, course.id),
            Err(e) => return self.failed("recordings", e),
        };
        if recordings.is_empty() {
            return self.notice("No recordings found.");
        }

        let choices: Vec<Choice<String>> = recordings
            .iter()
            .map(|r| Choice::display(&r.name, r.url.clone()))
            .collect();
        let title = format!(
            "Found {} recordings for course {}. Select a recording:",
            recordings.len(),
            course.id
        );

        self.prepare_menu();
        if let Some(url) = self.prompter.select(&title, &choices)? {
            self.prompter.info("\nPlaying recording...");
            self.open(&url);
        }
        Ok(Transition::Back)
    }

    /// Hand a URL to the external viewer. Failures are reported, not fatal.
    fn open(&mut self, url: &str) {
        if let Err(e) = self.opener.open(url) {
            tracing::warn!(url, error = %e, "failed to open url");
            self.prompter.error(&format!("Could not open {}: {}", url, e));
        }
    }

    /// Clear the screen before a menu, unless there are cache warnings to show.
    fn prepare_menu(&mut self) {
        if !self.show_warnings() {
            self.prompter.clear();
        }
    }

    /// Print pending cache warnings. Returns whether anything was printed.
    fn show_warnings(&mut self) -> bool {
        let warnings = self.loader.take_warnings();
        for warning in &warnings {
            self.prompter.error(warning);
        }
        !warnings.is_empty()
    }

    /// Informational short-circuit back to the parent level.
    fn notice(&mut self, message: &str) -> Result<Transition> {
        self.show_warnings();
        self.prompter.info(message);
        self.prompter.pause()?;
        Ok(Transition::Back)
    }

    /// Report a failed fetch and return to the parent level.
    fn failed(&mut self, what: &str, error: TauError) -> Result<Transition> {
        tracing::error!(what, error = %error, "loading failed");
        self.show_warnings();
        self.prompter
            .error(&format!("Could not load {}: {}", what, error));
        self.prompter.pause()?;
        Ok(Transition::Back)
    }
}

/// Drop Moodle's `forcedownload=1` query parameter so files open in the browser.
fn without_forcedownload(url: &str) -> String {
    url.replace("?forcedownload=1&", "?")
        .replace("?forcedownload=1", "")
        .replace("&forcedownload=1", "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_without_forcedownload() {
        assert_eq!(
            without_forcedownload("https://m.test/file.pdf?forcedownload=1"),
            "https://m.test/file.pdf"
        );
        assert_eq!(
            without_forcedownload("https://m.test/file.pdf?forcedownload=1&token=abc"),
            "https://m.test/file.pdf?token=abc"
        );
        assert_eq!(
            without_forcedownload("https://m.test/file.pdf?token=abc&forcedownload=1"),
            "https://m.test/file.pdf?token=abc"
        );
        assert_eq!(
            without_forcedownload("https://m.test/file.pdf"),
            "https://m.test/file.pdf"
        );
    }
}
