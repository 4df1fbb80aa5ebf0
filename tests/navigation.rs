// Navigation flows driven end to end with scripted input.
// Fake services stand in for Moodle and IMS; the cache lives in a temp dir.

use std::cell::Cell;
use std::collections::VecDeque;

use chrono::{Duration, Utc};
use tempfile::TempDir;

use tau_cli::app::{App, Transition};
use tau_cli::backend::{
    AdditionalAssignmentInfo, Assignment, Attachment, Course, CoursePlatform, Grade,
    GradingSystem, Recording,
};
use tau_cli::cache::CacheStore;
use tau_cli::error::{Result, TauError};
use tau_cli::loader::DataLoader;
use tau_cli::state::ViewLevel;
use tau_cli::ui::{Choice, Opener, Progress, Prompter};

enum Answer {
    /// Pick the first choice whose label contains the text.
    Pick(&'static str),
    PickIndex(usize),
    Cancel,
}

#[derive(Default)]
struct ScriptedPrompter {
    script: VecDeque<Answer>,
    selects: Vec<(String, Vec<String>)>,
    infos: Vec<String>,
    errors: Vec<String>,
    pauses: usize,
}

impl ScriptedPrompter {
    fn new(script: Vec<Answer>) -> Self {
        Self {
            script: script.into(),
            ..Self::default()
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn select<T: Clone>(&mut self, question: &str, choices: &[Choice<T>]) -> Result<Option<T>> {
        let labels: Vec<String> = choices.iter().map(|c| c.label.clone()).collect();
        self.selects.push((question.to_string(), labels.clone()));

        let index = match self.script.pop_front().unwrap_or(Answer::Cancel) {
            Answer::Cancel => return Ok(None),
            Answer::PickIndex(i) => i,
            Answer::Pick(text) => labels
                .iter()
                .position(|l| l.contains(text))
                .unwrap_or_else(|| panic!("no choice matching {:?} in {:?}", text, labels)),
        };
        Ok(Some(choices[index].value.clone()))
    }

    fn text(&mut self, _prompt: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn password(&mut self, _prompt: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn pause(&mut self) -> Result<()> {
        self.pauses += 1;
        Ok(())
    }

    fn info(&mut self, message: &str) {
        self.infos.push(message.to_string());
    }

    fn error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn clear(&mut self) {}
}

#[derive(Default)]
struct RecordingOpener {
    opened: Vec<String>,
}

impl Opener for RecordingOpener {
    fn open(&mut self, url: &str) -> std::io::Result<()> {
        self.opened.push(url.to_string());
        Ok(())
    }
}

#[derive(Default)]
struct FakeMoodle {
    fail_courses: bool,
    assignment_calls: Cell<usize>,
}

const ALGORITHMS: u64 = 101;
const INTRO_CS: u64 = 202;

impl CoursePlatform for FakeMoodle {
    async fn get_courses(&self) -> Result<Vec<Course>> {
        if self.fail_courses {
            return Err(TauError::Other("connection refused".to_string()));
        }
        Ok(vec![
            Course {
                id: ALGORITHMS,
                name: "Algorithms".to_string(),
            },
            Course {
                id: INTRO_CS,
                name: "Intro מבוא למדעי המחשב".to_string(),
            },
        ])
    }

    async fn get_assignments(&self) -> Result<Vec<Assignment>> {
        self.assignment_calls.set(self.assignment_calls.get() + 1);
        let exercise = Assignment {
            id: 7,
            course_id: ALGORITHMS,
            name: "Exercise 3".to_string(),
            due_date: Utc::now() + Duration::days(5),
        };
        let overdue = Assignment {
            id: 6,
            course_id: ALGORITHMS,
            name: "Exercise 2".to_string(),
            due_date: Utc::now() - Duration::days(2),
        };
        let closed = Assignment {
            id: 8,
            course_id: INTRO_CS,
            name: "Exercise 1".to_string(),
            due_date: Utc::now() - Duration::days(1),
        };
        Ok(vec![exercise.clone(), overdue, exercise, closed])
    }

    async fn get_recordings(&self, course_id: u64) -> Result<Vec<Recording>> {
        if course_id != ALGORITHMS {
            return Ok(Vec::new());
        }
        Ok(vec![Recording {
            course_id,
            name: "Lecture 1".to_string(),
            url: "https://video.test/lecture-1".to_string(),
        }])
    }

    async fn get_additional_info(&self, _assignment_id: u64) -> Result<AdditionalAssignmentInfo> {
        Ok(AdditionalAssignmentInfo {
            attachments: vec![Attachment {
                filename: "hw3.pdf".to_string(),
                url: "https://m.test/webservice/pluginfile.php/9/hw3.pdf?forcedownload=1&token=abc"
                    .to_string(),
            }],
        })
    }
}

#[derive(Default)]
struct FakeIms;

impl GradingSystem for FakeIms {
    async fn get_all_grades(&self, _years: &[i32]) -> Result<Vec<Grade>> {
        let grade = |semester: &str, course_id: &str, grade: Option<f64>| Grade {
            semester: semester.to_string(),
            course_id: course_id.to_string(),
            grade,
        };
        Ok(vec![
            grade("2024a", "0368-3500", Some(88.6)),
            grade("2023b", "0368-2157", Some(95.0)),
            grade("2024a", "0368-1105", None),
            grade("2023b", "0368-2160", Some(71.0)),
        ])
    }
}

type TestApp = App<FakeMoodle, FakeIms, ScriptedPrompter, RecordingOpener>;

fn app(moodle: FakeMoodle, script: Vec<Answer>, dir: &TempDir) -> TestApp {
    let loader = DataLoader::new(moodle, FakeIms, CacheStore::new(dir.path()))
        .with_progress(Progress::Hidden);
    App::new(loader, ScriptedPrompter::new(script), RecordingOpener::default())
}

async fn advance(app: &mut TestApp) -> Transition {
    let transition = app.step().await.unwrap();
    app.apply(transition.clone());
    transition
}

#[tokio::test]
async fn test_exit_from_root() {
    let dir = TempDir::new().unwrap();
    let mut app = app(FakeMoodle::default(), vec![Answer::Pick("Exit")], &dir);

    app.run().await.unwrap();

    assert!(app.should_quit);
    assert!(app.prompter().infos.contains(&"Exiting...".to_string()));
    assert_eq!(app.prompter().selects.len(), 1);
}

#[tokio::test]
async fn test_cancel_assignments_returns_to_course_actions() {
    let dir = TempDir::new().unwrap();
    let script = vec![
        Answer::Pick("Courses"),
        Answer::Pick("Algorithms"),
        Answer::Pick("Assignments"),
        Answer::Cancel,
    ];
    let mut app = app(FakeMoodle::default(), script, &dir);

    for _ in 0..3 {
        advance(&mut app).await;
    }
    assert!(matches!(app.nav().current(), ViewLevel::Assignments { .. }));

    assert_eq!(advance(&mut app).await, Transition::Back);
    match app.nav().current() {
        ViewLevel::CourseActions { course } => assert_eq!(course.id, ALGORITHMS),
        other => panic!("expected course actions, got {:?}", other),
    }
}

#[tokio::test]
async fn test_upcoming_assignments_are_deduplicated() {
    let dir = TempDir::new().unwrap();
    let script = vec![
        Answer::Pick("Courses"),
        Answer::Pick("Algorithms"),
        Answer::Pick("Assignments"),
    ];
    let mut app = app(FakeMoodle::default(), script, &dir);

    for _ in 0..4 {
        advance(&mut app).await;
    }

    let (question, labels) = &app.prompter().selects[3];
    assert!(question.starts_with("You have 1 assignments"));
    assert_eq!(labels.len(), 1);
    assert!(labels[0].starts_with("Exercise 3 - "));
    assert!(labels[0].ends_with("days left"));
}

#[tokio::test]
async fn test_empty_recordings_goes_back_without_menu() {
    let dir = TempDir::new().unwrap();
    let script = vec![
        Answer::Pick("Courses"),
        Answer::PickIndex(1),
        Answer::Pick("Recordings"),
    ];
    let mut app = app(FakeMoodle::default(), script, &dir);

    for _ in 0..3 {
        advance(&mut app).await;
    }
    let selects_before = app.prompter().selects.len();

    assert_eq!(advance(&mut app).await, Transition::Back);
    assert_eq!(app.prompter().selects.len(), selects_before);
    assert!(app.prompter().infos.contains(&"No recordings found.".to_string()));
    assert_eq!(app.prompter().pauses, 1);
    match app.nav().current() {
        ViewLevel::CourseActions { course } => assert_eq!(course.id, INTRO_CS),
        other => panic!("expected course actions, got {:?}", other),
    }
}

#[tokio::test]
async fn test_mixed_script_course_keeps_identity() {
    let dir = TempDir::new().unwrap();
    let script = vec![Answer::Pick("Courses"), Answer::PickIndex(1)];
    let mut app = app(FakeMoodle::default(), script, &dir);

    advance(&mut app).await;
    let transition = advance(&mut app).await;

    let labels = &app.prompter().selects[1].1;
    assert_ne!(labels[1], "Intro מבוא למדעי המחשב");
    match transition {
        Transition::Push(ViewLevel::CourseActions { course }) => {
            assert_eq!(course.id, INTRO_CS);
            assert_eq!(course.name, "Intro מבוא למדעי המחשב");
        }
        other => panic!("expected push, got {:?}", other),
    }
}

#[tokio::test]
async fn test_assignments_memoized_within_course_and_refetched_after_root() {
    let dir = TempDir::new().unwrap();
    let script = vec![
        Answer::Pick("Courses"),
        Answer::Pick("Algorithms"),
        Answer::Pick("Assignments"),
        Answer::Cancel,
        Answer::Pick("Assignments"),
        Answer::Cancel,
        Answer::Pick("Back"),
        Answer::Cancel,
        Answer::Pick("Courses"),
        Answer::Pick("Algorithms"),
        Answer::Pick("Assignments"),
    ];
    let mut app = app(FakeMoodle::default(), script, &dir);

    for _ in 0..6 {
        advance(&mut app).await;
    }
    assert_eq!(app.loader().platform().assignment_calls.get(), 1);

    app.run().await.unwrap();

    assert!(app.should_quit);
    assert_eq!(app.loader().platform().assignment_calls.get(), 2);
    assert!(app.loader().memo().is_empty());
}

#[tokio::test]
async fn test_grades_listing() {
    let dir = TempDir::new().unwrap();
    let mut app = app(FakeMoodle::default(), vec![Answer::Pick("Grades")], &dir);

    advance(&mut app).await;
    assert_eq!(advance(&mut app).await, Transition::Back);

    let lines: Vec<&String> = app
        .prompter()
        .infos
        .iter()
        .filter(|line| line.starts_with("- "))
        .collect();
    assert_eq!(
        lines,
        [
            "- 2023b - 0368-2157 - 95",
            "- 2023b - 0368-2160 - 71",
            "- 2024a - 0368-3500 - 88",
        ]
    );
    assert_eq!(app.nav().current(), &ViewLevel::Root);
    assert!(dir.path().join("grades_cache.json").exists());
}

#[tokio::test]
async fn test_failed_fetch_returns_to_parent() {
    let dir = TempDir::new().unwrap();
    let moodle = FakeMoodle {
        fail_courses: true,
        ..FakeMoodle::default()
    };
    let mut app = app(moodle, vec![Answer::Pick("Courses")], &dir);

    advance(&mut app).await;
    assert_eq!(advance(&mut app).await, Transition::Back);

    assert_eq!(app.nav().current(), &ViewLevel::Root);
    assert!(!app.should_quit);
    assert!(app.prompter().errors[0].contains("Could not load courses"));
    assert!(!dir.path().join("courses_cache.json").exists());
}

#[tokio::test]
async fn test_open_attachment_returns_to_assignments() {
    let dir = TempDir::new().unwrap();
    let script = vec![
        Answer::Pick("Courses"),
        Answer::Pick("Algorithms"),
        Answer::Pick("Assignments"),
        Answer::Pick("Exercise 3"),
        Answer::Pick("hw3.pdf"),
    ];
    let mut app = app(FakeMoodle::default(), script, &dir);

    for _ in 0..4 {
        advance(&mut app).await;
    }
    assert!(matches!(app.nav().current(), ViewLevel::Attachments { .. }));

    assert_eq!(advance(&mut app).await, Transition::Back);
    assert_eq!(
        app.opener().opened,
        ["https://m.test/webservice/pluginfile.php/9/hw3.pdf?token=abc"]
    );
    assert!(matches!(app.nav().current(), ViewLevel::Assignments { .. }));
}

#[tokio::test]
async fn test_open_recording_returns_to_course_actions() {
    let dir = TempDir::new().unwrap();
    let script = vec![
        Answer::Pick("Courses"),
        Answer::Pick("Algorithms"),
        Answer::Pick("Recordings"),
        Answer::Pick("Lecture 1"),
    ];
    let mut app = app(FakeMoodle::default(), script, &dir);

    for _ in 0..3 {
        advance(&mut app).await;
    }
    assert!(matches!(app.nav().current(), ViewLevel::Recordings { .. }));

    assert_eq!(advance(&mut app).await, Transition::Back);
    assert_eq!(app.opener().opened, ["https://video.test/lecture-1"]);
    assert!(app.prompter().infos.contains(&"\nPlaying recording...".to_string()));
    match app.nav().current() {
        ViewLevel::CourseActions { course } => assert_eq!(course.id, ALGORITHMS),
        other => panic!("expected course actions, got {:?}", other),
    }
}

#[tokio::test]
async fn test_cancel_attachments_returns_to_assignments() {
    let dir = TempDir::new().unwrap();
    let script = vec![
        Answer::Pick("Courses"),
        Answer::Pick("Algorithms"),
        Answer::Pick("Assignments"),
        Answer::Pick("Exercise 3"),
        Answer::Cancel,
    ];
    let mut app = app(FakeMoodle::default(), script, &dir);

    for _ in 0..4 {
        advance(&mut app).await;
    }

    assert_eq!(advance(&mut app).await, Transition::Back);
    assert!(app.opener().opened.is_empty());
    match app.nav().current() {
        ViewLevel::Assignments { course } => assert_eq!(course.id, ALGORITHMS),
        other => panic!("expected assignments, got {:?}", other),
    }
}

#[tokio::test]
async fn test_only_overdue_assignments_goes_back_without_menu() {
    let dir = TempDir::new().unwrap();
    let script = vec![
        Answer::Pick("Courses"),
        Answer::PickIndex(1),
        Answer::Pick("Assignments"),
    ];
    let mut app = app(FakeMoodle::default(), script, &dir);

    for _ in 0..3 {
        advance(&mut app).await;
    }
    let selects_before = app.prompter().selects.len();

    assert_eq!(advance(&mut app).await, Transition::Back);
    assert_eq!(app.prompter().selects.len(), selects_before);
    assert!(app.prompter().infos.contains(&"No assignments found.".to_string()));
    match app.nav().current() {
        ViewLevel::CourseActions { course } => assert_eq!(course.id, INTRO_CS),
        other => panic!("expected course actions, got {:?}", other),
    }
}

#[tokio::test]
async fn test_corrupted_cache_warns_and_continues() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("courses_cache.json"), "{\"data\": [").unwrap();
    let script = vec![Answer::Pick("Courses"), Answer::Pick("Algorithms")];
    let mut app = app(FakeMoodle::default(), script, &dir);

    advance(&mut app).await;
    let transition = advance(&mut app).await;

    let errors = &app.prompter().errors;
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("is corrupted. Reinitializing."));
    assert!(matches!(
        transition,
        Transition::Push(ViewLevel::CourseActions { ref course }) if course.id == ALGORITHMS
    ));

    // The refetched data replaced the broken file
    let contents = std::fs::read_to_string(dir.path().join("courses_cache.json")).unwrap();
    assert!(contents.contains("Algorithms"));
}
