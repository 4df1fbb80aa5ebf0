// Data loader sitting between navigation and the remote services.
// Session memo first, then the durable cache, then a remote fetch that refills both.

use std::future::Future;
use std::time::Duration;

use chrono::{Datelike, Local};
use serde::{Serialize, de::DeserializeOwned};

use crate::backend::{
    AdditionalAssignmentInfo, Assignment, Course, CoursePlatform, Grade, GradingSystem, Recording,
};
use crate::cache::{CacheKey, CacheLookup, CacheStore, DEFAULT_TTL, MemoScope, SessionMemo};
use crate::error::Result;
use crate::ui::Progress;

/// Years of grades requested around the current year.
const GRADE_YEAR_SPAN: i32 = 3;

/// Default grade year range: current year ± 3.
pub fn default_grade_years() -> Vec<i32> {
    let year = Local::now().year();
    ((year - GRADE_YEAR_SPAN)..=(year + GRADE_YEAR_SPAN)).collect()
}

/// Loads the four cached collections plus on-demand assignment details.
pub struct DataLoader<P, G> {
    platform: P,
    grading: G,
    store: CacheStore,
    ttl: Duration,
    memo: SessionMemo,
    progress: Progress,
    warnings: Vec<String>,
}

impl<P: CoursePlatform, G: GradingSystem> DataLoader<P, G> {
    /// Create a loader with the default (always stale) data TTL.
    pub fn new(platform: P, grading: G, store: CacheStore) -> Self {
        Self {
            platform,
            grading,
            store,
            ttl: DEFAULT_TTL,
            memo: SessionMemo::new(),
            progress: Progress::default(),
            warnings: Vec::new(),
        }
    }

    /// Set the TTL applied to the durable cache for data keys.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Set how remote calls are indicated to the user.
    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn grading(&self) -> &G {
        &self.grading
    }

    pub fn memo(&self) -> &SessionMemo {
        &self.memo
    }

    /// Forget memoized collections when navigation leaves the level that owns them.
    pub fn forget(&mut self, scope: MemoScope) {
        tracing::debug!(?scope, "forgetting session memo");
        self.memo.forget(scope);
    }

    /// Cache warnings collected since the last call, for display.
    pub fn take_warnings(&mut self) -> Vec<String> {
        std::mem::take(&mut self.warnings)
    }

    pub async fn courses(&mut self) -> Result<Vec<Course>> {
        if let Some(courses) = &self.memo.courses {
            return Ok(courses.clone());
        }

        let courses = load_or_fetch(
            &self.store,
            &mut self.warnings,
            self.ttl,
            self.progress,
            CacheKey::Courses,
            ("Loading courses", "Courses loaded!"),
            self.platform.get_courses(),
        )
        .await?;

        self.memo.courses = Some(courses.clone());
        Ok(courses)
    }

    pub async fn assignments(&mut self) -> Result<Vec<Assignment>> {
        if let Some(assignments) = &self.memo.assignments {
            return Ok(assignments.clone());
        }

        let assignments = load_or_fetch(
            &self.store,
            &mut self.warnings,
            self.ttl,
            self.progress,
            CacheKey::Assignments,
            ("Loading assignments", "Assignments loaded!"),
            self.platform.get_assignments(),
        )
        .await?;

        self.memo.assignments = Some(assignments.clone());
        Ok(assignments)
    }

    pub async fn recordings(&mut self, course_id: u64) -> Result<Vec<Recording>> {
        if let Some(recordings) = self.memo.recordings.get(&course_id) {
            return Ok(recordings.clone());
        }

        let recordings = load_or_fetch(
            &self.store,
            &mut self.warnings,
            self.ttl,
            self.progress,
            CacheKey::Recordings { course_id },
            ("Loading recordings", "Recordings loaded!"),
            self.platform.get_recordings(course_id),
        )
        .await?;

        self.memo.recordings.insert(course_id, recordings.clone());
        Ok(recordings)
    }

    pub async fn grades(&mut self) -> Result<Vec<Grade>> {
        if let Some(grades) = &self.memo.grades {
            return Ok(grades.clone());
        }

        self.progress
            .run("Connecting to IMS", "Connected!", self.grading.connect())
            .await?;

        let years = default_grade_years();
        let grades = load_or_fetch(
            &self.store,
            &mut self.warnings,
            self.ttl,
            self.progress,
            CacheKey::Grades,
            ("Loading grades", "Grades loaded!"),
            self.grading.get_all_grades(&years),
        )
        .await?;

        self.memo.grades = Some(grades.clone());
        Ok(grades)
    }

    /// Attachments for one assignment. Always fetched, never cached.
    pub async fn additional_info(&mut self, assignment_id: u64) -> Result<AdditionalAssignmentInfo> {
        tracing::info!(assignment_id, "fetching additional assignment info");
        self.progress
            .run(
                "Loading additional information",
                "Loaded!",
                self.platform.get_additional_info(assignment_id),
            )
            .await
    }
}

/// Return the cached value for `key`, or run `fetch`, save its result, and return it.
/// A failed fetch is returned as-is and nothing is written.
async fn load_or_fetch<T, F>(
    store: &CacheStore,
    warnings: &mut Vec<String>,
    ttl: Duration,
    progress: Progress,
    key: CacheKey,
    (running, finished): (&str, &str),
    fetch: F,
) -> Result<T>
where
    T: Serialize + DeserializeOwned,
    F: Future<Output = Result<T>>,
{
    match store.load::<T>(&key, ttl) {
        CacheLookup::Fresh(data) => return Ok(data),
        lookup => {
            if let Some(warning) = lookup.warning() {
                warnings.push(warning);
            }
        }
    }

    tracing::info!(key = %key, "fetching from remote");
    let data = match progress.run(running, finished, fetch).await {
        Ok(data) => data,
        Err(e) => {
            tracing::error!(key = %key, error = %e, "remote fetch failed");
            return Err(e);
        }
    };

    if let Err(e) = store.save(&key, &data) {
        tracing::warn!(key = %key, error = %e, "failed to save cache entry");
    }

    Ok(data)
}
