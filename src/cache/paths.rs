// Cache path utilities.
// Maps cache keys onto files inside the per-user cache directory.

use std::fmt;
use std::path::{Path, PathBuf};

use directories::BaseDirs;

/// Name of the per-user directory under the home directory.
const CACHE_DIR_NAME: &str = "tau";

/// Get the default cache directory (~/tau).
pub fn default_cache_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(CACHE_DIR_NAME))
}

/// Directory for the application log inside a cache directory.
pub fn log_dir(cache_dir: &Path) -> PathBuf {
    cache_dir.join("logs")
}

/// Identifies one cached entry. Each key is stored in its own file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Courses,
    Assignments,
    Grades,
    Recordings { course_id: u64 },
    LoginDetails,
}

impl CacheKey {
    /// File name of this entry inside the cache directory.
    pub fn file_name(&self) -> String {
        match self {
            CacheKey::Courses => "courses_cache.json".to_string(),
            CacheKey::Assignments => "assignments_cache.json".to_string(),
            CacheKey::Grades => "grades_cache.json".to_string(),
            CacheKey::Recordings { course_id } => format!("recordings_{}_cache.json", course_id),
            CacheKey::LoginDetails => "login_details.json".to_string(),
        }
    }

    /// Full path of this entry inside `cache_dir`.
    pub fn path_in(&self, cache_dir: &Path) -> PathBuf {
        cache_dir.join(self.file_name())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CacheKey::Courses => write!(f, "courses"),
            CacheKey::Assignments => write!(f, "assignments"),
            CacheKey::Grades => write!(f, "grades"),
            CacheKey::Recordings { course_id } => write!(f, "recordings for course {}", course_id),
            CacheKey::LoginDetails => write!(f, "login details"),
        }
    }
}
