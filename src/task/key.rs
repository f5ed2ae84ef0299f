use chrono::{Datelike, Local, NaiveDate};
use std::path::{Path, PathBuf};

/// Source of "today" used to fill in a missing year or day
pub trait DateProvider {
    fn today(&self) -> NaiveDate;
}

/// Reads the local wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemDate;

impl DateProvider for SystemDate {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Always answers with the same date
#[cfg(test)]
#[derive(Debug, Clone, Copy)]
pub struct FixedDate(pub NaiveDate);

#[cfg(test)]
impl DateProvider for FixedDate {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Identifies one puzzle: the remote page and its local copy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskKey {
    year: i32,
    day: u32,
}

/// Where a task lives remotely and on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskLocation {
    pub remote_url: String,
    pub local_path: PathBuf,
}

impl TaskKey {
    pub fn new(year: i32, day: u32) -> Self {
        Self { year, day }
    }

    /// Build a key, taking whatever is missing from `dates`
    pub fn resolve(year: Option<i32>, day: Option<u32>, dates: &impl DateProvider) -> Self {
        let today = dates.today();

        Self::new(
            year.unwrap_or_else(|| today.year()),
            day.unwrap_or_else(|| today.day()),
        )
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// `{base_url}/{year}/day/{day}`
    pub fn remote_url(&self, base_url: &str) -> String {
        format!("{}/{}/day/{}", base_url.trim_end_matches('/'), self.year, self.day)
    }

    /// `{root}/{year}/questions/day{day}.{extension}`
    pub fn local_path(&self, root: &Path, extension: &str) -> PathBuf {
        root.join(self.year.to_string())
            .join("questions")
            .join(format!("day{}.{}", self.day, extension))
    }

    pub fn location(&self, base_url: &str, root: &Path, extension: &str) -> TaskLocation {
        TaskLocation {
            remote_url: self.remote_url(base_url),
            local_path: self.local_path(root, extension),
        }
    }
}

impl std::fmt::Display for TaskKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} day {}", self.year(), self.day())
    }
}
