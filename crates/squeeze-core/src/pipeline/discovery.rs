//! Source discovery: find the newest file matching a job's name pattern.

use regex::Regex;
use std::path::PathBuf;
use std::time::SystemTime;
use walkdir::WalkDir;

use crate::error::PipelineError;

/// Resolves logical job names to source files in one directory.
#[derive(Debug, Clone)]
pub struct SourceLocator {
    dir: PathBuf,
    pattern: String,
}

/// A file that matched a job's pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredFile {
    /// Full path to the file
    pub path: PathBuf,
    /// File size in bytes
    pub size: u64,
    /// Creation time, or modification time where the platform lacks it
    pub created: SystemTime,
}

impl SourceLocator {
    /// `pattern` is a file name template: `{name}` is replaced by the job
    /// name, `*` matches any run of characters and `?` exactly one.
    pub fn new(dir: impl Into<PathBuf>, pattern: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            pattern: pattern.into(),
        }
    }

    /// All files in the directory (non-recursive) matching the pattern for
    /// `name`, sorted by path.
    pub fn candidates(&self, name: &str) -> Result<Vec<DiscoveredFile>, PipelineError> {
        let matcher = self.matcher(name)?;
        let mut files = Vec::new();

        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(file_name) = entry.file_name().to_str() else {
                continue;
            };
            if !matcher.is_match(file_name) {
                continue;
            }
            if let Ok(meta) = entry.metadata() {
                let created = meta
                    .created()
                    .or_else(|_| meta.modified())
                    .unwrap_or(SystemTime::UNIX_EPOCH);
                files.push(DiscoveredFile {
                    path: entry.path().to_path_buf(),
                    size: meta.len(),
                    created,
                });
            }
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    /// The most recently created match for `name`, if any. Ties go to the
    /// lexically greatest path.
    pub fn locate(&self, name: &str) -> Result<Option<DiscoveredFile>, PipelineError> {
        let files = self.candidates(name)?;
        tracing::trace!("{} candidate(s) for {:?} in {:?}", files.len(), name, self.dir);
        Ok(files
            .into_iter()
            .max_by(|a, b| a.created.cmp(&b.created).then_with(|| a.path.cmp(&b.path))))
    }

    fn matcher(&self, name: &str) -> Result<Regex, PipelineError> {
        let file_pattern = self.pattern.replace("{name}", name);
        let mut re = String::from("^");
        let mut literal = String::new();

        for c in file_pattern.chars() {
            match c {
                '*' | '?' => {
                    re.push_str(&regex::escape(&literal));
                    literal.clear();
                    re.push_str(if c == '*' { ".*" } else { "." });
                }
                _ => literal.push(c),
            }
        }
        re.push_str(&regex::escape(&literal));
        re.push('$');

        Regex::new(&re).map_err(|e| PipelineError::Pattern {
            pattern: file_pattern,
            message: e.to_string(),
        })
    }
}
