//! Stateless file helpers used by the batch.
//!
//! Every function takes explicit paths; nothing is cached between calls.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Read a whole file as UTF-8.
pub fn read_all(path: &Path) -> io::Result<String> {
    fs::read_to_string(path)
}

/// Replace the contents of `path`, creating it and any missing parent
/// directories.
pub fn write_all(path: &Path, contents: &str) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)
}

/// Append `contents` to `path`, creating it if absent.
pub fn append(path: &Path, contents: &str) -> io::Result<()> {
    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    file.write_all(contents.as_bytes())
}

/// Split topic-list text into topics.
///
/// Lines are trimmed and blank lines are dropped; a leading byte-order mark
/// is ignored.
pub fn parse_topics(text: &str) -> Vec<String> {
    text.trim_start_matches('\u{feff}')
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// Read the topic list at `path`.
pub fn read_topics(path: &Path) -> Result<Vec<String>> {
    let text = read_all(path).map_err(|source| Error::TopicList {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_topics(&text))
}

/// Read the prompt template at `path`.
pub fn read_prompt(path: &Path) -> Result<String> {
    read_all(path).map_err(|source| Error::PromptTemplate {
        path: path.to_path_buf(),
        source,
    })
}

/// Create the output directory if needed.
pub fn prepare_output_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| Error::OutputDir {
        path: dir.to_path_buf(),
        source,
    })
}

/// Location of the artifact for `topic`.
///
/// The topic is used as the file name verbatim.
pub fn artifact_path(dir: &Path, topic: &str, extension: &str) -> PathBuf {
    if extension.is_empty() {
        dir.join(topic)
    } else {
        dir.join(format!("{topic}.{extension}"))
    }
}
