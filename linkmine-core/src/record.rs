use crate::aggregate::KeywordIndex;
use crate::error::{IssueCallback, KeywordError, Result};
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, error, info};

pub const ANCHOR_DELIMITER: char = ':';
pub const KEYWORD_DELIMITER: char = ',';

/// One line of the record store: `anchor:kw1,kw2,...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub anchor_text: String,
    pub keywords: Vec<String>,
}

impl Record {
    pub fn new(anchor_text: impl Into<String>, keywords: Vec<String>) -> Self {
        Self {
            anchor_text: anchor_text.into(),
            keywords,
        }
    }

    /// Records for every entry of `index`, keywords sorted within each record.
    pub fn from_index(index: &KeywordIndex) -> Vec<Record> {
        index
            .iter()
            .map(|(anchor_text, keywords)| {
                let mut keywords: Vec<String> = keywords.iter().cloned().collect();
                keywords.sort();
                Record::new(anchor_text.clone(), keywords)
            })
            .collect()
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.anchor_text, ANCHOR_DELIMITER)?;
        for (i, keyword) in self.keywords.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", KEYWORD_DELIMITER)?;
            }
            f.write_str(keyword)?;
        }
        Ok(())
    }
}

impl FromStr for Record {
    type Err = KeywordError;

    fn from_str(line: &str) -> Result<Self> {
        let (anchor_text, keywords) =
            line.split_once(ANCHOR_DELIMITER)
                .ok_or_else(|| KeywordError::MalformedRecord {
                    line: 0,
                    content: line.to_string(),
                })?;

        let keywords = if keywords.is_empty() {
            Vec::new()
        } else {
            keywords.split(KEYWORD_DELIMITER).map(str::to_string).collect()
        };

        Ok(Record::new(anchor_text, keywords))
    }
}

/// Appends keyword records to a flat file.
pub struct RecordWriter {
    path: PathBuf,
    issue_callback: Option<IssueCallback>,
}

impl RecordWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            issue_callback: None,
        }
    }

    pub fn with_issue_callback(mut self, callback: IssueCallback) -> Self {
        self.issue_callback = Some(callback);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one line per anchor text in `index` and return how many were written.
    ///
    /// Each line goes out in a single write, so a failure leaves earlier
    /// lines intact and never a partial one from this call. Nothing is
    /// rolled back.
    pub fn write(&self, index: &KeywordIndex) -> Result<usize> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.report(KeywordError::Io(e)))?;

        let mut written = 0;
        for record in Record::from_index(index) {
            let line = format!("{}\n", record);
            file.write_all(line.as_bytes())
                .map_err(|e| self.report(KeywordError::Io(e)))?;
            debug!("Wrote record {}", record);
            written += 1;
        }
        file.flush().map_err(|e| self.report(KeywordError::Io(e)))?;

        info!("Appended {} records to {}", written, self.path.display());
        Ok(written)
    }

    fn report(&self, issue: KeywordError) -> KeywordError {
        error!("Failed writing to {}: {}", self.path.display(), issue);
        if let Some(ref callback) = self.issue_callback {
            callback(&issue);
        }
        issue
    }
}

/// Read a record store back. Blank lines are skipped.
pub fn read_records(path: &Path) -> Result<Vec<Record>> {
    let content = fs::read_to_string(path)?;

    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            line.parse::<Record>().map_err(|_| KeywordError::MalformedRecord {
                line: idx + 1,
                content: line.to_string(),
            })
        })
        .collect()
}
