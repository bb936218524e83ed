//! Filename templates for image snapshots
//!
//! `{name}` expands to one of the variables below, `{{` and `}}` produce
//! literal braces. Templates are checked when parsed, so expansion cannot fail.
//!
//! | Variable              | Value                                         |
//! |-----------------------|-----------------------------------------------|
//! | `errorname`           | `pop`, `drop` or `dupes`                      |
//! | `filepath`            | input path as given                           |
//! | `filename`            | last path component                           |
//! | `basename`            | `filename` without its extension              |
//! | `dirname`             | directory part including the trailing `/`     |
//! | `channel`             | channel index                                 |
//! | `first_error_sample`  | first sample of the bad area                  |
//! | `last_error_sample`   | last sample of the bad area                   |
//! | `error_samples`       | length of the bad area                        |
//! | `first_window_sample` | first sample shown in the image               |
//! | `last_window_sample`  | last sample shown in the image                |
//! | `window_size`         | configured window size                        |
use std::fmt;
use std::path::{is_separator, PathBuf};
use std::str::FromStr;
use thiserror::Error;

pub const DEFAULT_TEMPLATE: &str =
    "{basename}_sample_{first_error_sample}_channel_{channel}_{errorname}.png";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("empty image filename")]
    Empty,

    #[error("unknown variable name '{name}' at offset {offset}")]
    UnknownVariable { name: String, offset: usize },

    #[error("illegal character '{{' in variable name at offset {offset}")]
    NestedBrace { offset: usize },

    #[error("unterminated variable name at offset {offset}")]
    Unterminated { offset: usize },

    #[error("illegal lone '}}' at offset {offset}")]
    LoneClose { offset: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Variable {
    ErrorName,
    FilePath,
    FileName,
    BaseName,
    DirName,
    Channel,
    FirstErrorSample,
    LastErrorSample,
    ErrorSamples,
    FirstWindowSample,
    LastWindowSample,
    WindowSize,
}

impl Variable {
    const NAMES: [(&'static str, Variable); 12] = [
        ("errorname", Variable::ErrorName),
        ("filepath", Variable::FilePath),
        ("filename", Variable::FileName),
        ("basename", Variable::BaseName),
        ("dirname", Variable::DirName),
        ("channel", Variable::Channel),
        ("first_error_sample", Variable::FirstErrorSample),
        ("last_error_sample", Variable::LastErrorSample),
        ("error_samples", Variable::ErrorSamples),
        ("first_window_sample", Variable::FirstWindowSample),
        ("last_window_sample", Variable::LastWindowSample),
        ("window_size", Variable::WindowSize),
    ];

    fn from_name(name: &str) -> Option<Self> {
        Self::NAMES
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, variable)| *variable)
    }

    fn expand(self, snapshot: &Snapshot<'_>, out: &mut String) {
        let path = snapshot.filepath;
        let name_start = path.rfind(is_separator).map_or(0, |index| index + 1);
        let file_name = &path[name_start..];

        match self {
            Self::ErrorName => out.push_str(snapshot.errorname),
            Self::FilePath => out.push_str(path),
            Self::FileName => out.push_str(file_name),
            Self::BaseName => match file_name.rfind('.') {
                Some(dot) if dot > 0 => out.push_str(&file_name[..dot]),
                _ => out.push_str(file_name),
            },
            Self::DirName => out.push_str(&path[..name_start]),
            Self::Channel => out.push_str(&snapshot.channel.to_string()),
            Self::FirstErrorSample => out.push_str(&snapshot.first_error_sample.to_string()),
            Self::LastErrorSample => out.push_str(&snapshot.last_error_sample.to_string()),
            Self::ErrorSamples => {
                let count = snapshot.last_error_sample + 1 - snapshot.first_error_sample;
                out.push_str(&count.to_string());
            }
            Self::FirstWindowSample => out.push_str(&snapshot.first_window_sample.to_string()),
            Self::LastWindowSample => out.push_str(&snapshot.last_window_sample.to_string()),
            Self::WindowSize => out.push_str(&snapshot.window_size.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Variable(Variable),
}

/// Everything a template can refer to for one bad area
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub errorname: &'a str,
    pub filepath: &'a str,
    pub channel: u16,
    pub first_error_sample: u64,
    pub last_error_sample: u64,
    pub first_window_sample: u64,
    pub last_window_sample: u64,
    pub window_size: usize,
}

/// A parsed and validated image filename template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl FilenameTemplate {
    /// Output path for one snapshot
    pub fn render(&self, snapshot: &Snapshot<'_>) -> PathBuf {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Variable(variable) => variable.expand(snapshot, &mut out),
            }
        }
        PathBuf::from(out)
    }
}

impl Default for FilenameTemplate {
    fn default() -> Self {
        Self {
            source: DEFAULT_TEMPLATE.to_string(),
            segments: vec![
                Segment::Variable(Variable::BaseName),
                Segment::Literal("_sample_".to_string()),
                Segment::Variable(Variable::FirstErrorSample),
                Segment::Literal("_channel_".to_string()),
                Segment::Variable(Variable::Channel),
                Segment::Literal("_".to_string()),
                Segment::Variable(Variable::ErrorName),
                Segment::Literal(".png".to_string()),
            ],
        }
    }
}

impl FromStr for FilenameTemplate {
    type Err = TemplateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(TemplateError::Empty);
        }

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = s.char_indices().peekable();

        while let Some((offset, c)) = chars.next() {
            match c {
                '{' if chars.next_if(|&(_, next)| next == '{').is_some() => literal.push('{'),
                '{' => {
                    let start = offset + 1;
                    let mut end = None;
                    for (index, c) in chars.by_ref() {
                        match c {
                            '}' => {
                                end = Some(index);
                                break;
                            }
                            '{' => return Err(TemplateError::NestedBrace { offset: index }),
                            _ => {}
                        }
                    }
                    let end = end.ok_or(TemplateError::Unterminated { offset: start })?;

                    let name = &s[start..end];
                    let variable =
                        Variable::from_name(name).ok_or_else(|| TemplateError::UnknownVariable {
                            name: name.to_string(),
                            offset: start,
                        })?;
                    if !literal.is_empty() {
                        segments.push(Segment::Literal(std::mem::take(&mut literal)));
                    }
                    segments.push(Segment::Variable(variable));
                }
                '}' if chars.next_if(|&(_, next)| next == '}').is_some() => literal.push('}'),
                '}' => return Err(TemplateError::LoneClose { offset }),
                c => literal.push(c),
            }
        }
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: s.to_string(),
            segments,
        })
    }
}

impl fmt::Display for FilenameTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}
