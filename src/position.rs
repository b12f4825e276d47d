//! Position publishing — mirrors the cursor into bookmarkable state.
//!
//! The external form is a URL carrying a `step` query parameter, e.g.
//! `http://localhost:5173/?step=3`. It is fully reconstructible from the
//! cursor alone.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{debug, warn};

/// Query parameter holding the cursor.
pub const STEP_PARAM: &str = "step";

pub trait PositionPublisher {
    /// Cursor to resume at, if the shared state carries one.
    fn read_initial_position(&self) -> Option<usize>;

    fn publish(&mut self, position: usize) -> Result<()>;
}

impl<P: PositionPublisher + ?Sized> PositionPublisher for &mut P {
    fn read_initial_position(&self) -> Option<usize> {
        (**self).read_initial_position()
    }

    fn publish(&mut self, position: usize) -> Result<()> {
        (**self).publish(position)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PositionError {
    #[error("invalid step value {0:?}: expected a non-negative integer")]
    InvalidStep(String),
}

/// Read the `step` parameter from a full URL or a bare query string.
///
/// Missing or empty → `None`. Leading digits are taken (`"3abc"` → 3); a
/// negative value means "before the first step" and yields `Some(0)`.
pub fn parse_step_query(input: &str) -> Result<Option<usize>, PositionError> {
    let Some(raw) = query_pairs(query_of(input))
        .filter(|(key, _)| *key == STEP_PARAM)
        .map(|(_, value)| value)
        .next()
    else {
        return Ok(None);
    };
    if raw.is_empty() {
        return Ok(None);
    }

    let trimmed = raw.trim_start();
    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let digits: String = unsigned.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return Err(PositionError::InvalidStep(raw.to_string()));
    }
    if negative {
        return Ok(Some(0));
    }
    // Too many digits to be a real step count: anything that large clamps anyway.
    Ok(Some(digits.parse().unwrap_or(usize::MAX)))
}

fn query_of(input: &str) -> &str {
    let without_fragment = input.split('#').next().unwrap_or_default();
    match without_fragment.split_once('?') {
        Some((_, query)) => query,
        None if without_fragment.contains('=') => without_fragment,
        None => "",
    }
}

fn query_pairs(query: &str) -> impl Iterator<Item = (&str, &str)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| pair.split_once('=').unwrap_or((pair, "")))
}

/// A URL whose `step` parameter can be rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepUrl {
    base: String,
    params: Vec<(String, String)>,
    fragment: Option<String>,
}

impl StepUrl {
    pub fn parse(url: &str) -> Self {
        let (rest, fragment) = match url.split_once('#') {
            Some((rest, fragment)) => (rest, Some(fragment.to_string())),
            None => (url, None),
        };
        let (base, query) = rest.split_once('?').unwrap_or((rest, ""));
        let params = query_pairs(query)
            .filter(|(key, _)| *key != STEP_PARAM)
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        StepUrl {
            base: base.to_string(),
            params,
            fragment,
        }
    }

    /// The URL with `step` set to `position`, after any other parameters.
    pub fn with_step(&self, position: usize) -> String {
        let mut url = self.base.clone();
        url.push('?');
        for (key, value) in &self.params {
            url.push_str(key);
            if !value.is_empty() {
                url.push('=');
                url.push_str(value);
            }
            url.push('&');
        }
        url.push_str(&format!("{STEP_PARAM}={position}"));
        if let Some(fragment) = &self.fragment {
            url.push('#');
            url.push_str(fragment);
        }
        url
    }
}

/// Publishes the current URL to a state file on every step.
pub struct UrlStatePublisher {
    url: StepUrl,
    path: PathBuf,
    initial: Option<usize>,
}

impl UrlStatePublisher {
    /// `explicit` is the position requested on the command line, if any; when
    /// absent the previous contents of the state file are used.
    pub fn new(url: &str, path: impl Into<PathBuf>, explicit: Option<usize>) -> Self {
        let path = path.into();
        let initial = explicit.or_else(|| match fs::read_to_string(&path) {
            Ok(previous) => match parse_step_query(previous.trim()) {
                Ok(position) => position,
                Err(e) => {
                    warn!(path = %path.display(), "ignoring saved position: {e}");
                    None
                }
            },
            Err(_) => None,
        });
        Self {
            url: StepUrl::parse(url),
            path,
            initial,
        }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    pub fn current_url(&self, position: usize) -> String {
        self.url.with_step(position)
    }
}

impl PositionPublisher for UrlStatePublisher {
    fn read_initial_position(&self) -> Option<usize> {
        self.initial
    }

    fn publish(&mut self, position: usize) -> Result<()> {
        let url = self.url.with_step(position);
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(&self.path, format!("{url}\n"))
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        debug!(%url, "published position");
        Ok(())
    }
}

/// Keeps every published position in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryPublisher {
    initial: Option<usize>,
    published: Vec<usize>,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(initial: Option<usize>) -> Self {
        Self {
            initial,
            published: Vec::new(),
        }
    }

    pub fn published(&self) -> &[usize] {
        &self.published
    }

    pub fn last(&self) -> Option<usize> {
        self.published.last().copied()
    }
}

impl PositionPublisher for MemoryPublisher {
    fn read_initial_position(&self) -> Option<usize> {
        self.initial
    }

    fn publish(&mut self, position: usize) -> Result<()> {
        self.published.push(position);
        Ok(())
    }
}
