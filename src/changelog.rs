//! Changelog section embedded in a pull request body
//!
//! The section sits between two marker comments and holds one `- item` per
//! entry. An item may span several lines; continuation lines are any lines
//! that don't start a new `- ` entry.

use crate::error::{ReleaseTrainError, Result};

pub const CHANGELOG_START_MARKER: &str = "<!-- changelog -->";
pub const CHANGELOG_END_MARKER: &str = "<!-- /changelog -->";

const ITEM_PREFIX: &str = "- ";

/// Parsed pull request body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Changelog {
    /// Everything before the start marker
    pub header: String,
    /// Items in insertion order, oldest first
    pub items: Vec<String>,
}

/// Render a body made of `header` followed by the changelog section.
pub fn generate<S: AsRef<str>>(header: &str, items: &[S]) -> String {
    let mut body = String::with_capacity(header.len() + 64);
    body.push_str(header);
    body.push('\n');
    body.push_str(CHANGELOG_START_MARKER);
    body.push('\n');
    for item in items {
        body.push_str(ITEM_PREFIX);
        body.push_str(item.as_ref());
        body.push('\n');
    }
    body.push_str(CHANGELOG_END_MARKER);
    body.push('\n');
    body
}

/// Parse the changelog section out of a body.
///
/// Fails when either marker is missing, out of order, or repeated. Content
/// after the end marker is ignored.
pub fn parse(body: &str) -> Result<Changelog> {
    let start = body.find(CHANGELOG_START_MARKER).ok_or_else(|| {
        ReleaseTrainError::changelog(format!("missing start marker '{}'", CHANGELOG_START_MARKER))
    })?;
    let section_start = start + CHANGELOG_START_MARKER.len();

    let end = body[section_start..]
        .find(CHANGELOG_END_MARKER)
        .map(|offset| section_start + offset)
        .ok_or_else(|| {
            ReleaseTrainError::changelog(format!(
                "missing end marker '{}' after start marker",
                CHANGELOG_END_MARKER
            ))
        })?;

    if body.matches(CHANGELOG_START_MARKER).count() > 1
        || body.matches(CHANGELOG_END_MARKER).count() > 1
    {
        return Err(ReleaseTrainError::changelog(
            "changelog markers must appear exactly once",
        ));
    }

    let mut items: Vec<String> = Vec::new();
    for line in body[section_start..end].lines() {
        if let Some(item) = line.strip_prefix(ITEM_PREFIX) {
            items.push(item.to_string());
        } else if let Some(current) = items.last_mut() {
            current.push('\n');
            current.push_str(line);
        }
    }

    Ok(Changelog {
        header: body[..start].to_string(),
        items,
    })
}

/// Append `item` to the end of the changelog in `body` and re-render it.
///
/// A body produced by [generate] re-renders unchanged apart from the new item.
pub fn append_item(body: &str, item: &str) -> Result<String> {
    let mut changelog = parse(body)?;
    // Drop the separator line added by `generate` so it isn't doubled.
    if changelog.header == "\n" || changelog.header.ends_with("\n\n") {
        changelog.header.pop();
    }
    changelog.items.push(item.to_string());
    Ok(generate(&changelog.header, &changelog.items))
}

/// Parse a body, treating anything unparseable as an empty changelog.
pub fn items_or_empty(body: Option<&str>) -> Vec<String> {
    match body.map(parse) {
        Some(Ok(changelog)) => changelog.items,
        Some(Err(e)) => {
            tracing::warn!(error = %e, "ignoring unparseable changelog");
            Vec::new()
        }
        None => Vec::new(),
    }
}
