use owo_colors::{OwoColorize, Stream};
use serde::Serialize;
use serde_json::Value;

use crate::entities::{Entity, Tag};
use crate::models::OutputMode;

pub const NOT_FOLLOWING_ANY: &str = "You're not following any hashtags";
pub const NO_FEATURED: &str = "You don't have any featured hashtags";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Followed,
    Unfollowed,
    Featured,
    Unfeatured,
}

/// Output of a command, ready to print.
#[derive(Debug, Clone, PartialEq)]
pub enum Rendered {
    Text(Vec<String>),
    Json(Value),
}

impl Rendered {
    pub fn print(&self) -> anyhow::Result<()> {
        match self {
            Self::Json(value) => println!("{}", serde_json::to_string(value)?),
            Self::Text(lines) => {
                for line in lines {
                    match line.strip_prefix('✓') {
                        Some(rest) => println!(
                            "{}{rest}",
                            "✓".if_supports_color(Stream::Stdout, |t| t.green())
                        ),
                        None => println!("{line}"),
                    }
                }
            }
        }
        Ok(())
    }
}

pub fn confirmation_line(action: Action, tag_name: &str) -> String {
    match action {
        Action::Followed => format!("✓ You are now following #{tag_name}"),
        Action::Unfollowed => format!("✓ You are no longer following #{tag_name}"),
        Action::Featured => format!("✓ Tag #{tag_name} is now featured"),
        Action::Unfeatured => format!("✓ Tag #{tag_name} is no longer featured"),
    }
}

pub fn listing_lines<T: Entity>(records: &[T], empty_message: &str, quiet: bool) -> Vec<String> {
    if quiet {
        return records.iter().map(|r| format!("#{}", r.name())).collect();
    }
    if records.is_empty() {
        return vec![empty_message.to_string()];
    }

    records
        .iter()
        .map(|record| match record.url() {
            Some(url) if !url.is_empty() => format!("* #{}\t{url}", record.name()),
            _ => format!("* #{}", record.name()),
        })
        .collect()
}

pub fn tag_info_lines(tag: &Tag, quiet: bool) -> Vec<String> {
    let mut lines = vec![format!("#{}", tag.name)];
    if quiet {
        return lines;
    }
    if let Some(url) = tag.url.as_deref().filter(|u| !u.is_empty()) {
        lines.push(url.to_string());
    }
    lines.push(if tag.following {
        "Following".to_string()
    } else {
        "Not following".to_string()
    });
    if !tag.history.is_empty() {
        lines.push(format!(
            "{} uses in the last {} days",
            tag.total_uses(),
            tag.history.len()
        ));
    }
    lines
}

/// `record` is what the server returned for the action; `EmptyRecord` for unfeature.
pub fn render_confirmation<T: Serialize>(
    mode: &OutputMode,
    action: Action,
    tag_name: &str,
    record: &T,
) -> Result<Rendered, serde_json::Error> {
    if mode.json {
        return serde_json::to_value(record).map(Rendered::Json);
    }
    if mode.quiet {
        return Ok(Rendered::Text(vec![format!("#{tag_name}")]));
    }
    Ok(Rendered::Text(vec![confirmation_line(action, tag_name)]))
}

pub fn render_listing<T: Entity + Serialize>(
    mode: &OutputMode,
    records: &[T],
    empty_message: &str,
) -> Result<Rendered, serde_json::Error> {
    if mode.json {
        return serde_json::to_value(records).map(Rendered::Json);
    }
    Ok(Rendered::Text(listing_lines(
        records,
        empty_message,
        mode.quiet,
    )))
}

pub fn render_tag_info(mode: &OutputMode, tag: &Tag) -> Result<Rendered, serde_json::Error> {
    if mode.json {
        return serde_json::to_value(tag).map(Rendered::Json);
    }
    Ok(Rendered::Text(tag_info_lines(tag, mode.quiet)))
}
