// changelog parser

use super::types::{
    Changelog, ChangelogCategory, ChangelogEntry, ChangelogVersion, LinkDefinition, ReleaseDate,
    ReleaseVersion, Title,
};
use crate::utils::document::Document;
use crate::utils::severity::{Diagnostic, Location, Rule, Severity};
use chrono::NaiveDate;
use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use semver::Version;
use std::ops::Range;
use tracing::debug;

const YANKED_MARKER: &str = "[YANKED]";

/// label part of a release heading
struct HeadingLabel<'a> {
    label: &'a str,
    linked: bool,
    inline_link: Option<String>,
    rest: &'a str,
}

fn split_label(text: &str) -> std::result::Result<HeadingLabel<'_>, String> {
    let Some(inner) = text.strip_prefix('[') else {
        let (label, rest) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
        return Ok(HeadingLabel {
            label,
            linked: false,
            inline_link: None,
            rest,
        });
    };

    let close = inner.find(']').ok_or("unclosed '[' in release heading")?;
    let label = inner[..close].trim();
    if label.is_empty() {
        return Err("empty release label".to_string());
    }

    let mut rest = &inner[close + 1..];
    let mut inline_link = None;
    if let Some(after) = rest.strip_prefix('(') {
        let end = after.find(')').ok_or("unclosed '(' in release link")?;
        inline_link = Some(after[..end].trim().to_string());
        rest = &after[end + 1..];
    }

    Ok(HeadingLabel {
        label,
        linked: true,
        inline_link,
        rest,
    })
}

fn strip_yanked(text: &str) -> &str {
    let text = text.trim();
    let split = text.len().saturating_sub(YANKED_MARKER.len());
    match (text.get(..split), text.get(split..)) {
        (Some(head), Some(tail)) if tail.eq_ignore_ascii_case(YANKED_MARKER) => head.trim(),
        _ => text,
    }
}

fn parse_date(text: &str) -> ReleaseDate {
    let token = text
        .trim()
        .trim_start_matches(['-', '\u{2013}', '\u{2014}'])
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(')')
        .trim();

    if token.is_empty() {
        return ReleaseDate::Missing;
    }

    // chrono accepts unpadded fields, the convention does not
    if token.len() != 10 {
        return ReleaseDate::Invalid(token.to_string());
    }

    match NaiveDate::parse_from_str(token, "%Y-%m-%d") {
        Ok(date) => ReleaseDate::Valid(date),
        Err(_) => ReleaseDate::Invalid(token.to_string()),
    }
}

fn parse_version(label: &str) -> ReleaseVersion {
    if label.eq_ignore_ascii_case("unreleased") {
        return ReleaseVersion::Unreleased;
    }

    match Version::parse(label.trim_start_matches('v')) {
        Ok(version) => ReleaseVersion::Version(version),
        Err(_) => ReleaseVersion::Invalid(label.to_string()),
    }
}

/// parse the text of a level-2 heading into a release section
///
/// accepted forms: `[1.2.3] - 2024-01-31`, `[1.2.3](url) - 2024-01-31`,
/// `1.2.3 - 2024-01-31`, `[Unreleased]`, each optionally followed by `[YANKED]`
pub fn parse_release_heading(
    text: &str,
    location: Location,
) -> std::result::Result<ChangelogVersion, String> {
    let heading = split_label(text)?;
    let version = parse_version(heading.label);

    if let ReleaseVersion::Invalid(raw) = &version {
        return Err(format!(
            "'{}' is not a semantic version or 'Unreleased'",
            raw
        ));
    }

    let mut release = ChangelogVersion::new(heading.label.to_string(), version, location);
    release.linked = heading.linked;
    release.inline_link = heading.inline_link;
    release.date = parse_date(strip_yanked(heading.rest));

    Ok(release)
}

/// text of a heading with its markers removed
fn heading_text(source: &str) -> &str {
    let line = source.lines().next().unwrap_or("").trim();
    let text = line.trim_start_matches('#').trim();

    // optional closing sequence: "## 1.0.0 ##"
    let without = text.trim_end_matches('#');
    if without.len() < text.len() && (without.is_empty() || without.ends_with([' ', '\t'])) {
        without.trim_end()
    } else {
        text
    }
}

fn collect_definitions(parser: &Parser<'_>, document: &Document) -> Vec<LinkDefinition> {
    let mut definitions: Vec<LinkDefinition> = parser
        .reference_definitions()
        .iter()
        .map(|(label, def)| LinkDefinition {
            label: label.to_string(),
            url: def.dest.to_string(),
            location: document.location(def.span.start),
        })
        .collect();
    definitions.sort_by_key(|d| d.location);
    definitions
}

/// folds heading and list events into the changelog structure
struct StructureBuilder<'d> {
    document: &'d Document,
    changelog: Changelog,
    current_version: Option<ChangelogVersion>,
}

impl<'d> StructureBuilder<'d> {
    fn new(document: &'d Document) -> Self {
        Self {
            document,
            changelog: Changelog::new(),
            current_version: None,
        }
    }

    fn heading(&mut self, level: HeadingLevel, range: Range<usize>) {
        let location = self.document.location(range.start);
        let text = heading_text(&self.document.content[range]).to_string();

        if self.changelog.first_heading_level.is_none() {
            self.changelog.first_heading_level = Some(level as u8);
        }

        match level {
            HeadingLevel::H1 => self.changelog.titles.push(Title { text, location }),
            HeadingLevel::H2 => {
                if let Some(prev) = self.current_version.take() {
                    self.changelog.add_version(prev);
                }

                let release = match parse_release_heading(&text, location) {
                    Ok(release) => release,
                    Err(reason) => {
                        let message = format!("invalid release heading '{}': {}", text, reason);
                        self.changelog.format_issues.push(
                            Diagnostic::new(Severity::Error, Rule::ReleaseHeading, message)
                                .at(location),
                        );
                        ChangelogVersion::new(text.clone(), ReleaseVersion::Invalid(text), location)
                    }
                };
                self.current_version = Some(release);
            }
            HeadingLevel::H3 => {
                let category = ChangelogCategory::new(text, location);
                match self.current_version.as_mut() {
                    Some(release) => release.categories.push(category),
                    None => self.changelog.stray_categories.push(category),
                }
            }
            // deeper headings are free-form
            _ => {}
        }
    }

    fn entry(&mut self, entry: ChangelogEntry) {
        match self.current_version.as_mut() {
            Some(release) => release.add_entry(entry),
            None => self.changelog.stray_entries.push(entry),
        }
    }

    fn finish(mut self) -> Changelog {
        if let Some(release) = self.current_version.take() {
            self.changelog.add_version(release);
        }
        self.changelog
    }
}

/// parse a loaded changelog document into its release structure
pub fn parse_changelog(document: &Document) -> Changelog {
    let parser = Parser::new_ext(&document.content, Options::empty());
    let definitions = collect_definitions(&parser, document);

    let mut builder = StructureBuilder::new(document);
    let mut open_heading: Option<(HeadingLevel, Range<usize>)> = None;
    let mut item_depth: usize = 0;
    let mut open_entry: Option<(String, Location)> = None;
    // destination and buffer length for each open link or image
    let mut open_targets: Vec<(String, usize)> = Vec::new();

    for (event, range) in parser.into_offset_iter() {
        match event {
            Event::Start(Tag::Heading { level, .. }) => open_heading = Some((level, range)),
            Event::End(TagEnd::Heading(_)) => {
                if let Some((level, range)) = open_heading.take() {
                    builder.heading(level, range);
                }
            }
            Event::Start(Tag::Item) => {
                item_depth += 1;
                if item_depth == 1 {
                    open_entry = Some((String::new(), document.location(range.start)));
                } else if let Some((buffer, _)) = open_entry.as_mut() {
                    buffer.push(' ');
                }
            }
            Event::End(TagEnd::Item) => {
                if item_depth == 1
                    && let Some((text, location)) = open_entry.take()
                {
                    builder.entry(ChangelogEntry::new(text.trim().to_string(), location));
                }
                item_depth = item_depth.saturating_sub(1);
            }
            Event::Start(Tag::Link { dest_url, .. } | Tag::Image { dest_url, .. }) => {
                let start = open_entry.as_ref().map_or(0, |(buffer, _)| buffer.len());
                open_targets.push((dest_url.to_string(), start));
            }
            Event::End(TagEnd::Link | TagEnd::Image) => {
                // a link or image without text still counts as content
                if let Some((dest, start)) = open_targets.pop()
                    && let Some((buffer, _)) = open_entry.as_mut()
                    && buffer[start..].trim().is_empty()
                {
                    buffer.push_str(&dest);
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if let Some((buffer, _)) = open_entry.as_mut() {
                    buffer.push_str(&text);
                }
            }
            Event::SoftBreak | Event::HardBreak => {
                if let Some((buffer, _)) = open_entry.as_mut() {
                    buffer.push(' ');
                }
            }
            _ => {}
        }
    }

    let mut changelog = builder.finish();
    changelog.definitions = definitions;

    debug!(
        path = %document.path.display(),
        releases = changelog.versions.len(),
        definitions = changelog.definitions.len(),
        "parsed changelog structure"
    );

    changelog
}
