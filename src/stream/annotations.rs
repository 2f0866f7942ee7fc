//! Annotation substitution
//!
//! Assistant text references files with literal markers such as
//! `sandbox:/mnt/data/plot.png` or `【4:0†source】`. Each marker is replaced
//! with the relay link of the referenced file. Text that is already part of
//! a relay link is never rewritten, so applying the same annotations again
//! leaves the text unchanged.

use crate::routes::file_link;
use crate::types::Annotation;

/// Marker text and the file it resolves to.
fn marker_and_file(annotation: &Annotation) -> Option<(&str, &str)> {
    match annotation {
        Annotation::FilePath {
            text, file_path, ..
        } => Some((text.as_str(), file_path.file_id.as_str())),
        Annotation::FileCitation {
            text,
            file_citation,
            ..
        } => Some((text.as_str(), file_citation.file_id.as_str())),
        Annotation::Other => None,
    }
}

/// Replace every annotation marker in `text` with its file link.
pub fn resolve_annotations(text: &str, annotations: &[Annotation]) -> String {
    let replacements: Vec<(&str, String)> = annotations
        .iter()
        .filter_map(marker_and_file)
        .filter(|(marker, file_id)| !marker.is_empty() && !file_id.is_empty())
        .map(|(marker, file_id)| (marker, file_link(file_id)))
        .collect();
    let links: Vec<&str> = replacements.iter().map(|(_, link)| link.as_str()).collect();

    let mut out = text.to_string();
    for (marker, link) in &replacements {
        out = replace_outside_links(&out, marker, link, &links);
    }
    out
}

fn replace_outside_links(text: &str, marker: &str, link: &str, links: &[&str]) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some((pos, found)) = next_link(rest, links) {
        out.push_str(&rest[..pos].replace(marker, link));
        out.push_str(found);
        rest = &rest[pos + found.len()..];
    }
    out.push_str(&rest.replace(marker, link));
    out
}

/// Leftmost link occurrence; the longest link wins on ties.
fn next_link<'a>(text: &str, links: &[&'a str]) -> Option<(usize, &'a str)> {
    links
        .iter()
        .filter_map(|link| text.find(link).map(|pos| (pos, *link)))
        .min_by_key(|(pos, link)| (*pos, std::cmp::Reverse(link.len())))
}
