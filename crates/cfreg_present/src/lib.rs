#![forbid(unsafe_code)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]

//! cfreg presentation: a self-describing JSON document per token.
//!
//! Revealed content is untrusted. It is HTML-escaped before it enters the SVG
//! and JSON-escaped (by `serde_json`) before it enters the document; both
//! layers are then base64 data URIs, so no raw user bytes reach a URI.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use cfreg::{ContentStore, Registry, RegistryError, TokenId, TokenLedger};
use serde::Serialize;
use thiserror::Error;

/// Shown in place of content that has not been revealed yet.
pub const UNREVEALED_PLACEHOLDER: &str = "[ not yet revealed ]";

pub const SVG_LINE_WIDTH: usize = 40;
pub const SVG_MAX_LINES: usize = 16;

#[derive(Debug, Error)]
pub enum PresentError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error("json encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TokenDocument {
    pub name: String,
    pub description: String,
    /// Revealed text, or [`UNREVEALED_PLACEHOLDER`].
    pub content: String,
    /// `data:image/svg+xml;base64,...`
    pub image: String,
    pub attributes: TokenAttributes,
}

/// Registry state of a token, as carried under `attributes`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TokenAttributes {
    pub creator: String,
    pub commitment: String,
    pub revealed: bool,
    /// Only present once revealed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

/// Assemble the document for `id` from the registry's read accessors.
pub fn token_document<S: ContentStore, L: TokenLedger>(
    registry: &Registry<S, L>,
    id: TokenId,
) -> Result<TokenDocument, PresentError> {
    let record = registry.record(id)?;
    let content = registry.content_of(id)?;
    let revealed = record.is_revealed();
    let text = content.map_or_else(
        || UNREVEALED_PLACEHOLDER.to_owned(),
        |bytes| String::from_utf8_lossy(bytes).into_owned(),
    );
    let svg = render_svg(&text, revealed);

    Ok(TokenDocument {
        name: format!("Counterfactual #{id}"),
        description: if revealed {
            "Content committed before it existed, revealed at its predicted location.".to_owned()
        } else {
            "A commitment to content that has not been revealed yet.".to_owned()
        },
        content: text,
        image: format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg)),
        attributes: TokenAttributes {
            creator: record.creator.to_string(),
            commitment: format!("0x{}", hex::encode(record.commitment)),
            revealed,
            location: record.location.map(|l| l.to_string()),
        },
    })
}

pub fn to_json(doc: &TokenDocument) -> Result<String, PresentError> {
    Ok(serde_json::to_string(doc)?)
}

/// `data:application/json;base64,<document>`
pub fn token_uri<S: ContentStore, L: TokenLedger>(
    registry: &Registry<S, L>,
    id: TokenId,
) -> Result<String, PresentError> {
    let json = to_json(&token_document(registry, id)?)?;
    Ok(format!("data:application/json;base64,{}", STANDARD.encode(json)))
}

/// Escape text for an HTML/SVG text node or attribute value.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c if c.is_control() && c != '\n' && c != '\t' => out.push('\u{FFFD}'),
            c => out.push(c),
        }
    }
    out
}

/// Split `text` on newlines and hard-wrap at `width` chars, keeping at most
/// `max_lines`. One trailing newline is ignored. When non-empty text is cut
/// off, the last kept line ends in an ellipsis.
#[must_use]
pub fn wrap_lines(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    let body = text.strip_suffix('\n').unwrap_or(text);
    let mut lines: Vec<String> = Vec::new();
    for raw in body.split('\n') {
        let chars: Vec<char> = raw.chars().collect();
        if chars.is_empty() {
            lines.push(String::new());
        }
        lines.extend(chars.chunks(width.max(1)).map(|c| c.iter().collect::<String>()));
    }
    let dropped_text = lines.iter().skip(max_lines).any(|l| !l.is_empty());
    lines.truncate(max_lines);
    if dropped_text {
        if let Some(last) = lines.last_mut() {
            last.pop();
            last.push('\u{2026}');
        }
    }
    lines
}

#[must_use]
pub fn render_svg(text: &str, revealed: bool) -> String {
    let (fill, style) = if revealed { ("#111", "normal") } else { ("#888", "italic") };
    let mut svg = String::from(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" viewBox=\"0 0 400 400\">\
         <rect width=\"400\" height=\"400\" fill=\"#fafafa\"/>",
    );
    svg.push_str(&format!(
        "<text x=\"20\" y=\"36\" font-family=\"monospace\" font-size=\"14\" fill=\"{fill}\" font-style=\"{style}\">"
    ));
    for (i, line) in wrap_lines(text, SVG_LINE_WIDTH, SVG_MAX_LINES).iter().enumerate() {
        let dy = if i == 0 { 0 } else { 20 };
        svg.push_str(&format!(
            "<tspan x=\"20\" dy=\"{dy}\" xml:space=\"preserve\">{}</tspan>",
            escape_html(line)
        ));
    }
    svg.push_str("</text></svg>");
    svg
}
