//! Strips comments/whitespace and classifies each remaining line as an
//! A-, C-, or L-instruction, mirroring the three-way split the original
//! line-oriented parser makes before any table lookups happen.

use crate::error::{Error, Result};

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Line {
    /// `@symbol` or `@123`.
    Address(String),
    /// `(LABEL)`.
    Label(String),
    /// `dest=comp;jump`, with `dest=` and `;jump` both optional.
    Compute {
        dest: Option<String>,
        comp: String,
        jump: Option<String>,
    },
}

/// Strips `//` comments and surrounding whitespace from every line, drops
/// blank lines, and keeps a 1-based source line number alongside each
/// survivor for error reporting.
pub fn preprocess<I, S>(lines: I) -> Vec<(usize, String)>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .enumerate()
        .filter_map(|(i, raw)| {
            let raw = raw.as_ref();
            let without_comment = match raw.find("//") {
                Some(idx) => &raw[..idx],
                None => raw,
            };
            let trimmed = without_comment.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some((i + 1, trimmed.to_string()))
            }
        })
        .collect()
}

pub fn classify(line_no: usize, text: &str) -> Result<Line> {
    if let Some(symbol) = text.strip_prefix('@') {
        if symbol.is_empty() {
            return Err(Error::MalformedAddress {
                line: line_no,
                text: text.to_string(),
            });
        }
        return Ok(Line::Address(symbol.to_string()));
    }

    if text.starts_with('(') {
        let label = text
            .strip_prefix('(')
            .and_then(|s| s.strip_suffix(')'))
            .ok_or_else(|| Error::MalformedInstruction {
                line: line_no,
                text: text.to_string(),
            })?;
        return Ok(Line::Label(label.to_string()));
    }

    let (body, jump) = match text.find(';') {
        Some(idx) => (&text[..idx], Some(text[idx + 1..].trim().to_string())),
        None => (text, None),
    };
    let (dest, comp) = match body.find('=') {
        Some(idx) => (
            Some(body[..idx].trim().to_string()),
            body[idx + 1..].trim().to_string(),
        ),
        None => (None, body.trim().to_string()),
    };

    if comp.is_empty() {
        return Err(Error::MalformedInstruction {
            line: line_no,
            text: text.to_string(),
        });
    }

    Ok(Line::Compute { dest, comp, jump })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preprocess_strips_comments_and_blanks() {
        let lines = vec!["@2 // load 2", "", "   ", "D=A"];
        let out = preprocess(lines);
        assert_eq!(out, vec![(1, "@2".to_string()), (4, "D=A".to_string())]);
    }

    #[test]
    fn classifies_all_three_forms() {
        assert_eq!(classify(1, "@17").unwrap(), Line::Address("17".into()));
        assert_eq!(classify(1, "(LOOP)").unwrap(), Line::Label("LOOP".into()));
        assert_eq!(
            classify(1, "D=D+A;JGT").unwrap(),
            Line::Compute {
                dest: Some("D".into()),
                comp: "D+A".into(),
                jump: Some("JGT".into()),
            }
        );
        assert_eq!(
            classify(1, "0;JMP").unwrap(),
            Line::Compute {
                dest: None,
                comp: "0".into(),
                jump: Some("JMP".into()),
            }
        );
    }
}
