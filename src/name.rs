/// ENS name handling
///
/// Splits dotted names into leaf and root identifiers, and converts between
/// dotted names and the DNS wire format used by `resolve(bytes,bytes)`.
use thiserror::Error;

/// Name parsing failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Name has fewer than two dot-separated labels
    #[error("name must have at least two labels")]
    TooFewLabels,

    /// Name contained bytes that were not valid UTF-8
    #[error("name is not valid UTF-8")]
    InvalidEncoding,

    /// DNS wire-format name is truncated or has bytes after its terminator
    #[error("malformed DNS wire name: {0}")]
    MalformedWireName(String),
}

/// A name split into its leaf and root identifiers
///
/// `sarah.joescoffee.eth` has leaf `sarah` and root `joescoffee.eth`.
/// A two-label name such as `test.eth` has an empty leaf and is its own root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedName {
    pub leaf: String,
    pub root: String,
}

/// Parse a dotted name into leaf and root identifiers
///
/// Names carrying U+FFFD (bytes that were not UTF-8 on the wire) are rejected.
pub fn parse(name: &str) -> Result<ParsedName, ParseError> {
    if name.contains(char::REPLACEMENT_CHARACTER) {
        return Err(ParseError::InvalidEncoding);
    }

    let labels: Vec<&str> = name.split('.').collect();

    match labels.as_slice() {
        [] | [_] => Err(ParseError::TooFewLabels),
        [_, _] => Ok(ParsedName {
            leaf: String::new(),
            root: name.to_string(),
        }),
        [leaf, rest @ ..] => Ok(ParsedName {
            leaf: (*leaf).to_string(),
            root: rest.join("."),
        }),
    }
}

/// Decode a DNS wire-format name (length-prefixed labels, zero terminated)
/// into its dotted form
///
/// Only structural damage is an error. Label bytes that are not UTF-8 become
/// U+FFFD, which [`parse`] then refuses.
pub fn decode_dns_name(wire: &[u8]) -> Result<String, ParseError> {
    let mut labels: Vec<String> = Vec::new();
    let mut offset = 0usize;

    loop {
        let len = *wire
            .get(offset)
            .ok_or_else(|| ParseError::MalformedWireName("missing terminating label".into()))?
            as usize;
        offset += 1;

        if len == 0 {
            break;
        }

        let label = wire.get(offset..offset + len).ok_or_else(|| {
            ParseError::MalformedWireName(format!(
                "label of length {} overruns name at offset {}",
                len, offset
            ))
        })?;
        labels.push(String::from_utf8_lossy(label).into_owned());
        offset += len;
    }

    if offset != wire.len() {
        return Err(ParseError::MalformedWireName(format!(
            "{} trailing bytes after the terminating label",
            wire.len() - offset
        )));
    }

    Ok(labels.join("."))
}

/// Encode a dotted name into DNS wire format
pub fn encode_dns_name(name: &str) -> Result<Vec<u8>, ParseError> {
    let mut wire = Vec::with_capacity(name.len() + 2);

    if !name.is_empty() {
        for label in name.split('.') {
            let len = u8::try_from(label.len()).map_err(|_| {
                ParseError::MalformedWireName(format!("label '{}' exceeds 255 bytes", label))
            })?;
            wire.push(len);
            wire.extend_from_slice(label.as_bytes());
        }
    }

    wire.push(0);
    Ok(wire)
}
