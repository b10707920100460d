//! Inbound image payload decoding
//!
//! Clients send page images either as a data URI
//! (`data:image/png;base64,iVBOR...`) or as bare base64. The OCR provider
//! wants only the encoded content, so the header is split off here.
//! Nothing is validated locally: malformed base64 is forwarded as-is and the
//! provider rejects it.

/// Encoded image content for a single request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    /// Base64 content with any data-URI header removed
    pub encoded: String,
    /// Media type from the data-URI header, if present
    pub media_type: Option<String>,
}

impl ImagePayload {
    /// Approximate decoded size in bytes, for diagnostics
    pub fn decoded_len_estimate(&self) -> usize {
        base64::decoded_len_estimate(self.encoded.len())
    }
}

/// Split an inbound payload into encoded content and media-type hint.
///
/// Everything after the first comma is the content; without a comma the
/// whole input is.
pub fn decode(payload: &str) -> ImagePayload {
    match payload.split_once(',') {
        Some((header, content)) => ImagePayload {
            encoded: content.to_string(),
            media_type: media_type_from_header(header),
        },
        None => ImagePayload {
            encoded: payload.to_string(),
            media_type: None,
        },
    }
}

/// `data:image/png;base64` -> `image/png`
fn media_type_from_header(header: &str) -> Option<String> {
    let rest = header.strip_prefix("data:")?;
    let mime = rest.split(';').next().unwrap_or_default().trim();
    if mime.is_empty() {
        None
    } else {
        Some(mime.to_string())
    }
}
