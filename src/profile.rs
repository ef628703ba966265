use std::fmt;

use base64::{engine::general_purpose, Engine};
use url::Url;

use crate::{MatchdeckError, Result};

const LOG_PREFIX: &str = "[profile]";

/// Rendered in place of a missing or unreadable photo.
pub const PLACEHOLDER_PHOTO_URL: &str =
    "https://via.placeholder.com/450x600?text=No+Photo";

/// Mime type used when the image format can't be recognized.
pub const UNKNOWN_IMAGE_MIME: &str = "image/*";

const DATA_URI_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64";

pub type ProfileId = i64;

/// A candidate shown in the deck. Read-only on the client side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: ProfileId,
    pub username: String,
    pub fullname: String,
    pub photo: Option<PhotoRef>,
}

impl Profile {
    pub fn new(
        id: ProfileId,
        username: impl Into<String>,
        fullname: impl Into<String>,
        photo: Option<PhotoRef>,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            fullname: fullname.into(),
            photo,
        }
    }

    /// Image source for rendering, the placeholder when there is no photo.
    pub fn photo_src(&self) -> String {
        match &self.photo {
            Some(photo) => photo.to_src(),
            None => PLACEHOLDER_PHOTO_URL.to_owned(),
        }
    }
}

/// Photo payload resolved once, when a record enters the client.
///
/// The backend sends one string that is either an absolute URL, a data
/// URI, or bare base64 bytes; [`PhotoRef::parse`] decides which.
#[derive(Clone, PartialEq, Eq)]
pub enum PhotoRef {
    Url(Url),
    InlineBase64 { bytes: Vec<u8>, mime: String },
    /// Data URI with a textual payload, e.g. `data:image/svg+xml,<svg ..>`;
    /// kept verbatim.
    DataUri(String),
}

impl PhotoRef {
    /// Resolve a raw payload. Empty input gives `Ok(None)`.
    pub fn parse(raw: &str) -> Result<Option<Self>> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }

        if raw.starts_with("http") {
            match Url::parse(raw) {
                Ok(url) => return Ok(Some(PhotoRef::Url(url))),
                // base64 text can start with "http" as well
                Err(e) => match decode_base64(raw) {
                    Ok(bytes) => return Ok(Some(PhotoRef::inline(bytes))),
                    Err(_) => return Err(e.into()),
                },
            }
        }

        if let Some(rest) = raw.strip_prefix(DATA_URI_PREFIX) {
            let (header, payload) = rest.split_once(',').ok_or_else(|| {
                MatchdeckError::Photo("data uri without payload".to_owned())
            })?;
            if payload.is_empty() {
                return Err(MatchdeckError::Photo("empty image payload".to_owned()));
            }
            let Some(mime) = header.strip_suffix(BASE64_MARKER) else {
                return Ok(Some(PhotoRef::DataUri(raw.to_owned())));
            };
            let bytes = decode_base64(payload)?;
            let mime = if mime.is_empty() {
                sniff_mime(&bytes).to_owned()
            } else {
                mime.to_owned()
            };
            return Ok(Some(PhotoRef::InlineBase64 { bytes, mime }));
        }

        let bytes = decode_base64(raw)?;
        Ok(Some(PhotoRef::inline(bytes)))
    }

    fn inline(bytes: Vec<u8>) -> Self {
        let mime = sniff_mime(&bytes).to_owned();
        PhotoRef::InlineBase64 { bytes, mime }
    }

    /// Like [`PhotoRef::parse`], but a malformed payload degrades to
    /// `None` so the placeholder gets rendered.
    pub fn resolve(raw: Option<&str>) -> Option<Self> {
        let raw = raw?;
        match Self::parse(raw) {
            Ok(photo) => photo,
            Err(e) => {
                log::warn!("{} unreadable photo payload: {}", LOG_PREFIX, e);
                None
            }
        }
    }

    /// Value usable as an image `src`.
    pub fn to_src(&self) -> String {
        match self {
            PhotoRef::Url(url) => url.to_string(),
            PhotoRef::InlineBase64 { bytes, mime } => format!(
                "{DATA_URI_PREFIX}{mime}{BASE64_MARKER},{}",
                general_purpose::STANDARD.encode(bytes)
            ),
            PhotoRef::DataUri(uri) => uri.clone(),
        }
    }

    /// Wire form expected by the backend: the URL itself, or bare base64
    /// without a data-URI prefix.
    pub fn to_payload(&self) -> String {
        match self {
            PhotoRef::Url(url) => url.to_string(),
            PhotoRef::InlineBase64 { bytes, .. } => {
                general_purpose::STANDARD.encode(bytes)
            }
            PhotoRef::DataUri(uri) => uri.clone(),
        }
    }
}

impl fmt::Debug for PhotoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoRef::Url(url) => f.debug_tuple("Url").field(&url.as_str()).finish(),
            PhotoRef::InlineBase64 { bytes, mime } => f
                .debug_struct("InlineBase64")
                .field("mime", mime)
                .field("len", &bytes.len())
                .finish(),
            PhotoRef::DataUri(uri) => {
                f.debug_tuple("DataUri").field(&uri.len()).finish()
            }
        }
    }
}

fn decode_base64(payload: &str) -> Result<Vec<u8>> {
    let compact: String = payload
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = general_purpose::STANDARD.decode(compact)?;
    if bytes.is_empty() {
        return Err(MatchdeckError::Photo("empty image payload".to_owned()));
    }
    Ok(bytes)
}

fn sniff_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        "image/png"
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        "image/jpeg"
    } else if bytes.starts_with(b"GIF8") {
        "image/gif"
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP"
    {
        "image/webp"
    } else {
        UNKNOWN_IMAGE_MIME
    }
}
