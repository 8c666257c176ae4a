//! Input and output encodings for digest data.
//!
//! Data fed into an engine is either raw bytes or text in a named
//! encoding; digests come back out as raw bytes or as hex/base64 text:
//!
//! - [`Input`] - a borrowed update payload (bytes, or text + encoding)
//! - [`TextEncoding`] - how text input decodes to bytes
//! - [`OutputEncoding`] - how digest bytes are presented
//! - [`DigestOutput`] - the result of an encoded digest

use bytes::Bytes;

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};

use crate::error::DigestError;

/// A text encoding for string input.
///
/// Text payloads are decoded to bytes before they reach the digest
/// context. Decoding for `Hex`, `Base64`, and `Base64Url` is strict:
/// malformed text fails the update instead of being silently truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    /// UTF-8 (the default for bare string input).
    Utf8,
    /// ASCII; treated as Latin-1 for decoding (each UTF-16 code unit
    /// masked to its low byte).
    Ascii,
    /// Latin-1 / ISO-8859-1 (alias: "binary").
    Latin1,
    /// Hexadecimal text.
    Hex,
    /// Standard base64 with padding.
    Base64,
    /// URL-safe base64 without padding.
    Base64Url,
    /// UTF-16 little-endian (aliases: "ucs2", "utf-16le").
    Utf16Le,
}

impl TextEncoding {
    /// Resolves an encoding name, case-insensitively.
    ///
    /// Accepts the common alias spellings ("utf-8", "binary", "ucs2",
    /// "utf-16le"). Unknown names return `None`.
    ///
    /// # Example
    ///
    /// ```
    /// use digestrs::TextEncoding;
    ///
    /// assert_eq!(TextEncoding::for_name("UTF-8"), Some(TextEncoding::Utf8));
    /// assert_eq!(TextEncoding::for_name("binary"), Some(TextEncoding::Latin1));
    /// assert_eq!(TextEncoding::for_name("koi8-r"), None);
    /// ```
    pub fn for_name(name: &str) -> Option<Self> {
        let lowered = name.to_ascii_lowercase();
        match lowered.as_str() {
            "utf8" | "utf-8" => Some(TextEncoding::Utf8),
            "ascii" => Some(TextEncoding::Ascii),
            "latin1" | "binary" => Some(TextEncoding::Latin1),
            "hex" => Some(TextEncoding::Hex),
            "base64" => Some(TextEncoding::Base64),
            "base64url" => Some(TextEncoding::Base64Url),
            "utf16le" | "utf-16le" | "ucs2" | "ucs-2" => Some(TextEncoding::Utf16Le),
            _ => None,
        }
    }

    /// Decodes `text` to bytes under this encoding.
    pub(crate) fn decode(self, text: &str) -> Result<Bytes, DigestError> {
        match self {
            TextEncoding::Utf8 => Ok(Bytes::copy_from_slice(text.as_bytes())),
            TextEncoding::Ascii | TextEncoding::Latin1 => {
                let bytes: Vec<u8> = text.encode_utf16().map(|unit| (unit & 0xff) as u8).collect();
                Ok(Bytes::from(bytes))
            }
            TextEncoding::Hex => hex::decode(text)
                .map(Bytes::from)
                .map_err(|_| DigestError::UpdateFailed),
            TextEncoding::Base64 => STANDARD
                .decode(text)
                .map(Bytes::from)
                .map_err(|_| DigestError::UpdateFailed),
            TextEncoding::Base64Url => URL_SAFE_NO_PAD
                .decode(text)
                .map(Bytes::from)
                .map_err(|_| DigestError::UpdateFailed),
            TextEncoding::Utf16Le => {
                let mut bytes = Vec::with_capacity(text.len() * 2);
                for unit in text.encode_utf16() {
                    bytes.extend_from_slice(&unit.to_le_bytes());
                }
                Ok(Bytes::from(bytes))
            }
        }
    }
}

/// How digest bytes are presented to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OutputEncoding {
    /// Raw bytes (the default).
    #[default]
    Buffer,
    /// Lowercase hexadecimal text.
    Hex,
    /// Standard base64 with padding.
    Base64,
    /// URL-safe base64 without padding.
    Base64Url,
}

impl OutputEncoding {
    /// Resolves an output encoding name.
    ///
    /// An absent or empty name means raw bytes; a non-empty name that
    /// is not a recognized output encoding is rejected.
    ///
    /// # Example
    ///
    /// ```
    /// use digestrs::OutputEncoding;
    ///
    /// assert_eq!(OutputEncoding::for_name(None).unwrap(), OutputEncoding::Buffer);
    /// assert_eq!(OutputEncoding::for_name(Some("hex")).unwrap(), OutputEncoding::Hex);
    /// assert!(OutputEncoding::for_name(Some("rot13")).is_err());
    /// ```
    pub fn for_name(name: Option<&str>) -> Result<Self, DigestError> {
        let name = match name {
            None | Some("") => return Ok(OutputEncoding::Buffer),
            Some(name) => name,
        };
        match name.to_ascii_lowercase().as_str() {
            "buffer" => Ok(OutputEncoding::Buffer),
            "hex" => Ok(OutputEncoding::Hex),
            "base64" => Ok(OutputEncoding::Base64),
            "base64url" => Ok(OutputEncoding::Base64Url),
            _ => Err(DigestError::InvalidArgument {
                message: "unrecognized output encoding",
            }),
        }
    }

    /// Transforms digest bytes into the requested presentation.
    pub(crate) fn encode(self, bytes: Bytes) -> DigestOutput {
        match self {
            OutputEncoding::Buffer => DigestOutput::Bytes(bytes),
            OutputEncoding::Hex => DigestOutput::Text(hex::encode(&bytes)),
            OutputEncoding::Base64 => DigestOutput::Text(STANDARD.encode(&bytes)),
            OutputEncoding::Base64Url => DigestOutput::Text(URL_SAFE_NO_PAD.encode(&bytes)),
        }
    }
}

/// The result of an encoded digest: raw bytes or encoded text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DigestOutput {
    /// Raw digest bytes.
    Bytes(Bytes),
    /// Text in the requested output encoding.
    Text(String),
}

impl DigestOutput {
    /// Returns the text form, if this output is text.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            DigestOutput::Text(text) => Some(text),
            DigestOutput::Bytes(_) => None,
        }
    }

    /// Consumes the output and returns its byte representation.
    ///
    /// Text outputs yield the bytes of the encoded string.
    pub fn into_bytes(self) -> Bytes {
        match self {
            DigestOutput::Bytes(bytes) => bytes,
            DigestOutput::Text(text) => Bytes::from(text.into_bytes()),
        }
    }
}

/// A borrowed update payload: raw bytes, or text with an encoding.
///
/// `update` and friends accept `impl Into<Input>` so that byte slices
/// and strings work directly:
///
/// ```
/// use digestrs::{Hasher, Input, TextEncoding};
///
/// let mut hasher = Hasher::new("sha256")?;
/// hasher.update(&b"raw bytes"[..])?;
/// hasher.update("utf-8 text")?;
/// hasher.update(Input::Text("deadbeef", TextEncoding::Hex))?;
/// # Ok::<(), digestrs::DigestError>(())
/// ```
#[derive(Debug, Clone, Copy)]
pub enum Input<'a> {
    /// A raw byte payload.
    Bytes(&'a [u8]),
    /// A text payload and the encoding used to decode it.
    Text(&'a str, TextEncoding),
}

impl Input<'_> {
    /// Decodes the payload to owned bytes.
    pub(crate) fn into_bytes(self) -> Result<Bytes, DigestError> {
        match self {
            Input::Bytes(bytes) => Ok(Bytes::copy_from_slice(bytes)),
            Input::Text(text, encoding) => encoding.decode(text),
        }
    }
}

impl<'a> From<&'a [u8]> for Input<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Input::Bytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Input<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Input::Bytes(bytes)
    }
}

impl<'a> From<&'a Bytes> for Input<'a> {
    fn from(bytes: &'a Bytes) -> Self {
        Input::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for Input<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Input::Bytes(bytes)
    }
}

impl<'a> From<&'a str> for Input<'a> {
    fn from(text: &'a str) -> Self {
        Input::Text(text, TextEncoding::Utf8)
    }
}
