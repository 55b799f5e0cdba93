//! Encoding label lookup.

use encoding_rs::{Decoder, Encoding, UTF_16LE, UTF_8};

use crate::error::{Error, Result};

/// What a label decodes with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Codec {
    /// A WHATWG encoding, decoded by `encoding_rs`.
    Whatwg(&'static Encoding),
    /// ISO-8859-1: byte `N` is `U+00NN`.
    Latin1,
    /// 7-bit ASCII; any byte above `0x7F` is malformed.
    Ascii,
}

/// How a leading byte order mark is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Bom {
    /// Decode it like any other character.
    Keep,
    /// Drop a UTF-8 BOM (`utf-8-sig`).
    Strip,
    /// Pick the byte order from the BOM and drop it (`utf-16`).
    Sniff,
}

/// A text encoding as used by text handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEncoding {
    pub(crate) codec: Codec,
    pub(crate) bom: Bom,
}

impl TextEncoding {
    const fn plain(codec: Codec) -> Self {
        Self {
            codec,
            bom: Bom::Keep,
        }
    }

    /// Canonical name of the encoding.
    pub fn name(&self) -> &'static str {
        match self.codec {
            Codec::Whatwg(encoding) => encoding.name(),
            Codec::Latin1 => "ISO-8859-1",
            Codec::Ascii => "ASCII",
        }
    }

    /// A fresh `encoding_rs` decoder, or `None` for the byte-wise codecs.
    pub(crate) fn decoder(&self) -> Option<Decoder> {
        let Codec::Whatwg(encoding) = self.codec else {
            return None;
        };
        Some(match self.bom {
            Bom::Keep => encoding.new_decoder_without_bom_handling(),
            Bom::Strip => encoding.new_decoder_with_bom_removal(),
            Bom::Sniff => encoding.new_decoder(),
        })
    }
}

/// Look up an encoding by label.
///
/// WHATWG labels (`utf-8`, `utf-16le`, `shift_jis`, `windows-1252`, ...)
/// are accepted, plus the common spellings `utf_8`, `utf8` and `utf-8-sig`.
/// `latin-1`/`iso-8859-1` decode every byte to the code point of the same
/// value, `ascii` rejects bytes above `0x7F`, and a bare `utf-16` reads the
/// byte order from the BOM (little-endian without one).
pub fn lookup_encoding(label: &str) -> Result<TextEncoding> {
    let lowered = label.trim().to_ascii_lowercase();
    let normalized = lowered.replace('_', "-");

    let encoding = match normalized.as_str() {
        "utf-8-sig" | "utf8-sig" => TextEncoding {
            codec: Codec::Whatwg(UTF_8),
            bom: Bom::Strip,
        },
        "utf-16" | "utf16" => TextEncoding {
            codec: Codec::Whatwg(UTF_16LE),
            bom: Bom::Sniff,
        },
        "latin-1" | "latin1" | "latin" | "l1" | "iso-8859-1" | "iso8859-1" | "8859" | "cp819" => {
            TextEncoding::plain(Codec::Latin1)
        }
        "ascii" | "us-ascii" | "646" => TextEncoding::plain(Codec::Ascii),
        _ => Encoding::for_label(lowered.as_bytes())
            .or_else(|| Encoding::for_label(normalized.as_bytes()))
            .map(|encoding| TextEncoding::plain(Codec::Whatwg(encoding)))
            .ok_or_else(|| Error::UnknownEncoding(label.to_string()))?,
    };
    Ok(encoding)
}
