//! Text resource handles.
//!
//! Bytes are decoded incrementally as they are read, so a handle never
//! needs the whole file in memory unless the caller asks for it.
//!
//! ```text
//! File ──► BufReader ──► Decoder ──► newline policy ──► decoded buffer
//!                        (encoding)  (translate \r\n, \r)   │
//!                                                           ├─► read_line
//!                                                           └─► read_to_string
//! ```

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use encoding_rs::{mem, CoderResult, Decoder, DecoderResult};

use super::encoding::{Codec, TextEncoding};
use super::{ErrorPolicy, Newline};
use crate::error::{Error, Result};
use crate::resource::ResolvedPath;

/// An open resource decoded as text.
///
/// Owns the [`ResolvedPath`] it was opened from, so an archive extraction
/// stays on disk until the handle is dropped.
pub struct TextFile {
    reader: BufReader<File>,
    resolved: ResolvedPath,
    decoder: ChunkDecoder,
    encoding: TextEncoding,
    newline: Newline,
    errors: ErrorPolicy,
    /// Decoded text not yet handed out.
    decoded: String,
    /// A `\r` ended the previous chunk; universal mode only.
    pending_cr: bool,
    /// Bytes consumed from the file so far.
    offset: u64,
    eof: bool,
}

impl TextFile {
    pub(crate) fn new(
        file: File,
        resolved: ResolvedPath,
        encoding: TextEncoding,
        newline: Newline,
        errors: ErrorPolicy,
        capacity: Option<usize>,
    ) -> Self {
        let reader = match capacity {
            Some(capacity) => BufReader::with_capacity(capacity, file),
            None => BufReader::new(file),
        };
        let decoder = match (encoding.decoder(), encoding.codec) {
            (Some(decoder), _) => ChunkDecoder::Whatwg(decoder),
            (None, Codec::Ascii) => ChunkDecoder::Ascii,
            (None, _) => ChunkDecoder::Latin1,
        };

        Self {
            reader,
            resolved,
            decoder,
            encoding,
            newline,
            errors,
            decoded: String::new(),
            pending_cr: false,
            offset: 0,
            eof: false,
        }
    }

    /// Path of the opened file.
    pub fn path(&self) -> &Path {
        self.resolved.path()
    }

    /// Canonical name of the encoding in use.
    ///
    /// For `utf-16` this reflects the byte order picked from the BOM once
    /// the first chunk has been decoded.
    pub fn encoding(&self) -> &'static str {
        match &self.decoder {
            ChunkDecoder::Whatwg(decoder) => decoder.encoding().name(),
            _ => self.encoding.name(),
        }
    }

    /// The newline policy in use.
    pub fn newline(&self) -> Newline {
        self.newline
    }

    /// Read and return all remaining text.
    pub fn read_to_string(&mut self) -> Result<String> {
        while self.fill()? {}
        Ok(std::mem::take(&mut self.decoded))
    }

    /// Read the next line, terminator included.
    ///
    /// Returns `None` at end of file. The last line may lack a terminator.
    pub fn read_line(&mut self) -> Result<Option<String>> {
        loop {
            if let Some(end) = self.line_end() {
                return Ok(Some(self.decoded.drain(..end).collect()));
            }
            if !self.fill()? {
                return Ok((!self.decoded.is_empty()).then(|| std::mem::take(&mut self.decoded)));
            }
        }
    }

    /// Iterate over the remaining lines.
    pub fn lines(&mut self) -> Lines<'_> {
        Lines { file: self }
    }

    /// Close the file, keeping the resolved path.
    pub fn into_resolved(self) -> ResolvedPath {
        self.resolved
    }

    /// End index (exclusive) of the first complete line in `decoded`.
    fn line_end(&self) -> Option<usize> {
        let text = self.decoded.as_str();
        match self.newline {
            Newline::Universal | Newline::Lf => text.find('\n').map(|i| i + 1),
            Newline::Cr => text.find('\r').map(|i| i + 1),
            Newline::CrLf => text.find("\r\n").map(|i| i + 2),
            Newline::Untranslated => {
                let i = text.find(['\n', '\r'])?;
                if text.as_bytes()[i] == b'\n' {
                    return Some(i + 1);
                }
                match text.as_bytes().get(i + 1) {
                    Some(b'\n') => Some(i + 2),
                    Some(_) => Some(i + 1),
                    // a `\n` may still follow in the next chunk
                    None if self.eof => Some(i + 1),
                    None => None,
                }
            }
        }
    }

    /// Decode the next chunk into `decoded`.
    ///
    /// Returns `false` once end of file was already reached.
    fn fill(&mut self) -> Result<bool> {
        if self.eof {
            return Ok(false);
        }

        let chunk = self
            .reader
            .fill_buf()
            .map_err(|e| Error::io(self.resolved.path(), e))?;
        let read = chunk.len();
        let last = read == 0;

        let mut text = String::new();
        let decoded = match &mut self.decoder {
            ChunkDecoder::Whatwg(decoder) => decode_chunk(decoder, self.errors, chunk, last, &mut text),
            ChunkDecoder::Latin1 => {
                text.push_str(&mem::decode_latin1(chunk));
                Ok(())
            }
            ChunkDecoder::Ascii => decode_ascii(self.errors, chunk, &mut text),
        };
        self.reader.consume(read);

        if let Err((end, bad)) = decoded {
            self.eof = true;
            return Err(Error::Decode {
                path: self.resolved.path().to_path_buf(),
                encoding: self.encoding(),
                offset: (self.offset + end as u64).saturating_sub(u64::from(bad)),
            });
        }
        self.offset += read as u64;
        self.eof = last;
        self.push_text(&text);
        Ok(true)
    }

    /// Append decoded text, applying newline translation.
    fn push_text(&mut self, text: &str) {
        if self.newline != Newline::Universal {
            self.decoded.push_str(text);
            return;
        }
        if text.is_empty() && !self.eof {
            return;
        }

        let mut text = text;
        if self.pending_cr {
            self.pending_cr = false;
            self.decoded.push('\n');
            text = text.strip_prefix('\n').unwrap_or(text);
        }

        let body = match text.strip_suffix('\r') {
            Some(body) if !self.eof => {
                self.pending_cr = true;
                body
            }
            _ => text,
        };
        if body.contains('\r') {
            self.decoded.push_str(&body.replace("\r\n", "\n").replace('\r', "\n"));
        } else {
            self.decoded.push_str(body);
        }
    }
}

/// Decoding state of a [`TextFile`].
enum ChunkDecoder {
    Whatwg(Decoder),
    Latin1,
    Ascii,
}

/// Decode `src` into `dst`.
///
/// On malformed input (strict policy) returns the offset just past the bad
/// sequence within `src` and the length of that sequence, which may have
/// started in an earlier chunk.
fn decode_chunk(
    decoder: &mut Decoder,
    errors: ErrorPolicy,
    src: &[u8],
    last: bool,
    dst: &mut String,
) -> std::result::Result<(), (usize, u8)> {
    let mut consumed = 0;
    loop {
        let remaining = &src[consumed..];
        match errors {
            ErrorPolicy::Strict | ErrorPolicy::Ignore => {
                let needed = decoder
                    .max_utf8_buffer_length_without_replacement(remaining.len())
                    .unwrap_or(remaining.len());
                dst.reserve(needed);
                let (result, read) =
                    decoder.decode_to_string_without_replacement(remaining, dst, last);
                consumed += read;
                match result {
                    DecoderResult::InputEmpty => return Ok(()),
                    DecoderResult::OutputFull => {}
                    DecoderResult::Malformed(_, _) if errors == ErrorPolicy::Ignore => {}
                    DecoderResult::Malformed(bad, after) => {
                        return Err((consumed - usize::from(after), bad));
                    }
                }
            }
            ErrorPolicy::Replace => {
                let needed = decoder
                    .max_utf8_buffer_length(remaining.len())
                    .unwrap_or(remaining.len());
                dst.reserve(needed);
                let (result, read, _) = decoder.decode_to_string(remaining, dst, last);
                consumed += read;
                if result == CoderResult::InputEmpty {
                    return Ok(());
                }
            }
        }
    }
}

/// Decode 7-bit ASCII from `src` into `dst`.
///
/// Each byte above `0x7F` is one malformed sequence; errors are reported
/// like [`decode_chunk`] does.
fn decode_ascii(
    errors: ErrorPolicy,
    src: &[u8],
    dst: &mut String,
) -> std::result::Result<(), (usize, u8)> {
    let mut rest = src;
    loop {
        let valid = encoding_rs::Encoding::ascii_valid_up_to(rest);
        dst.push_str(&mem::decode_latin1(&rest[..valid]));
        if valid == rest.len() {
            return Ok(());
        }
        match errors {
            ErrorPolicy::Strict => return Err((src.len() - rest.len() + valid + 1, 1)),
            ErrorPolicy::Replace => dst.push('\u{FFFD}'),
            ErrorPolicy::Ignore => {}
        }
        rest = &rest[valid + 1..];
    }
}

impl fmt::Debug for TextFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextFile")
            .field("path", &self.resolved.path())
            .field("encoding", &self.encoding())
            .field("newline", &self.newline)
            .field("errors", &self.errors)
            .field("offset", &self.offset)
            .finish()
    }
}

/// Iterator over the lines of a [`TextFile`].
pub struct Lines<'a> {
    file: &'a mut TextFile,
}

impl Iterator for Lines<'_> {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        self.file.read_line().transpose()
    }
}
