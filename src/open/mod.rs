//! Open configuration and opened resources.
//!
//! [`OpenOptions`] says *how* to open a resolved resource: text or binary,
//! which encoding, which newline policy, and whether the caller wants a
//! handle at all or only the path.

mod binary;
mod encoding;
mod text;

pub use binary::BinaryFile;
pub use encoding::{lookup_encoding, TextEncoding};
pub use text::{Lines, TextFile};

use std::fmt;
use std::fs::File;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::resource::ResolvedPath;

/// Encoding used in text mode when none is given.
pub const DEFAULT_ENCODING: &str = "utf-8";

// =============================================================================
// Option Values
// =============================================================================

/// Text or binary reading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Decode bytes into text.
    #[default]
    Text,
    /// Raw bytes.
    Binary,
}

impl FromStr for Mode {
    type Err = Error;

    /// Accepts `r`, `rt`, `t`, `text`, `rb`, `b`, `binary`.
    ///
    /// Anything that writes is refused: resources are read-only.
    fn from_str(s: &str) -> Result<Self> {
        match s {
            "r" | "rt" | "tr" | "t" | "text" => Ok(Self::Text),
            "rb" | "br" | "b" | "binary" => Ok(Self::Binary),
            other => Err(Error::InvalidOptions(format!(
                "unsupported mode `{other}`; resources open read-only as text or binary"
            ))),
        }
    }
}

/// How line endings are handled in text mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Newline {
    /// Lines end at `\n`, `\r\n` or `\r`; all are translated to `\n`.
    #[default]
    Universal,
    /// Lines end at `\n`, `\r\n` or `\r`; endings are kept as-is.
    Untranslated,
    /// Lines end only at `\n`.
    Lf,
    /// Lines end only at `\r`.
    Cr,
    /// Lines end only at `\r\n`.
    CrLf,
}

impl Newline {
    /// Parse an optional policy string: `None` is [`Newline::Universal`].
    pub fn from_policy(policy: Option<&str>) -> Result<Self> {
        policy.map_or(Ok(Self::Universal), str::parse)
    }
}

impl FromStr for Newline {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" => Ok(Self::Untranslated),
            "\n" => Ok(Self::Lf),
            "\r" => Ok(Self::Cr),
            "\r\n" => Ok(Self::CrLf),
            other => Err(Error::InvalidOptions(format!("illegal newline value {other:?}"))),
        }
    }
}

/// What to do with bytes that are invalid in the chosen encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ErrorPolicy {
    /// Fail with [`Error::Decode`].
    #[default]
    Strict,
    /// Substitute U+FFFD.
    Replace,
    /// Drop the malformed bytes.
    Ignore,
}

impl FromStr for ErrorPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "strict" => Ok(Self::Strict),
            "replace" => Ok(Self::Replace),
            "ignore" => Ok(Self::Ignore),
            other => Err(Error::InvalidOptions(format!("unknown error policy `{other}`"))),
        }
    }
}

/// What an open call hands back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Output {
    /// An open, readable handle.
    #[default]
    Handle,
    /// Only the resolved path.
    Path,
}

// =============================================================================
// OpenOptions
// =============================================================================

/// Immutable description of how to open a resource.
///
/// Text-only settings (`encoding`, `newline`, `errors`) are rejected in
/// binary mode when the resource is opened.
///
/// # Example
///
/// ```
/// use file_factory::{Mode, OpenOptions};
///
/// let text = OpenOptions::text().encoding("latin-1").newline(Some("")).unwrap();
/// assert_eq!(text.mode(), Mode::Text);
///
/// let binary = OpenOptions::binary();
/// assert_eq!(binary.encoding_label(), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct OpenOptions {
    mode: Mode,
    encoding: Option<String>,
    newline: Option<Newline>,
    errors: Option<ErrorPolicy>,
    buffer_capacity: Option<usize>,
    output: Output,
}

impl OpenOptions {
    /// Text mode, UTF-8, universal newlines, strict decoding.
    pub fn text() -> Self {
        Self::default()
    }

    /// Binary mode.
    pub fn binary() -> Self {
        Self {
            mode: Mode::Binary,
            ..Self::default()
        }
    }

    /// Only resolve; hand back the path instead of a handle.
    pub fn path_only() -> Self {
        Self {
            output: Output::Path,
            ..Self::default()
        }
    }

    /// The mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Replace the mode.
    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the text encoding label (e.g. `"utf-8"`, `"latin-1"`).
    pub fn encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = Some(label.into());
        self
    }

    /// Set the newline policy from its string form; `None` is universal.
    pub fn newline(mut self, policy: Option<&str>) -> Result<Self> {
        self.newline = Some(Newline::from_policy(policy)?);
        Ok(self)
    }

    /// Set the newline policy.
    pub fn with_newline(mut self, newline: Newline) -> Self {
        self.newline = Some(newline);
        self
    }

    /// Set the decode error policy.
    pub fn errors(mut self, policy: ErrorPolicy) -> Self {
        self.errors = Some(policy);
        self
    }

    /// Set the read buffer capacity.
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = Some(capacity);
        self
    }

    /// Set what an open call returns.
    pub fn output(mut self, output: Output) -> Self {
        self.output = output;
        self
    }

    /// The encoding label, if one was set.
    pub fn encoding_label(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    /// The effective newline policy.
    pub fn newline_policy(&self) -> Newline {
        self.newline.unwrap_or_default()
    }

    /// The effective decode error policy.
    pub fn error_policy(&self) -> ErrorPolicy {
        self.errors.unwrap_or_default()
    }

    /// What an open call returns.
    pub fn output_kind(&self) -> Output {
        self.output
    }

    /// Apply per-call overrides on top of these defaults.
    pub fn merged(&self, overrides: &OpenOverrides) -> Self {
        Self {
            mode: overrides.mode.unwrap_or(self.mode),
            encoding: overrides.encoding.clone().or_else(|| self.encoding.clone()),
            newline: overrides.newline.or(self.newline),
            errors: overrides.errors.or(self.errors),
            buffer_capacity: overrides.buffer_capacity.or(self.buffer_capacity),
            output: overrides.output.unwrap_or(self.output),
        }
    }

    /// Reject text-only settings in binary mode.
    pub fn validate(&self) -> Result<()> {
        if self.mode == Mode::Binary {
            let text_only = [
                ("encoding", self.encoding.is_some()),
                ("newline", self.newline.is_some()),
                ("errors", self.errors.is_some()),
            ];
            if let Some((name, _)) = text_only.iter().find(|(_, set)| *set) {
                return Err(Error::InvalidOptions(format!(
                    "binary mode doesn't take an {name} argument"
                )));
            }
        }
        if self.buffer_capacity == Some(0) {
            return Err(Error::InvalidOptions("buffer capacity must be non-zero".into()));
        }
        Ok(())
    }

    /// Open an already resolved resource under these options.
    ///
    /// The returned value takes ownership of `resolved`, so any temporary
    /// extraction lives exactly as long as the handle.
    pub fn open(&self, resolved: ResolvedPath) -> Result<Opened> {
        self.validate()?;
        if self.output == Output::Path {
            return Ok(Opened::Path(resolved));
        }

        let file = open_file(&resolved)?;
        match self.mode {
            Mode::Binary => Ok(Opened::Binary(BinaryFile::new(
                file,
                resolved,
                self.buffer_capacity,
            ))),
            Mode::Text => self.text_handle(file, resolved).map(Opened::Text),
        }
    }

    /// Open a resolved resource as text, whatever the configured mode
    /// and output.
    pub fn open_text(&self, resolved: ResolvedPath) -> Result<TextFile> {
        let text = Self {
            mode: Mode::Text,
            output: Output::Handle,
            ..self.clone()
        };
        text.validate()?;
        let file = open_file(&resolved)?;
        text.text_handle(file, resolved)
    }

    fn text_handle(&self, file: File, resolved: ResolvedPath) -> Result<TextFile> {
        let label = self.encoding.as_deref().unwrap_or(DEFAULT_ENCODING);
        let encoding = lookup_encoding(label)?;
        Ok(TextFile::new(
            file,
            resolved,
            encoding,
            self.newline_policy(),
            self.error_policy(),
            self.buffer_capacity,
        ))
    }
}

fn open_file(resolved: &ResolvedPath) -> Result<File> {
    if resolved.is_dir() {
        return Err(Error::Open {
            path: resolved.path().to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::IsADirectory, "is a directory"),
        });
    }
    File::open(resolved.path()).map_err(|source| Error::Open {
        path: resolved.path().to_path_buf(),
        source,
    })
}

/// Per-call replacements for [`OpenOptions`] fields; `None` keeps the default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenOverrides {
    /// Replacement mode.
    pub mode: Option<Mode>,
    /// Replacement encoding label.
    pub encoding: Option<String>,
    /// Replacement newline policy.
    pub newline: Option<Newline>,
    /// Replacement decode error policy.
    pub errors: Option<ErrorPolicy>,
    /// Replacement buffer capacity.
    pub buffer_capacity: Option<usize>,
    /// Replacement output kind.
    pub output: Option<Output>,
}

// =============================================================================
// Opened
// =============================================================================

/// The result of opening a resource.
#[derive(Debug)]
pub enum Opened {
    /// Decoding text handle.
    Text(TextFile),
    /// Raw byte handle.
    Binary(BinaryFile),
    /// Just the resolved path.
    Path(ResolvedPath),
}

impl Opened {
    /// The resolved path behind this value.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Text(file) => file.path(),
            Self::Binary(file) => file.path(),
            Self::Path(path) => path.path(),
        }
    }

    /// The text handle, if opened in text mode.
    pub fn into_text(self) -> Option<TextFile> {
        match self {
            Self::Text(file) => Some(file),
            _ => None,
        }
    }

    /// The binary handle, if opened in binary mode.
    pub fn into_binary(self) -> Option<BinaryFile> {
        match self {
            Self::Binary(file) => Some(file),
            _ => None,
        }
    }

    /// The resolved path, releasing any open handle.
    pub fn into_path(self) -> ResolvedPath {
        match self {
            Self::Text(file) => file.into_resolved(),
            Self::Binary(file) => file.into_resolved(),
            Self::Path(path) => path,
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Binary => "binary",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{dir_registry, HELLO};
    use crate::ResourceRef;

    #[test]
    fn test_mode_parse() {
        assert_eq!("r".parse::<Mode>().unwrap(), Mode::Text);
        assert_eq!("rt".parse::<Mode>().unwrap(), Mode::Text);
        assert_eq!("rb".parse::<Mode>().unwrap(), Mode::Binary);
        assert_eq!("binary".parse::<Mode>().unwrap(), Mode::Binary);
        for bad in ["w", "wb", "r+", "a", "x"] {
            assert!(bad.parse::<Mode>().is_err(), "{bad}");
        }
    }

    #[test]
    fn test_newline_parse() {
        assert_eq!(Newline::from_policy(None).unwrap(), Newline::Universal);
        assert_eq!(Newline::from_policy(Some("")).unwrap(), Newline::Untranslated);
        assert_eq!(Newline::from_policy(Some("\n")).unwrap(), Newline::Lf);
        assert_eq!(Newline::from_policy(Some("\r")).unwrap(), Newline::Cr);
        assert_eq!(Newline::from_policy(Some("\r\n")).unwrap(), Newline::CrLf);
        assert!(Newline::from_policy(Some("\n\r")).is_err());
    }

    #[test]
    fn test_error_policy_parse() {
        assert_eq!("strict".parse::<ErrorPolicy>().unwrap(), ErrorPolicy::Strict);
        assert_eq!("replace".parse::<ErrorPolicy>().unwrap(), ErrorPolicy::Replace);
        assert_eq!("ignore".parse::<ErrorPolicy>().unwrap(), ErrorPolicy::Ignore);
        assert!("backslashreplace".parse::<ErrorPolicy>().is_err());
    }

    #[test]
    fn test_defaults() {
        let options = OpenOptions::default();
        assert_eq!(options.mode(), Mode::Text);
        assert_eq!(options.encoding_label(), None);
        assert_eq!(options.newline_policy(), Newline::Universal);
        assert_eq!(options.error_policy(), ErrorPolicy::Strict);
        assert_eq!(options.output_kind(), Output::Handle);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_binary_rejects_text_settings() {
        assert!(OpenOptions::binary().validate().is_ok());
        let err = OpenOptions::binary().encoding("utf-8").validate().unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Open);
        assert!(OpenOptions::binary().with_newline(Newline::Lf).validate().is_err());
        assert!(OpenOptions::binary().errors(ErrorPolicy::Replace).validate().is_err());
        assert!(OpenOptions::text().buffer_capacity(0).validate().is_err());
    }

    #[test]
    fn test_merged_overrides() {
        let defaults = OpenOptions::text().encoding("latin-1").with_newline(Newline::Lf);

        let same = defaults.merged(&OpenOverrides::default());
        assert_eq!(same, defaults);

        let merged = defaults.merged(&OpenOverrides {
            encoding: Some("utf-8".into()),
            errors: Some(ErrorPolicy::Replace),
            ..OpenOverrides::default()
        });
        assert_eq!(merged.encoding_label(), Some("utf-8"));
        assert_eq!(merged.newline_policy(), Newline::Lf);
        assert_eq!(merged.error_policy(), ErrorPolicy::Replace);
        assert_eq!(merged.mode(), Mode::Text);
    }

    #[test]
    fn test_open_unknown_encoding() {
        let (_dir, registry) = dir_registry();
        let resolved = registry
            .resolve(&ResourceRef::new("sample_pkg", "data/hello.txt"))
            .unwrap();
        let err = OpenOptions::text().encoding("klingon").open(resolved).unwrap_err();
        assert!(matches!(err, Error::UnknownEncoding(_)));
        assert_eq!(err.kind(), crate::ErrorKind::Open);
    }

    #[test]
    fn test_open_directory_is_open_error() {
        let (_dir, registry) = dir_registry();
        let resolved = registry.resolve(&ResourceRef::new("sample_pkg", "data")).unwrap();
        let err = OpenOptions::binary().open(resolved).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Open);
    }

    #[test]
    fn test_open_path_only() {
        let (_dir, registry) = dir_registry();
        let resolved = registry
            .resolve(&ResourceRef::new("sample_pkg", "data/hello.txt"))
            .unwrap();
        let opened = OpenOptions::path_only().open(resolved).unwrap();
        assert!(matches!(opened, Opened::Path(_)));
        assert_eq!(std::fs::read(opened.path()).unwrap(), HELLO);
    }
}
