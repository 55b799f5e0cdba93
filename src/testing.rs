//! Shared fixtures for unit tests.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::ConfigBuilder;
use crate::registry::Registry;

pub(crate) const HELLO: &[u8] = b"hello\n";

/// `café\n` in ISO-8859-1.
pub(crate) const LATIN1: &[u8] = b"caf\xe9\n";

/// ISO-8859-1 bytes in the C1 control range.
pub(crate) const LATIN1_C1: &[u8] = b"\x80\x9f\n";

/// `hi\n` in UTF-16 with a little-endian BOM.
pub(crate) const UTF16_LE: &[u8] = b"\xff\xfeh\x00i\x00\n\x00";

/// `hi\n` in UTF-16 with a big-endian BOM.
pub(crate) const UTF16_BE: &[u8] = b"\xfe\xff\x00h\x00i\x00\n";

/// Files of the `sample_pkg` fixture package, relative to its root.
pub(crate) const FILES: &[(&str, &[u8])] = &[
    ("data/hello.txt", HELLO),
    ("data/latin1.txt", LATIN1),
    ("data/c1.txt", LATIN1_C1),
    ("data/utf16le.txt", UTF16_LE),
    ("data/utf16be.txt", UTF16_BE),
    ("data/mixed.txt", b"one\r\ntwo\rthree\nfour"),
    ("data/utf8.txt", "naïve ☃\n".as_bytes()),
    ("data/invalid.txt", b"ok\xff\xfe\n"),
    ("data/bom.txt", b"\xef\xbb\xbfhi\n"),
    ("data/blob.bin", &[0x00, 0x9f, 0x92, 0x96, 0xff]),
    ("data/config.json", br#"{"name":"sample"}"#),
    ("sub/inner/note.md", b"# note\n"),
];

/// Write the `sample_pkg` directory under `parent` and return its root.
pub(crate) fn sample_dir(parent: &Path) -> PathBuf {
    let root = parent.join("sample_pkg");
    for (name, content) in FILES {
        let path = root.join(name);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
    root
}

/// Write the `sample_pkg` files into a zip at `path`, below `prefix`.
pub(crate) fn sample_zip(path: &Path, prefix: &str) -> PathBuf {
    let mut zip = ZipWriter::new(File::create(path).unwrap());
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
    for (name, content) in FILES {
        let member = if prefix.is_empty() {
            name.to_string()
        } else {
            format!("{prefix}/{name}")
        };
        zip.start_file(member, options).unwrap();
        zip.write_all(content).unwrap();
    }
    zip.finish().unwrap();
    path.to_path_buf()
}

/// A registry with `sample_pkg` registered as a directory package.
pub(crate) fn dir_registry() -> (TempDir, Registry) {
    let dir = TempDir::new().unwrap();
    let root = sample_dir(dir.path());
    let registry = ConfigBuilder::new().package_dir("sample_pkg", root).build();
    (dir, registry)
}

/// A registry with `sample_pkg` registered from a zip archive.
pub(crate) fn zip_registry() -> (TempDir, Registry) {
    let dir = TempDir::new().unwrap();
    let zip = sample_zip(&dir.path().join("bundle.zip"), "sample_pkg");
    let registry = ConfigBuilder::new()
        .package_archive("sample_pkg", zip, "sample_pkg")
        .extract_dir(dir.path())
        .build();
    (dir, registry)
}

/// Both registries, for tests that must hold for either layout.
pub(crate) fn registries() -> Vec<(TempDir, Registry)> {
    vec![dir_registry(), zip_registry()]
}
