//! Package + extension binding shared by the location-bound factories.

use crate::error::Result;
use crate::registry::Registry;
use crate::resource::{ResolvedPath, ResourceRef};

/// Normalize a file extension to `.ext` form.
///
/// `"txt"` and `".txt"` both become `".txt"`; `None` or an empty string
/// means names are used exactly as given.
pub fn normalize_extension(extension: Option<&str>) -> String {
    match extension {
        None | Some("") => String::new(),
        Some(ext) if ext.starts_with('.') => ext.to_string(),
        Some(ext) => format!(".{ext}"),
    }
}

/// A package location with an expected file extension.
///
/// `locate("post", &["blog", "2024"])` with extension `.md` names
/// `blog/2024/post.md` inside the package.
#[derive(Debug, Clone)]
pub struct Locator {
    registry: Registry,
    package: String,
    extension: String,
}

impl Locator {
    /// Bind `package` in `registry` with an optional file extension.
    ///
    /// The package is looked up eagerly so a bad identifier fails here
    /// rather than on first use.
    pub fn new(registry: &Registry, package: &str, extension: Option<&str>) -> Result<Self> {
        registry.package(package)?;
        Ok(Self {
            registry: registry.clone(),
            package: package.to_string(),
            extension: normalize_extension(extension),
        })
    }

    /// The package identifier.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// The normalized extension (`""` when none).
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// The registry resolutions go through.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The reference for `name` (plus extension) below `dirs`.
    ///
    /// Empty entries in `dirs` add no path segment.
    pub fn locate(&self, name: &str, dirs: &[&str]) -> ResourceRef {
        let mut path = String::new();
        for dir in dirs.iter().filter(|dir| !dir.is_empty()) {
            path.push_str(dir);
            path.push('/');
        }
        path.push_str(name);
        path.push_str(&self.extension);
        ResourceRef::new(self.package.clone(), path)
    }

    /// Resolve `name` below `dirs`.
    pub fn resolve(&self, name: &str, dirs: &[&str]) -> Result<ResolvedPath> {
        self.registry.resolve(&self.locate(name, dirs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::dir_registry;

    #[test]
    fn test_normalize_extension() {
        assert_eq!(normalize_extension(Some("txt")), ".txt");
        assert_eq!(normalize_extension(Some(".txt")), ".txt");
        assert_eq!(normalize_extension(Some("")), "");
        assert_eq!(normalize_extension(None), "");
        assert_eq!(normalize_extension(Some("tar.gz")), ".tar.gz");
    }

    #[test]
    fn test_locate() {
        let (_dir, registry) = dir_registry();
        let locator = Locator::new(&registry, "sample_pkg", Some("txt")).unwrap();
        assert_eq!(locator.extension(), ".txt");

        let r = locator.locate("hello", &["data"]);
        assert_eq!(r.package(), "sample_pkg");
        assert_eq!(r.path(), "data/hello.txt");

        assert_eq!(locator.locate("top", &[]).path(), "top.txt");
        assert_eq!(locator.locate("x", &["a", "b"]).path(), "a/b/x.txt");
    }

    #[test]
    fn test_empty_dirs_are_skipped() {
        let (_dir, registry) = dir_registry();
        let locator = Locator::new(&registry, "sample_pkg", Some("txt")).unwrap();
        assert_eq!(locator.locate("top", &[""]).path(), "top.txt");
        assert_eq!(locator.locate("hello", &["", "data", ""]).path(), "data/hello.txt");
        assert!(locator.resolve("hello", &["", "data"]).unwrap().is_file());
    }

    #[test]
    fn test_no_extension_uses_name_as_given() {
        let (_dir, registry) = dir_registry();
        let locator = Locator::new(&registry, "sample_pkg", None).unwrap();
        let path = locator.resolve("hello.txt", &["data"]).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn test_unknown_package_fails_early() {
        let (_dir, registry) = dir_registry();
        let err = Locator::new(&registry, "nope", None).unwrap_err();
        assert!(err.is_not_found());
    }
}
