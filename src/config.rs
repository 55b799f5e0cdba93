//! Configuration for package lookup.
//!
//! Use [`ConfigBuilder`] at application startup to describe where packages
//! live, then build the [`Registry`] every resolution goes through.
//! Nothing here is global: each registry owns its own configuration.

use std::path::PathBuf;

use crate::package::PackageSource;
use crate::registry::Registry;

/// Package lookup configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Directories searched, in order, for `<name>/` or `<name>.zip` when a
    /// package is not registered explicitly.
    pub search_paths: Vec<PathBuf>,

    /// Parent directory for temporary archive extractions.
    ///
    /// Default: the system temp directory.
    pub extract_dir: Option<PathBuf>,

    /// Explicitly registered packages, by identifier.
    pub packages: Vec<(String, PackageSource)>,
}

/// Configuration builder for fluent API.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Create a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a search path.
    pub fn search_path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.search_paths.push(dir.into());
        self
    }

    /// Register a package under `name`.
    ///
    /// `name` may be dotted (`vendor.assets`); the longest registered
    /// prefix of an identifier wins during lookup.
    pub fn package(mut self, name: impl Into<String>, source: PackageSource) -> Self {
        self.config.packages.push((name.into(), source));
        self
    }

    /// Register a package stored as loose files in `dir`.
    pub fn package_dir(self, name: impl Into<String>, dir: impl Into<PathBuf>) -> Self {
        self.package(name, PackageSource::directory(dir))
    }

    /// Register a package stored below `prefix` inside a zip archive.
    ///
    /// Use an empty prefix when the package is the archive root.
    pub fn package_archive(
        self,
        name: impl Into<String>,
        archive: impl Into<PathBuf>,
        prefix: &str,
    ) -> Self {
        self.package(name, PackageSource::archive_at(archive, prefix))
    }

    /// Set the parent directory for temporary archive extractions.
    ///
    /// # Example
    ///
    /// ```
    /// use file_factory::ConfigBuilder;
    ///
    /// let registry = ConfigBuilder::new()
    ///     .search_path("assets")
    ///     .extract_dir(std::env::temp_dir())
    ///     .build();
    /// assert_eq!(registry.search_paths().len(), 1);
    /// ```
    pub fn extract_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.extract_dir = Some(dir.into());
        self
    }

    /// Finish without building a registry.
    pub fn into_config(self) -> Config {
        self.config
    }

    /// Build a registry from this configuration.
    pub fn build(self) -> Registry {
        Registry::from_config(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.search_paths.is_empty());
        assert!(config.extract_dir.is_none());
        assert!(config.packages.is_empty());
    }

    #[test]
    fn test_builder() {
        let config = ConfigBuilder::new()
            .search_path("/a")
            .search_path("/b")
            .package_dir("pkg", "/pkgs/pkg")
            .package_archive("zipped", "/pkgs/app.zip", "zipped/")
            .extract_dir("/scratch")
            .into_config();

        assert_eq!(config.search_paths, [PathBuf::from("/a"), PathBuf::from("/b")]);
        assert_eq!(config.extract_dir, Some(PathBuf::from("/scratch")));
        assert_eq!(
            config.packages,
            [
                ("pkg".to_string(), PackageSource::directory("/pkgs/pkg")),
                (
                    "zipped".to_string(),
                    PackageSource::archive_at("/pkgs/app.zip", "zipped")
                ),
            ]
        );
    }
}
