//! Reusable, preconfigured resource openers.
//!
//! A [`Factory`] remembers one resource and one [`OpenOptions`]; every
//! call resolves and opens afresh. The location-bound factories in
//! [`opener`] remember a package and file extension instead and take the
//! file name per call:
//!
//! | type | per call | returns |
//! |---|---|---|
//! | [`Factory`] | nothing | [`Opened`] |
//! | [`FileOpener`] | name, dirs, overrides | [`Opened`] |
//! | [`PathFinder`] | name, dirs | [`ResolvedPath`](crate::ResolvedPath) |
//! | [`StringOpener`] | name, dirs, encoding | `String` |
//! | [`ByteOpener`] | name, dirs | `Vec<u8>` |
//! | [`FileProcessor`] | name, dirs | whatever the function returns |

mod locator;
pub mod opener;

pub use locator::{normalize_extension, Locator};
pub use opener::{ByteOpener, FileOpener, FileProcessor, PathFinder, StringOpener};

use tracing::debug;

use crate::error::Result;
use crate::open::{OpenOptions, Opened};
use crate::registry::Registry;
use crate::resource::ResourceRef;

/// Opens one fixed resource with fixed options, as often as needed.
///
/// Calls share no mutable state: each returns its own independent handle.
///
/// # Example
///
/// ```ignore
/// use file_factory::{Factory, OpenOptions, Registry, ResourceRef};
///
/// let registry = Registry::builder().package_dir("sample_pkg", "pkgs/sample_pkg").build();
/// let hello = Factory::new(
///     &registry,
///     ResourceRef::new("sample_pkg", "data/hello.txt"),
///     OpenOptions::text().encoding("utf-8"),
/// );
///
/// let text = hello.open()?.into_text().unwrap().read_to_string()?;
/// assert_eq!(text, "hello\n");
/// ```
#[derive(Debug, Clone)]
pub struct Factory {
    registry: Registry,
    resource: ResourceRef,
    options: OpenOptions,
}

impl Factory {
    /// Create a factory resolving through `registry`.
    pub fn new(registry: &Registry, resource: ResourceRef, options: OpenOptions) -> Self {
        Self {
            registry: registry.clone(),
            resource,
            options,
        }
    }

    /// The resource this factory opens.
    pub fn resource(&self) -> &ResourceRef {
        &self.resource
    }

    /// The options it opens with.
    pub fn options(&self) -> &OpenOptions {
        &self.options
    }

    /// Resolve and open the resource.
    ///
    /// Fails with a not-found error when the package or resource is
    /// missing, or an open error when it cannot be opened as configured.
    pub fn open(&self) -> Result<Opened> {
        self.options.validate()?;
        let resolved = self.registry.resolve(&self.resource)?;
        debug!(resource = %self.resource, mode = %self.options.mode(), "opening resource");
        self.options.open(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::open::{ErrorPolicy, Mode, Output};
    use crate::testing::{registries, HELLO};
    use crate::{Error, ErrorKind};
    use std::io::Read;

    fn hello(registry: &Registry, options: OpenOptions) -> Factory {
        registry.factory(ResourceRef::new("sample_pkg", "data/hello.txt"), options)
    }

    #[test]
    fn test_text_utf8_scenario() {
        for (_dir, registry) in registries() {
            let factory = hello(&registry, OpenOptions::text().encoding("utf-8"));
            let mut file = factory.open().unwrap().into_text().unwrap();
            assert_eq!(file.read_to_string().unwrap(), "hello\n");
        }
    }

    #[test]
    fn test_binary_scenario() {
        for (_dir, registry) in registries() {
            let factory = hello(&registry, OpenOptions::binary());
            let mut file = factory.open().unwrap().into_binary().unwrap();
            assert_eq!(file.read_all().unwrap(), HELLO);
        }
    }

    #[test]
    fn test_missing_resource_scenario() {
        for (_dir, registry) in registries() {
            let factory = registry.factory(
                ResourceRef::new("sample_pkg", "data/missing.txt"),
                OpenOptions::text(),
            );
            let err = factory.open().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound);
            assert!(matches!(err, Error::ResourceNotFound { .. }));
        }
    }

    #[test]
    fn test_missing_package_is_not_found() {
        for (_dir, registry) in registries() {
            let factory = registry.factory(
                ResourceRef::new("other_pkg", "data/hello.txt"),
                OpenOptions::binary(),
            );
            assert_eq!(factory.open().unwrap_err().kind(), ErrorKind::NotFound);
        }
    }

    #[test]
    fn test_calls_are_independent() {
        for (_dir, registry) in registries() {
            let factory = hello(&registry, OpenOptions::binary());
            let first = factory.open().unwrap().into_binary().unwrap();
            let mut second = factory.open().unwrap().into_binary().unwrap();

            drop(first);
            let mut content = Vec::new();
            second.read_to_end(&mut content).unwrap();
            assert_eq!(content, HELLO);
        }
    }

    #[test]
    fn test_partial_read_does_not_affect_other_handle() {
        for (_dir, registry) in registries() {
            let factory = hello(&registry, OpenOptions::text());
            let mut first = factory.open().unwrap().into_text().unwrap();
            let mut second = factory.open().unwrap().into_text().unwrap();

            assert_eq!(first.read_to_string().unwrap(), "hello\n");
            assert_eq!(second.read_to_string().unwrap(), "hello\n");
        }
    }

    #[test]
    fn test_path_output() {
        for (_dir, registry) in registries() {
            let factory = hello(&registry, OpenOptions::path_only());
            let opened = factory.open().unwrap();
            assert!(matches!(opened, Opened::Path(_)));
            let path = opened.into_path();
            assert_eq!(std::fs::read(&path).unwrap(), HELLO);
        }
    }

    #[test]
    fn test_archive_handle_keeps_extraction_alive() {
        let (_dir, registry) = crate::testing::zip_registry();
        let factory = hello(&registry, OpenOptions::binary());
        let opened = factory.open().unwrap();
        let location = opened.path().to_path_buf();
        assert!(location.exists());

        drop(opened);
        assert!(!location.exists());
    }

    #[test]
    fn test_invalid_options_are_open_errors() {
        let (_dir, registry) = crate::testing::dir_registry();
        let factory = hello(
            &registry,
            OpenOptions::binary().errors(ErrorPolicy::Replace),
        );
        assert_eq!(factory.open().unwrap_err().kind(), ErrorKind::Open);

        let factory = hello(&registry, OpenOptions::text().encoding("no-such-codec"));
        assert!(matches!(factory.open().unwrap_err(), Error::UnknownEncoding(_)));
    }

    #[test]
    fn test_accessors() {
        let (_dir, registry) = crate::testing::dir_registry();
        let factory = hello(&registry, OpenOptions::binary().output(Output::Handle));
        assert_eq!(factory.resource().path(), "data/hello.txt");
        assert_eq!(factory.options().mode(), Mode::Binary);
    }

    #[test]
    fn test_factory_is_shareable_across_threads() {
        let (_dir, registry) = crate::testing::dir_registry();
        let factory = hello(&registry, OpenOptions::text());

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    scope.spawn(|| {
                        factory
                            .open()
                            .unwrap()
                            .into_text()
                            .unwrap()
                            .read_to_string()
                            .unwrap()
                    })
                })
                .collect();
            for handle in handles {
                assert_eq!(handle.join().unwrap(), "hello\n");
            }
        });
    }
}
