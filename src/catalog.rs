//! Read-only catalogs of template assets keyed by virtual path.
//! Assets are either embedded into the binary at build time or read from a
//! directory tree; both expose the same names and bodies.

use crate::error::{Error, Result};
use log::debug;
use rust_embed::Embed;
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Trait for providers of named template bodies.
pub trait Catalog {
    /// Lists every asset name. Order is not guaranteed.
    fn names(&self) -> Vec<String>;

    /// Returns the body stored under `name`.
    ///
    /// # Errors
    /// * `Error::NotFound` if no asset has this name
    fn get(&self, name: &str) -> Result<Cow<'static, [u8]>>;
}

#[derive(Embed)]
#[folder = "templates/"]
#[prefix = "templates/"]
struct Assets;

/// Catalog over the templates bundled into the binary.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmbeddedCatalog;

impl Catalog for EmbeddedCatalog {
    fn names(&self) -> Vec<String> {
        <Assets as Embed>::iter().map(|name| name.into_owned()).collect()
    }

    fn get(&self, name: &str) -> Result<Cow<'static, [u8]>> {
        <Assets as Embed>::get(name)
            .map(|file| file.data)
            .ok_or_else(|| Error::NotFound { name: name.to_string() })
    }
}

/// Catalog over a directory tree.
///
/// Names are the paths of regular files relative to `root`, joined with `/`,
/// so a root containing `templates/app/gin.tpl` matches the embedded catalog.
#[derive(Debug, Clone)]
pub struct DirectoryCatalog {
    root: PathBuf,
}

impl DirectoryCatalog {
    /// Creates a new DirectoryCatalog rooted at `root`.
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
}

impl Catalog for DirectoryCatalog {
    fn names(&self) -> Vec<String> {
        WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!("Skipping unreadable catalog entry: {e}");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file())
            .filter_map(|entry| {
                let relative = entry.path().strip_prefix(&self.root).ok()?;
                let parts: Vec<String> = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                Some(parts.join("/"))
            })
            .collect()
    }

    fn get(&self, name: &str) -> Result<Cow<'static, [u8]>> {
        let path = self.root.join(name);
        if !path.is_file() {
            return Err(Error::NotFound { name: name.to_string() });
        }
        debug!("Reading asset {}", path.display());
        fs::read(&path).map(Cow::Owned).map_err(|e| Error::filesystem(&path, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_catalog_lists_virtual_paths() {
        let names = EmbeddedCatalog.names();
        assert!(names.iter().any(|n| n == "templates/app/gin.tpl"));
        assert!(names.iter().any(|n| n == "templates/gitignore.tpl"));
        assert!(names.iter().all(|n| n.starts_with("templates/")));
    }

    #[test]
    fn test_embedded_catalog_missing_asset() {
        match EmbeddedCatalog.get("templates/app/nope.tpl") {
            Err(Error::NotFound { name }) => assert_eq!(name, "templates/app/nope.tpl"),
            other => panic!("Expected NotFound, got {:?}", other.map(|b| b.len())),
        }
    }
}
