//! A filesystem backed registry
//!
//! The [`Store`] keeps a [`Registry`] in a directory: a `config.toml` with the
//! store settings and a binary snapshot of the registry itself. It is a
//! wrapper around the filesystem agnostic [`Registry`].

use std::{
    io,
    path::{Path, PathBuf},
};

use tracing::instrument;

use crate::{
    domain::{Config, Registry},
    storage::snapshot::{self, SnapshotError},
};

const CONFIG_FILE: &str = "config.toml";

/// A registry persisted in a directory.
#[derive(Debug)]
pub struct Store {
    /// The root of the directory the registry is stored in.
    root: PathBuf,
    config: Config,
    registry: Registry,
    dirty: bool,
}

/// Errors that can occur when opening, creating or writing a [`Store`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The directory already contains a registry.
    #[error("a registry already exists in {}", .0.display())]
    AlreadyInitialised(PathBuf),

    /// The directory does not contain a registry.
    #[error("no registry found in {} (run 'reg init' first)", .0.display())]
    NotInitialised(PathBuf),

    /// The configuration file could not be read or written.
    #[error("{0}")]
    Config(String),

    /// The registry snapshot could not be read or written.
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),

    /// The directory could not be created.
    #[error("failed to create {}: {source}", path.display())]
    CreateDir {
        /// The directory that could not be created.
        path: PathBuf,
        /// The underlying error.
        source: io::Error,
    },
}

impl Store {
    /// Create a new, empty registry in `root`.
    ///
    /// The directory is created if necessary, and a default configuration
    /// file is written alongside the snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyInitialised`] if the directory already
    /// contains a configuration file or snapshot, or an I/O related error if
    /// either cannot be written.
    #[instrument(skip(name, motto))]
    pub fn init(
        root: PathBuf,
        name: impl Into<String>,
        motto: impl Into<String>,
    ) -> Result<Self, StoreError> {
        let config_path = root.join(CONFIG_FILE);
        let config = load_config(&root);
        if config_path.exists() || root.join(config.data_file()).exists() {
            return Err(StoreError::AlreadyInitialised(root));
        }

        std::fs::create_dir_all(&root).map_err(|source| StoreError::CreateDir {
            path: root.clone(),
            source,
        })?;

        let mut store = Self {
            root,
            config,
            registry: Registry::new(name, motto),
            dirty: true,
        };

        // A failed init must not leave a snapshot behind.
        store.flush()?;
        if let Err(e) = store.config.save(&config_path) {
            let data_path = store.root.join(store.config.data_file());
            if let Err(remove_error) = std::fs::remove_file(&data_path) {
                tracing::warn!("failed to remove {}: {remove_error}", data_path.display());
            }
            return Err(StoreError::Config(e));
        }
        Ok(store)
    }

    /// Open the registry stored in `root`.
    ///
    /// A missing configuration file falls back to the defaults. The
    /// configured maximum course load is applied to the loaded registry.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotInitialised`] if there is no snapshot, or
    /// [`StoreError::Snapshot`] if it cannot be read.
    #[instrument]
    pub fn open(root: PathBuf) -> Result<Self, StoreError> {
        let config = load_config(&root);
        let data_path = root.join(config.data_file());

        let mut registry = match snapshot::load(&data_path) {
            Ok(registry) => registry,
            Err(SnapshotError::NotFound) => return Err(StoreError::NotInitialised(root)),
            Err(e) => return Err(e.into()),
        };
        registry.set_max_course_load(config.max_course_load);

        Ok(Self {
            root,
            config,
            registry,
            dirty: false,
        })
    }

    /// The root directory of the store.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The store configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The registry.
    #[must_use]
    pub const fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Mutable access to the registry.
    ///
    /// The store is marked as modified, and the next [`Store::flush`] writes
    /// the snapshot.
    pub const fn registry_mut(&mut self) -> &mut Registry {
        self.dirty = true;
        &mut self.registry
    }

    /// Write the snapshot if the registry may have been modified.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Snapshot`] if the snapshot cannot be written.
    pub fn flush(&mut self) -> Result<(), StoreError> {
        if !self.dirty {
            return Ok(());
        }

        let path = self.root.join(self.config.data_file());
        snapshot::save(&self.registry, &path)?;
        self.dirty = false;
        Ok(())
    }
}

fn load_config(root: &Path) -> Config {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        tracing::debug!("No config file at {}, using defaults", path.display());
        return Config::default();
    }

    Config::load(&path).unwrap_or_else(|e| {
        tracing::warn!("{e} ({}), using defaults", path.display());
        Config::default()
    })
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::domain::{CourseCode, StudentId};

    #[test]
    fn init_then_open_round_trips_through_disk() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();

        let mut store = Store::init(root.clone(), "Test University", "Scientia").unwrap();
        let id = StudentId::new(1).unwrap();
        let code = CourseCode::try_from("CS101").unwrap();
        store.registry_mut().register_student("Ana", id).unwrap();
        store.registry_mut().offer_course("Intro", code.clone()).unwrap();
        store.registry_mut().enroll(id, &code).unwrap();
        store.flush().unwrap();

        let store = Store::open(root).unwrap();
        assert_eq!(store.registry().name(), "Test University");
        assert!(store.registry().course(&code).unwrap().has_student(id));
    }

    #[test]
    fn init_refuses_existing_registry() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();

        Store::init(root.clone(), "U", "M").unwrap();
        let err = Store::init(root, "U", "M").unwrap_err();
        assert!(matches!(err, StoreError::AlreadyInitialised(_)));
    }

    #[test]
    fn open_without_init_fails() {
        let tmp = tempdir().unwrap();

        let err = Store::open(tmp.path().to_path_buf()).unwrap_err();
        assert!(matches!(err, StoreError::NotInitialised(_)));
    }

    #[test]
    fn open_applies_configured_course_load() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        Store::init(root.clone(), "U", "M").unwrap();

        let mut config = Config::default();
        config.max_course_load = Some(2);
        config.save(&root.join(CONFIG_FILE)).unwrap();

        let store = Store::open(root).unwrap();
        assert_eq!(store.registry().max_course_load(), Some(2));
    }

    #[test]
    fn malformed_config_falls_back_to_defaults() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        Store::init(root.clone(), "U", "M").unwrap();
        std::fs::write(root.join(CONFIG_FILE), "max_course_load = [").unwrap();

        let store = Store::open(root).unwrap();
        assert_eq!(store.config(), &Config::default());
        assert_eq!(store.registry().max_course_load(), None);
    }

    #[cfg(unix)]
    #[test]
    fn failed_init_leaves_no_snapshot_behind() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();

        // A dangling link into a missing directory cannot be written through.
        std::os::unix::fs::symlink(root.join("missing/config.toml"), root.join(CONFIG_FILE))
            .unwrap();

        let err = Store::init(root.clone(), "U", "M").unwrap_err();
        assert!(matches!(err, StoreError::Config(_)));
        assert!(!root.join(Config::default().data_file()).exists());
        assert!(matches!(
            Store::open(root.clone()),
            Err(StoreError::NotInitialised(_))
        ));

        std::fs::remove_file(root.join(CONFIG_FILE)).unwrap();
        Store::init(root, "U", "M").unwrap();
    }

    #[test]
    fn open_honours_custom_data_file() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();

        let mut config = Config::default();
        config.set_data_file("campus.bin");
        config.save(&root.join(CONFIG_FILE)).unwrap();
        snapshot::save(&Registry::new("Campus", "M"), &root.join("campus.bin")).unwrap();

        let store = Store::open(root).unwrap();
        assert_eq!(store.registry().name(), "Campus");
    }
}
