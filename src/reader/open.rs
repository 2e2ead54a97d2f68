use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::storage::{AttributeFile, ATTRIBUTES_FILE, TABLE_EXTENSION};

use super::{BundleReader, ReaderConfig, ReaderError};

impl BundleReader {
    /// Open a bundle directory
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ReaderError> {
        Self::open_with_config(path, ReaderConfig::default())
    }

    /// Open a bundle directory with custom configuration.
    ///
    /// The directory must contain `attributes.json`, which is only written when
    /// the bundle was finished. Only the tables it lists are visible.
    pub fn open_with_config<P: AsRef<Path>>(
        path: P,
        config: ReaderConfig,
    ) -> Result<Self, ReaderError> {
        let root = path.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(ReaderError::InvalidFormat(format!(
                "Not a bundle directory: {}",
                root.display()
            )));
        }

        let attributes_path = root.join(ATTRIBUTES_FILE);
        if !attributes_path.exists() {
            return Err(ReaderError::InvalidFormat(format!(
                "Bundle missing {} (unfinished?): {}",
                ATTRIBUTES_FILE,
                root.display()
            )));
        }
        let file: AttributeFile =
            serde_json::from_reader(BufReader::new(File::open(&attributes_path)?))?;

        let mut tables = BTreeMap::new();
        for name in &file.stored_tables {
            let path = root.join(format!("{}.{}", name, TABLE_EXTENSION));
            if !path.is_file() {
                return Err(ReaderError::InvalidFormat(format!(
                    "Bundle table '{}' is missing: {}",
                    name,
                    path.display()
                )));
            }
            tables.insert(name.clone(), path);
        }

        Ok(Self {
            root,
            config,
            format_version: file.format_version,
            created: file.created,
            attributes: file.attributes,
            tables,
        })
    }
}
