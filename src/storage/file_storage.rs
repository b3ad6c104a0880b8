use super::{StorageBackend, StorageError};
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

/// File-backed storage: one `<key>.json` file per key under a base
/// directory. Each key's value is read and rewritten as a whole file.
pub struct FileStorage {
    base_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    pub fn initialize(base_dir: PathBuf) -> Result<FileStorage, StorageError> {
        fs::create_dir_all(&base_dir)?;
        Ok(FileStorage {
            base_dir,
            write_lock: Mutex::new(()),
        })
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.base_dir.join(format!("{}.json", key))
    }
}

impl StorageBackend for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.key_path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap();
        fs::write(self.key_path(key), value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.write_lock.lock().unwrap();
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
