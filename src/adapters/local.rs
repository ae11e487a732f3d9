use crate::domain::ports::Storage;
use crate::utils::error::Result;
use std::fs;
use std::path::Path;

/// Stage working directory. Relative paths (including `..`) resolve against `base_path`.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    base_path: String,
}

impl LocalStorage {
    pub fn new(base_path: String) -> Self {
        Self { base_path }
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }
}

impl Storage for LocalStorage {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
        let full_path = Path::new(&self.base_path).join(path);
        let data = fs::read(full_path)?;
        Ok(data)
    }

    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
        let full_path = Path::new(&self.base_path).join(path);

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }

        fs::write(full_path, data)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(dir.path().to_str().unwrap().to_string());

        storage.write_file("nested/out.json", b"{}").await.unwrap();
        assert_eq!(storage.read_file("nested/out.json").await.unwrap(), b"{}");
    }

    #[tokio::test]
    async fn test_parent_relative_path() {
        let dir = TempDir::new().unwrap();
        let work = dir.path().join("vertex-ai");
        std::fs::create_dir_all(&work).unwrap();
        let storage = LocalStorage::new(work.to_str().unwrap().to_string());

        storage.write_file("../config.php", b"<?php").await.unwrap();
        assert!(dir.path().join("config.php").exists());
    }
}
