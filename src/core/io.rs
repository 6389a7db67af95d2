use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait Storage: Send + Sync {
    async fn write(&self, path: &str, content: &[u8]) -> Result<()>;
}

pub struct NativeStorage;

impl NativeStorage {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NativeStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for NativeStorage {
    async fn write(&self, path: &str, content: &[u8]) -> Result<()> {
        if let Some(parent) = std::path::Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }
        tokio::fs::write(path, content).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_creates_parent_directories() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let path = temp_dir.path().join("nested").join("story.txt");
        assert!(!path.exists());

        let storage = NativeStorage::new();
        storage.write(path.to_str().unwrap(), b"Once upon a time").await?;

        assert_eq!(std::fs::read_to_string(&path)?, "Once upon a time");
        Ok(())
    }

    #[tokio::test]
    async fn test_write_replaces_existing_file() -> Result<()> {
        let temp_dir = tempfile::tempdir()?;
        let path = temp_dir.path().join("story.txt");
        std::fs::write(&path, "an older, longer draft")?;

        NativeStorage::new().write(path.to_str().unwrap(), b"new").await?;

        assert_eq!(std::fs::read_to_string(&path)?, "new");
        Ok(())
    }
}
