// src/db/object_storage.rs

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use tokio::sync::RwLock;

use crate::common::error::AppError;

// Armazenamento de arquivos (imagens das auditorias).
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload(&self, path: &str, bytes: Vec<u8>, content_type: Option<&str>) -> Result<(), AppError>;

    async fn download_url(&self, path: &str) -> Result<String, AppError>;
}

// Nada de "..", raiz absoluta ou prefixos: o caminho fica sempre dentro do diretório base.
fn sanitize(path: &str) -> Result<PathBuf, AppError> {
    let candidate = Path::new(path);
    let mut clean = PathBuf::new();
    for component in candidate.components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            _ => return Err(AppError::BadRequest(format!("caminho de arquivo inválido: {}", path))),
        }
    }
    if clean.as_os_str().is_empty() {
        return Err(AppError::BadRequest("caminho de arquivo vazio".to_string()));
    }
    Ok(clean)
}

/// Grava em disco e monta a URL pública a partir de uma base configurável.
#[derive(Clone)]
pub struct LocalObjectStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn upload(&self, path: &str, bytes: Vec<u8>, _content_type: Option<&str>) -> Result<(), AppError> {
        let target = self.root.join(sanitize(path)?);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, bytes).await?;
        Ok(())
    }

    async fn download_url(&self, path: &str) -> Result<String, AppError> {
        let clean = sanitize(path)?;
        if !tokio::fs::try_exists(self.root.join(&clean)).await? {
            return Err(AppError::StorageError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("arquivo inexistente: {}", path),
            )));
        }
        let rel = clean
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        Ok(format!("{}/{}", self.public_base_url, rel))
    }
}

// Só para testes
#[cfg(test)]
#[derive(Default)]
pub struct MemoryObjectStorage {
    objects: RwLock<HashMap<String, Vec<u8>>>,
}

#[cfg(test)]
impl MemoryObjectStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn contains(&self, path: &str) -> bool {
        self.objects.read().await.contains_key(path)
    }
}

#[cfg(test)]
#[async_trait]
impl ObjectStorage for MemoryObjectStorage {
    async fn upload(&self, path: &str, bytes: Vec<u8>, _content_type: Option<&str>) -> Result<(), AppError> {
        sanitize(path)?;
        self.objects.write().await.insert(path.to_string(), bytes);
        Ok(())
    }

    async fn download_url(&self, path: &str) -> Result<String, AppError> {
        if !self.contains(path).await {
            return Err(AppError::StorageError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("arquivo inexistente: {}", path),
            )));
        }
        Ok(format!("memory://{}", path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn local_storage_writes_file_and_builds_url() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalObjectStorage::new(dir.path(), "http://localhost:3000/files/");

        storage.upload("imagenes/foto.jpg", vec![1, 2, 3], Some("image/jpeg")).await.unwrap();

        let written = tokio::fs::read(dir.path().join("imagenes/foto.jpg")).await.unwrap();
        assert_eq!(written, vec![1, 2, 3]);
        assert_eq!(
            storage.download_url("imagenes/foto.jpg").await.unwrap(),
            "http://localhost:3000/files/imagenes/foto.jpg"
        );
    }

    #[tokio::test]
    async fn traversal_outside_root_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalObjectStorage::new(dir.path(), "http://x");

        let result = storage.upload("../escape.txt", vec![0], None).await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }

    #[tokio::test]
    async fn url_for_missing_object_fails() {
        let storage = MemoryObjectStorage::new();
        assert!(storage.download_url("imagenes/nada.png").await.is_err());
    }
}
