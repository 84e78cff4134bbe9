//! Reading bill files from disk.

use std::path::Path;

use crate::error::BillError;

/// Read a bill file into memory.
///
/// Only `.pdf` files (any case) are accepted. Checks that the path exists and
/// is a regular file before reading, so the user gets a precise message.
pub async fn read_bill_file(path: &Path) -> Result<Vec<u8>, BillError> {
    let meta = match tokio::fs::metadata(path).await {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(BillError::NotFound(path.to_path_buf()))
        }
        Err(source) => return Err(BillError::Read { path: path.to_path_buf(), source }),
    };
    if !meta.is_file() {
        return Err(BillError::NotAFile(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase();
    if extension != "pdf" {
        return Err(BillError::Unsupported { path: path.to_path_buf(), extension });
    }

    tokio::fs::read(path)
        .await
        .map_err(|source| BillError::Read { path: path.to_path_buf(), source })
}

/// Name sent to the backend for an uploaded file.
pub fn upload_file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "bill.pdf".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_file() {
        let err = read_bill_file(Path::new("nonexistent.pdf")).await.unwrap_err();
        assert!(matches!(err, BillError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_directory_is_rejected() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let err = read_bill_file(dir.path()).await.unwrap_err();
        assert!(matches!(err, BillError::NotAFile(_)));
        Ok(())
    }

    #[tokio::test]
    async fn test_extension_check_is_case_insensitive() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let upper = dir.path().join("MARCH.PDF");
        std::fs::write(&upper, b"%PDF-1.4")?;
        assert_eq!(read_bill_file(&upper).await?, b"%PDF-1.4");

        let txt = dir.path().join("march.txt");
        std::fs::write(&txt, b"hello")?;
        let err = read_bill_file(&txt).await.unwrap_err();
        assert!(matches!(err, BillError::Unsupported { ref extension, .. } if extension == "txt"));
        Ok(())
    }

    #[test]
    fn test_upload_file_name() {
        assert_eq!(upload_file_name(Path::new("/bills/2024/march.pdf")), "march.pdf");
        assert_eq!(upload_file_name(Path::new("/")), "bill.pdf");
    }
}
