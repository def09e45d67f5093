//! Bearer token persistence for `--token-file`.

use std::path::Path;

use tracing::info;

use super::error::InfraError;

/// Write `token` to `path`, creating parent directories as needed.
pub async fn save(path: &Path, token: &str) -> Result<(), InfraError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, format!("{token}\n")).await?;
    info!(path = %path.display(), "token saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn saved_token_is_read_back_trimmed() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("token");

        save(&path, "abc.def").await.expect("save");
        let raw = std::fs::read_to_string(&path).expect("read");
        assert_eq!(raw.trim(), "abc.def");
    }
}
