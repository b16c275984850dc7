//! Persist the signed-in session between CLI invocations as a TOML file.

use std::path::Path;

use tracing::debug;

use crate::application::session::Session;

use super::error::InfraError;

/// Read the stored session. A missing file means nobody is signed in.
pub async fn load(path: &Path) -> Result<Option<Session>, InfraError> {
    let text = match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let session = toml::from_str(&text)
        .map_err(|err| InfraError::session(path, format!("failed to parse: {err}")))?;
    Ok(Some(session))
}

pub async fn save(path: &Path, session: &Session) -> Result<(), InfraError> {
    let text = toml::to_string(session)
        .map_err(|err| InfraError::session(path, format!("failed to serialize: {err}")))?;
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    restrict(path).await?;
    tokio::fs::write(path, text).await?;
    debug!(path = %path.display(), "session saved");
    Ok(())
}

/// The file holds a bearer token: create it owner-only, and tighten one left
/// behind with a wider mode.
#[cfg(unix)]
async fn restrict(path: &Path) -> Result<(), InfraError> {
    use std::fs::Permissions;
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)
        .await?;
    tokio::fs::set_permissions(path, Permissions::from_mode(0o600)).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn restrict(_path: &Path) -> Result<(), InfraError> {
    Ok(())
}

/// Forget the stored session. Removing a file that is already gone is fine.
pub async fn remove(path: &Path) -> Result<(), InfraError> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
mod tests {
    use quill_api_types::User;

    use super::*;

    fn session() -> Session {
        Session {
            access_token: "tok".into(),
            refresh_token: Some("ref".into()),
            user: User {
                id: 3,
                email: "staff@blog.io".into(),
                username: Some("editor1".into()),
                first_name: None,
                last_name: None,
                is_staff: true,
            },
        }
    }

    #[tokio::test]
    async fn save_then_load_restores_session() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("session.toml");

        save(&path, &session()).await.expect("save");
        let loaded = load(&path).await.expect("load");
        assert_eq!(loaded, Some(session()));

        remove(&path).await.expect("remove");
        assert_eq!(load(&path).await.expect("load after remove"), None);
        remove(&path).await.expect("second remove is a no-op");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.toml");
        tokio::fs::write(&path, "stale").await.expect("write");
        tokio::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644))
            .await
            .expect("widen");

        save(&path, &session()).await.expect("save");
        let mode = tokio::fs::metadata(&path)
            .await
            .expect("metadata")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(load(&path).await.expect("load"), Some(session()));

        let fresh = dir.path().join("fresh.toml");
        save(&fresh, &session()).await.expect("save fresh");
        let mode = std::fs::metadata(&fresh).expect("metadata").permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[tokio::test]
    async fn garbage_file_is_a_session_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.toml");
        tokio::fs::write(&path, "access_token = [").await.expect("write");

        let err = load(&path).await.expect_err("parse failure");
        assert!(matches!(err, InfraError::Session { .. }));
    }
}
