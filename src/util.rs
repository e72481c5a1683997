/// Utility function to ensure output directories exist when needed
pub fn ensure_dir_exists<P: AsRef<std::path::Path>>(
    path: &P,
) -> std::io::Result<()> {
    let p = path.as_ref();
    if p.exists() {
        if p.is_dir() {
            tracing::debug!("exists: {p:?}");
            Ok(())
        } else {
            Err(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("not a directory: {p:?}"),
            ))
        }
    } else {
        tracing::info!("creating: {p:?}");
        std::fs::create_dir_all(p)
    }
}

#[cfg(test)]
mod unit_tests {
    use super::*;

    #[test]
    fn creates_nested() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        ensure_dir_exists(&nested).unwrap();
        assert!(nested.is_dir());
        ensure_dir_exists(&nested).unwrap();
    }

    #[test]
    fn file_in_the_way() {
        let file = tempfile::NamedTempFile::new().unwrap();
        assert!(ensure_dir_exists(&file.path()).is_err());
    }
}
