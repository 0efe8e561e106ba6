//! Input path validation

use std::path::Path;

use crate::domain::errors::DomainError;

/// Input file validator
pub struct MediaValidator;

impl MediaValidator {
    /// Require `path` to name an existing regular file (symlinks followed)
    pub fn validate_input(path: &Path) -> Result<(), DomainError> {
        match std::fs::metadata(path) {
            Ok(metadata) if metadata.is_file() => Ok(()),
            _ => Err(DomainError::PathNotFound {
                path: path.to_path_buf(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_input() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("clip.mkv");
        std::fs::write(&file, b"not really media").unwrap();

        assert!(MediaValidator::validate_input(&file).is_ok());
        assert!(matches!(
            MediaValidator::validate_input(dir.path()),
            Err(DomainError::PathNotFound { .. })
        ));
        assert!(matches!(
            MediaValidator::validate_input(&dir.path().join("missing.mp4")),
            Err(DomainError::PathNotFound { .. })
        ));
    }
}
