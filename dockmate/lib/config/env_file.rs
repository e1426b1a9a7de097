use std::path::{Path, PathBuf};

use crate::{utils::DEFAULT_ENV_FILENAME, DockmateResult};

use super::Mapping;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The extension of environment override files.
pub const ENV_FILE_EXTENSION: &str = "list";

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Returns the environment override file for `mode` in `dir`: `<mode>.list` if it exists,
/// otherwise `env.list` if it exists.
pub fn find_env_file(dir: impl AsRef<Path>, mode: &str) -> Option<PathBuf> {
    let dir = dir.as_ref();
    let mode_file = (!mode.is_empty()).then(|| dir.join(format!("{}.{}", mode, ENV_FILE_EXTENSION)));

    mode_file
        .into_iter()
        .chain(std::iter::once(dir.join(DEFAULT_ENV_FILENAME)))
        .find(|path| path.is_file())
}

/// Reads the `KEY=VALUE` entries of the environment override file for `mode` in `dir`.
///
/// Returns no entries when there is no override file.
pub fn load_env_file(dir: impl AsRef<Path>, mode: &str) -> DockmateResult<Vec<Mapping>> {
    let Some(path) = find_env_file(dir, mode) else {
        return Ok(Vec::new());
    };

    tracing::debug!("loading environment overrides from {}", path.display());

    dotenvy::from_path_iter(&path)?
        .map(|item| -> DockmateResult<Mapping> {
            let (key, value) = item?;
            Ok(Mapping::new(key, value))
        })
        .collect()
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_load_env_file_prefers_mode_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        fs::write(dir.path().join("prod.list"), "MODE=prod\n# comment\nTOKEN=\"a b\"\n")?;
        fs::write(dir.path().join("env.list"), "MODE=default\n")?;

        assert_eq!(
            load_env_file(dir.path(), "prod")?,
            vec![Mapping::new("MODE", "prod"), Mapping::new("TOKEN", "a b")]
        );
        assert_eq!(
            load_env_file(dir.path(), "dev")?,
            vec![Mapping::new("MODE", "default")]
        );
        assert_eq!(
            load_env_file(dir.path(), "")?,
            vec![Mapping::new("MODE", "default")]
        );

        Ok(())
    }

    #[test]
    fn test_load_env_file_without_file() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        assert!(find_env_file(dir.path(), "prod").is_none());
        assert!(load_env_file(dir.path(), "prod")?.is_empty());

        Ok(())
    }
}
