use std::{env, path::PathBuf, time::Duration};

use super::{
    DEFAULT_DOCKER_TIMEOUT, DEFAULT_PROJECTS_DIR, DOCKMATE_DOCKER_TIMEOUT_ENV_VAR,
    DOCKMATE_PROJECTS_DIR_ENV_VAR,
};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Returns the Docker API call timeout, from `DOCKMATE_DOCKER_TIMEOUT` if it holds a positive
/// number of seconds, otherwise the default.
pub fn docker_timeout() -> Duration {
    match env::var(DOCKMATE_DOCKER_TIMEOUT_ENV_VAR) {
        Ok(value) => match value.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                tracing::warn!(
                    "{} is not a positive number of seconds ({}), using default: {:?}",
                    DOCKMATE_DOCKER_TIMEOUT_ENV_VAR,
                    value,
                    DEFAULT_DOCKER_TIMEOUT
                );
                DEFAULT_DOCKER_TIMEOUT
            }
        },
        Err(_) => DEFAULT_DOCKER_TIMEOUT,
    }
}

/// Returns the projects directory, from `DOCKMATE_PROJECTS_DIR` if set, otherwise the default.
pub fn projects_dir() -> PathBuf {
    env::var(DOCKMATE_PROJECTS_DIR_ENV_VAR)
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_PROJECTS_DIR))
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serial_test::serial;

    use super::*;

    #[test]
    #[serial]
    fn test_docker_timeout_from_env() {
        env::remove_var(DOCKMATE_DOCKER_TIMEOUT_ENV_VAR);
        assert_eq!(docker_timeout(), DEFAULT_DOCKER_TIMEOUT);

        env::set_var(DOCKMATE_DOCKER_TIMEOUT_ENV_VAR, "3");
        assert_eq!(docker_timeout(), Duration::from_secs(3));

        env::set_var(DOCKMATE_DOCKER_TIMEOUT_ENV_VAR, "soon");
        assert_eq!(docker_timeout(), DEFAULT_DOCKER_TIMEOUT);

        env::set_var(DOCKMATE_DOCKER_TIMEOUT_ENV_VAR, "0");
        assert_eq!(docker_timeout(), DEFAULT_DOCKER_TIMEOUT);

        env::remove_var(DOCKMATE_DOCKER_TIMEOUT_ENV_VAR);
    }

    #[test]
    #[serial]
    fn test_projects_dir_from_env() {
        env::remove_var(DOCKMATE_PROJECTS_DIR_ENV_VAR);
        assert_eq!(projects_dir(), PathBuf::from(DEFAULT_PROJECTS_DIR));

        env::set_var(DOCKMATE_PROJECTS_DIR_ENV_VAR, "/etc/dockmate");
        assert_eq!(projects_dir(), PathBuf::from("/etc/dockmate"));

        env::remove_var(DOCKMATE_PROJECTS_DIR_ENV_VAR);
    }
}
