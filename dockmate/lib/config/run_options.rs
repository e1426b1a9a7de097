use std::{fmt, str::FromStr};

use getset::Getters;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::DockmateError;

use super::Mapping;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// When Docker restarts a container that exited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RestartPolicy {
    /// Restart only when the container exits with a non-zero status.
    OnFailure,

    /// Always restart, unless the container was explicitly stopped.
    UnlessStopped,

    /// Always restart.
    Always,
}

/// Everything needed to create a container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder, Getters)]
#[getset(get = "pub with_prefix")]
pub struct RunOptions {
    /// The image to run, as `repo:tag`.
    #[builder(setter(into))]
    image: String,

    /// The name of the new container.
    #[builder(setter(into))]
    name: String,

    /// Bind mounts, host path to container path.
    #[serde(default)]
    #[builder(default)]
    volumes: Vec<Mapping>,

    /// Published ports, host port to container port.
    #[serde(default)]
    #[builder(default)]
    ports: Vec<Mapping>,

    /// Environment variables, in the order they are passed to the container.
    #[serde(default)]
    #[builder(default)]
    env: Vec<Mapping>,

    /// The restart policy, unset to use Docker's default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    restart: Option<RestartPolicy>,

    /// The network to attach the container to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default)]
    network: Option<String>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl RunOptions {
    /// Returns the environment as `KEY=VALUE` entries.
    ///
    /// A mapping with an empty value takes it from the process environment. Such a variable that
    /// is not set in the process environment is left out.
    pub fn env_list(&self) -> Vec<String> {
        self.env
            .iter()
            .filter_map(|mapping| {
                if !mapping.get_target().is_empty() {
                    return Some(mapping.to_env_string());
                }

                match std::env::var(mapping.get_source()) {
                    Ok(value) => Some(format!("{}={}", mapping.get_source(), value)),
                    Err(_) => {
                        tracing::warn!(
                            "environment variable {} is not set, leaving it out",
                            mapping.get_source()
                        );
                        None
                    }
                }
            })
            .collect()
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl FromStr for RestartPolicy {
    type Err = DockmateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "on-failure" => Ok(Self::OnFailure),
            "unless-stopped" => Ok(Self::UnlessStopped),
            "always" => Ok(Self::Always),
            _ => Err(DockmateError::InvalidRestartPolicy(s.to_string())),
        }
    }
}

impl fmt::Display for RestartPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::OnFailure => "on-failure",
            Self::UnlessStopped => "unless-stopped",
            Self::Always => "always",
        };

        write!(f, "{}", name)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
