use std::path::Path;

use getset::Getters;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::{DockmateError, DockmateResult};

use super::{Mapping, RestartPolicy};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// The stored configuration of a managed container.
///
/// ## Format
///
/// ```yaml
/// image_repo: my-service
/// container_name: svc
/// network: backend
/// base_port: 8000
/// port_offset: 100
/// ports: [80, 443]
/// volumes:
///   - /srv/svc: /data
/// env:
///   - LOG_LEVEL: info
/// restart: unless-stopped
/// modes: [prod, dev]
/// ```
///
/// With the configuration above, mode `prod` runs container `svc-prod` publishing `8000:80` and
/// `8001:443`, and mode `dev` runs `svc-dev` publishing `8100:80` and `8101:443`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TypedBuilder, Getters)]
#[getset(get = "pub with_prefix")]
pub struct ManageConfig {
    /// The image repository to run, without a tag.
    #[builder(setter(into))]
    image_repo: String,

    /// The container name, defaults to the image repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option, into))]
    container_name: Option<String>,

    /// The network to attach the container to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option, into))]
    network: Option<String>,

    /// When set, the i-th configured port is published on host port `base_port + i`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    base_port: Option<u16>,

    /// The host port shift between consecutive modes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    port_offset: Option<u16>,

    /// The container ports to publish.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    ports: Vec<u16>,

    /// Bind mounts, host path to container path.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    volumes: Vec<Mapping>,

    /// Environment variables.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    env: Vec<Mapping>,

    /// The restart policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(strip_option))]
    restart: Option<RestartPolicy>,

    /// The deployment modes. Without any, a single implicit mode with no name is used.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[builder(default)]
    modes: Vec<String>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl ManageConfig {
    /// Parses a YAML configuration.
    pub fn from_yaml(yaml: &str) -> DockmateResult<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Serializes the configuration to YAML.
    pub fn to_yaml(&self) -> DockmateResult<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Reads a YAML configuration file.
    pub async fn load(path: impl AsRef<Path>) -> DockmateResult<Self> {
        let contents = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_yaml(&contents)
    }

    /// Returns the declared modes, or the single implicit mode `""` when none are declared.
    pub fn modes(&self) -> Vec<String> {
        if self.modes.is_empty() {
            vec![String::new()]
        } else {
            self.modes.clone()
        }
    }

    /// Resolves the requested mode to its index and name. No request selects the first mode.
    pub fn resolve_mode(&self, mode: Option<&str>) -> DockmateResult<(usize, String)> {
        let modes = self.modes();
        let Some(mode) = mode else {
            return Ok((0, modes[0].clone()));
        };

        modes
            .iter()
            .position(|candidate| candidate == mode)
            .map(|index| (index, mode.to_string()))
            .ok_or_else(|| DockmateError::UnknownMode {
                mode: mode.to_string(),
                modes: self.modes.clone(),
            })
    }

    /// Returns the name of the container for `mode`.
    ///
    /// The base name is `container_name`, or `image_repo` when unset. A non-empty mode is
    /// appended after a hyphen.
    pub fn container_name(&self, mode: &str) -> String {
        let base = self.container_name.as_deref().unwrap_or(&self.image_repo);
        if mode.is_empty() {
            base.to_string()
        } else {
            format!("{}-{}", base, mode)
        }
    }

    /// Returns the image reference to look up: the repo, pinned to `tag` when a non-empty one is
    /// given.
    pub fn image_reference(&self, tag: Option<&str>) -> String {
        match tag.filter(|tag| !tag.is_empty()) {
            Some(tag) => format!("{}:{}", self.image_repo, tag),
            None => self.image_repo.clone(),
        }
    }

    /// Returns the host port shift of the mode at `mode_index`.
    pub fn mode_port_offset(&self, mode_index: usize) -> i64 {
        i64::from(self.port_offset.unwrap_or(0)) * mode_index as i64
    }

    /// Returns the port mappings with `offset` applied to every host port.
    pub fn port_mappings(&self, offset: i64) -> DockmateResult<Vec<Mapping>> {
        self.ports
            .iter()
            .enumerate()
            .map(|(i, port)| {
                let host = match self.base_port {
                    Some(base) => i64::from(base) + i as i64,
                    None => i64::from(*port),
                };

                Mapping::new(host.to_string(), port.to_string()).with_port_offset(offset)
            })
            .collect()
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
image_repo: my-service
container_name: svc
network: backend
base_port: 8000
port_offset: 100
ports: [80, 443]
volumes:
  - /srv/svc: /data
env:
  - LOG_LEVEL: info
  - HOME:
restart: unless-stopped
modes: [prod, dev]
"#;

    #[test]
    fn test_manage_config_from_yaml() -> anyhow::Result<()> {
        let config = ManageConfig::from_yaml(CONFIG)?;
        assert_eq!(config.get_image_repo(), "my-service");
        assert_eq!(config.get_container_name().as_deref(), Some("svc"));
        assert_eq!(config.get_network().as_deref(), Some("backend"));
        assert_eq!(config.get_ports(), &vec![80, 443]);
        assert_eq!(config.get_volumes(), &vec![Mapping::new("/srv/svc", "/data")]);
        assert_eq!(
            config.get_env(),
            &vec![Mapping::new("LOG_LEVEL", "info"), Mapping::new("HOME", "")]
        );
        assert_eq!(*config.get_restart(), Some(RestartPolicy::UnlessStopped));
        assert_eq!(config.modes(), vec!["prod".to_string(), "dev".to_string()]);

        Ok(())
    }

    #[test]
    fn test_manage_config_round_trips_through_json_and_yaml() -> anyhow::Result<()> {
        let config = ManageConfig::from_yaml(CONFIG)?;

        let json = serde_json::to_string(&config)?;
        assert!(json.contains(r#""volumes":[{"/srv/svc":"/data"}]"#));
        assert_eq!(serde_json::from_str::<ManageConfig>(&json)?, config);

        let yaml = config.to_yaml()?;
        assert_eq!(ManageConfig::from_yaml(&yaml)?, config);

        Ok(())
    }

    #[test]
    fn test_manage_config_minimal() -> anyhow::Result<()> {
        let config = ManageConfig::from_yaml("image_repo: svc")?;
        assert_eq!(config.modes(), vec![String::new()]);
        assert_eq!(config.resolve_mode(None)?, (0, String::new()));
        assert_eq!(config.container_name(""), "svc");
        assert!(config.port_mappings(0)?.is_empty());

        assert!(ManageConfig::from_yaml("container_name: svc").is_err());

        Ok(())
    }

    #[test]
    fn test_manage_config_modes_and_names() -> anyhow::Result<()> {
        let config = ManageConfig::from_yaml(CONFIG)?;
        assert_eq!(config.resolve_mode(None)?, (0, "prod".to_string()));
        assert_eq!(config.resolve_mode(Some("dev"))?, (1, "dev".to_string()));
        assert!(matches!(
            config.resolve_mode(Some("staging")),
            Err(DockmateError::UnknownMode { .. })
        ));

        assert_eq!(config.container_name("prod"), "svc-prod");

        let unnamed = ManageConfig::builder().image_repo("my-service").build();
        assert_eq!(unnamed.container_name("dev"), "my-service-dev");

        Ok(())
    }

    #[test]
    fn test_manage_config_image_reference() {
        let config = ManageConfig::builder().image_repo("svc").build();
        assert_eq!(config.image_reference(None), "svc");
        assert_eq!(config.image_reference(Some("")), "svc");
        assert_eq!(config.image_reference(Some("2")), "svc:2");
    }

    #[test]
    fn test_manage_config_port_mappings() -> anyhow::Result<()> {
        let config = ManageConfig::from_yaml(CONFIG)?;
        assert_eq!(config.mode_port_offset(0), 0);
        assert_eq!(config.mode_port_offset(1), 100);
        assert_eq!(
            config.port_mappings(0)?,
            vec![Mapping::new("8000", "80"), Mapping::new("8001", "443")]
        );
        assert_eq!(
            config.port_mappings(100)?,
            vec![Mapping::new("8100", "80"), Mapping::new("8101", "443")]
        );

        let same = ManageConfig::builder()
            .image_repo("svc")
            .ports(vec![8080])
            .build();
        assert_eq!(same.port_mappings(1)?, vec![Mapping::new("8081", "8080")]);

        Ok(())
    }
}
