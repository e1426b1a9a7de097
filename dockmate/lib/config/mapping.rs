use std::{fmt, str::FromStr};

use getset::Getters;
use serde::{
    de::{self, MapAccess, Visitor},
    ser::SerializeMap,
    Deserialize, Deserializer, Serialize, Serializer,
};

use crate::DockmateError;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A single key-to-value association: a volume (`host path -> container path`), a port
/// (`host port -> container port`) or an environment variable (`KEY -> VALUE`).
///
/// The source is never empty. An empty target on an environment mapping means the value is taken
/// from the process environment.
///
/// ## Format
///
/// A mapping serializes as a map with a single entry, which is how configuration files store it:
///
/// ```yaml
/// volumes:
///   - /srv/data: /data
/// env:
///   - MODE: prod
///   - HOME:
/// ```
///
/// ## Examples
///
/// ```
/// use dockmate::config::Mapping;
///
/// let port = "8080:80".parse::<Mapping>().unwrap();
/// assert_eq!(port, Mapping::new("8080", "80"));
///
/// let env = Mapping::from_env_str("MODE=prod").unwrap();
/// assert_eq!(serde_json::to_string(&env).unwrap(), r#"{"MODE":"prod"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Getters)]
#[getset(get = "pub with_prefix")]
pub struct Mapping {
    /// The host side, or the variable name.
    source: String,

    /// The container side, or the variable value.
    target: String,
}

/// A scalar configuration value read as a string, whatever its YAML/JSON type.
struct Scalar(String);

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Mapping {
    /// Creates a new mapping.
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Parses a `KEY=VALUE` environment variable. The value may be empty.
    pub fn from_env_str(s: &str) -> Result<Self, DockmateError> {
        let (var, value) = s.split_once('=').unwrap_or((s, ""));
        if var.is_empty() {
            return Err(DockmateError::InvalidMapping(s.to_string()));
        }

        Ok(Self::new(var, value))
    }

    /// Returns the mapping as an environment variable entry, `KEY=VALUE`.
    pub fn to_env_string(&self) -> String {
        format!("{}={}", self.source, self.target)
    }

    /// Returns a port mapping whose host port is shifted by `offset`.
    ///
    /// The container side is kept as is. A host side that is not a port number, or a shifted port
    /// outside the valid range, is rejected.
    pub fn with_port_offset(&self, offset: i64) -> Result<Self, DockmateError> {
        let host: u16 = self
            .source
            .parse()
            .map_err(|_| DockmateError::InvalidPortMapping(self.to_string()))?;

        let shifted = u16::try_from(i64::from(host) + offset)
            .ok()
            .filter(|port| *port != 0)
            .ok_or_else(|| {
                DockmateError::InvalidPortMapping(format!("{} shifted by {}", self, offset))
            })?;

        Ok(Self::new(shifted.to_string(), self.target.clone()))
    }
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl FromStr for Mapping {
    type Err = DockmateError;

    /// Parses `source:target`, splitting on the first `:`. A lone `source` maps to itself.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (source, target) = s.split_once(':').unwrap_or((s, s));
        if source.is_empty() || target.is_empty() {
            return Err(DockmateError::InvalidMapping(s.to_string()));
        }

        Ok(Self::new(source, target))
    }
}

impl fmt::Display for Mapping {
    /// Formats the mapping as "source:target".
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.source, self.target)
    }
}

impl Serialize for Mapping {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.source, &self.target)?;
        map.end()
    }
}

impl<'de> Deserialize<'de> for Mapping {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct MappingVisitor;

        impl<'de> Visitor<'de> for MappingVisitor {
            type Value = Mapping;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a map with a single entry")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let (Scalar(source), target) = map
                    .next_entry::<Scalar, Option<Scalar>>()?
                    .ok_or_else(|| de::Error::invalid_length(0, &self))?;

                if map.next_key::<de::IgnoredAny>()?.is_some() {
                    return Err(de::Error::invalid_length(2, &self));
                }

                if source.is_empty() {
                    return Err(de::Error::custom("mapping source must not be empty"));
                }

                Ok(Mapping::new(
                    source,
                    target.map(|Scalar(t)| t).unwrap_or_default(),
                ))
            }
        }

        deserializer.deserialize_map(MappingVisitor)
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ScalarVisitor;

        impl Visitor<'_> for ScalarVisitor {
            type Value = Scalar;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a string, number or boolean")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(Scalar(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(Scalar(v.to_string()))
            }
        }

        deserializer.deserialize_any(ScalarVisitor)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_json_is_single_entry_object() -> anyhow::Result<()> {
        let mapping = Mapping::new("A", "1");
        let json = serde_json::to_string(&mapping)?;
        assert_eq!(json, r#"{"A":"1"}"#);
        assert_eq!(serde_json::from_str::<Mapping>(&json)?, mapping);

        Ok(())
    }

    #[test]
    fn test_mapping_yaml_is_single_entry_map() -> anyhow::Result<()> {
        let mapping = Mapping::new("A", "1");
        assert_eq!(serde_yaml::from_str::<Mapping>("A: \"1\"")?, mapping);

        // The serialized form must keep "1" a string so it reads back the same.
        let yaml = serde_yaml::to_string(&mapping)?;
        assert_eq!(yaml.trim(), "A: '1'");
        assert_eq!(serde_yaml::from_str::<Mapping>(&yaml)?, mapping);

        Ok(())
    }

    #[test]
    fn test_mapping_deserialize_accepts_scalars_and_null() -> anyhow::Result<()> {
        assert_eq!(
            serde_yaml::from_str::<Mapping>("8080: 80")?,
            Mapping::new("8080", "80")
        );
        assert_eq!(
            serde_yaml::from_str::<Mapping>("DEBUG: true")?,
            Mapping::new("DEBUG", "true")
        );
        assert_eq!(
            serde_yaml::from_str::<Mapping>("HOME:")?,
            Mapping::new("HOME", "")
        );
        assert_eq!(
            serde_json::from_str::<Mapping>(r#"{"HOME":null}"#)?,
            Mapping::new("HOME", "")
        );

        Ok(())
    }

    #[test]
    fn test_mapping_deserialize_rejects_other_shapes() {
        assert!(serde_json::from_str::<Mapping>("{}").is_err());
        assert!(serde_json::from_str::<Mapping>(r#"{"A":"1","B":"2"}"#).is_err());
        assert!(serde_json::from_str::<Mapping>(r#"{"":"1"}"#).is_err());
        assert!(serde_json::from_str::<Mapping>(r#""A:1""#).is_err());
        assert!(serde_json::from_str::<Mapping>(r#"{"A":[1]}"#).is_err());
    }

    #[test]
    fn test_mapping_from_str() {
        assert_eq!(
            "/srv/data:/data".parse::<Mapping>().unwrap(),
            Mapping::new("/srv/data", "/data")
        );
        assert_eq!(
            "8080".parse::<Mapping>().unwrap(),
            Mapping::new("8080", "8080")
        );
        assert!("".parse::<Mapping>().is_err());
        assert!(":80".parse::<Mapping>().is_err());
        assert!("80:".parse::<Mapping>().is_err());
    }

    #[test]
    fn test_mapping_from_env_str() {
        assert_eq!(
            Mapping::from_env_str("MODE=prod").unwrap(),
            Mapping::new("MODE", "prod")
        );
        assert_eq!(
            Mapping::from_env_str("URL=a=b").unwrap(),
            Mapping::new("URL", "a=b")
        );
        assert_eq!(
            Mapping::from_env_str("HOME").unwrap(),
            Mapping::new("HOME", "")
        );
        assert!(Mapping::from_env_str("=value").is_err());
        assert_eq!(Mapping::new("MODE", "prod").to_env_string(), "MODE=prod");
    }

    #[test]
    fn test_mapping_with_port_offset() {
        let port = Mapping::new("8080", "80");
        assert_eq!(port.with_port_offset(0).unwrap(), port);
        assert_eq!(
            port.with_port_offset(100).unwrap(),
            Mapping::new("8180", "80")
        );
        assert_eq!(
            port.with_port_offset(-80).unwrap(),
            Mapping::new("8000", "80")
        );

        assert!(matches!(
            Mapping::new("http", "80").with_port_offset(1),
            Err(DockmateError::InvalidPortMapping(_))
        ));
        assert!(Mapping::new("65535", "80").with_port_offset(1).is_err());
        assert!(Mapping::new("10", "80").with_port_offset(-10).is_err());
    }
}
