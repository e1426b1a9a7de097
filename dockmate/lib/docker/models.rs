use bollard::models::{ContainerInspectResponse, ContainerSummary, ImageSummary};
use getset::Getters;
use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

//--------------------------------------------------------------------------------------------------
// Constants
//--------------------------------------------------------------------------------------------------

/// The number of characters of a container id shown as its short id.
pub const SHORT_ID_LEN: usize = 12;

/// The tag an untagged image reference implies.
pub const DEFAULT_TAG: &str = "latest";

/// The repo tag Docker reports for dangling images.
const NONE_REPO_TAG: &str = "<none>:<none>";

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// A read-only snapshot of a container, taken when it was listed or inspected.
///
/// The snapshot goes stale as soon as the container changes; query again for fresh state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TypedBuilder, Getters)]
#[getset(get = "pub with_prefix")]
pub struct Container {
    /// The full container id.
    #[builder(setter(into))]
    id: String,

    /// The container's primary name, without the leading `/`.
    #[builder(setter(transform = |name: impl AsRef<str>| trim_container_name(name.as_ref()).to_string()))]
    name: String,

    /// The image reference the container was created from.
    #[builder(default, setter(into))]
    #[serde(default)]
    image: String,

    /// The `sha256:` digest of the container's image.
    #[builder(setter(into))]
    image_id: String,

    /// The container's state, e.g. `running` or `exited`.
    #[builder(default, setter(into))]
    #[serde(default)]
    state: String,
}

/// A read-only snapshot of a local image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
#[getset(get = "pub with_prefix")]
pub struct Image {
    /// The `sha256:` digest of the image.
    id: String,

    /// The first `repo:tag` pair of the image, empty for untagged images.
    full_name: String,

    /// The repo part of `full_name`.
    name: String,

    /// The tag part of `full_name`, empty when absent.
    tag: String,

    /// Every `repo:tag` pair of the image.
    tags: Vec<String>,
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Container {
    /// Returns the first [`SHORT_ID_LEN`] characters of the id.
    pub fn short_id(&self) -> &str {
        self.id.get(..SHORT_ID_LEN).unwrap_or(&self.id)
    }

    /// Returns `true` if the container is running.
    pub fn is_running(&self) -> bool {
        self.state == "running"
    }
}

impl Image {
    /// Creates a new image snapshot from its digest and `repo:tag` pairs.
    ///
    /// Dangling `<none>:<none>` pairs are dropped.
    pub fn new(id: impl Into<String>, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let tags: Vec<String> = tags
            .into_iter()
            .map(Into::into)
            .filter(|tag| !tag.is_empty() && tag != NONE_REPO_TAG)
            .collect();

        let full_name = tags.first().cloned().unwrap_or_default();
        let (name, tag) = split_reference(&full_name);

        Self {
            id: id.into(),
            name: name.to_string(),
            tag: tag.to_string(),
            full_name,
            tags,
        }
    }

    /// Returns `true` if one of the image's tags matches `reference`.
    ///
    /// A reference without a tag matches the `latest` tag.
    pub fn matches(&self, reference: &str) -> bool {
        let (repo, tag) = split_reference(reference);
        let tag = if tag.is_empty() { DEFAULT_TAG } else { tag };

        self.tags.iter().any(|candidate| {
            let (candidate_repo, candidate_tag) = split_reference(candidate);
            let candidate_tag = if candidate_tag.is_empty() {
                DEFAULT_TAG
            } else {
                candidate_tag
            };

            candidate_repo == repo && candidate_tag == tag
        })
    }

    /// Returns the digest without its `sha256:` prefix.
    pub fn digest_hex(&self) -> &str {
        strip_digest_prefix(&self.id)
    }
}

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Splits an image reference into its repo and tag.
///
/// Only a `:` after the last `/` separates a tag, so registry ports are kept in the repo.
///
/// ## Examples
///
/// ```
/// use dockmate::docker::split_reference;
///
/// assert_eq!(split_reference("my-image:1"), ("my-image", "1"));
/// assert_eq!(split_reference("my-image"), ("my-image", ""));
/// assert_eq!(split_reference("localhost:5000/app"), ("localhost:5000/app", ""));
/// ```
pub fn split_reference(reference: &str) -> (&str, &str) {
    let name_start = reference.rfind('/').map_or(0, |i| i + 1);
    match reference[name_start..].rfind(':') {
        Some(i) => {
            let split = name_start + i;
            (&reference[..split], &reference[split + 1..])
        }
        None => (reference, ""),
    }
}

/// Strips the leading `/` Docker puts in front of container names.
pub fn trim_container_name(name: &str) -> &str {
    name.strip_prefix('/').unwrap_or(name)
}

/// Strips the `sha256:` prefix of a digest.
pub fn strip_digest_prefix(digest: &str) -> &str {
    digest.strip_prefix("sha256:").unwrap_or(digest)
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl From<ContainerSummary> for Container {
    fn from(summary: ContainerSummary) -> Self {
        let name = summary
            .names
            .as_deref()
            .and_then(<[String]>::first)
            .map(|name| trim_container_name(name).to_string())
            .unwrap_or_default();

        Self {
            id: summary.id.unwrap_or_default(),
            name,
            image: summary.image.unwrap_or_default(),
            image_id: summary.image_id.unwrap_or_default(),
            state: summary.state.unwrap_or_default(),
        }
    }
}

impl From<ContainerInspectResponse> for Container {
    fn from(response: ContainerInspectResponse) -> Self {
        let name = response
            .name
            .as_deref()
            .map(|name| trim_container_name(name).to_string())
            .unwrap_or_default();

        let image = response
            .config
            .and_then(|config| config.image)
            .unwrap_or_default();

        let state = response
            .state
            .and_then(|state| state.status)
            .map(|status| status.to_string())
            .unwrap_or_default();

        Self {
            id: response.id.unwrap_or_default(),
            name,
            image,
            image_id: response.image.unwrap_or_default(),
            state,
        }
    }
}

impl From<ImageSummary> for Image {
    fn from(summary: ImageSummary) -> Self {
        Image::new(summary.id, summary.repo_tags)
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
