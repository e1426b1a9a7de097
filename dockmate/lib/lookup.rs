//! Finding containers and images.
//!
//! The `match_*` functions resolve a query against a snapshot list and depend only on the
//! matched record, never on its position. The `find_*` functions list through a Docker client
//! first.

use crate::{
    docker::{
        strip_digest_prefix, trim_container_name, Container, ContainerLifecycle, Image,
        ImageLookup, SHORT_ID_LEN,
    },
    DockmateError, DockmateResult,
};

//--------------------------------------------------------------------------------------------------
// Functions
//--------------------------------------------------------------------------------------------------

/// Returns `true` if `query` can be an id prefix: at least [`SHORT_ID_LEN`] hex characters.
pub fn is_id_prefix(query: &str) -> bool {
    query.len() >= SHORT_ID_LEN && query.chars().all(|c| c.is_ascii_hexdigit())
}

/// Finds the container named `name` (a leading `/` is ignored).
pub fn match_container_by_name<'a>(containers: &'a [Container], name: &str) -> Option<&'a Container> {
    let name = trim_container_name(name);
    containers.iter().find(|c| c.get_name() == name)
}

/// Finds the container whose name or id is `query`.
///
/// A name match wins. Otherwise `query` must equal an id, or be an id prefix of at least
/// [`SHORT_ID_LEN`] hex characters that no other container shares.
pub fn match_container<'a>(containers: &'a [Container], query: &str) -> DockmateResult<&'a Container> {
    if let Some(container) = match_container_by_name(containers, query) {
        return Ok(container);
    }

    if let Some(container) = containers.iter().find(|c| c.get_id() == query) {
        return Ok(container);
    }

    if !is_id_prefix(query) {
        return Err(DockmateError::ContainerNotFound(query.to_string()));
    }

    let candidates: Vec<&Container> = containers
        .iter()
        .filter(|c| c.get_id().starts_with(query))
        .collect();

    match candidates.as_slice() {
        [] => Err(DockmateError::ContainerNotFound(query.to_string())),
        [container] => Ok(container),
        _ => Err(DockmateError::AmbiguousId(
            query.to_string(),
            candidates.iter().map(|c| c.get_id().clone()).collect(),
        )),
    }
}

/// Finds the image tagged `reference` (`repo` or `repo:tag`, an absent tag meaning `latest`).
pub fn match_image<'a>(images: &'a [Image], reference: &str) -> Option<&'a Image> {
    images.iter().find(|image| image.matches(reference))
}

/// Finds the image whose digest is `id`, with or without its `sha256:` prefix.
///
/// A prefix of at least [`SHORT_ID_LEN`] hex characters is accepted if no other image shares it.
pub fn match_image_by_id<'a>(images: &'a [Image], id: &str) -> DockmateResult<&'a Image> {
    let hex = strip_digest_prefix(id);
    if let Some(image) = images.iter().find(|image| image.digest_hex() == hex) {
        return Ok(image);
    }

    if !is_id_prefix(hex) {
        return Err(DockmateError::ImageNotFound(id.to_string()));
    }

    let candidates: Vec<&Image> = images
        .iter()
        .filter(|image| image.digest_hex().starts_with(hex))
        .collect();

    match candidates.as_slice() {
        [] => Err(DockmateError::ImageNotFound(id.to_string())),
        [image] => Ok(image),
        _ => Err(DockmateError::AmbiguousId(
            id.to_string(),
            candidates.iter().map(|i| i.get_id().clone()).collect(),
        )),
    }
}

/// Finds the container whose name or id is `query`. See [`match_container`].
pub async fn find_container<C>(client: &C, query: &str) -> DockmateResult<Container>
where
    C: ContainerLifecycle + ?Sized,
{
    let containers = client.list_containers().await?;
    let container = match_container(&containers, query)?;
    tracing::debug!("found container {} ({})", container.get_name(), container.short_id());
    Ok(container.clone())
}

/// Finds the container named `name`, if any.
pub async fn find_container_by_name<C>(client: &C, name: &str) -> DockmateResult<Option<Container>>
where
    C: ContainerLifecycle + ?Sized,
{
    let containers = client.list_containers().await?;
    Ok(match_container_by_name(&containers, name).cloned())
}

/// Finds the image of `repo`, pinned to `tag` when a non-empty one is given.
///
/// Fails with [`DockmateError::ImageNotFound`] naming the `repo[:tag]` that was looked up.
pub async fn find_image<I>(client: &I, repo: &str, tag: Option<&str>) -> DockmateResult<Image>
where
    I: ImageLookup + ?Sized,
{
    let reference = match tag.filter(|tag| !tag.is_empty()) {
        Some(tag) => format!("{}:{}", repo, tag),
        None => repo.to_string(),
    };

    let images = client.list_images().await?;
    let image = match_image(&images, &reference)
        .ok_or_else(|| DockmateError::ImageNotFound(reference.clone()))?;

    tracing::debug!("resolved image {} to {}", reference, image.get_id());
    Ok(image.clone())
}

/// Finds the image whose digest is `id`. See [`match_image_by_id`].
pub async fn find_image_by_id<I>(client: &I, id: &str) -> DockmateResult<Image>
where
    I: ImageLookup + ?Sized,
{
    let images = client.list_images().await?;
    Ok(match_image_by_id(&images, id)?.clone())
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
