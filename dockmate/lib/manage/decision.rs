use crate::{
    docker::{Container, Image},
    DockmateError, DockmateResult,
};

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// What managing a container comes down to, given what currently runs under its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Remove the existing container.
    Remove(Container),

    /// No container has the name yet, run a new one.
    Run,

    /// The existing container already runs the requested image.
    AlreadyRunning(Container),

    /// Replace the existing container with a new one.
    Replace(Container),
}

//--------------------------------------------------------------------------------------------------
// Methods
//--------------------------------------------------------------------------------------------------

impl Decision {
    /// Decides a removal of the container named `name`.
    pub fn for_removal(existing: Option<Container>, name: &str) -> DockmateResult<Self> {
        existing
            .map(Decision::Remove)
            .ok_or_else(|| DockmateError::ContainerNotFound(name.to_string()))
    }

    /// Decides how to get a container running `image`.
    ///
    /// Only the image digest is compared. Forcing replaces a container that already runs the image.
    pub fn for_image(existing: Option<Container>, image: &Image, force: bool) -> Self {
        match existing {
            None => Decision::Run,
            Some(container) if container.get_image_id() == image.get_id() && !force => {
                Decision::AlreadyRunning(container)
            }
            Some(container) => Decision::Replace(container),
        }
    }
}

//--------------------------------------------------------------------------------------------------
// Tests
//--------------------------------------------------------------------------------------------------
