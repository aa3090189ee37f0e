//! state resources to raw hcl blocks, one resource at a time
use crate::address::{AddressError, Mode, ResourceAddress};
use crate::node::Object;
use crate::reconstruct::{reconstruct, ReconstructError};
use crate::render::{render_block, RenderError};
use crate::state::{FlatAttributes, State};

/// A resource ready to be rendered
#[derive(Debug, derive_new::new)]
pub struct ResourceRecord {
    pub mode: Mode,
    pub type_name: String,
    pub local_name: String,
    pub attributes: Object,
}

impl ResourceRecord {
    pub fn from_flat(address: &str, flat: &FlatAttributes) -> Result<Self, ResourceError> {
        let wrap = |kind: ResourceErrorKind| ResourceError {
            address: address.to_string(),
            kind,
        };

        let parsed: ResourceAddress = address.parse().map_err(|e: AddressError| wrap(e.into()))?;
        let attributes = reconstruct(flat).map_err(|e| wrap(e.into()))?;

        if let Some(index) = parsed.index {
            // `web.1` and a resource named `web_1` end up with the same label
            tracing::debug!(
                %address,
                index,
                label = %parsed.local_name(),
                "count index folded into label"
            );
        }

        Ok(Self::new(
            parsed.mode,
            parsed.type_name.clone(),
            parsed.local_name(),
            attributes,
        ))
    }

    pub fn render(&self) -> Result<String, RenderError> {
        render_block(
            self.mode.block_ident(),
            &[self.type_name.as_str(), self.local_name.as_str()],
            &self.attributes,
        )
    }
}

/// Reconstructs and renders one resource
pub fn generate_resource(address: &str, flat: &FlatAttributes) -> Result<String, ResourceError> {
    let record = ResourceRecord::from_flat(address, flat)?;
    record.render().map_err(|e| ResourceError {
        address: address.to_string(),
        kind: e.into(),
    })
}

/// Outcome for a single resource of the state
#[derive(Debug)]
pub struct Generated<'s> {
    pub module: &'s str,
    pub address: &'s str,
    pub result: Result<String, ResourceError>,
}

/// Generates every resource of `state` in state file order
///
/// A failing resource does not stop the iteration.
pub fn generate(state: &State) -> impl Iterator<Item = Generated<'_>> {
    state.resources().map(|(module, address, flat)| {
        tracing::debug!(%module, %address, "generate resource");
        Generated {
            module,
            address,
            result: generate_resource(address, flat),
        }
    })
}

#[derive(thiserror::Error, Debug)]
#[error("Unable to generate `{address}`")]
pub struct ResourceError {
    pub address: String,
    #[source]
    pub kind: ResourceErrorKind,
}

#[derive(thiserror::Error, Debug)]
pub enum ResourceErrorKind {
    #[error(transparent)]
    InvalidAddress(#[from] AddressError),
    #[error(transparent)]
    StructuralConflict(#[from] ReconstructError),
    #[error(transparent)]
    Render(#[from] RenderError),
}
