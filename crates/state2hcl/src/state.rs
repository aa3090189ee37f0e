//! decoded state: module -> resource address -> flat attributes
//!
//! [State] only keeps what is needed to generate configuration. Modules and
//! resources keep the order of the state file so output is reproducible.
//!
//! Only the legacy state format (versions 1 to 3) stores flat attributes:
//!
//! ```json
//! {
//!   "version": 3,
//!   "modules": [{
//!     "path": ["root"],
//!     "resources": {
//!       "aws_instance.web": {
//!         "type": "aws_instance",
//!         "primary": { "id": "i-1", "attributes": { "ami": "ami-123" } }
//!       }
//!     }
//!   }]
//! }
//! ```
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::Path;

/// Attributes of one resource instance, `path = value`
pub type FlatAttributes = IndexMap<String, String>;

/// The last state version with flat attributes
pub const MAX_VERSION: u64 = 3;

#[derive(Default, Debug)]
pub struct State {
    modules: IndexMap<String, IndexMap<String, FlatAttributes>>,
}

impl State {
    /// Adds a resource, replacing an earlier one with the same address
    pub fn insert(
        &mut self,
        module: impl Into<String>,
        address: impl Into<String>,
        attributes: FlatAttributes,
    ) {
        self.modules
            .entry(module.into())
            .or_default()
            .insert(address.into(), attributes);
    }

    /// All resources in state file order
    pub fn resources(&self) -> impl Iterator<Item = StateResource<'_>> {
        self.modules.iter().flat_map(|(module, resources)| {
            resources
                .iter()
                .map(move |(address, attributes)| (module.as_str(), address.as_str(), attributes))
        })
    }

    pub fn module_count(&self) -> usize {
        self.modules.len()
    }
}

impl State {
    pub fn load_file(file_path: &Path) -> Result<Self, DecodeError> {
        let file_path = file_path.canonicalize()?;
        tracing::info!(path=%file_path.display(), "loading state file");

        let file = std::fs::File::open(&file_path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader(reader: impl std::io::Read) -> Result<Self, DecodeError> {
        let state_file: StateFile = serde_json::from_reader(reader)?;
        state_file.try_into()
    }

    pub fn from_json(json: &str) -> Result<Self, DecodeError> {
        let state_file: StateFile = serde_json::from_str(json)?;
        state_file.try_into()
    }
}

#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    #[error("IO error")]
    IoError(#[from] std::io::Error),
    #[error("Unable to parse state file")]
    JsonParseFailed(#[from] serde_json::Error),
    #[error("State version {0} is not supported, flat attributes exist up to version 3")]
    UnsupportedVersion(u64),
}

#[derive(Deserialize)]
struct StateFile {
    version: u64,
    #[serde(default)]
    modules: Vec<ModuleState>,
}

#[derive(Deserialize)]
struct ModuleState {
    #[serde(default)]
    path: Vec<String>,
    #[serde(default)]
    resources: IndexMap<String, ResourceState>,
}

#[derive(Deserialize)]
struct ResourceState {
    primary: Option<InstanceState>,
}

#[derive(Deserialize)]
struct InstanceState {
    #[serde(default)]
    attributes: FlatAttributes,
}

impl TryFrom<StateFile> for State {
    type Error = DecodeError;

    fn try_from(value: StateFile) -> Result<Self, Self::Error> {
        if value.version > MAX_VERSION {
            return Err(DecodeError::UnsupportedVersion(value.version));
        }

        let mut state = State::default();
        for module in value.modules {
            let module_id = if module.path.is_empty() {
                "root".to_string()
            } else {
                module.path.join(".")
            };

            for (address, resource) in module.resources {
                let Some(primary) = resource.primary else {
                    tracing::debug!(module=%module_id, %address, "no primary instance, skipped");
                    continue;
                };

                state.insert(module_id.clone(), address, primary.attributes);
            }
        }

        Ok(state)
    }
}

/// Utility macro to create a [State] with resources in the root module
///
/// ```
/// # use state2hcl::state;
/// let state = state! {
///     "aws_instance.web" => { "ami" => "ami-123", "tags.Name" => "web1" },
///     "aws_eip.ip" => {},
/// };
/// assert_eq!(state.resources().count(), 2);
/// ```
#[macro_export]
macro_rules! state {
    { $($address:expr => { $($key:expr => $value:expr),* $(,)? }),* $(,)? } => {{
        let mut state = $crate::state::State::default();
        $(
            state.insert(
                "root",
                $address,
                [$(($key.to_string(), $value.to_string())),*].into_iter().collect(),
            );
        )*
        state
    }};
}

/// module, resource address, attributes
pub type StateResource<'a> = (&'a str, &'a str, &'a FlatAttributes);
