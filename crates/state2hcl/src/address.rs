//! resource addresses as used as keys of the state file
//!
//! - `aws_instance.web` a managed resource
//! - `data.aws_ami.ubuntu` a data source
//! - `aws_instance.web.1` one instance of a resource using `count`
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Managed,
    Data,
}

impl Mode {
    /// Identifier of the block declaring this kind of resource
    pub fn block_ident(&self) -> &'static str {
        match self {
            Mode::Managed => "resource",
            Mode::Data => "data",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceAddress {
    pub mode: Mode,
    pub type_name: String,
    pub name: String,
    pub index: Option<u64>,
}

impl ResourceAddress {
    /// Name to use as block label
    ///
    /// Counted instances get their index appended (`web_1`) since each one is
    /// written as a block of its own.
    pub fn local_name(&self) -> String {
        match self.index {
            Some(index) => format!("{}_{}", self.name, index),
            None => self.name.clone(),
        }
    }
}

impl FromStr for ResourceAddress {
    type Err = AddressError;

    fn from_str(address: &str) -> Result<Self, Self::Err> {
        let invalid = || AddressError::Invalid(address.to_string());

        let mut segments: Vec<&str> = address.split('.').collect();
        let mode = if segments.first() == Some(&"data") {
            segments.remove(0);
            Mode::Data
        } else {
            Mode::Managed
        };

        let index = match segments.len() {
            2 => None,
            3 => Some(segments[2].parse().map_err(|_| invalid())?),
            _ => return Err(invalid()),
        };

        if segments[0].is_empty() || segments[1].is_empty() {
            return Err(invalid());
        }

        Ok(Self {
            mode,
            type_name: segments[0].to_string(),
            name: segments[1].to_string(),
            index,
        })
    }
}

impl std::fmt::Display for ResourceAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.mode == Mode::Data {
            f.write_str("data.")?;
        }
        write!(f, "{}.{}", self.type_name, self.name)?;
        if let Some(index) = self.index {
            write!(f, ".{index}")?;
        }
        Ok(())
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum AddressError {
    #[error("`{0}` is not a resource address (expected <type>.<name>)")]
    Invalid(String),
}
