//! pretty printing of raw block text
//!
//! The raw text written by [crate::render] is parsed and printed again by
//! the [hcl] formatter which takes care of indentation and spacing.

/// Formats raw hcl text
///
/// The raw text is returned with the error so it can still be used.
pub fn format(raw: &str) -> Result<String, FormatError> {
    let body = hcl::parse(raw).map_err(|source| FormatError {
        raw: raw.to_string(),
        source,
    })?;

    hcl::format::to_string(&body).map_err(|source| FormatError {
        raw: raw.to_string(),
        source,
    })
}

#[derive(thiserror::Error, Debug)]
#[error("Unable to format generated hcl")]
pub struct FormatError {
    pub raw: String,
    #[source]
    pub source: hcl::Error,
}
