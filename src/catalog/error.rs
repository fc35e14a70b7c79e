use thiserror::Error;

/// Errors that prevent a catalog from being built at all.
///
/// Malformed cell content never ends up here, it is mapped to sentinels by
/// the field parsers instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("Required column '{field}' is missing (accepted names: {accepted})")]
    MissingColumn {
        field: &'static str,
        accepted: String,
    },
}
