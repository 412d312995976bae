use thiserror::Error;

/// The one failure the selection core reports: no eligible ordinal exists.
///
/// Raised when constructing an algorithm over an empty pool and when every
/// ordinal has been retained. Routine outcomes of redundant calls — retaining
/// an ordinal twice, recovering one that was never retained — are booleans,
/// not errors.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("no variant")]
    NoVariant,
}
