use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Both sides declare `property` with different structural tags.
    #[error("Can't compute effective type for {base} and {operand} because of conflicting properties {property}")]
    MergeConflict {
        base: String,
        operand: String,
        property: String,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
