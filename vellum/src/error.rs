use thiserror::Error;
use vellum_types::SceneObjectCategory;

/// Reason why the scene object table refused an operation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SceneTableError {
    #[error("Scene can hold at most {} objects in total, limits ask for {requested}", u32::MAX)]
    TooManyObjects { requested: u64 },
    #[error("{:?} objects are {expected} bytes but {actual} bytes were given", category)]
    ObjectSize {
        category: SceneObjectCategory,
        expected: usize,
        actual: usize,
    },
}

/// Any error vellum can report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VellumError {
    #[error(transparent)]
    SceneTable(#[from] SceneTableError),
    /// An internal sizing or layout invariant does not hold. There is no recovery from this.
    #[error("Invariant violated: {0}")]
    Invariant(&'static str),
}
