use thiserror::Error;

pub type FieldsmithResult<T> = Result<T, FieldsmithError>;

#[derive(Error, Debug)]
pub enum FieldsmithError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Malformed reference: {0}")]
    MalformedReference(String),

    #[error("Circular dependency detected: {0}")]
    DependencyCycle(String),

    #[error("Unresolved dependency: {0}")]
    UnresolvedDependency(String),

    #[error("Transport failure: {0}")]
    Transport(String),

    #[error("Remote call failed: {0}")]
    RemoteCall(String),
}
