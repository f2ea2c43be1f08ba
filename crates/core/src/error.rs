#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("unknown condition: {0}")]
    UnknownCondition(String),
    #[error("invalid condition: {0}")]
    InvalidCondition(String),
    #[error("invalid tooth number: {0}")]
    InvalidToothNumber(#[from] odonto_types::ToothNumberError),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("chart not found: {0}")]
    ChartNotFound(String),

    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to write chart file: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read chart file: {0}")]
    FileRead(std::io::Error),
    #[error("chart file error: {0}")]
    Wire(#[from] chart_wire::WireError),
    #[error(
        "create failed and cleanup also failed (path: {path}): create={create_error}; cleanup={cleanup_error}",
        path = path.display()
    )]
    CleanupAfterCreateFailed {
        path: std::path::PathBuf,
        #[source]
        create_error: Box<ChartError>,
        cleanup_error: std::io::Error,
    },
    #[error(
        "save failed and restoring the previous chart file also failed (path: {path}): save={save_error}; restore={restore_error}",
        path = path.display()
    )]
    RestoreAfterSaveFailed {
        path: std::path::PathBuf,
        #[source]
        save_error: Box<ChartError>,
        restore_error: std::io::Error,
    },

    #[error("failed to initialise git repository: {0}")]
    GitInit(git2::Error),
    #[error("failed to open git repository: {0}")]
    GitOpen(git2::Error),
    #[error("failed to access git index: {0}")]
    GitIndex(git2::Error),
    #[error("failed to add file to git index: {0}")]
    GitAdd(git2::Error),
    #[error("failed to write git tree: {0}")]
    GitWriteTree(git2::Error),
    #[error("failed to find git tree: {0}")]
    GitFindTree(git2::Error),
    #[error("failed to create git signature: {0}")]
    GitSignature(git2::Error),
    #[error("failed to create git commit: {0}")]
    GitCommit(git2::Error),
    #[error("failed to get git head: {0}")]
    GitHead(git2::Error),
    #[error("failed to set git head: {0}")]
    GitSetHead(git2::Error),
    #[error("failed to peel git commit: {0}")]
    GitPeel(git2::Error),
    #[error("failed to walk git history: {0}")]
    GitRevwalk(git2::Error),
    #[error("invalid timestamp")]
    InvalidTimestamp,

    #[error("missing Care-Location")]
    MissingCareLocation,
    #[error("invalid Care-Location")]
    InvalidCareLocation,
}

pub type ChartResult<T> = std::result::Result<T, ChartError>;
