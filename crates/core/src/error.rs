#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to read local storage: {0}")]
    StorageRead(std::io::Error),
    #[error("failed to write local storage: {0}")]
    StorageWrite(std::io::Error),
    #[error("failed to serialize local storage: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize local storage: {0}")]
    Deserialization(serde_json::Error),

    #[error("failed to read form file: {0}")]
    FormRead(std::io::Error),
    #[error("failed to parse form YAML: {0}")]
    FormYaml(serde_yaml::Error),
    #[error("failed to read rich text file: {0}")]
    RichTextRead(std::io::Error),

    #[error("failed to acquire render container: {0}")]
    RenderContainer(std::io::Error),
    #[error("failed to render PDF: {0}")]
    PdfRender(String),
    #[error("failed to write staged PDF: {0}")]
    PdfStage(std::io::Error),
    #[error("failed to create output directory: {0}")]
    OutputDirCreation(std::io::Error),
    #[error(
        "failed to save report to {path}: {source}",
        path = path.display()
    )]
    PdfSave {
        path: std::path::PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type ReportResult<T> = std::result::Result<T, ReportError>;
