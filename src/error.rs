use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read sales file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to fetch sales data: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("CSV header missing required column '{0}'")]
    MissingColumn(&'static str),

    #[error("Invalid CSV input: {0}")]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Load(#[from] LoadError),
}
