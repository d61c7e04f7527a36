use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteGradeError {
    /// Bad configuration — the only condition surfaced as a hard failure
    /// before a session starts. Everything else resolves to a best-effort
    /// assessment or session with an explicit status.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Evaluation error: {0}")]
    Evaluation(String),

    #[error("Fixer error: {0}")]
    Fixer(String),

    #[error("Report error: {0}")]
    Report(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
