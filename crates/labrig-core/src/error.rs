use thiserror::Error;

#[derive(Error, Debug)]
pub enum RigError {
    #[error(
        "GOOGLE_CLOUD_PROJECT is not set\nHint: run `gcloud config get-value project` and export it"
    )]
    ProjectIdNotSet,

    #[error("invalid zone '{0}': expected something like us-central1-a")]
    InvalidZone(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("template render error: {0}")]
    TemplateRender(#[from] tera::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, RigError>;
