use thiserror::Error;

#[derive(Error, Debug)]
pub enum StypeError {
    #[error("IO Error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON Parsing Error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Reference text is empty after trimming")]
    EmptyText,

    #[error("Unknown bundled text: {0}")]
    UnknownText(String),

    #[error("Logging Error: {0}")]
    Logging(String),
}

pub type Result<T> = std::result::Result<T, StypeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_errors_convert() {
        let err: StypeError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(err.to_string().starts_with("IO Error"));
    }

    #[test]
    fn unknown_text_names_the_passage() {
        let err = StypeError::UnknownText("nope".into());
        assert_eq!(err.to_string(), "Unknown bundled text: nope");
    }
}
