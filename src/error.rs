use thiserror::Error;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("invalid ORCID iD: {0}")]
    InvalidOrcid(String),
    #[error("config: {0}")]
    Config(String),
    #[error("no ORCID iD given (pass --orcid or set orcid_id in the config file)")]
    MissingOrcid,
    #[error("BibTeX parse error at byte {offset}: {message}")]
    Bibtex { offset: usize, message: String },
    #[error("work {put_code}: {message}")]
    Work { put_code: i64, message: String },
    #[error("`{program}` exited with status {code}")]
    ChildFailed { program: String, code: i32 },
    #[error("`{program}` terminated by signal")]
    ChildKilled { program: String },
}
