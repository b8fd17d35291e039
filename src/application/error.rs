#[derive(Debug)]
pub enum ApplicationError {
    Configuration(String),
    Validation(String),
    PayloadTooLarge,
    NotFound(String),
    Ambiguous(String),
    Conflict(String),
    Transient(String),
    PermanentRemote(String),
    Unauthorized,
    Database(String),
}
