use stamina_model::ClassificationVersion;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The registry has no levels for the version's family.
    #[error("unknown classification family: {version}")]
    UnknownFamily { version: ClassificationVersion },
}

pub type Result<T> = std::result::Result<T, CoreError>;
