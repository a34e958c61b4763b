pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("a badge is already mounted for uid {uid}")]
    UidInUse { uid: String },

    #[error("profile fetch failed: {message}")]
    Fetch { message: String },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}
