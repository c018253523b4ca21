pub type UnicornResult<T> = Result<T, UnicornError>;

#[derive(thiserror::Error, Debug)]
pub enum UnicornError {
    /// Collected command-line problems, one message per line.
    #[error("{}", .0.join("\n"))]
    Usage(Vec<String>),

    /// The named image file is absent or not a decodable PNG.
    #[error("unicornleap - valid PNG not found: ~/.unicornleap/{0}")]
    Image(String),

    #[error("animation error: {0}")]
    Animation(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl UnicornError {
    pub fn usage(errors: Vec<String>) -> Self {
        Self::Usage(errors)
    }

    pub fn image(filename: impl Into<String>) -> Self {
        Self::Image(filename.into())
    }

    pub fn animation(msg: impl Into<String>) -> Self {
        Self::Animation(msg.into())
    }

    /// Process exit status for this error: usage problems exit 1, a missing
    /// or undecodable image exits 127.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage(_) => 1,
            Self::Image(_) => 127,
            Self::Animation(_) | Self::Other(_) => 1,
        }
    }
}
