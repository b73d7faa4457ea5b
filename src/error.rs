use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never got a response (DNS, refused connection, TLS, ...).
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
    #[error("server returned {status}: {message}")]
    Server { status: u16, message: String },
    /// 401 on an authenticated call. The token has already been cleared.
    #[error("session expired or unauthorized")]
    Unauthorized,
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            ApiError::Unauthorized => Some(401),
            _ => None,
        }
    }
}

/// Login failures, displayed with the message shown to the user.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LoginError {
    #[error("Usuario o contraseña incorrectos")]
    InvalidCredentials,
    #[error("Datos de entrada inválidos")]
    InvalidInput,
    #[error("Error del servidor. Inténtalo más tarde")]
    Server,
    #[error("Error de conexión. Verifica tu conexión a internet")]
    Connection,
    #[error("{0}")]
    Rejected(String),
    #[error("Error desconocido al iniciar sesión")]
    Unknown,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),
    #[error("invalid date `{0}`, expected YYYY-MM-DD")]
    InvalidDate(String),
    #[error("invalid time `{0}`, expected HH:MM")]
    InvalidTime(String),
    #[error("end time {end} must be after start time {start}")]
    EndNotAfterStart { start: String, end: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config line {line}: {content}")]
    InvalidLine { line: usize, content: String },
    #[error("unknown timezone `{0}`")]
    InvalidTimezone(String),
}

#[derive(Debug, Error)]
pub enum TokenStoreError {
    #[error("token store I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
