/// Broad failure category, used for exit codes and operator-facing wording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Negative amounts, payment above the opening balance, or a rejected tax year.
    InvalidInput,
    /// Category label outside the encoder vocabulary.
    UnknownCategory,
    /// Feature layout disagrees with what the scaler/classifier were fit on.
    ArtifactMismatch,
    /// An artifact file could not be read or parsed.
    ArtifactLoad,
    /// Terminal or stdio failure in the presentation layer.
    Terminal,
}

impl ErrorKind {
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::InvalidInput | ErrorKind::UnknownCategory => 2,
            ErrorKind::ArtifactLoad => 3,
            ErrorKind::ArtifactMismatch => 4,
            ErrorKind::Terminal => 5,
        }
    }

    /// Input errors can be fixed by the operator; everything else is configuration.
    pub fn is_recoverable(self) -> bool {
        matches!(self, ErrorKind::InvalidInput | ErrorKind::UnknownCategory)
    }
}

#[derive(Clone)]
pub struct AppError {
    kind: ErrorKind,
    message: String,
}

impl AppError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidInput, message)
    }

    pub fn unknown_category(label: &str) -> Self {
        Self::new(
            ErrorKind::UnknownCategory,
            format!("Unknown tax category '{label}'. Select one of the categories known to the encoder."),
        )
    }

    pub fn mismatch(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ArtifactMismatch, message)
    }

    pub fn load(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::ArtifactLoad, message)
    }

    pub fn terminal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Terminal, message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn exit_code(&self) -> u8 {
        self.kind.exit_code()
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("kind", &self.kind)
            .field("exit_code", &self.exit_code())
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
