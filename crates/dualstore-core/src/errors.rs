use dualstore_core_types::RequestId;
use thiserror::Error;

/// Result type alias using the canonical ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code usable for programmatic handling,
/// tests and external responses. The router never introduces kinds of its
/// own on the data path; these come from construction, decoration and the
/// backing repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Structural/Validation
    InvalidInput,
    NotFound,
    AlreadyExists,
    UnknownModel,
    InvalidDocument,

    // Construction/Decoration
    MissingCollaborator,
    DecorationFailed,

    // Integration/IO
    Serialization,
    Persistence,
    Sync,
    Config,
    Io,
    Concurrency,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::AlreadyExists => "ERR_ALREADY_EXISTS",
            ExErrorKind::UnknownModel => "ERR_UNKNOWN_MODEL",
            ExErrorKind::InvalidDocument => "ERR_INVALID_DOCUMENT",
            ExErrorKind::MissingCollaborator => "ERR_MISSING_COLLABORATOR",
            ExErrorKind::DecorationFailed => "ERR_DECORATION_FAILED",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Sync => "ERR_SYNC",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling plus optional
/// context (operation, model, record) for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    model_name: Option<String>,
    record_id: Option<String>,
    request_id: Option<RequestId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            model_name: None,
            record_id: None,
            request_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add model name context
    pub fn with_model_name(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = Some(model_name.into());
        self
    }

    /// Add record ID context
    pub fn with_record_id(mut self, id: impl Into<String>) -> Self {
        self.record_id = Some(id.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn model_name(&self) -> Option<&str> {
        self.model_name.as_deref()
    }

    pub fn record_id(&self) -> Option<&str> {
        self.record_id.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(model_name) = &self.model_name {
            write!(f, " (model_name: {})", model_name)?;
        }
        if let Some(record_id) = &self.record_id {
            write!(f, " (record_id: {})", record_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain failures raised by repositories, adapters and the router builder
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DualStoreError {
    /// No record with this id exists for the model
    #[error("Record not found: {model_name}:{id}")]
    RecordNotFound { model_name: String, id: String },

    /// A record with this id is already loaded
    #[error("Record already exists: {model_name}:{id}")]
    DuplicateRecord { model_name: String, id: String },

    /// The record has no id, but the operation needs one
    #[error("Record of model {model_name} has no id")]
    MissingRecordId { model_name: String },

    /// No adapter or serializer is registered for the model
    #[error("No {facility} registered for model {model_name}")]
    UnknownModel {
        model_name: String,
        facility: String,
    },

    /// A required collaborator was not supplied at construction
    #[error("Missing collaborator: {collaborator}")]
    MissingCollaborator { collaborator: String },

    /// Wrapping an operation with synchronization failed
    #[error("Cannot decorate {op}: {reason}")]
    DecorationFailed { op: String, reason: String },

    /// The payload is not a well-formed document
    #[error("Invalid document: {reason}")]
    InvalidDocument { reason: String },

    /// Configuration could not be read or parsed
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// A lock guarding in-memory state was poisoned
    #[error("Lock poisoned: {resource}")]
    LockPoisoned { resource: String },
}

impl From<DualStoreError> for ExError {
    fn from(err: DualStoreError) -> Self {
        let message = err.to_string();
        match err {
            DualStoreError::RecordNotFound { model_name, id } => {
                ExError::new(ExErrorKind::NotFound)
                    .with_model_name(model_name)
                    .with_record_id(id)
                    .with_message(message)
            }
            DualStoreError::DuplicateRecord { model_name, id } => {
                ExError::new(ExErrorKind::AlreadyExists)
                    .with_model_name(model_name)
                    .with_record_id(id)
                    .with_message(message)
            }
            DualStoreError::MissingRecordId { model_name } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_model_name(model_name)
                    .with_message(message)
            }
            DualStoreError::UnknownModel { model_name, .. } => {
                ExError::new(ExErrorKind::UnknownModel)
                    .with_model_name(model_name)
                    .with_message(message)
            }
            DualStoreError::MissingCollaborator { .. } => {
                ExError::new(ExErrorKind::MissingCollaborator)
                    .with_op("router_build")
                    .with_message(message)
            }
            DualStoreError::DecorationFailed { op, .. } => {
                ExError::new(ExErrorKind::DecorationFailed)
                    .with_op(op)
                    .with_message(message)
            }
            DualStoreError::InvalidDocument { .. } => {
                ExError::new(ExErrorKind::InvalidDocument).with_message(message)
            }
            DualStoreError::InvalidConfig { .. } => {
                ExError::new(ExErrorKind::Config).with_message(message)
            }
            DualStoreError::LockPoisoned { .. } => {
                ExError::new(ExErrorKind::Concurrency).with_message(message)
            }
        }
    }
}
