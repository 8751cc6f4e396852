use thiserror::Error;

/// The class an error belongs to, decides how it is presented.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ErrorKind {
    /// A required input is missing, caught before any network call.
    Validation,
    /// The remote service could not be reached or answered with a failure.
    Transport,
    /// Reading or writing local files failed.
    Io,
}

#[derive(Error, Debug)]
pub enum WorkflowError {
    /// Represents an encrypt submit without both cover and secret image
    #[error("Please upload both cover and secret images")]
    MissingInput,

    /// Represents a decrypt submit without a stego image
    #[error("Please upload a stego image")]
    MissingStego,

    /// Represents a password recovery without a password
    #[error("Please enter the password used during encryption")]
    MissingPassword,

    /// Represents an RSA recovery without a private key file
    #[error("Please upload your private key file")]
    MissingPrivateKey,

    /// Represents an RSA recovery without the wrapped session key
    #[error("Please paste the encrypted key you received")]
    MissingWrappedKey,

    /// Represents a failed or rejected request, carries the message to show
    #[error("{0}")]
    RequestFailed(String),

    /// Represents a submit while the previous one is still running
    #[error("A submission is already in progress")]
    SubmissionInFlight,

    /// Represents a file that does not pass the MIME filter of a slot
    #[error("File type '{0}' is not accepted here")]
    UnsupportedMedia(String),

    /// Represents an image reference that claims to be a data URI but is not decodable
    #[error("Image reference is not a valid data URI")]
    InvalidImageReference,

    /// Represents a failure to read from input.
    #[error("Read error")]
    ReadError { source: std::io::Error },

    /// Represents a failure to write target file.
    #[error("Write error")]
    WriteError { source: std::io::Error },
}

// io errors are not Clone, a copy keeps kind and message
impl Clone for WorkflowError {
    fn clone(&self) -> Self {
        match self {
            WorkflowError::MissingInput => WorkflowError::MissingInput,
            WorkflowError::MissingStego => WorkflowError::MissingStego,
            WorkflowError::MissingPassword => WorkflowError::MissingPassword,
            WorkflowError::MissingPrivateKey => WorkflowError::MissingPrivateKey,
            WorkflowError::MissingWrappedKey => WorkflowError::MissingWrappedKey,
            WorkflowError::RequestFailed(m) => WorkflowError::RequestFailed(m.clone()),
            WorkflowError::SubmissionInFlight => WorkflowError::SubmissionInFlight,
            WorkflowError::UnsupportedMedia(m) => WorkflowError::UnsupportedMedia(m.clone()),
            WorkflowError::InvalidImageReference => WorkflowError::InvalidImageReference,
            WorkflowError::ReadError { source } => WorkflowError::ReadError {
                source: copy_io_error(source),
            },
            WorkflowError::WriteError { source } => WorkflowError::WriteError {
                source: copy_io_error(source),
            },
        }
    }
}

fn copy_io_error(e: &std::io::Error) -> std::io::Error {
    std::io::Error::new(e.kind(), e.to_string())
}

impl WorkflowError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            WorkflowError::MissingInput
            | WorkflowError::MissingStego
            | WorkflowError::MissingPassword
            | WorkflowError::MissingPrivateKey
            | WorkflowError::MissingWrappedKey
            | WorkflowError::SubmissionInFlight
            | WorkflowError::UnsupportedMedia(_) => ErrorKind::Validation,
            WorkflowError::RequestFailed(_) | WorkflowError::InvalidImageReference => {
                ErrorKind::Transport
            }
            WorkflowError::ReadError { .. } | WorkflowError::WriteError { .. } => ErrorKind::Io,
        }
    }

    /// Local validation errors never reached the network and are fixed by correcting input.
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }
}
