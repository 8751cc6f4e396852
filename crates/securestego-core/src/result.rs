use crate::WorkflowError;

pub type Result<E> = std::result::Result<E, WorkflowError>;
