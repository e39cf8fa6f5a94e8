use thiserror::Error;

/// Reason a physical device was rejected during selection.
#[derive(Debug, Error)]
#[error("Missing {0}.")]
pub struct SuitabilityError(pub &'static str);

#[derive(Debug, Error)]
pub enum ShaderError {
    #[error("SPIR-V length {0} is not a multiple of 4 bytes")]
    Misaligned(usize),
    #[error("SPIR-V magic number mismatch (found {0:#010x})")]
    BadMagic(u32),
    #[error("unrecognized shader extension on `{0}`")]
    UnknownKind(String),
    #[error("failed to compile `{name}`: {message}")]
    Compile { name: String, message: String },
}
