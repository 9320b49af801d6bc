/// Parameter store failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterError {
    /// Name exceeds `PARAM_NAME_LEN`
    NameTooLong,
    UnknownParameter,
    /// Value kind differs from the registered kind
    TypeMismatch,
    /// All `MAX_PARAMS` slots are taken
    StoreFull,
    ReadOnly,
}

impl core::fmt::Display for ParameterError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ParameterError::NameTooLong => write!(f, "parameter name too long"),
            ParameterError::UnknownParameter => write!(f, "unknown parameter"),
            ParameterError::TypeMismatch => write!(f, "value kind does not match parameter"),
            ParameterError::StoreFull => write!(f, "parameter store full"),
            ParameterError::ReadOnly => write!(f, "parameter is read-only"),
        }
    }
}
