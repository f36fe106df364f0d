//! Error handling for the FlyCapture2 Rust bindings

use std::fmt;

/// Result type for FlyCapture2 operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when working with FlyCapture2
#[derive(Debug)]
pub enum Error {
    /// An enumeration was registered with a name or code that is already taken
    DuplicateKey { table: String, key: String },
    /// A symbolic name or integer code is not present in a registered enumeration
    UnknownKey { table: String, key: String },
    /// A call descriptor was invoked with the wrong number of arguments
    ArityMismatch {
        call: &'static str,
        expected: usize,
        got: usize,
    },
    /// An argument could not be represented as the declared parameter type
    InvalidValue {
        call: &'static str,
        param: &'static str,
        detail: String,
    },
    /// A by-reference parameter was given a plain value instead of a caller-owned cell
    NotAddressable {
        call: &'static str,
        param: &'static str,
    },
    /// A call descriptor declares a signature shape the engine does not dispatch
    UnsupportedSignature { call: &'static str },
    /// An externally supplied schema document could not be parsed
    SchemaParse(serde_json::Error),
    /// The native FlyCapture2 library could not be loaded at runtime
    LibraryNotLoaded(libloading::Error),
    /// A requested symbol is missing from the symbol source
    SymbolNotFound { symbol: String },
    /// The native library could not allocate a context or image resource
    CreateFailed {
        resource: &'static str,
        code: i32,
        name: String,
    },
    /// The native connect call failed for the resolved camera handle
    ConnectFailed { code: i32, name: String },
    /// Format7 settings were rejected by validation before any native mutation
    InvalidConfig(String),
    /// Frame retrieval failed, or the empty-frame retry budget was exhausted
    CaptureFailed(String),
    /// Generic wrapped form of any nonzero native return code
    NativeCall {
        call: &'static str,
        code: i32,
        name: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::DuplicateKey { table, key } => {
                write!(f, "duplicate key {} in enumeration {}", key, table)
            }
            Error::UnknownKey { table, key } => {
                write!(f, "unknown key {} in enumeration {}", key, table)
            }
            Error::ArityMismatch {
                call,
                expected,
                got,
            } => {
                write!(f, "{} expects {} arguments, got {}", call, expected, got)
            }
            Error::InvalidValue { call, param, detail } => {
                write!(f, "{}: argument {} not representable: {}", call, param, detail)
            }
            Error::NotAddressable { call, param } => {
                write!(
                    f,
                    "{}: by-reference parameter {} needs a caller-owned cell, \
                     writes to a temporary would be lost",
                    call, param
                )
            }
            Error::UnsupportedSignature { call } => {
                write!(f, "{}: signature shape not supported by the call engine", call)
            }
            Error::SchemaParse(err) => write!(f, "schema document could not be parsed: {}", err),
            Error::LibraryNotLoaded(err) => {
                write!(f, "FlyCapture2 library could not be loaded: {}", err)
            }
            Error::SymbolNotFound { symbol } => {
                write!(f, "symbol {} not found in the native library", symbol)
            }
            Error::CreateFailed { resource, code, name } => {
                write!(f, "failed to create {}: error {} [{}]", resource, code, name)
            }
            Error::ConnectFailed { code, name } => {
                write!(f, "camera connect failed: error {} [{}]", code, name)
            }
            Error::InvalidConfig(msg) => write!(f, "invalid Format7 settings: {}", msg),
            Error::CaptureFailed(msg) => write!(f, "capture failed: {}", msg),
            Error::NativeCall { call, code, name } => {
                write!(f, "{} returned error {} [{}]", call, code, name)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::SchemaParse(err) => Some(err),
            Error::LibraryNotLoaded(err) => Some(err),
            _ => None,
        }
    }
}

impl From<libloading::Error> for Error {
    fn from(err: libloading::Error) -> Self {
        Error::LibraryNotLoaded(err)
    }
}
