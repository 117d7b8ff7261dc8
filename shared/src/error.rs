#![allow(dead_code)]

use std::io;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, PartialEq)]
#[non_exhaustive]
pub enum Error {
    // Name errors
    #[error("name must not be empty")]
    ErrEmptyName,
    #[error("name '{0}' is invalid, unexpected leading dot")]
    ErrLeadingDot(String),
    #[error("fully-qualified name '{0}' is invalid, missing trailing dot")]
    ErrMissingTrailingDot(String),
    #[error("unqualified name '{0}' is invalid, unexpected trailing dot")]
    ErrUnexpectedTrailingDot(String),
    #[error("label '{0}' is invalid, contains unexpected dots")]
    ErrDotsInLabel(String),
    #[error("name '{0}' is already fully-qualified and can not be joined")]
    ErrJoinQualified(String),
    #[error("service type '{0}' is invalid, expected two underscore-prefixed labels")]
    ErrInvalidServiceType(String),

    // Service instance errors
    #[error("target port must not be zero")]
    ErrZeroTargetPort,
    #[error("text key '{0}' is invalid")]
    ErrInvalidTextKey(String),
    #[error("instance '{0}' is stored under the wrong key")]
    ErrMisfiledInstance(String),
    #[error("service '{0}' is stored under the wrong key")]
    ErrMisfiledService(String),

    // DNS message packing/unpacking errors
    #[error("insufficient data for base length type")]
    ErrBaseLen,
    #[error("insufficient data for calculated length type")]
    ErrCalcLen,
    #[error("segment prefix is reserved")]
    ErrReserved,
    #[error("too many pointers (>10)")]
    ErrTooManyPtr,
    #[error("invalid pointer")]
    ErrInvalidPtr,
    #[error("segment length too long")]
    ErrSegTooLong,
    #[error("zero length segment")]
    ErrZeroSegLen,
    #[error("name too long")]
    ErrNameTooLong,
    #[error("name is not in canonical format (it must end with a .)")]
    ErrNonCanonicalName,
    #[error("character string exceeds maximum length (255)")]
    ErrStringTooLong,
    #[error("resource length too long")]
    ErrResourceLen,
    #[error("resource too long")]
    ErrResTooLong,
    #[error("too many Questions to pack (>65535)")]
    ErrTooManyQuestions,
    #[error("too many Answers to pack (>65535)")]
    ErrTooManyAnswers,
    #[error("too many Authorities to pack (>65535)")]
    ErrTooManyAuthorities,
    #[error("too many Additionals to pack (>65535)")]
    ErrTooManyAdditionals,
    #[error("nil resource body")]
    ErrNilResourceBody,

    // mDNS query validation errors
    #[error("OPCODE must be zero (query) in mDNS messages")]
    ErrNonZeroOpcode,
    #[error("RCODE must be zero in mDNS messages")]
    ErrNonZeroRcode,
    #[error("DNS message is a response")]
    ErrMessageIsResponse,

    // Transport and responder errors
    #[error("both IPv4 and IPv6 are disabled")]
    ErrNoTransportEnabled,
    #[error("unable to join the multicast group on any interface")]
    ErrGroupJoinFailed,
    #[error("no multicast interface is available")]
    ErrNoInterface,
    #[error("could not find internet network interface")]
    ErrNoInternetInterface,
    #[error("transport is closed")]
    ErrTransportClosed,
    #[error("responder is no longer running")]
    ErrResponderClosed,

    // Resolver errors
    #[error("host '{0}' did not resolve to any addresses")]
    ErrHostNotFound(String),

    #[error("{0}")]
    Io(#[source] IoError),
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
#[error("io error: {0}")]
pub struct IoError(#[from] pub io::Error);

// Workaround for wanting PartialEq for io::Error.
impl PartialEq for IoError {
    fn eq(&self, other: &Self) -> bool {
        self.0.kind() == other.0.kind()
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(IoError(e))
    }
}
