//! Info classification.

use crate::constants::info;

/// Native accessor family of an info identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InfoKind {
    Str,
    Long,
    Double,
    List,
    Unsupported,
}

/// Classifies an info identifier. The private slot is never exposed.
#[must_use]
pub fn classify(id: i32) -> InfoKind {
    match id {
        info::EFFECTIVE_URL
        | info::CONTENT_TYPE
        | info::REDIRECT_URL
        | info::PRIMARY_IP
        | info::LOCAL_IP
        | info::FTP_ENTRY_PATH => InfoKind::Str,

        info::RESPONSE_CODE
        | info::HTTP_CONNECTCODE
        | info::FILETIME
        | info::REDIRECT_COUNT
        | info::HEADER_SIZE
        | info::REQUEST_SIZE
        | info::SSL_VERIFYRESULT
        | info::HTTPAUTH_AVAIL
        | info::PROXYAUTH_AVAIL
        | info::OS_ERRNO
        | info::NUM_CONNECTS
        | info::PRIMARY_PORT
        | info::LOCAL_PORT => InfoKind::Long,

        info::TOTAL_TIME
        | info::NAMELOOKUP_TIME
        | info::CONNECT_TIME
        | info::APPCONNECT_TIME
        | info::PRETRANSFER_TIME
        | info::STARTTRANSFER_TIME
        | info::REDIRECT_TIME
        | info::SIZE_UPLOAD
        | info::SIZE_DOWNLOAD
        | info::SPEED_DOWNLOAD
        | info::SPEED_UPLOAD
        | info::CONTENT_LENGTH_DOWNLOAD
        | info::CONTENT_LENGTH_UPLOAD => InfoKind::Double,

        info::SSL_ENGINES | info::COOKIELIST => InfoKind::List,

        _ => InfoKind::Unsupported,
    }
}
