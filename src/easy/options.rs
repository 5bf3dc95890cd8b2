//! Option classification.
//!
//! Every option identifier maps to exactly one setter family. The table is
//! an allow-list: identifiers that would need argument transformations the
//! generic setters cannot perform (binary bodies, 64-bit offsets, multipart
//! posts, telnet option lists, raw pointers) are rejected as unsupported.

use std::ffi::c_long;

use crate::constants::opt;

use super::callbacks::CallbackKind;

/// Setter family of an option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionKind {
    /// Integer option; `default` is used when no argument is given.
    Long { default: Option<c_long> },
    /// Callable plus user data.
    Callback(CallbackKind),
    /// Single string, retained for the handle's lifetime.
    Str,
    /// Array of strings built into a native list.
    List,
    Unsupported,
}

const fn flag() -> OptionKind {
    OptionKind::Long { default: Some(1) }
}

const fn value() -> OptionKind {
    OptionKind::Long { default: None }
}

/// Classifies an option identifier.
#[must_use]
pub fn classify(option: i32) -> OptionKind {
    match option {
        opt::VERBOSE | opt::HEADER | opt::NOPROGRESS | opt::NOSIGNAL => flag(),

        opt::WRITEFUNCTION => OptionKind::Callback(CallbackKind::Write),
        opt::READFUNCTION => OptionKind::Callback(CallbackKind::Read),
        opt::HEADERFUNCTION => OptionKind::Callback(CallbackKind::Header),
        opt::PROGRESSFUNCTION => OptionKind::Callback(CallbackKind::Progress),

        // network
        opt::URL | opt::PROXY | opt::INTERFACE | opt::NOPROXY => OptionKind::Str,
        opt::PROXYPORT | opt::PROXYTYPE | opt::PORT | opt::LOCALPORT | opt::LOCALPORTRANGE => {
            value()
        }
        opt::HTTPPROXYTUNNEL | opt::TCP_NODELAY | opt::FRESH_CONNECT => flag(),
        opt::DNS_CACHE_TIMEOUT => OptionKind::Long { default: Some(0) },

        // names and passwords
        opt::NETRC | opt::HTTPAUTH | opt::PROXYAUTH => value(),
        opt::NETRC_FILE | opt::USERPWD | opt::PROXYUSERPWD => OptionKind::Str,

        // http
        opt::AUTOREFERER
        | opt::FOLLOWLOCATION
        | opt::UNRESTRICTED_AUTH
        | opt::PUT
        | opt::POST
        | opt::COOKIESESSION
        | opt::HTTPGET
        | opt::IGNORE_CONTENT_LENGTH => flag(),
        opt::MAXREDIRS | opt::HTTP_VERSION => value(),
        opt::ENCODING
        | opt::POSTFIELDS
        | opt::REFERER
        | opt::USERAGENT
        | opt::COOKIE
        | opt::COOKIEFILE
        | opt::COOKIEJAR
        | opt::COOKIELIST => OptionKind::Str,
        opt::HTTPHEADER | opt::HTTP200ALIASES => OptionKind::List,

        // ftp
        opt::FTPPORT | opt::SOURCE_URL | opt::SOURCE_USERPWD | opt::FTP_ACCOUNT => OptionKind::Str,
        opt::QUOTE
        | opt::POSTQUOTE
        | opt::PREQUOTE
        | opt::SOURCE_QUOTE
        | opt::SOURCE_PREQUOTE
        | opt::SOURCE_POSTQUOTE => OptionKind::List,
        opt::FTPLISTONLY
        | opt::FTPAPPEND
        | opt::FTP_USE_EPRT
        | opt::FTP_USE_EPSV
        | opt::FTP_CREATE_MISSING_DIRS
        | opt::FTP_RESPONSE_TIMEOUT
        | opt::FTP_SKIP_PASV_IP => flag(),
        opt::FTP_SSL => value(),

        // protocol
        opt::TRANSFERTEXT
        | opt::CRLF
        | opt::FILETIME
        | opt::NOBODY
        | opt::INFILESIZE
        | opt::UPLOAD => flag(),
        opt::RANGE | opt::CUSTOMREQUEST => OptionKind::Str,
        opt::RESUME_FROM | opt::MAXFILESIZE | opt::TIMECONDITION | opt::TIMEVALUE => value(),

        // connection
        opt::TIMEOUT
        | opt::LOW_SPEED_LIMIT
        | opt::LOW_SPEED_TIME
        | opt::MAXCONNECTS
        | opt::CLOSEPOLICY
        | opt::CONNECTTIMEOUT
        | opt::IPRESOLVE => value(),

        // ssl
        opt::SSLCERT
        | opt::SSLCERTTYPE
        | opt::SSLKEY
        | opt::SSLKEYTYPE
        | opt::SSLKEYPASSWD
        | opt::SSLENGINE
        | opt::CAINFO
        | opt::CAPATH
        | opt::RANDOM_FILE
        | opt::EGDSOCKET
        | opt::SSL_CIPHER_LIST
        | opt::KRB4LEVEL => OptionKind::Str,
        opt::SSL_VERIFYPEER | opt::SSLENGINE_DEFAULT => flag(),
        opt::SSLVERSION | opt::SSL_VERIFYHOST => value(),

        // Data pointers, debug/ioctl/ssl-ctx callbacks, error sinks, binary
        // post sizes, 64-bit offsets, multipart posts, share handles, telnet
        // options and the private slot all fall through here.
        _ => OptionKind::Unsupported,
    }
}
