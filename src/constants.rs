//! Named integer constants re-exported to the host.
//!
//! Values mirror the transfer library's public ABI: option identifiers are
//! encoded as `type_base + number` (`0` long, `10000` object pointer, `20000`
//! function pointer, `30000` 64-bit offset) and info identifiers as
//! `type_mask + number`. Legacy names keep the numeric value of their modern
//! replacement.

/// Option identifiers (`CURLOPT_*`).
pub mod opt {
    const LONG: i32 = 0;
    const OBJECTPOINT: i32 = 10_000;
    const FUNCTIONPOINT: i32 = 20_000;
    const OFF_T: i32 = 30_000;

    pub const WRITEDATA: i32 = OBJECTPOINT + 1;
    pub const URL: i32 = OBJECTPOINT + 2;
    pub const PORT: i32 = LONG + 3;
    pub const PROXY: i32 = OBJECTPOINT + 4;
    pub const USERPWD: i32 = OBJECTPOINT + 5;
    pub const PROXYUSERPWD: i32 = OBJECTPOINT + 6;
    pub const RANGE: i32 = OBJECTPOINT + 7;
    pub const READDATA: i32 = OBJECTPOINT + 9;
    pub const ERRORBUFFER: i32 = OBJECTPOINT + 10;
    pub const WRITEFUNCTION: i32 = FUNCTIONPOINT + 11;
    pub const READFUNCTION: i32 = FUNCTIONPOINT + 12;
    pub const TIMEOUT: i32 = LONG + 13;
    pub const INFILESIZE: i32 = LONG + 14;
    pub const POSTFIELDS: i32 = OBJECTPOINT + 15;
    pub const REFERER: i32 = OBJECTPOINT + 16;
    pub const FTPPORT: i32 = OBJECTPOINT + 17;
    pub const USERAGENT: i32 = OBJECTPOINT + 18;
    pub const LOW_SPEED_LIMIT: i32 = LONG + 19;
    pub const LOW_SPEED_TIME: i32 = LONG + 20;
    pub const RESUME_FROM: i32 = LONG + 21;
    pub const COOKIE: i32 = OBJECTPOINT + 22;
    pub const HTTPHEADER: i32 = OBJECTPOINT + 23;
    pub const HTTPPOST: i32 = OBJECTPOINT + 24;
    pub const SSLCERT: i32 = OBJECTPOINT + 25;
    pub const SSLCERTPASSWD: i32 = OBJECTPOINT + 26;
    pub const SSLKEYPASSWD: i32 = OBJECTPOINT + 26;
    pub const CRLF: i32 = LONG + 27;
    pub const QUOTE: i32 = OBJECTPOINT + 28;
    pub const WRITEHEADER: i32 = OBJECTPOINT + 29;
    pub const COOKIEFILE: i32 = OBJECTPOINT + 31;
    pub const SSLVERSION: i32 = LONG + 32;
    pub const TIMECONDITION: i32 = LONG + 33;
    pub const TIMEVALUE: i32 = LONG + 34;
    pub const CUSTOMREQUEST: i32 = OBJECTPOINT + 36;
    pub const STDERR: i32 = OBJECTPOINT + 37;
    pub const POSTQUOTE: i32 = OBJECTPOINT + 39;
    pub const VERBOSE: i32 = LONG + 41;
    pub const HEADER: i32 = LONG + 42;
    pub const NOPROGRESS: i32 = LONG + 43;
    pub const NOBODY: i32 = LONG + 44;
    pub const FAILONERROR: i32 = LONG + 45;
    pub const UPLOAD: i32 = LONG + 46;
    pub const POST: i32 = LONG + 47;
    pub const FTPLISTONLY: i32 = LONG + 48;
    pub const FTPAPPEND: i32 = LONG + 50;
    pub const NETRC: i32 = LONG + 51;
    pub const FOLLOWLOCATION: i32 = LONG + 52;
    pub const TRANSFERTEXT: i32 = LONG + 53;
    pub const PUT: i32 = LONG + 54;
    pub const PROGRESSFUNCTION: i32 = FUNCTIONPOINT + 56;
    pub const PROGRESSDATA: i32 = OBJECTPOINT + 57;
    pub const AUTOREFERER: i32 = LONG + 58;
    pub const PROXYPORT: i32 = LONG + 59;
    pub const POSTFIELDSIZE: i32 = LONG + 60;
    pub const HTTPPROXYTUNNEL: i32 = LONG + 61;
    pub const INTERFACE: i32 = OBJECTPOINT + 62;
    pub const KRB4LEVEL: i32 = OBJECTPOINT + 63;
    pub const SSL_VERIFYPEER: i32 = LONG + 64;
    pub const CAINFO: i32 = OBJECTPOINT + 65;
    pub const MAXREDIRS: i32 = LONG + 68;
    pub const FILETIME: i32 = LONG + 69;
    pub const TELNETOPTIONS: i32 = OBJECTPOINT + 70;
    pub const MAXCONNECTS: i32 = LONG + 71;
    pub const CLOSEPOLICY: i32 = LONG + 72;
    pub const FRESH_CONNECT: i32 = LONG + 74;
    pub const FORBID_REUSE: i32 = LONG + 75;
    pub const RANDOM_FILE: i32 = OBJECTPOINT + 76;
    pub const EGDSOCKET: i32 = OBJECTPOINT + 77;
    pub const CONNECTTIMEOUT: i32 = LONG + 78;
    pub const HEADERFUNCTION: i32 = FUNCTIONPOINT + 79;
    pub const HTTPGET: i32 = LONG + 80;
    pub const SSL_VERIFYHOST: i32 = LONG + 81;
    pub const COOKIEJAR: i32 = OBJECTPOINT + 82;
    pub const SSL_CIPHER_LIST: i32 = OBJECTPOINT + 83;
    pub const HTTP_VERSION: i32 = LONG + 84;
    pub const FTP_USE_EPSV: i32 = LONG + 85;
    pub const SSLCERTTYPE: i32 = OBJECTPOINT + 86;
    pub const SSLKEY: i32 = OBJECTPOINT + 87;
    pub const SSLKEYTYPE: i32 = OBJECTPOINT + 88;
    pub const SSLENGINE: i32 = OBJECTPOINT + 89;
    pub const SSLENGINE_DEFAULT: i32 = LONG + 90;
    pub const DNS_USE_GLOBAL_CACHE: i32 = LONG + 91;
    pub const DNS_CACHE_TIMEOUT: i32 = LONG + 92;
    pub const PREQUOTE: i32 = OBJECTPOINT + 93;
    pub const DEBUGFUNCTION: i32 = FUNCTIONPOINT + 94;
    pub const DEBUGDATA: i32 = OBJECTPOINT + 95;
    pub const COOKIESESSION: i32 = LONG + 96;
    pub const CAPATH: i32 = OBJECTPOINT + 97;
    pub const BUFFERSIZE: i32 = LONG + 98;
    pub const NOSIGNAL: i32 = LONG + 99;
    pub const SHARE: i32 = OBJECTPOINT + 100;
    pub const PROXYTYPE: i32 = LONG + 101;
    pub const ENCODING: i32 = OBJECTPOINT + 102;
    pub const PRIVATE: i32 = OBJECTPOINT + 103;
    pub const HTTP200ALIASES: i32 = OBJECTPOINT + 104;
    pub const UNRESTRICTED_AUTH: i32 = LONG + 105;
    pub const FTP_USE_EPRT: i32 = LONG + 106;
    pub const HTTPAUTH: i32 = LONG + 107;
    pub const SSL_CTX_FUNCTION: i32 = FUNCTIONPOINT + 108;
    pub const SSL_CTX_DATA: i32 = OBJECTPOINT + 109;
    pub const FTP_CREATE_MISSING_DIRS: i32 = LONG + 110;
    pub const PROXYAUTH: i32 = LONG + 111;
    pub const FTP_RESPONSE_TIMEOUT: i32 = LONG + 112;
    pub const IPRESOLVE: i32 = LONG + 113;
    pub const MAXFILESIZE: i32 = LONG + 114;
    pub const INFILESIZE_LARGE: i32 = OFF_T + 115;
    pub const RESUME_FROM_LARGE: i32 = OFF_T + 116;
    pub const MAXFILESIZE_LARGE: i32 = OFF_T + 117;
    pub const NETRC_FILE: i32 = OBJECTPOINT + 118;
    pub const FTP_SSL: i32 = LONG + 119;
    pub const POSTFIELDSIZE_LARGE: i32 = OFF_T + 120;
    pub const TCP_NODELAY: i32 = LONG + 121;
    pub const SOURCE_USERPWD: i32 = OBJECTPOINT + 123;
    pub const SOURCE_PREQUOTE: i32 = OBJECTPOINT + 127;
    pub const SOURCE_POSTQUOTE: i32 = OBJECTPOINT + 128;
    pub const IOCTLFUNCTION: i32 = FUNCTIONPOINT + 130;
    pub const IOCTLDATA: i32 = OBJECTPOINT + 131;
    pub const SOURCE_URL: i32 = OBJECTPOINT + 132;
    pub const SOURCE_QUOTE: i32 = OBJECTPOINT + 133;
    pub const FTP_ACCOUNT: i32 = OBJECTPOINT + 134;
    pub const COOKIELIST: i32 = OBJECTPOINT + 135;
    pub const IGNORE_CONTENT_LENGTH: i32 = LONG + 136;
    pub const FTP_SKIP_PASV_IP: i32 = LONG + 137;
    pub const LOCALPORT: i32 = LONG + 139;
    pub const LOCALPORTRANGE: i32 = LONG + 140;
    pub const NOPROXY: i32 = OBJECTPOINT + 177;
}

/// Info identifiers (`CURLINFO_*`).
pub mod info {
    pub(crate) const STRING: i32 = 0x10_0000;
    pub(crate) const LONG: i32 = 0x20_0000;
    pub(crate) const DOUBLE: i32 = 0x30_0000;
    pub(crate) const SLIST: i32 = 0x40_0000;

    pub const EFFECTIVE_URL: i32 = STRING + 1;
    pub const RESPONSE_CODE: i32 = LONG + 2;
    pub const TOTAL_TIME: i32 = DOUBLE + 3;
    pub const NAMELOOKUP_TIME: i32 = DOUBLE + 4;
    pub const CONNECT_TIME: i32 = DOUBLE + 5;
    pub const PRETRANSFER_TIME: i32 = DOUBLE + 6;
    pub const SIZE_UPLOAD: i32 = DOUBLE + 7;
    pub const SIZE_DOWNLOAD: i32 = DOUBLE + 8;
    pub const SPEED_DOWNLOAD: i32 = DOUBLE + 9;
    pub const SPEED_UPLOAD: i32 = DOUBLE + 10;
    pub const HEADER_SIZE: i32 = LONG + 11;
    pub const REQUEST_SIZE: i32 = LONG + 12;
    pub const SSL_VERIFYRESULT: i32 = LONG + 13;
    pub const FILETIME: i32 = LONG + 14;
    pub const CONTENT_LENGTH_DOWNLOAD: i32 = DOUBLE + 15;
    pub const CONTENT_LENGTH_UPLOAD: i32 = DOUBLE + 16;
    pub const STARTTRANSFER_TIME: i32 = DOUBLE + 17;
    pub const CONTENT_TYPE: i32 = STRING + 18;
    pub const REDIRECT_TIME: i32 = DOUBLE + 19;
    pub const REDIRECT_COUNT: i32 = LONG + 20;
    pub const PRIVATE: i32 = STRING + 21;
    pub const HTTP_CONNECTCODE: i32 = LONG + 22;
    pub const HTTPAUTH_AVAIL: i32 = LONG + 23;
    pub const PROXYAUTH_AVAIL: i32 = LONG + 24;
    pub const OS_ERRNO: i32 = LONG + 25;
    pub const NUM_CONNECTS: i32 = LONG + 26;
    pub const SSL_ENGINES: i32 = SLIST + 27;
    pub const COOKIELIST: i32 = SLIST + 28;
    pub const FTP_ENTRY_PATH: i32 = STRING + 30;
    pub const REDIRECT_URL: i32 = STRING + 31;
    pub const PRIMARY_IP: i32 = STRING + 32;
    pub const APPCONNECT_TIME: i32 = DOUBLE + 33;
    pub const PRIMARY_PORT: i32 = LONG + 40;
    pub const LOCAL_IP: i32 = STRING + 41;
    pub const LOCAL_PORT: i32 = LONG + 42;
}

/// Native result codes (`CURLE_*`) referenced by the binding itself.
pub mod code {
    pub const OK: i32 = 0;
    pub const UNSUPPORTED_PROTOCOL: i32 = 1;
    pub const COULDNT_CONNECT: i32 = 7;
    pub const WRITE_ERROR: i32 = 23;
    pub const ABORTED_BY_CALLBACK: i32 = 42;
    pub const UNKNOWN_OPTION: i32 = 48;
}

/// Process-wide initialization flags (`CURL_GLOBAL_*`).
pub mod global {
    pub const NOTHING: i64 = 0;
    pub const SSL: i64 = 1;
    pub const WIN32: i64 = 2;
    pub const ALL: i64 = SSL | WIN32;
}

/// Module version as `major * 10000 + minor * 100 + patch`.
#[must_use]
pub fn module_version() -> i64 {
    let part = |s: &str| s.parse::<i64>().unwrap_or(0);
    part(env!("CARGO_PKG_VERSION_MAJOR")) * 10_000
        + part(env!("CARGO_PKG_VERSION_MINOR")) * 100
        + part(env!("CARGO_PKG_VERSION_PATCH"))
}

/// Module version string exported as `_curl_module_version_string`.
pub const MODULE_VERSION_STRING: &str = env!("CARGO_PKG_VERSION");

macro_rules! constant_table {
    ($($name:literal => $value:expr),* $(,)?) => {
        &[$(($name, $value as i64)),*]
    };
}

/// Every integer constant exported to the host, in registration order.
pub static CONSTANTS: &[(&str, i64)] = constant_table! {
    "CURLOPT_VERBOSE" => opt::VERBOSE,
    "CURLOPT_HEADER" => opt::HEADER,
    "CURLOPT_NOPROGRESS" => opt::NOPROGRESS,
    "CURLOPT_NOSIGNAL" => opt::NOSIGNAL,
    "CURLOPT_WRITEFUNCTION" => opt::WRITEFUNCTION,
    "CURLOPT_READFUNCTION" => opt::READFUNCTION,
    "CURLOPT_IOCTLFUNCTION" => opt::IOCTLFUNCTION,
    "CURLOPT_PROGRESSFUNCTION" => opt::PROGRESSFUNCTION,
    "CURLOPT_HEADERFUNCTION" => opt::HEADERFUNCTION,
    "CURLOPT_DEBUGFUNCTION" => opt::DEBUGFUNCTION,
    "CURLOPT_SSL_CTX_FUNCTION" => opt::SSL_CTX_FUNCTION,
    "CURLOPT_WRITEDATA" => opt::WRITEDATA,
    "CURLOPT_READDATA" => opt::READDATA,
    "CURLOPT_IOCTLDATA" => opt::IOCTLDATA,
    "CURLOPT_PROGRESSDATA" => opt::PROGRESSDATA,
    "CURLOPT_WRITEHEADER" => opt::WRITEHEADER,
    "CURLOPT_DEBUGDATA" => opt::DEBUGDATA,
    "CURLOPT_SSL_CTX_DATA" => opt::SSL_CTX_DATA,
    "CURLOPT_ERRORBUFFER" => opt::ERRORBUFFER,
    "CURLOPT_STDERR" => opt::STDERR,
    "CURLOPT_FAILONERROR" => opt::FAILONERROR,
    "CURLOPT_URL" => opt::URL,
    "CURLOPT_PROXY" => opt::PROXY,
    "CURLOPT_PROXYPORT" => opt::PROXYPORT,
    "CURLOPT_PROXYTYPE" => opt::PROXYTYPE,
    "CURLOPT_HTTPPROXYTUNNEL" => opt::HTTPPROXYTUNNEL,
    "CURLOPT_INTERFACE" => opt::INTERFACE,
    "CURLOPT_DNS_CACHE_TIMEOUT" => opt::DNS_CACHE_TIMEOUT,
    "CURLOPT_DNS_USE_GLOBAL_CACHE" => opt::DNS_USE_GLOBAL_CACHE,
    "CURLOPT_BUFFERSIZE" => opt::BUFFERSIZE,
    "CURLOPT_PORT" => opt::PORT,
    "CURLOPT_TCP_NODELAY" => opt::TCP_NODELAY,
    "CURLOPT_NETRC" => opt::NETRC,
    "CURLOPT_NETRC_FILE" => opt::NETRC_FILE,
    "CURLOPT_USERPWD" => opt::USERPWD,
    "CURLOPT_PROXYUSERPWD" => opt::PROXYUSERPWD,
    "CURLOPT_HTTPAUTH" => opt::HTTPAUTH,
    "CURLOPT_PROXYAUTH" => opt::PROXYAUTH,
    "CURLOPT_AUTOREFERER" => opt::AUTOREFERER,
    "CURLOPT_ENCODING" => opt::ENCODING,
    "CURLOPT_FOLLOWLOCATION" => opt::FOLLOWLOCATION,
    "CURLOPT_UNRESTRICTED_AUTH" => opt::UNRESTRICTED_AUTH,
    "CURLOPT_MAXREDIRS" => opt::MAXREDIRS,
    "CURLOPT_PUT" => opt::PUT,
    "CURLOPT_POST" => opt::POST,
    "CURLOPT_POSTFIELDS" => opt::POSTFIELDS,
    "CURLOPT_POSTFIELDSIZE" => opt::POSTFIELDSIZE,
    "CURLOPT_POSTFIELDSIZE_LARGE" => opt::POSTFIELDSIZE_LARGE,
    "CURLOPT_HTTPPOST" => opt::HTTPPOST,
    "CURLOPT_REFERER" => opt::REFERER,
    "CURLOPT_USERAGENT" => opt::USERAGENT,
    "CURLOPT_HTTPHEADER" => opt::HTTPHEADER,
    "CURLOPT_HTTP200ALIASES" => opt::HTTP200ALIASES,
    "CURLOPT_COOKIE" => opt::COOKIE,
    "CURLOPT_COOKIEFILE" => opt::COOKIEFILE,
    "CURLOPT_COOKIEJAR" => opt::COOKIEJAR,
    "CURLOPT_COOKIESESSION" => opt::COOKIESESSION,
    "CURLOPT_COOKIELIST" => opt::COOKIELIST,
    "CURLOPT_HTTPGET" => opt::HTTPGET,
    "CURLOPT_HTTP_VERSION" => opt::HTTP_VERSION,
    "CURLOPT_IGNORE_CONTENT_LENGTH" => opt::IGNORE_CONTENT_LENGTH,
    "CURLOPT_FTPPORT" => opt::FTPPORT,
    "CURLOPT_QUOTE" => opt::QUOTE,
    "CURLOPT_POSTQUOTE" => opt::POSTQUOTE,
    "CURLOPT_PREQUOTE" => opt::PREQUOTE,
    "CURLOPT_FTPLISTONLY" => opt::FTPLISTONLY,
    "CURLOPT_FTPAPPEND" => opt::FTPAPPEND,
    "CURLOPT_FTP_USE_EPRT" => opt::FTP_USE_EPRT,
    "CURLOPT_FTP_USE_EPSV" => opt::FTP_USE_EPSV,
    "CURLOPT_FTP_CREATE_MISSING_DIRS" => opt::FTP_CREATE_MISSING_DIRS,
    "CURLOPT_FTP_RESPONSE_TIMEOUT" => opt::FTP_RESPONSE_TIMEOUT,
    "CURLOPT_FTP_SKIP_PASV_IP" => opt::FTP_SKIP_PASV_IP,
    "CURLOPT_FTP_SSL" => opt::FTP_SSL,
    "CURLOPT_SOURCE_URL" => opt::SOURCE_URL,
    "CURLOPT_SOURCE_USERPWD" => opt::SOURCE_USERPWD,
    "CURLOPT_SOURCE_QUOTE" => opt::SOURCE_QUOTE,
    "CURLOPT_SOURCE_PREQUOTE" => opt::SOURCE_PREQUOTE,
    "CURLOPT_SOURCE_POSTQUOTE" => opt::SOURCE_POSTQUOTE,
    "CURLOPT_FTP_ACCOUNT" => opt::FTP_ACCOUNT,
    "CURLOPT_TRANSFERTEXT" => opt::TRANSFERTEXT,
    "CURLOPT_CRLF" => opt::CRLF,
    "CURLOPT_RANGE" => opt::RANGE,
    "CURLOPT_RESUME_FROM" => opt::RESUME_FROM,
    "CURLOPT_RESUME_FROM_LARGE" => opt::RESUME_FROM_LARGE,
    "CURLOPT_CUSTOMREQUEST" => opt::CUSTOMREQUEST,
    "CURLOPT_FILETIME" => opt::FILETIME,
    "CURLOPT_NOBODY" => opt::NOBODY,
    "CURLOPT_INFILESIZE" => opt::INFILESIZE,
    "CURLOPT_INFILESIZE_LARGE" => opt::INFILESIZE_LARGE,
    "CURLOPT_UPLOAD" => opt::UPLOAD,
    "CURLOPT_MAXFILESIZE" => opt::MAXFILESIZE,
    "CURLOPT_MAXFILESIZE_LARGE" => opt::MAXFILESIZE_LARGE,
    "CURLOPT_TIMECONDITION" => opt::TIMECONDITION,
    "CURLOPT_TIMEVALUE" => opt::TIMEVALUE,
    "CURLOPT_TIMEOUT" => opt::TIMEOUT,
    "CURLOPT_LOW_SPEED_LIMIT" => opt::LOW_SPEED_LIMIT,
    "CURLOPT_LOW_SPEED_TIME" => opt::LOW_SPEED_TIME,
    "CURLOPT_MAXCONNECTS" => opt::MAXCONNECTS,
    "CURLOPT_CLOSEPOLICY" => opt::CLOSEPOLICY,
    "CURLOPT_FRESH_CONNECT" => opt::FRESH_CONNECT,
    "CURLOPT_FORBID_REUSE" => opt::FORBID_REUSE,
    "CURLOPT_CONNECTTIMEOUT" => opt::CONNECTTIMEOUT,
    "CURLOPT_IPRESOLVE" => opt::IPRESOLVE,
    "CURLOPT_LOCALPORT" => opt::LOCALPORT,
    "CURLOPT_LOCALPORTRANGE" => opt::LOCALPORTRANGE,
    "CURLOPT_NOPROXY" => opt::NOPROXY,
    "CURLOPT_SSLCERT" => opt::SSLCERT,
    "CURLOPT_SSLCERTTYPE" => opt::SSLCERTTYPE,
    "CURLOPT_SSLCERTPASSWD" => opt::SSLCERTPASSWD,
    "CURLOPT_SSLKEY" => opt::SSLKEY,
    "CURLOPT_SSLKEYTYPE" => opt::SSLKEYTYPE,
    "CURLOPT_SSLKEYPASSWD" => opt::SSLKEYPASSWD,
    "CURLOPT_SSLENGINE" => opt::SSLENGINE,
    "CURLOPT_SSLENGINE_DEFAULT" => opt::SSLENGINE_DEFAULT,
    "CURLOPT_SSL_VERIFYPEER" => opt::SSL_VERIFYPEER,
    "CURLOPT_SSLVERSION" => opt::SSLVERSION,
    "CURLOPT_CAINFO" => opt::CAINFO,
    "CURLOPT_CAPATH" => opt::CAPATH,
    "CURLOPT_RANDOM_FILE" => opt::RANDOM_FILE,
    "CURLOPT_EGDSOCKET" => opt::EGDSOCKET,
    "CURLOPT_SSL_VERIFYHOST" => opt::SSL_VERIFYHOST,
    "CURLOPT_SSL_CIPHER_LIST" => opt::SSL_CIPHER_LIST,
    "CURLOPT_KRB4LEVEL" => opt::KRB4LEVEL,
    "CURLOPT_PRIVATE" => opt::PRIVATE,
    "CURLOPT_SHARE" => opt::SHARE,
    "CURLOPT_TELNETOPTIONS" => opt::TELNETOPTIONS,

    "CURL_GLOBAL_ALL" => global::ALL,
    "CURL_GLOBAL_SSL" => global::SSL,
    "CURL_GLOBAL_WIN32" => global::WIN32,
    "CURL_GLOBAL_NOTHING" => global::NOTHING,

    "CURL_NETRC_IGNORED" => 0,
    "CURL_NETRC_OPTIONAL" => 1,
    "CURL_NETRC_REQUIRED" => 2,

    "CURL_HTTP_VERSION_NONE" => 0,
    "CURL_HTTP_VERSION_1_0" => 1,
    "CURL_HTTP_VERSION_1_1" => 2,
    "CURL_HTTP_VERSION_2_0" => 3,

    "CURLAUTH_NONE" => 0,
    "CURLAUTH_BASIC" => 1,
    "CURLAUTH_DIGEST" => 2,
    "CURLAUTH_GSSNEGOTIATE" => 4,
    "CURLAUTH_NTLM" => 8,
    "CURLAUTH_ANY" => !0x10_i64,
    "CURLAUTH_ANYSAFE" => !0x11_i64,

    "CURLPROXY_HTTP" => 0,
    "CURLPROXY_SOCKS4" => 4,
    "CURLPROXY_SOCKS5" => 5,

    "CURL_IPRESOLVE_WHATEVER" => 0,
    "CURL_IPRESOLVE_V4" => 1,
    "CURL_IPRESOLVE_V6" => 2,

    "CURLINFO_EFFECTIVE_URL" => info::EFFECTIVE_URL,
    "CURLINFO_RESPONSE_CODE" => info::RESPONSE_CODE,
    "CURLINFO_TOTAL_TIME" => info::TOTAL_TIME,
    "CURLINFO_NAMELOOKUP_TIME" => info::NAMELOOKUP_TIME,
    "CURLINFO_CONNECT_TIME" => info::CONNECT_TIME,
    "CURLINFO_PRETRANSFER_TIME" => info::PRETRANSFER_TIME,
    "CURLINFO_SIZE_UPLOAD" => info::SIZE_UPLOAD,
    "CURLINFO_SIZE_DOWNLOAD" => info::SIZE_DOWNLOAD,
    "CURLINFO_SPEED_DOWNLOAD" => info::SPEED_DOWNLOAD,
    "CURLINFO_SPEED_UPLOAD" => info::SPEED_UPLOAD,
    "CURLINFO_HEADER_SIZE" => info::HEADER_SIZE,
    "CURLINFO_REQUEST_SIZE" => info::REQUEST_SIZE,
    "CURLINFO_SSL_VERIFYRESULT" => info::SSL_VERIFYRESULT,
    "CURLINFO_FILETIME" => info::FILETIME,
    "CURLINFO_CONTENT_LENGTH_DOWNLOAD" => info::CONTENT_LENGTH_DOWNLOAD,
    "CURLINFO_CONTENT_LENGTH_UPLOAD" => info::CONTENT_LENGTH_UPLOAD,
    "CURLINFO_STARTTRANSFER_TIME" => info::STARTTRANSFER_TIME,
    "CURLINFO_CONTENT_TYPE" => info::CONTENT_TYPE,
    "CURLINFO_REDIRECT_TIME" => info::REDIRECT_TIME,
    "CURLINFO_REDIRECT_COUNT" => info::REDIRECT_COUNT,
    "CURLINFO_PRIVATE" => info::PRIVATE,
    "CURLINFO_HTTP_CONNECTCODE" => info::HTTP_CONNECTCODE,
    "CURLINFO_HTTPAUTH_AVAIL" => info::HTTPAUTH_AVAIL,
    "CURLINFO_PROXYAUTH_AVAIL" => info::PROXYAUTH_AVAIL,
    "CURLINFO_OS_ERRNO" => info::OS_ERRNO,
    "CURLINFO_NUM_CONNECTS" => info::NUM_CONNECTS,
    "CURLINFO_SSL_ENGINES" => info::SSL_ENGINES,
    "CURLINFO_COOKIELIST" => info::COOKIELIST,
    "CURLINFO_FTP_ENTRY_PATH" => info::FTP_ENTRY_PATH,
    "CURLINFO_REDIRECT_URL" => info::REDIRECT_URL,
    "CURLINFO_PRIMARY_IP" => info::PRIMARY_IP,
    "CURLINFO_APPCONNECT_TIME" => info::APPCONNECT_TIME,
    "CURLINFO_PRIMARY_PORT" => info::PRIMARY_PORT,
    "CURLINFO_LOCAL_IP" => info::LOCAL_IP,
    "CURLINFO_LOCAL_PORT" => info::LOCAL_PORT,

    "CURLE_OK" => code::OK,
    "CURLE_UNSUPPORTED_PROTOCOL" => code::UNSUPPORTED_PROTOCOL,
    "CURLE_FAILED_INIT" => 2,
    "CURLE_URL_MALFORMAT" => 3,
    "CURLE_URL_MALFORMAT_USER" => 4,
    "CURLE_COULDNT_RESOLVE_PROXY" => 5,
    "CURLE_COULDNT_RESOLVE_HOST" => 6,
    "CURLE_COULDNT_CONNECT" => code::COULDNT_CONNECT,
    "CURLE_FTP_WEIRD_SERVER_REPLY" => 8,
    "CURLE_FTP_ACCESS_DENIED" => 9,
    "CURLE_FTP_USER_PASSWORD_INCORRECT" => 10,
    "CURLE_FTP_WEIRD_PASS_REPLY" => 11,
    "CURLE_FTP_WEIRD_USER_REPLY" => 12,
    "CURLE_FTP_WEIRD_PASV_REPLY" => 13,
    "CURLE_FTP_WEIRD_227_FORMAT" => 14,
    "CURLE_FTP_CANT_GET_HOST" => 15,
    "CURLE_FTP_CANT_RECONNECT" => 16,
    "CURLE_FTP_COULDNT_SET_BINARY" => 17,
    "CURLE_PARTIAL_FILE" => 18,
    "CURLE_FTP_COULDNT_RETR_FILE" => 19,
    "CURLE_FTP_WRITE_ERROR" => 20,
    "CURLE_FTP_QUOTE_ERROR" => 21,
    "CURLE_HTTP_RETURNED_ERROR" => 22,
    "CURLE_WRITE_ERROR" => code::WRITE_ERROR,
    "CURLE_MALFORMAT_USER" => 24,
    "CURLE_FTP_COULDNT_STOR_FILE" => 25,
    "CURLE_READ_ERROR" => 26,
    "CURLE_OUT_OF_MEMORY" => 27,
    "CURLE_OPERATION_TIMEOUTED" => 28,
    "CURLE_FTP_COULDNT_SET_ASCII" => 29,
    "CURLE_FTP_PORT_FAILED" => 30,
    "CURLE_FTP_COULDNT_USE_REST" => 31,
    "CURLE_FTP_COULDNT_GET_SIZE" => 32,
    "CURLE_HTTP_RANGE_ERROR" => 33,
    "CURLE_HTTP_POST_ERROR" => 34,
    "CURLE_SSL_CONNECT_ERROR" => 35,
    "CURLE_BAD_DOWNLOAD_RESUME" => 36,
    "CURLE_FILE_COULDNT_READ_FILE" => 37,
    "CURLE_LDAP_CANNOT_BIND" => 38,
    "CURLE_LDAP_SEARCH_FAILED" => 39,
    "CURLE_LIBRARY_NOT_FOUND" => 40,
    "CURLE_FUNCTION_NOT_FOUND" => 41,
    "CURLE_ABORTED_BY_CALLBACK" => code::ABORTED_BY_CALLBACK,
    "CURLE_BAD_FUNCTION_ARGUMENT" => 43,
    "CURLE_BAD_CALLING_ORDER" => 44,
    "CURLE_INTERFACE_FAILED" => 45,
    "CURLE_BAD_PASSWORD_ENTERED" => 46,
    "CURLE_TOO_MANY_REDIRECTS" => 47,
    "CURLE_UNKNOWN_TELNET_OPTION" => code::UNKNOWN_OPTION,
    "CURLE_TELNET_OPTION_SYNTAX" => 49,
    "CURLE_OBSOLETE" => 50,
    "CURLE_SSL_PEER_CERTIFICATE" => 51,
    "CURLE_GOT_NOTHING" => 52,
    "CURLE_SSL_ENGINE_NOTFOUND" => 53,
    "CURLE_SSL_ENGINE_SETFAILED" => 54,
    "CURLE_SEND_ERROR" => 55,
    "CURLE_RECV_ERROR" => 56,
    "CURLE_SHARE_IN_USE" => 57,
    "CURLE_SSL_CERTPROBLEM" => 58,
    "CURLE_SSL_CIPHER" => 59,
    "CURLE_SSL_CACERT" => 60,
    "CURLE_BAD_CONTENT_ENCODING" => 61,
    "CURLE_LDAP_INVALID_URL" => 62,
    "CURLE_FILESIZE_EXCEEDED" => 63,
    "CURLE_FTP_SSL_FAILED" => 64,
    "CURLE_SEND_FAIL_REWIND" => 65,
    "CURLE_SSL_ENGINE_INITFAILED" => 66,
    "CURLE_LOGIN_DENIED" => 67,
};

/// Looks up an exported constant by name.
///
/// Includes `_curl_module_version`, which is computed rather than tabled.
#[must_use]
pub fn lookup(name: &str) -> Option<i64> {
    if name == "_curl_module_version" {
        return Some(module_version());
    }
    CONSTANTS
        .iter()
        .find(|(constant, _)| *constant == name)
        .map(|(_, value)| *value)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_constant_names_are_unique() {
        let mut seen = HashSet::new();
        for (name, _) in CONSTANTS {
            assert!(seen.insert(*name), "duplicate constant: {name}");
        }
    }

    #[test]
    fn test_option_ids_follow_type_bases() {
        assert_eq!(lookup("CURLOPT_URL"), Some(10_002));
        assert_eq!(lookup("CURLOPT_VERBOSE"), Some(41));
        assert_eq!(lookup("CURLOPT_WRITEFUNCTION"), Some(20_011));
        assert_eq!(lookup("CURLOPT_RESUME_FROM_LARGE"), Some(30_116));
    }

    #[test]
    fn test_info_ids_carry_type_mask() {
        assert_eq!(lookup("CURLINFO_EFFECTIVE_URL"), Some(0x10_0001));
        assert_eq!(lookup("CURLINFO_RESPONSE_CODE"), Some(0x20_0002));
        assert_eq!(lookup("CURLINFO_TOTAL_TIME"), Some(0x30_0003));
        assert_eq!(lookup("CURLINFO_SSL_ENGINES"), Some(0x40_001b));
    }

    #[test]
    fn test_legacy_password_aliases_share_value() {
        assert_eq!(
            lookup("CURLOPT_SSLCERTPASSWD"),
            lookup("CURLOPT_SSLKEYPASSWD")
        );
    }

    #[test]
    fn test_module_version_matches_package_version() {
        let version = module_version();
        assert!(version >= 0);
        assert_eq!(lookup("_curl_module_version"), Some(version));
        let major: i64 = env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap();
        assert_eq!(version / 10_000, major);
    }

    #[test]
    fn test_unknown_constant_is_none() {
        assert_eq!(lookup("CURLOPT_DOES_NOT_EXIST"), None);
    }
}
