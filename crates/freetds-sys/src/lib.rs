//! Raw FFI bindings to the FreeTDS DB-Library.
//!
//! This crate links against `libsybdb` and declares the subset of the
//! DB-Library API (`sybdb.h` / `sybfront.h`) needed to log in, run a batch
//! and walk its results. Everything here is `unsafe` and mirrors the C
//! declarations one to one.
//!
//! # Building
//!
//! The build script locates FreeTDS with `freetds-probe`. On macOS it looks
//! in the Homebrew keg first (`/usr/local/opt/freetds` on Intel,
//! `/opt/homebrew/opt/freetds` on Apple Silicon); elsewhere it uses
//! pkg-config and the usual system prefixes. Set `FREETDS_DIR`,
//! `FREETDS_INCLUDE_DIR` or `FREETDS_LIB_DIR` to point it somewhere else,
//! and `FREETDS_STATIC=1` (or the `static` feature) to link statically.
//! The build fails if the headers cannot be found.
//!
//! Crates that compile C against the same headers can read
//! `DEP_SYBDB_INCLUDE` and `DEP_SYBDB_HEADER` in their own build scripts,
//! or include [`UMBRELLA_HEADER`].
//!
//! # Thread Safety
//!
//! `dbinit`/`dbexit` and the error and message handlers are process-global.
//! A single `DBPROCESS` must not be used from two threads at once.

#![allow(unsafe_code)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
#![allow(missing_docs)]

use std::ffi::{c_char, c_int};
use std::marker::{PhantomData, PhantomPinned};

/// Absolute path of the generated umbrella header forwarding to `sybdb.h` and `sybfront.h`.
pub const UMBRELLA_HEADER: &str = concat!(env!("OUT_DIR"), "/cfreetds.h");

/// Return code of most DB-Library calls.
pub type RETCODE = c_int;
/// Row status returned by [`dbnextrow`].
pub type STATUS = c_int;
/// 32-bit DB-Library integer.
pub type DBINT = i32;
/// Unsigned byte.
pub type BYTE = u8;

/// Opaque connection handle.
#[repr(C)]
pub struct DBPROCESS {
    _data: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

/// Opaque login record.
#[repr(C)]
pub struct LOGINREC {
    _data: [u8; 0],
    _marker: PhantomData<(*mut u8, PhantomPinned)>,
}

// Return codes
pub const SUCCEED: RETCODE = 1;
pub const FAIL: RETCODE = 0;
pub const NO_MORE_RESULTS: RETCODE = 2;

// dbnextrow status
pub const REG_ROW: STATUS = -1;
pub const MORE_ROWS: STATUS = -1;
pub const NO_MORE_ROWS: STATUS = -2;
pub const BUF_FULL: STATUS = -3;

// Error handler return values
pub const INT_EXIT: c_int = 0;
pub const INT_CONTINUE: c_int = 1;
pub const INT_CANCEL: c_int = 2;
pub const INT_TIMEOUT: c_int = 3;

// dbsetlname field selectors
pub const DBSETHOST: c_int = 1;
pub const DBSETUSER: c_int = 2;
pub const DBSETPWD: c_int = 3;
pub const DBSETAPP: c_int = 5;
pub const DBSETBCP: c_int = 6;
pub const DBSETNATLANG: c_int = 7;
pub const DBSETCHARSET: c_int = 10;
pub const DBSETPACKET: c_int = 11;
pub const DBSETENCRYPT: c_int = 12;
pub const DBSETLABELED: c_int = 13;
pub const DBSETDBNAME: c_int = 14;

// dbsetlversion values
pub const DBVERSION_UNKNOWN: BYTE = 0;
pub const DBVERSION_46: BYTE = 1;
pub const DBVERSION_100: BYTE = 2;
pub const DBVERSION_42: BYTE = 3;
pub const DBVERSION_70: BYTE = 4;
pub const DBVERSION_71: BYTE = 5;
pub const DBVERSION_72: BYTE = 6;
pub const DBVERSION_73: BYTE = 7;
pub const DBVERSION_74: BYTE = 8;

// Column type tokens returned by dbcoltype
pub const SYBIMAGE: c_int = 34;
pub const SYBTEXT: c_int = 35;
pub const SYBVARBINARY: c_int = 37;
pub const SYBINTN: c_int = 38;
pub const SYBVARCHAR: c_int = 39;
pub const SYBBINARY: c_int = 45;
pub const SYBCHAR: c_int = 47;
pub const SYBINT1: c_int = 48;
pub const SYBBIT: c_int = 50;
pub const SYBINT2: c_int = 52;
pub const SYBINT4: c_int = 56;
pub const SYBDATETIME4: c_int = 58;
pub const SYBREAL: c_int = 59;
pub const SYBMONEY: c_int = 60;
pub const SYBDATETIME: c_int = 61;
pub const SYBFLT8: c_int = 62;
pub const SYBNTEXT: c_int = 99;
pub const SYBBITN: c_int = 104;
pub const SYBDECIMAL: c_int = 106;
pub const SYBNUMERIC: c_int = 108;
pub const SYBFLTN: c_int = 109;
pub const SYBMONEYN: c_int = 110;
pub const SYBDATETIMN: c_int = 111;
pub const SYBMONEY4: c_int = 122;
pub const SYBINT8: c_int = 127;

/// Error handler installed with [`dberrhandle`].
pub type EHANDLEFUNC = Option<
    unsafe extern "C" fn(
        dbproc: *mut DBPROCESS,
        severity: c_int,
        dberr: c_int,
        oserr: c_int,
        dberrstr: *mut c_char,
        oserrstr: *mut c_char,
    ) -> c_int,
>;

/// Server message handler installed with [`dbmsghandle`].
pub type MHANDLEFUNC = Option<
    unsafe extern "C" fn(
        dbproc: *mut DBPROCESS,
        msgno: DBINT,
        msgstate: c_int,
        severity: c_int,
        msgtext: *mut c_char,
        srvname: *mut c_char,
        procname: *mut c_char,
        line: c_int,
    ) -> c_int,
>;

unsafe extern "C" {
    pub fn dbinit() -> RETCODE;
    pub fn dbexit();

    pub fn dblogin() -> *mut LOGINREC;
    pub fn dbloginfree(login: *mut LOGINREC);
    pub fn dbsetlname(login: *mut LOGINREC, value: *const c_char, which: c_int) -> RETCODE;
    pub fn dbsetlversion(login: *mut LOGINREC, version: BYTE) -> RETCODE;

    pub fn tdsdbopen(login: *mut LOGINREC, server: *const c_char, msdblib: c_int)
    -> *mut DBPROCESS;
    pub fn dbuse(dbproc: *mut DBPROCESS, name: *const c_char) -> RETCODE;
    pub fn dbclose(dbproc: *mut DBPROCESS);

    pub fn dbcmd(dbproc: *mut DBPROCESS, cmdstring: *const c_char) -> RETCODE;
    pub fn dbsqlexec(dbproc: *mut DBPROCESS) -> RETCODE;
    pub fn dbresults(dbproc: *mut DBPROCESS) -> RETCODE;
    pub fn dbnextrow(dbproc: *mut DBPROCESS) -> STATUS;
    pub fn dbcancel(dbproc: *mut DBPROCESS) -> RETCODE;
    pub fn dbcanquery(dbproc: *mut DBPROCESS) -> RETCODE;

    pub fn dbnumcols(dbproc: *mut DBPROCESS) -> c_int;
    pub fn dbcolname(dbproc: *mut DBPROCESS, column: c_int) -> *mut c_char;
    pub fn dbcoltype(dbproc: *mut DBPROCESS, column: c_int) -> c_int;
    pub fn dbdata(dbproc: *mut DBPROCESS, column: c_int) -> *mut BYTE;
    pub fn dbdatlen(dbproc: *mut DBPROCESS, column: c_int) -> DBINT;

    pub fn dberrhandle(handler: EHANDLEFUNC) -> EHANDLEFUNC;
    pub fn dbmsghandle(handler: MHANDLEFUNC) -> MHANDLEFUNC;
}

/// `dbopen` macro: Sybase-compatible open.
///
/// # Safety
///
/// `login` must come from [`dblogin`] and `server` must be null or a valid C string.
pub unsafe fn dbopen(login: *mut LOGINREC, server: *const c_char) -> *mut DBPROCESS {
    unsafe { tdsdbopen(login, server, 0) }
}

/// `DBSETLHOST` macro.
///
/// # Safety
///
/// `login` must come from [`dblogin`] and `value` must be a valid C string.
pub unsafe fn DBSETLHOST(login: *mut LOGINREC, value: *const c_char) -> RETCODE {
    unsafe { dbsetlname(login, value, DBSETHOST) }
}

/// `DBSETLUSER` macro.
///
/// # Safety
///
/// `login` must come from [`dblogin`] and `value` must be a valid C string.
pub unsafe fn DBSETLUSER(login: *mut LOGINREC, value: *const c_char) -> RETCODE {
    unsafe { dbsetlname(login, value, DBSETUSER) }
}

/// `DBSETLPWD` macro.
///
/// # Safety
///
/// `login` must come from [`dblogin`] and `value` must be a valid C string.
pub unsafe fn DBSETLPWD(login: *mut LOGINREC, value: *const c_char) -> RETCODE {
    unsafe { dbsetlname(login, value, DBSETPWD) }
}

/// `DBSETLAPP` macro.
///
/// # Safety
///
/// `login` must come from [`dblogin`] and `value` must be a valid C string.
pub unsafe fn DBSETLAPP(login: *mut LOGINREC, value: *const c_char) -> RETCODE {
    unsafe { dbsetlname(login, value, DBSETAPP) }
}

/// `DBSETLDBNAME` macro.
///
/// # Safety
///
/// `login` must come from [`dblogin`] and `value` must be a valid C string.
pub unsafe fn DBSETLDBNAME(login: *mut LOGINREC, value: *const c_char) -> RETCODE {
    unsafe { dbsetlname(login, value, DBSETDBNAME) }
}
