//! Public interfaces of the commit log: the record contract and the
//! append/read surface its consumers depend on.

pub mod commit_log;
pub mod log_record;
