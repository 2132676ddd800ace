
mod test_log;
mod test_reopen;
