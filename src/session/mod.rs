pub(crate) mod run_session;
