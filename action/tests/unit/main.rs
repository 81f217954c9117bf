//! Integration tests for the deploy action

mod fake;
mod test_delete;
mod test_find_app;
mod test_fsm;
mod test_log_bundle;
