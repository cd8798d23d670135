//! Tests for the meterbind tracing setup.

use std::sync::Mutex;

use meterbind_core::tracing::init_tracing;

/// Serializes tests that touch `METERBIND_LOG`.
static TRACING_MUTEX: Mutex<()> = Mutex::new(());

#[test]
fn init_tracing_accepts_per_crate_filter() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    std::env::set_var("METERBIND_LOG", "meterbind_engine=debug,meterbind_simple=warn");
    init_tracing();
    std::env::remove_var("METERBIND_LOG");
}

#[test]
fn init_tracing_is_idempotent() {
    let _lock = TRACING_MUTEX.lock().unwrap();
    init_tracing();
    init_tracing();
}
