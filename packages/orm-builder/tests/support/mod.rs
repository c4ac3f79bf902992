/// Initialize logging once per integration test binary.
#[ctor::ctor]
fn _auto_init_for_integration_tests() {
    builder_test_support::test_logging::init();
}
