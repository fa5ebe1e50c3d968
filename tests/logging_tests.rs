use tg_sheets::setup_logging;

#[test]
fn test_logging_setup() {
    let result = std::panic::catch_unwind(|| {
        setup_logging();
        // A warm Lambda may call it again.
        setup_logging();
    });

    assert!(result.is_ok(), "setup_logging function should not panic");
}
