//! Display format of `AppError` variants.

use sgwc_registry::AppError;

#[test]
fn display_prefixes_identify_the_kind() {
    let cases = [
        (AppError::Config("x".into()), "config: x"),
        (AppError::Db("x".into()), "db: x"),
        (AppError::Allocation("x".into()), "allocation: x"),
        (AppError::Validation("x".into()), "validation: x"),
        (AppError::LimitReached("x".into()), "limit reached: x"),
        (AppError::NotFound("x".into()), "not found: x"),
        (AppError::Render("x".into()), "render: x"),
        (AppError::Io("x".into()), "io: x"),
    ];
    for (err, expected) in cases {
        assert_eq!(err.to_string(), expected);
    }
}

#[test]
fn io_error_converts_to_io_variant() {
    let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "document receiver closed");
    let err = AppError::from(io);
    assert!(matches!(err, AppError::Io(ref msg) if msg.contains("document receiver closed")));
}

#[test]
fn sqlx_error_converts_to_db_variant() {
    let err = AppError::from(sqlx::Error::RowNotFound);
    assert!(err.to_string().starts_with("db:"));
}

#[test]
fn toml_error_converts_to_config_variant() {
    let toml_err = toml::from_str::<toml::Table>("= broken").expect_err("invalid toml");
    let err = AppError::from(toml_err);
    assert!(err.to_string().starts_with("config: invalid config"));
}
