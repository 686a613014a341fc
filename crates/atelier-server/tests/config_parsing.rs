//! Configuration loading from TOML files and environment overrides.

use std::io::Write;

use atelier_server::config::StorageBackend;
use atelier_server::config::loader::load_config;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

// Every case lives in one test: the environment is process-wide.
#[test]
fn loads_file_and_applies_env_overrides() {
    let file = write_config(
        r#"
[server]
host = "127.0.0.1"
port = 9100

[logging]
level = "debug"

[auth]
jwt_secret = "a-very-long-shared-secret-for-tests-only"
admin_roles = ["owner", "admin"]

[site]
locales = ["en", "pt-BR"]

[cache]
render_ttl_secs = 30
"#,
    );
    let path = file.path().to_str().unwrap();

    let cfg = load_config(Some(path)).unwrap();
    assert_eq!(cfg.server.port, 9100);
    assert_eq!(cfg.logging.level, "debug");
    assert_eq!(cfg.auth.admin_roles, vec!["owner", "admin"]);
    assert_eq!(cfg.site.locales, vec!["en", "pt-BR"]);
    assert_eq!(cfg.cache.render_ttl_secs, 30);
    assert_eq!(cfg.cache.max_entries, 512);
    assert_eq!(cfg.storage.backend, StorageBackend::Memory);

    // SAFETY: no other test in this binary reads the environment.
    unsafe {
        std::env::set_var("ATELIER__SERVER__PORT", "9200");
        std::env::set_var("ATELIER__SITE__LOCALES", "en,fr");
    }
    let cfg = load_config(Some(path));
    unsafe {
        std::env::remove_var("ATELIER__SERVER__PORT");
        std::env::remove_var("ATELIER__SITE__LOCALES");
    }
    let cfg = cfg.unwrap();
    assert_eq!(cfg.server.port, 9200);
    assert_eq!(cfg.site.locales, vec!["en", "fr"]);

    let bad = write_config(
        r#"
[auth]
jwt_secret = "short"
"#,
    );
    let err = load_config(bad.path().to_str()).unwrap_err();
    assert!(err.contains("jwt_secret"), "{err}");

    let pg = write_config(
        r#"
[auth]
jwt_secret = "a-very-long-shared-secret-for-tests-only"

[storage]
backend = "postgres"
"#,
    );
    let err = load_config(pg.path().to_str()).unwrap_err();
    assert!(err.contains("storage.postgres"), "{err}");
}
