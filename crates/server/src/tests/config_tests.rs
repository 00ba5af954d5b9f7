use super::{apply_env_overrides, apply_file_overrides, Settings};

use std::collections::HashMap;

fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| vars.get(key).cloned()
}

#[test]
fn defaults_bind_to_loopback() {
    let settings = Settings::default();
    assert_eq!(settings.server_bind, "127.0.0.1:8080");
    assert!(settings.bind_addr().is_ok());
}

#[test]
fn file_overrides_bind_and_body_limit() {
    let mut settings = Settings::default();
    apply_file_overrides(
        &mut settings,
        "bind_addr = \"0.0.0.0:9000\"\nbody_limit_bytes = 1024\n",
    );
    assert_eq!(settings.server_bind, "0.0.0.0:9000");
    assert_eq!(settings.body_limit_bytes, 1024);
}

#[test]
fn unparseable_file_is_ignored() {
    let mut settings = Settings::default();
    apply_file_overrides(&mut settings, "bind_addr = [unterminated");
    assert_eq!(settings, Settings::default());
}

#[test]
fn app_prefixed_env_wins_over_plain_env() {
    let mut settings = Settings::default();
    apply_env_overrides(
        &mut settings,
        env(&[
            ("SERVER_BIND", "127.0.0.1:1111"),
            ("APP__BIND_ADDR", "127.0.0.1:2222"),
        ]),
    );
    assert_eq!(settings.server_bind, "127.0.0.1:2222");
}

#[test]
fn invalid_body_limit_env_is_ignored() {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings, env(&[("APP__BODY_LIMIT_BYTES", "lots")]));
    assert_eq!(settings.body_limit_bytes, Settings::default().body_limit_bytes);
}

#[test]
fn bad_bind_address_reports_context() {
    let settings = Settings {
        server_bind: "not-an-addr".into(),
        ..Settings::default()
    };
    let err = settings.bind_addr().expect_err("should fail");
    assert!(err.to_string().contains("not-an-addr"));
}
