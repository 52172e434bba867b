use lg_domain::config::Config;

#[test]
fn default_base_url_is_gitlab_com() {
    let config = Config::default();
    assert_eq!(config.gitlab.base_url, "https://gitlab.com/api/v4");
    assert!(config.gitlab.token.is_none());
}

#[test]
fn default_host_is_localhost() {
    let config = Config::default();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 3340);
}

#[test]
fn explicit_base_url_parses() {
    let toml_str = r#"
[gitlab]
base_url = "https://gitlab.example.com/api/v4"
token = "glpat-xyz"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.gitlab.base_url, "https://gitlab.example.com/api/v4");
    assert_eq!(config.gitlab.token.as_deref(), Some("glpat-xyz"));
    // Unspecified fields keep their defaults.
    assert_eq!(config.gitlab.timeout_secs, 30);
}

#[test]
fn empty_document_is_all_defaults() {
    let config: Config = toml::from_str("").unwrap();
    assert_eq!(config.gitlab.base_url, "https://gitlab.com/api/v4");
    assert_eq!(config.server.port, 3340);
}
