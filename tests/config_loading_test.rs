//! Configuration file loading

use std::io::Write;

use cnft_driver::program::TokenProgram;
use cnft_driver::{Config, ContinuationPolicy, DriverError};

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_example_config_parses() {
    let config = Config::from_file("config.example.toml").unwrap();
    config.validate().unwrap();
    assert_eq!(config.tree.max_depth, 3);
    assert_eq!(config.tree.max_buffer_size, 8);
}

#[test]
fn test_partial_file_keeps_defaults() {
    let file = write_config(
        r#"
token_program = "token-2022"
continuation = "stop-on-failure"

[rpc]
url = "https://api.devnet.solana.com"

[priority_fee]
enabled = true
level = "medium"
"#,
    );

    let config = Config::from_file(file.path().to_str().unwrap()).unwrap();

    assert_eq!(config.rpc.url, "https://api.devnet.solana.com");
    assert_eq!(config.rpc.commitment, "confirmed");
    assert_eq!(config.token_program, TokenProgram::Token2022);
    assert_eq!(config.continuation, ContinuationPolicy::StopOnFailure);
    assert!(config.priority_fee.enabled);
    assert_eq!(config.priority_fee.level, "medium");
    assert_eq!(config.priority_fee_endpoint(), "https://api.devnet.solana.com");
    assert_eq!(config.funding.lamports, 10_000_000_000);
    assert_eq!(config.collection.name, "My Collection");
    assert!(config.validate().is_ok());
}

#[test]
fn test_invalid_values_rejected_by_validate() {
    let file = write_config(
        r#"
[tree]
max_depth = 3
max_buffer_size = 9
"#,
    );
    let config = Config::from_file(file.path().to_str().unwrap()).unwrap();
    assert!(matches!(config.validate(), Err(DriverError::Configuration(_))));

    let file = write_config(
        r#"
[rpc]
commitment = "eventually"
"#,
    );
    let config = Config::from_file(file.path().to_str().unwrap()).unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_unknown_token_program_is_parse_error() {
    let file = write_config(r#"token_program = "token-2023""#);
    assert!(Config::from_file(file.path().to_str().unwrap()).is_err());
}
