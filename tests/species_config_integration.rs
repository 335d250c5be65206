//! Integration tests for the species and config commands.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

/// Command isolated from the user's config and environment.
fn strikenet(home: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("strikenet");
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env_remove("RUST_LOG");
    for var in [
        "STRIKENET_PROVIDER",
        "STRIKENET_ENDPOINT",
        "STRIKENET_API_TOKEN",
        "STRIKENET_MODEL",
        "STRIKENET_TEMPERATURE",
        "STRIKENET_MAX_OUTPUT_TOKENS",
        "STRIKENET_TIMEOUT",
        "STRIKENET_TOP_K",
        "STRIKENET_THRESHOLD",
        "STRIKENET_RANKING",
        "STRIKENET_SPECIES_TABLE",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

fn stdout_json(output: &assert_cmd::assert::Assert) -> Value {
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    serde_json::from_str(stdout.trim()).expect("Valid JSON output")
}

#[test]
fn test_species_list_human_readable() {
    let dir = TempDir::new().unwrap();

    strikenet(dir.path())
        .args(["species", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("red lionfish [INVASIVE]"))
        .stdout(predicate::str::contains("nurse shark [native]"))
        .stdout(predicate::str::contains("Aliases: "));
}

#[test]
fn test_species_list_json_output() {
    let dir = TempDir::new().unwrap();

    let output = strikenet(dir.path())
        .args(["species", "list", "--json"])
        .assert()
        .success();
    let json = stdout_json(&output);

    assert_eq!(json["event"], "result");
    assert_eq!(json["payload"]["result_type"], "species_list");
    let species = json["payload"]["species"].as_array().unwrap();
    assert_eq!(species.len() as u64, json["payload"]["species_count"].as_u64().unwrap());

    let devil = species
        .iter()
        .find(|s| s["key"] == "devil firefish")
        .expect("devil firefish listed");
    assert_eq!(devil["scientific_name"], "Pterois miles");
    assert_eq!(devil["is_invasive"], true);
}

#[test]
fn test_species_lookup_alias() {
    let dir = TempDir::new().unwrap();

    let output = strikenet(dir.path())
        .args(["species", "lookup", "  LionFish ", "--json"])
        .assert()
        .success();
    let json = stdout_json(&output);

    assert_eq!(json["payload"]["result_type"], "species_lookup");
    assert_eq!(json["payload"]["normalized_label"], "lionfish");
    assert_eq!(json["payload"]["species"]["common_name"], "Red Lionfish");
}

#[test]
fn test_species_lookup_unknown_label() {
    let dir = TempDir::new().unwrap();

    strikenet(dir.path())
        .args(["species", "lookup", "manatee"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No matching species"));
}

#[test]
fn test_invalid_species_table_fails() {
    let dir = TempDir::new().unwrap();
    let table = dir.path().join("species.toml");
    std::fs::write(
        &table,
        r#"
[aliases]
lionfish = "red lionfish"
"#,
    )
    .unwrap();

    strikenet(dir.path())
        .args(["species", "list", "--species-table"])
        .arg(&table)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid species table"));
}

#[test]
fn test_config_path_uses_config_home() {
    let dir = TempDir::new().unwrap();

    strikenet(dir.path())
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("strikenet"))
        .stdout(predicate::str::ends_with("config.toml\n"));
}

#[test]
fn test_config_init_then_show() {
    let dir = TempDir::new().unwrap();

    strikenet(dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created configuration file"));

    strikenet(dir.path())
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));

    strikenet(dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[classification]"))
        .stdout(predicate::str::contains("top_k = 5"));
}

#[test]
fn test_config_show_redacts_token() {
    let dir = TempDir::new().unwrap();
    let config_dir = dir.path().join(".config").join("strikenet");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(
        config_dir.join("config.toml"),
        r#"
[upstream]
provider = "openai"
api_token = "sk-very-secret"

[classification]
threshold = 0.8
"#,
    )
    .unwrap();

    let output = strikenet(dir.path())
        .args(["config", "show", "--json"])
        .assert()
        .success();
    let json = stdout_json(&output);

    assert_eq!(json["payload"]["result_type"], "config");
    assert_eq!(json["payload"]["config"]["upstream"]["provider"], "openai");
    assert_eq!(json["payload"]["config"]["upstream"]["api_token"], "********");
    assert_eq!(json["payload"]["config"]["classification"]["threshold"], 0.8);
    assert!(!String::from_utf8_lossy(&output.get_output().stdout).contains("sk-very-secret"));
}

#[test]
fn test_broken_config_file_fails() {
    let dir = TempDir::new().unwrap();
    let config_dir = dir.path().join(".config").join("strikenet");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "[classification\ntop_k = ").unwrap();

    strikenet(dir.path())
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config file"));
}
