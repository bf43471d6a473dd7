use std::fs;
use std::path::Path;
use std::process::Command;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn codegen() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_conjure-codegen"));
    cmd.env("CONJURE_LOG", "warn");
    cmd
}

fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn writes_bundle_from_flags() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("out/library.json");

    let status = codegen()
        .args(["-i", &fixture("library.conjure.json"), "-i", &fixture("multi")])
        .arg("-o")
        .arg(&out)
        .arg("--strict")
        .status()
        .unwrap();
    assert!(status.success());

    let bundle = read_json(&out);
    assert_eq!(bundle["strictness"], "strict");
    let names: Vec<_> = bundle["types"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"]["name"].as_str().unwrap().to_owned())
        .collect();
    assert!(names.contains(&"SearchQuery".to_owned()));
    assert!(names.contains(&"Route".to_owned()));
}

#[test]
fn config_file_supplies_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("bundle.json");
    let config = dir.path().join("conjure.kdl");
    fs::write(
        &config,
        format!(
            "codegen {{\n    input \"{}\"\n    output \"{}\"\n    pretty #true\n}}\n",
            fixture("multi"),
            out.display()
        ),
    )
    .unwrap();

    let status = codegen().arg("--config").arg(&config).status().unwrap();
    assert!(status.success());

    let text = fs::read_to_string(&out).unwrap();
    assert!(text.contains("\n  "));
    assert_eq!(read_json(&out)["strictness"], "lenient");
}

#[test]
fn schema_errors_exit_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("never.json");

    let output = codegen()
        .args(["-i", &fixture("invalid/unresolved.conjure.json")])
        .arg("-o")
        .arg(&out)
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("com.example.missing.Ghost"));
    assert!(!out.exists());
}

#[test]
fn missing_output_exits_nonzero() {
    let output = codegen()
        .args(["-i", &fixture("library.conjure.json")])
        .output()
        .unwrap();
    assert!(!output.status.success());
}
