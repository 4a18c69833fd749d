use predicates::prelude::*;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_typegen")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn template(name: &str) -> String {
    fixture_path(&format!("templates/{}", name))
}

fn rustfmt_available() -> bool {
    Command::new("rustfmt")
        .arg("--version")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

// -- rendering --

#[test]
fn renders_name_to_stdout() {
    cmd()
        .args(["Example", "-t", &template("name.tera")])
        .args(["-d", &fixture_path("noop")])
        .assert()
        .success()
        .stdout("Example is generated.");
}

#[test]
fn renders_trait_mock() {
    let assert = cmd()
        .args(["Example", "-t", &template("mock.tera")])
        .args(["-d", &fixture_path("noop")])
        .assert()
        .success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(
        output,
        "\
// Code generated by typegen. DO NOT EDIT.
use crate::context::Context;
use std::error::Error;

pub struct ExampleMock;

impl Example for ExampleMock {
    fn init(&self, ctx: Context) -> Result<(), Box<dyn Error>> {
        unimplemented!()
    }
    fn reset(&mut self) {
        unimplemented!()
    }
}
"
    );
}

#[test]
fn renders_associated_functions_without_receiver() {
    let assert = cmd()
        .args(["Example", "-t", &template("mock.tera")])
        .args(["-d", &fixture_path("ctor")])
        .assert()
        .success();
    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert_eq!(
        output,
        "\
// Code generated by typegen. DO NOT EDIT.

pub struct ExampleMock;

impl Example for ExampleMock {
    fn new(id: u8) -> Self {
        unimplemented!()
    }
    fn id(&self) -> u8 {
        unimplemented!()
    }
    fn default() -> Self {
        unimplemented!()
    }
}
"
    );
}

#[test]
fn renders_struct_getters() {
    cmd()
        .args(["Example", "-t", &template("getter.tera")])
        .args(["-d", &fixture_path("getter")])
        .assert()
        .success()
        .stdout(predicate::str::contains("pub fn name(&self) -> &String"))
        .stdout(predicate::str::contains("pub fn ptr(&self) -> *const String"))
        .stdout(predicate::str::contains("self.ptr\n"))
        .stdout(predicate::str::contains("cache").not());
}

#[test]
fn writes_output_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("example_mock.rs");

    cmd()
        .args(["Example", "-t", &template("name.tera")])
        .args(["-d", &fixture_path("noop")])
        .args(["-o", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout("");

    let output = std::fs::read_to_string(&out).unwrap();
    assert_eq!(output, "Example is generated.");
}

#[test]
fn custom_annotation_key() {
    // With another key the `#[typegen("skip")]` attribute is ignored.
    cmd()
        .args(["Example", "-t", &template("getter.tera")])
        .args(["-d", &fixture_path("getter")])
        .args(["--annotation", "gen"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pub fn cache(&self) -> &Vec<u8>"));
}

#[test]
fn formats_output() {
    if !rustfmt_available() {
        return;
    }
    cmd()
        .args(["Example", "-t", &template("unformatted.tera")])
        .args(["-d", &fixture_path("getter")])
        .arg("--format")
        .assert()
        .success()
        .stdout("fn example() -> u8 {\n    3\n}\n");
}

// -- dump --

#[test]
fn dump_prints_description() {
    let assert = cmd()
        .args(["Example", "--dump"])
        .args(["-d", &fixture_path("getter")])
        .assert()
        .success();
    let desc: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();

    assert_eq!(desc["name"], "Example");
    assert_eq!(desc["kind"], "struct");
    assert_eq!(desc["is_struct"], true);
    assert_eq!(desc["package"]["name"], "getter");

    let fields = desc["fields"].as_array().unwrap();
    let names: Vec<&str> = fields.iter().map(|f| f["name"].as_str().unwrap()).collect();
    assert_eq!(names, ["name", "cache", "ptr"]);
    assert_eq!(fields[1]["tags"]["skip"], "true");
    assert_eq!(fields[2]["type"]["name"], "*const String");
    assert_eq!(fields[2]["type"]["is_pointer"], true);
}

#[test]
fn dump_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("example.json");

    cmd()
        .args(["Example", "--dump"])
        .args(["-d", &fixture_path("ctor")])
        .args(["-o", out.to_str().unwrap()])
        .assert()
        .success()
        .stdout("");

    let content = std::fs::read_to_string(&out).unwrap();
    let desc: serde_json::Value = serde_json::from_str(&content).unwrap();
    assert_eq!(desc["methods"][0]["name"], "new");
    assert_eq!(desc["methods"][0]["receiver"], "");
    assert_eq!(desc["methods"][1]["receiver"], "&self");
}

#[test]
fn dump_trait_imports() {
    let assert = cmd()
        .args(["Example", "--dump"])
        .args(["-d", &fixture_path("noop")])
        .assert()
        .success();
    let desc: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();

    assert_eq!(desc["kind"], "interface");
    assert_eq!(desc["imports"][0]["path"], "crate::context::Context");
    assert_eq!(desc["imports"][1]["name"], "Error");
    assert_eq!(desc["methods"][1]["receiver"], "&mut self");
}

// -- failures --

#[test]
fn template_is_required() {
    cmd()
        .args(["Example", "-d", &fixture_path("noop")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--template"));
}

#[test]
fn missing_type_fails() {
    cmd()
        .args(["Missing", "-t", &template("name.tera")])
        .args(["-d", &fixture_path("noop")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("type `Missing` not found"));
}

#[test]
fn malformed_annotation_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("out.rs");

    cmd()
        .args(["Example", "-t", &template("name.tera")])
        .args(["-d", &fixture_path("malformed")])
        .args(["-o", out.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("field `value` has a malformed annotation"))
        .stderr(predicate::str::contains("is not quoted properly"));

    assert!(!out.exists());
}

#[test]
fn broken_template_fails_without_output() {
    let dir = TempDir::new().unwrap();
    let tpl = dir.path().join("broken.tera");
    let out = dir.path().join("out.rs");
    std::fs::write(&tpl, "{% for m in methods %}").unwrap();

    cmd()
        .args(["Example", "-t", tpl.to_str().unwrap()])
        .args(["-d", &fixture_path("noop")])
        .args(["-o", out.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to compile template"));

    assert!(!out.exists());
}

#[test]
fn missing_template_file_fails() {
    cmd()
        .args(["Example", "-t", "/no/such/template.tera"])
        .args(["-d", &fixture_path("noop")])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read template"));
}
