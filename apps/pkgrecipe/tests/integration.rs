//! Integration tests for pkgrecipe CLI

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const VENTURA_RECIPE: &str = r#"
name: ventura
version: "0.8"
license: MIT
url: http://github.com/TyRoXx/ventura
generators: cmake
requires: silicium/0.12@TyRoXx/stable
exports: ["ventura/*"]
package:
  - { pattern: "*.hpp", dst: include/ventura, src: ventura, keep_path: true }
imports:
  - { pattern: "*.dll", dst: bin, src: bin }
  - { pattern: "*.dylib*", dst: bin, src: lib }
"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("config.toml"), "").unwrap();
        fs::write(dir.path().join("ventura.yml"), VENTURA_RECIPE).unwrap();
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn write(&self, relative: &str, contents: &str) {
        let path = self.path().join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, contents).unwrap();
    }

    fn run(&self, args: &[&str]) -> Output {
        self.run_with_env(args, &[])
    }

    fn run_with_env(&self, args: &[&str], vars: &[(&str, &str)]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_pkgrecipe"))
            .current_dir(self.path())
            .arg("--config")
            .arg(self.path().join("config.toml"))
            .arg("--color")
            .arg("never")
            .args(args)
            .env_remove("RUST_LOG")
            .env_remove("PKGRECIPE_OUTPUT")
            .env_remove("PKGRECIPE_COLOR")
            .env("PKGRECIPE_CACHE", self.path().join("cache"))
            .envs(vars.iter().copied())
            .output()
            .expect("Failed to execute pkgrecipe")
    }
}

#[test]
fn test_cli_version() {
    let output = Command::new(env!("CARGO_BIN_EXE_pkgrecipe"))
        .arg("--version")
        .output()
        .expect("Failed to execute pkgrecipe");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("pkgrecipe"));
}

#[test]
fn test_cli_help() {
    let output = Command::new(env!("CARGO_BIN_EXE_pkgrecipe"))
        .arg("--help")
        .output()
        .expect("Failed to execute pkgrecipe");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["declare", "export", "package", "imports"] {
        assert!(stdout.contains(command), "help is missing {command}");
    }
}

#[test]
fn test_declare_json() {
    let ws = Workspace::new();
    let output = ws.run(&["--json", "declare", "ventura.yml"]);

    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["name"], "ventura");
    assert_eq!(value["version"], "0.8");
    assert_eq!(value["requirements"][0]["package_name"], "silicium");
    assert_eq!(value["requirements"][0]["channel"], "TyRoXx/stable");
}

#[test]
fn test_package_copies_headers() {
    let ws = Workspace::new();
    ws.write("src/ventura/path.hpp", "// path");
    ws.write("src/ventura/detail/pipe.hpp", "// pipe");

    let output = ws.run(&["package", "ventura.yml", "--root", "src", "--dest", "pkg"]);

    assert!(output.status.success());
    assert!(ws.path().join("pkg/include/ventura/path.hpp").is_file());
    assert!(ws.path().join("pkg/include/ventura/detail/pipe.hpp").is_file());
}

#[test]
fn test_package_missing_source_fails_with_code() {
    let ws = Workspace::new();
    fs::create_dir_all(ws.path().join("src")).unwrap();

    let output = ws.run(&["package", "ventura.yml", "--root", "src", "--dest", "pkg"]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("recipe.missing_source_directory"));
    assert!(!ws.path().join("pkg").exists());
}

#[test]
fn test_imports_from_local_cache() {
    let ws = Workspace::new();
    ws.write(
        "cache/silicium/0.12/TyRoXx/stable/package/bin/silicium.dll",
        "dll",
    );
    ws.write("cache/silicium/0.12/TyRoXx/stable/package/bin/notes.txt", "txt");

    let output = ws.run(&["--json", "imports", "ventura.yml", "--dest", "build"]);

    assert!(output.status.success());
    assert!(ws.path().join("build/bin/silicium.dll").is_file());
    assert!(!ws.path().join("build/bin/notes.txt").exists());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["phase"], "imports");
    assert_eq!(value["copied"].as_array().unwrap().len(), 1);
}

#[test]
fn test_imports_unresolved_dependency() {
    let ws = Workspace::new();

    let output = ws.run(&["--json", "imports", "ventura.yml"]);

    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["error"]["code"], "resolve.dependency_unresolved");
}

#[test]
fn test_error_is_json_when_output_comes_from_env() {
    let ws = Workspace::new();

    let output = ws.run_with_env(&["imports", "ventura.yml"], &[("PKGRECIPE_OUTPUT", "json")]);

    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["error"]["code"], "resolve.dependency_unresolved");
}

#[test]
fn test_error_is_json_when_output_comes_from_config_file() {
    let ws = Workspace::new();
    fs::write(
        ws.path().join("config.toml"),
        "[general]\ndefault_output = \"json\"\n",
    )
    .unwrap();

    let output = ws.run(&["imports", "ventura.yml"]);

    assert_eq!(output.status.code(), Some(1));
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["error"]["code"], "resolve.dependency_unresolved");
}

#[test]
fn test_export_copies_recipe_relative_files() {
    let ws = Workspace::new();
    ws.write("ventura/path.hpp", "// path");

    let output = ws.run(&["export", "ventura.yml", "--dest", "exported"]);

    assert!(output.status.success());
    assert!(ws.path().join("exported/ventura/path.hpp").is_file());
}
