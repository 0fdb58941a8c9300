#![allow(missing_docs)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::cargo::cargo_bin_cmd;
use serde_json::Value;
use tempfile::TempDir;

fn reelgraph() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("reelgraph");
    cmd.env_remove("REELGRAPH_CONFIG")
        .env_remove("NEO4J_URI")
        .env_remove("NEO4J_VERSION")
        .env("RUST_LOG", "off");
    cmd
}

fn json_stdout(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout is json")
}

fn stderr(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write fixture");
    path
}

fn empty_config(dir: &Path) -> PathBuf {
    write(dir, "config.toml", "")
}

#[test]
fn query_movie_as_json() {
    let dir = TempDir::new().expect("tempdir");
    let output = reelgraph()
        .arg("--config")
        .arg(empty_config(dir.path()))
        .args([
            "--format", "json", "query", "movie", "--title", "Speed", "--backend", "memory",
        ])
        .output()
        .expect("run reelgraph");
    assert!(output.status.success(), "{output:?}");
    let body = json_stdout(&output);
    assert_eq!(body["Title"], "Speed");
    assert_eq!(body["Cast"][0]["Role"][0], "Jack Traven");
}

#[test]
fn query_by_actor_lists_movies() {
    let dir = TempDir::new().expect("tempdir");
    let output = reelgraph()
        .arg("--config")
        .arg(empty_config(dir.path()))
        .args([
            "--format",
            "json",
            "query",
            "by-actor",
            "--name",
            "Keanu Reeves",
            "--backend",
            "memory",
        ])
        .output()
        .expect("run reelgraph");
    assert!(output.status.success(), "{output:?}");
    let titles: Vec<String> = json_stdout(&output)
        .as_array()
        .expect("array")
        .iter()
        .filter_map(|m| m["Title"].as_str().map(str::to_owned))
        .collect();
    assert_eq!(titles, ["The Matrix", "The Matrix Reloaded", "Speed"]);
}

#[test]
fn not_found_exits_with_status_3() {
    let dir = TempDir::new().expect("tempdir");
    let output = reelgraph()
        .arg("--config")
        .arg(empty_config(dir.path()))
        .args(["query", "movie", "--title", "Unknown", "--backend", "memory"])
        .output()
        .expect("run reelgraph");
    assert_eq!(output.status.code(), Some(3), "{output:?}");
    assert!(stderr(&output).contains("movie not found"));
}

#[test]
fn missing_argument_is_an_error() {
    let dir = TempDir::new().expect("tempdir");
    let output = reelgraph()
        .arg("--config")
        .arg(empty_config(dir.path()))
        .args(["query", "by-director", "--backend", "memory"])
        .output()
        .expect("run reelgraph");
    assert_eq!(output.status.code(), Some(1), "{output:?}");
    assert!(stderr(&output).contains("error: --name is required"));
}

#[test]
fn text_output_lists_cast() {
    let dir = TempDir::new().expect("tempdir");
    let output = reelgraph()
        .arg("--config")
        .arg(empty_config(dir.path()))
        .args(["query", "movie", "--title", "Top Gun", "--backend", "memory"])
        .output()
        .expect("run reelgraph");
    assert!(output.status.success(), "{output:?}");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Top Gun"), "{stdout}");
    assert!(stdout.contains("- Tom Cruise (acted: Maverick)"), "{stdout}");
    assert!(stdout.contains("- Tony Scott (directed)"), "{stdout}");
    assert!(stdout.contains("1 movie in"), "{stdout}");
}

#[test]
fn csv_graph_from_config_file() {
    let dir = TempDir::new().expect("tempdir");
    let nodes = write(
        dir.path(),
        "nodes.csv",
        "id,labels,title,name\nm1,Movie,Heat,\np1,Person,,Michael Mann\n",
    );
    let edges = write(dir.path(), "edges.csv", "src,dst,type,roles\np1,m1,DIRECTED,\n");
    let config = write(
        dir.path(),
        "config.toml",
        &format!(
            "backend = \"memory\"\n\n[memory]\nnodes = {:?}\nedges = {:?}\n",
            nodes.display().to_string(),
            edges.display().to_string()
        ),
    );
    let output = reelgraph()
        .arg("--config")
        .arg(&config)
        .args(["--format", "json", "query", "all"])
        .output()
        .expect("run reelgraph");
    assert!(output.status.success(), "{output:?}");
    assert_eq!(
        json_stdout(&output),
        serde_json::json!([
            { "Title": "Heat", "Cast": [{ "Name": "Michael Mann", "Job": "directed" }] }
        ])
    );
}

#[test]
fn missing_explicit_config_is_reported() {
    let dir = TempDir::new().expect("tempdir");
    let output = reelgraph()
        .arg("--config")
        .arg(dir.path().join("absent.toml"))
        .args(["query", "all", "--backend", "memory"])
        .output()
        .expect("run reelgraph");
    assert_eq!(output.status.code(), Some(1), "{output:?}");
    assert!(stderr(&output).contains("failed to read config"));
}

#[test]
fn neo4j_uri_is_read_from_environment() {
    let dir = TempDir::new().expect("tempdir");
    let output = reelgraph()
        .env("NEO4J_URI", "gopher://db:7687")
        .arg("--config")
        .arg(empty_config(dir.path()))
        .args(["query", "all", "--backend", "neo4j"])
        .output()
        .expect("run reelgraph");
    assert_eq!(output.status.code(), Some(1), "{output:?}");
    assert!(stderr(&output).contains("Unsupported URI scheme: gopher"), "{output:?}");
}

#[test]
fn neo4j_uri_flag_beats_environment() {
    let dir = TempDir::new().expect("tempdir");
    let output = reelgraph()
        .env("NEO4J_URI", "gopher://db:7687")
        .arg("--config")
        .arg(empty_config(dir.path()))
        .args(["query", "all", "--backend", "neo4j", "--neo4j-uri", "ftp://db:7687"])
        .output()
        .expect("run reelgraph");
    assert_eq!(output.status.code(), Some(1), "{output:?}");
    let stderr = stderr(&output);
    assert!(stderr.contains("Unsupported URI scheme: ftp"), "{stderr}");
}
