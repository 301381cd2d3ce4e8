use std::process::Command;

fn level_graph() -> Command {
    Command::new(env!("CARGO_BIN_EXE_level-graph"))
}

#[test]
fn demo_world_answers_queries() {
    let dir = tempfile::tempdir().expect("tempdir");
    let status = level_graph()
        .args(["demo", "--levels", "2", "--vertices-per-level", "4"])
        .arg(dir.path())
        .status()
        .expect("run demo");
    assert!(status.success(), "demo should write a world");

    let config = dir.path().join("level-graph.toml");
    let output = level_graph()
        .arg("--config")
        .arg(&config)
        .args(["cross-table", "garbage", "--local", "3", "--json"])
        .output()
        .expect("run cross-table");
    assert!(output.status.success(), "cross-table should succeed");
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.contains("\"game_vertex_id\""));
    assert!(stdout.contains("\"level\": \"garbage\""));

    let output = level_graph()
        .arg("--config")
        .arg(&config)
        .args(["vertex", "5"])
        .output()
        .expect("run vertex");
    assert!(output.status.success(), "vertex should succeed");
    assert!(String::from_utf8_lossy(&output.stdout).contains("vertex 5 level=1"));

    let output = level_graph()
        .arg("--config")
        .arg(&config)
        .arg("summary")
        .output()
        .expect("run summary");
    assert!(output.status.success(), "summary should succeed");
    let stdout = String::from_utf8(output.stdout).expect("utf8");
    assert!(stdout.contains("vertices: 8"));
    assert!(stdout.contains("offset=[10000.0, 0.0, 0.0]"));
}

#[test]
fn unknown_level_and_vertex_fail() {
    let dir = tempfile::tempdir().expect("tempdir");
    let status = level_graph()
        .arg("demo")
        .arg(dir.path())
        .status()
        .expect("run demo");
    assert!(status.success());
    let config = dir.path().join("level-graph.toml");

    let unknown_level = level_graph()
        .arg("--config")
        .arg(&config)
        .args(["cross-table", "nonexistent-level"])
        .output()
        .expect("run cross-table");
    assert!(!unknown_level.status.success());

    let unknown_vertex = level_graph()
        .arg("--config")
        .arg(&config)
        .args(["vertex", "9999"])
        .output()
        .expect("run vertex");
    assert!(!unknown_vertex.status.success());
}
