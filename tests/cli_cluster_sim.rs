use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "gpusim-rs-{prefix}-{}-{nanos}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn write_file(dir: &PathBuf, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write temp file");
    path
}

const SHARED_CONFIG: &str = "\
# cluster config
NUM_GPUS = 2
NETWORK_BANDWIDTH = 100   # GB/s
TOPOLOGY = ring
COMPUTE_CAPABILITY = 1
COMMUNICATION_CHUNK_SIZE = 65536
";

#[test]
fn cluster_sim_runs_and_writes_report() {
    let dir = unique_temp_dir("run");
    let config = write_file(&dir, "config.txt", SHARED_CONFIG);
    let trace = write_file(
        &dir,
        "trace.txt",
        "\
# one compute step then one all-reduce
COMPUTE, ALL, , 5000, EXECUTE
COMMUNICATION, ALL, , 500, ALL_REDUCE
",
    );
    let report = dir.join("report.json");

    let output = Command::new(env!("CARGO_BIN_EXE_cluster_sim"))
        .args([
            "--trace",
            trace.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
            "--report-json",
            report.to_str().unwrap(),
        ])
        .output()
        .expect("run cluster_sim");
    assert!(
        output.status.success(),
        "cluster_sim failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("gpu_summary gpu=0 finished=2 last_end_ns=5"));
    assert!(stdout.contains("gpu_summary gpu=1 finished=2 last_end_ns=5"));
    assert!(stdout.contains("sim_end_ns=5"));

    let raw = fs::read_to_string(&report).expect("read report.json");
    let v: Value = serde_json::from_str(&raw).expect("parse report.json");
    assert_eq!(v["end_time_ns"], 5);
    assert_eq!(v["num_gpus"], 2);
    let gpus = v["gpus"].as_array().expect("gpus array");
    assert_eq!(gpus.len(), 2);
    for gpu in gpus {
        let finished = gpu["finished"].as_array().expect("finished array");
        assert_eq!(finished.len(), 2);
    }

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn cluster_sim_runs_per_gpu_traces() {
    let dir = unique_temp_dir("per-gpu");
    let config = write_file(
        &dir,
        "config.txt",
        "\
NUM_GPUS = 2
NETWORK_BANDWIDTH = 100
COMPUTE_CAPABILITY = 1
SHARED_TRACE = false
",
    );
    let trace0 = write_file(
        &dir,
        "trace0.txt",
        "COMPUTE, ALL, , 5000, EXECUTE\nCOMMUNICATION, ALL, , 500, ALL_REDUCE\n",
    );
    let trace1 = write_file(
        &dir,
        "trace1.txt",
        "COMPUTE, ALL, , 3000, EXECUTE\nCOMMUNICATION, ALL, , 900, ALL_REDUCE\n",
    );

    let output = Command::new(env!("CARGO_BIN_EXE_cluster_sim"))
        .args([
            "--trace",
            trace0.to_str().unwrap(),
            "--trace",
            trace1.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .output()
        .expect("run cluster_sim");
    assert!(
        output.status.success(),
        "cluster_sim failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("gpu_summary gpu=0 finished=2 last_end_ns=5"));
    assert!(stdout.contains("gpu_summary gpu=1 finished=2 last_end_ns=9"));
    assert!(stdout.contains("sim_end_ns=9"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn cluster_sim_rejects_trace_count_mismatch() {
    let dir = unique_temp_dir("trace-count");
    let config = write_file(
        &dir,
        "config.txt",
        "\
NUM_GPUS = 2
NETWORK_BANDWIDTH = 100
COMPUTE_CAPABILITY = 1
SHARED_TRACE = false
",
    );
    let trace = write_file(&dir, "trace.txt", "COMPUTE, ALL, , 5000, EXECUTE\n");

    let output = Command::new(env!("CARGO_BIN_EXE_cluster_sim"))
        .args([
            "--trace",
            trace.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .output()
        .expect("run cluster_sim");
    assert!(
        !output.status.success(),
        "expected non-zero exit, got success"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("expected 2 trace file(s)"),
        "stderr did not contain expected message: {stderr}"
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn cluster_sim_exits_nonzero_on_malformed_trace() {
    let dir = unique_temp_dir("malformed");
    let config = write_file(&dir, "config.txt", SHARED_CONFIG);
    let trace = write_file(&dir, "trace.txt", "COMPUTE, ALL, , 5000\n");

    let output = Command::new(env!("CARGO_BIN_EXE_cluster_sim"))
        .args([
            "--trace",
            trace.to_str().unwrap(),
            "--config",
            config.to_str().unwrap(),
        ])
        .output()
        .expect("run cluster_sim");
    assert!(
        !output.status.success(),
        "expected non-zero exit, got success"
    );
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("malformed trace line"),
        "stderr did not contain expected message: {stderr}"
    );

    let _ = fs::remove_dir_all(&dir);
}
