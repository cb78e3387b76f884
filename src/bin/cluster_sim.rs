use clap::Parser;
use gpusim_rs::cluster::{
    build_cluster, read_input_lines, trace_source_from_files, ClusterReport, SystemConfig,
};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "cluster-sim",
    about = "Run GPU instruction traces on the gpusim-rs cluster simulator"
)]
struct Args {
    /// Path to a trace file; repeat once per GPU when SHARED_TRACE=false
    #[arg(long, required = true)]
    trace: Vec<PathBuf>,

    /// Path to the system config (KEY = VALUE text, or .json)
    #[arg(long)]
    config: PathBuf,

    /// Write the run report as JSON to this path
    #[arg(long)]
    report_json: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    let args = Args::parse();

    let config = SystemConfig::load(&args.config).unwrap_or_else(|err| {
        eprintln!("config error: {err}");
        std::process::exit(2);
    });

    let mut files = Vec::new();
    for path in &args.trace {
        files.push(read_input_lines(path).expect("read trace file"));
    }

    let traces = trace_source_from_files(&config, files).unwrap_or_else(|err| {
        eprintln!("trace error: {err}");
        std::process::exit(2);
    });

    let mut engine = build_cluster(&config, &traces).unwrap_or_else(|err| {
        eprintln!("error: {err}");
        std::process::exit(1);
    });

    if let Err(err) = engine.run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }

    let report = ClusterReport::collect(&engine, config.num_gpus);
    for gpu in &report.gpus {
        println!(
            "gpu_summary gpu={} finished={} last_end_ns={}",
            gpu.gpu,
            gpu.finished.len(),
            gpu.last_end_ns()
        );
    }
    println!("sim_end_ns={}", report.end_time_ns);

    if let Some(path) = &args.report_json {
        let json = serde_json::to_string_pretty(&report).expect("serialize report");
        fs::write(path, json).expect("write report json");
    }
}
