use std::fs::File;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tokio_util::sync::CancellationToken;

use host_scan_rs::scanner::{Scanner, DEFAULT_WORKER_COUNT};
use host_scan_rs::sink::ResultSink;
use host_scan_rs::types::{ScanReport, ScanRequest};
use host_scan_rs::{logger, validate};

/// host-scan-rs — Bounded-concurrency async TCP connect scanner for a single host.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "host-scan-rs",
    version,
    about = "Bounded-concurrency async TCP connect scanner for a single host.",
    long_about = None
)]
struct Cli {
    /// Target host: an IPv4/IPv6 literal or a domain name.
    target: String,

    /// Inclusive port range to scan, e.g. 1-500.
    #[arg(long, default_value = "1-1024")]
    ports: String,

    /// Number of concurrent scan workers.
    #[arg(long, default_value_t = DEFAULT_WORKER_COUNT)]
    concurrency: usize,

    /// Per-port connect timeout in milliseconds.
    #[arg(long = "timeout-ms", default_value_t = 250)]
    timeout_ms: u64,

    /// Write a JSON summary to this path (optional).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Print engine debug traces.
    #[arg(long, default_value_t = false)]
    verbose: bool,
}

/// Prints events as they arrive and collects open ports for the summary.
/// `println!` serializes on stdout's lock, so concurrent workers are fine.
struct CliSink {
    total: u64,
    scanned: AtomicU64,
    open_ports: Mutex<Vec<u16>>,
}

impl CliSink {
    fn new(total: u64) -> Self {
        Self {
            total,
            scanned: AtomicU64::new(0),
            open_ports: Mutex::new(Vec::new()),
        }
    }

    fn scanned(&self) -> u64 {
        self.scanned.load(Ordering::Relaxed)
    }

    fn open_ports(&self) -> Vec<u16> {
        let mut ports = self.open_ports.lock().expect("open port list poisoned").clone();
        ports.sort_unstable();
        ports
    }
}

impl ResultSink for CliSink {
    fn on_open_port(&self, port: u16) {
        println!("Port {port} is open");
        self.open_ports
            .lock()
            .expect("open port list poisoned")
            .push(port);
    }

    fn on_progress(&self, done: u64, total: u64) {
        self.scanned.fetch_max(done, Ordering::Relaxed);
        // One line per ~10% keeps long scans readable.
        let step = (self.total / 10).max(1);
        if done % step == 0 || done == total {
            println!("Progress: {done}/{total}");
        }
    }

    fn on_error(&self, message: &str) {
        eprintln!("{message}");
    }

    fn on_finished(&self) {
        println!("Scan complete.");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    if cli.verbose {
        logger::init();
    }

    let target = validate::validate_target(&cli.target)?;
    let (start_port, end_port) = validate::validate_port_range(&cli.ports)?;
    let request = ScanRequest::new(target, start_port, end_port)?;

    println!("Starting scan on target: {}", request.target());
    println!("  ports       : {}-{}", start_port, end_port);
    println!("  concurrency : {}", cli.concurrency);
    println!("  timeout_ms  : {}", cli.timeout_ms);

    // Ctrl-C requests early stop; workers notice between probes.
    let cancel = CancellationToken::new();
    let cancel_ctrlc = cancel.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        cancel_ctrlc.cancel();
    });

    let sink = Arc::new(CliSink::new(request.total_ports()));
    let scanner = Scanner::new(cli.concurrency, Duration::from_millis(cli.timeout_ms));
    scanner
        .run_with_cancel(&request, sink.clone(), cancel)
        .await?;

    let open_ports = sink.open_ports();
    println!(
        "\nOpen ports: {} (scanned: {})",
        open_ports.len(),
        sink.scanned()
    );

    if let Some(path) = cli.output.as_deref() {
        let report = ScanReport {
            target: request.target().to_string(),
            start_port,
            end_port,
            scanned: sink.scanned(),
            open_ports,
        };
        if let Err(e) = write_report_json(path, &report) {
            eprintln!("Failed to write JSON to {}: {}", path.display(), e);
        } else {
            println!("Wrote JSON results to {}", path.display());
        }
    }

    Ok(())
}

fn write_report_json(path: &std::path::Path, report: &ScanReport) -> Result<()> {
    let file = File::create(path)?;
    serde_json::to_writer_pretty(file, report)?;
    Ok(())
}
