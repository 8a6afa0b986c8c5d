use anyhow::Result;
use chrono::Utc;
use clap::{Parser, ValueEnum};
use mylocations_rs::acquisition::{FixReport, Outcome, StatusSnapshot};
use mylocations_rs::geocoder::{NominatimGeocoder, ReverseGeocoder, ScriptedGeocoder};
use mylocations_rs::sources::{Scenario, ScenarioSource};
use mylocations_rs::types::{duration_from_secs, format_coordinate};
use mylocations_rs::{AcquisitionConfig, Authorization, FixController, FixRunner, Notification};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::time::timeout;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum GeocoderKind {
    /// Answer from the scenario's "geocode" block
    Scripted,
    /// Query OpenStreetMap Nominatim
    Nominatim,
}

#[derive(Parser, Debug)]
#[command(name = "mylocations")]
#[command(about = "Acquire one location fix from a replayed scenario", long_about = None)]
struct Args {
    /// Scenario file (.json or .json.gz)
    #[arg(value_name = "SCENARIO")]
    scenario: PathBuf,

    /// Acquisition config JSON (missing fields use defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Give up after this many seconds without a fix
    #[arg(long)]
    timeout: Option<f64>,

    /// Accuracy (meters) that ends the search
    #[arg(long)]
    target_accuracy: Option<f64>,

    /// Replay speed-up (2.0 = twice as fast)
    #[arg(long, default_value = "1.0")]
    time_scale: f64,

    #[arg(long, value_enum, default_value = "scripted")]
    geocoder: GeocoderKind,

    /// Seconds to wait for the address after the fix is final
    #[arg(long, default_value = "15")]
    address_grace: f64,

    /// Output directory
    #[arg(long, default_value = "mylocations_output")]
    output_dir: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AcquisitionConfig::load(path)?,
        None => AcquisitionConfig::default(),
    };
    if let Some(t) = args.timeout {
        config.timeout_secs = t;
    }
    if let Some(acc) = args.target_accuracy {
        config.target_accuracy_m = acc;
    }
    config.validate()?;
    let time_scale = if args.time_scale.is_finite() && args.time_scale > 0.0 {
        args.time_scale
    } else {
        log::warn!("Ignoring time scale {}, replaying in real time", args.time_scale);
        1.0
    };
    // the timer runs on wall time, scenario delivery is scaled
    config.timeout_secs /= time_scale;

    let scenario = Scenario::load(&args.scenario)?;

    println!("[{}] MyLocations Starting", ts_now());
    println!("  Scenario: {} ({} steps)", scenario.name, scenario.steps.len());
    println!("  Target accuracy: {:.1} m", config.target_accuracy_m);
    println!("  Timeout: {:.1} s", config.timeout_secs);
    println!("  Geocoder: {:?}", args.geocoder);

    std::fs::create_dir_all(&args.output_dir)?;

    let geocoder: Arc<dyn ReverseGeocoder> = match args.geocoder {
        GeocoderKind::Scripted => Arc::new(
            ScriptedGeocoder::new(scenario.geocode.clone()).with_time_scale(time_scale),
        ),
        GeocoderKind::Nominatim => Arc::new(NominatimGeocoder::new()),
    };
    let source = ScenarioSource::new(scenario).with_time_scale(time_scale);

    let (runner, handle, mut notifications) =
        FixRunner::new(FixController::new(config), source, geocoder);
    let runner_task = tokio::spawn(runner.run());

    // a replayed scenario stands in for a permission the user already granted
    handle.set_authorization(Authorization::Authorized).await?;
    handle.start().await?;

    let mut last: Option<StatusSnapshot> = None;
    let mut outcome: Option<Outcome> = None;

    while let Some(notification) = notifications.recv().await {
        match notification {
            Notification::Status(snapshot) => {
                print_status(&snapshot);
                last = Some(snapshot);
            }
            Notification::Finished(result) => {
                outcome = Some(result);
                break;
            }
        }
    }

    // the address may still be on its way
    let grace = duration_from_secs(args.address_grace);
    if last.as_ref().map(|s| s.geocoding).unwrap_or(false) {
        println!("[{}] Waiting for address...", ts_now());
        let waited = timeout(grace, async {
            while let Some(notification) = notifications.recv().await {
                if let Notification::Status(snapshot) = notification {
                    print_status(&snapshot);
                    if !snapshot.geocoding {
                        break;
                    }
                }
            }
        })
        .await;
        if waited.is_err() {
            log::warn!("Address lookup did not finish within {:.0} s", grace.as_secs_f64());
        }
    }

    let snapshot = handle.snapshot().await?;
    drop(handle);
    let _ = runner_task.await;

    println!("\n=== Result ===");
    match &outcome {
        Some(Outcome::Success { position, reason }) => {
            println!("Latitude:  {}", format_coordinate(position.latitude));
            println!("Longitude: {}", format_coordinate(position.longitude));
            println!("Accuracy:  {:.1} m ({:?})", position.accuracy, reason);
            println!("Address:   {}", snapshot.address_label().replace('\n', ", "));
        }
        Some(Outcome::Failure { cause }) => {
            println!("{}: {}", snapshot.status.message(), cause);
        }
        None => println!("{}", snapshot.status.message()),
    }

    let report = FixReport {
        generated_at: Utc::now().to_rfc3339(),
        snapshot,
        outcome,
    };
    let report_path = args.output_dir.join("fix_status.json");
    report.save(&report_path)?;
    println!("[{}] Saved {}", ts_now(), report_path.display());

    Ok(())
}

fn print_status(snapshot: &StatusSnapshot) {
    match &snapshot.position {
        Some(p) => println!(
            "[{}] {} {} ±{:.1} m | {}",
            ts_now(),
            format_coordinate(p.latitude),
            format_coordinate(p.longitude),
            p.accuracy,
            snapshot.address_label().replace('\n', ", ")
        ),
        None => println!("[{}] {}", ts_now(), snapshot.status.message()),
    }
}

fn ts_now() -> String {
    Utc::now().format("%H:%M:%S").to_string()
}
