use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Deserialize;

use photo_metrix::calibration::{
    CalibrationError, CalibrationParams, CalibrationSession, Prompt, PromptLevel,
};
use photo_metrix::core::{photos_to_geojson, Dms, GeotagError, GeotaggedPhoto, GpsFix, Hemisphere};
use photo_metrix::estimate::{EstimateError, EstimateIoError, EstimateReport, EstimateRequest};
use photo_metrix::Point;

use log::LevelFilter;

#[derive(thiserror::Error, Debug)]
enum CliError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    EstimateIo(#[from] EstimateIoError),
    #[error(transparent)]
    Estimate(#[from] EstimateError),
    #[error(transparent)]
    Calibration(#[from] CalibrationError),
    #[cfg(not(feature = "tracing"))]
    #[error(transparent)]
    Logger(#[from] log::SetLoggerError),
}

#[derive(Parser, Debug)]
#[command(
    name = "photo-metrix",
    version,
    about = "Measure real-world distances in photographs"
)]
struct Cli {
    /// Log debug output to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate the distance between two detected objects from a JSON request.
    Estimate {
        request: PathBuf,
        /// Report path; overrides `output_path` from the request.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Replay calibration and measurement clicks given as `x,y` points.
    Measure {
        #[arg(
            short,
            long = "point",
            value_parser = parse_point,
            allow_hyphen_values = true,
            required = true
        )]
        points: Vec<Point>,
        /// Known length of the calibration segment in meters.
        #[arg(long, default_value_t = 1.0)]
        reference_length: f64,
    },
    /// Export geotagged photos (DMS coordinates) as GeoJSON.
    Geojson {
        input: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// GPS metadata of one photo as written by a metadata extractor.
#[derive(Debug, Deserialize)]
struct PhotoRecord {
    filename: String,
    path: String,
    #[serde(default)]
    latitude: Option<Dms>,
    #[serde(default)]
    latitude_ref: Option<String>,
    #[serde(default)]
    longitude: Option<Dms>,
    #[serde(default)]
    longitude_ref: Option<String>,
    #[serde(default)]
    altitude_m: Option<f64>,
}

impl PhotoRecord {
    fn fix(&self) -> Result<Option<GpsFix>, GeotagError> {
        let (Some(lat), Some(lat_ref), Some(lon), Some(lon_ref)) = (
            self.latitude,
            self.latitude_ref.as_deref(),
            self.longitude,
            self.longitude_ref.as_deref(),
        ) else {
            return Ok(None);
        };
        let lat_ref: Hemisphere = lat_ref.parse()?;
        let lon_ref: Hemisphere = lon_ref.parse()?;
        GpsFix::from_dms(lat, lat_ref, lon, lon_ref, self.altitude_m).map(Some)
    }
}

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    init_logging(cli.verbose)?;
    match cli.command {
        Command::Estimate { request, output } => run_estimate(&request, output),
        Command::Measure {
            points,
            reference_length,
        } => run_measure(&points, reference_length),
        Command::Geojson { input, output } => run_geojson(&input, &output),
    }
}

fn log_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

#[cfg(not(feature = "tracing"))]
fn init_logging(verbose: bool) -> Result<(), CliError> {
    photo_metrix::core::init_with_level(log_level(verbose))?;
    Ok(())
}

#[cfg(feature = "tracing")]
fn init_logging(verbose: bool) -> Result<(), CliError> {
    // Library crates log through `log`; forward those records to tracing.
    let _ = tracing_log::LogTracer::init();
    photo_metrix::core::init_tracing(false, log_level(verbose));
    Ok(())
}

fn run_estimate(request_path: &Path, output: Option<PathBuf>) -> Result<(), CliError> {
    let mut req = EstimateRequest::load_json(request_path)?;
    fill_image_width(&mut req);

    let estimator = req.build_estimator()?;
    let context = req.build_context(estimator.params());

    let mut report = EstimateReport::new(&req, request_path);
    match estimator.estimate(&req.detections, &context) {
        Ok(result) => {
            println!(
                "best: {:.2} m ({})",
                result.best,
                result.best_method.label()
            );
            for (method, value) in result.ranked() {
                println!("  {method}: {value:.3} m");
            }
            report.set_result(result);
        }
        Err(err) => {
            println!("estimation failed: {err}");
            report.set_error(err);
        }
    }

    let output_path = output.unwrap_or_else(|| req.output_path());
    report.write_json(&output_path)?;
    println!("wrote report JSON to {}", output_path.display());
    Ok(())
}

#[cfg(feature = "image")]
fn fill_image_width(req: &mut EstimateRequest) {
    if req.image_width_px.is_some() {
        return;
    }
    let Some(image_path) = req.image_path.as_deref() else {
        return;
    };
    match photo_metrix::probe::image_width_px(image_path) {
        Ok(width) => req.image_width_px = Some(width),
        Err(err) => log::warn!("cannot read dimensions of {image_path}: {err}"),
    }
}

#[cfg(not(feature = "image"))]
fn fill_image_width(_req: &mut EstimateRequest) {}

fn run_measure(points: &[Point], reference_length_m: f64) -> Result<(), CliError> {
    let mut session = CalibrationSession::new(CalibrationParams { reference_length_m })?;
    show_prompt(&session.prompt());

    for point in points {
        match session.handle_click(*point) {
            Ok(outcome) => {
                if let Some(m) = outcome.measurement {
                    println!(
                        "measurement #{}: {:.3} m ({:.2} px)",
                        m.index + 1,
                        m.distance_m,
                        m.pixel_distance
                    );
                }
                show_prompt(&outcome.prompt);
            }
            Err(err) => {
                println!("error: {err}");
                show_prompt(&err.prompt().unwrap_or_else(|| session.prompt()));
            }
        }
    }

    let count = session.history().len();
    println!("{count} measurement(s) completed");
    Ok(())
}

fn show_prompt(prompt: &Prompt) {
    let marker = match prompt.level() {
        PromptLevel::Info => "",
        PromptLevel::Success => " (ok)",
        PromptLevel::Critical => " (!)",
    };
    println!("[{}{marker}] {prompt}", prompt.title());
}

fn run_geojson(input: &Path, output: &Path) -> Result<(), CliError> {
    let raw = fs::read_to_string(input)?;
    let records: Vec<PhotoRecord> = serde_json::from_str(&raw)?;

    let photos: Vec<GeotaggedPhoto> = records
        .iter()
        .map(|record| {
            let fix = record.fix().unwrap_or_else(|err| {
                log::warn!("invalid GPS data for {}: {err}", record.filename);
                None
            });
            GeotaggedPhoto {
                filename: record.filename.clone(),
                path: record.path.clone(),
                fix,
            }
        })
        .collect();

    let geojson = photos_to_geojson(&photos);
    fs::write(output, serde_json::to_string_pretty(&geojson)?)?;

    let exported = photos.iter().filter(|p| p.has_gps()).count();
    println!(
        "wrote {exported} of {} photo(s) to {}",
        photos.len(),
        output.display()
    );
    Ok(())
}

fn parse_point(s: &str) -> Result<Point, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,y`, got `{s}`"))?;
    let x: f64 = x
        .trim()
        .parse()
        .map_err(|_| format!("invalid x coordinate `{x}`"))?;
    let y: f64 = y
        .trim()
        .parse()
        .map_err(|_| format!("invalid y coordinate `{y}`"))?;
    Ok(Point::new(x, y))
}
