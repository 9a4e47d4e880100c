use clap::Parser;
use kinematic_calibration_data::io::{DatasetSummary, write_summary};
use kinematic_calibration_data::{CalibrationDataset, DatasetError};
use std::error::Error;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(version, about, author)]
struct CalibDatasetCli {
    /// path to the root calibration json
    path: PathBuf,

    /// write a json summary of the loaded dataset
    #[arg(short, long)]
    summary: Option<PathBuf>,
}

fn run(cli: &CalibDatasetCli) -> Result<(), DatasetError> {
    let now = Instant::now();
    let dataset = CalibrationDataset::from_json_file(&cli.path)?;
    log::info!("loading took {:.6} sec", now.elapsed().as_secs_f64());

    let summary = DatasetSummary::new(&dataset);
    println!("joints: {}", summary.joint_names.join(", "));
    println!("reference points: {}", summary.reference_points);
    println!("frames: {}", summary.frame_count);
    for cam in &summary.cameras {
        println!(
            "cam{}: {} detection images, {} frames without observations",
            cam.camera_id, cam.detection_images, cam.frames_without_observations
        );
    }
    println!("point observations: {}", summary.total_observations);

    if let Some(output) = &cli.summary {
        write_summary(output, &dataset)?;
        log::info!("summary written to {}", output.display());
    }
    Ok(())
}

fn main() {
    env_logger::init();
    let cli = CalibDatasetCli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        let mut source = e.source();
        while let Some(cause) = source {
            eprintln!("  caused by: {cause}");
            source = cause.source();
        }
        std::process::exit(1);
    }
}
