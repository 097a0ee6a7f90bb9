use clap::{Parser, Subcommand};
use qr_tuner::config::{DEFAULT_DISPLAY_SCALE, DEFAULT_OUT_DIR};
use qr_tuner::models::tuning::DEFAULT_THRESHOLD;
use qr_tuner::sink::{DisplaySink, HeadlessDisplay};
use qr_tuner::source::{FrameSource, ImageSequenceSource, SourceSpec};
use qr_tuner::{Result, RqrrDetector, Session, SessionConfig, TunerError, annotate_image};
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "qrtune", version, about = "Multi-QR detection with live threshold tuning")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the interactive tune-detect-render loop
    Live {
        /// Camera index, video file, image file or image directory
        #[arg(long, default_value = "0")]
        video: String,
        /// Keyboard poll interval in milliseconds
        #[arg(long, default_value_t = 2)]
        wait_time: u64,
        /// Where saved frames go
        #[arg(long, default_value = DEFAULT_OUT_DIR)]
        out_dir: PathBuf,
        /// Save every displayed frame
        #[arg(long)]
        save_frame: bool,
        /// Initial binarization threshold
        #[arg(long, default_value_t = DEFAULT_THRESHOLD as i32, allow_hyphen_values = true)]
        threshold: i32,
        /// Scale of the side-by-side display
        #[arg(long, default_value_t = DEFAULT_DISPLAY_SCALE)]
        scale: f32,
        /// Scripted keys for window-less runs, one per frame ('.' = no key)
        #[arg(long)]
        keys: Option<String>,
        /// Never open a window, even when camera support is built in
        #[arg(long)]
        headless: bool,
    },
    /// Detect QR codes in a single image and write an annotated copy
    Detect {
        #[arg(long)]
        image: PathBuf,
        #[arg(long)]
        output: PathBuf,
        /// Binarize at this threshold before detecting
        #[arg(long, allow_hyphen_values = true)]
        threshold: Option<i32>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let outcome = match cli.command {
        Command::Live {
            video,
            wait_time,
            out_dir,
            save_frame,
            threshold,
            scale,
            keys,
            headless,
        } => {
            let config = SessionConfig {
                initial_threshold: threshold,
                poll_interval: Duration::from_millis(wait_time),
                out_dir,
                save_frames: save_frame,
                display_scale: scale,
                ..SessionConfig::default()
            };
            live_cmd(&video, config, keys.as_deref(), headless)
        }
        Command::Detect {
            image,
            output,
            threshold,
        } => detect_cmd(&image, &output, threshold),
    };

    if let Err(err) = outcome {
        log::error!("{err}");
        process::exit(1);
    }
}

fn live_cmd(video: &str, config: SessionConfig, keys: Option<&str>, headless: bool) -> Result<()> {
    let target = SourceSpec::parse(video);
    log::info!("Source: {target}");

    let source: Box<dyn FrameSource> = match target {
        SourceSpec::Images(path) => Box::new(ImageSequenceSource::open(path)?),
        other => open_capture(other)?,
    };
    let display = open_display(&config, keys, headless)?;

    let summary = Session::new(config, source, RqrrDetector::new(), display)?.run()?;
    log::info!(
        "frames={} saved={} save_failures={} final_threshold={}",
        summary.frames,
        summary.saved,
        summary.save_failures,
        summary.final_threshold
    );
    Ok(())
}

#[cfg(feature = "camera")]
fn open_capture(spec: SourceSpec) -> Result<Box<dyn FrameSource>> {
    Ok(Box::new(qr_tuner::camera::CameraSource::open(spec)?))
}

#[cfg(not(feature = "camera"))]
fn open_capture(spec: SourceSpec) -> Result<Box<dyn FrameSource>> {
    Err(TunerError::source_open(
        spec.to_string(),
        "camera and video input need the `camera` feature",
    ))
}

fn open_display(
    config: &SessionConfig,
    keys: Option<&str>,
    headless: bool,
) -> Result<Box<dyn DisplaySink>> {
    if headless || keys.is_some() || !cfg!(feature = "camera") {
        let display = keys.map_or_else(HeadlessDisplay::new, HeadlessDisplay::from_script);
        return Ok(Box::new(display));
    }
    open_window(&config.window_name)
}

#[cfg(feature = "camera")]
fn open_window(name: &str) -> Result<Box<dyn DisplaySink>> {
    Ok(Box::new(qr_tuner::camera::HighGuiWindow::open(name)?))
}

#[cfg(not(feature = "camera"))]
fn open_window(_name: &str) -> Result<Box<dyn DisplaySink>> {
    Ok(Box::new(HeadlessDisplay::new()))
}

fn detect_cmd(image: &Path, output: &Path, threshold: Option<i32>) -> Result<()> {
    let img = image::open(image).map_err(|e| {
        TunerError::source_open(image.display().to_string(), e.to_string())
    })?;
    log::info!("Image: {} ({}x{})", image.display(), img.width(), img.height());

    let mut detector = RqrrDetector::new();
    let (annotated, result) = annotate_image(&img, &mut detector, threshold);
    log::info!("Found {} QR codes: {:?}", result.len(), result.texts());

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    annotated.save(output)?;
    log::info!("Wrote {}", output.display());
    Ok(())
}
