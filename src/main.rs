use anyhow::{anyhow, Result};
use std::process;
use tracing_subscriber::EnvFilter;
use vr_navigation::cli::CliOverrides;
use vr_navigation::config::NavigationConfig;
use vr_navigation::recording::SessionRecording;
use vr_navigation::viewer::ViewerHost;
use vr_navigation::NavigationController;

fn main() {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = match CliOverrides::parse_from_env() {
        Ok(parsed) => parsed,
        Err(err) => {
            eprintln!("[cli] {err}");
            process::exit(2);
        }
    };
    if let Err(err) = run(cli) {
        eprintln!("error: {err:?}");
        process::exit(1);
    }
}

fn run(cli: CliOverrides) -> Result<()> {
    let recording_path =
        cli.recording.as_ref().ok_or_else(|| anyhow!("a recording is required: --recording <path>"))?;
    let mut config = match cli.config.as_ref() {
        Some(path) => NavigationConfig::load_or_default(path),
        None => NavigationConfig::default(),
    };
    let overrides = cli.config_overrides();
    if !overrides.is_empty() {
        tracing::info!(fields = ?overrides.applied_fields(), "applying command line overrides");
        config.apply_overrides(&overrides);
    }

    let recording = SessionRecording::load(recording_path)?;
    let mut viewer = recording.viewer();
    let mut controller = NavigationController::new(config);
    let samples = recording.replay(&mut controller, &mut viewer);

    for sample in &samples {
        let p = sample.position;
        println!(
            "{:>5} {:<12} pos=({:.4}, {:.4}, {:.4}) scale={:.4}",
            sample.frame,
            sample.mode.label(),
            p.x,
            p.y,
            p.z,
            sample.scale
        );
    }
    for event in controller.drain_events() {
        tracing::debug!(%event, "navigation event");
    }
    println!(
        "replayed {} frames; final move speed {:.4}, fly factor {:.4}",
        samples.len(),
        viewer.move_speed(),
        controller.fly().move_factor()
    );
    Ok(())
}
