use std::process::ExitCode;

use anyhow::{Context, Result};
use log::{error, info};

use turntable::config::{CliOptions, USAGE};
use turntable::gfx::rendering::CommandRenderer;
use turntable::{RenderRequest, SceneSummary, TurntableApp};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let options = match CliOptions::parse(std::env::args().skip(1)) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("error: {err}\n\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    if options.help {
        print!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    match run(&options) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(options: &CliOptions) -> Result<()> {
    let config = options
        .pipeline_config()
        .context("Failed to load pipeline config")?;
    let app = TurntableApp::new(config);

    if options.inspect {
        let scene = app
            .load(&options.input)
            .with_context(|| format!("Failed to load {}", options.input.display()))?;
        println!("{}", SceneSummary::of(&scene));
        return Ok(());
    }

    let report = app
        .run_with(&options.input, &RenderRequest::from(options), || {
            let renderer = CommandRenderer::locate(options.renderer.as_deref())?;
            info!("Using renderer {}", renderer.executable().display());
            Ok(renderer)
        })
        .with_context(|| format!("Turntable render of {} failed", options.input.display()))?;

    info!(
        "Done: {} frames, {} texture override(s) applied",
        report.frames,
        report.textures.len()
    );
    Ok(())
}
