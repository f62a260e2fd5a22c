#![warn(clippy::pedantic)]

mod script;

use anyhow::Result as AnyResult;
use ratsketch_core::{config::CanvasConfig, export::ExportError, surface::DrawingSurface};

const USAGE: &str = "usage: ratsketch [--config <file>] [--out <dir>] <script.toml>...";

struct Args {
    config: Option<std::path::PathBuf>,
    out: std::path::PathBuf,
    scripts: Vec<std::path::PathBuf>,
}
impl Args {
    fn parse() -> AnyResult<Self> {
        let mut config = None;
        let mut out = std::path::PathBuf::from(".");
        let mut scripts = Vec::new();
        // Paths are OSStrings, let the system handle character encoding restrictions.
        let mut args = std::env::args_os().skip(1);
        while let Some(arg) = args.next() {
            match arg.to_str() {
                Some("--config") => {
                    let path = args
                        .next()
                        .ok_or_else(|| anyhow::anyhow!("--config needs a path"))?;
                    config = Some(path.into());
                }
                Some("--out") => {
                    out = args
                        .next()
                        .ok_or_else(|| anyhow::anyhow!("--out needs a directory"))?
                        .into();
                }
                Some("-h" | "--help") => anyhow::bail!(USAGE),
                _ => scripts.push(arg.into()),
            }
        }
        if scripts.is_empty() {
            anyhow::bail!(USAGE);
        }
        Ok(Self {
            config,
            out,
            scripts,
        })
    }
}

/// Replay one script and write its `.png` and `.svg` next to each other in `out`.
fn render_script(
    runtime: &tokio::runtime::Runtime,
    config: &CanvasConfig,
    out: &std::path::Path,
    path: &std::path::Path,
    script: &script::Script,
) -> AnyResult<()> {
    let mut surface = DrawingSurface::new(config.surface_options());
    surface.mount();
    script.replay(&mut surface);
    if surface.is_drawing() {
        log::warn!("{path:?} ends mid-gesture, the open stroke is left out");
    }

    let stem = path
        .file_stem()
        .ok_or_else(|| anyhow::anyhow!("{path:?} has no file name"))?;
    let scene = surface.scene();
    let svg = scene.to_svg();
    let png = runtime.block_on(scene.encode_png_within(config.export_timeout()))?;

    let mut target = out.join(stem);
    target.set_extension("png");
    std::fs::write(&target, png)?;
    target.set_extension("svg");
    std::fs::write(&target, svg)?;
    log::info!(
        "{path:?}: {} strokes written to {:?}",
        surface.committed_strokes().len(),
        out.join(stem)
    );
    Ok(())
}

fn main() -> AnyResult<()> {
    let has_term = std::io::IsTerminal::is_terminal(&std::io::stdin());
    // Log to a terminal, if available. Else, log to "log.out" in the working directory.
    if has_term {
        env_logger::builder()
            .filter_level(log::LevelFilter::Info)
            .parse_default_env()
            .init();
    } else {
        let _ = simple_logging::log_to_file("log.out", log::LevelFilter::Info);
    }

    let args = Args::parse()?;
    let config = match &args.config {
        Some(path) => CanvasConfig::read(path)?,
        None => {
            let config = CanvasConfig::load();
            if config.did_fail_to_load() {
                // Leave a documented file behind for next time.
                if let Err(e) = config.save() {
                    log::warn!("Failed to save canvas config:\n{e:?}");
                }
            }
            config
        }
    };
    let _ = std::fs::DirBuilder::new().recursive(true).create(&args.out);

    let scripts = {
        use rayon::iter::{IntoParallelIterator, ParallelIterator};
        args.scripts
            .into_par_iter()
            .filter_map(|path| match script::Script::read(&path) {
                Ok(script) => Some((path, script)),
                Err(e) => {
                    log::error!("failed to read script {path:?}: {e:#}");
                    None
                }
            })
            .collect::<Vec<_>>()
    };

    // Rendering happens on blocking workers, one at a time.
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    let mut had_success = false;
    for (path, script) in &scripts {
        match render_script(&runtime, &config, &args.out, path, script) {
            Ok(()) => had_success = true,
            Err(e) => match e.downcast_ref::<ExportError>() {
                Some(ExportError::Timeout(after)) => {
                    log::error!("{path:?} took longer than {after:?} to render");
                }
                _ => log::error!("failed to render {path:?}: {e:#}"),
            },
        }
    }
    shut_down(runtime);
    if !had_success {
        anyhow::bail!("no script rendered successfully");
    }
    Ok(())
}

/// Drop the runtime without joining renders abandoned at their deadline.
fn shut_down(runtime: tokio::runtime::Runtime) {
    runtime.shutdown_background();
}

#[cfg(test)]
mod test {
    use super::*;
    use ratsketch_core::{color::Color, export::CanvasGeometry, export::Scene};
    use std::time::{Duration, Instant};

    #[test]
    fn timed_out_render_does_not_hold_exit() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let stuck = runtime.block_on(ratsketch_core::export::with_deadline(
            Duration::from_millis(10),
            async {
                tokio::task::spawn_blocking(|| std::thread::sleep(Duration::from_secs(3)))
                    .await
                    .map_err(ExportError::Worker)
            },
        ));
        assert!(matches!(stuck, Err(ExportError::Timeout(_))));

        let start = Instant::now();
        shut_down(runtime);
        assert!(start.elapsed() < Duration::from_secs(1), "{:?}", start.elapsed());
    }
    #[test]
    fn deadline_export_returns_png_bytes() {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .build()
            .unwrap();
        let scene = Scene {
            background: Color::BLACK,
            strokes: Vec::new(),
            geometry: CanvasGeometry {
                canvas_size: 4.0,
                export_px: 4,
            },
        };
        let png = runtime
            .block_on(scene.encode_png_within(Duration::from_secs(5)))
            .unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
        shut_down(runtime);
    }
}
