//! # Kilo Hoku Command Line
//!
//! Terminal front end for the sky engine: prints the moon phase for an instant,
//! reads the planisphere dial at an angle, or replays a drag gesture over a
//! simulated wheel widget, inline or inside the modal wheel.

// Test modules
#[cfg(test)]
mod tests;

mod logging;

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing::{debug, info};

use kilo_hoku_lib::config::{Config, PlanisphereConfig, DEFAULT_CONFIG_PATH, DEFAULT_LOG_FILTER};
use kilo_hoku_lib::renderer::{render_dial_ascii, render_moon_ascii};
use kilo_hoku_lib::{
    moon_phase, GestureEvent, ModalClosePolicy, OrientationController, Planisphere,
    PointerSample, SkySnapshot, StaticSurface,
};

/// Hawaiian sky reference: moon phases and planisphere dial.
#[derive(Parser)]
#[command(name = "kilo-hoku", version, about = "Moon phases and planisphere dial")]
struct Cli {
    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to TOML configuration file.
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the moon phase for an instant (default: now).
    Moon {
        /// RFC 3339 instant, e.g. 2024-01-25T00:00:00Z or 2024-01-24T14:00:00-10:00.
        #[arg(long)]
        at: Option<String>,
        /// Print JSON instead of the text card.
        #[arg(long)]
        json: bool,
    },
    /// Read the planisphere dial at an angle (default: configured initial angle).
    Dial {
        /// Rotation angle in degrees; may be negative or exceed a full turn.
        #[arg(long, allow_hyphen_values = true)]
        angle: Option<f64>,
        /// Print JSON instead of the text card.
        #[arg(long)]
        json: bool,
    },
    /// Replay a single drag gesture over a square wheel widget.
    Drag {
        /// Send the samples as single-finger touches instead of mouse events.
        #[arg(long)]
        touch: bool,
        /// Drag the modal wheel, then close it and show what the inline wheel kept.
        #[arg(long)]
        modal: bool,
        /// Close policy for --modal (default: configured `modal_close_policy`).
        #[arg(long, value_parser = parse_policy, requires = "modal")]
        policy: Option<ModalClosePolicy>,
        /// Pointer samples as `x,y` in widget pixels; the first one is the press.
        #[arg(required = true, num_args = 1.., allow_hyphen_values = true)]
        points: Vec<String>,
    },
    /// Print the moon reading and dial readout together as JSON.
    Snapshot {
        /// RFC 3339 instant (default: now).
        #[arg(long)]
        at: Option<String>,
        /// Rotation angle in degrees (default: configured initial angle).
        #[arg(long, allow_hyphen_values = true)]
        angle: Option<f64>,
    },
}

/// Main application entry point.
fn main() {
    let cli = Cli::parse();
    let loaded = Config::try_load_from_path(&cli.config);
    let filter = match &loaded {
        Ok(config) => config.logging.filter.as_str(),
        Err(_) => DEFAULT_LOG_FILTER,
    };
    logging::init(cli.verbose, filter);
    let config = Config::or_default(loaded, &cli.config);

    if let Err(e) = run(cli.command, &config) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Moon { at, json } => {
            let instant = at.as_deref().map(parse_instant).transpose()?;
            let reading = moon_phase(instant);
            if json {
                println!("{}", serde_json::to_string_pretty(&reading)?);
            } else {
                print!("{}", render_moon_ascii(&reading));
            }
        }
        Command::Dial { angle, json } => {
            let angle = angle.unwrap_or(config.planisphere.initial_angle_degrees);
            if json {
                let reading = kilo_hoku_lib::readout::calendar_reading(angle);
                println!("{}", serde_json::to_string_pretty(&reading)?);
            } else {
                print!("{}", render_dial_ascii(angle));
            }
        }
        Command::Drag {
            touch,
            modal,
            policy,
            points,
        } => {
            let samples = points
                .iter()
                .map(|p| parse_point(p))
                .collect::<Result<Vec<_>>>()?;
            if modal {
                let mut planisphere = config.planisphere.clone();
                if let Some(policy) = policy {
                    planisphere.modal_close_policy = policy;
                }
                let replay = replay_modal_drag(&samples, touch, &planisphere);
                println!("Modal wheel at close:");
                print!("{}", render_dial_ascii(replay.modal_angle));
                println!(
                    "Inline wheel after close ({}):",
                    policy_name(planisphere.modal_close_policy)
                );
                print!("{}", render_dial_ascii(replay.inline_angle));
                return Ok(());
            }
            let angle = replay_drag(
                &samples,
                touch,
                config.planisphere.initial_angle_degrees,
                config.planisphere.widget_size_px,
            );
            print!("{}", render_dial_ascii(angle));
        }
        Command::Snapshot { at, angle } => {
            let instant = at.as_deref().map(parse_instant).transpose()?;
            let angle = angle.unwrap_or(config.planisphere.initial_angle_degrees);
            let snapshot = SkySnapshot::capture(instant, angle);
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
    }
    Ok(())
}

/// Parse an RFC 3339 instant with any offset into UTC.
fn parse_instant(text: &str) -> Result<DateTime<Utc>> {
    let instant = DateTime::parse_from_rfc3339(text.trim())
        .with_context(|| format!("invalid instant {text:?}, expected RFC 3339"))?;
    Ok(instant.with_timezone(&Utc))
}

/// Parse an `x,y` pointer sample.
fn parse_point(text: &str) -> Result<PointerSample> {
    let Some((x, y)) = text.split_once(',') else {
        bail!("invalid point {text:?}, expected x,y");
    };
    let x: f64 = x
        .trim()
        .parse()
        .with_context(|| format!("invalid x in point {text:?}"))?;
    let y: f64 = y
        .trim()
        .parse()
        .with_context(|| format!("invalid y in point {text:?}"))?;
    if !(x.is_finite() && y.is_finite()) {
        bail!("point {text:?} must have finite coordinates");
    }
    Ok(PointerSample::new(x, y))
}

/// Parse a `--policy` value.
fn parse_policy(text: &str) -> Result<ModalClosePolicy> {
    match text.trim().to_ascii_lowercase().as_str() {
        "commit" => Ok(ModalClosePolicy::Commit),
        "discard" => Ok(ModalClosePolicy::Discard),
        _ => bail!("invalid policy {text:?}, expected commit or discard"),
    }
}

fn policy_name(policy: ModalClosePolicy) -> &'static str {
    match policy {
        ModalClosePolicy::Commit => "commit",
        ModalClosePolicy::Discard => "discard",
    }
}

/// Feed `samples` to `dispatch` as one gesture: press at the first sample,
/// move through the rest, release.
fn replay_gesture<F>(
    samples: &[PointerSample],
    touch: bool,
    surface: &mut StaticSurface,
    mut dispatch: F,
) where
    F: FnMut(GestureEvent<'_>, &mut StaticSurface),
{
    let Some((first, rest)) = samples.split_first() else {
        return;
    };
    info!(samples = samples.len(), touch, "replaying drag");

    if touch {
        dispatch(GestureEvent::TouchStart(std::slice::from_ref(first)), surface);
    } else {
        dispatch(GestureEvent::PointerDown(*first), surface);
    }
    for sample in rest {
        let event = if touch {
            GestureEvent::TouchMove(std::slice::from_ref(sample))
        } else {
            GestureEvent::PointerMove(*sample)
        };
        dispatch(event, surface);
    }
    dispatch(
        if touch {
            GestureEvent::TouchEnd
        } else {
            GestureEvent::PointerUp
        },
        surface,
    );

    debug!(
        live_listeners = surface.live_registrations(),
        "drag replay finished"
    );
}

/// Replay one drag on a lone wheel starting at `start_angle`. Returns the final angle.
fn replay_drag(samples: &[PointerSample], touch: bool, start_angle: f64, widget_size: f64) -> f64 {
    let mut surface = StaticSurface::square(widget_size);
    let mut wheel = OrientationController::with_angle(start_angle);
    replay_gesture(samples, touch, &mut surface, |event, surface| {
        wheel.handle(event, surface)
    });
    wheel.rotation_angle_degrees()
}

/// Angles of both wheels after a modal drag.
#[derive(Debug, Clone, Copy, PartialEq)]
struct ModalReplay {
    /// Modal wheel angle when it was closed
    modal_angle: f64,
    /// Inline wheel angle once the close policy has been applied
    inline_angle: f64,
}

/// Open the modal wheel over the inline one, replay one drag on it, then close it
/// under the configured policy.
fn replay_modal_drag(
    samples: &[PointerSample],
    touch: bool,
    settings: &PlanisphereConfig,
) -> ModalReplay {
    let mut surface = StaticSurface::square(settings.widget_size_px);
    let mut sky = Planisphere::new(settings.initial_angle_degrees, settings.modal_close_policy);
    let seeded = sky.open_modal().rotation_angle_degrees();
    replay_gesture(samples, touch, &mut surface, |event, surface| {
        sky.handle(event, surface)
    });
    let modal_angle = sky.close_modal().unwrap_or(seeded);
    ModalReplay {
        modal_angle,
        inline_angle: sky.inline().rotation_angle_degrees(),
    }
}
