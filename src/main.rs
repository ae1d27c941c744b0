//! Murmur - Procedural ambient drones for narrative reading

use anyhow::Result;
use clap::Parser;
use murmur::config::{self, MurmurConfig};
use murmur::engine::{self, Engine, OfflineBackend, Recorder};
use std::path::Path;
use std::time::Duration;
use tokio::time::Interval;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Play {
            config: config_path,
            volume,
            chapter,
            chapter_secs,
        } => {
            let cfg = load(&config_path)?;

            let mut engine = Engine::new(&cfg);
            if let Some(v) = volume {
                engine.set_volume(v);
            }
            if let Some(c) = chapter {
                engine.on_chapter_change(c);
            }

            println!("Starting Murmur...");
            println!("  Volume: {:.0}%", engine.volume() * 100.0);
            println!("  Chapter: {}", engine.chapter());

            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()?;
            rt.block_on(play(engine, chapter_secs))?;
        }

        Commands::Record {
            config: config_path,
            output,
            duration,
            chapter_secs,
        } => {
            let cfg = load(&config_path)?;
            let sample_rate = cfg.audio.sample_rate;

            println!("Recording {} seconds to {:?}...", duration, output);

            let backend = OfflineBackend::new(sample_rate);
            let renderer = backend.renderer();
            let mut engine = Engine::with_backend(&cfg, Box::new(backend));
            let mut recorder = Recorder::new(&output, sample_rate, cfg.audio.buffer_size)?;

            engine.activate();

            let segment = chapter_secs.unwrap_or(duration).max(1);
            let mut remaining = duration;
            while remaining > 0 {
                let secs = remaining.min(segment);
                recorder.capture(&renderer, secs as f64)?;
                remaining -= secs;

                if chapter_secs.is_some() && remaining > 0 {
                    let next = engine.chapter().next();
                    engine.on_chapter_change(next.get() as i64);
                    println!("  Chapter {} (x{:.1})", engine.chapter(), engine.mood_multiplier());
                }
            }

            engine.deactivate();
            recorder.capture(&renderer, engine.fade_out_secs())?;
            engine.dispose();

            println!("Recorded {:.1}s to {:?}", recorder.duration_secs(), output);
            recorder.finalize()?;
        }

        Commands::Devices => {
            println!("Available output devices:\n");

            if let Some(name) = engine::default_device_name() {
                println!("Default output: {}\n", name);
            }

            let devices = engine::list_output_devices();
            if devices.is_empty() {
                println!("  (none)");
            }
            for (name, config) in devices {
                println!(
                    "  - {} ({} Hz, {} ch)",
                    name, config.sample_rate.0, config.channels
                );
            }
        }

        Commands::Check { config: config_path } => {
            println!("Checking configuration at {:?}...", config_path);

            match config::load_config(&config_path) {
                Ok(cfg) => {
                    println!("Configuration is valid!");
                    println!("  Sample rate: {} Hz", cfg.audio.sample_rate);
                    println!("  Buffer size: {}", cfg.audio.buffer_size);
                    println!(
                        "  Device: {}",
                        cfg.audio.device.as_deref().unwrap_or("(default)")
                    );
                    println!("  Volume: {:.0}%", cfg.engine.volume * 100.0);
                    println!("  Chapter: {}", cfg.engine.chapter);
                    match cfg.engine.seed {
                        Some(seed) => println!("  Seed: {}", seed),
                        None => println!("  Seed: (random)"),
                    }
                    println!(
                        "  Fades: in {}s, out {}s, mood {}s, volume {}s",
                        cfg.fades.fade_in, cfg.fades.fade_out, cfg.fades.mood, cfg.fades.volume
                    );
                }
                Err(e) => {
                    println!("Configuration is invalid: {}", e);
                    std::process::exit(1);
                }
            }
        }

        Commands::Init => {
            let example_config = include_str!("../murmur.example.yaml");

            let path = "murmur.yaml";
            if std::path::Path::new(path).exists() {
                println!("murmur.yaml already exists. Not overwriting.");
            } else {
                std::fs::write(path, example_config)?;
                println!("Created murmur.yaml with example configuration.");
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "murmur=info",
        1 => "murmur=debug",
        _ => "murmur=trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load(path: &Path) -> Result<MurmurConfig> {
    if !path.exists() {
        info!("no config at {:?}, using defaults", path);
    }
    config::load_or_default(path)
}

async fn play(mut engine: Engine, chapter_secs: Option<u64>) -> Result<()> {
    if !engine.activate() {
        println!("No audio output available, nothing to play.");
        return Ok(());
    }
    println!("Playing. Press Ctrl-C to stop.");

    let mut ticker = chapter_secs.map(|s| {
        let period = Duration::from_secs(s.max(1));
        tokio::time::interval_at(tokio::time::Instant::now() + period, period)
    });

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = next_tick(&mut ticker) => {
                let next = engine.chapter().next();
                if next != engine.chapter() {
                    engine.on_chapter_change(next.get() as i64);
                    println!("  Chapter {} (x{:.1})", engine.chapter(), engine.mood_multiplier());
                }
            }
        }
    }

    println!("\nFading out...");
    engine.deactivate();
    tokio::time::sleep(Duration::from_secs_f64(engine.fade_out_secs())).await;
    engine.dispose();
    Ok(())
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending::<()>().await,
    }
}
