use clap::Parser;
use dialoguer::{Select, theme::ColorfulTheme};
use std::fs::OpenOptions;
use std::path::Path;
use voicewave::app::{self, ExitCode};
use voicewave::audio;
use voicewave::config::{self, Args, Commands};
use voicewave::error::AppResult;

fn list_devices() -> AppResult<()> {
    let device_list = audio::list_input_devices()?;

    if device_list.is_empty() {
        println!("No audio input devices found.");
        return Ok(());
    }

    // Interactive selection
    let selection = Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Select an audio input device")
        .items(&device_list)
        .default(0)
        .interact()?;

    println!("{}", device_list[selection]);

    Ok(())
}

/// Logging setup; the terminal UI owns the screen, so logs go to a file or nowhere
fn init_logging(log_file: Option<&Path>, default_filter: &str) -> AppResult<()> {
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter),
    );

    match log_file {
        Some(path) => {
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            builder
                .format_timestamp_millis()
                .target(env_logger::Target::Pipe(Box::new(file)));
        }
        None => {
            builder.format_timestamp(None);
        }
    }

    builder.init();
    Ok(())
}

/// Default filter for the visualizer; stderr would garble the alternate screen
fn visualizer_log_filter(log_file: Option<&Path>) -> &'static str {
    if log_file.is_some() { "info" } else { "off" }
}

async fn run_visualizer(config: AppResult<config::Config>, log_file: Option<&Path>) {
    if let Err(e) = init_logging(log_file, visualizer_log_filter(log_file)) {
        eprintln!("Logging setup error: {}", e);
        std::process::exit(ExitCode::Error as i32);
    }

    let config = match config {
        Ok(c) => c,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(ExitCode::Error as i32);
        }
    };

    match app::App::new_with_config(config) {
        Ok(app) => {
            let run_result = app.run().await;
            match run_result.result {
                Ok(_) => {
                    std::process::exit(run_result.exit_code as i32);
                }
                Err(e) => {
                    log::error!("{}", e);
                    eprintln!("Application error: {}", e);
                    std::process::exit(ExitCode::Error as i32);
                }
            }
        }
        Err(e) => {
            eprintln!("Setup error: {}", e);
            std::process::exit(ExitCode::Error as i32);
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    match args.command {
        Commands::Monitor(monitor_args) => {
            let config = config::Config::from_monitor_args(&monitor_args);
            run_visualizer(config, monitor_args.log_file.as_deref()).await;
        }
        Commands::Demo(demo_args) => {
            let config = config::Config::from_demo_args(&demo_args);
            run_visualizer(config, demo_args.log_file.as_deref()).await;
        }
        Commands::List(_) => {
            if let Err(e) = init_logging(None, "warn") {
                eprintln!("Logging setup error: {}", e);
            }
            if let Err(e) = list_devices() {
                eprintln!("Error listing devices: {}", e);
                std::process::exit(ExitCode::Error as i32);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visualizer_logs_only_to_a_file() {
        assert_eq!(visualizer_log_filter(None), "off");
        assert_eq!(visualizer_log_filter(Some(Path::new("voicewave.log"))), "info");
    }
}
