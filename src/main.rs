//! vizlearn - generated 3D lessons
//!
//! This is the binary entry point. All logic lives in the library.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use vizlearn_app::config::{init_config_dir, load_settings};
use vizlearn_core::logging::{self, LogOutput};

/// vizlearn - generated 3D lessons
#[derive(Parser, Debug)]
#[command(name = "vizlearn")]
#[command(about = "Generate and play step-by-step 3D lessons", long_about = None)]
struct Args {
    /// Directory holding .vizlearn/config.toml (defaults to the current directory)
    #[arg(long, value_name = "PATH", global = true)]
    path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the lesson REST server
    Serve {
        /// Interface to bind
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(long)]
        port: Option<u16>,

        /// Directory generated lessons are stored in
        #[arg(long, value_name = "DIR")]
        lessons_dir: Option<PathBuf>,
    },

    /// Play lessons headlessly: commands on stdin, JSON events on stdout
    Play {
        /// Lesson server base URL
        #[arg(long, value_name = "URL")]
        server: Option<String>,
    },

    /// Write a commented default .vizlearn/config.toml
    Init,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();

    // Get base path from args or use current directory
    let base_path = args
        .path
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    match args.command {
        Command::Serve {
            host,
            port,
            lessons_dir,
        } => {
            logging::init(LogOutput::FileAndStderr)?;

            let mut settings = load_settings(&base_path);
            if let Some(host) = host {
                settings.server.host = host;
            }
            if let Some(port) = port {
                settings.server.port = port;
            }
            if let Some(dir) = lessons_dir {
                settings.server.lessons_dir = dir;
            }

            vizlearn::run_serve(&base_path, settings).await?;
        }
        Command::Play { server } => {
            logging::init(LogOutput::File)?;
            if let Ok(file) = logging::get_current_log_file() {
                eprintln!("Logging to {}", file.display());
            }

            let mut settings = load_settings(&base_path);
            if let Some(url) = server {
                settings.client.server_url = url;
            }

            vizlearn::run_headless(settings).await?;
        }
        Command::Init => {
            init_config_dir(&base_path)?;
            eprintln!(
                "Config written to {}",
                base_path.join(".vizlearn").join("config.toml").display()
            );
        }
    }

    Ok(())
}
