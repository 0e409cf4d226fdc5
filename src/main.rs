use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;

use spotify_sieve::{Config, FilterNode, Session, SpotifyClient, Track, logging};

#[derive(Parser)]
#[command(name = "spotify-sieve", version, about = "Filter Spotify playlists into queues and new playlists")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List your playlists
    Playlists,
    /// Print every track of a playlist
    Tracks {
        /// Playlist id or name
        playlist: String,
    },
    /// Print the tracks of a playlist that match a filter
    Filter {
        playlist: String,
        /// JSON file holding the filter expression
        #[arg(long)]
        expr: PathBuf,
    },
    /// Replace the queue with a playlist's (filtered) tracks and play it
    Play {
        playlist: String,
        #[arg(long)]
        expr: Option<PathBuf>,
    },
    /// Append a playlist's (filtered) tracks to the queue and play it
    Queue {
        playlist: String,
        #[arg(long)]
        expr: Option<PathBuf>,
        #[arg(long)]
        allow_duplicates: bool,
    },
    /// Create a playlist from another playlist's (filtered) tracks
    Create {
        name: String,
        #[arg(long)]
        from: String,
        #[arg(long)]
        expr: Option<PathBuf>,
        #[arg(long)]
        private: bool,
    },
    /// Add a playlist's (filtered) tracks to another playlist
    Add {
        target: String,
        #[arg(long)]
        from: String,
        #[arg(long)]
        expr: Option<PathBuf>,
    },
    /// Unfollow (delete) a playlist
    Delete { playlist: String },
    /// Show the access token's age
    Token,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_env()?;

    let _log_guard = match logging::init_logging(&config.log_dir) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: Failed to initialize logging: {}", e);
            None
        }
    };

    tracing::info!("=== spotify-sieve starting ===");

    let token = config.token();
    if let Command::Token = cli.command {
        let state = if token.is_expired() { "expired".red() } else { "valid".green() };
        println!("Token age: {:.0}s ({})", token.age_seconds(), state);
        return Ok(());
    }
    if token.is_expired() {
        anyhow::bail!("Access token is {:.0}s old and has expired. Log in again.", token.age_seconds());
    }

    let client = SpotifyClient::new(&token).await?;
    let session = Session::start(Arc::new(client), token, config.device_id.clone())
        .await
        .context("Could not start session")?;

    let result = run(&session, cli.command).await;
    if let Err(e) = &result {
        tracing::error!(error = ?e, "Command failed");
    }
    tracing::info!("spotify-sieve shutting down");
    result
}

async fn run(session: &Session, command: Command) -> Result<()> {
    match command {
        Command::Playlists => {
            for entry in session.playlists().await {
                println!("{}  {} ({} tracks)", entry.id.dimmed(), entry.name.bold(), entry.track_count);
            }
        }
        Command::Tracks { playlist } => {
            let tracks = select(session, &playlist, None).await?;
            print_tracks(&tracks);
        }
        Command::Filter { playlist, expr } => {
            let tracks = select(session, &playlist, Some(&expr)).await?;
            print_tracks(&tracks);
        }
        Command::Play { playlist, expr } => {
            let tracks = select(session, &playlist, expr.as_deref()).await?;
            let queue = session.play_tracks(&ids(&tracks)).await?;
            println!("Playing {} tracks", queue.len().to_string().green());
        }
        Command::Queue {
            playlist,
            expr,
            allow_duplicates,
        } => {
            let tracks = select(session, &playlist, expr.as_deref()).await?;
            let queue = session.queue_tracks(&ids(&tracks), allow_duplicates).await?;
            println!("Queue now holds {} tracks", queue.len().to_string().green());
        }
        Command::Create {
            name,
            from,
            expr,
            private,
        } => {
            let tracks = select(session, &from, expr.as_deref()).await?;
            let id = session.create_playlist(&name, !private, &tracks).await?;
            println!("Created {} ({}) with {} tracks", name.bold(), id.dimmed(), tracks.len());
        }
        Command::Add { target, from, expr } => {
            let target_id = resolve(session, &target).await?;
            let tracks = select(session, &from, expr.as_deref()).await?;
            session.add_to_playlist(&target_id, &tracks).await?;
            println!("Added {} tracks to {}", tracks.len(), target.bold());
        }
        Command::Delete { playlist } => {
            let id = resolve(session, &playlist).await?;
            session.delete_playlist(&id).await?;
            println!("Deleted {}", playlist.bold());
        }
        Command::Token => {}
    }
    Ok(())
}

/// Accepts a playlist id, or a name when no id matches.
async fn resolve(session: &Session, playlist: &str) -> Result<String> {
    if session.catalog().lookup(playlist).await.is_ok() {
        return Ok(playlist.to_string());
    }
    session
        .catalog()
        .find_by_name(playlist)
        .await
        .map(|entry| entry.id)
        .with_context(|| format!("No playlist with id or name {:?}", playlist))
}

async fn select(session: &Session, playlist: &str, expr: Option<&Path>) -> Result<Vec<Track>> {
    let id = resolve(session, playlist).await?;
    let tracks = session.fetch_tracks(&id).await?;
    match expr {
        Some(path) => {
            let expr = load_expr(path)?;
            Ok(session.filter(&tracks, &expr)?)
        }
        None => Ok(tracks),
    }
}

fn load_expr(path: &Path) -> Result<FilterNode> {
    let text = std::fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))?;
    FilterNode::from_json(&text).with_context(|| format!("{} is not a valid filter expression", path.display()))
}

fn ids(tracks: &[Track]) -> Vec<String> {
    tracks.iter().map(|t| t.id.clone()).collect()
}

fn print_tracks(tracks: &[Track]) {
    for track in tracks {
        println!("{}  {} - {}", track.id.dimmed(), track.title.bold(), track.artists.join(", ").cyan());
    }
    println!("{} tracks", tracks.len());
}
