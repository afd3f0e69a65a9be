mod api;
mod config;
mod files;
mod logging;
mod protocol;
mod transcript;
mod tui;
mod ws;

use anyhow::Result;
use clap::Parser;
use config::{ConfigFile, ResolvedConfig};

#[derive(Parser, Debug)]
#[command(
    name = "agentdeck",
    about = "Terminal console for a remote coding agent",
    long_about = None,
)]
struct Args {
    /// Profile to use from config file
    #[arg(short, long, env = "AGENTDECK_PROFILE")]
    profile: Option<String>,

    /// Override backend base URL
    #[arg(long, env = "AGENTDECK_SERVER")]
    server: Option<String>,

    /// Override event-channel URL (derived from --server when omitted)
    #[arg(long, env = "AGENTDECK_WS_URL")]
    ws_url: Option<String>,

    /// Fixed client id for the event channel (generated when omitted)
    #[arg(long)]
    client_id: Option<String>,

    /// Write a default config file to ~/.config/agentdeck/config.toml and exit
    #[arg(long)]
    init: bool,

    /// List available profiles and exit
    #[arg(long)]
    profiles: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // ── --init ────────────────────────────────────────────────────────────────
    if args.init {
        let path = ConfigFile::write_default_if_missing()?;
        println!("Config written to: {}", path.display());
        println!("Edit it, then run: agentdeck");
        return Ok(());
    }

    let file = ConfigFile::load()?;

    // ── --profiles ────────────────────────────────────────────────────────────
    if args.profiles {
        print_profiles(&file);
        return Ok(());
    }

    let resolved = ResolvedConfig::resolve(
        &file,
        args.profile.as_deref(),
        args.server.as_deref(),
        args.ws_url.as_deref(),
    );

    // One channel identity per process unless the user pins one
    let client_id = args.client_id.unwrap_or_else(|| {
        format!("client_{}_{}", chrono::Utc::now().timestamp_millis(), std::process::id())
    });

    // Log file setup — the guard must outlive the TUI so buffered lines flush
    let _guard = logging::init()?;
    tracing::info!(
        profile = %resolved.profile_name,
        server = %resolved.server,
        ws_url = %resolved.ws_url,
        %client_id,
        "starting agentdeck"
    );

    tui::run(resolved, client_id).await
}

// ── Profiles listing (non-TUI) ────────────────────────────────────────────────

fn print_profiles(file: &ConfigFile) {
    let mut entries: Vec<(String, String, Option<String>)> = file
        .profiles
        .iter()
        .map(|(name, p)| (name.clone(), p.server.clone(), p.ws_url.clone()))
        .collect();
    entries.sort_by(|a, b| a.0.cmp(&b.0));
    println!();
    println!("  Profiles");
    for (name, server, ws_url) in &entries {
        let marker = if *name == file.default_profile { " ←" } else { "" };
        println!("  {name}{marker}");
        println!("    server  {server}");
        match ws_url {
            Some(url) => println!("    ws_url  {url}"),
            None => println!("    ws_url  (derived from server)"),
        }
        println!();
    }
}
