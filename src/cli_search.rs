use anyhow::{Context, Result};
use clap::Parser;
use std::io;

use mixtape::catalog::CatalogClient;
use mixtape::config::{CatalogSettings, CLIENT_ID_ENV, CLIENT_SECRET_ENV};

#[derive(Parser, Debug)]
struct CliArgs {
    /// Catalog client id (falls back to MIXTAPE_CLIENT_ID).
    #[clap(long)]
    pub client_id: Option<String>,

    /// Catalog client secret (falls back to MIXTAPE_CLIENT_SECRET).
    #[clap(long)]
    pub client_secret: Option<String>,
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    let client_id = cli_args
        .client_id
        .or_else(|| std::env::var(CLIENT_ID_ENV).ok())
        .with_context(|| format!("Missing catalog client id (--client-id or {})", CLIENT_ID_ENV))?;
    let client_secret = cli_args
        .client_secret
        .or_else(|| std::env::var(CLIENT_SECRET_ENV).ok())
        .with_context(|| {
            format!(
                "Missing catalog client secret (--client-secret or {})",
                CLIENT_SECRET_ENV
            )
        })?;

    let client = CatalogClient::new(CatalogSettings::new(client_id, client_secret))?;

    loop {
        println!("Please enter your search query:");

        let mut user_input = String::new();

        io::stdin()
            .read_line(&mut user_input)
            .expect("Failed to read line");

        let user_input = user_input.trim();
        if user_input.is_empty() {
            continue;
        }

        // A failed fetch reads the same as an empty search.
        let results = match client.search(user_input) {
            Ok(results) => results,
            Err(err) => {
                eprintln!("Search failed: {}", err);
                Vec::new()
            }
        };
        if results.is_empty() {
            println!("No matches found for \"{}\".", user_input);
        } else {
            println!("Found {} matches for \"{}\":\n", results.len(), user_input);
            for track in results {
                let song = track.to_song();
                println!("{} — {} — {} - {}", song.title, song.artist, song.album, song.id);
            }
        }
        println!("\n");
    }
}
