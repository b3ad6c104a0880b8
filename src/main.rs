use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mixtape::catalog::{CatalogClient, CatalogTrack};
use mixtape::config::{AppConfig, CliConfig, FileConfig};
use mixtape::playlist::{PlaylistError, PlaylistStore};
use mixtape::routing::{navigate, NavigationOutcome, Route};
use mixtape::session::SessionStore;
use mixtape::storage::FileStorage;
use mixtape::user::{AuthError, CredentialStore, LoginForm, RegistrationForm};

#[derive(Parser, Debug)]
struct CliArgs {
    /// Directory holding the durable store files.
    pub storage_dir: Option<PathBuf>,

    /// Path to a TOML config file. Its values override CLI arguments.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// Catalog client id (falls back to MIXTAPE_CLIENT_ID).
    #[clap(long)]
    pub client_id: Option<String>,

    /// Catalog client secret (falls back to MIXTAPE_CLIENT_SECRET).
    #[clap(long)]
    pub client_secret: Option<String>,
}

#[derive(Parser)]
struct InnerCli {
    #[command(subcommand)]
    command: InnerCommand,
}

#[derive(Subcommand)]
enum InnerCommand {
    /// Create an account and log straight in.
    Register {
        username: String,
        password: String,
        confirm_password: String,
    },
    Login {
        username: String,
        password: String,
    },
    Logout,
    /// Show the current session.
    Whoami,
    /// Navigate to a path and report the guard's decision.
    Open {
        path: String,
    },
    /// List the logged-in user's playlists.
    Playlists,
    Create {
        name: String,
        #[clap(default_value = "")]
        description: String,
    },
    Rename {
        playlist_id: String,
        name: String,
        #[clap(default_value = "")]
        description: String,
    },
    Delete {
        playlist_id: String,
    },
    /// List the songs in a playlist.
    Songs {
        playlist_id: String,
    },
    RemoveSong {
        playlist_id: String,
        song_id: String,
    },
    /// Search the catalog for tracks.
    Search {
        query: Vec<String>,
    },
    /// Add search result N to a playlist.
    Add {
        result_number: usize,
        playlist_id: String,
    },
    Exit,
}

struct Shell {
    credentials: CredentialStore,
    session: SessionStore,
    playlists: PlaylistStore,
    catalog: Option<CatalogClient>,
    current_route: Route,
    last_results: Vec<CatalogTrack>,
}

impl Shell {
    /// The username of the logged-in user, or a notification and None.
    fn require_user(&self) -> Option<String> {
        let user = self.session.current().user;
        if user.is_none() {
            println!("You must log in first.");
        }
        user
    }

    fn goto(&mut self, path: &str) {
        let requested = Route::parse(path);
        match navigate(&requested, self.session.auth_state()) {
            NavigationOutcome::Render(route) => {
                println!("-> {}", route.path());
                self.current_route = route;
            }
            NavigationOutcome::Redirect(route) => {
                println!("-> redirected to {}", route.path());
                self.current_route = route;
            }
            NavigationOutcome::NotFound => {
                println!("404 — no such page: {}", path);
            }
        }
    }

    fn register(&mut self, username: &str, password: &str, confirm_password: &str) {
        let form = RegistrationForm {
            username,
            password,
            confirm_password,
        };
        if let Err(err) = form.validate() {
            println!("{}", err);
            return;
        }
        match self.credentials.register(username, password) {
            Ok(user) => {
                match self.credentials.verify(&user.username, password) {
                    Ok(identity) => {
                        if let Err(err) = self.session.login(identity) {
                            warn!("Could not persist session: {}", err);
                        }
                        println!("Account created! You are now logged in.");
                        self.goto("/dashboard");
                    }
                    Err(err) => println!("{}", err),
                }
            }
            Err(AuthError::UsernameTaken) => println!("Username already exists."),
            Err(err) => println!("{}", err),
        }
    }

    fn login(&mut self, username: &str, password: &str) {
        let form = LoginForm { username, password };
        if let Err(err) = form.validate() {
            println!("{}", err);
            return;
        }
        match self.credentials.verify(username, password) {
            Ok(identity) => {
                let admin = identity.admin;
                if let Err(err) = self.session.login(identity) {
                    warn!("Could not persist session: {}", err);
                }
                if admin {
                    println!("Admin login successful!");
                } else {
                    println!("Login successful!");
                }
                self.goto("/dashboard");
            }
            Err(err) => println!("{}", err),
        }
    }

    fn logout(&mut self) {
        if let Err(err) = self.session.logout() {
            warn!("Could not remove persisted session: {}", err);
        }
        self.goto("/");
    }

    fn whoami(&self) {
        let session = self.session.current();
        match session.user {
            Some(user) if session.admin => println!("{} (admin)", user),
            Some(user) => println!("{}", user),
            None => println!("Not logged in."),
        }
    }

    fn list_playlists(&self) {
        let Some(user) = self.require_user() else {
            return;
        };
        let playlists = self.playlists.playlists_for(&user);
        if playlists.is_empty() {
            println!("No playlists found. Please create one to start adding songs.");
            return;
        }
        for playlist in playlists {
            println!(
                "{} ({}) — {} songs",
                playlist.name,
                playlist.id,
                playlist.songs.len()
            );
        }
    }

    fn create_playlist(&mut self, name: &str, description: &str) {
        let Some(user) = self.require_user() else {
            return;
        };
        if name.trim().is_empty() {
            println!("Name is required");
            return;
        }
        match self.playlists.create(Some(&user), name, description) {
            Ok(playlist) => println!("Playlist created! ({})", playlist.id),
            Err(err) => println!("{}", err),
        }
    }

    fn search(&mut self, query: &str) {
        let Some(catalog) = self.catalog.as_ref() else {
            println!("Catalog search is not configured; supply client credentials.");
            return;
        };
        if query.trim().is_empty() {
            self.last_results.clear();
            return;
        }
        // A failed fetch shows up as no results, like an empty search.
        let results = match catalog.search(query) {
            Ok(results) => results,
            Err(err) => {
                warn!("Catalog search failed: {}", err);
                Vec::new()
            }
        };
        if results.is_empty() {
            println!("No matches found for \"{}\".", query);
        } else {
            println!("Found {} matches for \"{}\":", results.len(), query);
            for (i, track) in results.iter().enumerate() {
                let song = track.to_song();
                println!("{}. {} — {} — {}", i + 1, song.title, song.artist, song.album);
            }
        }
        self.last_results = results;
    }

    fn add_result(&mut self, result_number: usize, playlist_id: &str) {
        if self.require_user().is_none() {
            return;
        }
        let Some(track) = self.last_results.get(result_number.wrapping_sub(1)) else {
            println!("No search result {}; run search first.", result_number);
            return;
        };
        let song = track.to_song();
        match self.playlists.get(playlist_id) {
            Some(playlist) if playlist.has_song(&song.id) => {
                println!("That song is already in the playlist.");
            }
            Some(_) => match self.playlists.add_song(playlist_id, song) {
                Ok(()) => println!("Song added to playlist!"),
                Err(err) => println!("{}", err),
            },
            None => println!("Playlist {} not found", playlist_id),
        }
    }

    fn handle(&mut self, command: InnerCommand) {
        match command {
            InnerCommand::Register {
                username,
                password,
                confirm_password,
            } => self.register(&username, &password, &confirm_password),
            InnerCommand::Login { username, password } => self.login(&username, &password),
            InnerCommand::Logout => self.logout(),
            InnerCommand::Whoami => self.whoami(),
            InnerCommand::Open { path } => self.goto(&path),
            InnerCommand::Playlists => self.list_playlists(),
            InnerCommand::Create { name, description } => {
                self.create_playlist(&name, &description)
            }
            InnerCommand::Rename {
                playlist_id,
                name,
                description,
            } => match self.playlists.rename(&playlist_id, &name, &description) {
                Ok(()) => println!("Playlist updated"),
                Err(err) => println!("{}", err),
            },
            InnerCommand::Delete { playlist_id } => match self.playlists.remove(&playlist_id) {
                Ok(()) => println!("Playlist deleted"),
                Err(err) => println!("{}", err),
            },
            InnerCommand::Songs { playlist_id } => match self.playlists.get(&playlist_id) {
                Some(playlist) => {
                    for song in &playlist.songs {
                        println!("{} — {} ({})", song.title, song.artist, song.id);
                    }
                }
                None => println!(
                    "{}",
                    PlaylistError::NotFound(playlist_id)
                ),
            },
            InnerCommand::RemoveSong {
                playlist_id,
                song_id,
            } => match self.playlists.remove_song(&playlist_id, &song_id) {
                Ok(()) => println!("Song removed."),
                Err(err) => println!("{}", err),
            },
            InnerCommand::Search { query } => self.search(&query.join(" ")),
            InnerCommand::Add {
                result_number,
                playlist_id,
            } => self.add_result(result_number, &playlist_id),
            InnerCommand::Exit => unreachable!("handled by the loop"),
        }
    }
}

fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .unwrap();

    let file_config = match &cli_args.config {
        Some(path) => Some(FileConfig::load(path)?),
        None => None,
    };
    let cli_config = CliConfig {
        storage_dir: cli_args.storage_dir,
        client_id: cli_args.client_id,
        client_secret: cli_args.client_secret,
    };
    let config = AppConfig::resolve(&cli_config, file_config)?;

    let storage = Arc::new(FileStorage::initialize(config.storage_dir.clone())?);
    let credentials = CredentialStore::initialize(storage.clone());
    let session = SessionStore::initialize(storage.clone());
    let playlists = PlaylistStore::initialize(storage);
    let catalog = match config.catalog {
        Some(settings) => Some(CatalogClient::new(settings)?),
        None => None,
    };

    let mut shell = Shell {
        credentials,
        session,
        playlists,
        catalog,
        current_route: Route::Home,
        last_results: Vec::new(),
    };
    // Landing on the app root runs the guard once, like a fresh page load.
    shell.goto("/");

    let stdin = io::stdin();
    let mut reader = stdin.lock();
    loop {
        print!("{} > ", shell.current_route.path());
        io::stdout().flush().context("Failed to flush stdout")?;

        let mut line = String::new();
        if reader.read_line(&mut line).context("Failed to read line")? == 0 {
            break;
        }
        let line = line.trim();

        if line.is_empty() {
            continue;
        }

        let args = shlex::split(line)
            .unwrap_or_else(|| line.split_whitespace().map(String::from).collect());
        let cli =
            InnerCli::try_parse_from(std::iter::once(" ").chain(args.iter().map(String::as_str)));

        match cli {
            Ok(cli) => match cli.command {
                InnerCommand::Exit => break,
                command => shell.handle(command),
            },
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        }
    }
    Ok(())
}
