// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Nereid-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Streamwall and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Streamwall CLI entrypoint.
//!
//! `resolve`, `wall` and `search` answer one question and exit. `serve` runs the read-only HTTP
//! API; `connect` runs the backend client with commands read from stdin.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use streamwall::backend::{protocol, BackendClient, ClientEvent, SessionEvent, UiCommand};
use streamwall::config::Config;
use streamwall::directory::{Directory, SearchOptions};
use streamwall::embed::{compile_chat, EmbedOptions};
use streamwall::model::Grid;
use streamwall::ops::{deserialize, serialize, UrlState};
use streamwall::reconcile::Reconciler;
use streamwall::resolve::{resolve, to_link};
use streamwall::store::{load_catalogues, LocalStore, WriteDurability};
use streamwall::wall::{Effect, Wall, WallOptions};
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc;
use tracing::info;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [options] resolve <input...>\n  {program} [options] wall <query>\n  {program} [options] search <terms...>\n  {program} [options] serve [--bind <addr>]\n  {program} [options] connect [<query>]\n  {program} schema\n\nOptions:\n  --config <file>      JSON configuration (every field optional)\n  --catalogue <file>   streamer catalogue; repeat to load several, earlier files win\n  --store <file>       local settings file (clipboard, backend toggle)\n  --hide-offline       leave confirmed-offline streamers out of search results\n  --durable-writes     sync the local store to disk on every write\n\n`connect` reads commands from stdin: `set <cell> <text>`, `refer <cell> <text>`,\n`search <cell> <query>`, `restart`, `auto-update`, `quit`."
    );
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Resolve(String),
    Wall(String),
    Search(Vec<String>),
    Serve,
    Schema,
    Connect(Option<String>),
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    command: Option<Command>,
    config: Option<PathBuf>,
    catalogues: Vec<PathBuf>,
    store: Option<PathBuf>,
    bind: Option<String>,
    hide_offline: bool,
    durable_writes: bool,
}

impl CliOptions {
    /// Flags win over the config file; `--catalogue` replaces the configured list.
    fn apply(&self, config: &mut Config) {
        if !self.catalogues.is_empty() {
            config.catalogues = self.catalogues.clone();
        }
        if let Some(store) = &self.store {
            config.store.path = Some(store.clone());
        }
        if let Some(bind) = &self.bind {
            config.http.bind = bind.clone();
        }
        if self.hide_offline {
            config.wall.hide_offline = true;
        }
    }
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();
    let mut positional = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                if options.config.is_some() {
                    return Err(());
                }
                options.config = Some(PathBuf::from(args.next().ok_or(())?));
            }
            "--catalogue" => {
                let path = args.next().ok_or(())?;
                options.catalogues.push(PathBuf::from(path));
            }
            "--store" => {
                if options.store.is_some() {
                    return Err(());
                }
                options.store = Some(PathBuf::from(args.next().ok_or(())?));
            }
            "--bind" => {
                if options.bind.is_some() {
                    return Err(());
                }
                options.bind = Some(args.next().ok_or(())?);
            }
            "--hide-offline" => {
                if options.hide_offline {
                    return Err(());
                }
                options.hide_offline = true;
            }
            "--durable-writes" => {
                if options.durable_writes {
                    return Err(());
                }
                options.durable_writes = true;
            }
            _ if arg.starts_with("--") => return Err(()),
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let name = positional.next().ok_or(())?;
    let rest: Vec<String> = positional.collect();

    let command = match name.as_str() {
        "resolve" => {
            let input = rest.join(" ");
            if input.trim().is_empty() {
                return Err(());
            }
            Command::Resolve(input)
        }
        "wall" => match <[String; 1]>::try_from(rest) {
            Ok([query]) => Command::Wall(query),
            Err(_) => return Err(()),
        },
        "search" if !rest.is_empty() => Command::Search(rest),
        "serve" if rest.is_empty() => Command::Serve,
        "schema" if rest.is_empty() => Command::Schema,
        "connect" if rest.len() <= 1 => Command::Connect(rest.into_iter().next()),
        _ => return Err(()),
    };

    if options.bind.is_some() && command != Command::Serve {
        return Err(());
    }

    options.command = Some(command);
    Ok(options)
}

/// One stdin line in `connect` mode. Blank lines and unknown words are ignored.
fn parse_command(line: &str) -> Option<UiCommand> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let cell_and_text = || {
        let (cell, text) = rest.trim_start().split_once(char::is_whitespace)?;
        let cell = cell.parse().ok()?;
        let text = text.trim();
        (!text.is_empty()).then(|| (cell, text.to_owned()))
    };
    match word {
        "set" => cell_and_text().map(|(cell, input)| UiCommand::Input { cell, input }),
        "refer" => cell_and_text().map(|(cell, input)| UiCommand::Refer { cell, input }),
        "search" => cell_and_text().map(|(cell, query)| UiCommand::Search { cell, query }),
        "restart" => Some(UiCommand::Restart),
        "auto-update" => Some(UiCommand::AutoUpdate),
        "quit" | "exit" => Some(UiCommand::Shutdown),
        _ => None,
    }
}

fn options_from_config(config: &Config) -> WallOptions {
    WallOptions {
        embed: EmbedOptions { host_domain: config.wall.host_domain.clone() },
        search: SearchOptions { hide_offline: config.wall.hide_offline },
        offline_policy: config.wall.offline_policy,
    }
}

fn describe(event: &ClientEvent) -> Vec<String> {
    match event {
        ClientEvent::Connected { url } => vec![format!("connected to {url}")],
        ClientEvent::Disconnected => vec!["disconnected".to_owned()],
        ClientEvent::Alert(message) => vec![format!("alert: {message}")],
        ClientEvent::Session(SessionEvent::Unresolved(refer)) => {
            vec![format!("cell {}: backend has no answer for {:?}", refer.cell, refer.input)]
        }
        ClientEvent::Session(SessionEvent::Referred { effects, .. })
        | ClientEvent::Effects(effects) => effects
            .iter()
            .flat_map(|effect| match effect {
                Effect::Render(updates) => updates
                    .iter()
                    .map(|update| match &update.embed {
                        Some(embed) => format!("cell {}: {}", update.index, embed.url),
                        None => format!("cell {}: -", update.index),
                    })
                    .collect::<Vec<_>>(),
                _ => Vec::new(),
            })
            .collect(),
        ClientEvent::Session(_) => Vec::new(),
    }
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "streamwall".to_owned());

        let options = match parse_options(args) {
            Ok(options) => options,
            Err(()) => {
                print_usage(&program);
                std::process::exit(2);
            }
        };
        let Some(command) = options.command.clone() else {
            print_usage(&program);
            std::process::exit(2);
        };

        if command == Command::Schema {
            println!("{}", serde_json::to_string_pretty(&protocol::schema())?);
            return Ok(());
        }

        let mut config = Config::load_or_default(options.config.as_deref())?;
        options.apply(&mut config);
        streamwall::logging::init_logging(&config.logging);

        let mut directory = Directory::new();
        load_catalogues(&config.catalogues, &mut directory)?;
        let wall_options = options_from_config(&config);

        match command {
            Command::Resolve(input) => {
                let stream = resolve(&input, &directory)?;
                let reconciler = Reconciler::new(wall_options.offline_policy);
                println!("{stream}");
                if let Some(link) = to_link(&stream) {
                    println!("link: {link}");
                }
                if let Some(embed) = reconciler.embed_for(&stream, &directory, &wall_options.embed)
                {
                    println!("embed: {}", embed.url);
                }
                if let Some(chat) = compile_chat(&stream, &directory, &wall_options.embed) {
                    println!("chat: {chat}");
                }
            }
            Command::Wall(query) => {
                let state = deserialize(&query, &directory)?;
                let reconciler = Reconciler::new(wall_options.offline_policy);
                println!("{}", serialize(&state));
                for (index, stream) in state.grid.cells().iter().enumerate() {
                    let embed = reconciler
                        .embed_for(stream, &directory, &wall_options.embed)
                        .map_or_else(|| "-".to_owned(), |embed| embed.url);
                    println!("{index}\t{stream}\t{embed}");
                }
            }
            Command::Search(terms) => {
                for streamer in directory.search(&terms, wall_options.search) {
                    println!("{}\t{}", streamer.name(), streamer.group_path().join(" / "));
                }
            }
            Command::Serve => {
                let state = Arc::new(streamwall::http::ApiState::new(directory, wall_options));
                let bind = config.http.bind.clone();
                let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
                runtime.block_on(async move {
                    let listener = tokio::net::TcpListener::bind(&bind).await?;
                    let addr = listener.local_addr()?;
                    info!(%addr, "serving HTTP API");
                    axum::serve(listener, streamwall::http::router(state)).await?;
                    Ok::<(), Box<dyn Error>>(())
                })?;
            }
            Command::Connect(query) => {
                let state = match query {
                    Some(query) => deserialize(&query, &directory)?,
                    None => UrlState::new(Grid::new(2, 2)?),
                };
                let store = match &config.store.path {
                    Some(path) if options.durable_writes => {
                        LocalStore::open(path)?.with_durability(WriteDurability::Durable)
                    }
                    Some(path) => LocalStore::open(path)?,
                    // Without a settings file there is no toggle to honour; the backend is on.
                    None => {
                        let mut store = LocalStore::in_memory();
                        store.set_backend_enabled(true)?;
                        store
                    }
                };
                let mut wall = Wall::new(directory, state, store, wall_options);
                let mut client = BackendClient::new(config.backend.clone());

                let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
                runtime.block_on(async move {
                    let (commands_tx, mut commands) = mpsc::channel(16);
                    let (events_tx, mut events) = mpsc::unbounded_channel();

                    tokio::spawn(async move {
                        let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
                        while let Ok(Some(line)) = lines.next_line().await {
                            if let Some(command) = parse_command(&line) {
                                let quit = command == UiCommand::Shutdown;
                                if commands_tx.send(command).await.is_err() || quit {
                                    return;
                                }
                            }
                        }
                    });
                    let printer = tokio::spawn(async move {
                        while let Some(event) = events.recv().await {
                            for line in describe(&event) {
                                println!("{line}");
                            }
                        }
                    });

                    client.run(&mut wall, &mut commands, &events_tx).await;
                    drop(events_tx);
                    let _ = printer.await;
                    println!("{}", wall.query());
                });
                // The stdin reader may still be parked in a blocking read.
                runtime.shutdown_background();
            }
            Command::Schema => {}
        }

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("streamwall: {err}");
        std::process::exit(1);
    }
}
