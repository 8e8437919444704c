mod actions;
mod authorize;
mod config;
mod endpoints;
mod error;
mod jobs;
mod matcher;
mod models;
mod paging;
mod ports;
mod server;
mod throttle;
mod transfer;

use std::process::exit;
use std::sync::Arc;

use clap::parser::MatchesError;
use clap::{Arg, Command};

use crate::actions::spotify::SpotifyClient;
use crate::actions::youtube::YoutubeClient;
use crate::authorize::Access;
use crate::config::TubeifyConfig;
use crate::jobs::{spawn_workers, TransferQueue};
use crate::matcher::MatchResolver;
use crate::server::Services;
use crate::throttle::Throttle;
use crate::transfer::{Transfer, TransferSettings};

struct Args {
    config_path: String,
}

fn parse_cli_args() -> Result<Args, MatchesError> {
    let cmd = Command::new(env!("CARGO_PKG_NAME"))
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .required(false)
                .default_value("tubeify.config"),
        )
        .get_matches();

    let config_path = cmd
        .try_get_one::<String>("config")?
        .cloned()
        .unwrap_or_else(|| "tubeify.config".to_string());
    Ok(Args { config_path })
}

struct Clients {
    spotify: Arc<SpotifyClient>,
    youtube: Arc<YoutubeClient>,
}

fn build_clients(config: &TubeifyConfig) -> Clients {
    let http = reqwest::Client::new();
    Clients {
        spotify: Arc::new(SpotifyClient::new(
            http.clone(),
            Access::new("spotify", config.spotify_access_token.clone()),
            config.page_limit,
        )),
        youtube: Arc::new(YoutubeClient::new(
            http,
            Access::new("youtube", config.youtube_access_token.clone()),
        )),
    }
}

#[rocket::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_cli_args().unwrap_or_else(|err| {
        log::error!("Invalid arguments: {}", err);
        exit(1);
    });
    let config = TubeifyConfig::load(&args.config_path).unwrap_or_else(|err| {
        log::error!("{}", err);
        exit(1);
    });
    let Some(throttle) = Throttle::new(config.pacing) else {
        log::error!("pacing_ms must be greater than zero");
        exit(1);
    };
    log::info!(
        "Pacing destination work at one track per {}ms",
        throttle.interval().as_millis()
    );

    let clients = build_clients(&config);
    let resolver = MatchResolver::new(clients.youtube.clone(), config.search.clone());
    let transfer = Transfer::new(
        clients.spotify.clone(),
        clients.youtube.clone(),
        resolver.clone(),
        throttle,
        TransferSettings {
            privacy: config.privacy,
            fallback_description: config.fallback_description.clone(),
        },
    );
    let (queue, receiver) = TransferQueue::bounded(config.queue_capacity);
    let _workers = spawn_workers(receiver, Arc::new(transfer), config.workers);

    let figment = rocket::Config::figment()
        .merge(("address", config.address))
        .merge(("port", config.port));
    let services = Services {
        queue,
        source: clients.spotify,
        destination: clients.youtube,
        resolver,
    };
    let rocket = server::build(rocket::custom(figment), services);
    if let Err(err) = rocket.launch().await {
        log::error!("Server stopped: {}", err);
        exit(1);
    }
}
