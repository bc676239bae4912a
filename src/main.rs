use clap::{
    ArgAction, CommandFactory, Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};
use clap_complete::{Shell, generate};

use amkit::{Endpoint, PathArgs, cli, config, error, types::ResourceType, utils};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name=env!("CARGO_PKG_NAME"),
  bin_name=env!("CARGO_PKG_NAME"),
  author=env!("CARGO_PKG_AUTHORS"),
  about=env!("CARGO_PKG_DESCRIPTION"),
  styles=styles(),
)]
struct Cli {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Authorize access to your Apple Music library
    Auth,

    /// Remove the cached user token
    Logout,

    /// Print a freshly signed developer token
    Token(TokenOptions),

    /// Call an Apple Music API endpoint
    Get(GetOptions),

    /// Search the catalog
    Search(SearchOptions),

    /// Send a custom request
    Request(RequestOptions),

    /// Get shell completions
    Completions(CompletionsOption),
}

#[derive(Parser, Debug, Clone)]
pub struct TokenOptions {
    /// Also print the decoded claims
    #[clap(long)]
    pub claims: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct GetOptions {
    /// Endpoint to call
    #[clap(value_enum)]
    pub endpoint: Endpoint,

    /// Resource id
    #[clap(long)]
    pub id: Option<String>,

    /// Relationship name (e.g. `tracks`, `artists`)
    #[clap(long)]
    pub relationship: Option<String>,

    /// View name (e.g. `related-albums`)
    #[clap(long)]
    pub view: Option<String>,

    /// Resource kind for ratings (e.g. `songs`, `albums`)
    #[clap(long)]
    pub kind: Option<String>,

    /// Storefront, defaults to APPLE_MUSIC_STOREFRONT
    #[clap(long)]
    pub storefront: Option<String>,

    /// Call the library variant of the endpoint
    #[clap(long, conflicts_with = "catalog")]
    pub library: bool,

    /// Call the catalog variant of the endpoint
    #[clap(long)]
    pub catalog: bool,

    /// Query parameter; can be repeated
    #[clap(
        long = "param",
        value_parser = utils::parse_query_param,
        action = ArgAction::Append,
        num_args = 1
    )]
    pub params: Vec<(String, String)>,

    /// Rating value for `set-rating` (1 or -1)
    #[clap(long, allow_hyphen_values = true)]
    pub rating: Option<i8>,

    /// JSON request body
    #[clap(long)]
    pub body: Option<String>,

    /// Print the raw JSON response
    #[clap(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct SearchOptions {
    /// Search term
    pub term: String,

    /// Comma separated resource types
    #[clap(long, default_value = "albums,artists,songs,playlists")]
    pub types: String,

    /// Maximum results per type
    #[clap(long)]
    pub limit: Option<u32>,
}

#[derive(Parser, Debug, Clone)]
pub struct RequestOptions {
    /// HTTP method
    pub method: String,

    /// Absolute url or path relative to the API root
    pub url: String,

    /// Send the user token along
    #[clap(long)]
    pub library: bool,

    /// Query parameter; can be repeated
    #[clap(
        long = "param",
        value_parser = utils::parse_query_param,
        action = ArgAction::Append,
        num_args = 1
    )]
    pub params: Vec<(String, String)>,

    /// JSON request body
    #[clap(long)]
    pub body: Option<String>,

    /// Print the raw JSON response
    #[clap(long)]
    pub json: bool,
}

#[derive(Parser, Debug, Clone)]
pub struct CompletionsOption {
    shell: Shell,
}

#[tokio::main]
async fn main() {
    if let Err(e) = config::load_env().await {
        error!("Cannot load environment. Err: {}", e);
    }

    let cli = Cli::parse();

    match cli.command {
        Command::Auth => cli::auth().await,
        Command::Logout => cli::logout().await,
        Command::Token(opt) => cli::token(opt.claims).await,
        Command::Get(opt) => {
            let resource = match (opt.library, opt.catalog) {
                (true, _) => Some(ResourceType::Library),
                (_, true) => Some(ResourceType::Catalog),
                _ => None,
            };

            let mut args = PathArgs::default();
            args.storefront = opt.storefront;
            args.id = opt.id;
            args.relationship = opt.relationship;
            args.view = opt.view;
            args.kind = opt.kind;

            cli::get(cli::GetOptions {
                endpoint: opt.endpoint,
                args,
                resource,
                params: opt.params,
                rating: opt.rating,
                body: opt.body,
                raw_json: opt.json,
            })
            .await
        }
        Command::Search(opt) => cli::search(opt.term, opt.types, opt.limit).await,
        Command::Request(opt) => {
            cli::request(
                opt.method,
                opt.url,
                opt.library,
                opt.params,
                opt.body,
                opt.json,
            )
            .await
        }
        Command::Completions(opt) => {
            let mut cmd = Cli::command_for_update();
            let name = cmd.get_name().to_string();
            generate(opt.shell, &mut cmd, name, &mut std::io::stdout())
        }
    }
}
