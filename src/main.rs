use std::sync::Arc;

use clap::{Parser, Subcommand};

use streethub::http::{self, HTTP_BIND_ADDRESS_DEFAULT};
use streethub::{NewStreet, Point, StoreConfig, StreetRepository, StreetStore, logging};

#[derive(Parser)]
#[command(name = "streethub")]
#[command(about = "Store streets and edit their polyline geometry")]
#[command(version)]
struct Cli {
    #[command(flatten)]
    store: StoreConfig,

    /// Enable verbose logging (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve {
        #[arg(long, env = "STREETHUB_BIND", default_value = HTTP_BIND_ADDRESS_DEFAULT)]
        bind: String,
    },
    /// Create a street and print it
    Create {
        #[arg(long)]
        name: String,

        #[arg(long)]
        capacity: i32,

        /// Polyline vertex as `x,y`; repeat in path order
        #[arg(long = "point", value_name = "X,Y", allow_hyphen_values = true)]
        points: Vec<Point>,
    },
    /// Print a street
    Get { id: i64 },
    /// Print all streets
    List,
    /// Delete a street (succeeds if it does not exist)
    Delete { id: i64 },
    /// Append a point to a street's geometry
    AddPoint {
        id: i64,

        #[arg(value_name = "X,Y", allow_hyphen_values = true)]
        point: Point,

        /// Prepend instead of append
        #[arg(long)]
        start: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let store = StreetStore::new(&cli.store).await?;
    let result = run(&store, cli.command).await;
    store.close().await;
    result
}

async fn run(store: &StreetStore, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Serve { bind } => http::serve(Arc::new(store.clone()), &bind).await?,
        Command::Create {
            name,
            capacity,
            points,
        } => {
            let street = store
                .create_street(&NewStreet::new(name, capacity).with_geometry(points))
                .await?;
            println!("{}", serde_json::to_string_pretty(&street)?);
        }
        Command::Get { id } => {
            let street = store
                .get_street_by_id(id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("street {} not found", id))?;
            println!("{}", serde_json::to_string_pretty(&street)?);
        }
        Command::List => {
            let streets = store.get_streets().await?;
            println!("{}", serde_json::to_string_pretty(&streets)?);
        }
        Command::Delete { id } => store.delete_street(id).await?,
        Command::AddPoint { id, point, start } => {
            if !store.append_or_prepend_point(id, point, !start).await? {
                anyhow::bail!("street {} not found", id);
            }
            let street = store
                .get_street_by_id(id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("street {} not found", id))?;
            println!("{}", serde_json::to_string_pretty(&street)?);
        }
    }
    Ok(())
}
