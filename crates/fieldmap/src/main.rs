use anyhow::Result;
use clap::{Parser, Subcommand};
use fieldmap::*;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about = "Manage field boundary polygons")]
struct Args {
    /// Directory holding the polygon slots (default: ~/.fieldmap)
    #[arg(long, env = "FIELDMAP_DATA_DIR")]
    data_dir: Option<PathBuf>,
    /// Slot name for the polygon collection
    #[arg(long, env = "FIELDMAP_SLOT")]
    slot: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print every polygon
    List,
    /// Save a named polygon
    Create {
        #[arg(long)]
        name: String,
        /// JSON array of [lat, lng] pairs
        #[arg(long)]
        coords: String,
    },
    /// Save an unnamed polygon, as a finished draw gesture would
    Draw {
        #[arg(long)]
        coords: String,
    },
    /// Delete a polygon by id
    Delete { id: u64 },
    /// Recompute a polygon's centroid and area and select it
    Select { id: u64 },
    /// Look up a polygon by exact name
    Find { name: String },
    /// Change a polygon's name
    Rename { id: u64, name: String },
    /// Replace a polygon's ring without recomputing its metrics
    Move {
        id: u64,
        #[arg(long)]
        coords: String,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = StoreConfig::resolve(args.data_dir, args.slot)?;
    let mut store = config.open_store()?;

    match args.command {
        Command::List => {
            if store.is_empty() {
                println!(
                    "No polygons in slot '{}' under {}",
                    store.slot(),
                    store.backend().dir().display()
                );
            }
            for polygon in store.polygons() {
                print_polygon(polygon);
            }
        }
        Command::Create { name, coords } => {
            let polygon = store.create(name, parse_ring(&coords)?)?;
            print_polygon(&polygon);
        }
        Command::Draw { coords } => {
            let polygon = store.create_drawn(parse_ring(&coords)?)?;
            print_polygon(&polygon);
        }
        Command::Delete { id } => {
            store.delete(PolygonId::from(id))?;
            println!("{} polygon(s) remaining", store.len());
        }
        Command::Select { id } => match store.recompute_and_select(PolygonId::from(id))? {
            Some(polygon) => print_polygon(&polygon),
            None => println!("not found"),
        },
        Command::Find { name } => match store.find_by_name(&name) {
            Some(polygon) => print_polygon(polygon),
            None => println!("not found"),
        },
        Command::Rename { id, name } => {
            if !store.rename(PolygonId::from(id), name)? {
                println!("not found");
            }
        }
        Command::Move { id, coords } => {
            if !store.update_coordinates(PolygonId::from(id), parse_ring(&coords)?)? {
                println!("not found");
            }
        }
    }

    Ok(())
}

fn print_polygon(polygon: &Polygon) {
    let name = if polygon.name.is_empty() {
        "<unnamed>"
    } else {
        polygon.name.as_str()
    };
    println!(
        "#{} {} centroid {} {} [{} vertices]",
        polygon.id,
        name,
        polygon.centroid,
        polygon.area_label(),
        polygon.coordinates.len()
    );
}
