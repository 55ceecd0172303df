//! Inventory command - inspect remaining-inventory files.

use std::path::PathBuf;

use clap::{Args, Subcommand};
use console::style;

use bidslip_core::enrich::{InventoryStore, SoldItemLookup};

/// Arguments for the inventory command.
#[derive(Args)]
pub struct InventoryArgs {
    #[command(subcommand)]
    command: InventoryCommand,
}

#[derive(Subcommand)]
enum InventoryCommand {
    /// Show sold-item counts per auction lot
    Show {
        /// Remaining-inventory JSON file
        file: PathBuf,
    },

    /// Look up one sold item
    Lookup {
        /// Remaining-inventory JSON file
        file: PathBuf,

        /// Auction lot number
        #[arg(long)]
        lot: u32,

        /// Item lot number within the auction
        #[arg(long)]
        item: u32,
    },
}

pub async fn run(args: InventoryArgs) -> anyhow::Result<()> {
    match args.command {
        InventoryCommand::Show { file } => show_inventory(&file),
        InventoryCommand::Lookup { file, lot, item } => lookup_item(&file, lot, item),
    }
}

fn show_inventory(file: &PathBuf) -> anyhow::Result<()> {
    let store = InventoryStore::from_file(file)?;

    println!(
        "{} {} sold items in {}",
        style("ℹ").blue(),
        store.len(),
        file.display()
    );

    for (lot, count) in store.lots() {
        println!("  Auction lot {:>6}: {} items", lot, count);
    }

    Ok(())
}

fn lookup_item(file: &PathBuf, lot: u32, item: u32) -> anyhow::Result<()> {
    let store = InventoryStore::from_file(file)?;
    let record = store.lookup_sold_item(lot, item)?;

    println!("{}", serde_json::to_string_pretty(&record)?);

    Ok(())
}
