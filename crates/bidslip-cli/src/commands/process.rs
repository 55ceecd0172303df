//! Process command - extract data from a single invoice file.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use bidslip_core::enrich::InventoryStore;
use bidslip_core::invoice::{AuctionInvoiceParser, InvoiceParser};
use bidslip_core::models::config::BidslipConfig;
use bidslip_core::models::invoice::Invoice;

use super::config::load_config;

/// Arguments for the process command.
#[derive(Args)]
pub struct ProcessArgs {
    /// Input file (PDF or extracted text)
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Remaining-inventory JSON used to enrich line items
    #[arg(long)]
    inventory: Option<PathBuf>,

    /// Validate extracted data
    #[arg(long)]
    validate: bool,

    /// Show fields that need manual review
    #[arg(long)]
    show_diagnostics: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per line item
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ProcessArgs, config_path: Option<&str>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;

    // Check input file exists
    if !args.input.exists() {
        anyhow::bail!("Input file not found: {}", args.input.display());
    }

    info!("Processing file: {}", args.input.display());

    let pb = ProgressBar::new(100);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] {bar:40.cyan/blue} {msg}")?
            .progress_chars("##-"),
    );

    pb.set_message("Reading document...");
    pb.set_position(10);
    let text = read_document_text(&args.input)?;

    pb.set_message("Loading inventory...");
    pb.set_position(30);
    let parser = build_parser(&config, args.inventory.as_deref())?;

    pb.set_message("Extracting invoice data...");
    pb.set_position(60);
    let result = parser.parse(&text)?;

    pb.finish_and_clear();

    let invoice = result.invoice;

    // Validate if requested
    if args.validate {
        let issues = invoice.validate();
        if !issues.is_empty() {
            eprintln!("{}", style("Validation issues:").yellow());
            for issue in &issues {
                eprintln!("  - {}", issue);
            }
        }
    }

    if args.show_diagnostics {
        if result.diagnostics.is_empty() {
            eprintln!("{} No fields need review", style("✓").green());
        } else {
            eprintln!("{}", style("Fields needing review:").yellow());
            for diagnostic in &result.diagnostics {
                eprintln!("  - {}", diagnostic);
            }
        }
    }

    let output = format_invoice(&invoice, args.format)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!(
        "Parsed in {}ms, total {:?}",
        result.processing_time_ms,
        start.elapsed()
    );

    Ok(())
}

/// Read the plain text of a document: `.txt` as-is, `.pdf` through text extraction.
pub fn read_document_text(path: &Path) -> anyhow::Result<String> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let text = match extension.as_str() {
        "txt" => fs::read_to_string(path)?,
        "pdf" => {
            let data = fs::read(path)?;
            pdf_extract::extract_text_from_mem(&data)
                .map_err(|e| anyhow::anyhow!("Failed to extract text from {}: {}", path.display(), e))?
        }
        _ => anyhow::bail!("Unsupported file format: {}", extension),
    };

    if text.trim().is_empty() {
        anyhow::bail!("No text could be extracted from {}", path.display());
    }

    Ok(text)
}

/// Build a parser from the config, enriching from `inventory` or the configured store.
pub fn build_parser(
    config: &BidslipConfig,
    inventory: Option<&Path>,
) -> anyhow::Result<AuctionInvoiceParser> {
    let parser = AuctionInvoiceParser::from_config(config);

    let inventory = inventory.or(config.enrichment.inventory_path.as_deref());
    let Some(path) = inventory else {
        return Ok(parser);
    };

    let store = InventoryStore::from_file(path)?;
    info!("Loaded {} sold items from {}", store.len(), path.display());

    Ok(parser.with_lookup(Arc::new(store)))
}

pub fn format_invoice(invoice: &Invoice, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(invoice)?),
        OutputFormat::Csv => format_csv(invoice),
        OutputFormat::Text => Ok(format_text(invoice)),
    }
}

fn format_csv(invoice: &Invoice) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "invoice_number",
        "auction_lot",
        "buyer_email",
        "status",
        "item_lot",
        "sku",
        "shelf_location",
        "description",
        "msrp",
        "bid",
        "unit",
        "handling_fee",
    ])?;

    for item in &invoice.items {
        wtr.write_record([
            invoice.invoice_number.clone(),
            invoice.auction_lot.to_string(),
            invoice.buyer_email.clone(),
            invoice.status.as_str().to_string(),
            item.item_lot.to_string(),
            item.sku.map(|s| s.to_string()).unwrap_or_default(),
            item.shelf_location.clone().unwrap_or_default(),
            item.description.clone().unwrap_or_default(),
            item.msrp.to_string(),
            item.bid_amount.map(|b| b.to_string()).unwrap_or_default(),
            item.unit_quantity.to_string(),
            item.handling_fee.to_string(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(invoice: &Invoice) -> String {
    let mut output = String::new();

    output.push_str(&format!("Invoice: {}\n", invoice.invoice_number));
    output.push_str(&format!("Auction lot: {}\n", invoice.auction_lot));
    if let Some(time) = invoice.time {
        output.push_str(&format!("Time: {}\n", time));
    }
    output.push_str(&format!(
        "Status: {} ({})\n",
        invoice.status.as_str(),
        if invoice.is_shipping { "shipping" } else { "pickup" }
    ));
    output.push('\n');

    output.push_str("Buyer:\n");
    output.push_str(&format!("  {}\n", invoice.buyer_name));
    output.push_str(&format!("  {}\n", invoice.buyer_email));
    output.push_str(&format!("  {}\n", invoice.buyer_phone));
    output.push_str(&format!("  {}\n", invoice.buyer_address));
    if invoice.is_shipping {
        output.push_str(&format!("  Ship to: {}\n", invoice.shipping_address));
    }
    output.push('\n');

    output.push_str("Items:\n");
    for item in &invoice.items {
        output.push_str(&format!(
            "  Lot {:>5}  {} x MSRP {}  fee {}  {}\n",
            item.item_lot,
            item.unit_quantity,
            item.msrp,
            item.handling_fee,
            item.description.as_deref().unwrap_or("")
        ));
    }
    output.push('\n');

    output.push_str("Summary:\n");
    output.push_str(&format!("  Premium:      {}\n", invoice.buyers_premium));
    output.push_str(&format!("  Handling:     {}\n", invoice.total_handling_fee));
    output.push_str(&format!("  Tax:          {}\n", invoice.tax));
    output.push_str(&format!("  Total:        {}\n", invoice.invoice_total));
    output.push_str(&format!("  Balance due:  {}\n", invoice.remaining_balance));

    output
}
