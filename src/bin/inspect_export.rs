use anyhow::{Context, Result};
use clap::Parser;
use parquet::file::reader::{FileReader, SerializedFileReader};
use prettytable::{format, Cell, Row, Table};
use std::{fs::File, path::PathBuf};
use tourstats::{
    export::read_parquet,
    report::{mean_cost_by_tour, KeyMetrics},
};
use tracing_subscriber::{fmt, EnvFilter};

/// Print what a cleaned-table Parquet export contains.
#[derive(Parser, Debug)]
#[command(name = "inspect_export")]
struct Args {
    /// Parquet file written by `tourstats --parquet`
    path: PathBuf,
}

fn main() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let path = &args.path;

    // 1) file-level metadata
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = SerializedFileReader::new(file).context("reading parquet footer")?;
    let meta = reader.metadata();
    let file_meta = meta.file_metadata();
    println!("=== Parquet File: {} ===", path.display());
    println!(
        "Created by:           {}",
        file_meta.created_by().unwrap_or("<unknown>")
    );
    println!("Total rows:           {}", file_meta.num_rows());
    println!("Number of row groups: {}", meta.num_row_groups());
    println!("File-size on disk:    {} bytes", std::fs::metadata(path)?.len());
    println!();

    println!("=== Columns ===");
    for col in file_meta.schema_descr().columns() {
        println!("- {:<20} | Physical: {:?}", col.name(), col.physical_type());
    }
    println!();

    // 2) content, via the typed reader
    let records = read_parquet(path)?;
    let metrics = KeyMetrics::compute(&records);
    let undefined = records.iter().filter(|r| r.cost_per_ticket.is_none()).count();
    println!("Records:              {}", records.len());
    println!("Total revenue:        {:.2}", metrics.total_revenue);
    println!("Total tickets sold:   {}", metrics.total_tickets_sold);
    println!("Cost per ticket null: {}", undefined);
    println!();

    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.add_row(Row::new(vec![
        Cell::new("Tour").style_spec("bFg"),
        Cell::new("Rows").style_spec("bFg"),
        Cell::new("Mean Cost Per Ticket").style_spec("bFg"),
    ]));
    for m in mean_cost_by_tour(&records) {
        let rows = records
            .iter()
            .filter(|r| r.tour.as_deref() == Some(m.tour.as_str()))
            .count();
        table.add_row(Row::new(vec![
            Cell::new(&m.tour),
            Cell::new(&rows.to_string()).style_spec("r"),
            Cell::new(
                &m.mean_cost_per_ticket
                    .map(|v| format!("{:.2}", v))
                    .unwrap_or_else(|| "-".into()),
            )
            .style_spec("r"),
        ]));
    }
    table.printstd();

    Ok(())
}
