use anyhow::{Context, Result};
use clap::Parser;
use prettytable::{format, Cell, Row, Table};
use std::{path::PathBuf, process::ExitCode};
use tourstats::{
    config::{Config, Overrides},
    export, load, normalize,
    process::{CleanRecord, COLUMNS},
    report::{numeric_column, Histogram, Report, Summary},
    Error, TourDataset, TourFilter,
};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, EnvFilter};

/// Revenue, ticket sales and cost per ticket by tour.
#[derive(Parser, Debug)]
#[command(name = "tourstats", version)]
struct Args {
    /// Tour sheet to analyse, or `-` to read an upload from stdin
    /// [default: taylor_Train.csv]
    #[arg(env = "TOURSTATS_CSV")]
    csv: Option<PathBuf>,

    /// Tour to show, or "All"
    #[arg(long)]
    tour: Option<String>,

    /// Text encoding of the sheet [default: windows-1252, utf-8 for stdin]
    #[arg(long)]
    encoding: Option<String>,

    /// YAML settings file
    #[arg(long, short)]
    config: Option<PathBuf>,

    /// Also write the cleaned table to this Parquet file
    #[arg(long)]
    parquet: Option<PathBuf>,

    /// Revenue histogram bins [default: 20]
    #[arg(long)]
    bins: Option<usize>,

    /// Print the report as JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Rows of the cleaned table to print (0 prints all)
    #[arg(long, default_value_t = 20)]
    rows: usize,

    /// Print a histogram of this numeric column as well
    #[arg(long)]
    histogram: Option<String>,
}

fn main() -> Result<ExitCode> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();

    // ─── 2) resolve settings ─────────────────────────────────────────
    let args = Args::parse();
    let base = match &args.config {
        Some(p) => Config::load(p)?,
        None => Config::default(),
    };
    let cfg = base.apply(Overrides {
        csv_path: args.csv.clone(),
        encoding: args.encoding.clone(),
        tour: args.tour.clone(),
        parquet_out: args.parquet.clone(),
        histogram_bins: args.bins,
    })?;
    info!(csv = %cfg.csv_path.display(), tour = %cfg.tour, encoding = cfg.encoding_label(), "startup");

    // ─── 3) load + clean ─────────────────────────────────────────────
    let (source, loaded) = if cfg.reads_stdin() {
        let stdin = std::io::stdin().lock();
        ("<stdin>".to_string(), load::load_reader(stdin, "<stdin>", cfg.encoding_label()))
    } else {
        (
            cfg.csv_path.display().to_string(),
            load::load_csv(&cfg.csv_path, cfg.encoding_label()),
        )
    };
    let raw = match loaded {
        Ok(raw) => raw,
        Err(Error::SourceUnavailable { path, source }) => {
            error!(path = %path.display(), %source, "source unavailable");
            eprintln!(
                "The file '{}' was not found or could not be read. Please make sure it's in the correct directory.",
                path.display()
            );
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => return Err(e).context("loading tour sheet"),
    };
    let records = normalize(&raw).context("cleaning tour sheet")?;
    let dataset = TourDataset::new(source, records);

    // ─── 4) select + summarise ───────────────────────────────────────
    let filter = TourFilter::parse(&cfg.tour);
    if let TourFilter::Tour(t) = &filter {
        if !dataset.tours().contains(&t.as_str()) {
            warn!(tour = %t, available = ?dataset.tours(), "no rows for selected tour");
        }
    }
    let report = dataset.report(&filter, cfg.histogram_bins);
    let selected = dataset.filter(&filter);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, &dataset, &selected, args.rows);
    }

    if let Some(column) = &args.histogram {
        match numeric_column(selected.iter().copied(), column) {
            Some(values) => {
                let h = Histogram::build(values.into_iter().flatten(), cfg.histogram_bins);
                println!("\n--- Distribution of {} ---", column);
                histogram_table(&h).printstd();
            }
            None => println!("\nPlease select a numeric column."),
        }
    }

    // ─── 5) optional export ──────────────────────────────────────────
    if let Some(out) = &cfg.parquet_out {
        let bytes = export::write_parquet(dataset.records(), out)?;
        info!(path = %out.display(), bytes, "exported cleaned table");
    }

    Ok(ExitCode::SUCCESS)
}

fn print_report(report: &Report, dataset: &TourDataset, selected: &[&CleanRecord], limit: usize) {
    println!("--- Concert Tour Analysis: {} ---", report.tour);
    println!("Tours: All, {}", dataset.tours().join(", "));

    // key metrics
    let m = &report.metrics;
    let mut metrics = Table::new();
    metrics.set_format(*format::consts::FORMAT_BOX_CHARS);
    metrics.add_row(header(&["Total Revenue", "Total Tickets Sold", "Avg. Cost Per Ticket"]));
    metrics.add_row(Row::new(vec![
        Cell::new(&dollars(m.total_revenue)).style_spec("r"),
        Cell::new(&m.total_tickets_sold.to_string()).style_spec("r"),
        Cell::new(&m.avg_cost_per_ticket.map(dollars).unwrap_or_else(|| "-".into()))
            .style_spec("r"),
    ]));
    metrics.printstd();

    // data overview
    println!("\n--- Concert Data Overview ({} rows) ---", selected.len());
    let shown = if limit == 0 { selected.len() } else { limit.min(selected.len()) };
    let mut data = Table::new();
    data.set_format(*format::consts::FORMAT_BOX_CHARS);
    data.add_row(header(&COLUMNS));
    for r in &selected[..shown] {
        data.add_row(record_row(r));
    }
    data.printstd();
    if shown < selected.len() {
        println!("... {} more rows", selected.len() - shown);
    }

    // describe
    println!("\nNumber of Rows: {}", report.rows);
    println!("Number of Columns: {}", report.columns);
    println!("\n--- Summary Statistics ---");
    describe_table(report).printstd();

    // bar chart data
    println!("\n--- Average Cost Per Ticket by Tour ---");
    let mut by_tour = Table::new();
    by_tour.set_format(*format::consts::FORMAT_BOX_CHARS);
    by_tour.add_row(header(&["Tour", "Average Cost Per Ticket (Dollars)"]));
    for t in &report.mean_cost_by_tour {
        by_tour.add_row(Row::new(vec![
            Cell::new(&t.tour),
            Cell::new(&t.mean_cost_per_ticket.map(dollars).unwrap_or_else(|| "-".into()))
                .style_spec("r"),
        ]));
    }
    by_tour.printstd();

    println!("\n--- Revenue Distribution ---");
    histogram_table(&report.revenue_histogram).printstd();
}

fn header(names: &[&str]) -> Row {
    Row::new(names.iter().map(|n| Cell::new(n).style_spec("bFg")).collect())
}

fn record_row(r: &CleanRecord) -> Row {
    let text = |v: &Option<String>| Cell::new(v.as_deref().unwrap_or(""));
    Row::new(vec![
        text(&r.city),
        text(&r.country),
        text(&r.venue),
        Cell::new(&r.tickets_sold.to_string()).style_spec("r"),
        Cell::new(&r.tickets_available.to_string()).style_spec("r"),
        Cell::new(&format!("{:.2}", r.revenue)).style_spec("r"),
        Cell::new(&number(r.cost_per_ticket)).style_spec("r"),
        text(&r.tour),
        text(&r.opening_act),
    ])
}

/// One row per statistic, one column per numeric column.
fn describe_table(report: &Report) -> Table {
    let mut t = Table::new();
    t.set_format(*format::consts::FORMAT_BOX_CHARS);
    let mut names = vec![""];
    names.extend(report.numeric_summaries.iter().map(|c| c.column.as_str()));
    t.add_row(header(&names));

    let columns: Vec<_> = report.numeric_summaries.iter().map(|c| c.summary.rows()).collect();
    let labels = Summary::default().rows();
    for (i, (label, _)) in labels.iter().enumerate() {
        let mut cells = vec![Cell::new(label).style_spec("b")];
        cells.extend(columns.iter().map(|rows| Cell::new(&number(rows[i].1)).style_spec("r")));
        t.add_row(Row::new(cells));
    }
    t
}

fn histogram_table(h: &Histogram) -> Table {
    let mut t = Table::new();
    t.set_format(*format::consts::FORMAT_BOX_CHARS);
    t.add_row(header(&["From", "To", "Count", ""]));
    let widest = h.bins.iter().map(|b| b.count).max().unwrap_or(0).max(1);
    for b in &h.bins {
        let bar = "#".repeat((b.count * 40).div_ceil(widest));
        t.add_row(Row::new(vec![
            Cell::new(&format!("{:.2}", b.lower)).style_spec("r"),
            Cell::new(&format!("{:.2}", b.upper)).style_spec("r"),
            Cell::new(&b.count.to_string()).style_spec("r"),
            Cell::new(&bar),
        ]));
    }
    t
}

fn number(v: Option<f64>) -> String {
    v.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "NaN".into())
}

/// `1234567.891` → `"$1,234,567.89"`
fn dollars(v: f64) -> String {
    let s = format!("{:.2}", v.abs());
    let (int, frac) = s.split_once('.').unwrap_or((s.as_str(), "00"));
    let mut grouped = String::with_capacity(int.len() + int.len() / 3);
    for (i, c) in int.chars().enumerate() {
        if i > 0 && (int.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    let sign = if v < 0.0 { "-" } else { "" };
    format!("{}${}.{}", sign, grouped, frac)
}
