use anyhow::Result;
use clap::Parser;
use pricescraper::{
    config::{DEFAULT_CSV_PATH, DEFAULT_JSON_PATH, DEFAULT_LOG_FILTER},
    driver::{self, Outputs},
    fetch::{self, ParseMode},
    CrawlOptions, VendorKind,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Cloud Pricing Crawler.")]
struct Args {
    /// Print results in the screen.
    #[arg(long)]
    print: bool,

    /// Save the data in csv file.
    #[arg(long = "save_csv")]
    save_csv: bool,

    /// Save the data in json file.
    #[arg(long = "save_json")]
    save_json: bool,

    #[arg(long, default_value = DEFAULT_CSV_PATH)]
    csv_path: PathBuf,

    #[arg(long, default_value = DEFAULT_JSON_PATH)]
    json_path: PathBuf,

    /// Crawl only this vendor. Repeat to pick several; all vendors by default.
    #[arg(long = "vendor", value_enum)]
    vendors: Vec<VendorKind>,

    /// Drop malformed rows without logging them.
    #[arg(long)]
    ignore_error: bool,

    /// Drop malformed rows and continue instead of aborting on the first one.
    #[arg(long)]
    keep_going: bool,

    /// How fetched pages are handed to the HTML parser.
    #[arg(long, value_enum, default_value_t = ParseMode::Document)]
    parser: ParseMode,
}

impl Args {
    /// A malformed row aborts the run unless `--keep-going` is given.
    fn crawl_options(&self) -> CrawlOptions {
        CrawlOptions {
            columns: None,
            ignore_error: self.ignore_error,
            break_on_error: !self.keep_going,
            parse_mode: self.parser,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .init();
    info!("startup");

    // ─── 2) crawl every vendor in order ──────────────────────────────
    let client = fetch::build_client()?;
    let kinds = if args.vendors.is_empty() {
        VendorKind::ALL.to_vec()
    } else {
        args.vendors.clone()
    };
    let vendors: Vec<_> = kinds.iter().map(|kind| kind.vendor()).collect();
    let options = args.crawl_options();
    let data = driver::crawl_all(&client, &vendors, &options)?;

    // ─── 3) render ───────────────────────────────────────────────────
    let outputs = Outputs {
        print: args.print,
        csv: args.save_csv.then(|| args.csv_path.clone()),
        json: args.save_json.then(|| args.json_path.clone()),
    };
    driver::render(&data, &outputs)?;

    info!(rows = data.len(), "done");
    Ok(())
}
