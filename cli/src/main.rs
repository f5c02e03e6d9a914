//! teixcerpt CLI - TEI excerpt extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use teixcerpt::batch::{run_batch, BatchOptions, FileOutcome};
use teixcerpt::extract::{collect_idnos, excerpt_status_counts, select_excerpts};
use teixcerpt::lookup::{LookupOptions, LookupTables, MetadataResolver, MetadataSource};
use teixcerpt::render::{to_json, write_report};
use teixcerpt::{
    parse_file_with_options, ExtractOptions, Extractor, GapPolicy, JsonFormat, LeadingGapScope,
    ParseOptions, RespStmtPolicy, XmlFormat,
};

const API_BASE_URL: &str = "https://tibschol.acdh-ch-dev.oeaw.ac.at/apis/api/";
const INSTANCE_ENDPOINT: &str = "apis_ontology.instance/";

#[derive(Parser)]
#[command(name = "teixcerpt")]
#[command(author = "TibSchol")]
#[command(version)]
#[command(about = "Extract excerpts from TEI manuscripts and enrich their headers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract excerpts from every file matching a glob pattern
    Extract {
        /// Input glob pattern (e.g. "data/tei/*.xml")
        #[arg(value_name = "GLOB")]
        pattern: String,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = "data/excerpts")]
        out_dir: PathBuf,

        /// Error report (.csv or .md), written only if some files fail
        #[arg(long, value_name = "FILE", default_value = "errors.md")]
        report: PathBuf,

        #[command(flatten)]
        tables: TableArgs,

        #[command(flatten)]
        extract: ExtractArgs,

        /// Write output without indentation
        #[arg(long)]
        compact: bool,
    },

    /// Resolve one identifier and print its metadata as JSON
    Lookup {
        /// Identifier to resolve
        #[arg(value_name = "IDNO")]
        idno: String,

        #[command(flatten)]
        tables: TableArgs,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,
    },

    /// Show identifiers and excerpt statistics for one document
    Info {
        /// Input TEI file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        selection: SelectionArgs,
    },

    /// Download the instance table from the API
    Fetch {
        /// Output CSV file
        #[arg(short, long, value_name = "FILE", default_value = "data/instances.csv")]
        output: PathBuf,

        /// API base URL
        #[arg(long, default_value = API_BASE_URL)]
        base_url: String,

        /// API user name
        #[arg(long, env = "TIBSCHOL_API_USERNAME", default_value = "")]
        username: String,

        /// API password
        #[arg(long, env = "TIBSCHOL_API_PASSWORD", default_value = "", hide_env_values = true)]
        password: String,
    },

    /// Show version information
    Version,
}

/// Lookup table locations.
#[derive(Args)]
struct TableArgs {
    /// Instance table (CSV)
    #[arg(long, value_name = "FILE", env = "TEIXCERPT_INSTANCES", default_value = "data/instances.csv")]
    instances: PathBuf,

    /// Work table (CSV)
    #[arg(long, value_name = "FILE", env = "TEIXCERPT_WORKS", default_value = "data/works.csv")]
    works: PathBuf,

    /// Person table (CSV), used for author URLs
    #[arg(long, value_name = "FILE", env = "TEIXCERPT_PERSONS")]
    persons: Option<PathBuf>,

    /// Instance column holding reference identifiers
    #[arg(long, value_name = "COLUMN", default_value = "tibschol_ref")]
    reference_column: String,
}

impl TableArgs {
    fn resolver(&self) -> Result<MetadataResolver, Box<dyn std::error::Error>> {
        let tables = LookupTables::load(&self.instances, &self.works, self.persons.as_deref())?;
        let options = LookupOptions::new().with_reference_column(&self.reference_column);
        Ok(MetadataResolver::with_options(tables, options)?)
    }
}

/// Which excerpts and identifiers a document is read for.
#[derive(Args)]
struct SelectionArgs {
    /// Select excerpts regardless of status
    #[arg(long)]
    no_status_filter: bool,

    /// idno type used as lookup key
    #[arg(long, default_value = "TibSchol")]
    idno_type: String,
}

impl SelectionArgs {
    fn options(&self) -> ExtractOptions {
        ExtractOptions::new()
            .with_status_filter(!self.no_status_filter)
            .with_idno_type(&self.idno_type)
    }
}

/// Excerpt selection, body and header options.
#[derive(Args)]
struct ExtractArgs {
    #[command(flatten)]
    selection: SelectionArgs,

    /// Write output for documents without excerpts
    #[arg(long)]
    keep_empty: bool,

    /// When to put a gap between two excerpts
    #[arg(long, value_enum, default_value = "always")]
    gap_policy: GapMode,

    /// Text that counts as preceding the first excerpt
    #[arg(long, value_enum, default_value = "document")]
    leading_gap_scope: ScopeMode,

    /// Whether to emit empty responsibility statements
    #[arg(long, value_enum, default_value = "when-present")]
    resp_stmt: RespMode,
}

impl ExtractArgs {
    fn options(&self) -> ExtractOptions {
        self.selection
            .options()
            .with_skip_empty(!self.keep_empty)
            .with_gap_policy(self.gap_policy.into())
            .with_leading_gap_scope(self.leading_gap_scope.into())
            .with_resp_stmt_policy(self.resp_stmt.into())
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum GapMode {
    /// Gap between every pair of excerpts
    Always,
    /// Gap only where source text was left out
    WhenSeparated,
}

impl From<GapMode> for GapPolicy {
    fn from(mode: GapMode) -> Self {
        match mode {
            GapMode::Always => GapPolicy::Always,
            GapMode::WhenSeparated => GapPolicy::WhenSeparated,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum ScopeMode {
    /// Any text in the document, header included
    Document,
    /// Only text inside the body
    Body,
}

impl From<ScopeMode> for LeadingGapScope {
    fn from(mode: ScopeMode) -> Self {
        match mode {
            ScopeMode::Document => LeadingGapScope::Document,
            ScopeMode::Body => LeadingGapScope::Body,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum RespMode {
    /// One statement per principal or funder present
    WhenPresent,
    /// Always at least one statement for each
    Always,
}

impl From<RespMode> for RespStmtPolicy {
    fn from(mode: RespMode) -> Self {
        match mode {
            RespMode::WhenPresent => RespStmtPolicy::WhenPresent,
            RespMode::Always => RespStmtPolicy::Always,
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Extract {
            pattern,
            out_dir,
            report,
            tables,
            extract,
            compact,
        }) => cmd_extract(&pattern, &out_dir, &report, &tables, &extract, compact),
        Some(Commands::Lookup {
            idno,
            tables,
            compact,
        }) => cmd_lookup(&idno, &tables, compact),
        Some(Commands::Info { input, selection }) => cmd_info(&input, &selection),
        Some(Commands::Fetch {
            output,
            base_url,
            username,
            password,
        }) => cmd_fetch(&output, &base_url, &username, &password),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: teixcerpt extract <GLOB>".yellow());
            println!("       teixcerpt --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_extract(
    pattern: &str,
    out_dir: &Path,
    report_path: &Path,
    tables: &TableArgs,
    extract: &ExtractArgs,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut inputs = Vec::new();
    for entry in glob::glob(pattern)? {
        inputs.push(entry?);
    }
    inputs.sort();
    if inputs.is_empty() {
        println!("{} {}", "No files match".yellow(), pattern);
        return Ok(());
    }

    let resolver = tables.resolver()?;
    let extractor = Extractor::new(&resolver, extract.options());
    fs::create_dir_all(out_dir)?;

    let options = BatchOptions {
        parse: ParseOptions::default(),
        format: if compact {
            XmlFormat::Compact
        } else {
            XmlFormat::Pretty
        },
    };

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let report = run_batch(&extractor, &inputs, out_dir, &options, |path, outcome| {
        let name = path.file_name().unwrap_or_default().to_string_lossy();
        match outcome {
            FileOutcome::Written { segments, .. } => {
                pb.set_message(format!("{} ({} excerpts)", name, segments))
            }
            FileOutcome::Skipped => pb.set_message(format!("{} (no excerpts)", name)),
            FileOutcome::Failed(_) => pb.set_message(format!("{} (failed)", name)),
        }
        pb.inc(1);
    });
    pb.finish_with_message("Done!");

    println!();
    println!("{}: {}", "Written".green().bold(), report.written.len());
    println!("{}: {}", "Skipped".bold(), report.skipped.len());
    println!("{}: {}", "Failed".bold(), report.errors.len());

    if !report.is_success() {
        write_report(&report.errors, report_path)?;
        println!(
            "\n{} {}",
            "Error report saved to".yellow(),
            report_path.display()
        );
    }

    Ok(())
}

fn cmd_lookup(
    idno: &str,
    tables: &TableArgs,
    compact: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let resolver = tables.resolver()?;
    let metadata = resolver.resolve(idno)?;

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    println!("{}", to_json(&metadata, format)?);

    Ok(())
}

fn cmd_info(input: &Path, selection: &SelectionArgs) -> Result<(), Box<dyn std::error::Error>> {
    let doc = parse_file_with_options(input, ParseOptions::new().lenient())?;
    let options = selection.options();

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    if let Some(ns) = doc.default_namespace() {
        println!("{}: {}", "Namespace".bold(), ns);
    }

    let idnos = doc
        .header()
        .map(|header| collect_idnos(header, &options.idno_type))
        .unwrap_or_default();
    if idnos.is_empty() {
        println!("{}: {}", "Identifiers".bold(), "none".dimmed());
    } else {
        println!("{}: {}", "Identifiers".bold(), idnos.join(", "));
    }

    println!();
    println!("{}", "Excerpt Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for (status, count) in excerpt_status_counts(&doc) {
        let accepted = options.accepts_status((!status.is_empty()).then_some(status.as_str()));
        let label = if status.is_empty() {
            "(no status)".to_string()
        } else {
            status
        };
        let marker = if accepted {
            "✓".green()
        } else {
            "·".dimmed()
        };
        println!("  {} {}: {}", marker, label.bold(), count);
    }

    let segments = select_excerpts(&doc, &options);
    let words: usize = segments
        .iter()
        .map(|s| s.element.text().split_whitespace().count())
        .sum();
    println!("{}: {}", "Selected".bold(), segments.len());
    println!("{}: {}", "Words".bold(), words);

    Ok(())
}

fn cmd_fetch(
    output: &Path,
    base_url: &str,
    username: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", "Fetching instances...".cyan());

    let rt = tokio::runtime::Runtime::new()?;
    let records = rt.block_on(fetch_list(base_url, INSTANCE_ENDPOINT, username, password))?;
    save_records(&records, output)?;

    println!(
        "{} {} instances -> {}",
        "Fetched".green().bold(),
        records.len(),
        output.display()
    );
    Ok(())
}

type Record = serde_json::Map<String, serde_json::Value>;

/// Follow `next` links from `endpoint`, collecting every page's `results`.
async fn fetch_list(
    base_url: &str,
    endpoint: &str,
    username: &str,
    password: &str,
) -> Result<Vec<Record>, Box<dyn std::error::Error>> {
    let client = reqwest::Client::new();
    let mut url = format!("{}{}", base_url, endpoint);
    let mut records = Vec::new();

    loop {
        log::debug!("Fetching {}", url);
        let response = client
            .get(&url)
            .basic_auth(username, Some(password))
            .send()
            .await?;

        if !response.status().is_success() {
            log::error!("Error fetching data: {} from {}", response.status(), url);
            return Err(format!("API returned {} for {}", response.status(), url).into());
        }

        let page: serde_json::Value = response.json().await?;
        let results = match page.get("results").and_then(|r| r.as_array()) {
            Some(results) if !results.is_empty() => results,
            _ => break,
        };
        records.extend(results.iter().filter_map(|r| r.as_object().cloned()));

        match page.get("next").and_then(|n| n.as_str()) {
            Some(next) if !next.is_empty() => url = next.to_string(),
            _ => break,
        }
    }

    Ok(records)
}

/// Write fetched records to `path`, leaving any existing file untouched
/// when there is nothing to write.
fn save_records(records: &[Record], path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    if records.is_empty() {
        return Err(format!("No instances fetched; {} left unchanged", path.display()).into());
    }

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    write_records(records, path)
}

/// Write records as CSV: the union of their keys in first-seen order,
/// nested values as JSON text.
fn write_records(records: &[Record], path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let mut columns: Vec<&str> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }

    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(&columns)?;
    for record in records {
        writer.write_record(columns.iter().map(|col| cell(record.get(*col))))?;
    }
    writer.flush()?;
    Ok(())
}

fn cell(value: Option<&serde_json::Value>) -> String {
    match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn cmd_version() {
    println!("{} {}", "teixcerpt".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("TEI excerpt extraction tool");
    println!();
    println!("License: MIT");
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_cell_values() {
        assert_eq!(cell(None), "");
        assert_eq!(cell(Some(&json!(null))), "");
        assert_eq!(cell(Some(&json!("T001"))), "T001");
        assert_eq!(cell(Some(&json!(12))), "12");
        assert_eq!(cell(Some(&json!([{"label": "x"}]))), r#"[{"label":"x"}]"#);
    }

    #[test]
    fn test_write_records_column_union() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("instances.csv");
        let records: Vec<Record> = vec![
            json!({"id": 1, "tibschol_ref": "T001"}).as_object().unwrap().clone(),
            json!({"id": 2, "relations": [{"label": "has as an instance"}]})
                .as_object()
                .unwrap()
                .clone(),
        ];

        write_records(&records, &path).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = written.lines().collect();
        assert_eq!(lines[0], "id,tibschol_ref,relations");
        assert_eq!(lines[1], "1,T001,");
        assert_eq!(lines[2], r#"2,,"[{""label"":""has as an instance""}]""#);
    }

    #[test]
    fn test_cli_parses_extract_flags() {
        let cli = Cli::try_parse_from([
            "teixcerpt",
            "extract",
            "tei/*.xml",
            "--no-status-filter",
            "--gap-policy",
            "when-separated",
            "--leading-gap-scope",
            "body",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Extract { extract, .. }) => {
                let options = extract.options();
                assert!(!options.filter_by_status);
                assert_eq!(options.gap_policy, GapPolicy::WhenSeparated);
                assert_eq!(options.leading_gap_scope, LeadingGapScope::Body);
            }
            _ => panic!("expected extract command"),
        }
    }

    #[test]
    fn test_save_records_keeps_existing_file_when_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("instances.csv");
        fs::write(&path, "id,tibschol_ref\n1,T001\n").unwrap();

        assert!(save_records(&[], &path).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "id,tibschol_ref\n1,T001\n");
    }

    #[test]
    fn test_save_records_creates_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("instances.csv");
        let records = vec![json!({"id": 1}).as_object().unwrap().clone()];

        save_records(&records, &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "id\n1\n");
    }

    #[test]
    fn test_info_takes_selection_flags_only() {
        let cli = Cli::try_parse_from([
            "teixcerpt",
            "info",
            "ms.xml",
            "--no-status-filter",
            "--idno-type",
            "Other",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Info { selection, .. }) => {
                let options = selection.options();
                assert!(!options.filter_by_status);
                assert_eq!(options.idno_type, "Other");
            }
            _ => panic!("expected info command"),
        }

        for flag in [
            ["--gap-policy", "always"],
            ["--leading-gap-scope", "body"],
            ["--resp-stmt", "always"],
        ] {
            let args = ["teixcerpt", "info", "ms.xml", flag[0], flag[1]];
            assert!(Cli::try_parse_from(args).is_err(), "{} accepted", flag[0]);
        }
    }
}
