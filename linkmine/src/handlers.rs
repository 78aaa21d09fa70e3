use anyhow::{Context, Result, bail};
use clap::ArgMatches;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use linkmine_core::{
    IssueCallback, KeywordAggregator, KeywordError, KeywordIndex, LinkIndexBuilder, RecordWriter,
    RunSummary, generate_summary_report, read_records,
};
use linkmine_scanner::AnchorFetcher;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use url::Url;

pub const DEFAULT_PAGE_URL: &str = "http://news.sina.com.cn/guide/";
pub const DEFAULT_SELECTOR: &str = "div#tab01 a";
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_RECORD_FILE: &str = "keywords.csv";

/// Callback for reporting extraction progress
pub type ExtractProgressCallback = Arc<dyn Fn(String) + Send + Sync>;

/// Options for one extraction run
pub struct ExtractOptions {
    pub urls: Vec<String>,
    pub selector: String,
    pub output: PathBuf,
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
    pub dry_run: bool,
}

/// What an extraction run produced
pub struct Extraction {
    pub keywords: KeywordIndex,
    pub summary: RunSummary,
    /// Records appended to the store, `None` on a dry run
    pub written: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => bail!("Unknown output format '{}'", other),
        }
    }
}

impl OutputFormat {
    /// Format requested by an `extract` invocation, text when unset
    pub fn from_args(args: &ArgMatches) -> Self {
        args.get_one::<String>("format")
            .and_then(|f| f.parse().ok())
            .unwrap_or(OutputFormat::Text)
    }

    /// Whether banner and progress lines may share stdout with the output
    pub fn allows_chatter(self, quiet: bool) -> bool {
        !quiet && self == OutputFormat::Text
    }
}

// Helper functions for extract handler

/// Load page URLs from either a file or a single URL argument
pub fn load_urls_from_source(url: Option<&Url>, hosts_file: Option<&PathBuf>) -> Result<Vec<String>> {
    if let Some(hosts_file_path) = hosts_file {
        load_urls_from_file(hosts_file_path)
    } else if let Some(url) = url {
        Ok(vec![url.as_str().to_string()])
    } else {
        bail!("Either --url or --hosts-file must be provided")
    }
}

/// Load and parse page URLs from a file
pub fn load_urls_from_file(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read hosts file {}", path.display()))?;

    let urls: Vec<String> = content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| parse_url_line(line.trim()))
        .collect();

    if urls.is_empty() {
        bail!("No valid URLs found in {}", path.display());
    }

    Ok(urls)
}

/// Parse a single line as a URL, trying to add http:// if needed
pub fn parse_url_line(line: &str) -> Option<String> {
    if let Ok(url) = Url::parse(line)
        && url.has_host()
    {
        return Some(line.to_string());
    }

    let with_scheme = format!("http://{}", line);
    if Url::parse(&with_scheme).is_ok() {
        return Some(with_scheme);
    }

    warn!("Skipping invalid URL '{}'", line);
    None
}

/// Expand `~` in `data_dir` and join the record file name onto it
pub fn resolve_output_path(data_dir: &str, file_name: &str) -> PathBuf {
    let expanded = shellexpand::tilde(data_dir);
    Path::new(expanded.as_ref()).join(file_name)
}

/// Fetch every page, build its keyword index, merge them and append the
/// result to the record store once.
///
/// A page that cannot be fetched is reported and skipped. The run fails
/// only when no page could be analysed or the store cannot be written.
pub async fn execute_extraction(
    options: ExtractOptions,
    progress_callback: Option<ExtractProgressCallback>,
    issue_callback: Option<IssueCallback>,
) -> Result<Extraction> {
    let ExtractOptions {
        urls,
        selector,
        output,
        timeout_secs,
        user_agent,
        dry_run,
    } = options;

    let mut fetcher = AnchorFetcher::with_timeout(timeout_secs);
    if let Some(user_agent) = user_agent {
        fetcher = fetcher.with_user_agent(user_agent);
    }

    let aggregator = match issue_callback.clone() {
        Some(callback) => KeywordAggregator::with_issue_callback(callback),
        None => KeywordAggregator::new(),
    };

    let mut keywords = KeywordIndex::new();
    let mut summary = RunSummary::new();

    for (idx, page_url) in urls.iter().enumerate() {
        if let Some(ref callback) = progress_callback {
            callback(format!("Fetching page {}/{}: {}", idx + 1, urls.len(), page_url));
        }

        let links = match fetcher.fetch_links(page_url, &selector).await {
            Ok(links) => links,
            Err(e) => {
                warn!("Failed to fetch {}: {}", page_url, e);
                if let Some(ref callback) = progress_callback {
                    callback(format!("Failed to fetch {}: {}", page_url, e));
                }
                summary.record_failure();
                continue;
            }
        };

        let link_index = LinkIndexBuilder::build(page_url, links);
        summary.record_page(&link_index);
        keywords.extend(aggregator.aggregate(page_url, &link_index));
    }
    summary.finish(&keywords);

    if summary.pages == 0 {
        bail!("None of the {} page(s) could be fetched", urls.len());
    }

    let written = if dry_run {
        None
    } else {
        if let Some(parent) = output.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory {}", parent.display()))?;
        }

        let mut writer = RecordWriter::new(&output);
        if let Some(callback) = issue_callback {
            writer = writer.with_issue_callback(callback);
        }
        let written = writer
            .write(&keywords)
            .with_context(|| format!("Failed to write records to {}", output.display()))?;
        Some(written)
    };

    Ok(Extraction {
        keywords,
        summary,
        written,
    })
}

/// Render the outcome of a run in the requested format
pub fn render_extraction(extraction: &Extraction, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(generate_summary_report(
            &extraction.summary,
            &extraction.keywords,
        )),
        OutputFormat::Json => {
            let value = serde_json::json!({
                "summary": extraction.summary,
                "written": extraction.written,
                "keywords": extraction.keywords,
            });
            Ok(serde_json::to_string_pretty(&value)?)
        }
    }
}

pub fn print_banner() {
    println!(
        "{} {}",
        "linkmine".bright_cyan().bold(),
        format!("v{} - anchor text keyword harvester", env!("CARGO_PKG_VERSION")).bright_black()
    );
    println!();
}

fn spinner() -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub async fn handle_extract(args: &ArgMatches, quiet: bool) -> Result<()> {
    let url = args.get_one::<Url>("url");
    let hosts_file = args.get_one::<PathBuf>("hosts-file");
    let selector = args
        .get_one::<String>("selector")
        .map(String::as_str)
        .unwrap_or(DEFAULT_SELECTOR);
    let data_dir = args
        .get_one::<String>("data-dir")
        .map(String::as_str)
        .unwrap_or(DEFAULT_DATA_DIR);
    let file_name = args
        .get_one::<String>("output")
        .map(String::as_str)
        .unwrap_or(DEFAULT_RECORD_FILE);
    let timeout_secs = args.get_one::<u64>("timeout").copied().unwrap_or(10);
    let user_agent = args.get_one::<String>("user-agent").cloned();
    let dry_run = args.get_flag("dry-run");
    let format = OutputFormat::from_args(args);
    let chatter = format.allows_chatter(quiet);

    let urls = load_urls_from_source(url, hosts_file)?;
    let output = resolve_output_path(data_dir, file_name);

    if chatter {
        println!("{} Pages: {}", "→".blue(), urls.len().to_string().bright_white());
        println!("{} Selector: {}", "→".blue(), selector.bright_white());
        if dry_run {
            println!("{} Dry run, record store untouched", "→".yellow());
        } else {
            println!(
                "{} Record store: {}",
                "→".blue(),
                output.display().to_string().bright_white()
            );
        }
        println!();
    }

    let pb = Arc::new(spinner());
    if quiet {
        pb.set_draw_target(indicatif::ProgressDrawTarget::hidden());
    }

    let pb_progress = pb.clone();
    let progress_callback: ExtractProgressCallback = Arc::new(move |msg: String| {
        pb_progress.set_message(msg);
    });
    let pb_issue = pb.clone();
    let issue_callback: IssueCallback = Arc::new(move |issue: &KeywordError| {
        pb_issue.println(format!("{} {}", "⚠".yellow(), issue));
    });

    let options = ExtractOptions {
        urls,
        selector: selector.to_string(),
        output: output.clone(),
        timeout_secs,
        user_agent,
        dry_run,
    };
    let result = execute_extraction(options, Some(progress_callback), Some(issue_callback)).await;
    pb.finish_and_clear();
    let extraction = result?;

    if !quiet || format == OutputFormat::Json {
        print!("{}", render_extraction(&extraction, format)?);
    }

    if chatter && let Some(written) = extraction.written {
        println!(
            "{} Appended {} records to {}",
            "✓".green().bold(),
            written,
            output.display().to_string().bright_white()
        );
    }

    Ok(())
}

pub fn handle_show(args: &ArgMatches) -> Result<()> {
    let default_path = resolve_output_path(DEFAULT_DATA_DIR, DEFAULT_RECORD_FILE);
    let path = args
        .get_one::<String>("FILE")
        .map(|p| PathBuf::from(shellexpand::tilde(p).as_ref()))
        .unwrap_or(default_path);

    let records = read_records(&path)
        .with_context(|| format!("Failed to read records from {}", path.display()))?;

    for record in &records {
        println!(
            "{} {}",
            format!("{}:", record.anchor_text).bright_white().bold(),
            record.keywords.join(", ").cyan()
        );
    }
    println!();
    println!(
        "{} {} records in {}",
        "ℹ".blue(),
        records.len(),
        path.display().to_string().bright_white()
    );

    Ok(())
}
