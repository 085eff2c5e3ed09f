use std::io::IsTerminal;
use std::path::PathBuf;

use chrono::{NaiveDate, NaiveTime, Utc};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use miette::{IntoDiagnostic, Result};

use tempo_core::{OutputFormat, Period, TempoConfig};
use tempo_gitlog::blame::blame_stats;
use tempo_gitlog::branches::unmerged_branches;
use tempo_gitlog::client::GitClient;
use tempo_gitlog::filter::LogFilter;
use tempo_gitlog::parse::parse_log;
use tempo_gitlog::reconcile::{reconcile, ReconciledStats};
use tempo_gitlog::stats::{
    author_stats, file_stats, file_type_stats, period_stats, summarize, time_stats, AuthorStat,
    FileStat, FileTypeStat, Granularity, PeriodStat, RepoSummary, TimeStats,
};
use tempo_snapshot::{assemble, GitSnapshot};
use tempo_tracker::client::{build_jql, TrackerClient};
use tempo_tracker::mapping::StatusMapping;
use tempo_tracker::metrics::{analyze, AnalyzerOptions, DurationBreakdown, TrackerMetrics};

#[derive(Parser)]
#[command(
    name = "tempo",
    version,
    about = "Engineering flow metrics from git history and issue tracker timelines",
    long_about = "Tempo derives engineering flow metrics from the places they already live:\n\
                   git history (read through the git CLI) and your issue tracker's status\n\
                   changelogs. No agents, no daemons — every run reads the sources fresh.\n\n\
                   Examples:\n  \
                     tempo git stats --since 2024-01-01  Commit, author, and time stats\n  \
                     tempo git files --limit 10          Most-changed files and types\n  \
                     tempo git branches                  Deduplicated cross-branch activity\n  \
                     tempo tracker --project ENG         Cycle time, WIP, throughput\n  \
                     tempo snapshot                      Git + tracker in one document\n  \
                     tempo init                          Create a .tempo.toml config file"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Path to configuration file (default: .tempo.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(
        long,
        global = true,
        default_value = "text",
        long_help = "Output format for command results.\n\n\
                       Formats:\n  \
                         text  Human-readable tables and summaries (default)\n  \
                         json  Machine-readable JSON with camelCase keys"
    )]
    format: OutputFormat,

    /// Enable verbose output
    #[arg(long, short, global = true)]
    verbose: bool,

    /// When to use colors
    #[arg(long, global = true, default_value = "auto")]
    color: ColorChoice,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze git history
    #[command(long_about = "Analyze git history through the git CLI.\n\n\
        Reads log, numstat, blame, and branch output from the repository's own\n\
        git binary — nothing is cached, every run reflects the repo as it is.\n\n\
        Examples:\n  tempo git stats --branch main --since 2024-01-01\n  \
        tempo git blame --file src/main.rs\n  tempo git branches")]
    Git {
        #[command(subcommand)]
        command: GitCommand,
    },
    /// Fetch issues and compute flow metrics
    #[command(
        long_about = "Fetch issues from the configured tracker and compute flow metrics.\n\n\
        Pulls issues with their status changelogs over the paginated search API,\n\
        then derives cycle time, lead time, blocked time, WIP, throughput, and\n\
        bug ratio. Needs base_url, email, and api_token under [tracker].\n\n\
        Examples:\n  tempo tracker --project ENG\n  tempo tracker --since 2024-01-01 --until 2024-03-31"
    )]
    Tracker {
        /// Project key to query (default: [tracker].project from config)
        #[arg(long)]
        project: Option<String>,

        /// Only issues created on or after this date (YYYY-MM-DD)
        #[arg(long)]
        since: Option<NaiveDate>,

        /// Only issues created on or before this date (YYYY-MM-DD)
        #[arg(long)]
        until: Option<NaiveDate>,
    },
    /// Combine git and tracker metrics into one snapshot document
    #[command(
        long_about = "Combine git and tracker metrics into one snapshot document.\n\n\
        Runs the git analysis and the tracker analysis for the same period and\n\
        assembles both into a single timestamped record. When no tracker is\n\
        configured the tracker section is marked unavailable instead of failing.\n\n\
        Examples:\n  tempo snapshot --since 2024-01-01 --until 2024-03-31\n  \
        tempo snapshot --format json > snapshot.json"
    )]
    Snapshot {
        /// Repository path (default: [git].repo_path from config)
        #[arg(long)]
        repo: Option<PathBuf>,

        /// Branch to analyze (default: current HEAD)
        #[arg(long)]
        branch: Option<String>,

        /// Project key to query (default: [tracker].project from config)
        #[arg(long)]
        project: Option<String>,

        /// Start of the analysis window (YYYY-MM-DD)
        #[arg(long)]
        since: Option<NaiveDate>,

        /// End of the analysis window (YYYY-MM-DD)
        #[arg(long)]
        until: Option<NaiveDate>,

        /// Calendar bucket for period statistics
        #[arg(long, default_value = "week")]
        granularity: Granularity,
    },
    /// Create a default .tempo.toml configuration file
    #[command(long_about = "Create a default .tempo.toml configuration file.\n\n\
        Generates a commented-out template with all available options.\n\
        Fails if .tempo.toml already exists.")]
    Init,
    /// Generate shell completion scripts
    #[command(hide = true)]
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
enum GitCommand {
    /// Summary, author, and time statistics for one branch
    #[command(long_about = "Summary, author, and time statistics for one branch.\n\n\
        Reads the commit log with per-file numstat and aggregates totals,\n\
        per-author contributions, hour/weekday/month activity, and per-period\n\
        rollups at the chosen granularity.\n\n\
        Examples:\n  tempo git stats\n  tempo git stats --author alice@example.com --since 2024-01-01\n  \
        tempo git stats --granularity month")]
    Stats {
        /// Repository path (default: [git].repo_path from config)
        #[arg(long)]
        repo: Option<PathBuf>,

        /// Branch to analyze (default: current HEAD)
        #[arg(long)]
        branch: Option<String>,

        /// Filter to one author, by email or display name
        #[arg(long)]
        author: Option<String>,

        /// Only commits on or after this date (YYYY-MM-DD)
        #[arg(long)]
        since: Option<NaiveDate>,

        /// Only commits on or before this date (YYYY-MM-DD)
        #[arg(long)]
        until: Option<NaiveDate>,

        /// Count merge commits in totals
        #[arg(long)]
        include_merges: bool,

        /// Maximum commits to read
        #[arg(long)]
        limit: Option<usize>,

        /// Calendar bucket for period statistics
        #[arg(long, default_value = "week")]
        granularity: Granularity,
    },
    /// File and file-type change statistics
    Files {
        /// Repository path (default: [git].repo_path from config)
        #[arg(long)]
        repo: Option<PathBuf>,

        /// Branch to analyze (default: current HEAD)
        #[arg(long)]
        branch: Option<String>,

        /// Only commits on or after this date (YYYY-MM-DD)
        #[arg(long)]
        since: Option<NaiveDate>,

        /// Only commits on or before this date (YYYY-MM-DD)
        #[arg(long)]
        until: Option<NaiveDate>,

        /// Maximum rows to show per table (default: 20)
        #[arg(long, default_value = "20")]
        limit: usize,
    },
    /// Line-ownership shares from blame
    #[command(long_about = "Line-ownership shares from blame.\n\n\
        Attributes every current line to its last author. Without --file the\n\
        first [git].blame_file_limit tracked files are blamed; files that fail\n\
        to blame (binaries, renames in flight) are skipped.\n\n\
        Examples:\n  tempo git blame\n  tempo git blame --file src/main.rs")]
    Blame {
        /// Repository path (default: [git].repo_path from config)
        #[arg(long)]
        repo: Option<PathBuf>,

        /// Single file to blame (default: first tracked files up to the limit)
        #[arg(long)]
        file: Option<String>,
    },
    /// Deduplicated activity across the main branch and unmerged branches
    #[command(
        long_about = "Deduplicated activity across the main branch and unmerged branches.\n\n\
        Lists every branch not yet merged into [git].main_branch, queries each\n\
        one, deduplicates commits by hash, and reports the union: shared history\n\
        counts once no matter how many branches carry it.\n\n\
        Examples:\n  tempo git branches\n  tempo git branches --since 2024-01-01"
    )]
    Branches {
        /// Repository path (default: [git].repo_path from config)
        #[arg(long)]
        repo: Option<PathBuf>,

        /// Only commits on or after this date (YYYY-MM-DD)
        #[arg(long)]
        since: Option<NaiveDate>,

        /// Only commits on or before this date (YYYY-MM-DD)
        #[arg(long)]
        until: Option<NaiveDate>,

        /// Count merge commits in totals
        #[arg(long)]
        include_merges: bool,
    },
}

#[derive(Clone, PartialEq, Eq, ValueEnum)]
enum ColorChoice {
    /// Auto-detect based on terminal
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

fn print_welcome(use_color: bool) {
    let version = env!("CARGO_PKG_VERSION");

    if use_color {
        // Bold/bright header
        println!("\x1b[1m\x1b[33m◷\x1b[0m \x1b[1mtempo\x1b[0m v{version} — flow metrics straight from git and your tracker\n");

        println!("Quick start:");
        println!("  \x1b[36mtempo init\x1b[0m                Create a .tempo.toml config file");
        println!("  \x1b[36mtempo git stats\x1b[0m           Commit, author, and time statistics");
        println!("  \x1b[36mtempo tracker --project ENG\x1b[0m  Cycle time, WIP, and throughput\n");

        println!("All commands:");
        println!("  \x1b[32mgit stats\x1b[0m     Summary, author, and time statistics");
        println!("  \x1b[32mgit files\x1b[0m     Most-changed files and file types");
        println!("  \x1b[32mgit blame\x1b[0m     Line-ownership shares");
        println!("  \x1b[32mgit branches\x1b[0m  Deduplicated cross-branch activity");
        println!("  \x1b[32mtracker\x1b[0m       Issue-tracker flow metrics");
        println!("  \x1b[32msnapshot\x1b[0m      Git + tracker in one document");
        println!("  \x1b[32minit\x1b[0m          Create default configuration\n");
    } else {
        println!("tempo v{version} — flow metrics straight from git and your tracker\n");

        println!("Quick start:");
        println!("  tempo init                Create a .tempo.toml config file");
        println!("  tempo git stats           Commit, author, and time statistics");
        println!("  tempo tracker --project ENG  Cycle time, WIP, and throughput\n");

        println!("All commands:");
        println!("  git stats     Summary, author, and time statistics");
        println!("  git files     Most-changed files and file types");
        println!("  git blame     Line-ownership shares");
        println!("  git branches  Deduplicated cross-branch activity");
        println!("  tracker       Issue-tracker flow metrics");
        println!("  snapshot      Git + tracker in one document");
        println!("  init          Create default configuration\n");
    }

    println!("Run 'tempo <command> --help' for details.");
}

fn start_of_day(date: NaiveDate) -> chrono::DateTime<Utc> {
    date.and_time(NaiveTime::MIN).and_utc()
}

fn period_from(since: Option<NaiveDate>, until: Option<NaiveDate>) -> Period {
    Period {
        from: since.map(start_of_day),
        to: until.map(start_of_day),
    }
}

fn apply_author(filter: &mut LogFilter, author: Option<String>) {
    if let Some(author) = author {
        if author.contains('@') {
            filter.author_email = Some(author);
        } else {
            filter.author_name = Some(author);
        }
    }
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct FilesReport {
    files: Vec<FileStat>,
    file_types: Vec<FileTypeStat>,
}

/// Shared log-read-and-aggregate path used by `git stats` and `snapshot`.
fn collect_git_report(
    client: &GitClient,
    branch: Option<String>,
    filter: &mut LogFilter,
    granularity: Granularity,
    verbose: bool,
) -> Result<GitSnapshot> {
    let branch_name = match branch {
        Some(b) => b,
        None => client.current_branch()?,
    };
    filter.branches = vec![branch_name.clone()];

    eprintln!(
        "Reading git log for {} at {} ...",
        branch_name,
        client.path().display()
    );
    if verbose {
        eprintln!("git args: {}", filter.to_args().join(" "));
    }
    let output = client.run(&filter.to_args())?;
    let commits = parse_log(&output)?;
    eprintln!("Parsed {} commits.", commits.len());

    Ok(GitSnapshot {
        summary: summarize(&commits, &branch_name),
        authors: author_stats(&commits),
        time: time_stats(&commits),
        periods: period_stats(&commits, granularity),
    })
}

fn print_summary(summary: &RepoSummary) {
    println!("Repository Summary ({}):", summary.branch);
    println!("{:-<72}", "");
    println!("  Commits:            {}", summary.total_commits);
    println!("  Merge commits:      {}", summary.merge_commits);
    println!("  Authors:            {}", summary.authors);
    println!("  Lines added:        {}", summary.total_added);
    println!("  Lines deleted:      {}", summary.total_deleted);
    println!("  Active days:        {}", summary.active_days);
    println!(
        "  Commits/active day: {}",
        summary.avg_commits_per_active_day
    );
    if let (Some(first), Some(last)) = (summary.first_commit, summary.last_commit) {
        println!(
            "  Range:              {} .. {}",
            first.format("%Y-%m-%d"),
            last.format("%Y-%m-%d")
        );
    }
    println!();
}

fn print_authors(authors: &[AuthorStat]) {
    println!("Authors:");
    println!("{:-<72}", "");
    if authors.is_empty() {
        println!("  No commits in range.");
    }
    for (i, author) in authors.iter().enumerate() {
        println!(
            "{:>3}. {:<24} commits={:<5} +{:<7} -{:<7} files={}",
            i + 1,
            author.username,
            author.commits,
            author.added,
            author.deleted,
            author.files_changed,
        );
    }
    println!();
}

fn print_time(time: &TimeStats) {
    println!("Activity:");
    println!("{:-<72}", "");
    for bucket in &time.by_weekday {
        println!("  {:<10} {:>5}", bucket.weekday, bucket.commits);
    }
    if let Some((hour, commits)) = time
        .by_hour
        .iter()
        .enumerate()
        .max_by_key(|(_, commits)| **commits)
    {
        if *commits > 0 {
            println!("\n  Peak hour: {hour:02}:00 UTC ({commits} commits)");
        }
    }
    println!();
}

fn print_periods(periods: &[PeriodStat], granularity: Granularity) {
    println!("Per {granularity}:");
    println!("{:-<72}", "");
    for p in periods {
        println!(
            "  {:<12} commits={:<5} +{:<7} -{:<7} authors={}",
            p.period, p.commits, p.added, p.deleted, p.authors,
        );
    }
    println!();
}

fn print_reconciled(stats: &ReconciledStats) {
    println!("Branch Reconciliation:");
    println!("{:-<72}", "");
    println!("  Branches scanned: {}", stats.branches_scanned);
    if !stats.branches_skipped.is_empty() {
        println!("  Branches skipped: {}", stats.branches_skipped.join(", "));
    }
    println!("  Unique commits:   {}", stats.unique_commits);
    println!("  Unique files:     {}", stats.unique_files);
    println!("\n  Per branch (before deduplication):");
    for activity in &stats.per_branch {
        println!("    {:<40} {:>5}", activity.branch, activity.commits);
    }
    println!();
    print_authors(&stats.authors);
}

fn print_duration(label: &str, breakdown: Option<&DurationBreakdown>) {
    match breakdown {
        Some(b) => {
            println!(
                "  {:<14} avg={:<7} median={:<7} p90={:<7} min={:<7} max={:<7} n={}",
                label, b.days.avg, b.days.median, b.days.p90, b.days.min, b.days.max, b.days.count,
            );
            if !b.avg_by_type.is_empty() {
                let parts: Vec<String> = b
                    .avg_by_type
                    .iter()
                    .map(|(t, days)| format!("{t}={days}"))
                    .collect();
                println!("  {:<14} by type: {}", "", parts.join("  "));
            }
        }
        None => println!("  {label:<14} no finished issues in range"),
    }
}

fn print_tracker(metrics: &TrackerMetrics) {
    println!("Tracker Flow Metrics ({}):", metrics.period);
    println!("{:-<72}", "");
    if !metrics.available {
        println!("  Tracker not configured — fill in [tracker] in .tempo.toml.");
        println!();
        return;
    }
    println!("  Issues analyzed: {}", metrics.issues_analyzed);
    println!("\n  Durations (days):");
    print_duration("cycle time", metrics.cycle_time.as_ref());
    print_duration("lead time", metrics.lead_time.as_ref());

    if let Some(blocked) = &metrics.blocked {
        println!("\n  Blocked:");
        println!(
            "    {} issues ({}%), {} days total",
            blocked.issues_blocked, blocked.pct_issues_blocked, blocked.total_days,
        );
    }

    if let Some(wip) = &metrics.wip {
        println!("\n  Work in progress: {}", wip.total);
        for (assignee, count) in &wip.by_assignee {
            println!("    {assignee:<24} {count}");
        }
    }

    if let Some(throughput) = &metrics.throughput {
        println!(
            "\n  Throughput: {} done, {}/week",
            throughput.total, throughput.weekly_avg,
        );
        for (week, count) in &throughput.by_week {
            println!("    {week:<12} {count}");
        }
    }

    if let Some(bugs) = &metrics.bug_ratio {
        println!(
            "\n  Bugs: {} of {} issues ({}%)",
            bugs.bugs, bugs.total, bugs.ratio,
        );
        if let Some(resolution) = &bugs.resolution_days {
            println!(
                "    resolution: avg={} median={} n={}",
                resolution.avg, resolution.median, resolution.count,
            );
        }
    }
    println!();
}

/// Fetch issues and analyze them; shared by `tracker` and `snapshot`.
async fn collect_tracker_metrics(
    config: &TempoConfig,
    project: Option<String>,
    period: Period,
    verbose: bool,
) -> Result<TrackerMetrics> {
    let project = project.or_else(|| config.tracker.project.clone());
    let client = TrackerClient::from_config(&config.tracker)?;
    let jql = build_jql(project.as_deref(), &period);
    if verbose {
        eprintln!("JQL: {jql}");
    }

    let is_tty = std::io::stderr().is_terminal();
    let spinner = if is_tty {
        let pb = indicatif::ProgressBar::new_spinner();
        pb.set_style(
            indicatif::ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})").unwrap(),
        );
        pb.set_message("Fetching issues...");
        pb.enable_steady_tick(std::time::Duration::from_millis(120));
        Some(pb)
    } else {
        None
    };

    let issues = client.fetch_issues(&jql).await.inspect_err(|_e| {
        if let Some(pb) = &spinner {
            pb.finish_with_message("Failed");
        }
    })?;
    match spinner {
        Some(pb) => pb.finish_with_message(format!("Fetched {} issues", issues.len())),
        None => eprintln!("Fetched {} issues.", issues.len()),
    }

    let mapping = StatusMapping::from_config(&config.status);
    let options = AnalyzerOptions {
        now: Utc::now(),
        period,
    };
    Ok(analyze(&issues, &mapping, &options))
}

const DEFAULT_CONFIG: &str = r#"# Tempo Configuration
# See: https://github.com/Meru143/tempo

[git]
# repo_path = "."
# main_branch = "main"
# include_merges = false
# blame_file_limit = 100

[tracker]
# base_url = "https://your-site.atlassian.net"
# email = "you@example.com"
# api_token = "..."
# project = "ENG"
# page_size = 50
# page_delay_ms = 200
# max_pages = 20

# Map your workflow's status names onto todo / in_progress / blocked / done.
# An empty (or omitted) list keeps the built-in names for that class.
[status]
# todo = ["To Do", "Backlog"]
# in_progress = ["In Progress", "In Review"]
# blocked = ["Blocked", "On Hold"]
# done = ["Done", "Released"]
"#;

#[tokio::main]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .build(),
        )
    }))
    .expect("miette handler");
    human_panic::setup_panic!();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => TempoConfig::from_file(path)?,
        None => {
            let default_path = std::path::Path::new(".tempo.toml");
            if default_path.exists() {
                TempoConfig::from_file(default_path)?
            } else {
                TempoConfig::default()
            }
        }
    };

    let use_color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    };

    if cli.verbose {
        eprintln!("format: {}", cli.format);
        let overridden = [
            ("todo", &config.status.todo),
            ("in_progress", &config.status.in_progress),
            ("blocked", &config.status.blocked),
            ("done", &config.status.done),
        ]
        .iter()
        .filter(|(_, list)| !list.is_empty())
        .map(|(name, _)| *name)
        .collect::<Vec<_>>();
        if !overridden.is_empty() {
            eprintln!("Status classes overridden: {}", overridden.join(", "));
        }
    }

    match cli.command {
        None => {
            print_welcome(use_color);
            return Ok(());
        }
        Some(Command::Git { command }) => match command {
            GitCommand::Stats {
                repo,
                branch,
                author,
                since,
                until,
                include_merges,
                limit,
                granularity,
            } => {
                let repo_root = repo.unwrap_or_else(|| PathBuf::from(&config.git.repo_path));
                let client = GitClient::open(repo_root)?;
                let mut filter = LogFilter {
                    since,
                    until,
                    max_count: limit,
                    include_merges: include_merges || config.git.include_merges,
                    ..LogFilter::default()
                };
                apply_author(&mut filter, author);

                let report =
                    collect_git_report(&client, branch, &mut filter, granularity, cli.verbose)?;

                match cli.format {
                    OutputFormat::Json => {
                        println!(
                            "{}",
                            serde_json::to_string_pretty(&report).into_diagnostic()?
                        );
                    }
                    OutputFormat::Text => {
                        print_summary(&report.summary);
                        print_authors(&report.authors);
                        print_time(&report.time);
                        print_periods(&report.periods, granularity);
                    }
                }
            }
            GitCommand::Files {
                repo,
                branch,
                since,
                until,
                limit,
            } => {
                let repo_root = repo.unwrap_or_else(|| PathBuf::from(&config.git.repo_path));
                let client = GitClient::open(repo_root)?;
                let branch_name = match branch {
                    Some(b) => b,
                    None => client.current_branch()?,
                };
                let filter = LogFilter {
                    branches: vec![branch_name.clone()],
                    since,
                    until,
                    include_merges: config.git.include_merges,
                    ..LogFilter::default()
                };

                eprintln!(
                    "Reading git log for {} at {} ...",
                    branch_name,
                    client.path().display()
                );
                let output = client.run(&filter.to_args())?;
                let commits = parse_log(&output)?;
                eprintln!("Parsed {} commits.", commits.len());

                let report = FilesReport {
                    files: file_stats(&commits),
                    file_types: file_type_stats(&commits),
                };

                match cli.format {
                    OutputFormat::Json => {
                        println!(
                            "{}",
                            serde_json::to_string_pretty(&report).into_diagnostic()?
                        );
                    }
                    OutputFormat::Text => {
                        println!("Files (top {limit}):");
                        println!("{:-<72}", "");
                        for (i, f) in report.files.iter().take(limit).enumerate() {
                            println!(
                                "{:>3}. {:<44} commits={:<4} +{:<6} -{}",
                                i + 1,
                                f.path,
                                f.commits,
                                f.added,
                                f.deleted,
                            );
                        }
                        println!("\nFile types:");
                        println!("{:-<72}", "");
                        for t in report.file_types.iter().take(limit) {
                            println!(
                                "  {:<12} files={:<5} commits={:<5} +{:<6} -{}",
                                t.extension, t.files, t.commits, t.added, t.deleted,
                            );
                        }
                        println!();
                    }
                }
            }
            GitCommand::Blame { repo, file } => {
                let repo_root = repo.unwrap_or_else(|| PathBuf::from(&config.git.repo_path));
                let client = GitClient::open(repo_root)?;

                match &file {
                    Some(path) => eprintln!("Blaming {path} ..."),
                    None => eprintln!(
                        "Blaming up to {} tracked files ...",
                        config.git.blame_file_limit
                    ),
                }
                let owners = blame_stats(&client, file.as_deref(), config.git.blame_file_limit)?;

                match cli.format {
                    OutputFormat::Json => {
                        println!(
                            "{}",
                            serde_json::to_string_pretty(&owners).into_diagnostic()?
                        );
                    }
                    OutputFormat::Text => {
                        println!("Ownership:");
                        println!("{:-<72}", "");
                        if owners.is_empty() {
                            println!("  No attributable lines found.");
                        }
                        for stat in &owners {
                            println!(
                                "  {:>6.2}%  {:>7} lines  {}",
                                stat.share, stat.lines, stat.author
                            );
                        }
                        println!();
                    }
                }
            }
            GitCommand::Branches {
                repo,
                since,
                until,
                include_merges,
            } => {
                let repo_root = repo.unwrap_or_else(|| PathBuf::from(&config.git.repo_path));
                let client = GitClient::open(repo_root)?;

                let branches = unmerged_branches(&client, &config.git.main_branch)?;
                eprintln!(
                    "Reconciling {} branches against {} ...",
                    branches.len(),
                    config.git.main_branch
                );

                let filter = LogFilter {
                    since,
                    until,
                    include_merges: include_merges || config.git.include_merges,
                    ..LogFilter::default()
                };
                let stats = reconcile(&client, &branches, &filter)?;
                eprintln!(
                    "{} unique commits across {} branches.",
                    stats.unique_commits, stats.branches_scanned
                );

                match cli.format {
                    OutputFormat::Json => {
                        println!(
                            "{}",
                            serde_json::to_string_pretty(&stats).into_diagnostic()?
                        );
                    }
                    OutputFormat::Text => print_reconciled(&stats),
                }
            }
        },
        Some(Command::Tracker {
            project,
            since,
            until,
        }) => {
            // Hint: suggest `tempo init` before the client reports a bare config error
            if config.tracker.base_url.is_none() {
                miette::bail!(miette::miette!(
                    help = "Add base_url, email, and api_token under [tracker] in .tempo.toml.\n       Run 'tempo init' to create a template.",
                    "No issue tracker configured"
                ));
            }

            let period = period_from(since, until);
            let metrics = collect_tracker_metrics(&config, project, period, cli.verbose).await?;

            match cli.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&metrics).into_diagnostic()?
                    );
                }
                OutputFormat::Text => print_tracker(&metrics),
            }
        }
        Some(Command::Snapshot {
            repo,
            branch,
            project,
            since,
            until,
            granularity,
        }) => {
            let period = period_from(since, until);

            let repo_root = repo.unwrap_or_else(|| PathBuf::from(&config.git.repo_path));
            let client = GitClient::open(repo_root)?;
            let mut filter = LogFilter {
                since,
                until,
                include_merges: config.git.include_merges,
                ..LogFilter::default()
            };
            let git_snapshot =
                collect_git_report(&client, branch, &mut filter, granularity, cli.verbose)?;

            let tracker_metrics = if config.tracker.base_url.is_some() {
                collect_tracker_metrics(&config, project, period, cli.verbose).await?
            } else {
                eprintln!("No tracker configured; marking tracker metrics unavailable.");
                TrackerMetrics::unavailable(&period)
            };

            let snapshot = assemble(Some(git_snapshot), Some(tracker_metrics));

            match cli.format {
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&snapshot).into_diagnostic()?
                    );
                }
                OutputFormat::Text => {
                    println!(
                        "Snapshot generated at {}\n",
                        snapshot.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
                    );
                    if let Some(repo) = &snapshot.repo {
                        print_summary(&repo.summary);
                        print_authors(&repo.authors);
                        print_time(&repo.time);
                        print_periods(&repo.periods, granularity);
                    }
                    if let Some(tracker) = &snapshot.tracker {
                        print_tracker(tracker);
                    }
                }
            }
        }
        Some(Command::Init) => {
            let path = std::path::Path::new(".tempo.toml");
            if path.exists() {
                miette::bail!(".tempo.toml already exists");
            }
            std::fs::write(path, DEFAULT_CONFIG).into_diagnostic()?;
            println!("Created .tempo.toml with default configuration");
        }
        Some(Command::Completions { shell }) => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "tempo", &mut std::io::stdout());
        }
    }

    Ok(())
}
