//! returns-runner: headless driver for the returns dashboard core.
//!
//! Usage:
//!   returns-runner --csv returns.csv --export decided.csv
//!   returns-runner --sample 40 --seed 12345 --db sessions.db --save
//!   returns-runner --sample 40 --ipc-mode

mod csv_io;

use anyhow::Result;
use returns_core::{
    command::DashboardCommand,
    config::DashboardConfig,
    dashboard::{Dashboard, DashboardOverview},
    decision::DecisionSlot,
    event::DashboardEvent,
    filter::FilterCriteria,
    record::ReturnRecord,
    recovery::{DecisionSummary, RecoveryMode, RecoverySummary},
    sample::SampleGenerator,
    store::{Reflection, SessionStore},
};
use std::env;
use std::io::{self, BufRead, Write};

#[derive(serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum IpcCommand {
    GetState,
    Apply { command: DashboardCommand },
    Report,
    Export,
    SaveSession { label: String },
    LoadSession { session_id: String },
    ListSessions,
    SaveReflection { reflection: Reflection },
    Quit,
}

#[derive(serde::Serialize)]
struct VisibleRow<'a> {
    #[serde(flatten)]
    record:   &'a ReturnRecord,
    decision: &'a DecisionSlot,
}

#[derive(serde::Serialize)]
struct UiState<'a> {
    total_returns:    usize,
    decided:          usize,
    overview:         DashboardOverview,
    recovery:         RecoverySummary,
    decision_summary: DecisionSummary,
    criteria:         &'a FilterCriteria,
    visible:          Vec<VisibleRow<'a>>,
    warnings:         usize,
    events:           Vec<DashboardEvent>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let seed = parse_arg(&args, "--seed", 42u64);
    let sample = parse_arg(&args, "--sample", 25usize);
    let ipc_mode = args.iter().any(|a| a == "--ipc-mode");
    let save = args.iter().any(|a| a == "--save");
    let csv_path = string_arg(&args, "--csv");
    let export_path = string_arg(&args, "--export");
    let db = string_arg(&args, "--db").unwrap_or(":memory:");
    let data_dir = string_arg(&args, "--data-dir").unwrap_or("./data");

    let config = match DashboardConfig::load(data_dir) {
        Ok(config) => config,
        Err(e) => {
            log::warn!("{e}; using built-in recovery table");
            DashboardConfig::default()
        }
    };

    let store = SessionStore::open(db)?;
    store.migrate()?;

    let mut dashboard = Dashboard::new(config)?;
    let loaded = match csv_path {
        Some(path) => dashboard.load_rows(&csv_io::read_rows_file(path)?)?,
        None => dashboard.load_records(SampleGenerator::new(seed).generate(sample), Vec::new())?,
    };

    if ipc_mode {
        return run_ipc_loop(&mut dashboard, &store, loaded);
    }

    println!("Returns dashboard runner");
    println!("  source:    {}", csv_path.unwrap_or("sample data"));
    println!("  seed:      {seed}");
    println!("  db:        {}", store.path().unwrap_or(":memory:"));
    println!("  data_dir:  {data_dir}");
    println!();
    print_summary(&dashboard);

    if let Some(path) = export_path {
        let file = std::fs::File::create(path)?;
        csv_io::write_rows(file, &dashboard.export())?;
        println!("  exported:  {path}");
    }
    if save {
        let session_id = store.save_session(csv_path.unwrap_or("sample"), dashboard.dataset())?;
        println!("  session:   {session_id}");
    }
    Ok(())
}

fn run_ipc_loop(
    dashboard: &mut Dashboard,
    store: &SessionStore,
    loaded: DashboardEvent,
) -> Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut handle = stdin.lock();
    let mut buffer = String::new();

    writeln!(stdout, "{}", serde_json::to_string(&build_ui_state(dashboard, vec![loaded]))?)?;
    stdout.flush()?;

    loop {
        buffer.clear();
        let bytes_read = handle.read_line(&mut buffer)?;
        if bytes_read == 0 {
            break; // EOF
        }

        let cmd: IpcCommand = match serde_json::from_str(&buffer) {
            Ok(c) => c,
            Err(e) => {
                write_error(&mut stdout, &e.to_string())?;
                continue;
            }
        };

        let reply = match cmd {
            IpcCommand::Quit => break,
            IpcCommand::GetState => serde_json::to_value(build_ui_state(dashboard, Vec::new()))?,
            IpcCommand::Apply { command } => match dashboard.apply(command) {
                Ok(events) => serde_json::to_value(build_ui_state(dashboard, events))?,
                Err(e) => serde_json::json!({ "error": e.to_string() }),
            },
            IpcCommand::Report => {
                let reflection = store.reflection()?.map(|(r, _)| r);
                serde_json::to_value(dashboard.report(reflection))?
            }
            IpcCommand::Export => serde_json::to_value(dashboard.export())?,
            IpcCommand::SaveSession { label } => {
                let session_id = store.save_session(&label, dashboard.dataset())?;
                serde_json::json!({ "session_id": session_id })
            }
            IpcCommand::LoadSession { session_id } => match store.load_session(&session_id) {
                Ok(dataset) => {
                    let event = dashboard.replace_dataset(dataset);
                    serde_json::to_value(build_ui_state(dashboard, vec![event]))?
                }
                Err(e) => serde_json::json!({ "error": e.to_string() }),
            },
            IpcCommand::ListSessions => serde_json::to_value(store.list_sessions()?)?,
            IpcCommand::SaveReflection { reflection } => {
                let saved_at = store.save_reflection(&reflection)?;
                serde_json::json!({ "saved_at": saved_at })
            }
        };
        writeln!(stdout, "{reply}")?;
        stdout.flush()?;
    }
    Ok(())
}

fn write_error(stdout: &mut io::Stdout, message: &str) -> Result<()> {
    let err_json = serde_json::json!({ "error": message });
    writeln!(stdout, "{err_json}")?;
    stdout.flush()?;
    Ok(())
}

fn build_ui_state(dashboard: &Dashboard, events: Vec<DashboardEvent>) -> UiState<'_> {
    let dataset = dashboard.dataset();
    let visible = dashboard
        .visible_records()
        .into_iter()
        .filter_map(|record| {
            dataset
                .get_decision(&record.sku)
                .ok()
                .map(|decision| VisibleRow { record, decision })
        })
        .collect();

    UiState {
        total_returns: dataset.len(),
        decided: dataset.decided_count(),
        overview: dashboard.overview(),
        recovery: dashboard.summary(),
        decision_summary: dashboard.decision_summary(),
        criteria: dashboard.criteria(),
        visible,
        warnings: dashboard.warnings().len(),
        events,
    }
}

fn print_summary(dashboard: &Dashboard) {
    let overview = dashboard.overview();
    let summary = dashboard.summary();
    let tiles = dashboard.decision_summary();

    println!("=== RETURNS OVERVIEW ===");
    println!("  total returns:  {}", overview.total_returns);
    for p in &overview.percentages {
        println!("  {:<14}  {}%", p.label, p.percent);
    }
    if !dashboard.warnings().is_empty() {
        println!("  coercion warnings: {}", dashboard.warnings().len());
    }

    println!();
    println!("=== RECOVERY SUMMARY{} ===", mode_tag(summary.mode));
    println!("  items:            {}", summary.total_items);
    println!("  value recovered:  ${:.2}", summary.value_recovered);
    println!("  processing costs: ${:.2}", summary.processing_costs);
    println!("  net recovery:     ${:.2}", summary.net_recovery);

    println!();
    println!("=== DECISIONS{} ===", mode_tag(tiles.mode));
    println!("  processed:        {}", tiles.processed_items);
    println!("  total recovery:   ${:.2}", tiles.total_recovery);
    println!("  net margin:       ${:.2}", tiles.net_margin);
}

fn mode_tag(mode: RecoveryMode) -> &'static str {
    match mode {
        RecoveryMode::Actual => "",
        RecoveryMode::Estimated => " (estimated)",
    }
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}

fn string_arg<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}
