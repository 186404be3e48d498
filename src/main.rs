mod shell;
mod view;

use std::io::Write;
use std::path::PathBuf;

use tokio::io::{AsyncBufReadExt, BufReader};

use taskplanner::application::Planner;
use taskplanner::config::PlannerConfig;
use taskplanner::runtime::Runtime;
use taskplanner::storage::{FileStore, KeyValueStore, MemoryStore};
use taskplanner::sync::http::HttpBackend;

use shell::Action;

type Shell = Runtime<HttpBackend, Box<dyn KeyValueStore>>;

#[derive(Debug, Default)]
struct Args {
    config: Option<PathBuf>,
    api: Option<String>,
    debug: bool,
    ephemeral: bool,
}

fn parse_args() -> Result<Args, String> {
    let mut args = Args::default();
    let mut iter = std::env::args().skip(1);
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => args.config = Some(iter.next().ok_or("--config needs a path")?.into()),
            "--api" => args.api = Some(iter.next().ok_or("--api needs a URL")?),
            "--debug" => args.debug = true,
            "--ephemeral" => args.ephemeral = true,
            other => return Err(format!("unknown argument {}", other)),
        }
    }
    Ok(args)
}

/// Log to the systemd user journal (`journalctl --user -t taskplanner -f`).
/// Our crate logs at info/debug (per config), everything else at warn.
fn init_logging(debug: bool) {
    struct FilteredJournal {
        inner: systemd_journal_logger::JournalLog,
    }

    impl log::Log for FilteredJournal {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            if metadata.target().starts_with("taskplanner") {
                let max = if taskplanner::debug_logging() {
                    log::LevelFilter::Debug
                } else {
                    log::LevelFilter::Info
                };
                metadata.level() <= max
            } else {
                metadata.level() <= log::LevelFilter::Warn
            }
        }
        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                self.inner.log(record);
            }
        }
        fn flush(&self) {
            self.inner.flush();
        }
    }

    taskplanner::set_debug_logging(debug);

    let journal = match systemd_journal_logger::JournalLog::new() {
        Ok(journal) => journal.with_syslog_identifier("taskplanner".to_string()),
        Err(e) => {
            eprintln!("journal unavailable, logging disabled: {}", e);
            return;
        }
    };
    if let Err(e) = log::set_boxed_logger(Box::new(FilteredJournal { inner: journal })) {
        eprintln!("failed to install logger: {}", e);
        return;
    }
    // Global max must be Debug so debug logs can pass through when toggled
    log::set_max_level(log::LevelFilter::Debug);
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = parse_args()?;

    let config_path = args.config.clone().unwrap_or_else(PlannerConfig::default_path);
    let mut config = PlannerConfig::load(&config_path);
    if let Some(api) = args.api {
        config.api_base_url = api;
    }
    config.debug_logging |= args.debug;

    init_logging(config.debug_logging);
    log::info!("Starting against {}", config.api_base_url);

    let backend = HttpBackend::new(&config.api_base_url)?;
    let store: Box<dyn KeyValueStore> = if args.ephemeral {
        Box::new(MemoryStore::new())
    } else {
        Box::new(FileStore::open(config.store_path()))
    };

    let (planner, init) = Planner::new(backend, store, config.toggle_rollback);
    let mut runtime = Runtime::new(planner, init);

    println!("Task Planner, type 'help' for commands. Loading tasks...");
    run_shell(&mut runtime).await?;
    Ok(())
}

async fn run_shell(runtime: &mut Shell) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt()?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let action = shell::parse(&line, &runtime.planner().visible_todos());
                match action {
                    Action::Dispatch(message) => runtime.dispatch(message),
                    Action::List => print_list(runtime),
                    Action::Categories => {
                        let planner = runtime.planner();
                        print!("{}", view::categories(planner.categories(), planner.filter()));
                    }
                    Action::Draft => {
                        let planner = runtime.planner();
                        print!("{}", view::draft(planner.draft(), planner.editing_id()));
                    }
                    Action::Help => println!("{}", shell::HELP),
                    Action::Quit => break,
                    Action::Nothing => {}
                    Action::Invalid(e) => println!("{}", e),
                }
                print_notices(runtime);
                prompt()?;
            }
            _ = runtime.next(), if runtime.in_flight() > 0 => {
                print_notices(runtime);
                if runtime.in_flight() == 0 {
                    println!();
                    print_list(runtime);
                    prompt()?;
                }
            }
        }
    }

    if runtime.in_flight() > 0 {
        println!("Waiting for {} pending request(s)...", runtime.in_flight());
        runtime.settle().await;
        print_notices(runtime);
    }
    Ok(())
}

fn print_list(runtime: &Shell) {
    let planner = runtime.planner();
    print!(
        "{}",
        view::task_list(&planner.visible_todos(), planner.stats(), planner.filter())
    );
}

fn print_notices(runtime: &mut Shell) {
    for notice in runtime.planner_mut().take_notices() {
        println!("! {}", notice);
    }
}

fn prompt() -> std::io::Result<()> {
    print!("> ");
    std::io::stdout().flush()
}
