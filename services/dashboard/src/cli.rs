use crate::infra::{build_assembler, ReportSummary};
use crate::server;
use clap::{Args, Parser, Subcommand};
use employee_events::config::AppConfig;
use employee_events::entities::{EntityCatalog, EntityId, EntityKind};
use employee_events::error::AppError;
use employee_events::report::{ReportAssembler, ReportSelector};
use employee_events::store::{schema, QueryExecutor};
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "employee-events-dashboard",
    about = "Serve and query the employee events dashboard",
    version
)]
struct Cli {
    /// Override the configured SQLite database path
    #[arg(long, global = true)]
    database: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Print the (name, id) pairs offered in the entity dropdown
    Names(NamesArgs),
    /// List database tables, their columns and row counts
    Inspect,
    /// Assemble a report and print its JSON summary
    Report(ReportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
struct NamesArgs {
    /// `employee` or `team`
    kind: EntityKind,
    /// Write CSV with a header row instead of aligned text
    #[arg(long)]
    csv: bool,
}

#[derive(Args, Debug)]
struct ReportArgs {
    /// `employee` or `team`
    kind: EntityKind,
    id: i64,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args, cli.database).await,
        Command::Names(args) => print_names(load_config(cli.database)?, args),
        Command::Inspect => print_schema(load_config(cli.database)?),
        Command::Report(args) => print_report(load_config(cli.database)?, args),
    }
}

pub(crate) fn load_config(database: Option<PathBuf>) -> Result<AppConfig, AppError> {
    let mut config = AppConfig::load()?;
    if let Some(path) = database {
        config.storage.database_path = path;
    }
    Ok(config)
}

fn print_names(config: AppConfig, args: NamesArgs) -> Result<(), AppError> {
    let executor = QueryExecutor::new(&config.storage.database_path);
    write_names(&executor, &args, &mut io::stdout().lock())
}

fn write_names(
    executor: &QueryExecutor,
    args: &NamesArgs,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let catalog = EntityCatalog::new(executor.clone())?;
    let options = catalog.get(args.kind).list()?;

    if args.csv {
        let mut writer = csv::Writer::from_writer(out);
        for option in &options {
            writer.serialize(option).map_err(io::Error::from)?;
        }
        writer.flush()?;
        return Ok(());
    }

    writeln!(out, "{} names ({})", args.kind, options.len())?;
    for option in &options {
        writeln!(out, "  {:>5}  {}", option.id.get(), option.label)?;
    }
    Ok(())
}

fn print_schema(config: AppConfig) -> Result<(), AppError> {
    let executor = QueryExecutor::new(&config.storage.database_path);
    write_schema(&executor, &mut io::stdout().lock())
}

fn write_schema(executor: &QueryExecutor, out: &mut impl Write) -> Result<(), AppError> {
    let report = schema::inspect(executor)?;

    writeln!(out, "Database: {}", executor.db_path().display())?;
    for table in &report.tables {
        writeln!(out, "  {} ({} rows)", table.name, table.row_count)?;
        for column in &table.columns {
            writeln!(out, "    {:<24} {}", column.name, column.declared_type)?;
        }
    }

    if report.is_complete() {
        writeln!(out, "All required tables present.")?;
    } else {
        writeln!(out, "Missing required tables: {}", report.missing.join(", "))?;
    }
    Ok(())
}

fn print_report(config: AppConfig, args: ReportArgs) -> Result<(), AppError> {
    let reports = build_assembler(&config.storage)?;
    write_report(&reports, &args, &mut io::stdout().lock())
}

fn write_report(
    reports: &ReportAssembler,
    args: &ReportArgs,
    out: &mut impl Write,
) -> Result<(), AppError> {
    let selector = ReportSelector::new(args.kind, EntityId::new(args.id));
    let summary = ReportSummary::from(reports.collect(selector)?);

    serde_json::to_writer_pretty(&mut *out, &summary).map_err(io::Error::from)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{sample_model, seed_database};
    use clap::CommandFactory;
    use employee_events::config::{AppEnvironment, ServerConfig, StorageConfig, TelemetryConfig};
    use employee_events::report::{ChartStore, ReportError};
    use std::sync::Arc;

    fn render(write: impl FnOnce(&mut Vec<u8>) -> Result<(), AppError>) -> String {
        let mut out = Vec::new();
        write(&mut out).expect("command output");
        String::from_utf8(out).expect("utf8 output")
    }

    #[test]
    fn names_csv_has_header_and_rows() {
        let dir = tempfile::tempdir().expect("temp dir");
        let executor = QueryExecutor::new(seed_database(dir.path()));
        let args = NamesArgs {
            kind: EntityKind::Employee,
            csv: true,
        };

        let output = render(|out| write_names(&executor, &args, out));
        assert_eq!(output, "label,id\nAda Byron,7\nChris Jones,8\n");
    }

    #[test]
    fn names_text_lists_ids_and_labels() {
        let dir = tempfile::tempdir().expect("temp dir");
        let executor = QueryExecutor::new(seed_database(dir.path()));
        let args = NamesArgs {
            kind: EntityKind::Team,
            csv: false,
        };

        let output = render(|out| write_names(&executor, &args, out));
        assert_eq!(output, "Team names (1)\n      1  Platform\n");
    }

    #[test]
    fn names_do_not_need_the_model_artifact() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = AppConfig {
            environment: AppEnvironment::Test,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 3000,
            },
            telemetry: TelemetryConfig {
                log_level: "info".to_string(),
            },
            storage: StorageConfig {
                database_path: seed_database(dir.path()),
                static_dir: dir.path().join("static"),
                model_path: dir.path().join("absent-model.json"),
            },
        };
        let args = NamesArgs {
            kind: EntityKind::Employee,
            csv: true,
        };

        assert!(print_names(config, args).is_ok());
    }

    #[test]
    fn inspect_lists_tables_with_row_counts() {
        let dir = tempfile::tempdir().expect("temp dir");
        let executor = QueryExecutor::new(seed_database(dir.path()));

        let output = render(|out| write_schema(&executor, out));
        assert!(output.starts_with("Database: "));
        assert!(output.contains("  employee_events (2 rows)\n"));
        assert!(output.contains("    employee_id              INTEGER\n"));
        assert!(output.ends_with("All required tables present.\n"));
    }

    #[test]
    fn inspect_names_missing_tables() {
        let dir = tempfile::tempdir().expect("temp dir");
        let db_path = dir.path().join("partial.db");
        rusqlite::Connection::open(&db_path)
            .and_then(|connection| {
                connection.execute_batch("CREATE TABLE team (team_id INTEGER PRIMARY KEY);")
            })
            .expect("seed database");

        let output = render(|out| write_schema(&QueryExecutor::new(db_path), out));
        assert!(output.contains("  team (0 rows)\n"));
        assert!(output.ends_with("Missing required tables: employee, employee_events, notes\n"));
    }

    #[test]
    fn report_prints_summary_json() {
        let dir = tempfile::tempdir().expect("temp dir");
        let catalog = EntityCatalog::new(QueryExecutor::new(seed_database(dir.path())))
            .expect("builtin tables are valid");
        let reports = ReportAssembler::new(
            catalog,
            Arc::new(sample_model()),
            ChartStore::new(dir.path().join("static")),
        );
        let args = ReportArgs {
            kind: EntityKind::Employee,
            id: 7,
        };

        let output = render(|out| write_report(&reports, &args, out));
        let payload: serde_json::Value = serde_json::from_str(&output).expect("json output");
        assert_eq!(payload["display_name"], "Ada Byron");
        assert_eq!(payload["risk"]["status"], "scored");
        assert_eq!(payload["notes"][0]["note"], "Mentoring new hires");
        assert!(!dir.path().join("static").exists());

        let missing = ReportArgs {
            kind: EntityKind::Team,
            id: 42,
        };
        let err = write_report(&reports, &missing, &mut Vec::<u8>::new())
            .expect_err("unknown team");
        assert!(matches!(
            err,
            AppError::Report(ReportError::NotFound { .. })
        ));
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn names_accepts_kind_in_any_case() {
        let cli = Cli::try_parse_from(["employee-events-dashboard", "names", "Team", "--csv"])
            .expect("arguments parse");
        match cli.command {
            Some(Command::Names(args)) => {
                assert_eq!(args.kind, EntityKind::Team);
                assert!(args.csv);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn database_override_is_global() {
        let cli = Cli::try_parse_from([
            "employee-events-dashboard",
            "report",
            "employee",
            "3",
            "--database",
            "fixtures/events.db",
        ])
        .expect("arguments parse");
        assert_eq!(cli.database, Some(PathBuf::from("fixtures/events.db")));
        assert!(matches!(
            cli.command,
            Some(Command::Report(ReportArgs { id: 3, .. }))
        ));
    }

    #[test]
    fn serve_is_the_default_command() {
        let cli = Cli::try_parse_from(["employee-events-dashboard"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }
}
