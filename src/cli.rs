use clap::{crate_description, crate_version, Arg, ArgAction, ArgMatches, Command};
use pretty_env_logger::env_logger::Builder;
use std::env;
use std::io::Write;
use std::process::exit;

use vdxnl_dns::common::{Provider, Record, RecordFilter, Result};
use vdxnl_dns::{Config, ENV_PREFIX};

fn set_logger_level(b: &mut Builder) {
    let mut b = b;
    if env::var("RUST_LOG").is_err() {
        b = b.filter_level(log::LevelFilter::Info)
    }
    b.init();
}

fn setup_logger() {
    match std::env::var("RUST_LOG_STYLE") {
        Ok(s) if s == "SYSTEMD" => {
            let builder = &mut pretty_env_logger::env_logger::builder();
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "<{}>{}: {}",
                    match record.level() {
                        log::Level::Error => 3,
                        log::Level::Warn => 4,
                        log::Level::Info => 6,
                        log::Level::Debug => 7,
                        log::Level::Trace => 7,
                    },
                    record.target(),
                    record.args()
                )
            });
            set_logger_level(builder);
        }
        _ => {
            let builder = &mut pretty_env_logger::formatted_builder();
            set_logger_level(builder);
        }
    };
}

fn record_args() -> [Arg; 3] {
    [
        Arg::new("type").long("type").help("Record type, e.g. A or TXT"),
        Arg::new("name").long("name").help("Record name"),
        Arg::new("content").long("content").help("Record content"),
    ]
}

fn filter_from(args: &ArgMatches) -> RecordFilter {
    RecordFilter {
        id: None,
        kind: args.get_one::<String>("type").cloned(),
        name: args.get_one::<String>("name").cloned(),
        content: args.get_one::<String>("content").cloned(),
    }
}

fn required<'a>(args: &'a ArgMatches, name: &str) -> &'a str {
    match args.get_one::<String>(name) {
        Some(value) => value.as_str(),
        None => {
            eprintln!("--{name} is required");
            exit(2);
        }
    }
}

fn print_records(records: &[Record], output: &str) {
    if output == "json" {
        match serde_json::to_string_pretty(records) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("{err}");
                exit(2);
            }
        }
        return;
    }
    println!("{:<10} {:<6} {:<40} {}", "ID", "TYPE", "NAME", "CONTENT");
    for r in records {
        println!("{:<10} {:<6} {:<40} {}", r.id, r.kind, r.name, r.content);
    }
}

fn run(provider: &mut dyn Provider, command: &str, args: &ArgMatches) -> Result<bool> {
    if !provider.authenticate()? {
        return Ok(false);
    }

    match command {
        "create" => provider.create_record(
            required(args, "type"),
            required(args, "name"),
            required(args, "content"),
        ),
        "list" => {
            let records = provider.list_records(&filter_from(args))?;
            let output = args
                .get_one::<String>("output")
                .map(String::as_str)
                .unwrap_or("table");
            print_records(&records, output);
            Ok(true)
        }
        "update" => provider.update_record(
            required(args, "identifier"),
            args.get_one::<String>("type").map(String::as_str),
            args.get_one::<String>("name").map(String::as_str),
            args.get_one::<String>("content").map(String::as_str),
        ),
        "delete" => provider.delete_record(
            args.get_one::<String>("identifier").map(String::as_str),
            &filter_from(args),
        ),
        _ => unreachable!("subcommand is required"),
    }
}

pub(crate) fn main() {
    let cli = Command::new("vdxnl-dns")
        .about(format!(
            "{}\nCredentials may also be set with {ENV_PREFIX}_DOMAIN, {ENV_PREFIX}_AUTH_USERNAME and {ENV_PREFIX}_AUTH_PASSWORD.",
            crate_description!(),
        ))
        .subcommand_required(true)
        .arg(
            Arg::new("domain")
                .long("domain")
                .global(true)
                .help("Domain to manage"),
        )
        .arg(
            Arg::new("auth_username")
                .long("auth-username")
                .global(true)
                .help("Account console username"),
        )
        .arg(
            Arg::new("auth_password")
                .long("auth-password")
                .global(true)
                .help("Account console password, or @file to read it from"),
        )
        .subcommand(
            Command::new("create")
                .about("Create a record unless an identical one exists")
                .args(record_args()),
        )
        .subcommand(
            Command::new("list")
                .about("List records matching the filters")
                .args(record_args())
                .arg(
                    Arg::new("output")
                        .long("output")
                        .value_parser(["table", "json"])
                        .default_value("table")
                        .help("Output format"),
                ),
        )
        .subcommand(
            Command::new("update")
                .about("Replace a record, missing fields are kept")
                .arg(Arg::new("identifier").required(true).help("Record ID"))
                .args(record_args()),
        )
        .subcommand(
            Command::new("delete")
                .about("Delete a record by ID, or every record matching the filters")
                .arg(Arg::new("identifier").help("Record ID"))
                .args(record_args()),
        )
        .arg(
            Arg::new("check")
                .action(ArgAction::SetTrue)
                .short('t')
                .long("test")
                .global(true)
                .help("Check the configuration and exit"),
        )
        .version(crate_version!());

    let args = cli.get_matches();

    setup_logger();

    let Some((command, sub_args)) = args.subcommand() else {
        unreachable!("subcommand is required")
    };

    let override_of = |name: &str| sub_args.get_one::<String>(name).cloned();
    let config = match Config::populate_from_env(&[
        ("domain", override_of("domain")),
        ("auth_username", override_of("auth_username")),
        ("auth_password", override_of("auth_password")),
    ]) {
        Ok(c) => c,
        Err(err) => {
            eprintln!("{err}");
            exit(2);
        }
    };

    let mut provider = match config.into_provider() {
        Ok(p) => p,
        Err(err) => {
            eprintln!("{err}");
            exit(2);
        }
    };

    if sub_args.get_flag("check") {
        tracing::info!(domain = provider.get_domain(), "Configuration is valid.");
        exit(0);
    }

    match run(provider.as_mut(), command, sub_args) {
        Ok(true) => exit(0),
        Ok(false) => exit(1),
        Err(err) => {
            tracing::error!("{err}");
            exit(2);
        }
    }
}
