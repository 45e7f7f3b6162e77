//! Command-line interface for lxm
//! This binary converts LXM macros between their formats and prints their structure.
//!
//! Usage:
//!   lxm convert `<path>` --schema `<schema>` [--to `<format>`] [--from `<format>`] [--selection `<paths>`] [--output `<file>`]
//!   lxm inspect `<path>` --schema `<schema>`                - Print the tree with paths and suppression
//!   lxm edit `<path>` --schema `<schema>` [--suppress|--unsuppress|--delete `<paths>`] [--wrap `<name>=<paths>`] [--undo `<n>`] [--output `<file>`]
//!   lxm formats                                            - List the available formats
//!
//! Global options: `--config <file>` layers a TOML file over the built-in defaults (otherwise
//! `lxm.toml` in the working directory is used when present), `-v` enables debug logging.
mod edit;
mod inspect;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use edit::EditStep;
use lxm_babel::{persist, FormatRegistry};
use lxm_config::{Loader, LxmConfig};
use lxm_parser::lxm::schema::InMemorySchemaProvider;
use lxm_parser::lxm::{MacroDocument, NodePath, ParseOptions, ParseOutput};
use std::fmt::Display;
use std::path::Path;

const LOCAL_CONFIG: &str = "lxm.toml";

fn main() {
    let matches = Command::new("lxm")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for converting and inspecting LXM command macros")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .long("config")
                .short('c')
                .global(true)
                .help("Configuration file layered over the defaults"),
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .short('v')
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Log debug output to stderr"),
        )
        .subcommand(
            Command::new("convert")
                .about("Convert a macro to another format")
                .arg(path_arg())
                .arg(schema_arg())
                .arg(permissive_arg())
                .arg(
                    Arg::new("to")
                        .long("to")
                        .short('t')
                        .help("Output format (e.g., 'lxm', 'python', 'json', 'yaml')"),
                )
                .arg(
                    Arg::new("from")
                        .long("from")
                        .help("Input format, when the extension and content do not tell"),
                )
                .arg(
                    Arg::new("selection")
                        .long("selection")
                        .help("Comma separated node paths to export, e.g. '0,1;2'"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Write to this file instead of stdout"),
                ),
        )
        .subcommand(
            Command::new("inspect")
                .about("Print the macro tree with node paths")
                .arg(path_arg())
                .arg(schema_arg())
                .arg(permissive_arg()),
        )
        .subcommand(
            Command::new("edit")
                .about("Apply edits through the undo history and save the result")
                .arg(path_arg())
                .arg(schema_arg())
                .arg(permissive_arg())
                .arg(step_arg("suppress", "Suppress the nodes at these paths"))
                .arg(step_arg("unsuppress", "Clear suppression of the nodes at these paths"))
                .arg(step_arg("delete", "Delete the nodes at these paths"))
                .arg(step_arg(
                    "wrap",
                    "Wrap sibling nodes into a new block, given as '<name>=<paths>'",
                ))
                .arg(
                    Arg::new("undo")
                        .long("undo")
                        .value_parser(value_parser!(usize))
                        .default_value("0")
                        .help("Undo this many of the steps afterwards"),
                )
                .arg(
                    Arg::new("to")
                        .long("to")
                        .short('t')
                        .requires("output")
                        .help("Format of the output file"),
                )
                .arg(
                    Arg::new("output")
                        .long("output")
                        .short('o')
                        .help("Save to this file instead of over the input"),
                ),
        )
        .subcommand(Command::new("formats").about("List available formats"))
        .get_matches();

    init_logging(matches.get_flag("verbose"));
    let config = load_config(matches.get_one::<String>("config"));

    match matches.subcommand() {
        Some(("convert", convert_matches)) => handle_convert_command(&config, convert_matches),
        Some(("inspect", inspect_matches)) => handle_inspect_command(&config, inspect_matches),
        Some(("edit", edit_matches)) => handle_edit_command(&config, edit_matches),
        Some(("formats", _)) => handle_formats_command(&config),
        _ => unreachable!(),
    }
}

fn path_arg() -> Arg {
    Arg::new("path")
        .help("Path to the macro file")
        .required(true)
        .index(1)
}

fn schema_arg() -> Arg {
    Arg::new("schema")
        .long("schema")
        .short('s')
        .required(true)
        .help("Command schema file (JSON or YAML)")
}

fn permissive_arg() -> Arg {
    Arg::new("permissive")
        .long("permissive")
        .action(ArgAction::SetTrue)
        .help("Skip malformed command lines instead of failing")
}

/// An edit step. Steps run in the order they are given.
fn step_arg(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name)
        .long(name)
        .value_name("PATHS")
        .action(ArgAction::Append)
        .help(help)
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::new();
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    } else if let Ok(filter) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filter);
    } else {
        builder.filter_level(log::LevelFilter::Warn);
    }
    builder.init();
}

fn fail(error: impl Display) -> ! {
    eprintln!("Error: {}", error);
    std::process::exit(1);
}

fn load_config(path: Option<&String>) -> LxmConfig {
    let loader = match path {
        Some(path) => Loader::new().with_file(path),
        None => Loader::new().with_optional_file(LOCAL_CONFIG),
    };
    loader.build().unwrap_or_else(|e| fail(e))
}

fn parse_options(config: &LxmConfig, matches: &ArgMatches) -> ParseOptions {
    let mut options = config.parse_options();
    if matches.get_flag("permissive") {
        options.strict_arguments = false;
    }
    options
}

fn required<'m>(matches: &'m ArgMatches, name: &str) -> &'m str {
    matches
        .get_one::<String>(name)
        .map(String::as_str)
        .unwrap_or_else(|| fail(format!("missing required argument `{}`", name)))
}

fn load_document(config: &LxmConfig, registry: &FormatRegistry, matches: &ArgMatches) -> ParseOutput {
    let path = Path::new(required(matches, "path"));
    let schema_path = required(matches, "schema");
    let schema = InMemorySchemaProvider::from_path(schema_path).unwrap_or_else(|e| fail(e));
    let options = parse_options(config, matches);

    let from = matches.try_get_one::<String>("from").ok().flatten();
    let output = match from {
        Some(format) => {
            let source = std::fs::read_to_string(path)
                .unwrap_or_else(|e| fail(format!("{}: {}", path.display(), e)));
            let options = options.with_file_name(path.display().to_string());
            registry.parse(&source, format, &schema, &options)
        }
        None => persist::load(registry, path, &schema, &options),
    };
    output.unwrap_or_else(|e| fail(e))
}

fn parse_selection(selection: &str) -> Vec<NodePath> {
    selection
        .split(',')
        .map(|path| path.parse::<NodePath>().unwrap_or_else(|e| fail(e)))
        .collect()
}

/// Handle the convert command
fn handle_convert_command(config: &LxmConfig, matches: &ArgMatches) {
    let registry = config.registry();
    let output = load_document(config, &registry, matches);
    let doc = match matches.get_one::<String>("selection") {
        Some(selection) => {
            let paths = parse_selection(selection);
            output.document.filtered(|path, _| paths.contains(path))
        }
        None => output.document,
    };

    let to = matches.get_one::<String>("to").map(String::as_str);
    match matches.get_one::<String>("output") {
        Some(target) => {
            let mut doc = doc;
            persist::save_as(&registry, &mut doc, Path::new(target), to)
                .unwrap_or_else(|e| fail(e));
        }
        None => {
            let format = to.unwrap_or(&config.export.default_format);
            let text = registry.serialize(&doc, format).unwrap_or_else(|e| fail(e));
            print!("{}", text);
        }
    }
}

/// Handle the inspect command
fn handle_inspect_command(config: &LxmConfig, matches: &ArgMatches) {
    let registry = config.registry();
    let output = load_document(config, &registry, matches);
    print_tree(&output.document);
    if !output.skipped.is_empty() {
        println!();
        for skipped in &output.skipped {
            println!("skipped line {}: {}", skipped.line, skipped.error);
        }
    }
}

fn print_tree(doc: &MacroDocument) {
    print!("{}", inspect::render_tree(doc));
}

/// Collect the edit steps in command line order.
fn edit_steps(matches: &ArgMatches) -> Vec<EditStep> {
    let mut steps: Vec<(usize, EditStep)> = Vec::new();
    for name in ["suppress", "unsuppress", "delete", "wrap"] {
        let (Some(indices), Some(values)) =
            (matches.indices_of(name), matches.get_many::<String>(name))
        else {
            continue;
        };
        for (index, value) in indices.zip(values) {
            let step = match name {
                "suppress" | "unsuppress" => EditStep::Suppress {
                    paths: parse_selection(value),
                    suppressed: name == "suppress",
                },
                "delete" => EditStep::Delete(parse_selection(value)),
                _ => {
                    let (block, paths) = value.split_once('=').unwrap_or_else(|| {
                        fail(format!("`--wrap {}`: expected '<name>=<paths>'", value))
                    });
                    EditStep::Wrap {
                        name: block.to_string(),
                        paths: parse_selection(paths),
                    }
                }
            };
            steps.push((index, step));
        }
    }
    steps.sort_by_key(|(index, _)| *index);
    steps.into_iter().map(|(_, step)| step).collect()
}

/// Handle the edit command
fn handle_edit_command(config: &LxmConfig, matches: &ArgMatches) {
    let registry = config.registry();
    let mut doc = load_document(config, &registry, matches).document;
    let undo = matches.get_one::<usize>("undo").copied().unwrap_or_default();

    let mut stack = config.undo_stack();
    let report =
        edit::run_edits(&mut doc, &mut stack, edit_steps(matches), undo).unwrap_or_else(|e| fail(e));
    if report.undone < undo.min(report.applied) {
        log::warn!(
            "only {} step(s) could be undone, the history keeps {}",
            report.undone,
            config.history.max_undo
        );
    }

    let to = matches.get_one::<String>("to").map(String::as_str);
    let saved = match matches.get_one::<String>("output") {
        Some(target) => {
            persist::save_as(&registry, &mut doc, Path::new(target), to)
                .unwrap_or_else(|e| fail(e));
            true
        }
        None if doc.unsaved_changes => {
            persist::save(&registry, &mut doc).unwrap_or_else(|e| fail(e));
            true
        }
        None => false,
    };
    if saved {
        stack.mark_clean(&mut doc);
    }

    let outcome = match &doc.file_path {
        Some(path) if saved => format!("saved {}", path.display()),
        _ => "no changes to save".to_string(),
    };
    println!(
        "applied {} step(s), undid {}, {}",
        report.applied, report.undone, outcome
    );
}

/// Handle the formats command
fn handle_formats_command(config: &LxmConfig) {
    let registry = config.registry();
    println!("Available formats:\n");
    for name in registry.list_formats() {
        if let Ok(format) = registry.get(&name) {
            println!("  {:<8} .{}", name, format.file_extensions().join(", ."));
            println!("    {}", format.description());
            println!();
        }
    }
}
