use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use storylet_fixers::config::{
	CONFIG_FILE_NAME, Config, generate_init_template, load_config, user_config_path,
};
use storylet_fixers::dispatcher::FixerDispatcher;
use storylet_fixers::dom::{Document, NodeId};
use storylet_fixers::fixers::ThousandSeparatorFixer;
use storylet_fixers::matchers::parse_state_file;
use storylet_fixers::numbers::number_with_commas;

#[derive(Parser)]
#[command(name = "fixers")]
#[command(
	author,
	version,
	about = "Reactive text fixers and game-state matchers for a host-rendered page"
)]
#[command(arg_required_else_help = true)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	/// Config file to use instead of ./.fixers.toml or ~/.fixers.toml
	#[arg(long, global = true, value_name = "FILE")]
	config: Option<PathBuf>,

	/// Create a template .fixers.toml in the current directory
	#[arg(long)]
	init: bool,

	/// Overwrite existing .fixers.toml when using --init
	#[arg(long, requires = "init")]
	force: bool,

	/// Log fixer activity to stderr
	#[arg(short, long, global = true)]
	verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
	/// Format amounts with thousands separators
	Format {
		/// Raw amounts, e.g. 1234567 or "1000.00"
		#[arg(required = true)]
		values: Vec<String>,
	},

	/// Evaluate every configured rule against a game state file
	Match {
		/// TOML file with area_id, setting_id, storylet_id, storylet_phase
		#[arg(long, value_name = "FILE")]
		state: PathBuf,
	},

	/// Replay amount changes on a synthetic sidebar and print what is shown
	Simulate {
		/// Initial amount followed by the amounts the page changes to
		#[arg(required = true)]
		values: Vec<String>,
	},

	/// Configuration management commands
	Config {
		#[command(subcommand)]
		action: ConfigAction,
	},
}

#[derive(Subcommand)]
enum ConfigAction {
	/// Display the effective configuration and where it came from
	Show,
	/// Check the config file for errors without running anything
	Validate,
}

fn main() -> ExitCode {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	match run(cli) {
		Ok(code) => code,
		Err(e) => {
			eprintln!("error: {e:?}");
			ExitCode::FAILURE
		}
	}
}

fn init_tracing(verbose: bool) {
	let default = if verbose { "debug" } else { "warn" };
	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
		.with_writer(std::io::stderr)
		.init();
}

fn run(cli: Cli) -> Result<ExitCode> {
	// Handle --init
	if cli.init {
		return handle_init(cli.force);
	}

	let config_path = cli.config.as_deref();

	match cli.command {
		Some(Commands::Format { values }) => handle_format(&values),
		Some(Commands::Match { state }) => handle_match(config_path, &state),
		Some(Commands::Simulate { values }) => handle_simulate(config_path, &values),
		Some(Commands::Config { action }) => match action {
			ConfigAction::Show => handle_config_show(config_path),
			ConfigAction::Validate => handle_config_validate(config_path),
		},
		// No command specified - this shouldn't happen due to arg_required_else_help
		None => Ok(ExitCode::SUCCESS),
	}
}

fn load(config_path: Option<&Path>) -> Result<(Config, Option<PathBuf>)> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;
	load_config(config_path, &cwd).context("Failed to load configuration")
}

fn handle_init(force: bool) -> Result<ExitCode> {
	let config_path = PathBuf::from(CONFIG_FILE_NAME);

	if config_path.exists() && !force {
		anyhow::bail!("{CONFIG_FILE_NAME} already exists. Use --force to overwrite.");
	}

	std::fs::write(&config_path, generate_init_template())
		.with_context(|| format!("Failed to write {}", config_path.display()))?;

	println!("Created {CONFIG_FILE_NAME}");
	Ok(ExitCode::SUCCESS)
}

fn handle_format(values: &[String]) -> Result<ExitCode> {
	for value in values {
		println!("{}", number_with_commas(value));
	}
	Ok(ExitCode::SUCCESS)
}

fn handle_match(config_path: Option<&Path>, state_path: &Path) -> Result<ExitCode> {
	let (config, _) = load(config_path)?;
	let state = parse_state_file(state_path)
		.with_context(|| format!("Failed to load game state: {}", state_path.display()))?;

	if config.rules.is_empty() {
		println!("No rules configured.");
		return Ok(ExitCode::SUCCESS);
	}

	for rule in &config.rules {
		println!(
			"{}: {} => {}",
			rule.name,
			rule.when.describe(),
			rule.is_active(&state)
		);
	}

	Ok(ExitCode::SUCCESS)
}

/// Build `div.sidebar > ul > li > div > div.item__value > div.item__price`
/// holding `amount`, detached. Returns the sidebar and the price element.
fn build_sidebar(doc: &mut Document, amount: &str) -> (NodeId, NodeId) {
	let sidebar = doc.create_element("div", "sidebar");
	let mut parent = sidebar;
	for (tag, class) in [("ul", ""), ("li", ""), ("div", "item"), ("div", "item__value")] {
		let child = doc.create_element(tag, class);
		doc.append_child(parent, child);
		parent = child;
	}

	let price = doc.create_element("div", "item__price");
	let text = doc.create_text(amount);
	doc.append_child(price, text);
	doc.append_child(parent, price);

	(sidebar, price)
}

fn handle_simulate(config_path: Option<&Path>, values: &[String]) -> Result<ExitCode> {
	let (config, _) = load(config_path)?;
	let Some((initial, updates)) = values.split_first() else {
		return Ok(ExitCode::SUCCESS);
	};

	let mut doc = Document::new();
	let mut dispatcher = FixerDispatcher::new();
	dispatcher.register(Box::new(ThousandSeparatorFixer::new()));
	dispatcher.apply_settings(&mut doc, &config.settings);

	let (sidebar, price) = build_sidebar(&mut doc, initial);
	let root = doc.root();
	doc.append_child(root, sidebar);
	dispatcher.node_added(&mut doc, sidebar);
	dispatcher.deliver(&mut doc);
	println!("{} -> {}", initial, doc.text_content(price));

	for value in updates {
		doc.write_text(price, value);
		dispatcher.deliver(&mut doc);
		println!("{} -> {}", value, doc.text_content(price));
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_show(config_path: Option<&Path>) -> Result<ExitCode> {
	let (config, source) = load(config_path)?;

	let Some(source) = source else {
		println!("No configuration file found.");
		return Ok(ExitCode::SUCCESS);
	};

	println!("# Source: {}", source.display());
	println!("# settings: {}", config.settings.iter().count());
	for (key, value) in config.settings.iter() {
		println!("  {key} = {value}");
	}
	println!();

	println!("# rules: {}", config.rules.len());
	for (i, rule) in config.rules.iter().enumerate() {
		println!("  Rule {}: {}", i + 1, rule.name);
		println!("    when: {}", rule.when);
	}
	println!();

	// Show user config path
	if let Ok(user_path) = user_config_path() {
		println!("User config path: {}", user_path.display());
		if user_path.exists() {
			println!("  (exists)");
		} else {
			println!("  (not found)");
		}
	}

	Ok(ExitCode::SUCCESS)
}

fn handle_config_validate(config_path: Option<&Path>) -> Result<ExitCode> {
	let cwd = std::env::current_dir().context("Failed to get current directory")?;

	match load_config(config_path, &cwd) {
		Ok((_, None)) => {
			println!("No configuration files found.");
			Ok(ExitCode::SUCCESS)
		}
		Ok((config, Some(path))) => {
			println!(
				"Configuration is valid: {} ({} settings, {} rules)",
				path.display(),
				config.settings.iter().count(),
				config.rules.len()
			);
			Ok(ExitCode::SUCCESS)
		}
		Err(e) => {
			eprintln!("Configuration error: {}", e);
			Ok(ExitCode::FAILURE)
		}
	}
}
