use std::collections::BTreeSet;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use anyhow::{anyhow, bail, Context, Result};
use clap::{ArgAction, Args, Parser};
use log::{error, info, warn, LevelFilter};
use struct_mapping::{Generator, KnownTypes, MappingConfig, SourceClass};
use struct_mapping::go::GoStructWriter;
use crate::container::{ClassContainer, DirContainer, JarContainer};

mod config;
mod container;

/// Generates Go structs with json tags from the fields of compiled Scala case classes.
#[derive(Debug, Parser)]
#[command(name = "class2struct", version)]
struct Cli {
	/// Be verbose. Can be given multiple times.
	#[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
	verbose: u8,

	/// Json file with type overrides, blacklists and case overrides.
	#[arg(long = "config")]
	config: Option<PathBuf>,

	/// Where to write the Go code to, standard output by default.
	#[arg(short = 'o', long = "output")]
	output: Option<PathBuf>,

	/// Starts the output with a `package` clause.
	#[arg(long = "package")]
	package: Option<String>,

	/// Continue with the next class if one fails. The exit code still reports the failure.
	#[arg(long = "keep-going")]
	keep_going: bool,

	#[command(flatten)]
	input: Input,

	/// The classes to generate, like `com.ua.model.Account`. By default, all classes carrying the marker attribute.
	classes: Vec<String>,
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
struct Input {
	/// A jar to read the classes from.
	#[arg(long = "jar")]
	jar: Option<PathBuf>,

	/// A directory of `.class` files, laid out by package.
	#[arg(long = "dir")]
	dir: Option<PathBuf>,
}

fn setup_logging(verbose: u8) -> Result<()> {
	let level = match verbose {
		0 => LevelFilter::Warn,
		1 => LevelFilter::Info,
		2 => LevelFilter::Debug,
		_ => LevelFilter::Trace,
	};

	fern::Dispatch::new()
		.format(|out, message, record| {
			out.finish(format_args!("[{} {}] {}", record.level(), record.target(), message))
		})
		.level(level)
		.chain(std::io::stderr())
		.apply()
		.context("failed to set up logging")
}

/// Decides what happens with a failing class.
#[derive(Debug)]
struct Failures {
	keep_going: bool,
	failed: Vec<String>,
}

impl Failures {
	/// Returns `Ok(None)` for a failure that is skipped.
	fn check<T>(&mut self, class: &str, result: Result<T>) -> Result<Option<T>> {
		match result {
			Ok(value) => Ok(Some(value)),
			Err(e) if self.keep_going => {
				error!("skipping class {class}: {e:#}");
				self.failed.push(class.to_owned());
				Ok(None)
			},
			Err(e) => Err(e.context(anyhow!("failed on class {class}"))),
		}
	}

	fn finish(self) -> Result<()> {
		if !self.failed.is_empty() {
			bail!("{} class(es) failed: {}", self.failed.len(), self.failed.join(", "));
		}
		Ok(())
	}
}

/// Reads the requested classes, or all classes carrying the marker attribute if none are requested.
///
/// Each class is read only once, since two declarations of the same struct don't compile.
fn read_classes(container: &mut dyn ClassContainer, requested: &[String], config: &MappingConfig, failures: &mut Failures) -> Result<Vec<SourceClass>> {
	let names = if requested.is_empty() {
		container.class_names()?
	} else {
		requested.iter().map(|name| name.replace('/', ".")).collect()
	};

	let mut seen = BTreeSet::new();
	let mut classes = Vec::new();
	for name in names {
		if !seen.insert(name.clone()) {
			warn!("class {name} is given more than once");
			continue;
		}
		if let Some(class) = failures.check(&name, container.read_class(&name))? {
			if requested.is_empty() && !class.has_attribute(&config.marker_attribute) {
				continue;
			}
			classes.push(class);
		}
	}

	if requested.is_empty() {
		info!("found {} class(es) with a {} attribute", classes.len(), config.marker_attribute);
	}
	Ok(classes)
}

fn run(cli: Cli) -> Result<()> {
	let config = match &cli.config {
		Some(path) => config::load(path)?,
		None => MappingConfig::default(),
	};

	let mut container: Box<dyn ClassContainer> = match (cli.input.jar, cli.input.dir) {
		(Some(jar), _) => Box::new(JarContainer::open(&jar)?),
		(None, Some(dir)) => Box::new(DirContainer::new(dir)),
		(None, None) => bail!("either --jar or --dir is required"),
	};

	let mut failures = Failures { keep_going: cli.keep_going, failed: Vec::new() };

	let classes = read_classes(container.as_mut(), &cli.classes, &config, &mut failures)?;
	drop(container);

	let known: KnownTypes = classes.iter().map(|class| class.name.as_str()).collect();
	let generator = Generator::new(&config, &known);

	let output: Box<dyn Write> = match &cli.output {
		Some(path) => {
			let file = File::create(path)
				.with_context(|| anyhow!("failed to create output file {path:?}"))?;
			Box::new(BufWriter::new(file))
		},
		None => Box::new(BufWriter::new(std::io::stdout().lock())),
	};
	let mut writer = match cli.package {
		Some(package) => GoStructWriter::with_package(output, package),
		None => GoStructWriter::new(output),
	};

	for class in &classes {
		let result = generator.generate(class, &mut writer).map_err(anyhow::Error::from);
		failures.check(&class.name, result)?;
	}
	writer.into_inner().flush()
		.context("failed to flush output")?;

	failures.finish()
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	setup_logging(cli.verbose)?;

	run(cli)
}
