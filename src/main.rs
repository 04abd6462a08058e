//! mindmap-layout CLI
//!
//! Usage:
//!   mindmap-layout [OPTIONS] [FILE]
//!
//! Options:
//!   -s, --stylesheet <FILE>  Stylesheet file (TOML format)
//!   -f, --format <FORMAT>    Output format: svg or json
//!   -l, --layout <TYPE>      Force the root's layout strategy
//!   --dump-layout <FILE>     Also write the geometry as JSON to FILE
//!   -h, --help               Print help
//!
//! Set `RUST_LOG=mindmap_layout=debug` to trace layout passes on stderr.

use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use mindmap_layout::layout_dump::write_layout_dump;
use mindmap_layout::{layout_source, render_svg, LayoutDump, LayoutType, RenderConfig, RenderError, Stylesheet, Tree};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Svg,
    Json,
}

#[derive(Parser)]
#[command(name = "mindmap-layout")]
#[command(about = "Lay out a markdown outline as a mind map")]
struct Cli {
    /// Input file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Stylesheet file (TOML format)
    #[arg(short, long)]
    stylesheet: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "svg")]
    format: Format,

    /// Layout strategy for the root: horizontal, vertical, taproot, classic or outline
    #[arg(short, long)]
    layout: Option<LayoutType>,

    /// Also write the computed geometry as JSON to this file
    #[arg(long, value_name = "FILE")]
    dump_layout: Option<PathBuf>,
}

fn render(tree: &Tree, config: &RenderConfig, format: Format) -> Result<String, RenderError> {
    match format {
        Format::Svg => Ok(render_svg(tree, &config.stylesheet, &config.svg)?),
        Format::Json => Ok(LayoutDump::from_tree(tree, &config.stylesheet)?.to_json()?),
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let stylesheet = match &cli.stylesheet {
        Some(path) => match Stylesheet::from_file(path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("Error loading stylesheet '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => Stylesheet::default(),
    };

    let (source, filename) = match &cli.input {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => (content, path.display().to_string()),
            Err(e) => {
                eprintln!("Error reading file '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => {
            let mut buffer = String::new();
            match io::stdin().read_to_string(&mut buffer) {
                Ok(_) => (buffer, "<stdin>".to_string()),
                Err(e) => {
                    eprintln!("Error reading from stdin: {}", e);
                    std::process::exit(1);
                }
            }
        }
    };

    let mut config = RenderConfig::new().with_stylesheet(stylesheet);
    if let Some(layout_type) = cli.layout {
        config = config.with_root_layout(layout_type);
    }

    let output = layout_source(&source, &config).and_then(|tree| {
        if let Some(path) = &cli.dump_layout {
            if let Err(e) = write_layout_dump(path, &tree, &config.stylesheet) {
                eprintln!("Error writing layout dump '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        }
        render(&tree, &config, cli.format)
    });
    match output {
        Ok(text) => println!("{}", text),
        Err(RenderError::Parse(errors)) => {
            for error in &errors {
                eprintln!("{}", error.format(&source, &filename));
            }
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
