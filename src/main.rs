use clap::Parser;
use qq_resize::config::{self, BatchOptions, CliOverrides};
use qq_resize::{output, process};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "qq-resize")]
#[command(version)]
#[command(about = "Shrink images so QQ mobile shows them at full size")]
#[command(long_about = "\
Shrink images so QQ mobile shows them at full size

QQ on mobile renders images whose longest edge exceeds 542 pixels at
sticker size. This tool scales such images down proportionally so the
longest edge is exactly the limit, and leaves smaller images untouched.

Only .jpg, .jpeg and .png files are processed (case-insensitive).

Examples:
  qq-resize image.jpg                    # resize one file in place
  qq-resize photos/                      # every image in a directory
  qq-resize photos/ -r                   # ... and its subdirectories
  qq-resize input.jpg -o resized/        # write into another directory
  qq-resize input.jpg -s 500             # custom longest edge
  qq-resize input.png -q 85              # trade size for quality
  qq-resize photos/ --rename             # number files 00001.jpg, 00002.png, ...
  qq-resize photos/ --dry-run            # show what would happen

Run 'qq-resize --gen-config' for a documented settings file.")]
struct Cli {
    /// Image file or directory to process
    #[arg(required_unless_present = "gen_config")]
    input: Option<PathBuf>,

    /// Output directory (default: overwrite in place)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Longest edge in pixels [default: 542]
    #[arg(short = 's', long)]
    max_size: Option<u32>,

    /// Quality 1-100: JPEG quality, or PNG compression where 100 = none [default: 100]
    #[arg(short, long)]
    quality: Option<u32>,

    /// Descend into subdirectories
    #[arg(short, long)]
    recursive: bool,

    /// Show settings and one line per file
    #[arg(short, long)]
    verbose: bool,

    /// Decide and report without modifying any file
    #[arg(long)]
    dry_run: bool,

    /// Rename outputs sequentially (00001.jpg, 00002.png, ...)
    #[arg(long)]
    rename: bool,

    /// Settings file (TOML); flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the batch report as JSON
    #[arg(long)]
    json: bool,

    /// Print a stock settings file with all options documented
    #[arg(long)]
    gen_config: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.gen_config {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }
    let input = cli.input.as_deref().ok_or("missing input path")?;

    let overrides = CliOverrides {
        max_size: cli.max_size,
        quality: cli.quality,
        recursive: cli.recursive,
        rename: cli.rename,
    };
    let settings = config::load_settings(cli.config.as_deref(), &overrides)?;
    let options = BatchOptions {
        output_dir: cli.output.clone(),
        recursive: settings.recursive,
        rename: settings.rename,
        dry_run: cli.dry_run,
    };

    if let Some(out) = options.output_dir.as_ref().filter(|_| !options.dry_run) {
        std::fs::create_dir_all(out)?;
    }

    let show_files = (cli.verbose || cli.dry_run) && !cli.json;
    if cli.verbose && !cli.json {
        output::print_settings(&settings, &options);
    }

    let report = process::process(input, &settings.resize_config(), &options, |file| {
        if show_files {
            output::print_file_report(file, options.dry_run);
        }
    })?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output::print_summary(&report);
    }

    Ok(())
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise only errors are logged, or everything
/// from this crate with `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "qq_resize=debug" } else { "error" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
