use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use svgtint::{
    CURRENT_COLOR, Options, convert_directory, convert_with_report, default_directory_output,
    default_file_output, format_number,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "svgtint")]
#[command(about = "Recolor SVG icons to currentColor", long_about = None)]
struct Cli {
    /// Input file or directory (use - for stdin)
    #[arg(default_value = "-")]
    input: PathBuf,

    /// Output file or directory, - for stdout (default: <input>-converted, or stdout for stdin)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Convert every .svg file in the input directory
    #[arg(short, long)]
    directory: bool,

    /// Crop the viewBox to the artwork
    #[arg(long)]
    crop: bool,

    /// Leave style attributes alone
    #[arg(long)]
    no_style_attributes: bool,

    /// Leave <style> elements alone
    #[arg(long)]
    no_style_blocks: bool,

    /// Print what was changed
    #[arg(short, long)]
    stats: bool,

    /// More logging (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = Options {
        crop: cli.crop,
        style_attributes: !cli.no_style_attributes,
        style_blocks: !cli.no_style_blocks,
    };

    if cli.directory {
        return convert_dir(&cli, &options);
    }

    // Read input
    let input = if cli.input.as_os_str() == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        fs::read_to_string(&cli.input)?
    };

    let conversion = convert_with_report(&input, &options)?;

    // Write output
    match output_path(&cli.input, cli.output.as_deref()) {
        Some(path) => fs::write(path, &conversion.output)?,
        None => io::stdout().write_all(conversion.output.as_bytes())?,
    }

    // Print stats if requested
    if cli.stats {
        eprintln!(
            "{} color(s) replaced with {}",
            conversion.recolored.total(),
            CURRENT_COLOR
        );
        if let Some(bbox) = conversion.cropped {
            eprintln!(
                "cropped to {} {} {} {}",
                format_number(bbox.min_x),
                format_number(bbox.min_y),
                format_number(bbox.width()),
                format_number(bbox.height())
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn convert_dir(cli: &Cli, options: &Options) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let output_dir = cli
        .output
        .clone()
        .unwrap_or_else(|| default_directory_output(&cli.input));

    let report = convert_directory(&cli.input, &output_dir, options)?;

    for item in report.failed() {
        if let Err(e) = &item.result {
            eprintln!("{}: {}", item.input.display(), e);
        }
    }
    if cli.stats {
        eprintln!(
            "{} converted, {} failed -> {}",
            report.succeeded().count(),
            report.failed().count(),
            output_dir.display()
        );
    }

    Ok(if report.all_succeeded() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Where a single converted document goes. `None` means stdout.
fn output_path(input: &Path, output: Option<&Path>) -> Option<PathBuf> {
    match output {
        Some(path) if path.as_os_str() == "-" => None,
        Some(path) => Some(path.to_path_buf()),
        None if input.as_os_str() == "-" => None,
        None => Some(default_file_output(input)),
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path() {
        let file = Path::new("icons/logo.svg");
        assert_eq!(
            output_path(file, None),
            Some(PathBuf::from("icons/logo-converted.svg"))
        );
        assert_eq!(
            output_path(file, Some(Path::new("out.svg"))),
            Some(PathBuf::from("out.svg"))
        );
        assert_eq!(output_path(file, Some(Path::new("-"))), None);
        assert_eq!(output_path(Path::new("-"), None), None);
    }
}
