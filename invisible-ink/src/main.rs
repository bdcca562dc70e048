//! Placeholder font generator
//!
//! Takes one or more font files and writes, for each, a placeholder font with
//! the same metrics whose glyphs are empty, solid blocks, simplified originals
//! or borrowed from a donor font.

use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};

use clap::Parser;
use invisible_ink::{process_batch, BatchOutcome, BatchReport, Filter, Options, SourceFont};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The input font files.
    #[arg(required = true)]
    font_files: Vec<PathBuf>,

    /// Replace glyphs with solid blocks covering their bounding box
    #[arg(short, long)]
    blocks: bool,

    /// Take glyph outlines from this font, matched by glyph name
    #[arg(short, long)]
    donor: Option<PathBuf>,

    /// Only keep visible glyphs for the characters in this text file
    #[arg(short, long)]
    filter: Option<PathBuf>,

    /// Directory the placeholder fonts are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Fail on outline commands that can't be simplified instead of dropping them
    #[arg(long)]
    strict: bool,
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    std::process::exit(run(&args).exit_code());
}

fn run(args: &Args) -> BatchOutcome {
    let filter = match args.filter.as_deref().map(load_filter).transpose() {
        Ok(filter) => filter.unwrap_or_default(),
        Err(e) => {
            eprintln!("{e}");
            return BatchOutcome::TotalFailure;
        }
    };
    let donor = match args.donor.as_deref().map(load_donor).transpose() {
        Ok(donor) => donor,
        Err(e) => {
            eprintln!("{e}");
            return BatchOutcome::TotalFailure;
        }
    };
    let options = Options {
        filter,
        use_solid_blocks: args.blocks,
        strict: args.strict,
    };

    let report = process_batch(&args.font_files, donor.as_ref(), &options);

    let mut succeeded = 0;
    let mut failed = 0;
    for (path, written) in write_placeholders(&report, &args.output_dir) {
        match written {
            Ok(name) => {
                println!("{name}");
                succeeded += 1;
            }
            Err(reason) => {
                log::error!("unable to process font file {}: {reason}", path.display());
                failed += 1;
            }
        }
    }
    log::info!("{succeeded} written, {failed} failed");
    BatchOutcome::from_counts(succeeded, failed)
}

fn load_filter(path: &Path) -> Result<Filter, String> {
    std::fs::read_to_string(path)
        .map(|text| Filter::from_text(&text))
        .map_err(|e| format!("unable to read filter file {}: {e}", path.display()))
}

fn load_donor(path: &Path) -> Result<SourceFont, String> {
    std::fs::read(path)
        .map_err(|source| invisible_ink::Error::Io {
            path: path.to_owned(),
            source,
        })
        .and_then(|data| SourceFont::new(&data))
        .map_err(|e| format!("unable to read donor font {}: {e}", path.display()))
}

/// Write each successful placeholder into `output_dir`.
///
/// Returns, per input file and in input order, the family name written or
/// the reason it wasn't. An output path is only written once; later inputs
/// that map to the same path fail.
fn write_placeholders<'a>(
    report: &'a BatchReport,
    output_dir: &Path,
) -> Vec<(&'a Path, Result<&'a str, String>)> {
    let mut written: HashMap<PathBuf, &Path> = HashMap::new();
    report
        .files
        .iter()
        .map(|file| {
            let input = file.path.as_path();
            let result = file.result.as_ref().map_err(ToString::to_string).and_then(|font| {
                let out_path = output_path(output_dir, input);
                if let Some(previous) = written.get(&out_path) {
                    return Err(format!(
                        "{} was already written for {}",
                        out_path.display(),
                        previous.display()
                    ));
                }
                std::fs::write(&out_path, &font.data)
                    .map_err(|e| format!("unable to write {}: {e}", out_path.display()))?;
                written.insert(out_path, input);
                Ok(font.name.as_str())
            });
            (input, result)
        })
        .collect()
}

fn output_path(output_dir: &Path, input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|stem| stem.to_string_lossy())
        .unwrap_or_default();
    output_dir.join(format!("{stem}-placeholder.ttf"))
}
