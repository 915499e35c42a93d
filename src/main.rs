use std::io::Write;
use std::path::Path;
use std::{env, fs, io, process};

use env_logger::Builder;
use log::{error, info, warn, LevelFilter};
use tf_idf_recommender::{FsSource, Recommender, RecommenderConfig};

struct Args {
    docs_dir: String,
    config: RecommenderConfig,
    query: Option<String>,
    verbosity: u8,
}

fn main() {
    let args = match parse_args() {
        Ok(Some(args)) => args,
        Ok(None) => {
            print_usage();
            return;
        }
        Err(msg) => {
            eprintln!("[error] {msg}");
            print_usage();
            process::exit(2);
        }
    };

    let level = match args.verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    Builder::new()
        .filter_level(level)
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .init();

    if let Err(e) = run(&args) {
        error!("{e}");
        process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let files = list_files(&args.docs_dir)?;
    if files.is_empty() {
        return Err(format!("no files found in {}", args.docs_dir).into());
    }
    info!("loading {} documents from {}", files.len(), args.docs_dir);

    let source = FsSource::with_root(&args.docs_dir);
    let mut recommender = Recommender::new(args.config.clone());
    recommender.fit(files.iter().map(String::as_str), &source)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match &args.query {
        Some(query) => {
            let recs = recommender.predict(query)?;
            writeln!(out, "{}\t{}", query, recs.join("\t"))?;
        }
        None => {
            for (name, recs) in recommender.predict_all()? {
                writeln!(out, "{}\t{}", name, recs.join("\t"))?;
            }
        }
    }
    Ok(())
}

/// regular files directly inside `dir`, sorted by name
/// names that are not valid UTF-8 are skipped with a warning
fn list_files<P: AsRef<Path>>(dir: P) -> io::Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.path().is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => files.push(name),
            Err(name) => warn!("skipping non UTF-8 file name {name:?}"),
        }
    }
    files.sort();
    Ok(files)
}

// --docs DIR       : 文書ディレクトリ
// --n N            : 返す件数 (default 5)
// --tokenizer MODE : raw | backrefs
// --query NAME     : 1件だけ (未指定なら全件)
// -v / -vv         : log level
fn parse_args() -> Result<Option<Args>, String> {
    let mut args = env::args().skip(1);
    let mut docs_dir = None;
    let mut config = RecommenderConfig::default();
    let mut query = None;
    let mut verbosity = 0u8;
    while let Some(a) = args.next() {
        match a.as_str() {
            "--docs" => docs_dir = Some(args.next().ok_or("--docs requires a path")?),
            "--n" => {
                let v = args.next().ok_or("--n requires a number")?;
                // range is checked by fit
                config.n_examples = v.parse().map_err(|_| format!("--n: not an integer: {v}"))?;
            }
            "--tokenizer" => config.tokenizer = args.next().ok_or("--tokenizer requires a mode")?,
            "--query" => query = Some(args.next().ok_or("--query requires a document name")?),
            "-v" => verbosity = verbosity.saturating_add(1),
            "-vv" => verbosity = verbosity.saturating_add(2),
            "-h" | "--help" => return Ok(None),
            other => return Err(format!("unexpected argument: {other}")),
        }
    }
    let docs_dir = docs_dir.ok_or("--docs is required")?;
    Ok(Some(Args { docs_dir, config, query, verbosity }))
}

fn print_usage() {
    eprintln!("Usage: related-docs --docs DIR [--n N] [--tokenizer raw|backrefs] [--query NAME] [-v]");
    eprintln!("Output format: <doc>\\t<related 1>\\t<related 2>...");
}
