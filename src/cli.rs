// src/cli.rs
use crate::api;
use crate::api::types::ScrapeRequest;
use crate::config::consts::FRAGMENT_MARKER;
use crate::config::options::ConsoleOptions;
use crate::core::net::{Backend, HttpBackend};
use crate::dispatch::fragment::Fragment;
use crate::progress::Progress;
use crate::renderers::market_analysis::{PollOutcome, poll_scrape_results};

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Help,
    /// Domains and the categories with raw data.
    Summary,
    Supermarkets { country: String },
    /// Fetch a backend fragment and print it as text.
    Fragment { path: String },
    Scrape { country: String, module: String, query: String },
}

#[derive(Debug, PartialEq, Eq)]
pub struct Invocation {
    pub base_url: Option<String>,
    pub command: Command,
}

pub fn run(args: impl Iterator<Item = String>) -> Result<(), Box<dyn std::error::Error>> {
    let inv = parse_args(args)?;
    let mut opts = ConsoleOptions::from_env();
    if let Some(url) = &inv.base_url {
        opts.net.set_base_url(url);
    }
    let backend = HttpBackend::new(opts.net.clone());

    match inv.command {
        Command::Help => eprintln!("{}", include_str!("cli_help.txt")),
        Command::Summary => {
            let summary = api::scrape_summary(&backend)?;
            if summary.summary.is_empty() {
                println!("(no raw data yet)");
            }
            for (domain, cats) in &summary.summary {
                println!("{},{}", domain, cats.join(";"));
            }
        }
        Command::Supermarkets { country } => {
            for s in api::available_supermarkets(&backend, &country)? {
                println!("{},{},{}", s.module_name, s.display_name, s.url);
            }
        }
        Command::Fragment { path } => {
            let html = api::fragment(&backend, &path)?;
            let frag = Fragment::extract(&html, Some(FRAGMENT_MARKER));
            if frag.scripts_dropped > 0 {
                logd!("CLI: dropped {} script block(s) from {}", frag.scripts_dropped, path);
            }
            println!("{}", frag.text());
        }
        Command::Scrape { country, module, query } => {
            let req = ScrapeRequest { country_code: country, module_name: module, query };
            scrape(&backend, &req, &opts)?;
        }
    }
    Ok(())
}

fn scrape(backend: &dyn Backend, req: &ScrapeRequest, opts: &ConsoleOptions) -> Result<(), Box<dyn std::error::Error>> {
    let started = api::start_scrape(backend, req)?.ok_or("Search failed.")?;
    if let Some(err) = started.error {
        return Err(err.into());
    }
    let category = started
        .category
        .unwrap_or_else(|| crate::core::sanitize::slugify(&req.query));
    eprintln!("Scrape scheduled: {} / {}", req.module_name, category);

    let mut progress = PrintProgress;
    match poll_scrape_results(backend, &req.module_name, &category, opts.poll, &mut progress, &|| true) {
        PollOutcome::Ready(r) => {
            eprintln!("{}", r.meta_line(&category, &req.module_name));
            for rec in &r.records {
                println!("{}\t{}\t{}", rec.name, rec.price, rec.url);
            }
            Ok(())
        }
        other => Err(other.message().into()),
    }
}

struct PrintProgress;

impl Progress for PrintProgress {
    fn log(&mut self, msg: &str) {
        eprintln!("{msg}");
    }
}

pub fn parse_args(args: impl Iterator<Item = String>) -> Result<Invocation, Box<dyn std::error::Error>> {
    let mut args = args.peekable();
    let mut base_url = None;
    let mut command = None;
    let (mut country, mut module, mut query) = (None, None, None);

    while let Some(a) = args.next() {
        match a.as_str() {
            "--base-url" => base_url = Some(args.next().ok_or("Missing value for --base-url")?),
            "-c" | "--country" => country = Some(args.next().ok_or("Missing value for --country")?),
            "-m" | "--module" => module = Some(args.next().ok_or("Missing value for --module")?),
            "-q" | "--query" => query = Some(args.next().ok_or("Missing value for --query")?),
            "-h" | "--help" => command = Some(s!("help")),
            "summary" | "supermarkets" | "scrape" if command.is_none() => command = Some(a),
            "fragment" if command.is_none() => {
                let path = args.next().ok_or("Missing fragment path")?;
                command = Some(join!("fragment:", &path));
            }
            _ => return Err(format!("Unknown arg: {}", a).into()),
        }
    }

    let command = match command.as_deref() {
        None | Some("help") => Command::Help,
        Some("summary") => Command::Summary,
        Some("supermarkets") => Command::Supermarkets {
            country: country.ok_or("supermarkets needs --country")?,
        },
        Some("scrape") => {
            let country = country.filter(|v| !v.trim().is_empty());
            let module = module.filter(|v| !v.trim().is_empty());
            let query = query.filter(|v| !v.trim().is_empty());
            match (country, module, query) {
                (Some(country), Some(module), Some(query)) => Command::Scrape { country, module, query },
                _ => return Err("Please select a country, supermarket, and enter a value.".into()),
            }
        }
        Some(other) => match other.strip_prefix("fragment:") {
            Some(path) => Command::Fragment { path: s!(path) },
            None => return Err(format!("Unknown command: {}", other).into()),
        },
    };
    Ok(Invocation { base_url, command })
}
