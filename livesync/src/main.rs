use clap::Parser;
use livesync_lib::preview::{DEMO_CSS, DEMO_HTML};
use livesync_lib::{PreviewConfig, PreviewSession, RuleFailurePolicy};
use std::fs;

const LIVESYNC_INTRO: &str = r#"
    livesync - live HTML/CSS preview synchronizer
"#;

#[derive(Parser)]
#[command(name = "livesync")]
#[command(about = "Synchronize HTML and CSS into a sandboxed preview document")]
struct Args {
    /// Markup file for the preview body. Uses the demo page when omitted.
    #[arg(long)]
    html: Option<String>,

    /// Stylesheet file for the managed style container. Uses the demo stylesheet when omitted.
    #[arg(long)]
    css: Option<String>,

    /// Skip rules the preview rejects instead of stopping at the first one.
    #[arg(long)]
    skip_invalid_rules: bool,

    /// Print only the active rules instead of the whole preview document.
    #[arg(long)]
    rules_only: bool,
}

fn read_or(path: Option<&str>, fallback: &str) -> String {
    match path {
        Some(path) => match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                eprintln!("Error reading {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => fallback.to_owned(),
    }
}

fn main() {
    env_logger::init();

    // parse the args given in terminal
    let args: Args = Args::parse();

    let html = read_or(args.html.as_deref(), DEMO_HTML);
    let css = read_or(args.css.as_deref(), DEMO_CSS);

    let policy = if args.skip_invalid_rules {
        RuleFailurePolicy::Skip
    } else {
        RuleFailurePolicy::Abort
    };
    let config = PreviewConfig::default().with_rule_failure(policy);
    let mut session = PreviewSession::with_config(config);

    if let Err(e) = session.apply(&html, &css) {
        eprintln!("Error synchronizing preview: {}", e);
        std::process::exit(1);
    }
    log::info!(
        "preview synchronized with {} active rules ({:?} on rejected rules)",
        session.active_rules().len(),
        session.preview().config().rule_failure
    );

    if args.rules_only {
        for rule in session.active_rules() {
            println!("{}", rule);
        }
    } else {
        eprintln!("{}", LIVESYNC_INTRO);
        println!("{}", session.render());
    }
}
