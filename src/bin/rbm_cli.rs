//! rbm-cli: send RBM messages and events from the command line
//!
//! Usage:
//!   rbm-cli [--key <file>] [--config <file>] <COMMAND> [ARGS]
//!
//! Credentials come from `--key` (a service-account JSON key) or, without it,
//! from ambient credentials. Set `RUST_LOG=rbm_lib_rust=debug` for request logs.

use anyhow::{bail, Context};
use rbm_lib_rust::{
    ClientConfig, CredentialMaterial, FileUpload, Msisdn, RbmClient, StandaloneRichCard,
    TextMessage,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Default)]
struct GlobalOptions {
    key: Option<PathBuf>,
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let (options, rest) = match split_global_options(&args) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    };

    let Some(command) = rest.first() else {
        print_usage();
        std::process::exit(1);
    };

    match command.as_str() {
        "version" | "--version" | "-V" => cmd_version(),
        "help" | "--help" | "-h" => print_usage(),
        _ => {
            if let Err(e) = run(&options, command, &rest[1..]).await {
                eprintln!("Error: {e:#}");
                std::process::exit(1);
            }
        }
    }
}

fn print_usage() {
    println!(
        r#"rbm-cli: RCS Business Messaging command line

USAGE:
    rbm-cli [--key <file>] [--config <file>] <COMMAND> [ARGS]

COMMANDS:
    capability <msisdn>                     Check RBM capability of a device
    users <msisdn>...                       Batch reachability lookup
    invite <msisdn>                         Invite a tester device
    typing <msisdn>                         Send an is-typing event
    read <msisdn> <message-id>              Mark a user message as read
    revoke <msisdn> <message-id>            Revoke an undelivered agent message
    send-text <msisdn> <text>               Send a text message
    send-card <msisdn> <image-url> [--title <t>] [--description <d>]
                                            Send a standalone rich card
    upload <file-url>                       Upload media by public URL
    version                                 Show version information
    help                                    Show this help message

OPTIONS:
    --key <file>        Service-account JSON key
    --config <file>     YAML client configuration

ENVIRONMENT:
    RBM_BASE_URL, RBM_AGENT_ID, RBM_HTTP_TIMEOUT_SECS, RBM_PROXY_URL
    GOOGLE_APPLICATION_CREDENTIALS      Ambient key file when --key is absent
    RUST_LOG                            Log filter (default: warn)"#
    );
}

fn cmd_version() {
    println!("rbm-cli {}", env!("CARGO_PKG_VERSION"));
}

/// Pull `--key` / `--config` out of the argument list, wherever they appear.
fn split_global_options(args: &[String]) -> anyhow::Result<(GlobalOptions, Vec<String>)> {
    let mut options = GlobalOptions::default();
    let mut rest = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--key" => {
                let path = iter.next().context("--key requires a path")?;
                options.key = Some(PathBuf::from(path));
            }
            "--config" => {
                let path = iter.next().context("--config requires a path")?;
                options.config = Some(PathBuf::from(path));
            }
            _ => rest.push(arg.clone()),
        }
    }
    Ok((options, rest))
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn positional(args: &[String], index: usize, name: &str) -> anyhow::Result<String> {
    args.get(index)
        .filter(|a| !a.starts_with("--"))
        .cloned()
        .with_context(|| format!("missing <{name}>"))
}

async fn connect(options: &GlobalOptions) -> anyhow::Result<RbmClient> {
    let config = match &options.config {
        Some(path) => ClientConfig::from_yaml_file(path)
            .with_context(|| format!("loading {}", path.display()))?
            .with_env_overrides(),
        None => ClientConfig::from_env(),
    };
    let client = RbmClient::builder().config(config).build()?;

    let material = match &options.key {
        Some(path) => Some(
            CredentialMaterial::from_json_file(path)
                .with_context(|| format!("reading key {}", path.display()))?,
        ),
        None => None,
    };
    client.initialize(material).await.context("initialize")?;
    Ok(client)
}

async fn run(options: &GlobalOptions, command: &str, args: &[String]) -> anyhow::Result<()> {
    let known = [
        "capability", "users", "invite", "typing", "read", "revoke", "send-text", "send-card",
        "upload",
    ];
    if !known.contains(&command) {
        print_usage();
        bail!("unknown command: {command}");
    }

    let client = connect(options).await?;

    let output = match command {
        "capability" => {
            let to = Msisdn::new(positional(args, 0, "msisdn")?);
            client.check_capability(&to).await?
        }
        "users" => {
            if args.is_empty() {
                bail!("users needs at least one <msisdn>");
            }
            let numbers: Vec<Msisdn> = args.iter().map(|a| Msisdn::new(a.as_str())).collect();
            client.get_users(&numbers).await?
        }
        "invite" => {
            let to = Msisdn::new(positional(args, 0, "msisdn")?);
            client.send_tester_invite(&to).await?
        }
        "typing" => {
            let to = Msisdn::new(positional(args, 0, "msisdn")?);
            let sent = client.send_is_typing(&to).await?;
            println!("event id: {}", sent.id);
            sent.response
        }
        "read" => {
            let to = Msisdn::new(positional(args, 0, "msisdn")?);
            let message_id = positional(args, 1, "message-id")?;
            let sent = client.send_read(&to, &message_id).await?;
            println!("event id: {}", sent.id);
            sent.response
        }
        "revoke" => {
            let to = Msisdn::new(positional(args, 0, "msisdn")?);
            let message_id = positional(args, 1, "message-id")?;
            client.revoke_message(&to, &message_id).await?
        }
        "send-text" => {
            let to = Msisdn::new(positional(args, 0, "msisdn")?);
            let text = positional(args, 1, "text")?;
            let sent = client.send_text(&to, TextMessage::new(text)).await?;
            println!("message id: {}", sent.id);
            sent.response
        }
        "send-card" => {
            let to = Msisdn::new(positional(args, 0, "msisdn")?);
            let mut card = StandaloneRichCard::new(positional(args, 1, "image-url")?);
            if let Some(title) = flag_value(args, "--title") {
                card = card.with_title(title);
            }
            if let Some(description) = flag_value(args, "--description") {
                card = card.with_description(description);
            }
            let sent = client.send_rich_card(&to, card).await?;
            println!("message id: {}", sent.id);
            sent.response
        }
        "upload" => {
            let url = positional(args, 0, "file-url")?;
            client.upload_file(&FileUpload::new(url)).await?
        }
        other => bail!("unknown command: {other}"),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
