#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! CLI for querying a Cloud Mail mailbox over its public API

use clap::{Parser, Subcommand};
use cloudmail_client::workflow::{self, Outcome, Save};
use cloudmail_client::{
    AppConfig, CloudMailClient, MailType, Message, QueryFilter, SortOrder, mask_secret,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cloudmail-cli")]
#[command(about = "Fetch mail from a Cloud Mail service via its public API")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch the latest message matching the configured filters
    Run {
        /// Do not save the match to disk
        #[arg(long)]
        no_save: bool,

        /// File to write (default: emails_<timestamp>.json)
        #[arg(long, conflicts_with = "no_save")]
        output: Option<PathBuf>,
    },

    /// Query one page of the mail list
    List {
        /// Recipient mailbox (default: configured recipient)
        #[arg(long)]
        to: Option<String>,

        /// Filter by sender address
        #[arg(long)]
        from: Option<String>,

        /// Filter by sender name
        #[arg(long)]
        sender_name: Option<String>,

        /// Filter by subject on the server
        #[arg(long)]
        subject: Option<String>,

        /// Filter by body content on the server
        #[arg(long)]
        content: Option<String>,

        /// Filter by subject locally (case-insensitive substring)
        #[arg(long)]
        local_subject: Option<String>,

        /// Oldest first
        #[arg(long)]
        asc: bool,

        /// Query sent mail instead of received mail
        #[arg(long)]
        sent: bool,

        /// Page number
        #[arg(long, default_value = "1")]
        page: u32,

        /// Page size (at most 20)
        #[arg(long, default_value = "20")]
        size: u32,
    },

    /// Acquire a token and print it masked
    Token,

    /// Show the loaded configuration
    Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = AppConfig::from_env()?;
    let client = CloudMailClient::from_config(&config)?;

    match &args.command {
        Command::Run { no_save, output } => {
            let save = if *no_save {
                Save::No
            } else {
                output.as_deref().map_or(Save::Timestamped, Save::To)
            };
            cmd_run(&client, &config, &args, save).await?;
        }
        Command::List {
            to,
            from,
            sender_name,
            subject,
            content,
            local_subject,
            asc,
            sent,
            page,
            size,
        } => {
            let mut filter = QueryFilter::new(to.as_deref().unwrap_or_else(|| config.recipient()))
                .sort_order(if *asc { SortOrder::Asc } else { SortOrder::Desc })
                .mail_type(if *sent { MailType::Sent } else { MailType::Received })
                .page(*page)
                .page_size(*size);
            filter.sender_email.clone_from(from);
            filter.sender_name.clone_from(sender_name);
            filter.subject.clone_from(subject);
            filter.body_contains.clone_from(content);

            cmd_list(&client, &config, &args, &filter, local_subject.as_deref()).await?;
        }
        Command::Token => {
            cmd_token(&client, &config).await?;
        }
        Command::Config => {
            print_config(&config);
        }
    }

    Ok(())
}

async fn cmd_run(
    client: &CloudMailClient,
    config: &AppConfig,
    args: &Args,
    save: Save<'_>,
) -> anyhow::Result<()> {
    let session = match client.acquire(&config.credentials).await {
        Ok(session) => session,
        Err(e) => {
            stage(args, &format!("[fail] Token request failed: {e}"));
            return Err(e.into());
        }
    };
    stage(args, "[ok] Token acquired");

    match &workflow::run_with_session(client, &session, config, save).await? {
        Outcome::Saved { message, path } => {
            stage(args, "[ok] Latest message fetched");
            print_latest(args, message)?;
            stage(args, &format!("[ok] Message saved: {}", path.display()));
        }
        Outcome::Found { message } => {
            stage(args, "[ok] Latest message fetched");
            print_latest(args, message)?;
        }
        Outcome::Empty => {
            stage(args, "[info] No matching messages found");
        }
        Outcome::QueryFailed { code, message } => {
            stage(args, &format!("[fail] Query failed ({code}): {message}"));
        }
    }

    Ok(())
}

/// Progress line. Goes to stderr in JSON mode so stdout stays parseable.
fn stage(args: &Args, line: &str) {
    if args.json {
        eprintln!("{line}");
    } else {
        println!("{line}");
    }
}

async fn cmd_list(
    client: &CloudMailClient,
    config: &AppConfig,
    args: &Args,
    filter: &QueryFilter,
    local_subject: Option<&str>,
) -> anyhow::Result<()> {
    let session = client.acquire(&config.credentials).await?;
    let mut page = client.fetch(&session, filter).await?;
    if let Some(target) = local_subject {
        page = page.filter_subject(target);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&page.messages)?);
    } else {
        print_message_table(&page.messages);
    }

    Ok(())
}

async fn cmd_token(client: &CloudMailClient, config: &AppConfig) -> anyhow::Result<()> {
    let session = client.acquire(&config.credentials).await?;
    let token = session.token().unwrap_or_default();
    println!("[ok] Token: {}", mask_secret(token, 8));
    Ok(())
}

fn print_config(config: &AppConfig) {
    let creds = &config.credentials;
    println!("API:");
    println!("  Base URL:   {}", config.base_url);
    println!("  Email:      {}", creds.email);
    println!("  Password:   {}", mask_secret(&creds.password, 4));
    println!("  JWT secret: {}", mask_secret(&creds.signing_secret, 8));
    println!();
    println!("Query:");
    match &config.to_email {
        Some(to) => println!("  Recipient:  {to}"),
        None => println!("  Recipient:  {} (default)", creds.email),
    }
    if let Some(from) = &config.send_email {
        println!("  Sender:     {from}");
    }
    if let Some(subject) = &config.subject {
        println!("  Subject:    {subject}");
    }
    println!("  Local filter: {}", config.local_filter);
}

fn print_latest(args: &Args, message: &Message) -> anyhow::Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(message)?);
    } else {
        print_message_detail(message);
    }
    Ok(())
}

fn print_message_table(messages: &[Message]) {
    if messages.is_empty() {
        println!("No emails found.");
        return;
    }

    let header = format!("{:<20} {:<30} {}", "Date", "From", "Subject");
    println!("{header}");
    println!("{}", "-".repeat(90));

    for message in messages {
        let date = message.received_at().map_or_else(
            || message.create_time.clone().unwrap_or_default(),
            |ts| ts.format("%Y-%m-%d %H:%M").to_string(),
        );
        println!(
            "{:<20} {:<30} {}",
            date,
            truncate(&message.sender(), 28),
            truncate(&message.subject, 40),
        );
    }

    println!("\n{} email(s)", messages.len());
}

fn print_message_detail(message: &Message) {
    println!("Date:    {}", message.create_time.as_deref().unwrap_or("-"));
    println!("From:    {}", message.sender());
    println!("To:      {}", message.to_email.as_deref().unwrap_or("-"));
    println!("Subject: {}", message.subject);
    println!("\n--- Body ---\n");
    println!("{}", message.body());
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}
