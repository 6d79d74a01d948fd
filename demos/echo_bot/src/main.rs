//! Echo Bot Example
//!
//! A console bot built on Jelly. Every line read from stdin is treated as a
//! message and every reply is printed back.
//!
//! # Commands
//!
//! With the default `JC` prefix and space delimiter:
//!
//! ```text
//! JC echo <text>          Repeat the text ("JC e" works too)
//! JC ping                 Pong!
//! JC calc <n>             Square a number
//! JC calc <a> <b>         Add two numbers
//! JC group                Only in group channels
//! JC help                 List every command
//! ```
//!
//! # Usage
//!
//! ```bash
//! cargo run --package echo-bot -- --channel group-public
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use jelly::prelude::*;
use jelly::runtime::MemoryUsageSink;
use tokio::io::{AsyncBufReadExt, BufReader};

const ECHO: FeatureTag = FeatureTag::new("txt_echo", "Repeat the given text.");
const CALC: FeatureTag = FeatureTag::new("calc", "Simple arithmetic.");

#[derive(Debug, Parser)]
#[command(about = "Console echo bot")]
struct Cli {
    /// Configuration file; defaults to searching for jelly.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Channel kind the console pretends to be.
    #[arg(long, value_enum, default_value_t = Channel::Private)]
    channel: Channel,

    /// Sender identity.
    #[arg(long, default_value = "console")]
    user: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Channel {
    Private,
    GroupPrivate,
    GroupPublic,
}

impl From<Channel> for ChannelKind {
    fn from(channel: Channel) -> Self {
        match channel {
            Channel::Private => ChannelKind::PrivateText,
            Channel::GroupPrivate => ChannelKind::GroupPrivateText,
            Channel::GroupPublic => ChannelKind::GroupPublicText,
        }
    }
}

// ============================================================================
// Handler Functions
// ============================================================================

async fn echo(_ctx: CommandContext, args: Args) -> Result<String, ArgumentError> {
    Ok(args.text(0)?.to_string())
}

async fn ping(_ctx: CommandContext, _args: Args) -> &'static str {
    "Pong!"
}

async fn square(_ctx: CommandContext, args: Args) -> Result<String, ArgumentError> {
    let n = args.float(0)?;
    Ok(format!("{n} squared is {}", n * n))
}

async fn add(_ctx: CommandContext, args: Args) -> Result<String, ArgumentError> {
    let (a, b) = (args.float(0)?, args.float(1)?);
    Ok(format!("{a} + {b} = {}", a + b))
}

async fn group_info(ctx: CommandContext, _args: Args) -> String {
    format!(
        "This is a group-only command!\n• Channel: {}\n• User: {}",
        ctx.channel_id(),
        ctx.user_id()
    )
}

async fn help(ctx: CommandContext, _args: Args) -> Result<String, TreeError> {
    let lines: Vec<String> = ctx
        .tree()
        .list_handlers(NodeId::ROOT, true)?
        .into_iter()
        .map(|listing| format!("{} - {}", listing.usage, listing.description))
        .collect();
    Ok(lines.join("\n"))
}

fn register_commands(tree: &mut CommandTree) -> TreeResult<()> {
    let echo_node = tree.add_child(NodeId::ROOT, NodeSpec::new(["echo", "e"]).order(0))?;
    tree.register(
        echo_node,
        HandlerSpec::new()
            .param(Param::text("text"))
            .arg_help(["Text to repeat; quote it to keep spaces"])
            .feature(ECHO),
        echo,
    )?;

    let ping_node = tree.add_child(NodeId::ROOT, NodeSpec::new(["ping"]).order(1))?;
    tree.register(ping_node, HandlerSpec::new().description("Pong!"), ping)?;

    let calc_node = tree.add_child(NodeId::ROOT, NodeSpec::new(["calc"]).order(2))?;
    tree.register(
        calc_node,
        HandlerSpec::new().param(Param::float("n")).feature(CALC),
        square,
    )?;
    tree.register(
        calc_node,
        HandlerSpec::new()
            .params([Param::float("a"), Param::float("b")])
            .feature(CALC),
        add,
    )?;

    let group_node = tree.add_child(NodeId::ROOT, NodeSpec::new(["group"]).order(3))?;
    tree.register(
        group_node,
        HandlerSpec::new()
            .scope(CommandScope::group_only())
            .description("Show group channel info."),
        group_info,
    )?;

    let help_node = tree.add_child(NodeId::ROOT, NodeSpec::new(["help", "h"]).order(4))?;
    tree.register(
        help_node,
        HandlerSpec::new().description("List every command."),
        help,
    )
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder = JellyRuntime::builder().with_logging();
    if let Some(path) = &cli.config {
        builder = builder.config_file(path);
    }

    let usage = MemoryUsageSink::new();
    let runtime = builder.usage_sink(usage.clone()).build(register_commands)?;
    let channel_kind = ChannelKind::from(cli.channel);

    info!(
        prefix = %runtime.tree().prefix(),
        channel_kind = %channel_kind,
        "Echo bot ready, type commands below"
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let event = TextEvent::new(line, channel_kind, "console", cli.user.as_str());
                for reply in runtime.handle(event).await {
                    println!("{reply}");
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    runtime.shutdown().await;
    info!(commands_used = usage.len(), "Echo bot stopped");

    Ok(())
}
