//! newsbrief CLI binary entry point.

use std::sync::Arc;

use clap::Parser;
use newsbrief::cli::{log_sources, Cli, Commands, FetchArgs, RunArgs};
use newsbrief::config::BriefConfig;
use newsbrief::hooks::{logging, HookPipeline};
use newsbrief::runtime::{
    briefing_prompt, system_prompt, AgentRuntime, ReplayRuntime, SessionRequest,
};
use newsbrief::session::{ConsoleSink, EventDispatcher, SessionOutcome, ToolCall, ToolGateway};
use newsbrief::tools::Toolset;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.log_filter())),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let result = match cli.command {
        Commands::Run(args) => handle_run(config, args).await,
        Commands::Fetch(args) => handle_fetch(config, args).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn build_gateway(config: &BriefConfig) -> newsbrief::error::Result<ToolGateway> {
    let mut hooks = HookPipeline::new();
    logging::register_defaults(&mut hooks, &config.tool_name)?;
    Ok(ToolGateway::new(
        Arc::new(Toolset::from_config(config)?),
        Arc::new(hooks),
    ))
}

async fn handle_run(config: BriefConfig, args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let gateway = build_gateway(&config)?;
    let hooks = gateway.hooks().clone();
    let urls = args.urls_or_default();
    tracing::info!(urls = urls.len(), debug = config.debug, "starting briefing");
    log_sources(&urls);

    let request = SessionRequest::builder()
        .prompt(briefing_prompt(&urls, &config.tool_name))
        .system_prompt(system_prompt(
            chrono::Local::now().date_naive(),
            &config.tool_name,
        ))
        .cwd(config.working_dir())
        .env(config.env.clone())
        .gateway(gateway)
        .build();

    let runtime = ReplayRuntime::from_path(args.transcript.clone());
    let events = runtime.start(request).await?;
    let mut dispatcher = EventDispatcher::new(hooks, ConsoleSink::stdio(), config.debug);

    match dispatcher.run(events).await? {
        SessionOutcome::Succeeded(_) => Ok(()),
        SessionOutcome::Failed(report) => {
            Err(format!("session ended with {}", report.subtype.as_str()).into())
        }
        SessionOutcome::Exhausted => Err("event stream ended without a result".into()),
    }
}

async fn handle_fetch(
    config: BriefConfig,
    args: FetchArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let gateway = build_gateway(&config)?;
    let call = ToolCall {
        id: uuid::Uuid::new_v4().to_string(),
        name: gateway.toolset().qualified_name(&config.tool_name),
        input: serde_json::json!({ "url": args.url }),
    };
    let result = gateway.call_tool("cli", &call).await;
    if result.is_error {
        return Err(result.text_content().into());
    }
    println!("{}", result.text_content());
    Ok(())
}
