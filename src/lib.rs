//! newsbrief: streaming session driver for a fetch-tool briefing agent.
//!
//! An external agent runtime plans the work and emits an ordered stream of
//! session events. This crate consumes that stream ([`session::EventDispatcher`]),
//! renders incremental output, gates every tool call through a hook pipeline
//! ([`hooks::HookPipeline`], [`session::ToolGateway`]), and provides the one
//! tool the agent is allowed to use: a reader-endpoint page fetcher
//! ([`tools::FetchTool`]).
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use newsbrief::prelude::*;
//!
//! # async fn example() -> newsbrief::error::Result<()> {
//! let config = BriefConfig::default().from_env()?;
//! let mut hooks = HookPipeline::new();
//! newsbrief::hooks::logging::register_defaults(&mut hooks, &config.tool_name)?;
//! let hooks = Arc::new(hooks);
//!
//! let gateway = ToolGateway::new(Arc::new(Toolset::from_config(&config)?), hooks.clone());
//! let request = SessionRequest::builder()
//!     .prompt("Brief me on https://example.com")
//!     .cwd(config.working_dir())
//!     .gateway(gateway)
//!     .build();
//!
//! let events = ReplayRuntime::from_path("session.ndjson").start(request).await?;
//! let outcome = EventDispatcher::new(hooks, ConsoleSink::stdio(), config.debug)
//!     .run(events)
//!     .await?;
//! println!("{}", outcome.is_success());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod hooks;
pub mod prelude;
pub mod runtime;
pub mod session;
pub mod tools;
pub mod types;
pub mod util;

#[cfg(feature = "cli")]
pub mod cli;
