//! Hello Fairy simulator — drives the engine against an emulated controller.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  Adapters (outer ring)                   │
//! │                                                          │
//! │  SimulatedDevice   EmbassyClock   LogChangeSink          │
//! │  (Link)            (Clock)        (ChangeSink)           │
//! │                                                          │
//! │  ────────────── Port Trait Boundary ────────────────     │
//! │                                                          │
//! │  ┌────────────────────────────────────────────────┐      │
//! │  │        ProtocolEngine (pure logic)             │      │
//! │  │  DeviceState · AckTracker · EffectCatalog      │      │
//! │  └────────────────────────────────────────────────┘      │
//! │                                                          │
//! │  NotificationInbox ──▶ run_notifications (spawned task)  │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Usage: `hello-fairy-sim [config.json]`. Set `RUST_LOG=debug` to see the
//! frames on the wire.

use anyhow::{Context, Result};
use edge_executor::LocalExecutor;
use log::{info, warn};

use hello_fairy::adapters::log_sink::LogChangeSink;
use hello_fairy::adapters::sim_link::SimulatedDevice;
use hello_fairy::adapters::time::EmbassyClock;
use hello_fairy::app::commands::LightRequest;
use hello_fairy::app::ports::{ChangeSink, Clock};
use hello_fairy::config::EngineConfig;
use hello_fairy::protocol::channels::NotificationInbox;
use hello_fairy::protocol::link::Link;
use hello_fairy::{EffectOutcome, ProtocolEngine};

fn load_config() -> Result<EngineConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(EngineConfig::default());
    };
    let json = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let config = EngineConfig::from_json(&json).with_context(|| format!("loading {path}"))?;
    info!("Config loaded from {}", path);
    Ok(config)
}

/// A short session touching every control path.
async fn demo<L: Link, C: Clock, S: ChangeSink>(
    engine: &ProtocolEngine<L, C, S>,
) -> hello_fairy::Result<()> {
    engine.connect().await?;

    engine
        .turn_on(&LightRequest::default().with_rgb(255, 120, 0))
        .await?;
    engine.set_brightness(30).await?;

    match engine.set_effect("Fireworks").await? {
        EffectOutcome::Applied(preset) => info!("Effect Fireworks -> preset {}", preset),
        EffectOutcome::Unrecognized => warn!("Fireworks missing from catalog"),
    }
    if engine.set_effect("Disco Inferno").await? == EffectOutcome::Unrecognized {
        info!("Unknown effect left the state untouched");
    }

    engine.set_color_rgb(0, 0, 0).await?;
    engine.turn_off().await?;
    engine.disconnect().await;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("Hello Fairy simulator v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;
    let inbox = NotificationInbox::new();
    let engine = ProtocolEngine::new(
        config,
        SimulatedDevice::new(&inbox),
        EmbassyClock::new(),
        LogChangeSink::new(),
    );

    let executor: LocalExecutor<'_, 8> = LocalExecutor::new();
    executor.spawn(engine.run_notifications(&inbox)).detach();

    futures_lite::future::block_on(executor.run(demo(&engine)))?;

    println!("{}", serde_json::to_string_pretty(&engine.snapshot())?);
    Ok(())
}
