use anyhow::{Context as _, Result, anyhow};
use chrono::Timelike;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use common::{BASE_URL, ChannelRecord, Fetcher, HttpFetcher, ProgramEntry};
use processor_channels::{ChannelListExtractor, find_by_name};
use processor_schedule::{ProgramScheduleExtractor, timeline};
use processor_video::{PlayerKeys, VideoUrlExtractor};
use scraper_engine::ScraperEngine;

use crate::output;

#[derive(Parser, Debug)]
#[command(name = "vikstv", version, about = "Channel list, schedules and video addresses from the viks.tv portal")]
pub struct Cli {
    /// Portal root address; also the channel list page.
    #[arg(long, global = true, default_value = BASE_URL)]
    pub base_url: String,

    /// Request timeout in seconds.
    #[arg(long, global = true, default_value_t = 30)]
    pub timeout: u64,

    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// JSON file with the player keys (defaults to the VIKSTV_KEYS variable).
    #[arg(long, global = true)]
    pub keys_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List all channels.
    Channels,
    /// Show the program schedule of a channel page.
    Schedule { page_url: String },
    /// Resolve the playable video address of a channel page.
    Video { page_url: String },
    /// Find a channel by name, then load its schedule and video address.
    Watch { name: String },
}

/// 命令运行时共享的配置
pub struct Context {
    fetcher: Arc<dyn Fetcher>,
    base_url: String,
    json: bool,
    keys_file: Option<PathBuf>,
}

impl Context {
    pub fn new(cli: &Cli, fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            base_url: cli.base_url.clone(),
            json: cli.json,
            keys_file: cli.keys_file.clone(),
        }
    }

    fn keys(&self) -> Result<PlayerKeys> {
        match &self.keys_file {
            Some(path) => PlayerKeys::from_file(path),
            None => Ok(PlayerKeys::from_env()),
        }
    }
}

pub async fn run(cli: Cli) -> Result<String> {
    let fetcher = HttpFetcher::with_timeout(Duration::from_secs(cli.timeout))
        .context("failed to build HTTP client")?;
    let context = Context::new(&cli, Arc::new(fetcher));
    execute(&context, &cli.command).await
}

pub async fn execute(context: &Context, command: &Command) -> Result<String> {
    match command {
        Command::Channels => {
            let channels = load_channels(context).await?;
            output::render_channels(&channels, context.json)
        }
        Command::Schedule { page_url } => {
            let programs = load_schedule(context, page_url).await?;
            let (hour, minute) = local_time();
            output::render_schedule(&programs, &timeline(&programs, hour, minute), context.json)
        }
        Command::Video { page_url } => {
            let url = load_video_url(context, page_url).await?;
            output::render_video(&url, context.json)
        }
        Command::Watch { name } => watch(context, name).await,
    }
}

async fn load_channels(context: &Context) -> Result<Arc<Vec<ChannelRecord>>> {
    let extractor = ChannelListExtractor::new(&context.base_url);
    let engine = ScraperEngine::new(
        extractor.index_url().to_string(),
        extractor,
        Arc::clone(&context.fetcher),
    );

    engine.load().await.context("failed to load the channel list")
}

async fn load_schedule(context: &Context, page_url: &str) -> Result<Arc<Vec<ProgramEntry>>> {
    let engine = ScraperEngine::new(
        page_url,
        ProgramScheduleExtractor,
        Arc::clone(&context.fetcher),
    );

    engine
        .load()
        .await
        .with_context(|| format!("failed to load the schedule from {}", page_url))
}

async fn load_video_url(context: &Context, page_url: &str) -> Result<Arc<String>> {
    let extractor = VideoUrlExtractor::new(&context.keys()?);
    let engine = ScraperEngine::new(page_url, extractor, Arc::clone(&context.fetcher));

    engine
        .load()
        .await
        .with_context(|| format!("failed to resolve the video address from {}", page_url))
}

/// 找到频道后同时加载节目单和视频地址
async fn watch(context: &Context, name: &str) -> Result<String> {
    let channels = load_channels(context).await?;
    let channel = find_by_name(&channels, name)
        .ok_or_else(|| anyhow!("channel {:?} not found among {} channels", name, channels.len()))?;

    log::info!("Loading {} from {}", channel.name, channel.page_address);

    let (schedule, video) = tokio::join!(
        load_schedule(context, &channel.page_address),
        load_video_url(context, &channel.page_address),
    );

    // 没有视频地址就无法观看；节目单失败只提示
    let video = video?;
    let schedule = match schedule {
        Ok(programs) => Some(programs),
        Err(e) => {
            log::warn!("{:#}", e);
            None
        }
    };

    let (hour, minute) = local_time();
    let timeline = schedule
        .as_deref()
        .map(|programs| timeline(programs, hour, minute));

    output::render_watch(
        channel,
        &video,
        schedule.as_deref().map(Vec::as_slice),
        timeline.as_ref(),
        context.json,
    )
}

fn local_time() -> (u32, u32) {
    let now = chrono::Local::now();
    (now.hour(), now.minute())
}
