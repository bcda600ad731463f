use std::io::{self, BufRead, Write};
use std::sync::Arc;

use ai_client::Claude;
use anyhow::Result;
use chrono::{TimeZone, Utc};
use clap::Parser;
use relief_clock::ScenarioClock;
use relief_common::Config;
use relief_extractor::{Extractor, FallbackExtractor, LlmExtractor};
use relief_network::RoadNetwork;
use relief_pipeline::{PipelineConfig, QueryPipeline, TimeoutExtractor, TimeoutRouter};
use relief_router::{ExternalRouter, HttpExternalRouter, NullExternalRouter};
use relief_sources::{
    load_supply_depots, OfficialAdapter, SatelliteAdapter, ShelterReportAdapter, SocialAdapter,
    SourceAdapter,
};

const CLAUDE_MODEL: &str = "claude-sonnet-4-5-20250929";
const DEMO_QUERY: &str = "Need 200 cases of water and 50 blankets delivered from Asheville Regional Airport, urgent.";

#[derive(Parser)]
#[command(name = "relief-cli", about = "Disaster-relief logistics coordinator")]
struct Cli {
    /// Run one canned query against the configured datasets and exit.
    #[arg(long)]
    demo: bool,

    /// Print the raw JSON response instead of the rendered reasoning.
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    relief_common::logging::init();

    let config = Config::from_env();
    config.log_redacted();

    let cli = Cli::parse();
    let pipeline = build_pipeline(&config);
    let mut clock = ScenarioClock::starting_at(
        Utc.with_ymd_and_hms(2024, 9, 27, 6, 0, 0).single().expect("valid timestamp"),
    );

    if cli.demo {
        let response = pipeline.run(DEMO_QUERY, clock.now()).await?;
        print_response(&response, cli.json)?;
        return Ok(());
    }

    interactive_loop(&pipeline, &mut clock, cli.json).await
}

fn build_pipeline(config: &Config) -> QueryPipeline {
    let adapters: Vec<Box<dyn SourceAdapter>> = vec![
        Box::new(SatelliteAdapter::new(
            config.satellite_path.clone(),
            config.satellite_agent_weight,
        )),
        Box::new(SocialAdapter::new(config.social_path.clone())),
        Box::new(OfficialAdapter::new(config.bulletin_path.clone())),
        Box::new(ShelterReportAdapter::new(config.shelters_path.clone())),
    ];

    let gazetteer = load_supply_depots(&config.shelters_path);

    let inner_extractor: Arc<dyn Extractor> = match &config.anthropic_api_key {
        Some(key) => {
            tracing::info!("extractor: LLM-backed (Claude) with keyword fallback");
            Arc::new(LlmExtractor::new(Claude::new(key.clone(), CLAUDE_MODEL), gazetteer.clone()))
        }
        None => {
            tracing::info!("extractor: deterministic keyword parser (no ANTHROPIC_API_KEY)");
            Arc::new(FallbackExtractor::new(gazetteer.clone()))
        }
    };
    let extractor = Box::new(TimeoutExtractor::new(
        inner_extractor,
        gazetteer,
        config.extractor_timeout,
    ));

    let inner_router: Arc<dyn ExternalRouter> = match &config.router_url {
        Some(url) => {
            tracing::info!(url = %url, "router: external HTTP collaborator with internal-graph preference");
            Arc::new(HttpExternalRouter::new(url.clone(), config.router_api_key.clone()))
        }
        None => {
            tracing::info!("router: no RELIEF_ROUTER_URL set, external tier disabled");
            Arc::new(NullExternalRouter)
        }
    };
    let router = Box::new(TimeoutRouter::new(inner_router, config.router_timeout));

    let graph = RoadNetwork::load_geojson(&config.roads_path).unwrap_or_else(|| {
        tracing::warn!(path = %config.roads_path, "no road network loaded, starting with an empty graph");
        RoadNetwork::empty()
    });

    let pipeline_config = PipelineConfig::from_common(config);
    QueryPipeline::new(
        adapters,
        extractor,
        router,
        graph,
        config.shelters_path.clone(),
        pipeline_config,
    )
}

async fn interactive_loop(pipeline: &QueryPipeline, clock: &mut ScenarioClock, json: bool) -> Result<()> {
    println!("Disaster-relief logistics coordinator. Type a query, `time <hours>` to advance the scenario clock, or `quit` to exit.");
    let stdin = io::stdin();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.eq_ignore_ascii_case("quit") {
            break;
        }
        if let Some(hours) = line.strip_prefix("time ") {
            match hours.trim().parse::<f64>() {
                Ok(h) => {
                    clock.advance(h);
                    let new_reports = pipeline.gather_new(clock).await;
                    println!("scenario time is now {}", clock.now());
                    if new_reports.is_empty() {
                        println!("nothing new since the last tick");
                    } else {
                        println!("{} new report(s) since the last tick:", new_reports.len());
                        for report in &new_reports {
                            println!("  [{}] {} ({}): {}", report.timestamp, report.kind, report.source, report.description);
                        }
                    }
                }
                Err(_) => println!("usage: time <hours>"),
            }
            continue;
        }

        let response = pipeline.run(line, clock.now()).await?;
        print_response(&response, json)?;
    }
    Ok(())
}

fn print_response(response: &relief_pipeline::QueryResponse, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(response)?);
    } else {
        println!("{}", response.reasoning);
    }
    Ok(())
}
