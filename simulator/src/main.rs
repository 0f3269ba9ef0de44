use anyhow::Context;
use bridge::server::{bridge_bind_address, FrameBridge};
use clap::Parser;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod bridge;
mod generator;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Offline driver for the ray-traced radar core")]
struct Args {
    /// Run the workflow once and print a detection summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    #[arg(long, default_value_t = 20)]
    ticks: usize,
    #[arg(long, default_value_t = 1500)]
    points_per_second: u32,
    #[arg(long, default_value_t = 100.0)]
    range: f32,
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Serve the latest packed frame over HTTP until Ctrl+C
    #[arg(long, default_value_t = false)]
    serve: bool,
    #[arg(long, default_value_t = 9000)]
    port: u16,
    /// Also print the run metrics as JSON
    #[arg(long, default_value_t = false)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(args.ticks, args.points_per_second, args.range, args.seed)
    };

    let runner = Runner::new(workflow_config.clone());
    let bridge = FrameBridge::new();
    if args.serve {
        bridge.serve(bridge_bind_address(args.port));
    }

    if args.offline || args.serve {
        let result = runner.execute_with(|tick, output, frame| bridge.publish(tick, output, frame))?;
        let detections: usize = result.ticks.iter().map(|t| t.detections).sum();
        let returned: usize = result.ticks.iter().map(|t| t.returned_rays).sum();

        println!(
            "Offline run -> ticks {}, detections {}, self-returns {}, faulted rays {}, overflows {}",
            result.ticks.len(),
            detections,
            returned,
            result.metrics.faulted_rays,
            result.metrics.capacity_overflows
        );
        println!(
            "Last frame -> {} bytes, depth mean {:.2} m, depth max {:.2} m, velocity rms {:.2} m/s",
            result.last_frame.len(),
            result.depth_mean,
            result.depth_max,
            result.velocity_rms
        );
        if args.json {
            let metrics = serde_json::to_string_pretty(&result.metrics)
                .context("serializing run metrics")?;
            println!("{}", metrics);
        }
        bridge.publish_status("Workflow results ready.");
    }

    if args.serve {
        bridge.publish_status("HTTP bridge running (Ctrl+C to stop)...");
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
