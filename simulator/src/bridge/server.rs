use crate::bridge::model::FrameSummary;
use anyhow::Context;
use log::{debug, error, info};
use rtradar::interface::TickOutput;
use rtradar::s11n::DetectionSerializer;
use std::{
    net::SocketAddr,
    sync::{Arc, PoisonError, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::Filter;

pub fn bridge_bind_address(port: u16) -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], port))
}

#[derive(Debug, Default)]
struct BridgeState {
    summary: FrameSummary,
    frame: Vec<u8>,
}

type SharedState = Arc<RwLock<BridgeState>>;

/// Holds the latest packed frame and serves it to consumer processes over HTTP.
#[derive(Clone, Default)]
pub struct FrameBridge {
    state: SharedState,
}

impl FrameBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts `GET /frame` (packed detections) and `GET /summary` (JSON) on a background thread.
    pub fn serve(&self, address: SocketAddr) {
        let state = Arc::clone(&self.state);
        let state_filter = warp::any().map(move || Arc::clone(&state));

        let frame_route = warp::path("frame")
            .and(warp::path::end())
            .and(warp::get())
            .and(state_filter.clone())
            .map(|state: SharedState| {
                let frame = state
                    .read()
                    .unwrap_or_else(PoisonError::into_inner)
                    .frame
                    .clone();
                warp::reply::with_header(frame, "content-type", "application/octet-stream")
            });

        let summary_route = warp::path("summary")
            .and(warp::path::end())
            .and(warp::get())
            .and(state_filter)
            .map(|state: SharedState| {
                let guard = state.read().unwrap_or_else(PoisonError::into_inner);
                warp::reply::json(&guard.summary)
            });

        thread::spawn(move || {
            let routes = frame_route.or(summary_route);
            match Builder::new_current_thread().enable_all().build() {
                Ok(runtime) => runtime.block_on(async move {
                    warp::serve(routes).run(address).await;
                }),
                Err(err) => error!("frame bridge runtime failed to start: {}", err),
            }
        });
        info!("frame bridge listening on http://{}", address);
    }

    /// Replaces the served frame. The frame is decoded first so malformed data never goes out.
    pub fn publish(&self, tick: usize, output: &TickOutput, frame: &[u8]) -> anyhow::Result<()> {
        let measurement = DetectionSerializer::unpack(frame).context("decoding published frame")?;
        let summary = FrameSummary::new(tick, output, &measurement, frame.len());
        debug!(
            "tick {} -> {} detections ({} bytes)",
            tick,
            summary.detections,
            frame.len()
        );

        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        guard.summary = summary;
        guard.frame.clear();
        guard.frame.extend_from_slice(frame);
        Ok(())
    }

    pub fn publish_status(&self, message: &str) {
        println!("[bridge] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> (FrameSummary, Vec<u8>) {
        let guard = self.state.read().unwrap_or_else(PoisonError::into_inner);
        (guard.summary.clone(), guard.frame.clone())
    }
}
