use std::path::Path;

use thiserror::Error;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};
use tracing::{debug, info};

use crate::source::{PacketEvent, PacketSource, PcapFileSource, SourceError};
use crate::{DEFAULT_GENERATED_AT, DecodeConfig, InputInfo, Report, make_stub_report};

mod dissect;
mod frames;

pub use dissect::{DecodeError, Dissection, Transport, dissect_frame};

use dissect::dissect_into;
use frames::{ErrorTally, FrameCounters, build_frame_record};

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Source error: {0}")]
    Source(#[from] SourceError),
}

/// Decode every frame of a PCAP/PCAPNG file into a report.
pub fn analyze_capture_file(path: &Path, config: &DecodeConfig) -> Result<Report, AnalysisError> {
    let input = InputInfo {
        path: path.display().to_string(),
        bytes: path.metadata()?.len(),
    };
    let source = PcapFileSource::open(path)?;
    analyze_source(input, source, config)
}

/// Decode every frame produced by `source` into a report.
///
/// Frames that fail to decode are kept in the report with the layers that
/// did decode and the error that stopped them.
pub fn analyze_source<S: PacketSource>(
    input: InputInfo,
    mut source: S,
    config: &DecodeConfig,
) -> Result<Report, AnalysisError> {
    let mut counters = FrameCounters::default();
    let mut errors = ErrorTally::default();
    let mut frames = Vec::new();
    let mut first_ts = None;
    let mut last_ts = None;

    while let Some(PacketEvent { ts, linktype, data }) = source.next_packet()? {
        let index = counters.frames_total;
        update_ts_bounds(&mut first_ts, &mut last_ts, ts);

        let mut dissection = Dissection::default();
        let (supported, error) = match dissect_into(linktype, &data, config, &mut dissection) {
            Ok(supported) => (supported, None),
            Err(err) => {
                debug!(index, id = err.id(), %err, "frame failed to decode");
                errors.add(&err, index);
                (true, Some(err))
            }
        };

        counters.add(supported, &dissection, error.is_some());
        frames.push(build_frame_record(
            index,
            ts_to_rfc3339(ts),
            data.len(),
            &dissection,
            error.as_ref(),
        ));
    }

    info!(
        frames = counters.frames_total,
        failed = counters.failed_frames,
        "capture decoded"
    );

    let mut report = make_stub_report(input, *config);
    let time_start = ts_to_rfc3339(first_ts);
    let time_end = ts_to_rfc3339(last_ts);
    report.generated_at = time_end
        .clone()
        .or_else(|| time_start.clone())
        .unwrap_or_else(|| DEFAULT_GENERATED_AT.to_string());
    report.capture_summary = Some(counters.into_summary(time_start, time_end));
    report.frames = frames;
    report.errors = errors.into_summaries();
    Ok(report)
}

fn update_ts_bounds(first: &mut Option<f64>, last: &mut Option<f64>, ts: Option<f64>) {
    let Some(ts) = ts else {
        return;
    };
    if first.is_none_or(|existing| ts < existing) {
        *first = Some(ts);
    }
    if last.is_none_or(|existing| ts > existing) {
        *last = Some(ts);
    }
}

fn ts_to_rfc3339(ts: Option<f64>) -> Option<String> {
    let ts = ts?;
    let nanos = (ts * 1_000_000_000.0).round() as i128;
    OffsetDateTime::from_unix_timestamp_nanos(nanos)
        .ok()
        .and_then(|dt| dt.format(&Rfc3339).ok())
}
