//! Plain-text rendering for the `check` and `replay` commands.

use std::fmt::Write;
use std::io;

use anyhow::Context;
use u_binfit_core::{AllocationResult, Bin, PlacementEvent, ProgressInfo, Shipment};
use u_binfit_ffi::SnapshotJson;

/// One-paragraph description of a validated request.
pub fn describe_inputs(shipments: &[Shipment], bins: &[Bin]) -> String {
    let units: usize = shipments.iter().map(Shipment::quantity).sum();
    let unrecognized = shipments
        .iter()
        .filter(|s| !s.rotation().is_recognized())
        .count();
    let available = bins.iter().filter(|b| b.is_available()).count();

    let mut out = String::new();
    let _ = writeln!(
        out,
        "Request OK: {} shipments ({} units), {} bins ({} available)",
        shipments.len(),
        units,
        bins.len(),
        available
    );
    if unrecognized > 0 {
        let _ = writeln!(
            out,
            "  {} shipment(s) use an unrecognized rotation_type and will never be placed",
            unrecognized
        );
    }
    out
}

/// One trace line for a unit commit.
pub fn trace_line(event: &PlacementEvent) -> String {
    format!(
        "#{:<4} {} -> {} [{}] ({} left)",
        event.sequence, event.shipment_name, event.bin_name, event.rotation, event.remaining
    )
}

/// Writes one snapshot JSON line for a unit commit.
pub fn write_snapshot(out: &mut impl io::Write, info: &ProgressInfo<'_>) -> anyhow::Result<()> {
    let line = serde_json::to_string(&SnapshotJson::from(info))
        .with_context(|| format!("Failed to encode snapshot {}", info.event.sequence))?;
    writeln!(out, "{}", line)
        .with_context(|| format!("Failed to write snapshot {}", info.event.sequence))
}

/// Per-bin fill table followed by the residual demand.
pub fn fill_summary(result: &AllocationResult) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "\nBins:");
    let _ = writeln!(out, "{:-<64}", "");
    for bin in &result.bins {
        let state = if bin.is_available() { "" } else { " (disabled)" };
        let _ = writeln!(
            out,
            "  {:<16} units={:<4} weight={:.1}/{:.1} filled={:.1}%{}",
            bin.name(),
            bin.items().len(),
            bin.current_weight(),
            bin.max_weight(),
            bin.fill_ratio() * 100.0,
            state
        );
    }

    if result.unfit.is_empty() {
        let _ = writeln!(out, "\nAll shipments placed.");
    } else {
        let _ = writeln!(out, "\nUnfit:");
        for record in &result.unfit {
            let _ = writeln!(out, "  {:<16} quantity={}", record.name, record.quantity);
        }
    }

    let summary = result.summary();
    let _ = writeln!(
        out,
        "\nPlaced {}/{} units in {} bins (weight {:.1}%, volume {:.1}%)",
        summary.total_placed,
        summary.total_requested,
        summary.bins_used,
        summary.weight_utilization_percent,
        summary.volume_utilization_percent
    );
    out
}
