//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `freshlist_core` linkage.
//! - Optionally summarize a snapshot file: `freshlist_cli [snapshot.json]`.

use chrono::Local;
use freshlist_core::{
    build_month_grid, AggregateMode, ExpirationPolicy, PantryService, YearMonth,
};

fn main() {
    println!("freshlist_core ping={}", freshlist_core::ping());
    println!("freshlist_core version={}", freshlist_core::core_version());

    // Only this boundary reads the wall clock.
    let now = Local::now();
    let service = PantryService::new(ExpirationPolicy::new(Local));
    let grid = build_month_grid(YearMonth::of(now.date_naive()));
    println!(
        "month={} grid_cells={} days={}",
        grid.year_month(),
        grid.cells().len(),
        grid.day_count()
    );

    let Some(path) = std::env::args().nth(1) else {
        return;
    };
    let payload = match std::fs::read_to_string(&path) {
        Ok(payload) => payload,
        Err(err) => {
            eprintln!("failed to read `{path}`: {err}");
            std::process::exit(1);
        }
    };
    let ticket = service.begin_fetch();
    let items = match service.accept_snapshot(ticket, &payload) {
        Ok(items) => items,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(1);
        }
    };

    match service.week_view(&items, &now, AggregateMode::Grouped) {
        Ok(view) => {
            println!(
                "week={} expiring={} rejected={}",
                view.week.label(),
                view.result.entries.len(),
                view.result.rejected.len()
            );
            for entry in &view.result.entries {
                if let Some(expiration) = entry.expiration() {
                    println!(
                        "  {} x{} {}",
                        expiration.at.format("%Y-%m-%d %H:%M"),
                        entry.count(),
                        entry.name()
                    );
                }
            }
        }
        Err(err) => eprintln!("week view failed: {err}"),
    }

    let summary = service.status_summary(&items, &now);
    println!(
        "expired={} today={} soon={} fresh={} unknown={} rejected={}",
        summary.expired,
        summary.expires_today,
        summary.expiring_soon,
        summary.fresh,
        summary.unknown,
        summary.rejected
    );
}
