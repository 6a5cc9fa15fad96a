//! Parceltrack command implementations

use anyhow::{Context, Result};
use serde_json::{json, Value};
use tracing::{debug, info};

use parceltrack_agent::tools::register_default_tools;
use parceltrack_agent::{RouteTable, StatusIngest, SupportDesk, ToolRegistry};
use parceltrack_bus::{NoticeDispatcher, StatusUpdate, TrackingBus};
use parceltrack_config::{self, Config};
use parceltrack_tracking::{TrackingStore, TrackingSummary};

/// Courier milestones walked by the simulation, in order
const SIMULATED_MILESTONES: [(&str, &str); 4] = [
    ("picked_up", "Depot"),
    ("in_transit", "Hub"),
    ("out_for_delivery", "Van"),
    ("delivered", "Door"),
];

const CITIES: [&str; 5] = ["Casablanca", "Rabat", "Marrakech", "Fes", "Agadir"];

fn store_for(config: &Config) -> TrackingStore {
    TrackingStore::with_not_found_message(&config.tracking.not_found_message)
}

fn registry_for(store: &TrackingStore, routes: &RouteTable) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    register_default_tools(&mut registry, store.clone(), routes.clone());
    registry
}

async fn call_tool(registry: &ToolRegistry, name: &str, args: Value) -> Result<Value> {
    let output = registry
        .execute(name, args)
        .await
        .map_err(|e| anyhow::anyhow!("{} failed: {}", name, e))?;
    serde_json::from_str(&output).with_context(|| format!("{} returned invalid JSON", name))
}

fn section(title: &str) {
    println!("\n◆ {}", title);
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━");
}

fn print_summary(summary: &TrackingSummary) {
    println!("Parcels: {}", summary.total_parcels);
    println!("Events:  {}", summary.total_events);
    for (status, count) in &summary.by_status {
        println!("  {:<18} {}", status, count);
    }
}

/// Initialize config
pub async fn init_command() -> Result<()> {
    println!("◆ Initializing Parceltrack...");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let config = parceltrack_config::init().await?;

    println!("Config:   {}", parceltrack_config::config_path().display());
    println!("Carrier:  {}", config.carrier());
    println!("Routes:   {}", config.network.routes.len());

    println!("\n◆ Parceltrack initialized");
    println!("\nNext steps:");
    println!("  - Run the walkthrough:  parceltrack demo");
    println!("  - Look up a route:      parceltrack routes --from Casablanca --to Rabat");

    Ok(())
}

/// Show configuration status
pub fn status_command(config: &Config) -> Result<()> {
    let config_path = parceltrack_config::config_path();

    println!("◆ Parceltrack Status");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    println!(
        "Config:    {} {}",
        config_path.display(),
        if config_path.exists() {
            "[OK]"
        } else {
            "[Missing]"
        }
    );
    println!("Carrier:   {}", config.carrier());
    println!("Routes:    {}", config.network.routes.len());
    println!("Notices:   {}", config.support.notice_channel);
    println!("Escalate:  {}", config.support.escalate_to);
    println!("Log level: {}", config.log_level());

    println!("\n◆ Ready");

    Ok(())
}

/// Scripted walkthrough of tracking, intercity booking, ingest and support
pub async fn demo_command(config: &Config) -> Result<()> {
    let store = store_for(config);
    let routes = RouteTable::from_config(&config.network);
    let registry = registry_for(&store, &routes);
    let desk = SupportDesk::new(store.clone(), config.support.escalate_to.as_str());

    section("Milestone tracking");
    for (status, location) in [
        ("picked_up", "Casablanca Depot"),
        ("in_transit", "En route to Rabat"),
    ] {
        let result = call_tool(
            &registry,
            "update_parcel_status",
            json!({"parcel_id": "PKG_123", "status": status, "location": location}),
        )
        .await?;
        println!(
            "PKG_123 -> {} at {} (#{})",
            result["latest_event"]["status"].as_str().unwrap_or_default(),
            result["latest_event"]["location"].as_str().unwrap_or_default(),
            result["latest_event"]["sequence"]
        );
    }
    let current = call_tool(&registry, "get_parcel_status", json!({"parcel_id": "PKG_123"})).await?;
    println!("{}", serde_json::to_string_pretty(&current)?);

    section("Intercity transfer");
    store.update_status("PKG_001", "picked_up", "Casablanca Depot", "3 kg, medium")?;
    let booking = call_tool(
        &registry,
        "book_ctm_transport",
        json!({
            "parcel_id": "PKG_001",
            "origin_city": "Casablanca",
            "destination_city": "Marrakech",
            "parcel_details": {"weight_kg": 3.0, "size": "medium"}
        }),
    )
    .await?;
    println!(
        "Booking {}: {} ({} MAD)",
        booking["booking_id"].as_str().unwrap_or_default(),
        booking["status"].as_str().unwrap_or_default(),
        booking["cost_mad"]
    );
    let eta = call_tool(
        &registry,
        "estimate_intercity_eta",
        json!({"origin_city": "Casablanca", "destination_city": "Marrakech"}),
    )
    .await?;
    println!(
        "ETA: {}h, arriving {}",
        eta["estimated_duration_hours"],
        eta["estimated_arrival"].as_str().unwrap_or_default()
    );

    section("Carrier updates");
    let (bus, update_rx, notice_rx) = TrackingBus::channels();
    let ingest = StatusIngest::new(
        store.clone(),
        bus.notice_sender(),
        config.support.notice_channel.as_str(),
    );
    let mut dispatcher = NoticeDispatcher::new(notice_rx);
    dispatcher.on_channel(config.support.notice_channel.as_str(), |notice| {
        println!("[notice] {}", notice.content);
    });
    let ingest_handle = tokio::spawn(ingest.run(update_rx));
    let dispatch_handle = tokio::spawn(dispatcher.run());

    bus.publish_update(StatusUpdate::new(
        "ctm_marrakech",
        "PKG_001",
        "in_transit",
        "CTM_Depot_Marrakech",
    ))?;
    bus.publish_update(
        StatusUpdate::new("courier_rba_007", "PKG_123", "delivered", "Rabat Agdal")
            .with_notes("Signed by recipient"),
    )?;
    drop(bus);

    let report = ingest_handle.await?;
    let delivered = dispatch_handle.await?;
    debug!("Ingest applied {}, dispatcher delivered {}", report.applied, delivered);

    section("Customer support");
    println!("Q: Where is my package? (PKG_123)");
    println!("A: {}", desk.answer("Where is my package?", Some("PKG_123")));
    let history = desk.describe_history("PKG_123");
    println!("Tracking history ({} events):", history.len());
    for line in history {
        println!("  - {}", line);
    }
    println!("Q: Where is my package? (NONEXISTENT)");
    println!("A: {}", desk.answer("Where is my package?", Some("NONEXISTENT")));
    let escalation = desk.escalate("NONEXISTENT", "Customer reports missing parcel");
    println!(
        "Escalated to {} as {}",
        escalation.escalated_to, escalation.ticket_id
    );

    section("Analytics");
    print_summary(&store.summary());

    Ok(())
}

/// Concurrent couriers publishing through the bus into a single ingest
pub async fn simulate_command(config: &Config, couriers: usize, parcels: usize) -> Result<()> {
    anyhow::ensure!(couriers > 0, "at least one courier is required");

    info!(
        "Simulating {} couriers over {} parcels",
        couriers, parcels
    );

    let store = store_for(config);
    let (bus, update_rx, notice_rx) = TrackingBus::channels();
    let ingest = StatusIngest::new(
        store.clone(),
        bus.notice_sender(),
        config.support.notice_channel.as_str(),
    );
    let mut dispatcher = NoticeDispatcher::new(notice_rx);
    dispatcher.on_channel(config.support.notice_channel.as_str(), |notice| {
        debug!("[notice] {}", notice.content);
    });
    let ingest_handle = tokio::spawn(ingest.run(update_rx));
    let dispatch_handle = tokio::spawn(dispatcher.run());

    let mut workers = Vec::with_capacity(couriers);
    for courier in 0..couriers {
        let bus = bus.clone();
        workers.push(tokio::spawn(async move {
            let source = format!("courier_{:03}", courier + 1);
            let assigned: Vec<usize> = (courier..parcels).step_by(couriers).collect();
            for (status, place) in SIMULATED_MILESTONES {
                for &parcel in &assigned {
                    let city = CITIES[parcel % CITIES.len()];
                    bus.publish_update(StatusUpdate::new(
                        source.as_str(),
                        format!("PKG_{:04}", parcel + 1),
                        status,
                        format!("{} {}", city, place),
                    ))?;
                }
                tokio::task::yield_now().await;
            }
            Ok::<usize, anyhow::Error>(assigned.len() * SIMULATED_MILESTONES.len())
        }));
    }
    drop(bus);

    let mut published = 0;
    for worker in workers {
        published += worker.await??;
    }
    let report = ingest_handle.await?;
    let notices = dispatch_handle.await?;

    let summary = store.summary();

    section("Simulation");
    println!("Couriers:  {}", couriers);
    println!("Published: {}", published);
    println!("Applied:   {}", report.applied);
    println!("Skipped:   {}", report.skipped);
    println!("Notices:   {}", notices);
    print_summary(&summary);

    anyhow::ensure!(
        summary.count("delivered") == parcels,
        "expected {} delivered parcels, found {}",
        parcels,
        summary.count("delivered")
    );

    Ok(())
}

/// Look up an intercity route and its travel estimate
pub fn routes_command(config: &Config, from: &str, to: &str) -> Result<()> {
    let routes = RouteTable::from_config(&config.network);
    let found = routes.routes(from, to);

    if found.is_empty() {
        println!("No {} route from {} to {}", routes.carrier(), from, to);
        return Ok(());
    }

    for route in found {
        println!(
            "{} {} -> {}: {} km, {}h, {} MAD ({})",
            route.carrier,
            route.origin,
            route.destination,
            route.distance_km,
            route.duration_hours,
            route.cost_mad,
            route.frequency
        );
    }

    let eta = routes.estimate_eta(from, to, chrono::Local::now())?;
    println!(
        "Leaving now arrives {}",
        eta.estimated_arrival.format("%Y-%m-%d %H:%M")
    );

    Ok(())
}

/// List agent tools
pub fn tools_command(config: &Config, json: bool) -> Result<()> {
    let store = store_for(config);
    let routes = RouteTable::from_config(&config.network);
    let definitions = registry_for(&store, &routes).definitions();

    if json {
        println!("{}", serde_json::to_string_pretty(&definitions)?);
        return Ok(());
    }

    println!("Tools:");
    for definition in definitions {
        println!(
            "  {:<24} {}",
            definition.function.name, definition.function.description
        );
    }

    Ok(())
}
