//! island: smallest scenario for the business-recovery digital twin.
//!
//! A barrier island joined to the mainland by one bridge.  A storm on day 1
//! knocks the bridge out and damages half the island's homes; the bridge is
//! partly reopened on day 8 and fully on day 14, and homes are repaired by
//! day 20.  Three businesses feel it through labor, customers, and their
//! one supplier on the mainland.
//!
//! Usage: `island [config.json]`, where the optional JSON file is a
//! `SimConfig`, e.g. `{"total_ticks": 60, "seed": 3}`.
//!
//! Set `RUST_LOG=debug` to see every model's per-tick logging.

mod simulator;

use std::io::Cursor;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};

use br_business::{BusinessParams, WorldBuilder};
use br_core::{
    ComponentId, Diagnostics, DistributionSchedule, ExposureId, LinkKind, NodeId, SimConfig,
    SimRng, Tick, TripId,
};
use br_output::{CsvWriter, SimOutputObserver};
use br_sim::{ComponentUpdate, ScheduledRecovery, SimBuilder};
use br_traffic::{
    MemoryTripStore, TrafficDistributionModel, TripRegistry, TripRow, load_node_map_reader,
};

use simulator::IslandSimulator;

// ── Constants ─────────────────────────────────────────────────────────────────

const SEED:                  u64 = 7;
const SIM_DAYS:              u64 = 30;
const OUTPUT_INTERVAL_TICKS: u64 = 5;
const CUSTOMER_INTERVAL:     u64 = 7;

// ── Embedded inputs ───────────────────────────────────────────────────────────

/// Island exposures are below 100, mainland ones above.  Each building sits
/// on the node with its own number.
const NODE_MAP_CSV: &str = "\
AIM_id,closest_node\n\
1,1\n2,2\n3,3\n4,4\n5,5\n6,6\n10,10\n11,11\n\
101,101\n102,102\n103,103\n104,104\n110,110\n120,120\n\
";

const BUSINESSES_JSON: &str = r#"[
    {
        "CompanyName": "Island Grocer",
        "NumEmployees": 4,
        "SalesVolume": 730000.0,
        "SupplierLocations": [120],
        "EmployeeLocations": [1, 2, 101, 102],
        "VisitorHomeCBGs": {"ISLAND": 0.7, "Others": 0.3}
    },
    {
        "CompanyName": "Mainland Hardware",
        "NumEmployees": 3,
        "SalesVolume": 1095000.0,
        "SupplierLocations": [120],
        "EmployeeLocations": [3, 103, 104],
        "VisitorHomeCBGs": {"MAINLAND": 0.5, "ISLAND": 0.3, "Others": 0.2}
    },
    {
        "CompanyName": "Harbor Cafe",
        "NumEmployees": 2,
        "SalesVolume": 365000.0,
        "EmployeeLocations": [4, 5]
    }
]"#;

/// Home exposure of each business in `BUSINESSES_JSON`, in order.
const BUSINESS_HOMES: [u32; 3] = [10, 110, 11];

/// Background commuter trips from the regional travel survey.
fn background_trips() -> Vec<TripRow> {
    [(1, 101), (2, 102), (5, 110), (6, 103), (102, 104), (104, 6)]
        .into_iter()
        .enumerate()
        .map(|(i, (o, d))| TripRow {
            agent_id:      TripId(i as u64 + 1),
            origin_nid:    NodeId(o),
            destin_nid:    NodeId(d),
            hour:          7,
            quarter:       (i % 4) as u8,
            tour_category: "COMMUTE".into(),
            person_id:     i as u64 + 1,
        })
        .collect()
}

// ── Scenario ──────────────────────────────────────────────────────────────────

struct Island {
    world:         br_business::World,
    bridge:        ComponentId,
    damaged_homes: Vec<ComponentId>,
}

fn build_island() -> Result<Island> {
    let mut w = WorldBuilder::new();
    let mut damaged_homes = Vec::new();
    for e in 1..=6 {
        let id = w.add_building(format!("island home {e}"), ExposureId(e), "ISLAND", 4.0, Some(4.0));
        if e <= 3 {
            damaged_homes.push(id);
        }
    }
    for e in 101..=104 {
        w.add_building(format!("mainland home {e}"), ExposureId(e), "MAINLAND", 4.0, Some(4.0));
    }
    w.add_building("warehouse", ExposureId(120), "MAINLAND", 0.0, None);

    let params: Vec<BusinessParams> =
        serde_json::from_str(BUSINESSES_JSON).context("parsing business parameters")?;
    let mut homes = Vec::with_capacity(BUSINESS_HOMES.len());
    for e in BUSINESS_HOMES {
        let zone = if e < 100 { "ISLAND" } else { "MAINLAND" };
        homes.push(w.add_building(format!("storefront {e}"), ExposureId(e), zone, 0.0, None));
    }
    for (home, p) in homes.into_iter().zip(params) {
        w.add_business(home, p);
    }

    let bridge = w.add_link("bridge", LinkKind::Bridge);
    w.add_link("causeway road", LinkKind::Roadway);

    Ok(Island { world: w.build()?, bridge, damaged_homes })
}

fn storm(island: &Island) -> ScheduledRecovery {
    let mut recovery = ScheduledRecovery::new()
        .at(Tick(1), ComponentUpdate::functionality(island.bridge, 0.0))
        .at(Tick(8), ComponentUpdate::functionality(island.bridge, 0.6))
        .at(Tick(14), ComponentUpdate::functionality(island.bridge, 1.0));
    for &home in &island.damaged_homes {
        recovery = recovery
            .at(Tick(1), ComponentUpdate::functionality(home, 0.4).with_shelter(1.0))
            .at(Tick(20), ComponentUpdate::functionality(home, 1.0).with_shelter(4.0));
    }
    recovery
}

/// Demo defaults, or the JSON file named on the command line.  Fields the
/// file omits take their `SimConfig::default()` values.
fn load_config() -> Result<SimConfig> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(SimConfig {
            start_unix_secs:       1_725_148_800, // 2024-09-01 00:00 UTC
            total_ticks:           SIM_DAYS,
            seed:                  SEED,
            output_interval_ticks: OUTPUT_INTERVAL_TICKS,
            ..SimConfig::default()
        });
    };
    let text = std::fs::read_to_string(&path).with_context(|| format!("reading {path}"))?;
    let config: SimConfig =
        serde_json::from_str(&text).with_context(|| format!("parsing {path}"))?;
    anyhow::ensure!(config.total_ticks > 0, "total_ticks must be at least 1");
    Ok(config)
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = load_config()?;
    let days = config.total_ticks;

    println!("=== island: business recovery digital twin ===");
    println!("Days: {days}  |  Seed: {}", config.seed);
    println!();

    // 1. World and storm timeline.
    let island = build_island()?;
    let recovery = storm(&island);
    println!(
        "World: {} components, {} businesses, {} scheduled updates",
        island.world.components.len(),
        island.world.businesses.len(),
        recovery.len()
    );

    // 2. Traffic: node map, OD table, simulator.
    let mut diagnostics = Diagnostics::new("node map");
    let node_map = load_node_map_reader(Cursor::new(NODE_MAP_CSV), &mut diagnostics)?;
    let registry = TripRegistry::open(Box::new(MemoryTripStore::new(background_trips())))?;

    let traffic = TrafficDistributionModel::new(
        "Traffic",
        DistributionSchedule::always(days),
        IslandSimulator::default(),
        registry,
        node_map,
        config.trip_cutoff_ratio,
    )?
    .with_demand_adjustment(SimRng::new(config.seed).child(1), &[]);

    // 3. Build sim.
    let mut sim = SimBuilder::new(config.clone(), island.world, traffic, recovery)
        .labor(DistributionSchedule::always(days))
        .customers(DistributionSchedule::every(CUSTOMER_INTERVAL, days))
        .commodities(DistributionSchedule::always(days))
        .build()?;
    println!("OD table: {} trips after wiring", sim.traffic.registry().len());

    // 4. Output.
    let out_dir = Path::new("output/island");
    std::fs::create_dir_all(out_dir)?;
    let writer = CsvWriter::new(out_dir)?;
    let mut obs = SimOutputObserver::new(writer, &config);

    // 5. Run.
    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();
    if let Some(e) = obs.take_error() {
        eprintln!("output error: {e}");
    }

    // 6. Summary.
    let res = &sim.resilience;
    println!();
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  lost revenue   : {:.0}", res.lost_revenue());
    if let Some(low) = res.min_snapshot() {
        println!(
            "  low point      : day {} at {:.0}% of baseline",
            low.tick.0,
            low.revenue_ratio() * 100.0
        );
    }
    match res.recovery_tick(0.95) {
        Some(t) => println!("  recovered (95%): day {}", t.0),
        None => println!("  recovered (95%): not within {days} days"),
    }
    println!("  diagnostics    : {}", sim.diagnostic_count() + diagnostics.len());
    println!();

    let last = days - 1;
    println!("{:<20} {:>8} {:>8} {:>8}", "Business", "Day 1", "Day 10", format!("Day {last}"));
    println!("{}", "-".repeat(48));
    for b in &sim.world.businesses {
        // NaN for days past the end of a short run.
        let at = |d: u64| b.functionality_at(Tick(d)).unwrap_or(f64::NAN);
        println!(
            "{:<20} {:>8.2} {:>8.2} {:>8.2}",
            b.params.company_name,
            at(1),
            at(10),
            at(last)
        );
    }

    Ok(())
}
