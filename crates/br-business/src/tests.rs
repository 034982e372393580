//! Unit tests for br-business.

use br_core::{BusinessId, ComponentId, ExposureId, LinkKind, Tick};

use crate::{Business, BusinessError, BusinessParams, CustomerShares, Factor, WorldBuilder};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// 365 000 annual sales → 1 000 per day.
fn params(employees: u32) -> BusinessParams {
    BusinessParams {
        company_name:   "Harbor Hardware".into(),
        employee_count: employees,
        annual_sales:   365_000.0,
        ..Default::default()
    }
}

fn business() -> Business {
    Business::new(BusinessId(0), ComponentId(0), params(10))
}

fn assert_close(a: f64, b: f64) {
    assert!((a - b).abs() < 1e-9, "{a} != {b}");
}

// ── Functionality aggregation ─────────────────────────────────────────────────

#[cfg(test)]
mod aggregation {
    use super::*;

    #[test]
    fn begin_timestep_applies_home_first() {
        let mut b = business();
        b.begin_timestep(Tick(0), 1.0).unwrap();
        assert_eq!(b.functionality_at(Tick(0)), Some(1.0));
        assert!(b.causal_log(Tick(0)).is_empty(), "non-binding home factor leaves no trace");

        b.begin_timestep(Tick(1), 0.7).unwrap();
        assert_eq!(b.functionality_at(Tick(1)), Some(0.7));
        assert_eq!(b.binding_factor(Tick(1)), Some(Factor::HomeComponent));
    }

    #[test]
    fn functionality_is_minimum_of_factors() {
        let mut b = business();
        b.begin_timestep(Tick(0), 1.0).unwrap();
        b.begin_timestep(Tick(1), 0.9).unwrap();
        b.apply_factor(Tick(1), 0.6, Factor::Labor).unwrap();
        b.apply_factor(Tick(1), 0.8, Factor::CustomerBase).unwrap();
        b.apply_factor(Tick(1), 0.95, Factor::Infrastructure).unwrap();
        assert_eq!(b.functionality_at(Tick(1)), Some(0.6));
    }

    #[test]
    fn only_binding_factors_are_logged() {
        let mut b = business();
        b.begin_timestep(Tick(0), 0.9).unwrap();
        assert!(b.apply_factor(Tick(0), 0.5, Factor::Labor).unwrap());
        assert!(!b.apply_factor(Tick(0), 0.7, Factor::CustomerBase).unwrap());
        assert!(b.apply_factor(Tick(0), 0.0, Factor::LocalSuppliers).unwrap());

        let log: Vec<_> = b.causal_log(Tick(0)).iter().map(|e| (e.factor, e.level)).collect();
        assert_eq!(
            log,
            vec![
                (Factor::HomeComponent, 0.9),
                (Factor::Labor, 0.5),
                (Factor::LocalSuppliers, 0.0),
            ]
        );
    }

    #[test]
    fn reset_each_timestep() {
        let mut b = business();
        b.begin_timestep(Tick(0), 1.0).unwrap();
        b.apply_factor(Tick(0), 0.2, Factor::Labor).unwrap();
        b.begin_timestep(Tick(1), 1.0).unwrap();
        assert_eq!(b.current_functionality(), 1.0);
        assert_eq!(b.functionality_at(Tick(0)), Some(0.2), "history is not edited");
    }

    #[test]
    fn retroactive_timestep_rejected() {
        let mut b = business();
        b.begin_timestep(Tick(3), 1.0).unwrap();
        let err = b.begin_timestep(Tick(3), 1.0).unwrap_err();
        assert!(matches!(err, BusinessError::RetroactiveTimestep { tick: Tick(3), .. }));
        assert!(b.begin_timestep(Tick(2), 1.0).is_err());
    }

    #[test]
    fn factor_outside_open_timestep_rejected() {
        let mut b = business();
        assert!(b.apply_factor(Tick(0), 0.5, Factor::Labor).is_err());
        b.begin_timestep(Tick(0), 1.0).unwrap();
        let err = b.apply_factor(Tick(1), 0.5, Factor::Labor).unwrap_err();
        assert!(matches!(err, BusinessError::TimestepNotOpen { open: Some(Tick(0)), .. }));
    }

    #[test]
    fn levels_are_clamped_and_nan_rejected() {
        let mut b = business();
        b.begin_timestep(Tick(0), 1.0).unwrap();
        assert!(!b.apply_factor(Tick(0), 1.4, Factor::CustomerBase).unwrap());
        b.apply_factor(Tick(0), -0.5, Factor::Labor).unwrap();
        assert_eq!(b.functionality_at(Tick(0)), Some(0.0));
        assert!(b.apply_factor(Tick(0), f64::NAN, Factor::Labor).is_err());
    }
}

// ── Revenue ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod revenue {
    use super::*;

    #[test]
    fn baseline_is_daily_sales() {
        let mut b = business();
        b.begin_timestep(Tick(0), 1.0).unwrap();
        assert_close(b.baseline_daily_revenue(), 1_000.0);
        assert_close(b.revenue_at(Tick(0)).unwrap(), 1_000.0);
    }

    #[test]
    fn revenue_tracks_tightest_constraint() {
        let mut b = business();
        b.begin_timestep(Tick(0), 1.0).unwrap();
        b.begin_timestep(Tick(5), 1.0).unwrap();
        b.apply_factor(Tick(5), 0.6, Factor::Labor).unwrap();
        assert_close(b.revenue_at(Tick(5)).unwrap(), 600.0);
        b.apply_factor(Tick(5), 0.9, Factor::CustomerBase).unwrap();
        assert_close(b.revenue_at(Tick(5)).unwrap(), 600.0);
    }

    #[test]
    fn revenue_never_exceeds_reference_and_never_increases_within_tick() {
        let mut b = business();
        b.begin_timestep(Tick(0), 1.0).unwrap();
        b.begin_timestep(Tick(1), 0.8).unwrap();
        let mut last = b.revenue_at(Tick(1)).unwrap();
        for level in [0.9, 0.5, 0.7, 0.3, 1.0] {
            b.apply_factor(Tick(1), level, Factor::Labor).unwrap();
            let r = b.revenue_at(Tick(1)).unwrap();
            assert!(r <= last + 1e-12);
            let cap = b.revenue_at(Tick(0)).unwrap() * b.functionality_at(Tick(1)).unwrap();
            assert!(r <= cap + 1e-9);
            last = r;
        }
        assert_close(last, 300.0);
    }
}

// ── Labor accounting ──────────────────────────────────────────────────────────

#[cfg(test)]
mod labor {
    use super::*;

    #[test]
    fn supply_before_any_distribution_is_zero() {
        let b = business();
        assert_eq!(b.employee_supply(), 0);
        assert_eq!(b.employee_demand(), 10);
        assert_eq!(b.employee_consumption(), 0);
    }

    #[test]
    fn supply_floors_latest_ratio() {
        let mut b = business();
        b.record_employee_availability(Tick(0), 1.0);
        b.record_employee_availability(Tick(2), 0.55);
        assert_eq!(b.employee_supply(), 5);
        assert_eq!(b.employee_consumption(), 5);
    }

    #[test]
    fn closed_business_demands_no_labor() {
        let mut b = business();
        b.begin_timestep(Tick(0), 0.0).unwrap();
        assert!(!b.needs_employees());
        assert_eq!(b.employee_demand(), 0);
    }
}

// ── Params ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod params {
    use super::*;

    #[test]
    fn deserialize_exposure_keys() {
        let json = r#"{
            "CompanyName": "Bayou Bakery",
            "NumEmployees": 12,
            "SalesVolume": 730000.0,
            "SupplierLocations": [7, 8],
            "EmployeeLocations": [1, 2, 3],
            "VisitorHomeCBGs": {"010970001001": 0.4, "010970001002": 0.35, "Others": 0.25}
        }"#;
        let p: BusinessParams = serde_json::from_str(json).unwrap();
        assert_eq!(p.employee_count, 12);
        assert_eq!(p.suppliers, vec![ExposureId(7), ExposureId(8)]);
        assert_eq!(p.employee_homes.len(), 3);
        assert_close(p.customers.others(), 0.25);
        assert_eq!(p.customers.zones().count(), 2);
        assert_close(p.customers.total(), 1.0);
    }

    #[test]
    fn missing_optional_keys_default() {
        let p: BusinessParams =
            serde_json::from_str(r#"{"NumEmployees": 1, "SalesVolume": 10.0}"#).unwrap();
        assert!(p.suppliers.is_empty());
        assert_eq!(p.customers, CustomerShares::default());
    }
}

// ── World ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod world {
    use super::*;

    #[test]
    fn build_links_buildings_and_businesses() {
        let mut w = WorldBuilder::new();
        let shop = w.add_building("shop", ExposureId(100), "Z1", 0.0, None);
        let bridge = w.add_link("bridge", LinkKind::Bridge);
        let b0 = w.add_business(shop, params(3));
        let b1 = w.add_business(shop, params(4));
        let world = w.build().unwrap();

        assert_eq!(world.component(shop).unwrap().businesses(), &[b0, b1]);
        assert!(world.component(bridge).unwrap().is_network_link());
        assert_eq!(world.business(b1).unwrap().home, shop);
        assert_eq!(world.building_by_exposure(ExposureId(100)).unwrap().id, shop);
        assert_eq!(world.home_exposure(world.business(b0).unwrap()), Some(ExposureId(100)));
    }

    #[test]
    fn business_on_link_rejected() {
        let mut w = WorldBuilder::new();
        let road = w.add_link("road", LinkKind::Roadway);
        w.add_business(road, params(1));
        assert!(matches!(w.build(), Err(BusinessError::HomeNotBuilding(_))));
    }

    #[test]
    fn duplicate_exposure_rejected() {
        let mut w = WorldBuilder::new();
        w.add_building("a", ExposureId(1), "Z", 1.0, Some(1.0));
        w.add_building("b", ExposureId(1), "Z", 1.0, Some(1.0));
        assert!(matches!(w.build(), Err(BusinessError::DuplicateExposure(ExposureId(1)))));
    }

    #[test]
    fn begin_timestep_applies_infrastructure_factor() {
        let mut w = WorldBuilder::new();
        let shop = w.add_building("shop", ExposureId(1), "Z1", 0.0, None);
        let b = w.add_business(shop, params(2));
        let mut world = w.build().unwrap();

        world.component_mut(shop).unwrap().functionality = 0.9;
        world.component_mut(shop).unwrap().met_demand = 0.4;
        world.begin_timestep(Tick(0)).unwrap();

        let business = world.business(b).unwrap();
        assert_eq!(business.functionality_at(Tick(0)), Some(0.4));
        assert_eq!(business.binding_factor(Tick(0)), Some(Factor::Infrastructure));
    }
}
