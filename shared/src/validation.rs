//! Validation utilities for the Warehouse Execution Core

use rust_decimal::Decimal;

use crate::models::{HandlingUnit, Location};

// ============================================================================
// Code and label validations
// ============================================================================

/// Validate a handling unit code (external label, max 60 chars)
pub fn validate_hu_code(code: &str) -> Result<(), &'static str> {
    let code = code.trim();
    if code.is_empty() {
        return Err("Handling unit code is required");
    }
    if code.len() > 60 {
        return Err("Handling unit code must be at most 60 characters");
    }
    Ok(())
}

/// Validate a warehouse/zone/location code
pub fn validate_ref_code(code: &str, max_len: usize) -> Result<(), &'static str> {
    let code = code.trim();
    if code.is_empty() {
        return Err("Code is required");
    }
    if code.len() > max_len {
        return Err("Code exceeds maximum length");
    }
    Ok(())
}

// ============================================================================
// Weight / volume validations
// ============================================================================

/// Validate handling unit measurements: non-negative, net not above gross
pub fn validate_measurements(
    gross_weight: Decimal,
    net_weight: Decimal,
    volume: Decimal,
) -> Result<(), &'static str> {
    if gross_weight < Decimal::ZERO || net_weight < Decimal::ZERO || volume < Decimal::ZERO {
        return Err("Weights and volume cannot be negative");
    }
    if net_weight > gross_weight && gross_weight > Decimal::ZERO {
        return Err("Net weight cannot exceed gross weight");
    }
    Ok(())
}

/// Check whether a unit fits a location's capacity attributes.
///
/// A zero capacity attribute means the location is uncapped for that
/// dimension.
pub fn fits_location(unit: &HandlingUnit, location: &Location) -> bool {
    let volume_ok = location.max_volume == Decimal::ZERO || unit.volume <= location.max_volume;
    let weight_ok = location.max_gross_weight == Decimal::ZERO
        || unit.gross_weight <= location.max_gross_weight;
    volume_ok && weight_ok
}

// ============================================================================
// General validations
// ============================================================================

/// Validate an outbound order priority (1 = highest, 5 = lowest)
pub fn validate_priority(priority: i16) -> Result<(), &'static str> {
    if !(1..=5).contains(&priority) {
        return Err("Priority must be between 1 and 5");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HandlingUnit, HuStatus, HuType, Location, LocationType};
    use chrono::Utc;
    use proptest::prelude::*;
    use uuid::Uuid;

    fn unit(gross_weight: Decimal, volume: Decimal) -> HandlingUnit {
        let now = Utc::now();
        HandlingUnit {
            id: Uuid::new_v4(),
            branch_id: Uuid::new_v4(),
            shipment_id: Uuid::new_v4(),
            hu_code: "PLT-1".to_string(),
            hu_type: HuType::Pallet,
            status: HuStatus::Planned,
            gross_weight,
            net_weight: Decimal::ZERO,
            volume,
            weight_uom_id: None,
            volume_uom_id: None,
            container_no: None,
            seal_no: None,
            barcode: None,
            active: true,
            user_add: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn location(max_gross_weight: Decimal, max_volume: Decimal) -> Location {
        let now = Utc::now();
        Location {
            id: Uuid::new_v4(),
            branch_id: Uuid::new_v4(),
            zone_id: Uuid::new_v4(),
            code: "A-01-01".to_string(),
            name: "Rack A".to_string(),
            location_type: LocationType::Storage,
            barcode: None,
            max_volume,
            max_gross_weight,
            weight_uom_id: None,
            active: true,
            user_add: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn hu_code_rejects_blank_and_overlong() {
        assert!(validate_hu_code("PLT-0001").is_ok());
        assert!(validate_hu_code("   ").is_err());
        assert!(validate_hu_code(&"X".repeat(61)).is_err());
    }

    #[test]
    fn ref_code_length_bounds() {
        assert!(validate_ref_code("DOCK-01", 20).is_ok());
        assert!(validate_ref_code("", 20).is_err());
        assert!(validate_ref_code("  ", 20).is_err());
        assert!(validate_ref_code(&"A".repeat(21), 20).is_err());
        assert!(validate_ref_code(&"A".repeat(20), 20).is_ok());
    }

    #[test]
    fn capped_location_rejects_oversize_unit() {
        let heavy = unit(Decimal::new(1200, 0), Decimal::ONE);
        let bulky = unit(Decimal::ONE, Decimal::new(5, 0));
        let capped = location(Decimal::new(1000, 0), Decimal::new(2, 0));

        assert!(!fits_location(&heavy, &capped));
        assert!(!fits_location(&bulky, &capped));
        assert!(fits_location(&unit(Decimal::new(800, 0), Decimal::ONE), &capped));
    }

    #[test]
    fn measurements_reject_net_above_gross() {
        let ok = validate_measurements(Decimal::new(100, 0), Decimal::new(90, 0), Decimal::ONE);
        assert!(ok.is_ok());

        let bad = validate_measurements(Decimal::new(50, 0), Decimal::new(90, 0), Decimal::ONE);
        assert!(bad.is_err());
    }

    #[test]
    fn priority_bounds() {
        assert!(validate_priority(1).is_ok());
        assert!(validate_priority(5).is_ok());
        assert!(validate_priority(0).is_err());
        assert!(validate_priority(6).is_err());
    }

    proptest! {
        /// Zero capacity means uncapped for that dimension
        #[test]
        fn uncapped_location_fits_any_unit(volume in 0i64..1_000_000, weight in 0i64..1_000_000) {
            let unit = unit(Decimal::new(weight, 3), Decimal::new(volume, 6));
            let uncapped = location(Decimal::ZERO, Decimal::ZERO);

            prop_assert!(fits_location(&unit, &uncapped));
        }
    }
}
