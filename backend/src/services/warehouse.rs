//! Warehouse location graph maintenance
//!
//! Reference-data CRUD for warehouses, zones and locations. Deactivation is a
//! soft flag; pipeline records keep their foreign keys and the ledger keeps
//! its history.

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use shared::models::{Location, LocationType, Warehouse, WarehouseType, Zone};
use shared::validation::validate_ref_code;

#[derive(Clone)]
pub struct WarehouseService {
    db: PgPool,
}

/// Input for creating a warehouse
#[derive(Debug, Deserialize, Validate)]
pub struct CreateWarehouseInput {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(length(min = 1, max = 20))]
    pub code: String,
    pub warehouse_type: Option<WarehouseType>,
    pub contact_person: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 20))]
    pub phone: Option<String>,
    pub address: Option<String>,
    pub note: Option<String>,
}

/// Input for creating a zone
#[derive(Debug, Deserialize)]
pub struct CreateZoneInput {
    pub warehouse_id: Uuid,
    pub name: String,
    pub code: String,
    pub temp_min: Option<Decimal>,
    pub temp_max: Option<Decimal>,
    pub max_volume: Option<Decimal>,
    pub volume_uom_id: Option<Uuid>,
}

/// Input for creating a location
#[derive(Debug, Deserialize)]
pub struct CreateLocationInput {
    pub zone_id: Uuid,
    pub code: String,
    pub name: String,
    pub location_type: Option<LocationType>,
    pub barcode: Option<String>,
    pub max_volume: Option<Decimal>,
    pub max_gross_weight: Option<Decimal>,
    pub weight_uom_id: Option<Uuid>,
}

const WAREHOUSE_COLUMNS: &str = "id, branch_id, name, code, warehouse_type, contact_person, email, \
                                 phone, address, note, active, user_add, created_at, updated_at";

const ZONE_COLUMNS: &str = "id, branch_id, warehouse_id, name, code, temp_min, temp_max, max_volume, \
                            volume_uom_id, active, user_add, created_at, updated_at";

const LOCATION_COLUMNS: &str = "id, branch_id, zone_id, code, name, location_type, barcode, \
                                max_volume, max_gross_weight, weight_uom_id, active, user_add, \
                                created_at, updated_at";

impl WarehouseService {
    /// Create a new WarehouseService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a warehouse
    pub async fn create_warehouse(
        &self,
        branch_id: Uuid,
        user_id: Uuid,
        input: CreateWarehouseInput,
    ) -> AppResult<Warehouse> {
        input
            .validate()
            .map_err(|e| AppError::ValidationError(e.to_string()))?;

        let duplicate = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM warehouses WHERE branch_id = $1 AND code = $2)",
        )
        .bind(branch_id)
        .bind(&input.code)
        .fetch_one(&self.db)
        .await?;

        if duplicate {
            return Err(AppError::DuplicateEntry("warehouse code".to_string()));
        }

        let warehouse = sqlx::query_as::<_, Warehouse>(&format!(
            r#"
            INSERT INTO warehouses (branch_id, name, code, warehouse_type, contact_person, email,
                                    phone, address, note, user_add)
            VALUES ($1, $2, $3, COALESCE($4, 'own'), $5, $6, $7, $8, $9, $10)
            RETURNING {WAREHOUSE_COLUMNS}
            "#,
        ))
        .bind(branch_id)
        .bind(&input.name)
        .bind(&input.code)
        .bind(input.warehouse_type)
        .bind(&input.contact_person)
        .bind(&input.email)
        .bind(&input.phone)
        .bind(&input.address)
        .bind(&input.note)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(warehouse)
    }

    /// List warehouses for the branch
    pub async fn list_warehouses(&self, branch_id: Uuid) -> AppResult<Vec<Warehouse>> {
        let warehouses = sqlx::query_as::<_, Warehouse>(&format!(
            "SELECT {WAREHOUSE_COLUMNS} FROM warehouses WHERE branch_id = $1 AND active ORDER BY code",
        ))
        .bind(branch_id)
        .fetch_all(&self.db)
        .await?;

        Ok(warehouses)
    }

    /// Get a warehouse
    pub async fn get_warehouse(&self, branch_id: Uuid, warehouse_id: Uuid) -> AppResult<Warehouse> {
        sqlx::query_as::<_, Warehouse>(&format!(
            "SELECT {WAREHOUSE_COLUMNS} FROM warehouses WHERE id = $1 AND branch_id = $2",
        ))
        .bind(warehouse_id)
        .bind(branch_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Warehouse".to_string()))
    }

    /// Soft-deactivate a warehouse
    pub async fn deactivate_warehouse(&self, branch_id: Uuid, warehouse_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE warehouses SET active = FALSE, updated_at = NOW() WHERE id = $1 AND branch_id = $2",
        )
        .bind(warehouse_id)
        .bind(branch_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Warehouse".to_string()));
        }

        Ok(())
    }

    /// Create a zone within a warehouse
    pub async fn create_zone(
        &self,
        branch_id: Uuid,
        user_id: Uuid,
        input: CreateZoneInput,
    ) -> AppResult<Zone> {
        validate_ref_code(&input.code, 20).map_err(|msg| AppError::Validation {
            field: "code".to_string(),
            message: msg.to_string(),
        })?;

        self.get_warehouse(branch_id, input.warehouse_id).await?;

        if let (Some(min), Some(max)) = (input.temp_min, input.temp_max) {
            if min > max {
                return Err(AppError::Validation {
                    field: "temp_min".to_string(),
                    message: "Minimum temperature exceeds maximum".to_string(),
                });
            }
        }

        let zone = sqlx::query_as::<_, Zone>(&format!(
            r#"
            INSERT INTO zones (branch_id, warehouse_id, name, code, temp_min, temp_max, max_volume,
                               volume_uom_id, user_add)
            VALUES ($1, $2, $3, $4, $5, $6, COALESCE($7, 0), $8, $9)
            RETURNING {ZONE_COLUMNS}
            "#,
        ))
        .bind(branch_id)
        .bind(input.warehouse_id)
        .bind(&input.name)
        .bind(&input.code)
        .bind(input.temp_min)
        .bind(input.temp_max)
        .bind(input.max_volume)
        .bind(input.volume_uom_id)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(zone)
    }

    /// List zones under a warehouse
    pub async fn list_zones(&self, branch_id: Uuid, warehouse_id: Uuid) -> AppResult<Vec<Zone>> {
        let zones = sqlx::query_as::<_, Zone>(&format!(
            r#"
            SELECT {ZONE_COLUMNS} FROM zones
            WHERE warehouse_id = $1 AND branch_id = $2 AND active
            ORDER BY code
            "#,
        ))
        .bind(warehouse_id)
        .bind(branch_id)
        .fetch_all(&self.db)
        .await?;

        Ok(zones)
    }

    /// Create a location within a zone
    pub async fn create_location(
        &self,
        branch_id: Uuid,
        user_id: Uuid,
        input: CreateLocationInput,
    ) -> AppResult<Location> {
        validate_ref_code(&input.code, 30).map_err(|msg| AppError::Validation {
            field: "code".to_string(),
            message: msg.to_string(),
        })?;

        let zone_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM zones WHERE id = $1 AND branch_id = $2)",
        )
        .bind(input.zone_id)
        .bind(branch_id)
        .fetch_one(&self.db)
        .await?;

        if !zone_exists {
            return Err(AppError::NotFound("Zone".to_string()));
        }

        let location = sqlx::query_as::<_, Location>(&format!(
            r#"
            INSERT INTO locations (branch_id, zone_id, code, name, location_type, barcode,
                                   max_volume, max_gross_weight, weight_uom_id, user_add)
            VALUES ($1, $2, $3, $4, COALESCE($5, 'STORAGE'), $6, COALESCE($7, 0), COALESCE($8, 0), $9, $10)
            RETURNING {LOCATION_COLUMNS}
            "#,
        ))
        .bind(branch_id)
        .bind(input.zone_id)
        .bind(&input.code)
        .bind(&input.name)
        .bind(input.location_type)
        .bind(&input.barcode)
        .bind(input.max_volume)
        .bind(input.max_gross_weight)
        .bind(input.weight_uom_id)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(location)
    }

    /// List locations, optionally filtered by zone or type
    pub async fn list_locations(
        &self,
        branch_id: Uuid,
        zone_id: Option<Uuid>,
        location_type: Option<LocationType>,
    ) -> AppResult<Vec<Location>> {
        let locations = sqlx::query_as::<_, Location>(&format!(
            r#"
            SELECT {LOCATION_COLUMNS} FROM locations
            WHERE branch_id = $1 AND active
              AND ($2::uuid IS NULL OR zone_id = $2)
              AND ($3::location_type IS NULL OR location_type = $3)
            ORDER BY code
            "#,
        ))
        .bind(branch_id)
        .bind(zone_id)
        .bind(location_type)
        .fetch_all(&self.db)
        .await?;

        Ok(locations)
    }

    /// Get a location
    pub async fn get_location(&self, branch_id: Uuid, location_id: Uuid) -> AppResult<Location> {
        sqlx::query_as::<_, Location>(&format!(
            "SELECT {LOCATION_COLUMNS} FROM locations WHERE id = $1 AND branch_id = $2",
        ))
        .bind(location_id)
        .bind(branch_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Location".to_string()))
    }

    /// Soft-deactivate a location
    pub async fn deactivate_location(&self, branch_id: Uuid, location_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE locations SET active = FALSE, updated_at = NOW() WHERE id = $1 AND branch_id = $2",
        )
        .bind(location_id)
        .bind(branch_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Location".to_string()));
        }

        Ok(())
    }
}
