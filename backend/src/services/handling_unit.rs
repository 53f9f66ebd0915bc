//! Handling unit registry
//!
//! Units are created during shipment planning in PLANNED status; every status
//! change after that goes through the move ledger. This service only touches
//! descriptive attributes and the package consolidation links.

use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{HandlingUnit, HuStatus, HuType};
use shared::validation::{validate_hu_code, validate_measurements};

#[derive(Clone)]
pub struct HandlingUnitService {
    db: PgPool,
}

/// Input for registering a handling unit
#[derive(Debug, Deserialize)]
pub struct CreateHandlingUnitInput {
    pub shipment_id: Uuid,
    pub hu_code: String,
    pub hu_type: Option<HuType>,
    pub gross_weight: Option<Decimal>,
    pub net_weight: Option<Decimal>,
    pub volume: Option<Decimal>,
    pub weight_uom_id: Option<Uuid>,
    pub volume_uom_id: Option<Uuid>,
    pub container_no: Option<String>,
    pub seal_no: Option<String>,
    pub barcode: Option<String>,
    /// Logical shipment packages consolidated onto this unit
    #[serde(default)]
    pub package_ids: Vec<Uuid>,
}

/// Input for updating a handling unit's descriptive attributes
#[derive(Debug, Deserialize)]
pub struct UpdateHandlingUnitInput {
    pub gross_weight: Option<Decimal>,
    pub net_weight: Option<Decimal>,
    pub volume: Option<Decimal>,
    pub container_no: Option<String>,
    pub seal_no: Option<String>,
    pub barcode: Option<String>,
}

const HU_COLUMNS: &str = "id, branch_id, shipment_id, hu_code, hu_type, status, gross_weight, \
                          net_weight, volume, weight_uom_id, volume_uom_id, container_no, seal_no, \
                          barcode, active, user_add, created_at, updated_at";

impl HandlingUnitService {
    /// Create a new HandlingUnitService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Register a handling unit, linking any consolidated packages in the
    /// same transaction
    pub async fn create(
        &self,
        branch_id: Uuid,
        user_id: Uuid,
        input: CreateHandlingUnitInput,
    ) -> AppResult<HandlingUnit> {
        validate_hu_code(&input.hu_code).map_err(|msg| AppError::Validation {
            field: "hu_code".to_string(),
            message: msg.to_string(),
        })?;

        let gross = input.gross_weight.unwrap_or(Decimal::ZERO);
        let net = input.net_weight.unwrap_or(Decimal::ZERO);
        let volume = input.volume.unwrap_or(Decimal::ZERO);
        validate_measurements(gross, net, volume).map_err(|msg| AppError::Validation {
            field: "gross_weight".to_string(),
            message: msg.to_string(),
        })?;

        let mut tx = self.db.begin().await?;

        let unit = sqlx::query_as::<_, HandlingUnit>(&format!(
            r#"
            INSERT INTO handling_units (branch_id, shipment_id, hu_code, hu_type, gross_weight,
                                        net_weight, volume, weight_uom_id, volume_uom_id,
                                        container_no, seal_no, barcode, user_add)
            VALUES ($1, $2, $3, COALESCE($4, 'CARTON'), $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {HU_COLUMNS}
            "#,
        ))
        .bind(branch_id)
        .bind(input.shipment_id)
        .bind(input.hu_code.trim())
        .bind(input.hu_type)
        .bind(gross)
        .bind(net)
        .bind(volume)
        .bind(input.weight_uom_id)
        .bind(input.volume_uom_id)
        .bind(&input.container_no)
        .bind(&input.seal_no)
        .bind(&input.barcode)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        for package_id in &input.package_ids {
            sqlx::query(
                "INSERT INTO handling_unit_packages (handling_unit_id, package_id) VALUES ($1, $2) ON CONFLICT DO NOTHING",
            )
            .bind(unit.id)
            .bind(package_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(unit)
    }

    /// Update descriptive attributes. Status is deliberately not updatable
    /// here; it belongs to the ledger.
    pub async fn update(
        &self,
        branch_id: Uuid,
        unit_id: Uuid,
        input: UpdateHandlingUnitInput,
    ) -> AppResult<HandlingUnit> {
        if let (Some(gross), Some(net)) = (input.gross_weight, input.net_weight) {
            validate_measurements(gross, net, input.volume.unwrap_or(Decimal::ZERO)).map_err(
                |msg| AppError::Validation {
                    field: "gross_weight".to_string(),
                    message: msg.to_string(),
                },
            )?;
        }

        sqlx::query_as::<_, HandlingUnit>(&format!(
            r#"
            UPDATE handling_units
            SET gross_weight = COALESCE($3, gross_weight),
                net_weight = COALESCE($4, net_weight),
                volume = COALESCE($5, volume),
                container_no = COALESCE($6, container_no),
                seal_no = COALESCE($7, seal_no),
                barcode = COALESCE($8, barcode),
                updated_at = NOW()
            WHERE id = $1 AND branch_id = $2
            RETURNING {HU_COLUMNS}
            "#,
        ))
        .bind(unit_id)
        .bind(branch_id)
        .bind(input.gross_weight)
        .bind(input.net_weight)
        .bind(input.volume)
        .bind(&input.container_no)
        .bind(&input.seal_no)
        .bind(&input.barcode)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Handling unit".to_string()))
    }

    /// List handling units, optionally filtered by shipment or status
    pub async fn list(
        &self,
        branch_id: Uuid,
        shipment_id: Option<Uuid>,
        status: Option<HuStatus>,
    ) -> AppResult<Vec<HandlingUnit>> {
        let units = sqlx::query_as::<_, HandlingUnit>(&format!(
            r#"
            SELECT {HU_COLUMNS} FROM handling_units
            WHERE branch_id = $1
              AND ($2::uuid IS NULL OR shipment_id = $2)
              AND ($3::hu_status IS NULL OR status = $3)
            ORDER BY created_at DESC
            "#,
        ))
        .bind(branch_id)
        .bind(shipment_id)
        .bind(status)
        .fetch_all(&self.db)
        .await?;

        Ok(units)
    }

    /// Get a handling unit
    pub async fn get(&self, branch_id: Uuid, unit_id: Uuid) -> AppResult<HandlingUnit> {
        sqlx::query_as::<_, HandlingUnit>(&format!(
            "SELECT {HU_COLUMNS} FROM handling_units WHERE id = $1 AND branch_id = $2",
        ))
        .bind(unit_id)
        .bind(branch_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Handling unit".to_string()))
    }

    /// List the package ids consolidated onto a unit
    pub async fn list_packages(&self, branch_id: Uuid, unit_id: Uuid) -> AppResult<Vec<Uuid>> {
        self.get(branch_id, unit_id).await?;

        let package_ids = sqlx::query_scalar::<_, Uuid>(
            "SELECT package_id FROM handling_unit_packages WHERE handling_unit_id = $1",
        )
        .bind(unit_id)
        .fetch_all(&self.db)
        .await?;

        Ok(package_ids)
    }

    /// Soft-deactivate a unit. The ledger refuses further moves for inactive
    /// units.
    pub async fn deactivate(&self, branch_id: Uuid, unit_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE handling_units SET active = FALSE, updated_at = NOW() WHERE id = $1 AND branch_id = $2",
        )
        .bind(unit_id)
        .bind(branch_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Handling unit".to_string()));
        }

        Ok(())
    }
}
