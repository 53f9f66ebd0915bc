//! Inbound pipeline orchestration: plan → receiving → QC → putaway
//!
//! Drives a handling unit from PLANNED to STORED. Record creation triggers
//! RECEIVE and QC moves; the putaway completion is edge-triggered: the
//! previous status is fetched under a row lock and the PUTAWAY move is logged
//! only on the transition into DONE, in the same transaction as the update.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::ledger::{log_move_in_tx, LogMoveInput};
use shared::models::{
    transitioned_into, HandlingUnit, InboundPlan, InboundPlanStatus, Location, MoveType,
    Putaway, PutawayStatus, QcResult, QualityCheck, Receiving, ReceivingCondition,
    ReceivingLine,
};
use shared::validation::fits_location;

/// Inbound pipeline service
#[derive(Clone)]
pub struct InboundService {
    db: PgPool,
}

/// Input for creating an inbound plan
#[derive(Debug, Deserialize)]
pub struct CreateInboundPlanInput {
    pub shipment_id: Uuid,
    pub warehouse_id: Uuid,
    pub eta: Option<DateTime<Utc>>,
    pub dock_location_id: Option<Uuid>,
    pub note: Option<String>,
}

/// Input for creating a receiving session
#[derive(Debug, Deserialize)]
pub struct CreateReceivingInput {
    pub inbound_plan_id: Uuid,
    pub receiving_location_id: Uuid,
    pub received_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

/// Input for receiving one handling unit
#[derive(Debug, Deserialize)]
pub struct CreateReceivingLineInput {
    pub receiving_id: Uuid,
    pub handling_unit_id: Uuid,
    pub condition: Option<ReceivingCondition>,
    pub note: Option<String>,
}

/// Input for recording a quality check
#[derive(Debug, Deserialize)]
pub struct CreateQualityCheckInput {
    pub receiving_line_id: Uuid,
    pub qc_location_id: Option<Uuid>,
    pub result: QcResult,
    pub discrepancy: Option<String>,
}

/// Input for opening a putaway task
#[derive(Debug, Deserialize)]
pub struct CreatePutawayInput {
    pub handling_unit_id: Uuid,
    pub from_location_id: Uuid,
    pub to_location_id: Uuid,
    pub assigned_to: Option<Uuid>,
    pub note: Option<String>,
}

/// Input for updating a putaway task
#[derive(Debug, Deserialize)]
pub struct UpdatePutawayInput {
    pub status: Option<PutawayStatus>,
    pub assigned_to: Option<Uuid>,
    pub note: Option<String>,
}

const PLAN_COLUMNS: &str = "id, branch_id, shipment_id, warehouse_id, eta, dock_location_id, \
                            status, note, active, user_add, created_at, updated_at";

const PUTAWAY_COLUMNS: &str = "id, branch_id, handling_unit_id, from_location_id, to_location_id, \
                               status, assigned_to, started_at, completed_at, note, active, \
                               user_add, created_at, updated_at";

impl InboundService {
    /// Create a new InboundService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create an inbound plan for a shipment
    pub async fn create_plan(
        &self,
        branch_id: Uuid,
        user_id: Uuid,
        input: CreateInboundPlanInput,
    ) -> AppResult<InboundPlan> {
        let warehouse_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM warehouses WHERE id = $1 AND branch_id = $2)",
        )
        .bind(input.warehouse_id)
        .bind(branch_id)
        .fetch_one(&self.db)
        .await?;

        if !warehouse_exists {
            return Err(AppError::NotFound("Warehouse".to_string()));
        }

        let plan = sqlx::query_as::<_, InboundPlan>(&format!(
            r#"
            INSERT INTO inbound_plans (branch_id, shipment_id, warehouse_id, eta, dock_location_id, note, user_add)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PLAN_COLUMNS}
            "#,
        ))
        .bind(branch_id)
        .bind(input.shipment_id)
        .bind(input.warehouse_id)
        .bind(input.eta)
        .bind(input.dock_location_id)
        .bind(&input.note)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(plan)
    }

    /// Update an inbound plan's status (no ledger effect)
    pub async fn update_plan_status(
        &self,
        branch_id: Uuid,
        plan_id: Uuid,
        status: InboundPlanStatus,
    ) -> AppResult<InboundPlan> {
        sqlx::query_as::<_, InboundPlan>(&format!(
            r#"
            UPDATE inbound_plans SET status = $3, updated_at = NOW()
            WHERE id = $1 AND branch_id = $2
            RETURNING {PLAN_COLUMNS}
            "#,
        ))
        .bind(plan_id)
        .bind(branch_id)
        .bind(status)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Inbound plan".to_string()))
    }

    /// List inbound plans for the branch
    pub async fn list_plans(&self, branch_id: Uuid) -> AppResult<Vec<InboundPlan>> {
        let plans = sqlx::query_as::<_, InboundPlan>(&format!(
            "SELECT {PLAN_COLUMNS} FROM inbound_plans WHERE branch_id = $1 ORDER BY created_at DESC",
        ))
        .bind(branch_id)
        .fetch_all(&self.db)
        .await?;

        Ok(plans)
    }

    /// Get an inbound plan
    pub async fn get_plan(&self, branch_id: Uuid, plan_id: Uuid) -> AppResult<InboundPlan> {
        sqlx::query_as::<_, InboundPlan>(&format!(
            "SELECT {PLAN_COLUMNS} FROM inbound_plans WHERE id = $1 AND branch_id = $2",
        ))
        .bind(plan_id)
        .bind(branch_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Inbound plan".to_string()))
    }

    /// Open a receiving session against a plan
    pub async fn create_receiving(
        &self,
        branch_id: Uuid,
        user_id: Uuid,
        input: CreateReceivingInput,
    ) -> AppResult<Receiving> {
        let plan_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM inbound_plans WHERE id = $1 AND branch_id = $2)",
        )
        .bind(input.inbound_plan_id)
        .bind(branch_id)
        .fetch_one(&self.db)
        .await?;

        if !plan_exists {
            return Err(AppError::NotFound("Inbound plan".to_string()));
        }

        let receiving = sqlx::query_as::<_, Receiving>(
            r#"
            INSERT INTO receivings (branch_id, inbound_plan_id, receiving_location_id, received_at, note, user_add)
            VALUES ($1, $2, $3, COALESCE($4, NOW()), $5, $6)
            RETURNING id, branch_id, inbound_plan_id, receiving_location_id, received_at, status,
                      note, active, user_add, created_at, updated_at
            "#,
        )
        .bind(branch_id)
        .bind(input.inbound_plan_id)
        .bind(input.receiving_location_id)
        .bind(input.received_at)
        .bind(&input.note)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(receiving)
    }

    /// Receive one handling unit: creates the line and logs the RECEIVE move
    /// in the same transaction
    pub async fn create_receiving_line(
        &self,
        branch_id: Uuid,
        user_id: Uuid,
        input: CreateReceivingLineInput,
    ) -> AppResult<ReceivingLine> {
        let mut tx = self.db.begin().await?;

        let receiving_location_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT receiving_location_id FROM receivings WHERE id = $1 AND branch_id = $2",
        )
        .bind(input.receiving_id)
        .bind(branch_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Receiving".to_string()))?;

        let line = sqlx::query_as::<_, ReceivingLine>(
            r#"
            INSERT INTO receiving_lines (branch_id, receiving_id, handling_unit_id, condition, note, user_add)
            VALUES ($1, $2, $3, COALESCE($4, 'GOOD'), $5, $6)
            RETURNING id, branch_id, receiving_id, handling_unit_id, condition, note, active,
                      user_add, created_at, updated_at
            "#,
        )
        .bind(branch_id)
        .bind(input.receiving_id)
        .bind(input.handling_unit_id)
        .bind(input.condition)
        .bind(&input.note)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        log_move_in_tx(
            &mut tx,
            branch_id,
            user_id,
            LogMoveInput {
                handling_unit_id: input.handling_unit_id,
                move_type: MoveType::Receive,
                from_location_id: None,
                to_location_id: Some(receiving_location_id),
                ref_code: Some(input.receiving_id.to_string()),
                note: None,
                moved_at: None,
            },
        )
        .await?;

        tx.commit().await?;

        Ok(line)
    }

    /// List lines under a receiving session
    pub async fn list_receiving_lines(
        &self,
        branch_id: Uuid,
        receiving_id: Uuid,
    ) -> AppResult<Vec<ReceivingLine>> {
        let lines = sqlx::query_as::<_, ReceivingLine>(
            r#"
            SELECT id, branch_id, receiving_id, handling_unit_id, condition, note, active,
                   user_add, created_at, updated_at
            FROM receiving_lines
            WHERE receiving_id = $1 AND branch_id = $2
            ORDER BY created_at
            "#,
        )
        .bind(receiving_id)
        .bind(branch_id)
        .fetch_all(&self.db)
        .await?;

        Ok(lines)
    }

    /// Record the quality check for a receiving line: creates the record and
    /// logs the QC move in the same transaction. The QC location may be null
    /// when the unit is checked in place.
    pub async fn create_quality_check(
        &self,
        branch_id: Uuid,
        user_id: Uuid,
        input: CreateQualityCheckInput,
    ) -> AppResult<QualityCheck> {
        let mut tx = self.db.begin().await?;

        let handling_unit_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT handling_unit_id FROM receiving_lines WHERE id = $1 AND branch_id = $2",
        )
        .bind(input.receiving_line_id)
        .bind(branch_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Receiving line".to_string()))?;

        let already_checked = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM quality_checks WHERE receiving_line_id = $1)",
        )
        .bind(input.receiving_line_id)
        .fetch_one(&mut *tx)
        .await?;

        if already_checked {
            return Err(AppError::DuplicateEntry("quality check".to_string()));
        }

        let qc = sqlx::query_as::<_, QualityCheck>(
            r#"
            INSERT INTO quality_checks (branch_id, receiving_line_id, qc_location_id, result, discrepancy, user_add)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, branch_id, receiving_line_id, qc_location_id, result, discrepancy,
                      checked_at, active, user_add, created_at, updated_at
            "#,
        )
        .bind(branch_id)
        .bind(input.receiving_line_id)
        .bind(input.qc_location_id)
        .bind(input.result)
        .bind(&input.discrepancy)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        log_move_in_tx(
            &mut tx,
            branch_id,
            user_id,
            LogMoveInput {
                handling_unit_id,
                move_type: MoveType::Qc,
                from_location_id: None,
                to_location_id: input.qc_location_id,
                ref_code: Some(input.receiving_line_id.to_string()),
                note: None,
                moved_at: None,
            },
        )
        .await?;

        tx.commit().await?;

        Ok(qc)
    }

    /// Open a putaway task for a handling unit
    pub async fn create_putaway(
        &self,
        branch_id: Uuid,
        user_id: Uuid,
        input: CreatePutawayInput,
    ) -> AppResult<Putaway> {
        let unit = sqlx::query_as::<_, HandlingUnit>(
            r#"
            SELECT id, branch_id, shipment_id, hu_code, hu_type, status, gross_weight, net_weight,
                   volume, weight_uom_id, volume_uom_id, container_no, seal_no, barcode, active,
                   user_add, created_at, updated_at
            FROM handling_units WHERE id = $1 AND branch_id = $2
            "#,
        )
        .bind(input.handling_unit_id)
        .bind(branch_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Handling unit".to_string()))?;

        let destination = sqlx::query_as::<_, Location>(
            r#"
            SELECT id, branch_id, zone_id, code, name, location_type, barcode, max_volume,
                   max_gross_weight, weight_uom_id, active, user_add, created_at, updated_at
            FROM locations WHERE id = $1 AND branch_id = $2
            "#,
        )
        .bind(input.to_location_id)
        .bind(branch_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Location".to_string()))?;

        if !fits_location(&unit, &destination) {
            return Err(AppError::Validation {
                field: "to_location_id".to_string(),
                message: format!(
                    "Handling unit {} exceeds the capacity of location {}",
                    unit.hu_code, destination.code
                ),
            });
        }

        let open_exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM putaways
                WHERE handling_unit_id = $1 AND status IN ('OPEN', 'ASSIGNED')
            )
            "#,
        )
        .bind(input.handling_unit_id)
        .fetch_one(&self.db)
        .await?;

        if open_exists {
            return Err(AppError::Conflict {
                resource: "putaway".to_string(),
                message: "Handling unit already has an open putaway task".to_string(),
            });
        }

        let putaway = sqlx::query_as::<_, Putaway>(&format!(
            r#"
            INSERT INTO putaways (branch_id, handling_unit_id, from_location_id, to_location_id, assigned_to, note, user_add)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PUTAWAY_COLUMNS}
            "#,
        ))
        .bind(branch_id)
        .bind(input.handling_unit_id)
        .bind(input.from_location_id)
        .bind(input.to_location_id)
        .bind(input.assigned_to)
        .bind(&input.note)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(putaway)
    }

    /// Update a putaway task. The PUTAWAY move is logged if and only if this
    /// write moved the task into DONE, comparing against the pre-write status
    /// fetched under a row lock.
    pub async fn update_putaway(
        &self,
        branch_id: Uuid,
        user_id: Uuid,
        putaway_id: Uuid,
        input: UpdatePutawayInput,
    ) -> AppResult<Putaway> {
        let mut tx = self.db.begin().await?;

        let previous = sqlx::query_as::<_, Putaway>(&format!(
            "SELECT {PUTAWAY_COLUMNS} FROM putaways WHERE id = $1 AND branch_id = $2 FOR UPDATE",
        ))
        .bind(putaway_id)
        .bind(branch_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Putaway".to_string()))?;

        let new_status = input.status.unwrap_or(previous.status);

        if previous.status == PutawayStatus::Cancelled && new_status != PutawayStatus::Cancelled {
            return Err(AppError::InvalidStateTransition(
                "Cancelled putaway cannot be reopened".to_string(),
            ));
        }

        let became_done = transitioned_into(&previous.status, &new_status, &PutawayStatus::Done);

        let updated = sqlx::query_as::<_, Putaway>(&format!(
            r#"
            UPDATE putaways
            SET status = $3,
                assigned_to = COALESCE($4, assigned_to),
                note = COALESCE($5, note),
                started_at = CASE WHEN $3 = 'ASSIGNED' AND started_at IS NULL THEN NOW() ELSE started_at END,
                completed_at = CASE WHEN $3 = 'DONE' AND completed_at IS NULL THEN NOW() ELSE completed_at END,
                updated_at = NOW()
            WHERE id = $1 AND branch_id = $2
            RETURNING {PUTAWAY_COLUMNS}
            "#,
        ))
        .bind(putaway_id)
        .bind(branch_id)
        .bind(new_status)
        .bind(input.assigned_to)
        .bind(&input.note)
        .fetch_one(&mut *tx)
        .await?;

        if became_done {
            log_move_in_tx(
                &mut tx,
                branch_id,
                user_id,
                LogMoveInput {
                    handling_unit_id: updated.handling_unit_id,
                    move_type: MoveType::Putaway,
                    from_location_id: Some(updated.from_location_id),
                    to_location_id: Some(updated.to_location_id),
                    ref_code: Some(updated.id.to_string()),
                    note: None,
                    moved_at: None,
                },
            )
            .await?;
        }

        tx.commit().await?;

        Ok(updated)
    }

    /// List putaway tasks, optionally filtered by status
    pub async fn list_putaways(
        &self,
        branch_id: Uuid,
        status: Option<PutawayStatus>,
    ) -> AppResult<Vec<Putaway>> {
        let putaways = sqlx::query_as::<_, Putaway>(&format!(
            r#"
            SELECT {PUTAWAY_COLUMNS} FROM putaways
            WHERE branch_id = $1 AND ($2::putaway_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            "#,
        ))
        .bind(branch_id)
        .bind(status)
        .fetch_all(&self.db)
        .await?;

        Ok(putaways)
    }
}
