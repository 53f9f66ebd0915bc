//! Outbound pipeline orchestration: order → wave → allocation → pick → pack →
//! stage → load → dispatch
//!
//! Drives a handling unit from STORED to DISPATCHED. Allocation, pack-line
//! and load-line creation log their moves directly; pick, stage and load
//! dispatch are edge-triggered updates that compare against the pre-write
//! status under a row lock. Stage and dispatch fan out one move per affected
//! handling unit.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::ledger::{log_move_in_tx, LogMoveInput};
use shared::models::{
    transitioned_into, Allocation, Load, LoadLine, LoadStatus, MoveType, OutboundOrder,
    OutboundOrderStatus, Pack, PackLine, PackStatus, Pick, PickStatus, Stage, StageStatus, Wave,
    WaveStatus,
};
use shared::validation::validate_priority;

/// Outbound pipeline service
#[derive(Clone)]
pub struct OutboundService {
    db: PgPool,
}

/// Input for creating an outbound order
#[derive(Debug, Deserialize)]
pub struct CreateOutboundOrderInput {
    pub shipment_id: Uuid,
    pub warehouse_id: Uuid,
    pub requested_ship_date: Option<NaiveDate>,
    pub delivery_address: Option<String>,
    pub priority: Option<i16>,
    pub note: Option<String>,
}

/// Input for creating a wave
#[derive(Debug, Deserialize)]
pub struct CreateWaveInput {
    pub warehouse_id: Uuid,
    pub planned_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

/// Input for allocating a handling unit to an order within a wave
#[derive(Debug, Deserialize)]
pub struct CreateAllocationInput {
    pub wave_id: Uuid,
    pub order_id: Uuid,
    pub handling_unit_id: Uuid,
    pub location_id: Uuid,
}

/// Input for opening a pick task against an allocation
#[derive(Debug, Deserialize)]
pub struct CreatePickInput {
    pub allocation_id: Uuid,
    pub to_location_id: Option<Uuid>,
    pub assigned_to: Option<Uuid>,
    pub note: Option<String>,
}

/// Input for updating a pick task
#[derive(Debug, Deserialize)]
pub struct UpdatePickInput {
    pub status: Option<PickStatus>,
    pub to_location_id: Option<Uuid>,
    pub assigned_to: Option<Uuid>,
    pub note: Option<String>,
}

/// Input for creating a pack session
#[derive(Debug, Deserialize)]
pub struct CreatePackInput {
    pub order_id: Uuid,
    pub pack_location_id: Uuid,
    pub note: Option<String>,
}

/// Input for attaching a handling unit to a pack
#[derive(Debug, Deserialize)]
pub struct CreatePackLineInput {
    pub pack_id: Uuid,
    pub handling_unit_id: Uuid,
    pub label_no: Option<String>,
}

/// Input for creating a staging record
#[derive(Debug, Deserialize)]
pub struct CreateStageInput {
    pub order_id: Uuid,
    pub stage_location_id: Uuid,
    pub note: Option<String>,
}

/// Input for creating a load
#[derive(Debug, Deserialize)]
pub struct CreateLoadInput {
    pub warehouse_id: Uuid,
    pub dock_location_id: Option<Uuid>,
    pub vehicle_no: Option<String>,
    pub driver_name: Option<String>,
    pub seal_no: Option<String>,
    pub note: Option<String>,
}

/// Input for attaching a handling unit to a load
#[derive(Debug, Deserialize)]
pub struct CreateLoadLineInput {
    pub load_id: Uuid,
    pub order_id: Uuid,
    pub handling_unit_id: Uuid,
}

const ORDER_COLUMNS: &str = "id, branch_id, shipment_id, warehouse_id, requested_ship_date, \
                             delivery_address, priority, status, note, active, user_add, \
                             created_at, updated_at";

const ALLOCATION_COLUMNS: &str = "id, branch_id, wave_id, order_id, handling_unit_id, location_id, \
                                  allocated_at, active, user_add, created_at, updated_at";

const PICK_COLUMNS: &str = "id, branch_id, allocation_id, from_location_id, to_location_id, status, \
                            assigned_to, picked_at, note, active, user_add, created_at, updated_at";

const STAGE_COLUMNS: &str = "id, branch_id, order_id, stage_location_id, status, staged_at, note, \
                             active, user_add, created_at, updated_at";

const LOAD_COLUMNS: &str = "id, branch_id, warehouse_id, dock_location_id, vehicle_no, driver_name, \
                            seal_no, status, loaded_at, dispatched_at, note, active, user_add, \
                            created_at, updated_at";

impl OutboundService {
    /// Create a new OutboundService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create an outbound order
    pub async fn create_order(
        &self,
        branch_id: Uuid,
        user_id: Uuid,
        input: CreateOutboundOrderInput,
    ) -> AppResult<OutboundOrder> {
        let priority = input.priority.unwrap_or(3);
        validate_priority(priority).map_err(|msg| AppError::Validation {
            field: "priority".to_string(),
            message: msg.to_string(),
        })?;

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

        let order = sqlx::query_as::<_, OutboundOrder>(&format!(
            r#"
            INSERT INTO outbound_orders (branch_id, shipment_id, warehouse_id, requested_ship_date,
                                         delivery_address, priority, note, user_add)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {ORDER_COLUMNS}
            "#,
        ))
        .bind(branch_id)
        .bind(input.shipment_id)
        .bind(input.warehouse_id)
        .bind(input.requested_ship_date)
        .bind(&input.delivery_address)
        .bind(priority)
        .bind(&input.note)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(order)
    }

    /// Update an outbound order's status (no ledger effect)
    pub async fn update_order_status(
        &self,
        branch_id: Uuid,
        order_id: Uuid,
        status: OutboundOrderStatus,
    ) -> AppResult<OutboundOrder> {
        sqlx::query_as::<_, OutboundOrder>(&format!(
            r#"
            UPDATE outbound_orders SET status = $3, updated_at = NOW()
            WHERE id = $1 AND branch_id = $2
            RETURNING {ORDER_COLUMNS}
            "#,
        ))
        .bind(order_id)
        .bind(branch_id)
        .bind(status)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Outbound order".to_string()))
    }

    /// List outbound orders for the branch
    pub async fn list_orders(&self, branch_id: Uuid) -> AppResult<Vec<OutboundOrder>> {
        let orders = sqlx::query_as::<_, OutboundOrder>(&format!(
            "SELECT {ORDER_COLUMNS} FROM outbound_orders WHERE branch_id = $1 ORDER BY created_at DESC",
        ))
        .bind(branch_id)
        .fetch_all(&self.db)
        .await?;

        Ok(orders)
    }

    /// Get an outbound order
    pub async fn get_order(&self, branch_id: Uuid, order_id: Uuid) -> AppResult<OutboundOrder> {
        sqlx::query_as::<_, OutboundOrder>(&format!(
            "SELECT {ORDER_COLUMNS} FROM outbound_orders WHERE id = $1 AND branch_id = $2",
        ))
        .bind(order_id)
        .bind(branch_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Outbound order".to_string()))
    }

    /// Create a wave
    pub async fn create_wave(
        &self,
        branch_id: Uuid,
        user_id: Uuid,
        input: CreateWaveInput,
    ) -> AppResult<Wave> {
        let wave = sqlx::query_as::<_, Wave>(
            r#"
            INSERT INTO waves (branch_id, warehouse_id, planned_at, note, user_add)
            VALUES ($1, $2, COALESCE($3, NOW()), $4, $5)
            RETURNING id, branch_id, warehouse_id, planned_at, status, note, active, user_add,
                      created_at, updated_at
            "#,
        )
        .bind(branch_id)
        .bind(input.warehouse_id)
        .bind(input.planned_at)
        .bind(&input.note)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(wave)
    }

    /// Attach an order to a wave
    pub async fn add_order_to_wave(
        &self,
        branch_id: Uuid,
        wave_id: Uuid,
        order_id: Uuid,
    ) -> AppResult<()> {
        let wave_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM waves WHERE id = $1 AND branch_id = $2)",
        )
        .bind(wave_id)
        .bind(branch_id)
        .fetch_one(&self.db)
        .await?;

        if !wave_exists {
            return Err(AppError::NotFound("Wave".to_string()));
        }

        self.get_order(branch_id, order_id).await?;

        sqlx::query("INSERT INTO wave_orders (wave_id, order_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
            .bind(wave_id)
            .bind(order_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }

    /// Update a wave's status (no ledger effect)
    pub async fn update_wave_status(
        &self,
        branch_id: Uuid,
        wave_id: Uuid,
        status: WaveStatus,
    ) -> AppResult<Wave> {
        sqlx::query_as::<_, Wave>(
            r#"
            UPDATE waves SET status = $3, updated_at = NOW()
            WHERE id = $1 AND branch_id = $2
            RETURNING id, branch_id, warehouse_id, planned_at, status, note, active, user_add,
                      created_at, updated_at
            "#,
        )
        .bind(wave_id)
        .bind(branch_id)
        .bind(status)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Wave".to_string()))
    }

    /// Reserve a handling unit against an order within a wave. The ALLOCATE
    /// move records the unit's current location as both endpoints; it exists
    /// to record the event and flip the status.
    pub async fn create_allocation(
        &self,
        branch_id: Uuid,
        user_id: Uuid,
        input: CreateAllocationInput,
    ) -> AppResult<Allocation> {
        let mut tx = self.db.begin().await?;

        let in_wave = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM wave_orders WHERE wave_id = $1 AND order_id = $2)",
        )
        .bind(input.wave_id)
        .bind(input.order_id)
        .fetch_one(&mut *tx)
        .await?;

        if !in_wave {
            return Err(AppError::Validation {
                field: "order_id".to_string(),
                message: "Order is not part of the wave".to_string(),
            });
        }

        let already_allocated = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM allocations WHERE wave_id = $1 AND handling_unit_id = $2)",
        )
        .bind(input.wave_id)
        .bind(input.handling_unit_id)
        .fetch_one(&mut *tx)
        .await?;

        if already_allocated {
            return Err(AppError::Conflict {
                resource: "allocation".to_string(),
                message: "Handling unit is already allocated in this wave".to_string(),
            });
        }

        let allocation = sqlx::query_as::<_, Allocation>(&format!(
            r#"
            INSERT INTO allocations (branch_id, wave_id, order_id, handling_unit_id, location_id, user_add)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ALLOCATION_COLUMNS}
            "#,
        ))
        .bind(branch_id)
        .bind(input.wave_id)
        .bind(input.order_id)
        .bind(input.handling_unit_id)
        .bind(input.location_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        log_move_in_tx(
            &mut tx,
            branch_id,
            user_id,
            LogMoveInput {
                handling_unit_id: input.handling_unit_id,
                move_type: MoveType::Allocate,
                from_location_id: Some(input.location_id),
                to_location_id: Some(input.location_id),
                ref_code: Some(input.order_id.to_string()),
                note: None,
                moved_at: None,
            },
        )
        .await?;

        tx.commit().await?;

        Ok(allocation)
    }

    /// List allocations under an order
    pub async fn list_allocations_for_order(
        &self,
        branch_id: Uuid,
        order_id: Uuid,
    ) -> AppResult<Vec<Allocation>> {
        let allocations = sqlx::query_as::<_, Allocation>(&format!(
            r#"
            SELECT {ALLOCATION_COLUMNS} FROM allocations
            WHERE order_id = $1 AND branch_id = $2
            ORDER BY created_at
            "#,
        ))
        .bind(order_id)
        .bind(branch_id)
        .fetch_all(&self.db)
        .await?;

        Ok(allocations)
    }

    /// Open a pick task for an allocation. The from-location defaults to the
    /// allocated location.
    pub async fn create_pick(
        &self,
        branch_id: Uuid,
        user_id: Uuid,
        input: CreatePickInput,
    ) -> AppResult<Pick> {
        let allocation_location = sqlx::query_scalar::<_, Uuid>(
            "SELECT location_id FROM allocations WHERE id = $1 AND branch_id = $2",
        )
        .bind(input.allocation_id)
        .bind(branch_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Allocation".to_string()))?;

        let already_picked = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM picks WHERE allocation_id = $1)",
        )
        .bind(input.allocation_id)
        .fetch_one(&self.db)
        .await?;

        if already_picked {
            return Err(AppError::DuplicateEntry("pick".to_string()));
        }

        let pick = sqlx::query_as::<_, Pick>(&format!(
            r#"
            INSERT INTO picks (branch_id, allocation_id, from_location_id, to_location_id, assigned_to, note, user_add)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {PICK_COLUMNS}
            "#,
        ))
        .bind(branch_id)
        .bind(input.allocation_id)
        .bind(allocation_location)
        .bind(input.to_location_id)
        .bind(input.assigned_to)
        .bind(&input.note)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(pick)
    }

    /// Update a pick task. The PICK move is logged if and only if this write
    /// moved the task into PICKED, comparing against the pre-write status
    /// fetched under a row lock.
    pub async fn update_pick(
        &self,
        branch_id: Uuid,
        user_id: Uuid,
        pick_id: Uuid,
        input: UpdatePickInput,
    ) -> AppResult<Pick> {
        let mut tx = self.db.begin().await?;

        let previous = sqlx::query_as::<_, Pick>(&format!(
            "SELECT {PICK_COLUMNS} FROM picks WHERE id = $1 AND branch_id = $2 FOR UPDATE",
        ))
        .bind(pick_id)
        .bind(branch_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Pick".to_string()))?;

        let new_status = input.status.unwrap_or(previous.status);

        if previous.status == PickStatus::Cancelled && new_status != PickStatus::Cancelled {
            return Err(AppError::InvalidStateTransition(
                "Cancelled pick cannot be reopened".to_string(),
            ));
        }

        let became_picked = transitioned_into(&previous.status, &new_status, &PickStatus::Picked);

        let updated = sqlx::query_as::<_, Pick>(&format!(
            r#"
            UPDATE picks
            SET status = $3,
                to_location_id = COALESCE($4, to_location_id),
                assigned_to = COALESCE($5, assigned_to),
                note = COALESCE($6, note),
                picked_at = CASE WHEN $3 = 'PICKED' AND picked_at IS NULL THEN NOW() ELSE picked_at END,
                updated_at = NOW()
            WHERE id = $1 AND branch_id = $2
            RETURNING {PICK_COLUMNS}
            "#,
        ))
        .bind(pick_id)
        .bind(branch_id)
        .bind(new_status)
        .bind(input.to_location_id)
        .bind(input.assigned_to)
        .bind(&input.note)
        .fetch_one(&mut *tx)
        .await?;

        if became_picked {
            let handling_unit_id = sqlx::query_scalar::<_, Uuid>(
                "SELECT handling_unit_id FROM allocations WHERE id = $1",
            )
            .bind(updated.allocation_id)
            .fetch_one(&mut *tx)
            .await?;

            log_move_in_tx(
                &mut tx,
                branch_id,
                user_id,
                LogMoveInput {
                    handling_unit_id,
                    move_type: MoveType::Pick,
                    from_location_id: Some(updated.from_location_id),
                    to_location_id: updated.to_location_id,
                    ref_code: Some(updated.allocation_id.to_string()),
                    note: None,
                    moved_at: None,
                },
            )
            .await?;
        }

        tx.commit().await?;

        Ok(updated)
    }

    /// Create a pack session for an order
    pub async fn create_pack(
        &self,
        branch_id: Uuid,
        user_id: Uuid,
        input: CreatePackInput,
    ) -> AppResult<Pack> {
        self.get_order(branch_id, input.order_id).await?;

        let pack = sqlx::query_as::<_, Pack>(
            r#"
            INSERT INTO packs (branch_id, order_id, pack_location_id, note, user_add)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, branch_id, order_id, pack_location_id, status, packed_at, note, active,
                      user_add, created_at, updated_at
            "#,
        )
        .bind(branch_id)
        .bind(input.order_id)
        .bind(input.pack_location_id)
        .bind(&input.note)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(pack)
    }

    /// Close a pack session (no ledger effect; PACK moves are logged per line)
    pub async fn update_pack_status(
        &self,
        branch_id: Uuid,
        pack_id: Uuid,
        status: PackStatus,
    ) -> AppResult<Pack> {
        sqlx::query_as::<_, Pack>(
            r#"
            UPDATE packs
            SET status = $3,
                packed_at = CASE WHEN $3 = 'PACKED' AND packed_at IS NULL THEN NOW() ELSE packed_at END,
                updated_at = NOW()
            WHERE id = $1 AND branch_id = $2
            RETURNING id, branch_id, order_id, pack_location_id, status, packed_at, note, active,
                      user_add, created_at, updated_at
            "#,
        )
        .bind(pack_id)
        .bind(branch_id)
        .bind(status)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Pack".to_string()))
    }

    /// Attach a handling unit to a pack: creates the line and logs the PACK
    /// move in the same transaction
    pub async fn create_pack_line(
        &self,
        branch_id: Uuid,
        user_id: Uuid,
        input: CreatePackLineInput,
    ) -> AppResult<PackLine> {
        let mut tx = self.db.begin().await?;

        let pack_location_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT pack_location_id FROM packs WHERE id = $1 AND branch_id = $2",
        )
        .bind(input.pack_id)
        .bind(branch_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Pack".to_string()))?;

        let line = sqlx::query_as::<_, PackLine>(
            r#"
            INSERT INTO pack_lines (branch_id, pack_id, handling_unit_id, label_no, user_add)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, branch_id, pack_id, handling_unit_id, label_no, active, user_add,
                      created_at, updated_at
            "#,
        )
        .bind(branch_id)
        .bind(input.pack_id)
        .bind(input.handling_unit_id)
        .bind(&input.label_no)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        log_move_in_tx(
            &mut tx,
            branch_id,
            user_id,
            LogMoveInput {
                handling_unit_id: input.handling_unit_id,
                move_type: MoveType::Pack,
                from_location_id: None,
                to_location_id: Some(pack_location_id),
                ref_code: Some(input.pack_id.to_string()),
                note: None,
                moved_at: None,
            },
        )
        .await?;

        tx.commit().await?;

        Ok(line)
    }

    /// Create a staging record for an order
    pub async fn create_stage(
        &self,
        branch_id: Uuid,
        user_id: Uuid,
        input: CreateStageInput,
    ) -> AppResult<Stage> {
        self.get_order(branch_id, input.order_id).await?;

        let stage = sqlx::query_as::<_, Stage>(&format!(
            r#"
            INSERT INTO stages (branch_id, order_id, stage_location_id, note, user_add)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {STAGE_COLUMNS}
            "#,
        ))
        .bind(branch_id)
        .bind(input.order_id)
        .bind(input.stage_location_id)
        .bind(&input.note)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(stage)
    }

    /// Update a staging record. The transition into STAGED fans out one STAGE
    /// move per allocation under the order, all in the same transaction. An
    /// order with zero allocations stages with zero ledger rows, which is
    /// valid.
    pub async fn update_stage_status(
        &self,
        branch_id: Uuid,
        user_id: Uuid,
        stage_id: Uuid,
        status: StageStatus,
    ) -> AppResult<Stage> {
        let mut tx = self.db.begin().await?;

        let previous = sqlx::query_as::<_, Stage>(&format!(
            "SELECT {STAGE_COLUMNS} FROM stages WHERE id = $1 AND branch_id = $2 FOR UPDATE",
        ))
        .bind(stage_id)
        .bind(branch_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Stage".to_string()))?;

        let became_staged = transitioned_into(&previous.status, &status, &StageStatus::Staged);

        let updated = sqlx::query_as::<_, Stage>(&format!(
            r#"
            UPDATE stages
            SET status = $3,
                staged_at = CASE WHEN $3 = 'STAGED' AND staged_at IS NULL THEN NOW() ELSE staged_at END,
                updated_at = NOW()
            WHERE id = $1 AND branch_id = $2
            RETURNING {STAGE_COLUMNS}
            "#,
        ))
        .bind(stage_id)
        .bind(branch_id)
        .bind(status)
        .fetch_one(&mut *tx)
        .await?;

        if became_staged {
            let unit_ids = sqlx::query_scalar::<_, Uuid>(
                "SELECT handling_unit_id FROM allocations WHERE order_id = $1 AND branch_id = $2 ORDER BY created_at",
            )
            .bind(updated.order_id)
            .bind(branch_id)
            .fetch_all(&mut *tx)
            .await?;

            for handling_unit_id in unit_ids {
                log_move_in_tx(
                    &mut tx,
                    branch_id,
                    user_id,
                    LogMoveInput {
                        handling_unit_id,
                        move_type: MoveType::Stage,
                        from_location_id: None,
                        to_location_id: Some(updated.stage_location_id),
                        ref_code: Some(updated.order_id.to_string()),
                        note: None,
                        moved_at: None,
                    },
                )
                .await?;
            }
        }

        tx.commit().await?;

        Ok(updated)
    }

    /// Create a load
    pub async fn create_load(
        &self,
        branch_id: Uuid,
        user_id: Uuid,
        input: CreateLoadInput,
    ) -> AppResult<Load> {
        let load = sqlx::query_as::<_, Load>(&format!(
            r#"
            INSERT INTO loads (branch_id, warehouse_id, dock_location_id, vehicle_no, driver_name,
                               seal_no, note, user_add)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {LOAD_COLUMNS}
            "#,
        ))
        .bind(branch_id)
        .bind(input.warehouse_id)
        .bind(input.dock_location_id)
        .bind(&input.vehicle_no)
        .bind(&input.driver_name)
        .bind(&input.seal_no)
        .bind(&input.note)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(load)
    }

    /// Attach a handling unit to a load: creates the line and logs the LOAD
    /// move in the same transaction. The destination is the load's dock
    /// location when one is set.
    pub async fn create_load_line(
        &self,
        branch_id: Uuid,
        user_id: Uuid,
        input: CreateLoadLineInput,
    ) -> AppResult<LoadLine> {
        let mut tx = self.db.begin().await?;

        let dock_location_id = sqlx::query_scalar::<_, Option<Uuid>>(
            "SELECT dock_location_id FROM loads WHERE id = $1 AND branch_id = $2",
        )
        .bind(input.load_id)
        .bind(branch_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Load".to_string()))?;

        let line = sqlx::query_as::<_, LoadLine>(
            r#"
            INSERT INTO load_lines (branch_id, load_id, order_id, handling_unit_id, user_add)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, branch_id, load_id, order_id, handling_unit_id, active, user_add,
                      created_at, updated_at
            "#,
        )
        .bind(branch_id)
        .bind(input.load_id)
        .bind(input.order_id)
        .bind(input.handling_unit_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        log_move_in_tx(
            &mut tx,
            branch_id,
            user_id,
            LogMoveInput {
                handling_unit_id: input.handling_unit_id,
                move_type: MoveType::Load,
                from_location_id: None,
                to_location_id: dock_location_id,
                ref_code: Some(input.load_id.to_string()),
                note: None,
                moved_at: None,
            },
        )
        .await?;

        tx.commit().await?;

        Ok(line)
    }

    /// Update a load's status. The transition into DISPATCHED fans out one
    /// DISPATCH move per load line with no destination, taking each unit off
    /// hand. The transition into LOADED only stamps the timestamp; LOAD moves
    /// are logged per line at attach time.
    pub async fn update_load_status(
        &self,
        branch_id: Uuid,
        user_id: Uuid,
        load_id: Uuid,
        status: LoadStatus,
    ) -> AppResult<Load> {
        let mut tx = self.db.begin().await?;

        let previous = sqlx::query_as::<_, Load>(&format!(
            "SELECT {LOAD_COLUMNS} FROM loads WHERE id = $1 AND branch_id = $2 FOR UPDATE",
        ))
        .bind(load_id)
        .bind(branch_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Load".to_string()))?;

        if previous.status == LoadStatus::Dispatched && status != LoadStatus::Dispatched {
            return Err(AppError::InvalidStateTransition(
                "Dispatched load cannot be reopened".to_string(),
            ));
        }

        let became_dispatched = transitioned_into(&previous.status, &status, &LoadStatus::Dispatched);

        let updated = sqlx::query_as::<_, Load>(&format!(
            r#"
            UPDATE loads
            SET status = $3,
                loaded_at = CASE WHEN $3 = 'LOADED' AND loaded_at IS NULL THEN NOW() ELSE loaded_at END,
                dispatched_at = CASE WHEN $3 = 'DISPATCHED' AND dispatched_at IS NULL THEN NOW() ELSE dispatched_at END,
                updated_at = NOW()
            WHERE id = $1 AND branch_id = $2
            RETURNING {LOAD_COLUMNS}
            "#,
        ))
        .bind(load_id)
        .bind(branch_id)
        .bind(status)
        .fetch_one(&mut *tx)
        .await?;

        if became_dispatched {
            let unit_ids = sqlx::query_scalar::<_, Uuid>(
                "SELECT handling_unit_id FROM load_lines WHERE load_id = $1 AND branch_id = $2 ORDER BY created_at",
            )
            .bind(load_id)
            .bind(branch_id)
            .fetch_all(&mut *tx)
            .await?;

            for handling_unit_id in unit_ids {
                log_move_in_tx(
                    &mut tx,
                    branch_id,
                    user_id,
                    LogMoveInput {
                        handling_unit_id,
                        move_type: MoveType::Dispatch,
                        from_location_id: updated.dock_location_id,
                        to_location_id: None,
                        ref_code: Some(load_id.to_string()),
                        note: None,
                        moved_at: None,
                    },
                )
                .await?;
            }
        }

        tx.commit().await?;

        Ok(updated)
    }
}
