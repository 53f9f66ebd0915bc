//! Move ledger and inventory snapshot engine
//!
//! `log_move` is the single entry point through which every pipeline stage
//! records a handling-unit transition. One call produces exactly one
//! immutable `inventory_moves` row, upserts the `inventory` snapshot when a
//! destination is given, and applies the status-effect mapping to the
//! handling unit's cached status — all inside one transaction. The snapshot
//! and the status field are always derivable by replaying the ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{optional, AppError, AppResult};
use shared::models::{
    replay_location, replay_on_hand, replay_status, HuStatus, Inventory, InventoryMove, MoveType,
};
use shared::types::DateRange;

/// Service owning all writes to the move ledger and the inventory snapshot
#[derive(Clone)]
pub struct MoveLedgerService {
    db: PgPool,
}

/// Input for recording a move
#[derive(Debug, Clone, Deserialize)]
pub struct LogMoveInput {
    pub handling_unit_id: Uuid,
    pub move_type: MoveType,
    pub from_location_id: Option<Uuid>,
    pub to_location_id: Option<Uuid>,
    pub ref_code: Option<String>,
    pub note: Option<String>,
    pub moved_at: Option<DateTime<Utc>>,
}

/// Input for a manual transfer between locations
#[derive(Debug, Deserialize)]
pub struct TransferInput {
    pub handling_unit_id: Uuid,
    pub to_location_id: Uuid,
    pub note: Option<String>,
}

/// Input for a manual inventory adjustment
#[derive(Debug, Deserialize)]
pub struct AdjustmentInput {
    pub handling_unit_id: Uuid,
    pub to_location_id: Uuid,
    pub ref_code: Option<String>,
    pub note: Option<String>,
}

/// Filters for querying the ledger
#[derive(Debug, Default, Deserialize)]
pub struct MoveQuery {
    pub handling_unit_id: Option<Uuid>,
    pub move_type: Option<MoveType>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

/// Result of replaying a unit's ledger against its stored state
#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub handling_unit_id: Uuid,
    pub stored_status: HuStatus,
    pub replayed_status: HuStatus,
    pub stored_location_id: Option<Uuid>,
    pub replayed_location_id: Option<Uuid>,
    pub stored_on_hand: bool,
    pub replayed_on_hand: bool,
    pub consistent: bool,
}

/// Handling unit fields needed to admit a move, fetched under row lock
#[derive(Debug, sqlx::FromRow)]
struct LockedUnit {
    id: Uuid,
    hu_code: String,
    status: HuStatus,
    active: bool,
}

/// Ledger row joined with codes for CSV export
#[derive(Debug, Serialize, sqlx::FromRow)]
struct MoveExportRow {
    id: Uuid,
    hu_code: String,
    move_type: MoveType,
    from_location: Option<String>,
    to_location: Option<String>,
    ref_code: Option<String>,
    moved_at: DateTime<Utc>,
    note: Option<String>,
}

impl MoveLedgerService {
    /// Create a new MoveLedgerService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a move in its own transaction.
    ///
    /// Pipeline services that already hold a transaction (edge-triggered
    /// writes) call [`log_move_in_tx`] instead so the pipeline-entity update
    /// and the ledger effect commit or roll back together.
    pub async fn log_move(
        &self,
        branch_id: Uuid,
        user_id: Uuid,
        input: LogMoveInput,
    ) -> AppResult<InventoryMove> {
        let mut tx = self.db.begin().await?;
        let mv = log_move_in_tx(&mut tx, branch_id, user_id, input).await?;
        tx.commit().await?;
        Ok(mv)
    }

    /// Record a manual transfer: location changes, status does not
    pub async fn record_transfer(
        &self,
        branch_id: Uuid,
        user_id: Uuid,
        input: TransferInput,
    ) -> AppResult<InventoryMove> {
        // No snapshot yet is a valid starting point; a failed lookup is not
        let current = optional(self.get_inventory(branch_id, input.handling_unit_id).await)?;
        self.log_move(
            branch_id,
            user_id,
            LogMoveInput {
                handling_unit_id: input.handling_unit_id,
                move_type: MoveType::Transfer,
                from_location_id: current.and_then(|inv| inv.location_id),
                to_location_id: Some(input.to_location_id),
                ref_code: None,
                note: input.note,
                moved_at: None,
            },
        )
        .await
    }

    /// Record a manual adjustment: location changes, status does not
    pub async fn record_adjustment(
        &self,
        branch_id: Uuid,
        user_id: Uuid,
        input: AdjustmentInput,
    ) -> AppResult<InventoryMove> {
        let current = optional(self.get_inventory(branch_id, input.handling_unit_id).await)?;
        self.log_move(
            branch_id,
            user_id,
            LogMoveInput {
                handling_unit_id: input.handling_unit_id,
                move_type: MoveType::Adjust,
                from_location_id: current.and_then(|inv| inv.location_id),
                to_location_id: Some(input.to_location_id),
                ref_code: input.ref_code,
                note: input.note,
                moved_at: None,
            },
        )
        .await
    }

    /// Get the inventory snapshot for a handling unit
    pub async fn get_inventory(&self, branch_id: Uuid, handling_unit_id: Uuid) -> AppResult<Inventory> {
        sqlx::query_as::<_, Inventory>(
            r#"
            SELECT id, branch_id, handling_unit_id, location_id, on_hand, last_moved_at,
                   user_add, created_at, updated_at
            FROM inventory
            WHERE handling_unit_id = $1 AND branch_id = $2
            "#,
        )
        .bind(handling_unit_id)
        .bind(branch_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Inventory".to_string()))
    }

    /// List on-hand inventory, optionally restricted to one location
    pub async fn list_on_hand(
        &self,
        branch_id: Uuid,
        location_id: Option<Uuid>,
    ) -> AppResult<Vec<Inventory>> {
        let rows = sqlx::query_as::<_, Inventory>(
            r#"
            SELECT id, branch_id, handling_unit_id, location_id, on_hand, last_moved_at,
                   user_add, created_at, updated_at
            FROM inventory
            WHERE branch_id = $1
              AND on_hand
              AND ($2::uuid IS NULL OR location_id = $2)
            ORDER BY last_moved_at DESC NULLS LAST
            "#,
        )
        .bind(branch_id)
        .bind(location_id)
        .fetch_all(&self.db)
        .await?;

        Ok(rows)
    }

    /// Query the move ledger, filtered by handling unit, move type and date range
    pub async fn list_moves(&self, branch_id: Uuid, query: MoveQuery) -> AppResult<Vec<InventoryMove>> {
        let moves = sqlx::query_as::<_, InventoryMove>(
            r#"
            SELECT id, branch_id, handling_unit_id, move_type, from_location_id, to_location_id,
                   ref_code, moved_at, note, user_add, created_at
            FROM inventory_moves
            WHERE branch_id = $1
              AND ($2::uuid IS NULL OR handling_unit_id = $2)
              AND ($3::move_type IS NULL OR move_type = $3)
              AND ($4::timestamptz IS NULL OR moved_at >= $4)
              AND ($5::timestamptz IS NULL OR moved_at <= $5)
            ORDER BY moved_at, created_at
            "#,
        )
        .bind(branch_id)
        .bind(query.handling_unit_id)
        .bind(query.move_type)
        .bind(query.from)
        .bind(query.to)
        .fetch_all(&self.db)
        .await?;

        Ok(moves)
    }

    /// Export the move ledger for a date range as CSV
    pub async fn export_moves_csv(&self, branch_id: Uuid, range: DateRange) -> AppResult<String> {
        let rows = sqlx::query_as::<_, MoveExportRow>(
            r#"
            SELECT m.id, hu.hu_code, m.move_type,
                   fl.code AS from_location, tl.code AS to_location,
                   m.ref_code, m.moved_at, m.note
            FROM inventory_moves m
            JOIN handling_units hu ON hu.id = m.handling_unit_id
            LEFT JOIN locations fl ON fl.id = m.from_location_id
            LEFT JOIN locations tl ON tl.id = m.to_location_id
            WHERE m.branch_id = $1
              AND m.moved_at >= $2::date
              AND m.moved_at < ($3::date + INTERVAL '1 day')
            ORDER BY m.moved_at, m.created_at
            "#,
        )
        .bind(branch_id)
        .bind(range.start)
        .bind(range.end)
        .fetch_all(&self.db)
        .await?;

        let mut writer = csv::Writer::from_writer(Vec::new());
        for row in rows {
            writer
                .serialize(row)
                .map_err(|e| AppError::Internal(format!("CSV serialization failed: {}", e)))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::Internal(format!("CSV flush failed: {}", e)))?;

        String::from_utf8(bytes).map_err(|e| AppError::Internal(format!("CSV not UTF-8: {}", e)))
    }

    /// Replay a unit's ledger and compare it against the stored status,
    /// snapshot location and on-hand flag
    pub async fn verify_replay(&self, branch_id: Uuid, handling_unit_id: Uuid) -> AppResult<ReplayReport> {
        let unit = sqlx::query_as::<_, LockedUnit>(
            "SELECT id, hu_code, status, active FROM handling_units WHERE id = $1 AND branch_id = $2",
        )
        .bind(handling_unit_id)
        .bind(branch_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Handling unit".to_string()))?;

        let moves = self
            .list_moves(
                branch_id,
                MoveQuery {
                    handling_unit_id: Some(handling_unit_id),
                    ..Default::default()
                },
            )
            .await?;

        let types: Vec<MoveType> = moves.iter().map(|m| m.move_type).collect();
        let located: Vec<(MoveType, Option<Uuid>)> =
            moves.iter().map(|m| (m.move_type, m.to_location_id)).collect();

        let replayed_status = replay_status(&types);
        let replayed_location_id = replay_location(&located);
        let replayed_on_hand = replay_on_hand(&types);

        let snapshot = optional(self.get_inventory(branch_id, handling_unit_id).await)?;
        let stored_location_id = snapshot.as_ref().and_then(|inv| inv.location_id);
        let stored_on_hand = snapshot.as_ref().map(|inv| inv.on_hand).unwrap_or(true);

        let consistent = unit.status == replayed_status
            && stored_location_id == replayed_location_id
            && stored_on_hand == replayed_on_hand;

        Ok(ReplayReport {
            handling_unit_id,
            stored_status: unit.status,
            replayed_status,
            stored_location_id,
            replayed_location_id,
            stored_on_hand,
            replayed_on_hand,
            consistent,
        })
    }
}

/// Record a move inside an already-open transaction.
///
/// Sequence: lock the handling unit row, insert the immutable ledger row,
/// upsert the snapshot if a destination is given, apply the status effect.
/// The caller's transaction boundary makes the whole write all-or-nothing.
pub async fn log_move_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    branch_id: Uuid,
    user_id: Uuid,
    input: LogMoveInput,
) -> AppResult<InventoryMove> {
    // Lock the unit so concurrent ledger writes for it serialize
    let unit = sqlx::query_as::<_, LockedUnit>(
        r#"
        SELECT id, hu_code, status, active
        FROM handling_units
        WHERE id = $1 AND branch_id = $2
        FOR UPDATE
        "#,
    )
    .bind(input.handling_unit_id)
    .bind(branch_id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or_else(|| AppError::NotFound("Handling unit".to_string()))?;

    if !unit.active {
        return Err(AppError::HandlingUnitInactive(unit.hu_code));
    }
    if unit.status.is_terminal() {
        return Err(AppError::AlreadyDispatched(unit.hu_code));
    }

    if let Some(location_id) = input.to_location_id {
        let location_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM locations WHERE id = $1 AND branch_id = $2)",
        )
        .bind(location_id)
        .bind(branch_id)
        .fetch_one(&mut **tx)
        .await?;

        if !location_exists {
            return Err(AppError::NotFound("Location".to_string()));
        }
    }

    let moved_at = input.moved_at.unwrap_or_else(Utc::now);

    let mv = sqlx::query_as::<_, InventoryMove>(
        r#"
        INSERT INTO inventory_moves (
            branch_id, handling_unit_id, move_type, from_location_id, to_location_id,
            ref_code, moved_at, note, user_add
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        RETURNING id, branch_id, handling_unit_id, move_type, from_location_id, to_location_id,
                  ref_code, moved_at, note, user_add, created_at
        "#,
    )
    .bind(branch_id)
    .bind(input.handling_unit_id)
    .bind(input.move_type)
    .bind(input.from_location_id)
    .bind(input.to_location_id)
    .bind(&input.ref_code)
    .bind(moved_at)
    .bind(&input.note)
    .bind(user_id)
    .fetch_one(&mut **tx)
    .await?;

    if let Some(location_id) = input.to_location_id {
        ensure_inventory(tx, branch_id, user_id, input.handling_unit_id, location_id, moved_at)
            .await?;
    }

    if let Some(new_status) = input.move_type.status_effect() {
        if unit.status != new_status {
            sqlx::query(
                "UPDATE handling_units SET status = $2, updated_at = NOW() WHERE id = $1",
            )
            .bind(input.handling_unit_id)
            .bind(new_status)
            .execute(&mut **tx)
            .await?;
        }
    }

    // Dispatch takes the unit off hand; a unit dispatched straight from a
    // dock may never have had a snapshot row, so create one if needed.
    if input.move_type == MoveType::Dispatch {
        let updated = sqlx::query(
            "UPDATE inventory SET on_hand = FALSE, last_moved_at = $3, updated_at = NOW()
             WHERE handling_unit_id = $1 AND branch_id = $2",
        )
        .bind(input.handling_unit_id)
        .bind(branch_id)
        .bind(moved_at)
        .execute(&mut **tx)
        .await?;

        if updated.rows_affected() == 0 {
            sqlx::query(
                r#"
                INSERT INTO inventory (branch_id, handling_unit_id, location_id, on_hand, last_moved_at, user_add)
                VALUES ($1, $2, NULL, FALSE, $3, $4)
                "#,
            )
            .bind(branch_id)
            .bind(input.handling_unit_id)
            .bind(moved_at)
            .bind(user_id)
            .execute(&mut **tx)
            .await?;
        }
    }

    tracing::debug!(
        handling_unit = %unit.hu_code,
        move_type = %input.move_type,
        "recorded inventory move"
    );

    Ok(mv)
}

/// Idempotent snapshot primitive: create the row on first touch, update the
/// location and timestamp only when the location actually changed.
pub async fn ensure_inventory(
    tx: &mut Transaction<'_, Postgres>,
    branch_id: Uuid,
    user_id: Uuid,
    handling_unit_id: Uuid,
    location_id: Uuid,
    moved_at: DateTime<Utc>,
) -> AppResult<()> {
    sqlx::query(
        r#"
        INSERT INTO inventory (branch_id, handling_unit_id, location_id, on_hand, last_moved_at, user_add)
        VALUES ($1, $2, $3, TRUE, $4, $5)
        ON CONFLICT (handling_unit_id) DO UPDATE
        SET location_id = EXCLUDED.location_id,
            last_moved_at = EXCLUDED.last_moved_at,
            updated_at = NOW()
        WHERE inventory.location_id IS DISTINCT FROM EXCLUDED.location_id
        "#,
    )
    .bind(branch_id)
    .bind(handling_unit_id)
    .bind(location_id)
    .bind(moved_at)
    .bind(user_id)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
