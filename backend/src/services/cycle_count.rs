//! Cycle counting
//!
//! Counts reconcile the inventory snapshot against the floor. Recording a
//! count line compares the snapshot's location with what the counter found;
//! a discrepancy produces an ADJUST move that relocates the unit without
//! touching its pipeline status.

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::ledger::{log_move_in_tx, LogMoveInput};
use shared::models::{CycleCount, CycleCountLine, CycleCountStatus, MoveType};

#[derive(Clone)]
pub struct CycleCountService {
    db: PgPool,
}

/// Input for scheduling a cycle count
#[derive(Debug, Deserialize)]
pub struct CreateCycleCountInput {
    pub warehouse_id: Uuid,
    pub scheduled_date: NaiveDate,
    pub note: Option<String>,
}

/// Input for recording one counted location/unit pair
#[derive(Debug, Deserialize)]
pub struct RecordCountLineInput {
    pub cycle_count_id: Uuid,
    /// Location the counter was standing at
    pub location_id: Uuid,
    pub handling_unit_id: Option<Uuid>,
    /// Whether the unit was physically found at the location
    pub found_present: bool,
    pub note: Option<String>,
}

const COUNT_COLUMNS: &str = "id, branch_id, warehouse_id, scheduled_date, status, note, active, \
                             user_add, created_at, updated_at";

const LINE_COLUMNS: &str = "id, branch_id, cycle_count_id, location_id, handling_unit_id, \
                            expected_present, found_present, note, counted_at, active, user_add, \
                            created_at, updated_at";

impl CycleCountService {
    /// Create a new CycleCountService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Schedule a count
    pub async fn create_count(
        &self,
        branch_id: Uuid,
        user_id: Uuid,
        input: CreateCycleCountInput,
    ) -> AppResult<CycleCount> {
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

        let count = sqlx::query_as::<_, CycleCount>(&format!(
            r#"
            INSERT INTO cycle_counts (branch_id, warehouse_id, scheduled_date, note, user_add)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {COUNT_COLUMNS}
            "#,
        ))
        .bind(branch_id)
        .bind(input.warehouse_id)
        .bind(input.scheduled_date)
        .bind(&input.note)
        .bind(user_id)
        .fetch_one(&self.db)
        .await?;

        Ok(count)
    }

    /// Update a count's status
    pub async fn update_count_status(
        &self,
        branch_id: Uuid,
        count_id: Uuid,
        status: CycleCountStatus,
    ) -> AppResult<CycleCount> {
        sqlx::query_as::<_, CycleCount>(&format!(
            r#"
            UPDATE cycle_counts SET status = $3, updated_at = NOW()
            WHERE id = $1 AND branch_id = $2
            RETURNING {COUNT_COLUMNS}
            "#,
        ))
        .bind(count_id)
        .bind(branch_id)
        .bind(status)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Cycle count".to_string()))
    }

    /// List counts for the branch
    pub async fn list_counts(&self, branch_id: Uuid) -> AppResult<Vec<CycleCount>> {
        let counts = sqlx::query_as::<_, CycleCount>(&format!(
            "SELECT {COUNT_COLUMNS} FROM cycle_counts WHERE branch_id = $1 ORDER BY scheduled_date DESC",
        ))
        .bind(branch_id)
        .fetch_all(&self.db)
        .await?;

        Ok(counts)
    }

    /// Record a count line. When a unit is found at a different location than
    /// the snapshot says, an ADJUST move relocates it; a unit found where
    /// expected, or a line with no unit, logs nothing.
    pub async fn record_line(
        &self,
        branch_id: Uuid,
        user_id: Uuid,
        input: RecordCountLineInput,
    ) -> AppResult<CycleCountLine> {
        let mut tx = self.db.begin().await?;

        let count_status = sqlx::query_scalar::<_, CycleCountStatus>(
            "SELECT status FROM cycle_counts WHERE id = $1 AND branch_id = $2 FOR UPDATE",
        )
        .bind(input.cycle_count_id)
        .bind(branch_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Cycle count".to_string()))?;

        if count_status == CycleCountStatus::Done {
            return Err(AppError::InvalidStateTransition(
                "Cycle count is already closed".to_string(),
            ));
        }

        // Snapshot location, if the unit has one on hand
        let snapshot_location: Option<Uuid> = match input.handling_unit_id {
            Some(unit_id) => sqlx::query_scalar::<_, Option<Uuid>>(
                "SELECT location_id FROM inventory WHERE handling_unit_id = $1 AND on_hand",
            )
            .bind(unit_id)
            .fetch_optional(&mut *tx)
            .await?
            .flatten(),
            None => None,
        };

        let expected_present = snapshot_location == Some(input.location_id);

        let line = sqlx::query_as::<_, CycleCountLine>(&format!(
            r#"
            INSERT INTO cycle_count_lines (branch_id, cycle_count_id, location_id, handling_unit_id,
                                           expected_present, found_present, note, counted_at, user_add)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW(), $8)
            RETURNING {LINE_COLUMNS}
            "#,
        ))
        .bind(branch_id)
        .bind(input.cycle_count_id)
        .bind(input.location_id)
        .bind(input.handling_unit_id)
        .bind(expected_present)
        .bind(input.found_present)
        .bind(&input.note)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;

        // Found somewhere the snapshot disagrees with: relocate via ADJUST
        if let Some(unit_id) = input.handling_unit_id {
            if input.found_present && !expected_present {
                log_move_in_tx(
                    &mut tx,
                    branch_id,
                    user_id,
                    LogMoveInput {
                        handling_unit_id: unit_id,
                        move_type: MoveType::Adjust,
                        from_location_id: snapshot_location,
                        to_location_id: Some(input.location_id),
                        ref_code: Some(input.cycle_count_id.to_string()),
                        note: Some("Cycle count correction".to_string()),
                        moved_at: None,
                    },
                )
                .await?;
            }
        }

        tx.commit().await?;

        Ok(line)
    }

    /// List lines under a count
    pub async fn list_lines(
        &self,
        branch_id: Uuid,
        count_id: Uuid,
    ) -> AppResult<Vec<CycleCountLine>> {
        let lines = sqlx::query_as::<_, CycleCountLine>(&format!(
            r#"
            SELECT {LINE_COLUMNS} FROM cycle_count_lines
            WHERE cycle_count_id = $1 AND branch_id = $2
            ORDER BY created_at
            "#,
        ))
        .bind(count_id)
        .bind(branch_id)
        .fetch_all(&self.db)
        .await?;

        Ok(lines)
    }
}
