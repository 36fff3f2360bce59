use bigdecimal::{BigDecimal, Zero};
use chrono::NaiveDate;
use std::collections::HashSet;
use thiserror::Error;
use uuid::Uuid;

use crate::database::models::EarningInput;

/// Input problems caught at the write/query boundary. The aggregation itself
/// never fails; it trusts records that made it past these checks.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("start date {start} is after end date {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },

    #[error("amount must not be negative, got {0}")]
    NegativeAmount(BigDecimal),

    #[error("pool amount must not be negative, got {0}")]
    NegativePoolAmount(BigDecimal),

    #[error("participant {0} is listed more than once")]
    DuplicateParticipant(Uuid),
}

pub fn validate_earning_input(input: &EarningInput) -> Result<(), ValidationError> {
    if input.amount < BigDecimal::zero() {
        return Err(ValidationError::NegativeAmount(input.amount.clone()));
    }

    if let Some(pool) = &input.pool_amount {
        if *pool < BigDecimal::zero() {
            return Err(ValidationError::NegativePoolAmount(pool.clone()));
        }
    }

    let mut seen = HashSet::with_capacity(input.participants.len());
    for participant in &input.participants {
        if !seen.insert(participant) {
            return Err(ValidationError::DuplicateParticipant(*participant));
        }
    }

    Ok(())
}
