use crate::errors::{AppError, Result};
use crate::models::Identity;
use crate::services::ledger::{aggregate, LedgerView};
use crate::AppState;

/// Read path shared by every page. A document that cannot be loaded is an error;
/// defaults are never substituted for it.
pub async fn get_financial_view(state: &AppState, identity: &Identity) -> Result<LedgerView> {
    let data = state
        .store
        .load(identity)
        .await
        .map_err(|source| AppError::LoadFailed {
            identity: identity.to_string(),
            source,
        })?;
    Ok(aggregate(&data))
}
