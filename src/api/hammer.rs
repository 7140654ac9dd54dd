use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use super::AppState;
use crate::{
    error::Result,
    models::{Account, ApiResponse, LevelStatus, UpgradeView},
    services::onchain::parse_address,
};

#[derive(Debug, Default, Deserialize)]
pub struct LevelQuery {
    pub address: Option<String>,
}

/// GET /api/v1/hammer/level
///
/// Without `address` the configured wallet is read.
pub async fn get_level(
    State(state): State<AppState>,
    Query(query): Query<LevelQuery>,
) -> Result<Json<ApiResponse<LevelStatus>>> {
    let account = match query.address.as_deref().map(str::trim).filter(|a| !a.is_empty()) {
        Some(raw) => Account::connected(parse_address(raw)?),
        None => state.wallet.account(),
    };

    let status = state.level_reader.read(&account).await;
    tracing::info!(
        "hammer_level_check owner={:?} level={} has_token={} is_error={}",
        account.address,
        status.current_level,
        status.has_token,
        status.is_error
    );
    Ok(Json(ApiResponse::success(status)))
}

/// GET /api/v1/hammer/upgrade
pub async fn get_upgrade(State(state): State<AppState>) -> Json<ApiResponse<UpgradeView>> {
    Json(ApiResponse::success(state.upgrade_flow.load().await))
}

/// POST /api/v1/hammer/upgrade
pub async fn submit_upgrade(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<UpgradeView>>> {
    let view = state.upgrade_flow.submit().await?;
    Ok(Json(ApiResponse::success(view)))
}

/// POST /api/v1/hammer/refresh
pub async fn refresh(State(state): State<AppState>) -> Json<ApiResponse<UpgradeView>> {
    Json(ApiResponse::success(state.upgrade_flow.reload().await))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::AppError;
    use crate::services::testing::{owner, FakeHammerContract, StaticWallet};
    use ethers::types::{Address, U256};
    use std::sync::atomic::Ordering;
    use std::sync::Arc;

    fn state_with(contract: Arc<FakeHammerContract>, account: Account) -> AppState {
        AppState::new(
            Config::for_tests(),
            contract,
            Arc::new(StaticWallet(account)),
        )
    }

    #[tokio::test]
    async fn level_defaults_to_wallet_account() {
        let contract = Arc::new(FakeHammerContract::with_balances([1, 1, 0]));
        let state = state_with(contract.clone(), Account::connected(owner()));

        let Json(response) = get_level(State(state), Query(LevelQuery::default()))
            .await
            .expect("level read should succeed");
        assert!(response.success);
        assert_eq!(response.data.current_level, 1);
        assert!(response.data.has_token);
        assert_eq!(contract.last_balance_request().map(|(o, _)| o), Some(owner()));
    }

    #[tokio::test]
    async fn level_reads_explicit_address() {
        let contract = Arc::new(FakeHammerContract::with_balances([0, 0, 0]));
        let state = state_with(contract.clone(), Account::disconnected());
        let other = "0x00000000000000000000000000000000000000aa";

        let Json(response) = get_level(
            State(state),
            Query(LevelQuery {
                address: Some(other.to_string()),
            }),
        )
        .await
        .expect("level read should succeed");
        assert_eq!(response.data.current_level, -1);
        assert!(!response.data.has_token);
        assert_eq!(
            contract.last_balance_request().map(|(o, _)| o),
            Some(Address::from_low_u64_be(0xaa))
        );
    }

    #[tokio::test]
    async fn level_rejects_malformed_address() {
        let contract = Arc::new(FakeHammerContract::with_balances([0, 0, 0]));
        let state = state_with(contract.clone(), Account::disconnected());

        let result = get_level(
            State(state),
            Query(LevelQuery {
                address: Some("0xnope".to_string()),
            }),
        )
        .await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert_eq!(contract.balance_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn submit_sends_target_and_price() {
        let contract = Arc::new(FakeHammerContract::with_balances([1, 0, 0]).with_price(1, 500));
        let state = state_with(contract.clone(), Account::connected(owner()));

        let Json(view) = get_upgrade(State(state.clone())).await;
        assert_eq!(view.data.target_level, Some(1));

        let Json(response) = submit_upgrade(State(state))
            .await
            .expect("submission should succeed");
        assert_eq!(contract.upgrades(), vec![(U256::from(1), U256::from(500))]);
        let action = response.data.action.expect("action renders");
        assert!(action.disabled);
    }

    #[tokio::test]
    async fn submit_without_price_is_rejected() {
        let contract = Arc::new(FakeHammerContract::with_balances([1, 0, 0]).with_price(1, 500));
        let state = state_with(contract.clone(), Account::connected(owner()));

        let result = submit_upgrade(State(state)).await;
        assert!(matches!(result, Err(AppError::UpgradeNotReady)));
        assert!(contract.upgrades().is_empty());
    }

    #[tokio::test]
    async fn refresh_rereads_level() {
        let contract = Arc::new(FakeHammerContract::with_balances([0, 1, 0]).with_price(2, 900));
        let state = state_with(contract.clone(), Account::connected(owner()));

        let Json(view) = refresh(State(state)).await;
        assert_eq!(view.data.level.current_level, 1);
        assert_eq!(view.data.price_wei.as_deref(), Some("900"));
        assert_eq!(contract.balance_calls.load(Ordering::SeqCst), 1);
    }
}
