// src/models/mod.rs
pub mod hammer;

use serde::Serialize;

pub use hammer::{
    score_multiplier, Account, ActionEvent, ActionView, LevelStatus, QueryState, UpgradeAction,
    UpgradeView,
};

// ==================== API RESPONSE ====================
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
