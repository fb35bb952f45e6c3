//! Shipping address snapshot

use serde::{Deserialize, Serialize};

use crate::utils::AppError;
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_optional_text,
    validate_required_text,
};

/// Address snapshot frozen onto drafts and orders.
///
/// 下单后地址即快照，地址簿后续修改不影响已建订单。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    pub full_name: String,
    pub phone: String,
    pub line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
}

impl Address {
    /// Validate the required fields (full name, phone, line1, city).
    pub fn validate(&self) -> Result<(), AppError> {
        validate_required_text(&self.full_name, "fullName", MAX_NAME_LEN)?;
        validate_required_text(&self.phone, "phone", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&self.line1, "line1", MAX_ADDRESS_LEN)?;
        validate_optional_text(&self.line2, "line2", MAX_ADDRESS_LEN)?;
        validate_required_text(&self.city, "city", MAX_ADDRESS_LEN)?;
        Ok(())
    }
}

/// Address input on checkout: either a saved address reference or an
/// inlined manual address.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressInput {
    pub address_id: Option<String>,
    pub address: Option<Address>,
}
