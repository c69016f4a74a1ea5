//! Typed webhook fields.

use rust_decimal::Decimal;
use serde::Serialize;

/// The thirteen fields a gateway notification may carry.
///
/// Every field is optional; presence is enforced later by the validator,
/// not by parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CallbackFields {
    pub transaction_type: Option<String>,
    pub transaction_id: Option<String>,
    pub transaction_status: Option<String>,
    pub error_code: Option<String>,
    pub error_description: Option<String>,
    pub terminal_name: Option<String>,
    pub amount: Option<Decimal>,
    pub currency: Option<String>,
    pub order_id: Option<String>,
    pub order_description: Option<String>,
    pub payment_time: Option<String>,
    pub commission: Option<Decimal>,
    pub email: Option<String>,
}

/// Wire names of the string-valued fields.
pub(crate) const STRING_FIELDS: [&str; 11] = [
    "transactionType",
    "transactionId",
    "transactionStatus",
    "errorCode",
    "errorDescription",
    "terminalName",
    "currency",
    "orderId",
    "orderDescription",
    "paymentTime",
    "email",
];

/// Wire names of the numeric fields.
pub(crate) const NUMERIC_FIELDS: [&str; 2] = ["amount", "commission"];

impl CallbackFields {
    pub(crate) fn set_string(&mut self, name: &str, value: Option<String>) {
        let slot = match name {
            "transactionType" => &mut self.transaction_type,
            "transactionId" => &mut self.transaction_id,
            "transactionStatus" => &mut self.transaction_status,
            "errorCode" => &mut self.error_code,
            "errorDescription" => &mut self.error_description,
            "terminalName" => &mut self.terminal_name,
            "currency" => &mut self.currency,
            "orderId" => &mut self.order_id,
            "orderDescription" => &mut self.order_description,
            "paymentTime" => &mut self.payment_time,
            "email" => &mut self.email,
            _ => return,
        };
        *slot = value;
    }

    pub(crate) fn set_number(&mut self, name: &str, value: Option<Decimal>) {
        match name {
            "amount" => self.amount = value,
            "commission" => self.commission = value,
            _ => {}
        }
    }

    /// Returns true if no field was supplied.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
