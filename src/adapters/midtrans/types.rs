//! Wire types for the Midtrans Core API charge endpoint.

use serde::{Deserialize, Serialize};

use crate::ports::{ChargeAction, ChargeRequest, ChargeResponse};

/// Request body for `POST /v2/charge`.
#[derive(Debug, Serialize)]
pub(super) struct ChargeBody {
    pub payment_type: &'static str,
    pub transaction_details: TransactionDetails,
    pub item_details: Vec<WireItemDetail>,
    pub qris: QrisOptions,
}

#[derive(Debug, Serialize)]
pub(super) struct TransactionDetails {
    pub order_id: String,
    pub gross_amount: i64,
}

#[derive(Debug, Serialize)]
pub(super) struct WireItemDetail {
    pub name: String,
    pub price: i64,
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
pub(super) struct QrisOptions {
    pub acquirer: &'static str,
}

impl ChargeBody {
    pub fn from_request(request: ChargeRequest) -> Self {
        Self {
            payment_type: "qris",
            transaction_details: TransactionDetails {
                order_id: request.order_id,
                gross_amount: request.gross_amount,
            },
            item_details: request
                .items
                .into_iter()
                .map(|item| WireItemDetail {
                    name: item.name,
                    price: item.price,
                    quantity: item.quantity,
                })
                .collect(),
            qris: QrisOptions { acquirer: "gopay" },
        }
    }
}

/// Response body of `POST /v2/charge`.
///
/// Midtrans reports application-level failures with a 200 response and a
/// non-2xx `status_code` field, so the field is inspected rather than the
/// HTTP status alone.
#[derive(Debug, Deserialize)]
pub(super) struct ChargeReply {
    pub status_code: String,
    #[serde(default)]
    pub status_message: String,
    #[serde(default)]
    pub transaction_status: String,
    #[serde(default)]
    pub actions: Vec<WireAction>,
}

#[derive(Debug, Deserialize)]
pub(super) struct WireAction {
    pub name: String,
    pub url: String,
}

impl ChargeReply {
    /// True when the provider accepted the charge (200 or 201).
    pub fn accepted(&self) -> bool {
        matches!(self.status_code.as_str(), "200" | "201")
    }

    pub fn into_response(self) -> ChargeResponse {
        ChargeResponse {
            transaction_status: self.transaction_status,
            actions: self
                .actions
                .into_iter()
                .map(|action| ChargeAction {
                    name: action.name,
                    url: action.url,
                })
                .collect(),
        }
    }
}
