use chrono::Utc;
use serde::Serialize;

use crate::{
    InteracTransfer, MoneyRequest, ResultEngine, SendInterac, SentTransfer, SettlementSuggestion,
};

use super::{Engine, with_ledger};

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TransferHistory {
    pub transfers: Vec<InteracTransfer>,
    pub money_requests: Vec<MoneyRequest>,
}

impl Engine {
    pub fn send_interac(&self, send: SendInterac) -> ResultEngine<SentTransfer> {
        with_ledger!(self, |ledger| {
            let sent = ledger.send_interac(send, Utc::now())?;
            tracing::debug!(
                id = %sent.transfer.id,
                amount = sent.transfer.amount,
                from_wallet = sent.transfer.from_wallet,
                "interac transfer sent"
            );
            Ok(sent)
        })
    }

    pub fn request_money(
        &self,
        requester_email: &str,
        amount: f64,
        reason: Option<&str>,
    ) -> ResultEngine<MoneyRequest> {
        with_ledger!(self, |ledger| {
            let request = ledger.request_money(requester_email, amount, reason, Utc::now())?;
            tracing::debug!(id = %request.id, amount, "money requested");
            Ok(request)
        })
    }

    pub fn settle_expense(
        &self,
        index: usize,
        recipient_email: &str,
    ) -> ResultEngine<InteracTransfer> {
        with_ledger!(self, |ledger| {
            let transfer = ledger.settle_expense(index, recipient_email, Utc::now())?;
            tracing::debug!(index, id = %transfer.id, "expense settled");
            Ok(transfer)
        })
    }

    pub fn transfers(&self) -> TransferHistory {
        self.ledger()
            .map(|l| TransferHistory {
                transfers: l.transactions,
                money_requests: l.money_requests,
            })
            .unwrap_or_default()
    }

    pub fn settlement_suggestions(&self, split_ways: u32) -> Vec<SettlementSuggestion> {
        self.ledger()
            .map(|l| l.settlement_suggestions(split_ways))
            .unwrap_or_default()
    }
}
