//! Static merchant ledger shown on the dashboard.
//!
//! Nothing here is derived from checkout sessions; the dashboard is a
//! fixed showcase.

use rust_decimal::Decimal;
use settle_sdk::format::format_usd;
use settle_sdk::objects::{DashboardStats, MockTransaction};

struct Row {
    id: &'static str,
    order_id: &'static str,
    date: &'static str,
    status: &'static str,
    source_chain: &'static str,
    source_amount: &'static str,
    settlement_chain: &'static str,
    settlement_amount: &'static str,
    exchange_rate: &'static str,
    tx_hash: &'static str,
    settlement_tx_hash: Option<&'static str>,
}

const ROWS: [Row; 3] = [
    Row {
        id: "1",
        order_id: "ORDER-12345",
        date: "2024-01-15",
        status: "Settled",
        source_chain: "Ethereum",
        source_amount: "0.05 ETH",
        settlement_chain: "Polygon",
        settlement_amount: "150.23 USDC",
        exchange_rate: "1 ETH = 3,004.60 USD",
        tx_hash: "0x1234...5678",
        settlement_tx_hash: Some("0x8765...4321"),
    },
    Row {
        id: "2",
        order_id: "ORDER-12346",
        date: "2024-01-15",
        status: "Processing",
        source_chain: "Solana",
        source_amount: "1.15 SOL",
        settlement_chain: "Polygon",
        settlement_amount: "149.50 USDC",
        exchange_rate: "1 SOL = 130.00 USD",
        tx_hash: "0x2345...6789",
        settlement_tx_hash: None,
    },
    Row {
        id: "3",
        order_id: "ORDER-12347",
        date: "2024-01-14",
        status: "Settled",
        source_chain: "Arbitrum",
        source_amount: "100.00 USDC",
        settlement_chain: "Polygon",
        settlement_amount: "99.75 USDC",
        exchange_rate: "1 USDC = 1.00 USD",
        tx_hash: "0x3456...7890",
        settlement_tx_hash: Some("0x9876...5432"),
    },
];

impl From<&Row> for MockTransaction {
    fn from(row: &Row) -> Self {
        MockTransaction {
            id: row.id.to_owned(),
            order_id: row.order_id.to_owned(),
            date: row.date.to_owned(),
            customer_payment: format!("{} on {}", row.source_amount, row.source_chain),
            amount_settled: row.settlement_amount.to_owned(),
            status: row.status.to_owned(),
            source_chain: row.source_chain.to_owned(),
            source_amount: row.source_amount.to_owned(),
            settlement_chain: row.settlement_chain.to_owned(),
            settlement_amount: row.settlement_amount.to_owned(),
            exchange_rate: row.exchange_rate.to_owned(),
            tx_hash: row.tx_hash.to_owned(),
            settlement_tx_hash: row.settlement_tx_hash.map(str::to_owned),
        }
    }
}

/// All transactions, newest first.
pub fn mock_transactions() -> Vec<MockTransaction> {
    ROWS.iter().map(MockTransaction::from).collect()
}

/// Transactions whose status label matches `status`, ignoring case.
pub fn transactions_with_status(status: &str) -> Vec<MockTransaction> {
    ROWS.iter()
        .filter(|row| row.status.eq_ignore_ascii_case(status))
        .map(MockTransaction::from)
        .collect()
}

pub fn dashboard_stats() -> DashboardStats {
    let total_volume = Decimal::new(4_562_345, 2);
    let average_sale = Decimal::new(19_841, 2);
    DashboardStats {
        total_volume,
        total_volume_display: format_usd(total_volume),
        transactions_today: 23,
        average_sale,
        average_sale_display: format_usd(average_sale),
        conversion_rate: Decimal::new(942, 1),
    }
}
