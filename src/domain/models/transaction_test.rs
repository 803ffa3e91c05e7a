use anyhow::Result;
use test_utils::profile_fixture;
use test_utils::transactions_fixture;
use test_utils::wallet_fixture;

use super::format_amount;
use super::Profile;
use super::Totals;
use super::TransactionFilter;
use super::TransactionId;
use super::TransactionList;
use super::Wallet;

#[test]
fn it_parses_profiles() -> Result<()> {
    let profile: Profile = serde_json::from_str(profile_fixture())?;
    assert_eq!(profile.user_id, "u-42".to_string());
    assert_eq!(profile.username, "lan".to_string());
    return Ok(());
}

#[test]
fn it_parses_string_balances() -> Result<()> {
    let wallet: Wallet = serde_json::from_str(wallet_fixture())?;
    assert_eq!(wallet.data.total_balance.value(), 1250000.0);
    return Ok(());
}

#[test]
fn it_parses_wrapped_and_bare_feeds() -> Result<()> {
    let wrapped: TransactionList = serde_json::from_str(transactions_fixture())?;
    let items = wrapped.into_vec();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0].id, TransactionId::Number(1));
    assert_eq!(items[1].id, TransactionId::Text("2".to_string()));

    let bare: TransactionList = serde_json::from_str(r#"[{"id":7,"amount":10}]"#)?;
    assert_eq!(bare.into_vec().len(), 1);

    return Ok(());
}

#[test]
fn it_totals_income_and_expense() -> Result<()> {
    let items = serde_json::from_str::<TransactionList>(transactions_fixture())?.into_vec();
    let totals = Totals::from_transactions(&items);

    assert_eq!(totals.income, 5000000.0);
    assert_eq!(totals.expense, 20000.0);
    assert_eq!(totals.total, 4980000.0);
    return Ok(());
}

#[test]
fn it_reads_the_day_from_date_or_created_at() -> Result<()> {
    let items = serde_json::from_str::<TransactionList>(transactions_fixture())?.into_vec();
    assert_eq!(items[0].day(), Some("2026-10-18"));
    assert_eq!(items[1].day(), Some("2026-10-18"));
    assert_eq!(items[2].day(), None);
    return Ok(());
}

#[test]
fn it_maps_filters_to_query_values() {
    assert_eq!(TransactionFilter::All.as_query(), None);
    assert_eq!(TransactionFilter::Expense.as_query(), Some("EXPENSE"));
    assert_eq!(TransactionFilter::parse("income"), Some(TransactionFilter::Income));
    assert_eq!(TransactionFilter::parse("INCOME"), None);
}

#[test]
fn it_formats_amounts_with_vietnamese_grouping() {
    assert_eq!(format_amount(0.0), "0".to_string());
    assert_eq!(format_amount(999.0), "999".to_string());
    assert_eq!(format_amount(1250000.0), "1.250.000".to_string());
    assert_eq!(format_amount(-20000.0), "-20.000".to_string());
}
