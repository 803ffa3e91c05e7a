#[cfg(test)]
#[path = "transaction_test.rs"]
mod tests;

use serde::Deserialize;
use serde::Serialize;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub access_token: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user_id: String,
    pub username: String,
    pub email: String,
}

/// The API serves money both as JSON numbers and as numeric strings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Amount {
    Number(f64),
    Text(String),
}

impl Default for Amount {
    fn default() -> Amount {
        return Amount::Number(0.0);
    }
}

impl Amount {
    /// Numeric value, zero when the text is not a number.
    pub fn value(&self) -> f64 {
        match self {
            Amount::Number(val) => return *val,
            Amount::Text(text) => return text.trim().parse::<f64>().unwrap_or(0.0),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletData {
    #[serde(default)]
    pub total_balance: Amount,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    pub message: Option<String>,
    #[serde(default)]
    pub data: WalletData,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransactionId {
    Number(i64),
    Text(String),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    #[serde(default)]
    pub amount: Amount,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub note: Option<String>,
    pub category_name: Option<String>,
    pub date: Option<String>,
    pub created_at: Option<String>,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        return self.kind.as_deref() == Some("INCOME");
    }

    /// The calendar day the transaction belongs to, `YYYY-MM-DD`.
    pub fn day(&self) -> Option<&str> {
        let raw = self.date.as_deref().or(self.created_at.as_deref())?;
        return raw.get(..10);
    }
}

/// Feed responses come either wrapped in `data` or as a bare list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TransactionList {
    Wrapped { data: Vec<Transaction> },
    Bare(Vec<Transaction>),
}

impl TransactionList {
    pub fn into_vec(self) -> Vec<Transaction> {
        match self {
            TransactionList::Wrapped { data } => return data,
            TransactionList::Bare(items) => return items,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum TransactionFilter {
    All,
    Expense,
    Income,
}

impl TransactionFilter {
    pub fn parse(text: &str) -> Option<TransactionFilter> {
        return TransactionFilter::iter().find(|e| return e.to_string() == text);
    }

    /// Value for the `type` query parameter. `All` sends nothing.
    pub fn as_query(&self) -> Option<&'static str> {
        match self {
            TransactionFilter::All => return None,
            TransactionFilter::Expense => return Some("EXPENSE"),
            TransactionFilter::Income => return Some("INCOME"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionQuery {
    pub filter: TransactionFilter,
    pub created_at_start: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl Default for TransactionQuery {
    fn default() -> TransactionQuery {
        return TransactionQuery {
            filter: TransactionFilter::All,
            created_at_start: None,
            start_date: None,
            end_date: None,
        };
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Totals {
    pub income: f64,
    pub expense: f64,
    pub total: f64,
}

impl Totals {
    /// Anything that is not income counts as an expense.
    pub fn from_transactions(items: &[Transaction]) -> Totals {
        let mut totals = Totals::default();
        for item in items {
            let amount = item.amount.value();
            if item.is_income() {
                totals.income += amount;
            } else {
                totals.expense += amount;
            }
        }
        totals.total = totals.income - totals.expense;

        return totals;
    }
}

/// Formats a VND amount with vi-VN digit grouping, `1250000` → `1.250.000`.
pub fn format_amount(value: f64) -> String {
    let rounded = value.round() as i64;
    let digits = rounded.unsigned_abs().to_string();

    let mut grouped: Vec<String> = vec![];
    let mut end = digits.len();
    while end > 3 {
        grouped.push(digits[end - 3..end].to_string());
        end -= 3;
    }
    grouped.push(digits[..end].to_string());
    grouped.reverse();

    let mut res = grouped.join(".");
    if rounded < 0 {
        res = format!("-{res}");
    }

    return res;
}
