/// Server derived views kept between screens.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum CacheKey {
    Me,
    Wallet,
    TransactionsToday,
    TransactionsList(String),
    TransactionsByDay(String, String),
}
