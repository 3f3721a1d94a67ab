mod transactions;

pub use transactions::TransactionsView;
