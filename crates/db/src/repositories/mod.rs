//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations, hiding the
//! `SeaORM` implementation details from the rest of the application. Every
//! balance-affecting mutation runs inside a single database transaction.

pub mod account;
pub mod balance;
pub mod category;
pub mod ledger;
pub mod user;

pub use account::{
    AccountError, AccountRepository, AccountWithBalance, CreateAccountInput, UpdateAccountInput,
};
pub use category::{CategoryError, CategoryRepository};
pub use ledger::{
    CreateExpenseInput, CreateIncomeInput, CreateTransferInput, LedgerError, LedgerRepository,
    UpdateExpenseInput,
};
pub use user::{CreateUserInput, UserError, UserRepository};
