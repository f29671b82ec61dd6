//! Discretionary repayments made on top of the income-contingent amount

mod policy;

pub use policy::RepaymentPolicy;
