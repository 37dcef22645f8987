//! Request handlers

pub mod debts;
pub mod legal;
