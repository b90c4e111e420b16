pub mod calculator;
pub mod error;
pub mod payslip;
pub mod profile_sync;
